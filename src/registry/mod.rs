//! Object registry
//!
//! The authoritative in-memory store of name → [`Spec`](crate::spec::Spec)
//! plus the configuration version.
//!
//! # Concurrency
//!
//! - One process-wide mutex guards every mutation. Check-then-act
//!   sequences (existence check, kind check, put/delete, version bump) run
//!   inside a single [`RegistryWriteGuard`].
//! - Readers load an immutable snapshot and never touch the mutex. A reader
//!   may see a value a concurrent writer is about to replace.
//! - Each accepted mutation bumps the version exactly once and publishes one
//!   [`RegistryEvent`] while the lock is still held, so events arrive in
//!   version order.

mod errors;
mod events;
mod store;

pub use errors::{RegistryError, RegistryResult};
pub use events::{RegistryChange, RegistryEvent};
pub use store::{ObjectRegistry, RegistryWriteGuard, DEFAULT_EVENT_BUFFER};
