//! Object specifications
//!
//! A spec is one parsed configuration object: a name, a kind tag and the
//! YAML text it was submitted as. The registry never looks inside the
//! payload; kind-specific checks live behind [`KindRegistry`].

mod errors;
mod kind;
mod object;

pub use errors::{SpecError, SpecResult};
pub use kind::{KindRegistry, KindValidator, RequiredFields};
pub use object::{Spec, NAME_PATTERN};
