//! Object HTTP Routes
//!
//! Endpoints for the object lifecycle, object kinds and object statuses.
//! Handlers only extract the path and body and shape the response; the
//! rules live in [`ObjectApi`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::{
    ApiError, ErrorResponse, Mutation, ObjectApi, CONFIG_VERSION_HEADER, YAML_CONTENT_TYPE,
};

// ==================
// Shared State
// ==================

/// Object state shared across handlers
pub struct ObjectState {
    pub api: ObjectApi,
}

impl ObjectState {
    pub fn new(api: ObjectApi) -> Self {
        Self { api }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// ==================
// Object Routes
// ==================

/// Create object routes
pub fn object_routes(state: Arc<ObjectState>) -> Router {
    Router::new()
        .route("/object-kinds", get(list_object_kinds_handler))
        // Object lifecycle
        .route(
            "/objects",
            get(list_objects_handler).post(create_object_handler),
        )
        .route(
            "/objects/:name",
            get(get_object_handler)
                .put(update_object_handler)
                .delete(delete_object_handler),
        )
        // Status
        .route("/status/objects", get(list_status_objects_handler))
        .route("/status/objects/:name", get(get_status_object_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn error_response(err: ApiError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from_error(&err)))
}

fn version_headers(mutation: &Mutation) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(CONFIG_VERSION_HEADER),
        HeaderValue::from(mutation.version),
    );
    headers
}

fn yaml(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], body)
}

// ==================
// Kind Handlers
// ==================

async fn list_object_kinds_handler(
    State(state): State<Arc<ObjectState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let kinds = state.api.list_kinds().map_err(error_response)?;
    Ok(yaml(kinds))
}

// ==================
// Object Handlers
// ==================

async fn create_object_handler(
    State(state): State<Arc<ObjectState>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<(StatusCode, HeaderMap), HandlerError> {
    let mutation = state.api.create(&body, None).map_err(error_response)?;

    let mut headers = version_headers(&mutation);
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), mutation.name);
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, value);
    }

    Ok((StatusCode::CREATED, headers))
}

async fn list_objects_handler(
    State(state): State<Arc<ObjectState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let objects = state.api.list().map_err(error_response)?;
    Ok(yaml(objects))
}

async fn get_object_handler(
    State(state): State<Arc<ObjectState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let spec = state.api.get(&name).map_err(error_response)?;
    Ok(yaml(spec.canonical().to_string()))
}

async fn update_object_handler(
    State(state): State<Arc<ObjectState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, HeaderMap), HandlerError> {
    let mutation = state.api.update(&name, &body).map_err(error_response)?;
    Ok((StatusCode::OK, version_headers(&mutation)))
}

async fn delete_object_handler(
    State(state): State<Arc<ObjectState>>,
    Path(name): Path<String>,
) -> Result<(StatusCode, HeaderMap), HandlerError> {
    let mutation = state.api.delete(&name).map_err(error_response)?;
    Ok((StatusCode::OK, version_headers(&mutation)))
}

// ==================
// Status Handlers
// ==================

async fn list_status_objects_handler(
    State(state): State<Arc<ObjectState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let statuses = state.api.list_statuses().map_err(error_response)?;
    Ok(yaml(statuses))
}

async fn get_status_object_handler(
    State(state): State<Arc<ObjectState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let status = state.api.get_status(&name).map_err(error_response)?;
    Ok(yaml(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let (status, Json(body)) = error_response(ApiError::Conflict("svc1".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "MANIFOLD_CONFLICT");

        let (status, _) = error_response(ApiError::Serialization("boom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_version_headers() {
        let headers = version_headers(&Mutation {
            name: "svc1".into(),
            version: 42,
        });
        assert_eq!(headers.get(CONFIG_VERSION_HEADER).unwrap(), "42");
    }
}
