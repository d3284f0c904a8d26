//! Local data service.
//!
//! A small subset of the hosted table API (PostgREST conventions) over SQLite, mounted
//! under `/rest/v1`. It serves development setups and the integration tests, and it
//! stores the technology rating as `skill_level` just like the hosted schema.

mod catalog;
mod query;
mod students;
mod technologies;

pub use query::*;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::db::Repository;
use crate::errors::{service_codes, ServiceError};

/// Path prefix of the table routes.
pub const REST_PREFIX: &str = "/rest/v1";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_key = state.config.api_key.clone();

    let table_routes = Router::new()
        .route(
            "/student",
            get(students::list_students)
                .post(students::create_students)
                .patch(students::update_students),
        )
        .route(
            "/technology",
            get(technologies::list_technologies)
                .post(technologies::create_technologies)
                .patch(technologies::update_technologies)
                .delete(technologies::delete_technologies),
        )
        .route("/available_technology", get(catalog::list_available_technologies))
        .layer(middleware::from_fn(move |req, next| {
            auth::api_key_layer(api_key.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest(REST_PREFIX, table_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

// Helper functions shared by the table handlers

/// Decode a request body, reporting malformed JSON as PGRST102.
fn parse_body(body: &[u8]) -> Result<Value, ServiceError> {
    Ok(serde_json::from_slice(body)?)
}

/// Serialize rows as a JSON array, honouring `select`.
fn rows_response<T: Serialize>(
    status: StatusCode,
    rows: &[T],
    select: &Select,
) -> Result<Response, ServiceError> {
    let projected = rows
        .iter()
        .map(|row| serde_json::to_value(row).map(|value| select.project(value)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::Database(format!("Row serialization error: {}", e)))?;

    Ok((status, Json(projected)).into_response())
}

/// Answer a write: the affected rows when the caller prefers a representation,
/// otherwise an empty 201 (insert) or 204 (update/delete).
fn write_response<T: Serialize>(
    headers: &HeaderMap,
    inserted: bool,
    rows: &[T],
    select: &Select,
) -> Result<Response, ServiceError> {
    let status = if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    if wants_representation(headers) {
        rows_response(status, rows, select)
    } else if inserted {
        Ok(StatusCode::CREATED.into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

/// Unfiltered updates and deletes are refused.
fn missing_filter(verb: &str, table: &TableSpec) -> ServiceError {
    ServiceError::bad_request(
        service_codes::INVALID_QUERY,
        format!("{} on '{}' requires a filter", verb, table.name),
    )
}

/// PATCH bodies carry exactly one object.
fn single_row(body: Value) -> Result<serde_json::Map<String, Value>, ServiceError> {
    let mut rows = body_rows(body)?;
    if rows.len() != 1 {
        return Err(ServiceError::bad_request(
            service_codes::INVALID_BODY,
            "PATCH body must be a single JSON object",
        ));
    }
    Ok(rows.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn router(api_key: Option<&str>, catalog_enabled: bool) -> (Router, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let pool = init_database(&db_path, catalog_enabled)
            .await
            .expect("Failed to init DB");

        let config = Config {
            api_url: format!("http://127.0.0.1:0{}", REST_PREFIX),
            api_key: api_key.map(str::to_string),
            request_timeout: std::time::Duration::from_secs(5),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            catalog_enabled,
            log_level: "warn".to_string(),
        };
        let state = AppState {
            repo: Arc::new(Repository::new(pool)),
            config: Arc::new(config),
        };

        (create_router(state), temp_dir)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_key() {
        let (app, _dir) = router(Some("secret"), true).await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tables_require_key() {
        let (app, _dir) = router(Some("secret"), true).await;

        let response = app
            .clone()
            .oneshot(Request::get("/rest/v1/student").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], service_codes::JWT_INVALID);

        let response = app
            .oneshot(
                Request::get("/rest/v1/student")
                    .header("apikey", "secret")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_delete_without_filter_is_rejected() {
        let (app, _dir) = router(None, true).await;

        let response = app
            .oneshot(
                Request::delete("/rest/v1/technology")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], service_codes::INVALID_QUERY);
    }

    #[tokio::test]
    async fn test_insert_without_representation_is_empty() {
        let (app, _dir) = router(None, true).await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/rest/v1/student")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"code":"A1","name":"Ada","email":"ada@example.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());

        let response = app
            .oneshot(
                Request::get("/rest/v1/student?code=eq.A1&select=code,name")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            serde_json::json!([{ "code": "A1", "name": "Ada" }])
        );
    }

    #[tokio::test]
    async fn test_catalog_disabled_is_undefined_table() {
        let (app, _dir) = router(None, false).await;

        let response = app
            .oneshot(
                Request::get("/rest/v1/available_technology?select=id,name")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], service_codes::UNDEFINED_TABLE);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (app, _dir) = router(None, true).await;

        let response = app
            .oneshot(
                Request::post("/rest/v1/technology")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], service_codes::INVALID_BODY);
    }
}
