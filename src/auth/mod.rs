//! API key authentication for the local data service.
//!
//! Accepts the key in the `apikey` header or as a bearer token, like the hosted
//! table API. Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::api::API_KEY_HEADER;
use crate::errors::ServiceError;

/// Authentication layer function that takes the expected key as a parameter.
pub async fn api_key_layer(expected_key: Option<String>, request: Request, next: Next) -> Response {
    // If no key is configured, allow all requests (dev mode)
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    match (provided, bearer) {
        (None, None) => unauthorized_response("Missing API key"),
        (provided, bearer) => {
            let presented = [provided, bearer];
            let valid = presented
                .iter()
                .flatten()
                .all(|key| constant_time_compare(key, &expected));
            if valid {
                next.run(request).await
            } else {
                unauthorized_response("Invalid API key")
            }
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    ServiceError::Unauthorized(message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_comparison() {
        assert!(constant_time_compare("anon-key", "anon-key"));
        assert!(!constant_time_compare("anon-key", "anon-kez"));
        assert!(!constant_time_compare("anon", "anon-key"));
        assert!(!constant_time_compare("", "anon-key"));
    }

    #[test]
    fn test_rejection_body_uses_jwt_code() {
        let response = unauthorized_response("Invalid API key");

        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServiceError::Unauthorized(String::new()).error_code(),
            crate::errors::service_codes::JWT_INVALID
        );
    }
}
