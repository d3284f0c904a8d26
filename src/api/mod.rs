//! API Access Layer.
//!
//! Typed wrappers around the table API (`student`, `technology`,
//! `available_technology`). Each call is contained: transport and status failures
//! come back as [`ApiError`] values or degrade to safe defaults, never panics.

mod adapter;
mod students;
mod technologies;

pub use adapter::*;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::config::ApiConfig;
use crate::errors::ApiError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";
/// Header asking mutating calls to echo the affected rows.
pub const PREFER_HEADER: &str = "prefer";
pub const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for the table API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    span: tracing::Span,
}

impl ApiClient {
    /// Build a client from explicit settings.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .default_headers(default_headers(config.api_key.as_deref())?)
            .timeout(config.timeout)
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let span = tracing::info_span!("api_client", base_url = %base_url);

        Ok(Self {
            http,
            base_url,
            span,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn get(&self, resource: &str) -> RequestBuilder {
        self.http.get(self.url(resource))
    }

    fn post(&self, resource: &str) -> RequestBuilder {
        self.http.post(self.url(resource))
    }

    fn patch(&self, resource: &str) -> RequestBuilder {
        self.http.patch(self.url(resource))
    }

    fn delete(&self, resource: &str) -> RequestBuilder {
        self.http.delete(self.url(resource))
    }

    /// Send a request, turning any non-2xx answer into [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        async move {
            let response = request.send().await.map_err(|err| {
                tracing::warn!("Request failed: {}", err);
                ApiError::from(err)
            })?;

            let status = response.status();
            if status.is_success() {
                tracing::debug!(status = status.as_u16(), url = %response.url(), "request ok");
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "request rejected");
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
        .instrument(self.span.clone())
        .await
    }

    /// Send a request and decode the JSON array of rows it answers with.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.send(request).await?;
        let rows = response.json::<Vec<T>>().await.map_err(|err| {
            tracing::warn!(parent: &self.span, "Malformed response: {}", err);
            ApiError::from(err)
        })?;
        Ok(rows)
    }
}

/// `column=eq.value` filter pair.
fn eq_filter(column: &'static str, value: impl std::fmt::Display) -> (&'static str, String) {
    (column, format!("eq.{}", value))
}

/// First echoed row of a write, or [`ApiError::MissingRow`].
fn first_row<T>(rows: Vec<T>, what: &str) -> Result<T, ApiError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ApiError::MissingRow(format!("{} returned no rows", what)))
}

fn default_headers(api_key: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(PREFER_HEADER, HeaderValue::from_static(RETURN_REPRESENTATION));

    if let Some(key) = api_key {
        let invalid = |_| ApiError::Config("API key is not a valid header value".to_string());
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?,
        );
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_with_key() {
        let headers = default_headers(Some("secret")).unwrap();

        assert_eq!(headers[API_KEY_HEADER], "secret");
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[PREFER_HEADER], RETURN_REPRESENTATION);
    }

    #[test]
    fn test_default_headers_without_key() {
        let headers = default_headers(None).unwrap();

        assert!(headers.get(API_KEY_HEADER).is_none());
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers[PREFER_HEADER], RETURN_REPRESENTATION);
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let err = default_headers(Some("bad\nkey")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:9/rest/v1/", None)).unwrap();

        assert_eq!(client.base_url(), "http://localhost:9/rest/v1");
        assert_eq!(client.url("student"), "http://localhost:9/rest/v1/student");
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq_filter("id", 12), ("id", "eq.12".to_string()));
    }
}
