//! `available_technology` endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};

use super::{rows_response, AppState, TableQuery, CATALOG_TABLE};
use crate::errors::{service_codes, ServiceError};

/// GET /rest/v1/available_technology - The technology catalog.
///
/// Answers 404 like an undeployed relation when the catalog is switched off.
pub async fn list_available_technologies(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ServiceError> {
    if !state.config.catalog_enabled {
        return Err(ServiceError::NotFound {
            code: service_codes::UNDEFINED_TABLE,
            message: format!("relation \"public.{}\" does not exist", CATALOG_TABLE.name),
        });
    }

    let query = TableQuery::parse(&params, &CATALOG_TABLE)?;
    let catalog = state.repo.list_catalog().await?;

    rows_response(StatusCode::OK, &catalog, &query.select)
}
