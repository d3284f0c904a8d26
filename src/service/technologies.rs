//! `technology` table endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::{
    body_rows, missing_filter, optional_integer, parse_body, required_text, rows_response,
    single_row, typed_assignments, write_response, AppState, TableQuery, TECHNOLOGY_TABLE,
};
use crate::db::{Assignments, NewTechnologyRecord, TechnologyFilter};
use crate::errors::ServiceError;

type Params = Query<Vec<(String, String)>>;

fn technology_filter(query: &TableQuery) -> Result<TechnologyFilter, ServiceError> {
    Ok(TechnologyFilter {
        id: query.integer_filter("id")?,
        code: query.filter("code").map(str::to_string),
    })
}

/// GET /rest/v1/technology - List technologies, filtered by `id` and/or `code`.
pub async fn list_technologies(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &TECHNOLOGY_TABLE)?;
    let technologies = state
        .repo
        .list_technologies(&technology_filter(&query)?)
        .await?;

    rows_response(StatusCode::OK, &technologies, &query.select)
}

/// POST /rest/v1/technology - Insert technologies. `id` is always server-assigned.
pub async fn create_technologies(
    State(state): State<AppState>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &TECHNOLOGY_TABLE)?;

    let records = body_rows(parse_body(&body)?)?
        .iter()
        .map(|row| {
            let assignments = typed_assignments(row, &TECHNOLOGY_TABLE)?;
            Ok(NewTechnologyRecord {
                code: required_text(&assignments, "code", &TECHNOLOGY_TABLE)?,
                name: required_text(&assignments, "name", &TECHNOLOGY_TABLE)?,
                skill_level: optional_integer(&assignments, "skill_level"),
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let inserted = state.repo.insert_technologies(&records).await?;
    tracing::debug!("Inserted {} technology row(s)", inserted.len());

    write_response(&headers, true, &inserted, &query.select)
}

/// PATCH /rest/v1/technology?id=eq.N - Update matching technologies.
pub async fn update_technologies(
    State(state): State<AppState>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &TECHNOLOGY_TABLE)?;
    let filter = technology_filter(&query)?;
    if filter.is_empty() {
        return Err(missing_filter("UPDATE", &TECHNOLOGY_TABLE));
    }

    let assignments: Assignments =
        typed_assignments(&single_row(parse_body(&body)?)?, &TECHNOLOGY_TABLE)?
            .into_iter()
            .filter(|(column, _)| *column != TECHNOLOGY_TABLE.key)
            .collect();
    let updated = state.repo.update_technologies(&filter, &assignments).await?;

    write_response(&headers, false, &updated, &query.select)
}

/// DELETE /rest/v1/technology?id=eq.N - Delete matching technologies.
pub async fn delete_technologies(
    State(state): State<AppState>,
    Query(params): Params,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &TECHNOLOGY_TABLE)?;
    let filter = technology_filter(&query)?;
    if filter.is_empty() {
        return Err(missing_filter("DELETE", &TECHNOLOGY_TABLE));
    }

    let deleted = state.repo.delete_technologies(&filter).await?;
    if deleted.is_empty() {
        tracing::debug!("DELETE on technology matched no rows: {:?}", filter);
    }

    write_response(&headers, false, &deleted, &query.select)
}
