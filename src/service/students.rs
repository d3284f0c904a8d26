//! `student` table endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::{
    body_rows, missing_filter, optional_text, parse_body, required_text, rows_response,
    single_row, typed_assignments, write_response, AppState, TableQuery, STUDENT_TABLE,
};
use crate::db::StudentRecord;
use crate::errors::ServiceError;

type Params = Query<Vec<(String, String)>>;

/// GET /rest/v1/student - List students, optionally `code=eq.X`.
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &STUDENT_TABLE)?;
    let students = state.repo.list_students(query.filter("code")).await?;

    rows_response(StatusCode::OK, &students, &query.select)
}

/// POST /rest/v1/student - Insert one or more students.
pub async fn create_students(
    State(state): State<AppState>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &STUDENT_TABLE)?;

    let records = body_rows(parse_body(&body)?)?
        .iter()
        .map(|row| {
            let assignments = typed_assignments(row, &STUDENT_TABLE)?;
            Ok(StudentRecord {
                code: required_text(&assignments, "code", &STUDENT_TABLE)?,
                name: required_text(&assignments, "name", &STUDENT_TABLE)?,
                email: required_text(&assignments, "email", &STUDENT_TABLE)?,
                photo: optional_text(&assignments, "photo"),
                github_link: optional_text(&assignments, "github_link"),
                description: optional_text(&assignments, "description"),
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let inserted = state.repo.insert_students(&records).await?;
    tracing::debug!("Inserted {} student(s)", inserted.len());

    write_response(&headers, true, &inserted, &query.select)
}

/// PATCH /rest/v1/student?code=eq.X - Update a student.
pub async fn update_students(
    State(state): State<AppState>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let query = TableQuery::parse(&params, &STUDENT_TABLE)?;
    let code = query
        .filter("code")
        .ok_or_else(|| missing_filter("UPDATE", &STUDENT_TABLE))?;

    let assignments = typed_assignments(&single_row(parse_body(&body)?)?, &STUDENT_TABLE)?;
    let updated = state.repo.update_students(code, &assignments).await?;

    write_response(&headers, false, &updated, &query.select)
}
