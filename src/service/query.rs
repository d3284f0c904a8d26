//! Query-string and body handling in the table API's conventions.

use axum::http::HeaderMap;
use serde_json::{Map, Value};

use crate::api::{PREFER_HEADER, RETURN_REPRESENTATION};
use crate::db::ColumnValue;
use crate::errors::{service_codes, ServiceError};

/// Column type, used to check incoming values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
}

/// Shape of one table.
pub struct TableSpec {
    pub name: &'static str,
    pub key: &'static str,
    pub columns: &'static [(&'static str, ColumnType)],
    /// Columns accepted in `column=eq.value` filters
    pub filterable: &'static [&'static str],
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<(&'static str, ColumnType)> {
        self.columns.iter().copied().find(|(column, _)| *column == name)
    }

    fn unknown_column(&self, name: &str) -> ServiceError {
        ServiceError::bad_request(
            service_codes::UNKNOWN_COLUMN,
            format!(
                "Could not find the '{}' column of '{}' in the schema cache",
                name, self.name
            ),
        )
    }
}

pub const STUDENT_TABLE: TableSpec = TableSpec {
    name: "student",
    key: "code",
    columns: &[
        ("code", ColumnType::Text),
        ("name", ColumnType::Text),
        ("email", ColumnType::Text),
        ("photo", ColumnType::Text),
        ("github_link", ColumnType::Text),
        ("description", ColumnType::Text),
    ],
    filterable: &["code"],
};

pub const TECHNOLOGY_TABLE: TableSpec = TableSpec {
    name: "technology",
    key: "id",
    columns: &[
        ("id", ColumnType::Integer),
        ("code", ColumnType::Text),
        ("name", ColumnType::Text),
        ("skill_level", ColumnType::Integer),
    ],
    filterable: &["id", "code"],
};

pub const CATALOG_TABLE: TableSpec = TableSpec {
    name: "available_technology",
    key: "id",
    columns: &[("id", ColumnType::Integer), ("name", ColumnType::Text)],
    filterable: &[],
};

/// Columns requested through `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Select {
    All,
    Columns(Vec<String>),
}

impl Select {
    /// Keep only the selected keys of a JSON row.
    pub fn project(&self, row: Value) -> Value {
        match (self, row) {
            (Select::Columns(columns), Value::Object(mut object)) => {
                let projected: Map<String, Value> = columns
                    .iter()
                    .filter_map(|column| object.remove(column).map(|v| (column.clone(), v)))
                    .collect();
                Value::Object(projected)
            }
            (_, row) => row,
        }
    }
}

/// Parsed query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub filters: Vec<(&'static str, String)>,
    pub select: Select,
}

impl TableQuery {
    pub fn parse(params: &[(String, String)], table: &TableSpec) -> Result<Self, ServiceError> {
        let mut filters = Vec::new();
        let mut select = Select::All;

        for (key, value) in params {
            if key == "select" {
                select = parse_select(value, table)?;
                continue;
            }

            let Some(column) = table.filterable.iter().copied().find(|c| *c == key.as_str()) else {
                return Err(ServiceError::bad_request(
                    service_codes::INVALID_QUERY,
                    format!("Unsupported filter column '{}' on '{}'", key, table.name),
                ));
            };
            let Some(operand) = value.strip_prefix("eq.") else {
                return Err(ServiceError::bad_request(
                    service_codes::INVALID_QUERY,
                    format!("Unsupported operator in '{}={}'", key, value),
                ));
            };
            filters.push((column, operand.to_string()));
        }

        Ok(Self { filters, select })
    }

    pub fn filter(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Integer filter value, rejecting malformed numbers.
    pub fn integer_filter(&self, column: &str) -> Result<Option<i64>, ServiceError> {
        self.filter(column)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    ServiceError::bad_request(
                        service_codes::INVALID_TEXT,
                        format!("invalid input syntax for type bigint: \"{}\"", raw),
                    )
                })
            })
            .transpose()
    }
}

fn parse_select(raw: &str, table: &TableSpec) -> Result<Select, ServiceError> {
    if raw.trim() == "*" {
        return Ok(Select::All);
    }

    let mut columns = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if table.column(part).is_none() {
            return Err(ServiceError::bad_request(
                service_codes::INVALID_QUERY,
                format!("column {}.{} does not exist", table.name, part),
            ));
        }
        columns.push(part.to_string());
    }
    Ok(Select::Columns(columns))
}

/// Whether the caller asked for the affected rows back.
pub fn wants_representation(headers: &HeaderMap) -> bool {
    headers
        .get_all(PREFER_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|pref| pref.trim() == RETURN_REPRESENTATION)
}

/// A write body: one object or an array of objects.
pub fn body_rows(body: Value) -> Result<Vec<Map<String, Value>>, ServiceError> {
    let invalid = || {
        ServiceError::bad_request(
            service_codes::INVALID_BODY,
            "Request body must be a JSON object or an array of objects",
        )
    };

    match body {
        Value::Object(object) => Ok(vec![object]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object),
                _ => Err(invalid()),
            })
            .collect(),
        _ => Err(invalid()),
    }
}

/// Check every key of a body row against the table and type its values.
pub fn typed_assignments(
    row: &Map<String, Value>,
    table: &TableSpec,
) -> Result<Vec<(&'static str, ColumnValue)>, ServiceError> {
    row.iter()
        .map(|(key, value)| {
            let (column, column_type) = table.column(key).ok_or_else(|| table.unknown_column(key))?;
            Ok((column, typed_value(column, column_type, value)?))
        })
        .collect()
}

fn typed_value(column: &str, column_type: ColumnType, value: &Value) -> Result<ColumnValue, ServiceError> {
    let mismatch = || {
        ServiceError::bad_request(
            service_codes::INVALID_TEXT,
            format!("invalid input syntax for column \"{}\": {}", column, value),
        )
    };

    match (column_type, value) {
        (ColumnType::Text, Value::Null) => Ok(ColumnValue::Text(None)),
        (ColumnType::Text, Value::String(s)) => Ok(ColumnValue::Text(Some(s.clone()))),
        (ColumnType::Integer, Value::Null) => Ok(ColumnValue::Integer(None)),
        (ColumnType::Integer, Value::Number(n)) => {
            n.as_i64().map(|n| ColumnValue::Integer(Some(n))).ok_or_else(mismatch)
        }
        _ => Err(mismatch()),
    }
}

/// Take a required text column out of typed assignments.
pub fn required_text(
    assignments: &[(&'static str, ColumnValue)],
    column: &'static str,
    table: &TableSpec,
) -> Result<String, ServiceError> {
    optional_text(assignments, column).ok_or_else(|| {
        ServiceError::bad_request(
            service_codes::NOT_NULL_VIOLATION,
            format!(
                "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                column, table.name
            ),
        )
    })
}

pub fn optional_text(assignments: &[(&'static str, ColumnValue)], column: &str) -> Option<String> {
    assignments.iter().find_map(|(c, v)| match v {
        ColumnValue::Text(text) if *c == column => text.clone(),
        _ => None,
    })
}

pub fn optional_integer(assignments: &[(&'static str, ColumnValue)], column: &str) -> Option<i64> {
    assignments.iter().find_map(|(c, v)| match v {
        ColumnValue::Integer(n) if *c == column => *n,
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_eq_filter_and_select() {
        let query = TableQuery::parse(
            &params(&[("code", "eq.A1"), ("select", "*")]),
            &TECHNOLOGY_TABLE,
        )
        .unwrap();

        assert_eq!(query.filter("code"), Some("A1"));
        assert_eq!(query.select, Select::All);
        assert_eq!(query.integer_filter("id").unwrap(), None);
    }

    #[test]
    fn test_reject_other_operators_and_columns() {
        let err = TableQuery::parse(&params(&[("id", "gt.3")]), &TECHNOLOGY_TABLE).unwrap_err();
        assert_eq!(err.error_code(), service_codes::INVALID_QUERY);

        let err = TableQuery::parse(&params(&[("email", "eq.x")]), &STUDENT_TABLE).unwrap_err();
        assert_eq!(err.error_code(), service_codes::INVALID_QUERY);

        let query = TableQuery::parse(&params(&[("id", "eq.abc")]), &TECHNOLOGY_TABLE).unwrap();
        assert!(query.integer_filter("id").is_err());
    }

    #[test]
    fn test_select_projection() {
        let query =
            TableQuery::parse(&params(&[("select", "id,name")]), &CATALOG_TABLE).unwrap();
        let row = json!({ "id": 1, "name": "Rust", "extra": true });

        assert_eq!(query.select.project(row), json!({ "id": 1, "name": "Rust" }));
        assert!(TableQuery::parse(&params(&[("select", "id,nope")]), &CATALOG_TABLE).is_err());
    }

    #[test]
    fn test_level_is_not_a_technology_column() {
        let row = body_rows(json!({ "code": "A1", "name": "Rust", "level": 4 })).unwrap();
        let err = typed_assignments(&row[0], &TECHNOLOGY_TABLE).unwrap_err();

        assert_eq!(err.error_code(), service_codes::UNKNOWN_COLUMN);
        assert!(err.message().contains("'level'"));
    }

    #[test]
    fn test_typed_assignments() {
        let rows = body_rows(json!([{ "name": "Go", "skill_level": 2, "code": null }])).unwrap();
        let assignments = typed_assignments(&rows[0], &TECHNOLOGY_TABLE).unwrap();

        assert_eq!(optional_text(&assignments, "name"), Some("Go".to_string()));
        assert_eq!(optional_integer(&assignments, "skill_level"), Some(2));
        assert!(required_text(&assignments, "code", &TECHNOLOGY_TABLE).is_err());

        let bad = body_rows(json!({ "skill_level": "high" })).unwrap();
        assert!(typed_assignments(&bad[0], &TECHNOLOGY_TABLE).is_err());
        assert!(body_rows(json!(42)).is_err());
    }

    #[test]
    fn test_wants_representation() {
        let mut headers = HeaderMap::new();
        assert!(!wants_representation(&headers));

        headers.insert(PREFER_HEADER, "count=exact, return=representation".parse().unwrap());
        assert!(wants_representation(&headers));
    }
}
