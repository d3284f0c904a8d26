//! Schema adapter for the `technology` resource.
//!
//! The data service persists the rating as `skill_level`, while every in-memory
//! technology carries it as `level`. Reads accept either name; writes emit only
//! `skill_level`.

use serde::{Deserialize, Serialize};

use crate::models::{NewTechnology, Technology, TechnologyChanges, DEFAULT_SKILL_LEVEL};

/// A technology row as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct TechnologyRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub skill_level: Option<i32>,
}

/// Which field a row's rating was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// Already canonical (`level`)
    Canonical(i32),
    /// Server naming (`skill_level`)
    Stored(i32),
    /// Neither field present
    Missing,
}

impl Rating {
    pub fn resolve(self, fallback: Option<i32>) -> i32 {
        match self {
            Rating::Canonical(level) | Rating::Stored(level) => level,
            Rating::Missing => fallback.unwrap_or(DEFAULT_SKILL_LEVEL),
        }
    }
}

impl TechnologyRow {
    pub fn rating(&self) -> Rating {
        match (self.level, self.skill_level) {
            (Some(level), _) => Rating::Canonical(level),
            (None, Some(level)) => Rating::Stored(level),
            (None, None) => Rating::Missing,
        }
    }

    /// Canonicalize, using `fallback` (then the default level) when no rating came back.
    pub fn into_technology(self, fallback: Option<i32>) -> Technology {
        let level = self.rating().resolve(fallback);
        Technology {
            id: self.id,
            code: self.code,
            name: self.name,
            level,
        }
    }
}

impl From<TechnologyRow> for Technology {
    fn from(row: TechnologyRow) -> Self {
        row.into_technology(None)
    }
}

/// Outbound technology body. Never carries `level`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechnologyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<i32>,
}

impl From<&NewTechnology> for TechnologyPayload {
    fn from(technology: &NewTechnology) -> Self {
        Self {
            code: Some(technology.code.clone()),
            name: Some(technology.name.clone()),
            skill_level: Some(technology.level),
        }
    }
}

impl From<&TechnologyChanges> for TechnologyPayload {
    fn from(changes: &TechnologyChanges) -> Self {
        Self {
            code: None,
            name: changes.name.clone().filter(|name| !name.is_empty()),
            skill_level: changes.level,
        }
    }
}

/// Canonicalize every row of a response.
pub fn normalize_rows(rows: Vec<TechnologyRow>) -> Vec<Technology> {
    rows.into_iter().map(Technology::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(value: Value) -> TechnologyRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reads_skill_level() {
        let tech: Technology = row(json!({
            "id": 7, "code": "A1", "name": "Rust", "skill_level": 4
        }))
        .into();

        assert_eq!(tech.level, 4);
        assert_eq!(tech.id, 7);
    }

    #[test]
    fn test_level_wins_over_skill_level() {
        let r = row(json!({
            "id": 1, "code": "A1", "name": "Go", "level": 2, "skill_level": 5
        }));

        assert_eq!(r.rating(), Rating::Canonical(2));
        assert_eq!(Technology::from(r).level, 2);
    }

    #[test]
    fn test_missing_rating_uses_fallback_then_default() {
        let r = row(json!({ "id": 1, "code": "A1", "name": "Go" }));
        assert_eq!(r.rating(), Rating::Missing);
        assert_eq!(r.clone().into_technology(Some(5)).level, 5);
        assert_eq!(r.into_technology(None).level, DEFAULT_SKILL_LEVEL);

        let nulls = row(json!({
            "id": 1, "code": "A1", "name": "Go", "level": null, "skill_level": null
        }));
        assert_eq!(nulls.rating(), Rating::Missing);
    }

    #[test]
    fn test_adapting_canonical_record_is_noop() {
        let canonical = Technology {
            id: 3,
            code: "A1".to_string(),
            name: "Python".to_string(),
            level: 1,
        };
        let wire = serde_json::to_value(&canonical).unwrap();
        let adapted: Technology = row(wire).into();

        assert_eq!(adapted, canonical);
    }

    #[test]
    fn test_create_payload_uses_skill_level() {
        let body = serde_json::to_value(TechnologyPayload::from(&NewTechnology {
            code: "A1".to_string(),
            name: "Rust".to_string(),
            level: 4,
        }))
        .unwrap();

        assert_eq!(body, json!({ "code": "A1", "name": "Rust", "skill_level": 4 }));
    }

    #[test]
    fn test_update_payload_only_supplied_fields() {
        let level_only = serde_json::to_value(TechnologyPayload::from(&TechnologyChanges {
            name: None,
            level: Some(5),
        }))
        .unwrap();
        assert_eq!(level_only, json!({ "skill_level": 5 }));

        let blank_name = serde_json::to_value(TechnologyPayload::from(&TechnologyChanges {
            name: Some(String::new()),
            level: None,
        }))
        .unwrap();
        assert_eq!(blank_name, json!({}));
    }
}
