//! Student model matching the `student` table.

use serde::{Deserialize, Deserializer, Serialize};

/// A student profile, keyed by its client-assigned `code`.
///
/// Optional fields read back blank (`""`) are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub code: String,
    pub name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_link: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Partial update of a student. The code is immutable and therefore absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<&Student> for StudentChanges {
    fn from(student: &Student) -> Self {
        Self {
            name: Some(student.name.clone()),
            email: Some(student.email.clone()),
            photo: student.photo.clone(),
            github_link: student.github_link.clone(),
            description: student.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_tolerate_null_and_absence() {
        let student: Student = serde_json::from_value(json!({
            "code": "A1",
            "name": "Ada",
            "email": "ada@example.com",
            "photo": null
        }))
        .unwrap();

        assert_eq!(student.code, "A1");
        assert!(student.photo.is_none());
        assert!(student.github_link.is_none());
    }

    #[test]
    fn test_blank_optional_field_reads_as_absent() {
        let student: Student = serde_json::from_value(json!({
            "code": "A1",
            "name": "Ada",
            "email": "ada@example.com",
            "description": ""
        }))
        .unwrap();

        assert!(student.description.is_none());
    }

    #[test]
    fn test_changes_never_carry_code() {
        let student = Student {
            code: "A1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(StudentChanges::from(&student)).unwrap();

        assert!(body.get("code").is_none());
        assert_eq!(body["name"], "Ada");
        assert!(body.get("photo").is_none());
        assert!(StudentChanges::default().is_empty());
    }
}
