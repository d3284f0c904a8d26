//! Technology (skill rating) and catalog models.

use serde::{Deserialize, Serialize};

/// Lowest rating the star control offers.
pub const MIN_SKILL_LEVEL: i32 = 1;
/// Highest rating the star control offers.
pub const MAX_SKILL_LEVEL: i32 = 5;
/// Rating assumed when a write echo carries neither `level` nor `skill_level`.
pub const DEFAULT_SKILL_LEVEL: i32 = 3;

/// A skill owned by one student, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub level: i32,
}

/// A technology that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTechnology {
    pub code: String,
    pub name: String,
    pub level: i32,
}

/// Partial update of a technology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyChanges {
    pub name: Option<String>,
    pub level: Option<i32>,
}

/// Entry of the "choose a technology" selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTechnology {
    pub id: i64,
    pub name: String,
}

pub fn is_valid_level(level: i32) -> bool {
    (MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_domain() {
        assert!(!is_valid_level(0));
        assert!(is_valid_level(MIN_SKILL_LEVEL));
        assert!(is_valid_level(DEFAULT_SKILL_LEVEL));
        assert!(is_valid_level(MAX_SKILL_LEVEL));
        assert!(!is_valid_level(6));
    }
}
