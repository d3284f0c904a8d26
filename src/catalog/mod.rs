//! Technology catalog offered when adding a skill.
//!
//! The live catalog comes from the `available_technology` collection. When that
//! collection cannot be read, a fixed fallback list stands in for it.

use crate::models::AvailableTechnology;

/// Built-in catalog. Ids are local and unrelated to server-assigned catalog ids.
pub const FALLBACK_TECHNOLOGIES: [(i64, &str); 10] = [
    (1, "JavaScript"),
    (2, "TypeScript"),
    (3, "React"),
    (4, "Node.js"),
    (5, "Python"),
    (6, "Java"),
    (7, "C#"),
    (8, "PHP"),
    (9, "Ruby"),
    (10, "Go"),
];

pub fn fallback_technologies() -> Vec<AvailableTechnology> {
    FALLBACK_TECHNOLOGIES
        .iter()
        .map(|(id, name)| AvailableTechnology {
            id: *id,
            name: (*name).to_string(),
        })
        .collect()
}

/// Where a catalog's entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Live,
    Fallback,
}

/// Catalog entries together with their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<AvailableTechnology>,
    pub source: CatalogSource,
}

impl Catalog {
    pub fn live(entries: Vec<AvailableTechnology>) -> Self {
        Self {
            entries,
            source: CatalogSource::Live,
        }
    }

    pub fn fallback() -> Self {
        Self {
            entries: fallback_technologies(),
            source: CatalogSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }

    /// Selector options. An empty live catalog offers the fallback names instead.
    pub fn names(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return FALLBACK_TECHNOLOGIES
                .iter()
                .map(|(_, name)| (*name).to_string())
                .collect();
        }
        self.entries.iter().map(|t| t.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_ten_fixed_entries() {
        let catalog = Catalog::fallback();

        assert!(catalog.is_fallback());
        assert_eq!(catalog.entries.len(), 10);
        assert_eq!(catalog.entries[0].name, "JavaScript");
        assert_eq!(catalog.entries[9].name, "Go");
        let ids: Vec<i64> = catalog.entries.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_live_catalog_offers_fallback_names() {
        let catalog = Catalog::live(Vec::new());

        assert!(!catalog.is_fallback());
        assert_eq!(catalog.names().len(), 10);
        assert!(catalog.contains("C#"));
    }

    #[test]
    fn test_live_catalog_names() {
        let catalog = Catalog::live(vec![AvailableTechnology {
            id: 42,
            name: "Rust".to_string(),
        }]);

        assert_eq!(catalog.names(), vec!["Rust".to_string()]);
        assert!(!catalog.contains("Go"));
    }
}
