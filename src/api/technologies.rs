//! Technology and catalog resource calls.
//!
//! Reads here degrade instead of failing: a student's list falls back to empty and
//! the catalog falls back to the built-in list.

use super::{eq_filter, first_row, normalize_rows, ApiClient, TechnologyPayload, TechnologyRow};
use crate::catalog::Catalog;
use crate::errors::ApiError;
use crate::models::{AvailableTechnology, NewTechnology, Technology, TechnologyChanges};

const TECHNOLOGY: &str = "technology";
const AVAILABLE_TECHNOLOGY: &str = "available_technology";

impl ApiClient {
    /// GET /technology?code=eq.{code} - A student's skills, or the failure.
    pub async fn try_list_technologies(&self, code: &str) -> Result<Vec<Technology>, ApiError> {
        let rows: Vec<TechnologyRow> = self
            .fetch_rows(
                self.get(TECHNOLOGY)
                    .query(&[eq_filter("code", code), ("select", "*".to_string())]),
            )
            .await?;
        Ok(normalize_rows(rows))
    }

    /// A student's skills. Any failure reads as "no technologies".
    pub async fn list_technologies(&self, code: &str) -> Vec<Technology> {
        match self.try_list_technologies(code).await {
            Ok(technologies) => technologies,
            Err(e) => {
                tracing::warn!(parent: &self.span, "Technologies for {} unavailable: {}", code, e);
                Vec::new()
            }
        }
    }

    /// GET /available_technology?select=id,name - The catalog, or the fallback list.
    pub async fn list_available_technologies(&self) -> Catalog {
        let request = self
            .get(AVAILABLE_TECHNOLOGY)
            .query(&[("select", "id,name")]);

        match self.fetch_rows::<AvailableTechnology>(request).await {
            Ok(entries) => Catalog::live(entries),
            Err(e) if e.is_not_found() => {
                tracing::info!(parent: &self.span, "Catalog collection absent, using fallback");
                Catalog::fallback()
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, "Catalog unavailable, using fallback: {}", e);
                Catalog::fallback()
            }
        }
    }

    /// POST /technology - Store a new skill; the rating travels as `skill_level`.
    pub async fn create_technology(
        &self,
        technology: &NewTechnology,
    ) -> Result<Technology, ApiError> {
        if technology.code.trim().is_empty() || technology.name.trim().is_empty() {
            return Err(ApiError::Validation("Invalid technology data".to_string()));
        }

        let rows: Vec<TechnologyRow> = self
            .fetch_rows(
                self.post(TECHNOLOGY)
                    .json(&TechnologyPayload::from(technology)),
            )
            .await?;
        Ok(first_row(rows, "Technology create")?.into_technology(None))
    }

    /// PATCH /technology?id=eq.{id} - Change only the supplied fields.
    pub async fn update_technology(
        &self,
        id: i64,
        changes: &TechnologyChanges,
    ) -> Result<Technology, ApiError> {
        let rows: Vec<TechnologyRow> = self
            .fetch_rows(
                self.patch(TECHNOLOGY)
                    .query(&[eq_filter("id", id)])
                    .json(&TechnologyPayload::from(changes)),
            )
            .await?;
        Ok(first_row(rows, &format!("Technology {} update", id))?.into_technology(changes.level))
    }

    /// DELETE /technology?id=eq.{id} - `false` on any failure.
    pub async fn delete_technology(&self, id: i64) -> bool {
        match self
            .send(self.delete(TECHNOLOGY).query(&[eq_filter("id", id)]))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(parent: &self.span, "Technology {} delete failed: {}", id, e);
                false
            }
        }
    }
}
