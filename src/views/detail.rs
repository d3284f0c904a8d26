//! Student detail screen: profile, skills and skill editing.
//!
//! State machine over `Loading -> {Error, NotFound, Ready}` keyed by a student code.
//! Loads are split into [`StudentDetailView::begin`], [`StudentDetailView::fetch`]
//! and [`StudentDetailView::apply`] so that an embedding UI can run the fetch
//! detached; `apply` drops any outcome whose ticket is no longer current.

use std::sync::Arc;

use super::Notifier;
use crate::api::ApiClient;
use crate::catalog::Catalog;
use crate::errors::ApiError;
use crate::models::{
    is_valid_level, NewTechnology, Student, Technology, TechnologyChanges, MAX_SKILL_LEVEL,
    MIN_SKILL_LEVEL,
};

pub const STUDENT_CODE_MISSING: &str = "Student code is missing";
pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const STUDENT_LOAD_FAILED: &str = "Failed to load student data";

/// Loaded screen data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDetail {
    pub student: Student,
    pub technologies: Vec<Technology>,
    pub catalog: Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    /// The lookup succeeded and matched no student (terminal for this code)
    NotFound(String),
    /// Missing code or failed lookup (terminal for this code)
    Error(String),
    Ready(StudentDetail),
}

/// Identifies one load of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    code: Option<String>,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Result of [`StudentDetailView::fetch`], not yet applied to the screen.
#[derive(Debug)]
pub enum LoadOutcome {
    MissingCode,
    NotFound,
    Failed(ApiError),
    Loaded(StudentDetail),
}

/// Input of the add/edit skill form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnologyDraft {
    pub name: String,
    pub level: i32,
}

impl TechnologyDraft {
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn validate_for_add(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Please select a technology".to_string()));
        }
        self.validate_level()
    }

    pub fn validate_for_update(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Technology name is required".to_string()));
        }
        self.validate_level()
    }

    fn validate_level(&self) -> Result<(), ApiError> {
        if is_valid_level(self.level) {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "Skill level must be between {} and {}",
                MIN_SKILL_LEVEL, MAX_SKILL_LEVEL
            )))
        }
    }
}

pub struct StudentDetailView {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    generation: u64,
    state: DetailState,
}

impl StudentDetailView {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            generation: 0,
            state: DetailState::Loading,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn detail(&self) -> Option<&StudentDetail> {
        match &self.state {
            DetailState::Ready(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn technologies(&self) -> &[Technology] {
        self.detail()
            .map(|d| d.technologies.as_slice())
            .unwrap_or_default()
    }

    /// Names for the "choose a technology" selector; the fallback list until loaded.
    pub fn selector_options(&self) -> Vec<String> {
        match self.detail() {
            Some(detail) => detail.catalog.names(),
            None => Catalog::fallback().names(),
        }
    }

    /// Load the screen for `code`, replacing whatever was shown.
    pub async fn open(&mut self, code: Option<&str>) -> &DetailState {
        let ticket = self.begin(code);
        let outcome = Self::fetch(&self.api, &ticket).await;
        self.apply(&ticket, outcome);
        &self.state
    }

    /// Start a load: enter `Loading` and invalidate every earlier ticket.
    pub fn begin(&mut self, code: Option<&str>) -> LoadTicket {
        self.generation += 1;
        self.state = DetailState::Loading;
        LoadTicket {
            generation: self.generation,
            code: code.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    /// Fetch the student, then their skills and the catalog side by side.
    ///
    /// Skills degrade to an empty list and the catalog to the fallback list; only the
    /// student lookup can fail the load. A missing code makes no request.
    pub async fn fetch(api: &ApiClient, ticket: &LoadTicket) -> LoadOutcome {
        let Some(code) = ticket.code() else {
            return LoadOutcome::MissingCode;
        };

        match api.get_student(code).await {
            Ok(Some(student)) => {
                let (technologies, catalog) = tokio::join!(
                    api.list_technologies(code),
                    api.list_available_technologies()
                );
                LoadOutcome::Loaded(StudentDetail {
                    student,
                    technologies,
                    catalog,
                })
            }
            Ok(None) => LoadOutcome::NotFound,
            Err(e) => LoadOutcome::Failed(e),
        }
    }

    /// Apply a fetched outcome. Returns `false` (and changes nothing) for a stale ticket.
    pub fn apply(&mut self, ticket: &LoadTicket, outcome: LoadOutcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.state = match outcome {
            LoadOutcome::MissingCode => DetailState::Error(STUDENT_CODE_MISSING.to_string()),
            LoadOutcome::NotFound => {
                self.notifier.error(STUDENT_NOT_FOUND);
                DetailState::NotFound(ticket.code().unwrap_or_default().to_string())
            }
            LoadOutcome::Failed(_) => {
                self.notifier.error(STUDENT_LOAD_FAILED);
                DetailState::Error(STUDENT_LOAD_FAILED.to_string())
            }
            LoadOutcome::Loaded(detail) => DetailState::Ready(detail),
        };
        true
    }

    /// Add a skill to the loaded student.
    pub async fn add_technology(&mut self, draft: &TechnologyDraft) -> Result<Technology, ApiError> {
        let code = self.ready_code()?;
        self.check(draft.validate_for_add())?;

        let generation = self.generation;
        let request = NewTechnology {
            code: code.clone(),
            name: draft.name.trim().to_string(),
            level: draft.level,
        };
        let created = match self.api.create_technology(&request).await {
            Ok(technology) => technology,
            Err(e) => {
                self.notifier.error("Failed to add technology. Please try again.");
                return Err(e);
            }
        };

        let refreshed = self.api.try_list_technologies(&code).await;
        let echo = created.clone();
        self.reconcile(generation, refreshed, move |list| list.push(echo));
        self.notifier.success("Technology added successfully");
        Ok(created)
    }

    /// Rename and/or re-rate a skill.
    pub async fn update_technology(
        &mut self,
        id: i64,
        draft: &TechnologyDraft,
    ) -> Result<Technology, ApiError> {
        let code = self.ready_code()?;
        self.check(draft.validate_for_update())?;

        let generation = self.generation;
        let changes = TechnologyChanges {
            name: Some(draft.name.trim().to_string()),
            level: Some(draft.level),
        };
        let updated = match self.api.update_technology(id, &changes).await {
            Ok(technology) => technology,
            Err(e) => {
                self.notifier.error("Failed to update technology");
                return Err(e);
            }
        };

        let refreshed = self.api.try_list_technologies(&code).await;
        let echo = updated.clone();
        self.reconcile(generation, refreshed, move |list| {
            for technology in list.iter_mut().filter(|t| t.id == id) {
                *technology = echo.clone();
            }
        });
        self.notifier.success("Technology updated successfully");
        Ok(updated)
    }

    /// Remove a skill. `false` when the service did not confirm the delete.
    pub async fn delete_technology(&mut self, id: i64) -> bool {
        let code = match self.ready_code() {
            Ok(code) => code,
            Err(_) => return false,
        };

        let generation = self.generation;
        if !self.api.delete_technology(id).await {
            self.notifier.error("Failed to delete technology");
            return false;
        }

        let refreshed = self.api.try_list_technologies(&code).await;
        self.reconcile(generation, refreshed, move |list| list.retain(|t| t.id != id));
        self.notifier.success("Technology deleted successfully");
        true
    }

    fn ready_code(&self) -> Result<String, ApiError> {
        match self.detail() {
            Some(detail) => Ok(detail.student.code.clone()),
            None => {
                self.notifier.error(STUDENT_CODE_MISSING);
                Err(ApiError::Validation(STUDENT_CODE_MISSING.to_string()))
            }
        }
    }

    fn check(&self, validation: Result<(), ApiError>) -> Result<(), ApiError> {
        validation.inspect_err(|e| self.notifier.error(&e.message()))
    }

    /// Take the server's list after a mutation; if that re-fetch failed, patch the
    /// current list with the mutation's own result instead.
    fn reconcile(
        &mut self,
        generation: u64,
        refreshed: Result<Vec<Technology>, ApiError>,
        patch: impl FnOnce(&mut Vec<Technology>),
    ) {
        if generation != self.generation {
            return;
        }
        if let DetailState::Ready(detail) = &mut self.state {
            match refreshed {
                Ok(technologies) => detail.technologies = technologies,
                Err(_) => patch(&mut detail.technologies),
            }
        }
    }
}
