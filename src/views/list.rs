//! Student list screen.

use std::sync::Arc;

use super::{Notifier, Route};
use crate::api::ApiClient;
use crate::models::Student;

pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
}

/// Student list with client-side search.
pub struct StudentListView {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: ListState,
    students: Vec<Student>,
    search_term: String,
}

impl StudentListView {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: ListState::Loading,
            students: Vec::new(),
            search_term: String::new(),
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Fetch all students. A failed fetch shows an empty list and a notification.
    pub async fn load(&mut self) {
        self.state = ListState::Loading;
        self.students = match self.api.list_students().await {
            Ok(students) => students,
            Err(_) => {
                self.notifier.error(FETCH_FAILED_MESSAGE);
                Vec::new()
            }
        };
        self.state = ListState::Ready;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Students matching the search term on name, code or email, case-insensitively.
    pub fn visible(&self) -> Vec<&Student> {
        filter_students(&self.students, &self.search_term)
    }

    pub fn view_student(&self, code: &str) -> Route {
        Route::StudentDetail(code.to_string())
    }

    pub fn edit_student(&self, code: &str) -> Route {
        Route::EditStudent(code.to_string())
    }

    pub fn view_resume(&self, code: &str) -> Route {
        Route::Resume(code.to_string())
    }

    pub fn create_student(&self) -> Route {
        Route::CreateStudent
    }
}

pub fn filter_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return students.iter().collect();
    }

    students
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle)
                || s.code.to_lowercase().contains(&needle)
                || s.email.to_lowercase().contains(&needle)
        })
        .collect()
}
