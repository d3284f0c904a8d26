//! Create/edit student form.

use std::sync::Arc;

use super::{Notifier, Route};
use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::{Student, StudentChanges};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Code,
    Name,
    Email,
    Photo,
    GithubLink,
    Description,
}

/// Raw text of the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub code: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub github_link: String,
    pub description: String,
}

impl StudentFields {
    /// Check required fields and build the student. Blank optional inputs become absent.
    pub fn to_student(&self) -> Result<Student, ApiError> {
        let required = [&self.code, &self.name, &self.email];
        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(ApiError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        Ok(Student {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            photo: optional(&self.photo),
            github_link: optional(&self.github_link),
            description: optional(&self.description),
        })
    }
}

impl From<&Student> for StudentFields {
    fn from(student: &Student) -> Self {
        Self {
            code: student.code.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            photo: student.photo.clone().unwrap_or_default(),
            github_link: student.github_link.clone().unwrap_or_default(),
            description: student.description.clone().unwrap_or_default(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct StudentFormView {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    mode: FormMode,
    fields: StudentFields,
    busy: bool,
}

impl StudentFormView {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, mode: FormMode) -> Self {
        let fields = match &mode {
            FormMode::Edit(code) => StudentFields {
                code: code.clone(),
                ..Default::default()
            },
            FormMode::Create => StudentFields::default(),
        };

        Self {
            api,
            notifier,
            mode,
            fields,
            busy: false,
        }
    }

    /// Form for a route; `None` for routes that are not forms.
    pub fn for_route(api: ApiClient, notifier: Arc<dyn Notifier>, route: &Route) -> Option<Self> {
        let mode = match route {
            Route::CreateStudent => FormMode::Create,
            Route::EditStudent(code) => FormMode::Edit(code.clone()),
            _ => return None,
        };
        Some(Self::new(api, notifier, mode))
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &StudentFields {
        &self.fields
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// In edit mode, fill the form from the stored student.
    ///
    /// Returns where to navigate instead when the student does not exist.
    pub async fn load(&mut self) -> Option<Route> {
        let FormMode::Edit(code) = &self.mode else {
            return None;
        };

        self.busy = true;
        let result = self.api.get_student(code).await;
        self.busy = false;

        match result {
            Ok(Some(student)) => {
                self.fields = StudentFields::from(&student);
                None
            }
            Ok(None) => {
                self.notifier.error("Student not found");
                Some(Route::StudentList)
            }
            Err(_) => {
                self.notifier.error("Failed to load student data");
                None
            }
        }
    }

    /// Set one input. The code is read-only once the student exists.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Code => {
                if self.mode == FormMode::Create {
                    self.fields.code = value;
                }
            }
            FormField::Name => self.fields.name = value,
            FormField::Email => self.fields.email = value,
            FormField::Photo => self.fields.photo = value,
            FormField::GithubLink => self.fields.github_link = value,
            FormField::Description => self.fields.description = value,
        }
    }

    /// Validate and save. On success returns the route to navigate to.
    pub async fn submit(&mut self) -> Result<Route, ApiError> {
        let student = match self.fields.to_student() {
            Ok(student) => student,
            Err(e) => {
                self.notifier.error(&e.message());
                return Err(e);
            }
        };

        self.busy = true;
        let result = match &self.mode {
            FormMode::Create => self
                .api
                .create_student(&student)
                .await
                .map(|s| (s, "Student created successfully")),
            FormMode::Edit(code) => {
                let mut changes = StudentChanges::from(&student);
                // Cleared optional inputs must reach the service as cleared.
                changes.photo.get_or_insert_with(String::new);
                changes.github_link.get_or_insert_with(String::new);
                changes.description.get_or_insert_with(String::new);
                self.api
                    .update_student(code, &changes)
                    .await
                    .map(|s| (s, "Student updated successfully"))
            }
        };
        self.busy = false;

        match result {
            Ok((saved, message)) => {
                self.fields = StudentFields::from(&saved);
                self.notifier.success(message);
                Ok(Route::StudentList)
            }
            Err(e) => {
                self.notifier.error("Failed to save student data");
                Err(e)
            }
        }
    }

    pub fn cancel(&self) -> Route {
        Route::StudentList
    }
}
