//! Client-side navigation targets.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    StudentList,
    /// `/student/{code}`
    StudentDetail(String),
    /// `/create-student`
    CreateStudent,
    /// `/edit-student/{code}`
    EditStudent(String),
    /// `/resume/{code}`
    Resume(String),
    /// Anything else
    NotFound(String),
}

impl Route {
    /// Resolve a path. Unknown paths map to [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::StudentList,
            ["create-student"] => Route::CreateStudent,
            ["student", code] => Route::StudentDetail((*code).to_string()),
            ["edit-student", code] => Route::EditStudent((*code).to_string()),
            ["resume", code] => Route::Resume((*code).to_string()),
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::StudentList => "/".to_string(),
            Route::StudentDetail(code) => format!("/student/{}", code),
            Route::CreateStudent => "/create-student".to_string(),
            Route::EditStudent(code) => format!("/edit-student/{}", code),
            Route::Resume(code) => format!("/resume/{}", code),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Student code carried by the route, if any.
    pub fn student_code(&self) -> Option<&str> {
        match self {
            Route::StudentDetail(code) | Route::EditStudent(code) | Route::Resume(code) => {
                Some(code)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
