//! Read-only resume screen.

use std::fmt::Write;
use std::sync::Arc;

use super::{Notifier, Route};
use crate::api::ApiClient;
use crate::models::{Student, Technology, MAX_SKILL_LEVEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeState {
    Loading,
    /// Nothing to show; the user is sent back to the list
    Missing,
    Ready {
        student: Student,
        technologies: Vec<Technology>,
    },
}

pub struct ResumeView {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: ResumeState,
}

impl ResumeView {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: ResumeState::Loading,
        }
    }

    pub fn state(&self) -> &ResumeState {
        &self.state
    }

    /// Load the resume for `code`. Returns where to navigate when there is none.
    pub async fn load(&mut self, code: &str) -> Option<Route> {
        self.state = ResumeState::Loading;

        match self.api.get_student(code).await {
            Ok(Some(student)) => {
                let technologies = self.api.list_technologies(code).await;
                self.state = ResumeState::Ready {
                    student,
                    technologies,
                };
                None
            }
            Ok(None) => {
                self.notifier.error("Student not found");
                self.state = ResumeState::Missing;
                Some(Route::StudentList)
            }
            Err(_) => {
                self.notifier.error("Failed to load student data");
                self.state = ResumeState::Missing;
                None
            }
        }
    }

    /// The header search box.
    pub fn search(&self, input: &str) -> Option<Route> {
        let code = input.trim();
        if code.is_empty() {
            self.notifier.error("Please enter a student code");
            return None;
        }
        Some(Route::Resume(code.to_string()))
    }

    pub fn render(&self) -> Option<String> {
        match &self.state {
            ResumeState::Ready {
                student,
                technologies,
            } => Some(render_resume(student, technologies)),
            _ => None,
        }
    }
}

/// `https://github.com/ada` -> `ada`. Other links are returned unchanged.
pub fn github_handle(link: &str) -> &str {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .unwrap_or(link);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.strip_prefix("github.com/").unwrap_or(link)
}

/// Five-star rendering of a rating, e.g. `★★★☆☆`.
pub fn star_bar(level: i32) -> String {
    let filled = level.clamp(0, MAX_SKILL_LEVEL) as usize;
    let empty = MAX_SKILL_LEVEL as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub fn skill_percent(level: i32) -> i32 {
    level.clamp(0, MAX_SKILL_LEVEL) * 100 / MAX_SKILL_LEVEL
}

pub fn render_resume(student: &Student, technologies: &[Technology]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", student.name);
    let _ = writeln!(out, "Code: {}", student.code);
    if !student.email.is_empty() {
        let _ = writeln!(out, "Email: {}", student.email);
    }
    if let Some(link) = &student.github_link {
        let _ = writeln!(out, "GitHub: {}", github_handle(link));
    }

    let _ = writeln!(out, "\nAbout");
    match &student.description {
        Some(description) => {
            let _ = writeln!(out, "{}", description);
        }
        None => {
            let _ = writeln!(out, "No description provided.");
        }
    }

    let _ = writeln!(out, "\nSkills");
    if technologies.is_empty() {
        let _ = writeln!(out, "No technologies added yet.");
    }
    for technology in technologies {
        let _ = writeln!(
            out,
            "{:<16} {} {:>3}%",
            technology.name,
            star_bar(technology.level),
            skill_percent(technology.level)
        );
    }

    out
}
