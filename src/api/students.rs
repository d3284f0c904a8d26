//! Student resource calls.

use super::{eq_filter, first_row, ApiClient};
use crate::errors::ApiError;
use crate::models::{Student, StudentChanges};

const STUDENT: &str = "student";

impl ApiClient {
    /// GET /student?select=* - List all students in server order.
    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.fetch_rows(self.get(STUDENT).query(&[("select", "*")]))
            .await
    }

    /// GET /student?code=eq.{code} - Look up one student.
    ///
    /// `Ok(None)` means the lookup succeeded and matched nothing.
    pub async fn get_student(&self, code: &str) -> Result<Option<Student>, ApiError> {
        let rows: Vec<Student> = self
            .fetch_rows(
                self.get(STUDENT)
                    .query(&[eq_filter("code", code), ("select", "*".to_string())]),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// POST /student - Create a student and return the stored row.
    ///
    /// Required fields are the caller's responsibility.
    pub async fn create_student(&self, student: &Student) -> Result<Student, ApiError> {
        let rows = self.fetch_rows(self.post(STUDENT).json(student)).await?;
        first_row(rows, "Student create")
    }

    /// PATCH /student?code=eq.{code} - Change only the supplied fields.
    pub async fn update_student(
        &self,
        code: &str,
        changes: &StudentChanges,
    ) -> Result<Student, ApiError> {
        let rows = self
            .fetch_rows(
                self.patch(STUDENT)
                    .query(&[eq_filter("code", code)])
                    .json(changes),
            )
            .await?;
        first_row(rows, &format!("Student {} update", code))
    }
}
