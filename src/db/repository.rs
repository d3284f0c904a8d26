//! Database repository for table operations.
//!
//! Writes run inside transactions and return the affected rows, mirroring
//! `Prefer: return=representation`.

use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::ServiceError;

const STUDENT_COLUMNS: &str = "code, name, email, photo, github_link, description";
const TECHNOLOGY_COLUMNS: &str = "id, code, name, skill_level";

/// A `student` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub code: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub github_link: Option<String>,
    pub description: Option<String>,
}

/// A `technology` row. The rating column is `skill_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyRecord {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub skill_level: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTechnologyRecord {
    pub code: String,
    pub name: String,
    pub skill_level: Option<i64>,
}

/// An `available_technology` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    pub id: i64,
    pub name: String,
}

/// Typed value for a column assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

/// `SET column = value` pairs. Column names come from a fixed whitelist.
pub type Assignments = Vec<(&'static str, ColumnValue)>;

/// Row selection for `technology`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyFilter {
    pub id: Option<i64>,
    pub code: Option<String>,
}

impl TechnologyFilter {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.code.is_none()
    }

    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if self.id.is_some() {
            conditions.push("id = ?");
        }
        if self.code.is_some() {
            conditions.push("code = ?");
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== STUDENT OPERATIONS ====================

    /// List students in insertion order, optionally only the one with `code`.
    pub async fn list_students(&self, code: Option<&str>) -> Result<Vec<StudentRecord>, ServiceError> {
        let rows = match code {
            Some(code) => {
                sqlx::query(&format!(
                    "SELECT {} FROM student WHERE code = ? ORDER BY rowid",
                    STUDENT_COLUMNS
                ))
                .bind(code)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM student ORDER BY rowid", STUDENT_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(student_from_row).collect())
    }

    /// Insert students atomically.
    pub async fn insert_students(
        &self,
        students: &[StudentRecord],
    ) -> Result<Vec<StudentRecord>, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(students.len());

        for student in students {
            let row = sqlx::query(&format!(
                "INSERT INTO student ({0}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {0}",
                STUDENT_COLUMNS
            ))
            .bind(&student.code)
            .bind(&student.name)
            .bind(&student.email)
            .bind(&student.photo)
            .bind(&student.github_link)
            .bind(&student.description)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(student_from_row(&row));
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Apply `assignments` to the student with `code`.
    pub async fn update_students(
        &self,
        code: &str,
        assignments: &Assignments,
    ) -> Result<Vec<StudentRecord>, ServiceError> {
        if assignments.is_empty() {
            return self.list_students(Some(code)).await;
        }

        let sql = format!(
            "UPDATE student SET {} WHERE code = ? RETURNING {}",
            set_clause(assignments),
            STUDENT_COLUMNS
        );
        let mut query = sqlx::query(&sql);
        for (_, value) in assignments {
            query = match value {
                ColumnValue::Text(v) => query.bind(v.clone()),
                ColumnValue::Integer(v) => query.bind(*v),
            };
        }

        let rows = query.bind(code).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(student_from_row).collect())
    }

    // ==================== TECHNOLOGY OPERATIONS ====================

    pub async fn list_technologies(
        &self,
        filter: &TechnologyFilter,
    ) -> Result<Vec<TechnologyRecord>, ServiceError> {
        let sql = format!(
            "SELECT {} FROM technology{} ORDER BY id",
            TECHNOLOGY_COLUMNS,
            filter.where_clause()
        );
        let mut query = sqlx::query(&sql);
        if let Some(id) = filter.id {
            query = query.bind(id);
        }
        if let Some(code) = &filter.code {
            query = query.bind(code.clone());
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(technology_from_row).collect())
    }

    /// Insert technologies atomically. The owning student must exist.
    pub async fn insert_technologies(
        &self,
        technologies: &[NewTechnologyRecord],
    ) -> Result<Vec<TechnologyRecord>, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(technologies.len());

        for technology in technologies {
            let row = sqlx::query(&format!(
                "INSERT INTO technology (code, name, skill_level) VALUES (?, ?, ?) RETURNING {}",
                TECHNOLOGY_COLUMNS
            ))
            .bind(&technology.code)
            .bind(&technology.name)
            .bind(technology.skill_level)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(technology_from_row(&row));
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn update_technologies(
        &self,
        filter: &TechnologyFilter,
        assignments: &Assignments,
    ) -> Result<Vec<TechnologyRecord>, ServiceError> {
        if assignments.is_empty() {
            return self.list_technologies(filter).await;
        }

        let sql = format!(
            "UPDATE technology SET {}{} RETURNING {}",
            set_clause(assignments),
            filter.where_clause(),
            TECHNOLOGY_COLUMNS
        );
        let mut query = sqlx::query(&sql);
        for (_, value) in assignments {
            query = match value {
                ColumnValue::Text(v) => query.bind(v.clone()),
                ColumnValue::Integer(v) => query.bind(*v),
            };
        }
        if let Some(id) = filter.id {
            query = query.bind(id);
        }
        if let Some(code) = &filter.code {
            query = query.bind(code.clone());
        }

        let mut records: Vec<TechnologyRecord> =
            query.fetch_all(&self.pool).await?.iter().map(technology_from_row).collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    pub async fn delete_technologies(
        &self,
        filter: &TechnologyFilter,
    ) -> Result<Vec<TechnologyRecord>, ServiceError> {
        let sql = format!(
            "DELETE FROM technology{} RETURNING {}",
            filter.where_clause(),
            TECHNOLOGY_COLUMNS
        );
        let mut query = sqlx::query(&sql);
        if let Some(id) = filter.id {
            query = query.bind(id);
        }
        if let Some(code) = &filter.code {
            query = query.bind(code.clone());
        }

        let mut records: Vec<TechnologyRecord> =
            query.fetch_all(&self.pool).await?.iter().map(technology_from_row).collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    // ==================== CATALOG OPERATIONS ====================

    pub async fn list_catalog(&self) -> Result<Vec<CatalogRecord>, ServiceError> {
        let rows = sqlx::query("SELECT id, name FROM available_technology ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| CatalogRecord {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }
}

// Helper functions for row conversion

fn set_clause(assignments: &Assignments) -> String {
    assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn student_from_row(row: &SqliteRow) -> StudentRecord {
    StudentRecord {
        code: row.get("code"),
        name: row.get("name"),
        email: row.get("email"),
        photo: row.get("photo"),
        github_link: row.get("github_link"),
        description: row.get("description"),
    }
}

fn technology_from_row(row: &SqliteRow) -> TechnologyRecord {
    TechnologyRecord {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        skill_level: row.get("skill_level"),
    }
}
