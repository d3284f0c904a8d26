//! Data models for the Student Portfolio Navigator.
//!
//! In-memory representations are canonical: a technology rating is always `level`,
//! whatever name the data service stores it under.

mod student;
mod technology;

pub use student::*;
pub use technology::*;
