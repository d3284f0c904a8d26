//! Student Portfolio Navigator data layer.
//!
//! Typed access to the portfolio table API ([`api`]), the fallback technology catalog
//! ([`catalog`]), per-screen view controllers ([`views`]) and a local SQLite-backed
//! data service speaking the same protocol ([`service`]).

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod service;
pub mod views;

pub use api::ApiClient;
pub use config::{ApiConfig, Config};
pub use errors::ApiError;
