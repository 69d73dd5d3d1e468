//! # sevtrack Common Library
//!
//! Shared code for the sevtrack services including:
//! - Bug report / bug record models
//! - Configuration loading and resolution
//! - Database bootstrap (pool + schema)
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{BugRecord, BugReport, NewBug, UNKNOWN_SEVERITY};
