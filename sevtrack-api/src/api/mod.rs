//! HTTP API handlers for sevtrack-api

pub mod bugs;
pub mod buildinfo;
pub mod health;

pub use bugs::{bug_routes, get_bug, submit_batch, submit_single};
pub use buildinfo::get_build_info;
pub use health::health_routes;
