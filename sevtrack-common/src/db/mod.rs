//! Database bootstrap shared by sevtrack services

pub mod init;

pub use init::{create_bugs_table, init_database};
