//! # roozkar-store
//!
//! Task, list, and tag CRUD with `SQLite` persistence.
//!
//! Rows keep a document shape: subtasks and tag references live as JSON
//! columns inside the task row, and list/tag references are weak string
//! ids with no foreign-key enforcement.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repository;
pub mod service;
pub mod types;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
pub use errors::StoreError;
