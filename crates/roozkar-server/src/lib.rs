//! # roozkar-server
//!
//! Axum HTTP server exposing the task-management REST API under `/api`.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use server::{ApiServer, AppState};
