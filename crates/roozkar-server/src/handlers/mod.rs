//! Request handlers for the `/api` surface.

pub mod lists;
pub mod meta;
pub mod stats;
pub mod subtasks;
pub mod tags;
pub mod tasks;

use serde::Serialize;

/// Simple `{"message": …}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Human-readable confirmation.
    pub message: &'static str,
}
