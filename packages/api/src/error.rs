//! Standard error response body.

use serde::{Deserialize, Serialize};

/// The JSON body a Baize server sends with failure statuses.
///
/// ```json
/// { "error": "room \"friday-dungeon\" does not exist" }
/// ```
///
/// Clients do not depend on this shape — error bodies surface as raw JSON
/// in `baize-client`'s error type — but servers emit it and callers that
/// want the message can decode it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Human-readable description of the problem.
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
