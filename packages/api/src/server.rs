//! Server discovery type — `GET api/`.

use serde::{Deserialize, Serialize};

/// The response body for `GET api/`.
///
/// Describes the server build, where the API is mounted, and a few
/// capacity facts. Clients fetch this document once at startup to decide
/// whether their build still matches the server (see the bootstrap in
/// `baize-client`) and cache it for synchronous reads afterwards.
///
/// # Example
///
/// ```json
/// {
///   "version": "0.1.0",
///   "engine": "2.0.0",
///   "root": "/baize/api",
///   "ttl": 48,
///   "snapshotUploads": true,
///   "freeRooms": 128
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Server build version. Compared verbatim against the version baked
    /// into the client at compile time; any difference triggers the
    /// "update available" notice.
    pub version: String,

    /// Semver of the table/template engine the server runs. Templates
    /// declare the engine they need; the server rejects incompatible ones.
    pub engine: String,

    /// URL path the API is mounted at, e.g. `"/baize/api"`. The web app
    /// root is this path with the trailing `api` segment removed.
    pub root: String,

    /// Hours an inactive room survives before the server reaps it.
    pub ttl: i64,

    /// `true` when `POST api/rooms/` accepts a snapshot attachment.
    pub snapshot_uploads: bool,

    /// How many more rooms this server will accept before it answers
    /// room creation with `503`.
    pub free_rooms: u32,
}

impl ServerInfo {
    /// Construct a `ServerInfo` with defaults for the capacity fields.
    pub fn new(version: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            engine: "2.0.0".into(),
            root: root.into(),
            ttl: 48,
            snapshot_uploads: true,
            free_rooms: 128,
        }
    }
}
