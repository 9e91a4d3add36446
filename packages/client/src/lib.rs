//! Async client for the Baize tabletop server.
//!
//! Everything a front end needs to talk to a server: typed endpoint calls
//! over the REST surface, the shared status/body contract, the startup
//! version gate with its route decision, and the canned error dialogs.
//!
//! The usual life of a session:
//!
//! ```rust,ignore
//! use baize_client::{bootstrap, Api, Boot, Route, BUILD_VERSION};
//!
//! let api = Api::new("https://play.example.org/baize/api");
//! match bootstrap(&api, "/baize/friday-dungeon", BUILD_VERSION).await? {
//!     Boot::UpdateAvailable { server_version } => {
//!         // show the update notice, stop here
//!     }
//!     Boot::Ready { context, route } => match route {
//!         Route::Join { table } => { /* join screen, maybe pre-filled */ }
//!         Route::Redirect { to } => { /* replace the location, decide again */ }
//!     },
//! }
//! ```
//!
//! After a successful boot the [`ServerContext`] answers questions about
//! the server synchronously, and [`Api`] methods drive the table itself.

pub mod api;
pub mod context;
pub mod error;
pub mod notice;
mod request;

pub use api::{Api, Snapshot};
pub use context::{bootstrap, route, Boot, Route, ServerContext};
pub use error::ApiError;
pub use notice::{Dialog, DialogAction, ErrorCode};

/// The version baked into this build at compile time. [`bootstrap`]
/// compares it verbatim against the server's reported version.
pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");
