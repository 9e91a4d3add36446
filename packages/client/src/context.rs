//! Cached server info, the startup version gate, and the route decision.
//!
//! The app fetches the discovery document exactly once at startup via
//! [`bootstrap`]. When the server build matches this client build, the
//! document lands in a [`ServerContext`] that the rest of the app reads
//! synchronously, and the current location is turned into a [`Route`].

use baize_api::ServerInfo;
use tracing::info;

use crate::api::Api;
use crate::error::ApiError;

/// The server's discovery document plus the web-app root derived from it.
///
/// Writable only through [`ServerContext::refresh`], which swaps the whole
/// document at once so readers never see a half-updated mix of fields.
#[derive(Debug, Clone)]
pub struct ServerContext {
    info: ServerInfo,
    app_root: String,
}

impl ServerContext {
    pub fn new(info: ServerInfo) -> Self {
        let app_root = app_root_of(&info.root);
        Self { info, app_root }
    }

    /// The cached discovery document.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Where the web app lives: the server-reported API root with its
    /// trailing `api` segment removed, no trailing slash. Mounting the API
    /// at `/baize/api` puts the app at `/baize`; mounting it at `/api`
    /// puts the app at the origin root (empty string).
    pub fn app_root(&self) -> &str {
        &self.app_root
    }

    /// Re-fetch the discovery document and replace the cache wholesale.
    pub async fn refresh(&mut self, api: &Api) -> Result<(), ApiError> {
        *self = ServerContext::new(api.server_info().await?);
        Ok(())
    }
}

fn app_root_of(root: &str) -> String {
    let trimmed = root.trim_end_matches('/');
    let stripped = match trimmed.strip_suffix("/api") {
        Some(head) => head,
        None if trimmed == "api" => "",
        None => trimmed,
    };
    stripped.trim_end_matches('/').to_string()
}

/// Where the app should go for the path the browser landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Show the join screen, pre-filled with `table` when the path named one.
    Join { table: Option<String> },
    /// Replace the location with `to` and decide again from there.
    Redirect { to: String },
}

/// Map the current location to a [`Route`].
///
/// The app root itself, with or without a trailing slash, is the plain
/// join screen. Any other path with a trailing slash redirects to the same
/// path without it, so every table has one canonical URL. Everything else
/// reads its last segment as a table name.
pub fn route(context: &ServerContext, current_path: &str) -> Route {
    let root = context.app_root();
    if current_path == root || current_path.strip_suffix('/') == Some(root) {
        return Route::Join { table: None };
    }
    if let Some(stripped) = current_path.strip_suffix('/') {
        return Route::Redirect {
            to: stripped.to_string(),
        };
    }
    let table = current_path.rsplit('/').next().unwrap_or(current_path);
    Route::Join {
        table: Some(table.to_string()),
    }
}

/// Outcome of the startup sequence.
#[derive(Debug)]
pub enum Boot {
    /// The server runs a different build than this client. Show the
    /// update notice; nothing else may proceed.
    UpdateAvailable { server_version: String },
    /// Versions match. `context` caches the fetched document and `route`
    /// says where to go for the path the app started on.
    Ready { context: ServerContext, route: Route },
}

/// Fetch the discovery document and gate on the build version.
///
/// `build_version` is the version baked into the running client, normally
/// [`crate::BUILD_VERSION`]. Any difference from the server's version, in
/// either direction, stops the boot with [`Boot::UpdateAvailable`].
pub async fn bootstrap(
    api: &Api,
    current_path: &str,
    build_version: &str,
) -> Result<Boot, ApiError> {
    let info = api.server_info().await?;
    if info.version != build_version {
        info!(
            "boot: server runs {} but this build is {}",
            info.version,
            build_version
        );
        return Ok(Boot::UpdateAvailable {
            server_version: info.version,
        });
    }
    let context = ServerContext::new(info);
    let route = route(&context, current_path);
    Ok(Boot::Ready { context, route })
}
