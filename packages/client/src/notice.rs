//! Error codes and the canned dialogs shown for them.
//!
//! API failures funnel through [`ErrorCode::classify`] into a small set of
//! [`ErrorCode`]s; each code maps to one fixed [`Dialog`]. The texts live
//! here so every screen reports the same situation the same way.

use crate::error::ApiError;

/// The user-facing classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The server answered, but not in a way this client understands.
    Unexpected,
    /// The table is gone: expired, deleted, or never existed.
    TableGone,
    /// The server has no slot for another table right now.
    NoSlot,
    /// The content sent was larger than the server accepts.
    OverCapacity,
    /// The server runs a newer build than this client. Only the startup
    /// version gate produces this code.
    UpdateAvailable,
    /// Anything the other codes do not cover, transport trouble included.
    Generic,
}

/// What the dialog's single button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Reload the app in place.
    Reload,
    /// Leave the table and return to the join screen.
    BackToJoin,
}

/// One canned error dialog: a title, a body, and the action offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialog {
    pub title: &'static str,
    pub message: &'static str,
    pub action: DialogAction,
}

impl ErrorCode {
    /// Map an API failure to its user-facing code.
    ///
    /// Status-carrying failures branch on the status; everything without a
    /// meaningful reply, transport and body trouble alike, is
    /// [`ErrorCode::Generic`]. [`ErrorCode::UpdateAvailable`] never comes
    /// out of here; it is raised by the bootstrap version gate alone.
    pub fn classify(error: &ApiError) -> ErrorCode {
        match error {
            ApiError::UnexpectedStatus { status: 404, .. } => ErrorCode::TableGone,
            ApiError::UnexpectedStatus { status: 503, .. } => ErrorCode::NoSlot,
            ApiError::UnexpectedStatus { status: 413, .. } => ErrorCode::OverCapacity,
            ApiError::UnexpectedStatus { .. } => ErrorCode::Unexpected,
            ApiError::Transport(_) | ApiError::BadBody { .. } => ErrorCode::Generic,
        }
    }

    /// The canned dialog for this code.
    pub fn dialog(self) -> Dialog {
        match self {
            ErrorCode::Unexpected => Dialog {
                title: "Unexpected reply",
                message: "The server answered in a way this client does not \
                          understand. Reloading usually sorts this out.",
                action: DialogAction::Reload,
            },
            ErrorCode::TableGone => Dialog {
                title: "Table gone",
                message: "This table does not exist (any more). It may have \
                          expired or been deleted by another player.",
                action: DialogAction::BackToJoin,
            },
            ErrorCode::NoSlot => Dialog {
                title: "Server full",
                message: "The server cannot host another table right now. \
                          Please try again later.",
                action: DialogAction::BackToJoin,
            },
            ErrorCode::OverCapacity => Dialog {
                title: "Too large",
                message: "That content is larger than this server accepts.",
                action: DialogAction::BackToJoin,
            },
            ErrorCode::UpdateAvailable => Dialog {
                title: "Update available",
                message: "The server has been updated since this client was \
                          loaded. Reload to get the new version.",
                action: DialogAction::Reload,
            },
            ErrorCode::Generic => Dialog {
                title: "Something went wrong",
                message: "The server could not be reached. Check your \
                          connection and reload.",
                action: DialogAction::Reload,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_error(status: u16) -> ApiError {
        ApiError::UnexpectedStatus {
            status,
            body: json!({"error": "test"}),
        }
    }

    #[test]
    fn statuses_map_to_their_codes() {
        assert_eq!(ErrorCode::classify(&status_error(404)), ErrorCode::TableGone);
        assert_eq!(ErrorCode::classify(&status_error(503)), ErrorCode::NoSlot);
        assert_eq!(ErrorCode::classify(&status_error(413)), ErrorCode::OverCapacity);
        assert_eq!(ErrorCode::classify(&status_error(500)), ErrorCode::Unexpected);
        assert_eq!(ErrorCode::classify(&status_error(201)), ErrorCode::Unexpected);
    }

    #[test]
    fn unreadable_bodies_are_generic() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ApiError::BadBody {
            status: 200,
            body: "nope".to_string(),
            source,
        };
        assert_eq!(ErrorCode::classify(&err), ErrorCode::Generic);
    }

    #[tokio::test]
    async fn transport_failures_are_generic() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::get(format!("http://{addr}/")).await.unwrap_err();
        assert_eq!(ErrorCode::classify(&ApiError::Transport(err)), ErrorCode::Generic);
    }

    #[test]
    fn gone_tables_send_the_player_back_to_join() {
        let dialog = ErrorCode::TableGone.dialog();
        assert_eq!(dialog.action, DialogAction::BackToJoin);
        assert_eq!(dialog.title, "Table gone");
    }

    #[test]
    fn update_notice_offers_a_reload() {
        assert_eq!(
            ErrorCode::UpdateAvailable.dialog().action,
            DialogAction::Reload
        );
    }
}
