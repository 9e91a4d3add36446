//! The one request helper every endpoint call goes through.
//!
//! All calls share the same contract, applied in order:
//!
//! 1. a 204 reply with an empty body short-circuits to `{}`,
//! 2. a body that does not parse as JSON fails as [`ApiError::BadBody`],
//!    whatever the status was,
//! 3. parsed JSON with a status outside the accepted set fails as
//!    [`ApiError::UnexpectedStatus`], carrying that JSON,
//! 4. otherwise the parsed JSON comes back together with the reply headers.
//!
//! Each call is a single attempt. There is no retry, no client-side timeout
//! and no deduplication; callers that want any of that build it on top.

use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

/// What a successful call produced: the status that arrived, the reply
/// headers, and the body parsed into JSON.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send `request` and apply the shared status/body contract.
///
/// `accepted` lists the statuses the caller treats as success for this
/// endpoint, usually a single entry.
pub(crate) async fn send(
    request: RequestBuilder,
    accepted: &[StatusCode],
) -> Result<Reply, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let path = response.url().path().to_string();
    let headers = response.headers().clone();
    let text = response.text().await?;

    // Successful deletes answer 204 with no body. That is not a parse
    // failure and not subject to the accepted set.
    if status == StatusCode::NO_CONTENT && text.is_empty() {
        debug!("api: {} -> 204 (empty)", path);
        return Ok(Reply {
            status: status.as_u16(),
            headers,
            body: Value::Object(serde_json::Map::new()),
        });
    }

    let body: Value = match serde_json::from_str(&text) {
        Ok(body) => body,
        Err(source) => {
            warn!("api: unreadable body from {} ({})", path, status.as_u16());
            return Err(ApiError::BadBody {
                status: status.as_u16(),
                body: text,
                source,
            });
        }
    };

    if !accepted.contains(&status) {
        warn!("api: unexpected status {} for {}", status.as_u16(), path);
        return Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    debug!("api: {} -> {}", path, status.as_u16());
    Ok(Reply {
        status: status.as_u16(),
        headers,
        body,
    })
}

/// Turn the JSON of an accepted reply into its typed form.
///
/// A mismatch between the wire shape and `T` is reported as
/// [`ApiError::BadBody`]; the carried text is the JSON re-rendered, since
/// the original body already parsed.
pub(crate) fn decode<T: DeserializeOwned>(reply: Reply) -> Result<T, ApiError> {
    match serde_json::from_value(reply.body.clone()) {
        Ok(value) => Ok(value),
        Err(source) => Err(ApiError::BadBody {
            status: reply.status,
            body: reply.body.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_mock(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn accepted_status_resolves_with_parsed_body() {
        let app = Router::new().route("/rooms/abc/", get(|| async { Json(json!({"name": "abc"})) }));
        let base = spawn_mock(app).await;

        let reply = send(client().get(format!("{base}/rooms/abc/")), &[StatusCode::OK])
            .await
            .unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, json!({"name": "abc"}));
    }

    #[tokio::test]
    async fn status_outside_accepted_set_rejects_with_parsed_body() {
        let app = Router::new().route(
            "/rooms/abc/",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))) }),
        );
        let base = spawn_mock(app).await;

        let err = send(client().get(format!("{base}/rooms/abc/")), &[StatusCode::OK])
            .await
            .unwrap_err();
        match err {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, json!({"error": "not found"}));
            }
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_status_not_in_accepted_set_still_rejects() {
        let app = Router::new().route(
            "/rooms/",
            get(|| async { (StatusCode::CREATED, Json(json!({"name": "new"}))) }),
        );
        let base = spawn_mock(app).await;

        let err = send(client().get(format!("{base}/rooms/")), &[StatusCode::OK])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[tokio::test]
    async fn no_content_with_empty_body_resolves_to_empty_object() {
        let app = Router::new().route("/rooms/abc/", delete(|| async { StatusCode::NO_CONTENT }));
        let base = spawn_mock(app).await;

        let reply = send(
            client().delete(format!("{base}/rooms/abc/")),
            &[StatusCode::NO_CONTENT],
        )
        .await
        .unwrap();
        assert_eq!(reply.body, json!({}));
    }

    #[tokio::test]
    async fn no_content_resolves_even_when_not_in_accepted_set() {
        let app = Router::new().route("/rooms/abc/", delete(|| async { StatusCode::NO_CONTENT }));
        let base = spawn_mock(app).await;

        let reply = send(
            client().delete(format!("{base}/rooms/abc/")),
            &[StatusCode::OK],
        )
        .await
        .unwrap();
        assert_eq!(reply.status, 204);
        assert_eq!(reply.body, json!({}));
    }

    #[tokio::test]
    async fn non_json_body_fails_as_bad_body_even_on_accepted_status() {
        let app = Router::new().route("/", get(|| async { "<html>whoops</html>" }));
        let base = spawn_mock(app).await;

        let err = send(client().get(format!("{base}/")), &[StatusCode::OK])
            .await
            .unwrap_err();
        match err {
            ApiError::BadBody { status, body, .. } => {
                assert_eq!(status, 200);
                assert_eq!(body, "<html>whoops</html>");
            }
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_without_no_content_fails_as_bad_body() {
        let app = Router::new().route("/", get(|| async { (StatusCode::OK, "") }));
        let base = spawn_mock(app).await;

        let err = send(client().get(format!("{base}/")), &[StatusCode::OK])
            .await
            .unwrap_err();
        match err {
            ApiError::BadBody { status, body, .. } => {
                assert_eq!(status, 200);
                assert_eq!(body, "");
            }
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_headers_are_available() {
        let app = Router::new().route(
            "/rooms/abc/states/1/",
            get(|| async {
                ([("x-state-digest", "abc123")], Json(json!([]))).into_response()
            }),
        );
        let base = spawn_mock(app).await;

        let reply = send(
            client().get(format!("{base}/rooms/abc/states/1/")),
            &[StatusCode::OK],
        )
        .await
        .unwrap();
        assert_eq!(reply.headers.get("x-state-digest").unwrap(), "abc123");
    }

    #[tokio::test]
    async fn connection_refused_fails_as_transport() {
        // Bind and drop to find a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = send(client().get(format!("http://{addr}/")), &[StatusCode::OK])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn decode_mismatch_fails_as_bad_body() {
        let reply = Reply {
            status: 200,
            headers: HeaderMap::new(),
            body: json!({"version": 42}),
        };
        let err = decode::<baize_api::ServerInfo>(reply).unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn debug_output_names_the_status() {
        let reply = Reply {
            status: 204,
            headers: HeaderMap::new(),
            body: json!({}),
        };
        let result: Result<Reply, ApiError> = Ok(reply);
        assert!(format!("{result:?}").contains("204"));
    }
}
