//! Typed endpoint functions for the whole REST surface.
//!
//! Every method builds its URL under the server's API base, sends one
//! request through [`crate::request`], and decodes the reply into the
//! matching `baize-api` type. Paths keep their trailing slashes; room and
//! piece names are percent-encoded into the path.

use baize_api::{
    Asset, AssetUpload, Piece, PiecePatch, Room, RoomCreate, RoomDigest, ServerInfo, StateId,
    Template, TemplatePatch,
};
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use urlencoding::encode;

use crate::error::ApiError;
use crate::request::{decode, send};

/// A snapshot archive attached to room creation, produced by an earlier
/// export of another room.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Client for one Baize server.
///
/// `base` is the absolute URL of the API root, e.g.
/// `https://play.example.org/baize/api`. The struct is cheap to clone and
/// can be shared across tasks.
#[derive(Debug, Clone)]
pub struct Api {
    http: Client,
    base: String,
}

impl Api {
    /// Client over a fresh connection pool. Any trailing slash on `base`
    /// is dropped so URL building stays uniform.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base)
    }

    /// Client over a pre-configured [`reqwest::Client`], for callers that
    /// need proxies, extra root certificates or custom timeouts.
    pub fn with_client(http: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { http, base }
    }

    /// The API base URL, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn root_url(&self) -> String {
        format!("{}/", self.base)
    }

    fn rooms_url(&self) -> String {
        format!("{}/rooms/", self.base)
    }

    fn room_url(&self, room: &str) -> String {
        format!("{}/rooms/{}/", self.base, encode(room))
    }

    fn state_url(&self, room: &str, id: StateId) -> String {
        format!("{}states/{}/", self.room_url(room), id)
    }

    fn pieces_url(&self, room: &str, id: StateId) -> String {
        format!("{}pieces/", self.state_url(room, id))
    }

    fn piece_url(&self, room: &str, id: StateId, piece: &str) -> String {
        format!("{}{}/", self.pieces_url(room, id), encode(piece))
    }

    // ── server ──────────────────────────────────────────────────────────

    /// `GET api/`: the server's discovery document.
    pub async fn server_info(&self) -> Result<ServerInfo, ApiError> {
        let reply = send(self.http.get(self.root_url()), &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `GET api/templates/`: names of the templates new rooms can start from.
    pub async fn templates(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/templates/", self.base);
        let reply = send(self.http.get(url), &[StatusCode::OK]).await?;
        decode(reply)
    }

    // ── rooms ───────────────────────────────────────────────────────────

    /// `GET api/rooms/{room}/`: the full room record, library included.
    pub async fn room(&self, room: &str) -> Result<Room, ApiError> {
        let reply = send(self.http.get(self.room_url(room)), &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `GET api/rooms/{room}/digest/`: cheap change detection over the
    /// room's states.
    pub async fn room_digest(&self, room: &str) -> Result<RoomDigest, ApiError> {
        let url = format!("{}digest/", self.room_url(room));
        let reply = send(self.http.get(url), &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `POST api/rooms/`: create a room from a multipart form. The optional
    /// `snapshot` rides along as a file field and seeds the room's content.
    pub async fn create_room(
        &self,
        create: &RoomCreate,
        snapshot: Option<Snapshot>,
    ) -> Result<Room, ApiError> {
        let mut form = Form::new().text("name", create.name.clone());
        if let Some(template) = &create.template {
            form = form.text("template", template.clone());
        }
        if let Some(auth) = &create.auth {
            form = form.text("auth", auth.clone());
        }
        if let Some(snapshot) = snapshot {
            let file = Part::bytes(snapshot.bytes)
                .file_name(snapshot.filename)
                .mime_str("application/zip")?;
            form = form.part("snapshot", file);
        }

        let request = self.http.post(self.rooms_url()).multipart(form);
        let reply = send(request, &[StatusCode::CREATED]).await?;
        decode(reply)
    }

    /// `DELETE api/rooms/{room}/`: drop the room and everything in it.
    pub async fn delete_room(&self, room: &str) -> Result<(), ApiError> {
        send(
            self.http.delete(self.room_url(room)),
            &[StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    /// `PATCH api/rooms/{room}/template/`: update parts of the room's
    /// template and get the merged result back.
    pub async fn patch_template(
        &self,
        room: &str,
        patch: &TemplatePatch,
    ) -> Result<Template, ApiError> {
        let url = format!("{}template/", self.room_url(room));
        let reply = send(self.http.patch(url).json(patch), &[StatusCode::OK]).await?;
        decode(reply)
    }

    // ── states ──────────────────────────────────────────────────────────

    /// `GET api/rooms/{room}/states/{id}/`: every piece in that state.
    pub async fn state(&self, room: &str, id: StateId) -> Result<Vec<Piece>, ApiError> {
        let reply = send(self.http.get(self.state_url(room, id)), &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// Like [`Api::state`], but also hands back the reply headers, which
    /// carry the state digest for change tracking.
    pub async fn state_with_headers(
        &self,
        room: &str,
        id: StateId,
    ) -> Result<(HeaderMap, Vec<Piece>), ApiError> {
        let reply = send(self.http.get(self.state_url(room, id)), &[StatusCode::OK]).await?;
        let headers = reply.headers.clone();
        let pieces = decode(reply)?;
        Ok((headers, pieces))
    }

    /// `PUT api/rooms/{room}/states/{id}/`: replace the whole state.
    pub async fn put_state(
        &self,
        room: &str,
        id: StateId,
        pieces: &[Piece],
    ) -> Result<Vec<Piece>, ApiError> {
        let request = self.http.put(self.state_url(room, id)).json(&pieces);
        let reply = send(request, &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `HEAD api/rooms/{room}/states/{id}/`: headers only, no body. Any
    /// status other than 200 rejects; the error body is `null` since HEAD
    /// replies have nothing to parse.
    pub async fn head_state(&self, room: &str, id: StateId) -> Result<HeaderMap, ApiError> {
        let response = self.http.head(self.state_url(room, id)).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                body: Value::Null,
            });
        }
        Ok(response.headers().clone())
    }

    // ── pieces ──────────────────────────────────────────────────────────

    /// `POST api/rooms/{room}/states/{id}/pieces/`: add a piece. The reply
    /// carries the server-assigned id.
    pub async fn post_piece(
        &self,
        room: &str,
        id: StateId,
        piece: &Piece,
    ) -> Result<Piece, ApiError> {
        let request = self.http.post(self.pieces_url(room, id)).json(piece);
        let reply = send(request, &[StatusCode::CREATED]).await?;
        decode(reply)
    }

    /// `PUT api/rooms/{room}/states/{id}/pieces/{piece}/`: replace one
    /// piece wholesale.
    pub async fn put_piece(
        &self,
        room: &str,
        id: StateId,
        piece_id: &str,
        piece: &Piece,
    ) -> Result<Piece, ApiError> {
        let request = self
            .http
            .put(self.piece_url(room, id, piece_id))
            .json(piece);
        let reply = send(request, &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `PATCH api/rooms/{room}/states/{id}/pieces/{piece}/`: update the
    /// fields present in `patch`, leave the rest alone.
    pub async fn patch_piece(
        &self,
        room: &str,
        id: StateId,
        piece_id: &str,
        patch: &PiecePatch,
    ) -> Result<Piece, ApiError> {
        let request = self
            .http
            .patch(self.piece_url(room, id, piece_id))
            .json(patch);
        let reply = send(request, &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `PATCH api/rooms/{room}/states/{id}/pieces/`: patch many pieces in
    /// one round trip. Each patch names its target via its `id`.
    pub async fn patch_pieces(
        &self,
        room: &str,
        id: StateId,
        patches: &[PiecePatch],
    ) -> Result<Vec<Piece>, ApiError> {
        let request = self.http.patch(self.pieces_url(room, id)).json(&patches);
        let reply = send(request, &[StatusCode::OK]).await?;
        decode(reply)
    }

    /// `DELETE api/rooms/{room}/states/{id}/pieces/{piece}/`: remove a piece.
    pub async fn delete_piece(
        &self,
        room: &str,
        id: StateId,
        piece_id: &str,
    ) -> Result<(), ApiError> {
        send(
            self.http.delete(self.piece_url(room, id, piece_id)),
            &[StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    // ── assets ──────────────────────────────────────────────────────────

    /// `POST api/rooms/{room}/assets/`: upload a new asset into the room's
    /// library, content base64-encoded in the JSON body.
    pub async fn post_asset(&self, room: &str, upload: &AssetUpload) -> Result<Asset, ApiError> {
        let url = format!("{}assets/", self.room_url(room));
        let reply = send(self.http.post(url).json(upload), &[StatusCode::CREATED]).await?;
        decode(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn base_loses_its_trailing_slash() {
        let api = Api::new("http://host/baize/api/");
        assert_eq!(api.base(), "http://host/baize/api");
    }

    #[test]
    fn room_urls_percent_encode_the_name() {
        let api = Api::new("http://host/api");
        assert_eq!(
            api.room_url("friday dungeon"),
            "http://host/api/rooms/friday%20dungeon/"
        );
    }

    #[test]
    fn piece_urls_nest_under_the_state() {
        let api = Api::new("http://host/api");
        assert_eq!(
            api.piece_url("abc", StateId::LIVE, "p-7"),
            "http://host/api/rooms/abc/states/1/pieces/p-7/"
        );
    }

    #[test]
    fn collection_urls_keep_their_trailing_slash() {
        let api = Api::new("http://host/api");
        assert_eq!(api.root_url(), "http://host/api/");
        assert_eq!(api.rooms_url(), "http://host/api/rooms/");
        assert_eq!(
            api.pieces_url("abc", StateId::LIVE),
            "http://host/api/rooms/abc/states/1/pieces/"
        );
    }

    #[tokio::test]
    async fn server_info_decodes_the_discovery_document() {
        let app = Router::new().route(
            "/api/",
            get(|| async {
                Json(json!({
                    "version": "0.1.0",
                    "engine": "2.0.0",
                    "root": "/api",
                    "ttl": 48,
                    "snapshotUploads": true,
                    "freeRooms": 12
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = Api::new(format!("http://{addr}/api"));
        let info = api.server_info().await.unwrap();
        assert_eq!(info.version, "0.1.0");
        assert_eq!(info.free_rooms, 12);
    }
}
