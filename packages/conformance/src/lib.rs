//! Shared helpers for the Baize conformance test suite.
//!
//! Provides [`spawn_server`] — a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process mock tabletop server backed by a
//! [`MockServer`], and returns both the API base URL and a handle to the
//! underlying state so tests can seed rooms and inspect effects without
//! going through the HTTP layer.
//!
//! The mock speaks the full REST surface the client implements: discovery,
//! templates, multipart room creation, template patching, states with a
//! digest header, piece CRUD, and asset upload, with `{"error": ...}`
//! envelopes and the documented statuses (404 missing room, 409 duplicate,
//! 503 out of slots, 413 oversized upload) on the failure paths.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use tokio::sync::RwLock;

use baize_api::{
    Asset, AssetUpload, ErrorEnvelope, Library, Piece, PiecePatch, Room, RoomDigest, ServerInfo,
    Template, TemplatePatch,
};

/// Engine version the mock reports and stamps into rooms.
const ENGINE: &str = "2.0.0";

/// Uploads whose base64 payload exceeds this many bytes answer 413.
const MAX_UPLOAD_B64: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// One room held by the mock: the wire-visible record plus bookkeeping the
/// tests inspect directly.
struct MockRoom {
    room: Room,
    auth: Option<String>,
    /// filename and byte size of the snapshot the room was created from.
    snapshot: Option<(String, usize)>,
    states: HashMap<u8, Vec<Piece>>,
}

struct Inner {
    version: String,
    free_rooms: u32,
    templates: Vec<String>,
    rooms: HashMap<String, MockRoom>,
    next_room: u64,
    next_piece: u64,
}

/// The in-memory tabletop server behind the mock's HTTP surface.
///
/// Everything lives under one `RwLock`; the handle returned by
/// [`spawn_server`] shares it with the router, so seeding and asserting
/// happen against exactly the state the HTTP layer serves.
pub struct MockServer {
    inner: RwLock<Inner>,
}

impl MockServer {
    fn new() -> Self {
        MockServer {
            inner: RwLock::new(Inner {
                version: baize_client::BUILD_VERSION.to_string(),
                free_rooms: 8,
                templates: vec!["classic".into(), "dungeon".into(), "hex".into()],
                rooms: HashMap::new(),
                next_room: 1,
                next_piece: 1,
            }),
        }
    }

    /// Report a different server version, for exercising the update gate.
    pub async fn set_version(&self, version: &str) {
        self.inner.write().await.version = version.to_string();
    }

    /// Set how many more rooms the server will accept.
    pub async fn set_free_rooms(&self, free_rooms: u32) {
        self.inner.write().await.free_rooms = free_rooms;
    }

    /// Create a room directly in state, bypassing HTTP.
    pub async fn seed_room(&self, name: &str) -> Room {
        let mut inner = self.inner.write().await;
        let room = new_room(&mut inner, name);
        inner.rooms.insert(
            name.to_string(),
            MockRoom {
                room: room.clone(),
                auth: None,
                snapshot: None,
                states: HashMap::new(),
            },
        );
        room
    }

    /// The snapshot recorded at creation of `room`, if one was uploaded.
    pub async fn snapshot_of(&self, room: &str) -> Option<(String, usize)> {
        self.inner
            .read()
            .await
            .rooms
            .get(room)
            .and_then(|r| r.snapshot.clone())
    }

    /// The room password recorded at creation, if any.
    pub async fn auth_of(&self, room: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .rooms
            .get(room)
            .and_then(|r| r.auth.clone())
    }

    /// Direct read of a state's pieces, bypassing HTTP.
    pub async fn pieces_of(&self, room: &str, state: u8) -> Vec<Piece> {
        self.inner
            .read()
            .await
            .rooms
            .get(room)
            .and_then(|r| r.states.get(&state).cloned())
            .unwrap_or_default()
    }
}

fn new_room(inner: &mut Inner, name: &str) -> Room {
    let id = format!("{:06x}", inner.next_room);
    inner.next_room += 1;
    Room {
        id,
        name: name.to_string(),
        engine: ENGINE.to_string(),
        template: Template::default(),
        library: starter_library(),
        credits: String::new(),
    }
}

fn starter_library() -> Library {
    let mut library = Library::default();
    library.tile.push(Asset {
        id: "map-a".into(),
        name: "map-a".into(),
        w: 48,
        h: 32,
        color: None,
        media: vec!["map-a.jpg".into()],
    });
    library.token.push(Asset {
        id: "kn-01".into(),
        name: "knight".into(),
        w: 1,
        h: 1,
        color: None,
        media: vec!["knight.png".into()],
    });
    library
}

/// Digest string for a state's content. Only equality matters to clients,
/// so a std hash over the serialised pieces is enough for the mock.
fn digest_of(pieces: &[Piece]) -> String {
    digest_of_str(&serde_json::to_string(pieces).unwrap_or_default())
}

fn digest_of_str(text: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("h64:{:016x}", hasher.finish())
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Start an ephemeral in-process tabletop server and return
/// `(api_base_url, server)`.
///
/// The server runs in a background `tokio` task bound to an OS-assigned
/// port on `127.0.0.1`. The returned `String` is the full API base URL
/// including the mount path, e.g. `http://127.0.0.1:51234/api`, ready to
/// hand to `Api::new`. The returned `Arc<MockServer>` is the same state
/// the router serves, so tests can seed rooms without HTTP round trips.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_server() -> (String, Arc<MockServer>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let server = Arc::new(MockServer::new());
    let router = build_router(Arc::clone(&server));

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("mock server error");
    });

    (format!("http://{addr}/api"), server)
}

/// The mock's router, mounted under `/api` with the trailing-slash paths
/// the real server uses.
pub fn build_router(server: Arc<MockServer>) -> Router {
    Router::new()
        .route("/api/", get(server_info))
        .route("/api/templates/", get(templates))
        .route("/api/rooms/", post(create_room))
        .route("/api/rooms/{room}/", get(get_room).delete(delete_room))
        .route("/api/rooms/{room}/digest/", get(room_digest))
        .route("/api/rooms/{room}/template/", patch(patch_template))
        .route(
            "/api/rooms/{room}/states/{state}/",
            get(get_state).put(put_state),
        )
        .route(
            "/api/rooms/{room}/states/{state}/pieces/",
            post(post_piece).patch(patch_pieces),
        )
        .route(
            "/api/rooms/{room}/states/{state}/pieces/{piece}/",
            put(put_piece).patch(patch_piece).delete(delete_piece),
        )
        .route("/api/rooms/{room}/assets/", post(post_asset))
        .with_state(server)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type Failure = (StatusCode, Json<ErrorEnvelope>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(ErrorEnvelope::new(message)))
}

fn room_not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, "room not found")
}

async fn server_info(State(server): State<Arc<MockServer>>) -> Json<ServerInfo> {
    let inner = server.inner.read().await;
    Json(ServerInfo {
        version: inner.version.clone(),
        engine: ENGINE.to_string(),
        root: "/api".to_string(),
        ttl: 48,
        snapshot_uploads: true,
        free_rooms: inner.free_rooms,
    })
}

async fn templates(State(server): State<Arc<MockServer>>) -> Json<Vec<String>> {
    Json(server.inner.read().await.templates.clone())
}

async fn create_room(
    State(server): State<Arc<MockServer>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Room>), Failure> {
    let mut name = None;
    let mut template = None;
    let mut auth = None;
    let mut snapshot = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = field.text().await.ok(),
            "template" => template = field.text().await.ok(),
            "auth" => auth = field.text().await.ok(),
            "snapshot" => {
                let filename = field.file_name().unwrap_or("snapshot.zip").to_string();
                let bytes = field.bytes().await.unwrap_or_default();
                snapshot = Some((filename, bytes.len()));
            }
            _ => {}
        }
    }

    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(failure(StatusCode::BAD_REQUEST, "name is required")),
    };

    let mut inner = server.inner.write().await;
    if let Some(template) = &template {
        if !inner.templates.contains(template) {
            return Err(failure(StatusCode::BAD_REQUEST, "unknown template"));
        }
    }
    if inner.rooms.contains_key(&name) {
        return Err(failure(StatusCode::CONFLICT, "room already exists"));
    }
    if inner.free_rooms == 0 {
        return Err(failure(StatusCode::SERVICE_UNAVAILABLE, "no free room slot"));
    }

    inner.free_rooms -= 1;
    let room = new_room(&mut inner, &name);
    inner.rooms.insert(
        name,
        MockRoom {
            room: room.clone(),
            auth,
            snapshot,
            states: HashMap::new(),
        },
    );
    Ok((StatusCode::CREATED, Json(room)))
}

async fn get_room(
    State(server): State<Arc<MockServer>>,
    Path(room): Path<String>,
) -> Result<Json<Room>, Failure> {
    let inner = server.inner.read().await;
    let entry = inner.rooms.get(&room).ok_or_else(room_not_found)?;
    Ok(Json(entry.room.clone()))
}

async fn delete_room(
    State(server): State<Arc<MockServer>>,
    Path(room): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut inner = server.inner.write().await;
    if inner.rooms.remove(&room).is_none() {
        return Err(room_not_found());
    }
    inner.free_rooms += 1;
    Ok(StatusCode::NO_CONTENT)
}

async fn room_digest(
    State(server): State<Arc<MockServer>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDigest>, Failure> {
    let inner = server.inner.read().await;
    let entry = inner.rooms.get(&room).ok_or_else(room_not_found)?;

    let mut digest = RoomDigest::default();
    let room_json = serde_json::to_string(&entry.room).unwrap_or_default();
    digest
        .entries
        .insert("room.json".to_string(), digest_of_str(&room_json));
    for (state, pieces) in &entry.states {
        digest
            .entries
            .insert(format!("states/{state}.json"), digest_of(pieces));
    }
    Ok(Json(digest))
}

async fn patch_template(
    State(server): State<Arc<MockServer>>,
    Path(room): Path<String>,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<Template>, Failure> {
    let mut inner = server.inner.write().await;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    patch.apply(&mut entry.room.template);
    Ok(Json(entry.room.template.clone()))
}

async fn get_state(
    State(server): State<Arc<MockServer>>,
    Path((room, state)): Path<(String, u8)>,
) -> Result<([(&'static str, String); 1], Json<Vec<Piece>>), Failure> {
    let inner = server.inner.read().await;
    let entry = inner.rooms.get(&room).ok_or_else(room_not_found)?;
    let pieces = entry.states.get(&state).cloned().unwrap_or_default();
    let digest = digest_of(&pieces);
    Ok(([("x-state-digest", digest)], Json(pieces)))
}

async fn put_state(
    State(server): State<Arc<MockServer>>,
    Path((room, state)): Path<(String, u8)>,
    Json(mut pieces): Json<Vec<Piece>>,
) -> Result<Json<Vec<Piece>>, Failure> {
    let mut inner = server.inner.write().await;
    for piece in &mut pieces {
        if piece.id.is_empty() {
            piece.id = format!("p{}", inner.next_piece);
            inner.next_piece += 1;
        }
    }
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    entry.states.insert(state, pieces.clone());
    Ok(Json(pieces))
}

async fn post_piece(
    State(server): State<Arc<MockServer>>,
    Path((room, state)): Path<(String, u8)>,
    Json(mut piece): Json<Piece>,
) -> Result<(StatusCode, Json<Piece>), Failure> {
    let mut inner = server.inner.write().await;
    piece.id = format!("p{}", inner.next_piece);
    inner.next_piece += 1;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    entry.states.entry(state).or_default().push(piece.clone());
    Ok((StatusCode::CREATED, Json(piece)))
}

async fn put_piece(
    State(server): State<Arc<MockServer>>,
    Path((room, state, piece_id)): Path<(String, u8, String)>,
    Json(mut piece): Json<Piece>,
) -> Result<Json<Piece>, Failure> {
    let mut inner = server.inner.write().await;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    let pieces = entry.states.entry(state).or_default();
    let slot = pieces
        .iter_mut()
        .find(|p| p.id == piece_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "piece not found"))?;
    piece.id = piece_id;
    *slot = piece.clone();
    Ok(Json(piece))
}

async fn patch_piece(
    State(server): State<Arc<MockServer>>,
    Path((room, state, piece_id)): Path<(String, u8, String)>,
    Json(patch): Json<PiecePatch>,
) -> Result<Json<Piece>, Failure> {
    let mut inner = server.inner.write().await;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    let pieces = entry.states.entry(state).or_default();
    let piece = pieces
        .iter_mut()
        .find(|p| p.id == piece_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "piece not found"))?;
    patch.apply(piece);
    Ok(Json(piece.clone()))
}

async fn patch_pieces(
    State(server): State<Arc<MockServer>>,
    Path((room, state)): Path<(String, u8)>,
    Json(patches): Json<Vec<PiecePatch>>,
) -> Result<Json<Vec<Piece>>, Failure> {
    let mut inner = server.inner.write().await;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    let pieces = entry.states.entry(state).or_default();

    let mut updated = Vec::with_capacity(patches.len());
    for patch in &patches {
        let id = patch
            .id
            .as_deref()
            .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "bulk patch without piece id"))?;
        let piece = pieces
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| failure(StatusCode::NOT_FOUND, "piece not found"))?;
        patch.apply(piece);
        updated.push(piece.clone());
    }
    Ok(Json(updated))
}

async fn delete_piece(
    State(server): State<Arc<MockServer>>,
    Path((room, state, piece_id)): Path<(String, u8, String)>,
) -> Result<StatusCode, Failure> {
    let mut inner = server.inner.write().await;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;
    let pieces = entry.states.entry(state).or_default();
    let before = pieces.len();
    pieces.retain(|p| p.id != piece_id);
    if pieces.len() == before {
        return Err(failure(StatusCode::NOT_FOUND, "piece not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn post_asset(
    State(server): State<Arc<MockServer>>,
    Path(room): Path<String>,
    Json(upload): Json<AssetUpload>,
) -> Result<(StatusCode, Json<Asset>), Failure> {
    if upload.base64.len() > MAX_UPLOAD_B64 {
        return Err(failure(
            StatusCode::PAYLOAD_TOO_LARGE,
            "upload exceeds the size limit",
        ));
    }

    let mut inner = server.inner.write().await;
    let id = format!("a{}", inner.next_piece);
    inner.next_piece += 1;
    let entry = inner.rooms.get_mut(&room).ok_or_else(room_not_found)?;

    let asset = Asset {
        id,
        name: upload.name.clone(),
        w: upload.w,
        h: upload.h,
        color: None,
        media: vec![format!("{}.{}", upload.name, upload.format)],
    };
    entry.room.library.layer_mut(upload.layer).push(asset.clone());
    Ok((StatusCode::CREATED, Json(asset)))
}
