//! Request and response types for the Baize tabletop server API.
//!
//! This crate encodes the HTTP contract between a Baize server and its
//! clients as Rust types. It contains no I/O — `baize-client` performs the
//! actual requests, and the conformance mock server reuses the same types
//! on the answering side.
//!
//! # Endpoints covered
//!
//! | Method | Path | Success | Type |
//! |--------|------|---------|------|
//! | GET | `api/` | 200 | [`ServerInfo`] |
//! | GET | `api/templates/` | 200 | `Vec<String>` |
//! | POST | `api/rooms/` | 201 | multipart [`RoomCreate`] (+ snapshot) → [`Room`] |
//! | GET | `api/rooms/{name}/` | 200 | [`Room`] |
//! | DELETE | `api/rooms/{name}/` | 204 | — |
//! | GET | `api/rooms/{name}/digest/` | 200 | [`RoomDigest`] |
//! | PATCH | `api/rooms/{name}/template/` | 200 | [`TemplatePatch`] → [`Template`] |
//! | GET | `api/rooms/{name}/states/{id}/` | 200 | `Vec<`[`Piece`]`>` |
//! | PUT | `api/rooms/{name}/states/{id}/` | 200 | `Vec<`[`Piece`]`>` |
//! | HEAD | `api/rooms/{name}/states/{id}/` | 200 | headers only |
//! | POST | `api/rooms/{name}/states/{id}/pieces/` | 201 | [`Piece`] |
//! | PUT | `api/rooms/{name}/states/{id}/pieces/{pid}/` | 200 | [`Piece`] |
//! | PATCH | `api/rooms/{name}/states/{id}/pieces/{pid}/` | 200 | [`PiecePatch`] → [`Piece`] |
//! | PATCH | `api/rooms/{name}/states/{id}/pieces/` | 200 | `Vec<`[`PiecePatch`]`>` → `Vec<`[`Piece`]`>` |
//! | DELETE | `api/rooms/{name}/states/{id}/pieces/{pid}/` | 204 | — |
//! | POST | `api/rooms/{name}/assets/` | 201 | [`AssetUpload`] → [`Asset`] |
//!
//! State ids are integers 0–9; state 1 is the live table, the others are
//! save slots ([`StateId`]).

pub mod asset;
pub mod error;
pub mod piece;
pub mod room;
pub mod server;
pub mod template;

pub use asset::{Asset, AssetUpload};
pub use error::ErrorEnvelope;
pub use piece::{Layer, Piece, PiecePatch, StateId, StateIdError};
pub use room::{Library, Room, RoomCreate, RoomDigest};
pub use server::ServerInfo;
pub use template::{Template, TemplatePatch};
