//! Library assets and asset uploads — `POST api/rooms/{name}/assets/`.

use serde::{Deserialize, Serialize};

use crate::piece::Layer;

/// An image resource in a room's library.
///
/// Pieces reference assets by [`Asset::id`]; the media list holds one image
/// per side, so a two-entry list describes a flippable card or tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Stable id pieces reference.
    pub id: String,

    /// Human-readable name, unique within the room's library.
    pub name: String,

    /// Default width in grid squares.
    pub w: u32,

    /// Default height in grid squares.
    pub h: u32,

    /// Background color (hex string) shown while media loads, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Image filenames, one per side, in side order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
}

/// The request body for `POST api/rooms/{name}/assets/`.
///
/// The image travels base64-encoded inside the JSON body — asset upload is
/// a plain JSON call, unlike room creation, which is the one multipart
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpload {
    /// Name the asset will be listed under.
    pub name: String,

    /// Library layer the asset belongs to.
    pub layer: Layer,

    /// Width in grid squares.
    pub w: u32,

    /// Height in grid squares.
    pub h: u32,

    /// Image format: `"png"` or `"jpg"`.
    pub format: String,

    /// Base64-encoded image bytes.
    pub base64: String,
}
