//! Pieces, layers, and state slots — the things that sit on a table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// The drawing layer a piece or asset belongs to.
///
/// Serialises as a lowercase string (e.g. `"token"`). Layers render bottom
/// to top in the order `tile`, `overlay`, `token`, `other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Large background piece: boards, maps, mats.
    Tile,
    /// Movable game piece: miniatures, meeples, standees.
    Token,
    /// Marker drawn above tiles but below tokens: zones, auras, templates.
    Overlay,
    /// Anything that fits nowhere else: dice, notes, sundries.
    Other,
}

/// Formats the layer as its lowercase wire-format string.
impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Tile => write!(f, "tile"),
            Layer::Token => write!(f, "token"),
            Layer::Overlay => write!(f, "overlay"),
            Layer::Other => write!(f, "other"),
        }
    }
}

/// Parses a [`Layer`] from its lowercase wire-format string.
impl FromStr for Layer {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tile" => Ok(Layer::Tile),
            "token" => Ok(Layer::Token),
            "overlay" => Ok(Layer::Overlay),
            "other" => Ok(Layer::Other),
            _ => Err(format!(
                "unknown layer {:?}; expected one of: tile, token, overlay, other",
                s
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// StateId
// ---------------------------------------------------------------------------

/// The id passed to [`StateId::new`] was outside `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("state id {0} out of range (valid ids are 0-9)")]
pub struct StateIdError(pub u8);

/// A numbered table state: an integer 0–9.
///
/// State 1 is the live table — the one players see and change. The other
/// nine ids are save slots that `PUT`/`GET` of a full state address.
/// Construction is checked; a `StateId` in hand is always a valid path
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u8);

impl StateId {
    /// The live table state (id 1).
    pub const LIVE: StateId = StateId(1);

    /// Checked constructor; ids above 9 are rejected.
    pub fn new(id: u8) -> Result<Self, StateIdError> {
        if id <= 9 {
            Ok(StateId(id))
        } else {
            Err(StateIdError(id))
        }
    }

    /// The numeric id, guaranteed `0..=9`.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for StateId {
    type Error = StateIdError;
    fn try_from(id: u8) -> Result<Self, Self::Error> {
        StateId::new(id)
    }
}

/// Parses a decimal state id, rejecting anything outside `0..=9`.
impl FromStr for StateId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u8 = s
            .parse()
            .map_err(|_| format!("invalid state id {:?}; expected a digit 0-9", s))?;
        StateId::new(id).map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A single placeable object within a table state.
///
/// Coordinates are pixels on the table surface; `z` orders pieces within
/// their layer. Width, height, rotation, and the cosmetic fields are
/// omitted from the wire when unset — the server substitutes the asset's
/// defaults.
///
/// # Example
///
/// ```json
/// {
///   "id": "b1f0a2",
///   "layer": "token",
///   "asset": "kn-01",
///   "x": 256, "y": 192, "z": 3,
///   "r": 90,
///   "label": "knight"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    /// Server-assigned id. Empty (and absent from the wire) on pieces the
    /// client is about to create with `POST …/pieces/`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Drawing layer this piece lives on.
    pub layer: Layer,

    /// Id of the library [`Asset`](crate::Asset) this piece displays.
    pub asset: String,

    /// Horizontal position in px.
    pub x: i64,
    /// Vertical position in px.
    pub y: i64,
    /// Stacking order within the layer; higher is closer to the viewer.
    pub z: i64,

    /// Width override in grid squares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,

    /// Height override in grid squares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,

    /// Clockwise rotation in degrees (0, 90, 180 or 270).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u16>,

    /// Which side of a multi-sided asset is face up (0-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<u16>,

    /// Index into the template's color table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,

    /// Number badge (1–9) shown on the piece, e.g. to tell twins apart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,

    /// Free-text label shown under the piece.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Piece {
    /// A minimal piece: position plus asset, everything else at defaults.
    pub fn new(layer: Layer, asset: impl Into<String>, x: i64, y: i64, z: i64) -> Self {
        Self {
            id: String::new(),
            layer,
            asset: asset.into(),
            x,
            y,
            z,
            w: None,
            h: None,
            r: None,
            side: None,
            color: None,
            n: None,
            label: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PiecePatch
// ---------------------------------------------------------------------------

/// A partial piece update. Absent fields stay untouched on the server.
///
/// Single-piece patches (`PATCH …/pieces/{pid}/`) take the target id from
/// the URL; bulk patches (`PATCH …/pieces/`) carry it in [`PiecePatch::id`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PiecePatch {
    /// Target piece id. Required in bulk patches, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PiecePatch {
    /// A patch that only moves a piece.
    pub fn move_to(x: i64, y: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Apply this patch to a piece, field by field. The patch's `id` is
    /// addressing, not data, and is never written into the piece.
    pub fn apply(&self, piece: &mut Piece) {
        if let Some(layer) = self.layer {
            piece.layer = layer;
        }
        if let Some(asset) = &self.asset {
            piece.asset = asset.clone();
        }
        if let Some(x) = self.x {
            piece.x = x;
        }
        if let Some(y) = self.y {
            piece.y = y;
        }
        if let Some(z) = self.z {
            piece.z = z;
        }
        if let Some(w) = self.w {
            piece.w = Some(w);
        }
        if let Some(h) = self.h {
            piece.h = Some(h);
        }
        if let Some(r) = self.r {
            piece.r = Some(r);
        }
        if let Some(side) = self.side {
            piece.side = Some(side);
        }
        if let Some(color) = self.color {
            piece.color = Some(color);
        }
        if let Some(n) = self.n {
            piece.n = Some(n);
        }
        if let Some(label) = &self.label {
            piece.label = Some(label.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
