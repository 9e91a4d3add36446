//! Room types — creation, retrieval, and the content digest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::piece::Layer;
use crate::template::Template;

/// A room (also called a table): one named tabletop session.
///
/// The response body of `GET api/rooms/{name}/` and of room creation.
///
/// # Example
///
/// ```json
/// {
///   "id": "2f9a01",
///   "name": "friday-dungeon",
///   "engine": "2.0.0",
///   "template": { "gridSize": 64, "gridWidth": 48, "gridHeight": 32, "snap": true },
///   "library": { "token": [ { "id": "kn-01", "name": "knight", "w": 1, "h": 1 } ] },
///   "credits": "map artwork CC-BY 4.0"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Server-assigned opaque id.
    pub id: String,

    /// The name that addresses the room in every URL.
    pub name: String,

    /// Engine version the room's template was built for.
    pub engine: String,

    /// Table geometry and appearance.
    pub template: Template,

    /// Image assets available to pieces in this room.
    #[serde(default)]
    pub library: Library,

    /// Attribution text for bundled artwork.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credits: String,
}

/// A room's asset library, grouped by layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Library {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tile: Vec<Asset>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token: Vec<Asset>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlay: Vec<Asset>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<Asset>,
}

impl Library {
    /// The asset list for `layer`.
    pub fn layer(&self, layer: Layer) -> &[Asset] {
        match layer {
            Layer::Tile => &self.tile,
            Layer::Token => &self.token,
            Layer::Overlay => &self.overlay,
            Layer::Other => &self.other,
        }
    }

    /// Mutable access to the asset list for `layer`.
    pub fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Asset> {
        match layer {
            Layer::Tile => &mut self.tile,
            Layer::Token => &mut self.token,
            Layer::Overlay => &mut self.overlay,
            Layer::Other => &mut self.other,
        }
    }
}

/// The text fields of the multipart room-creation call (`POST api/rooms/`).
///
/// An optional snapshot file may ride along as a fourth multipart part; the
/// file is not part of this struct because it is binary, not text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomCreate {
    /// Name of the room to create. Doubles as its URL path segment.
    pub name: String,

    /// Template to populate the room from. `None` means the server default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Room password. `None` creates an open room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl RoomCreate {
    /// A default-template, open room.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: None,
            auth: None,
        }
    }
}

/// The response body of `GET api/rooms/{name}/digest/`.
///
/// Maps each room resource to a digest of its current content, e.g.
/// `"states/1.json" → "crc32:2339029909"`. Clients compare digests to skip
/// re-fetching unchanged resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RoomDigest {
    pub entries: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room {
            id: "2f9a01".into(),
            name: "friday-dungeon".into(),
            engine: "2.0.0".into(),
            template: Template::default(),
            library: Library::default(),
            credits: String::new(),
        }
    }

    #[test]
    fn room_roundtrip() {
        let r = room();
        let json = serde_json::to_string(&r).unwrap();
        let back: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn empty_library_and_credits_are_omitted() {
        let json = serde_json::to_string(&room()).unwrap();
        assert!(!json.contains("credits"));
        assert!(!json.contains("tile"));
    }

    #[test]
    fn room_without_library_field_parses() {
        let json = r#"{
            "id": "x1",
            "name": "bare",
            "engine": "2.0.0",
            "template": { "gridSize": 64, "gridWidth": 48, "gridHeight": 32, "snap": true }
        }"#;
        let r: Room = serde_json::from_str(json).unwrap();
        assert!(r.library.token.is_empty());
        assert!(r.credits.is_empty());
    }

    #[test]
    fn library_layer_accessors() {
        let mut lib = Library::default();
        lib.layer_mut(crate::Layer::Token).push(Asset {
            id: "kn-01".into(),
            name: "knight".into(),
            w: 1,
            h: 1,
            color: None,
            media: Vec::new(),
        });
        assert_eq!(lib.layer(crate::Layer::Token).len(), 1);
        assert!(lib.layer(crate::Layer::Tile).is_empty());
    }

    #[test]
    fn room_create_minimal_wire_format() {
        let req = RoomCreate::new("friday-dungeon");
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"name":"friday-dungeon"}"#
        );
    }

    #[test]
    fn digest_is_a_bare_map() {
        let mut digest = RoomDigest::default();
        digest
            .entries
            .insert("states/1.json".into(), "crc32:2339029909".into());
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, r#"{"states/1.json":"crc32:2339029909"}"#);
        let back: RoomDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}
