//! Table template types — `PATCH api/rooms/{name}/template/`.

use serde::{Deserialize, Serialize};

/// A room's table geometry and appearance settings.
///
/// Every room carries a template; rooms created without naming one get the
/// server default. Returned inside [`Room`](crate::Room) and as the
/// response of a template patch.
///
/// # Example
///
/// ```json
/// {
///   "gridSize": 64,
///   "gridWidth": 48,
///   "gridHeight": 32,
///   "snap": true,
///   "colors": ["#0d0d0d", "#0b5394", "#9e1313"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Edge length of one grid square in px.
    pub grid_size: u32,

    /// Table width in grid squares.
    pub grid_width: u32,

    /// Table height in grid squares.
    pub grid_height: u32,

    /// Whether pieces snap to the grid when moved.
    pub snap: bool,

    /// Color table pieces may reference by index (hex strings).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            grid_size: 64,
            grid_width: 48,
            grid_height: 32,
            snap: true,
            colors: Vec::new(),
        }
    }
}

/// A partial template update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl TemplatePatch {
    /// Apply this patch to a template, field by field.
    pub fn apply(&self, template: &mut Template) {
        if let Some(grid_size) = self.grid_size {
            template.grid_size = grid_size;
        }
        if let Some(grid_width) = self.grid_width {
            template.grid_width = grid_width;
        }
        if let Some(grid_height) = self.grid_height {
            template.grid_height = grid_height;
        }
        if let Some(snap) = self.snap {
            template.snap = snap;
        }
        if let Some(colors) = &self.colors {
            template.colors = colors.clone();
        }
    }
}
