use serde::{Deserialize, Serialize};

use crate::color::DEFAULT_PALETTE;
use crate::geometry::Point3;

/// Per-render knobs for the panel accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Colors handed to elements without an explicit color, in order.
    pub palette: Vec<String>,
    /// Color for polygons registered before any element was visited.
    pub fallback_color: String,
    /// Local point mapped to a panel's start endpoint.
    pub start_anchor: Point3,
    /// Local point mapped to a panel's end endpoint.
    pub end_anchor: Point3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            fallback_color: "#888888".to_string(),
            start_anchor: Point3::new(0.0, 0.5, 0.0),
            end_anchor: Point3::new(1.0, 0.5, 0.0),
        }
    }
}

impl RenderSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
