use serde::{Deserialize, Serialize};

use gxml_core::{Line, Panel};

/// A panel as the web client's JSON path consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelData {
    pub id: String,
    pub points: Vec<[f64; 3]>,
    /// Bounding box center.
    pub position: [f64; 3],
    /// Bounding box extent.
    pub size: [f64; 3],
    pub color: String,
    pub geo_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
}

impl From<&Panel> for PanelData {
    fn from(panel: &Panel) -> Self {
        Self {
            id: panel.id.clone(),
            points: panel.points.iter().map(|p| p.to_array()).collect(),
            position: panel.bounds.center.to_array(),
            size: panel.bounds.size.to_array(),
            color: panel.color.hex.clone(),
            geo_key: panel.geo_key.clone(),
            start_point: panel.start_point.map(|p| p.to_array()),
            end_point: panel.end_point.map(|p| p.to_array()),
            rotation: panel.rotation.map(|p| p.to_array()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineData {
    pub id: String,
    pub points: Vec<[f64; 3]>,
    pub geo_key: Option<String>,
}

impl From<&Line> for LineData {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            points: line.points.iter().map(|p| p.to_array()).collect(),
            geo_key: line.geo_key.clone(),
        }
    }
}

/// Complete JSON render output: `{"panels": [...], "lines": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderDocument {
    pub panels: Vec<PanelData>,
    pub lines: Vec<LineData>,
}

impl RenderDocument {
    /// Pure function of the accumulated geometry; order is preserved.
    pub fn encode(panels: &[Panel], lines: &[Line]) -> Self {
        Self {
            panels: panels.iter().map(PanelData::from).collect(),
            lines: lines.iter().map(LineData::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
