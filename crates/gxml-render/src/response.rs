use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::render_data::RenderDocument;
use crate::timing::WebTimings;

/// Envelope returned by the JSON render endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RenderDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderResponse {
    pub fn ok(data: RenderDocument) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<E: Display> From<Result<RenderDocument, E>> for RenderResponse {
    fn from(result: Result<RenderDocument, E>) -> Self {
        match result {
            Ok(doc) => Self::ok(doc),
            Err(e) => Self::failure(e),
        }
    }
}

pub const PANEL_COUNT_HEADER: &str = "X-Panel-Count";

/// Vendor headers sent alongside a binary render body: the panel count,
/// then one `X-Timing-<Stage>` header per duration, in milliseconds with
/// two decimals.
pub fn binary_headers(panel_count: usize, timings: &WebTimings) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(1 + timings.durations.len());
    headers.push((PANEL_COUNT_HEADER.to_string(), panel_count.to_string()));
    for (key, ms) in timings.ordered() {
        headers.push((format!("X-Timing-{}", capitalize(key)), format!("{:.2}", ms)));
    }
    headers
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
