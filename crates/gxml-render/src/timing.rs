//! Reshapes the layout engine's profiling markers into the flat set of
//! named durations the web client displays.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

/// Raw engine timings keyed by stage name. Each marker is kept as the
/// engine reported it; only its `total_ms` is read.
pub type RawTimings = BTreeMap<String, Value>;

/// A marker carrying only a total, as recorded by callers timing their own
/// stages.
pub fn marker(total_ms: f64) -> Value {
    json!({ "total_ms": total_ms })
}

fn total_ms(raw: &RawTimings, stage: &str) -> f64 {
    raw.get(stage)
        .and_then(|m| m.get("total_ms"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Web key and the raw stage it is read from, in display order.
pub const STAGES: [(&str, &str); 11] = [
    ("parse", "parse"),
    ("measure", "measure_pass"),
    ("prelayout", "pre_layout_pass"),
    ("layout", "layout_pass"),
    ("postlayout", "post_layout_pass"),
    ("render", "render"),
    ("intersection", "intersection_solver"),
    ("face", "face_solver"),
    ("geometry", "geometry_builder"),
    ("fastmesh", "fast_mesh_builder"),
    ("serialize", "serialize"),
];

/// Flat timings: one duration per recognized stage plus the raw markers.
///
/// Empty (no durations, no markers) when the engine reported nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebTimings {
    #[serde(flatten)]
    pub durations: BTreeMap<&'static str, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<RawTimings>,
}

impl WebTimings {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.durations.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty() && self.markers.is_none()
    }

    /// Durations in `STAGES` order.
    pub fn ordered(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        STAGES
            .into_iter()
            .filter_map(move |(key, _)| self.get(key).map(|ms| (key, ms)))
    }
}

/// Never fails; a missing or empty input gives an empty result, and each
/// stage absent from a non-empty input reads as `0.0`.
pub fn format_timings(raw: Option<&RawTimings>) -> WebTimings {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return WebTimings::default();
    };

    let durations = STAGES
        .into_iter()
        .map(|(key, stage)| (key, total_ms(raw, stage)))
        .collect();

    WebTimings {
        durations,
        markers: Some(raw.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(format_timings(None).is_empty());
        assert!(format_timings(Some(&RawTimings::new())).is_empty());
        assert_eq!(
            serde_json::to_string(&format_timings(None)).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_missing_stages_default_to_zero() {
        let mut raw = RawTimings::new();
        raw.insert("parse".into(), marker(12.5));

        let t = format_timings(Some(&raw));
        assert_eq!(t.get("parse"), Some(12.5));
        for (key, _) in STAGES.iter().skip(1) {
            assert_eq!(t.get(key), Some(0.0), "{}", key);
        }
        assert_eq!(t.markers.as_ref(), Some(&raw));
    }

    #[test]
    fn test_stage_names_are_mapped() {
        let mut raw = RawTimings::new();
        raw.insert("measure_pass".into(), marker(1.0));
        raw.insert("fast_mesh_builder".into(), marker(2.0));
        raw.insert("unrelated".into(), marker(3.0));

        let t = format_timings(Some(&raw));
        assert_eq!(t.get("measure"), Some(1.0));
        assert_eq!(t.get("fastmesh"), Some(2.0));
        assert_eq!(t.get("unrelated"), None);
        assert_eq!(t.ordered().count(), STAGES.len());
    }

    #[test]
    fn test_flat_json_shape() {
        let raw: RawTimings =
            serde_json::from_str(r#"{"parse": {"total_ms": 12.5}}"#).unwrap();
        let value = serde_json::to_value(format_timings(Some(&raw))).unwrap();
        assert_eq!(value["parse"], 12.5);
        assert_eq!(value["serialize"], 0.0);
        assert_eq!(value["markers"]["parse"]["total_ms"], 12.5);
        assert_eq!(value.as_object().unwrap().len(), STAGES.len() + 1);
    }

    #[test]
    fn test_markers_pass_through_unchanged() {
        let raw: RawTimings =
            serde_json::from_str(r#"{"parse": {"total_ms": 12.5}}"#).unwrap();
        let value = serde_json::to_value(format_timings(Some(&raw))).unwrap();
        assert_eq!(value["markers"], json!({"parse": {"total_ms": 12.5}}));
    }

    #[test]
    fn test_unknown_marker_shapes_are_tolerated() {
        let raw: RawTimings = serde_json::from_str(
            r#"{
                "parse": {"total_ms": 1.0, "parents": {"root": 1}, "extra": "x"},
                "layout_pass": {"total_ms": "fast"},
                "render": 7
            }"#,
        )
        .unwrap();

        let t = format_timings(Some(&raw));
        assert_eq!(t.get("parse"), Some(1.0));
        assert_eq!(t.get("layout"), Some(0.0));
        assert_eq!(t.get("render"), Some(0.0));
        assert_eq!(t.markers.as_ref(), Some(&raw));
        assert_eq!(
            serde_json::to_value(&t).unwrap()["markers"]["parse"]["parents"],
            json!({"root": 1})
        );
    }
}
