use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 3D point in world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

// ── Point input ──────────────────────────────────────────────────────

/// A point as handed over by the traversal engine, before normalization.
///
/// Either an ordered list of at least two components (a missing z becomes
/// `0.0`) or an object with named `x`/`y`/`z` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointInput {
    Components(Vec<f64>),
    Fields { x: f64, y: f64, z: f64 },
}

impl PointInput {
    /// Resolve to a uniform triple. Fails only for component lists shorter than two.
    pub fn normalize(&self) -> Result<Point3, PointError> {
        match self {
            PointInput::Components(c) => match c.as_slice() {
                [x, y] => Ok(Point3::new(*x, *y, 0.0)),
                [x, y, z, ..] => Ok(Point3::new(*x, *y, *z)),
                _ => Err(PointError::TooFewComponents(c.len())),
            },
            PointInput::Fields { x, y, z } => Ok(Point3::new(*x, *y, *z)),
        }
    }
}

impl From<Point3> for PointInput {
    fn from(p: Point3) -> Self {
        PointInput::Fields {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<[f64; 3]> for PointInput {
    fn from(v: [f64; 3]) -> Self {
        PointInput::Components(v.to_vec())
    }
}

impl From<[f64; 2]> for PointInput {
    fn from(v: [f64; 2]) -> Self {
        PointInput::Components(v.to_vec())
    }
}

impl From<(f64, f64, f64)> for PointInput {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        PointInput::Components(vec![x, y, z])
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointError {
    #[error("expected at least 2 components, got {0}")]
    TooFewComponents(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Point {index} of '{id}' cannot be normalized: {source}")]
    InvalidPoint {
        id: String,
        index: usize,
        #[source]
        source: PointError,
    },
}

/// Normalize every point of the primitive `id`, preserving order.
pub fn normalize_points(id: &str, points: &[PointInput]) -> Result<Vec<Point3>, GeometryError> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            p.normalize().map_err(|source| GeometryError::InvalidPoint {
                id: id.to_string(),
                index,
                source,
            })
        })
        .collect()
}

// ── Bounds ───────────────────────────────────────────────────────────

/// Axis-aligned bounds of a panel, stored as center and extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Point3,
    pub size: Point3,
}

impl BoundingBox {
    /// Single pass over `points`. An empty slice yields a zero box.
    pub fn from_points(points: &[Point3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (min, max) = points[1..].iter().fold((*first, *first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });

        Self {
            center: Point3::new(
                (min.x + max.x) / 2.0,
                (min.y + max.y) / 2.0,
                (min.z + max.z) / 2.0,
            ),
            size: Point3::new(max.x - min.x, max.y - min.y, max.z - min.z),
        }
    }

    pub fn min(&self) -> Point3 {
        Point3::new(
            self.center.x - self.size.x / 2.0,
            self.center.y - self.size.y / 2.0,
            self.center.z - self.size.z / 2.0,
        )
    }

    pub fn max(&self) -> Point3 {
        Point3::new(
            self.center.x + self.size.x / 2.0,
            self.center.y + self.size.y / 2.0,
            self.center.z + self.size.z / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_two_components_defaults_z() {
        let p = PointInput::from([1.5, -2.0]).normalize().unwrap();
        assert_eq!(p, Point3::new(1.5, -2.0, 0.0));
    }

    #[test]
    fn test_normalize_fields() {
        let p = PointInput::Fields { x: 1.0, y: 2.0, z: 3.0 };
        assert_eq!(p.normalize().unwrap(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_normalize_extra_components_ignored() {
        let p = PointInput::Components(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.normalize().unwrap(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_normalize_rejects_short_lists() {
        let err = normalize_points("wall", &[[0.0, 0.0].into(), PointInput::Components(vec![1.0])])
            .unwrap_err();
        match err {
            GeometryError::InvalidPoint { id, index, source } => {
                assert_eq!(id, "wall");
                assert_eq!(index, 1);
                assert_eq!(source, PointError::TooFewComponents(1));
            }
        }
    }

    #[test]
    fn test_point_input_from_json() {
        let pts: Vec<PointInput> =
            serde_json::from_str(r#"[[1, 2], [1, 2, 3], {"x": 4, "y": 5, "z": 6}]"#).unwrap();
        let normalized = normalize_points("p", &pts).unwrap();
        assert_eq!(
            normalized,
            vec![
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(1.0, 2.0, 3.0),
                Point3::new(4.0, 5.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_bbox_center_and_size() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, -2.0),
            Point3::new(4.0, 3.0, 2.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let bb = BoundingBox::from_points(&pts);
        assert!((bb.center.x - 2.0).abs() < 1e-10);
        assert!((bb.center.y - 1.5).abs() < 1e-10);
        assert!(bb.center.z.abs() < 1e-10);
        assert!((bb.size.x - 4.0).abs() < 1e-10);
        assert!((bb.size.y - 3.0).abs() < 1e-10);
        assert!((bb.size.z - 4.0).abs() < 1e-10);
        assert_eq!(bb.min(), Point3::new(0.0, 0.0, -2.0));
        assert_eq!(bb.max(), Point3::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn test_bbox_single_point() {
        let bb = BoundingBox::from_points(&[Point3::new(1.0, 2.0, 3.0)]);
        assert_eq!(bb.center, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.size, Point3::ORIGIN);
    }

    #[test]
    fn test_bbox_empty_is_degenerate() {
        let bb = BoundingBox::from_points(&[]);
        assert_eq!(bb.center, Point3::ORIGIN);
        assert_eq!(bb.size, Point3::ORIGIN);
    }
}
