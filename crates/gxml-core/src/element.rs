use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform produced a non-finite point for local {0:?}")]
    NonFinite(Point3),

    #[error("Degenerate scale {0:?}")]
    DegenerateScale([f64; 3]),
}

/// Maps element-local coordinates into world space.
pub trait PointTransform {
    fn transform_point(&self, local: Point3) -> Result<Point3, TransformError>;
}

/// What a render sink can ask of the element currently being visited.
pub trait RenderElement {
    fn id(&self) -> Option<&str>;

    /// Explicit color attribute, if the element carries one.
    fn color(&self) -> Option<&str>;

    /// Rotation in degrees about X, Y, Z, when the element exposes one.
    fn rotation(&self) -> Option<Point3> {
        None
    }

    /// The point-transform capability. Elements without one return `None`.
    fn transformer(&self) -> Option<&dyn PointTransform> {
        None
    }
}

/// Local-to-world placement: per-axis scale, then rotation (X, then Y,
/// then Z, in degrees), then translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub offset: Point3,
    pub rotation: Point3,
    pub scale: Point3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Point3::ORIGIN,
            rotation: Point3::ORIGIN,
            scale: Point3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self {
            offset: Point3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Point3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = Point3::new(x, y, z);
        self
    }

    pub fn apply(&self, point: &Point3) -> Point3 {
        let mut p = Point3::new(
            point.x * self.scale.x,
            point.y * self.scale.y,
            point.z * self.scale.z,
        );

        let (sin, cos) = self.rotation.x.to_radians().sin_cos();
        p = Point3::new(p.x, p.y * cos - p.z * sin, p.y * sin + p.z * cos);

        let (sin, cos) = self.rotation.y.to_radians().sin_cos();
        p = Point3::new(p.x * cos + p.z * sin, p.y, -p.x * sin + p.z * cos);

        let (sin, cos) = self.rotation.z.to_radians().sin_cos();
        p = Point3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z);

        Point3::new(p.x + self.offset.x, p.y + self.offset.y, p.z + self.offset.z)
    }
}

impl PointTransform for Transform {
    fn transform_point(&self, local: Point3) -> Result<Point3, TransformError> {
        if !self.scale.is_finite() {
            return Err(TransformError::DegenerateScale(self.scale.to_array()));
        }
        let world = self.apply(&local);
        if !world.is_finite() {
            return Err(TransformError::NonFinite(local));
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point3, b: Point3) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.z - b.z).abs() < 1e-9,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_transform_translate() {
        let t = Transform::translate(10.0, 20.0, 30.0);
        assert_close(t.apply(&Point3::new(1.0, 0.5, 0.0)), Point3::new(11.0, 20.5, 30.0));
    }

    #[test]
    fn test_transform_scale_then_rotate_z() {
        let t = Transform::translate(1.0, 0.0, 0.0)
            .with_scale(2.0, 1.0, 1.0)
            .with_rotation(0.0, 0.0, 90.0);
        // (1, 0, 0) -> scaled (2, 0, 0) -> rotated (0, 2, 0) -> moved (1, 2, 0)
        assert_close(t.apply(&Point3::new(1.0, 0.0, 0.0)), Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_transform_rotate_y() {
        let t = Transform::default().with_rotation(0.0, 90.0, 0.0);
        assert_close(t.apply(&Point3::new(1.0, 0.0, 0.0)), Point3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_transform_non_finite_rejected() {
        let t = Transform::translate(f64::INFINITY, 0.0, 0.0);
        assert!(matches!(
            t.transform_point(Point3::ORIGIN),
            Err(TransformError::NonFinite(_))
        ));

        let t = Transform::default().with_scale(f64::NAN, 1.0, 1.0);
        assert!(matches!(
            t.transform_point(Point3::ORIGIN),
            Err(TransformError::DegenerateScale(_))
        ));
    }
}
