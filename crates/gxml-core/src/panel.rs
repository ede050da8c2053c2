use crate::color::Color;
use crate::geometry::{BoundingBox, Point3};

/// One rendered polygon surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: String,
    /// Winding order of the source polygon.
    pub points: Vec<Point3>,
    pub bounds: BoundingBox,
    pub color: Color,
    pub start_point: Option<Point3>,
    pub end_point: Option<Point3>,
    pub rotation: Option<Point3>,
    pub geo_key: Option<String>,
}

impl Panel {
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Both attachment points, only when the element produced both.
    pub fn endpoints(&self) -> Option<(Point3, Point3)> {
        self.start_point.zip(self.end_point)
    }
}

/// An open polyline. Only the JSON output carries these.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: String,
    pub points: Vec<Point3>,
    pub geo_key: Option<String>,
}

/// Everything one render produced, in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderResult {
    pub panels: Vec<Panel>,
    pub lines: Vec<Line>,
}

impl RenderResult {
    pub fn total_vertex_count(&self) -> usize {
        self.panels.iter().map(Panel::vertex_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty() && self.lines.is_empty()
    }
}
