//! A serde-loadable, already laid-out element tree that can drive any
//! [`RenderSink`]. Used by the command-line front end and in tests in place
//! of the full layout engine.

use serde::{Deserialize, Serialize};

use crate::element::{PointTransform, RenderElement, Transform};
use crate::geometry::{GeometryError, Point3, PointInput};
use crate::sink::RenderSink;

/// A polygon or polyline attached to a scene node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePrimitive {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub points: Vec<PointInput>,
    #[serde(default)]
    pub geo_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNode {
    pub id: Option<String>,
    pub color: Option<String>,
    pub transform: Option<Transform>,
    pub polys: Vec<ScenePrimitive>,
    pub lines: Vec<ScenePrimitive>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn render(&self, sink: &mut dyn RenderSink) -> Result<(), GeometryError> {
        sink.pre_render(self);

        for poly in &self.polys {
            let target = match &poly.geo_key {
                Some(key) => sink.get_or_create_geo(key),
                None => &mut *sink,
            };
            target.create_poly(&poly.id, &poly.points, poly.geo_key.as_deref())?;
        }
        for line in &self.lines {
            let target = match &line.geo_key {
                Some(key) => sink.get_or_create_geo(key),
                None => &mut *sink,
            };
            target.create_line(&line.id, &line.points, line.geo_key.as_deref())?;
        }

        for child in &self.children {
            child.render(sink)?;
        }
        Ok(())
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}

impl RenderElement for SceneNode {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn rotation(&self) -> Option<Point3> {
        self.transform.map(|t| t.rotation)
    }

    fn transformer(&self) -> Option<&dyn PointTransform> {
        self.transform.as_ref().map(|t| t as &dyn PointTransform)
    }
}

/// Root of a scene: top-level elements in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub elements: Vec<SceneNode>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Depth-first, pre-order walk over every node, then `combine_all_geo`.
    pub fn render(&self, sink: &mut dyn RenderSink) -> Result<(), GeometryError> {
        for node in &self.elements {
            node.render(sink)?;
        }
        sink.combine_all_geo();
        log::debug!("Rendered scene with {} elements", self.node_count());
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.elements.iter().map(SceneNode::node_count).sum()
    }
}
