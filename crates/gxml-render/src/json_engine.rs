use gxml_core::{
    ColorError, GeometryError, PanelAccumulator, PointInput, RenderElement, RenderResult,
    RenderSettings, RenderSink,
};

use crate::render_data::RenderDocument;

/// Render sink that collects panels and lines for JSON output.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderEngine {
    acc: PanelAccumulator,
}

impl JsonRenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &RenderSettings) -> Result<Self, ColorError> {
        Ok(Self {
            acc: PanelAccumulator::with_settings(settings)?,
        })
    }

    pub fn accumulator(&self) -> &PanelAccumulator {
        &self.acc
    }

    pub fn to_document(&self) -> RenderDocument {
        let doc = RenderDocument::encode(self.acc.panels(), self.acc.lines());
        log::debug!(
            "JSON document: {} panels, {} lines",
            doc.panels.len(),
            doc.lines.len()
        );
        doc
    }

    pub fn into_result(self) -> RenderResult {
        self.acc.finish()
    }
}

impl RenderSink for JsonRenderEngine {
    fn pre_render(&mut self, element: &dyn RenderElement) {
        self.acc.pre_render(element);
    }

    fn create_poly(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError> {
        self.acc.create_poly(id, points, geo_key)
    }

    fn create_line(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError> {
        self.acc.create_line(id, points, geo_key)
    }

    fn get_or_create_geo(&mut self, _key: &str) -> &mut dyn RenderSink {
        self
    }

    fn combine_all_geo(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use gxml_core::Scene;

    #[test]
    fn test_engine_keeps_lines() {
        let scene = Scene::from_json(
            r#"{"elements": [{"id": "a",
                "polys": [
                    {"id": "p1", "points": [[0,0],[1,0],[1,1]]},
                    {"id": "p2", "points": [[0,0,1]]}
                ],
                "lines": [{"id": "l1", "points": [[0,0],[1,1]]}]}]}"#,
        )
        .unwrap();
        let mut engine = JsonRenderEngine::new();
        scene.render(&mut engine).unwrap();

        let doc = engine.to_document();
        assert_eq!(doc.panels.len(), 2);
        assert_eq!(doc.panels[0].id, "p1");
        assert_eq!(doc.panels[1].id, "p2");
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].points[1], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_serialization_does_not_consume() {
        let mut engine = JsonRenderEngine::new();
        engine.create_poly("p", &[[1.0, 2.0].into()], None).unwrap();
        let first = engine.to_document();
        let second = engine.to_document();
        assert_eq!(first, second);
        assert_eq!(engine.into_result().panels.len(), 1);
    }
}
