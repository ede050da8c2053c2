use gxml_core::{
    ColorError, GeometryError, PanelAccumulator, PointInput, RenderElement, RenderResult,
    RenderSettings, RenderSink,
};

use gxml_render::RenderDocument;

use crate::wire::{self, WireError};

/// Render sink whose output is a wire-format v2 buffer.
///
/// Lines have no representation in the format yet; `create_line` accepts
/// and drops them.
#[derive(Debug, Clone, Default)]
pub struct BinaryRenderEngine {
    acc: PanelAccumulator,
    dropped_lines: usize,
}

impl BinaryRenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &RenderSettings) -> Result<Self, ColorError> {
        Ok(Self {
            acc: PanelAccumulator::with_settings(settings)?,
            dropped_lines: 0,
        })
    }

    pub fn accumulator(&self) -> &PanelAccumulator {
        &self.acc
    }

    pub fn panel_count(&self) -> usize {
        self.acc.panel_count()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        if self.dropped_lines > 0 {
            log::debug!("{} lines not representable in binary output", self.dropped_lines);
        }
        wire::encode(self.acc.panels())
    }

    /// The same panels as a JSON document, for clients without a binary
    /// decoder. `lines` is always empty.
    pub fn to_document(&self) -> RenderDocument {
        RenderDocument::encode(self.acc.panels(), &[])
    }

    pub fn into_result(self) -> RenderResult {
        self.acc.finish()
    }
}

impl RenderSink for BinaryRenderEngine {
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
        _points: &[PointInput],
        _geo_key: Option<&str>,
    ) -> Result<(), GeometryError> {
        log::trace!("Dropping line '{}' from binary output", id);
        self.dropped_lines += 1;
        Ok(())
    }

    fn get_or_create_geo(&mut self, _key: &str) -> &mut dyn RenderSink {
        self
    }

    fn combine_all_geo(&mut self) {}
}
