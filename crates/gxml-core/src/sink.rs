use crate::color::{Color, ColorAllocator, ColorError};
use crate::element::RenderElement;
use crate::geometry::{normalize_points, BoundingBox, GeometryError, Point3, PointInput};
use crate::panel::{Line, Panel, RenderResult};
use crate::settings::RenderSettings;

/// The target a geometry traversal writes into.
///
/// The traversal calls `pre_render` once per visited element, then any
/// number of `create_poly` / `create_line` calls that belong to that
/// element. Implementations differ only in how they serialize afterwards.
pub trait RenderSink {
    fn pre_render(&mut self, element: &dyn RenderElement);

    fn create_poly(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError>;

    fn create_line(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError>;

    /// Grouping hook. Sinks that do not partition geometry return themselves.
    fn get_or_create_geo(&mut self, key: &str) -> &mut dyn RenderSink;

    /// Merge grouped geometry after traversal. A no-op for non-grouping sinks.
    fn combine_all_geo(&mut self);
}

/// Per-element state captured by `pre_render`.
#[derive(Debug, Clone)]
struct ElementContext {
    color: Color,
    endpoints: Option<(Point3, Point3)>,
    rotation: Option<Point3>,
}

/// Shared accumulator behind both render engines: collects panels and
/// lines in call order together with their derived metadata.
#[derive(Debug, Clone)]
pub struct PanelAccumulator {
    colors: ColorAllocator,
    fallback_color: Color,
    start_anchor: Point3,
    end_anchor: Point3,
    current: Option<ElementContext>,
    panels: Vec<Panel>,
    lines: Vec<Line>,
}

impl PanelAccumulator {
    pub fn new() -> Self {
        let settings = RenderSettings::default();
        Self {
            colors: ColorAllocator::default(),
            fallback_color: Color::parse(&settings.fallback_color),
            start_anchor: settings.start_anchor,
            end_anchor: settings.end_anchor,
            current: None,
            panels: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_settings(settings: &RenderSettings) -> Result<Self, ColorError> {
        Ok(Self {
            colors: ColorAllocator::new(&settings.palette)?,
            fallback_color: Color::parse(&settings.fallback_color),
            start_anchor: settings.start_anchor,
            end_anchor: settings.end_anchor,
            current: None,
            panels: Vec::new(),
            lines: Vec::new(),
        })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Close the render and hand out its snapshot.
    pub fn finish(self) -> RenderResult {
        RenderResult {
            panels: self.panels,
            lines: self.lines,
        }
    }

    /// Endpoint enrichment is best effort: an element without the transform
    /// capability, or whose transform fails, simply yields no endpoints.
    fn endpoints(&self, element: &dyn RenderElement) -> Option<(Point3, Point3)> {
        let transformer = element.transformer()?;
        let start = transformer.transform_point(self.start_anchor);
        let end = transformer.transform_point(self.end_anchor);
        match (start, end) {
            (Ok(start), Ok(end)) => Some((start, end)),
            (Err(e), _) | (_, Err(e)) => {
                log::debug!(
                    "No endpoints for element {:?}: {}",
                    element.id().unwrap_or_default(),
                    e
                );
                None
            }
        }
    }
}

impl Default for PanelAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for PanelAccumulator {
    fn pre_render(&mut self, element: &dyn RenderElement) {
        let color = match element.color().filter(|c| !c.is_empty()) {
            Some(explicit) => Color::parse(explicit),
            None => self.colors.next_color(),
        };
        log::trace!(
            "pre_render {:?} color={}",
            element.id().unwrap_or_default(),
            color.hex
        );

        self.current = Some(ElementContext {
            endpoints: self.endpoints(element),
            rotation: element.rotation(),
            color,
        });
    }

    fn create_poly(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError> {
        let points = normalize_points(id, points)?;
        let bounds = BoundingBox::from_points(&points);

        let (color, endpoints, rotation) = match &self.current {
            Some(ctx) => (ctx.color.clone(), ctx.endpoints, ctx.rotation),
            None => (self.fallback_color.clone(), None, None),
        };

        self.panels.push(Panel {
            id: id.to_string(),
            points,
            bounds,
            color,
            start_point: endpoints.map(|(start, _)| start),
            end_point: endpoints.map(|(_, end)| end),
            rotation,
            geo_key: geo_key.map(str::to_string),
        });
        Ok(())
    }

    fn create_line(
        &mut self,
        id: &str,
        points: &[PointInput],
        geo_key: Option<&str>,
    ) -> Result<(), GeometryError> {
        let points = normalize_points(id, points)?;
        self.lines.push(Line {
            id: id.to_string(),
            points,
            geo_key: geo_key.map(str::to_string),
        });
        Ok(())
    }

    fn get_or_create_geo(&mut self, _key: &str) -> &mut dyn RenderSink {
        self
    }

    fn combine_all_geo(&mut self) {}
}
