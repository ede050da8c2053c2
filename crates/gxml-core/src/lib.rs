//! # GXML Core
//!
//! Data model and render sink interface for the GXML viewer back end.
//! A layout traversal drives a [`RenderSink`] element by element; the shared
//! [`PanelAccumulator`] turns those calls into panels with bounds, colors and
//! attachment endpoints that the JSON and binary encoders then serialize.

pub mod color;
pub mod element;
pub mod geometry;
pub mod panel;
pub mod scene;
pub mod settings;
pub mod sink;

pub use color::{Color, ColorAllocator, ColorError, Rgb};
pub use element::{PointTransform, RenderElement, Transform, TransformError};
pub use geometry::{BoundingBox, GeometryError, Point3, PointInput};
pub use panel::{Line, Panel, RenderResult};
pub use scene::{Scene, SceneNode};
pub use settings::RenderSettings;
pub use sink::{PanelAccumulator, RenderSink};
