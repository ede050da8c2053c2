//! # GXML Render
//!
//! JSON side of the GXML viewer back end: the JSON render engine and the
//! document it produces, the timing aggregator that flattens engine
//! profiling for the web client, and the response envelope and vendor
//! headers used at the service boundary.

pub mod json_engine;
pub mod render_data;
pub mod response;
pub mod timing;

pub use json_engine::JsonRenderEngine;
pub use render_data::{LineData, PanelData, RenderDocument};
pub use response::{binary_headers, RenderResponse};
pub use timing::{format_timings, marker, RawTimings, WebTimings};
