//! # GXML I/O
//!
//! Packed binary output for the GXML viewer. The wire format (version 2)
//! loads straight into typed float arrays on the client; see [`wire`] for
//! the byte layout. Also provides a reader used for verification and
//! inspection.

pub mod binary_engine;
pub mod wire;

pub use binary_engine::BinaryRenderEngine;
pub use wire::{decode, encode, DecodedBuffer, DecodedPanel, WireError, WireReader, WireWriter};
