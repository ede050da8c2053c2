//! GXML binary wire format, version 2.
//!
//! Everything is little-endian. The buffer is a 16-byte header followed by
//! one variable-length record per panel, with no index table: readers walk
//! the panels sequentially using each record's own length fields.
//!
//! ## Header
//! `"GXML"` · version `u32` · panel count `u32` · total vertex count `u32`
//!
//! ## Panel record
//! ```text
//! id_len        u16
//! vertex_count  u16
//! color         3 x f32 (r, g, b)
//! has_endpoints u8     1 when both endpoints follow
//! reserved      3 bytes, zero
//! start, end    6 x f32, only when has_endpoints == 1
//! id            id_len bytes of UTF-8, no terminator
//! padding       (4 - id_len % 4) % 4 zero bytes
//! vertices      vertex_count x 3 x f32
//! ```
//! Every vertex array therefore starts on a 4-byte boundary.

use std::io::{self, Read, Write};
use thiserror::Error;

use gxml_core::Panel;

pub const MAGIC: [u8; 4] = *b"GXML";
pub const VERSION: u32 = 2;
pub const HEADER_LEN: usize = 16;

/// id_len + vertex_count + color + has_endpoints + reserved.
const PANEL_HEADER_LEN: usize = 2 + 2 + 12 + 1 + 3;
const ENDPOINTS_LEN: usize = 24;
const VERTEX_LEN: usize = 12;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Panel {panel} id '{id_prefix}…' is {len} bytes; the format allows at most 65535")]
    IdTooLong {
        panel: usize,
        id_prefix: String,
        len: usize,
    },

    #[error("Panel {panel} ('{id}') has {count} vertices; the format allows at most 65535")]
    TooManyVertices { panel: usize, id: String, count: usize },

    #[error("{0} panels do not fit the 32-bit panel count")]
    TooManyPanels(usize),

    #[error("{0} vertices do not fit the 32-bit total vertex count")]
    TooManyTotalVertices(usize),

    #[error("Not a GXML buffer (magic {0:?})")]
    InvalidMagic([u8; 4]),

    #[error("Unsupported GXML wire version: {0}")]
    UnsupportedVersion(u32),

    #[error("Buffer ended early at offset {offset}")]
    Truncated { offset: u64 },

    #[error("Panel {panel} endpoint flag is {flag}; expected 0 or 1")]
    InvalidEndpointFlag { panel: usize, flag: u8 },

    #[error("Panel {panel} id is not valid UTF-8")]
    InvalidId { panel: usize },

    #[error("Header declares {declared} vertices but panels hold {actual}")]
    VertexCountMismatch { declared: u32, actual: u64 },

    #[error("{0} unexpected bytes after the last panel")]
    TrailingBytes(usize),
}

// ── Layout ────────────────────────────────────────────────────────────

/// Zero bytes that follow an id of `id_len` bytes.
pub fn id_padding(id_len: usize) -> usize {
    (4 - id_len % 4) % 4
}

fn panel_len(panel: &Panel) -> usize {
    let id_len = panel.id.len();
    let endpoints = if panel.endpoints().is_some() { ENDPOINTS_LEN } else { 0 };
    PANEL_HEADER_LEN + endpoints + id_len + id_padding(id_len) + panel.vertex_count() * VERTEX_LEN
}

/// Checks every field limit up front and returns
/// `(total_vertex_count, encoded_len)`.
fn validate(panels: &[Panel]) -> Result<(u32, usize), WireError> {
    if panels.len() > u32::MAX as usize {
        return Err(WireError::TooManyPanels(panels.len()));
    }

    let mut total_vertices: usize = 0;
    let mut len = HEADER_LEN;
    for (index, panel) in panels.iter().enumerate() {
        if panel.id.len() > u16::MAX as usize {
            return Err(WireError::IdTooLong {
                panel: index,
                id_prefix: panel.id.chars().take(32).collect(),
                len: panel.id.len(),
            });
        }
        if panel.vertex_count() > u16::MAX as usize {
            return Err(WireError::TooManyVertices {
                panel: index,
                id: panel.id.clone(),
                count: panel.vertex_count(),
            });
        }
        total_vertices += panel.vertex_count();
        len += panel_len(panel);
    }

    let total = u32::try_from(total_vertices)
        .map_err(|_| WireError::TooManyTotalVertices(total_vertices))?;
    Ok((total, len))
}

/// Exact size of the buffer `encode` would produce.
pub fn encoded_len(panels: &[Panel]) -> Result<usize, WireError> {
    validate(panels).map(|(_, len)| len)
}

// ── Writer ────────────────────────────────────────────────────────────

pub struct WireWriter<W: Write> {
    writer: W,
}

impl<W: Write> WireWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a complete buffer. Nothing is written if any panel violates a
    /// field limit. Returns the number of bytes written.
    pub fn write(&mut self, panels: &[Panel]) -> Result<usize, WireError> {
        let (total_vertices, len) = validate(panels)?;

        self.writer.write_all(&MAGIC)?;
        self.write_u32(VERSION)?;
        self.write_u32(panels.len() as u32)?;
        self.write_u32(total_vertices)?;

        for panel in panels {
            self.write_panel(panel)?;
        }

        log::debug!(
            "Wrote {} panels, {} vertices, {} bytes",
            panels.len(),
            total_vertices,
            len
        );
        Ok(len)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_u16(&mut self, v: u16) -> Result<(), WireError> {
        self.writer.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_u32(&mut self, v: u32) -> Result<(), WireError> {
        self.writer.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_f32s(&mut self, values: &[f32]) -> Result<(), WireError> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.writer.write_all(&data)?;
        Ok(())
    }

    fn write_panel(&mut self, panel: &Panel) -> Result<(), WireError> {
        let id = panel.id.as_bytes();
        let endpoints = panel.endpoints();

        // Limits were checked in validate().
        self.write_u16(id.len() as u16)?;
        self.write_u16(panel.vertex_count() as u16)?;
        self.write_f32s(&panel.color.rgb.to_array())?;
        self.writer
            .write_all(&[u8::from(endpoints.is_some()), 0, 0, 0])?;

        if let Some((start, end)) = endpoints {
            self.write_f32s(&start.to_f32_array())?;
            self.write_f32s(&end.to_f32_array())?;
        }

        self.writer.write_all(id)?;
        self.writer.write_all(&[0u8; 3][..id_padding(id.len())])?;

        let vertices: Vec<f32> = panel
            .points
            .iter()
            .flat_map(|p| p.to_f32_array())
            .collect();
        self.write_f32s(&vertices)
    }
}

/// Encode panels into a fresh buffer of exactly `encoded_len` bytes.
pub fn encode(panels: &[Panel]) -> Result<Vec<u8>, WireError> {
    let mut buffer = Vec::with_capacity(encoded_len(panels)?);
    WireWriter::new(&mut buffer).write(panels)?;
    Ok(buffer)
}

// ── Reader ────────────────────────────────────────────────────────────

/// One panel record as read back from a buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPanel {
    pub id: String,
    pub color: [f32; 3],
    pub endpoints: Option<([f32; 3], [f32; 3])>,
    pub vertices: Vec<[f32; 3]>,
    /// Byte offset of the vertex array within the buffer.
    pub vertex_offset: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBuffer {
    pub version: u32,
    pub total_vertex_count: u32,
    pub panels: Vec<DecodedPanel>,
}

pub struct WireReader<R: Read> {
    reader: R,
    offset: u64,
}

impl<R: Read> WireReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    /// Read and fully validate one buffer, consuming the reader to its end.
    pub fn read(&mut self) -> Result<DecodedBuffer, WireError> {
        let magic: [u8; 4] = self.read_array()?;
        if magic != MAGIC {
            return Err(WireError::InvalidMagic(magic));
        }

        let version = self.read_u32()?;
        if version != VERSION {
            return Err(WireError::UnsupportedVersion(version));
        }

        let panel_count = self.read_u32()?;
        let total_vertex_count = self.read_u32()?;

        let mut panels = Vec::new();
        let mut actual_vertices: u64 = 0;
        for index in 0..panel_count as usize {
            let panel = self.read_panel(index)?;
            actual_vertices += panel.vertices.len() as u64;
            panels.push(panel);
        }

        if actual_vertices != total_vertex_count as u64 {
            return Err(WireError::VertexCountMismatch {
                declared: total_vertex_count,
                actual: actual_vertices,
            });
        }

        let mut rest = Vec::new();
        self.reader.read_to_end(&mut rest)?;
        if !rest.is_empty() {
            return Err(WireError::TrailingBytes(rest.len()));
        }

        Ok(DecodedBuffer {
            version,
            total_vertex_count,
            panels,
        })
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        match self.reader.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(WireError::Truncated { offset: self.offset })
            }
            Err(e) => Err(WireError::Io(e)),
        }
    }

    fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    fn read_vec3(&mut self) -> Result<[f32; 3], WireError> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }

    fn read_panel(&mut self, index: usize) -> Result<DecodedPanel, WireError> {
        let id_len = self.read_u16()? as usize;
        let vertex_count = self.read_u16()? as usize;
        let color = self.read_vec3()?;
        let [has_endpoints, ..] = self.read_array::<4>()?;

        let endpoints = match has_endpoints {
            0 => None,
            1 => Some((self.read_vec3()?, self.read_vec3()?)),
            flag => return Err(WireError::InvalidEndpointFlag { panel: index, flag }),
        };

        let mut id_bytes = vec![0u8; id_len];
        self.read_exact(&mut id_bytes)?;
        let id = String::from_utf8(id_bytes).map_err(|_| WireError::InvalidId { panel: index })?;
        let mut padding = [0u8; 3];
        self.read_exact(&mut padding[..id_padding(id_len)])?;

        let vertex_offset = self.offset;
        let vertices = (0..vertex_count)
            .map(|_| self.read_vec3())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedPanel {
            id,
            color,
            endpoints,
            vertices,
            vertex_offset,
        })
    }
}

/// Decode a complete in-memory buffer.
pub fn decode(bytes: &[u8]) -> Result<DecodedBuffer, WireError> {
    WireReader::new(bytes).read()
}
