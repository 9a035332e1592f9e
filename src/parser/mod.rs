//! Decodes ascii or binary little endian PLY data into a [`PlyMesh`].

use std::fmt::Debug;
use std::io::{ BufRead, Read };
use std::path::Path;

use tracing::debug;

use crate::diagnostics::{ Diagnostics, TracingDiagnostics };
use crate::errors::{ PlyError, PlyResult };
use crate::mesh::PlyMesh;
use crate::options::DecodeOptions;
use crate::ply::{ Encoding, Header };
use crate::triangulate::quad_to_triangles;
use crate::util::LocationTracker;

mod ascii;
mod binary;
mod header;
mod ply_grammar;

pub use self::header::{ parse_header, read_header_lines };
pub use self::ply_grammar::Line;
use self::ply_grammar::grammar;

type Result<T> = PlyResult<T>;

fn header_rethrow<T, E: Debug>(location: &LocationTracker, line_str: &str, e: E, message: &str) -> Result<T> {
    Err(PlyError::MalformedHeader(
        format!("Line {}: {}\n\tString: '{}'\n\tError: {:?}", location.line_index, message, line_str, e)
    ))
}
fn header_error<T>(location: &LocationTracker, line_str: &str, message: &str) -> Result<T> {
    Err(PlyError::MalformedHeader(
        format!("Line {}: {}\n\tString: '{}'", location.line_index, message, line_str)
    ))
}
fn body_error(location: &LocationTracker, message: &str) -> PlyError {
    PlyError::MalformedBody(format!("Line {}: {}", location.line_index, message))
}

/// Upper bound on records preallocated from header counts, which are untrusted.
const PREALLOC_LIMIT: usize = 1 << 16;

fn empty_mesh(header: &Header) -> PlyMesh {
    let mut mesh = PlyMesh::with_capacity(
        header.vertex_count.min(PREALLOC_LIMIT),
        header.face_count.min(PREALLOC_LIMIT),
    );
    mesh.has_vertex_colors = header.has_color();
    mesh
}

/// Decodes PLY files into meshes.
///
/// A `Decoder` holds only configuration: the [`DecodeOptions`] and the
/// [`Diagnostics`] sink that receives messages about skipped faces and
/// refused formats. One decoder can be shared by many threads.
///
/// # Examples
///
/// ```rust
/// # use ply_mesh::parser::Decoder;
/// let txt = b"ply\n\
/// format ascii 1.0\n\
/// element vertex 3\n\
/// property float x\n\
/// property float y\n\
/// property float z\n\
/// element face 1\n\
/// property list uchar int vertex_indices\n\
/// end_header\n\
/// 0 0 0\n\
/// 1 0 0\n\
/// 0 1 0\n\
/// 3 0 1 2\n";
///
/// let mesh = Decoder::new().decode_bytes(txt).unwrap();
/// assert_eq!(mesh.vertices.len(), 3);
/// assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<D: Diagnostics = TracingDiagnostics> {
    diagnostics: D,
    options: DecodeOptions,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Creates a decoder with default options that reports through `tracing`.
    pub fn new() -> Self {
        Decoder {
            diagnostics: TracingDiagnostics,
            options: DecodeOptions::default(),
        }
    }
}

impl<D: Diagnostics> Decoder<D> {
    /// Replaces the diagnostic sink.
    pub fn with_diagnostics<N: Diagnostics>(self, diagnostics: N) -> Decoder<N> {
        Decoder {
            diagnostics,
            options: self.options,
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The diagnostic sink, e.g. to read back a [`CollectDiagnostics`](crate::diagnostics::CollectDiagnostics).
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Reads the header from `reader`, leaving the payload unread.
    pub fn read_header<T: BufRead>(&self, reader: &mut T) -> Result<Header> {
        let lines = read_header_lines(reader)?;
        parse_header(&lines)
    }

    /// Parses a single PLY header line.
    ///
    /// This is a low-level helper that exposes the header grammar; most callers
    /// should use [`Decoder::read_header`] or [`parse_header`].
    pub fn read_header_line(&self, line: &str) -> Result<Line> {
        match grammar::line(line) {
            Ok(l) => Ok(l),
            Err(e) => Err(PlyError::MalformedHeader(
                format!("Couldn't parse line.\n\tString: {}\n\tError: {:?}", line, e)
            )),
        }
    }

    /// Reads the file at `path` to completion and decodes it.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<PlyMesh> {
        let path = path.as_ref();
        debug!(path = %path.display(), "decoding PLY file");
        let bytes = std::fs::read(path)?;
        self.decode_bytes(&bytes)
    }

    /// Reads `source` to completion and decodes it.
    pub fn decode<T: Read>(&self, source: &mut T) -> Result<PlyMesh> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        self.decode_bytes(&bytes)
    }

    /// Decodes a complete PLY file held in memory.
    ///
    /// The header decides the body decoder: ascii payloads are split into lines,
    /// binary little endian payloads are read from the raw bytes. Any other
    /// format fails with [`PlyError::UnsupportedFormat`].
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<PlyMesh> {
        let mut reader = bytes;
        let header = match self.read_header(&mut reader) {
            Ok(h) => h,
            Err(PlyError::UnsupportedFormat(name)) => {
                self.diagnostics.warn(&format!("{} PLY files are not supported.", name));
                return Err(PlyError::UnsupportedFormat(name));
            }
            Err(e) => return Err(e),
        };
        match header.format {
            Encoding::Ascii => {
                let text = match std::str::from_utf8(bytes) {
                    Ok(t) => t,
                    Err(e) => return Err(PlyError::MalformedBody(
                        format!("Ascii payload is not valid UTF-8: {}", e)
                    )),
                };
                let lines: Vec<&str> = text.lines().collect();
                self.decode_ascii_body(&lines, &header)
            }
            Encoding::BinaryLittleEndian => self.decode_binary_body(bytes, &header),
            Encoding::BinaryBigEndian => {
                self.diagnostics.warn("binary_big_endian PLY files are not supported.");
                Err(PlyError::UnsupportedFormat(header.format.to_string()))
            }
        }
    }

    /// Appends face number `record` to `mesh`: triangles as is, quads split in two.
    fn __emit_face(&self, mesh: &mut PlyMesh, indices: &[u32], record: usize) {
        match *indices {
            [a, b, c] => mesh.triangles.push([a, b, c]),
            [a, b, c, d] => mesh.triangles.extend(quad_to_triangles([a, b, c, d])),
            _ => self.__skip_face(record, indices.len()),
        }
    }

    fn __skip_face(&self, record: usize, arity: usize) {
        self.diagnostics.warn(&format!(
            "Face {} has {} vertices, only triangles and quads are supported; skipping.",
            record, arity
        ));
    }

    /// Applies the checks that need the whole mesh.
    fn __finish(&self, mesh: PlyMesh) -> Result<PlyMesh> {
        if self.options.validate_indices {
            let count = mesh.vertices.len();
            if let Some(i) = mesh.indices().find(|&i| i as usize >= count) {
                return Err(PlyError::MalformedBody(
                    format!("Vertex index {} out of range, the file has {} vertices.", i, count)
                ));
            }
        }
        debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            "decoded PLY mesh"
        );
        Ok(mesh)
    }
}

/// Decodes the file at `path` with a default [`Decoder`].
pub fn read_ply_mesh<P: AsRef<Path>>(path: P) -> Result<PlyMesh> {
    Decoder::new().decode_file(path)
}
