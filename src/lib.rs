//! Decodes PLY (Polygon File Format) files into triangle meshes.
//!
//! Ascii and binary little endian files are supported. The decoder keeps the
//! vertex positions, optional per-vertex colors and the faces; quads are split
//! into two triangles and larger polygons are skipped with a diagnostic.
//!
//! ```rust
//! use ply_mesh::{ Color, Decoder, Point3 };
//!
//! let txt = b"ply\n\
//! format ascii 1.0\n\
//! element vertex 4\n\
//! property float x\n\
//! property float y\n\
//! property float z\n\
//! property uchar red\n\
//! property uchar green\n\
//! property uchar blue\n\
//! element face 1\n\
//! property list uchar int vertex_indices\n\
//! end_header\n\
//! 0 0 0 255 0 0\n\
//! 1 0 0 0 255 0\n\
//! 1 1 0 0 0 255\n\
//! 0 1 0 255 255 255\n\
//! 4 0 1 2 3\n";
//!
//! let mesh = Decoder::new().decode_bytes(txt).unwrap();
//! assert_eq!(mesh.vertices[2], Point3::new(1.0, 1.0, 0.0));
//! assert_eq!(mesh.colors[0], Color::new(1.0, 0.0, 0.0, 1.0));
//! assert_eq!(mesh.triangles, vec![[0, 1, 2], [2, 3, 0]]);
//! ```
//!
//! Warnings about skipped faces and refused formats go to a [`Diagnostics`]
//! sink, by default the `tracing` crate under the `ply_mesh` target.

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub mod diagnostics;
pub mod mesh;
pub mod parser;
pub mod ply;
pub mod triangulate;

mod errors;
mod options;
mod util;

pub use crate::diagnostics::{ CollectDiagnostics, Diagnostics, TracingDiagnostics };
pub use crate::errors::{ PlyError, PlyResult };
pub use crate::mesh::{ Color, PlyMesh, Point3 };
pub use crate::options::DecodeOptions;
pub use crate::parser::{ read_ply_mesh, Decoder };
