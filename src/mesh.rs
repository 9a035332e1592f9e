//! Decoded geometry: positions, per-vertex colors and triangles.

use serde::{ Deserialize, Serialize };

/// A vertex position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Point3 {
    /// Creates a point from its coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }
}

impl From<[f32; 3]> for Point3 {
    fn from(v: [f32; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f32; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// A vertex color with channels normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel, 1.0 is opaque.
    pub a: f32,
}

impl Color {
    /// Opaque white, used for every channel the header does not declare.
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Creates a color from normalized channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Creates a color from 8-bit channels, dividing each by 255.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::new(normalize(r), normalize(g), normalize(b), normalize(a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(v: [f32; 4]) -> Self {
        Color::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Maps an 8-bit channel value onto `[0, 1]`.
pub(crate) fn normalize(channel: u8) -> f32 {
    f32::from(channel) / 255.0
}

/// The result of decoding a PLY file.
///
/// `colors` always has the same length as `vertices`; files without color
/// channels yield opaque white. Every face is represented as triangles,
/// quads having been split by [`quad_to_triangles`](crate::triangulate::quad_to_triangles).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlyMesh {
    /// Vertex positions in file order; a vertex's index is its id.
    pub vertices: Vec<Point3>,
    /// One color per vertex.
    pub colors: Vec<Color>,
    /// Triangles as triples of vertex indices.
    pub triangles: Vec<[u32; 3]>,
    /// Whether the header declared any color channel.
    pub has_vertex_colors: bool,
}

impl PlyMesh {
    /// Creates an empty mesh with room for the declared element counts.
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        PlyMesh {
            vertices: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            // quads produce two triangles, most files hold triangles only
            triangles: Vec::with_capacity(faces),
            has_vertex_colors: false,
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle indices as one flat sequence, three per triangle.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.triangles.iter().flatten().copied()
    }
}
