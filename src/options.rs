//! Decoder configuration.

use serde::Deserialize;

/// Settings that change how strictly a payload is checked.
///
/// Deserializable so hosts can embed it in their own configuration files;
/// missing fields take their defaults.
///
/// ```rust
/// # use ply_mesh::DecodeOptions;
/// let options = DecodeOptions { validate_indices: true, ..DecodeOptions::default() };
/// assert!(options.lenient_numbers);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Malformed coordinate or color text in an ascii payload is read as 0
    /// instead of failing the decode.
    pub lenient_numbers: bool,
    /// Reject triangles that reference a vertex index beyond the vertex count.
    pub validate_indices: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            lenient_numbers: true,
            validate_indices: false,
        }
    }
}
