//! Core data structures describing a PLY header.
//!
//! This module defines [`Header`], the immutable schema built once from the header
//! block, and the type definitions needed to describe element/property declarations.

use std::fmt::{ Display, Formatter };
use std::fmt;
use super::{ KeyMap, PropertyType, ScalarType };

/// Models the header of a PLY file as needed to decode a mesh.
///
/// Built once by [`parse_header`](crate::parser::parse_header) and only read afterwards.
/// Column indices are zero-based positions in the vertex element's property list,
/// which is also the token position on an ascii vertex line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Header {
    /// In which format is the payload encoded?
    pub format: Encoding,
    /// Which file format standard is used?
    ///
    /// The only existing standard is 1.0.
    pub version: Version,
    /// Name under which the vertex element was declared (`vertex` or `vertices`).
    pub vertex_element: String,
    /// Number of vertex records.
    pub vertex_count: usize,
    /// Name of the face element, `None` for point clouds without one.
    pub face_element: Option<String>,
    /// Number of face records, zero if there is no face element.
    pub face_count: usize,
    /// Column of the `x` coordinate.
    pub x_index: usize,
    /// Column of the `y` coordinate.
    pub y_index: usize,
    /// Column of the `z` coordinate.
    pub z_index: usize,
    /// Column of the red channel, if declared.
    pub red_index: Option<usize>,
    /// Column of the green channel, if declared.
    pub green_index: Option<usize>,
    /// Column of the blue channel, if declared.
    pub blue_index: Option<usize>,
    /// Column of the alpha channel, if declared.
    pub alpha_index: Option<usize>,
    /// How face records lay out their vertex indices, `None` without a face element.
    pub face_parse_mode: Option<FaceParseMode>,
    /// Ordered map of elements as they appear in the payload.
    pub elements: KeyMap<ElementDef>,
    /// File comments.
    pub comments: Vec<Comment>,
    /// Arbitrary object metadata lines (`obj_info ...`) as found in the header.
    pub obj_infos: Vec<ObjInfo>,
    /// The header lines in file order, from `ply` up to and including `end_header`.
    ///
    /// Each line is stripped of its `\n` only, so a carriage return of a CRLF file stays part of the line.
    pub raw_lines: Vec<String>,
}

impl Header {
    /// Byte length of the header block, i.e. the offset where a binary payload starts.
    ///
    /// This is the length of `raw_lines` joined by `\n`, plus the `\n` after `end_header`.
    pub fn byte_len(&self) -> usize {
        self.raw_lines.iter().map(|l| l.len() + 1).sum()
    }

    /// Color channel columns in the order red, green, blue, alpha.
    pub fn color_indices(&self) -> [Option<usize>; 4] {
        [self.red_index, self.green_index, self.blue_index, self.alpha_index]
    }

    /// `true` if at least one color channel is declared.
    pub fn has_color(&self) -> bool {
        self.color_indices().iter().any(Option::is_some)
    }

    /// Definition of the vertex element.
    pub fn vertex_def(&self) -> Option<&ElementDef> {
        self.elements.get(&self.vertex_element)
    }

    /// Definition of the face element, if any.
    pub fn face_def(&self) -> Option<&ElementDef> {
        self.face_element.as_ref().and_then(|n| self.elements.get(n))
    }
}

/// Alias to give object information an explicit type.
pub type ObjInfo = String;

/// Alias to give comments an explicit type.
pub type Comment = String;

/// Version from the `format` line. Only 1.0 exists in the wild.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Version {
    pub major: u16,
    pub minor: u8,
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Payload encoding named on the `format` line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Encoding {
    /// Whitespace separated numbers, one record per line.
    Ascii,
    /// Packed big endian records. Recognized in the header but not decoded.
    BinaryBigEndian,
    /// Packed little endian records.
    BinaryLittleEndian,
}

impl Encoding {
    /// The keyword used on the `format` line.
    pub fn keyword(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryBigEndian => "binary_big_endian",
            Encoding::BinaryLittleEndian => "binary_little_endian",
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Layout of the vertex index list in a face record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FaceParseMode {
    /// A list property: a leading count followed by that many vertex indices.
    CountThenIndices {
        /// Position of the list among the face element's properties.
        column: usize,
        /// Type of the leading count.
        count_type: ScalarType,
        /// Type of each vertex index.
        index_type: ScalarType,
    },
}

/// An `element` declaration with the properties that follow it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ElementDef {
    /// Element name, e.g. `vertex`, `face` or `edge`.
    pub name: String,
    /// How many records of this element appear in the payload.
    pub count: usize,
    /// Properties in declaration order.
    pub properties: KeyMap<PropertyDef>,
}

impl ElementDef {
    /// Creates a new element definition without properties.
    pub fn new(name: String) -> Self {
        ElementDef {
            name,
            count: 0,
            properties: KeyMap::new(),
        }
    }

    /// Binary size of one record, `None` if a list property makes it variable.
    pub fn fixed_record_size(&self) -> Option<usize> {
        self.properties.values().map(|p| p.data_type.fixed_size()).sum()
    }
}

/// A `property` declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PropertyDef {
    /// Name, unique within its element.
    pub name: String,
    /// Data type of the property: a scalar or a list of scalars.
    pub data_type: PropertyType,
}

impl PropertyDef {
    pub fn new(name: String, data_type: PropertyType) -> Self {
        PropertyDef { name, data_type }
    }
}
