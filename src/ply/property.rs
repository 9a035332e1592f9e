//! Property type model.
//!
//! PLY payload values are dynamically typed according to the header. This module
//! provides [`ScalarType`] / [`PropertyType`] to describe the types declared there,
//! together with the byte widths the binary decoder needs to walk records.

use std::fmt::{ Display, Formatter };
use std::fmt;

/// Scalar type used to encode properties in the payload.
///
/// For the translation to rust types, see individual documentation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScalarType {
    /// Signed 8 bit integer, rust: `i8`.
    Char,
    /// Unsigned 8 bit integer, rust: `u8`.
    UChar,
    /// Signed 16 bit integer, rust: `i16`.
    Short,
    /// Unsigned 16 bit integer, rust: `u16`.
    UShort,
    /// Signed 32 bit integer, rust: `i32`.
    Int,
    /// Unsigned 32 bit integer, rust: `u32`.
    UInt,
    /// 32 bit floating point number, rust: `f32`.
    Float,
    /// 64 bit floating point number, rust: `f64`.
    Double,
}

impl ScalarType {
    /// Number of bytes one value occupies in a binary payload.
    pub fn byte_size(self) -> usize {
        match self {
            ScalarType::Char | ScalarType::UChar => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    /// `true` for all variants except `Float` and `Double`.
    pub fn is_integer(self) -> bool {
        !matches!(self, ScalarType::Float | ScalarType::Double)
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str(
            match *self {
                ScalarType::Char => "char",
                ScalarType::UChar => "uchar",
                ScalarType::Short => "short",
                ScalarType::UShort => "ushort",
                ScalarType::Int => "int",
                ScalarType::UInt => "uint",
                ScalarType::Float => "float",
                ScalarType::Double => "double",
            }
        )
    }
}

/// Data type used to encode properties in the payload.
///
/// There are two possible types: scalars and lists.
/// Lists are a sequence of scalars with a leading integer value defining how many elements the list contains.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PropertyType {
    /// Simple, "one-number" type.
    Scalar(ScalarType),
    /// Defines a sequence of scalars with the same type.
    ///
    /// First value is the count type which should be an integer variant.
    /// Second value is the type of the list elements.
    List(ScalarType, ScalarType)
}

impl PropertyType {
    /// Fixed binary width, `None` for lists since their length is only known per record.
    pub fn fixed_size(&self) -> Option<usize> {
        match *self {
            PropertyType::Scalar(s) => Some(s.byte_size()),
            PropertyType::List(..) => None,
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match *self {
            PropertyType::Scalar(s) => write!(f, "{}", s),
            PropertyType::List(c, t) => write!(f, "list {} {}", c, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_sizes() {
        assert_eq!(ScalarType::UChar.byte_size(), 1);
        assert_eq!(ScalarType::Short.byte_size(), 2);
        assert_eq!(ScalarType::Float.byte_size(), 4);
        assert_eq!(ScalarType::UInt.byte_size(), 4);
        assert_eq!(ScalarType::Double.byte_size(), 8);
    }

    #[test]
    fn integer_classification() {
        assert!(ScalarType::Char.is_integer());
        assert!(ScalarType::UInt.is_integer());
        assert!(!ScalarType::Float.is_integer());
        assert!(!ScalarType::Double.is_integer());
    }

    #[test]
    fn list_has_no_fixed_size() {
        assert_eq!(PropertyType::Scalar(ScalarType::Float).fixed_size(), Some(4));
        assert_eq!(PropertyType::List(ScalarType::UChar, ScalarType::Int).fixed_size(), None);
    }

    #[test]
    fn display_matches_header_keywords() {
        assert_eq!(PropertyType::List(ScalarType::UChar, ScalarType::Int).to_string(), "list uchar int");
        assert_eq!(PropertyType::Scalar(ScalarType::Double).to_string(), "double");
    }
}
