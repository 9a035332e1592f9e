//! PEG grammar for PLY header lines.
//!
//! This module is an internal implementation detail, but [`Line`] surfaces
//! through `Decoder::read_header_line`.

use crate::ply::{ PropertyDef, PropertyType, ScalarType, Encoding, Version, Comment, ObjInfo, ElementDef };

#[derive(Debug, PartialEq, Clone)]
/// A single parsed header line.
pub enum Line {
    /// The `ply` magic number line.
    MagicNumber,
    /// A `format <encoding> <version>` line with a known encoding.
    Format((Encoding, Option<Version>)),
    /// A `format <name> <version>` line naming an encoding nobody defined.
    UnknownFormat(String),
    /// A `comment ...` line.
    Comment(Comment),
    /// An `obj_info ...` line.
    ObjInfo(ObjInfo),
    /// An `element <name> <count>` line, `None` if the count does not fit.
    Element(Option<ElementDef>),
    /// A `property ...` line.
    Property(PropertyDef),
    /// The `end_header` terminator line.
    EndHeader
}

peg::parser!{pub grammar grammar() for str {

/// Grammar for PLY header

rule space() = [' '|'\t']+

rule uint() -> Option<u64>
    = n:$(['0'..='9']+) {
        n.parse::<u64>().ok()
    }

rule ident() -> &'input str
	= s:$(['a'..='z'|'A'..='Z'|'_']['a'..='z'|'A'..='Z'|'0'..='9'|'_'|'-']*) { s }

rule text() -> &'input str
	= s:$((!['\n'|'\r'][_])+) { s }

rule line_break()
	= "\r\n" / ['\n'|'\r']

// Longer spellings come first: a prefix match ("int" of "int8") is never retried.
rule scalar() -> ScalarType
	= ("char" / "int8") { ScalarType::Char }
	/ ("uchar" / "uint8") { ScalarType::UChar }
	/ ("short" / "int16") { ScalarType::Short }
	/ ("ushort" / "uint16") { ScalarType::UShort }
	/ ("int32" / "int") { ScalarType::Int }
	/ ("uint32" / "uint") { ScalarType::UInt }
	/ ("float64" / "double") { ScalarType::Double }
	/ ("float32" / "float") { ScalarType::Float }

rule data_type() -> PropertyType
	= s:scalar()   { PropertyType::Scalar(s) }
	/ "list" space() it:scalar() space() t:scalar() {
		PropertyType::List(it, t)
	}

pub rule magic_number()
	= "ply"

pub rule format() -> (Encoding, Option<Version>)
	= "format" space() "ascii" space() v:version() { (Encoding::Ascii, v) }
	/ "format" space() "binary_big_endian" space() v:version() { (Encoding::BinaryBigEndian, v) }
	/ "format" space() "binary_little_endian" space() v:version() { (Encoding::BinaryLittleEndian, v) }

pub rule unknown_format() -> String
	= "format" space() name:ident() (space() text())? { name.to_string() }

rule version() -> Option<Version>
    = maj:uint() "." min:uint() {{
        let maj = maj?;
        let min = min?;
        Some(Version {
            major: u16::try_from(maj).ok()?,
            minor: u8::try_from(min).ok()?,
        })
    }}

pub rule comment() -> Comment
	= "comment" c:free_text() { c }

pub rule obj_info() -> ObjInfo
	= "obj_info" c:free_text() { c }

rule free_text() -> String
	= t:(space() t:text()? { t })? { t.flatten().unwrap_or_default().to_string() }

pub rule element() -> Option<ElementDef>
    = "element" space() id:ident() space() n:uint() {{
        let mut e = ElementDef::new(id.to_owned());
        e.count = usize::try_from(n?).ok()?;
        Some(e)
    }}

pub rule property() -> PropertyDef
	= "property" space() data_type:data_type() space() id:ident() {
		PropertyDef::new(id.to_owned(), data_type)
	}

pub rule end_header()
	= "end_header"

pub rule line() -> Line
	= l:trimmed_line() space()? line_break()? { l }

rule trimmed_line() -> Line
	= magic_number() { Line::MagicNumber }
	/ end_header() { Line::EndHeader }
	/ v:format() { Line::Format(v) }
	/ v:unknown_format() { Line::UnknownFormat(v) }
	/ v:obj_info() { Line::ObjInfo(v) }
	/ v:comment() { Line::Comment(v) }
	/ v:element() { Line::Element(v) }
	/ v:property() { Line::Property(v) }

}}
