//! Turns header lines into an immutable [`Header`].

use std::io::BufRead;

use tracing::debug;

use crate::errors::{ PlyError, PlyResult };
use crate::ply::{ Addable, ElementDef, Encoding, FaceParseMode, Header, KeyMap, PropertyType, ScalarType, Version };
use crate::util::LocationTracker;
use super::ply_grammar::{ grammar, Line };
use super::{ header_error, header_rethrow };

const VERTEX_ELEMENT: &[&str] = &["vertex", "vertices"];
const FACE_ELEMENT: &[&str] = &["face", "faces"];

const X: &[&str] = &["x", "X"];
const Y: &[&str] = &["y", "Y"];
const Z: &[&str] = &["z", "Z"];
const RED: &[&str] = &["red", "r", "diffuse_red"];
const GREEN: &[&str] = &["green", "g", "diffuse_green"];
const BLUE: &[&str] = &["blue", "b", "diffuse_blue"];
const ALPHA: &[&str] = &["alpha", "a", "diffuse_alpha"];

const KNOWN_FORMATS: &[&str] = &["ascii", "binary_little_endian", "binary_big_endian"];

/// `true` for the line that terminates the header, ignoring trailing whitespace.
pub(crate) fn is_end_header(line: &str) -> bool {
    line.trim_end() == "end_header"
}

/// Reads lines up to and including `end_header`.
///
/// Each returned line is stripped of its `\n` only. Nothing after the terminator
/// is consumed, so a binary payload can be read from the same reader afterwards.
pub fn read_header_lines<T: BufRead>(reader: &mut T) -> PlyResult<Vec<String>> {
    let mut location = LocationTracker::new();
    let mut lines = Vec::new();
    let mut line_str = String::new();
    loop {
        location.next_line();
        line_str.clear();
        if reader.read_line(&mut line_str)? == 0 {
            return Err(PlyError::MalformedHeader(
                format!(
                    "Line {}: Unexpected end of file while reading header (missing 'end_header').",
                    location.line_index
                )
            ));
        }
        let raw = line_str.strip_suffix('\n').unwrap_or(&line_str).to_string();
        let done = is_end_header(&raw);
        lines.push(raw);
        if done {
            return Ok(lines);
        }
    }
}

/// Parses the header block into a [`Header`].
///
/// `lines` starts with the `ply` line. Parsing stops at `end_header`, so passing
/// all lines of an ascii file is fine; only the header lines end up in
/// [`Header::raw_lines`].
///
/// # Examples
///
/// ```rust
/// # use ply_mesh::parser::parse_header;
/// let lines = [
///     "ply",
///     "format ascii 1.0",
///     "element vertex 8",
///     "property float x",
///     "property float y",
///     "property float z",
///     "property uchar red",
///     "end_header",
/// ];
/// let header = parse_header(&lines).unwrap();
/// assert_eq!(header.vertex_count, 8);
/// assert_eq!(header.red_index, Some(3));
/// assert_eq!(header.green_index, None);
/// ```
pub fn parse_header<S: AsRef<str>>(lines: &[S]) -> PlyResult<Header> {
    let mut location = LocationTracker::new();
    let mut iter = lines.iter().map(|l| l.as_ref());

    location.next_line();
    let first = match iter.next() {
        Some(l) => l,
        None => return Err(PlyError::MalformedHeader(
            "Empty header, expected magic number 'ply'.".to_string()
        )),
    };
    match grammar::line(first) {
        Ok(Line::MagicNumber) => (),
        Ok(l) => return header_error(&location, first, &format!("Expected magic number 'ply', but saw '{:?}'.", l)),
        Err(e) => return header_rethrow(&location, first, e, "Expected magic number 'ply'."),
    }

    let mut form_ver: Option<(Encoding, Option<Version>)> = None;
    let mut obj_infos = Vec::new();
    let mut comments = Vec::new();
    let mut elements = KeyMap::<ElementDef>::new();
    let mut terminated = false;

    for line_str in iter {
        location.next_line();
        match grammar::line(line_str) {
            Err(e) => return header_rethrow(&location, line_str, e, "Couldn't parse line."),
            Ok(Line::MagicNumber) => return header_error(&location, line_str, "Unexpected 'ply' found."),
            Ok(Line::Format(t)) => {
                if let Some(f) = form_ver {
                    if f != t {
                        return header_error(
                            &location,
                            line_str,
                            &format!(
                                "Found contradicting format definition:\n\
                                \tEncoding: {:?}, Version: {:?}\n\
                                previous definition:\n\
                                \tEncoding: {:?}, Version: {:?}",
                                t.0, t.1, f.0, f.1
                            ),
                        );
                    }
                } else {
                    form_ver = Some(t);
                }
            }
            Ok(Line::UnknownFormat(name)) => {
                if KNOWN_FORMATS.contains(&name.as_str()) {
                    return header_error(&location, line_str, "Missing or invalid version.");
                }
                return Err(PlyError::UnsupportedFormat(name));
            }
            Ok(Line::ObjInfo(o)) => obj_infos.push(o),
            Ok(Line::Comment(c)) => comments.push(c),
            Ok(Line::Element(Some(e))) => elements.add(e),
            Ok(Line::Element(None)) => return header_error(&location, line_str, "Invalid element count."),
            Ok(Line::Property(p)) => match elements.last_mut() {
                Some((_, e)) => e.properties.add(p),
                None => return header_error(
                    &location,
                    line_str,
                    &format!("Property '{}' found without preceding element.", p.name)
                ),
            },
            Ok(Line::EndHeader) => {
                terminated = true;
                break;
            }
        }
    }

    if !terminated {
        return Err(PlyError::MalformedHeader(
            format!("Line {}: Missing 'end_header'.", location.line_index)
        ));
    }

    let (format, version) = match form_ver {
        Some(f) => f,
        None => return Err(PlyError::MalformedHeader("No format line found.".to_string())),
    };
    let version = match version {
        Some(v) => v,
        None => return Err(PlyError::MalformedHeader("Invalid version number.".to_string())),
    };

    let vertex_def = match find_element(&elements, VERTEX_ELEMENT) {
        Some(v) => v,
        None => return Err(PlyError::MalformedHeader("No 'vertex' element declared.".to_string())),
    };
    if let Some(p) = vertex_def.properties.values().find(|p| matches!(p.data_type, PropertyType::List(..))) {
        return Err(PlyError::UnsupportedProperty(
            format!("List property '{}' on element '{}'.", p.name, vertex_def.name)
        ));
    }
    let column = |names: &[&str]| vertex_def.properties.values().position(|p| names.contains(&p.name.as_str()));
    let required = |names: &[&str]| column(names).ok_or_else(|| PlyError::MalformedHeader(
        format!("Element '{}' has no '{}' property.", vertex_def.name, names[0])
    ));

    let color = |names: &[&str]| match column(names) {
        Some(i) => match vertex_def.properties[i].data_type {
            PropertyType::Scalar(ScalarType::UChar) => Ok(Some(i)),
            ref t => Err(PlyError::UnsupportedProperty(format!(
                "Color property '{}' is '{}', only 'uchar' is supported.",
                vertex_def.properties[i].name, t
            ))),
        },
        None => Ok(None),
    };

    let face_def = find_element(&elements, FACE_ELEMENT);
    let face_parse_mode = match face_def {
        Some(f) => face_parse_mode(f)?,
        None => None,
    };

    let header = Header {
        format,
        version,
        vertex_element: vertex_def.name.clone(),
        vertex_count: vertex_def.count,
        face_element: face_def.map(|f| f.name.clone()),
        face_count: face_def.map_or(0, |f| f.count),
        x_index: required(X)?,
        y_index: required(Y)?,
        z_index: required(Z)?,
        red_index: color(RED)?,
        green_index: color(GREEN)?,
        blue_index: color(BLUE)?,
        alpha_index: color(ALPHA)?,
        face_parse_mode,
        raw_lines: lines[..location.line_index].iter().map(|l| l.as_ref().to_string()).collect(),
        elements: elements.clone(),
        comments,
        obj_infos,
    };
    debug!(
        format = %header.format,
        vertices = header.vertex_count,
        faces = header.face_count,
        color = header.has_color(),
        "parsed PLY header"
    );
    Ok(header)
}

fn find_element<'a>(elements: &'a KeyMap<ElementDef>, names: &[&str]) -> Option<&'a ElementDef> {
    elements.values().find(|e| names.contains(&e.name.as_str()))
}

fn face_parse_mode(face: &ElementDef) -> PlyResult<Option<FaceParseMode>> {
    let mut lists = face.properties.values().enumerate().filter_map(|(i, p)| match p.data_type {
        PropertyType::List(count_type, index_type) => Some((i, count_type, index_type)),
        PropertyType::Scalar(_) => None,
    });
    let mode = match (lists.next(), lists.next()) {
        (Some((column, count_type, index_type)), None) if count_type.is_integer() && index_type.is_integer() =>
            FaceParseMode::CountThenIndices { column, count_type, index_type },
        (None, _) if face.count == 0 => return Ok(None),
        _ => return Err(PlyError::MalformedHeader(
            format!(
                "Unrecognized face list layout on element '{}': expected exactly one integer list of vertex indices.",
                face.name
            )
        )),
    };
    Ok(Some(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(txt: &str) -> PlyResult<Header> {
        let lines: Vec<&str> = txt.lines().collect();
        parse_header(&lines)
    }

    #[test]
    fn columns_follow_declaration_order() {
        let h = parse("ply\n\
            format ascii 1.0\n\
            element vertex 3\n\
            property uchar red\n\
            property float z\n\
            property float nx\n\
            property float x\n\
            property float y\n\
            property uchar alpha\n\
            end_header").unwrap();
        assert_eq!((h.x_index, h.y_index, h.z_index), (3, 4, 1));
        assert_eq!(h.color_indices(), [Some(0), None, None, Some(5)]);
        assert_eq!(h.vertex_count, 3);
        assert_eq!(h.face_count, 0);
        assert_eq!(h.face_parse_mode, None);
    }

    #[test]
    fn short_color_names_are_recognized() {
        let h = parse("ply\nformat ascii 1.0\nelement vertex 1\n\
            property float x\nproperty float y\nproperty float z\n\
            property uchar r\nproperty uchar g\nproperty uchar b\nproperty uchar a\n\
            end_header").unwrap();
        assert_eq!(h.color_indices(), [Some(3), Some(4), Some(5), Some(6)]);
    }

    #[test]
    fn face_list_is_found() {
        let h = parse("ply\nformat binary_little_endian 1.0\n\
            element vertex 4\nproperty float x\nproperty float y\nproperty float z\n\
            element face 2\nproperty uchar flags\nproperty list uchar int vertex_indices\n\
            end_header").unwrap();
        assert_eq!(h.format, Encoding::BinaryLittleEndian);
        assert_eq!(h.face_count, 2);
        assert_eq!(
            h.face_parse_mode,
            Some(FaceParseMode::CountThenIndices { column: 1, count_type: ScalarType::UChar, index_type: ScalarType::Int })
        );
    }

    #[test]
    fn raw_lines_stop_at_terminator() {
        let lines = ["ply", "format ascii 1.0", "element vertex 1", "property float x",
            "property float y", "property float z", "end_header", "1 2 3"];
        let h = parse_header(&lines).unwrap();
        assert_eq!(h.raw_lines.len(), 7);
        assert_eq!(h.raw_lines.last().map(String::as_str), Some("end_header"));
    }

    #[test]
    fn missing_coordinate_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(ref m)) if m.contains("'z'")));
    }

    #[test]
    fn missing_vertex_element_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nelement face 0\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(_))));
    }

    #[test]
    fn missing_element_count_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nelement vertex\nproperty float x\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(_))));
    }

    #[test]
    fn float_face_list_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\n\
            element vertex 1\nproperty float x\nproperty float y\nproperty float z\n\
            element face 1\nproperty list uchar float vertex_indices\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(ref m)) if m.contains("face list")));
    }

    #[test]
    fn face_without_list_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\n\
            element vertex 1\nproperty float x\nproperty float y\nproperty float z\n\
            element face 1\nproperty int vertex_indices\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(_))));
    }

    #[test]
    fn wide_color_is_unsupported() {
        for t in ["float", "ushort", "int"] {
            let r = parse(&format!("ply\nformat ascii 1.0\n\
                element vertex 1\nproperty float x\nproperty float y\nproperty float z\n\
                property {} red\nend_header", t));
            assert!(matches!(r, Err(PlyError::UnsupportedProperty(ref m)) if m.contains("'red'")), "{}: {:?}", t, r);
        }
    }

    #[test]
    fn vertex_list_is_unsupported() {
        let r = parse("ply\nformat ascii 1.0\n\
            element vertex 1\nproperty float x\nproperty float y\nproperty float z\n\
            property list uchar float weights\nend_header");
        assert!(matches!(r, Err(PlyError::UnsupportedProperty(_))));
    }

    #[test]
    fn big_endian_is_parsed_but_marked() {
        let h = parse("ply\nformat binary_big_endian 1.0\n\
            element vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header").unwrap();
        assert_eq!(h.format, Encoding::BinaryBigEndian);
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let r = parse("ply\nformat binary_middle_endian 1.0\nend_header");
        assert!(matches!(r, Err(PlyError::UnsupportedFormat(ref n)) if n == "binary_middle_endian"));
    }

    #[test]
    fn known_format_without_version_is_malformed() {
        let r = parse("ply\nformat ascii\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(_))));
    }

    #[test]
    fn contradicting_format_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nformat binary_little_endian 1.0\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(_))));
    }

    #[test]
    fn property_without_element_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nproperty float x\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(ref m)) if m.contains("without preceding element")));
    }

    #[test]
    fn missing_terminator_is_malformed() {
        let r = parse("ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z");
        assert!(matches!(r, Err(PlyError::MalformedHeader(ref m)) if m.contains("end_header")));
    }

    #[test]
    fn missing_magic_number_is_malformed() {
        let r = parse("format ascii 1.0\nend_header");
        assert!(matches!(r, Err(PlyError::MalformedHeader(ref m)) if m.starts_with("Line 1")));
    }

    #[test]
    fn comments_and_obj_info_are_kept() {
        let h = parse("ply\nformat ascii 1.0\ncomment made by hand\nobj_info scanner 3\n\
            element vertex 0\nproperty float x\nproperty float y\nproperty float z\nend_header").unwrap();
        assert_eq!(h.comments, vec!["made by hand".to_string()]);
        assert_eq!(h.obj_infos, vec!["scanner 3".to_string()]);
    }

    #[test]
    fn read_header_lines_leaves_payload_unread() {
        let bytes = b"ply\r\nformat binary_little_endian 1.0\r\nend_header\r\n\x01\x02";
        let mut reader = &bytes[..];
        let lines = read_header_lines(&mut reader).unwrap();
        assert_eq!(lines, vec!["ply\r", "format binary_little_endian 1.0\r", "end_header\r"]);
        assert_eq!(reader, &[1u8, 2][..]);
    }

    #[test]
    fn read_header_lines_requires_terminator() {
        let mut reader = &b"ply\nformat ascii 1.0\n"[..];
        assert!(matches!(read_header_lines(&mut reader), Err(PlyError::MalformedHeader(_))));
    }
}
