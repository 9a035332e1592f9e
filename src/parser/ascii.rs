//! Ascii payload: one record per line, values separated by whitespace.

use std::str::FromStr;

use tracing::{ debug, trace };

use crate::diagnostics::Diagnostics;
use crate::errors::{ PlyError, PlyResult };
use crate::mesh::{ normalize, Color, PlyMesh, Point3 };
use crate::ply::{ ElementDef, FaceParseMode, Header };
use crate::util::LocationTracker;
use super::header::is_end_header;
use super::{ body_error, empty_mesh, Decoder };

type Result<T> = PlyResult<T>;

/// # Ascii
impl<D: Diagnostics> Decoder<D> {
    /// Decodes an ascii payload.
    ///
    /// `lines` holds the whole file, header included. Records start right after
    /// the `end_header` line and follow the element order of the header, one
    /// line per record. Elements other than vertex and face are skipped.
    pub fn decode_ascii_body<S: AsRef<str>>(&self, lines: &[S], header: &Header) -> Result<PlyMesh> {
        let end = match lines.iter().position(|l| is_end_header(l.as_ref())) {
            Some(i) => i,
            None => return Err(PlyError::MalformedBody("No 'end_header' line found.".to_string())),
        };
        let mut location = LocationTracker::at(end + 1);
        let mut records = lines[end + 1..].iter().map(|l| l.as_ref());

        let mut mesh = empty_mesh(header);
        let mut pending = 1 + usize::from(header.face_element.is_some());

        for (name, element_def) in &header.elements {
            if pending == 0 {
                break;
            }
            if *name == header.vertex_element {
                pending -= 1;
                for i in 0..element_def.count {
                    let line = next_record(&mut records, &mut location, element_def, i)?;
                    let tokens: Vec<&str> = line.split_whitespace().collect();
                    let (point, color) = self.__read_ascii_vertex(&tokens, header, &location)?;
                    mesh.vertices.push(point);
                    mesh.colors.push(color);
                }
            } else if header.face_element.as_ref() == Some(name) {
                pending -= 1;
                let column = match header.face_parse_mode {
                    Some(FaceParseMode::CountThenIndices { column, .. }) => column,
                    None if element_def.count == 0 => continue,
                    None => return Err(PlyError::MalformedHeader(
                        format!("Element '{}' has no vertex index list.", name)
                    )),
                };
                let mut indices = Vec::with_capacity(4);
                for i in 0..element_def.count {
                    let line = next_record(&mut records, &mut location, element_def, i)?;
                    let tokens: Vec<&str> = line.split_whitespace().collect();
                    match self.__read_ascii_face(&tokens, column, &location, &mut indices)? {
                        3 | 4 => self.__emit_face(&mut mesh, &indices, i),
                        n => self.__skip_face(i, n),
                    }
                }
            } else {
                debug!(element = %name, count = element_def.count, "skipping ascii element");
                for i in 0..element_def.count {
                    next_record(&mut records, &mut location, element_def, i)?;
                }
            }
        }
        self.__finish(mesh)
    }

    fn __read_ascii_vertex(&self, tokens: &[&str], header: &Header, location: &LocationTracker) -> Result<(Point3, Color)> {
        let point = Point3::new(
            self.__read_ascii_number(tokens, header.x_index, location)?,
            self.__read_ascii_number(tokens, header.y_index, location)?,
            self.__read_ascii_number(tokens, header.z_index, location)?,
        );
        let mut channels = [1.0f32; 4];
        for (channel, index) in channels.iter_mut().zip(header.color_indices()) {
            if let Some(column) = index {
                *channel = normalize(self.__read_ascii_number::<u8>(tokens, column, location)?);
            }
        }
        Ok((point, Color::from(channels)))
    }

    /// Reads the declared arity of a face line and, for triangles and quads,
    /// its indices into `indices`. Other arities leave `indices` empty.
    fn __read_ascii_face(&self, tokens: &[&str], column: usize, location: &LocationTracker, indices: &mut Vec<u32>) -> Result<usize> {
        indices.clear();
        let count_str = match tokens.get(column) {
            Some(s) => *s,
            None => return Err(body_error(location, "Face line has no vertex count.")),
        };
        let count: usize = match count_str.parse() {
            Ok(c) => c,
            Err(e) => return Err(body_error(
                location,
                &format!("Couldn't parse face vertex count '{}': {}", count_str, e)
            )),
        };
        if count != 3 && count != 4 {
            return Ok(count);
        }
        let values = match tokens.get(column + 1..column + 1 + count) {
            Some(v) => v,
            None => return Err(body_error(
                location,
                &format!("Expected {} vertex indices, but found only {}.", count, tokens.len().saturating_sub(column + 1))
            )),
        };
        for (i, s) in values.iter().enumerate() {
            match s.parse::<u32>() {
                Ok(v) => indices.push(v),
                Err(e) => return Err(body_error(
                    location,
                    &format!("Couldn't parse vertex index {} ('{}'): {}", i, s, e)
                )),
            }
        }
        Ok(count)
    }

    /// Parses the value in `column`.
    ///
    /// Unparsable text reads as zero unless `lenient_numbers` is off; a missing
    /// column is always an error.
    fn __read_ascii_number<N: FromStr + Default>(&self, tokens: &[&str], column: usize, location: &LocationTracker) -> Result<N> {
        let s = match tokens.get(column) {
            Some(s) => *s,
            None => return Err(body_error(
                location,
                &format!("Expected a value in column {}, but the line has only {} values.", column, tokens.len())
            )),
        };
        match s.parse() {
            Ok(v) => Ok(v),
            Err(_) if self.options.lenient_numbers => {
                trace!(line = location.line_index, column, value = s, "unparsable number read as zero");
                Ok(N::default())
            }
            Err(_) => Err(body_error(location, &format!("Couldn't parse '{}' in column {}.", s, column))),
        }
    }
}

fn next_record<'a, I: Iterator<Item = &'a str>>(
    records: &mut I,
    location: &mut LocationTracker,
    element_def: &ElementDef,
    i: usize,
) -> Result<&'a str> {
    location.next_line();
    match records.next() {
        Some(line) => Ok(line),
        None => Err(body_error(
            location,
            &format!(
                "Unexpected end of file while reading element '{}' (expected {}, got {}).",
                element_def.name, element_def.count, i
            )
        )),
    }
}
