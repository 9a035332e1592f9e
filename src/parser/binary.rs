//! Binary little endian payload.
//!
//! Records are packed back to back without separators, so every read is
//! positioned by the sizes of the properties before it. All reads go through
//! [`take`], which checks the remaining length first.

use byteorder::{ LittleEndian, ReadBytesExt };
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::errors::{ PlyError, PlyResult };
use crate::mesh::{ normalize, Color, PlyMesh, Point3 };
use crate::ply::{ ElementDef, FaceParseMode, Header, PropertyType, ScalarType };
use super::{ empty_mesh, Decoder };

type Result<T> = PlyResult<T>;

/// Byte positions inside one vertex record.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VertexLayout {
    stride: usize,
    coords: [(usize, ScalarType); 3],
    colors: [Option<usize>; 4],
}

impl VertexLayout {
    fn new(header: &Header, element_def: &ElementDef) -> Result<Self> {
        let mut offsets = Vec::with_capacity(element_def.properties.len());
        let mut stride = 0;
        for p in element_def.properties.values() {
            match p.data_type {
                PropertyType::Scalar(s) => {
                    offsets.push((stride, s));
                    stride += s.byte_size();
                }
                PropertyType::List(..) => return Err(PlyError::UnsupportedProperty(
                    format!("List property '{}' on element '{}'.", p.name, element_def.name)
                )),
            }
        }
        let slot = |column: usize| offsets.get(column).copied().ok_or_else(|| PlyError::MalformedHeader(
            format!("Column {} is out of range for element '{}'.", column, element_def.name)
        ));

        let coords = [slot(header.x_index)?, slot(header.y_index)?, slot(header.z_index)?];
        let mut colors = [None; 4];
        for (color, index) in colors.iter_mut().zip(header.color_indices()) {
            if let Some(column) = index {
                let (offset, s) = slot(column)?;
                if s != ScalarType::UChar {
                    return Err(PlyError::UnsupportedProperty(
                        format!("Color channel in column {} is '{}', only 'uchar' is supported.", column, s)
                    ));
                }
                *color = Some(offset);
            }
        }
        Ok(VertexLayout { stride, coords, colors })
    }
}

/// Byte positions inside one face record around its index list.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceLayout {
    leading: usize,
    count_type: ScalarType,
    index_type: ScalarType,
    trailing: usize,
}

impl FaceLayout {
    fn new(mode: FaceParseMode, element_def: &ElementDef) -> Result<Self> {
        let FaceParseMode::CountThenIndices { column, count_type, index_type } = mode;
        let mut leading = 0;
        let mut trailing = 0;
        for (i, p) in element_def.properties.values().enumerate() {
            if i == column {
                continue;
            }
            let size = match p.data_type.fixed_size() {
                Some(s) => s,
                None => return Err(PlyError::UnsupportedProperty(
                    format!("Second list property '{}' on element '{}'.", p.name, element_def.name)
                )),
            };
            if i < column { leading += size } else { trailing += size }
        }
        Ok(FaceLayout { leading, count_type, index_type, trailing })
    }
}

/// Splits `n` bytes off the front of `reader`.
fn take<'a>(reader: &mut &'a [u8], n: usize, what: &dyn Fn() -> String) -> Result<&'a [u8]> {
    if reader.len() < n {
        return Err(PlyError::MalformedBody(format!(
            "Unexpected end of data while reading {} (need {} bytes, {} left).",
            what(), n, reader.len()
        )));
    }
    let (head, tail) = reader.split_at(n);
    *reader = tail;
    Ok(head)
}

/// Reads a non-negative integer of type `s` (list counts and vertex indices).
fn read_unsigned(mut raw: &[u8], s: ScalarType) -> Result<u64> {
    let v: i64 = match s {
        ScalarType::Char => i64::from(raw.read_i8()?),
        ScalarType::UChar => i64::from(raw.read_u8()?),
        ScalarType::Short => i64::from(raw.read_i16::<LittleEndian>()?),
        ScalarType::UShort => i64::from(raw.read_u16::<LittleEndian>()?),
        ScalarType::Int => i64::from(raw.read_i32::<LittleEndian>()?),
        ScalarType::UInt => i64::from(raw.read_u32::<LittleEndian>()?),
        ScalarType::Float | ScalarType::Double => return Err(PlyError::UnsupportedProperty(
            format!("Expected an integer type, '{}' declared.", s)
        )),
    };
    u64::try_from(v).map_err(|_| PlyError::MalformedBody(format!("Negative value {} where a count or index was expected.", v)))
}

/// Reads a coordinate of type `s`, converted to `f32`.
fn read_real(mut raw: &[u8], s: ScalarType) -> Result<f32> {
    let v = match s {
        ScalarType::Char => f32::from(raw.read_i8()?),
        ScalarType::UChar => f32::from(raw.read_u8()?),
        ScalarType::Short => f32::from(raw.read_i16::<LittleEndian>()?),
        ScalarType::UShort => f32::from(raw.read_u16::<LittleEndian>()?),
        ScalarType::Int => raw.read_i32::<LittleEndian>()? as f32,
        ScalarType::UInt => raw.read_u32::<LittleEndian>()? as f32,
        ScalarType::Float => raw.read_f32::<LittleEndian>()?,
        ScalarType::Double => raw.read_f64::<LittleEndian>()? as f32,
    };
    Ok(v)
}

/// # Binary
impl<D: Diagnostics> Decoder<D> {
    /// Decodes a binary little endian payload.
    ///
    /// `bytes` holds the whole file; the first [`Header::byte_len`] bytes are
    /// skipped. Elements are read in header order until the vertex and face
    /// elements are done; anything after them is ignored.
    pub fn decode_binary_body(&self, bytes: &[u8], header: &Header) -> Result<PlyMesh> {
        let offset = header.byte_len();
        let mut reader = match bytes.get(offset..) {
            Some(b) => b,
            None => return Err(PlyError::MalformedBody(format!(
                "File has {} bytes, but the header alone takes {}.", bytes.len(), offset
            ))),
        };

        let mut mesh = empty_mesh(header);
        let mut pending = 1 + usize::from(header.face_element.is_some());

        for (name, element_def) in &header.elements {
            if pending == 0 {
                break;
            }
            if *name == header.vertex_element {
                pending -= 1;
                let layout = VertexLayout::new(header, element_def)?;
                for i in 0..element_def.count {
                    let record = take(&mut reader, layout.stride, &|| format!("vertex {}", i))?;
                    let (point, color) = read_vertex(record, &layout)?;
                    mesh.vertices.push(point);
                    mesh.colors.push(color);
                }
            } else if header.face_element.as_ref() == Some(name) {
                pending -= 1;
                let layout = match header.face_parse_mode {
                    Some(mode) => FaceLayout::new(mode, element_def)?,
                    None if element_def.count == 0 => continue,
                    None => return Err(PlyError::MalformedHeader(
                        format!("Element '{}' has no vertex index list.", name)
                    )),
                };
                let mut indices = Vec::with_capacity(4);
                for i in 0..element_def.count {
                    match self.__read_binary_face(&mut reader, &layout, i, &mut indices)? {
                        3 | 4 => self.__emit_face(&mut mesh, &indices, i),
                        n => self.__skip_face(i, n),
                    }
                }
            } else {
                debug!(element = %name, count = element_def.count, "skipping binary element");
                skip_element(&mut reader, element_def)?;
            }
        }
        self.__finish(mesh)
    }

    /// Reads face `i` and returns its arity. Triangles and quads land in
    /// `indices`; for other arities the index bytes are skipped unread.
    fn __read_binary_face(&self, reader: &mut &[u8], layout: &FaceLayout, i: usize, indices: &mut Vec<u32>) -> Result<usize> {
        let what = || format!("face {}", i);
        indices.clear();
        take(reader, layout.leading, &what)?;
        let raw_count = take(reader, layout.count_type.byte_size(), &what)?;
        let count = to_usize(read_unsigned(raw_count, layout.count_type)?)?;
        let list_size = match count.checked_mul(layout.index_type.byte_size()) {
            Some(s) => s,
            None => return Err(PlyError::MalformedBody(format!("Face {} declares {} vertices.", i, count))),
        };
        let list = take(reader, list_size, &what)?;
        if count == 3 || count == 4 {
            for raw in list.chunks_exact(layout.index_type.byte_size()) {
                let index = read_unsigned(raw, layout.index_type)?;
                match u32::try_from(index) {
                    Ok(v) => indices.push(v),
                    Err(_) => return Err(PlyError::MalformedBody(
                        format!("Vertex index {} of face {} does not fit 32 bits.", index, i)
                    )),
                }
            }
        }
        take(reader, layout.trailing, &what)?;
        Ok(count)
    }
}

fn read_vertex(record: &[u8], layout: &VertexLayout) -> Result<(Point3, Color)> {
    let [(xo, xt), (yo, yt), (zo, zt)] = layout.coords;
    let point = Point3::new(
        read_real(&record[xo..], xt)?,
        read_real(&record[yo..], yt)?,
        read_real(&record[zo..], zt)?,
    );
    let mut channels = [1.0f32; 4];
    for (channel, offset) in channels.iter_mut().zip(layout.colors) {
        if let Some(o) = offset {
            *channel = normalize(record[o]);
        }
    }
    Ok((point, Color::from(channels)))
}

/// Advances `reader` past every record of an element the mesh does not use.
fn skip_element(reader: &mut &[u8], element_def: &ElementDef) -> Result<()> {
    if let Some(size) = element_def.fixed_record_size() {
        let total = match size.checked_mul(element_def.count) {
            Some(t) => t,
            None => return Err(PlyError::MalformedBody(
                format!("Element '{}' is too large.", element_def.name)
            )),
        };
        take(reader, total, &|| format!("element '{}'", element_def.name))?;
        return Ok(());
    }
    for i in 0..element_def.count {
        let what = || format!("element '{}' record {}", element_def.name, i);
        for p in element_def.properties.values() {
            match p.data_type {
                PropertyType::Scalar(s) => {
                    take(reader, s.byte_size(), &what)?;
                }
                PropertyType::List(count_type, item_type) => {
                    let raw_count = take(reader, count_type.byte_size(), &what)?;
                    let count = to_usize(read_unsigned(raw_count, count_type)?)?;
                    let size = count.checked_mul(item_type.byte_size()).unwrap_or(usize::MAX);
                    take(reader, size, &what)?;
                }
            }
        }
    }
    Ok(())
}

fn to_usize(v: u64) -> Result<usize> {
    usize::try_from(v).map_err(|_| PlyError::MalformedBody(format!("List length {} does not fit into usize.", v)))
}
