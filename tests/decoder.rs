use std::path::PathBuf;

use ply_mesh::ply::{ Encoding, Version };
use ply_mesh::*;

const CUBE_FACE: &[u8] = b"ply\n\
format ascii 1.0\n\
comment one face of a cube\n\
element vertex 4\n\
property float x\n\
property float y\n\
property float z\n\
element face 1\n\
property list uchar int vertex_indices\n\
end_header\n\
0 0 0\n\
0 0 1\n\
0 1 1\n\
0 1 0\n\
4 0 1 2 3\n";

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ply-mesh-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn decode_file_from_disk() {
    let path = temp_file("cube_face.ply", CUBE_FACE);
    let mesh = read_ply_mesh(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.triangles, vec![[0, 1, 2], [2, 3, 0]]);
}

#[test]
fn decode_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("ply-mesh-this-file-does-not-exist.ply");
    assert!(matches!(read_ply_mesh(path), Err(PlyError::Io(_))));
}

#[test]
fn read_header_only() {
    let mut reader = std::io::BufReader::new(CUBE_FACE);
    let header = Decoder::new().read_header(&mut reader).unwrap();
    assert_eq!(header.format, Encoding::Ascii);
    assert_eq!(header.version, Version { major: 1, minor: 0 });
    assert_eq!(header.comments, vec!["one face of a cube".to_string()]);
    assert_eq!(header.vertex_count, 4);
    assert_eq!(header.face_count, 1);
    assert_eq!((header.x_index, header.y_index, header.z_index), (0, 1, 2));
    assert_eq!(header.raw_lines.len(), 10);
}

#[test]
fn unknown_format_is_unsupported() {
    let txt = b"ply\nformat binary_middle_endian 1.0\nelement vertex 0\nend_header\n";
    let err = Decoder::new().decode_bytes(txt).unwrap_err();
    assert!(matches!(err, PlyError::UnsupportedFormat(ref f) if f == "binary_middle_endian"), "{}", err);
}

#[test]
fn unknown_format_is_reported() {
    let txt = b"ply\nformat binary_middle_endian 1.0\nelement vertex 0\nend_header\n";
    let decoder = Decoder::new().with_diagnostics(CollectDiagnostics::new());
    assert!(matches!(decoder.decode_bytes(txt), Err(PlyError::UnsupportedFormat(_))));
    let warnings = decoder.diagnostics().take();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("binary_middle_endian"), "{}", warnings[0]);
}

#[test]
fn header_errors_are_not_reported() {
    let txt = b"ply\nformat ascii 1.0\nend_header\n";
    let decoder = Decoder::new().with_diagnostics(CollectDiagnostics::new());
    assert!(matches!(decoder.decode_bytes(txt), Err(PlyError::MalformedHeader(_))));
    assert!(decoder.diagnostics().take().is_empty());
}

#[test]
fn missing_magic_number_is_malformed() {
    let txt = b"format ascii 1.0\nend_header\n";
    assert!(matches!(Decoder::new().decode_bytes(txt), Err(PlyError::MalformedHeader(_))));
}

#[test]
fn missing_end_header_is_malformed() {
    let txt = b"ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\n";
    assert!(matches!(Decoder::new().decode_bytes(txt), Err(PlyError::MalformedHeader(_))));
}

#[test]
fn closure_receives_warnings() {
    let txt = b"ply\n\
format ascii 1.0\n\
element vertex 0\n\
property float x\n\
property float y\n\
property float z\n\
element face 2\n\
property list uchar int vertex_indices\n\
end_header\n\
2 0 1\n\
6 0 1 2 3 4 5\n";
    let seen = std::cell::RefCell::new(Vec::new());
    let decoder = Decoder::new().with_diagnostics(|m: &str| seen.borrow_mut().push(m.to_string()));
    let mesh = decoder.decode_bytes(txt).unwrap();
    assert!(mesh.triangles.is_empty());
    drop(decoder);
    let seen = seen.into_inner();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("Face 0 has 2 vertices"), "{}", seen[0]);
}

#[test]
fn mesh_serializes_to_json() {
    let mesh = Decoder::new().decode_bytes(CUBE_FACE).unwrap();
    let json = serde_json::to_value(&mesh).unwrap();
    assert_eq!(json["vertices"][1], serde_json::json!({ "x": 0.0, "y": 0.0, "z": 1.0 }));
    assert_eq!(json["triangles"][1], serde_json::json!([2, 3, 0]));
    assert_eq!(json["has_vertex_colors"], serde_json::json!(false));
    let back: PlyMesh = serde_json::from_value(json).unwrap();
    assert_eq!(back, mesh);
}

#[test]
fn options_from_json() {
    let options: DecodeOptions = serde_json::from_str(r#"{ "lenient_numbers": false }"#).unwrap();
    let decoder = Decoder::new().with_options(options);
    assert!(!decoder.options().lenient_numbers);
    assert!(!decoder.options().validate_indices);
}

#[test]
fn float_color_is_rejected_by_both_encodings() {
    let header = |format: &str| format!("ply\n\
format {} 1.0\n\
element vertex 1\n\
property float x\n\
property float y\n\
property float z\n\
property float red\n\
end_header\n", format);

    let ascii = format!("{}0 0 0 0.5\n", header("ascii"));
    let mut binary = header("binary_little_endian").into_bytes();
    for v in [0.0f32, 0.0, 0.0, 0.5] {
        binary.extend_from_slice(&v.to_le_bytes());
    }
    for bytes in [ascii.as_bytes(), &binary[..]] {
        let err = Decoder::new().decode_bytes(bytes).unwrap_err();
        assert!(matches!(err, PlyError::UnsupportedProperty(_)), "{}", err);
    }
}
