#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = ply_mesh::Decoder::new().with_diagnostics(|_: &str| ());
    if let Ok(mesh) = decoder.decode_bytes(data) {
        assert_eq!(mesh.vertices.len(), mesh.colors.len());
    }
});
