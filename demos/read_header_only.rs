use std::fs::File;
use std::io::BufReader;

use ply_mesh::Decoder;

fn main() {
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: read_header_only <file.ply>");
        std::process::exit(2);
    });
    let file = File::open(&path).unwrap_or_else(|e| panic!("Could not open {}: {}", path, e));
    let mut reader = BufReader::new(file);
    let header = Decoder::new()
        .read_header(&mut reader)
        .unwrap_or_else(|e| panic!("Could not read header of {}: {}", path, e));

    println!("format: {} {}", header.format, header.version);
    for c in &header.comments {
        println!("comment: {}", c);
    }
    for (name, element) in &header.elements {
        println!("element {} ({} records)", name, element.count);
        for p in element.properties.values() {
            println!("  {} {}", p.data_type, p.name);
        }
    }
    println!(
        "vertex columns x/y/z: {}/{}/{}, colors: {:?}",
        header.x_index, header.y_index, header.z_index, header.color_indices()
    );
    println!("payload starts at byte {}", header.byte_len());
}
