use ply_mesh::{ Decoder, PlyMesh };

fn print_mesh(mesh: &PlyMesh) {
    println!("Vertices:");
    for (i, (p, c)) in mesh.vertices.iter().zip(&mesh.colors).enumerate() {
        if mesh.has_vertex_colors {
            println!("  {}: [{:.3}, {:.3}, {:.3}] rgba({:.2}, {:.2}, {:.2}, {:.2})", i, p.x, p.y, p.z, c.r, c.g, c.b, c.a);
        } else {
            println!("  {}: [{:.3}, {:.3}, {:.3}]", i, p.x, p.y, p.z);
        }
    }
    println!("Triangles:");
    for (i, t) in mesh.triangles.iter().enumerate() {
        println!("  {}: [{}, {}, {}]", i, t[0], t[1], t[2]);
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("usage: decode_mesh <file.ply> [--json]");
            std::process::exit(2);
        }
    };
    let json = args.any(|a| a == "--json");

    let mesh = Decoder::new()
        .decode_file(&path)
        .unwrap_or_else(|e| panic!("Could not decode PLY file {}: {}", path, e));

    if json {
        println!("{}", serde_json::to_string_pretty(&mesh).expect("mesh serializes"));
    } else {
        print_mesh(&mesh);
    }
}
