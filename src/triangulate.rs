//! Polygon to triangle normalization.

/// Splits the quad `(a, b, c, d)` into `(a, b, c)` and `(c, d, a)`.
///
/// The diagonal is always `a`-`c`; vertex positions are not consulted, so the
/// split is the same for every file and both payload encodings.
pub fn quad_to_triangles(quad: [u32; 4]) -> [[u32; 3]; 2] {
    let [a, b, c, d] = quad;
    [[a, b, c], [c, d, a]]
}
