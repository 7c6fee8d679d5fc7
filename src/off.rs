//! OFF (Object File Format) triangle-mesh I/O: a minimal text format for
//! reading a point/triangle soup in and writing a built hull back out.
//!
//! Format: a line containing exactly `OFF`, then a line `<nv> <nf> <ne>`,
//! then `nv` vertex lines of three floats, then `nf` face lines of the form
//! `3 i0 i1 i2` (only pure triangle meshes are accepted — the leading `3` is
//! checked, not assumed).

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::dcel::Dcel;
use crate::error::ErrorKind;
use crate::geometry::Point3;

/// A plain triangle mesh: positions plus vertex-index triples, with none of
/// the DCEL's topology bookkeeping. The interchange type between
/// [`load`]/[`save`] and a [`Dcel`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions, in file order.
    pub vertices: Vec<Point3>,
    /// Triangles as vertex-index triples into `vertices`.
    pub triangles: Vec<[usize; 3]>,
}

fn malformed(msg: impl Into<String>) -> ErrorKind {
    ErrorKind::MalformedInput(msg.into())
}

/// Parses an OFF document into a [`Mesh`].
///
/// # Errors
/// Returns [`ErrorKind::MalformedInput`] if the header is missing, the
/// counts line is malformed, a vertex or face line can't be parsed, a face
/// isn't a triangle, or a face references an out-of-range vertex.
pub fn load(input: &str) -> Result<Mesh, ErrorKind> {
    let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#'));

    let header = lines.next().ok_or_else(|| malformed("empty input"))?;
    if header != "OFF" {
        return Err(malformed(format!("expected \"OFF\" header, found {header:?}")));
    }

    let counts_line = lines.next().ok_or_else(|| malformed("missing vertex/face/edge counts line"))?;
    let mut counts = counts_line.split_whitespace();
    let nv: usize = counts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed("missing vertex count"))?;
    let nf: usize = counts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed("missing face count"))?;
    // Edge count is part of the format but never checked against the parsed
    // data; OFF writers routinely emit 0 here.
    let _ne: usize = counts.next().and_then(|s| s.parse().ok()).unwrap_or(0);

    let mut vertices = Vec::with_capacity(nv);
    for _ in 0..nv {
        let line = lines.next().ok_or_else(|| malformed("fewer vertex lines than the header promised"))?;
        let mut coords = line.split_whitespace();
        let parse_next = |coords: &mut std::str::SplitWhitespace<'_>| {
            coords.next().and_then(|s| s.parse::<f64>().ok())
        };
        let x = parse_next(&mut coords).ok_or_else(|| malformed(format!("bad vertex line: {line:?}")))?;
        let y = parse_next(&mut coords).ok_or_else(|| malformed(format!("bad vertex line: {line:?}")))?;
        let z = parse_next(&mut coords).ok_or_else(|| malformed(format!("bad vertex line: {line:?}")))?;
        vertices.push(Point3::new(x, y, z));
    }

    let mut triangles = Vec::with_capacity(nf);
    for _ in 0..nf {
        let line = lines.next().ok_or_else(|| malformed("fewer face lines than the header promised"))?;
        let mut fields = line.split_whitespace();
        let valence: usize = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed(format!("bad face line: {line:?}")))?;
        if valence != 3 {
            return Err(malformed(format!("face with {valence} vertices is not a triangle: {line:?}")));
        }
        let mut tri = [0usize; 3];
        for slot in &mut tri {
            *slot = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| malformed(format!("bad face line: {line:?}")))?;
        }
        for &i in &tri {
            if i >= nv {
                return Err(malformed(format!("face references out-of-range vertex {i}")));
            }
        }
        triangles.push(tri);
    }

    debug!(nv, nf, "parsed OFF document");
    Ok(Mesh { vertices, triangles })
}

/// Writes the hull boundary of `dcel` to `writer` as an OFF document.
///
/// Only in-hull vertices and faces are written; vertex indices are remapped
/// to be contiguous, via [`dcel_to_mesh`].
///
/// # Errors
/// Propagates any I/O error from `writer`.
pub fn save(dcel: &Dcel, writer: &mut impl std::io::Write) -> std::io::Result<()> {
    write!(writer, "{}", mesh_to_off_string(&dcel_to_mesh(dcel)))
}

fn mesh_to_off_string(mesh: &Mesh) -> String {
    let mut out = String::new();
    writeln!(out, "OFF").unwrap();
    writeln!(out, "{} {} 0", mesh.vertices.len(), mesh.triangles.len()).unwrap();
    for v in &mesh.vertices {
        writeln!(out, "{} {} {}", v.x, v.y, v.z).unwrap();
    }
    for tri in &mesh.triangles {
        writeln!(out, "3 {} {} {}", tri[0], tri[1], tri[2]).unwrap();
    }
    out
}

/// Converts a built [`Dcel`] to a [`Mesh`], keeping only in-hull vertices
/// and faces and remapping vertex indices to be contiguous.
#[must_use]
pub fn dcel_to_mesh(dcel: &Dcel) -> Mesh {
    let mut remap = HashMap::new();
    let mut vertices = Vec::new();
    for v in dcel.in_hull_vertices() {
        remap.insert(v, vertices.len());
        vertices.push(dcel.get_vertex(v).expect("index from in_hull_vertices").position);
    }

    let mut triangles = Vec::new();
    for f in dcel.in_hull_faces() {
        if let Some([a, b, c]) = dcel.face_vertices(f) {
            triangles.push([remap[&a], remap[&b], remap[&c]]);
        }
    }

    Mesh { vertices, triangles }
}

/// Rebuilds a [`Dcel`] directly from a triangle soup, without running the
/// hull algorithm: every triangle becomes a face as-is, and twins are
/// resolved by matching each half-edge's reversed endpoints against a
/// per-vertex table of outgoing half-edges still awaiting a twin.
///
/// This does not check convexity; it trusts `mesh` to already describe a
/// closed, consistently-wound triangle mesh (as `save` produces). Use
/// [`crate::builder::build_convex_hull`] on `mesh.vertices` instead if the
/// input isn't already a valid hull boundary.
///
/// # Errors
/// Returns [`ErrorKind::MalformedInput`] if a half-edge is left without a
/// matching twin, meaning the mesh isn't closed/oriented consistently.
pub fn mesh_to_dcel(mesh: &Mesh) -> Result<Dcel, ErrorKind> {
    let mut dcel = Dcel::new();
    for p in &mesh.vertices {
        let v = dcel.add_vertex(*p);
        dcel.set_vertex_in_convex_hull(v, true);
    }

    // Pending outgoing half-edges per origin vertex, awaiting a twin whose
    // endpoints run the other way. Mirrors the source engine's per-vertex
    // pending-twin table built while reading an OFF file.
    let mut pending: HashMap<usize, Vec<usize>> = HashMap::new();

    for tri in &mesh.triangles {
        let [v0, v1, v2] = *tri;
        let h0 = dcel.add_half_edge(v0, v1);
        let h1 = dcel.add_half_edge(v1, v2);
        let h2 = dcel.add_half_edge(v2, v0);
        dcel.set_half_edge_next(h0, h1);
        dcel.set_half_edge_next(h1, h2);
        dcel.set_half_edge_next(h2, h0);
        dcel.set_half_edge_prev(h1, h0);
        dcel.set_half_edge_prev(h2, h1);
        dcel.set_half_edge_prev(h0, h2);

        let f = dcel.add_face(h0);
        dcel.set_face_in_convex_hull(f, true);
        for h in [h0, h1, h2] {
            dcel.set_half_edge_face(h, f);
            dcel.set_half_edge_in_convex_hull(h, true);
        }

        dcel.set_vertex_incident(v0, h0);
        dcel.set_vertex_incident(v1, h1);
        dcel.set_vertex_incident(v2, h2);

        for h in [h0, h1, h2] {
            let he = dcel.get_half_edge(h).expect("half-edge just created");
            if let Some(slot) = pending.get_mut(&he.to_vertex).and_then(|bucket| {
                let pos = bucket.iter().position(|&cand| {
                    dcel.get_half_edge(cand).is_some_and(|c| c.to_vertex == he.from_vertex)
                });
                pos.map(|i| bucket.remove(i))
            }) {
                dcel.set_half_edge_twin(h, slot);
                dcel.set_half_edge_twin(slot, h);
            } else {
                pending.entry(he.from_vertex).or_default().push(h);
            }
        }
    }

    let unmatched: usize = pending.values().map(Vec::len).sum();
    if unmatched > 0 {
        return Err(malformed(format!("{unmatched} half-edge(s) have no matching twin; mesh is not closed")));
    }

    Ok(dcel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron_mesh() -> Mesh {
        Mesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            triangles: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let mesh = tetrahedron_mesh();
        let dcel = mesh_to_dcel(&mesh).unwrap();
        let mut buf = Vec::new();
        save(&dcel, &mut buf).unwrap();
        let parsed = load(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(parsed, mesh);
    }

    #[test]
    fn mesh_to_off_string_matches_load() {
        let mesh = tetrahedron_mesh();
        let text = mesh_to_off_string(&mesh);
        let parsed = load(&text).unwrap();
        assert_eq!(parsed, mesh);
    }

    #[test]
    fn load_rejects_missing_header() {
        assert!(matches!(load("4 4 0\n"), Err(ErrorKind::MalformedInput(_))));
    }

    #[test]
    fn load_rejects_non_triangle_face() {
        let text = "OFF\n4 1 0\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n4 0 1 2 3\n";
        assert!(matches!(load(text), Err(ErrorKind::MalformedInput(_))));
    }

    #[test]
    fn load_rejects_out_of_range_vertex() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 5\n";
        assert!(matches!(load(text), Err(ErrorKind::MalformedInput(_))));
    }

    #[test]
    fn mesh_to_dcel_resolves_twins_and_passes_invariants() {
        let mesh = tetrahedron_mesh();
        let dcel = mesh_to_dcel(&mesh).unwrap();
        assert_eq!(dcel.verify_invariants(), Ok(()));
        assert_eq!(dcel.in_hull_faces().count(), 4);
    }

    #[test]
    fn mesh_to_dcel_rejects_open_mesh() {
        let mesh = Mesh {
            vertices: tetrahedron_mesh().vertices,
            triangles: vec![[0, 2, 1]],
        };
        assert!(matches!(mesh_to_dcel(&mesh), Err(ErrorKind::MalformedInput(_))));
    }

    #[test]
    fn dcel_to_mesh_round_trips_through_builder() {
        let pts = tetrahedron_mesh().vertices;
        let dcel = crate::builder::build_convex_hull(
            &pts,
            &crate::builder::BuildOptions { seed: Some(1), max_points: None },
        )
        .unwrap();
        let mesh = dcel_to_mesh(&dcel);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangles.len(), 4);

        let reloaded = mesh_to_dcel(&mesh).unwrap();
        assert_eq!(reloaded.verify_invariants(), Ok(()));
    }
}
