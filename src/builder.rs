//! The randomized incremental hull builder: §4.4 of the design — seed a
//! tetrahedron, populate the conflict graph, then process the remaining
//! points in shuffled order, replacing every face a point sees with a fan
//! of new faces stitched along the horizon.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::conflict_graph::ConflictGraph;
use crate::dcel::Dcel;
use crate::error::ErrorKind;
use crate::geometry::{collinear3d, signed_volume, Point3, Vector3};

/// Configuration for [`build_convex_hull`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Seed for the PRNG used to shuffle the input. `None` draws a seed
    /// from the OS entropy source, matching the original's clock-seeded
    /// behavior but without its global-state liability (see SPEC_FULL.md
    /// REDESIGN FLAGS). Tests and the fuzz target always pass a fixed seed.
    pub seed: Option<u64>,
    /// Caps the number of outstanding points processed, leaving the rest
    /// unassigned. Mirrors the teacher library's `max_iter`; useful for
    /// profiling and for fuzzing partial builds.
    pub max_points: Option<usize>,
}

/// Builds the 3D convex hull of `points` as a [`Dcel`].
///
/// # Errors
/// Returns [`ErrorKind::InsufficientPoints`] if fewer than four points are
/// given, [`ErrorKind::AllCollinear`] if no three points are non-collinear,
/// [`ErrorKind::AllCoplanar`] if no fourth point is non-coplanar with the
/// first three chosen, and [`ErrorKind::TopologyInvariantViolation`] if an
/// internal bug causes the horizon to fail to close (never expected on
/// valid input).
pub fn build_convex_hull(points: &[Point3], options: &BuildOptions) -> Result<Dcel, ErrorKind> {
    let n = points.len();
    if n < 4 {
        return Err(ErrorKind::InsufficientPoints);
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut pts = points.to_vec();
    pts.shuffle(&mut rng);
    debug!(n, seeded = options.seed.is_some(), "shuffled input points");

    seed_positions(&mut pts)?;

    let mut dcel = Dcel::new();
    let mut graph = ConflictGraph::new();

    let faces = seed_tetrahedron(&mut dcel, &pts);
    debug!(faces = ?faces, "seeded tetrahedron");
    for f in faces {
        graph.add_face_node(f);
    }

    let limit = options.max_points.map_or(n, |cap| cap.min(n));

    for p in 4..limit {
        graph.add_point_node(p);
        for f in faces {
            if is_face_visible(&dcel, f, pts[p]) {
                graph.link(f, p);
            }
        }
    }

    for p in 4..limit {
        let visible = graph.visible_faces(p);
        if visible.is_empty() {
            trace!(p, "point is interior; left out of the hull");
            continue;
        }
        insert_point(&mut dcel, &mut graph, &pts, p, &visible)?;

        #[cfg(feature = "instrumented")]
        dcel.verify_invariants()?;
    }

    dcel.compute_face_normals();
    debug!(
        vertices = dcel.in_hull_vertices().count(),
        faces = dcel.in_hull_faces().count(),
        "hull construction finished"
    );
    Ok(dcel)
}

/// Reorders `pts` in place so `pts[0..4]` are four affinely independent
/// points, per §4.4 phase 1. The rest of the slice is otherwise untouched
/// (beyond the swaps needed to bring the four chosen points to the front).
fn seed_positions(pts: &mut [Point3]) -> Result<(), ErrorKind> {
    let n = pts.len();

    let idx1 = (1..n).find(|&k| pts[k] != pts[0]).ok_or(ErrorKind::AllCollinear)?;
    pts.swap(1, idx1);

    let idx2 = (2..n)
        .find(|&k| collinear3d(pts[0], pts[1], pts[k]) != Vector3::ZERO)
        .ok_or(ErrorKind::AllCollinear)?;
    pts.swap(2, idx2);

    let idx3 = (3..n)
        .find(|&k| signed_volume(pts[0], pts[1], pts[2], pts[k]) != 0.0)
        .ok_or(ErrorKind::AllCoplanar)?;
    pts.swap(3, idx3);

    Ok(())
}

/// Builds the seed tetrahedron from `pts[0..4]`, orienting every face
/// outward, and returns its four face indices.
fn seed_tetrahedron(dcel: &mut Dcel, pts: &[Point3]) -> [usize; 4] {
    // If the fourth point sees (p0,p1,p2) from the front, the tetrahedron
    // built in that order would wind inward; swap p1/p2 so the outward
    // normal convention (positive signed_volume = visible) holds for every
    // seed face, same as the source engine's `create_tethraedron` call.
    let vol = signed_volume(pts[0], pts[1], pts[2], pts[3]);
    let (p0, p1, p2, p3) = if vol > 0.0 {
        (pts[0], pts[2], pts[1], pts[3])
    } else {
        (pts[0], pts[1], pts[2], pts[3])
    };

    let v0 = dcel.add_vertex(p0);
    let v1 = dcel.add_vertex(p1);
    let v2 = dcel.add_vertex(p2);
    let v3 = dcel.add_vertex(p3);
    for v in [v0, v1, v2, v3] {
        dcel.set_vertex_in_convex_hull(v, true);
    }

    let mk = |dcel: &mut Dcel, from, to| dcel.add_half_edge(from, to);
    let h0 = mk(dcel, v2, v1);
    let h1 = mk(dcel, v1, v2);
    dcel.set_half_edge_twin(h0, h1);
    dcel.set_half_edge_twin(h1, h0);

    let h2 = mk(dcel, v2, v0);
    let h3 = mk(dcel, v0, v2);
    dcel.set_half_edge_twin(h2, h3);
    dcel.set_half_edge_twin(h3, h2);

    let h4 = mk(dcel, v2, v3);
    let h5 = mk(dcel, v3, v2);
    dcel.set_half_edge_twin(h4, h5);
    dcel.set_half_edge_twin(h5, h4);

    let h6 = mk(dcel, v1, v0);
    let h7 = mk(dcel, v0, v1);
    dcel.set_half_edge_twin(h6, h7);
    dcel.set_half_edge_twin(h7, h6);

    let h8 = mk(dcel, v1, v3);
    let h9 = mk(dcel, v3, v1);
    dcel.set_half_edge_twin(h8, h9);
    dcel.set_half_edge_twin(h9, h8);

    let h10 = mk(dcel, v0, v3);
    let h11 = mk(dcel, v3, v0);
    dcel.set_half_edge_twin(h10, h11);
    dcel.set_half_edge_twin(h11, h10);

    wire_triangle(dcel, h0, h8, h5);
    wire_triangle(dcel, h1, h2, h7);
    wire_triangle(dcel, h6, h10, h9);
    wire_triangle(dcel, h4, h11, h3);

    let f0 = dcel.add_face(h0);
    let f1 = dcel.add_face(h1);
    let f2 = dcel.add_face(h6);
    let f3 = dcel.add_face(h4);

    for (f, [a, b, c]) in [(f0, [h0, h8, h5]), (f1, [h1, h2, h7]), (f2, [h6, h10, h9]), (f3, [h4, h11, h3])] {
        dcel.set_face_in_convex_hull(f, true);
        for h in [a, b, c] {
            dcel.set_half_edge_face(h, f);
            dcel.set_half_edge_in_convex_hull(h, true);
        }
    }

    dcel.set_vertex_incident(v0, h3);
    dcel.set_vertex_incident(v1, h1);
    dcel.set_vertex_incident(v2, h0);
    dcel.set_vertex_incident(v3, h5);

    [f0, f1, f2, f3]
}

/// Wires `a -> b -> c -> a` as both `next` and `prev` links.
fn wire_triangle(dcel: &mut Dcel, a: usize, b: usize, c: usize) {
    dcel.set_half_edge_next(a, b);
    dcel.set_half_edge_next(b, c);
    dcel.set_half_edge_next(c, a);
    dcel.set_half_edge_prev(b, a);
    dcel.set_half_edge_prev(c, b);
    dcel.set_half_edge_prev(a, c);
}

fn is_face_visible(dcel: &Dcel, f: usize, point: Point3) -> bool {
    match dcel.face_points(f) {
        Some([a, b, c]) => signed_volume(a, b, c, point) > 0.0,
        None => false,
    }
}

fn violation(msg: impl Into<String>) -> ErrorKind {
    ErrorKind::TopologyInvariantViolation(msg.into())
}

/// Promotes outstanding point `p` (seeing faces `visible`) to a hull
/// vertex: removes the faces it sees, computes the horizon, and stitches a
/// fan of new faces around it. §4.4 phase 3.
fn insert_point(
    dcel: &mut Dcel,
    graph: &mut ConflictGraph,
    pts: &[Point3],
    p: usize,
    visible: &[usize],
) -> Result<(), ErrorKind> {
    let new_v = dcel.add_vertex(pts[p]);
    dcel.set_vertex_in_convex_hull(new_v, true);

    let visible_set: BTreeSet<usize> = visible.iter().copied().collect();

    let mut horizon_edges = Vec::new();
    let mut candidates_to_hide: BTreeSet<usize> = BTreeSet::new();
    let mut horizon_vertices: BTreeSet<usize> = BTreeSet::new();

    for &f in visible {
        let hes = dcel
            .face_half_edges(f)
            .ok_or_else(|| violation(format!("face {f} has no well-formed triangle of half-edges")))?;
        for h in hes {
            let he = dcel
                .get_half_edge(h)
                .ok_or_else(|| violation(format!("half-edge {h} went missing during horizon scan")))?;
            candidates_to_hide.insert(he.from_vertex);

            let twin = he.twin.ok_or_else(|| violation(format!("half-edge {h} has no twin")))?;
            let twin_face = dcel
                .get_half_edge(twin)
                .and_then(|t| t.face)
                .ok_or_else(|| violation(format!("twin of half-edge {h} has no face")))?;

            if visible_set.contains(&twin_face) {
                dcel.set_half_edge_in_convex_hull(h, false);
            } else {
                horizon_edges.push(h);
                horizon_vertices.insert(he.from_vertex);
                horizon_vertices.insert(he.to_vertex);
            }
        }
    }

    for &f in visible {
        dcel.set_face_in_convex_hull(f, false);
    }
    for v in &candidates_to_hide {
        if !horizon_vertices.contains(v) {
            dcel.set_vertex_in_convex_hull(*v, false);
        }
    }

    trace!(p, new_v, horizon_len = horizon_edges.len(), visible = visible.len(), "promoting point to hull vertex");

    let mut needs_twin = Vec::with_capacity(horizon_edges.len() * 2);
    let mut incident_for_new_v = None;

    for h in horizon_edges {
        let he = dcel.get_half_edge(h).expect("just read above");
        let f_old = he.face.ok_or_else(|| violation(format!("horizon edge {h} has no face")))?;
        let twin = he.twin.ok_or_else(|| violation(format!("horizon edge {h} has no twin")))?;
        let f_twin = dcel
            .get_half_edge(twin)
            .and_then(|t| t.face)
            .ok_or_else(|| violation(format!("twin of horizon edge {h} has no face")))?;

        let mut candidate_points: BTreeSet<usize> = graph.visible_points(f_old).into_iter().collect();
        candidate_points.extend(graph.visible_points(f_twin));
        candidate_points.remove(&p);

        let h1 = dcel.add_half_edge(he.to_vertex, new_v);
        let h2 = dcel.add_half_edge(new_v, he.from_vertex);
        wire_triangle(dcel, h, h1, h2);

        let f_new = dcel.add_face(h);
        dcel.set_face_in_convex_hull(f_new, true);
        for he_id in [h, h1, h2] {
            dcel.set_half_edge_face(he_id, f_new);
        }
        dcel.set_half_edge_in_convex_hull(h1, true);
        dcel.set_half_edge_in_convex_hull(h2, true);

        // h's endpoints may have had their old incident half-edge hidden along
        // with an interior face; repoint them at edges of the new fan triangle
        // so every surviving vertex's incident_half_edge stays live.
        dcel.set_vertex_incident(he.from_vertex, h);
        dcel.set_vertex_incident(he.to_vertex, h1);

        graph.add_face_node(f_new);
        for q in candidate_points {
            if is_face_visible(dcel, f_new, pts[q]) {
                graph.link(f_new, q);
            }
        }

        incident_for_new_v.get_or_insert(h2);
        needs_twin.push(h1);
        needs_twin.push(h2);
    }

    if let Some(he) = incident_for_new_v {
        dcel.set_vertex_incident(new_v, he);
    }

    stitch_fan_twins(dcel, needs_twin, new_v)?;

    for &f in visible {
        graph.remove_face_node(f);
    }
    graph.remove_point_node(p);

    Ok(())
}

/// Pairs up every new half-edge created around `new_v`'s fan with its
/// reversed-endpoint sibling and links them as twins. The fan must be a
/// closed cycle around `new_v`, so every interior edge appears exactly
/// twice in `bag`; a half-edge left without a partner means the horizon
/// failed to close.
fn stitch_fan_twins(dcel: &mut Dcel, mut bag: Vec<usize>, new_v: usize) -> Result<(), ErrorKind> {
    while !bag.is_empty() {
        let h_a = bag.remove(0);
        let a = dcel.get_half_edge(h_a).expect("half-edge just created");

        let partner = bag.iter().position(|&h_b| {
            let b = dcel.get_half_edge(h_b).expect("half-edge just created");
            a.from_vertex == b.to_vertex && a.to_vertex == b.from_vertex
        });

        let i = partner.ok_or_else(|| {
            warn!(new_v, h_a, "horizon fan failed to close");
            violation(format!("horizon fan around vertex {new_v} did not close: half-edge {h_a} has no twin"))
        })?;
        let h_b = bag.remove(i);

        dcel.set_half_edge_twin(h_a, h_b);
        dcel.set_half_edge_twin(h_b, h_a);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> BuildOptions {
        BuildOptions { seed: Some(seed), max_points: None }
    }

    #[test]
    fn tetrahedron_scenario() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let dcel = build_convex_hull(&pts, &seeded(1)).unwrap();
        assert_eq!(dcel.verify_invariants(), Ok(()));
        assert_eq!(dcel.in_hull_vertices().count(), 4);
        assert_eq!(dcel.in_hull_faces().count(), 4);
        assert_eq!(dcel.in_hull_half_edges().count() / 2, 6);
    }

    #[test]
    fn cube_scenario() {
        let pts = cube_points();
        let dcel = build_convex_hull(&pts, &seeded(42)).unwrap();
        assert_eq!(dcel.verify_invariants(), Ok(()));
        assert_eq!(dcel.in_hull_vertices().count(), 8);
        assert_eq!(dcel.in_hull_faces().count(), 12);
        assert_eq!(dcel.in_hull_half_edges().count() / 2, 18);
    }

    #[test]
    fn cube_with_interior_point_is_excluded() {
        let mut pts = cube_points();
        pts.push(Point3::new(0.5, 0.5, 0.5));
        let dcel = build_convex_hull(&pts, &seeded(7)).unwrap();
        assert_eq!(dcel.in_hull_vertices().count(), 8);
        assert_eq!(dcel.in_hull_faces().count(), 12);

        let interior_is_hidden = (0..dcel.vertex_count())
            .filter_map(|v| dcel.get_vertex(v))
            .any(|v| v.position == Point3::new(0.5, 0.5, 0.5) && !v.in_convex_hull);
        assert!(interior_is_hidden);
    }

    #[test]
    fn octahedron_scenario() {
        let pts = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let dcel = build_convex_hull(&pts, &seeded(3)).unwrap();
        assert_eq!(dcel.verify_invariants(), Ok(()));
        assert_eq!(dcel.in_hull_vertices().count(), 6);
        assert_eq!(dcel.in_hull_faces().count(), 8);
        assert_eq!(dcel.in_hull_half_edges().count() / 2, 12);
    }

    #[test]
    fn all_collinear_is_rejected() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        assert_eq!(build_convex_hull(&pts, &seeded(1)).unwrap_err(), ErrorKind::AllCollinear);
    }

    #[test]
    fn all_coplanar_is_rejected() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(build_convex_hull(&pts, &seeded(1)).unwrap_err(), ErrorKind::AllCoplanar);
    }

    #[test]
    fn insufficient_points_is_rejected() {
        let pts = [Point3::ZERO, Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert_eq!(build_convex_hull(&pts, &BuildOptions::default()).unwrap_err(), ErrorKind::InsufficientPoints);
    }

    #[test]
    fn build_is_deterministic_for_a_fixed_seed() {
        let pts = sphere_points(12);
        let a = build_convex_hull(&pts, &seeded(99)).unwrap();
        let b = build_convex_hull(&pts, &seeded(99)).unwrap();
        assert_eq!(a.in_hull_vertices().count(), b.in_hull_vertices().count());
        assert_eq!(a.in_hull_faces().count(), b.in_hull_faces().count());
    }

    #[test]
    fn convexity_holds_against_every_input_point() {
        let pts = sphere_points(10);
        let dcel = build_convex_hull(&pts, &seeded(5)).unwrap();
        for f in dcel.in_hull_faces() {
            let [a, b, c] = dcel.face_points(f).unwrap();
            for &p in &pts {
                if p == a || p == b || p == c {
                    continue;
                }
                assert!(signed_volume(a, b, c, p) <= 1e-9, "point {p:?} sees face {f}");
            }
        }
    }

    fn cube_points() -> Vec<Point3> {
        let mut pts = Vec::with_capacity(8);
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    pts.push(Point3::new(x, y, z));
                }
            }
        }
        pts
    }

    fn sphere_points(divisions: usize) -> Vec<Point3> {
        let mut pts = Vec::with_capacity(divisions * divisions);
        for i in 0..divisions {
            let theta = std::f64::consts::PI * (i as f64) / (divisions as f64 - 1.0);
            for j in 0..divisions {
                let phi = 2.0 * std::f64::consts::PI * (j as f64) / divisions as f64;
                pts.push(Point3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                ));
            }
        }
        pts
    }
}
