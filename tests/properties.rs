//! End-to-end scenarios and cross-cutting invariants from the hull's
//! design notes, run against the public API rather than any one module.

use dcel_hull::{build_convex_hull, dcel_to_mesh, off, signed_volume, BuildOptions, Dcel, ErrorKind, Point3};

fn edges(dcel: &Dcel) -> usize {
    dcel.in_hull_half_edges().count() / 2
}

fn check_invariants(dcel: &Dcel, points: &[Point3]) {
    assert_eq!(dcel.verify_invariants(), Ok(()));

    let v = dcel.in_hull_vertices().count();
    let e = edges(dcel);
    let f = dcel.in_hull_faces().count();
    assert_eq!(v as isize - e as isize + f as isize, 2, "Euler's formula V - E + F = 2");

    for face in dcel.in_hull_faces() {
        let verts = dcel.face_vertices(face).unwrap();
        let tri = dcel.face_points(face).unwrap();
        for &p in points {
            if verts.iter().any(|&vi| dcel.get_vertex(vi).unwrap().position == p) {
                continue;
            }
            assert!(
                signed_volume(tri[0], tri[1], tri[2], p) <= 1e-9,
                "point {p:?} sees face {face} ({tri:?})"
            );
        }
    }

    for v in dcel.in_hull_vertices() {
        let incident = dcel.get_vertex(v).unwrap().incident_half_edge.expect("in-hull vertex has an incident edge");
        let face = dcel.get_half_edge(incident).unwrap().face.expect("incident edge has a face");
        assert!(dcel.get_face(face).unwrap().in_convex_hull);
    }
}

#[test]
fn scenario_unit_tetrahedron() {
    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(1), max_points: None }).unwrap();
    check_invariants(&dcel, &points);
    assert_eq!(dcel.in_hull_vertices().count(), 4);
    assert_eq!(dcel.in_hull_faces().count(), 4);
    assert_eq!(edges(&dcel), 6);
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

#[test]
fn scenario_unit_cube() {
    let points = cube_points();
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(2), max_points: None }).unwrap();
    check_invariants(&dcel, &points);
    assert_eq!(dcel.in_hull_vertices().count(), 8);
    assert_eq!(dcel.in_hull_faces().count(), 12);
    assert_eq!(edges(&dcel), 18);
}

#[test]
fn scenario_cube_with_interior_point() {
    let mut points = cube_points();
    points.push(Point3::new(0.5, 0.5, 0.5));
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(3), max_points: None }).unwrap();
    check_invariants(&dcel, &points);
    assert_eq!(dcel.in_hull_vertices().count(), 8);
    assert_eq!(dcel.in_hull_faces().count(), 12);
    assert_eq!(edges(&dcel), 18);

    let interior = dcel
        .get_vertex(dcel.vertex_count() - 1)
        .expect("interior point is the last vertex appended");
    assert_eq!(interior.position, Point3::new(0.5, 0.5, 0.5));
    assert!(!interior.in_convex_hull);
}

#[test]
fn scenario_octahedron() {
    let points = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(4), max_points: None }).unwrap();
    check_invariants(&dcel, &points);
    assert_eq!(dcel.in_hull_vertices().count(), 6);
    assert_eq!(dcel.in_hull_faces().count(), 8);
    assert_eq!(edges(&dcel), 12);
}

#[test]
fn scenario_collinear_failure() {
    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    ];
    let result = build_convex_hull(&points, &BuildOptions::default());
    assert_eq!(result.unwrap_err(), ErrorKind::AllCollinear);
}

#[test]
fn scenario_coplanar_failure() {
    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, -1.0, 0.0),
    ];
    let result = build_convex_hull(&points, &BuildOptions::default());
    assert_eq!(result.unwrap_err(), ErrorKind::AllCoplanar);
}

#[test]
fn build_save_load_is_topologically_isomorphic() {
    let points = cube_points();
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(5), max_points: None }).unwrap();

    let mesh = dcel_to_mesh(&dcel);
    let mut buf = Vec::new();
    off::save(&dcel, &mut buf).unwrap();
    let reloaded_mesh = off::load(&String::from_utf8(buf).unwrap()).unwrap();
    assert_eq!(reloaded_mesh, mesh);

    let reloaded_dcel = off::mesh_to_dcel(&reloaded_mesh).unwrap();
    assert_eq!(reloaded_dcel.in_hull_vertices().count(), dcel.in_hull_vertices().count());
    assert_eq!(reloaded_dcel.in_hull_faces().count(), dcel.in_hull_faces().count());
    assert_eq!(edges(&reloaded_dcel), edges(&dcel));
}

#[test]
fn hull_of_hull_vertices_equals_the_original() {
    let mut points = cube_points();
    points.push(Point3::new(0.5, 0.5, 0.5));
    let dcel = build_convex_hull(&points, &BuildOptions { seed: Some(6), max_points: None }).unwrap();

    let hull_points: Vec<Point3> = dcel.in_hull_vertices().map(|v| dcel.get_vertex(v).unwrap().position).collect();
    let rebuilt = build_convex_hull(&hull_points, &BuildOptions { seed: Some(6), max_points: None }).unwrap();

    assert_eq!(rebuilt.in_hull_vertices().count(), dcel.in_hull_vertices().count());
    assert_eq!(rebuilt.in_hull_faces().count(), dcel.in_hull_faces().count());
    assert_eq!(edges(&rebuilt), edges(&dcel));
}

#[test]
fn already_convex_input_reproduces_its_own_connectivity() {
    let points = cube_points();
    let a = build_convex_hull(&points, &BuildOptions { seed: Some(11), max_points: None }).unwrap();
    let b = build_convex_hull(&points, &BuildOptions { seed: Some(11), max_points: None }).unwrap();
    assert_eq!(a.in_hull_vertices().count(), b.in_hull_vertices().count());
    assert_eq!(a.in_hull_faces().count(), b.in_hull_faces().count());
    assert_eq!(edges(&a), edges(&b));
}
