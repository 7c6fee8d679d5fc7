//! The Doubly-Connected Edge List (DCEL) topology store.
//!
//! The store is a typed record of indices into three parallel, append-mostly
//! lists — it enforces none of the topological invariants itself. All of the
//! twin/next/prev/face bookkeeping is the hull builder's responsibility,
//! performed through the setters below. `get_*` return owned copies:
//! mutating a returned [`Vertex`]/[`HalfEdge`]/[`Face`] never mutates the
//! store, by design, so callers are forced through the indexed setters.

use crate::error::ErrorKind;
use crate::geometry::{Point3, Vector3};

/// A vertex in the DCEL: its position, one incident half-edge, an optional
/// shading normal, and whether it currently belongs to the hull boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The vertex's position in space.
    pub position: Point3,
    /// Index of one half-edge whose `from_vertex` is this vertex, if any.
    pub incident_half_edge: Option<usize>,
    /// Unit shading normal, computed lazily and only on request.
    pub normal: Option<Vector3>,
    /// Whether this vertex currently belongs to the hull boundary.
    pub in_convex_hull: bool,
    /// Degree-like counter not exercised by the hull core itself; retained
    /// for compatibility with callers (e.g. a mesh editor) that maintain it.
    pub cardinality: u32,
}

impl Vertex {
    fn new(position: Point3) -> Self {
        Self {
            position,
            incident_half_edge: None,
            normal: None,
            in_convex_hull: false,
            cardinality: 0,
        }
    }
}

/// A directed half-edge: its endpoints and its twin/next/prev/face links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub from_vertex: usize,
    /// The vertex this half-edge points to.
    pub to_vertex: usize,
    /// The oppositely-directed half-edge sharing the same undirected edge.
    pub twin: Option<usize>,
    /// The next half-edge around this half-edge's face.
    pub next: Option<usize>,
    /// The previous half-edge around this half-edge's face.
    pub prev: Option<usize>,
    /// The face this half-edge bounds.
    pub face: Option<usize>,
    /// Whether this half-edge currently belongs to the hull boundary.
    pub in_convex_hull: bool,
}

impl HalfEdge {
    fn new(from_vertex: usize, to_vertex: usize) -> Self {
        Self {
            from_vertex,
            to_vertex,
            twin: None,
            next: None,
            prev: None,
            face: None,
            in_convex_hull: false,
        }
    }
}

/// A triangular face, identified by one of its bounding half-edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// A half-edge on the inner (bounded) side of the face.
    pub inner_half_edge: Option<usize>,
    /// A half-edge on the outer side of the face; unused by the hull
    /// builder itself, retained because the DCEL's broader contract (per
    /// the original mesh-editing store this crate's layout is based on)
    /// allows faces with holes to record an outer boundary too.
    pub outer_half_edge: Option<usize>,
    /// Unit outward normal, computed lazily on [`Dcel::compute_face_normals`].
    pub normal: Option<Vector3>,
    /// Whether this face currently belongs to the hull boundary.
    pub in_convex_hull: bool,
}

impl Face {
    fn new(inner_half_edge: usize) -> Self {
        Self {
            inner_half_edge: Some(inner_half_edge),
            outer_half_edge: None,
            normal: None,
            in_convex_hull: false,
        }
    }
}

/// The DCEL topology store: three parallel indexed collections of
/// [`Vertex`], [`HalfEdge`], and [`Face`].
///
/// Indices are stable for the lifetime of the store: "deletion" only ever
/// flips `in_convex_hull` to `false`, it never removes an element, since the
/// conflict graph holds these indices and must never see one reused.
#[derive(Debug, Clone, Default)]
pub struct Dcel {
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face>,
}

impl Dcel {
    /// Creates an empty DCEL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- append ---

    /// Appends a new vertex at `position` and returns its index.
    pub fn add_vertex(&mut self, position: Point3) -> usize {
        self.vertices.push(Vertex::new(position));
        self.vertices.len() - 1
    }

    /// Appends a new half-edge from `from` to `to` and returns its index.
    /// `twin`/`next`/`prev`/`face` start unset.
    pub fn add_half_edge(&mut self, from: usize, to: usize) -> usize {
        self.half_edges.push(HalfEdge::new(from, to));
        self.half_edges.len() - 1
    }

    /// Appends a new face whose inner half-edge is `inner_half_edge` and
    /// returns its index.
    pub fn add_face(&mut self, inner_half_edge: usize) -> usize {
        self.faces.push(Face::new(inner_half_edge));
        self.faces.len() - 1
    }

    // --- reads ---

    /// Returns the number of vertices ever appended (including hidden ones).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of half-edges ever appended (including hidden ones).
    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Returns the number of faces ever appended (including hidden ones).
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns a copy of vertex `i`, or `None` if out of range.
    #[must_use]
    pub fn get_vertex(&self, i: usize) -> Option<Vertex> {
        self.vertices.get(i).cloned()
    }

    /// Returns a copy of half-edge `i`, or `None` if out of range.
    #[must_use]
    pub fn get_half_edge(&self, i: usize) -> Option<HalfEdge> {
        self.half_edges.get(i).copied()
    }

    /// Returns a copy of face `i`, or `None` if out of range.
    #[must_use]
    pub fn get_face(&self, i: usize) -> Option<Face> {
        self.faces.get(i).copied()
    }

    /// Iterates the indices of vertices currently flagged in-hull.
    pub fn in_hull_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.in_convex_hull)
            .map(|(i, _)| i)
    }

    /// Iterates the indices of half-edges currently flagged in-hull.
    pub fn in_hull_half_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.half_edges
            .iter()
            .enumerate()
            .filter(|(_, h)| h.in_convex_hull)
            .map(|(i, _)| i)
    }

    /// Iterates the indices of faces currently flagged in-hull.
    pub fn in_hull_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.in_convex_hull)
            .map(|(i, _)| i)
    }

    /// Returns the three vertex indices of face `f`, obtained by walking
    /// `next` around its `inner_half_edge`, or `None` if `f` is out of range
    /// or its inner half-edge chain isn't a triangle.
    #[must_use]
    pub fn face_vertices(&self, f: usize) -> Option<[usize; 3]> {
        let face = self.faces.get(f)?;
        let h0 = face.inner_half_edge?;
        let he0 = self.half_edges.get(h0)?;
        let h1 = he0.next?;
        let he1 = self.half_edges.get(h1)?;
        let h2 = he1.next?;
        let he2 = self.half_edges.get(h2)?;
        if he2.next != Some(h0) {
            return None;
        }
        Some([he0.from_vertex, he1.from_vertex, he2.from_vertex])
    }

    /// Returns the three half-edge indices bounding face `f`, obtained by
    /// walking `next` around its `inner_half_edge`, or `None` if `f` is out
    /// of range or its inner half-edge chain isn't a triangle.
    #[must_use]
    pub fn face_half_edges(&self, f: usize) -> Option<[usize; 3]> {
        let face = self.faces.get(f)?;
        let h0 = face.inner_half_edge?;
        let h1 = self.half_edges.get(h0)?.next?;
        let h2 = self.half_edges.get(h1)?.next?;
        if self.half_edges.get(h2)?.next != Some(h0) {
            return None;
        }
        Some([h0, h1, h2])
    }

    /// Returns the three vertex positions of face `f`.
    #[must_use]
    pub fn face_points(&self, f: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = self.face_vertices(f)?;
        Some([
            self.vertices.get(a)?.position,
            self.vertices.get(b)?.position,
            self.vertices.get(c)?.position,
        ])
    }

    // --- setters: half-edges ---

    /// Sets half-edge `he`'s `from_vertex`. Returns `false` if `he` is out of range.
    pub fn set_half_edge_from(&mut self, he: usize, from: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.from_vertex = from).is_some()
    }

    /// Sets half-edge `he`'s `to_vertex`. Returns `false` if `he` is out of range.
    pub fn set_half_edge_to(&mut self, he: usize, to: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.to_vertex = to).is_some()
    }

    /// Sets half-edge `he`'s twin. Returns `false` if `he` is out of range.
    pub fn set_half_edge_twin(&mut self, he: usize, twin: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.twin = Some(twin)).is_some()
    }

    /// Sets half-edge `he`'s next. Returns `false` if `he` is out of range.
    pub fn set_half_edge_next(&mut self, he: usize, next: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.next = Some(next)).is_some()
    }

    /// Sets half-edge `he`'s prev. Returns `false` if `he` is out of range.
    pub fn set_half_edge_prev(&mut self, he: usize, prev: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.prev = Some(prev)).is_some()
    }

    /// Sets half-edge `he`'s incident face. Returns `false` if `he` is out of range.
    pub fn set_half_edge_face(&mut self, he: usize, face: usize) -> bool {
        self.half_edges.get_mut(he).map(|h| h.face = Some(face)).is_some()
    }

    /// Sets whether half-edge `he` belongs to the hull boundary.
    pub fn set_half_edge_in_convex_hull(&mut self, he: usize, value: bool) -> bool {
        self.half_edges.get_mut(he).map(|h| h.in_convex_hull = value).is_some()
    }

    // --- setters: faces ---

    /// Sets face `f`'s inner half-edge. Returns `false` if `f` is out of range.
    pub fn set_face_inner_half_edge(&mut self, f: usize, he: usize) -> bool {
        self.faces.get_mut(f).map(|face| face.inner_half_edge = Some(he)).is_some()
    }

    /// Sets face `f`'s outer half-edge. Returns `false` if `f` is out of range.
    pub fn set_face_outer_half_edge(&mut self, f: usize, he: usize) -> bool {
        self.faces.get_mut(f).map(|face| face.outer_half_edge = Some(he)).is_some()
    }

    /// Sets whether face `f` belongs to the hull boundary.
    pub fn set_face_in_convex_hull(&mut self, f: usize, value: bool) -> bool {
        self.faces.get_mut(f).map(|face| face.in_convex_hull = value).is_some()
    }

    // --- setters: vertices ---

    /// Sets vertex `v`'s incident half-edge. Returns `false` if `v` is out of range.
    pub fn set_vertex_incident(&mut self, v: usize, he: usize) -> bool {
        self.vertices.get_mut(v).map(|vert| vert.incident_half_edge = Some(he)).is_some()
    }

    /// Sets vertex `v`'s shading normal. Returns `false` if `v` is out of range.
    pub fn set_vertex_normal(&mut self, v: usize, normal: Vector3) -> bool {
        self.vertices.get_mut(v).map(|vert| vert.normal = Some(normal)).is_some()
    }

    /// Sets whether vertex `v` belongs to the hull boundary.
    pub fn set_vertex_in_convex_hull(&mut self, v: usize, value: bool) -> bool {
        self.vertices.get_mut(v).map(|vert| vert.in_convex_hull = value).is_some()
    }

    // --- logical deletion ---

    /// Logically deletes vertex `v` (clears its `in_convex_hull` flag).
    /// Never physically removes it, so existing indices stay valid.
    pub fn delete_vertex(&mut self, v: usize) -> bool {
        self.set_vertex_in_convex_hull(v, false)
    }

    /// Logically deletes half-edge `he` (clears its `in_convex_hull` flag).
    pub fn delete_half_edge(&mut self, he: usize) -> bool {
        self.set_half_edge_in_convex_hull(he, false)
    }

    /// Logically deletes face `f` (clears its `in_convex_hull` flag).
    pub fn delete_face(&mut self, f: usize) -> bool {
        self.set_face_in_convex_hull(f, false)
    }

    // --- normals ---

    /// Computes and stores the outward unit normal of every in-hull face,
    /// from its triangle's vertex positions.
    pub fn compute_face_normals(&mut self) {
        let face_indices: Vec<usize> = self.in_hull_faces().collect();
        for f in face_indices {
            if let Some([a, b, c]) = self.face_points(f) {
                let normal = crate::geometry::triangle_normal(a, b, c);
                self.faces[f].normal = Some(normal);
            }
        }
    }

    /// Computes and stores the shading normal of vertex `v` by averaging
    /// the normals of its incident in-hull faces and renormalizing. This is
    /// a rendering concern, not a hull-construction one, so it's never
    /// called automatically; [`Dcel::compute_face_normals`] must have been
    /// called first.
    pub fn compute_vertex_normal(&mut self, v: usize) -> Option<Vector3> {
        let start = self.vertices.get(v)?.incident_half_edge?;
        let mut sum = Vector3::ZERO;
        let mut count = 0u32;
        let mut circulator = start;
        loop {
            let he = self.half_edges.get(circulator)?;
            if let Some(face) = he.face {
                if let Some(normal) = self.faces.get(face).and_then(|f| f.normal) {
                    sum += normal;
                    count += 1;
                }
            }
            let twin = self.half_edges.get(circulator)?.twin?;
            circulator = self.half_edges.get(twin)?.next?;
            if circulator == start {
                break;
            }
        }
        if count == 0 {
            return None;
        }
        let normal = (sum / count as f64).normalize();
        self.vertices[v].normal = Some(normal);
        Some(normal)
    }

    // --- invariant checking ---

    /// Walks every in-hull half-edge and face and checks the invariants
    /// from the DCEL's contract:
    ///
    /// - `twin(twin(h)) == h`, `from(twin(h)) == to(h)`, `to(twin(h)) == from(h)`
    /// - `next(prev(h)) == h`, `prev(next(h)) == h`
    /// - `from(next(h)) == to(h)`
    /// - every half-edge of a face shares that face's id, and walking
    ///   `next` three times returns to the start.
    ///
    /// Returns the first violation found as
    /// [`ErrorKind::TopologyInvariantViolation`], never panics.
    pub fn verify_invariants(&self) -> Result<(), ErrorKind> {
        let violation = |msg: String| ErrorKind::TopologyInvariantViolation(msg);

        for he in self.in_hull_half_edges() {
            let h = &self.half_edges[he];

            let twin = h.twin.ok_or_else(|| violation(format!("half-edge {he} has no twin")))?;
            let twin_h = self
                .half_edges
                .get(twin)
                .ok_or_else(|| violation(format!("half-edge {he} twin {twin} out of range")))?;
            if twin_h.twin != Some(he) {
                return Err(violation(format!("twin({he})={twin} but twin({twin})={:?}", twin_h.twin)));
            }
            if twin_h.from_vertex != h.to_vertex {
                return Err(violation(format!("from(twin({he})) != to({he})")));
            }
            if twin_h.to_vertex != h.from_vertex {
                return Err(violation(format!("to(twin({he})) != from({he})")));
            }

            let next = h.next.ok_or_else(|| violation(format!("half-edge {he} has no next")))?;
            let prev = h.prev.ok_or_else(|| violation(format!("half-edge {he} has no prev")))?;
            let next_h = self
                .half_edges
                .get(next)
                .ok_or_else(|| violation(format!("half-edge {he} next {next} out of range")))?;
            let prev_h = self
                .half_edges
                .get(prev)
                .ok_or_else(|| violation(format!("half-edge {he} prev {prev} out of range")))?;

            if prev_h.next != Some(he) {
                return Err(violation(format!("next(prev({he}))!={he}")));
            }
            if next_h.prev != Some(he) {
                return Err(violation(format!("prev(next({he}))!={he}")));
            }
            if next_h.from_vertex != h.to_vertex {
                return Err(violation(format!("from(next({he})) != to({he})")));
            }
            if next_h.face != h.face {
                return Err(violation(format!("face(next({he})) != face({he})")));
            }
        }

        for f in self.in_hull_faces() {
            let h0 = self.faces[f]
                .inner_half_edge
                .ok_or_else(|| violation(format!("face {f} has no inner half-edge")))?;
            let he0 = self
                .half_edges
                .get(h0)
                .ok_or_else(|| violation(format!("face {f} inner half-edge {h0} out of range")))?;
            let h1 = he0.next.ok_or_else(|| violation(format!("face {f} half-edge chain incomplete")))?;
            let he1 = self.half_edges.get(h1).ok_or_else(|| violation(format!("face {f} half-edge {h1} out of range")))?;
            let h2 = he1.next.ok_or_else(|| violation(format!("face {f} half-edge chain incomplete")))?;
            let he2 = self.half_edges.get(h2).ok_or_else(|| violation(format!("face {f} half-edge {h2} out of range")))?;
            if he2.next != Some(h0) {
                return Err(violation(format!("face {f}'s inner half-edge cycle isn't a triangle")));
            }
            for h in [h0, h1, h2] {
                if self.half_edges[h].face != Some(f) {
                    return Err(violation(format!("half-edge {h} doesn't point back to face {f}")));
                }
            }
        }

        Ok(())
    }
}
