//! The conflict graph: a bipartite adjacency between outstanding input
//! points and current hull faces, answering "which faces does point `p`
//! see?" and "which outstanding points see face `f`?" in time linear in the
//! answer.

use std::collections::BTreeSet;

/// Bipartite point↔face visibility adjacency.
///
/// `visible_faces[p]` holds the face indices point `p` currently sees;
/// `visible_points[f]` holds the mirror image. The two sides are kept
/// mutually consistent by [`ConflictGraph::link`] and the `remove_*_node`
/// methods — there is no way to edit one side without the other.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    /// Indexed by point index. Pre-sized with four empty sentinel entries
    /// for the tetrahedron's seed points, which never participate as
    /// outstanding points.
    visible_faces: Vec<BTreeSet<usize>>,
    /// Indexed by face index.
    visible_points: Vec<BTreeSet<usize>>,
}

impl ConflictGraph {
    /// Creates an empty conflict graph with the four seed-point sentinel
    /// slots already allocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible_faces: vec![BTreeSet::new(); 4],
            visible_points: Vec::new(),
        }
    }

    /// Allocates an empty adjacency slot for face `f`. `f` must equal
    /// `self.visible_points.len()` at call time, matching how the builder
    /// always appends faces to the DCEL before adding their conflict node.
    pub fn add_face_node(&mut self, f: usize) {
        debug_assert_eq!(f, self.visible_points.len(), "face nodes must be added in index order");
        self.visible_points.push(BTreeSet::new());
    }

    /// Allocates an empty adjacency slot for point `p`.
    pub fn add_point_node(&mut self, p: usize) {
        debug_assert_eq!(p, self.visible_faces.len(), "point nodes must be added in index order");
        self.visible_faces.push(BTreeSet::new());
    }

    /// Records that point `p` sees face `f`. Idempotent.
    pub fn link(&mut self, f: usize, p: usize) {
        self.visible_points[f].insert(p);
        self.visible_faces[p].insert(f);
    }

    /// Returns the faces point `p` currently sees.
    #[must_use]
    pub fn visible_faces(&self, p: usize) -> Vec<usize> {
        self.visible_faces[p].iter().copied().collect()
    }

    /// Returns the outstanding points that currently see face `f`.
    #[must_use]
    pub fn visible_points(&self, f: usize) -> Vec<usize> {
        self.visible_points[f].iter().copied().collect()
    }

    /// Removes face `f`'s node: for every point that saw it, removes `f`
    /// from that point's adjacency. `f`'s own adjacency slot is left as a
    /// tombstone and must not be read again.
    pub fn remove_face_node(&mut self, f: usize) {
        for p in std::mem::take(&mut self.visible_points[f]) {
            self.visible_faces[p].remove(&f);
        }
    }

    /// Removes point `p`'s node: for every face that `p` saw, removes `p`
    /// from that face's adjacency.
    pub fn remove_point_node(&mut self, p: usize) {
        for f in std::mem::take(&mut self.visible_faces[p]) {
            self.visible_points[f].remove(&p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_points_start_with_empty_sentinel_slots() {
        let g = ConflictGraph::new();
        assert_eq!(g.visible_faces(0), Vec::<usize>::new());
        assert_eq!(g.visible_faces(3), Vec::<usize>::new());
    }

    #[test]
    fn link_is_mutually_consistent_and_idempotent() {
        let mut g = ConflictGraph::new();
        g.add_face_node(0);
        g.add_point_node(4);
        g.link(0, 4);
        g.link(0, 4);
        assert_eq!(g.visible_faces(4), vec![0]);
        assert_eq!(g.visible_points(0), vec![4]);
    }

    #[test]
    fn remove_face_node_clears_both_sides() {
        let mut g = ConflictGraph::new();
        g.add_face_node(0);
        g.add_point_node(4);
        g.add_point_node(5);
        g.link(0, 4);
        g.link(0, 5);
        g.remove_face_node(0);
        assert_eq!(g.visible_faces(4), Vec::<usize>::new());
        assert_eq!(g.visible_faces(5), Vec::<usize>::new());
    }

    #[test]
    fn remove_point_node_clears_both_sides() {
        let mut g = ConflictGraph::new();
        g.add_face_node(0);
        g.add_face_node(1);
        g.add_point_node(4);
        g.link(0, 4);
        g.link(1, 4);
        g.remove_point_node(4);
        assert_eq!(g.visible_points(0), Vec::<usize>::new());
        assert_eq!(g.visible_points(1), Vec::<usize>::new());
    }
}
