//! # dcel-hull
//!
//! A randomized incremental algorithm for the 3D convex hull of a point set,
//! built on a [`Dcel`](dcel::Dcel) (Doubly-Connected Edge List) topology
//! store synchronized by a [`ConflictGraph`](conflict_graph::ConflictGraph).
//!
//! This is a from-scratch reimplementation of the classic incremental
//! convex-hull construction described by Preparata and Shamos, following
//! the same three-structure design (DCEL + conflict graph + horizon walk)
//! used by `qhull` and similar production hull libraries, adapted to an
//! index-based DCEL so the conflict graph can hold stable face/vertex
//! handles across the whole build.
//!
//! ```
//! use dcel_hull::{build_convex_hull, BuildOptions, Point3};
//!
//! let points = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.25, 0.25, 0.25), // interior, excluded from the hull
//! ];
//! let dcel = build_convex_hull(&points, &BuildOptions::default()).unwrap();
//! assert_eq!(dcel.in_hull_faces().count(), 4);
//! ```
//!
//! ## References
//!
//! - F. P. Preparata, S. J. Hong. 1977. Convex Hulls of Finite Sets of
//!   Points in Two and Three Dimensions.
//! - C. Bradford Barber et al. 1996. The Quickhull Algorithm for Convex
//!   Hulls.

#![warn(missing_docs, clippy::all)]

pub mod builder;
pub mod conflict_graph;
pub mod dcel;
pub mod error;
pub mod geometry;
pub mod off;

pub use builder::{build_convex_hull, BuildOptions};
pub use conflict_graph::ConflictGraph;
pub use dcel::{Dcel, Face, HalfEdge, Vertex};
pub use error::ErrorKind;
pub use geometry::{collinear2d, collinear3d, signed_volume, triangle_normal, Point3, Vector3};
pub use off::{dcel_to_mesh, mesh_to_dcel, Mesh};
