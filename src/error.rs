use std::error::Error;
use std::fmt;

/// The type of error returned while building or loading a convex hull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer than four input points were given.
    InsufficientPoints,
    /// No three of the input points are non-collinear.
    AllCollinear,
    /// No fourth point is non-coplanar with the first three chosen.
    AllCoplanar,
    /// The OFF document was unreadable or not a pure-triangle mesh.
    MalformedInput(String),
    /// An internal topology invariant was violated. Never expected on valid
    /// input; surfacing this distinctly lets tests assert it never happens.
    TopologyInvariantViolation(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InsufficientPoints => {
                write!(f, "at least four points are required to build a convex hull")
            }
            ErrorKind::AllCollinear => {
                write!(f, "all input points are collinear; no convex hull exists")
            }
            ErrorKind::AllCoplanar => {
                write!(f, "all input points are coplanar; no 3D convex hull exists")
            }
            ErrorKind::MalformedInput(msg) => write!(f, "malformed OFF input: {msg}"),
            ErrorKind::TopologyInvariantViolation(msg) => {
                write!(f, "internal DCEL invariant violated: {msg}")
            }
        }
    }
}

impl Error for ErrorKind {}
