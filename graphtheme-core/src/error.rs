use thiserror::Error;

/// Errors raised when building geometry from host-supplied vertices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Polygon ring is not closed: first and last vertex differ")]
    NotClosed,

    #[error("Polygon needs at least 4 points (triangle + closing point), got {count}")]
    TooFewPoints { count: usize },

    #[error("Expected a closed quadrilateral of 5 points, got {count}")]
    NotQuadrilateral { count: usize },
}
