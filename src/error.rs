use thiserror::Error;

use crate::topology::CellId;

/// Top-level error type for grid construction and queries.
#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

/// Errors caused by bad caller input.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("subdivision depth must be non-negative, got {0}")]
    NegativeDepth(i64),

    #[error("subdivision depth {value} exceeds the maximum of {max}")]
    DepthOutOfRange { value: i64, max: u32 },

    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("quantization resolution must be positive and finite, got {0}")]
    InvalidQuantization(f64),

    #[error("unknown cell: {0:?}")]
    UnknownCell(CellId),

    #[error("movement cost must be non-negative, got {0}")]
    InvalidMovementCost(f64),
}

/// Defects in the geometry pipeline itself.
///
/// These are never caused by the caller and are not recoverable by retrying;
/// they point at the subdivision or quantization logic.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error("vertex has {incident} incident triangles, at least 3 are required")]
    DegenerateCell { incident: usize },

    #[error("boundary edge is shared by {cells} cells, expected exactly 2")]
    EdgeShareCount { cells: usize },

    #[error("boundary edge of cell {0:?} collapses to a single quantized point")]
    CollapsedEdge(CellId),

    #[error("cells {0:?} and {1:?} share more than one boundary edge")]
    DuplicateAdjacency(CellId, CellId),

    #[error("cell {cell:?} has {sides} boundary points, expected 5 or 6")]
    CellSides { cell: CellId, sides: usize },

    #[error("expected {expected} cells, found {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("expected 12 pentagons, found {0}")]
    PentagonCount(usize),

    #[error("cell {cell:?} has a {boundary}-point boundary but {neighbors} neighbors")]
    NeighborMismatch {
        cell: CellId,
        boundary: usize,
        neighbors: usize,
    },

    #[error("cell {0:?} lists {1:?} as a neighbor but not the other way round")]
    AsymmetricAdjacency(CellId, CellId),

    #[error("cell {0:?} has a point off the unit sphere")]
    OffSphere(CellId),

    #[error("grid has no cells")]
    EmptyGrid,
}

/// Convenience type alias for results using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;
