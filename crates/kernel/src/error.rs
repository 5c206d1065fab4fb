use crate::world::GridCoord;

/// Errors from building or editing a voxel world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("height map has no cells")]
    EmptyHeightMap,
    #[error("height map row {row} has {found} columns, expected {expected}")]
    RaggedHeightMap {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cube size must be positive and finite, got {0}")]
    InvalidCubeSize(f32),
    #[error("grid cell {cell:?} is outside the {width}x{height}x{depth} grid")]
    OutOfBounds {
        cell: GridCoord,
        width: usize,
        height: usize,
        depth: usize,
    },
    #[error("point {0:?} has a non-finite coordinate")]
    NonFinitePoint([f32; 3]),
    #[error(
        "{width}x{depth} grid with columns up to {max_height} plus {headroom} headroom is too large"
    )]
    GridTooLarge {
        width: usize,
        depth: usize,
        max_height: u32,
        headroom: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
