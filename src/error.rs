use crate::fixed::Fixed;

/// Construction and configuration errors.
///
/// Collision queries and movement helpers never fail; only building a grid,
/// a tile map or loading settings can.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("bounds must have positive size (got {width}x{height})")]
    DegenerateBounds { width: Fixed, height: Fixed },

    #[error("cells of {width}x{height} are below the fixed-point resolution")]
    CellTooSmall { width: Fixed, height: Fixed },

    #[error("region reaching ({right}, {bottom}) in raw units exceeds the fixed-point range")]
    ExtentOverflow { right: i64, bottom: i64 },

    #[error("step size must be positive (got {0})")]
    NonPositiveStep(Fixed),

    #[error("tile size must be positive (got {0})")]
    NonPositiveTileSize(Fixed),

    #[error("mask size must not be negative (got {0})")]
    NegativeMaskSize(Fixed),

    #[error("layout row {row} has {len} tiles, expected {expected}")]
    RaggedLayout { row: usize, len: usize, expected: usize },

    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
