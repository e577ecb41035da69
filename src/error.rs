use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmError {
    #[error("plot ({x}, {y}) is outside the {columns}x{rows} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        columns: u32,
        rows: u32,
    },
    #[error("farm is not mounted")]
    Unmounted,
}
