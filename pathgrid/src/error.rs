use thiserror::Error;

use crate::grid::Point;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("invalid grid configuration: {reason}")]
    Configuration { reason: String },

    #[error("cell {point} is outside the {rows}x{columns} grid")]
    OutOfBounds {
        point: Point,
        rows: usize,
        columns: usize,
    },

    #[error("cell {point} is the {marker} cell and cannot become a wall")]
    ProtectedCell { point: Point, marker: &'static str },

    #[error("a visualization is already running")]
    AnimationInProgress,

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GridError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        GridError::Configuration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
