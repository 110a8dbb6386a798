//! Error types for loading level definitions and tuning files
//!
//! The simulation itself never fails a tick; these only surface from the
//! loader side (parsing, validation, file access).

use thiserror::Error;

/// A level definition could not be loaded or is not playable
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level \"{name}\" has no player start")]
    MissingPlayer { name: String },

    #[error("level \"{name}\" has no base")]
    MissingBase { name: String },

    #[error("{what} cell ({x}, {y}) lies outside the {cells}x{cells} map")]
    CellOutOfBounds {
        what: &'static str,
        x: i32,
        y: i32,
        cells: i32,
    },

    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read level file: {0}")]
    Io(#[from] std::io::Error),
}

/// A tuning file is malformed or carries values the simulation cannot use
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("{field} must be in (0, {max}], got {value}")]
    InvalidSpeed {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("{field} must be at least 1")]
    InvalidLives { field: &'static str },

    #[error("malformed tuning data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
}
