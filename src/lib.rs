//! Tank Arena - a tile-grid tank battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, enemy AI, game state)
//! - `tuning`: Data-driven game balance
//! - `levels`: Level file format and the built-in campaign
//! - `error`: Error types for level and tuning loading

pub mod error;
pub mod levels;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use tuning::Tuning;

/// Grid and geometry constants
pub mod consts {
    /// Side length of one grid cell (world units)
    pub const CELL_SIZE: f32 = 32.0;
    /// Map is a square of MAP_CELLS x MAP_CELLS cells
    pub const MAP_CELLS: i32 = 13;
    /// Map side length in world units (416)
    pub const MAP_SIZE: f32 = MAP_CELLS as f32 * CELL_SIZE;

    /// Hit-box inset on every side of the nominal bounds.
    /// Two adjacent one-cell walls leave a gap a 32x32 tank can pass through.
    pub const HITBOX_INSET: f32 = 2.0;

    /// Bullets are 8x8
    pub const BULLET_SIZE: f32 = 8.0;
    /// Bullets despawn once they leave this window (well outside the map)
    pub const BULLET_DESPAWN_MIN: f32 = -100.0;
    pub const BULLET_DESPAWN_MAX: f32 = 2000.0;

    /// Position change below this counts as "did not move"
    pub const MOVE_EPSILON: f32 = 0.1;
}

/// World position of the top-left corner of a grid cell
#[inline]
pub fn cell_to_world(x: i32, y: i32) -> glam::Vec2 {
    glam::Vec2::new(x as f32 * consts::CELL_SIZE, y as f32 * consts::CELL_SIZE)
}

/// Whether a grid cell lies inside the map
#[inline]
pub fn cell_in_map(x: i32, y: i32) -> bool {
    (0..consts::MAP_CELLS).contains(&x) && (0..consts::MAP_CELLS).contains(&y)
}
