//! Tank battle simulation
//!
//! Entities, movement, bullet impacts and the enemy wander policy, advanced
//! one tick per `Game::update`. Given the same seed, level and player input
//! a game replays identically: enemy randomness comes from the game's own
//! `Pcg32`, and every pass walks the entity collection in insertion order.
//! Level files and tuning are read elsewhere and handed in as values.

pub mod ai;
pub mod collision;
pub mod game;
pub mod level;
pub mod rect;
pub mod state;
pub mod world;

pub use ai::update_enemy;
pub use collision::{Impact, can_move_to, resolve_bullet_collisions};
pub use game::{Game, GamePhase, Snapshot, TickInput};
pub use level::{Cell, DEFAULT_LEVEL_NAME, LevelDefinition, WallCell};
pub use rect::Rect;
pub use state::{
    AiState, Base, Bullet, Direction, Entity, EntityId, EntityKind, Spawn, Tank, Wall,
};
pub use world::World;
