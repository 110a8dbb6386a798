//! Entity model
//!
//! Everything placed on the map is an [`Entity`]: shared geometry and
//! liveness flags plus an [`EntityKind`] carrying per-variant state.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable handle of an entity within a world. Never reused within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in world space (y grows downward)
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Wander bookkeeping for enemy tanks (unused on the player)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiState {
    /// Ticks since the last decision point
    pub action_timer: u32,
    /// Ticks until the next decision point; rolled lazily
    pub threshold: Option<u32>,
    /// Consecutive blocked decision moves
    pub stuck_counter: u32,
    /// Current wander direction
    pub wander: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub speed: f32,
    pub facing: Direction,
    pub lives: u32,
    pub is_player: bool,
    pub ai: AiState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Firing tank. Identity only; the owner may already be gone.
    pub owner: EntityId,
    pub direction: Direction,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub breakable: bool,
}

/// The defended objective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub lives: u32,
    pub max_lives: u32,
}

/// Per-variant state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Tank(Tank),
    Bullet(Bullet),
    Wall(Wall),
    Base(Base),
}

/// Anything placed in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner of the nominal bounds
    pub pos: Vec2,
    pub size: Vec2,
    /// Participates in update and collision
    pub active: bool,
    /// Terminal; a destroyed entity is never considered active
    pub destroyed: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// Nominal bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Collision rectangle: the bounds inset by [`HITBOX_INSET`] on every side
    pub fn hit_box(&self) -> Rect {
        self.bounds().inset(HITBOX_INSET)
    }

    /// Active and not destroyed
    #[inline]
    pub fn is_live(&self) -> bool {
        self.active && !self.destroyed
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.active = false;
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet(_))
    }

    pub fn is_base(&self) -> bool {
        matches!(self.kind, EntityKind::Base(_))
    }

    pub fn is_player_tank(&self) -> bool {
        matches!(&self.kind, EntityKind::Tank(t) if t.is_player)
    }

    pub fn is_enemy_tank(&self) -> bool {
        matches!(&self.kind, EntityKind::Tank(t) if !t.is_player)
    }

    pub fn as_tank(&self) -> Option<&Tank> {
        match &self.kind {
            EntityKind::Tank(tank) => Some(tank),
            _ => None,
        }
    }

    pub fn as_tank_mut(&mut self) -> Option<&mut Tank> {
        match &mut self.kind {
            EntityKind::Tank(tank) => Some(tank),
            _ => None,
        }
    }

    /// Remaining lives for tanks and the base
    pub fn lives(&self) -> Option<u32> {
        match &self.kind {
            EntityKind::Tank(tank) => Some(tank.lives),
            EntityKind::Base(base) => Some(base.lives),
            _ => None,
        }
    }

    /// Advance passive per-tick state. Only bullets move on their own.
    pub fn update(&mut self) {
        if let EntityKind::Bullet(bullet) = &self.kind {
            self.pos += bullet.direction.delta() * bullet.speed;

            let out_of_range = self.pos.x < BULLET_DESPAWN_MIN
                || self.pos.x > BULLET_DESPAWN_MAX
                || self.pos.y < BULLET_DESPAWN_MIN
                || self.pos.y > BULLET_DESPAWN_MAX;
            if out_of_range {
                self.destroy();
            }
        }
    }

    /// Apply damage.
    ///
    /// Tanks and the base lose lives (clamped at zero) and are destroyed at
    /// zero. Breakable walls are destroyed by any hit; unbreakable walls
    /// ignore damage.
    pub fn take_damage(&mut self, amount: u32) {
        let depleted = match &mut self.kind {
            EntityKind::Tank(tank) => {
                tank.lives = tank.lives.saturating_sub(amount);
                tank.lives == 0
            }
            EntityKind::Base(base) => {
                if self.destroyed {
                    return;
                }
                base.lives = base.lives.saturating_sub(amount);
                base.lives == 0
            }
            EntityKind::Wall(wall) => wall.breakable,
            EntityKind::Bullet(_) => true,
        };

        if depleted {
            self.destroy();
        }
    }

    /// Heal the base up to its maximum and bring it back. No-op on other kinds.
    pub fn repair(&mut self, amount: u32) {
        if let EntityKind::Base(base) = &mut self.kind {
            base.lives = (base.lives + amount).min(base.max_lives);
            self.destroyed = false;
            self.active = true;
        }
    }

    /// Bullet template centered on this tank, travelling along its facing.
    /// The caller decides when it joins the world.
    pub fn shoot(&self, bullet_speed: f32) -> Option<Spawn> {
        let tank = self.as_tank()?;
        let pos = self.bounds().center() - Vec2::splat(BULLET_SIZE / 2.0);
        Some(Spawn {
            pos,
            size: Vec2::splat(BULLET_SIZE),
            kind: EntityKind::Bullet(Bullet {
                owner: self.id,
                direction: tank.facing,
                speed: bullet_speed,
            }),
        })
    }
}

/// An entity that has not yet been given an id by a world
#[derive(Debug, Clone)]
pub struct Spawn {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EntityKind,
}

impl Spawn {
    pub fn tank(pos: Vec2, is_player: bool, facing: Direction, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::splat(CELL_SIZE),
            kind: EntityKind::Tank(Tank {
                speed: if is_player {
                    tuning.player_speed
                } else {
                    tuning.enemy_speed
                },
                facing,
                lives: tuning.tank_lives,
                is_player,
                ai: AiState::default(),
            }),
        }
    }

    pub fn wall(pos: Vec2, breakable: bool) -> Self {
        Self {
            pos,
            size: Vec2::splat(CELL_SIZE),
            kind: EntityKind::Wall(Wall { breakable }),
        }
    }

    pub fn base(pos: Vec2, lives: u32) -> Self {
        Self {
            pos,
            size: Vec2::splat(CELL_SIZE),
            kind: EntityKind::Base(Base {
                lives,
                max_lives: lives,
            }),
        }
    }

    /// Give the template an identity
    pub fn into_entity(self, id: EntityId) -> Entity {
        Entity {
            id,
            pos: self.pos,
            size: self.size,
            active: true,
            destroyed: false,
            kind: self.kind,
        }
    }
}
