//! Game balance tuning
//!
//! Every behavioral literal of the simulation lives here so it can be
//! adjusted from a JSON file without touching code. Geometry (cell size,
//! map size, hit-box inset) is fixed in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;
use crate::error::TuningError;

/// Balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Player tank speed (units per tick)
    pub player_speed: f32,
    /// Enemy tank speed (units per tick)
    pub enemy_speed: f32,
    /// Bullet speed (units per tick)
    pub bullet_speed: f32,

    // === Durability ===
    /// Starting lives of every tank
    pub tank_lives: u32,
    /// Starting (and maximum) lives of the base
    pub base_lives: u32,

    // === Player ===
    /// Ticks between player shots
    pub shoot_cooldown_ticks: u32,

    // === Enemy AI ===
    /// Fixed part of the wander threshold (ticks)
    pub ai_threshold_base: u32,
    /// Random part of the wander threshold, drawn from [0, jitter)
    pub ai_threshold_jitter: u32,
    /// Blocked attempts tolerated before a forced re-roll
    pub ai_stuck_limit: u32,
    /// Chance of re-rolling direction at a decision point when not stuck
    pub ai_direction_change_chance: f64,
    /// Per-tick chance an enemy fires
    pub ai_shoot_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 3.5,
            enemy_speed: 2.5,
            bullet_speed: 5.0,

            tank_lives: 3,
            base_lives: 5,

            shoot_cooldown_ticks: 30,

            ai_threshold_base: 30,
            ai_threshold_jitter: 30,
            ai_stuck_limit: 5,
            ai_direction_change_chance: 0.05,
            ai_shoot_chance: 0.015,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("bullet_speed", self.bullet_speed),
        ] {
            // Faster than a cell per tick would tunnel through walls
            if !(value > 0.0 && value <= CELL_SIZE) {
                return Err(TuningError::InvalidSpeed {
                    field,
                    value,
                    max: CELL_SIZE,
                });
            }
        }

        for (field, value) in [
            ("ai_direction_change_chance", self.ai_direction_change_chance),
            ("ai_shoot_chance", self.ai_shoot_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::InvalidProbability { field, value });
            }
        }

        if self.tank_lives == 0 {
            return Err(TuningError::InvalidLives {
                field: "tank_lives",
            });
        }
        if self.base_lives == 0 {
            return Err(TuningError::InvalidLives {
                field: "base_lives",
            });
        }

        Ok(())
    }
}
