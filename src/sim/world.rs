//! The world: owner of every entity in the active level
//!
//! Entities live in one ordered collection. Collection order is the scan
//! order of bullet impact resolution, so instantiation order matters.
//! Entities created while the collection is being processed are staged and
//! spliced in at explicit phase boundaries.

use super::collision::can_move_to;
use super::level::LevelDefinition;
use super::state::{Direction, Entity, EntityId, Spawn};
use crate::consts::MAP_CELLS;
use crate::tuning::Tuning;
use crate::{cell_in_map, cell_to_world};

#[derive(Debug, Clone, Default)]
pub struct World {
    entities: Vec<Entity>,
    /// Spawns waiting for the next phase boundary
    staged: Vec<Spawn>,
    next_id: u32,
    /// Cached handle of the base placed at load. The collection is authoritative.
    base: Option<EntityId>,
    level_name: String,
    /// Enemies still to arrive after load (wave spawning hook; zero today)
    remaining_enemies_to_spawn: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the world contents with a level.
    ///
    /// A missing or unplayable definition falls back to the default arena,
    /// so the world is always playable. Returns `false` when the fallback
    /// was used.
    pub fn load_level(&mut self, level: Option<&LevelDefinition>, tuning: &Tuning) -> bool {
        self.entities.clear();
        self.staged.clear();
        self.next_id = 1;
        self.base = None;

        let loaded = match level {
            Some(level) => match level.validate() {
                Ok(()) => {
                    self.instantiate(level, tuning);
                    true
                }
                Err(err) => {
                    log::warn!("Level \"{}\" rejected ({err}), using default arena", level.name);
                    false
                }
            },
            None => {
                log::warn!("No level supplied, using default arena");
                false
            }
        };
        if !loaded {
            self.instantiate(&LevelDefinition::default(), tuning);
        }

        log::info!(
            "Loaded level \"{}\": {} entities, {} enemies",
            self.level_name,
            self.entities.len(),
            self.entities.iter().filter(|e| e.is_enemy_tank()).count()
        );
        loaded
    }

    /// Populate from an already validated definition. Enemies and walls
    /// placed off the map are skipped.
    fn instantiate(&mut self, level: &LevelDefinition, tuning: &Tuning) {
        self.level_name = level.name.clone();

        // Perimeter: full top and bottom rows, then the sides between them
        let last = MAP_CELLS - 1;
        for i in 0..MAP_CELLS {
            self.spawn(Spawn::wall(cell_to_world(i, 0), false));
            self.spawn(Spawn::wall(cell_to_world(i, last), false));
        }
        for i in 1..last {
            self.spawn(Spawn::wall(cell_to_world(0, i), false));
            self.spawn(Spawn::wall(cell_to_world(last, i), false));
        }

        if let Some(cell) = level.base {
            let id = self.spawn(Spawn::base(cell_to_world(cell.x, cell.y), tuning.base_lives));
            self.base = Some(id);
        }

        if let Some(cell) = level.player {
            self.spawn(Spawn::tank(
                cell_to_world(cell.x, cell.y),
                true,
                Direction::Up,
                tuning,
            ));
        }

        for cell in &level.enemies {
            if !on_map(&level.name, "enemy", cell.x, cell.y) {
                continue;
            }
            self.spawn(Spawn::tank(
                cell_to_world(cell.x, cell.y),
                false,
                Direction::Left,
                tuning,
            ));
        }

        for wall in &level.walls {
            if !on_map(&level.name, "wall", wall.x, wall.y) {
                continue;
            }
            self.spawn(Spawn::wall(cell_to_world(wall.x, wall.y), wall.breakable));
        }

        // Every enemy is placed up front
        self.remaining_enemies_to_spawn = 0;
    }

    /// Insert an entity immediately
    pub fn spawn(&mut self, spawn: Spawn) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(spawn.into_entity(id));
        id
    }

    /// Queue an entity for the next [`World::flush_staged`]
    pub fn stage(&mut self, spawn: Spawn) {
        self.staged.push(spawn);
    }

    /// Splice staged entities into the collection, in staging order
    pub fn flush_staged(&mut self) -> usize {
        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for spawn in staged {
            self.spawn(spawn);
        }
        count
    }

    /// Advance every active entity by one tick
    pub fn update(&mut self) {
        for entity in self.entities.iter_mut().filter(|e| e.active) {
            entity.update();
        }
    }

    /// Drop every inactive or destroyed entity. Returns how many were removed.
    pub fn purge(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_live);
        let removed = before - self.entities.len();
        if removed > 0 {
            log::debug!("Purged {removed} entities");
        }
        removed
    }

    /// Turn a tank to `direction` and step it forward if nothing blocks it.
    ///
    /// The tank turns even when blocked. Returns whether it moved.
    pub fn move_tank(&mut self, id: EntityId, direction: Direction) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let candidate = {
            let Some(tank) = self.entities[index].as_tank_mut() else {
                return false;
            };
            tank.facing = direction;
            let step = direction.delta() * tank.speed;
            self.entities[index].pos + step
        };

        if can_move_to(&self.entities[index], candidate, &self.entities) {
            self.entities[index].pos = candidate;
            true
        } else {
            false
        }
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// First base in the collection, destroyed or not
    pub fn find_base(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_base())
    }

    /// The base placed at load, if it is still in the collection
    pub fn base(&self) -> Option<&Entity> {
        self.base.and_then(|id| self.get(id))
    }

    /// First player tank in the collection
    pub fn find_player(&self) -> Option<EntityId> {
        self.entities.iter().find(|e| e.is_player_tank()).map(|e| e.id)
    }

    /// Enemy tanks that are active and not destroyed, in collection order
    pub fn live_enemies(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_enemy_tank() && e.is_live())
            .map(|e| e.id)
            .collect()
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn remaining_enemies_to_spawn(&self) -> u32 {
        self.remaining_enemies_to_spawn
    }
}

fn on_map(level: &str, what: &str, x: i32, y: i32) -> bool {
    let inside = cell_in_map(x, y);
    if !inside {
        log::warn!("Level \"{level}\": {what} at ({x}, {y}) is off the map, skipped");
    }
    inside
}
