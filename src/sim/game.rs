//! Fixed-step game orchestration
//!
//! One [`Game::update`] call is one tick. The steps run in a fixed order:
//!
//! 1. Player shoot cooldown
//! 2. World update (bullet flight, despawn at range)
//! 3. Live enemy list
//! 4. Enemy controller, with fired bullets staged and spliced in afterwards
//! 5. Bullet impact resolution
//! 6. Terminal state evaluation, while dead entities are still present
//! 7. Purge of inactive and destroyed entities
//!
//! Once the game is over or the level complete, updates and player actions
//! are inert until the next [`Game::start`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::update_enemy;
use super::collision::resolve_bullet_collisions;
use super::level::LevelDefinition;
use super::state::{Direction, Entity, EntityId};
use super::world::World;
use crate::tuning::Tuning;

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    /// Base or player lost
    GameOver,
    /// Every enemy destroyed
    LevelComplete,
}

/// Player intent for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drive the player tank one step
    pub direction: Option<Direction>,
    /// Fire if the cooldown allows
    pub shoot: bool,
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub tick: u64,
    pub level_name: &'a str,
    pub entities: &'a [Entity],
}

pub struct Game {
    world: World,
    tuning: Tuning,
    rng: Pcg32,
    phase: GamePhase,
    /// Player tank found at load
    player: Option<EntityId>,
    /// Live enemies as of step 3 of the current tick
    enemies: Vec<EntityId>,
    shoot_cooldown: u32,
    time_ticks: u64,
}

impl Game {
    /// Create a game on the default arena
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut game = Self {
            world: World::new(),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            player: None,
            enemies: Vec::new(),
            shoot_cooldown: 0,
            time_ticks: 0,
        };
        game.start(Some(&LevelDefinition::default()));
        game
    }

    /// Load a level (or the default arena) and reset the game state.
    /// Returns `false` when the default arena was substituted.
    pub fn start(&mut self, level: Option<&LevelDefinition>) -> bool {
        let loaded = self.world.load_level(level, &self.tuning);
        self.player = self.world.find_player();
        self.enemies = self.world.live_enemies();
        self.phase = GamePhase::Running;
        self.shoot_cooldown = 0;
        self.time_ticks = 0;
        loaded
    }

    /// Advance the simulation by one tick
    pub fn update(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.time_ticks += 1;

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);

        self.world.update();

        self.enemies = self.world.live_enemies();

        for &id in &self.enemies {
            if let Some(bullet) = update_enemy(&mut self.world, id, &self.tuning, &mut self.rng) {
                self.world.stage(bullet);
            }
        }
        self.world.flush_staged();

        resolve_bullet_collisions(self.world.entities_mut());

        self.phase = self.evaluate();
        match self.phase {
            GamePhase::GameOver => log::info!("Game over at tick {}", self.time_ticks),
            GamePhase::LevelComplete => {
                log::info!(
                    "Level \"{}\" complete at tick {}",
                    self.world.level_name(),
                    self.time_ticks
                )
            }
            GamePhase::Running => {}
        }

        self.world.purge();
    }

    /// Terminal state check; must run before the purge
    fn evaluate(&self) -> GamePhase {
        let base_lost = self.world.find_base().is_none_or(|base| base.destroyed);
        if base_lost {
            return GamePhase::GameOver;
        }

        let player_lost = self
            .player
            .and_then(|id| self.world.get(id))
            .is_none_or(|player| player.destroyed);
        if player_lost {
            return GamePhase::GameOver;
        }

        if self.enemies.is_empty() && self.world.remaining_enemies_to_spawn() == 0 {
            return GamePhase::LevelComplete;
        }

        GamePhase::Running
    }

    fn live_player(&self) -> Option<EntityId> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let id = self.player?;
        self.world.get(id).filter(|p| p.is_live()).map(|p| p.id)
    }

    /// Drive the player tank one step. Returns whether it moved.
    pub fn handle_player_input(&mut self, direction: Direction) -> bool {
        match self.live_player() {
            Some(id) => self.world.move_tank(id, direction),
            None => false,
        }
    }

    /// Fire the player's gun if the cooldown has elapsed. Returns whether a
    /// bullet was fired.
    pub fn handle_player_shoot(&mut self) -> bool {
        if self.shoot_cooldown > 0 {
            return false;
        }
        let Some(id) = self.live_player() else {
            return false;
        };
        let Some(bullet) = self
            .world
            .get(id)
            .and_then(|p| p.shoot(self.tuning.bullet_speed))
        else {
            return false;
        };

        self.world.spawn(bullet);
        self.shoot_cooldown = self.tuning.shoot_cooldown_ticks;
        true
    }

    /// Apply player intent, then run one tick
    pub fn step(&mut self, input: &TickInput) {
        if let Some(direction) = input.direction {
            self.handle_player_input(direction);
        }
        if input.shoot {
            self.handle_player_shoot();
        }
        self.update();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase == GamePhase::LevelComplete
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn shoot_cooldown(&self) -> u32 {
        self.shoot_cooldown
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.get(self.player?)
    }

    /// Enemies alive at the start of the last tick's AI phase
    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }

    pub fn entities(&self) -> &[Entity] {
        self.world.entities()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            tick: self.time_ticks,
            level_name: self.world.level_name(),
            entities: self.world.entities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::level::Cell;

    fn level(enemies: Vec<Cell>) -> LevelDefinition {
        LevelDefinition {
            name: "Arena".to_string(),
            player: Some(Cell::new(6, 9)),
            base: Some(Cell::new(6, 11)),
            enemies,
            walls: Vec::new(),
        }
    }

    fn quiet() -> Tuning {
        Tuning {
            ai_shoot_chance: 0.0,
            ..Tuning::default()
        }
    }

    /// Drop a bullet fired by `owner` so that it overlaps `target` this tick
    fn bullet_on(game: &mut Game, owner: EntityId, target: EntityId) {
        let target_pos = game.world().get(target).unwrap().pos;
        let mut bullet = game
            .world()
            .get(owner)
            .unwrap()
            .shoot(game.tuning().bullet_speed)
            .unwrap();
        bullet.pos = target_pos + Vec2::splat(12.0);
        game.world_mut().spawn(bullet);
    }

    fn arena(player: Cell, enemies: Vec<Cell>) -> LevelDefinition {
        LevelDefinition {
            player: Some(player),
            ..level(enemies)
        }
    }

    #[test]
    fn test_new_game_starts_on_default_arena() {
        let game = Game::new(1, quiet());
        assert_eq!(game.world().level_name(), "Default Level");
        assert!(game.player().is_some());
        assert!(game.enemies().is_empty());
        assert_eq!(game.time_ticks(), 0);
    }

    #[test]
    fn test_empty_level_completes_on_first_tick() {
        let mut game = Game::new(1, quiet());
        assert_eq!(game.phase(), GamePhase::Running);
        game.update();
        assert!(game.is_level_complete());
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_enemies_keep_level_running() {
        let mut game = Game::new(1, quiet());
        assert!(game.start(Some(&level(vec![Cell::new(2, 1)]))));
        for _ in 0..10 {
            game.update();
        }
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.enemies().len(), 1);
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut game = Game::new(1, quiet());
        game.start(Some(&level(vec![Cell::new(2, 1)])));

        assert!(game.handle_player_shoot());
        assert_eq!(game.shoot_cooldown(), 30);
        assert!(!game.handle_player_shoot());

        for _ in 0..29 {
            game.update();
            assert!(!game.handle_player_shoot());
        }
        game.update();
        assert!(game.handle_player_shoot());
    }

    #[test]
    fn test_player_bullet_travels() {
        let mut game = Game::new(1, quiet());
        game.start(Some(&level(vec![Cell::new(2, 1)])));
        assert!(game.handle_player_shoot());

        let bullet = game.entities().iter().find(|e| e.is_bullet()).unwrap().clone();
        game.update();
        let moved = game.entities().iter().find(|e| e.id == bullet.id).unwrap();
        assert_eq!(moved.pos, bullet.pos + Direction::Up.delta() * 5.0);
    }

    #[test]
    fn test_player_moves_only_while_running() {
        let mut game = Game::new(1, quiet());
        assert!(game.handle_player_input(Direction::Up));
        game.update();
        assert!(game.is_level_complete());
        assert!(!game.handle_player_input(Direction::Up));
        assert!(!game.handle_player_shoot());
    }

    #[test]
    fn test_missing_base_is_game_over() {
        let mut game = Game::new(1, quiet());
        game.start(Some(&level(vec![Cell::new(2, 1)])));
        let base = game.world().find_base().unwrap().id;
        game.world_mut().get_mut(base).unwrap().destroy();
        game.world_mut().purge();

        game.update();
        assert!(game.is_game_over());
    }

    #[test]
    fn test_destroyed_player_is_game_over() {
        let mut game = Game::new(1, quiet());
        game.start(Some(&level(vec![Cell::new(2, 1)])));
        let player = game.player().unwrap().id;
        game.world_mut().get_mut(player).unwrap().take_damage(3);

        game.update();
        assert!(game.is_game_over());
        // Purged after evaluation
        assert!(game.player().is_none());
    }

    #[test]
    fn test_step_applies_input_then_ticks() {
        let mut game = Game::new(1, quiet());
        game.start(Some(&level(vec![Cell::new(2, 1)])));
        let start = game.player().unwrap().pos;

        game.step(&TickInput {
            direction: Some(Direction::Left),
            shoot: true,
        });

        assert_eq!(game.player().unwrap().pos, start + Direction::Left.delta() * 3.5);
        assert_eq!(game.time_ticks(), 1);
        assert_eq!(game.shoot_cooldown(), 30);
        assert_eq!(game.entities().iter().filter(|e| e.is_bullet()).count(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = Game::new(1, quiet());
        let json = serde_json::to_string(&game.snapshot()).unwrap();
        assert!(json.contains("\"level_name\":\"Default Level\""));
        assert!(json.contains("\"Running\""));
    }

    #[test]
    fn test_enemy_shot_joins_world_unmoved() {
        let tuning = Tuning {
            ai_shoot_chance: 1.0,
            ..Tuning::default()
        };
        let mut game = Game::new(7, tuning);
        game.start(Some(&level(vec![Cell::new(6, 6)])));
        let enemy = game.enemies()[0];

        game.update();

        // Wandered one step up before firing
        let enemy_pos = game.world().get(enemy).unwrap().pos;
        assert_eq!(enemy_pos, Vec2::new(192.0, 189.5));

        let bullets: Vec<&Entity> = game.entities().iter().filter(|e| e.is_bullet()).collect();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos, enemy_pos + Vec2::splat(12.0));
        assert!(bullets[0].is_live());
        assert!(std::ptr::eq(bullets[0], game.entities().last().unwrap()));

        game.update();
        let bullet = game.entities().iter().find(|e| e.is_bullet()).unwrap();
        assert_eq!(bullet.pos, enemy_pos + Vec2::splat(12.0) + Direction::Up.delta() * 5.0);
    }

    #[test]
    fn test_base_falls_after_five_hits() {
        let mut game = Game::new(3, quiet());
        game.start(Some(&arena(Cell::new(1, 1), vec![Cell::new(10, 1)])));
        let enemy = game.enemies()[0];
        let base = game.world().find_base().unwrap().id;

        for hit in 1..=4 {
            bullet_on(&mut game, enemy, base);
            game.update();
            assert_eq!(game.world().get(base).unwrap().lives(), Some(5 - hit));
            assert_eq!(game.phase(), GamePhase::Running);
        }

        bullet_on(&mut game, enemy, base);
        game.update();
        assert!(game.is_game_over());
        // Purged after evaluation
        assert!(game.world().find_base().is_none());
    }

    #[test]
    fn test_last_enemy_kill_completes_level_next_tick() {
        let mut game = Game::new(5, quiet());
        game.start(Some(&arena(Cell::new(6, 9), vec![Cell::new(6, 3)])));
        let player = game.player().unwrap().id;
        let enemy = game.enemies()[0];

        for _ in 0..2 {
            bullet_on(&mut game, player, enemy);
            game.update();
        }
        assert_eq!(game.world().get(enemy).unwrap().lives(), Some(1));

        // Destroyed this tick, but it was still alive when the enemy list was taken
        bullet_on(&mut game, player, enemy);
        game.update();
        assert!(game.world().get(enemy).is_none());
        assert_eq!(game.phase(), GamePhase::Running);

        game.update();
        assert!(game.is_level_complete());
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut game = Game::new(11, Tuning::default());
        game.start(Some(&arena(Cell::new(1, 1), vec![Cell::new(10, 1)])));
        let player = game.player().unwrap().id;
        game.world_mut().get_mut(player).unwrap().take_damage(3);
        game.update();
        assert!(game.is_game_over());

        let frozen = serde_json::to_string(&game.snapshot()).unwrap();
        let ticks = game.time_ticks();
        for _ in 0..100 {
            game.update();
            game.handle_player_shoot();
        }

        assert!(game.is_game_over());
        assert!(!game.is_level_complete());
        assert_eq!(game.time_ticks(), ticks);
        assert_eq!(serde_json::to_string(&game.snapshot()).unwrap(), frozen);
    }

    #[test]
    fn test_enemy_bullets_pass_through_enemies() {
        let mut game = Game::new(13, quiet());
        game.start(Some(&arena(
            Cell::new(1, 11),
            vec![Cell::new(3, 3), Cell::new(9, 3)],
        )));
        let enemies = game.enemies().to_vec();
        bullet_on(&mut game, enemies[0], enemies[1]);
        let bullet = game.entities().last().unwrap().id;

        game.update();

        assert_eq!(game.world().get(enemies[1]).unwrap().lives(), Some(3));
        assert!(game.world().get(bullet).unwrap().is_live());
    }
}
