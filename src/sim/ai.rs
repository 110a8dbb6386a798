//! Enemy tank controller
//!
//! An open-loop wander policy: keep driving in the current direction, and at
//! randomized decision points re-roll the direction if the tank has been
//! stuck too long (or occasionally anyway). Enemies never look at the player;
//! obstacles are only noticed through blocked movement. Independently, every
//! tick carries a small chance of firing.

use rand::Rng;

use super::state::{AiState, Direction, EntityId, Spawn};
use super::world::World;
use crate::consts::MOVE_EPSILON;
use crate::tuning::Tuning;

fn roll_threshold<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> u32 {
    let jitter = if tuning.ai_threshold_jitter > 0 {
        rng.random_range(0..tuning.ai_threshold_jitter)
    } else {
        0
    };
    tuning.ai_threshold_base + jitter
}

/// Run one tick of the wander policy for enemy `id`.
///
/// Returns the bullet the enemy fired this tick, if any. The caller stages
/// it into the world.
pub fn update_enemy<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<Spawn> {
    let (decision_point, wander) = {
        let entity = world.get_mut(id)?;
        if !entity.is_live() || !entity.is_enemy_tank() {
            return None;
        }
        let ai = &mut entity.as_tank_mut()?.ai;
        ai.action_timer += 1;
        let threshold = *ai
            .threshold
            .get_or_insert_with(|| roll_threshold(tuning, rng));
        (ai.action_timer >= threshold, ai.wander)
    };

    if decision_point {
        let before = world.get(id)?.pos;
        world.move_tank(id, wander);
        let after = world.get(id)?.pos;
        let blocked = (after - before).abs().max_element() < MOVE_EPSILON;

        let ai = &mut world.get_mut(id)?.as_tank_mut()?.ai;
        decide(ai, blocked, tuning, rng);
    } else {
        world.move_tank(id, wander);
    }

    if rng.random::<f64>() < tuning.ai_shoot_chance {
        return world.get(id)?.shoot(tuning.bullet_speed);
    }
    None
}

/// Decision point bookkeeping: count blocked attempts, maybe re-roll the
/// direction, and restart the timer.
fn decide<R: Rng + ?Sized>(ai: &mut AiState, blocked: bool, tuning: &Tuning, rng: &mut R) {
    if blocked {
        ai.stuck_counter += 1;
    }

    let stuck = ai.stuck_counter > tuning.ai_stuck_limit;
    if stuck || rng.random::<f64>() < tuning.ai_direction_change_chance {
        let previous = ai.wander;
        ai.wander = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        ai.stuck_counter = 0;
        log::trace!("Enemy re-rolled {previous:?} -> {:?} (stuck: {stuck})", ai.wander);
    }

    ai.action_timer = 0;
    ai.threshold = Some(roll_threshold(tuning, rng));
}
