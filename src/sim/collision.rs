//! Collision queries over a snapshot of the entity collection
//!
//! Two independent passes: movement feasibility for tanks (a prediction that
//! never mutates), and bullet impact resolution (which does).

use glam::Vec2;

use super::rect::Rect;
use super::state::{Entity, EntityId, EntityKind};
use crate::consts::{HITBOX_INSET, MAP_SIZE};

/// A bullet striking a target during impact resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub bullet: EntityId,
    pub target: EntityId,
}

/// Check whether `mover` may occupy `candidate` (its new top-left corner).
///
/// The nominal box must stay inside the map. The hit-box at the candidate
/// position must not overlap the hit-box of any other live, non-bullet entity.
pub fn can_move_to(mover: &Entity, candidate: Vec2, entities: &[Entity]) -> bool {
    let nominal = Rect::new(candidate, mover.size);
    if !nominal.within_square(MAP_SIZE) {
        return false;
    }

    let future = nominal.inset(HITBOX_INSET);

    !entities.iter().any(|other| {
        other.id != mover.id
            && !other.is_bullet()
            && other.is_live()
            && future.intersects(&other.hit_box())
    })
}

/// Resolve bullet hits for this tick.
///
/// Each live bullet scans live, non-bullet targets in collection order and
/// stops at the first hit-box overlap: the bullet is destroyed and the
/// target takes one point of damage. A bullet never hits its own firer, and
/// bullets fired by an enemy tank pass through other enemy tanks.
///
/// Bullets and targets are both gathered before any damage is applied, so a
/// target destroyed earlier in the pass can still absorb later bullets.
pub fn resolve_bullet_collisions(entities: &mut [Entity]) -> Vec<Impact> {
    let bullets: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_bullet() && e.is_live())
        .map(|(i, _)| i)
        .collect();
    let targets: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_bullet() && e.is_live())
        .map(|(i, _)| i)
        .collect();

    let mut impacts = Vec::new();

    for &b in &bullets {
        let EntityKind::Bullet(bullet) = &entities[b].kind else {
            continue;
        };
        let owner_id = bullet.owner;
        // An owner that has left the world grants no exemption
        let fired_by_enemy = entities
            .iter()
            .find(|e| e.id == owner_id)
            .is_some_and(Entity::is_enemy_tank);
        let bullet_box = entities[b].hit_box();

        for &t in &targets {
            let target = &entities[t];
            if target.id == owner_id {
                continue;
            }
            if fired_by_enemy && target.is_enemy_tank() {
                continue;
            }

            if bullet_box.intersects(&target.hit_box()) {
                let target_id = target.id;
                entities[b].destroy();
                entities[t].take_damage(1);
                log::debug!(
                    "Bullet {} hit {} at ({:.1}, {:.1})",
                    entities[b].id,
                    target_id,
                    entities[t].pos.x,
                    entities[t].pos.y
                );
                impacts.push(Impact {
                    bullet: entities[b].id,
                    target: target_id,
                });
                break;
            }
        }
    }

    impacts
}
