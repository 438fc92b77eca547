use crate::game::state::{EnemyEntity, LocalEntity, MapBounds, SessionState};
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Integrate velocities for the avatar and every enemy.
///
/// Bodies stay inside the map. The avatar is blocked per axis by enemy bodies;
/// enemies are immovable and never pushed.
pub fn update(state: &mut SessionState, dt: f32) {
    let bounds = state.bounds;

    for enemy in &mut state.enemies {
        integrate_enemy(enemy, bounds, dt);
    }

    if let Some(local) = state.local.as_mut() {
        let blockers: Vec<Rect> = state.enemies.iter().map(EnemyEntity::body).collect();
        integrate_local(local, bounds, &blockers, dt);
    }
}

fn integrate_enemy(enemy: &mut EnemyEntity, bounds: MapBounds, dt: f32) {
    enemy.position += enemy.velocity * dt;
    if enemy.collide_world_bounds {
        enemy.position = bounds.clamp(enemy.position);
    }
}

fn integrate_local(local: &mut LocalEntity, bounds: MapBounds, blockers: &[Rect], dt: f32) {
    // World bounds hold even for an idle avatar
    local.position = bounds.clamp(local.position);

    let step = local.velocity * dt;

    // Resolve axes separately so the avatar slides along enemy edges
    for axis_step in [Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
        if axis_step == Vec2::ZERO {
            continue;
        }

        let current = local.body();
        let candidate = bounds.clamp(local.position + axis_step);
        let moved = current.translated(candidate - local.position);

        let blocked = blockers
            .iter()
            .any(|enemy| moved.overlaps(enemy) && !current.overlaps(enemy));

        if !blocked {
            local.position = candidate;
        }
    }
}
