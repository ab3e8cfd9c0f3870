use crate::components::{
    Bullet, Collider, DeathPlane, Enemy, Health, Lives, MAX_HEALTH, Player, Position, Velocity,
};
use crate::enums::GamePhase;
use crate::plugins::camera::ShakeRequested;
use crate::plugins::level::SpawnPoint;
use crate::plugins::physics::{TickSet, aabb_overlap};
use bevy::prelude::*;
use std::collections::HashSet;

/// Enemy contact re-damages every this many physics ticks while touching
const CONTACT_DAMAGE_INTERVAL: u64 = 20;

/// Damage on first enemy contact
const ENEMY_TOUCH_DAMAGE: i32 = 15;

/// Damage while staying in enemy contact
const ENEMY_GRIND_DAMAGE: i32 = 5;

/// Event carrying a damage amount toward the player
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct DamageEvent {
    pub amount: i32,
}

/// Event fired when the player loses a life
#[derive(Event, Clone, Copy, Debug)]
pub struct LifeLost;

/// Plugin for damage, health, lives, and respawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageEvent>()
            .add_event::<LifeLost>()
            .add_event::<ShakeRequested>()
            .add_systems(
                FixedUpdate,
                (
                    death_plane_contact_system,
                    bullet_hit_system,
                    enemy_contact_system,
                    apply_damage_system,
                    life_loss_system,
                )
                    .chain()
                    .in_set(TickSet::Resolve),
            );
    }
}

/// Reduce health by a damage amount. Returns the new value and whether the
/// hit depleted it.
pub fn resolve_damage(health: i32, amount: i32) -> (i32, bool) {
    let next = health - amount;
    (next, next <= 0)
}

/// Touching a death plane costs a life outright. Only the crossing into
/// the plane counts, so a respawn point placed badly cannot drain every
/// life in one overlap.
fn death_plane_contact_system(
    player_query: Query<(&Position, &Collider), With<Player>>,
    plane_query: Query<(Entity, &Position, &Collider), With<DeathPlane>>,
    mut touching: Local<HashSet<Entity>>,
    mut life_events: EventWriter<LifeLost>,
) {
    let Ok((player_pos, player_collider)) = player_query.get_single() else {
        return;
    };

    for (plane, plane_pos, plane_collider) in plane_query.iter() {
        let overlapping = aabb_overlap(player_pos, player_collider, plane_pos, plane_collider);

        if overlapping && !touching.contains(&plane) {
            touching.insert(plane);
            life_events.send(LifeLost);
        } else if !overlapping {
            touching.remove(&plane);
        }
    }
}

/// Bullets damage on contact and are consumed
fn bullet_hit_system(
    mut commands: Commands,
    player_query: Query<(&Position, &Collider), With<Player>>,
    bullet_query: Query<(Entity, &Position, &Collider, &Bullet)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player_pos, player_collider)) = player_query.get_single() else {
        return;
    };

    for (entity, bullet_pos, bullet_collider, bullet) in bullet_query.iter() {
        if aabb_overlap(player_pos, player_collider, bullet_pos, bullet_collider) {
            damage_events.send(DamageEvent {
                amount: bullet.damage,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// Enemy contact: a heavy hit on first touch, then a smaller chip every
/// `CONTACT_DAMAGE_INTERVAL` ticks while the contact persists
fn enemy_contact_system(
    player_query: Query<(&Position, &Collider), With<Player>>,
    enemy_query: Query<(Entity, &Position, &Collider), With<Enemy>>,
    mut touching: Local<HashSet<Entity>>,
    mut tick: Local<u64>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    *tick = tick.wrapping_add(1);

    let Ok((player_pos, player_collider)) = player_query.get_single() else {
        return;
    };

    for (enemy, enemy_pos, enemy_collider) in enemy_query.iter() {
        let overlapping = aabb_overlap(player_pos, player_collider, enemy_pos, enemy_collider);

        if overlapping && !touching.contains(&enemy) {
            touching.insert(enemy);
            damage_events.send(DamageEvent {
                amount: ENEMY_TOUCH_DAMAGE,
            });
        } else if overlapping && *tick % CONTACT_DAMAGE_INTERVAL == 0 {
            damage_events.send(DamageEvent {
                amount: ENEMY_GRIND_DAMAGE,
            });
        } else if !overlapping {
            touching.remove(&enemy);
        }
    }
}

/// Apply queued damage to the player: subtract health, request camera
/// shake, and signal at most one life loss when health is depleted
fn apply_damage_system(
    mut damage_events: EventReader<DamageEvent>,
    mut player_query: Query<&mut Health, With<Player>>,
    mut shake_events: EventWriter<ShakeRequested>,
    mut life_events: EventWriter<LifeLost>,
) {
    let Ok(mut health) = player_query.get_single_mut() else {
        return;
    };

    let mut hit = false;
    for event in damage_events.read() {
        let (next, _) = resolve_damage(health.current, event.amount);
        health.current = next;
        hit = true;
    }

    if hit {
        shake_events.send(ShakeRequested);
        if health.is_depleted() {
            life_events.send(LifeLost);
        }
    }
}

/// Spend a life. With lives remaining: restore health and reposition to
/// the spawn point. On the last life: enter the end phase, exactly once.
#[allow(clippy::type_complexity)]
fn life_loss_system(
    mut life_events: EventReader<LifeLost>,
    mut player_query: Query<
        (&mut Health, &mut Lives, &mut Position, &mut Velocity),
        With<Player>,
    >,
    spawn_point: Option<Res<SpawnPoint>>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    let Ok((mut health, mut lives, mut position, mut velocity)) = player_query.get_single_mut()
    else {
        return;
    };

    for _ in life_events.read() {
        lives.remaining = lives.remaining.saturating_sub(1);

        if lives.remaining > 0 {
            health.current = MAX_HEALTH;
            if let Some(ref spawn) = spawn_point {
                position.x = spawn.x;
                position.y = spawn.y;
            } else {
                warn!("No spawn point set, respawning in place");
            }
            *velocity = Velocity::default();
            info!("Life lost, {} remaining", lives.remaining);
        } else {
            info!("Out of lives, game over");
            next_phase.set(GamePhase::End);
            break;
        }
    }
}
