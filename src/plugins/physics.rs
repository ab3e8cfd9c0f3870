use crate::components::{Collider, Force, GroundedState, LevelGeometry, Position, Velocity};
use crate::enums::{GamePhase, SurfaceLayer};
use crate::tuning::{ControlTuning, TuningLoadError, load_tuning_from_file};
use bevy::prelude::*;

/// Physics constants
pub const GRAVITY: f32 = 980.0; // pixels per second squared, +y is down
const FIXED_TIMESTEP: f32 = 1.0 / 60.0; // 60 FPS fixed timestep

/// Optional tuning override file, relative to the working directory
const TUNING_PATH: &str = "assets/tuning.json";

/// Per-tick system ordering: probes, then player intent, then simulation,
/// then contact resolution
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickSet {
    Sense,
    Act,
    Simulate,
    Resolve,
}

/// Plugin for force application, gravity, integration, and ground contact
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_state::<GamePhase>();
        app.init_resource::<ControlTuning>();
        app.insert_resource(Time::<Fixed>::from_seconds(FIXED_TIMESTEP as f64));
        app.configure_sets(
            FixedUpdate,
            (
                TickSet::Sense,
                TickSet::Act,
                TickSet::Simulate,
                TickSet::Resolve,
            )
                .chain()
                .run_if(in_state(GamePhase::Playing)),
        );
        app.add_systems(Startup, load_tuning_system);
        app.add_systems(
            FixedUpdate,
            (
                apply_forces,
                apply_gravity,
                apply_ground_drag,
                integrate_velocity,
                land_on_ground,
            )
                .chain()
                .in_set(TickSet::Simulate),
        );
    }
}

/// Override the default tuning from the optional tuning file. A missing
/// file is the normal case; a malformed one is rejected with a warning.
fn load_tuning_system(mut tuning: ResMut<ControlTuning>) {
    match load_tuning_from_file(TUNING_PATH) {
        Ok(loaded) => {
            info!("Loaded control tuning from {}", TUNING_PATH);
            *tuning = loaded;
        }
        Err(TuningLoadError::FileNotFound(_)) => {}
        Err(e) => {
            warn!("Ignoring tuning file {}: {}", TUNING_PATH, e);
        }
    }
}

/// Apply accumulated forces to velocity and clear the accumulator.
/// Sustained forces scale with the timestep, impulses do not.
fn apply_forces(mut query: Query<(&mut Velocity, &mut Force)>, time: Res<Time<Fixed>>) {
    let delta_time = time.delta_seconds();

    for (mut velocity, mut force) in query.iter_mut() {
        velocity.x += force.sustained.x * delta_time + force.impulse.x;
        velocity.y += force.sustained.y * delta_time + force.impulse.y;
        force.clear();
    }
}

/// Apply gravity to airborne entities
fn apply_gravity(mut query: Query<(&mut Velocity, &GroundedState)>, time: Res<Time<Fixed>>) {
    let delta_time = time.delta_seconds();

    for (mut velocity, grounded) in query.iter_mut() {
        if !grounded.is_grounded {
            velocity.y += GRAVITY * delta_time;
        }
    }
}

/// Damp horizontal velocity while grounded. The original leaned on the
/// engine's friction for this; without it run speed would grow unbounded.
fn apply_ground_drag(
    mut query: Query<(&mut Velocity, &GroundedState)>,
    tuning: Res<ControlTuning>,
    time: Res<Time<Fixed>>,
) {
    let delta_time = time.delta_seconds();
    let factor = (1.0 - tuning.ground_drag * delta_time).max(0.0);

    for (mut velocity, grounded) in query.iter_mut() {
        if grounded.is_grounded {
            velocity.x *= factor;
        }
    }
}

/// Integrate velocity to update position each tick
fn integrate_velocity(mut query: Query<(&mut Position, &Velocity)>, time: Res<Time<Fixed>>) {
    let delta_time = time.delta_seconds();

    for (mut position, velocity) in query.iter_mut() {
        position.x += velocity.x * delta_time;
        position.y += velocity.y * delta_time;
    }
}

/// Land falling entities on ground surfaces: when an entity's bottom edge
/// has sunk past a ground surface while moving downward, snap it onto the
/// surface and stop the fall.
fn land_on_ground(
    mut query: Query<(&mut Position, &mut Velocity, &Collider)>,
    geometry_query: Query<&LevelGeometry>,
) {
    for (mut position, mut velocity, collider) in query.iter_mut() {
        if velocity.y < 0.0 {
            continue; // moving up
        }

        let half_width = collider.width / 2.0;
        let bottom = position.y + collider.height / 2.0;

        for geometry in geometry_query.iter() {
            if geometry.layer != SurfaceLayer::Ground {
                continue;
            }

            if position.x + half_width <= geometry.x
                || position.x - half_width >= geometry.x + geometry.width
            {
                continue;
            }

            let surface_y = surface_height_at(geometry, position.x);

            // Only resolve shallow penetration so tunnelling through a
            // whole platform from far above does not teleport the entity
            if bottom >= surface_y && bottom - surface_y <= collider.height {
                position.y = surface_y - collider.height / 2.0;
                velocity.y = 0.0;
            }
        }
    }
}

/// Height of the walkable surface of a geometry piece at a given x.
/// Flat pieces use their top edge; ramps interpolate along the hypotenuse.
pub fn surface_height_at(geometry: &LevelGeometry, x: f32) -> f32 {
    match geometry.ramp {
        None => geometry.y,
        Some(profile) => {
            let t = ((x - geometry.x) / geometry.width).clamp(0.0, 1.0);
            match profile {
                crate::enums::RampProfile::RisesRight => geometry.y + geometry.height * (1.0 - t),
                crate::enums::RampProfile::RisesLeft => geometry.y + geometry.height * t,
            }
        }
    }
}

/// Result of a linecast - first intersection point and surface normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinecastHit {
    pub point: Vec2,
    pub normal: Vec2,
    pub fraction: f32,
}

/// Cast a line segment against one piece of level geometry.
///
/// Flat pieces are tested as AABBs with the slab method; ramp pieces are
/// tested against their sloped surface segment so the hit normal reflects
/// the incline.
pub fn linecast(from: Vec2, to: Vec2, geometry: &LevelGeometry) -> Option<LinecastHit> {
    match geometry.ramp {
        None => linecast_aabb(from, to, geometry),
        Some(profile) => linecast_ramp(from, to, geometry, profile),
    }
}

/// Cast a line against every geometry piece on a layer, returning the
/// nearest hit
pub fn linecast_layer<'a>(
    from: Vec2,
    to: Vec2,
    geometry: impl Iterator<Item = &'a LevelGeometry>,
    layer: SurfaceLayer,
) -> Option<LinecastHit> {
    let mut nearest: Option<LinecastHit> = None;

    for geo in geometry {
        if geo.layer != layer {
            continue;
        }

        if let Some(hit) = linecast(from, to, geo) {
            let closer = nearest.map_or(true, |best| hit.fraction < best.fraction);
            if closer {
                nearest = Some(hit);
            }
        }
    }

    nearest
}

fn linecast_aabb(from: Vec2, to: Vec2, geometry: &LevelGeometry) -> Option<LinecastHit> {
    let min = Vec2::new(geometry.x, geometry.y);
    let max = Vec2::new(geometry.x + geometry.width, geometry.y + geometry.height);
    let delta = to - from;

    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (origin, d, lo, hi) = if axis == 0 {
            (from.x, delta.x, min.x, max.x)
        } else {
            (from.y, delta.y, min.y, max.y)
        };

        if d.abs() < f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let mut t1 = (lo - origin) / d;
        let mut t2 = (hi - origin) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        if t1 > t_enter {
            t_enter = t1;
            normal = if axis == 0 {
                Vec2::new(-d.signum(), 0.0)
            } else {
                Vec2::new(0.0, -d.signum())
            };
        }
        t_exit = t_exit.min(t2);

        if t_enter > t_exit {
            return None;
        }
    }

    // Segment starts inside the box
    if normal == Vec2::ZERO {
        return Some(LinecastHit {
            point: from,
            normal: Vec2::ZERO,
            fraction: 0.0,
        });
    }

    Some(LinecastHit {
        point: from + delta * t_enter,
        normal,
        fraction: t_enter,
    })
}

fn linecast_ramp(
    from: Vec2,
    to: Vec2,
    geometry: &LevelGeometry,
    profile: crate::enums::RampProfile,
) -> Option<LinecastHit> {
    // Hypotenuse endpoints, left to right
    let (a, b) = match profile {
        crate::enums::RampProfile::RisesRight => (
            Vec2::new(geometry.x, geometry.y + geometry.height),
            Vec2::new(geometry.x + geometry.width, geometry.y),
        ),
        crate::enums::RampProfile::RisesLeft => (
            Vec2::new(geometry.x, geometry.y),
            Vec2::new(geometry.x + geometry.width, geometry.y + geometry.height),
        ),
    };

    let (t, point) = segment_intersection(from, to, a, b)?;

    let along = b - a;
    // Perpendicular with an upward (-y) component
    let normal = Vec2::new(along.y, -along.x).normalize_or_zero();

    Some(LinecastHit {
        point,
        normal,
        fraction: t,
    })
}

/// Intersection of segments p1->p2 and p3->p4, returning the fraction
/// along the first segment and the intersection point
fn segment_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<(f32, Vec2)> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.x * d2.y - d1.y * d2.x;

    if denom.abs() < f32::EPSILON {
        return None; // parallel
    }

    let diff = p3 - p1;
    let t = (diff.x * d2.y - diff.y * d2.x) / denom;
    let u = (diff.x * d1.y - diff.y * d1.x) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, p1 + d1 * t))
    } else {
        None
    }
}

/// AABB overlap test between two centered boxes
pub fn aabb_overlap(
    pos_a: &Position,
    collider_a: &Collider,
    pos_b: &Position,
    collider_b: &Collider,
) -> bool {
    let a_left = pos_a.x - collider_a.width / 2.0;
    let a_right = pos_a.x + collider_a.width / 2.0;
    let a_top = pos_a.y - collider_a.height / 2.0;
    let a_bottom = pos_a.y + collider_a.height / 2.0;

    let b_left = pos_b.x - collider_b.width / 2.0;
    let b_right = pos_b.x + collider_b.width / 2.0;
    let b_top = pos_b.y - collider_b.height / 2.0;
    let b_bottom = pos_b.y + collider_b.height / 2.0;

    a_right > b_left && a_left < b_right && a_bottom > b_top && a_top < b_bottom
}
