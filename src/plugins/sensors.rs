use crate::components::{GroundedState, LevelGeometry, Player, PlayerState, Position, RampState};
use crate::enums::{FacingDirection, RampDirection, SurfaceLayer};
use crate::plugins::physics::{TickSet, linecast_layer};
use crate::tuning::ControlTuning;
use bevy::prelude::*;

/// How far the ground normal may deviate from straight up before the
/// surface counts as a slope
const SLOPE_EPSILON: f32 = 0.01;

/// Plugin for the per-tick ground and wall probes
pub struct SensorsPlugin;

impl Plugin for SensorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (update_grounded_state, update_ramp_state)
                .chain()
                .in_set(TickSet::Sense),
        );
    }
}

/// Look-ahead probe: a linecast from the player toward a point ahead and
/// below, against the ground layer. Sets the grounded flag and records the
/// surface normal of whatever was hit.
fn update_grounded_state(
    mut query: Query<(&Position, &PlayerState, &mut GroundedState), With<Player>>,
    geometry_query: Query<&LevelGeometry>,
    tuning: Res<ControlTuning>,
) {
    for (position, state, mut grounded) in query.iter_mut() {
        let from = Vec2::new(position.x, position.y);
        let to = from + mirror_by_facing(tuning.look_ahead_offset.as_vec2(), state.facing);

        match linecast_layer(from, to, geometry_query.iter(), SurfaceLayer::Ground) {
            Some(hit) => {
                grounded.is_grounded = true;
                grounded.ground_normal = hit.normal;
            }
            None => {
                grounded.is_grounded = false;
                grounded.ground_normal = Vec2::ZERO;
            }
        }
    }
}

/// Look-in-front probe: a linecast toward a point in front of the player,
/// against the wall layer, combined with the slope check on the ground
/// normal to classify the ramp direction.
fn update_ramp_state(
    mut query: Query<(&Position, &PlayerState, &GroundedState, &mut RampState), With<Player>>,
    geometry_query: Query<&LevelGeometry>,
    tuning: Res<ControlTuning>,
) {
    for (position, state, grounded, mut ramp) in query.iter_mut() {
        let from = Vec2::new(position.x, position.y);
        let to = from + mirror_by_facing(tuning.look_in_front_offset.as_vec2(), state.facing);

        let wall_hit =
            linecast_layer(from, to, geometry_query.iter(), SurfaceLayer::Wall).is_some();

        let (on_ramp, direction) = classify_ramp(grounded, wall_hit);
        ramp.on_ramp = on_ramp;
        ramp.direction = direction;
    }
}

/// Classify the ramp state from the probe results.
///
/// Airborne: no ramp. Grounded on a sloped surface: a wall ahead means the
/// slope climbs away from us (`Up`), no wall means it falls away (`Down`).
pub fn classify_ramp(grounded: &GroundedState, wall_hit: bool) -> (bool, RampDirection) {
    if !grounded.is_grounded {
        return (false, RampDirection::None);
    }

    let on_slope = grounded.ground_normal.x.abs() > SLOPE_EPSILON;
    if !on_slope {
        return (false, RampDirection::None);
    }

    if wall_hit {
        (true, RampDirection::Up)
    } else {
        (true, RampDirection::Down)
    }
}

/// Mirror a probe offset horizontally when facing left
pub fn mirror_by_facing(offset: Vec2, facing: FacingDirection) -> Vec2 {
    match facing {
        FacingDirection::Right => offset,
        FacingDirection::Left => Vec2::new(-offset.x, offset.y),
    }
}
