use crate::components::{Force, GroundedState, Player, PlayerIntent, PlayerState, Position, RampState};
use crate::enums::{FacingDirection, MovementState, RampDirection};
use crate::plugins::physics::TickSet;
use crate::tuning::ControlTuning;
use bevy::prelude::*;

/// Event fired when the player leaves the ground with a jump
#[derive(Event)]
pub struct Jumped;

/// Event fired when movement kicks up a dust trail
#[derive(Event)]
pub struct DustKickedUp {
    pub x: f32,
    pub y: f32,
}

/// Plugin for player input and movement
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Jumped>().add_event::<DustKickedUp>();
        app.add_systems(Update, read_input_system);
        app.add_systems(
            FixedUpdate,
            (apply_horizontal_movement_system, apply_jump_crouch_system)
                .chain()
                .in_set(TickSet::Act),
        );
    }
}

/// Translate keyboard input into joystick-style axes
fn read_input_system(
    keyboard: Res<Input<KeyCode>>,
    mut query: Query<&mut PlayerIntent, With<Player>>,
) {
    let mut horizontal = 0.0;
    if keyboard.pressed(KeyCode::Right) || keyboard.pressed(KeyCode::D) {
        horizontal += 1.0;
    }
    if keyboard.pressed(KeyCode::Left) || keyboard.pressed(KeyCode::A) {
        horizontal -= 1.0;
    }

    let mut vertical = 0.0;
    if keyboard.pressed(KeyCode::Up)
        || keyboard.pressed(KeyCode::W)
        || keyboard.pressed(KeyCode::Space)
    {
        vertical += 1.0;
    }
    if keyboard.pressed(KeyCode::Down) || keyboard.pressed(KeyCode::S) {
        vertical -= 1.0;
    }

    for mut intent in query.iter_mut() {
        intent.horizontal = horizontal;
        intent.vertical = vertical;
    }
}

/// Apply horizontal run forces while grounded. The axis must clear the
/// sensitivity threshold; on a ramp an along-slope assist force is added so
/// the player tracks the surface instead of launching off it.
#[allow(clippy::type_complexity)]
fn apply_horizontal_movement_system(
    mut query: Query<
        (
            &PlayerIntent,
            &GroundedState,
            &RampState,
            &Position,
            &mut Force,
            &mut PlayerState,
        ),
        With<Player>,
    >,
    tuning: Res<ControlTuning>,
    mut dust_events: EventWriter<DustKickedUp>,
) {
    for (intent, grounded, ramp, position, mut force, mut state) in query.iter_mut() {
        if !grounded.is_grounded {
            continue;
        }

        // Horizontal movement is suppressed mid-jump and while crouched
        if state.movement == MovementState::Jump || state.movement == MovementState::Crouch {
            continue;
        }

        if intent.horizontal > tuning.joystick_horizontal_sensitivity {
            force.sustained.x += tuning.horizontal_force;
            state.facing = FacingDirection::Right;
            apply_ramp_assist(&mut force, ramp, &tuning);
            dust_events.send(DustKickedUp {
                x: position.x,
                y: position.y,
            });
            state.movement = MovementState::Run;
        } else if intent.horizontal < -tuning.joystick_horizontal_sensitivity {
            force.sustained.x -= tuning.horizontal_force;
            state.facing = FacingDirection::Left;
            apply_ramp_assist(&mut force, ramp, &tuning);
            dust_events.send(DustKickedUp {
                x: position.x,
                y: position.y,
            });
            state.movement = MovementState::Run;
        } else {
            state.movement = MovementState::Idle;
        }
    }
}

/// Extra vertical force tracking the ramp surface: up-slope pushes up,
/// down-slope pushes down (+y is down)
fn apply_ramp_assist(force: &mut Force, ramp: &RampState, tuning: &ControlTuning) {
    if !ramp.on_ramp {
        return;
    }

    let assist = tuning.horizontal_force * tuning.ramp_force_sensitivity;
    match ramp.direction {
        RampDirection::Up => force.sustained.y -= assist,
        RampDirection::Down => force.sustained.y += assist,
        RampDirection::None => {}
    }
}

/// Jump and crouch transitions, re-evaluated every tick. Jump is
/// edge-triggered: holding the axis up does not fire a second impulse until
/// the state has left `Jump`.
#[allow(clippy::type_complexity)]
fn apply_jump_crouch_system(
    mut query: Query<
        (
            &PlayerIntent,
            &GroundedState,
            &Position,
            &mut Force,
            &mut PlayerState,
        ),
        With<Player>,
    >,
    tuning: Res<ControlTuning>,
    mut jump_events: EventWriter<Jumped>,
    mut dust_events: EventWriter<DustKickedUp>,
) {
    for (intent, grounded, position, mut force, mut state) in query.iter_mut() {
        if !grounded.is_grounded {
            continue;
        }

        if intent.vertical > tuning.joystick_vertical_sensitivity {
            if state.movement != MovementState::Jump {
                force.impulse.y -= tuning.vertical_force;
                jump_events.send(Jumped);
                dust_events.send(DustKickedUp {
                    x: position.x,
                    y: position.y,
                });
                state.movement = MovementState::Jump;
            }
        } else if state.movement == MovementState::Jump {
            state.movement = MovementState::Idle;
        }

        if intent.vertical < -tuning.joystick_vertical_sensitivity {
            if state.movement != MovementState::Jump {
                state.movement = MovementState::Crouch;
            }
        } else if state.movement == MovementState::Crouch {
            state.movement = MovementState::Idle;
        }
    }
}
