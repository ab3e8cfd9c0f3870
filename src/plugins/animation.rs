use crate::components::{AnimationState, Player, PlayerState, Position};
use crate::enums::{AnimationType, FacingDirection, MovementState};
use bevy::prelude::*;

/// Seconds per animation frame
const FRAME_DURATION: f32 = 0.1;

/// Plugin for the player animation state machine and sprite sync
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                update_animation_state_system,
                advance_animation_system,
                sync_sprite_system,
            )
                .chain(),
        );
    }
}

/// Pick the animation for a movement state
pub fn animation_for(movement: MovementState) -> AnimationType {
    match movement {
        MovementState::Idle => AnimationType::Idle,
        MovementState::Run => AnimationType::Running,
        MovementState::Jump => AnimationType::Jumping,
        MovementState::Crouch => AnimationType::Crouching,
    }
}

/// Frames in each animation cycle
pub fn frame_count(animation: AnimationType) -> usize {
    match animation {
        AnimationType::Idle => 2,
        AnimationType::Running => 6,
        AnimationType::Jumping => 1,
        AnimationType::Crouching => 1,
    }
}

/// Switch the animation when the movement state changes, resetting the
/// frame counter so the new cycle starts from its first frame
fn update_animation_state_system(
    mut query: Query<(&PlayerState, &mut AnimationState), With<Player>>,
) {
    for (state, mut anim_state) in query.iter_mut() {
        let new_animation = animation_for(state.movement);

        if anim_state.current != new_animation {
            anim_state.current = new_animation;
            anim_state.frame = 0;
            anim_state.timer = 0.0;
        }
    }
}

/// Advance the frame timer and wrap around the current animation cycle
fn advance_animation_system(time: Res<Time>, mut query: Query<&mut AnimationState, With<Player>>) {
    for mut anim_state in query.iter_mut() {
        advance_frames(&mut anim_state, time.delta_seconds());
    }
}

/// Step an animation forward by `delta` seconds
pub fn advance_frames(anim_state: &mut AnimationState, delta: f32) {
    anim_state.timer += delta;

    while anim_state.timer >= FRAME_DURATION {
        anim_state.timer -= FRAME_DURATION;
        anim_state.frame = (anim_state.frame + 1) % frame_count(anim_state.current);
    }
}

/// Keep the sprite transform in sync with the simulated position and flip
/// it horizontally when the player faces left
fn sync_sprite_system(mut query: Query<(&Position, &PlayerState, &mut Transform), With<Player>>) {
    for (position, state, mut transform) in query.iter_mut() {
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        transform.scale.x = match state.facing {
            FacingDirection::Right => transform.scale.x.abs(),
            FacingDirection::Left => -transform.scale.x.abs(),
        };
    }
}
