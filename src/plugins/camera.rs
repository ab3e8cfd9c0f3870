use crate::components::{CameraShake, Player, Position};
use crate::level::LevelData;
use crate::tuning::ControlTuning;
use bevy::prelude::*;

/// Camera follow speed constant - interpolation factor
const CAMERA_FOLLOW_SPEED: f32 = 3.0;

/// Target viewport dimensions in game units
/// This ensures consistent viewport size across different screen resolutions
const TARGET_VIEWPORT_WIDTH: f32 = 1280.0;
const TARGET_VIEWPORT_HEIGHT: f32 = 720.0;

/// Event requesting a camera shake burst, fired on damage
#[derive(Event, Clone, Copy, Debug)]
pub struct ShakeRequested;

/// Camera plugin - handles camera following, constraints, and shake
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlTuning>()
            .add_event::<ShakeRequested>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, start_shake_system)
            .add_systems(
                PostUpdate,
                (
                    camera_follow_system,
                    apply_shake_system,
                    update_camera_projection,
                )
                    .chain(),
            );
    }
}

/// Camera target component - marks the camera entity
#[derive(Component)]
pub struct GameCamera;

/// Setup camera entity
fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2dBundle::default(), GameCamera, CameraShake::default()));
}

/// Camera follow system - smoothly follows player with lag, constrained to
/// the level bounds when level data is available
fn camera_follow_system(
    time: Res<Time>,
    level_data: Option<Res<LevelData>>,
    player_query: Query<&Position, With<Player>>,
    mut camera_query: Query<&mut Transform, With<GameCamera>>,
) {
    let Ok(player_pos) = player_query.get_single() else {
        return;
    };

    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    let target_x = player_pos.x;
    let target_y = player_pos.y;

    // Smooth interpolation with lag
    let delta = time.delta_seconds();
    let lerp_factor = 1.0 - (-CAMERA_FOLLOW_SPEED * delta).exp();

    let mut new_x =
        camera_transform.translation.x + (target_x - camera_transform.translation.x) * lerp_factor;
    let mut new_y =
        camera_transform.translation.y + (target_y - camera_transform.translation.y) * lerp_factor;

    if let Some(level) = level_data {
        let half_viewport_width = TARGET_VIEWPORT_WIDTH / 2.0;
        let half_viewport_height = TARGET_VIEWPORT_HEIGHT / 2.0;

        // Camera center must not show areas outside the level bounds.
        // Levels smaller than the viewport are centered instead.
        if level.width > TARGET_VIEWPORT_WIDTH {
            new_x = new_x.clamp(half_viewport_width, level.width - half_viewport_width);
        } else {
            new_x = level.width / 2.0;
        }

        if level.height > TARGET_VIEWPORT_HEIGHT {
            new_y = new_y.clamp(half_viewport_height, level.height - half_viewport_height);
        } else {
            new_y = level.height / 2.0;
        }
    }

    camera_transform.translation.x = new_x;
    camera_transform.translation.y = new_y;
}

/// Arm the shake countdown when damage requests it
fn start_shake_system(
    mut shake_events: EventReader<ShakeRequested>,
    mut camera_query: Query<&mut CameraShake, With<GameCamera>>,
    tuning: Res<ControlTuning>,
) {
    let mut requested = false;
    for _ in shake_events.read() {
        requested = true;
    }

    if !requested {
        return;
    }

    for mut shake in camera_query.iter_mut() {
        shake.amplitude = tuning.shake_intensity;
        shake.timer = tuning.max_shake_time;
    }
}

/// Count the shake down and wobble the camera while it is active. Runs
/// after the follow system so the offset rides on top of the follow
/// position.
fn apply_shake_system(
    time: Res<Time>,
    mut camera_query: Query<(&mut CameraShake, &mut Transform), With<GameCamera>>,
) {
    for (mut shake, mut transform) in camera_query.iter_mut() {
        if !shake.is_shaking() {
            continue;
        }

        let offset = shake_offset(time.elapsed_seconds(), shake.amplitude);
        transform.translation.x += offset.x;
        transform.translation.y += offset.y;

        advance_shake(&mut shake, time.delta_seconds());
    }
}

/// Deterministic wobble offset - stands in for the perlin noise channel
/// the original drove through its virtual camera
pub fn shake_offset(elapsed: f32, amplitude: f32) -> Vec2 {
    Vec2::new((elapsed * 73.0).sin(), (elapsed * 101.0).cos()) * amplitude
}

/// Advance the shake countdown; amplitude drops to zero when the timer
/// expires
pub fn advance_shake(shake: &mut CameraShake, delta: f32) {
    shake.timer -= delta;
    if shake.timer <= 0.0 {
        shake.timer = 0.0;
        shake.amplitude = 0.0;
    }
}

/// Update camera projection to maintain consistent viewport scale
fn update_camera_projection(
    windows: Query<&Window>,
    mut camera_query: Query<&mut OrthographicProjection, With<GameCamera>>,
) {
    let Ok(mut projection) = camera_query.get_single_mut() else {
        return;
    };

    let window = windows.iter().next();
    let (window_width, window_height) = if let Some(win) = window {
        (win.width(), win.height())
    } else {
        (TARGET_VIEWPORT_WIDTH, TARGET_VIEWPORT_HEIGHT)
    };

    let scale_x = window_width / TARGET_VIEWPORT_WIDTH;
    let scale_y = window_height / TARGET_VIEWPORT_HEIGHT;

    // Use the smaller scale to ensure the entire game area is visible
    projection.scale = scale_x.min(scale_y);
}
