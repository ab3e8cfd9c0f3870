use crate::enums::{AnimationType, FacingDirection, MovementState, RampDirection};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Starting and respawn health value
pub const MAX_HEALTH: i32 = 100;

/// Starting number of lives
pub const STARTING_LIVES: u32 = 3;

/// Position component - world coordinates
#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Velocity component - pixels per second
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Force accumulator, cleared by the physics plugin every tick.
///
/// `sustained` is an acceleration (scaled by the timestep on application),
/// `impulse` is an instantaneous velocity change (jump kicks).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Force {
    pub sustained: Vec2,
    pub impulse: Vec2,
}

impl Force {
    pub fn clear(&mut self) {
        self.sustained = Vec2::ZERO;
        self.impulse = Vec2::ZERO;
    }
}

/// Collider component - axis-aligned bounding box centered on the position
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Grounded state - result of the look-ahead ground probe
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GroundedState {
    pub is_grounded: bool,
    pub ground_normal: Vec2,
}

impl Default for GroundedState {
    fn default() -> Self {
        Self {
            is_grounded: false,
            ground_normal: Vec2::ZERO,
        }
    }
}

/// Ramp state - result of the look-in-front wall probe plus slope check
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RampState {
    pub on_ramp: bool,
    pub direction: RampDirection,
}

/// Player movement state machine plus facing
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub movement: MovementState,
    pub facing: FacingDirection,
}

/// Player health, 0-100 as displayed. The raw value may dip below zero
/// within a tick; life loss brings it back to `MAX_HEALTH` on respawn.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: i32,
}

impl Health {
    pub fn full() -> Self {
        Self {
            current: MAX_HEALTH,
        }
    }

    /// Value shown on the health bar - never negative
    pub fn displayed(&self) -> i32 {
        self.current.max(0)
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

/// Remaining lives. Decrements only on death-plane contact or depleted health.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Lives {
    pub remaining: u32,
}

impl Default for Lives {
    fn default() -> Self {
        Self {
            remaining: STARTING_LIVES,
        }
    }
}

/// Animation state - current animation and frame timer
#[derive(Component, Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub current: AnimationType,
    pub frame: usize,
    pub timer: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            current: AnimationType::Idle,
            frame: 0,
            timer: 0.0,
        }
    }
}

/// Player marker component
#[derive(Component)]
pub struct Player;

/// Player intent component - joystick-style axes in [-1, 1]
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerIntent {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Level geometry component - static collision data on a collision layer.
/// A `ramp` profile marks the piece as sloped instead of a flat box.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LevelGeometry {
    pub layer: crate::enums::SurfaceLayer,
    pub ramp: Option<crate::enums::RampProfile>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Death plane marker - touching it costs a life outright
#[derive(Component, Clone, Copy, Debug)]
pub struct DeathPlane;

/// Enemy marker - contact damage source
#[derive(Component, Clone, Copy, Debug)]
pub struct Enemy;

/// Bullet component - projectile damage source, despawned on hit
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub damage: i32,
}

impl Default for Bullet {
    fn default() -> Self {
        Self { damage: 10 }
    }
}

/// Camera shake component - countdown timer and current noise amplitude
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraShake {
    pub timer: f32,
    pub amplitude: f32,
}

impl CameraShake {
    pub fn is_shaking(&self) -> bool {
        self.amplitude > 0.0
    }
}

/// Dust trail particle - fades out and despawns after `duration`
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct DustTrail {
    pub elapsed: f32,
    pub duration: f32,
}

impl DustTrail {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(100.0, 200.0);
        assert_eq!(pos.x, 100.0);
        assert_eq!(pos.y, 200.0);
    }

    #[test]
    fn test_velocity_default() {
        let vel = Velocity::default();
        assert_eq!(vel.x, 0.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_force_clear() {
        let mut force = Force {
            sustained: Vec2::new(500.0, -20.0),
            impulse: Vec2::new(0.0, -400.0),
        };
        force.clear();
        assert_eq!(force.sustained, Vec2::ZERO);
        assert_eq!(force.impulse, Vec2::ZERO);
    }

    #[test]
    fn test_health_starts_full() {
        let health = Health::default();
        assert_eq!(health.current, MAX_HEALTH);
        assert!(!health.is_depleted());
    }

    #[test]
    fn test_health_displayed_never_negative() {
        let health = Health { current: -25 };
        assert_eq!(health.displayed(), 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_health_depleted_at_zero() {
        let health = Health { current: 0 };
        assert!(health.is_depleted());
    }

    #[test]
    fn test_lives_start_at_three() {
        let lives = Lives::default();
        assert_eq!(lives.remaining, STARTING_LIVES);
        assert_eq!(lives.remaining, 3);
    }

    #[test]
    fn test_grounded_state_default() {
        let grounded = GroundedState::default();
        assert!(!grounded.is_grounded);
        assert_eq!(grounded.ground_normal, Vec2::ZERO);
    }

    #[test]
    fn test_ramp_state_default() {
        let ramp = RampState::default();
        assert!(!ramp.on_ramp);
        assert_eq!(ramp.direction, crate::enums::RampDirection::None);
    }

    #[test]
    fn test_camera_shake_inactive_by_default() {
        let shake = CameraShake::default();
        assert!(!shake.is_shaking());
    }

    #[test]
    fn test_dust_trail_expiry() {
        let mut dust = DustTrail::new(0.25);
        assert!(!dust.is_expired());
        dust.elapsed = 0.3;
        assert!(dust.is_expired());
    }
}
