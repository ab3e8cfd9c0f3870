use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Ramp direction - slope orientation relative to the player's path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RampDirection {
    #[default]
    None,
    Up,
    Down,
}

/// Player movement state - explicit state machine replacing per-frame flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementState {
    #[default]
    Idle,
    Run,
    Jump,
    Crouch,
}

/// Facing direction for sprite orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingDirection {
    #[default]
    Right,
    Left,
}

/// Animation type - different sprite animations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationType {
    Idle,
    Running,
    Jumping,
    Crouching,
}

/// Slope profile of a ramp geometry piece - which side the surface rises
/// toward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampProfile {
    RisesRight,
    RisesLeft,
}

/// Collision layer a piece of level geometry belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLayer {
    Ground,
    Wall,
}

/// Top-level game phase - `End` is entered when the last life is lost
#[derive(States, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    #[default]
    Playing,
    End,
}
