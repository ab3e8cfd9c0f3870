use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Control tuning resource - the knobs the original exposed in the editor.
///
/// Loaded from JSON at startup when a tuning file is present, otherwise the
/// defaults below apply. Not mutated at runtime.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlTuning {
    /// Horizontal axis dead zone, in (0, 1]
    pub joystick_horizontal_sensitivity: f32,
    /// Vertical axis dead zone, in (0, 1]
    pub joystick_vertical_sensitivity: f32,
    /// Run acceleration, pixels per second squared
    pub horizontal_force: f32,
    /// Jump impulse, pixels per second
    pub vertical_force: f32,
    /// Scale of the along-slope assist force while on a ramp
    pub ramp_force_sensitivity: f32,
    /// Horizontal damping while grounded, per second
    pub ground_drag: f32,
    /// Camera shake duration in seconds
    pub max_shake_time: f32,
    /// Camera shake noise amplitude in pixels
    pub shake_intensity: f32,
    /// Ground probe endpoint, relative to the player position (+y is down)
    pub look_ahead_offset: ProbeOffset,
    /// Wall probe endpoint, relative to the player position
    pub look_in_front_offset: ProbeOffset,
}

/// Offset of a probe endpoint from the player position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeOffset {
    pub x: f32,
    pub y: f32,
}

impl ProbeOffset {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            joystick_horizontal_sensitivity: 0.2,
            joystick_vertical_sensitivity: 0.3,
            horizontal_force: 600.0,
            vertical_force: 420.0,
            ramp_force_sensitivity: 0.5,
            ground_drag: 8.0,
            max_shake_time: 0.3,
            shake_intensity: 6.0,
            look_ahead_offset: ProbeOffset { x: 12.0, y: 36.0 },
            look_in_front_offset: ProbeOffset { x: 24.0, y: 0.0 },
        }
    }
}

/// Load tuning from a JSON file
pub fn load_tuning_from_file(path: &str) -> Result<ControlTuning, TuningLoadError> {
    if !Path::new(path).exists() {
        return Err(TuningLoadError::FileNotFound(path.to_string()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| TuningLoadError::IoError(path.to_string(), e.to_string()))?;

    let tuning: ControlTuning = serde_json::from_str(&contents)
        .map_err(|e| TuningLoadError::ParseError(path.to_string(), e.to_string()))?;

    validate_tuning(&tuning)?;

    Ok(tuning)
}

/// Validate tuning values for sane ranges
pub fn validate_tuning(tuning: &ControlTuning) -> Result<(), TuningLoadError> {
    if tuning.joystick_horizontal_sensitivity <= 0.0 || tuning.joystick_horizontal_sensitivity > 1.0
    {
        return Err(TuningLoadError::ValidationError(
            "Horizontal sensitivity must be in (0, 1]".to_string(),
        ));
    }

    if tuning.joystick_vertical_sensitivity <= 0.0 || tuning.joystick_vertical_sensitivity > 1.0 {
        return Err(TuningLoadError::ValidationError(
            "Vertical sensitivity must be in (0, 1]".to_string(),
        ));
    }

    if tuning.horizontal_force <= 0.0 {
        return Err(TuningLoadError::ValidationError(
            "Horizontal force must be positive".to_string(),
        ));
    }

    if tuning.vertical_force <= 0.0 {
        return Err(TuningLoadError::ValidationError(
            "Vertical force must be positive".to_string(),
        ));
    }

    if tuning.ramp_force_sensitivity < 0.0 {
        return Err(TuningLoadError::ValidationError(
            "Ramp force sensitivity cannot be negative".to_string(),
        ));
    }

    if tuning.max_shake_time <= 0.0 {
        return Err(TuningLoadError::ValidationError(
            "Shake duration must be positive".to_string(),
        ));
    }

    if tuning.shake_intensity < 0.0 {
        return Err(TuningLoadError::ValidationError(
            "Shake intensity cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Tuning loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum TuningLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for TuningLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningLoadError::FileNotFound(path) => write!(f, "Tuning file not found: {}", path),
            TuningLoadError::IoError(path, err) => {
                write!(f, "IO error reading tuning file {}: {}", path, err)
            }
            TuningLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse tuning file {}: {}", path, err)
            }
            TuningLoadError::ValidationError(msg) => write!(f, "Tuning validation error: {}", msg),
        }
    }
}

impl std::error::Error for TuningLoadError {}
