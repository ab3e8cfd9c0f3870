use crate::enums::{RampProfile, SurfaceLayer};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Level data structure matching JSON format. Inserted as a resource once
/// loaded so the camera can read the level bounds.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub spawn_point: SpawnPointData,
    pub geometry: Vec<GeometryData>,
    #[serde(default)]
    pub death_planes: Vec<TriggerArea>,
}

/// Spawn point data - where the player starts and respawns
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointData {
    pub x: f32,
    pub y: f32,
}

/// Geometry data for level collision, tagged with its collision layer.
/// An optional ramp profile makes the piece a slope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryData {
    pub layer: SurfaceLayer,
    #[serde(default)]
    pub ramp: Option<RampProfile>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Trigger area rectangle for death planes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LevelData {
    /// A minimal built-in level used when no level file is available:
    /// a flat floor, one ramp approach wall, and a death plane below.
    pub fn fallback() -> Self {
        Self {
            id: "fallback".to_string(),
            width: 1280.0,
            height: 720.0,
            spawn_point: SpawnPointData { x: 120.0, y: 560.0 },
            geometry: vec![
                GeometryData {
                    layer: SurfaceLayer::Ground,
                    ramp: None,
                    x: 0.0,
                    y: 600.0,
                    width: 1280.0,
                    height: 64.0,
                },
                GeometryData {
                    layer: SurfaceLayer::Ground,
                    ramp: Some(RampProfile::RisesRight),
                    x: 700.0,
                    y: 500.0,
                    width: 200.0,
                    height: 100.0,
                },
                GeometryData {
                    layer: SurfaceLayer::Wall,
                    ramp: None,
                    x: 900.0,
                    y: 400.0,
                    width: 32.0,
                    height: 100.0,
                },
            ],
            death_planes: vec![TriggerArea {
                x: 0.0,
                y: 700.0,
                width: 1280.0,
                height: 20.0,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_data_serialization() {
        let level = LevelData {
            id: "test_level".to_string(),
            width: 1920.0,
            height: 1080.0,
            spawn_point: SpawnPointData { x: 100.0, y: 500.0 },
            geometry: vec![
                GeometryData {
                    layer: SurfaceLayer::Ground,
                    ramp: None,
                    x: 0.0,
                    y: 1000.0,
                    width: 1920.0,
                    height: 64.0,
                },
                GeometryData {
                    layer: SurfaceLayer::Ground,
                    ramp: Some(RampProfile::RisesLeft),
                    x: 600.0,
                    y: 900.0,
                    width: 128.0,
                    height: 100.0,
                },
                GeometryData {
                    layer: SurfaceLayer::Wall,
                    ramp: None,
                    x: 500.0,
                    y: 800.0,
                    width: 32.0,
                    height: 200.0,
                },
            ],
            death_planes: vec![TriggerArea {
                x: 0.0,
                y: 1070.0,
                width: 1920.0,
                height: 10.0,
            }],
        };

        let json = serde_json::to_string(&level).unwrap();
        assert!(json.contains("test_level"));
        assert!(json.contains("\"ground\""));

        let deserialized: LevelData = serde_json::from_str(&json).unwrap();
        assert_eq!(level, deserialized);
    }

    #[test]
    fn test_minimal_level_data() {
        // Death planes are optional in the JSON
        let json = r#"{
            "id": "minimal",
            "width": 800.0,
            "height": 600.0,
            "spawn_point": {"x": 50.0, "y": 50.0},
            "geometry": []
        }"#;

        let level: LevelData = serde_json::from_str(json).unwrap();
        assert_eq!(level.id, "minimal");
        assert_eq!(level.spawn_point.x, 50.0);
        assert!(level.geometry.is_empty());
        assert!(level.death_planes.is_empty());
    }

    #[test]
    fn test_geometry_layer_field() {
        let json = r#"{
            "layer": "wall",
            "x": 0.0,
            "y": 0.0,
            "width": 100.0,
            "height": 32.0
        }"#;

        let geometry: GeometryData = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.layer, SurfaceLayer::Wall);
    }

    #[test]
    fn test_unknown_layer_rejected() {
        let json = r#"{
            "layer": "lava",
            "x": 0.0,
            "y": 0.0,
            "width": 100.0,
            "height": 32.0
        }"#;

        let result = serde_json::from_str::<GeometryData>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_level_has_floor_and_death_plane() {
        let level = LevelData::fallback();
        assert!(
            level
                .geometry
                .iter()
                .any(|g| g.layer == SurfaceLayer::Ground)
        );
        assert!(!level.death_planes.is_empty());
        // Spawn point sits above the floor
        assert!(level.spawn_point.y < level.geometry[0].y);
    }
}
