use crate::components::{
    AnimationState, Collider, DeathPlane, Enemy, Force, GroundedState, Health, LevelGeometry,
    Lives, Player, PlayerIntent, PlayerState, Position, RampState, Velocity,
};
use crate::enums::{GamePhase, SurfaceLayer};
use crate::level::LevelData;
use bevy::prelude::*;
use std::fs;
use std::path::Path;

/// Default level file, relative to the working directory
const LEVEL_PATH: &str = "assets/levels/level_01.json";

/// Player collider dimensions
const PLAYER_WIDTH: f32 = 32.0;
const PLAYER_HEIGHT: f32 = 64.0;

/// Resource holding the point the player respawns at after losing a life
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

/// Plugin for level loading and world setup
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level_system)
            .add_systems(OnEnter(GamePhase::End), show_end_screen);
    }
}

/// Load level from JSON file
pub fn load_level_from_file(path: &str) -> Result<LevelData, LevelLoadError> {
    // Check if file exists
    if !Path::new(path).exists() {
        return Err(LevelLoadError::FileNotFound(path.to_string()));
    }

    // Read file contents
    let contents = fs::read_to_string(path)
        .map_err(|e| LevelLoadError::IoError(path.to_string(), e.to_string()))?;

    // Parse JSON
    let level_data: LevelData = serde_json::from_str(&contents)
        .map_err(|e| LevelLoadError::ParseError(path.to_string(), e.to_string()))?;

    // Validate level data
    validate_level_data(&level_data)?;

    Ok(level_data)
}

/// Validate level data for required fields and valid values
fn validate_level_data(level: &LevelData) -> Result<(), LevelLoadError> {
    if level.id.is_empty() {
        return Err(LevelLoadError::ValidationError(
            "Level ID cannot be empty".to_string(),
        ));
    }

    if level.width <= 0.0 {
        return Err(LevelLoadError::ValidationError(
            "Level width must be positive".to_string(),
        ));
    }

    if level.height <= 0.0 {
        return Err(LevelLoadError::ValidationError(
            "Level height must be positive".to_string(),
        ));
    }

    // Validate geometry
    for (i, geo) in level.geometry.iter().enumerate() {
        if geo.width <= 0.0 || geo.height <= 0.0 {
            return Err(LevelLoadError::ValidationError(format!(
                "Geometry {} has invalid dimensions",
                i
            )));
        }
    }

    for (i, plane) in level.death_planes.iter().enumerate() {
        if plane.width <= 0.0 || plane.height <= 0.0 {
            return Err(LevelLoadError::ValidationError(format!(
                "Death plane {} has invalid dimensions",
                i
            )));
        }
    }

    Ok(())
}

/// Startup system: load the level file, falling back to the built-in level
/// when the file is missing or malformed
fn load_level_system(mut commands: Commands) {
    let level = match load_level_from_file(LEVEL_PATH) {
        Ok(level) => {
            info!("Loaded level: {}", level.id);
            level
        }
        Err(e) => {
            warn!("Failed to load level {}: {}, using fallback", LEVEL_PATH, e);
            LevelData::fallback()
        }
    };

    spawn_level_entities(&mut commands, &level);
    spawn_player(&mut commands, &level);

    commands.insert_resource(SpawnPoint {
        x: level.spawn_point.x,
        y: level.spawn_point.y,
    });
    commands.insert_resource(level);
}

/// Spawn level entities from level data
pub fn spawn_level_entities(commands: &mut Commands, level: &LevelData) {
    for geo in &level.geometry {
        let color = match geo.layer {
            SurfaceLayer::Ground => Color::rgb(0.35, 0.28, 0.2),
            SurfaceLayer::Wall => Color::rgb(0.5, 0.5, 0.55),
        };

        commands.spawn((
            LevelGeometry {
                layer: geo.layer,
                ramp: geo.ramp,
                x: geo.x,
                y: geo.y,
                width: geo.width,
                height: geo.height,
            },
            SpriteBundle {
                sprite: Sprite {
                    color,
                    custom_size: Some(Vec2::new(geo.width, geo.height)),
                    ..Default::default()
                },
                transform: Transform::from_xyz(
                    geo.x + geo.width / 2.0,
                    geo.y + geo.height / 2.0,
                    0.0,
                ),
                ..Default::default()
            },
        ));
    }

    for plane in &level.death_planes {
        commands.spawn((
            DeathPlane,
            Position::new(plane.x + plane.width / 2.0, plane.y + plane.height / 2.0),
            Collider::new(plane.width, plane.height),
        ));
    }
}

/// Spawn the player at the level spawn point with a full gameplay bundle
fn spawn_player(commands: &mut Commands, level: &LevelData) {
    commands.spawn((
        Player,
        Position::new(level.spawn_point.x, level.spawn_point.y),
        Velocity::default(),
        Force::default(),
        Collider::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        GroundedState::default(),
        RampState::default(),
        PlayerState::default(),
        PlayerIntent::default(),
        Health::full(),
        Lives::default(),
        AnimationState::default(),
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.9, 0.3, 0.25),
                custom_size: Some(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
                ..Default::default()
            },
            transform: Transform::from_xyz(level.spawn_point.x, level.spawn_point.y, 1.0),
            ..Default::default()
        },
    ));
}

/// Shown once the last life is gone. Gameplay systems are already frozen
/// by the phase gate, so the world is left as it stands.
fn show_end_screen(mut commands: Commands, enemy_query: Query<Entity, With<Enemy>>) {
    for entity in enemy_query.iter() {
        commands.entity(entity).despawn();
    }

    commands.spawn(
        TextBundle::from_section(
            "GAME OVER",
            TextStyle {
                font_size: 72.0,
                color: Color::rgb(0.9, 0.2, 0.2),
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Percent(40.0),
            top: Val::Percent(40.0),
            ..Default::default()
        }),
    );
}

/// Level loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum LevelLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::FileNotFound(path) => write!(f, "Level file not found: {}", path),
            LevelLoadError::IoError(path, err) => {
                write!(f, "IO error reading level file {}: {}", path, err)
            }
            LevelLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse level file {}: {}", path, err)
            }
            LevelLoadError::ValidationError(msg) => write!(f, "Level validation error: {}", msg),
        }
    }
}

impl std::error::Error for LevelLoadError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::RampProfile;
    use crate::level::{GeometryData, SpawnPointData, TriggerArea};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_level() -> LevelData {
        LevelData {
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
                    ramp: Some(RampProfile::RisesRight),
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
        }
    }

    #[test]
    fn test_load_level_from_file_success() {
        let level = create_test_level();
        let json = serde_json::to_string_pretty(&level).unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let loaded = load_level_from_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.id, "test_level");
        assert_eq!(loaded.width, 1920.0);
        assert_eq!(loaded.geometry.len(), 3);
        assert_eq!(loaded.death_planes.len(), 1);
    }

    #[test]
    fn test_load_level_file_not_found() {
        let result = load_level_from_file("nonexistent.json");
        assert!(matches!(result, Err(LevelLoadError::FileNotFound(_))));
    }

    #[test]
    fn test_load_level_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ invalid json }").unwrap();
        temp_file.flush().unwrap();

        let result = load_level_from_file(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(LevelLoadError::ParseError(_, _))));
    }

    #[test]
    fn test_load_level_missing_required_fields() {
        let json = r#"{"id": "test"}"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_level_from_file(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(LevelLoadError::ParseError(_, _))));
    }

    #[test]
    fn test_validate_level_data_empty_id() {
        let mut level = create_test_level();
        level.id = String::new();

        let result = validate_level_data(&level);
        assert!(matches!(result, Err(LevelLoadError::ValidationError(_))));
    }

    #[test]
    fn test_validate_level_data_invalid_dimensions() {
        let mut level = create_test_level();
        level.width = -100.0;

        let result = validate_level_data(&level);
        assert!(matches!(result, Err(LevelLoadError::ValidationError(_))));
    }

    #[test]
    fn test_validate_level_data_invalid_geometry() {
        let mut level = create_test_level();
        level.geometry[0].width = 0.0;

        let result = validate_level_data(&level);
        assert!(matches!(result, Err(LevelLoadError::ValidationError(_))));
    }

    #[test]
    fn test_validate_level_data_invalid_death_plane() {
        let mut level = create_test_level();
        level.death_planes[0].height = -5.0;

        let result = validate_level_data(&level);
        assert!(matches!(result, Err(LevelLoadError::ValidationError(_))));
    }

    #[test]
    fn test_startup_spawns_world_from_level_data() {
        // Loads the bundled level when present, otherwise the fallback;
        // either way the spawned world must match the inserted resource
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(LevelPlugin);

        app.update();

        let level = app.world.resource::<LevelData>().clone();

        let geometry_count = app.world.query::<&LevelGeometry>().iter(&app.world).count();
        assert_eq!(geometry_count, level.geometry.len());

        let death_plane_count = app
            .world
            .query_filtered::<Entity, With<DeathPlane>>()
            .iter(&app.world)
            .count();
        assert_eq!(death_plane_count, level.death_planes.len());

        let player_count = app
            .world
            .query_filtered::<Entity, With<Player>>()
            .iter(&app.world)
            .count();
        assert_eq!(player_count, 1);

        let spawn = app.world.resource::<SpawnPoint>();
        assert_eq!(spawn.x, level.spawn_point.x);
        assert_eq!(spawn.y, level.spawn_point.y);
    }

    #[test]
    fn test_player_spawns_at_spawn_point() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(LevelPlugin);

        app.update();

        let level = app.world.resource::<LevelData>().clone();
        let mut query = app
            .world
            .query_filtered::<(&Position, &Health, &Lives), With<Player>>();
        let (position, health, lives) = query.iter(&app.world).next().unwrap();

        assert_eq!(position.x, level.spawn_point.x);
        assert_eq!(position.y, level.spawn_point.y);
        assert_eq!(health.current, crate::components::MAX_HEALTH);
        assert_eq!(lives.remaining, crate::components::STARTING_LIVES);
    }

    #[test]
    fn test_spawn_level_entities_carries_layer_and_ramp() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let level = create_test_level();
        let mut system_state: bevy::ecs::system::SystemState<Commands> =
            bevy::ecs::system::SystemState::new(&mut app.world);
        let mut commands = system_state.get_mut(&mut app.world);
        spawn_level_entities(&mut commands, &level);
        system_state.apply(&mut app.world);

        let mut query = app.world.query::<&LevelGeometry>();
        let pieces: Vec<&LevelGeometry> = query.iter(&app.world).collect();
        assert_eq!(pieces.len(), 3);
        assert!(
            pieces
                .iter()
                .any(|g| g.layer == SurfaceLayer::Wall && g.ramp.is_none())
        );
        assert!(
            pieces
                .iter()
                .any(|g| g.ramp == Some(RampProfile::RisesRight))
        );
    }
}
