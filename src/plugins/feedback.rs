use crate::components::DustTrail;
use crate::plugins::combat::DamageEvent;
use crate::plugins::player::{DustKickedUp, Jumped};
use bevy::prelude::*;

/// Lifetime of a dust puff in seconds
const DUST_DURATION: f32 = 0.4;
const DUST_SIZE: f32 = 8.0;

/// One-shot sound effects, loaded once at startup
#[derive(Resource, Clone, Debug)]
pub struct SoundLibrary {
    pub jump: Handle<AudioSource>,
    pub hit: Handle<AudioSource>,
}

/// Plugin for audio and particle feedback
pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Jumped>()
            .add_event::<DustKickedUp>()
            .add_event::<DamageEvent>()
            .add_systems(Startup, load_sounds)
            .add_systems(
                Update,
                (
                    play_jump_sound_system,
                    play_hit_sound_system,
                    spawn_dust_system,
                    fade_dust_system,
                ),
            );
    }
}

/// Load the sound effects. The asset server is absent in headless test
/// apps, in which case sounds stay silent.
fn load_sounds(mut commands: Commands, asset_server: Option<Res<AssetServer>>) {
    let Some(asset_server) = asset_server else {
        return;
    };

    commands.insert_resource(SoundLibrary {
        jump: asset_server.load("sounds/jump.ogg"),
        hit: asset_server.load("sounds/hit.ogg"),
    });
}

/// Fire-and-forget jump sound. The audio entity despawns itself when
/// playback finishes.
fn play_jump_sound_system(
    mut commands: Commands,
    mut jump_events: EventReader<Jumped>,
    sounds: Option<Res<SoundLibrary>>,
) {
    let Some(sounds) = sounds else {
        jump_events.clear();
        return;
    };

    for _ in jump_events.read() {
        commands.spawn(AudioBundle {
            source: sounds.jump.clone(),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

/// One hit sound per damage event
fn play_hit_sound_system(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    sounds: Option<Res<SoundLibrary>>,
) {
    let Some(sounds) = sounds else {
        damage_events.clear();
        return;
    };

    for _ in damage_events.read() {
        commands.spawn(AudioBundle {
            source: sounds.hit.clone(),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

/// Kick up a dust puff at the player's feet when movement requests one
fn spawn_dust_system(mut commands: Commands, mut dust_events: EventReader<DustKickedUp>) {
    for event in dust_events.read() {
        commands.spawn((
            DustTrail::new(DUST_DURATION),
            SpriteBundle {
                sprite: Sprite {
                    color: Color::rgba(0.75, 0.7, 0.6, 1.0),
                    custom_size: Some(Vec2::splat(DUST_SIZE)),
                    ..Default::default()
                },
                transform: Transform::from_xyz(event.x, event.y, 0.5),
                ..Default::default()
            },
        ));
    }
}

/// Fade dust puffs out over their lifetime and despawn the expired ones
fn fade_dust_system(
    mut commands: Commands,
    time: Res<Time>,
    mut dust_query: Query<(Entity, &mut DustTrail, &mut Sprite)>,
) {
    for (entity, mut dust, mut sprite) in dust_query.iter_mut() {
        dust.elapsed += time.delta_seconds();

        if dust.is_expired() {
            commands.entity(entity).despawn();
            continue;
        }

        sprite.color.set_a(dust_alpha(&dust));
    }
}

/// Linear fade from fully opaque to transparent over the puff lifetime
pub fn dust_alpha(dust: &DustTrail) -> f32 {
    (1.0 - dust.elapsed / dust.duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(FeedbackPlugin);
        app
    }

    #[test]
    fn test_plugin_builds_without_asset_server() {
        let mut app = feedback_app();
        app.update();

        assert!(app.world.get_resource::<SoundLibrary>().is_none());
    }

    #[test]
    fn test_sound_events_without_library_do_not_panic() {
        let mut app = feedback_app();
        app.update();

        app.world.send_event(Jumped);
        app.world.send_event(DamageEvent { amount: 15 });
        app.update();
    }

    #[test]
    fn test_dust_spawned_on_event() {
        let mut app = feedback_app();
        app.update();

        app.world.send_event(DustKickedUp { x: 120.0, y: 590.0 });
        app.update();

        let mut query = app.world.query::<(&DustTrail, &Transform)>();
        let (dust, transform) = query.iter(&app.world).next().unwrap();
        assert_eq!(dust.elapsed, 0.0);
        assert_eq!(dust.duration, DUST_DURATION);
        assert_eq!(transform.translation.x, 120.0);
        assert_eq!(transform.translation.y, 590.0);
    }

    #[test]
    fn test_expired_dust_despawns() {
        let mut app = feedback_app();
        app.update();

        app.world.spawn((
            DustTrail {
                elapsed: DUST_DURATION + 0.1,
                duration: DUST_DURATION,
            },
            SpriteBundle::default(),
        ));

        app.update();

        let count = app.world.query::<&DustTrail>().iter(&app.world).count();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_dust_alpha_fades_linearly() {
        let fresh = DustTrail::new(0.4);
        assert_eq!(dust_alpha(&fresh), 1.0);

        let half = DustTrail {
            elapsed: 0.2,
            duration: 0.4,
        };
        assert!((dust_alpha(&half) - 0.5).abs() < 0.001);

        let done = DustTrail {
            elapsed: 0.4,
            duration: 0.4,
        };
        assert_eq!(dust_alpha(&done), 0.0);
    }
}
