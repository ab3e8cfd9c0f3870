use crate::components::{Health, Lives, MAX_HEALTH, Player};
use bevy::prelude::*;

/// Health bar dimensions in UI pixels
const HEALTH_BAR_WIDTH: f32 = 200.0;
const HEALTH_BAR_HEIGHT: f32 = 24.0;

/// Plugin for the on-screen health bar and lives counter
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, (update_health_bar, update_lives_text));
    }
}

/// Marker for the filled portion of the health bar
#[derive(Component)]
pub struct HealthBarFill;

/// Marker for the lives counter text
#[derive(Component)]
pub struct LivesText;

/// Build the HUD: a health bar in the top-left corner with the lives
/// counter beneath it
fn setup_hud(mut commands: Commands) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(16.0),
                top: Val::Px(16.0),
                width: Val::Px(HEALTH_BAR_WIDTH),
                height: Val::Px(HEALTH_BAR_HEIGHT),
                ..Default::default()
            },
            background_color: Color::rgb(0.15, 0.15, 0.15).into(),
            ..Default::default()
        })
        .with_children(|parent| {
            parent.spawn((
                HealthBarFill,
                NodeBundle {
                    style: Style {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..Default::default()
                    },
                    background_color: Color::rgb(0.8, 0.2, 0.2).into(),
                    ..Default::default()
                },
            ));
        });

    commands.spawn((
        LivesText,
        TextBundle::from_section(
            format!("Lives: {}", crate::components::STARTING_LIVES),
            TextStyle {
                font_size: 24.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(48.0),
            ..Default::default()
        }),
    ));
}

/// Shrink the filled portion to the displayed health fraction. Displayed
/// health never goes below zero even if raw health has.
fn update_health_bar(
    player_query: Query<&Health, (With<Player>, Changed<Health>)>,
    mut fill_query: Query<&mut Style, With<HealthBarFill>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };

    for mut style in fill_query.iter_mut() {
        style.width = Val::Percent(health_percent(health));
    }
}

/// Keep the lives counter in sync with the player's remaining lives
fn update_lives_text(
    player_query: Query<&Lives, (With<Player>, Changed<Lives>)>,
    mut text_query: Query<&mut Text, With<LivesText>>,
) {
    let Ok(lives) = player_query.get_single() else {
        return;
    };

    for mut text in text_query.iter_mut() {
        text.sections[0].value = format!("Lives: {}", lives.remaining);
    }
}

/// Displayed health as a percentage of the bar width
pub fn health_percent(health: &Health) -> f32 {
    health.displayed() as f32 / MAX_HEALTH as f32 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::STARTING_LIVES;

    fn hud_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(HudPlugin);
        app
    }

    fn fill_width(app: &mut App) -> Val {
        let mut query = app.world.query_filtered::<&Style, With<HealthBarFill>>();
        query.iter(&app.world).next().unwrap().width
    }

    fn lives_label(app: &mut App) -> String {
        let mut query = app.world.query_filtered::<&Text, With<LivesText>>();
        query.iter(&app.world).next().unwrap().sections[0]
            .value
            .clone()
    }

    #[test]
    fn test_hud_spawns_bar_and_lives_text() {
        let mut app = hud_app();
        app.update();

        assert_eq!(fill_width(&mut app), Val::Percent(100.0));
        assert_eq!(lives_label(&mut app), format!("Lives: {}", STARTING_LIVES));
    }

    #[test]
    fn test_health_bar_tracks_damage() {
        let mut app = hud_app();
        let player = app.world.spawn((Player, Health::full())).id();
        app.update();

        app.world.get_mut::<Health>(player).unwrap().current = 85;
        app.update();

        assert_eq!(fill_width(&mut app), Val::Percent(85.0));
    }

    #[test]
    fn test_health_bar_clamps_negative_health() {
        let mut app = hud_app();
        let player = app.world.spawn((Player, Health::full())).id();
        app.update();

        // Raw health may dip below zero on the depleting hit
        app.world.get_mut::<Health>(player).unwrap().current = -5;
        app.update();

        assert_eq!(fill_width(&mut app), Val::Percent(0.0));
    }

    #[test]
    fn test_lives_text_tracks_life_loss() {
        let mut app = hud_app();
        let player = app.world.spawn((Player, Health::full(), Lives::default())).id();
        app.update();

        app.world.get_mut::<Lives>(player).unwrap().remaining = 1;
        app.update();

        assert_eq!(lives_label(&mut app), "Lives: 1");
    }

    #[test]
    fn test_health_percent() {
        assert_eq!(health_percent(&Health { current: 100 }), 100.0);
        assert_eq!(health_percent(&Health { current: 85 }), 85.0);
        assert_eq!(health_percent(&Health { current: 0 }), 0.0);
        assert_eq!(health_percent(&Health { current: -10 }), 0.0);
    }
}
