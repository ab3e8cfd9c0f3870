use bevy::prelude::*;
use platform_survival_game::plugins::{
    AnimationPlugin, CameraPlugin, CombatPlugin, FeedbackPlugin, HudPlugin, LevelPlugin,
    PhysicsPlugin, PlayerPlugin, SensorsPlugin,
};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugin)
        .add_plugins(SensorsPlugin)
        .add_plugins(PlayerPlugin)
        .add_plugins(CombatPlugin)
        .add_plugins(LevelPlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(HudPlugin)
        .add_plugins(FeedbackPlugin)
        .add_plugins(AnimationPlugin)
        .run();
}
