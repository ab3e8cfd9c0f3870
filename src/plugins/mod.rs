pub mod animation;
pub mod camera;
pub mod combat;
pub mod feedback;
pub mod hud;
pub mod level;
pub mod physics;
pub mod player;
pub mod sensors;

pub use animation::AnimationPlugin;
pub use camera::CameraPlugin;
pub use combat::CombatPlugin;
pub use feedback::FeedbackPlugin;
pub use hud::HudPlugin;
pub use level::LevelPlugin;
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;
pub use sensors::SensorsPlugin;
