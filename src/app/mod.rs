pub mod setup;
pub mod player;
pub mod display;

pub use setup::setup;
pub use player::follow_muffin;
pub use display::sync_vsync_settings;
