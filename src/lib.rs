pub mod player;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod session;
pub mod settings;
pub mod ui;
pub mod world;

pub mod debug;
