//! Settings loading and hot-reloading.
//!
//! Settings are read from RON files in a directory (normally `data/settings`).
//! The first file that parses as `Settings` wins; with no usable file the
//! defaults are used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::prelude::*;

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher {
    pub dir: String,
    pub watcher: crate::ron::RonWatcher,
}

/// Load settings from the `.ron` files in `path`, falling back to defaults.
///
/// # Example
/// ```no_run
/// let settings = muffin_jump::settings::loader::load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_else(Settings::defaults)
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` raised while creating or registering the watcher.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher { dir: path.to_string(), watcher })
}

/// Reload the `Settings` resource when the watcher reports a change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.watcher.take_changed() {
        info!("settings changed in {}, reloading", watcher.dir);
        *settings = load_settings_from_dir(&watcher.dir);
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher { dir: SETTINGS_DIR.to_string(), watcher: crate::ron::RonWatcher::stub() }
    }
}
