//! Display-related systems, such as syncing the vsync setting from the main
//! `Settings` resource to the primary window's present mode.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use muffin_jump::settings::Settings;

/// Sync `Settings.graphics.vsync` into the primary window's present mode so
/// it can be toggled at runtime. `last` caches the applied value.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.graphics.vsync;
    if *last == Some(desired) { return; }

    for mut w in &mut windows {
        w.present_mode = if desired { PresentMode::Fifo } else { PresentMode::AutoNoVsync };
    }
    *last = Some(desired);
}
