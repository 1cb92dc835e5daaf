use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use muffin_jump::debug::DebugDumpPlugin;
use muffin_jump::player::{MuffinPlugin, muffin_physics};
use muffin_jump::settings::loader as settings_loader;
use muffin_jump::ui::MuffinUiPlugin;

mod app;
use app::{follow_muffin, setup, sync_vsync_settings};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Muffin Jump".to_string(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoNoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(DebugDumpPlugin);

    app.insert_resource(ClearColor(Color::srgb(0.45, 0.7, 0.95)));
    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_plugins(MuffinPlugin);
    app.add_plugins(MuffinUiPlugin);

    app.add_systems(Startup, setup);
    app.add_systems(Update, follow_muffin.after(muffin_physics));
    app.add_systems(Update, sync_vsync_settings);
    app.add_systems(Update, settings_loader::check_settings_changes);

    app.run();
}
