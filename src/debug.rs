//! Debug dump (F3 by default): writes FPS, entity counts, the muffin's run
//! state and process memory to a timestamped text file in `./debug-dumps/`.
//!
//! Handy for capturing the state of a run at the moment something looks off
//! without attaching a debugger.
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::player::{CharacterBody, Muffin};
use crate::session::SessionState;
use crate::settings::Settings;
use crate::world::{Cloud, CloudSpawner};

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

fn kb_to_mb(kb: u64) -> String {
    format!("{:.2} MB", (kb as f64) / 1024.0)
}

/// Counts and state gathered for one dump.
#[derive(Debug, Default)]
pub struct DumpSnapshot {
    pub fps: f64,
    pub frame_time: f64,
    pub entities: usize,
    pub clouds: usize,
    pub spawners: Vec<(u32, f32)>,
    pub muffins: Vec<(Muffin, CharacterBody, Vec3)>,
    pub show_menu: bool,
    pub runs_started: u32,
    pub best_score: u32,
}

/// Render a snapshot as the dump file body (without the header lines).
#[must_use]
pub fn format_snapshot(snap: &DumpSnapshot) -> String {
    let mut out = String::new();
    writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", snap.fps, snap.frame_time * 1000.0).ok();
    writeln!(out, "Entities: {} (clouds: {})", snap.entities, snap.clouds).ok();
    writeln!(
        out,
        "Session: show_menu={} runs_started={} best_score={}",
        snap.show_menu, snap.runs_started, snap.best_score
    )
    .ok();

    writeln!(out, "\nMuffins:").ok();
    if snap.muffins.is_empty() {
        writeln!(out, "  (none)").ok();
    }
    for (m, body, pos) in &snap.muffins {
        writeln!(
            out,
            "  pos=({:.1}, {:.1}, {:.1}) vel=({:.1}, {:.1}) on_ground={}",
            pos.x, pos.y, pos.z, body.velocity.x, body.velocity.y, body.on_ground
        )
        .ok();
        writeln!(
            out,
            "  score={} mortal={} was_falling={} control={} menu_hidden={} yaw={} last_sign={} first_input={}",
            m.score,
            m.is_mortal,
            m.was_falling,
            m.control_enabled,
            m.is_menu_hidden,
            m.rotation_yaw,
            m.last_input_sign,
            m.is_first_input
        )
        .ok();
    }

    writeln!(out, "\nSpawners:").ok();
    for (i, (spawned, next_height)) in snap.spawners.iter().enumerate() {
        writeln!(out, "  #{i}: spawned={spawned} next_height={next_height:.1}").ok();
    }
    out
}

/// Write a dump when the `dump_debug` key is pressed.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    session: Res<SessionState>,
    entities: Query<Entity>,
    muffins: Query<(&Muffin, &CharacterBody, &Transform)>,
    spawners: Query<&CloudSpawner>,
    clouds: Query<(), With<Cloud>>,
) {
    if !keys.just_pressed(settings.controls.key_for("dump_debug", KeyCode::F3)) {
        return;
    }

    let now = SystemTime::now();
    let ts_secs = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let dt: DateTime<Utc> = DateTime::from(now);
    let fname = format!("{DUMP_DIR}/debug-{ts_secs}.txt");

    let smoothed = |path: &bevy::diagnostic::DiagnosticPath| {
        diagnostics
            .as_ref()
            .and_then(|d| d.get(path))
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0)
    };

    let snap = DumpSnapshot {
        fps: smoothed(&FrameTimeDiagnosticsPlugin::FPS),
        frame_time: smoothed(&FrameTimeDiagnosticsPlugin::FRAME_TIME),
        entities: entities.iter().count(),
        clouds: clouds.iter().count(),
        spawners: spawners.iter().map(|s| (s.spawned, s.next_height)).collect(),
        muffins: muffins.iter().map(|(m, b, t)| (m.clone(), b.clone(), t.translation)).collect(),
        show_menu: session.show_menu,
        runs_started: session.runs_started,
        best_score: session.best_score,
    };

    let mut sys = System::new_all();
    sys.refresh_all();
    let proc = sys.process(Pid::from(std::process::id() as usize));

    let mut out = String::new();
    writeln!(out, "Debug dump: {ts_secs}").ok();
    writeln!(out, "Timestamp: {}", dt.format("%Y-%m-%d %H:%M:%S")).ok();
    out.push_str(&format_snapshot(&snap));
    writeln!(
        out,
        "\nProcess memory: {} (virtual {})",
        kb_to_mb(proc.map_or(0, ProcessExt::memory)),
        kb_to_mb(proc.map_or(0, ProcessExt::virtual_memory))
    )
    .ok();

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}
