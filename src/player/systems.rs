//! Systems that drive the muffin state machine from the ECS.
//!
//! Each system reads what a hook needs (input, velocity, overlaps), calls the
//! matching `Muffin` method and forwards the returned effects as
//! `MuffinEffect` events.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::player::{CharacterBody, Muffin, MuffinEffect};
use crate::session::{ActivePlayer, SessionState};
use crate::settings::Settings;
use crate::world::{DeathFloor, OverlapBegan, OverlapTracker};

/// Horizontal axis from a pair of keys: -1, 0 or 1.
#[must_use]
pub fn axis_value(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Register the muffin, confine the cursor to the window and turn on overlap
/// reporting for it.
#[allow(clippy::needless_pass_by_value)]
pub fn begin_play(
    mut commands: Commands,
    mut active: ResMut<ActivePlayer>,
    muffins: Query<Entity, With<Muffin>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(entity) = muffins.get_single() else {
        warn!("begin_play: no muffin in the world");
        return;
    };
    active.0 = Some(entity);
    commands.entity(entity).insert(OverlapTracker::default());

    if let Ok(mut window) = windows.get_single_mut() {
        window.cursor.grab_mode = CursorGrabMode::Confined;
    }
    info!("muffin {entity:?} ready");
}

/// Poll the left/right axis and the jump key.
#[allow(clippy::needless_pass_by_value)]
pub fn read_muffin_input(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut muffins: Query<&mut Muffin>,
    mut effects: EventWriter<MuffinEffect>,
) {
    let controls = &settings.controls;
    let left = controls.key_for("left", KeyCode::KeyA);
    let right = controls.key_for("right", KeyCode::KeyD);
    let jump = controls.key_for("jump", KeyCode::Space);

    let axis = axis_value(
        keys.pressed(left) || keys.pressed(KeyCode::ArrowLeft),
        keys.pressed(right) || keys.pressed(KeyCode::ArrowRight),
    );

    for mut muffin in &mut muffins {
        effects.send_batch(muffin.move_left_right(axis, &settings.gameplay));
        if keys.just_pressed(jump) {
            effects.send_batch(muffin.jump(&settings.gameplay));
        }
    }
}

pub fn handle_muffin_overlaps(
    mut overlaps: EventReader<OverlapBegan>,
    mut muffins: Query<&mut Muffin>,
    mut effects: EventWriter<MuffinEffect>,
) {
    for ev in overlaps.read() {
        let Ok(mut muffin) = muffins.get_mut(ev.subject) else { continue };
        effects.send_batch(muffin.on_overlap(ev.kind));
    }
}

/// Run the death check for a muffin resting on a `DeathFloor`.
pub fn check_death_floor(
    mut session: ResMut<SessionState>,
    mut muffins: Query<(&mut Muffin, &CharacterBody, &Transform)>,
    floors: Query<(), With<DeathFloor>>,
    mut effects: EventWriter<MuffinEffect>,
) {
    for (mut muffin, body, tf) in &mut muffins {
        let Some(support) = body.support else { continue };
        if !floors.contains(support) {
            continue;
        }
        let score = muffin.score;
        let out = muffin.explode(&mut session, body.velocity.y, tf.translation);
        if !out.is_empty() {
            info!("muffin exploded with score {score} (best {})", session.best_score);
            effects.send_batch(out);
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn muffin_tick(
    session: Res<SessionState>,
    settings: Res<Settings>,
    mut muffins: Query<(&mut Muffin, &CharacterBody, &Transform)>,
    mut effects: EventWriter<MuffinEffect>,
) {
    for (mut muffin, body, tf) in &mut muffins {
        effects.send_batch(muffin.tick(&session, body.velocity.y, tf.translation, &settings.gameplay));
    }
}
