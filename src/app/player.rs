//! Player-related small systems.
//!
//! Kept separate so the main application file remains compact.
use bevy::prelude::*;
use muffin_jump::player::Muffin;

use crate::app::setup::FollowCamera;

/// How quickly the camera catches up with the muffin, per second.
const FOLLOW_RATE: f32 = 4.0;

/// Ease the camera toward the muffin's height, keeping its offset. Silently
/// no-ops when there is no muffin.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_muffin(
    time: Res<Time>,
    muffins: Query<&Transform, (With<Muffin>, Without<FollowCamera>)>,
    mut cameras: Query<(&mut Transform, &FollowCamera)>,
) {
    let Ok(muffin) = muffins.get_single() else { return };
    let t = (FOLLOW_RATE * time.delta_seconds()).min(1.0);
    for (mut tf, follow) in &mut cameras {
        let target_y = muffin.translation.y.max(0.0) + follow.offset.y;
        tf.translation.y += (target_y - tf.translation.y) * t;
    }
}
