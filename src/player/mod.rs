//! The muffin: its run state, input, physics and effects.
//!
//! `controller` holds the pure state machine, `systems` feeds it from the
//! ECS, `effects` applies what it asks for and `physics` moves the body.
//! `MuffinPlugin` wires all of it into `Update` in a fixed order. The death
//! check and the tick read the state left by last frame's physics and run
//! before input, so a jump can neither close the death gate nor have its
//! flame switched off by the tick.
//!
//! # Example:
//!
//! ```ignore
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .insert_resource(Settings::default())
//!     .add_plugins(MuffinPlugin)
//!     .run();
//! ```
pub mod controller;
pub mod effects;
pub mod physics;
pub mod systems;

use bevy::prelude::*;

pub use controller::*;
pub use effects::*;
pub use physics::*;
pub use systems::*;

use crate::session::{ActivePlayer, SessionState};
use crate::world::{OverlapBegan, drift_clouds, detect_overlaps, spawn_clouds};

/// Half extents of the muffin's collision box.
pub const MUFFIN_HALF_EXTENTS: Vec3 = Vec3::new(25.0, 35.0, 25.0);

pub struct MuffinPlugin;

impl Plugin for MuffinPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionState>()
            .init_resource::<ActivePlayer>()
            .add_event::<MuffinEffect>()
            .add_event::<OverlapBegan>()
            .add_systems(PostStartup, begin_play)
            .add_systems(
                Update,
                (
                    detect_overlaps,
                    handle_muffin_overlaps,
                    check_death_floor,
                    muffin_tick,
                    read_muffin_input,
                    (apply_body_effects, apply_flame_effects, apply_world_effects),
                    muffin_physics,
                )
                    .chain(),
            )
            .add_systems(Update, (spawn_clouds, drift_clouds, update_explosions));
    }
}
