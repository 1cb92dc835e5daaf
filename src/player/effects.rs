//! Side-effect requests produced by the muffin and the systems that carry
//! them out.
//!
//! `Muffin` methods return `MuffinEffect`s; `player::systems` forwards them as
//! events and each applier below handles the subset it owns. Appliers read
//! the event stream independently, so their relative order does not matter.

use bevy::prelude::*;

use crate::player::Muffin;
use crate::player::physics::CharacterBody;
use crate::world::spawner::{Cloud, CloudSpawner, reset_spawners};

/// How long the death explosion stays on screen, in seconds.
pub const EXPLOSION_LIFETIME: f32 = 0.8;
/// Scale an explosion reaches at the end of its lifetime.
pub const EXPLOSION_MAX_SCALE: f32 = 4.0;

/// A single request from the muffin to one of its collaborators.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MuffinEffect {
    SetFlameActive(bool),
    MoveFlame(Vec3),
    /// Accumulate `direction * scale` into this frame's movement input.
    AddMovementInput { direction: Vec3, scale: f32 },
    /// Vertical component overrides the current velocity, horizontal adds to it.
    Launch(Vec3),
    /// Absolute facing, yaw in degrees.
    SetControlRotation { yaw: f32 },
    /// Enable input and show the muffin, or disable and hide it.
    ShowMuffin(bool),
    ShowMenu(bool),
    ShowCursor(bool),
    ShowScore(bool),
    SetScore(u32),
    ResetScore,
    SpawnExplosion(Vec3),
    ResetSpawners,
}

/// The flame effect that follows the muffin and glows while it rises.
#[derive(Component, Debug, Default)]
pub struct Flame {
    pub active: bool,
}

/// One-shot explosion spawned where the muffin died.
#[derive(Component)]
pub struct Explosion {
    pub timer: Timer,
}

impl Explosion {
    #[must_use]
    pub fn new() -> Self {
        Self { timer: Timer::from_seconds(EXPLOSION_LIFETIME, TimerMode::Once) }
    }
}

impl Default for Explosion {
    fn default() -> Self {
        Self::new()
    }
}

/// Meshes and materials for the flame and explosion, created at startup.
#[derive(Resource, Clone)]
pub struct EffectAssets {
    pub flame_mesh: Handle<Mesh>,
    pub flame_material: Handle<StandardMaterial>,
    pub explosion_mesh: Handle<Mesh>,
    pub explosion_material: Handle<StandardMaterial>,
}

fn visibility(shown: bool) -> Visibility {
    if shown { Visibility::Visible } else { Visibility::Hidden }
}

/// Apply movement, launch, facing and show/hide requests to the muffin body.
pub fn apply_body_effects(
    mut events: EventReader<MuffinEffect>,
    mut q: Query<(&mut CharacterBody, &mut Transform, &mut Visibility), With<Muffin>>,
) {
    let Ok((mut body, mut tf, mut vis)) = q.get_single_mut() else {
        events.clear();
        return;
    };
    for effect in events.read() {
        match effect {
            MuffinEffect::AddMovementInput { direction, scale } => {
                body.add_movement_input(*direction * *scale);
            }
            MuffinEffect::Launch(v) => body.launch(*v),
            MuffinEffect::SetControlRotation { yaw } => {
                tf.rotation = Quat::from_rotation_y(yaw.to_radians());
            }
            MuffinEffect::ShowMuffin(shown) => *vis = visibility(*shown),
            _ => {}
        }
    }
}

/// Activate, deactivate and reposition the flame.
pub fn apply_flame_effects(
    mut events: EventReader<MuffinEffect>,
    mut flames: Query<(&mut Flame, &mut Transform, &mut Visibility)>,
) {
    for effect in events.read() {
        for (mut flame, mut tf, mut vis) in &mut flames {
            match effect {
                MuffinEffect::SetFlameActive(active) => {
                    flame.active = *active;
                    *vis = visibility(*active);
                }
                MuffinEffect::MoveFlame(pos) => tf.translation = *pos,
                _ => {}
            }
        }
    }
}

/// Spawn explosions and reset every cloud spawner in the world.
pub fn apply_world_effects(
    mut commands: Commands,
    mut events: EventReader<MuffinEffect>,
    assets: Option<Res<EffectAssets>>,
    mut spawners: Query<(Entity, &mut CloudSpawner)>,
    clouds: Query<(Entity, &Cloud)>,
) {
    for effect in events.read() {
        match effect {
            MuffinEffect::SpawnExplosion(pos) => {
                let transform = Transform::from_translation(*pos);
                match assets.as_deref() {
                    Some(a) => {
                        commands.spawn((
                            PbrBundle {
                                mesh: a.explosion_mesh.clone(),
                                material: a.explosion_material.clone(),
                                transform,
                                ..default()
                            },
                            Explosion::new(),
                        ));
                    }
                    None => {
                        commands.spawn((SpatialBundle::from_transform(transform), Explosion::new()));
                    }
                }
            }
            MuffinEffect::ResetSpawners => {
                let n = reset_spawners(&mut commands, &mut spawners, &clouds);
                info!("reset {n} cloud spawner(s)");
            }
            _ => {}
        }
    }
}

/// Grow explosions over their lifetime and despawn them when done.
#[allow(clippy::needless_pass_by_value)]
pub fn update_explosions(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Explosion, &mut Transform)>,
) {
    for (entity, mut explosion, mut tf) in &mut q {
        explosion.timer.tick(time.delta());
        if explosion.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let t = explosion.timer.fraction();
        tf.scale = Vec3::splat(1.0 + t * (EXPLOSION_MAX_SCALE - 1.0));
    }
}
