//! Cloud spawners.
//!
//! A `CloudSpawner` drops drifting cloud hazards above its origin, each one
//! `spacing` higher than the last, while a run is in progress. Resetting a
//! spawner rewinds its height and random sequence; `reset_spawners` also
//! despawns every cloud it produced.

use bevy::prelude::*;

use crate::session::SessionState;
use crate::settings::Settings;
use crate::world::{Collider, ColliderKind};

/// Height above the spawner origin of the first cloud.
pub const FIRST_CLOUD_HEIGHT: f32 = 200.0;
/// Half extents of the spawner's own marker box.
pub const SPAWNER_HALF_EXTENTS: Vec3 = Vec3::new(40.0, 10.0, 40.0);

#[derive(Component, Debug, Clone)]
pub struct CloudSpawner {
    pub origin: Vec3,
    pub timer: Timer,
    /// Clouds spawned since the last reset.
    pub spawned: u32,
    pub next_height: f32,
    seed: u32,
    rng: u32,
}

/// A cloud and the spawner that owns it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Cloud {
    pub spawner: Entity,
    /// Lateral speed in units per second; flips sign at the edge of the range.
    pub drift: f32,
}

/// Mesh and material shared by every cloud.
#[derive(Resource, Clone)]
pub struct CloudAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

impl CloudSpawner {
    #[must_use]
    pub fn new(origin: Vec3, seed: u32) -> Self {
        let mut s = Self {
            origin,
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
            spawned: 0,
            next_height: 0.0,
            seed,
            rng: seed,
        };
        s.reset();
        s
    }

    /// Collider tagging the spawner itself; touching it does nothing.
    #[must_use]
    pub fn collider() -> Collider {
        Collider::new(SPAWNER_HALF_EXTENTS, ColliderKind::Spawner)
    }

    #[must_use]
    pub fn base_height(&self) -> f32 {
        self.origin.y + FIRST_CLOUD_HEIGHT
    }

    pub fn reset(&mut self) {
        self.spawned = 0;
        self.next_height = self.base_height();
        self.rng = self.seed;
        self.timer.reset();
    }

    /// Next value in [-1, 1] from a small LCG, reproducible after `reset`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_unit(&mut self) -> f32 {
        self.rng = self.rng.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (((self.rng >> 16) & 0x7fff) as f32 / 32767.0) * 2.0 - 1.0
    }

    /// Where the next cloud goes and which way it drifts, advancing the
    /// spawner. Returns `None` once `max_clouds` are out.
    pub fn next_cloud(&mut self, lateral_range: f32, spacing: f32, max_clouds: u32) -> Option<(Vec3, f32)> {
        if self.spawned >= max_clouds {
            return None;
        }
        let x = self.origin.x + self.next_unit() * lateral_range;
        let direction = if self.next_unit() >= 0.0 { 1.0 } else { -1.0 };
        let pos = Vec3::new(x, self.next_height, self.origin.z);
        self.next_height += spacing;
        self.spawned += 1;
        Some((pos, direction))
    }
}

/// Reset every spawner and despawn the clouds it owns. Returns how many
/// spawners were reset.
pub fn reset_spawners(
    commands: &mut Commands,
    spawners: &mut Query<(Entity, &mut CloudSpawner)>,
    clouds: &Query<(Entity, &Cloud)>,
) -> usize {
    let mut n = 0;
    for (entity, mut spawner) in spawners.iter_mut() {
        spawner.reset();
        for (cloud_entity, cloud) in clouds.iter() {
            if cloud.spawner == entity {
                commands.entity(cloud_entity).despawn_recursive();
            }
        }
        n += 1;
    }
    n
}

/// Spawn clouds on each spawner's timer while a run is in progress.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_clouds(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<SessionState>,
    settings: Res<Settings>,
    assets: Option<Res<CloudAssets>>,
    mut spawners: Query<(Entity, &mut CloudSpawner)>,
) {
    if !session.is_playing() {
        return;
    }
    let cfg = &settings.spawner;
    let half = Vec3::from_array(cfg.cloud_size) * 0.5;

    for (entity, mut spawner) in &mut spawners {
        spawner.timer.set_duration(std::time::Duration::from_secs_f32(cfg.interval.max(0.05)));
        if !spawner.timer.tick(time.delta()).just_finished() {
            continue;
        }
        let Some((pos, direction)) = spawner.next_cloud(cfg.lateral_range, cfg.spacing, cfg.max_clouds) else {
            continue;
        };

        let cloud = Cloud { spawner: entity, drift: direction * cfg.drift_speed };
        let collider = Collider::new(half, ColliderKind::Hazard);
        let transform = Transform::from_translation(pos);
        match assets.as_deref() {
            Some(a) => {
                commands.spawn((
                    PbrBundle {
                        mesh: a.mesh.clone(),
                        material: a.material.clone(),
                        transform,
                        ..default()
                    },
                    cloud,
                    collider,
                ));
            }
            None => {
                commands.spawn((SpatialBundle::from_transform(transform), cloud, collider));
            }
        }
        debug!("cloud {} spawned at {pos}", spawner.spawned);
    }
}

/// Move clouds sideways, bouncing at the edge of their spawner's range.
#[allow(clippy::needless_pass_by_value)]
pub fn drift_clouds(
    time: Res<Time>,
    settings: Res<Settings>,
    spawners: Query<&CloudSpawner>,
    mut clouds: Query<(&mut Cloud, &mut Transform)>,
) {
    let dt = time.delta_seconds();
    let range = settings.spawner.lateral_range;
    for (mut cloud, mut tf) in &mut clouds {
        let Ok(spawner) = spawners.get(cloud.spawner) else { continue };
        tf.translation.x += cloud.drift * dt;
        let offset = tf.translation.x - spawner.origin.x;
        if offset.abs() > range {
            tf.translation.x = spawner.origin.x + range.copysign(offset);
            cloud.drift = -cloud.drift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn clouds_climb_and_stop_at_cap() {
        let mut s = CloudSpawner::new(Vec3::new(0.0, 10.0, 0.0), 1);
        let (a, _) = s.next_cloud(100.0, 50.0, 2).unwrap();
        let (b, _) = s.next_cloud(100.0, 50.0, 2).unwrap();
        assert_eq!(a.y, 10.0 + FIRST_CLOUD_HEIGHT);
        assert_eq!(b.y, a.y + 50.0);
        assert!(a.x.abs() <= 100.0 && b.x.abs() <= 100.0);
        assert!(s.next_cloud(100.0, 50.0, 2).is_none());
    }

    #[test]
    fn reset_replays_the_same_sequence() {
        let mut s = CloudSpawner::new(Vec3::ZERO, 99);
        let first: Vec<_> = (0..3).filter_map(|_| s.next_cloud(300.0, 20.0, 10)).collect();
        s.reset();
        assert_eq!(s.spawned, 0);
        assert_eq!(s.next_height, s.base_height());
        let again: Vec<_> = (0..3).filter_map(|_| s.next_cloud(300.0, 20.0, 10)).collect();
        assert_eq!(first, again);
    }

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(Settings::default())
            .insert_resource(SessionState::default())
            .add_systems(Update, spawn_clouds);
        app
    }

    fn cloud_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&Cloud>().iter(world).count()
    }

    #[test]
    fn no_clouds_while_menu_is_shown() {
        let mut app = app();
        app.world_mut().spawn(CloudSpawner::new(Vec3::ZERO, 3));
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs(5));
        app.update();
        assert_eq!(cloud_count(&mut app), 0);
    }

    #[test]
    fn spawns_hazard_clouds_during_a_run() {
        let mut app = app();
        app.world_mut().resource_mut::<SessionState>().on_start_click();
        let spawner = app.world_mut().spawn(CloudSpawner::new(Vec3::ZERO, 3)).id();
        let interval = Settings::default().spawner.interval;
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs_f32(interval + 0.01));
        app.update();

        let world = app.world_mut();
        let mut q = world.query::<(&Cloud, &Collider)>();
        let (cloud, collider) = q.single(world);
        assert_eq!(cloud.spawner, spawner);
        assert_eq!(collider.kind, ColliderKind::Hazard);
    }

    #[test]
    fn drift_bounces_at_range_edge() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(Settings::default())
            .add_systems(Update, drift_clouds);
        let spawner = app.world_mut().spawn(CloudSpawner::new(Vec3::ZERO, 0)).id();
        let range = Settings::default().spawner.lateral_range;
        let cloud = app
            .world_mut()
            .spawn((Cloud { spawner, drift: 100.0 }, Transform::from_xyz(range - 1.0, 0.0, 0.0)))
            .id();

        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs(1));
        app.update();

        assert_eq!(app.world().get::<Transform>(cloud).unwrap().translation.x, range);
        assert_eq!(app.world().get::<Cloud>(cloud).unwrap().drift, -100.0);
    }
}
