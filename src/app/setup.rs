//! Startup systems that build the level.
//!
//! Spawns the camera and light, the lethal floor, the muffin with its flame,
//! and one cloud spawner on each side of the start position. Shared meshes and
//! materials for flames, explosions and clouds are inserted as resources so
//! the runtime systems never have to create assets themselves.
use bevy::prelude::*;
use muffin_jump::player::{CharacterBody, EffectAssets, Flame, MUFFIN_HALF_EXTENTS, Muffin};
use muffin_jump::world::{CloudAssets, CloudSpawner, Collider, ColliderKind, DeathFloor};
use muffin_jump::settings::Settings;

/// Half extents of the floor slab; its top face sits at y = 0.
const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(1500.0, 50.0, 400.0);
/// Lateral distance of each cloud spawner from the start position.
const SPAWNER_OFFSET: f32 = 450.0;

/// Marks the camera that follows the muffin up the level.
#[derive(Component)]
pub struct FollowCamera {
    pub offset: Vec3,
}

#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    let camera_offset = Vec3::new(0.0, 250.0, 1600.0);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(camera_offset)
                .looking_at(Vec3::new(0.0, 250.0, 0.0), Vec3::Y),
            ..default()
        },
        FollowCamera { offset: camera_offset },
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(400.0, 1200.0, 800.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.insert_resource(AmbientLight { color: Color::WHITE, brightness: 300.0 });

    // floor
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(FLOOR_HALF_EXTENTS * 2.0)),
            material: materials.add(Color::srgb(0.35, 0.55, 0.3)),
            transform: Transform::from_xyz(0.0, -FLOOR_HALF_EXTENTS.y, 0.0),
            ..default()
        },
        Collider::new(FLOOR_HALF_EXTENTS, ColliderKind::Ground),
        DeathFloor,
    ));

    // muffin
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Capsule3d::new(MUFFIN_HALF_EXTENTS.x, MUFFIN_HALF_EXTENTS.y * 2.0 - MUFFIN_HALF_EXTENTS.x * 2.0)),
            material: materials.add(Color::srgb(0.55, 0.33, 0.15)),
            transform: Transform::from_xyz(0.0, MUFFIN_HALF_EXTENTS.y, 0.0),
            ..default()
        },
        Muffin::new(),
        CharacterBody::default(),
        Collider::new(MUFFIN_HALF_EXTENTS, ColliderKind::Neutral),
    ));

    let effects = EffectAssets {
        flame_mesh: meshes.add(Sphere::new(12.0)),
        flame_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.6, 0.1),
            emissive: LinearRgba::rgb(8.0, 3.0, 0.4),
            ..default()
        }),
        explosion_mesh: meshes.add(Sphere::new(30.0)),
        explosion_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.3, 0.05),
            emissive: LinearRgba::rgb(12.0, 3.0, 0.2),
            ..default()
        }),
    };

    // flame, placed below the muffin by the first tick
    commands.spawn((
        PbrBundle {
            mesh: effects.flame_mesh.clone(),
            material: effects.flame_material.clone(),
            visibility: Visibility::Hidden,
            ..default()
        },
        Flame::default(),
    ));
    commands.insert_resource(effects);

    let size = Vec3::from_array(settings.spawner.cloud_size);
    commands.insert_resource(CloudAssets {
        mesh: meshes.add(Cuboid::from_size(size)),
        material: materials.add(Color::srgba(0.95, 0.95, 1.0, 0.9)),
    });

    for (i, side) in [-1.0_f32, 1.0].into_iter().enumerate() {
        let origin = Vec3::new(side * SPAWNER_OFFSET, 0.0, 0.0);
        commands.spawn((
            SpatialBundle::from_transform(Transform::from_translation(origin)),
            CloudSpawner::new(origin, 0x1234_5678 ^ (i as u32 + 1)),
            CloudSpawner::collider(),
        ));
    }
}
