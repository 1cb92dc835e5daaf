//! Things the muffin can touch: colliders, the lethal floor, overlap
//! reporting and the cloud spawners.
//!
//! Every collidable entity carries a `Collider` whose `ColliderKind` is fixed
//! when the entity is spawned. Overlap handlers match on the kind instead of
//! inspecting what else is attached to the entity.
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     SpatialBundle::from_transform(Transform::from_xyz(0.0, -25.0, 0.0)),
//!     Collider::new(Vec3::new(2000.0, 25.0, 400.0), ColliderKind::Ground),
//!     DeathFloor,
//! ));
//! ```

pub mod overlap;
pub mod spawner;

use bevy::prelude::*;

pub use overlap::*;
pub use spawner::*;

/// What a collider represents to the muffin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// A cloud: marks the muffin mortal and scores on contact.
    Hazard,
    Spawner,
    /// Static level geometry the muffin can stand on.
    Ground,
    Neutral,
}

impl ColliderKind {
    /// Whether the muffin can land on top of this collider.
    #[must_use]
    pub fn is_platform(self) -> bool {
        matches!(self, ColliderKind::Ground | ColliderKind::Hazard)
    }
}

/// Axis-aligned box centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec3,
    pub kind: ColliderKind,
}

impl Collider {
    #[must_use]
    pub fn new(half_extents: Vec3, kind: ColliderKind) -> Self {
        Self { half_extents, kind }
    }
}

/// Ground that kills a mortal muffin once it lands and comes to rest.
#[derive(Component, Debug, Default)]
pub struct DeathFloor;

/// Inclusive AABB intersection test; touching faces count as overlapping.
#[must_use]
pub fn aabb_overlap(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> bool {
    let d = (a_center - b_center).abs();
    let reach = a_half + b_half;
    d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
}
