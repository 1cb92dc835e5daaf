//! Muffin physics: movement input, launches, gravity and landing.
//!
//! Horizontal velocity comes straight from the movement input gathered this
//! frame. Vertical velocity integrates gravity and is zeroed exactly when the
//! muffin lands on the top face of a platform collider, which is what the
//! death check keys on. Register `muffin_physics` to run it each frame.

use bevy::prelude::*;

use crate::player::Muffin;
use crate::settings::{GameplaySettings, Settings};
use crate::world::Collider;

/// Velocity and per-frame input accumulator for the muffin.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct CharacterBody {
    /// World units per second.
    pub velocity: Vec3,
    /// Movement input added since the last physics step.
    pub pending_input: Vec3,
    pub on_ground: bool,
    /// The platform the muffin is standing on, if any.
    pub support: Option<Entity>,
}

impl CharacterBody {
    pub fn add_movement_input(&mut self, input: Vec3) {
        self.pending_input += input;
    }

    /// Set vertical velocity to `v.y` and add the horizontal part.
    pub fn launch(&mut self, v: Vec3) {
        self.velocity.x += v.x;
        self.velocity.z += v.z;
        self.velocity.y = v.y;
        self.on_ground = false;
        self.support = None;
    }
}

/// Top face of a collider the muffin can land on.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Platform {
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    fn under(&self, pos: Vec3, half: Vec3) -> bool {
        (pos.x - self.center.x).abs() <= self.half_extents.x + half.x
            && (pos.z - self.center.z).abs() <= self.half_extents.z + half.z
    }
}

/// Advance the muffin by `dt`. Returns the index into `platforms` of the
/// platform it ends up standing on.
///
/// Extracted so the system, tests and benchmarks share identical logic.
pub fn physics_step(
    pos: &mut Vec3,
    half: Vec3,
    body: &mut CharacterBody,
    platforms: &[Platform],
    dt: f32,
    gameplay: &GameplaySettings,
) -> Option<usize> {
    let input = std::mem::take(&mut body.pending_input).clamp_length_max(1.0);
    body.velocity.x = input.x * gameplay.walk_speed;
    body.velocity.z = input.z * gameplay.walk_speed;
    pos.x += body.velocity.x * dt;
    pos.z += body.velocity.z * dt;

    body.velocity.y = (body.velocity.y + gameplay.gravity * dt).max(-gameplay.terminal_velocity);

    let feet = pos.y - half.y;
    let new_feet = feet + body.velocity.y * dt;

    let mut landed: Option<usize> = None;
    if body.velocity.y <= 0.0 {
        for (i, p) in platforms.iter().enumerate() {
            let top = p.top();
            if !p.under(*pos, half) || feet < top - 1e-3 || new_feet > top {
                continue;
            }
            // highest platform wins when several overlap
            if landed.is_none_or(|j| top > platforms[j].top()) {
                landed = Some(i);
            }
        }
    }

    match landed {
        Some(i) => {
            pos.y = platforms[i].top() + half.y;
            body.velocity.y = 0.0;
            body.on_ground = true;
        }
        None => {
            pos.y = new_feet + half.y;
            body.on_ground = false;
        }
    }
    landed
}

#[allow(clippy::needless_pass_by_value)]
pub fn muffin_physics(
    time: Res<Time>,
    settings: Res<Settings>,
    mut q: Query<(&mut Transform, &Collider, &mut CharacterBody), With<Muffin>>,
    colliders: Query<(Entity, &Transform, &Collider), Without<Muffin>>,
) {
    let Ok((mut tf, collider, mut body)) = q.get_single_mut() else { return };

    let (entities, platforms): (Vec<Entity>, Vec<Platform>) = colliders
        .iter()
        .filter(|(_, _, c)| c.kind.is_platform())
        .map(|(e, t, c)| (e, Platform { center: t.translation, half_extents: c.half_extents }))
        .unzip();

    let mut pos = tf.translation;
    let landed = physics_step(
        &mut pos,
        collider.half_extents,
        &mut body,
        &platforms,
        time.delta_seconds(),
        &settings.gameplay,
    );
    tf.translation = pos;
    body.support = landed.map(|i| entities[i]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const HALF: Vec3 = Vec3::new(20.0, 30.0, 20.0);

    fn floor() -> Platform {
        Platform { center: Vec3::new(0.0, -50.0, 0.0), half_extents: Vec3::new(1000.0, 50.0, 500.0) }
    }

    #[test]
    fn resting_on_floor_keeps_velocity_exactly_zero() {
        let g = GameplaySettings::default();
        let mut pos = Vec3::new(0.0, HALF.y, 0.0);
        let mut body = CharacterBody::default();
        for _ in 0..10 {
            assert_eq!(physics_step(&mut pos, HALF, &mut body, &[floor()], DT, &g), Some(0));
            assert_eq!(body.velocity.y, 0.0);
            assert_eq!(pos.y, HALF.y);
            assert!(body.on_ground);
        }
    }

    #[test]
    fn jump_rises_then_lands() {
        let g = GameplaySettings::default();
        let mut pos = Vec3::new(0.0, HALF.y, 0.0);
        let mut body = CharacterBody::default();
        body.launch(Vec3::new(0.0, g.jump_multiplier, 0.0));

        assert_eq!(physics_step(&mut pos, HALF, &mut body, &[floor()], DT, &g), None);
        assert!(body.velocity.y > 0.0);
        assert!(pos.y > HALF.y);

        let mut saw_fall = false;
        for _ in 0..600 {
            if physics_step(&mut pos, HALF, &mut body, &[floor()], DT, &g).is_some() {
                break;
            }
            saw_fall |= body.velocity.y < 0.0;
        }
        assert!(saw_fall);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(pos.y, HALF.y);
    }

    #[test]
    fn movement_input_is_consumed_and_clamped() {
        let g = GameplaySettings::default();
        let mut pos = Vec3::new(0.0, HALF.y, 0.0);
        let mut body = CharacterBody::default();
        body.add_movement_input(Vec3::new(3.0, 0.0, 0.0));
        physics_step(&mut pos, HALF, &mut body, &[floor()], DT, &g);
        assert_eq!(body.velocity.x, g.walk_speed);
        assert!((pos.x - g.walk_speed * DT).abs() < 1e-3);
        assert_eq!(body.pending_input, Vec3::ZERO);

        physics_step(&mut pos, HALF, &mut body, &[floor()], DT, &g);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn walking_off_an_edge_falls() {
        let g = GameplaySettings::default();
        let ledge = Platform { center: Vec3::new(0.0, -5.0, 0.0), half_extents: Vec3::new(10.0, 5.0, 10.0) };
        let mut pos = Vec3::new(100.0, HALF.y, 0.0);
        let mut body = CharacterBody::default();
        assert_eq!(physics_step(&mut pos, HALF, &mut body, &[ledge], DT, &g), None);
        assert!(body.velocity.y < 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn lands_on_highest_overlapping_platform() {
        let g = GameplaySettings::default();
        let cloud = Platform { center: Vec3::new(0.0, 100.0, 0.0), half_extents: Vec3::new(50.0, 10.0, 50.0) };
        let mut pos = Vec3::new(0.0, 110.0 + HALF.y + 0.5, 0.0);
        let mut body = CharacterBody { velocity: Vec3::new(0.0, -300.0, 0.0), ..default() };
        assert_eq!(physics_step(&mut pos, HALF, &mut body, &[floor(), cloud], DT, &g), Some(1));
        assert_eq!(pos.y, 110.0 + HALF.y);
    }

    #[test]
    fn fall_speed_is_capped() {
        let g = GameplaySettings::default();
        let mut pos = Vec3::new(0.0, 1.0e6, 0.0);
        let mut body = CharacterBody::default();
        for _ in 0..1000 {
            physics_step(&mut pos, HALF, &mut body, &[], DT, &g);
        }
        assert_eq!(body.velocity.y, -g.terminal_velocity);
    }
}
