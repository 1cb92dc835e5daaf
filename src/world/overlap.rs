//! Overlap-begin reporting for the muffin.
//!
//! Only entities with an `OverlapTracker` report overlaps. The tracker
//! remembers who is currently touching so an `OverlapBegan` event fires once
//! per contact instead of every frame.

use bevy::prelude::*;
use bevy::utils::HashSet;

use crate::world::{Collider, ColliderKind, aabb_overlap};

/// Fired on the first frame two colliders touch.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapBegan {
    pub subject: Entity,
    pub other: Entity,
    pub kind: ColliderKind,
}

/// Enables overlap reporting on an entity.
#[derive(Component, Debug, Default)]
pub struct OverlapTracker {
    pub touching: HashSet<Entity>,
}

impl OverlapTracker {
    /// Replace the current contact set with `now` and return the entities
    /// that were not touching before.
    pub fn update(&mut self, now: HashSet<Entity>) -> Vec<Entity> {
        let mut began: Vec<Entity> = now.difference(&self.touching).copied().collect();
        began.sort();
        self.touching = now;
        began
    }
}

/// Compare every tracked collider against every other collider.
#[allow(clippy::needless_pass_by_value)]
pub fn detect_overlaps(
    mut trackers: Query<(Entity, &Transform, &Collider, &mut OverlapTracker)>,
    others: Query<(Entity, &Transform, &Collider), Without<OverlapTracker>>,
    mut began: EventWriter<OverlapBegan>,
) {
    for (subject, tf, collider, mut tracker) in &mut trackers {
        let now: HashSet<Entity> = others
            .iter()
            .filter(|(_, otf, oc)| {
                aabb_overlap(tf.translation, collider.half_extents, otf.translation, oc.half_extents)
            })
            .map(|(e, _, _)| e)
            .collect();

        for other in tracker.update(now) {
            if let Ok((_, _, oc)) = others.get(other) {
                began.send(OverlapBegan { subject, other, kind: oc.kind });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Seen(Vec<OverlapBegan>);

    fn record(mut events: EventReader<OverlapBegan>, mut seen: ResMut<Seen>) {
        seen.0.extend(events.read().copied());
    }

    #[test]
    fn begin_fires_once_per_contact() {
        let mut app = App::new();
        app.add_event::<OverlapBegan>()
            .init_resource::<Seen>()
            .add_systems(Update, (detect_overlaps, record).chain());

        let muffin = app
            .world_mut()
            .spawn((Transform::default(), Collider::new(Vec3::splat(10.0), ColliderKind::Neutral), OverlapTracker::default()))
            .id();
        let cloud = app
            .world_mut()
            .spawn((Transform::from_xyz(15.0, 0.0, 0.0), Collider::new(Vec3::splat(10.0), ColliderKind::Hazard)))
            .id();
        app.world_mut()
            .spawn((Transform::from_xyz(500.0, 0.0, 0.0), Collider::new(Vec3::splat(10.0), ColliderKind::Ground)));

        app.update();
        app.update();
        assert_eq!(app.world().resource::<Seen>().0, vec![OverlapBegan { subject: muffin, other: cloud, kind: ColliderKind::Hazard }]);

        // leave and come back
        app.world_mut().get_mut::<Transform>(muffin).unwrap().translation.x = -100.0;
        app.update();
        app.world_mut().get_mut::<Transform>(muffin).unwrap().translation.x = 0.0;
        app.update();
        assert_eq!(app.world().resource::<Seen>().0.len(), 2);
    }

    #[test]
    fn tracker_reports_only_new_contacts() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut tracker = OverlapTracker::default();
        assert_eq!(tracker.update([a].into_iter().collect()), vec![a]);
        assert_eq!(tracker.update([a, b].into_iter().collect()), vec![b]);
        assert!(tracker.update([b].into_iter().collect()).is_empty());
    }
}
