// Net swing state machine and the catch hit-test.
//
// A swing resolves its catches the instant it is triggered; the rest of
// the swing window only exists to animate the arc and to block re-triggers.
// Catch policy: range + facing cone (4 units, 60-degree half-angle).

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::components::{Species, Transform};
use super::spatial;

/// Seconds one swing takes; re-triggers are ignored until it completes.
pub const SWING_DURATION: f32 = 0.3;
/// Maximum distance at which a swing can catch.
pub const CATCH_RANGE: f32 = 4.0;
/// Half-angle of the facing cone an animal must lie in to be caught.
pub const CATCH_CONE_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// Swing state. `None` = idle, `Some(t)` = seconds since the swing began.
pub struct Net {
    swing_elapsed: Option<f32>,
}

impl Net {
    pub fn new() -> Self {
        Self {
            swing_elapsed: None,
        }
    }

    /// Start a swing. Returns false (and does nothing) while a swing is
    /// already in flight — the caller must only run the hit-test on true.
    pub fn try_swing(&mut self) -> bool {
        if self.swing_elapsed.is_some() {
            return false;
        }
        self.swing_elapsed = Some(0.0);
        true
    }

    /// Advance the swing clock; returns to idle once the duration elapses.
    pub fn update(&mut self, dt: f32) {
        if let Some(elapsed) = &mut self.swing_elapsed {
            *elapsed += dt;
            if *elapsed >= SWING_DURATION {
                self.swing_elapsed = None;
            }
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.swing_elapsed.is_some()
    }

    /// Swing progress in [0, 1) while swinging. Purely cosmetic — the
    /// renderer derives its arc from sin(progress * PI).
    pub fn progress(&self) -> Option<f32> {
        self.swing_elapsed.map(|e| (e / SWING_DURATION).min(1.0))
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the hit-test against every live animal exactly once and despawn the
/// hits. Returns the species indices caught, in query order. Despawning is
/// what makes a catch terminal: a caught animal simply no longer exists for
/// later updates or hit-tests.
pub fn resolve_catches(world: &mut World, player_pos: Vec3, player_yaw: f32) -> Vec<usize> {
    let mut hits = Vec::new();
    let mut query = world.query::<(Entity, &Transform, &Species)>();
    for (entity, transform, species) in query.iter(world) {
        if spatial::dist_xz(transform.position, player_pos) > CATCH_RANGE {
            continue;
        }
        if !spatial::is_facing(
            player_pos,
            player_yaw,
            transform.position,
            CATCH_CONE_HALF_ANGLE,
        ) {
            continue;
        }
        hits.push((entity, species.0));
    }

    let mut caught = Vec::with_capacity(hits.len());
    for (entity, species) in hits {
        world.despawn(entity);
        caught.push(species);
    }
    caught
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::{Heading, Wander};

    fn spawn_animal(world: &mut World, species: usize, pos: Vec3) -> Entity {
        world
            .spawn((
                Transform::from_position(pos),
                Species(species),
                Heading::default(),
                Wander {
                    target: pos,
                    retarget_in: 1.0,
                },
            ))
            .id()
    }

    fn live_count(world: &mut World) -> usize {
        world.query::<&Species>().iter(world).count()
    }

    #[test]
    fn second_trigger_within_duration_is_ignored() {
        let mut net = Net::new();
        assert!(net.try_swing());
        assert!(!net.try_swing());

        // Mid-swing it is still blocked.
        net.update(SWING_DURATION * 0.5);
        assert!(net.is_swinging());
        assert!(!net.try_swing());

        // Past the duration the net is idle and can swing again.
        net.update(SWING_DURATION);
        assert!(!net.is_swinging());
        assert!(net.try_swing());
    }

    #[test]
    fn progress_runs_zero_to_one() {
        let mut net = Net::new();
        assert_eq!(net.progress(), None);
        net.try_swing();
        assert_eq!(net.progress(), Some(0.0));
        net.update(SWING_DURATION * 0.5);
        let p = net.progress().unwrap();
        assert!((p - 0.5).abs() < 1e-5);
    }

    #[test]
    fn catches_animal_dead_ahead_in_range() {
        let mut world = World::new();
        spawn_animal(&mut world, 3, Vec3::new(0.0, 0.0, -3.0));
        let caught = resolve_catches(&mut world, Vec3::ZERO, 0.0);
        assert_eq!(caught, vec![3]);
        assert_eq!(live_count(&mut world), 0);
    }

    #[test]
    fn cone_includes_45_degrees_excludes_90() {
        let mut world = World::new();
        // Bearing 45 degrees, distance ~2.8: inside both range and cone.
        spawn_animal(&mut world, 0, Vec3::new(2.0, 0.0, -2.0));
        // Bearing 90 degrees: in range but outside the cone.
        spawn_animal(&mut world, 1, Vec3::new(3.0, 0.0, 0.0));
        let caught = resolve_catches(&mut world, Vec3::ZERO, 0.0);
        assert_eq!(caught, vec![0]);
        assert_eq!(live_count(&mut world), 1);
    }

    #[test]
    fn out_of_range_is_never_caught_even_dead_ahead() {
        let mut world = World::new();
        spawn_animal(&mut world, 0, Vec3::new(0.0, 0.0, -4.5));
        assert!(resolve_catches(&mut world, Vec3::ZERO, 0.0).is_empty());
        assert_eq!(live_count(&mut world), 1);
    }

    #[test]
    fn catch_is_terminal() {
        let mut world = World::new();
        spawn_animal(&mut world, 2, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(resolve_catches(&mut world, Vec3::ZERO, 0.0), vec![2]);
        // Same swing parameters again: the animal is gone, nothing to catch.
        assert!(resolve_catches(&mut world, Vec3::ZERO, 0.0).is_empty());
    }

    #[test]
    fn every_live_animal_in_cone_is_caught_in_one_pass() {
        let mut world = World::new();
        spawn_animal(&mut world, 0, Vec3::new(0.0, 0.0, -2.0));
        spawn_animal(&mut world, 1, Vec3::new(0.5, 0.0, -3.0));
        spawn_animal(&mut world, 2, Vec3::new(0.0, 0.0, 8.0)); // behind
        let mut caught = resolve_catches(&mut world, Vec3::ZERO, 0.0);
        caught.sort_unstable();
        assert_eq!(caught, vec![0, 1]);
        assert_eq!(live_count(&mut world), 1);
    }

    #[test]
    fn yaw_rotates_the_cone_with_the_player() {
        let mut world = World::new();
        // Due +X of the player; caught only when facing +X (yaw -PI/2).
        spawn_animal(&mut world, 0, Vec3::new(3.0, 0.0, 0.0));
        assert!(resolve_catches(&mut world, Vec3::ZERO, 0.0).is_empty());
        let caught = resolve_catches(&mut world, Vec3::ZERO, -std::f32::consts::FRAC_PI_2);
        assert_eq!(caught, vec![0]);
    }
}
