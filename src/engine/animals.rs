// Animal behavior: wander/flee state machine, movement integration, and
// obstacle deflection.
//
// The state is implicit — an animal is fleeing exactly when the player is
// inside FLEE_RADIUS this frame, wandering otherwise. Nothing is stored,
// so there are no transition bugs to have.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

use super::components::{Color, Heading, Species, Transform, Wander};
use super::forest::Forest;
use super::spatial;

// ============================================================================
// SPECIES TABLE
// ============================================================================

/// Plain-data species descriptor. Per-species behavior differs only in
/// speed; everything else is presentation handed to the renderer/HUD.
pub struct SpeciesDesc {
    pub name: &'static str,
    pub glyph: &'static str,
    pub color: [f32; 3],
    /// Base walking speed in world units per second.
    pub speed: f32,
}

pub const SPECIES: [SpeciesDesc; 10] = [
    SpeciesDesc { name: "Fox",      glyph: "\u{1f98a}", color: [1.00, 0.42, 0.21], speed: 4.8 },
    SpeciesDesc { name: "Rabbit",   glyph: "\u{1f430}", color: [0.96, 0.96, 0.86], speed: 7.2 },
    SpeciesDesc { name: "Deer",     glyph: "\u{1f98c}", color: [0.55, 0.27, 0.07], speed: 6.0 },
    SpeciesDesc { name: "Bear",     glyph: "\u{1f43b}", color: [0.40, 0.26, 0.13], speed: 3.0 },
    SpeciesDesc { name: "Wolf",     glyph: "\u{1f43a}", color: [0.44, 0.50, 0.56], speed: 5.4 },
    SpeciesDesc { name: "Squirrel", glyph: "\u{1f43f}", color: [0.82, 0.41, 0.12], speed: 9.0 },
    SpeciesDesc { name: "Owl",      glyph: "\u{1f989}", color: [0.55, 0.45, 0.33], speed: 3.6 },
    SpeciesDesc { name: "Raccoon",  glyph: "\u{1f99d}", color: [0.41, 0.41, 0.41], speed: 4.2 },
    SpeciesDesc { name: "Hedgehog", glyph: "\u{1f994}", color: [0.63, 0.32, 0.18], speed: 2.4 },
    SpeciesDesc { name: "Boar",     glyph: "\u{1f417}", color: [0.29, 0.22, 0.16], speed: 3.6 },
];

// ============================================================================
// TUNING CONSTANTS
// ============================================================================

/// Player proximity that flips an animal from wandering to fleeing.
pub const FLEE_RADIUS: f32 = 15.0;
/// How far past its own position a fleeing animal projects its target.
pub const FLEE_DISTANCE: f32 = 20.0;
/// Speed multiplier while fleeing.
pub const FLEE_SPEED_FACTOR: f32 = 1.5;
/// Within this distance of its target an animal stands still.
pub const ARRIVE_EPSILON: f32 = 0.5;
/// Half-extent of the random wander-target offset, per axis.
const WANDER_RANGE: f32 = 10.0;
/// Smaller re-target offset used after an obstacle deflection.
const DEFLECT_RANGE: f32 = 5.0;
/// Seconds between wander re-targets (uniform in this range).
const RETARGET_SECS: std::ops::Range<f32> = 1.0..3.0;

/// Body clearance used against tree trunks.
pub const ANIMAL_RADIUS: f32 = 0.5;

pub const ANIMAL_COUNT: usize = 10;

// ============================================================================
// SPAWNING
// ============================================================================

/// Spawn the session's animals, species assigned round-robin, on a ring
/// 15–65 units out — every spawn starts outside FLEE_RADIUS of the player.
pub fn spawn_animals(world: &mut World, rng: &mut impl Rng) -> usize {
    for i in 0..ANIMAL_COUNT {
        let species = i % SPECIES.len();
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(15.0..65.0_f32);
        let position = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        let [r, g, b] = SPECIES[species].color;

        world.spawn((
            Transform::from_position(position),
            Color { r, g, b },
            Species(species),
            Heading::default(),
            // Zero countdown: each animal rolls a real target on frame one.
            Wander {
                target: position,
                retarget_in: 0.0,
            },
        ));
    }
    ANIMAL_COUNT
}

// ============================================================================
// PER-FRAME UPDATE
// ============================================================================

/// Advance every live animal by one frame. Caught animals are despawned
/// and therefore never show up in this query.
pub fn update(
    world: &mut World,
    player_pos: Vec3,
    forest: &Forest,
    dt: f32,
    rng: &mut impl Rng,
) {
    let mut query = world.query::<(&mut Transform, &mut Heading, &mut Wander, &Species)>();
    for (mut transform, mut heading, mut wander, species) in query.iter_mut(world) {
        step_animal(
            &mut transform.position,
            &mut heading.yaw,
            &mut wander,
            &SPECIES[species.0],
            player_pos,
            forest,
            dt,
            rng,
        );
    }
}

/// One animal's frame: pick/refresh the target, walk toward it, resolve
/// tree collisions. Free function so behavior is testable without an ECS
/// world around it.
#[allow(clippy::too_many_arguments)]
pub fn step_animal(
    position: &mut Vec3,
    heading_yaw: &mut f32,
    wander: &mut Wander,
    species: &SpeciesDesc,
    player_pos: Vec3,
    forest: &Forest,
    dt: f32,
    rng: &mut impl Rng,
) {
    let dist_to_player = spatial::dist_xz(*position, player_pos);
    let fleeing = dist_to_player < FLEE_RADIUS;

    if fleeing {
        // Target straight away from the player. If the player is standing
        // exactly on the animal there is no away direction; keep the old
        // target for this frame.
        if let Some(away) = spatial::dir_xz(player_pos, *position) {
            wander.target = *position + away * FLEE_DISTANCE;
        }
    } else {
        wander.retarget_in -= dt;
        if wander.retarget_in <= 0.0 {
            wander.target = *position + random_offset(rng, WANDER_RANGE);
            wander.retarget_in = rng.gen_range(RETARGET_SECS);
        }
    }

    // Re-clamp every frame: flee projection can overshoot the world edge.
    wander.target = spatial::clamp_animal_target(wander.target);

    let remaining = spatial::dist_xz(*position, wander.target);
    if remaining > ARRIVE_EPSILON {
        let speed = if fleeing {
            species.speed * FLEE_SPEED_FACTOR
        } else {
            species.speed
        };
        if let Some(dir) = spatial::dir_xz(*position, wander.target) {
            let step = (speed * dt).min(remaining);
            *position += dir * step;
            *heading_yaw = spatial::bearing_xz(*position - dir * step, wander.target);
        }

        // Walked into a trunk: displace out of it and pick somewhere new,
        // so the animal doesn't oscillate into the same tree.
        if let Some(pushed) = forest.push_out(*position, ANIMAL_RADIUS) {
            *position = pushed;
            wander.target =
                spatial::clamp_animal_target(*position + random_offset(rng, DEFLECT_RANGE));
        }
    }
}

fn random_offset(rng: &mut impl Rng, half_extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_extent..half_extent),
        0.0,
        rng.gen_range(-half_extent..half_extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::forest::{Tree, TREE_RADIUS};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fox() -> &'static SpeciesDesc {
        &SPECIES[0]
    }

    fn step(
        position: &mut Vec3,
        wander: &mut Wander,
        player: Vec3,
        forest: &Forest,
        dt: f32,
        rng: &mut StdRng,
    ) {
        let mut yaw = 0.0;
        step_animal(position, &mut yaw, wander, fox(), player, forest, dt, rng);
    }

    #[test]
    fn fleeing_never_moves_net_closer_to_player() {
        let mut rng = StdRng::seed_from_u64(1);
        let forest = Forest::empty();
        let player = Vec3::ZERO;
        let mut pos = Vec3::new(5.0, 0.0, 3.0);
        let mut wander = Wander { target: pos, retarget_in: 10.0 };

        for _ in 0..100 {
            let before = spatial::dist_xz(pos, player);
            step(&mut pos, &mut wander, player, &forest, 1.0 / 60.0, &mut rng);
            let after = spatial::dist_xz(pos, player);
            assert!(after >= before, "fled from {before} to {after}");
        }
    }

    #[test]
    fn fleeing_applies_speed_boost() {
        let mut rng = StdRng::seed_from_u64(2);
        let forest = Forest::empty();
        let dt = 0.1;

        // Fleeing: player right behind.
        let mut pos = Vec3::new(0.0, 0.0, -5.0);
        let mut wander = Wander { target: pos, retarget_in: 10.0 };
        let before = pos;
        step(&mut pos, &mut wander, Vec3::ZERO, &forest, dt, &mut rng);
        let fled = spatial::dist_xz(before, pos);
        assert!((fled - fox().speed * FLEE_SPEED_FACTOR * dt).abs() < 1e-4);

        // Wandering toward a fixed far target: base speed.
        let mut pos = Vec3::new(50.0, 0.0, 50.0);
        let mut wander = Wander {
            target: Vec3::new(60.0, 0.0, 50.0),
            retarget_in: 10.0,
        };
        let before = pos;
        step(&mut pos, &mut wander, Vec3::ZERO, &forest, dt, &mut rng);
        let walked = spatial::dist_xz(before, pos);
        assert!((walked - fox().speed * dt).abs() < 1e-4);
    }

    #[test]
    fn wander_retarget_fires_on_countdown_and_resets() {
        let mut rng = StdRng::seed_from_u64(3);
        let forest = Forest::empty();
        // Far from the player, timer expired, already at its target.
        let mut pos = Vec3::new(40.0, 0.0, 40.0);
        let mut wander = Wander { target: pos, retarget_in: 0.0 };
        step(&mut pos, &mut wander, Vec3::ZERO, &forest, 1.0 / 60.0, &mut rng);

        assert!(wander.retarget_in > 0.0 && wander.retarget_in <= 3.0);
        let offset = spatial::dist_xz(wander.target, Vec3::new(40.0, 0.0, 40.0));
        assert!(offset <= (2.0 * WANDER_RANGE * WANDER_RANGE).sqrt() + 1e-3);
    }

    #[test]
    fn targets_stay_inside_the_animal_band() {
        let mut rng = StdRng::seed_from_u64(4);
        let forest = Forest::empty();
        // Animal near the corner, fleeing outward past the edge.
        let mut pos = Vec3::new(88.0, 0.0, 88.0);
        let player = Vec3::new(80.0, 0.0, 80.0);
        let mut wander = Wander { target: pos, retarget_in: 10.0 };
        for _ in 0..200 {
            step(&mut pos, &mut wander, player, &forest, 1.0 / 60.0, &mut rng);
            assert!(wander.target.x.abs() <= spatial::ANIMAL_BOUND);
            assert!(wander.target.z.abs() <= spatial::ANIMAL_BOUND);
        }
    }

    #[test]
    fn tree_deflection_displaces_and_retargets() {
        let mut rng = StdRng::seed_from_u64(5);
        let forest = Forest {
            trees: vec![Tree {
                position: Vec3::new(42.0, 0.0, 40.0),
                radius: TREE_RADIUS,
            }],
        };
        // Walking straight at the trunk with a big dt lands inside it.
        let mut pos = Vec3::new(40.0, 0.0, 40.0);
        let old_target = Vec3::new(50.0, 0.0, 40.0);
        let mut wander = Wander { target: old_target, retarget_in: 10.0 };
        step(&mut pos, &mut wander, Vec3::ZERO, &forest, 0.5, &mut rng);

        assert!(!forest.blocked(pos, ANIMAL_RADIUS));
        assert!(wander.target != old_target);
    }

    #[test]
    fn animal_at_target_stands_still() {
        let mut rng = StdRng::seed_from_u64(6);
        let forest = Forest::empty();
        let mut pos = Vec3::new(30.0, 0.0, 30.0);
        let mut wander = Wander { target: pos, retarget_in: 10.0 };
        step(&mut pos, &mut wander, Vec3::ZERO, &forest, 1.0 / 60.0, &mut rng);
        assert_eq!(pos, Vec3::new(30.0, 0.0, 30.0));
    }

    #[test]
    fn spawns_are_outside_the_flee_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut world = World::new();
        let total = spawn_animals(&mut world, &mut rng);
        assert_eq!(total, ANIMAL_COUNT);

        let mut query = world.query::<&Transform>();
        let mut count = 0;
        for transform in query.iter(&world) {
            assert!(spatial::dist_xz(transform.position, Vec3::ZERO) >= FLEE_RADIUS);
            count += 1;
        }
        assert_eq!(count, ANIMAL_COUNT);
    }
}
