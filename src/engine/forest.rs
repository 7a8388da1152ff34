// Static obstacle registry: the trees.
//
// Generated once at session start, read-only afterwards. Collision queries
// are a plain O(n) scan — tree count is ~150, far below where a spatial
// index would pay for itself.

use glam::Vec3;
use rand::Rng;

use super::spatial::{self, EPSILON};

/// Extra clearance added when pushing an animal out of a tree, so the next
/// frame's blocked-scan doesn't immediately re-trigger on the same trunk.
pub const PUSH_MARGIN: f32 = 0.1;

/// Trunk collision radius shared by every tree.
pub const TREE_RADIUS: f32 = 1.0;

/// How many placements are attempted; rejected spots are simply skipped,
/// so the final count can be slightly lower.
const TREE_PLACEMENTS: usize = 150;

/// Trees may not spawn within this distance of the player start.
const START_CLEARING: f32 = 8.0;

/// A single tree trunk collider.
#[derive(Debug, Clone, Copy)]
pub struct Tree {
    pub position: Vec3,
    pub radius: f32,
}

/// All tree colliders for the session. Immutable after `generate`.
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    /// Scatter trees on a ring around the player start, leaving a clearing
    /// at the origin so the player never spawns inside a trunk.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut trees = Vec::with_capacity(TREE_PLACEMENTS);
        for _ in 0..TREE_PLACEMENTS {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance = rng.gen_range(10.0..90.0_f32);
            let position = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            if spatial::dist_xz(position, Vec3::ZERO) > START_CLEARING {
                trees.push(Tree {
                    position,
                    radius: TREE_RADIUS,
                });
            }
        }
        Self { trees }
    }

    /// A forest with no trees. Blocks nothing.
    pub fn empty() -> Self {
        Self { trees: Vec::new() }
    }

    /// Would a body of the given clearance radius at `p` overlap any tree?
    pub fn blocked(&self, p: Vec3, clearance: f32) -> bool {
        self.trees
            .iter()
            .any(|tree| spatial::dist_xz(p, tree.position) < tree.radius + clearance)
    }

    /// Would sliding a body of the given clearance from `from` to `to`
    /// cross any tree? Closest-point-on-segment test per trunk, so a long
    /// step cannot skip over a trunk the way an endpoint-only check can
    /// when a frame hitch inflates dt.
    pub fn sweep_blocked(&self, from: Vec3, to: Vec3, clearance: f32) -> bool {
        let seg = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
        let len_sq = seg.length_squared();
        self.trees.iter().any(|tree| {
            let to_tree =
                Vec3::new(tree.position.x - from.x, 0.0, tree.position.z - from.z);
            let t = if len_sq < EPSILON * EPSILON {
                0.0
            } else {
                (to_tree.dot(seg) / len_sq).clamp(0.0, 1.0)
            };
            let closest = Vec3::new(from.x + seg.x * t, 0.0, from.z + seg.z * t);
            spatial::dist_xz(closest, tree.position) < tree.radius + clearance
        })
    }

    /// If `p` overlaps a tree, return `p` displaced just outside it.
    /// Returns `None` when `p` is already clear. Callers moving an animal
    /// should also pick a fresh wander target so it stops grinding into
    /// the same trunk.
    pub fn push_out(&self, p: Vec3, clearance: f32) -> Option<Vec3> {
        for tree in &self.trees {
            let dist = spatial::dist_xz(p, tree.position);
            if dist < tree.radius + clearance {
                let out = tree.radius + clearance + PUSH_MARGIN;
                let dir = if dist < EPSILON {
                    // Dead-center on the trunk: push along +X rather than
                    // normalizing a zero vector.
                    Vec3::X
                } else {
                    Vec3::new(p.x - tree.position.x, 0.0, p.z - tree.position.z) / dist
                };
                return Some(Vec3::new(
                    tree.position.x + dir.x * out,
                    p.y,
                    tree.position.z + dir.z * out,
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn one_tree_at(x: f32, z: f32) -> Forest {
        Forest {
            trees: vec![Tree {
                position: Vec3::new(x, 0.0, z),
                radius: TREE_RADIUS,
            }],
        }
    }

    #[test]
    fn empty_forest_blocks_nothing() {
        let forest = Forest::empty();
        assert!(!forest.blocked(Vec3::ZERO, 10.0));
        assert!(forest.push_out(Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn blocked_inside_radius_plus_clearance() {
        let forest = one_tree_at(10.0, 10.0);
        // 0.6 from the trunk center, well inside radius + 0.5.
        assert!(forest.blocked(Vec3::new(10.0, 0.0, 9.4), 0.5));
        // 2.0 away: clear.
        assert!(!forest.blocked(Vec3::new(10.0, 0.0, 8.0), 0.5));
    }

    #[test]
    fn sweep_catches_a_trunk_between_the_endpoints() {
        let forest = one_tree_at(10.0, 10.0);
        let from = Vec3::new(10.0, 0.0, 6.0);
        // Endpoint is clear of the trunk but the segment runs through it.
        let through = Vec3::new(10.0, 0.0, 14.0);
        assert!(!forest.blocked(through, 0.5));
        assert!(forest.sweep_blocked(from, through, 0.5));
        // A parallel path well beside the trunk is clear.
        assert!(!forest.sweep_blocked(
            Vec3::new(14.0, 0.0, 6.0),
            Vec3::new(14.0, 0.0, 14.0),
            0.5
        ));
    }

    #[test]
    fn zero_length_sweep_matches_point_query() {
        let forest = one_tree_at(10.0, 10.0);
        let inside = Vec3::new(10.0, 0.0, 9.4);
        assert!(forest.sweep_blocked(inside, inside, 0.5));
        let clear = Vec3::new(10.0, 0.0, 6.0);
        assert!(!forest.sweep_blocked(clear, clear, 0.5));
    }

    #[test]
    fn push_out_lands_outside_collision_range() {
        let forest = one_tree_at(0.0, 0.0);
        let inside = Vec3::new(0.8, 0.0, 0.0);
        let pushed = forest.push_out(inside, 0.5).unwrap();
        assert!(!forest.blocked(pushed, 0.5));
        // Pushed along the existing offset direction, not some other axis.
        assert!(pushed.x > inside.x);
        assert!(pushed.z.abs() < 1e-5);
    }

    #[test]
    fn push_out_from_exact_center_is_finite() {
        let forest = one_tree_at(5.0, -3.0);
        let pushed = forest.push_out(Vec3::new(5.0, 0.0, -3.0), 0.5).unwrap();
        assert!(pushed.x.is_finite() && pushed.z.is_finite());
        assert!(!forest.blocked(pushed, 0.5));
    }

    #[test]
    fn generated_forest_leaves_the_start_clearing() {
        let mut rng = StdRng::seed_from_u64(7);
        let forest = Forest::generate(&mut rng);
        assert!(!forest.trees.is_empty());
        for tree in &forest.trees {
            assert!(spatial::dist_xz(tree.position, Vec3::ZERO) > START_CLEARING);
        }
        // Player standing at the origin is never spawned into a trunk.
        assert!(!forest.blocked(Vec3::ZERO, 0.5));
    }
}
