// Planar spatial math shared by movement, collision, and the net hit-test.
//
// The world is an XZ ground plane; Y is render-only (eye height, bob
// animation) and never participates in gameplay distances or bearings.
// Yaw 0 looks along -Z, positive yaw turns left (matches the view matrix).

use glam::Vec3;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ground slab half-extent. Purely visual; nothing walks this far out.
pub const GROUND_HALF: f32 = 100.0;
/// Player position is clamped to [-PLAYER_BOUND, PLAYER_BOUND] on X and Z.
pub const PLAYER_BOUND: f32 = 95.0;
/// Animal wander targets are clamped to [-ANIMAL_BOUND, ANIMAL_BOUND].
pub const ANIMAL_BOUND: f32 = 90.0;

/// Below this length a direction is treated as zero rather than normalized.
pub const EPSILON: f32 = 1e-4;

// ============================================================================
// DISTANCE AND BEARING
// ============================================================================

/// Euclidean distance on the XZ plane, ignoring Y.
#[inline]
pub fn dist_xz(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// The yaw an observer at `from` would need to face `to` head-on.
/// Yaw 0 faces -Z, so the forward axis maps to atan2(-dx, -dz).
#[inline]
pub fn bearing_xz(from: Vec3, to: Vec3) -> f32 {
    (-(to.x - from.x)).atan2(-(to.z - from.z))
}

/// Normalize a signed angle into (-PI, PI].
pub fn wrap_angle(mut a: f32) -> f32 {
    use std::f32::consts::PI;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// True if `target` lies within `cone_half_angle` of the observer's yaw.
/// Used by the net catch test; also suitable for "does it see me" checks.
pub fn is_facing(observer: Vec3, yaw: f32, target: Vec3, cone_half_angle: f32) -> bool {
    let delta = wrap_angle(bearing_xz(observer, target) - yaw);
    delta.abs() < cone_half_angle
}

// ============================================================================
// HEADING-RELATIVE AXES
// ============================================================================

/// Unit forward vector on the XZ plane for a given yaw.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Unit right vector on the XZ plane for a given yaw.
#[inline]
pub fn yaw_right(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// XZ direction from `from` to `to`, or `None` when they are closer than
/// EPSILON (never normalizes a zero-length vector).
pub fn dir_xz(from: Vec3, to: Vec3) -> Option<Vec3> {
    let d = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let len = d.length();
    if len < EPSILON { None } else { Some(d / len) }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// True if `p` is inside the playable area for the player.
#[inline]
pub fn in_player_bounds(p: Vec3) -> bool {
    p.x.abs() <= PLAYER_BOUND && p.z.abs() <= PLAYER_BOUND
}

/// Clamp an animal wander target back into the animal band. Applied every
/// frame before pursuit so an animal never walks toward an unreachable point.
pub fn clamp_animal_target(p: Vec3) -> Vec3 {
    Vec3::new(
        p.x.clamp(-ANIMAL_BOUND, ANIMAL_BOUND),
        p.y,
        p.z.clamp(-ANIMAL_BOUND, ANIMAL_BOUND),
    )
}
