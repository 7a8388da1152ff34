// First-person player controller.
//
// Camera model:
//   - Eye fixed at EYE_HEIGHT above the ground plane
//   - Yaw/pitch driven directly by pointer-lock mouse deltas
//   - WASD moves on the XZ plane relative to yaw
//   - A candidate position is committed only if it clears every tree and
//     stays in bounds; otherwise this frame's movement is dropped

use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use super::forest::Forest;
use super::input::InputState;
use super::spatial::{self, EPSILON};

/// Eye height above the ground plane.
pub const EYE_HEIGHT: f32 = 1.6;
/// Body clearance against tree trunks.
pub const PLAYER_RADIUS: f32 = 0.5;
/// Walking speed in world units per second.
pub const WALK_SPEED: f32 = 6.0;
/// Speed while the run modifier (Shift) is held.
pub const RUN_SPEED: f32 = 12.0;
/// Radians of look per pixel of mouse travel.
const LOOK_SENSITIVITY: f32 = 0.002;
/// Pitch stops just short of straight up/down so the view never flips.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;

pub struct Player {
    /// Feet position on the ground plane (y = 0).
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Apply accumulated pointer-look deltas. Always succeeds, independent
    /// of whether this frame's movement was blocked.
    pub fn apply_look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Map held movement keys to a candidate position and commit it if it
    /// clears the forest and the world bounds. A blocked move is dropped,
    /// not queued: holding a key against a trunk goes nowhere.
    pub fn update(&mut self, input: &InputState, forest: &Forest, dt: f32) {
        let forward = spatial::yaw_forward(self.yaw);
        let right = spatial::yaw_right(self.yaw);

        let mut move_dir = Vec3::ZERO;
        if input.is_key_held(KeyCode::KeyW) || input.is_key_held(KeyCode::ArrowUp) {
            move_dir += forward;
        }
        if input.is_key_held(KeyCode::KeyS) || input.is_key_held(KeyCode::ArrowDown) {
            move_dir -= forward;
        }
        if input.is_key_held(KeyCode::KeyD) || input.is_key_held(KeyCode::ArrowRight) {
            move_dir += right;
        }
        if input.is_key_held(KeyCode::KeyA) || input.is_key_held(KeyCode::ArrowLeft) {
            move_dir -= right;
        }

        if move_dir.length() < EPSILON {
            return;
        }

        let speed = if input.is_key_held(KeyCode::ShiftLeft)
            || input.is_key_held(KeyCode::ShiftRight)
        {
            RUN_SPEED
        } else {
            WALK_SPEED
        };

        let candidate = self.position + move_dir.normalize() * speed * dt;
        self.try_move_to(candidate, forest);
    }

    /// Commit `candidate` if the whole path to it is clear of every tree
    /// and the endpoint is within bounds. The swept check keeps a
    /// hitch-inflated dt from stepping straight over a trunk. Split out of
    /// `update` so collision gating is testable without fabricating winit
    /// key events.
    pub fn try_move_to(&mut self, candidate: Vec3, forest: &Forest) -> bool {
        if !spatial::in_player_bounds(candidate)
            || forest.sweep_blocked(self.position, candidate, PLAYER_RADIUS)
        {
            return false;
        }
        self.position = candidate;
        true
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    /// Unit view direction from yaw and pitch.
    pub fn look_dir(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// View matrix: eye looking along yaw/pitch, world up.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        Mat4::look_at_rh(eye, eye + self.look_dir(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::forest::{Tree, TREE_RADIUS};

    fn one_tree_at(x: f32, z: f32) -> Forest {
        Forest {
            trees: vec![Tree {
                position: Vec3::new(x, 0.0, z),
                radius: TREE_RADIUS,
            }],
        }
    }

    #[test]
    fn rejected_move_is_idempotent() {
        let forest = one_tree_at(10.0, 10.0);
        let mut player = Player::new();
        player.position = Vec3::new(10.0, 0.0, 6.0);

        // (10, 9.4) is within radius + PLAYER_RADIUS of the trunk.
        for _ in 0..5 {
            assert!(!player.try_move_to(Vec3::new(10.0, 0.0, 9.4), &forest));
            assert_eq!(player.position, Vec3::new(10.0, 0.0, 6.0));
        }
    }

    #[test]
    fn long_step_cannot_pass_through_a_tree() {
        let forest = one_tree_at(10.0, 10.0);
        let mut player = Player::new();
        player.position = Vec3::new(10.0, 0.0, 6.0);

        // One oversized step whose endpoint is clear on the far side of
        // the trunk: the swept gate must reject it.
        assert!(!player.try_move_to(Vec3::new(10.0, 0.0, 14.0), &forest));
        assert_eq!(player.position, Vec3::new(10.0, 0.0, 6.0));

        // Stepping around the trunk is still allowed.
        assert!(player.try_move_to(Vec3::new(14.0, 0.0, 6.0), &forest));
    }

    #[test]
    fn clear_move_commits() {
        let forest = one_tree_at(10.0, 10.0);
        let mut player = Player::new();
        assert!(player.try_move_to(Vec3::new(2.0, 0.0, 2.0), &forest));
        assert_eq!(player.position, Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn out_of_bounds_move_is_dropped() {
        let forest = Forest::empty();
        let mut player = Player::new();
        player.position = Vec3::new(94.0, 0.0, 0.0);
        assert!(!player.try_move_to(Vec3::new(96.0, 0.0, 0.0), &forest));
        assert_eq!(player.position, Vec3::new(94.0, 0.0, 0.0));
        // The boundary itself is still walkable.
        assert!(player.try_move_to(Vec3::new(95.0, 0.0, 0.0), &forest));
    }

    #[test]
    fn pitch_clamps_short_of_vertical() {
        let mut player = Player::new();
        player.apply_look(0.0, -100_000.0);
        assert!(player.pitch <= PITCH_LIMIT + 1e-6);
        player.apply_look(0.0, 100_000.0);
        assert!(player.pitch >= -PITCH_LIMIT - 1e-6);
        // Look direction never reaches straight up/down, so look_at keeps
        // a usable basis.
        assert!(player.look_dir().y.abs() < 1.0);
    }

    #[test]
    fn look_applies_even_when_blocked() {
        let forest = one_tree_at(0.0, -1.2);
        let mut player = Player::new();
        let blocked = !player.try_move_to(Vec3::new(0.0, 0.0, -0.5), &forest);
        assert!(blocked);
        player.apply_look(50.0, -30.0);
        assert!(player.yaw != 0.0 && player.pitch != 0.0);
    }

    #[test]
    fn yaw_zero_looks_down_negative_z() {
        let player = Player::new();
        let dir = player.look_dir();
        assert!((dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert_eq!(player.eye(), Vec3::new(0.0, EYE_HEIGHT, 0.0));
    }
}
