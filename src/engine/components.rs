// Core ECS components. Animals are the only entities in the world; the
// player, forest, and net live as plain structs on the driver.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Position of an entity in 3D space
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// RGB color for rendering
#[derive(Component, Debug, Clone, Copy)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Index into the species table (`animals::SPECIES`).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Species(pub usize);

/// Visible facing of an animal, updated to its direction of travel.
/// Render-only; gameplay never reads it back.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Heading {
    pub yaw: f32,
}

/// Wander state: where the animal is walking and when it next re-rolls.
///
/// `retarget_in` is wall-clock seconds; it only counts down while the
/// animal is wandering (fleeing overrides the target every frame).
#[derive(Component, Debug, Clone, Copy)]
pub struct Wander {
    pub target: Vec3,
    pub retarget_in: f32,
}
