// Engine module - the game's simulation core plus its input/HUD adapters.
// main.rs owns the wgpu host and drives these in a fixed per-frame order:
// player -> animals -> net -> session/HUD.

pub mod animals;
pub mod components;
pub mod forest;
pub mod hud;
pub mod input;
pub mod net;
pub mod player;
pub mod session;
pub mod spatial;

// Re-export commonly used items
pub use components::*;
