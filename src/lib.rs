//! Shards — the combat simulation core of a real-time action RPG.
//!
//! The crate owns per-tick entity updates, ability cooldowns, damage
//! resolution, telegraphed area effects, and the boss phase machine. It
//! renders nothing, persists nothing, and is driven entirely by an external
//! clock through [`update_frame`].

// Allow dead code in library - parts of the API exist for embedders only.
#![allow(dead_code)]

pub mod combat;
pub mod core;
pub mod effects;
pub mod enemies;
pub mod items;
pub mod player;
pub mod projectiles;
pub mod zones;

pub use crate::core::state::{PlayerInput, SimulationState};
pub use crate::core::tick::{update_frame, FrameCallbacks, NullCallbacks, QuestEvent};
