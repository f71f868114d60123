pub mod abilities;
pub mod boss;
pub mod logic;
pub mod types;

pub use logic::{damage_enemy, spawn_zone_enemies};
pub use types::{Abilities, AbilityConfig, AbilityKind, Archetype, ArchetypeId, Enemy};
