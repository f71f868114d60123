pub mod equipment;
pub mod types;

pub use equipment::{equip_item, recompute_stats, unequip, Equipment};
pub use types::{roll_drop, Item, ItemStats, Rarity, Slot};
