pub mod data;

pub use data::{get_all_zones, get_zone, SpawnRect, Zone, ZoneId, ZoneScale};
