//! Zone definitions: spawn regions, enemy pools with weight bias, and
//! difficulty scaling.

use crate::enemies::types::ArchetypeId;
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneId {
    Forest,
    Lake,
    Ruins,
}

impl ZoneId {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneId::Forest => "forest",
            ZoneId::Lake => "lake",
            ZoneId::Ruins => "ruins",
        }
    }
}

/// Rectangular spawn region in world pixels.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl SpawnRect {
    /// Uniform random point inside the rectangle.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            self.x + rng.gen::<f64>() * self.w,
            self.y + rng.gen::<f64>() * self.h,
        )
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Difficulty multipliers applied to archetype base stats at spawn.
#[derive(Debug, Clone, Copy)]
pub struct ZoneScale {
    pub hp: f64,
    pub damage: f64,
    pub xp: f64,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub name: &'static str,
    pub rect: SpawnRect,
    pub scale: ZoneScale,
    /// Enemy pool with weight bias; heavier entries spawn more often.
    pub pool: &'static [(ArchetypeId, u32)],
    /// At most one boss roams a zone.
    pub boss: Option<ArchetypeId>,
}

pub fn get_zone(id: ZoneId) -> Zone {
    match id {
        ZoneId::Forest => Zone {
            id,
            name: "Windwood Forest",
            rect: SpawnRect {
                x: 200.0,
                y: 700.0,
                w: 900.0,
                h: 1000.0,
            },
            scale: ZoneScale {
                hp: 0.85,
                damage: 0.8,
                xp: 0.8,
            },
            pool: &[(ArchetypeId::Brute, 3), (ArchetypeId::Archer, 2)],
            boss: None,
        },
        ZoneId::Lake => Zone {
            id,
            name: "Sapphire Lake",
            rect: SpawnRect {
                x: 1250.0,
                y: 300.0,
                w: 900.0,
                h: 900.0,
            },
            scale: ZoneScale {
                hp: 1.0,
                damage: 0.95,
                xp: 1.0,
            },
            pool: &[
                (ArchetypeId::Brute, 2),
                (ArchetypeId::Archer, 2),
                (ArchetypeId::Shaman, 2),
            ],
            boss: None,
        },
        ZoneId::Ruins => Zone {
            id,
            name: "Altari Ruins",
            rect: SpawnRect {
                x: 2200.0,
                y: 1200.0,
                w: 800.0,
                h: 1000.0,
            },
            scale: ZoneScale {
                hp: 1.25,
                damage: 1.15,
                xp: 1.3,
            },
            pool: &[(ArchetypeId::Brute, 2), (ArchetypeId::Shaman, 3)],
            boss: Some(ArchetypeId::Boss),
        },
    }
}

pub fn get_all_zones() -> Vec<Zone> {
    vec![
        get_zone(ZoneId::Forest),
        get_zone(ZoneId::Lake),
        get_zone(ZoneId::Ruins),
    ]
}

/// Weighted pick from the zone's enemy pool.
pub fn roll_archetype<R: Rng>(zone: &Zone, rng: &mut R) -> ArchetypeId {
    let total: u32 = zone.pool.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return ArchetypeId::Brute;
    }
    let mut roll = rng.gen_range(0..total);
    for (archetype, weight) in zone.pool {
        if roll < *weight {
            return *archetype;
        }
        roll -= weight;
    }
    zone.pool[0].0
}
