use crate::combat::types::SpecialEffect;
use crate::player::types::ClassId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Weapon,
    Armor,
    Ring,
    Amulet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Plain numeric stat bonuses carried by an item. Missing fields in item
/// definitions simply contribute nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemStats {
    pub damage: f64,
    pub hp: f64,
    pub mp: f64,
    pub crit: f64,
    pub lifesteal: f64,
    pub range: f64,
    /// Subtracted from the swing interval, floored elsewhere.
    pub attack_speed: f64,
    pub armor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub slot: Slot,
    pub rarity: Rarity,
    #[serde(default)]
    pub stats: ItemStats,
    /// Special-effect payload (legendary bonuses and the like).
    #[serde(default)]
    pub effects: Vec<(SpecialEffect, f64)>,
    /// Some legendaries only fit one class.
    #[serde(default)]
    pub required_class: Option<ClassId>,
}

impl Item {
    pub fn new(name: &str, slot: Slot, rarity: Rarity, stats: ItemStats) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slot,
            rarity,
            stats,
            effects: Vec::new(),
            required_class: None,
        }
    }

    pub fn with_effects(mut self, effects: Vec<(SpecialEffect, f64)>) -> Self {
        self.effects = effects;
        self
    }

    pub fn for_class(mut self, class: ClassId) -> Self {
        self.required_class = Some(class);
        self
    }
}

/// Rarity weights walked in order; they sum to one so every roll lands.
const LOOT_WEIGHTS: [(Rarity, f64); 5] = [
    (Rarity::Common, 0.5),
    (Rarity::Uncommon, 0.28),
    (Rarity::Rare, 0.14),
    (Rarity::Epic, 0.06),
    (Rarity::Legendary, 0.02),
];

pub fn pick_rarity<R: Rng>(rng: &mut R) -> Rarity {
    let mut roll = rng.gen::<f64>();
    for (rarity, chance) in LOOT_WEIGHTS {
        if roll < chance {
            return rarity;
        }
        roll -= chance;
    }
    Rarity::Common
}

fn base_items() -> Vec<Item> {
    vec![
        Item::new(
            "Short Sword",
            Slot::Weapon,
            Rarity::Common,
            ItemStats {
                damage: 8.0,
                ..Default::default()
            },
        ),
        Item::new(
            "Battle Axe",
            Slot::Weapon,
            Rarity::Uncommon,
            ItemStats {
                damage: 12.0,
                ..Default::default()
            },
        ),
        Item::new(
            "Composite Bow",
            Slot::Weapon,
            Rarity::Rare,
            ItemStats {
                damage: 14.0,
                range: 60.0,
                ..Default::default()
            },
        ),
        Item::new(
            "Focusing Staff",
            Slot::Weapon,
            Rarity::Rare,
            ItemStats {
                damage: 16.0,
                mp: 20.0,
                ..Default::default()
            },
        ),
        Item::new(
            "Steel Cuirass",
            Slot::Armor,
            Rarity::Rare,
            ItemStats {
                hp: 60.0,
                armor: 18.0,
                ..Default::default()
            },
        ),
        Item::new(
            "Ring of Strikes",
            Slot::Ring,
            Rarity::Epic,
            ItemStats {
                crit: 0.08,
                ..Default::default()
            },
        ),
        Item::new(
            "Mana Amulet",
            Slot::Amulet,
            Rarity::Uncommon,
            ItemStats {
                mp: 30.0,
                ..Default::default()
            },
        ),
    ]
}

/// Class-keyed legendary weapons carrying special-effect bonuses.
pub fn class_legendary(class: ClassId) -> Item {
    match class {
        ClassId::Ranger => Item::new(
            "Duskhawk Bow",
            Slot::Weapon,
            Rarity::Legendary,
            ItemStats {
                damage: 32.0,
                range: 100.0,
                ..Default::default()
            },
        )
        .with_effects(vec![(SpecialEffect::ExtraProjectiles, 2.0)])
        .for_class(class),
        ClassId::Mage => Item::new(
            "Staff of Astral Whisper",
            Slot::Weapon,
            Rarity::Legendary,
            ItemStats {
                damage: 36.0,
                ..Default::default()
            },
        )
        .with_effects(vec![
            (SpecialEffect::FireballRadius, 30.0),
            (SpecialEffect::FireDamage, 0.25),
        ])
        .for_class(class),
        ClassId::Warrior => Item::new(
            "Legion Blade",
            Slot::Weapon,
            Rarity::Legendary,
            ItemStats {
                damage: 40.0,
                attack_speed: 0.18,
                ..Default::default()
            },
        )
        .with_effects(vec![
            (SpecialEffect::Block, 0.1),
            (SpecialEffect::DamageMult, 0.25),
        ])
        .for_class(class),
        ClassId::Berserker => Item::new(
            "Thunder Cleaver",
            Slot::Weapon,
            Rarity::Legendary,
            ItemStats {
                damage: 48.0,
                attack_speed: 0.15,
                lifesteal: 0.15,
                ..Default::default()
            },
        )
        .with_effects(vec![
            (SpecialEffect::RageDuration, 3.0),
            (SpecialEffect::BossDamage, 0.3),
        ])
        .for_class(class),
        ClassId::Assassin => Item::new(
            "Phantom Blades",
            Slot::Weapon,
            Rarity::Legendary,
            ItemStats {
                damage: 34.0,
                attack_speed: 0.12,
                crit: 0.18,
                ..Default::default()
            },
        )
        .with_effects(vec![
            (SpecialEffect::DashDistance, 60.0),
            (SpecialEffect::DamageMult, 0.2),
        ])
        .for_class(class),
    }
}

/// Rolls a drop for the given class. Legendary rolls resolve to the class
/// legendary; anything else picks among base items at or above the rolled
/// rarity.
pub fn roll_drop<R: Rng>(class: ClassId, rng: &mut R) -> Item {
    let rarity = pick_rarity(rng);
    if rarity == Rarity::Legendary {
        return class_legendary(class);
    }
    let mut pool: Vec<Item> = base_items()
        .into_iter()
        .filter(|item| item.rarity >= rarity)
        .collect();
    if pool.is_empty() {
        return Item::new("Short Sword", Slot::Weapon, Rarity::Common, ItemStats::default());
    }
    let index = rng.gen_range(0..pool.len());
    pool.swap_remove(index)
}
