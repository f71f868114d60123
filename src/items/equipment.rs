//! Equipment slots and the full-stat recompute.
//!
//! Stats and special effects are never patched incrementally: any equipment
//! or talent change replays class base + level growth + every worn item, so
//! the accumulated values cannot drift from what is actually equipped.

use crate::combat::types::SpecialEffect;
use crate::core::constants::ATTACK_SPEED_FLOOR;
use crate::items::types::{Item, Slot};
use crate::player::types::{base_stats_at_level, Player};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub ring: Option<Item>,
    pub amulet: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: Slot) -> Option<&Item> {
        match slot {
            Slot::Weapon => self.weapon.as_ref(),
            Slot::Armor => self.armor.as_ref(),
            Slot::Ring => self.ring.as_ref(),
            Slot::Amulet => self.amulet.as_ref(),
        }
    }

    /// Replaces the slot content, returning what was worn before.
    pub fn set(&mut self, slot: Slot, item: Option<Item>) -> Option<Item> {
        let target = match slot {
            Slot::Weapon => &mut self.weapon,
            Slot::Armor => &mut self.armor,
            Slot::Ring => &mut self.ring,
            Slot::Amulet => &mut self.amulet,
        };
        std::mem::replace(target, item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        [
            self.weapon.as_ref(),
            self.armor.as_ref(),
            self.ring.as_ref(),
            self.amulet.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Rebuilds the player's stat sheet and special effects from scratch.
pub fn recompute_stats(player: &mut Player) {
    let hp = player.stats.hp;
    let mp = player.stats.mp;
    let mut stats = base_stats_at_level(player.class_id, player.level);

    for item in player.equipment.iter() {
        stats.damage += item.stats.damage;
        stats.max_hp += item.stats.hp;
        stats.max_mp += item.stats.mp;
        stats.crit += item.stats.crit;
        stats.lifesteal += item.stats.lifesteal;
        stats.range += item.stats.range;
        stats.armor += item.stats.armor;
        stats.attack_speed = (stats.attack_speed - item.stats.attack_speed).max(ATTACK_SPEED_FLOOR);
    }

    player.special_effects.clear();
    for item in player.equipment.iter() {
        player.special_effects.merge(&item.effects);
    }
    for talent in &player.talents {
        player.special_effects.merge(&talent.effects);
    }

    stats.max_hp += player.special_effects.bonus(SpecialEffect::MaxHp);
    stats.max_mp += player.special_effects.bonus(SpecialEffect::MaxMp);
    stats.range += player.special_effects.bonus(SpecialEffect::Range);

    stats.hp = hp.min(stats.max_hp);
    stats.mp = mp.min(stats.max_mp);
    player.stats = stats;
}

/// Equips an item, moving any replaced piece to the inventory.
///
/// A class-restricted item that does not fit goes to the inventory instead
/// and the call reports false; malformed gear never fails the caller.
pub fn equip_item(player: &mut Player, item: Item) -> bool {
    if let Some(required) = item.required_class {
        if required != player.class_id {
            player.inventory.push(item);
            return false;
        }
    }
    let slot = item.slot;
    if let Some(previous) = player.equipment.set(slot, Some(item)) {
        player.inventory.push(previous);
    }
    recompute_stats(player);
    true
}

/// Removes the item in `slot` into the inventory and recomputes.
pub fn unequip(player: &mut Player, slot: Slot) {
    if let Some(item) = player.equipment.set(slot, None) {
        player.inventory.push(item);
    }
    recompute_stats(player);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::{class_legendary, ItemStats, Rarity};
    use crate::player::types::ClassId;

    fn sword(damage: f64) -> Item {
        Item::new(
            "Test Sword",
            Slot::Weapon,
            Rarity::Common,
            ItemStats {
                damage,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_equip_adds_stats_and_unequip_restores_base() {
        let mut player = Player::new(ClassId::Warrior);
        let base_damage = player.stats.damage;

        assert!(equip_item(&mut player, sword(8.0)));
        assert_eq!(player.stats.damage, base_damage + 8.0);

        unequip(&mut player, Slot::Weapon);
        assert_eq!(player.stats.damage, base_damage);
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_replacing_weapon_swaps_not_stacks() {
        let mut player = Player::new(ClassId::Warrior);
        let base_damage = player.stats.damage;
        equip_item(&mut player, sword(8.0));
        equip_item(&mut player, sword(12.0));
        assert_eq!(player.stats.damage, base_damage + 12.0);
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_special_effects_replay_from_equipment() {
        let mut player = Player::new(ClassId::Mage);
        equip_item(&mut player, class_legendary(ClassId::Mage));
        assert!(player.special_effects.bonus(SpecialEffect::FireDamage) > 0.0);

        unequip(&mut player, Slot::Weapon);
        assert_eq!(player.special_effects.bonus(SpecialEffect::FireDamage), 0.0);
        assert!(player.special_effects.is_empty());
    }

    #[test]
    fn test_wrong_class_legendary_goes_to_inventory() {
        let mut player = Player::new(ClassId::Warrior);
        let equipped = equip_item(&mut player, class_legendary(ClassId::Mage));
        assert!(!equipped);
        assert!(player.equipment.weapon.is_none());
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_attack_speed_bonus_floors() {
        let mut player = Player::new(ClassId::Assassin);
        let mut blades = sword(5.0);
        blades.stats.attack_speed = 5.0;
        equip_item(&mut player, blades);
        assert_eq!(player.stats.attack_speed, ATTACK_SPEED_FLOOR);
    }

    #[test]
    fn test_hp_capped_when_armor_removed() {
        let mut player = Player::new(ClassId::Warrior);
        let cuirass = Item::new(
            "Cuirass",
            Slot::Armor,
            Rarity::Rare,
            ItemStats {
                hp: 60.0,
                ..Default::default()
            },
        );
        equip_item(&mut player, cuirass);
        player.stats.hp = player.stats.max_hp;
        unequip(&mut player, Slot::Armor);
        assert_eq!(player.stats.hp, player.stats.max_hp);
    }
}
