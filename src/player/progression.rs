//! Experience and leveling.
//!
//! The core itself only reports XP through the `grant_experience` hook; the
//! embedding layer decides when to feed it back in here, typically right
//! after the frame update.

use crate::core::constants::{XP_CURVE_BASE, XP_CURVE_PER_LEVEL};
use crate::items::equipment::recompute_stats;
use crate::player::types::Player;
use log::debug;

/// XP required to clear the given level.
pub fn xp_for_level(level: u32) -> f64 {
    XP_CURVE_BASE + level as f64 * XP_CURVE_PER_LEVEL
}

/// Adds experience and resolves any level-ups. Each level refills HP/MP,
/// applies class growth, and awards one talent point. Returns the number of
/// levels gained (large XP grants can cascade).
pub fn grant_experience(player: &mut Player, amount: f64) -> u32 {
    player.xp += amount;
    let mut gained = 0;
    while player.xp >= player.xp_to_next {
        player.xp -= player.xp_to_next;
        player.level += 1;
        player.xp_to_next = xp_for_level(player.level);
        player.talent_points += 1;
        gained += 1;
        recompute_stats(player);
        player.stats.hp = player.stats.max_hp;
        player.stats.mp = player.stats.max_mp;
        debug!("level up: now {}", player.level);
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::types::{ClassId, Player};

    #[test]
    fn test_xp_curve_matches_first_levels() {
        assert_eq!(xp_for_level(1), 260.0);
        assert_eq!(xp_for_level(2), 400.0);
    }

    #[test]
    fn test_level_up_applies_growth_and_refills() {
        let mut player = Player::new(ClassId::Warrior);
        player.stats.hp = 10.0;
        let gained = grant_experience(&mut player, 300.0);
        assert_eq!(gained, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.stats.max_hp, 130.0 + 24.0);
        assert_eq!(player.stats.hp, player.stats.max_hp);
        assert_eq!(player.talent_points, 1);
        assert!((player.xp - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_grant_cascades_levels() {
        let mut player = Player::new(ClassId::Mage);
        let gained = grant_experience(&mut player, 1500.0);
        assert!(gained >= 2);
        assert_eq!(player.level, 1 + gained);
    }

    #[test]
    fn test_small_grant_accumulates() {
        let mut player = Player::new(ClassId::Ranger);
        assert_eq!(grant_experience(&mut player, 100.0), 0);
        assert_eq!(player.level, 1);
        assert_eq!(player.xp, 100.0);
    }
}
