//! Damage resolution pipeline.
//!
//! Outgoing damage composes, in fixed order: contextual multiplicative
//! modifiers, the selectively-applied generic damage multiplier, the
//! critical-hit roll, and lifesteal. The receiving side mitigates through
//! block and armor (each stage capped and floored independently) and is
//! gated entirely by the invulnerability window.
//!
//! These functions are pure apart from the supplied rng, mirroring the shared
//! combat math used by both the simulation and the headless runner.

use crate::combat::types::{DamageContext, SpecialEffect, SpecialEffects};
use crate::core::constants::*;
use crate::core::state::ActorState;
use crate::player::types::Player;
use rand::Rng;

/// Result of one outgoing damage resolution.
#[derive(Debug, Clone, Copy)]
pub struct AttackOutcome {
    /// Final damage to apply to the target.
    pub damage: f64,
    /// Whether the critical roll succeeded (exposed for hit feedback).
    pub crit: bool,
    /// Healing owed to the attacker from lifesteal.
    pub lifesteal_heal: f64,
}

/// Runs the outgoing damage pipeline.
///
/// `crit_base` and `lifesteal_base` are the actor's stat-sheet values; the
/// accumulated special effects contribute on top of them.
pub fn resolve_outgoing<R: Rng>(
    base_damage: f64,
    crit_base: f64,
    lifesteal_base: f64,
    specials: &SpecialEffects,
    target_is_boss: bool,
    ctx: &DamageContext,
    rng: &mut R,
) -> AttackOutcome {
    let mut damage = base_damage;

    // 1. Contextual multiplicative modifiers.
    if ctx.fire {
        damage *= 1.0 + specials.bonus(SpecialEffect::FireDamage);
    }
    if target_is_boss {
        damage *= 1.0 + specials.bonus(SpecialEffect::BossDamage);
    }

    // 2. Generic damage multiplier, for eligible contexts only.
    if ctx.generic_mult_eligible {
        damage *= 1.0 + specials.bonus(SpecialEffect::DamageMult);
    }

    // 3. Critical roll.
    let mut crit_chance = crit_base + specials.bonus(SpecialEffect::Crit);
    if ctx.is_skill {
        crit_chance += specials.bonus(SpecialEffect::SpellCrit);
    }
    let crit_chance = crit_chance.clamp(0.0, CRIT_CHANCE_CAP);
    let crit = rng.gen::<f64>() < crit_chance;
    if crit {
        damage *= CRIT_MULTIPLIER;
    }

    // 4. Lifesteal, computed from the final damage value.
    let lifesteal = lifesteal_base + specials.bonus(SpecialEffect::Lifesteal);
    let lifesteal_heal = if lifesteal > 0.0 {
        damage * lifesteal
    } else {
        0.0
    };

    AttackOutcome {
        damage,
        crit,
        lifesteal_heal,
    }
}

/// Resolves an attack made by the player and banks the lifesteal healing.
pub fn resolve_player_attack<R: Rng>(
    player: &mut Player,
    base_damage: f64,
    target_is_boss: bool,
    ctx: &DamageContext,
    rng: &mut R,
) -> AttackOutcome {
    let outcome = resolve_outgoing(
        base_damage,
        player.stats.crit,
        player.stats.lifesteal,
        &player.special_effects,
        target_is_boss,
        ctx,
        rng,
    );
    if outcome.lifesteal_heal > 0.0 {
        player.stats.hp = (player.stats.hp + outcome.lifesteal_heal).min(player.stats.max_hp);
    }
    outcome
}

/// Receiving-side mitigation.
///
/// Block and armor are capped independently and each stage floors at 25% of
/// its input, so a single maxed source can never reduce a hit below a quarter
/// of the original damage.
pub fn mitigate(damage: f64, block: f64, armor: f64) -> f64 {
    let block_factor = (1.0 - block.min(BLOCK_CAP)).max(MITIGATION_FLOOR);
    let armor_factor = (1.0 - (armor / ARMOR_DIVISOR).min(ARMOR_CAP)).max(MITIGATION_FLOOR);
    damage * block_factor * armor_factor
}

/// Incoming damage scale for fresh characters; 1.0 from level 4 on.
pub fn low_level_reduction(level: u32) -> f64 {
    for (lvl, scale) in LOW_LEVEL_DAMAGE_SCALE {
        if level == lvl {
            return scale;
        }
    }
    1.0
}

/// Applies already-mitigated damage to the player.
///
/// A running invulnerability window makes the whole call a no-op. A landed
/// hit opens a fresh window so rapid multi-hit frames cost at most one hit.
/// Returns the amount actually applied.
pub fn apply_player_damage(player: &mut Player, amount: f64) -> f64 {
    if player.timers.invulnerability > 0.0 {
        return 0.0;
    }
    player.stats.hp -= amount;
    player.timers.invulnerability = PLAYER_HIT_INVULNERABILITY_MS;
    if player.stats.hp <= 0.0 {
        player.stats.hp = 0.0;
        player.state = ActorState::Death;
    } else {
        player.state = ActorState::Hit;
    }
    amount
}

/// Full incoming chain for a hit on the player: low-level mercy scaling,
/// then block/armor mitigation, then the gated HP subtraction.
pub fn strike_player(player: &mut Player, raw_damage: f64) -> f64 {
    let scaled = raw_damage * low_level_reduction(player.level);
    let mitigated = mitigate(
        scaled,
        player.special_effects.bonus(SpecialEffect::Block),
        player.stats.armor,
    );
    apply_player_damage(player, mitigated)
}
