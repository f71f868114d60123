use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of the simulation owns a projectile or area effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Player,
    Enemy,
}

/// Named combat modifiers sourced from equipped items and talents.
///
/// Numeric values are summed additively per key; a key that is absent simply
/// contributes zero. The full set is recomputed from scratch whenever
/// equipment or talents change, so it can never drift from what is worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Additional critical-hit chance (fraction, added to the base chance).
    Crit,
    /// Additional crit chance that only applies to skill casts.
    SpellCrit,
    /// Fraction of dealt damage returned as healing.
    Lifesteal,
    /// Multiplicative bonus to fire-flagged skills.
    FireDamage,
    /// Multiplicative bonus against bosses.
    BossDamage,
    /// Generic damage multiplier; only some attack contexts honor it.
    DamageMult,
    /// Incoming damage blocked (fraction, capped in the mitigation step).
    Block,
    /// Movement speed bonus (fraction of base).
    MoveSpeed,
    /// Flat max HP bonus.
    MaxHp,
    /// Flat max MP bonus.
    MaxMp,
    /// Flat attack range bonus.
    Range,
    /// Extra HP regeneration per second.
    HpRegen,
    /// Extra MP regeneration per second.
    MpRegen,
    /// Additional projectiles on fan-style casts.
    ExtraProjectiles,
    /// Flat bonus to the fireball explosion radius.
    FireballRadius,
    /// Flat bonus to dash/teleport distance.
    DashDistance,
    /// Extra rage duration in seconds.
    RageDuration,
}

/// Accumulated special-effect modifiers, summed additively per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialEffects(BTreeMap<SpecialEffect, f64>);

impl SpecialEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for a key; absent keys read as zero.
    pub fn bonus(&self, key: SpecialEffect) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, key: SpecialEffect, amount: f64) {
        *self.0.entry(key).or_insert(0.0) += amount;
    }

    pub fn merge(&mut self, effects: &[(SpecialEffect, f64)]) {
        for (key, amount) in effects {
            self.add(*key, *amount);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Describes the action that produced a damage roll.
///
/// The generic damage multiplier is applied selectively: skill casts and the
/// dash-stab attack honor it, plain arc/spin/arrow/orb swings do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct DamageContext {
    /// True for skill casts (enables spell crit and fire bonuses).
    pub is_skill: bool,
    /// True when the action is fire-flavored (fireball and friends).
    pub fire: bool,
    /// True when the generic `DamageMult` effect should apply.
    pub generic_mult_eligible: bool,
}

impl DamageContext {
    /// Context for a basic attack. Only the dash-stab attack kind opts into
    /// the generic damage multiplier.
    pub fn basic(generic_mult_eligible: bool) -> Self {
        Self {
            is_skill: false,
            fire: false,
            generic_mult_eligible,
        }
    }

    /// Context for a skill cast; all skills honor the generic multiplier.
    pub fn skill(fire: bool) -> Self {
        Self {
            is_skill: true,
            fire,
            generic_mult_eligible: true,
        }
    }
}
