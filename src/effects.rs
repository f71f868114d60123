//! Delayed area effects: the telegraphed attacks.
//!
//! An effect is inert until its accumulated life reaches the windup delay.
//! The crossing is detected through a `triggered` guard rather than an
//! interval test, so variable tick sizes can never double-fire it. After
//! firing, the effect lingers for a trailing visual lifetime and is pruned.

use crate::combat::logic::strike_player;
use crate::combat::types::Owner;
use crate::core::constants::*;
use crate::core::state::SimulationState;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Visual flavor of a telegraphed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Aoe,
    Meteor,
    Fire,
    Shockwave,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AreaEffect {
    pub kind: EffectKind,
    pub position: DVec2,
    pub radius: f64,
    /// Windup before the damage check may run, milliseconds.
    pub delay_ms: f64,
    pub damage: f64,
    pub owner: Owner,
    /// Accumulated life; starts at zero on the tick the effect is created.
    pub life_ms: f64,
    /// Trailing lifetime after the delay elapses.
    pub ttl_ms: f64,
    /// Flips false -> true exactly once, at the first tick with life >= delay.
    pub triggered: bool,
    pub remove: bool,
}

impl AreaEffect {
    pub fn new(
        kind: EffectKind,
        position: DVec2,
        radius: f64,
        delay_ms: f64,
        damage: f64,
        owner: Owner,
    ) -> Self {
        Self {
            kind,
            position,
            radius,
            delay_ms,
            damage,
            owner,
            life_ms: 0.0,
            ttl_ms: AREA_EFFECT_TTL_MS,
            triggered: false,
            remove: false,
        }
    }
}

/// Advances every delayed effect and fires the ones crossing their delay.
///
/// This is the only place a non-projectile, non-melee source applies damage.
pub fn update_effects(state: &mut SimulationState, dt: f64) {
    let mut effects = std::mem::take(&mut state.effects);
    for effect in effects.iter_mut() {
        effect.life_ms += dt;

        if !effect.triggered && effect.life_ms >= effect.delay_ms {
            effect.triggered = true;
            match effect.owner {
                Owner::Enemy => {
                    if let Some(player) = state.player.as_mut() {
                        if !player.is_dead() {
                            let hit = player.position.distance(effect.position)
                                <= effect.radius + AREA_EFFECT_MARGIN;
                            if hit {
                                strike_player(player, effect.damage);
                            }
                        }
                    }
                }
                Owner::Player => {
                    for enemy in state.enemies.iter_mut() {
                        if enemy.is_alive()
                            && enemy.position.distance(effect.position)
                                <= effect.radius + AREA_EFFECT_MARGIN
                        {
                            crate::enemies::logic::damage_enemy(enemy, effect.damage);
                        }
                    }
                }
            }
        }

        if effect.life_ms >= effect.delay_ms + effect.ttl_ms {
            effect.remove = true;
        }
    }
    effects.retain(|e| !e.remove);
    state.effects = effects;
}
