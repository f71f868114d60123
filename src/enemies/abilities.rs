//! Per-enemy ability functions.
//!
//! Every ability is an independent function over `(enemy, config, dt,
//! context)` sharing the countdown pattern against `ability_timers`. A
//! timer that expires while its gate condition fails stays expired and the
//! ability fires on the first tick the condition holds; only an actual
//! firing resets the countdown.

use crate::combat::types::Owner;
use crate::core::constants::*;
use crate::core::cooldown;
use crate::core::state::SimulationState;
use crate::core::tick::FrameCallbacks;
use crate::effects::{AreaEffect, EffectKind};
use crate::enemies::types::{AbilityKind, Enemy, SpeedBoost};
use crate::projectiles::{Projectile, ProjectileKind};
use glam::DVec2;
use rand::Rng;

/// Spatial context shared by the ability functions for one enemy tick.
#[derive(Debug, Clone, Copy)]
pub struct AbilityCtx {
    pub player_position: DVec2,
    pub distance: f64,
    /// Unit vector from the enemy toward the player.
    pub direction: DVec2,
}

/// Burst of speed toward the player when inside the trigger band. The boost
/// decays linearly back to 1 instead of snapping off, which produces the
/// charge-then-settle motion profile.
pub fn dash(enemy: &mut Enemy, dt: f64, ctx: &AbilityCtx) {
    let Some(cfg) = enemy.abilities.dash() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Dash, dt, cfg.cooldown_ms);
    if cooldown::ready(remaining)
        && ctx.distance >= cfg.min_range
        && ctx.distance <= cfg.max_range
    {
        enemy.boost = SpeedBoost::start(cfg.boost, cfg.boost_decay_ms);
        enemy.reset_ability_timer(AbilityKind::Dash, cfg.cooldown_ms);
    }
}

/// Teleport to a random point on a ring around the player when too far away.
/// Deals no damage.
pub fn blink<R: Rng>(enemy: &mut Enemy, dt: f64, ctx: &AbilityCtx, rng: &mut R) {
    let Some(cfg) = enemy.abilities.blink() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Blink, dt, cfg.cooldown_ms);
    if cooldown::ready(remaining) && ctx.distance > cfg.trigger_range {
        let angle = rng.gen::<f64>() * std::f64::consts::TAU;
        let offset = DVec2::new(angle.cos(), angle.sin()) * cfg.ring_radius;
        enemy.position = (ctx.player_position + offset).clamp(
            DVec2::ZERO,
            DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        );
        enemy.reset_ability_timer(AbilityKind::Blink, cfg.cooldown_ms);
    }
}

/// Telegraphed ground strike centered on the enemy. The ability itself never
/// applies damage; it only enqueues the delayed effect.
pub fn slam(enemy: &mut Enemy, dt: f64, ctx: &AbilityCtx, state: &mut SimulationState) {
    let Some(cfg) = enemy.abilities.slam() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Slam, dt, cfg.cooldown_ms);
    if cooldown::ready(remaining) && ctx.distance <= cfg.radius + AREA_EFFECT_MARGIN {
        state.effects.push(AreaEffect::new(
            EffectKind::Aoe,
            enemy.position,
            cfg.radius,
            cfg.delay_ms,
            enemy.stats.damage * cfg.damage_mult,
            Owner::Enemy,
        ));
        enemy.state = crate::core::state::ActorState::Cast;
        enemy.reset_ability_timer(AbilityKind::Slam, cfg.cooldown_ms);
    }
}

/// Telegraphed burst at the player's current position; dodged by moving
/// during the windup.
pub fn inferno(enemy: &mut Enemy, dt: f64, ctx: &AbilityCtx, state: &mut SimulationState) {
    let Some(cfg) = enemy.abilities.inferno() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Inferno, dt, cfg.cooldown_ms);
    if cooldown::ready(remaining) && ctx.distance <= cfg.radius + AREA_EFFECT_MARGIN {
        state.effects.push(AreaEffect::new(
            EffectKind::Fire,
            ctx.player_position,
            cfg.radius,
            cfg.delay_ms,
            enemy.stats.damage * cfg.damage_mult,
            Owner::Enemy,
        ));
        enemy.state = crate::core::state::ActorState::Cast;
        enemy.reset_ability_timer(AbilityKind::Inferno, cfg.cooldown_ms);
    }
}

/// Keeps the volley sub-cooldown ticking between attacks. The fan itself is
/// emitted from the normal attack trigger when this slot reads ready.
pub fn tick_volley(enemy: &mut Enemy, dt: f64) {
    let Some(cfg) = enemy.abilities.volley() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Volley, dt, cfg.cooldown_ms);
    // Hold at ready; the attack trigger consumes and resets it.
    if remaining < 0.0 {
        enemy.reset_ability_timer(AbilityKind::Volley, 0.0);
    }
}

/// True when the next ranged attack should fan out instead of firing once.
pub fn volley_ready(enemy: &Enemy) -> bool {
    enemy.abilities.volley().is_some()
        && enemy
            .ability_timers
            .get(&AbilityKind::Volley)
            .copied()
            .is_some_and(cooldown::ready)
}

/// Restores a fixed amount of HP on a fixed interval, unconditionally.
pub fn regen(enemy: &mut Enemy, dt: f64) {
    let Some(cfg) = enemy.abilities.regen() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Regen, dt, cfg.interval_ms);
    if cooldown::ready(remaining) {
        enemy.stats.hp = (enemy.stats.hp + cfg.amount).min(enemy.stats.max_hp);
        enemy.reset_ability_timer(AbilityKind::Regen, cfg.interval_ms);
    }
}

/// Lobs a slow heavy projectile from a mid-range band.
pub fn throw<C: FrameCallbacks>(
    enemy: &mut Enemy,
    dt: f64,
    ctx: &AbilityCtx,
    state: &mut SimulationState,
    callbacks: &mut C,
) {
    let Some(cfg) = enemy.abilities.throw() else {
        return;
    };
    let remaining = enemy.tick_ability_timer(AbilityKind::Throw, dt, cfg.cooldown_ms);
    if cooldown::ready(remaining)
        && ctx.distance >= cfg.min_range
        && ctx.distance <= cfg.max_range
    {
        let projectile = Projectile::new(
            ProjectileKind::Rock,
            enemy.position,
            ctx.direction * cfg.speed,
            enemy.stats.damage * cfg.damage_mult,
            Owner::Enemy,
            cfg.radius,
            ENEMY_BOLT_MAX_TRAVEL,
        )
        .from_enemy(enemy.id);
        callbacks.on_enemy_shoot(enemy, &projectile);
        state.projectiles.push(projectile);
        enemy.state = crate::core::state::ActorState::Attack;
        enemy.reset_ability_timer(AbilityKind::Throw, cfg.cooldown_ms);
    }
}
