//! Boss multi-phase state machine and persistent phase abilities.
//!
//! Phase transitions are driven purely by the hp ratio, tested in ascending
//! order. Each phase carries its own applied flag: several thresholds can be
//! crossed in a single large tick and every one of them must fire exactly
//! once, even if the boss later heals back above a threshold.

use crate::combat::types::Owner;
use crate::core::constants::*;
use crate::core::cooldown;
use crate::core::state::{ActorState, SimulationState};
use crate::core::tick::FrameCallbacks;
use crate::effects::{AreaEffect, EffectKind};
use crate::enemies::types::{archetype, BehaviorState, BossAbility, Enemy};
use crate::zones::data::{get_zone, roll_archetype};
use glam::DVec2;
use log::debug;
use rand::Rng;

/// Runs the phase checks and drives unlocked persistent abilities.
pub fn update_boss<C: FrameCallbacks, R: Rng>(
    enemy: &mut Enemy,
    dt: f64,
    state: &mut SimulationState,
    callbacks: &mut C,
    rng: &mut R,
) {
    check_phase_transitions(enemy, callbacks);
    drive_behavior(enemy, dt, state, rng);
}

fn check_phase_transitions<C: FrameCallbacks>(enemy: &mut Enemy, callbacks: &mut C) {
    let ratio = enemy.hp_ratio();
    for index in 0..enemy.phases.len() {
        if enemy.phases_applied[index] {
            continue;
        }
        let phase = enemy.phases[index].clone();
        if ratio > phase.threshold {
            continue;
        }

        enemy.phases_applied[index] = true;
        let phase_number = (index + 1) as u32;
        enemy.phase = enemy.phase.max(phase_number);

        // Permanent in-place multipliers; healing back never undoes them.
        if let Some(mult) = phase.damage_mult {
            enemy.stats.damage *= mult;
        }
        if let Some(mult) = phase.speed_mult {
            enemy.stats.speed *= mult;
        }
        for ability in phase.unlocks {
            enemy.behavior.push(BehaviorState {
                ability,
                timer: None,
            });
        }

        debug!(
            "boss entered phase {} at hp ratio {:.2}",
            phase_number, ratio
        );
        callbacks.on_boss_phase(enemy, phase_number);
    }
}

/// Persistent abilities registered by phases; each keeps its own countdown
/// under `behavior`, driven like any other ability timer.
fn drive_behavior<R: Rng>(
    enemy: &mut Enemy,
    dt: f64,
    state: &mut SimulationState,
    rng: &mut R,
) {
    for index in 0..enemy.behavior.len() {
        let BehaviorState { ability, timer } = enemy.behavior[index];
        let interval = ability.interval_ms();
        let remaining = cooldown::tick(timer, dt, interval);
        enemy.behavior[index].timer = Some(remaining);
        if !cooldown::ready(remaining) {
            continue;
        }

        let fired = match ability {
            BossAbility::SpawnMinions(cfg) => {
                spawn_minions(enemy, cfg.count, state, rng);
                true
            }
            BossAbility::Shockwave(cfg) => {
                state.effects.push(AreaEffect::new(
                    EffectKind::Shockwave,
                    enemy.position,
                    cfg.radius,
                    cfg.delay_ms,
                    enemy.stats.damage * cfg.damage_mult,
                    Owner::Enemy,
                ));
                enemy.state = ActorState::Cast;
                true
            }
            BossAbility::Meteor(cfg) => match state.player.as_ref() {
                Some(player) if !player.is_dead() => {
                    state.effects.push(AreaEffect::new(
                        EffectKind::Meteor,
                        player.position,
                        cfg.radius,
                        cfg.delay_ms,
                        enemy.stats.damage * cfg.damage_mult,
                        Owner::Enemy,
                    ));
                    enemy.state = ActorState::Cast;
                    true
                }
                // Held ready until a target exists again.
                _ => false,
            },
        };
        if fired {
            enemy.behavior[index].timer = Some(interval);
        }
    }
}

/// Pulls reinforcements from the active zone's pool around the boss.
fn spawn_minions<R: Rng>(enemy: &Enemy, count: u32, state: &mut SimulationState, rng: &mut R) {
    let zone = get_zone(state.active_zone);
    for _ in 0..count {
        let archetype_id = roll_archetype(&zone, rng);
        let def = archetype(archetype_id);
        let offset = DVec2::new(
            (rng.gen::<f64>() - 0.5) * 320.0,
            (rng.gen::<f64>() - 0.5) * 320.0,
        );
        let position = (enemy.position + offset).clamp(
            DVec2::ZERO,
            DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        );
        let mut minion = Enemy::from_archetype(&def, zone.scale, position, rng);
        minion.state = ActorState::Spawn;
        minion.spawn_timer_ms = SPAWN_ANIMATION_MS;
        state.enemies.push(minion);
    }
    debug!("boss summoned {} minions", count);
}
