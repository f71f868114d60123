//! The frame orchestrator: the single entry point driven once per external
//! tick.
//!
//! Phase order is fixed and load-bearing: player, then projectiles, then
//! delayed effects, then enemies, then pickups. Enemy updates may enqueue
//! new delayed effects; running the effect phase first guarantees a
//! freshly-created effect (life 0) never evaluates its trigger on the tick
//! that created it. Each phase compacts its own removals at the end, never
//! mid-iteration.

use crate::core::constants::{INVENTORY_CAPACITY, PICKUP_RADIUS};
use crate::core::state::SimulationState;
use crate::effects;
use crate::enemies;
use crate::enemies::types::Enemy;
use crate::player;
use crate::player::types::{AttackEvent, SkillEvent};
use crate::projectiles;
use crate::projectiles::Projectile;
use rand::Rng;

/// Quest-relevant occurrences reported through `update_quest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestEvent {
    Kill,
    Boss,
    Loot,
    Discover,
}

/// Presentation and progression hooks, invoked synchronously in-tick.
///
/// The core never inspects results; every method defaults to a no-op so
/// embedders implement only what they care about.
pub trait FrameCallbacks {
    fn on_attack(&mut self, _attack: &AttackEvent) {}
    fn on_skill(&mut self, _skill: &SkillEvent) {}
    fn on_enemy_shoot(&mut self, _enemy: &Enemy, _projectile: &Projectile) {}
    fn on_enemy_strike(&mut self, _enemy: &Enemy, _damage: f64) {}
    fn on_boss_phase(&mut self, _enemy: &Enemy, _phase: u32) {}
    fn grant_experience(&mut self, _amount: f64) {}
    fn drop_loot(&mut self, _enemy: &Enemy) {}
    fn update_quest(&mut self, _event: QuestEvent, _target: &str, _amount: u32) {}
}

/// Callbacks that ignore everything; handy default for tests and tools.
pub struct NullCallbacks;

impl FrameCallbacks for NullCallbacks {}

/// Advances the whole simulation by `dt` milliseconds.
///
/// The caller owns the clock; all countdowns subtract exactly the supplied
/// delta, so irregular tick cadences still accumulate correct timing.
pub fn update_frame<C: FrameCallbacks, R: Rng>(
    state: &mut SimulationState,
    dt: f64,
    callbacks: &mut C,
    rng: &mut R,
) {
    player::logic::update_player(state, dt, callbacks, rng);
    projectiles::update_projectiles(state, dt, callbacks);
    effects::update_effects(state, dt);
    enemies::logic::update_enemies(state, dt, callbacks, rng);
    resolve_pickups(state, callbacks);
    state.stats.time_ms += dt;
}

/// Ground drops within reach move into the inventory; a full bag leaves the
/// drop where it lies.
fn resolve_pickups<C: FrameCallbacks>(state: &mut SimulationState, callbacks: &mut C) {
    let Some(mut player) = state.player.take() else {
        return;
    };
    if !player.is_dead() {
        let mut picked = 0;
        state.drops.retain(|drop| {
            let close = player.position.distance(drop.position) <= PICKUP_RADIUS;
            if close && player.inventory.len() < INVENTORY_CAPACITY {
                player.inventory.push(drop.item.clone());
                callbacks.update_quest(QuestEvent::Loot, &drop.item.name, 1);
                picked += 1;
                false
            } else {
                true
            }
        });
        state.stats.loot_count += picked;
    }
    state.player = Some(player);
}
