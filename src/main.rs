//! Headless demo runner: drives a scripted ranger through the ruins until
//! the boss falls or two minutes of simulated time elapse, logging what
//! happened. Run with `RUST_LOG=debug` for the tick-level narrative.

use glam::DVec2;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shards::core::state::LootDrop;
use shards::enemies::logic::spawn_zone_enemies;
use shards::enemies::types::Enemy;
use shards::items::types::Item;
use shards::items::{equip_item, roll_drop};
use shards::player::progression::grant_experience;
use shards::player::types::{talent_catalog, AttackEvent, ClassId, Player, SkillEvent};
use shards::projectiles::Projectile;
use shards::zones::ZoneId;
use shards::{update_frame, FrameCallbacks, SimulationState};

const TICK_MS: f64 = 16.0;
const MAX_TICKS: u32 = 7500; // two minutes of simulated time

#[derive(Default)]
struct DemoCallbacks {
    pending_xp: f64,
    pending_drops: Vec<DVec2>,
    attacks: u64,
    skills: u64,
    shots_taken: u64,
    boss_phase: u32,
}

impl FrameCallbacks for DemoCallbacks {
    fn on_attack(&mut self, _attack: &AttackEvent) {
        self.attacks += 1;
    }

    fn on_skill(&mut self, _skill: &SkillEvent) {
        self.skills += 1;
    }

    fn on_enemy_shoot(&mut self, _enemy: &Enemy, _projectile: &Projectile) {
        self.shots_taken += 1;
    }

    fn on_boss_phase(&mut self, _enemy: &Enemy, phase: u32) {
        info!("boss phase {phase} reached");
        self.boss_phase = self.boss_phase.max(phase);
    }

    fn grant_experience(&mut self, amount: f64) {
        self.pending_xp += amount;
    }

    fn drop_loot(&mut self, enemy: &Enemy) {
        self.pending_drops.push(enemy.position);
    }
}

fn nearest_enemy(state: &SimulationState, from: DVec2) -> Option<DVec2> {
    state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| e.position)
        .min_by(|a, b| {
            a.distance(from)
                .partial_cmp(&b.distance(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Rough single-number item value for the auto-equip pass.
fn gear_score(item: &Item) -> f64 {
    item.stats.damage
        + item.stats.hp * 0.5
        + item.stats.crit * 100.0
        + item.stats.lifesteal * 100.0
        + item.stats.range * 0.1
}

/// Kite: back off when crowded, close in when out of range.
fn drive_input(state: &mut SimulationState) {
    let Some(player) = state.player.as_ref() else {
        return;
    };
    let position = player.position;
    let range = player.stats.range;
    let Some(target) = nearest_enemy(state, position) else {
        state.input.attack = false;
        state.input.skill = false;
        return;
    };
    let delta = target - position;
    let distance = delta.length();
    state.input.pointer = target;
    state.input.attack = true;
    state.input.skill = distance < range;
    let retreat = distance < range * 0.5;
    let dir = if distance > 0.0 { delta / distance } else { DVec2::ZERO };
    state.input.move_dir = if retreat {
        -dir
    } else if distance > range {
        dir
    } else {
        DVec2::ZERO
    };
}

fn main() {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(1337);

    let mut state = SimulationState::new(ZoneId::Ruins);
    let mut player = Player::new(ClassId::Ranger);
    player.position = DVec2::new(2100.0, 1500.0);
    state.player = Some(player);
    spawn_zone_enemies(&mut state, ZoneId::Ruins, 8, &mut rng);
    info!(
        "entering the ruins: {} enemies, boss among them",
        state.enemies.len()
    );

    let mut callbacks = DemoCallbacks::default();
    let mut ticks = 0;
    while ticks < MAX_TICKS {
        ticks += 1;
        drive_input(&mut state);
        update_frame(&mut state, TICK_MS, &mut callbacks, &mut rng);

        // Feed the hooks back into progression and loot between ticks.
        if callbacks.pending_xp > 0.0 {
            if let Some(player) = state.player.as_mut() {
                let levels = grant_experience(player, callbacks.pending_xp);
                for _ in 0..levels {
                    if let Some(node) = talent_catalog(player.class_id)
                        .into_iter()
                        .find(|n| !player.talents.iter().any(|t| t.id == n.id))
                    {
                        player.unlock_talent(node);
                    }
                }
            }
            callbacks.pending_xp = 0.0;
        }
        for position in callbacks.pending_drops.drain(..) {
            let class = match state.player.as_ref() {
                Some(player) => player.class_id,
                None => break,
            };
            state.drops.push(LootDrop::new(position, roll_drop(class, &mut rng)));
        }

        // Wear upgrades only, so gear never swaps back and forth.
        if let Some(player) = state.player.as_mut() {
            let picked: Vec<_> = player.inventory.drain(..).collect();
            for item in picked {
                let worn = player.equipment.get(item.slot).map(gear_score).unwrap_or(0.0);
                if gear_score(&item) > worn {
                    equip_item(player, item);
                } else {
                    player.inventory.push(item);
                }
            }
        }

        let player_dead = state
            .player
            .as_ref()
            .map(|p| p.is_dead())
            .unwrap_or(true);
        let boss_down = !state.enemies.iter().any(|e| e.is_boss);
        if player_dead {
            info!("the ranger falls after {:.1}s", state.stats.time_ms / 1000.0);
            break;
        }
        if boss_down && state.live_enemy_count() == 0 {
            info!("ruins cleared in {:.1}s", state.stats.time_ms / 1000.0);
            break;
        }
    }

    let player = state.player.as_ref();
    info!(
        "run summary: {:.1}s simulated, {} kills, {} drops looted, level {}, boss phase {}, {} attacks, {} skills, {} enemy shots",
        state.stats.time_ms / 1000.0,
        state.stats.kill_count,
        state.stats.loot_count,
        player.map(|p| p.level).unwrap_or(0),
        callbacks.boss_phase,
        callbacks.attacks,
        callbacks.skills,
        callbacks.shots_taken,
    );
}
