//! Enemy spawning, steering, attack timing, and death resolution.

use crate::combat::logic::strike_player;
use crate::combat::types::Owner;
use crate::core::constants::*;
use crate::core::state::{ActorState, SimulationState};
use crate::core::tick::{FrameCallbacks, QuestEvent};
use crate::enemies::abilities::{self, AbilityCtx};
use crate::enemies::boss;
use crate::enemies::types::{archetype, AbilityKind, Enemy};
use crate::projectiles::{Projectile, ProjectileKind};
use crate::zones::data::{get_zone, roll_archetype, ZoneScale};
use crate::zones::ZoneId;
use glam::DVec2;
use log::debug;
use rand::Rng;

/// Populates a zone with `count` enemies from its weighted pool, plus the
/// zone boss if one belongs there and none is already roaming.
pub fn spawn_zone_enemies<R: Rng>(
    state: &mut SimulationState,
    zone_id: ZoneId,
    count: u32,
    rng: &mut R,
) {
    let zone = get_zone(zone_id);
    for _ in 0..count {
        let id = roll_archetype(&zone, rng);
        let def = archetype(id);
        let position = zone.rect.random_point(rng);
        state
            .enemies
            .push(Enemy::from_archetype(&def, zone.scale, position, rng));
    }
    if let Some(boss_id) = zone.boss {
        let boss_alive = state.enemies.iter().any(|e| e.is_boss && !e.remove);
        if !boss_alive {
            let def = archetype(boss_id);
            state.enemies.push(Enemy::from_archetype(
                &def,
                zone.scale,
                zone.rect.center(),
                rng,
            ));
        }
    }
}

/// Reduces an enemy's HP. Death side effects are resolved by the enemy
/// update pass, never here, so removal stays deferred.
pub fn damage_enemy(enemy: &mut Enemy, amount: f64) {
    if !enemy.is_alive() {
        return;
    }
    enemy.stats.hp -= amount;
    if enemy.stats.hp > 0.0 {
        enemy.state = ActorState::Hit;
    }
}

/// Advances every enemy: steering, ability timers, attack triggers, boss
/// phases, and death bookkeeping. Removal happens in a single compaction
/// pass at the end.
pub fn update_enemies<C: FrameCallbacks, R: Rng>(
    state: &mut SimulationState,
    dt: f64,
    callbacks: &mut C,
    rng: &mut R,
) {
    if state.player.is_none() {
        return;
    }
    let target = state
        .player
        .as_ref()
        .filter(|p| !p.is_dead())
        .map(|p| p.position);

    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        update_enemy(enemy, target, state, dt, callbacks, rng);
    }
    // Fragments and minions spawned during the pass land in state.enemies.
    enemies.append(&mut state.enemies);
    enemies.retain(|e| !e.remove);
    state.enemies = enemies;
}

fn update_enemy<C: FrameCallbacks, R: Rng>(
    enemy: &mut Enemy,
    target: Option<DVec2>,
    state: &mut SimulationState,
    dt: f64,
    callbacks: &mut C,
    rng: &mut R,
) {
    // A dying enemy only waits out its death animation.
    if enemy.state == ActorState::Death {
        enemy.death_timer_ms -= dt;
        if enemy.death_timer_ms <= 0.0 {
            enemy.remove = true;
        }
        return;
    }

    // Spawn-in window: visible but inert.
    if enemy.spawn_timer_ms > 0.0 {
        enemy.spawn_timer_ms -= dt;
        enemy.state = ActorState::Spawn;
        return;
    }

    if enemy.stats.hp <= 0.0 {
        enter_death(enemy, state, callbacks, rng);
        return;
    }

    let Some(player_position) = target else {
        enemy.velocity = DVec2::ZERO;
        enemy.state = ActorState::Idle;
        return;
    };

    enemy.boost.decay(dt);

    // Band steering: ranged enemies keep their distance, melee always close.
    let delta = player_position - enemy.position;
    let distance = delta.length();
    let direction = if distance > 0.0 {
        delta / distance
    } else {
        DVec2::ZERO
    };
    let speed = enemy.current_speed();
    enemy.velocity = if enemy.ranged && distance < RANGED_FLEE_DISTANCE {
        -direction * speed * RANGED_BAND_FACTOR
    } else {
        direction * speed * APPROACH_BAND_FACTOR
    };
    enemy.position = (enemy.position + enemy.velocity * (dt / 1000.0)).clamp(
        DVec2::ZERO,
        DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
    );
    enemy.state = if enemy.velocity.length() > ENEMY_WALK_ANIMATION_THRESHOLD {
        ActorState::Walk
    } else {
        ActorState::Idle
    };

    // Independent ability timers.
    let ctx = AbilityCtx {
        player_position,
        distance,
        direction,
    };
    abilities::dash(enemy, dt, &ctx);
    abilities::blink(enemy, dt, &ctx, rng);
    abilities::slam(enemy, dt, &ctx, state);
    abilities::inferno(enemy, dt, &ctx, state);
    abilities::regen(enemy, dt);
    abilities::throw(enemy, dt, &ctx, state, callbacks);
    abilities::tick_volley(enemy, dt);

    // Main attack cycle.
    enemy.stats.timer_ms -= dt;
    let in_reach = if enemy.ranged {
        distance < ENEMY_ATTACK_GATE
    } else {
        distance < enemy.reach
    };
    if enemy.stats.timer_ms <= 0.0 && in_reach {
        enemy.stats.timer_ms = enemy.stats.attack_delay * 1000.0;
        enemy.state = ActorState::Attack;
        if enemy.ranged {
            shoot(enemy, direction, state, callbacks);
        } else if let Some(player) = state.player.as_mut() {
            let applied = strike_player(player, enemy.stats.damage);
            callbacks.on_enemy_strike(enemy, applied);
        }
    }

    if enemy.is_boss {
        boss::update_boss(enemy, dt, state, callbacks, rng);
    }
}

/// Ranged attack: a single bolt, or a fan when the volley sub-cooldown has
/// also expired.
fn shoot<C: FrameCallbacks>(
    enemy: &mut Enemy,
    direction: DVec2,
    state: &mut SimulationState,
    callbacks: &mut C,
) {
    let mut fan: Vec<DVec2> = Vec::new();
    if abilities::volley_ready(enemy) {
        if let Some(cfg) = enemy.abilities.volley() {
            let spread = cfg.spread_deg.to_radians();
            let base = direction.y.atan2(direction.x);
            let count = cfg.projectiles.max(1);
            for i in 0..count {
                let offset = (i as f64 - (count as f64 - 1.0) / 2.0) * spread;
                let angle = base + offset;
                fan.push(DVec2::new(angle.cos(), angle.sin()));
            }
            enemy.reset_ability_timer(AbilityKind::Volley, cfg.cooldown_ms);
        }
    }
    if fan.is_empty() {
        fan.push(direction);
    }

    for dir in fan {
        let projectile = Projectile::new(
            ProjectileKind::Bolt,
            enemy.position,
            dir * ENEMY_BOLT_SPEED,
            enemy.stats.damage,
            Owner::Enemy,
            8.0,
            ENEMY_BOLT_MAX_TRAVEL,
        )
        .from_enemy(enemy.id);
        callbacks.on_enemy_shoot(enemy, &projectile);
        state.projectiles.push(projectile);
    }
}

/// Transition into the death state: hooks fire, fragments spawn, and the
/// corpse lingers for the death animation before the compaction pass drops
/// it. Pending ability timers die with the entity.
fn enter_death<C: FrameCallbacks, R: Rng>(
    enemy: &mut Enemy,
    state: &mut SimulationState,
    callbacks: &mut C,
    rng: &mut R,
) {
    enemy.stats.hp = 0.0;
    enemy.state = ActorState::Death;
    enemy.death_timer_ms = DEATH_ANIMATION_MS;
    enemy.velocity = DVec2::ZERO;
    state.stats.kill_count += 1;

    callbacks.grant_experience(enemy.xp);
    callbacks.drop_loot(enemy);
    callbacks.update_quest(QuestEvent::Kill, enemy.archetype.as_str(), 1);
    if enemy.is_boss {
        callbacks.update_quest(QuestEvent::Boss, enemy.archetype.as_str(), 1);
    }
    debug!("{} died at {:.0},{:.0}", enemy.archetype.as_str(), enemy.position.x, enemy.position.y);

    if let Some(cfg) = enemy.abilities.split() {
        let def = archetype(cfg.fragment);
        let fragment_hp = (enemy.stats.max_hp * cfg.scale).max(SPLIT_MIN_FRAGMENT_HP);
        for _ in 0..cfg.pieces {
            let offset = DVec2::new(
                (rng.gen::<f64>() - 0.5) * 120.0,
                (rng.gen::<f64>() - 0.5) * 120.0,
            );
            let position = (enemy.position + offset).clamp(
                DVec2::ZERO,
                DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            );
            let mut fragment = Enemy::from_archetype(
                &def,
                ZoneScale {
                    hp: 1.0,
                    damage: 1.0,
                    xp: enemy.zone_xp_scale,
                },
                position,
                rng,
            );
            fragment.stats.hp = fragment_hp;
            fragment.stats.max_hp = fragment_hp;
            // Fragments never chain-split.
            fragment.abilities.remove(AbilityKind::Split);
            fragment.state = ActorState::Spawn;
            fragment.spawn_timer_ms = SPAWN_ANIMATION_MS;
            state.enemies.push(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tick::NullCallbacks;
    use crate::enemies::types::ArchetypeId;
    use crate::player::types::{ClassId, Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn neutral_scale() -> ZoneScale {
        ZoneScale {
            hp: 1.0,
            damage: 1.0,
            xp: 1.0,
        }
    }

    fn state_with_player_at(position: DVec2) -> SimulationState {
        let mut state = SimulationState::new(ZoneId::Forest);
        let mut player = Player::new(ClassId::Warrior);
        player.position = position;
        state.player = Some(player);
        state
    }

    fn make(archetype_id: ArchetypeId, position: DVec2) -> Enemy {
        let mut rng = test_rng();
        Enemy::from_archetype(&archetype(archetype_id), neutral_scale(), position, &mut rng)
    }

    #[test]
    fn test_spawn_zone_enemies_respects_pool_and_boss() {
        let mut state = SimulationState::new(ZoneId::Ruins);
        let mut rng = test_rng();
        spawn_zone_enemies(&mut state, ZoneId::Ruins, 8, &mut rng);
        assert_eq!(state.enemies.len(), 9);
        let bosses = state.enemies.iter().filter(|e| e.is_boss).count();
        assert_eq!(bosses, 1);

        // A second wave never duplicates the boss.
        spawn_zone_enemies(&mut state, ZoneId::Ruins, 4, &mut rng);
        let bosses = state.enemies.iter().filter(|e| e.is_boss).count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn test_melee_approaches_and_ranged_flees() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let brute = make(ArchetypeId::Brute, DVec2::new(1200.0, 1000.0));
        let mut archer = make(ArchetypeId::Archer, DVec2::new(1100.0, 1000.0));
        archer.abilities.remove(AbilityKind::Volley);
        state.enemies.push(brute);
        state.enemies.push(archer);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);

        // Brute closed in, archer backed off (distance 100 < flee band 260).
        assert!(state.enemies[0].position.x < 1200.0);
        assert!(state.enemies[1].position.x > 1100.0);
        assert_eq!(state.enemies[0].state, ActorState::Walk);
    }

    #[test]
    fn test_attack_timer_fires_and_resets() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut brute = make(ArchetypeId::Brute, DVec2::new(1010.0, 1000.0));
        brute.stats.timer_ms = 50.0;
        // Strip abilities so only the plain strike runs.
        brute.abilities.remove(AbilityKind::Dash);
        brute.abilities.remove(AbilityKind::Throw);
        state.enemies.push(brute);

        let hp = state.player.as_ref().unwrap().stats.hp;
        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);

        assert!(state.player.as_ref().unwrap().stats.hp < hp);
        assert_eq!(state.enemies[0].state, ActorState::Attack);
        // Timer re-armed to the archetype's attack delay.
        assert!(state.enemies[0].stats.timer_ms > 1000.0);
    }

    #[test]
    fn test_dead_enemy_lingers_then_compacts() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut brute = make(ArchetypeId::Brute, DVec2::new(1500.0, 1000.0));
        brute.stats.hp = 0.0;
        state.enemies.push(brute);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.enemies[0].state, ActorState::Death);
        assert_eq!(state.stats.kill_count, 1);

        // Death animation runs its fixed duration, then the corpse is gone.
        for _ in 0..6 {
            update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        }
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_death_is_terminal_no_movement_or_attacks() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut brute = make(ArchetypeId::Brute, DVec2::new(1010.0, 1000.0));
        brute.stats.hp = 0.0;
        state.enemies.push(brute);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        let position = state.enemies[0].position;
        let hp = state.player.as_ref().unwrap().stats.hp;
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.enemies[0].position, position);
        assert_eq!(state.player.as_ref().unwrap().stats.hp, hp);
    }

    #[test]
    fn test_split_spawns_capped_fragments_without_split() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut shaman = make(ArchetypeId::Shaman, DVec2::new(1500.0, 1000.0));
        assert_eq!(shaman.stats.max_hp, 90.0);
        shaman.stats.hp = 0.0;
        state.enemies.push(shaman);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);

        let fragments: Vec<&Enemy> = state
            .enemies
            .iter()
            .filter(|e| e.archetype == ArchetypeId::Wisp)
            .collect();
        assert_eq!(fragments.len(), 2);
        for fragment in fragments {
            assert_eq!(fragment.stats.max_hp, 45.0);
            assert_eq!(fragment.stats.hp, 45.0);
            assert!(fragment.abilities.split().is_none());
            assert_eq!(fragment.state, ActorState::Spawn);
        }
    }

    #[test]
    fn test_split_floor_applies_to_tiny_parents() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut shaman = make(ArchetypeId::Shaman, DVec2::new(1500.0, 1000.0));
        shaman.stats.max_hp = 10.0;
        shaman.stats.hp = 0.0;
        state.enemies.push(shaman);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        for fragment in state.enemies.iter().filter(|e| e.archetype == ArchetypeId::Wisp) {
            assert_eq!(fragment.stats.max_hp, SPLIT_MIN_FRAGMENT_HP);
        }
    }

    #[test]
    fn test_no_player_means_no_enemy_update() {
        let mut state = SimulationState::new(ZoneId::Forest);
        state.enemies.push(make(ArchetypeId::Brute, DVec2::new(500.0, 500.0)));
        let timer_before = state.enemies[0].stats.timer_ms;
        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.enemies[0].position, DVec2::new(500.0, 500.0));
        assert_eq!(state.enemies[0].stats.timer_ms, timer_before);
    }

    #[test]
    fn test_volley_fires_fan_on_attack() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut archer = make(ArchetypeId::Archer, DVec2::new(1150.0, 1000.0));
        archer.stats.timer_ms = 50.0;
        // Force the sub-cooldown to ready.
        archer.reset_ability_timer(AbilityKind::Volley, 0.0);
        state.enemies.push(archer);

        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.projectiles.len(), 3);
        // Sub-cooldown consumed: the next attack is a single bolt.
        let enemy = &state.enemies[0];
        assert!(!abilities::volley_ready(enemy));
    }

    #[test]
    fn test_spawn_window_blocks_actions() {
        let mut state = state_with_player_at(DVec2::new(1000.0, 1000.0));
        let mut wisp = make(ArchetypeId::Wisp, DVec2::new(1010.0, 1000.0));
        wisp.state = ActorState::Spawn;
        wisp.spawn_timer_ms = SPAWN_ANIMATION_MS;
        wisp.stats.timer_ms = 0.0;
        state.enemies.push(wisp);

        let hp = state.player.as_ref().unwrap().stats.hp;
        let mut rng = test_rng();
        update_enemies(&mut state, 100.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.player.as_ref().unwrap().stats.hp, hp);
        assert_eq!(state.enemies[0].state, ActorState::Spawn);
    }
}
