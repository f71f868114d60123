//! Player movement, regeneration, and attack/skill triggering.

use crate::combat::logic::resolve_player_attack;
use crate::combat::types::{DamageContext, Owner, SpecialEffect};
use crate::core::constants::*;
use crate::core::state::{ActorState, SimulationState};
use crate::core::tick::FrameCallbacks;
use crate::enemies::logic::damage_enemy;
use crate::player::types::{class_def, skill_def, AttackEvent, AttackKind, Player, SkillEvent, SkillKind};
use crate::projectiles::{Projectile, ProjectileKind};
use glam::DVec2;
use rand::Rng;

/// Advances the player one tick. A missing player is a quiet no-op; a dead
/// player stays down and ignores input.
pub fn update_player<C: FrameCallbacks, R: Rng>(
    state: &mut SimulationState,
    dt: f64,
    callbacks: &mut C,
    rng: &mut R,
) {
    let Some(mut player) = state.player.take() else {
        return;
    };
    if player.is_dead() {
        state.player = Some(player);
        return;
    }
    let input = state.input;

    // Acceleration toward the pressed direction, friction, speed clamp.
    // Axes accelerate independently; diagonals are faster on purpose.
    let speed_cap = player.effective_move_speed();
    let accel = PLAYER_ACCEL_PER_MS * speed_cap;
    if input.move_dir.x != 0.0 {
        player.velocity.x += input.move_dir.x * accel * dt;
    }
    if input.move_dir.y != 0.0 {
        player.velocity.y += input.move_dir.y * accel * dt;
    }
    player.velocity *= FRICTION;
    player.velocity = player.velocity.clamp_length_max(speed_cap);
    player.position = (player.position + player.velocity * dt * PLAYER_POSITION_SCALE).clamp(
        DVec2::ZERO,
        DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
    );
    player.state = if player.velocity.length() > 0.1 {
        ActorState::Walk
    } else {
        ActorState::Idle
    };

    // Facing always tracks the pointer, never smoothed.
    let aim = input.pointer - player.position;
    player.facing = aim.y.atan2(aim.x);

    // Countdown timers.
    if player.timers.attack_cooldown > 0.0 {
        player.timers.attack_cooldown -= dt;
    }
    if player.timers.skill_cooldown > 0.0 {
        player.timers.skill_cooldown -= dt;
    }
    if player.timers.invulnerability > 0.0 {
        player.timers.invulnerability -= dt;
    }
    if player.buffs.rage_ms > 0.0 {
        player.buffs.rage_ms -= dt;
    }

    // Passive regeneration.
    let hp_regen = HP_REGEN_PER_SECOND + player.special_effects.bonus(SpecialEffect::HpRegen);
    let mp_regen = MP_REGEN_PER_SECOND + player.special_effects.bonus(SpecialEffect::MpRegen);
    player.stats.hp = (player.stats.hp + hp_regen * dt / 1000.0).min(player.stats.max_hp);
    player.stats.mp = (player.stats.mp + mp_regen * dt / 1000.0).min(player.stats.max_mp);

    if input.attack && player.timers.attack_cooldown <= 0.0 {
        perform_attack(&mut player, state, callbacks, rng);
        player.timers.attack_cooldown = player.stats.attack_speed * 1000.0;
        player.state = ActorState::Attack;
    }

    if input.skill && player.timers.skill_cooldown <= 0.0 {
        let kind = class_def(player.class_id).skill;
        if perform_skill(&mut player, kind, state, callbacks, rng) {
            player.timers.skill_cooldown = skill_def(kind).cooldown_ms;
            player.state = ActorState::Cast;
        }
    }

    state.player = Some(player);
}

fn facing_vector(player: &Player) -> DVec2 {
    DVec2::new(player.facing.cos(), player.facing.sin())
}

fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Hits every living enemy inside `radius`, optionally limited to a facing
/// arc, resolving the pipeline per target.
fn melee_hit<R: Rng>(
    player: &mut Player,
    state: &mut SimulationState,
    base_damage: f64,
    radius: f64,
    half_angle: Option<f64>,
    ctx: DamageContext,
    rng: &mut R,
) {
    for enemy in state.enemies.iter_mut() {
        if !enemy.is_alive() {
            continue;
        }
        let delta = enemy.position - player.position;
        if delta.length() > radius {
            continue;
        }
        if let Some(half) = half_angle {
            let angle = delta.y.atan2(delta.x);
            if normalize_angle(angle - player.facing).abs() > half {
                continue;
            }
        }
        let outcome = resolve_player_attack(player, base_damage, enemy.is_boss, &ctx, rng);
        damage_enemy(enemy, outcome.damage);
    }
}

fn spawn_player_projectile<R: Rng>(
    player: &mut Player,
    state: &mut SimulationState,
    kind: ProjectileKind,
    direction: DVec2,
    speed: f64,
    base_damage: f64,
    max_travel: f64,
    explosion: Option<f64>,
    ctx: DamageContext,
    rng: &mut R,
) {
    // The target is unknown at fire time, so boss bonuses cannot apply to
    // projectiles; the roll happens here and travels with the shot.
    let outcome = resolve_player_attack(player, base_damage, false, &ctx, rng);
    let mut projectile = Projectile::new(
        kind,
        player.position,
        direction * speed,
        outcome.damage,
        Owner::Player,
        if kind == ProjectileKind::Fireball {
            22.0
        } else {
            PROJECTILE_HIT_RADIUS
        },
        max_travel,
    );
    if let Some(radius) = explosion {
        projectile = projectile.with_explosion(radius);
    }
    state.projectiles.push(projectile);
}

fn perform_attack<C: FrameCallbacks, R: Rng>(
    player: &mut Player,
    state: &mut SimulationState,
    callbacks: &mut C,
    rng: &mut R,
) {
    let class = class_def(player.class_id);
    let base = player.effective_damage();
    let dir = facing_vector(player);

    match class.attack {
        AttackKind::Arc => {
            melee_hit(
                player,
                state,
                base,
                player.stats.range,
                Some(ARC_HALF_ANGLE),
                DamageContext::basic(false),
                rng,
            );
        }
        AttackKind::Spin => {
            melee_hit(
                player,
                state,
                base,
                player.stats.range,
                None,
                DamageContext::basic(false),
                rng,
            );
        }
        AttackKind::Arrow { speed } => {
            spawn_player_projectile(
                player,
                state,
                ProjectileKind::Arrow,
                dir,
                speed,
                base,
                ARROW_MAX_TRAVEL,
                None,
                DamageContext::basic(false),
                rng,
            );
        }
        AttackKind::Orb { speed } => {
            spawn_player_projectile(
                player,
                state,
                ProjectileKind::Orb,
                dir,
                speed,
                base,
                ORB_MAX_TRAVEL,
                None,
                DamageContext::basic(false),
                rng,
            );
        }
        AttackKind::DashStab { distance } => {
            let reach = distance + player.special_effects.bonus(SpecialEffect::DashDistance);
            player.position = (player.position + dir * reach).clamp(
                DVec2::ZERO,
                DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            );
            // The stab is the one basic attack that honors the generic
            // damage multiplier.
            melee_hit(
                player,
                state,
                base,
                DASH_STAB_HIT_RADIUS,
                None,
                DamageContext::basic(true),
                rng,
            );
        }
    }

    callbacks.on_attack(&AttackEvent {
        kind: class.attack,
        origin: player.position,
        facing: player.facing,
    });
}

/// Attempts a skill cast. Insufficient mana is a quiet refusal that leaves
/// the cooldown untouched.
fn perform_skill<C: FrameCallbacks, R: Rng>(
    player: &mut Player,
    kind: SkillKind,
    state: &mut SimulationState,
    callbacks: &mut C,
    rng: &mut R,
) -> bool {
    let def = skill_def(kind);
    if player.stats.mp < def.mp_cost {
        return false;
    }
    player.stats.mp -= def.mp_cost;
    let base = player.effective_damage();
    let dir = facing_vector(player);

    match kind {
        SkillKind::PowerStrike => {
            melee_hit(
                player,
                state,
                base * POWER_STRIKE_DAMAGE_FACTOR,
                POWER_STRIKE_ARC,
                Some(std::f64::consts::FRAC_PI_3),
                DamageContext::skill(false),
                rng,
            );
        }
        SkillKind::MultiShot => {
            let extra = player.special_effects.bonus(SpecialEffect::ExtraProjectiles) as u32;
            let count = MULTI_SHOT_PROJECTILES + extra;
            let spread = MULTI_SHOT_SPREAD_DEG.to_radians();
            for i in 0..count {
                let offset = (i as f64 - (count as f64 - 1.0) / 2.0) * spread;
                let angle = player.facing + offset;
                spawn_player_projectile(
                    player,
                    state,
                    ProjectileKind::Arrow,
                    DVec2::new(angle.cos(), angle.sin()),
                    ARROW_SPEED,
                    base * MULTI_SHOT_DAMAGE_FACTOR,
                    ARROW_MAX_TRAVEL,
                    None,
                    DamageContext::skill(false),
                    rng,
                );
            }
        }
        SkillKind::Fireball => {
            let explosion = FIREBALL_EXPLOSION_RADIUS
                + player.special_effects.bonus(SpecialEffect::FireballRadius);
            spawn_player_projectile(
                player,
                state,
                ProjectileKind::Fireball,
                dir,
                FIREBALL_SPEED,
                base * FIREBALL_DAMAGE_FACTOR,
                FIREBALL_MAX_TRAVEL,
                Some(explosion),
                DamageContext::skill(true),
                rng,
            );
        }
        SkillKind::Rage => {
            let bonus_seconds = player.special_effects.bonus(SpecialEffect::RageDuration);
            player.buffs.rage_ms = RAGE_BASE_DURATION_MS + bonus_seconds * 1000.0;
        }
        SkillKind::ShadowStep => {
            let reach =
                SHADOW_STEP_DISTANCE + player.special_effects.bonus(SpecialEffect::DashDistance);
            player.position = (player.position + dir * reach).clamp(
                DVec2::ZERO,
                DVec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            );
            player.timers.invulnerability = player
                .timers
                .invulnerability
                .max(SHADOW_STEP_INVULNERABILITY_MS);
            melee_hit(
                player,
                state,
                base * SHADOW_STEP_DAMAGE_FACTOR,
                SHADOW_STEP_HIT_RADIUS,
                None,
                DamageContext::skill(false),
                rng,
            );
        }
    }

    callbacks.on_skill(&SkillEvent {
        kind,
        origin: player.position,
        facing: player.facing,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tick::NullCallbacks;
    use crate::enemies::types::{archetype, ArchetypeId, Enemy};
    use crate::player::types::ClassId;
    use crate::zones::data::ZoneScale;
    use crate::zones::ZoneId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn state_with(class: ClassId) -> SimulationState {
        let mut state = SimulationState::new(ZoneId::Forest);
        let mut player = Player::new(class);
        player.position = DVec2::new(1000.0, 1000.0);
        state.player = Some(player);
        state
    }

    fn add_enemy(state: &mut SimulationState, position: DVec2) {
        let mut rng = test_rng();
        state.enemies.push(Enemy::from_archetype(
            &archetype(ArchetypeId::Brute),
            ZoneScale {
                hp: 1.0,
                damage: 1.0,
                xp: 1.0,
            },
            position,
            &mut rng,
        ));
    }

    #[test]
    fn test_missing_player_is_a_noop() {
        let mut state = SimulationState::new(ZoneId::Forest);
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        assert!(state.player.is_none());
    }

    #[test]
    fn test_movement_accelerates_and_friction_stops() {
        let mut state = state_with(ClassId::Warrior);
        state.input.move_dir = DVec2::new(1.0, 0.0);
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        let mut rng = test_rng();
        for _ in 0..30 {
            update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        }
        let moving = state.player.as_ref().unwrap().clone();
        assert!(moving.position.x > 1000.0);
        assert!(moving.velocity.length() > 0.0);
        assert!(moving.velocity.length() <= moving.effective_move_speed() + 1e-9);
        assert_eq!(moving.state, ActorState::Walk);

        // Release the key: friction bleeds the velocity away.
        state.input.move_dir = DVec2::ZERO;
        for _ in 0..120 {
            update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        }
        let stopped = state.player.as_ref().unwrap();
        assert!(stopped.velocity.length() < 0.1);
        assert_eq!(stopped.state, ActorState::Idle);
    }

    #[test]
    fn test_facing_tracks_pointer() {
        let mut state = state_with(ClassId::Warrior);
        state.input.pointer = DVec2::new(1000.0, 2000.0);
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        let facing = state.player.as_ref().unwrap().facing;
        assert!((facing - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_arc_attack_respects_facing_window() {
        let mut state = state_with(ClassId::Warrior);
        // One enemy ahead, one behind, both in range.
        add_enemy(&mut state, DVec2::new(1050.0, 1000.0));
        add_enemy(&mut state, DVec2::new(950.0, 1000.0));
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        state.input.attack = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);

        assert!(state.enemies[0].stats.hp < state.enemies[0].stats.max_hp);
        assert_eq!(state.enemies[1].stats.hp, state.enemies[1].stats.max_hp);
    }

    #[test]
    fn test_attack_cooldown_throttles_swings() {
        let mut state = state_with(ClassId::Warrior);
        add_enemy(&mut state, DVec2::new(1050.0, 1000.0));
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        state.input.attack = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        let hp_after_first = state.enemies[0].stats.hp;
        // Within the 320ms swing interval nothing further lands.
        for _ in 0..10 {
            update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        }
        assert_eq!(state.enemies[0].stats.hp, hp_after_first);
    }

    #[test]
    fn test_ranger_attack_spawns_arrow() {
        let mut state = state_with(ClassId::Ranger);
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        state.input.attack = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.projectiles.len(), 1);
        let arrow = &state.projectiles[0];
        assert_eq!(arrow.kind, ProjectileKind::Arrow);
        assert_eq!(arrow.owner, Owner::Player);
        assert!(arrow.velocity.x > 0.0);
    }

    #[test]
    fn test_multi_shot_fans_and_counts_extras() {
        let mut state = state_with(ClassId::Ranger);
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        state.input.skill = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.projectiles.len(), MULTI_SHOT_PROJECTILES as usize);

        // With +2 projectiles from gear the next cast fans wider.
        state.projectiles.clear();
        let player = state.player.as_mut().unwrap();
        player.special_effects.add(SpecialEffect::ExtraProjectiles, 2.0);
        player.timers.skill_cooldown = 0.0;
        player.stats.mp = player.stats.max_mp;
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        assert_eq!(state.projectiles.len(), MULTI_SHOT_PROJECTILES as usize + 2);
    }

    #[test]
    fn test_skill_without_mana_is_quiet_noop() {
        let mut state = state_with(ClassId::Mage);
        state.input.skill = true;
        state.player.as_mut().unwrap().stats.mp = 1.0;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        assert!(state.projectiles.is_empty());
        // Cooldown untouched, so a mana refill can cast immediately.
        assert!(state.player.as_ref().unwrap().timers.skill_cooldown <= 0.0);
    }

    #[test]
    fn test_rage_is_countdown_state() {
        let mut state = state_with(ClassId::Berserker);
        state.input.skill = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        let player = state.player.as_ref().unwrap();
        assert!(player.rage_active());
        let remaining = player.buffs.rage_ms;

        state.input.skill = false;
        for _ in 0..10 {
            update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        }
        let player = state.player.as_ref().unwrap();
        assert!(player.buffs.rage_ms < remaining);
    }

    #[test]
    fn test_shadow_step_moves_and_grants_window() {
        let mut state = state_with(ClassId::Assassin);
        state.input.pointer = DVec2::new(2000.0, 1000.0);
        state.input.skill = true;
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        let player = state.player.as_ref().unwrap();
        assert!((player.position.x - (1000.0 + SHADOW_STEP_DISTANCE)).abs() < 1.0);
        assert!(player.timers.invulnerability >= SHADOW_STEP_INVULNERABILITY_MS - 16.0);
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut state = state_with(ClassId::Warrior);
        {
            let player = state.player.as_mut().unwrap();
            player.stats.hp = 0.0;
            player.state = ActorState::Death;
        }
        state.input.attack = true;
        state.input.move_dir = DVec2::new(1.0, 0.0);
        let mut rng = test_rng();
        update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.position, DVec2::new(1000.0, 1000.0));
        assert!(player.is_dead());
    }

    #[test]
    fn test_regen_caps_at_max() {
        let mut state = state_with(ClassId::Warrior);
        state.player.as_mut().unwrap().stats.hp -= 0.001;
        let mut rng = test_rng();
        for _ in 0..100 {
            update_player(&mut state, 16.0, &mut NullCallbacks, &mut rng);
        }
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.stats.hp, player.stats.max_hp);
        assert_eq!(player.stats.mp, player.stats.max_mp);
    }
}
