//! Projectile motion and collision resolution.

use crate::combat::logic::strike_player;
use crate::combat::types::Owner;
use crate::core::constants::*;
use crate::core::state::SimulationState;
use crate::core::tick::FrameCallbacks;
use crate::enemies::logic::damage_enemy;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Arrow,
    Orb,
    Fireball,
    Bolt,
    Rock,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub id: Uuid,
    pub kind: ProjectileKind,
    pub position: DVec2,
    /// Pixels per second.
    pub velocity: DVec2,
    pub damage: f64,
    pub owner: Owner,
    pub radius: f64,
    /// Splash radius applied around the impact point.
    pub explosion: Option<f64>,
    /// Weak reference to the firing enemy, re-resolved at impact; the firer
    /// may be long dead by then.
    pub source: Option<Uuid>,
    pub traveled: f64,
    pub max_travel: f64,
    pub remove: bool,
}

impl Projectile {
    pub fn new(
        kind: ProjectileKind,
        position: DVec2,
        velocity: DVec2,
        damage: f64,
        owner: Owner,
        radius: f64,
        max_travel: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            velocity,
            damage,
            owner,
            radius,
            explosion: None,
            source: None,
            traveled: 0.0,
            max_travel,
            remove: false,
        }
    }

    pub fn with_explosion(mut self, radius: f64) -> Self {
        self.explosion = Some(radius);
        self
    }

    pub fn from_enemy(mut self, id: Uuid) -> Self {
        self.source = Some(id);
        self
    }
}

/// Moves every projectile and resolves its collisions.
pub fn update_projectiles<C: FrameCallbacks>(
    state: &mut SimulationState,
    dt: f64,
    callbacks: &mut C,
) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    for projectile in projectiles.iter_mut() {
        let step = projectile.velocity * (dt / 1000.0);
        projectile.position += step;
        projectile.traveled += step.length();

        if projectile.traveled > projectile.max_travel
            || projectile.position.x < 0.0
            || projectile.position.x > WORLD_WIDTH
            || projectile.position.y < 0.0
            || projectile.position.y > WORLD_HEIGHT
        {
            projectile.remove = true;
            continue;
        }

        match projectile.owner {
            Owner::Player => resolve_player_projectile(projectile, state),
            Owner::Enemy => resolve_enemy_projectile(projectile, state, callbacks),
        }
    }
    projectiles.retain(|p| !p.remove);
    state.projectiles = projectiles;
}

fn resolve_player_projectile(projectile: &mut Projectile, state: &mut SimulationState) {
    let mut hit = false;
    for enemy in state.enemies.iter_mut() {
        if !enemy.is_alive() {
            continue;
        }
        if enemy.position.distance(projectile.position) <= projectile.radius + ENEMY_HIT_PAD {
            damage_enemy(enemy, projectile.damage);
            hit = true;
            break;
        }
    }
    if !hit {
        return;
    }
    if let Some(radius) = projectile.explosion {
        // Splash hits everything still alive around the impact point,
        // the primary target included.
        for enemy in state.enemies.iter_mut() {
            if enemy.is_alive() && enemy.position.distance(projectile.position) <= radius {
                damage_enemy(enemy, projectile.damage * EXPLOSION_SPLASH_FACTOR);
            }
        }
    }
    projectile.remove = true;
}

fn resolve_enemy_projectile<C: FrameCallbacks>(
    projectile: &mut Projectile,
    state: &mut SimulationState,
    callbacks: &mut C,
) {
    let player_position = match state.player.as_ref() {
        Some(player) if !player.is_dead() => player.position,
        _ => return,
    };
    if player_position.distance(projectile.position) > projectile.radius + PLAYER_HIT_PAD {
        return;
    }

    // Re-resolve the firer: a live source supplies its current (possibly
    // phase-buffed) damage, an absent one falls back to the value stored at
    // fire time.
    let source_damage = projectile
        .source
        .and_then(|id| state.enemies.iter().find(|e| e.id == id))
        .filter(|e| e.is_alive())
        .map(|e| e.stats.damage);
    let raw = source_damage.unwrap_or(projectile.damage);

    let applied = match state.player.as_mut() {
        Some(player) => strike_player(player, raw),
        None => 0.0,
    };
    if let Some(source) = projectile.source.and_then(|id| state.enemy_by_id(id)) {
        callbacks.on_enemy_strike(source, applied);
    }
    projectile.remove = true;
}
