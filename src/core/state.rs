use crate::effects::AreaEffect;
use crate::enemies::types::Enemy;
use crate::items::types::Item;
use crate::player::types::Player;
use crate::projectiles::Projectile;
use crate::zones::ZoneId;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discrete entity state, doubling as the symbolic animation name read by
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    Idle,
    Walk,
    Attack,
    Hit,
    Cast,
    Spawn,
    Death,
}

impl ActorState {
    /// Symbolic animation name for the presentation layer.
    pub fn animation_name(self) -> &'static str {
        match self {
            ActorState::Idle => "idle",
            ActorState::Walk => "walk",
            ActorState::Attack => "attack",
            ActorState::Hit => "hit",
            ActorState::Cast => "cast",
            ActorState::Spawn => "spawn",
            ActorState::Death => "death",
        }
    }

    /// Terminal sub-states never revert to idle.
    pub fn is_terminal(self) -> bool {
        matches!(self, ActorState::Death)
    }
}

/// Input snapshot for the current tick, written by the embedding layer.
///
/// Input capture itself lives outside the core; the simulation only reads
/// this already-decoded view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Pressed movement direction, components in [-1, 1].
    pub move_dir: DVec2,
    /// Pointer position in world coordinates; the player always faces it.
    pub pointer: DVec2,
    /// Basic attack held.
    pub attack: bool,
    /// Skill cast requested.
    pub skill: bool,
}

/// A dropped item waiting on the ground. Collaborators insert these between
/// ticks; the core only resolves pickup proximity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootDrop {
    pub id: Uuid,
    pub position: DVec2,
    pub item: Item,
}

impl LootDrop {
    pub fn new(position: DVec2, item: Item) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            item,
        }
    }
}

/// Running per-session counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub kill_count: u64,
    pub loot_count: u64,
    /// Simulated time advanced so far, in milliseconds.
    pub time_ms: f64,
}

/// The whole mutable simulation.
///
/// Everything an update function touches hangs off this struct and it is
/// always passed explicitly, so independent simulations can coexist (the
/// test suites run dozens side by side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub active_zone: ZoneId,
    /// `None` until a character is created; every update function treats the
    /// absence as a quiet no-op.
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<AreaEffect>,
    pub drops: Vec<LootDrop>,
    #[serde(skip)]
    pub input: PlayerInput,
    #[serde(default)]
    pub stats: SessionStats,
}

impl SimulationState {
    pub fn new(active_zone: ZoneId) -> Self {
        Self {
            active_zone,
            player: None,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            drops: Vec::new(),
            input: PlayerInput::default(),
            stats: SessionStats::default(),
        }
    }

    /// Weak lookup for id back-references; an absent or dead owner resolves
    /// to `None` and callers treat that as a normal case.
    pub fn enemy_by_id(&self, id: Uuid) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Live (non-dying) enemy count, used by spawn maintenance.
    pub fn live_enemy_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.stats.hp > 0.0 && e.state != ActorState::Death)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_names_cover_presentation_contract() {
        assert_eq!(ActorState::Idle.animation_name(), "idle");
        assert_eq!(ActorState::Cast.animation_name(), "cast");
        assert_eq!(ActorState::Death.animation_name(), "death");
    }

    #[test]
    fn test_only_death_is_terminal() {
        assert!(ActorState::Death.is_terminal());
        assert!(!ActorState::Hit.is_terminal());
        assert!(!ActorState::Spawn.is_terminal());
    }

    #[test]
    fn test_fresh_state_is_empty() {
        let state = SimulationState::new(ZoneId::Forest);
        assert!(state.player.is_none());
        assert!(state.enemies.is_empty());
        assert_eq!(state.live_enemy_count(), 0);
    }
}
