use crate::combat::types::{SpecialEffect, SpecialEffects};
use crate::core::constants::*;
use crate::core::state::ActorState;
use crate::items::equipment::Equipment;
use crate::items::types::Item;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    Warrior,
    Berserker,
    Ranger,
    Mage,
    Assassin,
}

impl ClassId {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassId::Warrior => "warrior",
            ClassId::Berserker => "berserker",
            ClassId::Ranger => "ranger",
            ClassId::Mage => "mage",
            ClassId::Assassin => "assassin",
        }
    }
}

/// How a class delivers its basic attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// Frontal arc limited by facing angle.
    Arc,
    /// Full circle around the player.
    Spin,
    /// Single fast projectile.
    Arrow { speed: f64 },
    /// Single slower projectile.
    Orb { speed: f64 },
    /// Short teleport along facing, then a point-blank hit.
    DashStab { distance: f64 },
}

/// One class skill; each class has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    PowerStrike,
    Rage,
    MultiShot,
    Fireball,
    ShadowStep,
}

/// Static class definition: base stats, per-level growth, attack and skill.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub id: ClassId,
    pub label: &'static str,
    pub hp: f64,
    pub mp: f64,
    pub damage: f64,
    pub move_speed: f64,
    /// Seconds between swings; the cooldown timer runs in milliseconds.
    pub attack_speed: f64,
    pub range: f64,
    pub hp_per_level: f64,
    pub mp_per_level: f64,
    pub damage_per_level: f64,
    pub attack: AttackKind,
    pub skill: SkillKind,
}

pub fn class_def(id: ClassId) -> ClassDef {
    match id {
        ClassId::Warrior => ClassDef {
            id,
            label: "Warrior",
            hp: 130.0,
            mp: 40.0,
            damage: 20.0,
            move_speed: 210.0,
            attack_speed: 0.32,
            range: 70.0,
            hp_per_level: 24.0,
            mp_per_level: 8.0,
            damage_per_level: 3.0,
            attack: AttackKind::Arc,
            skill: SkillKind::PowerStrike,
        },
        ClassId::Berserker => ClassDef {
            id,
            label: "Berserker",
            hp: 160.0,
            mp: 35.0,
            damage: 26.0,
            move_speed: 195.0,
            attack_speed: 0.28,
            range: 80.0,
            hp_per_level: 28.0,
            mp_per_level: 6.0,
            damage_per_level: 4.0,
            attack: AttackKind::Spin,
            skill: SkillKind::Rage,
        },
        ClassId::Ranger => ClassDef {
            id,
            label: "Ranger",
            hp: 95.0,
            mp: 60.0,
            damage: 16.0,
            move_speed: 235.0,
            attack_speed: 0.22,
            range: 320.0,
            hp_per_level: 18.0,
            mp_per_level: 10.0,
            damage_per_level: 2.0,
            attack: AttackKind::Arrow { speed: ARROW_SPEED },
            skill: SkillKind::MultiShot,
        },
        ClassId::Mage => ClassDef {
            id,
            label: "Mage",
            hp: 85.0,
            mp: 110.0,
            damage: 30.0,
            move_speed: 205.0,
            attack_speed: 0.3,
            range: 260.0,
            hp_per_level: 15.0,
            mp_per_level: 16.0,
            damage_per_level: 4.0,
            attack: AttackKind::Orb { speed: ORB_SPEED },
            skill: SkillKind::Fireball,
        },
        ClassId::Assassin => ClassDef {
            id,
            label: "Assassin",
            hp: 100.0,
            mp: 55.0,
            damage: 22.0,
            move_speed: 255.0,
            attack_speed: 0.2,
            range: 60.0,
            hp_per_level: 19.0,
            mp_per_level: 12.0,
            damage_per_level: 3.0,
            attack: AttackKind::DashStab { distance: 120.0 },
            skill: SkillKind::ShadowStep,
        },
    }
}

/// Mana cost and cooldown for a skill.
#[derive(Debug, Clone, Copy)]
pub struct SkillDef {
    pub mp_cost: f64,
    pub cooldown_ms: f64,
}

pub fn skill_def(kind: SkillKind) -> SkillDef {
    match kind {
        SkillKind::PowerStrike => SkillDef {
            mp_cost: 12.0,
            cooldown_ms: 5500.0,
        },
        SkillKind::Rage => SkillDef {
            mp_cost: 18.0,
            cooldown_ms: 7000.0,
        },
        SkillKind::MultiShot => SkillDef {
            mp_cost: 20.0,
            cooldown_ms: 5000.0,
        },
        SkillKind::Fireball => SkillDef {
            mp_cost: 28.0,
            cooldown_ms: 6000.0,
        },
        SkillKind::ShadowStep => SkillDef {
            mp_cost: 16.0,
            cooldown_ms: 5200.0,
        },
    }
}

/// The player's effective stat sheet. Recomputed wholesale from class base,
/// level growth, and equipment whenever any of those change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hp: f64,
    pub max_hp: f64,
    pub mp: f64,
    pub max_mp: f64,
    pub damage: f64,
    pub move_speed: f64,
    pub attack_speed: f64,
    pub range: f64,
    pub armor: f64,
    pub crit: f64,
    pub lifesteal: f64,
}

/// Derived countdown timers, all in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerTimers {
    pub attack_cooldown: f64,
    pub skill_cooldown: f64,
    pub invulnerability: f64,
}

/// Transient buffs, modeled as plain countdown state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub rage_ms: f64,
}

/// An unlocked talent node contributing special-effect modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: String,
    pub effects: Vec<(SpecialEffect, f64)>,
}

/// A small talent catalog per class; each node feeds the special-effect
/// accumulator and nothing else.
pub fn talent_catalog(class: ClassId) -> Vec<Talent> {
    let nodes: &[(&str, &[(SpecialEffect, f64)])] = match class {
        ClassId::Warrior => &[
            ("guard-hp", &[(SpecialEffect::MaxHp, 80.0)]),
            ("guard-block", &[(SpecialEffect::Block, 0.15)]),
            ("blade-damage", &[(SpecialEffect::DamageMult, 0.18)]),
            ("blade-lifesteal", &[(SpecialEffect::Lifesteal, 0.12)]),
        ],
        ClassId::Berserker => &[
            ("slayer-boss", &[(SpecialEffect::BossDamage, 0.2)]),
            ("slayer-crit", &[(SpecialEffect::Crit, 0.1)]),
            ("frenzy-rage", &[(SpecialEffect::RageDuration, 2.0)]),
            ("frenzy-speed", &[(SpecialEffect::MoveSpeed, 0.15)]),
        ],
        ClassId::Ranger => &[
            ("precision-crit", &[(SpecialEffect::Crit, 0.12)]),
            ("precision-arrow", &[(SpecialEffect::ExtraProjectiles, 1.0)]),
            ("hunter-speed", &[(SpecialEffect::MoveSpeed, 0.15)]),
            ("hunter-survival", &[(SpecialEffect::Lifesteal, 0.08)]),
        ],
        ClassId::Mage => &[
            ("fire-damage", &[(SpecialEffect::FireDamage, 0.15)]),
            ("fire-radius", &[(SpecialEffect::FireballRadius, 20.0)]),
            ("fire-crit", &[(SpecialEffect::SpellCrit, 0.08)]),
            ("arcane-mp", &[(SpecialEffect::MaxMp, 30.0), (SpecialEffect::MpRegen, 1.5)]),
        ],
        ClassId::Assassin => &[
            ("shadow-dash", &[(SpecialEffect::DashDistance, 40.0)]),
            ("duelist-crit", &[(SpecialEffect::Crit, 0.1)]),
            ("duelist-speed", &[(SpecialEffect::MoveSpeed, 0.1)]),
            ("night-regen", &[(SpecialEffect::HpRegen, 1.0)]),
        ],
    };
    nodes
        .iter()
        .map(|(id, effects)| Talent {
            id: (*id).to_string(),
            effects: effects.to_vec(),
        })
        .collect()
}

/// Payload handed to the `on_attack` callback when a basic attack fires.
#[derive(Debug, Clone, Copy)]
pub struct AttackEvent {
    pub kind: AttackKind,
    pub origin: DVec2,
    pub facing: f64,
}

/// Payload handed to the `on_skill` callback when a skill cast fires.
#[derive(Debug, Clone, Copy)]
pub struct SkillEvent {
    pub kind: SkillKind,
    pub origin: DVec2,
    pub facing: f64,
}

/// The player avatar. One per simulation, created per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub class_id: ClassId,
    pub level: u32,
    pub xp: f64,
    pub xp_to_next: f64,
    pub talent_points: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Angle toward the pointer, recomputed every tick, never smoothed.
    pub facing: f64,
    pub stats: PlayerStats,
    pub timers: PlayerTimers,
    pub buffs: Buffs,
    pub special_effects: SpecialEffects,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
    pub talents: Vec<Talent>,
    pub state: ActorState,
}

impl Player {
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            level: 1,
            xp: 0.0,
            xp_to_next: XP_CURVE_BASE + XP_CURVE_PER_LEVEL,
            talent_points: 0,
            position: DVec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            velocity: DVec2::ZERO,
            facing: 0.0,
            stats: base_stats_at_level(class_id, 1),
            timers: PlayerTimers::default(),
            buffs: Buffs::default(),
            special_effects: SpecialEffects::new(),
            equipment: Equipment::default(),
            inventory: Vec::new(),
            talents: Vec::new(),
            state: ActorState::Idle,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == ActorState::Death
    }

    pub fn rage_active(&self) -> bool {
        self.buffs.rage_ms > 0.0
    }

    /// Damage used as the base of the outgoing pipeline; rage multiplies it.
    pub fn effective_damage(&self) -> f64 {
        if self.rage_active() {
            self.stats.damage * RAGE_DAMAGE_MULT
        } else {
            self.stats.damage
        }
    }

    /// Speed clamp for the movement integrator.
    pub fn effective_move_speed(&self) -> f64 {
        let mut speed =
            self.stats.move_speed * (1.0 + self.special_effects.bonus(SpecialEffect::MoveSpeed));
        if self.rage_active() {
            speed *= RAGE_SPEED_MULT;
        }
        speed
    }

    /// Unlocks a talent node if a point is available and the node is new.
    pub fn unlock_talent(&mut self, talent: Talent) -> bool {
        if self.talent_points == 0 || self.talents.iter().any(|t| t.id == talent.id) {
            return false;
        }
        self.talent_points -= 1;
        self.talents.push(talent);
        crate::items::equipment::recompute_stats(self);
        true
    }
}

/// Class base stats plus per-level growth, before any equipment.
pub fn base_stats_at_level(class_id: ClassId, level: u32) -> PlayerStats {
    let def = class_def(class_id);
    let levels = (level.saturating_sub(1)) as f64;
    let max_hp = def.hp + def.hp_per_level * levels;
    let max_mp = def.mp + def.mp_per_level * levels;
    PlayerStats {
        hp: max_hp,
        max_hp,
        mp: max_mp,
        max_mp,
        damage: def.damage + def.damage_per_level * levels,
        move_speed: def.move_speed,
        attack_speed: def.attack_speed,
        range: def.range,
        armor: 0.0,
        crit: BASE_CRIT_CHANCE,
        lifesteal: 0.0,
    }
}
