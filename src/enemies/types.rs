use crate::core::cooldown;
use crate::core::state::ActorState;
use crate::zones::data::ZoneScale;
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Enemy archetypes. `Wisp` exists as the fragment type spawned by `split`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeId {
    Brute,
    Archer,
    Shaman,
    Wisp,
    Boss,
}

impl ArchetypeId {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchetypeId::Brute => "brute",
            ArchetypeId::Archer => "archer",
            ArchetypeId::Shaman => "shaman",
            ArchetypeId::Wisp => "wisp",
            ArchetypeId::Boss => "boss",
        }
    }
}

/// Keys of the per-enemy ability map and its timer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Dash,
    Blink,
    Slam,
    Inferno,
    Volley,
    Regen,
    Throw,
    Split,
}

// Each config struct tolerates partial definitions: unspecified fields fall
// back to the defaults below instead of failing deserialization.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub cooldown_ms: f64,
    pub min_range: f64,
    pub max_range: f64,
    /// Peak speed multiplier; decays linearly back to 1.
    pub boost: f64,
    pub boost_decay_ms: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 4000.0,
            min_range: 120.0,
            max_range: 420.0,
            boost: 2.2,
            boost_decay_ms: 900.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub cooldown_ms: f64,
    /// Teleport only fires when the player is farther than this.
    pub trigger_range: f64,
    /// Landing ring radius around the player.
    pub ring_radius: f64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 7000.0,
            trigger_range: 320.0,
            ring_radius: 140.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlamConfig {
    pub cooldown_ms: f64,
    pub radius: f64,
    pub delay_ms: f64,
    pub damage_mult: f64,
}

impl Default for SlamConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 5000.0,
            radius: 90.0,
            delay_ms: 900.0,
            damage_mult: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfernoConfig {
    pub cooldown_ms: f64,
    pub radius: f64,
    pub delay_ms: f64,
    pub damage_mult: f64,
}

impl Default for InfernoConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 8000.0,
            radius: 110.0,
            delay_ms: 1100.0,
            damage_mult: 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolleyConfig {
    /// Sub-cooldown checked on the normal attack trigger.
    pub cooldown_ms: f64,
    pub projectiles: u32,
    pub spread_deg: f64,
}

impl Default for VolleyConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 6000.0,
            projectiles: 3,
            spread_deg: 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    pub interval_ms: f64,
    pub amount: f64,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            interval_ms: 4000.0,
            amount: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowConfig {
    pub cooldown_ms: f64,
    pub min_range: f64,
    pub max_range: f64,
    pub speed: f64,
    pub damage_mult: f64,
    pub radius: f64,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 5500.0,
            min_range: 140.0,
            max_range: 320.0,
            speed: 220.0,
            damage_mult: 1.5,
            radius: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub pieces: u32,
    pub scale: f64,
    pub fragment: ArchetypeId,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            pieces: 2,
            scale: 0.5,
            fragment: ArchetypeId::Wisp,
        }
    }
}

/// One ability definition; the variant fixes the schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityConfig {
    Dash(DashConfig),
    Blink(BlinkConfig),
    Slam(SlamConfig),
    Inferno(InfernoConfig),
    Volley(VolleyConfig),
    Regen(RegenConfig),
    Throw(ThrowConfig),
    Split(SplitConfig),
}

impl AbilityConfig {
    pub fn kind(&self) -> AbilityKind {
        match self {
            AbilityConfig::Dash(_) => AbilityKind::Dash,
            AbilityConfig::Blink(_) => AbilityKind::Blink,
            AbilityConfig::Slam(_) => AbilityKind::Slam,
            AbilityConfig::Inferno(_) => AbilityKind::Inferno,
            AbilityConfig::Volley(_) => AbilityKind::Volley,
            AbilityConfig::Regen(_) => AbilityKind::Regen,
            AbilityConfig::Throw(_) => AbilityKind::Throw,
            AbilityConfig::Split(_) => AbilityKind::Split,
        }
    }
}

/// The subset of abilities an enemy type opted into, keyed by ability tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Abilities(pub BTreeMap<AbilityKind, AbilityConfig>);

macro_rules! ability_accessor {
    ($name:ident, $kind:ident, $config:ty) => {
        pub fn $name(&self) -> Option<$config> {
            match self.0.get(&AbilityKind::$kind) {
                Some(AbilityConfig::$kind(config)) => Some(*config),
                _ => None,
            }
        }
    };
}

impl Abilities {
    pub fn insert(&mut self, config: AbilityConfig) {
        self.0.insert(config.kind(), config);
    }

    pub fn remove(&mut self, kind: AbilityKind) {
        self.0.remove(&kind);
    }

    pub fn contains(&self, kind: AbilityKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    ability_accessor!(dash, Dash, DashConfig);
    ability_accessor!(blink, Blink, BlinkConfig);
    ability_accessor!(slam, Slam, SlamConfig);
    ability_accessor!(inferno, Inferno, InfernoConfig);
    ability_accessor!(volley, Volley, VolleyConfig);
    ability_accessor!(regen, Regen, RegenConfig);
    ability_accessor!(throw, Throw, ThrowConfig);
    ability_accessor!(split, Split, SplitConfig);
}

// Boss phases and persistent behavior abilities.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnMinionsConfig {
    pub count: u32,
    pub interval_ms: f64,
}

impl Default for SpawnMinionsConfig {
    fn default() -> Self {
        Self {
            count: 3,
            interval_ms: 9000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveConfig {
    pub interval_ms: f64,
    pub radius: f64,
    pub delay_ms: f64,
    pub damage_mult: f64,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            interval_ms: 7000.0,
            radius: 150.0,
            delay_ms: 700.0,
            damage_mult: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    pub interval_ms: f64,
    pub radius: f64,
    pub delay_ms: f64,
    pub damage_mult: f64,
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 8000.0,
            radius: 110.0,
            delay_ms: 1100.0,
            damage_mult: 1.5,
        }
    }
}

/// Persistent abilities a boss phase can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BossAbility {
    SpawnMinions(SpawnMinionsConfig),
    Shockwave(ShockwaveConfig),
    Meteor(MeteorConfig),
}

impl BossAbility {
    pub fn interval_ms(&self) -> f64 {
        match self {
            BossAbility::SpawnMinions(c) => c.interval_ms,
            BossAbility::Shockwave(c) => c.interval_ms,
            BossAbility::Meteor(c) => c.interval_ms,
        }
    }
}

/// A registered persistent ability with its own countdown slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorState {
    pub ability: BossAbility,
    pub timer: Option<f64>,
}

/// One hp-ratio-triggered phase transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub threshold: f64,
    #[serde(default)]
    pub damage_mult: Option<f64>,
    #[serde(default)]
    pub speed_mult: Option<f64>,
    #[serde(default)]
    pub unlocks: Vec<BossAbility>,
}

/// Archetype base stats; all fields optional in definitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    pub hp: f64,
    pub damage: f64,
    /// Pixels per second before band factors.
    pub speed: f64,
    /// Seconds between attacks.
    pub attack_delay: f64,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            hp: 80.0,
            damage: 10.0,
            speed: 150.0,
            attack_delay: 1.2,
        }
    }
}

fn default_reach() -> f64 {
    48.0
}

/// A full enemy type definition, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: ArchetypeId,
    pub label: String,
    #[serde(default)]
    pub base: BaseStats,
    #[serde(default)]
    pub ranged: bool,
    /// Melee strike distance.
    #[serde(default = "default_reach")]
    pub reach: f64,
    #[serde(default)]
    pub xp: f64,
    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
}

impl Archetype {
    /// Parses an archetype definition; omitted fields take the documented
    /// defaults. This is the only fallible configuration surface.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Built-in archetype table.
pub fn archetype(id: ArchetypeId) -> Archetype {
    match id {
        ArchetypeId::Brute => {
            let mut abilities = Abilities::default();
            abilities.insert(AbilityConfig::Dash(DashConfig::default()));
            abilities.insert(AbilityConfig::Throw(ThrowConfig::default()));
            Archetype {
                id,
                label: "Orc Brute".to_string(),
                base: BaseStats {
                    hp: 120.0,
                    damage: 16.0,
                    speed: 170.0,
                    attack_delay: 1.1,
                },
                ranged: false,
                reach: 48.0,
                xp: 50.0,
                abilities,
                phases: Vec::new(),
            }
        }
        ArchetypeId::Archer => {
            let mut abilities = Abilities::default();
            abilities.insert(AbilityConfig::Volley(VolleyConfig::default()));
            Archetype {
                id,
                label: "Archer".to_string(),
                base: BaseStats {
                    hp: 80.0,
                    damage: 14.0,
                    speed: 160.0,
                    attack_delay: 1.0,
                },
                ranged: true,
                reach: 48.0,
                xp: 55.0,
                abilities,
                phases: Vec::new(),
            }
        }
        ArchetypeId::Shaman => {
            let mut abilities = Abilities::default();
            abilities.insert(AbilityConfig::Blink(BlinkConfig::default()));
            abilities.insert(AbilityConfig::Regen(RegenConfig::default()));
            abilities.insert(AbilityConfig::Split(SplitConfig::default()));
            Archetype {
                id,
                label: "Shaman".to_string(),
                base: BaseStats {
                    hp: 90.0,
                    damage: 12.0,
                    speed: 140.0,
                    attack_delay: 1.4,
                },
                ranged: true,
                reach: 48.0,
                xp: 60.0,
                abilities,
                phases: Vec::new(),
            }
        }
        ArchetypeId::Wisp => Archetype {
            id,
            label: "Wisp".to_string(),
            base: BaseStats {
                hp: 30.0,
                damage: 6.0,
                speed: 220.0,
                attack_delay: 0.9,
            },
            ranged: false,
            reach: 40.0,
            xp: 15.0,
            abilities: Abilities::default(),
            phases: Vec::new(),
        },
        ArchetypeId::Boss => {
            let mut abilities = Abilities::default();
            abilities.insert(AbilityConfig::Volley(VolleyConfig {
                cooldown_ms: 6000.0,
                projectiles: 3,
                spread_deg: 20.0,
            }));
            abilities.insert(AbilityConfig::Slam(SlamConfig::default()));
            abilities.insert(AbilityConfig::Inferno(InfernoConfig::default()));
            Archetype {
                id,
                label: "Demon Lord".to_string(),
                base: BaseStats {
                    hp: 1200.0,
                    damage: 38.0,
                    speed: 130.0,
                    attack_delay: 0.8,
                },
                ranged: true,
                reach: 60.0,
                xp: 1200.0,
                abilities,
                phases: vec![
                    PhaseSpec {
                        threshold: 0.7,
                        damage_mult: None,
                        speed_mult: None,
                        unlocks: vec![BossAbility::SpawnMinions(SpawnMinionsConfig::default())],
                    },
                    PhaseSpec {
                        threshold: 0.3,
                        damage_mult: Some(1.4),
                        speed_mult: Some(1.2),
                        unlocks: vec![
                            BossAbility::Shockwave(ShockwaveConfig::default()),
                            BossAbility::Meteor(MeteorConfig::default()),
                        ],
                    },
                ],
            }
        }
    }
}

/// Mutable per-instance combat numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: f64,
    pub max_hp: f64,
    pub damage: f64,
    pub speed: f64,
    /// Seconds between attacks (archetype value, phase mults do not touch it).
    pub attack_delay: f64,
    /// Countdown to the next attack, milliseconds.
    pub timer_ms: f64,
}

/// Transient dash speed-up; the multiplier decays linearly back to 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpeedBoost {
    pub peak: f64,
    pub remaining_ms: f64,
    pub total_ms: f64,
}

impl SpeedBoost {
    pub fn start(peak: f64, duration_ms: f64) -> Self {
        Self {
            peak,
            remaining_ms: duration_ms,
            total_ms: duration_ms,
        }
    }

    pub fn decay(&mut self, dt: f64) {
        if self.remaining_ms > 0.0 {
            self.remaining_ms = (self.remaining_ms - dt).max(0.0);
        }
    }

    pub fn multiplier(&self) -> f64 {
        if self.remaining_ms > 0.0 && self.total_ms > 0.0 {
            1.0 + (self.peak - 1.0) * (self.remaining_ms / self.total_ms)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: Uuid,
    pub archetype: ArchetypeId,
    pub zone_xp_scale: f64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub stats: EnemyStats,
    pub ranged: bool,
    pub reach: f64,
    pub xp: f64,
    /// Ability configs copied from the archetype at spawn.
    pub abilities: Abilities,
    /// Per-ability countdown slots, keyed like `abilities`.
    pub ability_timers: BTreeMap<AbilityKind, f64>,
    pub is_boss: bool,
    /// Monotonically increasing; never reverts.
    pub phase: u32,
    pub phases: Vec<PhaseSpec>,
    /// One-shot guards so a crossed threshold can never refire.
    pub phases_applied: Vec<bool>,
    /// Persistent abilities unlocked by phases, with their own timers.
    pub behavior: Vec<BehaviorState>,
    pub state: ActorState,
    pub boost: SpeedBoost,
    pub death_timer_ms: f64,
    pub spawn_timer_ms: f64,
    pub remove: bool,
}

impl Enemy {
    pub fn from_archetype<R: Rng>(
        def: &Archetype,
        scale: ZoneScale,
        position: DVec2,
        rng: &mut R,
    ) -> Self {
        let hp = def.base.hp * scale.hp;
        let attack_delay = def.base.attack_delay;
        let phase_count = def.phases.len();
        Self {
            id: Uuid::new_v4(),
            archetype: def.id,
            zone_xp_scale: scale.xp,
            position,
            velocity: DVec2::ZERO,
            stats: EnemyStats {
                hp,
                max_hp: hp,
                damage: def.base.damage * scale.damage,
                speed: def.base.speed,
                attack_delay,
                // Random initial offset so fresh packs do not strike in sync.
                timer_ms: rng.gen::<f64>() * attack_delay * 1000.0,
            },
            ranged: def.ranged,
            reach: def.reach,
            xp: def.xp * scale.xp,
            abilities: def.abilities.clone(),
            ability_timers: BTreeMap::new(),
            is_boss: def.id == ArchetypeId::Boss,
            phase: 0,
            phases: def.phases.clone(),
            phases_applied: vec![false; phase_count],
            behavior: Vec::new(),
            state: ActorState::Idle,
            boost: SpeedBoost::default(),
            death_timer_ms: 0.0,
            spawn_timer_ms: 0.0,
            remove: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0.0 && self.state != ActorState::Death
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.stats.max_hp > 0.0 {
            self.stats.hp / self.stats.max_hp
        } else {
            0.0
        }
    }

    /// Movement speed after the transient dash boost.
    pub fn current_speed(&self) -> f64 {
        self.stats.speed * self.boost.multiplier()
    }

    /// Advances an ability countdown, arming unset slots from `default_ms`.
    pub fn tick_ability_timer(&mut self, kind: AbilityKind, dt: f64, default_ms: f64) -> f64 {
        let remaining = cooldown::tick(self.ability_timers.get(&kind).copied(), dt, default_ms);
        self.ability_timers.insert(kind, remaining);
        remaining
    }

    pub fn reset_ability_timer(&mut self, kind: AbilityKind, cooldown_ms: f64) {
        self.ability_timers.insert(kind, cooldown_ms);
    }

    /// Symbolic animation name for the presentation layer.
    pub fn animation_name(&self) -> &'static str {
        self.state.animation_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_spawn_copies_archetype_values() {
        let def = archetype(ArchetypeId::Brute);
        let mut rng = test_rng();
        let enemy = Enemy::from_archetype(&def, neutral_scale(), DVec2::ZERO, &mut rng);
        assert_eq!(enemy.stats.max_hp, 120.0);
        assert_eq!(enemy.stats.damage, 16.0);
        assert!(enemy.abilities.dash().is_some());
        assert!(enemy.abilities.throw().is_some());
        assert!(!enemy.is_boss);
        assert!(enemy.stats.timer_ms >= 0.0 && enemy.stats.timer_ms < 1100.0);
    }

    #[test]
    fn test_zone_scale_applies_at_spawn() {
        let def = archetype(ArchetypeId::Shaman);
        let scale = ZoneScale {
            hp: 1.25,
            damage: 1.15,
            xp: 1.3,
        };
        let mut rng = test_rng();
        let enemy = Enemy::from_archetype(&def, scale, DVec2::ZERO, &mut rng);
        assert!((enemy.stats.max_hp - 112.5).abs() < 1e-9);
        assert!((enemy.stats.damage - 13.8).abs() < 1e-9);
        assert!((enemy.xp - 78.0).abs() < 1e-9);
    }

    #[test]
    fn test_boss_archetype_has_two_phases() {
        let def = archetype(ArchetypeId::Boss);
        assert_eq!(def.phases.len(), 2);
        assert_eq!(def.phases[0].threshold, 0.7);
        assert_eq!(def.phases[1].threshold, 0.3);
        assert!(def.phases[1].damage_mult.is_some());
    }

    #[test]
    fn test_partial_json_config_falls_back_to_defaults() {
        let def = Archetype::from_json(
            r#"{
                "id": "brute",
                "label": "Cave Ogre",
                "base": { "hp": 300 },
                "abilities": {
                    "dash": { "kind": "dash", "cooldown_ms": 2500 },
                    "regen": { "kind": "regen" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(def.base.hp, 300.0);
        // Unspecified base fields keep their defaults.
        assert_eq!(def.base.damage, 10.0);
        let dash = def.abilities.dash().unwrap();
        assert_eq!(dash.cooldown_ms, 2500.0);
        assert_eq!(dash.boost, 2.2);
        let regen = def.abilities.regen().unwrap();
        assert_eq!(regen.interval_ms, 4000.0);
        assert_eq!(regen.amount, 15.0);
    }

    #[test]
    fn test_malformed_json_reports_instead_of_panicking() {
        assert!(Archetype::from_json("{ not json }").is_err());
    }

    #[test]
    fn test_speed_boost_decays_linearly_to_one() {
        let mut boost = SpeedBoost::start(3.0, 1000.0);
        assert!((boost.multiplier() - 3.0).abs() < 1e-9);
        boost.decay(500.0);
        assert!((boost.multiplier() - 2.0).abs() < 1e-9);
        boost.decay(500.0);
        assert_eq!(boost.multiplier(), 1.0);
        boost.decay(500.0);
        assert_eq!(boost.multiplier(), 1.0);
    }

    #[test]
    fn test_ability_timer_arms_from_default() {
        let def = archetype(ArchetypeId::Archer);
        let mut rng = test_rng();
        let mut enemy = Enemy::from_archetype(&def, neutral_scale(), DVec2::ZERO, &mut rng);
        let remaining = enemy.tick_ability_timer(AbilityKind::Volley, 100.0, 6000.0);
        assert_eq!(remaining, 5900.0);
        let remaining = enemy.tick_ability_timer(AbilityKind::Volley, 100.0, 6000.0);
        assert_eq!(remaining, 5800.0);
    }

    #[test]
    fn test_fragment_archetype_has_no_split() {
        let wisp = archetype(ArchetypeId::Wisp);
        assert!(wisp.abilities.split().is_none());
        assert!(wisp.abilities.is_empty());
    }
}
