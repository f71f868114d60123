// World dimensions and motion
pub const WORLD_WIDTH: f64 = 3200.0;
pub const WORLD_HEIGHT: f64 = 2400.0;
pub const FRICTION: f64 = 0.86;
pub const PLAYER_ACCEL_PER_MS: f64 = 0.0015;
pub const PLAYER_POSITION_SCALE: f64 = 0.06;
pub const ENEMY_WALK_ANIMATION_THRESHOLD: f64 = 5.0;

// Enemy steering bands
pub const RANGED_FLEE_DISTANCE: f64 = 260.0;
pub const RANGED_BAND_FACTOR: f64 = 0.4;
pub const APPROACH_BAND_FACTOR: f64 = 0.5;
pub const ENEMY_ATTACK_GATE: f64 = 220.0;

// Timing (all timers are milliseconds)
pub const PLAYER_HIT_INVULNERABILITY_MS: f64 = 350.0;
pub const DEATH_ANIMATION_MS: f64 = 600.0;
pub const SPAWN_ANIMATION_MS: f64 = 500.0;
pub const SHADOW_STEP_INVULNERABILITY_MS: f64 = 1200.0;

// Regeneration (per second, converted by dt)
pub const HP_REGEN_PER_SECOND: f64 = 0.4;
pub const MP_REGEN_PER_SECOND: f64 = 1.8;

// Damage pipeline
pub const CRIT_MULTIPLIER: f64 = 1.6;
pub const CRIT_CHANCE_CAP: f64 = 0.95;
pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const BLOCK_CAP: f64 = 0.85;
pub const ARMOR_CAP: f64 = 0.6;
pub const ARMOR_DIVISOR: f64 = 120.0;
pub const MITIGATION_FLOOR: f64 = 0.25;

// Rage buff
pub const RAGE_DAMAGE_MULT: f64 = 1.4;
pub const RAGE_SPEED_MULT: f64 = 1.25;
pub const RAGE_BASE_DURATION_MS: f64 = 4500.0;

// Collision pads: projectile radius + pad must overlap the target center
pub const ENEMY_HIT_PAD: f64 = 12.0;
pub const PLAYER_HIT_PAD: f64 = 14.0;
pub const AREA_EFFECT_MARGIN: f64 = 14.0;
pub const AREA_EFFECT_TTL_MS: f64 = 1400.0;
pub const PICKUP_RADIUS: f64 = 24.0;

// Projectile speeds (px per second) and travel limits (px)
pub const ARROW_SPEED: f64 = 420.0;
pub const ORB_SPEED: f64 = 360.0;
pub const FIREBALL_SPEED: f64 = 320.0;
pub const ENEMY_BOLT_SPEED: f64 = 280.0;
pub const ARROW_MAX_TRAVEL: f64 = 480.0;
pub const ORB_MAX_TRAVEL: f64 = 400.0;
pub const FIREBALL_MAX_TRAVEL: f64 = 380.0;
pub const ENEMY_BOLT_MAX_TRAVEL: f64 = 360.0;

// Basic attacks
pub const ARC_HALF_ANGLE: f64 = std::f64::consts::FRAC_PI_4;
pub const DASH_STAB_HIT_RADIUS: f64 = 70.0;
pub const PROJECTILE_HIT_RADIUS: f64 = 6.0;
pub const EXPLOSION_SPLASH_FACTOR: f64 = 0.75;

// Skill tuning
pub const MULTI_SHOT_PROJECTILES: u32 = 5;
pub const MULTI_SHOT_SPREAD_DEG: f64 = 18.0;
pub const MULTI_SHOT_DAMAGE_FACTOR: f64 = 0.9;
pub const FIREBALL_DAMAGE_FACTOR: f64 = 1.4;
pub const FIREBALL_EXPLOSION_RADIUS: f64 = 60.0;
pub const POWER_STRIKE_DAMAGE_FACTOR: f64 = 1.5;
pub const POWER_STRIKE_ARC: f64 = 120.0;
pub const SHADOW_STEP_DISTANCE: f64 = 180.0;
pub const SHADOW_STEP_DAMAGE_FACTOR: f64 = 1.3;
pub const SHADOW_STEP_HIT_RADIUS: f64 = 90.0;

// Incoming damage scaling for low-level characters
pub const LOW_LEVEL_DAMAGE_SCALE: [(u32, f64); 3] = [(1, 0.8), (2, 0.85), (3, 0.9)];

// Split fragments never spawn below this HP
pub const SPLIT_MIN_FRAGMENT_HP: f64 = 20.0;

// Leveling
pub const XP_CURVE_BASE: f64 = 120.0;
pub const XP_CURVE_PER_LEVEL: f64 = 140.0;

// Inventory
pub const INVENTORY_CAPACITY: usize = 27;

// Item attack speed can never push the swing interval below this
pub const ATTACK_SPEED_FLOOR: f64 = 0.15;
