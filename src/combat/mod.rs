pub mod logic;
pub mod types;

pub use logic::{mitigate, AttackOutcome};
pub use types::{DamageContext, Owner, SpecialEffect, SpecialEffects};
