//! Declarative card behavior
//!
//! `catalog` lists every understood card as a `CardRule`; `resolve` executes
//! a rule against anything implementing `ZoneActions`; `synergy` snapshots
//! the board counts the rules read.

pub mod catalog;
pub mod resolve;
pub mod rule;
pub mod synergy;

pub use resolve::{
    cast_card, choose_option, damage_and_cost, damage_effect, expire_counter, fits_resources,
    is_castable, resolve, DamageEffect, Play,
};
pub use rule::{
    CardRule, CastMode, CastOption, Condition, Cost, Damage, Expiry, Haste, SpellFilter, Support,
    Trigger,
};
pub use synergy::{forecast_damage, BoardSynergy};
