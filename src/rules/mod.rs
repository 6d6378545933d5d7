//! Versioned, effective-dated statutory rule tables.
//!
//! This module contains the typed rule structures ([`types`]) and their
//! loading logic: YAML files for amended rule sets, or the built-in
//! Kenyan defaults.

mod loader;
mod types;

pub use types::{
    BenefitRules, LevyRule, PensionCapRule, PensionRules, ReliefRules, StatutoryRules, TaxBand,
    TaxBandSchedule,
};
