//! Two-tier pension contribution (NSSF).
//!
//! Tier caps are effective-dated rule entries; the contract type may
//! reduce them further, and consultant engagements are exempt entirely.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{ContractType, PayrollPeriod};
use crate::rules::StatutoryRules;

/// The two tiers of a pension contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NssfContribution {
    /// Contribution on earnings up to the tier-1 cap.
    pub tier1: Decimal,
    /// Contribution on earnings between the tier-1 and tier-2 caps.
    pub tier2: Decimal,
}

impl NssfContribution {
    /// Total contribution across both tiers.
    pub fn total(&self) -> Decimal {
        self.tier1 + self.tier2
    }
}

/// Computes the monthly pension contribution on pensionable pay.
///
/// # Arguments
///
/// * `pensionable` - Statutory-base gross for the period.
/// * `period` - The payroll period, which selects the effective tier caps.
/// * `contract_type` - Primary, secondary, or consultant.
/// * `rules` - The statutory rule set.
///
/// # Returns
///
/// The tiered contribution, or a `RuleNotFound` error when no cap entry
/// is effective for the period. Consultants contribute nothing.
pub fn calculate_nssf(
    pensionable: Decimal,
    period: PayrollPeriod,
    contract_type: ContractType,
    rules: &StatutoryRules,
) -> EngineResult<NssfContribution> {
    if contract_type == ContractType::Consultant {
        return Ok(NssfContribution::default());
    }

    let caps = rules.pension_caps_for(period)?;
    let mut tier1_cap = caps.tier1_cap;
    let mut tier2_cap = caps.tier2_cap;
    if contract_type == ContractType::Secondary {
        tier1_cap = tier1_cap.min(rules.pension.secondary_tier1_cap);
        tier2_cap = tier2_cap.min(rules.pension.secondary_tier2_cap);
    }

    let pensionable = pensionable.max(Decimal::ZERO);
    let rate = rules.pension.rate;

    let tier1 = pensionable.min(tier1_cap) * rate;
    let tier2 = if pensionable > tier1_cap {
        (pensionable - tier1_cap).min(tier2_cap - tier1_cap) * rate
    } else {
        Decimal::ZERO
    };

    Ok(NssfContribution { tier1, tier2 })
}
