//! Statutory rule-table types.
//!
//! Strongly-typed, effective-dated constants for tax bands, contribution
//! caps, levies, reliefs, and benefit valuation. Pure data: the
//! calculation modules select the version active for a payroll period and
//! apply it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

/// One progressive tax band over annual taxable income.
///
/// Bands are ordered ascending; `upper` is the inclusive annual upper
/// bound of the band, with `None` marking the open top band.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBand {
    /// Inclusive annual upper bound, `None` for the top band.
    pub upper: Option<Decimal>,
    /// Marginal rate applied within this band.
    pub rate: Decimal,
}

/// A full progressive band table effective from a given date.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBandSchedule {
    /// The date this schedule takes effect.
    pub effective_from: NaiveDate,
    /// The bands, ascending by upper bound.
    pub bands: Vec<TaxBand>,
}

/// Tier caps for the pension contribution, effective from a given date.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionCapRule {
    /// The date these caps take effect.
    pub effective_from: NaiveDate,
    /// Monthly tier-1 earnings cap.
    pub tier1_cap: Decimal,
    /// Monthly tier-2 earnings cap.
    pub tier2_cap: Decimal,
}

/// Pension contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionRules {
    /// Contribution rate applied within both tiers.
    pub rate: Decimal,
    /// Effective-dated tier caps, ascending by date.
    pub caps: Vec<PensionCapRule>,
    /// Tier-1 cap override for secondary contracts.
    pub secondary_tier1_cap: Decimal,
    /// Tier-2 cap override for secondary contracts.
    pub secondary_tier2_cap: Decimal,
}

/// A flat-rate levy on statutory-base gross, zero before its
/// introduction date.
#[derive(Debug, Clone, Deserialize)]
pub struct LevyRule {
    /// The levy rate.
    pub rate: Decimal,
    /// First date the levy applies; earlier periods owe nothing.
    pub effective_from: NaiveDate,
}

impl LevyRule {
    /// Returns true if the levy applies to the given period.
    pub fn applies_to(&self, period: PayrollPeriod) -> bool {
        period.first_day() >= self.effective_from
    }
}

/// Personal, insurance, and disability reliefs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReliefRules {
    /// Monthly personal relief subtracted from computed tax.
    pub personal_relief_monthly: Decimal,
    /// Share of qualifying insurance premiums granted as relief.
    pub insurance_relief_rate: Decimal,
    /// Monthly cap on insurance relief.
    pub insurance_relief_cap_monthly: Decimal,
    /// Annual exemption subtracted from taxable income for employees
    /// with a disability.
    pub disability_exemption_annual: Decimal,
}

/// Non-cash benefit valuation constants.
#[derive(Debug, Clone, Deserialize)]
pub struct BenefitRules {
    /// Monthly taxable rate on a vehicle's value.
    pub car_monthly_rate: Decimal,
    /// Meal benefit value exempt from tax each month.
    pub meal_exemption_monthly: Decimal,
    /// Housing benefit floor as a share of statutory-base gross.
    pub housing_gross_floor_rate: Decimal,
    /// Flat monthly exemption for unrecognized non-cash benefits.
    pub non_cash_exemption_monthly: Decimal,
}

/// The complete statutory rule set consulted during a payroll run.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryRules {
    /// Progressive tax band schedules, ascending by effective date.
    pub tax_schedules: Vec<TaxBandSchedule>,
    /// Pension contribution rules.
    pub pension: PensionRules,
    /// Health levy.
    pub health_levy: LevyRule,
    /// Affordable housing levy.
    pub housing_levy: LevyRule,
    /// Relief rules.
    pub reliefs: ReliefRules,
    /// Benefit valuation rules.
    pub benefits: BenefitRules,
}

impl StatutoryRules {
    /// Selects the tax schedule active for a period: the latest schedule
    /// whose effective date is on or before the period's first day.
    pub fn tax_schedule_for(&self, period: PayrollPeriod) -> EngineResult<&TaxBandSchedule> {
        self.tax_schedules
            .iter()
            .rfind(|s| s.effective_from <= period.first_day())
            .ok_or(EngineError::RuleNotFound {
                rule: "tax band schedule",
                period,
            })
    }

    /// Selects the pension caps active for a period.
    pub fn pension_caps_for(&self, period: PayrollPeriod) -> EngineResult<&PensionCapRule> {
        self.pension
            .caps
            .iter()
            .rfind(|c| c.effective_from <= period.first_day())
            .ok_or(EngineError::RuleNotFound {
                rule: "pension cap",
                period,
            })
    }

    /// Sorts the effective-dated tables ascending so that latest-active
    /// lookups can scan from the end.
    pub(crate) fn normalize(&mut self) {
        self.tax_schedules
            .sort_by_key(|s| s.effective_from);
        self.pension.caps.sort_by_key(|c| c.effective_from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tax_schedule_selection_uses_latest_effective() {
        let rules = StatutoryRules::builtin();
        let period = PayrollPeriod::new(6, 2025).unwrap();
        let schedule = rules.tax_schedule_for(period).unwrap();
        assert!(schedule.effective_from <= period.first_day());
    }

    #[test]
    fn test_tax_schedule_missing_for_ancient_period() {
        let rules = StatutoryRules::builtin();
        let period = PayrollPeriod::new(1, 1990).unwrap();
        let result = rules.tax_schedule_for(period);
        assert!(matches!(
            result.unwrap_err(),
            EngineError::RuleNotFound { rule: "tax band schedule", .. }
        ));
    }

    #[test]
    fn test_pension_caps_switch_in_february_2025() {
        let rules = StatutoryRules::builtin();

        let january = PayrollPeriod::new(1, 2025).unwrap();
        let caps = rules.pension_caps_for(january).unwrap();
        assert_eq!(caps.tier1_cap, dec("7000"));
        assert_eq!(caps.tier2_cap, dec("36000"));

        let february = PayrollPeriod::new(2, 2025).unwrap();
        let caps = rules.pension_caps_for(february).unwrap();
        assert_eq!(caps.tier1_cap, dec("8000"));
        assert_eq!(caps.tier2_cap, dec("72000"));
    }

    #[test]
    fn test_health_levy_applies_from_october_2024() {
        let rules = StatutoryRules::builtin();
        let before = PayrollPeriod::new(9, 2024).unwrap();
        let after = PayrollPeriod::new(10, 2024).unwrap();
        assert!(!rules.health_levy.applies_to(before));
        assert!(rules.health_levy.applies_to(after));
    }

    #[test]
    fn test_housing_levy_applies_from_july_2023() {
        let rules = StatutoryRules::builtin();
        let before = PayrollPeriod::new(6, 2023).unwrap();
        let after = PayrollPeriod::new(7, 2023).unwrap();
        assert!(!rules.housing_levy.applies_to(before));
        assert!(rules.housing_levy.applies_to(after));
    }
}
