//! Rule-set loading.
//!
//! Rule tables can be loaded from a YAML file for tenants operating under
//! amended statutory values, or taken from [`StatutoryRules::builtin`],
//! the values in force for Kenyan payroll as of 2025.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::rules::types::{
    BenefitRules, LevyRule, PensionCapRule, PensionRules, ReliefRules, StatutoryRules, TaxBand,
    TaxBandSchedule,
};

// Dates the statutory instruments took effect.
const HOUSING_LEVY_EFFECTIVE: (i32, u32, u32) = (2023, 7, 1);
const HEALTH_LEVY_EFFECTIVE: (i32, u32, u32) = (2024, 10, 1);
const TAX_BANDS_EFFECTIVE: (i32, u32, u32) = (2023, 7, 1);
const PENSION_CAPS_BASE: (i32, u32, u32) = (2014, 1, 1);
const PENSION_CAPS_2025: (i32, u32, u32) = (2025, 2, 1);

fn date(ymd: (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap_or(NaiveDate::MIN)
}

impl StatutoryRules {
    /// Loads a rule set from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the rule file (e.g. "./rules/statutory.yaml")
    ///
    /// # Returns
    ///
    /// Returns the parsed rule set with its effective-dated tables sorted,
    /// or an error if the file is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::RulesNotFound {
            path: path_str.clone(),
        })?;

        let mut rules: StatutoryRules =
            serde_yaml::from_str(&content).map_err(|e| EngineError::RulesParse {
                path: path_str,
                message: e.to_string(),
            })?;

        rules.normalize();
        Ok(rules)
    }

    /// The built-in rule set: Kenyan statutory values as of 2025.
    pub fn builtin() -> Self {
        let mut rules = StatutoryRules {
            tax_schedules: vec![TaxBandSchedule {
                effective_from: date(TAX_BANDS_EFFECTIVE),
                bands: vec![
                    TaxBand {
                        upper: Some(Decimal::from(288_000)),
                        rate: Decimal::new(10, 2),
                    },
                    TaxBand {
                        upper: Some(Decimal::from(388_000)),
                        rate: Decimal::new(25, 2),
                    },
                    TaxBand {
                        upper: Some(Decimal::from(6_000_000)),
                        rate: Decimal::new(30, 2),
                    },
                    TaxBand {
                        upper: Some(Decimal::from(9_600_000)),
                        rate: Decimal::new(325, 3),
                    },
                    TaxBand {
                        upper: None,
                        rate: Decimal::new(35, 2),
                    },
                ],
            }],
            pension: PensionRules {
                rate: Decimal::new(6, 2),
                caps: vec![
                    PensionCapRule {
                        effective_from: date(PENSION_CAPS_BASE),
                        tier1_cap: Decimal::from(7_000),
                        tier2_cap: Decimal::from(36_000),
                    },
                    PensionCapRule {
                        effective_from: date(PENSION_CAPS_2025),
                        tier1_cap: Decimal::from(8_000),
                        tier2_cap: Decimal::from(72_000),
                    },
                ],
                secondary_tier1_cap: Decimal::from(4_500),
                secondary_tier2_cap: Decimal::from(45_000),
            },
            health_levy: LevyRule {
                rate: Decimal::new(275, 4),
                effective_from: date(HEALTH_LEVY_EFFECTIVE),
            },
            housing_levy: LevyRule {
                rate: Decimal::new(15, 3),
                effective_from: date(HOUSING_LEVY_EFFECTIVE),
            },
            reliefs: ReliefRules {
                personal_relief_monthly: Decimal::from(2_400),
                insurance_relief_rate: Decimal::new(15, 2),
                insurance_relief_cap_monthly: Decimal::from(5_000),
                disability_exemption_annual: Decimal::from(150_000),
            },
            benefits: BenefitRules {
                car_monthly_rate: Decimal::new(2, 2),
                meal_exemption_monthly: Decimal::from(5_000),
                housing_gross_floor_rate: Decimal::new(15, 2),
                non_cash_exemption_monthly: Decimal::from(3_000),
            },
        };
        rules.normalize();
        rules
    }
}
