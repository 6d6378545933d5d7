//! Non-cash benefit valuation.
//!
//! Converts raw in-kind benefit values into their taxable portion,
//! dispatched on the allowance type's semantic code. Housing depends on
//! statutory-base gross, so housing assignments are deferred by the line
//! assembler and valued in a second pass once that figure is known.

use rust_decimal::Decimal;

use crate::rules::BenefitRules;

/// The valuation rule selected by an allowance type's semantic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenefitKind {
    /// Company vehicle; taxed at a fixed monthly rate of its value.
    Car,
    /// Meals; taxed above a monthly exemption.
    Meal,
    /// Employer-provided housing; valued against statutory-base gross.
    Housing,
    /// Any other in-kind benefit; taxed above a small flat exemption.
    Other,
}

impl BenefitKind {
    /// Maps a semantic code to its valuation rule.
    pub fn from_code(code: &str) -> Self {
        match code {
            "CAR" => BenefitKind::Car,
            "MEAL" => BenefitKind::Meal,
            "HOUSING" => BenefitKind::Housing,
            _ => BenefitKind::Other,
        }
    }
}

/// Taxable value of a company vehicle benefit.
pub fn car_benefit(car_value: Decimal, rules: &BenefitRules) -> Decimal {
    car_value * rules.car_monthly_rate
}

/// Taxable value of a meal benefit: the portion above the exemption.
pub fn meal_benefit(meal_value: Decimal, rules: &BenefitRules) -> Decimal {
    (meal_value - rules.meal_exemption_monthly).max(Decimal::ZERO)
}

/// Taxable value of a housing benefit.
///
/// The greater of the raw housing value and the statutory floor share of
/// the employee's statutory-base gross for the period.
pub fn housing_benefit(
    house_value: Decimal,
    statutory_base_gross: Decimal,
    rules: &BenefitRules,
) -> Decimal {
    let floor = statutory_base_gross * rules.housing_gross_floor_rate;
    floor.max(house_value)
}

/// Taxable value of an unrecognized in-kind benefit: everything above a
/// small flat exemption.
pub fn other_benefit(value: Decimal, rules: &BenefitRules) -> Decimal {
    (value - rules.non_cash_exemption_monthly).max(Decimal::ZERO)
}
