//! Flat-rate levies on statutory-base gross.
//!
//! The health levy (SHIF) and the affordable housing levy are each
//! `round(base x rate)`, and owe nothing for periods before the levy's
//! introduction date. The levies were introduced at different historical
//! dates and must not apply retroactively.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PayrollPeriod;
use crate::rules::LevyRule;

/// Computes a levy on statutory-base gross for a period.
///
/// Returns zero for periods strictly before the levy's effective date;
/// otherwise the levied amount rounded to the nearest whole currency
/// unit, half away from zero.
pub fn calculate_levy(
    statutory_base_gross: Decimal,
    period: PayrollPeriod,
    levy: &LevyRule,
) -> Decimal {
    if !levy.applies_to(period) {
        return Decimal::ZERO;
    }
    (statutory_base_gross * levy.rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
