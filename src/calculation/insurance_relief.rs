//! Insurance relief.
//!
//! A share of qualifying insurance premiums is granted as relief against
//! computed income tax, up to a monthly cap. The relief can only reduce
//! the tax to zero, never below.

use rust_decimal::Decimal;

use crate::rules::ReliefRules;

/// Computes the relief earned by qualifying premiums.
pub fn insurance_relief(qualifying_premiums: Decimal, reliefs: &ReliefRules) -> Decimal {
    (qualifying_premiums * reliefs.insurance_relief_rate)
        .min(reliefs.insurance_relief_cap_monthly)
        .max(Decimal::ZERO)
}

/// Applies relief to a computed tax amount, flooring at zero.
pub fn apply_insurance_relief(tax: Decimal, relief: Decimal) -> Decimal {
    (tax - relief).max(Decimal::ZERO)
}
