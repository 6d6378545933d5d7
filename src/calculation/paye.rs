//! Progressive income tax (PAYE).
//!
//! The monthly taxable figure is annualized, reduced by the disability
//! exemption where it applies, pushed through the progressive band table
//! active for the period, brought back to a monthly figure, and reduced
//! by personal relief. The result is floored at zero and rounded up to
//! the next whole shilling.

use rust_decimal::Decimal;

use crate::rules::{ReliefRules, TaxBand, TaxBandSchedule};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Applies the progressive band table to an annual taxable figure.
///
/// Bands are marginal: each band taxes only the income falling inside it.
pub fn progressive_annual_tax(annual_taxable: Decimal, bands: &[TaxBand]) -> Decimal {
    if annual_taxable <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for band in bands {
        if annual_taxable <= lower {
            break;
        }
        let span_top = match band.upper {
            Some(upper) => annual_taxable.min(upper),
            None => annual_taxable,
        };
        tax += (span_top - lower) * band.rate;
        match band.upper {
            Some(upper) => lower = upper,
            None => break,
        }
    }
    tax
}

/// Computes the monthly income tax for a taxable figure.
///
/// # Arguments
///
/// * `monthly_taxable` - Taxable income for the month.
/// * `is_disabled` - Whether the annual disability exemption applies.
/// * `schedule` - The band schedule active for the payroll period.
/// * `reliefs` - Personal relief and exemption amounts.
///
/// # Returns
///
/// The tax due after personal relief, floored at zero and rounded up to
/// the next whole currency unit. Insurance relief is applied separately
/// by the caller once qualifying premiums are known.
pub fn calculate_paye(
    monthly_taxable: Decimal,
    is_disabled: bool,
    schedule: &TaxBandSchedule,
    reliefs: &ReliefRules,
) -> Decimal {
    let mut annual_taxable = monthly_taxable * MONTHS_PER_YEAR;

    if is_disabled {
        annual_taxable = (annual_taxable - reliefs.disability_exemption_annual).max(Decimal::ZERO);
    }

    let annual_tax = progressive_annual_tax(annual_taxable, &schedule.bands);
    let monthly_tax = annual_tax / MONTHS_PER_YEAR;

    (monthly_tax - reliefs.personal_relief_monthly)
        .max(Decimal::ZERO)
        .ceil()
}
