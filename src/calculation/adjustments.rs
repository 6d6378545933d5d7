//! Adjustment resolution.
//!
//! Selects which allowance and deduction assignments are in force for an
//! employee in a payroll period, and resolves their monetary value.
//!
//! Window membership is one code path for recurring and one-shot
//! assignments alike: an assignment applies to period `P` iff
//! `start <= P <= effective end`, where a recurring assignment without an
//! end period runs forever and a one-shot assignment without one is in
//! force only for its start month.

use rust_decimal::Decimal;

use crate::models::{
    AdjustmentTarget, Allowance, CalculationMode, Deduction, Employee, PayrollPeriod,
};

fn window_contains(
    start: PayrollPeriod,
    end: Option<PayrollPeriod>,
    is_recurring: bool,
    period: PayrollPeriod,
) -> bool {
    if period < start {
        return false;
    }
    let effective_end = end.or(if is_recurring { None } else { Some(start) });
    match effective_end {
        Some(end) => period <= end,
        None => true,
    }
}

fn targets_employee(target: &AdjustmentTarget, employee: &Employee) -> bool {
    target.matches(employee)
}

/// Returns true if the allowance assignment is in force for the period.
pub fn allowance_in_force(allowance: &Allowance, period: PayrollPeriod) -> bool {
    window_contains(
        allowance.start,
        allowance.end,
        allowance.is_recurring,
        period,
    )
}

/// Returns true if the deduction assignment is in force for the period.
pub fn deduction_in_force(deduction: &Deduction, period: PayrollPeriod) -> bool {
    window_contains(
        deduction.start,
        deduction.end,
        deduction.is_recurring,
        period,
    )
}

/// Selects the allowances that apply to an employee for a period.
pub fn resolve_allowances<'a>(
    allowances: &'a [Allowance],
    employee: &Employee,
    period: PayrollPeriod,
) -> Vec<&'a Allowance> {
    allowances
        .iter()
        .filter(|a| targets_employee(&a.target, employee) && allowance_in_force(a, period))
        .collect()
}

/// Selects the deductions that apply to an employee for a period.
pub fn resolve_deductions<'a>(
    deductions: &'a [Deduction],
    employee: &Employee,
    period: PayrollPeriod,
) -> Vec<&'a Deduction> {
    deductions
        .iter()
        .filter(|d| targets_employee(&d.target, employee) && deduction_in_force(d, period))
        .collect()
}

/// Resolves an assignment's monetary value against its base.
///
/// Fixed mode returns the literal value; percentage mode takes that share
/// of `base`. The result is clamped to `maximum` when the catalog entry
/// carries a cap.
pub fn resolve_value(
    value: Decimal,
    mode: CalculationMode,
    base: Decimal,
    maximum: Option<Decimal>,
) -> Decimal {
    let resolved = match mode {
        CalculationMode::Fixed => value,
        CalculationMode::Percentage => base * value / Decimal::ONE_HUNDRED,
    };
    match maximum {
        Some(cap) => resolved.min(cap),
        None => resolved,
    }
}
