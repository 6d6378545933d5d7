//! Payroll eligibility filtering.
//!
//! Decides whether an employee participates in a payroll period, based on
//! hire date, contract window, and the effective date of an excluding
//! status. A pure predicate with no error cases.

use crate::models::{ContractStatus, Employee, PayrollPeriod};

/// Returns true if the employee participates in the given period.
///
/// An employee is eligible iff:
/// - they were hired on or before the last calendar day of the period,
/// - they hold an active contract whose end date (if any) is not earlier
///   than that day, and
/// - they do not carry an excluding status (terminated, suspended,
///   retired) whose effective date is on or before that day.
pub fn is_eligible(employee: &Employee, period: PayrollPeriod) -> bool {
    let period_end = period.last_day();

    if employee.hire_date > period_end {
        return false;
    }

    if employee.contract.status != ContractStatus::Active {
        return false;
    }
    if let Some(contract_end) = employee.contract.end_date {
        if contract_end < period_end {
            return false;
        }
    }

    if employee.status.excludes_from_payroll() {
        if let Some(effective) = employee.status_effective_date {
            if effective <= period_end {
                return false;
            }
        }
    }

    true
}
