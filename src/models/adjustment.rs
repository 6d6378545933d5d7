//! Adjustment assignments and their catalog types.
//!
//! Allowances and deductions are assigned to a scope (one employee, a
//! department, a sub-department, a job title, or the whole company) for a
//! window of payroll months. Each assignment references a tenant-scoped
//! catalog entry that carries the semantic code and tax treatment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayrollPeriod};

/// The scope an adjustment assignment applies to.
///
/// A closed union: each assignment targets exactly one kind, and the
/// company-wide case carries no id at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "applies_to", content = "target_id")]
pub enum AdjustmentTarget {
    /// A single employee.
    Individual(Uuid),
    /// Every employee in a department.
    Department(Uuid),
    /// Every employee in a sub-department.
    SubDepartment(Uuid),
    /// Every employee holding a job title.
    JobTitle(Uuid),
    /// Every employee of the company.
    Company,
}

impl AdjustmentTarget {
    /// Returns true if this target covers the given employee.
    pub fn matches(&self, employee: &Employee) -> bool {
        match self {
            AdjustmentTarget::Individual(id) => employee.id == *id,
            AdjustmentTarget::Department(id) => employee.department_id == Some(*id),
            AdjustmentTarget::SubDepartment(id) => employee.sub_department_id == Some(*id),
            AdjustmentTarget::JobTitle(id) => employee.job_title_id == Some(*id),
            AdjustmentTarget::Company => true,
        }
    }
}

/// How an assignment's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMode {
    /// The value is a literal monthly amount.
    Fixed,
    /// The value is a percentage of the employee's base pay.
    Percentage,
}

/// Catalog entry for an allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceType {
    /// Unique identifier for the type.
    pub id: Uuid,
    /// The tenant that defined this type.
    pub tenant_id: Uuid,
    /// Semantic code selecting valuation logic (e.g. "HOUSING", "MEAL", "CAR").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the allowance is paid in cash. Non-cash allowances are
    /// valued as taxable benefits instead of being added to cash pay.
    pub is_cash: bool,
    /// Whether the allowance is taxable.
    pub is_taxable: bool,
    /// Upper bound on the resolved value, if capped.
    pub maximum_value: Option<Decimal>,
}

/// Catalog entry for a deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionType {
    /// Unique identifier for the type.
    pub id: Uuid,
    /// The tenant that defined this type.
    pub tenant_id: Uuid,
    /// Semantic code (e.g. "PRMF" for insurance premiums, "MORT").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the deduction reduces taxable income.
    pub is_pre_tax: bool,
    /// Upper bound on the resolved value, if capped.
    pub maximum_value: Option<Decimal>,
}

impl DeductionType {
    /// Returns true if amounts deducted under this type count toward
    /// insurance relief.
    pub fn qualifies_for_insurance_relief(&self) -> bool {
        self.code == "PRMF" || self.name.to_lowercase().contains("insurance")
    }
}

/// Validates an assignment window, rejecting an end period earlier than
/// the start.
pub fn validate_window(
    start: PayrollPeriod,
    end: Option<PayrollPeriod>,
) -> EngineResult<()> {
    if let Some(end) = end {
        if end < start {
            return Err(EngineError::InvalidWindow { start, end });
        }
    }
    Ok(())
}

/// An allowance assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    /// Unique identifier for the assignment.
    pub id: Uuid,
    /// The tenant that owns this assignment.
    pub tenant_id: Uuid,
    /// The scope the assignment applies to.
    pub target: AdjustmentTarget,
    /// The assigned value; meaning depends on `mode`.
    pub value: Decimal,
    /// Fixed amount or percentage of base pay.
    pub mode: CalculationMode,
    /// Whether the assignment repeats every month of its window.
    pub is_recurring: bool,
    /// First payroll month the assignment is in force.
    pub start: PayrollPeriod,
    /// Last payroll month the assignment is in force, if bounded.
    pub end: Option<PayrollPeriod>,
    /// The catalog entry describing this allowance.
    pub allowance_type: AllowanceType,
}

/// A deduction assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier for the assignment.
    pub id: Uuid,
    /// The tenant that owns this assignment.
    pub tenant_id: Uuid,
    /// The scope the assignment applies to.
    pub target: AdjustmentTarget,
    /// The assigned value; meaning depends on `mode`.
    pub value: Decimal,
    /// Fixed amount or percentage of statutory-base gross.
    pub mode: CalculationMode,
    /// Whether the assignment repeats every month of its window.
    pub is_recurring: bool,
    /// First payroll month the assignment is in force.
    pub start: PayrollPeriod,
    /// Last payroll month the assignment is in force, if bounded.
    pub end: Option<PayrollPeriod>,
    /// The catalog entry describing this deduction.
    pub deduction_type: DeductionType,
}
