//! Employee model and related types.
//!
//! This module defines the [`Employee`] struct together with its contract,
//! status, payment routing, and statutory loan account types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contract classification, which drives pension-contribution treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Main employment; full tier caps apply.
    Primary,
    /// Secondary employment; tier caps are reduced.
    Secondary,
    /// Consultant engagement; exempt from the tiered contribution.
    Consultant,
}

/// Lifecycle status of an employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    /// The contract is in force.
    Active,
    /// The contract reached its end date.
    Expired,
    /// The contract was ended early.
    Terminated,
}

/// An employment contract attached to an employee.
///
/// An employee must hold an active contract to participate in a payroll
/// run; the contract's end date bounds their eligibility window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentContract {
    /// Unique identifier for the contract.
    pub id: Uuid,
    /// The contract classification.
    pub contract_type: ContractType,
    /// The date the contract takes effect.
    pub start_date: NaiveDate,
    /// The date the contract ends, if bounded.
    pub end_date: Option<NaiveDate>,
    /// The contract's lifecycle status.
    pub status: ContractStatus,
}

/// Employment status of an employee.
///
/// [`EmployeeStatus::excludes_from_payroll`] identifies the statuses that
/// remove an employee from a run once their effective date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// Working normally.
    Active,
    /// On approved leave; still paid.
    OnLeave,
    /// Employment ended.
    Terminated,
    /// Suspended without pay.
    Suspended,
    /// Retired.
    Retired,
}

impl EmployeeStatus {
    /// Returns true if this status excludes the employee from payroll once
    /// its effective date is on or before the period end.
    pub fn excludes_from_payroll(&self) -> bool {
        matches!(
            self,
            EmployeeStatus::Terminated | EmployeeStatus::Suspended | EmployeeStatus::Retired
        )
    }
}

/// How an employee is paid. Routing data only; never used in computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "method")]
pub enum PaymentDetail {
    /// Salary paid into a bank account.
    Bank {
        /// Bank name.
        bank_name: String,
        /// Bank clearing code.
        bank_code: String,
        /// Branch name.
        branch_name: String,
        /// Branch code.
        branch_code: String,
        /// Account number.
        account_number: String,
        /// Account holder name.
        account_name: String,
    },
    /// Salary paid to a mobile money wallet.
    Mobile {
        /// Wallet provider (e.g. "MPESA").
        mobile_type: String,
        /// Wallet phone number.
        phone_number: String,
    },
    /// Salary collected in cash.
    Cash,
}

/// A statutory student-loan account with a fixed monthly deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelbAccount {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// The employee this account belongs to.
    pub employee_id: Uuid,
    /// The lender's account reference.
    pub account_number: String,
    /// The fixed amount deducted each month.
    pub monthly_deduction: Decimal,
    /// The outstanding balance.
    pub current_balance: Decimal,
    /// Whether deductions are currently taken.
    pub active: bool,
}

/// An employee subject to payroll computation.
///
/// Employees are owned by the tenant and read-only to this engine; the
/// statutory opt-in flags gate each contribution type individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The tenant that owns this employee record.
    pub tenant_id: Uuid,
    /// Human-readable staff number.
    pub employee_number: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Department the employee belongs to.
    pub department_id: Option<Uuid>,
    /// Sub-department the employee belongs to.
    pub sub_department_id: Option<Uuid>,
    /// Job title held.
    pub job_title_id: Option<Uuid>,
    /// Monthly base salary.
    pub salary: Decimal,
    /// Whether income tax is withheld.
    pub pays_paye: bool,
    /// Whether the tiered pension contribution is taken.
    pub pays_nssf: bool,
    /// Whether the health levy is taken.
    pub pays_shif: bool,
    /// Whether the housing levy is taken.
    pub pays_housing_levy: bool,
    /// Whether statutory loan repayments are taken.
    pub pays_helb: bool,
    /// Whether the employee qualifies for the disability tax exemption.
    pub has_disability: bool,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Current employment status.
    pub status: EmployeeStatus,
    /// The date the current status took effect.
    pub status_effective_date: Option<NaiveDate>,
    /// The employee's active contract.
    pub contract: EmploymentContract,
    /// Payment routing, consumed only for output.
    pub payment_detail: Option<PaymentDetail>,
}

impl Employee {
    /// The employee's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
