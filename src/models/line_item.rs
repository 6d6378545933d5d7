//! Per-employee payroll line items.
//!
//! A [`PayrollLineItem`] is the computed payroll record for one employee
//! in one run. It carries every aggregate figure plus an itemized
//! breakdown of the adjustments that produced them, for audit and
//! downstream reporting. Line items are always replaced wholesale when a
//! run is recomputed, never patched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PaymentDetail;

/// Whether an applied allowance was cash or an in-kind benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllowanceClass {
    /// Paid out in cash; part of statutory-base gross.
    Cash,
    /// In-kind benefit; only its taxable value enters gross pay.
    NonCash,
}

/// One applied allowance within a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceDetail {
    /// Semantic code of the allowance type.
    pub code: String,
    /// Name of the allowance type.
    pub name: String,
    /// Cash or in-kind.
    pub class: AllowanceClass,
    /// The resolved assignment value before benefit valuation.
    pub raw_value: Decimal,
    /// The amount that entered pay: the cash amount for cash allowances,
    /// the taxable benefit value for in-kind ones.
    pub value: Decimal,
    /// Whether the amount is taxable.
    pub is_taxable: bool,
}

/// One applied deduction within a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionDetail {
    /// Semantic code of the deduction type.
    pub code: String,
    /// Name of the deduction type.
    pub name: String,
    /// The resolved amount deducted.
    pub value: Decimal,
    /// Whether the deduction reduced taxable income.
    pub is_pre_tax: bool,
}

/// The computed payroll record for one employee in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollLineItem {
    /// Unique identifier for the line item.
    pub id: Uuid,
    /// The run this line belongs to.
    pub run_id: Uuid,
    /// The employee this line is for.
    pub employee_id: Uuid,
    /// Monthly salary before any adjustment.
    pub basic_salary: Decimal,
    /// Pay removed for unpaid absence this period.
    pub absence_deduction: Decimal,
    /// Sum of cash allowances.
    pub total_cash_allowances: Decimal,
    /// Sum of taxable in-kind benefit values.
    pub total_non_cash_benefits: Decimal,
    /// Base pay after absence plus cash allowances; the base for levies
    /// and contributions.
    pub statutory_base_gross: Decimal,
    /// Statutory-base gross plus taxable in-kind benefits.
    pub gross_pay: Decimal,
    /// Gross pay less pension, levies, and pre-tax deductions.
    pub taxable_income: Decimal,
    /// Income tax after personal and insurance relief.
    pub paye_tax: Decimal,
    /// Insurance relief subtracted from the computed tax.
    pub insurance_relief: Decimal,
    /// Tier-1 pension contribution.
    pub nssf_tier1: Decimal,
    /// Tier-2 pension contribution.
    pub nssf_tier2: Decimal,
    /// Total pension contribution.
    pub nssf_deduction: Decimal,
    /// Health levy.
    pub shif_deduction: Decimal,
    /// Affordable housing levy.
    pub housing_levy_deduction: Decimal,
    /// Statutory loan repayment.
    pub helb_deduction: Decimal,
    /// PAYE + pension + levies.
    pub total_statutory_deductions: Decimal,
    /// Pre-tax deductions applied before PAYE.
    pub total_pre_tax_deductions: Decimal,
    /// Post-tax deductions, including the loan repayment.
    pub total_other_deductions: Decimal,
    /// Everything withheld from gross pay.
    pub total_deductions: Decimal,
    /// Gross pay less total deductions.
    pub net_pay: Decimal,
    /// Payment routing snapshot taken at computation time.
    pub payment_detail: Option<PaymentDetail>,
    /// Itemized allowances applied to this line.
    pub allowance_details: Vec<AllowanceDetail>,
    /// Itemized deductions applied to this line.
    pub deduction_details: Vec<DeductionDetail>,
}
