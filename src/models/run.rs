//! Payroll runs and their aggregate totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PayrollLineItem, PayrollPeriod};
use crate::status::RunStatus;

/// Aggregate totals across a run's line items.
///
/// Always recomputed from the lines just written; a run never carries
/// totals from a previous computation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunTotals {
    /// Total gross pay.
    pub gross_pay: Decimal,
    /// Total statutory deductions (PAYE + pension + levies).
    pub statutory_deductions: Decimal,
    /// Total net pay.
    pub net_pay: Decimal,
    /// Total income tax.
    pub paye: Decimal,
    /// Total pension contributions.
    pub nssf: Decimal,
    /// Total health levy.
    pub shif: Decimal,
    /// Total housing levy.
    pub housing_levy: Decimal,
    /// Total statutory loan repayments.
    pub helb: Decimal,
}

impl RunTotals {
    /// Sums the figures of the given line items.
    pub fn from_line_items(lines: &[PayrollLineItem]) -> Self {
        let mut totals = RunTotals::default();
        for line in lines {
            totals.gross_pay += line.gross_pay;
            totals.statutory_deductions += line.total_statutory_deductions;
            totals.net_pay += line.net_pay;
            totals.paye += line.paye_tax;
            totals.nssf += line.nssf_deduction;
            totals.shif += line.shif_deduction;
            totals.housing_levy += line.housing_levy_deduction;
            totals.helb += line.helb_deduction;
        }
        totals
    }
}

/// One payroll run: the per-period container for a tenant's line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The tenant the run belongs to.
    pub tenant_id: Uuid,
    /// The payroll month the run covers.
    pub period: PayrollPeriod,
    /// Human-readable sequence number, e.g. "PR-202503-001".
    pub payroll_number: String,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// Aggregate totals over the current line items.
    pub totals: RunTotals,
    /// Who locked the run, if locked.
    pub locked_by: Option<Uuid>,
    /// When the run was locked, if locked.
    pub locked_at: Option<DateTime<Utc>>,
    /// Who marked the run paid, if paid.
    pub paid_by: Option<Uuid>,
    /// When the run was marked paid, if paid.
    pub paid_at: Option<DateTime<Utc>>,
    /// When the run was first created.
    pub created_at: DateTime<Utc>,
    /// When the run was last recomputed or transitioned.
    pub updated_at: DateTime<Utc>,
}

impl PayrollRun {
    /// Builds the human-readable sequence number for a run.
    ///
    /// `sequence` is the 1-based count of runs ever created for the
    /// period, zero-padded to three digits.
    pub fn payroll_number(period: PayrollPeriod, sequence: u32) -> String {
        format!(
            "PR-{}{:02}-{:03}",
            period.year(),
            period.month(),
            sequence
        )
    }
}
