//! Absence records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PayrollPeriod;

/// Days absent for one employee in one payroll month, with the resulting
/// pay deduction already computed by the attendance module.
///
/// The deduction reduces base pay before any adjustment or statutory
/// calculation, and applies to that period only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The tenant that owns this record.
    pub tenant_id: Uuid,
    /// The employee the absence belongs to.
    pub employee_id: Uuid,
    /// The payroll month the absence falls in.
    pub period: PayrollPeriod,
    /// Number of unpaid days absent.
    pub days_absent: u32,
    /// Pre-computed pay deduction for those days.
    pub deduction_amount: Decimal,
}
