//! Domain models for the payroll engine.
//!
//! This module contains the data types shared across the engine:
//! employees and their contracts, adjustment assignments and catalogs,
//! payroll periods, absence records, runs, line items, and the review
//! workflow entities.

mod absence;
mod adjustment;
mod employee;
mod line_item;
mod period;
mod review;
mod run;

pub use absence::AbsenceRecord;
pub use adjustment::{
    AdjustmentTarget, Allowance, AllowanceType, CalculationMode, Deduction, DeductionType,
    validate_window,
};
pub use employee::{
    ContractStatus, ContractType, Employee, EmployeeStatus, EmploymentContract, HelbAccount,
    PaymentDetail,
};
pub use line_item::{AllowanceClass, AllowanceDetail, DeductionDetail, PayrollLineItem};
pub use period::PayrollPeriod;
pub use review::{ReviewStatus, ReviewTask, Reviewer, ReviewerProgress};
pub use run::{PayrollRun, RunTotals};
