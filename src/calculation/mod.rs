//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions: eligibility
//! filtering, adjustment resolution, non-cash benefit valuation,
//! progressive income tax, the two-tier pension contribution, flat-rate
//! levies, insurance relief, and the per-employee line-item assembly that
//! strings them together.

mod adjustments;
mod benefits;
mod eligibility;
mod insurance_relief;
mod levies;
mod line;
mod nssf;
mod paye;

pub use adjustments::{
    allowance_in_force, deduction_in_force, resolve_allowances, resolve_deductions, resolve_value,
};
pub use benefits::{car_benefit, housing_benefit, meal_benefit, other_benefit, BenefitKind};
pub use eligibility::is_eligible;
pub use insurance_relief::{apply_insurance_relief, insurance_relief};
pub use levies::calculate_levy;
pub use line::{compute_line_item, LineInputs};
pub use nssf::{calculate_nssf, NssfContribution};
pub use paye::{calculate_paye, progressive_annual_tax};
