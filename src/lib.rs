//! Payroll computation and review workflow engine.
//!
//! This crate computes monthly payroll for the employees of a tenant
//! organization: eligibility filtering, date-windowed allowance and
//! deduction resolution, Kenyan statutory calculations (PAYE, the
//! two-tier NSSF contribution, SHIF, the affordable housing levy, HELB
//! repayments), idempotent run recomputation, a reviewer-per-line-item
//! approval pipeline, and a guarded run status state machine.

#![warn(missing_docs)]

pub mod api;
pub mod authorize;
pub mod calculation;
pub mod engine;
pub mod error;
pub mod import;
pub mod models;
pub mod review;
pub mod rules;
pub mod status;
pub mod store;
