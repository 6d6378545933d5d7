//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation and
//! workflow processing.

use thiserror::Error;
use uuid::Uuid;

use crate::models::PayrollPeriod;
use crate::status::RunStatus;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriod {
///     message: "unknown month name 'Juneteenth'".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid payroll period: unknown month name 'Juneteenth'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested payroll period was malformed.
    #[error("Invalid payroll period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// An adjustment window was inverted (end before start).
    #[error("Invalid adjustment window: end period {end} is before start period {start}")]
    InvalidWindow {
        /// The start of the window.
        start: PayrollPeriod,
        /// The end of the window.
        end: PayrollPeriod,
    },

    /// A run status transition was requested that the state machine forbids.
    #[error("Cannot transition payroll run from {from} to {to}")]
    InvalidTransition {
        /// The run's current status.
        from: RunStatus,
        /// The requested status.
        to: RunStatus,
    },

    /// A run was asked to be deleted from a status that does not permit it.
    #[error("Cannot delete payroll run with status {status}")]
    RunNotDeletable {
        /// The run's current status.
        status: RunStatus,
    },

    /// The caller lacks the required permission. Carries no detail about
    /// whether the referenced records exist.
    #[error("Not authorized")]
    NotAuthorized,

    /// The referenced payroll run does not exist.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The run id that was not found.
        run_id: Uuid,
    },

    /// The referenced review task does not exist.
    #[error("Review task not found: {task_id}")]
    TaskNotFound {
        /// The review task id that was not found.
        task_id: Uuid,
    },

    /// No employee passed the eligibility filter for the period. Distinct
    /// from a hard failure; the run is left unpopulated.
    #[error("No eligible employees for {period}")]
    NoEligibleEmployees {
        /// The period that was requested.
        period: PayrollPeriod,
    },

    /// A unique-key clash on a run or line item. Recompute is the repair
    /// path for this condition.
    #[error("Payroll run already exists for {period}; re-sync to repair")]
    DuplicateRun {
        /// The period of the clashing run.
        period: PayrollPeriod,
    },

    /// A sync is already in flight for this run. Retryable.
    #[error("A payroll sync is already in progress for {period}")]
    SyncInProgress {
        /// The period being recomputed.
        period: PayrollPeriod,
    },

    /// The persisted store or another collaborator failed. Retryable; the
    /// sync pass that observed it made no partial commit.
    #[error("Store operation failed: {message}")]
    Store {
        /// A description of the failure.
        message: String,
    },

    /// Rule-table file was not found at the specified path.
    #[error("Rule file not found: {path}")]
    RulesNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Rule-table file could not be parsed.
    #[error("Failed to parse rule file '{path}': {message}")]
    RulesParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rule version is effective for the requested period.
    #[error("No {rule} rule is effective for {period}")]
    RuleNotFound {
        /// The rule table that was consulted.
        rule: &'static str,
        /// The period for which a rule was requested.
        period: PayrollPeriod,
    },
}

impl EngineError {
    /// Returns true if the operation that produced this error may be
    /// retried without further intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Store { .. } | EngineError::SyncInProgress { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
