//! Request types for the payroll HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{PayrollPeriod, ReviewStatus};
use crate::status::RunStatus;

/// Request body for the sync endpoint.
///
/// The month arrives by name, matching how callers talk about payroll
/// periods; it is parsed into a [`PayrollPeriod`] before any work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Month name, e.g. "March".
    pub month: String,
    /// Calendar year.
    pub year: i32,
}

impl SyncRequest {
    /// Parses the request into a period, rejecting unknown month names.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::from_month_name(&self.month, self.year)
    }
}

/// Request body for the status transition endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// The requested target status.
    pub status: RunStatus,
}

/// Request body for a single review task update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUpdateRequest {
    /// The verdict to record.
    pub status: ReviewStatus,
}

/// Request body for a bulk review task update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReviewUpdateRequest {
    /// The tasks to update.
    pub review_ids: Vec<Uuid>,
    /// The verdict to record on all of them.
    pub status: ReviewStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_request_parses_period() {
        let request: SyncRequest =
            serde_json::from_str(r#"{"month": "March", "year": 2025}"#).unwrap();
        let period = request.period().unwrap();
        assert_eq!(period.month(), 3);
        assert_eq!(period.year(), 2025);
    }

    #[test]
    fn test_sync_request_rejects_unknown_month() {
        let request: SyncRequest =
            serde_json::from_str(r#"{"month": "Thermidor", "year": 2025}"#).unwrap();
        assert!(request.period().is_err());
    }

    #[test]
    fn test_transition_request_deserializes_wire_status() {
        let request: TransitionRequest =
            serde_json::from_str(r#"{"status": "UNDER_REVIEW"}"#).unwrap();
        assert_eq!(request.status, RunStatus::UnderReview);
    }

    #[test]
    fn test_bulk_review_request_deserializes() {
        let json = format!(
            r#"{{"review_ids": ["{}", "{}"], "status": "APPROVED"}}"#,
            Uuid::nil(),
            Uuid::nil()
        );
        let request: BulkReviewUpdateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.review_ids.len(), 2);
        assert_eq!(request.status, ReviewStatus::Approved);
    }
}
