//! Review workflow models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured payroll reviewer for a tenant.
///
/// Reviewers are ordered by level for display; the workflow itself does
/// not enforce an ordering between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    /// Unique identifier for the reviewer assignment.
    pub id: Uuid,
    /// The tenant this reviewer belongs to.
    pub tenant_id: Uuid,
    /// The underlying user.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Position in the review chain, 1-based.
    pub level: u32,
}

/// The status of one review task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    /// Not yet reviewed.
    Pending,
    /// Signed off.
    Approved,
    /// Flagged for rework.
    Rejected,
}

/// One reviewer's verdict on one line item.
///
/// Tasks are created in bulk when a run's line items are (re)computed and
/// destroyed together with them on recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewTask {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// The tenant the task belongs to.
    pub tenant_id: Uuid,
    /// The run the reviewed line item belongs to.
    pub run_id: Uuid,
    /// The line item under review.
    pub line_item_id: Uuid,
    /// The reviewer the task is assigned to.
    pub reviewer_id: Uuid,
    /// Current verdict.
    pub status: ReviewStatus,
    /// When the verdict was given; `None` while pending.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Per-reviewer completion counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerProgress {
    /// The reviewer assignment id.
    pub reviewer_id: Uuid,
    /// The reviewer's display name.
    pub reviewer_name: String,
    /// The reviewer's level in the chain.
    pub reviewer_level: u32,
    /// Line items in the run.
    pub total_items: usize,
    /// Line items this reviewer approved.
    pub approved_items: usize,
    /// Line items this reviewer rejected.
    pub rejected_items: usize,
    /// Line items this reviewer has not yet decided.
    pub pending_items: usize,
    /// Approved share of the total, rounded to whole percent.
    pub completion_percentage: u32,
}
