//! Review workflow engine.
//!
//! Expands (reviewer x line item) into pending review tasks and
//! aggregates their verdicts into line-level status and per-reviewer
//! progress. Pure functions over their inputs; the engine persists the
//! results.

use uuid::Uuid;

use crate::models::{
    PayrollLineItem, ReviewStatus, ReviewTask, Reviewer, ReviewerProgress,
};

/// Creates one pending task per (line item, reviewer) pair.
///
/// The expansion is deterministic: line items in input order, each paired
/// with every reviewer in input order. Every reviewer reviews every line
/// item; no ordering between reviewers is enforced afterwards.
pub fn expand_review_tasks(
    tenant_id: Uuid,
    run_id: Uuid,
    line_items: &[PayrollLineItem],
    reviewers: &[Reviewer],
) -> Vec<ReviewTask> {
    let mut tasks = Vec::with_capacity(line_items.len() * reviewers.len());
    for line in line_items {
        for reviewer in reviewers {
            tasks.push(ReviewTask {
                id: Uuid::new_v4(),
                tenant_id,
                run_id,
                line_item_id: line.id,
                reviewer_id: reviewer.id,
                status: ReviewStatus::Pending,
                reviewed_at: None,
            });
        }
    }
    tasks
}

/// Aggregates one line item's tasks into a single status.
///
/// Rejected if any reviewer rejected; Approved only if every configured
/// reviewer approved; Pending otherwise (including when no reviewers are
/// configured).
pub fn aggregate_line_status(tasks: &[&ReviewTask], reviewer_count: usize) -> ReviewStatus {
    let rejected = tasks
        .iter()
        .filter(|t| t.status == ReviewStatus::Rejected)
        .count();
    if rejected > 0 {
        return ReviewStatus::Rejected;
    }
    let approved = tasks
        .iter()
        .filter(|t| t.status == ReviewStatus::Approved)
        .count();
    if reviewer_count > 0 && approved >= reviewer_count {
        ReviewStatus::Approved
    } else {
        ReviewStatus::Pending
    }
}

/// Builds the per-reviewer completion report for a run.
///
/// `total_items` is the number of line items in the run; each reviewer's
/// pending count is whatever they have neither approved nor rejected.
pub fn reviewer_progress(
    reviewers: &[Reviewer],
    tasks: &[ReviewTask],
    total_items: usize,
) -> Vec<ReviewerProgress> {
    let mut reviewers: Vec<&Reviewer> = reviewers.iter().collect();
    reviewers.sort_by_key(|r| r.level);

    reviewers
        .into_iter()
        .map(|reviewer| {
            let mut approved = 0usize;
            let mut rejected = 0usize;
            for task in tasks.iter().filter(|t| t.reviewer_id == reviewer.id) {
                match task.status {
                    ReviewStatus::Approved => approved += 1,
                    ReviewStatus::Rejected => rejected += 1,
                    ReviewStatus::Pending => {}
                }
            }
            let completion_percentage = if total_items > 0 {
                ((approved as f64 / total_items as f64) * 100.0).round() as u32
            } else {
                0
            };
            ReviewerProgress {
                reviewer_id: reviewer.id,
                reviewer_name: reviewer.name.clone(),
                reviewer_level: reviewer.level,
                total_items,
                approved_items: approved,
                rejected_items: rejected,
                pending_items: total_items - approved - rejected,
                completion_percentage,
            }
        })
        .collect()
}
