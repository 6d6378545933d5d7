//! Payroll orchestration.
//!
//! [`PayrollEngine`] drives the full computation pass for a period
//! (eligibility, adjustment resolution, statutory calculation, atomic
//! persistence, review-task initialization), guards run status
//! transitions, and services the review operations. Recompute is an
//! idempotent "sync": prior line items and review tasks are replaced
//! wholesale inside one atomic store commit.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::authorize::{Action, Actor, Authorizer, Module};
use crate::calculation::{compute_line_item, is_eligible, LineInputs};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    HelbAccount, PayrollPeriod, PayrollRun, ReviewStatus, ReviewTask, ReviewerProgress, RunTotals,
};
use crate::review::{aggregate_line_status, expand_review_tasks, reviewer_progress};
use crate::rules::StatutoryRules;
use crate::status::RunStatus;
use crate::store::PayrollStore;

/// The result of a successful sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// The run that was computed.
    pub run_id: Uuid,
    /// The run's sequence number.
    pub payroll_number: String,
    /// Whether the run was created by this sync.
    pub is_new_run: bool,
    /// Number of line items written.
    pub employee_count: usize,
    /// Totals over the freshly written line items.
    pub totals: RunTotals,
}

/// Review progress for one run.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStatusReport {
    /// The run's sequence number.
    pub payroll_number: String,
    /// The period the run covers.
    pub period: PayrollPeriod,
    /// The run's current status.
    pub status: RunStatus,
    /// Per-reviewer completion, ordered by level.
    pub steps: Vec<ReviewerProgress>,
}

/// One line item's aggregate review verdict.
#[derive(Debug, Clone, Serialize)]
pub struct LineReviewStatus {
    /// The line item.
    pub line_item_id: Uuid,
    /// Rejected if anyone rejected; approved only if everyone approved.
    pub status: ReviewStatus,
}

/// The payroll computation and workflow engine.
pub struct PayrollEngine {
    store: Arc<dyn PayrollStore>,
    authorizer: Arc<dyn Authorizer>,
    rules: StatutoryRules,
    in_flight: Mutex<HashSet<(Uuid, PayrollPeriod)>>,
}

/// Removes the (tenant, period) key from the in-flight set when the sync
/// pass ends, however it ends.
struct SyncGuard<'a> {
    engine: &'a PayrollEngine,
    key: (Uuid, PayrollPeriod),
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.engine.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

impl PayrollEngine {
    /// Creates an engine over a store and authorizer with the given rules.
    pub fn new(
        store: Arc<dyn PayrollStore>,
        authorizer: Arc<dyn Authorizer>,
        rules: StatutoryRules,
    ) -> Self {
        Self {
            store,
            authorizer,
            rules,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn authorize(&self, actor: &Actor, module: Module, action: Action) -> EngineResult<()> {
        if self
            .authorizer
            .is_allowed(actor.user_id, actor.tenant_id, module, action)
        {
            Ok(())
        } else {
            warn!(user_id = %actor.user_id, tenant_id = %actor.tenant_id, "permission denied");
            Err(EngineError::NotAuthorized)
        }
    }

    fn begin_sync(&self, key: (Uuid, PayrollPeriod)) -> EngineResult<SyncGuard<'_>> {
        let mut in_flight = self.in_flight.lock().map_err(|_| EngineError::Store {
            message: "sync lock poisoned".to_string(),
        })?;
        if !in_flight.insert(key) {
            return Err(EngineError::SyncInProgress { period: key.1 });
        }
        Ok(SyncGuard { engine: self, key })
    }

    /// Computes (or recomputes) the payroll run for a period.
    ///
    /// The pass either commits fully or leaves the store untouched; at
    /// most one sync per (tenant, period) runs at a time. An empty
    /// eligible set is reported as [`EngineError::NoEligibleEmployees`]
    /// without creating or modifying anything.
    pub fn sync(&self, actor: &Actor, period: PayrollPeriod) -> EngineResult<SyncOutcome> {
        self.authorize(actor, Module::Payroll, Action::Update)?;
        let tenant_id = actor.tenant_id;
        let _guard = self.begin_sync((tenant_id, period))?;

        let existing = self.store.find_run(tenant_id, period)?;
        let is_new_run = existing.is_none();

        let employees = self.store.list_employees(tenant_id)?;
        let eligible: Vec<_> = employees
            .into_iter()
            .filter(|e| is_eligible(e, period))
            .collect();
        if eligible.is_empty() {
            info!(%tenant_id, %period, "no eligible employees; run not populated");
            return Err(EngineError::NoEligibleEmployees { period });
        }

        let allowances = self.store.list_allowances(tenant_id)?;
        let deductions = self.store.list_deductions(tenant_id)?;
        let absences: HashMap<Uuid, _> = self
            .store
            .list_absences(tenant_id, period)?
            .into_iter()
            .map(|a| (a.employee_id, a))
            .collect();
        let reviewers = self.store.list_reviewers(tenant_id)?;

        let now = Utc::now();
        let mut run = match existing {
            Some(run) => run,
            None => {
                let sequence = self.store.next_run_sequence(tenant_id, period)?;
                PayrollRun {
                    id: Uuid::new_v4(),
                    tenant_id,
                    period,
                    payroll_number: PayrollRun::payroll_number(period, sequence),
                    status: RunStatus::Draft,
                    totals: RunTotals::default(),
                    locked_by: None,
                    locked_at: None,
                    paid_by: None,
                    paid_at: None,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        let mut line_items = Vec::with_capacity(eligible.len());
        for employee in &eligible {
            let helb_account: Option<HelbAccount> = if employee.pays_helb {
                self.store.helb_account_for(employee.id)?
            } else {
                None
            };
            let line = compute_line_item(
                run.id,
                LineInputs {
                    employee,
                    period,
                    allowances: &allowances,
                    deductions: &deductions,
                    absence: absences.get(&employee.id),
                    helb_account: helb_account.as_ref(),
                },
                &self.rules,
            )?;
            line_items.push(line);
        }

        run.totals = RunTotals::from_line_items(&line_items);
        run.updated_at = now;

        let tasks = expand_review_tasks(tenant_id, run.id, &line_items, &reviewers);

        self.store.commit_run(&run, &line_items, &tasks)?;

        info!(
            run_id = %run.id,
            payroll_number = %run.payroll_number,
            %period,
            employee_count = line_items.len(),
            gross_pay = %run.totals.gross_pay,
            net_pay = %run.totals.net_pay,
            is_new_run,
            "payroll sync committed"
        );

        Ok(SyncOutcome {
            run_id: run.id,
            payroll_number: run.payroll_number.clone(),
            is_new_run,
            employee_count: line_items.len(),
            totals: run.totals,
        })
    }

    fn owned_run(&self, actor: &Actor, run_id: Uuid) -> EngineResult<PayrollRun> {
        match self.store.get_run(run_id)? {
            Some(run) if run.tenant_id == actor.tenant_id => Ok(run),
            _ => Err(EngineError::RunNotFound { run_id }),
        }
    }

    /// Moves a run to a new status through the state machine.
    ///
    /// Entering Locked or Paid records the actor and timestamp; leaving
    /// Locked clears them. Completing a run draws down the statutory
    /// loan balances of its line items.
    pub fn transition(
        &self,
        actor: &Actor,
        run_id: Uuid,
        target: RunStatus,
    ) -> EngineResult<PayrollRun> {
        self.authorize(actor, Module::Payroll, Action::Update)?;
        let mut run = self.owned_run(actor, run_id)?;
        let previous = run.status;
        run.status = previous.transition_to(target)?;

        let now = Utc::now();
        run.updated_at = now;
        match target {
            RunStatus::Locked => {
                run.locked_by = Some(actor.user_id);
                run.locked_at = Some(now);
            }
            RunStatus::Unlocked => {
                run.locked_by = None;
                run.locked_at = None;
            }
            RunStatus::Paid => {
                run.paid_by = Some(actor.user_id);
                run.paid_at = Some(now);
            }
            RunStatus::Completed => {
                // Paid -> Completed is the only path here, so each loan
                // account is drawn down exactly once per run.
                for line in self.store.line_items_for_run(run.id)? {
                    if line.helb_deduction > rust_decimal::Decimal::ZERO {
                        self.store
                            .draw_down_helb(line.employee_id, line.helb_deduction)?;
                    }
                }
            }
            _ => {}
        }

        self.store.update_run(&run)?;
        info!(
            %run_id,
            from = %previous,
            to = %target,
            user_id = %actor.user_id,
            "payroll run transitioned"
        );
        Ok(run)
    }

    /// Deletes a run, permitted only from Draft or Cancelled.
    pub fn delete_run(&self, actor: &Actor, run_id: Uuid) -> EngineResult<()> {
        self.authorize(actor, Module::Payroll, Action::Delete)?;
        let run = self.owned_run(actor, run_id)?;
        if !run.status.is_deletable() {
            return Err(EngineError::RunNotDeletable { status: run.status });
        }
        self.store.delete_run(run_id)?;
        info!(%run_id, "payroll run deleted");
        Ok(())
    }

    /// Per-reviewer completion counts for a run.
    pub fn get_review_status(
        &self,
        actor: &Actor,
        run_id: Uuid,
    ) -> EngineResult<ReviewStatusReport> {
        let run = self.owned_run(actor, run_id)?;
        let reviewers = self.store.list_reviewers(actor.tenant_id)?;
        let tasks = self.store.review_tasks_for_run(run_id)?;
        let total_items = self.store.line_items_for_run(run_id)?.len();

        Ok(ReviewStatusReport {
            payroll_number: run.payroll_number,
            period: run.period,
            status: run.status,
            steps: reviewer_progress(&reviewers, &tasks, total_items),
        })
    }

    /// Aggregate review verdict per line item of a run.
    pub fn get_line_review_statuses(
        &self,
        actor: &Actor,
        run_id: Uuid,
    ) -> EngineResult<Vec<LineReviewStatus>> {
        self.owned_run(actor, run_id)?;
        let reviewer_count = self.store.list_reviewers(actor.tenant_id)?.len();
        let tasks = self.store.review_tasks_for_run(run_id)?;
        let lines = self.store.line_items_for_run(run_id)?;

        Ok(lines
            .iter()
            .map(|line| {
                let line_tasks: Vec<&ReviewTask> = tasks
                    .iter()
                    .filter(|t| t.line_item_id == line.id)
                    .collect();
                LineReviewStatus {
                    line_item_id: line.id,
                    status: aggregate_line_status(&line_tasks, reviewer_count),
                }
            })
            .collect())
    }

    /// Sets one review task's verdict.
    ///
    /// Idempotent single-row write; resetting to Pending clears the
    /// reviewed timestamp.
    pub fn update_review_task(
        &self,
        actor: &Actor,
        task_id: Uuid,
        status: ReviewStatus,
    ) -> EngineResult<ReviewTask> {
        self.authorize(actor, Module::PayrollReview, Action::Approve)?;
        let mut task = self
            .store
            .get_review_task(task_id)?
            .ok_or(EngineError::TaskNotFound { task_id })?;
        if task.tenant_id != actor.tenant_id {
            return Err(EngineError::NotAuthorized);
        }

        task.status = status;
        task.reviewed_at = match status {
            ReviewStatus::Pending => None,
            _ => Some(Utc::now()),
        };
        self.store.update_review_task(&task)?;
        Ok(task)
    }

    /// Sets many review tasks' verdicts at once.
    ///
    /// Every task is verified to belong to the caller's tenant before
    /// any update is applied.
    pub fn bulk_update_review_tasks(
        &self,
        actor: &Actor,
        task_ids: &[Uuid],
        status: ReviewStatus,
    ) -> EngineResult<usize> {
        self.authorize(actor, Module::PayrollReview, Action::Approve)?;

        let mut tasks = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let task = self
                .store
                .get_review_task(task_id)?
                .ok_or(EngineError::TaskNotFound { task_id })?;
            if task.tenant_id != actor.tenant_id {
                return Err(EngineError::NotAuthorized);
            }
            tasks.push(task);
        }

        let reviewed_at = match status {
            ReviewStatus::Pending => None,
            _ => Some(Utc::now()),
        };
        for task in tasks.iter_mut() {
            task.status = status;
            task.reviewed_at = reviewed_at;
            self.store.update_review_task(task)?;
        }
        info!(count = tasks.len(), ?status, "bulk review update applied");
        Ok(tasks.len())
    }
}
