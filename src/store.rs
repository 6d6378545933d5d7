//! Persistence seam.
//!
//! The engine talks to the external relational store through the
//! [`PayrollStore`] trait: point lookups by tenant and period, filtered
//! scans by tenant, batch insert, and batch delete by parent key. The
//! delete-then-recreate recompute is a single atomic operation,
//! [`PayrollStore::commit_run`], so a failure partway can never leave a
//! run holding line items from two computation passes.
//!
//! [`MemoryStore`] is the in-process implementation used by tests,
//! benchmarks, and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsenceRecord, Allowance, Deduction, Employee, HelbAccount, PayrollLineItem, PayrollPeriod,
    PayrollRun, ReviewTask, Reviewer,
};

/// Read/write access to the persisted payroll entities.
///
/// Implementations must make [`commit_run`](PayrollStore::commit_run) and
/// [`delete_run`](PayrollStore::delete_run) atomic: either every write in
/// the operation lands or none does.
pub trait PayrollStore: Send + Sync {
    /// Finds the run for a tenant and period, if one exists.
    fn find_run(&self, tenant_id: Uuid, period: PayrollPeriod)
        -> EngineResult<Option<PayrollRun>>;

    /// Fetches a run by id.
    fn get_run(&self, run_id: Uuid) -> EngineResult<Option<PayrollRun>>;

    /// Reserves the next sequence number for a (tenant, period) counter.
    /// Sequence numbers are never reused, even after deletion.
    fn next_run_sequence(&self, tenant_id: Uuid, period: PayrollPeriod) -> EngineResult<u32>;

    /// Writes updated run fields (status, totals, stamps).
    fn update_run(&self, run: &PayrollRun) -> EngineResult<()>;

    /// Deletes a run with its review tasks and line items, in that order.
    fn delete_run(&self, run_id: Uuid) -> EngineResult<()>;

    /// All employees of a tenant, contracts embedded.
    fn list_employees(&self, tenant_id: Uuid) -> EngineResult<Vec<Employee>>;

    /// All allowance assignments of a tenant.
    fn list_allowances(&self, tenant_id: Uuid) -> EngineResult<Vec<Allowance>>;

    /// All deduction assignments of a tenant.
    fn list_deductions(&self, tenant_id: Uuid) -> EngineResult<Vec<Deduction>>;

    /// Absence records of a tenant for one period.
    fn list_absences(
        &self,
        tenant_id: Uuid,
        period: PayrollPeriod,
    ) -> EngineResult<Vec<AbsenceRecord>>;

    /// The statutory loan account of an employee, if any.
    fn helb_account_for(&self, employee_id: Uuid) -> EngineResult<Option<HelbAccount>>;

    /// Subtracts a repayment from an employee's active loan balance.
    fn draw_down_helb(&self, employee_id: Uuid, amount: Decimal) -> EngineResult<()>;

    /// The tenant's configured reviewers.
    fn list_reviewers(&self, tenant_id: Uuid) -> EngineResult<Vec<Reviewer>>;

    /// Atomically replaces a run's artifacts: deletes its review tasks,
    /// then its line items, inserts the new batches, and upserts the run
    /// record itself.
    fn commit_run(
        &self,
        run: &PayrollRun,
        line_items: &[PayrollLineItem],
        tasks: &[ReviewTask],
    ) -> EngineResult<()>;

    /// Line items of a run.
    fn line_items_for_run(&self, run_id: Uuid) -> EngineResult<Vec<PayrollLineItem>>;

    /// Review tasks of a run.
    fn review_tasks_for_run(&self, run_id: Uuid) -> EngineResult<Vec<ReviewTask>>;

    /// Fetches a review task by id.
    fn get_review_task(&self, task_id: Uuid) -> EngineResult<Option<ReviewTask>>;

    /// Writes an updated review task.
    fn update_review_task(&self, task: &ReviewTask) -> EngineResult<()>;
}

#[derive(Default)]
struct MemoryTables {
    runs: HashMap<Uuid, PayrollRun>,
    run_counters: HashMap<(Uuid, PayrollPeriod), u32>,
    employees: HashMap<Uuid, Employee>,
    allowances: HashMap<Uuid, Allowance>,
    deductions: HashMap<Uuid, Deduction>,
    absences: Vec<AbsenceRecord>,
    helb_accounts: HashMap<Uuid, HelbAccount>,
    reviewers: HashMap<Uuid, Reviewer>,
    line_items: HashMap<Uuid, PayrollLineItem>,
    review_tasks: HashMap<Uuid, ReviewTask>,
}

/// An in-memory [`PayrollStore`].
///
/// All tables live behind one mutex, which is what makes `commit_run`
/// and `delete_run` atomic with respect to every other operation.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<MemoryTables>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an employee.
    pub fn insert_employee(&self, employee: Employee) {
        self.lock().employees.insert(employee.id, employee);
    }

    /// Seeds an allowance assignment.
    pub fn insert_allowance(&self, allowance: Allowance) {
        self.lock().allowances.insert(allowance.id, allowance);
    }

    /// Seeds a deduction assignment.
    pub fn insert_deduction(&self, deduction: Deduction) {
        self.lock().deductions.insert(deduction.id, deduction);
    }

    /// Seeds an absence record.
    pub fn insert_absence(&self, absence: AbsenceRecord) {
        self.lock().absences.push(absence);
    }

    /// Seeds a statutory loan account.
    pub fn insert_helb_account(&self, account: HelbAccount) {
        self.lock()
            .helb_accounts
            .insert(account.employee_id, account);
    }

    /// Seeds a reviewer.
    pub fn insert_reviewer(&self, reviewer: Reviewer) {
        self.lock().reviewers.insert(reviewer.id, reviewer);
    }

    /// Makes the next `commit_run` fail with a store error, leaving the
    /// tables untouched. Used to exercise abort semantics.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryTables> {
        // A panic mid-write can only come from an allocation failure;
        // the tables are still structurally sound, so recover the guard.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PayrollStore for MemoryStore {
    fn find_run(
        &self,
        tenant_id: Uuid,
        period: PayrollPeriod,
    ) -> EngineResult<Option<PayrollRun>> {
        let tables = self.lock();
        Ok(tables
            .runs
            .values()
            .find(|r| r.tenant_id == tenant_id && r.period == period)
            .cloned())
    }

    fn get_run(&self, run_id: Uuid) -> EngineResult<Option<PayrollRun>> {
        Ok(self.lock().runs.get(&run_id).cloned())
    }

    fn next_run_sequence(&self, tenant_id: Uuid, period: PayrollPeriod) -> EngineResult<u32> {
        let mut tables = self.lock();
        let counter = tables.run_counters.entry((tenant_id, period)).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    fn update_run(&self, run: &PayrollRun) -> EngineResult<()> {
        let mut tables = self.lock();
        if !tables.runs.contains_key(&run.id) {
            return Err(EngineError::Store {
                message: format!("run {} does not exist", run.id),
            });
        }
        tables.runs.insert(run.id, run.clone());
        Ok(())
    }

    fn delete_run(&self, run_id: Uuid) -> EngineResult<()> {
        let mut tables = self.lock();
        tables.review_tasks.retain(|_, t| t.run_id != run_id);
        tables.line_items.retain(|_, l| l.run_id != run_id);
        tables.runs.remove(&run_id);
        Ok(())
    }

    fn list_employees(&self, tenant_id: Uuid) -> EngineResult<Vec<Employee>> {
        let tables = self.lock();
        let mut employees: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
        Ok(employees)
    }

    fn list_allowances(&self, tenant_id: Uuid) -> EngineResult<Vec<Allowance>> {
        let tables = self.lock();
        Ok(tables
            .allowances
            .values()
            .filter(|a| a.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    fn list_deductions(&self, tenant_id: Uuid) -> EngineResult<Vec<Deduction>> {
        let tables = self.lock();
        Ok(tables
            .deductions
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    fn list_absences(
        &self,
        tenant_id: Uuid,
        period: PayrollPeriod,
    ) -> EngineResult<Vec<AbsenceRecord>> {
        let tables = self.lock();
        Ok(tables
            .absences
            .iter()
            .filter(|a| a.tenant_id == tenant_id && a.period == period)
            .cloned()
            .collect())
    }

    fn helb_account_for(&self, employee_id: Uuid) -> EngineResult<Option<HelbAccount>> {
        Ok(self.lock().helb_accounts.get(&employee_id).cloned())
    }

    fn draw_down_helb(&self, employee_id: Uuid, amount: Decimal) -> EngineResult<()> {
        let mut tables = self.lock();
        if let Some(account) = tables.helb_accounts.get_mut(&employee_id) {
            if account.active {
                account.current_balance -= amount;
            }
        }
        Ok(())
    }

    fn list_reviewers(&self, tenant_id: Uuid) -> EngineResult<Vec<Reviewer>> {
        let tables = self.lock();
        let mut reviewers: Vec<Reviewer> = tables
            .reviewers
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        reviewers.sort_by_key(|r| r.level);
        Ok(reviewers)
    }

    fn commit_run(
        &self,
        run: &PayrollRun,
        line_items: &[PayrollLineItem],
        tasks: &[ReviewTask],
    ) -> EngineResult<()> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(EngineError::Store {
                message: "simulated commit failure".to_string(),
            });
        }

        let mut tables = self.lock();
        // Review tasks reference line items, so they go first.
        tables.review_tasks.retain(|_, t| t.run_id != run.id);
        tables.line_items.retain(|_, l| l.run_id != run.id);
        for line in line_items {
            tables.line_items.insert(line.id, line.clone());
        }
        for task in tasks {
            tables.review_tasks.insert(task.id, task.clone());
        }
        tables.runs.insert(run.id, run.clone());
        Ok(())
    }

    fn line_items_for_run(&self, run_id: Uuid) -> EngineResult<Vec<PayrollLineItem>> {
        let tables = self.lock();
        Ok(tables
            .line_items
            .values()
            .filter(|l| l.run_id == run_id)
            .cloned()
            .collect())
    }

    fn review_tasks_for_run(&self, run_id: Uuid) -> EngineResult<Vec<ReviewTask>> {
        let tables = self.lock();
        Ok(tables
            .review_tasks
            .values()
            .filter(|t| t.run_id == run_id)
            .cloned()
            .collect())
    }

    fn get_review_task(&self, task_id: Uuid) -> EngineResult<Option<ReviewTask>> {
        Ok(self.lock().review_tasks.get(&task_id).cloned())
    }

    fn update_review_task(&self, task: &ReviewTask) -> EngineResult<()> {
        let mut tables = self.lock();
        if !tables.review_tasks.contains_key(&task.id) {
            return Err(EngineError::Store {
                message: format!("review task {} does not exist", task.id),
            });
        }
        tables.review_tasks.insert(task.id, task.clone());
        Ok(())
    }
}
