//! Integration tests for the payroll engine HTTP API.
//!
//! This suite drives the axum router end to end over an in-memory store:
//! - full sync with hand-derived statutory figures
//! - idempotent recompute
//! - the empty-eligible-set outcome
//! - benefit valuation (housing, meal)
//! - status transitions, including rejected ones
//! - review status, single and bulk review updates
//! - run deletion guards
//! - authentication/authorization errors

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;
use uuid::Uuid;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::authorize::AllowAll;
use payroll_engine::engine::PayrollEngine;
use payroll_engine::models::{
    AdjustmentTarget, Allowance, AllowanceType, CalculationMode, ContractStatus, ContractType,
    Employee, EmployeeStatus, EmploymentContract, PayrollPeriod, Reviewer,
};
use payroll_engine::rules::StatutoryRules;
use payroll_engine::store::MemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

struct Fixture {
    router: Router,
    store: Arc<MemoryStore>,
    tenant_id: Uuid,
    user_id: Uuid,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let engine = PayrollEngine::new(
        store.clone(),
        Arc::new(AllowAll),
        StatutoryRules::builtin(),
    );
    Fixture {
        router: create_router(AppState::new(engine)),
        store,
        tenant_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
    }
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn json_decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal field should be a string")).unwrap()
}

fn employee(tenant_id: Uuid, number: &str, salary: &str) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        tenant_id,
        employee_number: number.to_string(),
        first_name: "Test".to_string(),
        last_name: number.to_string(),
        department_id: None,
        sub_department_id: None,
        job_title_id: None,
        salary: decimal(salary),
        pays_paye: true,
        pays_nssf: true,
        pays_shif: true,
        pays_housing_levy: true,
        pays_helb: false,
        has_disability: false,
        hire_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        status: EmployeeStatus::Active,
        status_effective_date: None,
        contract: EmploymentContract {
            id: Uuid::new_v4(),
            contract_type: ContractType::Primary,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: None,
            status: ContractStatus::Active,
        },
        payment_detail: None,
    }
}

async fn send(
    router: Router,
    method: &str,
    uri: &str,
    user_id: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn sync(f: &Fixture, month: &str, year: i32) -> (StatusCode, Value) {
    send(
        f.router.clone(),
        "POST",
        &format!("/companies/{}/payroll/sync", f.tenant_id),
        Some(f.user_id),
        Some(json!({ "month": month, "year": year })),
    )
    .await
}

async fn transition(f: &Fixture, run_id: &str, status: &str) -> (StatusCode, Value) {
    send(
        f.router.clone(),
        "POST",
        &format!("/companies/{}/payroll/runs/{}/status", f.tenant_id, run_id),
        Some(f.user_id),
        Some(json!({ "status": status })),
    )
    .await
}

// =============================================================================
// Sync
// =============================================================================

#[tokio::test]
async fn test_sync_single_employee_matches_hand_derived_figures() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));

    let (status, body) = sync(&f, "June", 2025).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_new_run"], json!(true));
    assert_eq!(body["employee_count"], json!(1));
    assert_eq!(body["payroll_number"], json!("PR-202506-001"));

    let totals = &body["totals"];
    assert_eq!(json_decimal(&totals["gross_pay"]), decimal("50000"));
    assert_eq!(json_decimal(&totals["nssf"]), decimal("3000"));
    assert_eq!(json_decimal(&totals["shif"]), decimal("1375"));
    assert_eq!(json_decimal(&totals["housing_levy"]), decimal("750"));
    assert_eq!(json_decimal(&totals["paye"]), decimal("5846"));
    assert_eq!(
        json_decimal(&totals["statutory_deductions"]),
        decimal("10971")
    );
    assert_eq!(json_decimal(&totals["net_pay"]), decimal("39029"));
}

#[tokio::test]
async fn test_sync_twice_is_idempotent() {
    let f = fixture();
    for i in 0..3 {
        f.store
            .insert_employee(employee(f.tenant_id, &format!("EMP-{i:03}"), "50000"));
    }

    let (_, first) = sync(&f, "June", 2025).await;
    let (status, second) = sync(&f, "June", 2025).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["is_new_run"], json!(false));
    assert_eq!(first["run_id"], second["run_id"]);
    assert_eq!(first["totals"], second["totals"]);
    assert_eq!(second["employee_count"], json!(3));

    let run_id = Uuid::parse_str(first["run_id"].as_str().unwrap()).unwrap();
    use payroll_engine::store::PayrollStore;
    assert_eq!(f.store.line_items_for_run(run_id).unwrap().len(), 3);
}

#[tokio::test]
async fn test_sync_with_housing_benefit() {
    let f = fixture();
    let worker = employee(f.tenant_id, "EMP-001", "70000");
    let worker_id = worker.id;
    f.store.insert_employee(worker);

    // 10,000 cash transport + raw 10,000 housing: statutory base 80,000,
    // housing benefit max(12,000, 10,000) = 12,000.
    f.store.insert_allowance(Allowance {
        id: Uuid::new_v4(),
        tenant_id: f.tenant_id,
        target: AdjustmentTarget::Individual(worker_id),
        value: decimal("10000"),
        mode: CalculationMode::Fixed,
        is_recurring: true,
        start: PayrollPeriod::new(1, 2024).unwrap(),
        end: None,
        allowance_type: AllowanceType {
            id: Uuid::new_v4(),
            tenant_id: f.tenant_id,
            code: "TRANSPORT".to_string(),
            name: "Transport allowance".to_string(),
            is_cash: true,
            is_taxable: true,
            maximum_value: None,
        },
    });
    f.store.insert_allowance(Allowance {
        id: Uuid::new_v4(),
        tenant_id: f.tenant_id,
        target: AdjustmentTarget::Individual(worker_id),
        value: decimal("10000"),
        mode: CalculationMode::Fixed,
        is_recurring: true,
        start: PayrollPeriod::new(1, 2024).unwrap(),
        end: None,
        allowance_type: AllowanceType {
            id: Uuid::new_v4(),
            tenant_id: f.tenant_id,
            code: "HOUSING".to_string(),
            name: "Staff housing".to_string(),
            is_cash: false,
            is_taxable: true,
            maximum_value: None,
        },
    });

    let (status, body) = sync(&f, "June", 2025).await;

    assert_eq!(status, StatusCode::OK);
    // 80,000 statutory base + 12,000 housing benefit
    assert_eq!(json_decimal(&body["totals"]["gross_pay"]), decimal("92000"));

    let run_id = Uuid::parse_str(body["run_id"].as_str().unwrap()).unwrap();
    use payroll_engine::store::PayrollStore;
    let line = f.store.line_items_for_run(run_id).unwrap().remove(0);
    assert_eq!(line.statutory_base_gross, decimal("80000"));
    assert_eq!(line.total_non_cash_benefits, decimal("12000"));
}

#[tokio::test]
async fn test_sync_without_eligible_employees_is_distinct_404() {
    let f = fixture();

    let (status, body) = sync(&f, "June", 2025).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NO_ELIGIBLE_EMPLOYEES"));
}

#[tokio::test]
async fn test_sync_rejects_unknown_month() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));

    let (status, body) = sync(&f, "Brumaire", 2025).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert!(body["message"].as_str().unwrap().contains("Brumaire"));
}

#[tokio::test]
async fn test_sync_requires_caller_identity() {
    let f = fixture();
    let (status, body) = send(
        f.router.clone(),
        "POST",
        &format!("/companies/{}/payroll/sync", f.tenant_id),
        None,
        Some(json!({ "month": "June", "year": 2025 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("MISSING_USER"));
}

#[tokio::test]
async fn test_sync_rejects_malformed_body() {
    let f = fixture();
    let (status, body) = send(
        f.router.clone(),
        "POST",
        &format!("/companies/{}/payroll/sync", f.tenant_id),
        Some(f.user_id),
        Some(json!({ "year": 2025 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
}

// =============================================================================
// Status transitions
// =============================================================================

#[tokio::test]
async fn test_full_lifecycle_to_completed() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));
    let (_, body) = sync(&f, "June", 2025).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();

    for target in ["UNDER_REVIEW", "APPROVED", "LOCKED", "PAID", "COMPLETED"] {
        let (status, body) = transition(&f, &run_id, target).await;
        assert_eq!(status, StatusCode::OK, "transition to {target}: {body}");
        assert_eq!(body["status"], json!(target));
    }
}

#[tokio::test]
async fn test_under_review_to_locked_is_rejected_with_both_states_named() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));
    let (_, body) = sync(&f, "June", 2025).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();

    transition(&f, &run_id, "UNDER_REVIEW").await;
    let (status, body) = transition(&f, &run_id, "LOCKED").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_TRANSITION"));
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("UNDER_REVIEW"));
    assert!(message.contains("LOCKED"));
}

#[tokio::test]
async fn test_locking_records_actor() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));
    let (_, body) = sync(&f, "June", 2025).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();

    transition(&f, &run_id, "UNDER_REVIEW").await;
    transition(&f, &run_id, "APPROVED").await;
    let (status, body) = transition(&f, &run_id, "LOCKED").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locked_by"], json!(f.user_id.to_string()));
    assert!(body["locked_at"].is_string());
}

#[tokio::test]
async fn test_transition_on_unknown_run_is_404() {
    let f = fixture();
    let (status, body) = transition(&f, &Uuid::new_v4().to_string(), "PREPARED").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("RUN_NOT_FOUND"));
}

// =============================================================================
// Review workflow
// =============================================================================

async fn fixture_with_reviewed_run(reviewer_count: u32) -> (Fixture, String, Vec<Uuid>) {
    let f = fixture();
    for i in 0..2 {
        f.store
            .insert_employee(employee(f.tenant_id, &format!("EMP-{i:03}"), "50000"));
    }
    for level in 1..=reviewer_count {
        f.store.insert_reviewer(Reviewer {
            id: Uuid::new_v4(),
            tenant_id: f.tenant_id,
            user_id: Uuid::new_v4(),
            name: format!("Reviewer {level}"),
            level,
        });
    }
    let (_, body) = sync(&f, "June", 2025).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();

    use payroll_engine::store::PayrollStore;
    let task_ids = f
        .store
        .review_tasks_for_run(Uuid::parse_str(&run_id).unwrap())
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    (f, run_id, task_ids)
}

#[tokio::test]
async fn test_review_status_reports_per_reviewer_progress() {
    let (f, run_id, task_ids) = fixture_with_reviewed_run(2).await;
    assert_eq!(task_ids.len(), 4);

    // One reviewer approves one line item.
    let (status, _) = send(
        f.router.clone(),
        "PATCH",
        &format!(
            "/companies/{}/payroll/reviews/{}",
            f.tenant_id, task_ids[0]
        ),
        Some(f.user_id),
        Some(json!({ "status": "APPROVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        f.router.clone(),
        "GET",
        &format!(
            "/companies/{}/payroll/runs/{}/review-status",
            f.tenant_id, run_id
        ),
        Some(f.user_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payroll_number"], json!("PR-202506-001"));
    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["total_items"], json!(2));
    let total_approved: u64 = steps
        .iter()
        .map(|s| s["approved_items"].as_u64().unwrap())
        .sum();
    assert_eq!(total_approved, 1);
}

#[tokio::test]
async fn test_line_aggregate_requires_every_reviewer() {
    let (f, run_id, task_ids) = fixture_with_reviewed_run(2).await;

    // Approve every task: both lines become APPROVED.
    let (status, body) = send(
        f.router.clone(),
        "PATCH",
        &format!("/companies/{}/payroll/reviews", f.tenant_id),
        Some(f.user_id),
        Some(json!({
            "review_ids": task_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            "status": "APPROVED"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], json!(4));

    let (_, lines) = send(
        f.router.clone(),
        "GET",
        &format!(
            "/companies/{}/payroll/runs/{}/line-reviews",
            f.tenant_id, run_id
        ),
        Some(f.user_id),
        None,
    )
    .await;
    for line in lines.as_array().unwrap() {
        assert_eq!(line["status"], json!("APPROVED"));
    }

    // One rejection flips its line to REJECTED.
    send(
        f.router.clone(),
        "PATCH",
        &format!(
            "/companies/{}/payroll/reviews/{}",
            f.tenant_id, task_ids[0]
        ),
        Some(f.user_id),
        Some(json!({ "status": "REJECTED" })),
    )
    .await;

    let (_, lines) = send(
        f.router.clone(),
        "GET",
        &format!(
            "/companies/{}/payroll/runs/{}/line-reviews",
            f.tenant_id, run_id
        ),
        Some(f.user_id),
        None,
    )
    .await;
    let statuses: Vec<&str> = lines
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["status"].as_str().unwrap())
        .collect();
    assert!(statuses.contains(&"REJECTED"));
    assert!(statuses.contains(&"APPROVED"));
}

#[tokio::test]
async fn test_review_update_on_unknown_task_is_404() {
    let f = fixture();
    let (status, body) = send(
        f.router.clone(),
        "PATCH",
        &format!(
            "/companies/{}/payroll/reviews/{}",
            f.tenant_id,
            Uuid::new_v4()
        ),
        Some(f.user_id),
        Some(json!({ "status": "APPROVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("REVIEW_TASK_NOT_FOUND"));
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_allowed_only_from_draft_or_cancelled() {
    let f = fixture();
    f.store
        .insert_employee(employee(f.tenant_id, "EMP-001", "50000"));
    let (_, body) = sync(&f, "June", 2025).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();

    transition(&f, &run_id, "UNDER_REVIEW").await;
    let (status, body) = send(
        f.router.clone(),
        "DELETE",
        &format!("/companies/{}/payroll/runs/{}", f.tenant_id, run_id),
        Some(f.user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("RUN_NOT_DELETABLE"));

    transition(&f, &run_id, "DRAFT").await;
    let (status, _) = send(
        f.router.clone(),
        "DELETE",
        &format!("/companies/{}/payroll/runs/{}", f.tenant_id, run_id),
        Some(f.user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
