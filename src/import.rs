//! Bulk adjustment import validation.
//!
//! Uploaded assignment rows (one per allowance or deduction) are
//! validated and resolved against the tenant's catalogs and organization
//! maps. Row-level problems are collected and reported together; a
//! single bad row never hides the problems in the rows after it.
//! Spreadsheet parsing itself happens upstream; this module receives
//! already-decoded rows.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    validate_window, AdjustmentTarget, Allowance, AllowanceType, CalculationMode, Deduction,
    DeductionType, PayrollPeriod,
};

/// One decoded upload row.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRow {
    /// 1-based row number in the uploaded file, for error reporting.
    pub row_number: usize,
    /// Catalog type name, e.g. "House allowance".
    pub type_name: String,
    /// Scope keyword: INDIVIDUAL, DEPARTMENT, SUB_DEPARTMENT, JOB_TITLE
    /// or COMPANY.
    pub applies_to: String,
    /// Target identifier (employee number, department name, ...);
    /// absent for company-wide rows.
    pub target: Option<String>,
    /// The assigned value.
    pub value: Option<Decimal>,
    /// FIXED or PERCENTAGE.
    pub calculation_type: String,
    /// Whether the assignment recurs monthly.
    pub is_recurring: bool,
    /// Start month name.
    pub start_month: String,
    /// Start year.
    pub start_year: Option<i32>,
    /// How many months the assignment runs, if bounded.
    pub number_of_months: Option<u32>,
}

/// Name-to-id lookups used to resolve row targets.
#[derive(Debug, Default)]
pub struct ImportMaps {
    /// Employee number to employee id.
    pub employees: HashMap<String, Uuid>,
    /// Department name to id.
    pub departments: HashMap<String, Uuid>,
    /// Sub-department name to id.
    pub sub_departments: HashMap<String, Uuid>,
    /// Job title to id.
    pub job_titles: HashMap<String, Uuid>,
}

/// A problem with one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// The offending row.
    pub row_number: usize,
    /// What was wrong.
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.message)
    }
}

struct ParsedRow {
    target: AdjustmentTarget,
    value: Decimal,
    mode: CalculationMode,
    is_recurring: bool,
    start: PayrollPeriod,
    end: Option<PayrollPeriod>,
}

fn parse_target(
    row: &AssignmentRow,
    maps: &ImportMaps,
    errors: &mut Vec<RowError>,
) -> Option<AdjustmentTarget> {
    let push = |errors: &mut Vec<RowError>, message: String| {
        errors.push(RowError {
            row_number: row.row_number,
            message,
        });
    };

    let scope = row.applies_to.trim().to_uppercase();
    if scope == "COMPANY" {
        return Some(AdjustmentTarget::Company);
    }

    let Some(target) = row.target.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        push(
            errors,
            format!("missing target identifier for scope {}", scope),
        );
        return None;
    };

    let resolved = match scope.as_str() {
        "INDIVIDUAL" => maps
            .employees
            .get(target)
            .copied()
            .map(AdjustmentTarget::Individual),
        "DEPARTMENT" => maps
            .departments
            .get(target)
            .copied()
            .map(AdjustmentTarget::Department),
        "SUB_DEPARTMENT" => maps
            .sub_departments
            .get(target)
            .copied()
            .map(AdjustmentTarget::SubDepartment),
        "JOB_TITLE" => maps
            .job_titles
            .get(target)
            .copied()
            .map(AdjustmentTarget::JobTitle),
        other => {
            push(
                errors,
                format!(
                    "invalid scope \"{}\"; must be one of INDIVIDUAL, DEPARTMENT, SUB_DEPARTMENT, JOB_TITLE, COMPANY",
                    other
                ),
            );
            return None;
        }
    };

    if resolved.is_none() {
        push(errors, format!("unknown {} \"{}\"", scope.to_lowercase(), target));
    }
    resolved
}

fn parse_row(row: &AssignmentRow, maps: &ImportMaps, errors: &mut Vec<RowError>) -> Option<ParsedRow> {
    let before = errors.len();
    let push = |errors: &mut Vec<RowError>, message: String| {
        errors.push(RowError {
            row_number: row.row_number,
            message,
        });
    };

    let target = parse_target(row, maps, errors);

    let value = match row.value {
        Some(v) if v > Decimal::ZERO => Some(v),
        Some(v) => {
            push(errors, format!("value must be positive, got {}", v));
            None
        }
        None => {
            push(errors, "missing value".to_string());
            None
        }
    };

    let mode = match row.calculation_type.trim().to_uppercase().as_str() {
        "FIXED" => Some(CalculationMode::Fixed),
        "PERCENTAGE" => Some(CalculationMode::Percentage),
        other => {
            push(
                errors,
                format!("invalid calculation type \"{}\"; must be FIXED or PERCENTAGE", other),
            );
            None
        }
    };

    let start = match row.start_year {
        Some(year) => match PayrollPeriod::from_month_name(&row.start_month, year) {
            Ok(period) => Some(period),
            Err(e) => {
                push(errors, e.to_string());
                None
            }
        },
        None => {
            push(errors, "missing start year".to_string());
            None
        }
    };

    let end = match (start, row.number_of_months) {
        (Some(start), Some(months)) if months >= 1 => {
            let mut end = start;
            for _ in 1..months {
                end = end.next();
            }
            Some(end)
        }
        (_, Some(months)) if months < 1 => {
            push(errors, "number of months must be at least 1".to_string());
            None
        }
        _ => None,
    };

    if let (Some(start), Some(end)) = (start, end) {
        if let Err(e) = validate_window(start, Some(end)) {
            push(errors, e.to_string());
        }
    }

    if errors.len() > before {
        return None;
    }
    Some(ParsedRow {
        target: target?,
        value: value?,
        mode: mode?,
        is_recurring: row.is_recurring,
        start: start?,
        end,
    })
}

fn find_type<'a, T>(
    types: &'a [T],
    name: &str,
    type_name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    types
        .iter()
        .find(|t| type_name_of(t).eq_ignore_ascii_case(name.trim()))
}

/// Validates allowance rows, resolving each against the catalog and maps.
///
/// Returns the buildable assignments, or every row error found.
pub fn validate_allowance_rows(
    tenant_id: Uuid,
    rows: &[AssignmentRow],
    catalog: &[AllowanceType],
    maps: &ImportMaps,
) -> Result<Vec<Allowance>, Vec<RowError>> {
    let mut errors = Vec::new();
    let mut assignments = Vec::new();

    for row in rows {
        let allowance_type = find_type(catalog, &row.type_name, |t| t.name.as_str());
        if allowance_type.is_none() {
            errors.push(RowError {
                row_number: row.row_number,
                message: format!("unknown allowance type \"{}\"", row.type_name),
            });
        }
        let parsed = parse_row(row, maps, &mut errors);
        if let (Some(kind), Some(parsed)) = (allowance_type, parsed) {
            assignments.push(Allowance {
                id: Uuid::new_v4(),
                tenant_id,
                target: parsed.target,
                value: parsed.value,
                mode: parsed.mode,
                is_recurring: parsed.is_recurring,
                start: parsed.start,
                end: parsed.end,
                allowance_type: kind.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(assignments)
    } else {
        Err(errors)
    }
}

/// Validates deduction rows, resolving each against the catalog and maps.
pub fn validate_deduction_rows(
    tenant_id: Uuid,
    rows: &[AssignmentRow],
    catalog: &[DeductionType],
    maps: &ImportMaps,
) -> Result<Vec<Deduction>, Vec<RowError>> {
    let mut errors = Vec::new();
    let mut assignments = Vec::new();

    for row in rows {
        let deduction_type = find_type(catalog, &row.type_name, |t| t.name.as_str());
        if deduction_type.is_none() {
            errors.push(RowError {
                row_number: row.row_number,
                message: format!("unknown deduction type \"{}\"", row.type_name),
            });
        }
        let parsed = parse_row(row, maps, &mut errors);
        if let (Some(kind), Some(parsed)) = (deduction_type, parsed) {
            assignments.push(Deduction {
                id: Uuid::new_v4(),
                tenant_id,
                target: parsed.target,
                value: parsed.value,
                mode: parsed.mode,
                is_recurring: parsed.is_recurring,
                start: parsed.start,
                end: parsed.end,
                deduction_type: kind.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(assignments)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn catalog(tenant_id: Uuid) -> Vec<AllowanceType> {
        vec![AllowanceType {
            id: Uuid::new_v4(),
            tenant_id,
            code: "TRANSPORT".to_string(),
            name: "Transport allowance".to_string(),
            is_cash: true,
            is_taxable: true,
            maximum_value: None,
        }]
    }

    fn maps() -> ImportMaps {
        let mut maps = ImportMaps::default();
        maps.employees.insert("EMP-001".to_string(), Uuid::new_v4());
        maps.departments.insert("Finance".to_string(), Uuid::new_v4());
        maps
    }

    fn row(row_number: usize) -> AssignmentRow {
        AssignmentRow {
            row_number,
            type_name: "Transport allowance".to_string(),
            applies_to: "INDIVIDUAL".to_string(),
            target: Some("EMP-001".to_string()),
            value: Some(dec("5000")),
            calculation_type: "FIXED".to_string(),
            is_recurring: true,
            start_month: "January".to_string(),
            start_year: Some(2025),
            number_of_months: None,
        }
    }

    #[test]
    fn test_valid_rows_build_assignments() {
        let tenant_id = Uuid::new_v4();
        let rows = vec![row(2), row(3)];
        let result = validate_allowance_rows(tenant_id, &rows, &catalog(tenant_id), &maps());
        let assignments = result.unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].value, dec("5000"));
        assert!(assignments[0].end.is_none());
    }

    #[test]
    fn test_number_of_months_bounds_the_window() {
        let tenant_id = Uuid::new_v4();
        let mut bounded = row(2);
        bounded.number_of_months = Some(3);
        bounded.start_month = "November".to_string();
        bounded.start_year = Some(2024);

        let assignments =
            validate_allowance_rows(tenant_id, &[bounded], &catalog(tenant_id), &maps()).unwrap();
        // November, December, January
        assert_eq!(assignments[0].end, Some(PayrollPeriod::new(1, 2025).unwrap()));
    }

    #[test]
    fn test_company_rows_need_no_target() {
        let tenant_id = Uuid::new_v4();
        let mut company = row(2);
        company.applies_to = "COMPANY".to_string();
        company.target = None;

        let assignments =
            validate_allowance_rows(tenant_id, &[company], &catalog(tenant_id), &maps()).unwrap();
        assert_eq!(assignments[0].target, AdjustmentTarget::Company);
    }

    #[test]
    fn test_all_row_errors_are_collected() {
        let tenant_id = Uuid::new_v4();
        let mut bad_scope = row(2);
        bad_scope.applies_to = "TEAM".to_string();
        let mut bad_value = row(3);
        bad_value.value = None;
        let good = row(4);
        let mut bad_month = row(5);
        bad_month.start_month = "Smarch".to_string();

        let errors = validate_allowance_rows(
            tenant_id,
            &[bad_scope, bad_value, good, bad_month],
            &catalog(tenant_id),
            &maps(),
        )
        .unwrap_err();

        let rows_with_errors: Vec<usize> = errors.iter().map(|e| e.row_number).collect();
        assert_eq!(rows_with_errors, vec![2, 3, 5]);
        assert!(errors[0].to_string().starts_with("Row 2: invalid scope"));
    }

    #[test]
    fn test_unknown_target_is_reported() {
        let tenant_id = Uuid::new_v4();
        let mut unknown = row(2);
        unknown.target = Some("EMP-999".to_string());

        let errors = validate_allowance_rows(tenant_id, &[unknown], &catalog(tenant_id), &maps())
            .unwrap_err();
        assert!(errors[0].message.contains("EMP-999"));
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let tenant_id = Uuid::new_v4();
        let mut unknown = row(2);
        unknown.type_name = "Hazard pay".to_string();

        let errors = validate_allowance_rows(tenant_id, &[unknown], &catalog(tenant_id), &maps())
            .unwrap_err();
        assert!(errors[0].message.contains("Hazard pay"));
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let tenant_id = Uuid::new_v4();
        let mut negative = row(2);
        negative.value = Some(dec("-100"));

        let errors = validate_allowance_rows(tenant_id, &[negative], &catalog(tenant_id), &maps())
            .unwrap_err();
        assert!(errors[0].message.contains("positive"));
    }

    #[test]
    fn test_deduction_rows_resolve_against_deduction_catalog() {
        let tenant_id = Uuid::new_v4();
        let catalog = vec![DeductionType {
            id: Uuid::new_v4(),
            tenant_id,
            code: "SACCO".to_string(),
            name: "Sacco savings".to_string(),
            is_pre_tax: false,
            maximum_value: None,
        }];
        let mut deduction_row = row(2);
        deduction_row.type_name = "Sacco savings".to_string();
        deduction_row.applies_to = "DEPARTMENT".to_string();
        deduction_row.target = Some("Finance".to_string());

        let assignments =
            validate_deduction_rows(tenant_id, &[deduction_row], &catalog, &maps()).unwrap();
        assert_eq!(assignments.len(), 1);
        assert!(matches!(
            assignments[0].target,
            AdjustmentTarget::Department(_)
        ));
    }
}
