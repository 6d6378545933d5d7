//! Per-employee line-item assembly.
//!
//! Drives one employee's full computation for a period: absence
//! deduction, adjustment resolution, benefit valuation (housing in a
//! second pass, once statutory-base gross is known), statutory
//! calculation, and aggregation into a [`PayrollLineItem`]. Pure apart
//! from id generation; all inputs are passed in.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::calculation::adjustments::{resolve_allowances, resolve_deductions, resolve_value};
use crate::calculation::benefits::{car_benefit, housing_benefit, meal_benefit, other_benefit, BenefitKind};
use crate::calculation::insurance_relief::{apply_insurance_relief, insurance_relief};
use crate::calculation::levies::calculate_levy;
use crate::calculation::nssf::{calculate_nssf, NssfContribution};
use crate::calculation::paye::calculate_paye;
use crate::error::EngineResult;
use crate::models::{
    AbsenceRecord, Allowance, AllowanceClass, AllowanceDetail, Deduction, DeductionDetail,
    Employee, HelbAccount, PayrollLineItem, PayrollPeriod,
};
use crate::rules::StatutoryRules;

/// Everything needed to compute one employee's line item.
#[derive(Debug, Clone, Copy)]
pub struct LineInputs<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The payroll period.
    pub period: PayrollPeriod,
    /// All adjustment assignments of the tenant; resolution picks the
    /// applicable ones.
    pub allowances: &'a [Allowance],
    /// All deduction assignments of the tenant.
    pub deductions: &'a [Deduction],
    /// The employee's absence record for the period, if any.
    pub absence: Option<&'a AbsenceRecord>,
    /// The employee's statutory loan account, if any.
    pub helb_account: Option<&'a HelbAccount>,
}

/// Computes the full line item for one employee.
pub fn compute_line_item(
    run_id: Uuid,
    inputs: LineInputs<'_>,
    rules: &StatutoryRules,
) -> EngineResult<PayrollLineItem> {
    let employee = inputs.employee;
    let period = inputs.period;

    let absence_deduction = inputs
        .absence
        .map(|a| a.deduction_amount)
        .unwrap_or(Decimal::ZERO);
    let base_pay = (employee.salary - absence_deduction).max(Decimal::ZERO);

    // First pass over allowances: cash amounts and the in-kind benefits
    // that do not depend on gross. Housing is deferred.
    let mut cash_allowances = Decimal::ZERO;
    let mut non_cash_benefits = Decimal::ZERO;
    let mut allowance_details = Vec::new();
    let mut deferred_housing: Vec<(usize, Decimal)> = Vec::new();

    for allowance in resolve_allowances(inputs.allowances, employee, period) {
        let raw_value = resolve_value(
            allowance.value,
            allowance.mode,
            base_pay,
            allowance.allowance_type.maximum_value,
        );
        let kind = &allowance.allowance_type;

        if kind.is_cash {
            cash_allowances += raw_value;
            allowance_details.push(AllowanceDetail {
                code: kind.code.clone(),
                name: kind.name.clone(),
                class: AllowanceClass::Cash,
                raw_value,
                value: raw_value,
                is_taxable: kind.is_taxable,
            });
            continue;
        }

        match BenefitKind::from_code(&kind.code) {
            BenefitKind::Housing => {
                // Valued in the second pass; record the slot now so the
                // breakdown keeps assignment order.
                allowance_details.push(AllowanceDetail {
                    code: kind.code.clone(),
                    name: kind.name.clone(),
                    class: AllowanceClass::NonCash,
                    raw_value,
                    value: Decimal::ZERO,
                    is_taxable: true,
                });
                deferred_housing.push((allowance_details.len() - 1, raw_value));
            }
            benefit => {
                let taxable = match benefit {
                    BenefitKind::Car => car_benefit(raw_value, &rules.benefits),
                    BenefitKind::Meal => meal_benefit(raw_value, &rules.benefits),
                    _ => other_benefit(raw_value, &rules.benefits),
                };
                non_cash_benefits += taxable;
                allowance_details.push(AllowanceDetail {
                    code: kind.code.clone(),
                    name: kind.name.clone(),
                    class: AllowanceClass::NonCash,
                    raw_value,
                    value: taxable,
                    is_taxable: true,
                });
            }
        }
    }

    let statutory_base_gross = base_pay + cash_allowances;

    let nssf = if employee.pays_nssf {
        calculate_nssf(
            statutory_base_gross,
            period,
            employee.contract.contract_type,
            rules,
        )?
    } else {
        NssfContribution::default()
    };

    let shif = if employee.pays_shif {
        calculate_levy(statutory_base_gross, period, &rules.health_levy)
    } else {
        Decimal::ZERO
    };

    let housing_levy = if employee.pays_housing_levy {
        calculate_levy(statutory_base_gross, period, &rules.housing_levy)
    } else {
        Decimal::ZERO
    };

    // Second pass: housing benefits against statutory-base gross.
    for (slot, raw_value) in deferred_housing {
        let taxable = housing_benefit(raw_value, statutory_base_gross, &rules.benefits);
        non_cash_benefits += taxable;
        allowance_details[slot].value = taxable;
    }

    let gross_pay = statutory_base_gross + non_cash_benefits;

    let mut pre_tax_deductions = Decimal::ZERO;
    let mut post_tax_deductions = Decimal::ZERO;
    let mut qualifying_premiums = Decimal::ZERO;
    let mut deduction_details = Vec::new();

    for deduction in resolve_deductions(inputs.deductions, employee, period) {
        let value = resolve_value(
            deduction.value,
            deduction.mode,
            statutory_base_gross,
            deduction.deduction_type.maximum_value,
        );
        let kind = &deduction.deduction_type;

        if kind.qualifies_for_insurance_relief() {
            qualifying_premiums += value;
        }
        if kind.is_pre_tax {
            pre_tax_deductions += value;
        } else {
            post_tax_deductions += value;
        }
        deduction_details.push(DeductionDetail {
            code: kind.code.clone(),
            name: kind.name.clone(),
            value,
            is_pre_tax: kind.is_pre_tax,
        });
    }

    let helb_deduction = match inputs.helb_account {
        Some(account) if employee.pays_helb && account.active => account.monthly_deduction,
        _ => Decimal::ZERO,
    };
    post_tax_deductions += helb_deduction;

    let taxable_income =
        gross_pay - nssf.total() - shif - housing_levy - pre_tax_deductions;

    let relief = insurance_relief(qualifying_premiums, &rules.reliefs);
    let paye = if employee.pays_paye {
        let schedule = rules.tax_schedule_for(period)?;
        let computed = calculate_paye(
            taxable_income,
            employee.has_disability,
            schedule,
            &rules.reliefs,
        );
        apply_insurance_relief(computed, relief)
    } else {
        Decimal::ZERO
    };

    let total_statutory = nssf.total() + shif + housing_levy + paye;
    let total_deductions = total_statutory + pre_tax_deductions + post_tax_deductions;
    let net_pay = gross_pay - total_deductions;

    Ok(PayrollLineItem {
        id: Uuid::new_v4(),
        run_id,
        employee_id: employee.id,
        basic_salary: employee.salary,
        absence_deduction,
        total_cash_allowances: cash_allowances,
        total_non_cash_benefits: non_cash_benefits,
        statutory_base_gross,
        gross_pay,
        taxable_income,
        paye_tax: paye,
        insurance_relief: relief,
        nssf_tier1: nssf.tier1,
        nssf_tier2: nssf.tier2,
        nssf_deduction: nssf.total(),
        shif_deduction: shif,
        housing_levy_deduction: housing_levy,
        helb_deduction,
        total_statutory_deductions: total_statutory,
        total_pre_tax_deductions: pre_tax_deductions,
        total_other_deductions: post_tax_deductions,
        total_deductions,
        net_pay,
        payment_detail: employee.payment_detail.clone(),
        allowance_details,
        deduction_details,
    })
}
