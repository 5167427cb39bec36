// src/calculator.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info};

use crate::directory::{AttendanceLedger, EmployeeDirectory};
use crate::error::{PayrollError, Result};
use crate::model::{PayPeriod, SalaryResult};

/// Every month is paid as if it had this many days.
pub const DAYS_PER_PAY_MONTH: Decimal = dec!(30);

/// Salaries for every active employee in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollRun {
    pub period: PayPeriod,
    pub results: Vec<SalaryResult>,
    pub total_net: Decimal,
}

/// Computes one employee's salary for `period` from the attendance in `ledger`.
///
/// A record belongs to the period when its date text starts with the period
/// prefix (`2024-03`); anything else, including dates in another layout, is
/// left out rather than reported. Every matching record is one working day,
/// even when two share a date. The monthly salary is pro-rated over a fixed
/// 30-day month, so more than 30 records pay more than the monthly salary.
/// Overtime counts only for employees with overtime enabled.
pub fn calculate_salary<D, L>(
    directory: &D,
    ledger: &L,
    employee_id: &str,
    period: PayPeriod,
) -> Result<SalaryResult>
where
    D: EmployeeDirectory + ?Sized,
    L: AttendanceLedger + ?Sized,
{
    let employee = directory
        .get_employee(employee_id)
        .ok_or_else(|| PayrollError::NotFound {
            employee_id: employee_id.to_string(),
        })?;

    let prefix = period.prefix();
    let overflow = || PayrollError::Overflow {
        employee_id: employee_id.to_string(),
    };

    let records: Vec<_> = ledger.records_for(employee_id, &prefix).collect();
    let working_days = u32::try_from(records.len()).map_err(|_| overflow())?;

    let basic_salary = prorate(employee.basic_salary, working_days).ok_or_else(overflow)?;

    let (total_overtime_hours, overtime_pay) = if employee.overtime_applicable {
        let hours = records.iter().try_fold(Decimal::ZERO, |sum, record| {
            sum.checked_add(record.overtime_hours).ok_or_else(overflow)
        })?;
        let pay = hours
            .checked_mul(employee.overtime_rate)
            .ok_or_else(overflow)?;
        (hours, pay)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let gross_salary = basic_salary.checked_add(overtime_pay).ok_or_else(overflow)?;
    let net_salary = gross_salary;

    debug!(
        "Calculated salary: Emp={}, Period={}, Days={}, OT hours={}, Basic={}, OT pay={}, Net={}",
        employee_id, period, working_days, total_overtime_hours, basic_salary, overtime_pay, net_salary
    );

    Ok(SalaryResult {
        employee: employee.clone(),
        working_days,
        total_overtime_hours,
        basic_salary,
        overtime_pay,
        gross_salary,
        net_salary,
        month: period.month(),
        year: period.year(),
    })
}

/// `basic / 30 * days`. Multiplies first so whole results stay exact, and
/// divides first only when the product would not fit.
fn prorate(basic_salary: Decimal, working_days: u32) -> Option<Decimal> {
    let days = Decimal::from(working_days);
    basic_salary
        .checked_mul(days)
        .and_then(|amount| amount.checked_div(DAYS_PER_PAY_MONTH))
        .or_else(|| {
            basic_salary
                .checked_div(DAYS_PER_PAY_MONTH)
                .and_then(|daily| daily.checked_mul(days))
        })
}

/// Calculates every active employee, in directory order.
pub fn run_payroll<D, L>(directory: &D, ledger: &L, period: PayPeriod) -> Result<PayrollRun>
where
    D: EmployeeDirectory + ?Sized,
    L: AttendanceLedger + ?Sized,
{
    let mut results = Vec::new();
    let mut total_net = Decimal::ZERO;

    for employee in directory.employees().iter().filter(|emp| emp.is_active()) {
        let result = calculate_salary(directory, ledger, &employee.employee_id, period)?;
        total_net = total_net
            .checked_add(result.net_salary)
            .ok_or_else(|| PayrollError::Overflow {
                employee_id: employee.employee_id.clone(),
            })?;
        results.push(result);
    }

    info!(
        "Payroll run for {}: {} employees, total net {}",
        period,
        results.len(),
        total_net
    );
    Ok(PayrollRun {
        period,
        results,
        total_net,
    })
}
