// src/report.rs
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::calculator::run_payroll;
use crate::directory::PayrollData;
use crate::error::Result;
use crate::model::{EmployeeStatus, PayPeriod};

/// Headline figures for the overview screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: PayPeriod,
    pub total_employees: usize,
    pub active_employees: usize,
    /// Net pay of all active employees for `period`.
    pub monthly_payroll: Decimal,
    /// All attendance records divided by all employees.
    pub average_attendance_days: Decimal,
}

pub fn dashboard(data: &PayrollData, period: PayPeriod) -> Result<Dashboard> {
    let total_employees = data.employees.len();
    let active_employees = data.active_employees().count();
    let monthly_payroll = run_payroll(data, data, period)?.total_net;

    let average_attendance_days = if total_employees == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(data.attendance_records.len()) / Decimal::from(total_employees)
    };

    Ok(Dashboard {
        period,
        total_employees,
        active_employees,
        monthly_payroll,
        average_attendance_days,
    })
}

pub fn department_headcount(data: &PayrollData) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for emp in &data.employees {
        *counts.entry(emp.department.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn status_distribution(data: &PayrollData) -> BTreeMap<EmployeeStatus, usize> {
    let mut counts = BTreeMap::new();
    for emp in &data.employees {
        *counts.entry(emp.status).or_insert(0) += 1;
    }
    counts
}

/// Basic salaries grouped by department, in directory order within each group.
pub fn salaries_by_department(data: &PayrollData) -> BTreeMap<String, Vec<Decimal>> {
    let mut groups: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for emp in &data.employees {
        groups
            .entry(emp.department.clone())
            .or_default()
            .push(emp.basic_salary);
    }
    groups
}

/// Attendance records per calendar month (`YYYY-MM`). Dates that do not
/// parse are left out of the trend.
pub fn monthly_attendance_trend(data: &PayrollData) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let mut unparsed = 0usize;
    for record in &data.attendance_records {
        match record.parsed_date() {
            Some(date) => {
                *counts.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1;
            }
            None => unparsed += 1,
        }
    }
    if unparsed > 0 {
        warn!(
            "Attendance trend skipped {} records with unreadable dates",
            unparsed
        );
    }
    counts
}
