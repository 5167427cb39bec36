// src/export.rs
use std::collections::HashMap;
use std::io::Write;

use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::calculator::PayrollRun;
use crate::directory::PayrollData;
use crate::error::{io_context, Result};
use crate::slip::to_cents;

#[derive(Serialize)]
struct AttendanceRow<'a> {
    employee_id: &'a str,
    employee_name: &'a str,
    date: &'a str,
    check_in: &'a str,
    overtime_hours: String,
    notes: &'a str,
    recorded_at: &'a str,
}

#[derive(Serialize)]
struct EmployeeRow<'a> {
    employee_id: &'a str,
    name: &'a str,
    phone: &'a str,
    department: &'a str,
    position: &'a str,
    basic_salary: String,
    overtime_applicable: bool,
    overtime_rate: String,
    bank_account_number: &'a str,
    ifsc_code: &'a str,
    branch_name: &'a str,
    joining_date: String,
    status: &'a str,
}

#[derive(Serialize)]
struct RegisterRow<'a> {
    employee_id: &'a str,
    name: &'a str,
    working_days: u32,
    overtime_hours: String,
    basic_salary: String,
    overtime_pay: String,
    gross_salary: String,
    net_salary: String,
}

const ATTENDANCE_HEADER: [&str; 7] = [
    "employee_id",
    "employee_name",
    "date",
    "check_in",
    "overtime_hours",
    "notes",
    "recorded_at",
];

const EMPLOYEE_HEADER: [&str; 13] = [
    "employee_id",
    "name",
    "phone",
    "department",
    "position",
    "basic_salary",
    "overtime_applicable",
    "overtime_rate",
    "bank_account_number",
    "ifsc_code",
    "branch_name",
    "joining_date",
    "status",
];

const REGISTER_HEADER: [&str; 8] = [
    "employee_id",
    "name",
    "working_days",
    "overtime_hours",
    "basic_salary",
    "overtime_pay",
    "gross_salary",
    "net_salary",
];

/// `serialize` only emits the header with the first row, so an empty export
/// gets it written explicitly.
fn finish<W: Write>(
    mut wtr: csv::Writer<W>,
    rows: usize,
    header: &[&str],
    what: &str,
) -> Result<()> {
    if rows == 0 {
        wtr.write_record(header)?;
    }
    wtr.flush()
        .map_err(|e| io_context(e, format!("Failed to flush {}", what)))
}

fn cents(amount: Decimal) -> String {
    format!("{:.2}", to_cents(amount))
}

/// Attendance ledger with each employee's name alongside the id.
pub fn write_attendance_csv<W: Write>(data: &PayrollData, writer: W) -> Result<()> {
    let names: HashMap<&str, &str> = data
        .employees
        .iter()
        .map(|emp| (emp.employee_id.as_str(), emp.name.as_str()))
        .collect();

    let mut wtr = WriterBuilder::new().from_writer(writer);
    for record in &data.attendance_records {
        wtr.serialize(AttendanceRow {
            employee_id: &record.employee_id,
            employee_name: names
                .get(record.employee_id.as_str())
                .copied()
                .unwrap_or_default(),
            date: &record.date,
            check_in: &record.check_in,
            overtime_hours: record.overtime_hours.normalize().to_string(),
            notes: &record.notes,
            recorded_at: &record.recorded_at,
        })?;
    }
    finish(
        wtr,
        data.attendance_records.len(),
        &ATTENDANCE_HEADER,
        "attendance CSV",
    )?;
    debug!("Exported {} attendance records", data.attendance_records.len());
    Ok(())
}

pub fn write_employees_csv<W: Write>(data: &PayrollData, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for emp in &data.employees {
        wtr.serialize(EmployeeRow {
            employee_id: &emp.employee_id,
            name: &emp.name,
            phone: &emp.phone,
            department: &emp.department,
            position: &emp.position,
            basic_salary: emp.basic_salary.normalize().to_string(),
            overtime_applicable: emp.overtime_applicable,
            overtime_rate: emp.overtime_rate.normalize().to_string(),
            bank_account_number: &emp.bank.bank_account_number,
            ifsc_code: &emp.bank.ifsc_code,
            branch_name: &emp.bank.branch_name,
            joining_date: emp.joining_date.format("%Y-%m-%d").to_string(),
            status: emp.status.as_str(),
        })?;
    }
    finish(wtr, data.employees.len(), &EMPLOYEE_HEADER, "employee CSV")?;
    debug!("Exported {} employees", data.employees.len());
    Ok(())
}

/// One row per employee in the run; amounts rounded to two decimals.
pub fn write_payroll_register_csv<W: Write>(run: &PayrollRun, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for result in &run.results {
        wtr.serialize(RegisterRow {
            employee_id: &result.employee.employee_id,
            name: &result.employee.name,
            working_days: result.working_days,
            overtime_hours: result.total_overtime_hours.normalize().to_string(),
            basic_salary: cents(result.basic_salary),
            overtime_pay: cents(result.overtime_pay),
            gross_salary: cents(result.gross_salary),
            net_salary: cents(result.net_salary),
        })?;
    }
    finish(wtr, run.results.len(), &REGISTER_HEADER, "payroll register")?;
    debug!(
        "Exported payroll register for {} with {} rows",
        run.period,
        run.results.len()
    );
    Ok(())
}
