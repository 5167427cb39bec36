// src/import.rs
//! Bulk upload of employees and attendance from CSV.
//!
//! Every row is parsed before anything is applied, so a bad cell rejects the
//! whole file and leaves the snapshot as it was.

use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::directory::PayrollData;
use crate::error::{PayrollError, Result};
use crate::model::{
    now_timestamp, AttendanceRecord, BankDetails, Employee, EmployeeStatus, DEFAULT_CHECK_IN,
};

pub const EMPLOYEE_REQUIRED_COLUMNS: [&str; 9] = [
    "employee_id",
    "name",
    "phone",
    "department",
    "position",
    "basic_salary",
    "bank_account_number",
    "ifsc_code",
    "branch_name",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    /// Human-readable reason for each row that was not applied.
    pub skipped: Vec<String>,
}

struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn new(headers: StringRecord) -> Self {
        Self { headers }
    }

    fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|col| !self.headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect()
    }

    /// Cell text for `column`, or `None` when the column is absent or the cell is empty.
    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| record.get(idx))
            .filter(|value| !value.is_empty())
    }

    fn text(&self, record: &StringRecord, column: &str) -> String {
        self.get(record, column).unwrap_or_default().to_string()
    }
}

fn invalid(row: usize, field: &str, value: &str) -> PayrollError {
    PayrollError::InvalidField {
        row,
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse_decimal(row: usize, field: &str, value: &str) -> Result<Decimal> {
    let parsed = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid(row, field, value))?;
    if parsed < Decimal::ZERO {
        return Err(invalid(row, field, value));
    }
    Ok(parsed)
}

fn parse_flag(row: usize, field: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(invalid(row, field, value)),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Adds every employee in the CSV. Rows whose id is already known (in the
/// directory or earlier in the file) are skipped and reported.
pub fn import_employees<R: Read>(
    data: &mut PayrollData,
    reader: R,
    joining_date: NaiveDate,
) -> Result<ImportSummary> {
    let mut rdr = csv_reader(reader);
    let columns = Columns::new(rdr.headers()?.clone());

    let missing = columns.missing(&EMPLOYEE_REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(PayrollError::MissingColumns(missing));
    }

    let mut employees = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let basic_salary = match columns.get(&record, "basic_salary") {
            Some(value) => parse_decimal(row, "basic_salary", value)?,
            None => return Err(invalid(row, "basic_salary", "")),
        };
        let overtime_applicable = match columns.get(&record, "overtime_applicable") {
            Some(value) => parse_flag(row, "overtime_applicable", value)?,
            None => false,
        };
        let overtime_rate = match columns.get(&record, "overtime_rate") {
            Some(value) => parse_decimal(row, "overtime_rate", value)?,
            None => Decimal::ZERO,
        };

        employees.push(Employee {
            employee_id: columns.text(&record, "employee_id"),
            name: columns.text(&record, "name"),
            phone: columns.text(&record, "phone"),
            department: columns.text(&record, "department"),
            position: columns.text(&record, "position"),
            basic_salary,
            overtime_applicable,
            overtime_rate,
            bank: BankDetails {
                bank_account_number: columns.text(&record, "bank_account_number"),
                ifsc_code: columns.text(&record, "ifsc_code"),
                branch_name: columns.text(&record, "branch_name"),
            },
            joining_date,
            status: EmployeeStatus::Active,
        });
    }

    let mut summary = ImportSummary::default();
    let mut seen = HashSet::new();
    for (idx, employee) in employees.into_iter().enumerate() {
        let row = idx + 1;
        if employee.employee_id.is_empty() || employee.name.is_empty() {
            warn!("Skipping employee row {}: missing employee_id or name", row);
            summary
                .skipped
                .push(format!("row {}: missing employee_id or name", row));
            continue;
        }
        if data.contains_employee(&employee.employee_id)
            || !seen.insert(employee.employee_id.clone())
        {
            warn!(
                "Skipping employee row {}: ID {} already exists",
                row, employee.employee_id
            );
            summary.skipped.push(format!(
                "row {}: employee ID {} already exists",
                row, employee.employee_id
            ));
            continue;
        }
        data.add_employee(employee)?;
        summary.processed += 1;
    }

    info!(
        "Employee upload finished: {} added, {} skipped",
        summary.processed,
        summary.skipped.len()
    );
    Ok(summary)
}

/// Appends every attendance row in the CSV. All columns are optional;
/// rows without an employee id are skipped and reported.
pub fn import_attendance<R: Read>(data: &mut PayrollData, reader: R) -> Result<ImportSummary> {
    let mut rdr = csv_reader(reader);
    let columns = Columns::new(rdr.headers()?.clone());
    let recorded_at = now_timestamp();

    let mut records = Vec::new();
    let mut summary = ImportSummary::default();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let employee_id = columns.text(&record, "employee_id");
        if employee_id.is_empty() {
            warn!("Skipping attendance row {}: missing employee_id", row);
            summary
                .skipped
                .push(format!("row {}: missing employee_id", row));
            continue;
        }
        let overtime_hours = match columns.get(&record, "overtime_hours") {
            Some(value) => parse_decimal(row, "overtime_hours", value)?,
            None => Decimal::ZERO,
        };

        records.push(AttendanceRecord {
            employee_id,
            date: columns.text(&record, "date"),
            check_in: columns
                .get(&record, "check_in")
                .unwrap_or(DEFAULT_CHECK_IN)
                .to_string(),
            overtime_hours,
            notes: columns.text(&record, "notes"),
            recorded_at: recorded_at.clone(),
        });
    }

    for record in records {
        data.record_attendance(record)?;
        summary.processed += 1;
    }

    info!(
        "Attendance upload finished: {} recorded, {} skipped",
        summary.processed,
        summary.skipped.len()
    );
    Ok(summary)
}
