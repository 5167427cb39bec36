// src/model.rs
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, Result};

pub const DEFAULT_CHECK_IN: &str = "09:00";

// Timestamp layout used for `recorded_at`.
const RECORDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            other => Err(format!("unknown status '{}', expected active or inactive", other)),
        }
    }
}

/// Bank details are opaque to payroll; they are carried through to slips and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_account_number: String,
    pub ifsc_code: String,
    pub branch_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    /// Nominal monthly salary before pro-ration.
    #[serde(with = "rust_decimal::serde::float")]
    pub basic_salary: Decimal,
    #[serde(default)]
    pub overtime_applicable: bool,
    /// Pay per overtime hour. Ignored unless `overtime_applicable` is set.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub overtime_rate: Decimal,
    #[serde(flatten)]
    pub bank: BankDetails,
    pub joining_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

fn default_check_in() -> String {
    DEFAULT_CHECK_IN.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: String,
    /// Kept as recorded. Period matching is textual, so this is never parsed for payroll.
    pub date: String,
    #[serde(default = "default_check_in")]
    pub check_in: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub overtime_hours: Decimal,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub recorded_at: String,
}

impl AttendanceRecord {
    /// Builds a record the way a manual entry form does: employees without
    /// overtime never carry overtime hours.
    pub fn manual_entry(
        employee: &Employee,
        date: NaiveDate,
        check_in: &str,
        overtime_hours: Decimal,
        notes: &str,
    ) -> Self {
        let overtime_hours = if employee.overtime_applicable {
            overtime_hours
        } else {
            Decimal::ZERO
        };
        Self {
            employee_id: employee.employee_id.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            check_in: check_in.to_string(),
            overtime_hours,
            notes: notes.to_string(),
            recorded_at: now_timestamp(),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

pub(crate) fn now_timestamp() -> String {
    Local::now().format(RECORDED_AT_FORMAT).to_string()
}

/// A payroll month. The month is validated, the year is taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

impl PayPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The text an attendance date must start with to fall in this period, e.g. `2024-03`.
    pub fn prefix(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryResult {
    pub employee: Employee,
    pub working_days: u32,
    pub total_overtime_hours: Decimal,
    /// Basic salary pro-rated over the days worked.
    pub basic_salary: Decimal,
    pub overtime_pay: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    pub month: u32,
    pub year: i32,
}

impl SalaryResult {
    pub fn period(&self) -> Result<PayPeriod> {
        PayPeriod::new(self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn employee(overtime_applicable: bool) -> Employee {
        Employee {
            employee_id: "E1".to_string(),
            name: "Asha Rao".to_string(),
            phone: "9800000000".to_string(),
            department: "Construction".to_string(),
            position: "Mason".to_string(),
            basic_salary: dec!(30000),
            overtime_applicable,
            overtime_rate: dec!(100),
            bank: BankDetails::default(),
            joining_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn period_rejects_months_outside_range() {
        assert!(matches!(
            PayPeriod::new(2024, 0),
            Err(PayrollError::InvalidMonth(0))
        ));
        assert!(matches!(
            PayPeriod::new(2024, 13),
            Err(PayrollError::InvalidMonth(13))
        ));
    }

    #[test]
    fn period_prefix_pads_month_only() {
        assert_eq!(PayPeriod::new(2024, 3).unwrap().prefix(), "2024-03");
        assert_eq!(PayPeriod::new(2024, 11).unwrap().prefix(), "2024-11");
        assert_eq!(PayPeriod::new(999, 1).unwrap().prefix(), "999-01");
    }

    #[test]
    fn period_month_name() {
        assert_eq!(PayPeriod::new(2024, 3).unwrap().month_name(), "March");
        assert_eq!(PayPeriod::new(2024, 12).unwrap().month_name(), "December");
    }

    #[test]
    fn manual_entry_drops_overtime_for_ineligible_employee() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let record = AttendanceRecord::manual_entry(&employee(false), date, "09:00", dec!(3), "");
        assert_eq!(record.overtime_hours, Decimal::ZERO);
        assert_eq!(record.date, "2024-03-04");

        let record = AttendanceRecord::manual_entry(&employee(true), date, "09:00", dec!(3), "late pour");
        assert_eq!(record.overtime_hours, dec!(3));
        assert_eq!(record.notes, "late pour");
    }

    #[test]
    fn employee_json_fills_optional_fields() {
        let json = r#"{
            "employee_id": "E7",
            "name": "Ravi",
            "phone": "1",
            "department": "Logistics",
            "position": "Driver",
            "basic_salary": 18000,
            "bank_account_number": "123",
            "ifsc_code": "SBIN0001",
            "branch_name": "Main",
            "joining_date": "2024-01-15"
        }"#;
        let emp: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(emp.basic_salary, dec!(18000));
        assert!(!emp.overtime_applicable);
        assert_eq!(emp.overtime_rate, Decimal::ZERO);
        assert_eq!(emp.status, EmployeeStatus::Active);
        assert_eq!(emp.bank.ifsc_code, "SBIN0001");
    }

    #[test]
    fn attendance_json_fills_optional_fields() {
        let json = r#"{"employee_id": "E7", "date": "2024-03-01"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.check_in, DEFAULT_CHECK_IN);
        assert_eq!(record.overtime_hours, Decimal::ZERO);
        assert!(record.notes.is_empty());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Active".parse::<EmployeeStatus>(), Ok(EmployeeStatus::Active));
        assert_eq!(" inactive ".parse::<EmployeeStatus>(), Ok(EmployeeStatus::Inactive));
        assert!("retired".parse::<EmployeeStatus>().is_err());
    }
}
