// src/directory.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PayrollError, Result};
use crate::model::{AttendanceRecord, BankDetails, Employee, EmployeeStatus};

/// Read access to employee profiles.
pub trait EmployeeDirectory {
    fn employees(&self) -> &[Employee];

    fn get_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees()
            .iter()
            .find(|emp| emp.employee_id == employee_id)
    }
}

/// Read access to recorded attendance.
pub trait AttendanceLedger {
    fn records(&self) -> &[AttendanceRecord];

    /// Records for one employee whose date text starts with `date_prefix`.
    fn records_for<'a>(
        &'a self,
        employee_id: &'a str,
        date_prefix: &'a str,
    ) -> Box<dyn Iterator<Item = &'a AttendanceRecord> + 'a> {
        Box::new(self.records().iter().filter(move |record| {
            record.employee_id == employee_id && record.date.starts_with(date_prefix)
        }))
    }
}

/// Partial edit of an employee profile; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub basic_salary: Option<Decimal>,
    pub overtime_applicable: Option<bool>,
    pub overtime_rate: Option<Decimal>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub status: Option<EmployeeStatus>,
}

/// In-memory snapshot of the employee directory and the attendance ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollData {
    pub employees: Vec<Employee>,
    pub attendance_records: Vec<AttendanceRecord>,
}

impl EmployeeDirectory for PayrollData {
    fn employees(&self) -> &[Employee] {
        &self.employees
    }
}

impl AttendanceLedger for PayrollData {
    fn records(&self) -> &[AttendanceRecord] {
        &self.attendance_records
    }
}

fn validate_employee(employee: &Employee) -> Result<()> {
    if employee.employee_id.trim().is_empty() {
        return Err(PayrollError::InvalidEmployee(
            "employee_id must not be empty".to_string(),
        ));
    }
    if employee.name.trim().is_empty() {
        return Err(PayrollError::InvalidEmployee(format!(
            "name must not be empty for {}",
            employee.employee_id
        )));
    }
    if employee.basic_salary < Decimal::ZERO {
        return Err(PayrollError::InvalidEmployee(format!(
            "basic_salary must not be negative for {} (got {})",
            employee.employee_id, employee.basic_salary
        )));
    }
    if employee.overtime_rate < Decimal::ZERO {
        return Err(PayrollError::InvalidEmployee(format!(
            "overtime_rate must not be negative for {} (got {})",
            employee.employee_id, employee.overtime_rate
        )));
    }
    Ok(())
}

impl PayrollData {
    pub fn new(employees: Vec<Employee>, attendance_records: Vec<AttendanceRecord>) -> Self {
        Self {
            employees,
            attendance_records,
        }
    }

    pub fn contains_employee(&self, employee_id: &str) -> bool {
        self.get_employee(employee_id).is_some()
    }

    pub fn active_employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|emp| emp.is_active())
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<()> {
        validate_employee(&employee)?;
        if self.contains_employee(&employee.employee_id) {
            return Err(PayrollError::DuplicateEmployee {
                employee_id: employee.employee_id,
            });
        }
        info!(
            "Adding employee {} ({}) to {}",
            employee.employee_id, employee.name, employee.department
        );
        self.employees.push(employee);
        Ok(())
    }

    pub fn update_employee(&mut self, employee_id: &str, update: EmployeeUpdate) -> Result<&Employee> {
        let index = self
            .employees
            .iter()
            .position(|emp| emp.employee_id == employee_id)
            .ok_or_else(|| PayrollError::NotFound {
                employee_id: employee_id.to_string(),
            })?;

        // Validate on a copy so a rejected edit leaves the directory untouched.
        let mut edited = self.employees[index].clone();
        if let Some(name) = update.name {
            edited.name = name;
        }
        if let Some(phone) = update.phone {
            edited.phone = phone;
        }
        if let Some(department) = update.department {
            edited.department = department;
        }
        if let Some(position) = update.position {
            edited.position = position;
        }
        if let Some(basic_salary) = update.basic_salary {
            edited.basic_salary = basic_salary;
        }
        if let Some(overtime_applicable) = update.overtime_applicable {
            edited.overtime_applicable = overtime_applicable;
        }
        if let Some(overtime_rate) = update.overtime_rate {
            edited.overtime_rate = overtime_rate;
        }
        if !edited.overtime_applicable {
            edited.overtime_rate = Decimal::ZERO;
        }
        let BankDetails {
            bank_account_number,
            ifsc_code,
            branch_name,
        } = &mut edited.bank;
        if let Some(value) = update.bank_account_number {
            *bank_account_number = value;
        }
        if let Some(value) = update.ifsc_code {
            *ifsc_code = value;
        }
        if let Some(value) = update.branch_name {
            *branch_name = value;
        }
        if let Some(status) = update.status {
            edited.status = status;
        }
        validate_employee(&edited)?;

        info!("Updating employee {}", employee_id);
        debug!("Updated profile: {:?}", edited);
        self.employees[index] = edited;
        Ok(&self.employees[index])
    }

    pub fn set_status(&mut self, employee_id: &str, status: EmployeeStatus) -> Result<&Employee> {
        self.update_employee(
            employee_id,
            EmployeeUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    pub fn record_attendance(&mut self, record: AttendanceRecord) -> Result<()> {
        if record.employee_id.trim().is_empty() {
            return Err(PayrollError::InvalidAttendance(
                "employee_id must not be empty".to_string(),
            ));
        }
        if record.overtime_hours < Decimal::ZERO {
            return Err(PayrollError::InvalidAttendance(format!(
                "overtime_hours must not be negative for {} on {} (got {})",
                record.employee_id, record.date, record.overtime_hours
            )));
        }
        debug!(
            "Recording attendance: Emp={}, Date={}, Overtime={}",
            record.employee_id, record.date, record.overtime_hours
        );
        self.attendance_records.push(record);
        Ok(())
    }

    pub fn clear(&mut self) {
        info!(
            "Clearing {} employees and {} attendance records",
            self.employees.len(),
            self.attendance_records.len()
        );
        self.employees.clear();
        self.attendance_records.clear();
    }
}
