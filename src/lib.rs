//! Salary calculation from attendance records and employee profiles.
//!
//! [`calculator::calculate_salary`] is the core: it reads an
//! [`directory::EmployeeDirectory`] and an [`directory::AttendanceLedger`] and
//! never mutates either. The other modules are the collaborators around it:
//! JSON storage, CSV import/export, reports and salary slips.

pub mod calculator;
pub mod config;
pub mod directory;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod report;
pub mod slip;
pub mod store;

mod calculator_tests;

pub use calculator::{calculate_salary, run_payroll, PayrollRun};
pub use directory::{AttendanceLedger, EmployeeDirectory, EmployeeUpdate, PayrollData};
pub use error::{PayrollError, Result};
pub use model::{AttendanceRecord, BankDetails, Employee, EmployeeStatus, PayPeriod, SalaryResult};
