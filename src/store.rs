// src/store.rs
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::directory::PayrollData;
use crate::error::{io_context, Result};
use crate::model::{AttendanceRecord, Employee};

pub const DEFAULT_EMPLOYEES_FILE: &str = "employees.json";
pub const DEFAULT_ATTENDANCE_FILE: &str = "attendance.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct EmployeesFile {
    employees: Vec<Employee>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AttendanceFile {
    attendance_records: Vec<AttendanceRecord>,
}

/// Flat JSON persistence: one file for the directory, one for the ledger,
/// each rewritten whole on save.
#[derive(Debug, Clone)]
pub struct JsonStore {
    employees_path: PathBuf,
    attendance_path: PathBuf,
}

impl JsonStore {
    pub fn new(employees_path: impl Into<PathBuf>, attendance_path: impl Into<PathBuf>) -> Self {
        Self {
            employees_path: employees_path.into(),
            attendance_path: attendance_path.into(),
        }
    }

    /// Store with the default file names inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(
            data_dir.join(DEFAULT_EMPLOYEES_FILE),
            data_dir.join(DEFAULT_ATTENDANCE_FILE),
        )
    }

    pub fn employees_path(&self) -> &Path {
        &self.employees_path
    }

    pub fn attendance_path(&self) -> &Path {
        &self.attendance_path
    }

    /// Loads both files, creating any that are missing with an empty collection.
    pub fn load(&self) -> Result<PayrollData> {
        if !self.employees_path.exists() {
            info!("Initializing employee file {:?}", self.employees_path);
            write_json(&self.employees_path, &EmployeesFile::default())?;
        }
        if !self.attendance_path.exists() {
            info!("Initializing attendance file {:?}", self.attendance_path);
            write_json(&self.attendance_path, &AttendanceFile::default())?;
        }

        let employees: EmployeesFile = read_json(&self.employees_path)?;
        let attendance: AttendanceFile = read_json(&self.attendance_path)?;
        info!(
            "Loaded {} employees and {} attendance records",
            employees.employees.len(),
            attendance.attendance_records.len()
        );
        Ok(PayrollData::new(
            employees.employees,
            attendance.attendance_records,
        ))
    }

    pub fn save_employees(&self, data: &PayrollData) -> Result<()> {
        write_json(
            &self.employees_path,
            &EmployeesFile {
                employees: data.employees.clone(),
            },
        )?;
        debug!(
            "Saved {} employees to {:?}",
            data.employees.len(),
            self.employees_path
        );
        Ok(())
    }

    pub fn save_attendance(&self, data: &PayrollData) -> Result<()> {
        write_json(
            &self.attendance_path,
            &AttendanceFile {
                attendance_records: data.attendance_records.clone(),
            },
        )?;
        debug!(
            "Saved {} attendance records to {:?}",
            data.attendance_records.len(),
            self.attendance_path
        );
        Ok(())
    }

    pub fn save(&self, data: &PayrollData) -> Result<()> {
        self.save_employees(data)?;
        self.save_attendance(data)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json_string = fs::read_to_string(path)
        .map_err(|e| io_context(e, format!("Failed to read data file: {:?}", path)))?;
    // serde_json::Error maps via #[from]
    Ok(serde_json::from_str(&json_string)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            io_context(
                e,
                format!("Failed to create directory for data file: {:?}", parent),
            )
        })?;
    }

    let mut file = File::create(path)
        .map_err(|e| io_context(e, format!("Failed to create data file: {:?}", path)))?;
    file.write_all(json_string.as_bytes())
        .map_err(|e| io_context(e, format!("Failed to write data file: {:?}", path)))?;
    Ok(())
}
