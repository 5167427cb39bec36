// src/config.rs
use std::path::PathBuf;

use serde::Deserialize;

use crate::store::{JsonStore, DEFAULT_ATTENDANCE_FILE, DEFAULT_EMPLOYEES_FILE};

pub const ENV_PREFIX: &str = "PAYROLL_";

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_employees_file() -> String {
    DEFAULT_EMPLOYEES_FILE.to_string()
}

fn default_attendance_file() -> String {
    DEFAULT_ATTENDANCE_FILE.to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

/// Settings read from `PAYROLL_*` environment variables (and `.env`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_employees_file")]
    pub employees_file: String,
    #[serde(default = "default_attendance_file")]
    pub attendance_file: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            employees_file: default_employees_file(),
            attendance_file: default_attendance_file(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        envy::prefixed(ENV_PREFIX).from_env::<Config>()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(
            self.data_dir.join(&self.employees_file),
            self.data_dir.join(&self.attendance_file),
        )
    }
}
