// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("Employee not found: {employee_id}")]
    NotFound { employee_id: String },

    #[error("Invalid month {0}: expected a value between 1 and 12")]
    InvalidMonth(u32),

    #[error("Employee ID already exists: {employee_id}")]
    DuplicateEmployee { employee_id: String },

    #[error("Invalid employee data: {0}")]
    InvalidEmployee(String),

    #[error("Invalid attendance data: {0}")]
    InvalidAttendance(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: invalid value '{value}' for column '{field}'")]
    InvalidField {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Arithmetic overflow while calculating salary for {employee_id}")]
    Overflow { employee_id: String },

    #[error("File I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    #[error("JSON processing error")]
    Json(#[from] serde_json::Error),

    #[error("CSV processing error")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PayrollError>;

// Helper to create context-aware IO errors
pub(crate) fn io_context<E: Into<std::io::Error>, S: Into<String>>(
    source: E,
    context: S,
) -> PayrollError {
    PayrollError::Io {
        source: source.into(),
        context: context.into(),
    }
}
