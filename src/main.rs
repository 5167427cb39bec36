// src/main.rs
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sagittal_payroll::config::Config;
use sagittal_payroll::export::{write_attendance_csv, write_employees_csv, write_payroll_register_csv};
use sagittal_payroll::import::{import_attendance, import_employees, ImportSummary};
use sagittal_payroll::model::DEFAULT_CHECK_IN;
use sagittal_payroll::report;
use sagittal_payroll::slip::{format_amount, render_slip};
use sagittal_payroll::store::JsonStore;
use sagittal_payroll::{
    calculate_salary, run_payroll, AttendanceLedger, AttendanceRecord, BankDetails, Employee,
    EmployeeDirectory, EmployeeStatus, EmployeeUpdate, PayPeriod, PayrollData,
};

#[derive(Parser, Debug)]
#[command(name = "payroll", version, about = "Attendance-based payroll calculation")]
struct Cli {
    /// Directory holding employees.json and attendance.json (overrides PAYROLL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage employee profiles
    #[command(subcommand)]
    Employee(EmployeeCommand),
    /// Record and inspect attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Calculate salaries
    #[command(subcommand)]
    Salary(SalaryCommand),
    /// Summary reports
    #[command(subcommand)]
    Report(ReportCommand),
    /// Bulk data operations
    #[command(subcommand)]
    Data(DataCommand),
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    Add(EmployeeArgs),
    List {
        /// Only list active employees
        #[arg(long)]
        active: bool,
    },
    Edit(EditArgs),
    Activate { employee_id: String },
    Deactivate { employee_id: String },
    /// Import employees from a CSV file
    Import {
        file: PathBuf,
        /// Joining date for every imported employee (defaults to today)
        #[arg(long)]
        joining_date: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
struct EmployeeArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    department: String,
    #[arg(long, default_value = "")]
    position: String,
    #[arg(long)]
    basic_salary: Decimal,
    /// Overtime rate per hour; enables overtime when given
    #[arg(long)]
    overtime_rate: Option<Decimal>,
    #[arg(long, default_value = "")]
    bank_account: String,
    #[arg(long, default_value = "")]
    ifsc: String,
    #[arg(long, default_value = "")]
    branch: String,
    #[arg(long)]
    joining_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct EditArgs {
    employee_id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    basic_salary: Option<Decimal>,
    #[arg(long)]
    overtime: Option<bool>,
    #[arg(long)]
    overtime_rate: Option<Decimal>,
    #[arg(long)]
    bank_account: Option<String>,
    #[arg(long)]
    ifsc: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long)]
    status: Option<EmployeeStatus>,
}

#[derive(Subcommand, Debug)]
enum AttendanceCommand {
    Record {
        employee_id: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = DEFAULT_CHECK_IN)]
        check_in: String,
        #[arg(long, default_value = "0")]
        overtime_hours: Decimal,
        #[arg(long, default_value = "")]
        notes: String,
    },
    List {
        #[arg(long)]
        employee: Option<String>,
        #[command(flatten)]
        period: PeriodArgs,
    },
    Import { file: PathBuf },
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PeriodArgs {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<u32>,
}

impl PeriodArgs {
    fn resolve(self) -> Result<PayPeriod> {
        let current = PayPeriod::current();
        let period = PayPeriod::new(
            self.year.unwrap_or(current.year()),
            self.month.unwrap_or(current.month()),
        )?;
        Ok(period)
    }
}

#[derive(Subcommand, Debug)]
enum SalaryCommand {
    /// Salary for one employee
    Calculate {
        employee_id: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Print a salary slip
        #[arg(long, conflicts_with = "json")]
        slip: bool,
    },
    /// Salaries for every active employee
    Run {
        #[command(flatten)]
        period: PeriodArgs,
        /// Write the payroll register CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Dashboard {
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long)]
        json: bool,
    },
    Departments,
    Status,
    Salaries,
    Attendance,
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Write employees.csv and attendance.csv into a directory
    Export { dir: PathBuf },
    /// Delete every employee and attendance record
    Clear {
        #[arg(long)]
        yes: bool,
    },
    Info,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to read PAYROLL_* configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let store = config.store();
    let mut data = store.load().context("Failed to load payroll data")?;

    match cli.command {
        Command::Employee(cmd) => employee_command(cmd, &store, &mut data),
        Command::Attendance(cmd) => attendance_command(cmd, &store, &mut data),
        Command::Salary(cmd) => salary_command(cmd, &config, &data),
        Command::Report(cmd) => report_command(cmd, &config, &data),
        Command::Data(cmd) => data_command(cmd, &store, &mut data),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn open_csv(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    })
}

fn print_import_summary(what: &str, summary: &ImportSummary) {
    println!("Imported {} {}", summary.processed, what);
    for reason in &summary.skipped {
        warn!("Skipped: {}", reason);
    }
}

fn employee_command(cmd: EmployeeCommand, store: &JsonStore, data: &mut PayrollData) -> Result<()> {
    match cmd {
        EmployeeCommand::Add(args) => {
            let employee = Employee {
                employee_id: args.id,
                name: args.name,
                phone: args.phone,
                department: args.department,
                position: args.position,
                basic_salary: args.basic_salary,
                overtime_applicable: args.overtime_rate.is_some(),
                overtime_rate: args.overtime_rate.unwrap_or(Decimal::ZERO),
                bank: BankDetails {
                    bank_account_number: args.bank_account,
                    ifsc_code: args.ifsc,
                    branch_name: args.branch,
                },
                joining_date: args.joining_date.unwrap_or_else(today),
                status: EmployeeStatus::Active,
            };
            let id = employee.employee_id.clone();
            data.add_employee(employee)?;
            store.save_employees(data)?;
            println!("Added employee {}", id);
        }
        EmployeeCommand::List { active } => {
            for emp in data.employees() {
                if active && !emp.is_active() {
                    continue;
                }
                println!(
                    "{:<10} {:<24} {:<16} {:<16} {:>12} {}",
                    emp.employee_id,
                    emp.name,
                    emp.department,
                    emp.position,
                    format_amount(emp.basic_salary),
                    emp.status
                );
            }
        }
        EmployeeCommand::Edit(args) => {
            let update = EmployeeUpdate {
                name: args.name,
                phone: args.phone,
                department: args.department,
                position: args.position,
                basic_salary: args.basic_salary,
                overtime_applicable: args.overtime,
                overtime_rate: args.overtime_rate,
                bank_account_number: args.bank_account,
                ifsc_code: args.ifsc,
                branch_name: args.branch,
                status: args.status,
            };
            data.update_employee(&args.employee_id, update)?;
            store.save_employees(data)?;
            println!("Updated employee {}", args.employee_id);
        }
        EmployeeCommand::Activate { employee_id } => {
            data.set_status(&employee_id, EmployeeStatus::Active)?;
            store.save_employees(data)?;
            println!("Employee {} is active", employee_id);
        }
        EmployeeCommand::Deactivate { employee_id } => {
            data.set_status(&employee_id, EmployeeStatus::Inactive)?;
            store.save_employees(data)?;
            println!("Employee {} is inactive", employee_id);
        }
        EmployeeCommand::Import { file, joining_date } => {
            let reader = open_csv(&file)?;
            let summary = import_employees(data, reader, joining_date.unwrap_or_else(today))
                .with_context(|| format!("Failed to import employees from {}", file.display()))?;
            store.save_employees(data)?;
            print_import_summary("employees", &summary);
        }
    }
    Ok(())
}

fn attendance_command(
    cmd: AttendanceCommand,
    store: &JsonStore,
    data: &mut PayrollData,
) -> Result<()> {
    match cmd {
        AttendanceCommand::Record {
            employee_id,
            date,
            check_in,
            overtime_hours,
            notes,
        } => {
            let employee = data
                .get_employee(&employee_id)
                .with_context(|| format!("Employee not found: {}", employee_id))?;
            if !employee.overtime_applicable && overtime_hours > Decimal::ZERO {
                warn!(
                    "Overtime is not enabled for {}; hours were not recorded",
                    employee_id
                );
            }
            let record = AttendanceRecord::manual_entry(
                employee,
                date.unwrap_or_else(today),
                &check_in,
                overtime_hours,
                &notes,
            );
            let date = record.date.clone();
            data.record_attendance(record)?;
            store.save_attendance(data)?;
            println!("Recorded attendance for {} on {}", employee_id, date);
        }
        AttendanceCommand::List { employee, period } => {
            let prefix = match (period.year, period.month) {
                (None, None) => String::new(),
                _ => period.resolve()?.prefix(),
            };
            for record in data.records() {
                if employee.as_deref().is_some_and(|id| id != record.employee_id) {
                    continue;
                }
                if !record.date.starts_with(&prefix) {
                    continue;
                }
                println!(
                    "{:<10} {:<12} {:<6} {:>6} {}",
                    record.employee_id,
                    record.date,
                    record.check_in,
                    record.overtime_hours.normalize(),
                    record.notes
                );
            }
        }
        AttendanceCommand::Import { file } => {
            let reader = open_csv(&file)?;
            let summary = import_attendance(data, reader)
                .with_context(|| format!("Failed to import attendance from {}", file.display()))?;
            store.save_attendance(data)?;
            print_import_summary("attendance records", &summary);
        }
        AttendanceCommand::Export { output } => {
            let writer = output_writer(output.as_deref())?;
            write_attendance_csv(data, writer)?;
            if let Some(path) = output {
                info!("Attendance exported to {}", path.display());
            }
        }
    }
    Ok(())
}

fn salary_command(cmd: SalaryCommand, config: &Config, data: &PayrollData) -> Result<()> {
    match cmd {
        SalaryCommand::Calculate {
            employee_id,
            period,
            json,
            slip,
        } => {
            let result = calculate_salary(data, data, &employee_id, period.resolve()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if slip {
                print!("{}", render_slip(&result, &config.currency_symbol));
            } else {
                println!(
                    "{} ({}) {}: {} days, {} overtime hours, net {}{}",
                    result.employee.name,
                    result.employee.employee_id,
                    result.period()?,
                    result.working_days,
                    result.total_overtime_hours.normalize(),
                    config.currency_symbol,
                    format_amount(result.net_salary)
                );
            }
        }
        SalaryCommand::Run { period, output } => {
            let run = run_payroll(data, data, period.resolve()?)?;
            match output {
                Some(path) => {
                    write_payroll_register_csv(&run, output_writer(Some(path.as_path()))?)?;
                    info!("Payroll register written to {}", path.display());
                }
                None => {
                    for result in &run.results {
                        println!(
                            "{:<10} {:<24} {:>4} {:>14}",
                            result.employee.employee_id,
                            result.employee.name,
                            result.working_days,
                            format_amount(result.net_salary)
                        );
                    }
                }
            }
            println!(
                "Total net payroll for {}: {}{}",
                run.period,
                config.currency_symbol,
                format_amount(run.total_net)
            );
        }
    }
    Ok(())
}

fn report_command(cmd: ReportCommand, config: &Config, data: &PayrollData) -> Result<()> {
    match cmd {
        ReportCommand::Dashboard { period, json } => {
            let dash = report::dashboard(data, period.resolve()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dash)?);
            } else {
                println!("Period:            {}", dash.period);
                println!("Total employees:   {}", dash.total_employees);
                println!("Active employees:  {}", dash.active_employees);
                println!(
                    "Monthly payroll:   {}{}",
                    config.currency_symbol,
                    format_amount(dash.monthly_payroll)
                );
                println!(
                    "Avg attendance:    {:.1}",
                    dash.average_attendance_days.round_dp(1)
                );
            }
        }
        ReportCommand::Departments => {
            for (department, count) in report::department_headcount(data) {
                println!("{:<24} {}", department, count);
            }
        }
        ReportCommand::Status => {
            for (status, count) in report::status_distribution(data) {
                println!("{:<10} {}", status, count);
            }
        }
        ReportCommand::Salaries => {
            for (department, salaries) in report::salaries_by_department(data) {
                let total: Decimal = salaries.iter().sum();
                let average = total / Decimal::from(salaries.len());
                println!(
                    "{:<24} employees {:>3}  total {:>14}  average {:>12}",
                    department,
                    salaries.len(),
                    format_amount(total),
                    format_amount(average)
                );
            }
        }
        ReportCommand::Attendance => {
            for (month, count) in report::monthly_attendance_trend(data) {
                println!("{} {}", month, count);
            }
        }
    }
    Ok(())
}

fn data_command(cmd: DataCommand, store: &JsonStore, data: &mut PayrollData) -> Result<()> {
    match cmd {
        DataCommand::Export { dir } => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let employees = dir.join("employees.csv");
            let attendance = dir.join("attendance.csv");
            write_employees_csv(data, output_writer(Some(employees.as_path()))?)?;
            write_attendance_csv(data, output_writer(Some(attendance.as_path()))?)?;
            println!(
                "Exported {} employees and {} attendance records to {}",
                data.employees.len(),
                data.attendance_records.len(),
                dir.display()
            );
        }
        DataCommand::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear all data without --yes");
            }
            data.clear();
            store.save(data)?;
            println!("All employee and attendance data cleared");
        }
        DataCommand::Info => {
            println!(
                "Employees:  {} ({} active) in {}",
                data.employees.len(),
                data.active_employees().count(),
                store.employees_path().display()
            );
            println!(
                "Attendance: {} records in {}",
                data.attendance_records.len(),
                store.attendance_path().display()
            );
        }
    }
    Ok(())
}
