// src/slip.rs
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::SalaryResult;

/// Rounds to whole cents, halves away from zero.
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals with comma thousands separators: `30000` -> `30,000.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = to_cents(amount);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Plain-text salary slip for one result.
pub fn render_slip(result: &SalaryResult, currency: &str) -> String {
    SalarySlip { result, currency }.to_string()
}

struct SalarySlip<'a> {
    result: &'a SalaryResult,
    currency: &'a str,
}

impl SalarySlip<'_> {
    fn money(&self, amount: Decimal) -> String {
        format!("{}{}", self.currency, format_amount(amount))
    }
}

impl fmt::Display for SalarySlip<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let emp = &result.employee;
        let month = result
            .period()
            .map(|p| p.month_name())
            .unwrap_or("Unknown");

        writeln!(f, "==================== SALARY SLIP ====================")?;
        writeln!(f, "Employee Details")?;
        writeln!(f, "  Name:        {}", emp.name)?;
        writeln!(f, "  ID:          {}", emp.employee_id)?;
        writeln!(f, "  Department:  {}", emp.department)?;
        writeln!(f, "  Position:    {}", emp.position)?;
        writeln!(f)?;
        writeln!(f, "Salary Period")?;
        writeln!(f, "  Month:        {}", month)?;
        writeln!(f, "  Year:         {}", result.year)?;
        writeln!(f, "  Working Days: {}", result.working_days)?;
        if emp.overtime_applicable {
            writeln!(
                f,
                "  Overtime Hours: {}",
                result.total_overtime_hours.normalize()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Bank Details")?;
        writeln!(f, "  Account Number: {}", emp.bank.bank_account_number)?;
        writeln!(f, "  IFSC Code:      {}", emp.bank.ifsc_code)?;
        writeln!(f, "  Branch:         {}", emp.bank.branch_name)?;
        writeln!(f, "-----------------------------------------------------")?;
        writeln!(f, "Earnings")?;
        writeln!(f, "  Basic Salary:  {}", self.money(result.basic_salary))?;
        if result.overtime_pay > Decimal::ZERO {
            writeln!(f, "  Overtime Pay:  {}", self.money(result.overtime_pay))?;
        }
        writeln!(f, "  Gross Salary:  {}", self.money(result.gross_salary))?;
        writeln!(f, "-----------------------------------------------------")?;
        writeln!(f, "Net Payable: {}", self.money(result.net_salary))?;
        writeln!(f, "=====================================================")
    }
}
