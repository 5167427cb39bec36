// src/calculator_tests.rs

#[cfg(test)]
mod tests {
    use crate::calculator::*;
    use crate::directory::PayrollData;
    use crate::error::PayrollError;
    use crate::model::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    // Helper function to create a test employee
    fn create_test_employee(
        id: &str,
        basic_salary: Decimal,
        overtime_applicable: bool,
        overtime_rate: Decimal,
    ) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Worker {}", id),
            phone: "9000000000".to_string(),
            department: "Construction".to_string(),
            position: "Carpenter".to_string(),
            basic_salary,
            overtime_applicable,
            overtime_rate,
            bank: BankDetails {
                bank_account_number: "112233".to_string(),
                ifsc_code: "SBIN0000123".to_string(),
                branch_name: "Station Road".to_string(),
            },
            joining_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    // Helper function to create a test attendance record
    fn create_test_record(id: &str, date: &str, overtime_hours: Decimal) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: id.to_string(),
            date: date.to_string(),
            check_in: "09:00:00".to_string(),
            overtime_hours,
            notes: String::new(),
            recorded_at: "2024-03-31 18:00:00.000000".to_string(),
        }
    }

    // Records on consecutive days of March 2024, with `overtime` spread over the first few.
    fn march_records(id: &str, days: u32, overtime: &[Decimal]) -> Vec<AttendanceRecord> {
        (1..=days)
            .map(|day| {
                let hours = overtime
                    .get((day - 1) as usize)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                create_test_record(id, &format!("2024-03-{:02}", day), hours)
            })
            .collect()
    }

    fn march() -> PayPeriod {
        PayPeriod::new(2024, 3).unwrap()
    }

    #[test]
    fn test_scenario_no_overtime_twenty_days() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, Decimal::ZERO)],
            march_records("E1", 20, &[]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 20);
        assert_eq!(result.basic_salary, dec!(20000.00));
        assert_eq!(result.overtime_pay, Decimal::ZERO);
        assert_eq!(result.total_overtime_hours, Decimal::ZERO);
        assert_eq!(result.gross_salary, dec!(20000.00));
        assert_eq!(result.net_salary, dec!(20000.00));
        assert_eq!(result.month, 3);
        assert_eq!(result.year, 2024);
        assert_eq!(result.employee.employee_id, "E1");
    }

    #[test]
    fn test_scenario_overtime_fifteen_days() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), true, dec!(100))],
            march_records("E1", 15, &[dec!(2), dec!(3.5), dec!(2.5)]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 15);
        assert_eq!(result.total_overtime_hours, dec!(8));
        assert_eq!(result.basic_salary, dec!(15000.00));
        assert_eq!(result.overtime_pay, dec!(800.00));
        assert_eq!(result.gross_salary, dec!(15800.00));
        assert_eq!(result.net_salary, dec!(15800.00));
    }

    #[test]
    fn test_scenario_no_attendance_is_zero_not_error() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), true, dec!(100))],
            march_records("E1", 10, &[dec!(4)])
                .into_iter()
                .map(|mut r| {
                    r.date = r.date.replace("2024-03", "2024-02");
                    r
                })
                .collect(),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 0);
        assert_eq!(result.basic_salary, Decimal::ZERO);
        assert_eq!(result.overtime_pay, Decimal::ZERO);
        assert_eq!(result.gross_salary, Decimal::ZERO);
        assert_eq!(result.net_salary, Decimal::ZERO);
    }

    #[test]
    fn test_scenario_same_date_counted_twice() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, Decimal::ZERO)],
            vec![
                create_test_record("E1", "2024-03-05", Decimal::ZERO),
                create_test_record("E1", "2024-03-05", Decimal::ZERO),
            ],
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 2);
        assert_eq!(result.basic_salary, dec!(2000));
    }

    #[test]
    fn test_unknown_employee_is_not_found() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, Decimal::ZERO)],
            march_records("ghost", 5, &[]),
        );

        let result = calculate_salary(&data, &data, "ghost", march());

        match result {
            Err(PayrollError::NotFound { employee_id }) => assert_eq!(employee_id, "ghost"),
            other => panic!("Wrong result returned: {:?}", other),
        }
    }

    #[test]
    fn test_overtime_ignored_when_not_applicable() {
        // A stale rate left on the profile must not leak into pay.
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, dec!(250))],
            march_records("E1", 3, &[dec!(5), dec!(6), dec!(7)]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.total_overtime_hours, Decimal::ZERO);
        assert_eq!(result.overtime_pay, Decimal::ZERO);
        assert_eq!(result.gross_salary, dec!(3000));
    }

    #[test]
    fn test_prefix_filter_excludes_malformed_and_other_employees() {
        let records = vec![
            create_test_record("E1", "2024-03-01", Decimal::ZERO),
            create_test_record("E1", "2024-03-31T08:00:00", Decimal::ZERO),
            create_test_record("E1", "2024-3-02", Decimal::ZERO),
            create_test_record("E1", "03/03/2024", Decimal::ZERO),
            create_test_record("E1", "2024-04-01", Decimal::ZERO),
            create_test_record("E1", "2023-03-01", Decimal::ZERO),
            create_test_record("E1", "", Decimal::ZERO),
            create_test_record("E2", "2024-03-01", Decimal::ZERO),
        ];
        let data = PayrollData::new(
            vec![
                create_test_employee("E1", dec!(30000), false, Decimal::ZERO),
                create_test_employee("E2", dec!(30000), false, Decimal::ZERO),
            ],
            records,
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        // Only the two records whose text starts with "2024-03".
        assert_eq!(result.working_days, 2);
    }

    #[test]
    fn test_prefix_filter_is_textual_for_out_of_range_years() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(3000), false, Decimal::ZERO)],
            vec![
                create_test_record("E1", "999-01-15", Decimal::ZERO),
                create_test_record("E1", "0999-01-16", Decimal::ZERO),
            ],
        );
        let period = PayPeriod::new(999, 1).unwrap();

        let result = calculate_salary(&data, &data, "E1", period).unwrap();

        assert_eq!(result.working_days, 1);
        assert_eq!(result.basic_salary, dec!(100));
    }

    #[test]
    fn test_more_than_thirty_days_exceeds_monthly_salary() {
        let mut records = march_records("E1", 31, &[]);
        records.push(create_test_record("E1", "2024-03-31", Decimal::ZERO));
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, Decimal::ZERO)],
            records,
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 32);
        assert_eq!(result.basic_salary, dec!(32000));
        assert!(result.basic_salary > result.employee.basic_salary);
    }

    #[test]
    fn test_basic_salary_matches_daily_rate_formula() {
        // Salaries that do not divide evenly by 30.
        for (salary, days) in [
            (dec!(25000), 3u32),
            (dec!(12345.67), 17),
            (dec!(0), 22),
            (dec!(99999.99), 30),
            (dec!(1000), 45),
        ] {
            let data = PayrollData::new(
                vec![create_test_employee("E1", salary, false, Decimal::ZERO)],
                (0..days)
                    .map(|_| create_test_record("E1", "2024-03-10", Decimal::ZERO))
                    .collect(),
            );

            let result = calculate_salary(&data, &data, "E1", march()).unwrap();

            let expected = salary * Decimal::from(days) / dec!(30);
            assert_eq!(result.working_days, days);
            assert_eq!(result.basic_salary, expected, "salary {} days {}", salary, days);
            let via_daily_rate = salary / dec!(30) * Decimal::from(days);
            assert!((result.basic_salary - via_daily_rate).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_uneven_salary_keeps_full_precision() {
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(25000), false, Decimal::ZERO)],
            march_records("E1", 1, &[]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        // 25000 / 30 is not rounded to cents inside the calculation.
        assert_ne!(result.basic_salary, dec!(833.33));
        assert_eq!(result.basic_salary.round_dp(2), dec!(833.33));
    }

    #[test]
    fn test_net_always_equals_gross() {
        let data = PayrollData::new(
            vec![
                create_test_employee("E1", dec!(41000), true, dec!(75.5)),
                create_test_employee("E2", dec!(18000), false, Decimal::ZERO),
            ],
            [
                march_records("E1", 12, &[dec!(1.5), dec!(0.5)]),
                march_records("E2", 26, &[dec!(3)]),
            ]
            .concat(),
        );

        for id in ["E1", "E2"] {
            let result = calculate_salary(&data, &data, id, march()).unwrap();
            assert_eq!(result.net_salary, result.gross_salary);
            assert_eq!(
                result.gross_salary,
                result.basic_salary + result.overtime_pay
            );
        }
    }

    #[test]
    fn test_huge_overtime_hours_ignored_when_overtime_disabled() {
        let huge = Decimal::MAX / dec!(2) + Decimal::ONE;
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), false, dec!(100))],
            march_records("E1", 2, &[huge, huge]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 2);
        assert_eq!(result.total_overtime_hours, Decimal::ZERO);
        assert_eq!(result.overtime_pay, Decimal::ZERO);
        assert_eq!(result.net_salary, dec!(2000));
    }

    #[test]
    fn test_huge_overtime_hours_overflow_when_overtime_enabled() {
        let huge = Decimal::MAX / dec!(2) + Decimal::ONE;
        let data = PayrollData::new(
            vec![create_test_employee("E1", dec!(30000), true, dec!(100))],
            march_records("E1", 2, &[huge, huge]),
        );

        let result = calculate_salary(&data, &data, "E1", march());
        assert!(matches!(result, Err(PayrollError::Overflow { .. })));
    }

    #[test]
    fn test_large_salary_divides_first_when_product_overflows() {
        let basic = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let data = PayrollData::new(
            vec![create_test_employee("E1", basic, false, Decimal::ZERO)],
            march_records("E1", 2, &[]),
        );

        let result = calculate_salary(&data, &data, "E1", march()).unwrap();

        assert_eq!(result.working_days, 2);
        assert_eq!(result.basic_salary, basic / dec!(30) * dec!(2));
        assert!(result.basic_salary > Decimal::from_i128_with_scale(3333 * 10i128.pow(24), 0));
        assert_eq!(result.net_salary, result.basic_salary);
    }

    #[test]
    fn test_run_payroll_skips_inactive_and_totals_net() {
        let mut inactive = create_test_employee("E3", dec!(60000), false, Decimal::ZERO);
        inactive.status = EmployeeStatus::Inactive;
        let data = PayrollData::new(
            vec![
                create_test_employee("E1", dec!(30000), true, dec!(100)),
                create_test_employee("E2", dec!(15000), false, Decimal::ZERO),
                inactive,
            ],
            [
                march_records("E1", 15, &[dec!(8)]),
                march_records("E2", 30, &[]),
                march_records("E3", 30, &[]),
            ]
            .concat(),
        );

        let run = run_payroll(&data, &data, march()).unwrap();

        let ids: Vec<_> = run
            .results
            .iter()
            .map(|r| r.employee.employee_id.as_str())
            .collect();
        assert_eq!(ids, vec!["E1", "E2"]);
        assert_eq!(run.total_net, dec!(15800) + dec!(15000));
        assert_eq!(run.period, march());
    }

    #[test]
    fn test_run_payroll_with_no_employees() {
        let data = PayrollData::default();
        let run = run_payroll(&data, &data, march()).unwrap();
        assert!(run.results.is_empty());
        assert_eq!(run.total_net, Decimal::ZERO);
    }
}
