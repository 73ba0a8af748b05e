use log::debug;

use super::types::{Phase, ProjectionInput, ProjectionSummary, YearRecord};

/// Runs the two-phase pension simulation, one record per age from
/// `current_age` to `life_expectancy` inclusive.
pub fn project(input: &ProjectionInput) -> Vec<YearRecord> {
    let r = input.investment_return;
    let contribution_rate = input.contribution_percent / 100.0;
    let raise_rate = input.annual_raise_percent / 100.0;

    let mut salary = input.current_income;
    let mut balance = 0.0_f64;
    let mut records = Vec::with_capacity(
        input
            .life_expectancy
            .saturating_add(1)
            .saturating_sub(input.current_age) as usize,
    );

    for age in input.current_age..=input.life_expectancy {
        let phase = if age < input.retire_age {
            balance = accumulate(balance, salary, contribution_rate, r);
            salary *= 1.0 + raise_rate;
            Phase::Saving
        } else {
            let remaining_years = u64::from(input.life_expectancy - age) + 1;
            balance = drawdown(balance, remaining_years, r);
            Phase::Retirement
        };

        records.push(YearRecord {
            age,
            balance: round_half_up(balance),
            phase,
        });
    }

    debug!(
        "projected {} years (ages {}..={}, retiring at {})",
        records.len(),
        input.current_age,
        input.life_expectancy,
        input.retire_age
    );
    records
}

/// Derives the headline numbers a caller shows next to the chart.
pub fn summarize(input: &ProjectionInput, records: &[YearRecord]) -> ProjectionSummary {
    let balance_at_retirement = records
        .iter()
        .find(|record| record.age == input.retire_age)
        .map_or(0.0, |record| record.balance);
    let years_retired = i64::from(input.life_expectancy) - i64::from(input.retire_age);

    ProjectionSummary {
        balance_at_retirement,
        years_retired,
        monthly_income: monthly_income(balance_at_retirement, years_retired),
    }
}

fn monthly_income(balance_at_retirement: f64, years_retired: i64) -> Option<f64> {
    if years_retired <= 0 {
        return None;
    }
    let months = (years_retired * 12) as f64;
    Some(round_half_up(balance_at_retirement / months))
}

fn accumulate(balance: f64, salary: f64, contribution_rate: f64, r: f64) -> f64 {
    balance * (1.0 + r) + salary * contribution_rate
}

// Even drawdown: on the final year `remaining_years` is 1 and the pot empties.
fn drawdown(balance: f64, remaining_years: u64, r: f64) -> f64 {
    let withdrawal = balance / remaining_years as f64;
    (balance - withdrawal) * (1.0 + r * 0.5)
}

/// Nearest integer with halves rounded towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
