use serde::Serialize;

pub const DEFAULT_CURRENT_AGE: u32 = 30;
pub const DEFAULT_INCOME: f64 = 35_000.0;
pub const DEFAULT_RETIRE_AGE: u32 = 67;
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 94;
pub const DEFAULT_CONTRIBUTION_PERCENT: f64 = 10.0;
pub const DEFAULT_ANNUAL_RAISE_PERCENT: f64 = 2.5;
pub const DEFAULT_INVESTMENT_RETURN: f64 = 0.05;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Saving,
    Retirement,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Saving => "Saving",
            Phase::Retirement => "Retirement",
        }
    }
}

/// Assumptions for one projection run.
///
/// Percentages are whole-number percents (`10.0` is 10%), while
/// `investment_return` is a fraction (`0.05` is 5%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub current_age: u32,
    pub current_income: f64,
    pub retire_age: u32,
    pub life_expectancy: u32,
    pub contribution_percent: f64,
    pub annual_raise_percent: f64,
    pub investment_return: f64,
}

impl Default for ProjectionInput {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            current_income: DEFAULT_INCOME,
            retire_age: DEFAULT_RETIRE_AGE,
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
            contribution_percent: DEFAULT_CONTRIBUTION_PERCENT,
            annual_raise_percent: DEFAULT_ANNUAL_RAISE_PERCENT,
            investment_return: DEFAULT_INVESTMENT_RETURN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub age: u32,
    pub balance: f64,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub balance_at_retirement: f64,
    pub years_retired: i64,
    /// `None` when there is no retirement span to spread the pot over.
    pub monthly_income: Option<f64>,
}
