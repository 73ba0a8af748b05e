mod engine;
mod format;
mod types;

pub use engine::{project, summarize};
pub(crate) use engine::round_half_up;
pub use format::{
    format_currency, format_income_k, format_plain, format_pounds_grouped, insight_text,
};
pub use types::{
    DEFAULT_ANNUAL_RAISE_PERCENT, DEFAULT_CONTRIBUTION_PERCENT, DEFAULT_CURRENT_AGE,
    DEFAULT_INCOME, DEFAULT_INVESTMENT_RETURN, DEFAULT_LIFE_EXPECTANCY, DEFAULT_RETIRE_AGE, Phase,
    ProjectionInput, ProjectionSummary, YearRecord,
};
