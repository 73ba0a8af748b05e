use thousands::Separable;

use super::engine::round_half_up;

/// Compact pound amount for cards, axis ticks and tooltips.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("£{:.1}M", round_half_up(value / 100_000.0) / 10.0)
    } else if value >= 1_000.0 {
        format!("£{:.0}K", round_half_up(value / 1_000.0))
    } else {
        format!("£{value}")
    }
}

/// Income slider label, always in thousands.
pub fn format_income_k(value: f64) -> String {
    format!("£{:.0}K", round_half_up(value / 1_000.0))
}

/// Whole pounds with comma grouping, e.g. `£1,234`.
pub fn format_pounds_grouped(value: f64) -> String {
    format!("£{}", (value as i64).separate_with_commas())
}

/// Bare number the way a slider shows an unformatted value (`4.4`, `67`).
pub fn format_plain(value: f64) -> String {
    format!("{value}")
}

pub fn insight_text(annual_raise_percent: f64) -> String {
    let raise = format_plain(annual_raise_percent);
    if annual_raise_percent >= 3.0 {
        format!("With {raise}% annual raises, your contributions grow significantly!")
    } else if annual_raise_percent >= 1.5 {
        format!("{raise}% raises keep you ahead of inflation. Consider negotiating for more!")
    } else {
        format!("At {raise}% raises, you may fall behind inflation. Focus on career growth.")
    }
}
