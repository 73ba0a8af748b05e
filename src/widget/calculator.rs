use log::debug;
use serde::{Deserialize, Serialize};

use super::slider::{DragSlider, EventOutcome, PointerEvent, SliderSpec, SliderView};
use super::surface::TrackSurface;
use crate::core::{
    Phase, ProjectionInput, ProjectionSummary, YearRecord, format_currency, format_income_k,
    format_plain, format_pounds_grouped, insight_text, project, summarize,
};

/// The five user-adjustable assumptions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputField {
    #[serde(alias = "currentIncome", alias = "current_income")]
    Income,
    #[serde(alias = "retireAge", alias = "retire_age")]
    RetireAge,
    #[serde(alias = "lifeExpectancy", alias = "life_expectancy")]
    LifeExpectancy,
    #[serde(alias = "contributionPercent", alias = "contribution_percent")]
    ContributionPercent,
    #[serde(alias = "annualRaise", alias = "annual_raise")]
    AnnualRaise,
}

impl InputField {
    pub const ALL: [InputField; 5] = [
        InputField::Income,
        InputField::RetireAge,
        InputField::LifeExpectancy,
        InputField::ContributionPercent,
        InputField::AnnualRaise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputField::Income => "Annual income",
            InputField::RetireAge => "Retire at age",
            InputField::LifeExpectancy => "Life expectancy",
            InputField::ContributionPercent => "Contribution %",
            InputField::AnnualRaise => "Annual raise",
        }
    }

    pub fn slider_spec(self) -> SliderSpec {
        match self {
            InputField::Income => {
                SliderSpec::new(15_000.0, 150_000.0, 1_000.0).with_format(format_income_k)
            }
            InputField::RetireAge => SliderSpec::new(55.0, 75.0, 1.0),
            InputField::LifeExpectancy => SliderSpec::new(70.0, 100.0, 1.0),
            InputField::ContributionPercent => SliderSpec::new(1.0, 30.0, 0.5).with_unit("%"),
            InputField::AnnualRaise => SliderSpec::new(0.0, 10.0, 0.1).with_unit("%"),
        }
    }

    fn highlighted(self) -> bool {
        self == InputField::AnnualRaise
    }

    fn index(self) -> usize {
        match self {
            InputField::Income => 0,
            InputField::RetireAge => 1,
            InputField::LifeExpectancy => 2,
            InputField::ContributionPercent => 3,
            InputField::AnnualRaise => 4,
        }
    }

    fn read(self, input: &ProjectionInput) -> f64 {
        match self {
            InputField::Income => input.current_income,
            InputField::RetireAge => f64::from(input.retire_age),
            InputField::LifeExpectancy => f64::from(input.life_expectancy),
            InputField::ContributionPercent => input.contribution_percent,
            InputField::AnnualRaise => input.annual_raise_percent,
        }
    }

    fn write(self, input: &mut ProjectionInput, value: f64) {
        match self {
            InputField::Income => input.current_income = value,
            InputField::RetireAge => input.retire_age = whole_years(value),
            InputField::LifeExpectancy => input.life_expectancy = whole_years(value),
            InputField::ContributionPercent => input.contribution_percent = value,
            InputField::AnnualRaise => input.annual_raise_percent = value,
        }
    }
}

fn whole_years(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[derive(Debug, Clone)]
struct Projection {
    input: ProjectionInput,
    records: Vec<YearRecord>,
    summary: ProjectionSummary,
}

impl Projection {
    fn compute(input: ProjectionInput) -> Self {
        let records = project(&input);
        let summary = summarize(&input, &records);
        Self {
            input,
            records,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCards {
    pub pot_at_retirement: String,
    pub monthly_income: String,
    pub years_retired: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub age: String,
    pub balance: String,
    pub phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub age: u32,
    pub balance: f64,
    pub phase: Phase,
    /// X-axis label, shown only on round decades of 20 and the retirement age.
    pub tick_label: Option<String>,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub points: Vec<ChartPoint>,
    pub retirement_marker: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSlider {
    pub field: InputField,
    pub label: &'static str,
    pub highlight: bool,
    #[serde(flatten)]
    pub slider: SliderView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorView {
    pub summary: SummaryCards,
    pub chart: ChartView,
    pub sliders: Vec<LabeledSlider>,
    pub insight: String,
    pub footer: String,
}

/// Host-side state for the whole widget: inputs, their sliders, and the
/// projection derived from them.
#[derive(Debug, Clone)]
pub struct Calculator {
    input: ProjectionInput,
    sliders: [DragSlider; 5],
    projection: Projection,
    projection_runs: u64,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_input(ProjectionInput::default())
    }

    /// Starts from `input`, with each adjustable field clamped into its
    /// slider range.
    pub fn with_input(input: ProjectionInput) -> Self {
        let mut input = input;
        let sliders = InputField::ALL.map(|field| {
            let slider = DragSlider::new(field.slider_spec(), field.read(&input));
            field.write(&mut input, slider.value());
            slider
        });
        Self {
            input,
            sliders,
            projection: Projection::compute(input),
            projection_runs: 1,
        }
    }

    pub fn input(&self) -> &ProjectionInput {
        &self.input
    }

    pub fn slider(&self, field: InputField) -> &DragSlider {
        &self.sliders[field.index()]
    }

    /// Single write path for a field outside of a drag. Returns the stored
    /// (clamped) value.
    pub fn set_input(&mut self, field: InputField, value: f64) -> f64 {
        let stored = self.sliders[field.index()].set_value(value);
        field.write(&mut self.input, stored);
        self.refresh();
        stored
    }

    pub fn handle_pointer<S>(
        &mut self,
        field: InputField,
        event: PointerEvent,
        surface: &mut S,
    ) -> EventOutcome
    where
        S: TrackSurface + ?Sized,
    {
        let input = &mut self.input;
        let outcome = self.sliders[field.index()].handle(event, surface, |value| {
            field.write(input, value);
        });
        if outcome.committed.is_some() {
            self.refresh();
        }
        outcome
    }

    pub fn projection(&self) -> &[YearRecord] {
        &self.projection.records
    }

    pub fn summary(&self) -> ProjectionSummary {
        self.projection.summary
    }

    pub fn view(&self) -> CalculatorView {
        let summary = &self.projection.summary;
        let retire_age = self.input.retire_age;

        let points = self
            .projection
            .records
            .iter()
            .map(|record| ChartPoint {
                age: record.age,
                balance: record.balance,
                phase: record.phase,
                tick_label: (record.age % 20 == 0 || record.age == retire_age)
                    .then(|| record.age.to_string()),
                tooltip: Tooltip {
                    age: format!("Age {}", record.age),
                    balance: format_currency(record.balance),
                    phase: record.phase.label().to_string(),
                },
            })
            .collect();

        let sliders = InputField::ALL
            .iter()
            .map(|&field| LabeledSlider {
                field,
                label: field.label(),
                highlight: field.highlighted(),
                slider: self.slider(field).view(),
            })
            .collect();

        let growth_percent = (self.input.investment_return * 10_000.0).round() / 100.0;

        CalculatorView {
            summary: SummaryCards {
                pot_at_retirement: format_currency(summary.balance_at_retirement),
                monthly_income: summary
                    .monthly_income
                    .map_or_else(|| "N/A".to_string(), format_pounds_grouped),
                years_retired: summary.years_retired.to_string(),
            },
            chart: ChartView {
                points,
                retirement_marker: retire_age,
            },
            sliders,
            insight: insight_text(self.input.annual_raise_percent),
            footer: format!(
                "Simplified illustration. Actual returns may vary. Assumes {}% annual growth.",
                format_plain(growth_percent)
            ),
        }
    }

    fn refresh(&mut self) {
        if self.projection.input == self.input {
            return;
        }
        self.projection = Projection::compute(self.input);
        self.projection_runs += 1;
        debug!("projection recomputed (run {})", self.projection_runs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::surface::{TrackBounds, VirtualTrack};

    fn income_track() -> VirtualTrack {
        // 1px per 100 pounds across the 15K..150K income range.
        VirtualTrack::new(TrackBounds::new(0.0, 1_350.0))
    }

    #[test]
    fn defaults_render_reference_labels() {
        let calculator = Calculator::new();
        let view = calculator.view();

        let texts: Vec<_> = view
            .sliders
            .iter()
            .map(|s| s.slider.value_text.as_str())
            .collect();
        assert_eq!(texts, vec!["£35K", "67", "94", "10%", "2.5%"]);
        assert_eq!(view.sliders[0].slider.min_text, "£15K");
        assert_eq!(view.sliders[0].slider.max_text, "£150K");
        assert!(view.sliders[4].highlight);
        assert!(!view.sliders[0].highlight);

        assert_eq!(view.summary.years_retired, "27");
        assert!(view.summary.pot_at_retirement.starts_with('£'));
        assert!(view.summary.pot_at_retirement.ends_with('K'));
        assert!(view.summary.monthly_income.starts_with('£'));
        assert!(view.insight.starts_with("2.5% raises keep you ahead"));
        assert!(view.footer.ends_with("Assumes 5% annual growth."));
        assert_eq!(view.chart.retirement_marker, 67);
        assert_eq!(view.chart.points.len(), 65);
    }

    #[test]
    fn chart_ticks_mark_decades_of_twenty_and_retirement_age() {
        let view = Calculator::new().view();
        let ticks: Vec<_> = view
            .chart
            .points
            .iter()
            .filter_map(|p| p.tick_label.clone())
            .collect();
        assert_eq!(ticks, vec!["40", "60", "67", "80"]);

        let second = &view.chart.points[1];
        assert_eq!(second.tooltip.age, "Age 31");
        assert_eq!(second.tooltip.balance, "£7K");
        assert_eq!(second.tooltip.phase, "Saving");

        let last = view.chart.points.last().expect("points");
        assert_eq!(last.tooltip.balance, "£0");
        assert_eq!(last.tooltip.phase, "Retirement");
    }

    #[test]
    fn dragging_income_writes_back_and_reprojects() {
        let mut calculator = Calculator::new();
        let mut track = income_track();

        let down = PointerEvent::Down {
            pointer_id: 7,
            client_x: 650.0,
        };
        let outcome = calculator.handle_pointer(InputField::Income, down, &mut track);
        assert_eq!(outcome.committed, Some(80_000.0));
        assert_eq!(calculator.input().current_income, 80_000.0);
        assert_eq!(calculator.projection()[0].balance, 8_000.0);
        assert!(calculator.slider(InputField::Income).is_dragging());

        let up = PointerEvent::Up { pointer_id: 7 };
        calculator.handle_pointer(InputField::Income, up, &mut track);
        assert!(!calculator.slider(InputField::Income).is_dragging());
        assert!(!track.has_pointer_capture(7));
    }

    #[test]
    fn each_field_is_written_only_by_its_own_slider() {
        let mut calculator = Calculator::new();
        let mut track = VirtualTrack::new(TrackBounds::new(0.0, 200.0));

        let down = PointerEvent::Down {
            pointer_id: 1,
            client_x: 200.0,
        };
        calculator.handle_pointer(InputField::RetireAge, down, &mut track);

        let input = calculator.input();
        assert_eq!(input.retire_age, 75);
        assert_eq!(input.life_expectancy, 94);
        assert_eq!(input.current_income, 35_000.0);
        assert_eq!(calculator.view().chart.retirement_marker, 75);
    }

    #[test]
    fn summary_tracks_the_current_projection() {
        let mut calculator = Calculator::new();
        let expected = summarize(calculator.input(), calculator.projection());
        assert_eq!(calculator.summary(), expected);
        assert_eq!(calculator.summary().years_retired, 27);

        calculator.set_input(InputField::RetireAge, 60.0);
        let summary = calculator.summary();
        assert_eq!(summary, summarize(calculator.input(), calculator.projection()));
        assert_eq!(summary.years_retired, 34);
        assert_ne!(summary, expected);
    }

    #[test]
    fn sliders_expose_their_field_ranges() {
        let calculator = Calculator::new();
        let income = calculator.slider(InputField::Income).spec();
        assert_eq!(income.min(), 15_000.0);
        assert_eq!(income.max(), 150_000.0);
        assert_eq!(income.step(), 1_000.0);

        let raise = calculator.slider(InputField::AnnualRaise).spec();
        assert_eq!(raise.min(), 0.0);
        assert_eq!(raise.max(), 10.0);
        assert_eq!(raise.step(), 0.1);
    }

    #[test]
    fn projection_is_memoized_on_identical_inputs() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.projection_runs, 1);

        calculator.set_input(InputField::AnnualRaise, 2.5);
        assert_eq!(calculator.projection_runs, 1);

        calculator.set_input(InputField::AnnualRaise, 4.0);
        assert_eq!(calculator.projection_runs, 2);
        assert!(calculator.view().insight.starts_with("With 4% annual raises"));

        let mut track = VirtualTrack::unmeasured();
        let down = PointerEvent::Down {
            pointer_id: 1,
            client_x: 10.0,
        };
        calculator.handle_pointer(InputField::AnnualRaise, down, &mut track);
        assert_eq!(calculator.projection_runs, 2);
        assert_eq!(calculator.input().annual_raise_percent, 4.0);
    }

    #[test]
    fn set_input_clamps_to_slider_range() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.set_input(InputField::Income, 1e9), 150_000.0);
        assert_eq!(calculator.set_input(InputField::ContributionPercent, 0.0), 1.0);
        assert_eq!(calculator.input().current_income, 150_000.0);
        assert_eq!(calculator.slider(InputField::Income).value(), 150_000.0);
    }

    #[test]
    fn retiring_after_life_expectancy_shows_not_applicable_income() {
        let mut calculator = Calculator::new();
        calculator.set_input(InputField::RetireAge, 75.0);
        calculator.set_input(InputField::LifeExpectancy, 70.0);

        let view = calculator.view();
        assert_eq!(view.summary.monthly_income, "N/A");
        assert_eq!(view.summary.years_retired, "-5");
        assert_eq!(view.summary.pot_at_retirement, "£0");
        assert!(view.chart.points.iter().all(|p| p.phase == Phase::Saving));
    }

    #[test]
    fn with_input_clamps_out_of_range_fields() {
        let input = ProjectionInput {
            current_income: 5_000.0,
            retire_age: 40,
            ..ProjectionInput::default()
        };
        let calculator = Calculator::with_input(input);
        assert_eq!(calculator.input().current_income, 15_000.0);
        assert_eq!(calculator.input().retire_age, 55);
        assert_eq!(calculator.input().current_age, 30);
    }

    #[test]
    fn view_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&Calculator::new().view()).expect("view serializes");
        assert!(json.contains("\"potAtRetirement\""));
        assert!(json.contains("\"retirementMarker\""));
        assert!(json.contains("\"tickLabel\""));
        assert!(json.contains("\"valueText\""));
        assert!(json.contains("\"field\":\"annual-raise\""));
        assert!(json.contains("\"phase\":\"saving\""));
    }
}
