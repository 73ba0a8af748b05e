use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::{
    DEFAULT_ANNUAL_RAISE_PERCENT, DEFAULT_CONTRIBUTION_PERCENT, DEFAULT_CURRENT_AGE,
    DEFAULT_INCOME, DEFAULT_INVESTMENT_RETURN, DEFAULT_LIFE_EXPECTANCY, DEFAULT_RETIRE_AGE,
    ProjectionInput, format_pounds_grouped,
};
use crate::widget::{
    Calculator, CalculatorView, InputField, PointerEvent, TrackBounds, Transition, VirtualTrack,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid replay file: {0}")]
    Replay(#[from] serde_json::Error),
    #[error("{flag} must be a finite number")]
    NonFinite { flag: &'static str },
    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "pensionpot",
    about = "Year-by-year pension pot projection with draggable slider inputs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project the pot for the given assumptions.
    Project {
        #[command(flatten)]
        assumptions: AssumptionArgs,
        #[arg(long, help = "Print the full view model as JSON")]
        json: bool,
    },
    /// Replay a recorded pointer session against the sliders, then project.
    Replay {
        file: PathBuf,
        #[command(flatten)]
        assumptions: AssumptionArgs,
        #[command(flatten)]
        track: TrackArgs,
        #[arg(long, help = "Print the full view model as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AssumptionArgs {
    #[arg(long, default_value_t = DEFAULT_INCOME, help = "Current annual income")]
    pub income: f64,
    #[arg(long, default_value_t = DEFAULT_RETIRE_AGE)]
    pub retire_age: u32,
    #[arg(long, default_value_t = DEFAULT_LIFE_EXPECTANCY)]
    pub life_expectancy: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_CONTRIBUTION_PERCENT,
        help = "Percent of salary paid in each year"
    )]
    pub contribution: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_ANNUAL_RAISE_PERCENT,
        help = "Annual salary raise in percent"
    )]
    pub raise: f64,
    #[arg(long, default_value_t = DEFAULT_CURRENT_AGE)]
    pub current_age: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_INVESTMENT_RETURN * 100.0,
        help = "Annual investment return in percent (halved after retirement)"
    )]
    pub investment_return: f64,
}

impl Default for AssumptionArgs {
    fn default() -> Self {
        Self {
            income: DEFAULT_INCOME,
            retire_age: DEFAULT_RETIRE_AGE,
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
            contribution: DEFAULT_CONTRIBUTION_PERCENT,
            raise: DEFAULT_ANNUAL_RAISE_PERCENT,
            current_age: DEFAULT_CURRENT_AGE,
            investment_return: DEFAULT_INVESTMENT_RETURN * 100.0,
        }
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct TrackArgs {
    #[arg(long, default_value_t = 0.0, help = "Left edge of every slider track")]
    pub track_left: f64,
    #[arg(long, default_value_t = 300.0, help = "Width of every slider track")]
    pub track_width: f64,
}

/// One recorded pointer event, addressed to a slider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReplayStep {
    pub slider: InputField,
    pub event: PointerEvent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub commits: usize,
    pub drags: usize,
}

pub fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Command::Project { assumptions, json } => {
            let calculator = Calculator::with_input(build_input(&assumptions)?);
            info!("projecting {:?}", calculator.input());
            render(&calculator, json)
        }
        Command::Replay {
            file,
            assumptions,
            track,
            json,
        } => {
            let mut calculator = Calculator::with_input(build_input(&assumptions)?);
            let steps = parse_replay(&read_file(&file)?)?;
            let bounds = TrackBounds::new(track.track_left, track.track_width);
            let stats = apply_replay(&mut calculator, &steps, bounds);
            info!(
                "replayed {} events from {} ({} drags, {} commits)",
                stats.events,
                file.display(),
                stats.drags,
                stats.commits
            );
            render(&calculator, json)
        }
    }
}

fn build_input(args: &AssumptionArgs) -> Result<ProjectionInput, CliError> {
    for (flag, value) in [
        ("--income", args.income),
        ("--contribution", args.contribution),
        ("--raise", args.raise),
        ("--investment-return", args.investment_return),
    ] {
        if !value.is_finite() {
            return Err(CliError::NonFinite { flag });
        }
    }

    Ok(ProjectionInput {
        current_age: args.current_age,
        current_income: args.income,
        retire_age: args.retire_age,
        life_expectancy: args.life_expectancy,
        contribution_percent: args.contribution,
        annual_raise_percent: args.raise,
        investment_return: args.investment_return / 100.0,
    })
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_replay(json: &str) -> Result<Vec<ReplayStep>, CliError> {
    Ok(serde_json::from_str(json)?)
}

/// Drives each step through its slider, one virtual track per slider.
pub fn apply_replay(
    calculator: &mut Calculator,
    steps: &[ReplayStep],
    bounds: TrackBounds,
) -> ReplayStats {
    let mut tracks: HashMap<InputField, VirtualTrack> = HashMap::new();
    let mut stats = ReplayStats::default();

    for step in steps {
        let track = tracks
            .entry(step.slider)
            .or_insert_with(|| VirtualTrack::new(bounds));
        let outcome = calculator.handle_pointer(step.slider, step.event, track);
        stats.events += 1;
        if outcome.committed.is_some() {
            stats.commits += 1;
        }
        if outcome.transition == Some(Transition::Started) {
            stats.drags += 1;
        }
        debug!("{:?} on {:?} -> {:?}", step.event, step.slider, outcome);
    }

    stats
}

fn render(calculator: &Calculator, json: bool) -> Result<String, CliError> {
    let view = calculator.view();
    if json {
        let encoded = serde_json::to_string_pretty(&view).map_err(CliError::Encode)?;
        return Ok(encoded + "\n");
    }
    Ok(render_text(&view))
}

fn render_text(view: &CalculatorView) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Pot at retirement  {}\n",
        view.summary.pot_at_retirement
    ));
    out.push_str(&format!(
        "Monthly income     {}\n",
        view.summary.monthly_income
    ));
    out.push_str(&format!("Years retired      {}\n\n", view.summary.years_retired));

    for slider in &view.sliders {
        out.push_str(&format!(
            "{:<16} {:>8}   [{} .. {}]\n",
            slider.label, slider.slider.value_text, slider.slider.min_text, slider.slider.max_text
        ));
    }
    out.push('\n');

    out.push_str("Age  Balance       Phase\n");
    for point in &view.chart.points {
        let marker = if point.age == view.chart.retirement_marker {
            "  <- retirement"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:>3}  {:<12}  {}{}\n",
            point.age,
            format_pounds_grouped(point.balance),
            point.tooltip.phase,
            marker
        ));
    }

    out.push_str(&format!("\n{}\n{}\n", view.insight, view.footer));
    out
}
