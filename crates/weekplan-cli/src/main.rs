//! weekplan CLI - Weekly Session Planner
//!
//! Command-line interface for checking timetables, laying out sessions in
//! lanes, and rendering week charts and planners.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weekplan_core::{Layouter, Renderer, WeekLayout, WeekPlan};
use weekplan_parser::{parse_config_file, parse_font_sizes_file, read_timetable_file, ParseError, PlanConfig};
use weekplan_render::{ExcelRenderer, SvgRenderer, TextRenderer};
use weekplan_solver::LaneLayouter;

#[derive(Parser)]
#[command(name = "weekplan")]
#[command(author, version, about = "Weekly tutoring plan layout", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML plan configuration
    #[arg(long, value_name = "FILE", env = "WEEKPLAN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Font-size table CSV (Dauer, Schriftgröße)
    #[arg(long, value_name = "FILE", global = true)]
    font_sizes: Option<PathBuf>,

    /// Last day of the planned week (e.g. Freitag, SA, Sunday)
    #[arg(long, value_name = "DAY", global = true)]
    last_day: Option<String>,

    /// Any date inside the planned week (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE", global = true)]
    week_of: Option<NaiveDate>,

    /// Leave invalid sessions out instead of failing
    #[arg(long, global = true)]
    skip_invalid: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a timetable and report every invalid session
    Check {
        /// Timetable CSV
        #[arg(value_name = "TIMETABLE")]
        file: PathBuf,
    },

    /// Compute session lanes
    Layout {
        /// Timetable CSV
        #[arg(value_name = "TIMETABLE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = LayoutFormat::Text)]
        format: LayoutFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the SVG week chart
    Chart {
        /// Timetable CSV
        #[arg(value_name = "TIMETABLE")]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render the XLSX weekly planner
    Planner {
        /// Timetable CSV
        #[arg(value_name = "TIMETABLE")]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the ISO calendar week and year of a date
    Week {
        #[arg(value_name = "DATE")]
        date: NaiveDate,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonLayout {
    title: String,
    calendar_week: u32,
    year: i32,
    days: Vec<JsonDay>,
    skipped: Vec<String>,
}

#[derive(Serialize)]
struct JsonDay {
    day: String,
    date: NaiveDate,
    lane_count: usize,
    sessions: Vec<JsonSession>,
}

#[derive(Serialize)]
struct JsonSession {
    id: usize,
    lane: usize,
    start: String,
    end: String,
    tutor: String,
    topic: String,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<String>,
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// A plan and the timetable rows that did not make it into it
struct LoadedPlan {
    plan: WeekPlan,
    invalid_rows: Vec<ParseError>,
}

/// Timetable, configuration and command-line overrides combined
fn load_plan(cli: &Cli, file: &Path) -> Result<LoadedPlan> {
    let timetable = read_timetable_file(file)
        .with_context(|| format!("Failed to read timetable {}", file.display()))?;
    let sessions = timetable.sessions;

    let mut config = match &cli.config {
        Some(path) => parse_config_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => PlanConfig::default(),
    };
    if let Some(day) = &cli.last_day {
        config.last_day = Some(day.clone());
        config.days = None;
        config.day_widths = None;
    }
    if let Some(date) = cli.week_of {
        config.week_of = Some(date.to_string());
    }
    if config.week_of.is_none() {
        config.week_of = Some(chrono::Local::now().date_naive().to_string());
    }

    let mut plan = config.into_plan(sessions).context("Invalid plan configuration")?;
    if let Some(path) = &cli.font_sizes {
        let table = parse_font_sizes_file(path)
            .with_context(|| format!("Failed to read font sizes {}", path.display()))?;
        plan = plan.font_sizes(table);
    }

    info!(
        sessions = plan.sessions.len(),
        invalid_rows = timetable.invalid_rows.len(),
        days = plan.week.len(),
        week = plan.calendar_week().0,
        "loaded plan"
    );
    Ok(LoadedPlan {
        plan,
        invalid_rows: timetable.invalid_rows,
    })
}

fn layouter(cli: &Cli) -> LaneLayouter {
    LaneLayouter {
        skip_invalid: cli.skip_invalid,
    }
}

/// Lay out a loaded plan; invalid timetable rows fail unless skipped
fn layout_plan(cli: &Cli, loaded: &LoadedPlan) -> Result<WeekLayout> {
    if !loaded.invalid_rows.is_empty() {
        if !cli.skip_invalid {
            let rows: Vec<String> = loaded.invalid_rows.iter().map(ToString::to_string).collect();
            anyhow::bail!(
                "Invalid timetable rows (use --skip-invalid to leave them out): {}",
                rows.join("; ")
            );
        }
        for err in &loaded.invalid_rows {
            warn!("skipping row: {err}");
        }
    }
    layouter(cli)
        .layout(&loaded.plan.sessions, &loaded.plan.week)
        .context("Layout failed (use --skip-invalid to leave invalid sessions out)")
}

fn write_output(output: Option<&Path>, content: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(content).context("Failed to write to stdout")
        }
    }
}

fn json_layout(loaded: &LoadedPlan, layout: &WeekLayout) -> JsonLayout {
    let plan = &loaded.plan;
    let (calendar_week, year) = plan.calendar_week();
    JsonLayout {
        title: plan.display_title(),
        calendar_week,
        year,
        days: layout
            .days
            .iter()
            .map(|day| JsonDay {
                day: day.day.to_string(),
                date: plan.date_of(day.day),
                lane_count: day.lane_count,
                sessions: day
                    .sessions
                    .iter()
                    .filter_map(|placed| {
                        plan.sessions.get(placed.id).map(|s| JsonSession {
                            id: placed.id,
                            lane: placed.lane,
                            start: s.start.format("%H:%M").to_string(),
                            end: s.end.format("%H:%M").to_string(),
                            tutor: s.tutor.clone(),
                            topic: s.topic.clone(),
                            location: s.location.clone(),
                            room: s.room.clone(),
                        })
                    })
                    .collect(),
            })
            .collect(),
        skipped: loaded
            .invalid_rows
            .iter()
            .map(ToString::to_string)
            .chain(layout.rejected.iter().map(ToString::to_string))
            .collect(),
    }
}

/// Report every unreadable row and every session the layout or the
/// planner would reject, plus sessions without a font size
fn check(cli: &Cli, file: &Path) -> Result<ExitCode> {
    let loaded = load_plan(cli, file)?;
    let plan = &loaded.plan;
    let mut problems: Vec<String> = loaded.invalid_rows.iter().map(ToString::to_string).collect();
    problems.extend(
        layouter(cli)
            .check(&plan.sessions, &plan.week)
            .iter()
            .map(ToString::to_string),
    );
    for (id, session) in plan.sessions.iter().enumerate() {
        if session.has_valid_interval() {
            if let Err(err) = plan.font_sizes.select(session.duration()) {
                problems.push(format!("Session {id}: {err}"));
            }
        }
    }
    let lenient = LaneLayouter { skip_invalid: true };
    if let Ok(layout) = lenient.layout(&plan.sessions, &plan.week) {
        for (a, b) in ExcelRenderer::new().shared_cells(plan, &layout) {
            problems.push(format!(
                "Sessions {a} and {b} share a planner cell at {}-minute slots (lower slot_minutes)",
                plan.slot_minutes
            ));
        }
    }

    if problems.is_empty() {
        println!("{}: {} sessions OK", file.display(), plan.sessions.len());
        return Ok(ExitCode::SUCCESS);
    }

    for problem in &problems {
        println!("{}: {problem}", file.display());
    }
    println!("{} problem(s) found", problems.len());
    Ok(ExitCode::FAILURE)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Some(Commands::Check { file }) => check(cli, file),
        Some(Commands::Layout {
            file,
            format,
            output,
        }) => {
            let loaded = load_plan(cli, file)?;
            let layout = layout_plan(cli, &loaded)?;
            let content = match format {
                LayoutFormat::Text => TextRenderer.render(&loaded.plan, &layout)?,
                LayoutFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&json_layout(&loaded, &layout))?;
                    json.push('\n');
                    json
                }
            };
            write_output(output.as_deref(), content.as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Chart { file, output }) => {
            let loaded = load_plan(cli, file)?;
            let layout = layout_plan(cli, &loaded)?;
            let svg = SvgRenderer::new()
                .render(&loaded.plan, &layout)
                .context("Failed to render week chart")?;
            write_output(Some(output.as_path()), svg.as_bytes())?;
            info!(path = %output.display(), "wrote week chart");
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Planner { file, output }) => {
            let loaded = load_plan(cli, file)?;
            let layout = layout_plan(cli, &loaded)?;
            let bytes = ExcelRenderer::new()
                .render(&loaded.plan, &layout)
                .context("Failed to render planner")?;
            write_output(Some(output.as_path()), &bytes)?;
            info!(path = %output.display(), "wrote planner");
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Week { date }) => {
            println!("{}", date.format("%V %G"));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("weekplan - Weekly Session Planner");
            println!("Run with --help for usage information");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}
