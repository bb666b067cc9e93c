//! Insights CLI - Command-line interface for the mood analytics engine
//!
//! Commands:
//! - compute: Turn an entry history into a statistics snapshot
//! - validate: Check an entry file against the engine's input contract

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use mood_insights::types::mood_score;
use mood_insights::{MoodEntry, StatsEngine, TextMiner, ENGINE_VERSION};

/// Insights - analytics engine for mood journal entries
#[derive(Parser)]
#[command(name = "insights")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute statistics from mood journal entries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a statistics snapshot from an entry history
    Compute {
        /// Input file with a JSON array of entries, newest first (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format; defaults to pretty JSON on a terminal
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Co-occurrence window width in tokens
        #[arg(long, default_value = "5")]
        window: usize,
    },

    /// Check an entry file against the engine's input contract
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), InsightsCliError> {
    match cli.command {
        Commands::Compute {
            input,
            output,
            format,
            window,
        } => cmd_compute(&input, &output, format, window),
        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn cmd_compute(
    input: &PathBuf,
    output: &PathBuf,
    format: Option<OutputFormat>,
    window: usize,
) -> Result<(), InsightsCliError> {
    let entries = read_entries(input)?;

    let engine = StatsEngine::with_miner(TextMiner::new().with_window(window));
    let snapshot = engine.compute(&entries);

    let to_stdout = output.to_string_lossy() == "-";
    let format = format.unwrap_or_else(|| {
        if to_stdout && atty::is(atty::Stream::Stdout) {
            OutputFormat::JsonPretty
        } else {
            OutputFormat::Json
        }
    });

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&snapshot)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&snapshot)?,
    };

    if to_stdout {
        println!("{}", rendered);
    } else {
        fs::write(output, rendered)?;
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), InsightsCliError> {
    let entries = read_entries(input)?;
    let report = build_report(&entries);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total entries:       {}", report.total_entries);
        println!("Without notes:       {}", report.noteless_entries);
        println!("Ordering violations: {}", report.ordering_violations);

        if !report.unmapped_moods.is_empty() {
            println!("\nUnmapped mood labels (excluded from numeric aggregates):");
            for mood in &report.unmapped_moods {
                println!("  - {}", mood);
            }
        }
    }

    if report.ordering_violations > 0 {
        Err(InsightsCliError::NotNewestFirst(report.ordering_violations))
    } else {
        Ok(())
    }
}

fn build_report(entries: &[MoodEntry]) -> ValidationReport {
    let noteless = entries
        .iter()
        .filter(|e| e.note.as_deref().map_or(true, |n| n.trim().is_empty()))
        .count();

    let mut unmapped_moods: Vec<String> = Vec::new();
    for entry in entries {
        if mood_score(&entry.mood).is_none() && !unmapped_moods.contains(&entry.mood) {
            unmapped_moods.push(entry.mood.clone());
        }
    }

    // the engine expects newest-first input; flag every adjacent inversion
    let ordering_violations = entries
        .windows(2)
        .filter(|pair| pair[0].date < pair[1].date)
        .count();

    ValidationReport {
        total_entries: entries.len(),
        noteless_entries: noteless,
        unmapped_moods,
        ordering_violations,
    }
}

fn read_entries(input: &PathBuf) -> Result<Vec<MoodEntry>, InsightsCliError> {
    let data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&data)?)
}

// Error types

#[derive(Debug)]
enum InsightsCliError {
    Io(io::Error),
    Json(serde_json::Error),
    NotNewestFirst(usize),
}

impl From<io::Error> for InsightsCliError {
    fn from(e: io::Error) -> Self {
        InsightsCliError::Io(e)
    }
}

impl From<serde_json::Error> for InsightsCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightsCliError> for CliError {
    fn from(e: InsightsCliError) -> Self {
        match e {
            InsightsCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Input must be a JSON array of mood entries".to_string()),
            },
            InsightsCliError::NotNewestFirst(count) => CliError {
                code: "NOT_NEWEST_FIRST".to_string(),
                message: format!("{} entries out of newest-first order", count),
                hint: Some("Sort entries by date descending before computing".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_entries: usize,
    noteless_entries: usize,
    unmapped_moods: Vec<String>,
    ordering_violations: usize,
}
