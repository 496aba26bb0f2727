use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use repgrade_lib::{
    ExerciseKind, Gender, GradingConfig, GradingEngine, Landmark, PoseFrame, ScoreOutcome,
    ScoreTable, SessionSummary, YAxis,
};

#[derive(Parser, Debug)]
#[command(name = "repgrade")]
#[command(about = "Replay recorded pose landmarks through the rep grading engine", long_about = None)]
#[command(after_help = "Input is JSON lines: {\"timestampMs\": 0, \"landmarks\": [{\"x\": 0.5, \"y\": 0.4, \"visibility\": 0.9}, ...]} in MediaPipe landmark order.")]
struct Cli {
    /// Exercise to grade: pushup, situp or pullup
    #[arg(long)]
    exercise: ExerciseKind,

    /// JSON-lines file of recorded frames
    #[arg(long)]
    input: PathBuf,

    /// Grading config JSON (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score table JSON (built-in chart when omitted)
    #[arg(long)]
    score_table: Option<PathBuf>,

    /// Age used for the standardized score
    #[arg(long)]
    age: Option<u32>,

    /// Gender used for the standardized score (default: male)
    #[arg(long)]
    gender: Option<Gender>,

    /// Vertical axis convention of the recording, overrides the config
    #[arg(long, value_enum)]
    y_axis: Option<AxisArg>,

    /// Emit debug logs
    #[arg(long)]
    debug: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AxisArg {
    Down,
    Up,
}

impl From<AxisArg> for YAxis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Down => YAxis::Down,
            AxisArg::Up => YAxis::Up,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameRecord {
    timestamp_ms: i64,
    landmarks: Vec<Landmark>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    summary: SessionSummary,
    score: Option<ScoreOutcome>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let mut config = match &cli.config {
        Some(path) => GradingConfig::load(path)?,
        None => GradingConfig::default(),
    };
    if let Some(axis) = cli.y_axis {
        config.y_axis = axis.into();
    }

    let table = match &cli.score_table {
        Some(path) => ScoreTable::load(path)?,
        None => ScoreTable::builtin()?,
    };

    let ingest = config.ingest_options();
    let mut engine = GradingEngine::new(cli.exercise, config, Arc::new(table));
    engine.start()?;

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid frame on line {}", index + 1))?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(record.timestamp_ms)
            .with_context(|| format!("Timestamp out of range on line {}", index + 1))?;

        let frame = PoseFrame::from_landmarks(&record.landmarks, timestamp, &ingest);
        let result = engine.process_frame(&frame)?;
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    }

    let summary = engine.stop()?;
    let score = match cli.age {
        Some(age) => Some(engine.standard_score(age, cli.gender.unwrap_or(Gender::Male))?),
        None => None,
    };

    let report = ReplayReport { summary, score };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
