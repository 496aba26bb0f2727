use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

const BUILTIN_TABLE: &str = include_str!("../../data/apft_score_table.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreEvent {
    Pushup,
    Situp,
    Pullup,
    /// Timed event, value is elapsed seconds and lower is better.
    TwoMileRun,
}

impl ScoreEvent {
    pub fn is_timed(&self) -> bool {
        matches!(self, ScoreEvent::TwoMileRun)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreEvent::Pushup => "pushup",
            ScoreEvent::Situp => "situp",
            ScoreEvent::Pullup => "pullup",
            ScoreEvent::TwoMileRun => "twoMileRun",
        }
    }
}

impl From<ExerciseKind> for ScoreEvent {
    fn from(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Pushup => ScoreEvent::Pushup,
            ExerciseKind::Situp => ScoreEvent::Situp,
            ExerciseKind::Pullup => ScoreEvent::Pullup,
        }
    }
}

impl fmt::Display for ScoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{other}', expected male or female")),
        }
    }
}

/// One age bracket × gender column of the chart for a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBracket {
    pub event: ScoreEvent,
    pub age_min: u32,
    pub age_max: u32,
    pub gender: Gender,
    /// `(reps or seconds, points)` sorted by value.
    pub points: Vec<(u32, u32)>,
}

impl ScoreBracket {
    pub fn contains_age(&self, age: u32) -> bool {
        (self.age_min..=self.age_max).contains(&age)
    }

    /// Years between `age` and the closest edge of this bracket.
    pub fn age_distance(&self, age: u32) -> u32 {
        if age < self.age_min {
            self.age_min - age
        } else {
            age.saturating_sub(self.age_max)
        }
    }

    /// Points for a raw value. Reps floor to the nearest lower defined
    /// count; times round to the next slower defined time. Both cap at
    /// the ends of the chart.
    pub fn points_for(&self, value: u32) -> u32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0;
        };

        if self.event.is_timed() {
            if value <= first.0 {
                return first.1;
            }
            self.points
                .iter()
                .find(|(time, _)| *time >= value)
                .map(|(_, score)| *score)
                .unwrap_or(last.1)
        } else {
            self.points
                .iter()
                .rev()
                .find(|(reps, _)| *reps <= value)
                .map(|(_, score)| *score)
                .unwrap_or(0)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.age_min > self.age_max {
            bail!(
                "{} bracket has ageMin {} above ageMax {}",
                self.event,
                self.age_min,
                self.age_max
            );
        }
        if self.points.is_empty() {
            bail!("{} bracket {}-{} has no points", self.event, self.age_min, self.age_max);
        }
        for pair in self.points.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.0 <= prev.0 {
                bail!("{} bracket values must be strictly increasing at {}", self.event, next.0);
            }
            let ordered = if self.event.is_timed() {
                next.1 <= prev.1
            } else {
                next.1 >= prev.1
            };
            if !ordered {
                bail!("{} bracket scores are not monotonic at {}", self.event, next.0);
            }
        }
        if let Some((value, score)) = self.points.iter().find(|(_, score)| *score > 100) {
            bail!("{} bracket scores {} points at {}, above 100", self.event, score, value);
        }
        Ok(())
    }
}

/// Versioned scoring chart. Loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTable {
    pub version: String,
    #[serde(default)]
    pub source: String,
    pub brackets: Vec<ScoreBracket>,
}

impl ScoreTable {
    /// Chart compiled into the binary from `data/apft_score_table.json`.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE).context("Built-in score table is invalid")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read score table {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to load score table {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let table: ScoreTable = serde_json::from_str(contents).context("Failed to parse score table")?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        if self.brackets.is_empty() {
            bail!("score table {} has no brackets", self.version);
        }
        for bracket in &self.brackets {
            bracket.validate()?;
        }
        Ok(())
    }

    pub fn brackets_for(&self, event: ScoreEvent) -> impl Iterator<Item = &ScoreBracket> {
        self.brackets.iter().filter(move |b| b.event == event)
    }
}
