use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::table::{Gender, ScoreBracket, ScoreEvent, ScoreTable};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("score table {version} has no brackets for {event}")]
    NoBracket { event: ScoreEvent, version: String },
}

/// Non-fatal adjustment made to produce a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScoreWarning {
    #[serde(rename_all = "camelCase")]
    AgeClamped { requested: u32, age_min: u32, age_max: u32 },
    #[serde(rename_all = "camelCase")]
    GenderFallback { requested: Gender, used: Gender },
}

impl fmt::Display for ScoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreWarning::AgeClamped { requested, age_min, age_max } => write!(
                f,
                "age {requested} is outside the chart, scored with the {age_min}-{age_max} bracket"
            ),
            ScoreWarning::GenderFallback { requested, used } => {
                write!(f, "no {requested} chart for this event, scored with the {used} chart")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub event: ScoreEvent,
    /// Reps, or elapsed seconds for timed events.
    pub value: u32,
    pub score: u32,
    pub table_version: String,
    pub warnings: Vec<ScoreWarning>,
}

impl ScoreTable {
    /// Standardized score for a raw result. Out-of-chart ages and missing
    /// gender columns still score, with a warning attached.
    pub fn lookup(
        &self,
        event: ScoreEvent,
        age: u32,
        gender: Gender,
        value: u32,
    ) -> Result<ScoreOutcome, ScoreError> {
        let mut warnings = Vec::new();

        let same_gender: Vec<&ScoreBracket> =
            self.brackets_for(event).filter(|b| b.gender == gender).collect();
        let candidates = if same_gender.is_empty() {
            self.brackets_for(event).collect()
        } else {
            same_gender
        };

        let bracket = candidates
            .iter()
            .copied()
            .min_by_key(|b| b.age_distance(age))
            .ok_or_else(|| ScoreError::NoBracket {
                event,
                version: self.version.clone(),
            })?;

        if bracket.gender != gender {
            warnings.push(ScoreWarning::GenderFallback {
                requested: gender,
                used: bracket.gender,
            });
        }
        if !bracket.contains_age(age) {
            warnings.push(ScoreWarning::AgeClamped {
                requested: age,
                age_min: bracket.age_min,
                age_max: bracket.age_max,
            });
        }
        for warning in &warnings {
            log_warn!("[scoring] {}: {}", event, warning);
        }

        Ok(ScoreOutcome {
            event,
            value,
            score: bracket.points_for(value),
            table_version: self.version.clone(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ScoreTable {
        ScoreTable::builtin().unwrap()
    }

    #[test]
    fn in_bracket_lookup_has_no_warnings() {
        let outcome = table().lookup(ScoreEvent::Pushup, 19, Gender::Male, 42).unwrap();
        assert_eq!(outcome.score, 62);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn out_of_range_age_clamps_to_nearest_bracket() {
        let outcome = table().lookup(ScoreEvent::Situp, 35, Gender::Male, 78).unwrap();
        assert_eq!(outcome.score, 100);
        assert_eq!(
            outcome.warnings,
            vec![ScoreWarning::AgeClamped { requested: 35, age_min: 17, age_max: 21 }]
        );
    }

    #[test]
    fn missing_gender_falls_back() {
        let outcome = table().lookup(ScoreEvent::Pullup, 20, Gender::Female, 10).unwrap();
        assert_eq!(outcome.score, 40);
        assert_eq!(
            outcome.warnings,
            vec![ScoreWarning::GenderFallback { requested: Gender::Female, used: Gender::Male }]
        );
    }

    #[test]
    fn picks_the_matching_bracket_among_several() {
        let json = r#"{"version":"multi","brackets":[
            {"event":"pushup","ageMin":17,"ageMax":21,"gender":"male","points":[[0,0],[10,50]]},
            {"event":"pushup","ageMin":22,"ageMax":26,"gender":"male","points":[[0,0],[10,60]]},
            {"event":"pushup","ageMin":17,"ageMax":21,"gender":"female","points":[[0,0],[10,70]]}]}"#;
        let table = ScoreTable::from_json(json).unwrap();

        assert_eq!(table.lookup(ScoreEvent::Pushup, 24, Gender::Male, 10).unwrap().score, 60);
        assert_eq!(table.lookup(ScoreEvent::Pushup, 18, Gender::Female, 10).unwrap().score, 70);

        let older = table.lookup(ScoreEvent::Pushup, 40, Gender::Male, 10).unwrap();
        assert_eq!(older.score, 60);
        assert_eq!(older.warnings.len(), 1);
    }

    #[test]
    fn event_without_brackets_is_an_error() {
        let json = r#"{"version":"partial","brackets":[
            {"event":"pushup","ageMin":17,"ageMax":21,"gender":"male","points":[[0,0]]}]}"#;
        let table = ScoreTable::from_json(json).unwrap();
        assert!(matches!(
            table.lookup(ScoreEvent::TwoMileRun, 20, Gender::Male, 900),
            Err(ScoreError::NoBracket { .. })
        ));
    }
}
