use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::calibration::{CalibrationProfile, CalibrationSource, Calibrator};
use crate::config::GradingConfig;
use crate::counting::transition;
use crate::exercise::ExerciseKind;
use crate::form::{evaluate, rules_for, FormScore, RuleContext};
use crate::pose::PoseFrame;
use crate::scoring::{Gender, ScoreError, ScoreOutcome, ScoreTable};

use super::{AnalysisResult, EngineError, ExerciseState, FrameState, SessionStatus, SessionSummary};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// One grading session for a single exercise.
///
/// Synchronous and lock-free: the host serializes calls on a session, and
/// separate sessions share nothing but the read-only score table.
#[derive(Debug, Clone)]
pub struct GradingEngine {
    kind: ExerciseKind,
    config: GradingConfig,
    score_table: Arc<ScoreTable>,
    status: SessionStatus,
    session_id: Option<String>,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    calibrator: Option<Calibrator>,
    profile: Option<CalibrationProfile>,
    state: ExerciseState,
    form: FormScore,
}

impl GradingEngine {
    pub fn new(kind: ExerciseKind, config: GradingConfig, score_table: Arc<ScoreTable>) -> Self {
        let form = FormScore::new(config.form_smoothing);
        Self {
            kind,
            config,
            score_table,
            status: SessionStatus::AwaitingStart,
            session_id: None,
            started_at: None,
            stopped_at: None,
            calibrator: None,
            profile: None,
            state: ExerciseState::default(),
            form,
        }
    }

    /// Default configuration with the built-in score chart.
    pub fn with_defaults(kind: ExerciseKind) -> anyhow::Result<Self> {
        Ok(Self::new(kind, GradingConfig::default(), Arc::new(ScoreTable::builtin()?)))
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    pub fn profile(&self) -> Option<&CalibrationProfile> {
        self.profile.as_ref()
    }

    pub fn score_table(&self) -> &ScoreTable {
        &self.score_table
    }

    /// Begin a new attempt: fresh state, calibration window open.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if matches!(self.status, SessionStatus::Calibrating | SessionStatus::Active) {
            return Err(EngineError::AlreadyActive);
        }

        self.clear();
        let thresholds = *self.config.thresholds(self.kind);
        self.calibrator = Some(Calibrator::new(self.kind, thresholds, self.config.calibration.clone()));
        self.session_id = Some(Uuid::new_v4().to_string());
        self.started_at = Some(Utc::now());
        self.status = SessionStatus::Calibrating;

        log_info!(
            "[engine] {} session {} started, calibrating",
            self.kind,
            self.session_id.as_deref().unwrap_or_default()
        );
        Ok(())
    }

    /// Joint samples are read through the session's visibility threshold,
    /// whatever threshold the frame was built with.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Result<AnalysisResult, EngineError> {
        match self.status {
            SessionStatus::AwaitingStart => return Err(EngineError::NotStarted),
            SessionStatus::Finished => return Err(EngineError::SessionFinished),
            SessionStatus::Calibrating | SessionStatus::Active => {}
        }

        let frame = frame.with_visibility_threshold(self.config.visibility_threshold);
        Ok(match self.status {
            SessionStatus::Calibrating => self.calibrate(&frame),
            _ => self.grade(&frame),
        })
    }

    /// Drop all session state. The exercise and configuration are kept;
    /// call `start` to grade again.
    pub fn reset(&mut self) {
        if let Some(id) = &self.session_id {
            log_info!("[engine] {} session {} reset", self.kind, id);
        }
        self.clear();
    }

    /// Freeze the count and form score. Stopping twice returns the same summary.
    pub fn stop(&mut self) -> Result<SessionSummary, EngineError> {
        match self.status {
            SessionStatus::AwaitingStart => return Err(EngineError::NotStarted),
            SessionStatus::Finished => return Ok(self.summary()),
            SessionStatus::Calibrating | SessionStatus::Active => {}
        }

        self.status = SessionStatus::Finished;
        self.stopped_at = Some(Utc::now());
        self.calibrator = None;

        log_info!(
            "[engine] {} session {} stopped: {} reps, form {:.0}",
            self.kind,
            self.session_id.as_deref().unwrap_or_default(),
            self.state.repetition_count,
            self.state.form_score
        );
        Ok(self.summary())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            exercise: self.kind,
            status: self.status,
            started_at: self.started_at,
            stopped_at: self.stopped_at,
            rep_count: self.state.repetition_count,
            faulted_reps: self.state.faulted_reps,
            form_issues: self.state.form_issues.clone(),
            form_score: self.state.form_score,
            calibration: self.profile.as_ref().map(|p| p.source),
        }
    }

    /// Standardized score for the current rep count.
    pub fn standard_score(&self, age: u32, gender: Gender) -> Result<ScoreOutcome, ScoreError> {
        self.score_table
            .lookup(self.kind.into(), age, gender, self.state.repetition_count)
    }

    fn clear(&mut self) {
        self.status = SessionStatus::AwaitingStart;
        self.session_id = None;
        self.started_at = None;
        self.stopped_at = None;
        self.calibrator = None;
        self.profile = None;
        self.state = ExerciseState::default();
        self.form = FormScore::new(self.config.form_smoothing);
    }

    fn rep_interval_elapsed(&self, timestamp: DateTime<Utc>) -> bool {
        let min = i64::try_from(self.config.min_rep_duration_ms).unwrap_or(i64::MAX);
        self.state
            .last_rep_at
            .map_or(true, |last| timestamp.signed_duration_since(last).num_milliseconds() >= min)
    }

    fn confidence(&self, frame: &PoseFrame) -> f64 {
        frame.mean_confidence(self.kind.required_joints())
    }

    fn calibrate(&mut self, frame: &PoseFrame) -> AnalysisResult {
        let confidence = self.confidence(frame);
        let mut feedback = vec![self.kind.calibration_prompt().to_string()];

        if let Some(calibrator) = self.calibrator.as_mut() {
            calibrator.observe(frame);
            feedback.push(format!(
                "Calibrating: {}/{} frames.",
                calibrator.accepted(),
                calibrator.required()
            ));
        }

        if self.calibrator.as_ref().is_some_and(Calibrator::is_complete) {
            if let Some(calibrator) = self.calibrator.take() {
                let profile = calibrator.finalize();
                feedback = vec![match profile.source {
                    CalibrationSource::Observed => "Calibration complete. Begin exercise.".to_string(),
                    CalibrationSource::Defaults => {
                        "Calibration timed out, using standard thresholds. Begin exercise.".to_string()
                    }
                }];
                self.profile = Some(profile);
                self.state.last_transition_at = Some(frame.timestamp());
                self.status = SessionStatus::Active;
            }
        }

        self.state.last_feedback = feedback.join(" ");
        AnalysisResult {
            rep_count: 0,
            feedback,
            state: FrameState::Calibrating,
            confidence,
            form_score: self.form.value(),
            rep_completed: false,
            faults: Vec::new(),
        }
    }

    fn grade(&mut self, frame: &PoseFrame) -> AnalysisResult {
        let confidence = self.confidence(frame);
        let timestamp = frame.timestamp();
        let profile = match &self.profile {
            Some(profile) => profile.clone(),
            None => CalibrationProfile::defaults(self.kind, self.config.thresholds(self.kind)),
        };

        let position = self.kind.primary_metric(frame).map(|metric| profile.classify(metric));

        let mut rep_completed = false;
        let confirmed = position.and_then(|position| {
            self.state.streak.observe(position, self.config.stability_frames)
        });
        if let Some(confirmed) = confirmed {
            let step = transition(self.state.phase, confirmed);
            if step.changed {
                self.state.last_transition_at = Some(timestamp);
            }
            if step.rep_completed {
                if self.rep_interval_elapsed(timestamp) {
                    rep_completed = true;
                    self.state.repetition_count += 1;
                    self.state.last_rep_at = Some(timestamp);
                    log_info!(
                        "[engine] {} rep {} counted",
                        self.kind,
                        self.state.repetition_count
                    );
                } else {
                    log_debug!(
                        "[engine] {} rep dropped, under {}ms since the last one",
                        self.kind,
                        self.config.min_rep_duration_ms
                    );
                }
            }
            self.state.phase = step.next;
        } else if position.is_none() {
            log_debug!("[engine] {} frame invalid, phase held", self.kind);
        }

        let held_ms = position.and(self.state.last_transition_at).map(|since| {
            timestamp.signed_duration_since(since).num_milliseconds()
        });
        let ctx = RuleContext {
            frame,
            profile: &profile,
            config: &self.config,
            position,
            held_ms,
        };
        let evaluation = evaluate(rules_for(self.kind), &ctx);

        if evaluation.evaluated > 0 {
            self.form.update(evaluation.frame_score());
        }
        self.state.form_score = self.form.value();
        self.state.note_faults(&evaluation.faults);
        if rep_completed {
            self.state.close_rep();
        }

        let feedback = match position {
            None => {
                let mut messages = vec![self.kind.not_detected_feedback().to_string()];
                messages.extend(evaluation.messages.iter().cloned());
                messages
            }
            Some(position) if evaluation.is_clean() => {
                vec![self.kind.positive_feedback(position).to_string()]
            }
            Some(_) => evaluation.messages.clone(),
        };
        self.state.last_feedback = feedback.join(" ");

        AnalysisResult {
            rep_count: self.state.repetition_count,
            feedback,
            state: position.map(FrameState::from).unwrap_or(FrameState::Invalid),
            confidence,
            form_score: self.state.form_score,
            rep_completed,
            faults: evaluation.faults,
        }
    }
}
