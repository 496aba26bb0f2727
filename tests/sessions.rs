mod common;

use common::{pushup_frame, Driver, ARM_CYCLE};
use repgrade_lib::{
    CalibrationSource, ExerciseKind, FaultKind, FormIssue, FrameState, Gender, Joint, PoseFrame,
    SessionStatus,
};

#[test]
fn pushup_session_counts_three_clean_reps() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();

    let profile = driver.engine.profile().unwrap();
    assert_eq!(profile.source, CalibrationSource::Observed);
    assert!((profile.up_threshold - 160.0).abs() < 1e-6);

    let results = driver.cycles(3);
    let last = results.last().unwrap();
    assert_eq!(last.rep_count, 3);
    assert_eq!(results.iter().filter(|r| r.rep_completed).count(), 3);
    assert!(results
        .iter()
        .all(|r| !r.faults.contains(&FaultKind::HipsSagging)));
    assert_eq!(last.form_score, 100.0);
    assert_eq!(last.state, FrameState::Up);
    assert_eq!(last.feedback, vec!["Good form! Lower your body.".to_string()]);
}

#[test]
fn sagging_hips_are_reported_and_lower_the_score() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();

    let result = driver.feed(|ms| pushup_frame(ms, 170.0, 0.12));
    assert_eq!(result.faults, vec![FaultKind::HipsSagging]);
    assert!(result.feedback[0].contains("sagging"));
    assert_eq!(result.form_score, 80.0);
}

#[test]
fn missing_wrists_make_the_frame_invalid() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();
    driver.cycles(1);

    let result = driver.feed(|ms| {
        let full = pushup_frame(ms, 120.0, 0.0);
        let mut b = PoseFrame::builder(full.timestamp());
        for joint in Joint::ALL {
            if let Some(sample) = full.sample(joint) {
                let confidence = match joint {
                    Joint::LeftWrist | Joint::RightWrist => 0.0,
                    _ => sample.confidence,
                };
                b = b.sample(joint, sample.position, confidence);
            }
        }
        b.build()
    });

    assert_eq!(result.state, FrameState::Invalid);
    assert!(!result.feedback.is_empty());
    assert!(result.feedback[0].starts_with("Position not detected"));
    assert_eq!(result.rep_count, 1);
    assert!(result.confidence < 1.0);
    assert!(driver.engine.state().is_up());
}

#[test]
fn situp_session_counts_each_rise() {
    let mut driver = Driver::started(ExerciseKind::Situp);
    driver.calibrate();

    let profile = driver.engine.profile().unwrap();
    assert!((profile.down_threshold - 15.0).abs() < 1e-6);
    assert!(profile.anchors.hip_y.is_some());

    let results = driver.cycles(4);
    assert_eq!(results.last().unwrap().rep_count, 4);
    assert!(results.iter().all(|r| r.faults.is_empty()));
}

#[test]
fn pullup_session_counts_and_checks_the_chin() {
    let mut driver = Driver::started(ExerciseKind::Pullup);
    driver.calibrate();

    let profile = driver.engine.profile().unwrap();
    assert!((profile.down_threshold - 160.0).abs() < 1e-6);
    assert_eq!(profile.up_threshold, 90.0);

    let results = driver.cycles(2);
    assert_eq!(results.last().unwrap().rep_count, 2);
    assert!(results.iter().all(|r| r.faults.is_empty()), "{results:?}");

    // Elbows bent to the top but the nose stays below the hands.
    let result = driver.feed(|ms| {
        let frame = common::pullup_frame(ms, 80.0);
        let nose = frame.point(Joint::Nose).unwrap();
        let mut b = PoseFrame::builder(frame.timestamp());
        for joint in Joint::ALL {
            if let Some(sample) = frame.sample(joint) {
                b = b.sample(joint, sample.position, sample.confidence);
            }
        }
        b.joint(Joint::Nose, nose.x, 0.4).build()
    });
    assert_eq!(result.state, FrameState::Up);
    assert!(result.faults.contains(&FaultKind::ChinBelowBar));
}

#[test]
fn holding_still_raises_the_pausing_fault() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();

    let mut last = driver.metric(170.0);
    for _ in 0..25 {
        last = driver.metric(170.0);
    }
    assert!(last.faults.contains(&FaultKind::Pausing));
    assert_eq!(last.rep_count, 0);
}

#[test]
fn stop_freezes_results_and_scores_the_attempt() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();
    driver.cycles(3);

    let summary = driver.engine.stop().unwrap();
    assert_eq!(summary.status, SessionStatus::Finished);
    assert_eq!(summary.rep_count, 3);
    assert_eq!(summary.calibration, Some(CalibrationSource::Observed));
    assert!(summary.stopped_at.is_some());

    let frame = pushup_frame(driver.clock_ms, 80.0, 0.0);
    assert!(driver.engine.process_frame(&frame).is_err());
    assert_eq!(driver.engine.state().repetition_count, 3);

    let score = driver.engine.standard_score(20, Gender::Male).unwrap();
    assert_eq!(score.score, 4);
    assert!(score.warnings.is_empty());
}

#[test]
fn reps_with_faults_are_counted_and_tallied() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    driver.calibrate();

    for elbow in ARM_CYCLE {
        driver.feed(|ms| pushup_frame(ms, elbow, 0.12));
    }
    driver.cycles(2);

    let summary = driver.engine.stop().unwrap();
    assert_eq!(summary.rep_count, 3);
    assert_eq!(summary.faulted_reps, 1);
    assert_eq!(
        summary.form_issues,
        vec![FormIssue { fault: FaultKind::HipsSagging, count: 1 }]
    );
}

#[test]
fn analysis_result_serializes_in_camel_case() {
    let mut driver = Driver::started(ExerciseKind::Pushup);
    let result = driver.metric(170.0);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["repCount"], 0);
    assert_eq!(json["state"], "calibrating");
    assert_eq!(json["formScore"], 100.0);
    assert_eq!(json["repCompleted"], false);
    assert!(json["feedback"].is_array());

    let summary = serde_json::to_value(driver.engine.summary()).unwrap();
    assert_eq!(summary["faultedReps"], 0);
    assert!(summary["formIssues"].as_array().unwrap().is_empty());
}
