pub mod calibrator;
pub mod profile;

pub use calibrator::Calibrator;
pub use profile::{Anchors, CalibrationProfile, CalibrationSource};
