/// Exponentially smoothed form score in `[0, 100]`.
///
/// The first evaluated frame seeds the score directly; until then the score
/// reads as a perfect 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormScore {
    value: Option<f64>,
    smoothing: f64,
}

impl FormScore {
    pub fn new(smoothing: f64) -> Self {
        Self {
            value: None,
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
        }
    }

    pub fn update(&mut self, frame_score: f64) -> f64 {
        let frame_score = frame_score.clamp(0.0, 100.0);
        let next = match self.value {
            None => frame_score,
            Some(current) => current + self.smoothing * (frame_score - current),
        };
        let next = next.clamp(0.0, 100.0);
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> f64 {
        self.value.unwrap_or(100.0)
    }
}
