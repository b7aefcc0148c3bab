/// Interpolation strategy selectable from scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenKind {
    /// Evenly spread the change across all steps.
    #[default]
    Linear,
}

impl TweenKind {
    /// Build a tween spreading `total_change` over `steps` calls.
    pub fn build(self, total_change: f64, steps: f64) -> Tween {
        match self {
            Self::Linear => Tween::linear(total_change, steps),
        }
    }
}

/// Per-call increment for an accumulated value (blend fraction, threshold).
///
/// A tween does not track frame position: the same step comes back for every
/// frame, and the caller owns the accumulator. After `n` calls the accumulated
/// value is therefore `n * step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tween {
    /// Constant step.
    Linear {
        /// Increment returned by every call.
        step: f64,
    },
}

impl Tween {
    /// Linear tween. Zero change or zero steps yields a zero step.
    pub fn linear(total_change: f64, steps: f64) -> Self {
        let step = if total_change == 0.0 || steps == 0.0 || !steps.is_finite() {
            0.0
        } else {
            total_change / steps
        };
        Self::Linear { step }
    }

    /// Increment for `frame`.
    pub fn step(&self, _frame: u64) -> f64 {
        match self {
            Self::Linear { step } => *step,
        }
    }

    /// Closed-form accumulated value after `calls` steps.
    pub fn accumulated(&self, calls: u64) -> f64 {
        match self {
            Self::Linear { step } => *step * calls as f64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
