use crate::core::{GridError, Result};

/// Tolerance used when checking that slip probabilities sum to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Value-iteration parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Discount factor, in (0, 1].
    pub gamma: f64,
    /// Convergence threshold on the largest per-cell change, in (0, 1).
    pub theta: f64,
    /// Probability of moving in the intended direction.
    pub p_forward: f64,
    /// Probability of slipping to the left perpendicular.
    pub p_left: f64,
    /// Probability of slipping to the right perpendicular.
    pub p_right: f64,
    /// Upper bound on the number of sweeps.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 0.01,
            p_forward: 0.8,
            p_left: 0.1,
            p_right: 0.1,
            max_iterations: 10_000,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with_gamma(mut self, gamma: f64) -> Self { self.gamma = gamma; self }

    pub fn with_theta(mut self, theta: f64) -> Self { self.theta = theta; self }

    /// Set forward/left/right slip probabilities.
    pub fn with_slip(mut self, p_forward: f64, p_left: f64, p_right: f64) -> Self {
        self.p_forward = p_forward;
        self.p_left = p_left;
        self.p_right = p_right;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self { self.max_iterations = max_iterations; self }

    /// Deterministic movement (no slipping).
    pub fn deterministic() -> Self { Self::default().with_slip(1.0, 0.0, 0.0) }

    pub fn validate(&self) -> Result<()> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(GridError::InvalidConfig(format!("gamma must be in (0, 1], got {}", self.gamma)));
        }
        if !(self.theta > 0.0 && self.theta < 1.0) {
            return Err(GridError::InvalidConfig(format!("theta must be in (0, 1), got {}", self.theta)));
        }
        for (name, p) in [("p_forward", self.p_forward), ("p_left", self.p_left), ("p_right", self.p_right)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GridError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, p)));
            }
        }
        let total = self.p_forward + self.p_left + self.p_right;
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(GridError::InvalidConfig(format!("slip probabilities must sum to 1, got {}", total)));
        }
        if self.max_iterations == 0 {
            return Err(GridError::InvalidConfig("max_iterations must be at least 1".into()));
        }
        Ok(())
    }
}
