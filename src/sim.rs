//! Simulation harness
//!
//! Drives the estimator with a synthetic vehicle that repeats a
//! straight / turn / stop cycle while its heading sensor reads a constant
//! bias off the truth.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::error::YawBiasError;
use crate::estimator::{UpdateOutcome, YawBiasEstimator};
use crate::params::YawBiasParams;
use crate::sample::{PoseSample, TwistSample};

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Sample period [s]
    pub dt: f64,
    pub steps: usize,
    /// Constant heading sensor bias [rad]
    pub true_bias: f64,
    /// Speed on straights and turns [m/s]
    pub cruise_speed: f64,
    /// Yaw rate while turning [rad/s]
    pub turn_rate: f64,
    pub straight_steps: usize,
    pub turn_steps: usize,
    pub stop_steps: usize,
    /// Position noise std dev [m]
    pub sigma_position: f64,
    /// Heading noise std dev [rad]
    pub sigma_heading: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            steps: 3000,
            true_bias: 0.03,
            cruise_speed: 8.0,
            turn_rate: 0.2,
            straight_steps: 200,
            turn_steps: 40,
            stop_steps: 30,
            sigma_position: 0.02,
            sigma_heading: 0.005,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), YawBiasError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(YawBiasError::InvalidConfig("dt must be > 0".to_string()));
        }
        if self.straight_steps + self.turn_steps + self.stop_steps == 0 {
            return Err(YawBiasError::InvalidConfig(
                "motion cycle must contain at least one step".to_string(),
            ));
        }
        Ok(())
    }

    fn phase_at(&self, step: usize) -> DrivePhase {
        let cycle = self.straight_steps + self.turn_steps + self.stop_steps;
        let k = step % cycle;
        if k < self.straight_steps {
            DrivePhase::Straight
        } else if k < self.straight_steps + self.turn_steps {
            DrivePhase::Turn
        } else {
            DrivePhase::Stop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrivePhase {
    Straight,
    Turn,
    Stop,
}

/// Simulation results for one time step
#[derive(Debug, Clone, Serialize)]
pub struct SimStep {
    pub t: f64,
    pub true_heading: f64,
    pub true_bias: f64,
    pub speed: f64,
    pub yaw_rate: f64,
    pub estimate: f64,
    pub std_dev: f64,
    pub error: f64,
    pub outcome: &'static str,
}

fn outcome_label(outcome: &UpdateOutcome) -> &'static str {
    match outcome {
        UpdateOutcome::Seeded => "seeded",
        UpdateOutcome::Fused(_) => "fused",
        UpdateOutcome::Rejected(_) => "rejected",
        UpdateOutcome::InvalidInput => "invalid",
        UpdateOutcome::Degenerate => "degenerate",
    }
}

fn noise(sigma: f64) -> Result<Normal<f64>, YawBiasError> {
    Normal::new(0.0, sigma)
        .map_err(|err| YawBiasError::InvalidConfig(format!("invalid noise sigma {sigma}: {err}")))
}

/// Run the synthetic drive
pub fn run_simulation(
    config: &SimConfig,
    params: YawBiasParams,
) -> Result<Vec<SimStep>, YawBiasError> {
    config.validate()?;
    let mut estimator = YawBiasEstimator::new(params)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let position_dist = noise(config.sigma_position)?;
    let heading_dist = noise(config.sigma_heading)?;

    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let mut heading = 0.0_f64;

    let mut results = Vec::with_capacity(config.steps);

    for step in 0..config.steps {
        let t = step as f64 * config.dt;

        let (speed, yaw_rate) = match config.phase_at(step) {
            DrivePhase::Straight => (config.cruise_speed, 0.0),
            DrivePhase::Turn => (config.cruise_speed, config.turn_rate),
            DrivePhase::Stop => (0.0, 0.0),
        };

        // Update true dynamics
        heading += yaw_rate * config.dt;
        x += speed * heading.cos() * config.dt;
        y += speed * heading.sin() * config.dt;

        let pose = PoseSample::from_heading(
            x + position_dist.sample(&mut rng),
            y + position_dist.sample(&mut rng),
            heading + config.true_bias + heading_dist.sample(&mut rng),
            t,
        );
        let twist = TwistSample::new(speed, yaw_rate);

        let outcome = estimator.update(&pose, &twist);
        let state = estimator.state();

        results.push(SimStep {
            t,
            true_heading: heading,
            true_bias: config.true_bias,
            speed,
            yaw_rate,
            estimate: state.estimate,
            std_dev: state.std_dev(),
            error: state.estimate - config.true_bias,
            outcome: outcome_label(&outcome),
        });
    }

    Ok(results)
}

/// Calculate RMS error
pub fn rms_error(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = errors.iter().map(|&e| e * e).sum();
    (sum_sq / errors.len() as f64).sqrt()
}

/// First step from which the absolute error stays below `threshold`
pub fn settling_step(results: &[SimStep], threshold: f64) -> Option<usize> {
    let last_violation = results.iter().rposition(|s| s.error.abs() >= threshold);
    match last_violation {
        None if results.is_empty() => None,
        None => Some(0),
        Some(i) if i + 1 < results.len() => Some(i + 1),
        Some(_) => None,
    }
}

/// Fraction of steps whose observation was fused
pub fn admission_rate(results: &[SimStep]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let fused = results.iter().filter(|s| s.outcome == "fused").count();
    fused as f64 / results.len() as f64
}
