//! Yaw bias estimator
//!
//! Composes observation derivation, the motion gate and a scalar filter.
//! Each call consumes one (pose, twist) pair:
//!
//! 1. The first valid pose only seeds the previous-pose cache.
//! 2. Later poses are differenced against the cache, which is then
//!    overwritten whether or not the observation is admitted.
//! 3. Admitted observations are fused into the filter.

use log::{debug, trace, warn};

use crate::error::YawBiasError;
use crate::filter::{FilterState, FusionStatus, ScalarFilter, Simple1DFilter};
use crate::gate::{GateDecision, MotionGate};
use crate::observation::BiasObservation;
use crate::params::YawBiasParams;
use crate::sample::{PoseSample, TwistSample};

/// Lifecycle phase of the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorPhase {
    /// No pose cached yet
    AwaitingSecondSample,
    /// A previous pose is available for differencing
    Steady,
}

/// What a single `update` call did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// First pose cached, nothing to difference against
    Seeded,
    /// Observation merged into the filter
    Fused(BiasObservation),
    /// Observation derived but refused by the motion gate
    Rejected(GateDecision),
    /// Pose or twist contained NaN or infinity; nothing changed
    InvalidInput,
    /// The filter could not weigh the observation; state unchanged
    Degenerate,
}

impl UpdateOutcome {
    pub fn is_fused(&self) -> bool {
        matches!(self, UpdateOutcome::Fused(_))
    }
}

/// Tally of update outcomes since construction or the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounters {
    pub seeded: u64,
    pub fused: u64,
    pub rejected: u64,
    pub invalid: u64,
    pub degenerate: u64,
}

impl UpdateCounters {
    fn record(&mut self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Seeded => self.seeded += 1,
            UpdateOutcome::Fused(_) => self.fused += 1,
            UpdateOutcome::Rejected(_) => self.rejected += 1,
            UpdateOutcome::InvalidInput => self.invalid += 1,
            UpdateOutcome::Degenerate => self.degenerate += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.seeded + self.fused + self.rejected + self.invalid + self.degenerate
    }
}

/// Motion-gated recursive yaw bias estimator
#[derive(Debug, Clone)]
pub struct YawBiasEstimator {
    params: YawBiasParams,
    gate: MotionGate,
    filter: Simple1DFilter,
    previous_pose: Option<PoseSample>,
    counters: UpdateCounters,
}

impl YawBiasEstimator {
    /// Create an estimator, validating its parameters
    pub fn new(params: YawBiasParams) -> Result<Self, YawBiasError> {
        params.validate()?;
        Ok(Self::from_valid_params(params))
    }

    fn from_valid_params(params: YawBiasParams) -> Self {
        Self {
            gate: MotionGate::new(params.gate),
            filter: Self::prior_filter(&params),
            params,
            previous_pose: None,
            counters: UpdateCounters::default(),
        }
    }

    fn prior_filter(params: &YawBiasParams) -> Simple1DFilter {
        Simple1DFilter::new(params.initial_estimate, params.initial_variance)
            .with_process_variance(params.process_variance)
    }

    /// Process one (pose, twist) pair with the configured observation variance
    pub fn update(&mut self, pose: &PoseSample, twist: &TwistSample) -> UpdateOutcome {
        self.update_with_variance(pose, twist, self.params.observation_variance)
    }

    /// Process one (pose, twist) pair with an explicit observation variance
    pub fn update_with_variance(
        &mut self,
        pose: &PoseSample,
        twist: &TwistSample,
        observation_variance: f64,
    ) -> UpdateOutcome {
        let outcome = self.step(pose, twist, observation_variance);
        self.counters.record(&outcome);
        outcome
    }

    fn step(
        &mut self,
        pose: &PoseSample,
        twist: &TwistSample,
        observation_variance: f64,
    ) -> UpdateOutcome {
        if !pose.is_finite() || !twist.is_finite() {
            warn!("ignoring non-finite sample at t={}", pose.timestamp);
            return UpdateOutcome::InvalidInput;
        }

        let Some(previous) = self.previous_pose.replace(*pose) else {
            trace!("seeded previous pose at t={}", pose.timestamp);
            return UpdateOutcome::Seeded;
        };

        let observation = BiasObservation::derive(&previous, pose);
        let decision = self.gate.evaluate(
            twist.linear_speed,
            twist.angular_speed,
            observation.displacement,
        );
        if !decision.is_admitted() {
            debug!(
                "gate rejected observation at t={}: {:?} (speed={:.3}, yaw_rate={:.4}, distance={:.3})",
                pose.timestamp,
                decision,
                twist.linear_speed,
                twist.angular_speed,
                observation.displacement
            );
            return UpdateOutcome::Rejected(decision);
        }

        match self
            .filter
            .update(observation.bias, observation_variance, pose.timestamp)
        {
            FusionStatus::Fused { gain } => {
                trace!(
                    "fused bias {:.5} with gain {:.4} at t={}, estimate={:.5}",
                    observation.bias,
                    gain,
                    pose.timestamp,
                    self.filter.estimate()
                );
                UpdateOutcome::Fused(observation)
            }
            status => {
                warn!(
                    "skipped fusion at t={}: {:?} (observation_variance={})",
                    pose.timestamp, status, observation_variance
                );
                UpdateOutcome::Degenerate
            }
        }
    }

    /// Return to the prior and forget the cached pose
    pub fn reset(&mut self) {
        self.filter = Self::prior_filter(&self.params);
        self.previous_pose = None;
        self.counters = UpdateCounters::default();
    }

    /// Current (estimate, variance, last update time)
    pub fn state(&self) -> FilterState {
        self.filter.state()
    }

    /// Current bias estimate [rad]
    pub fn estimate(&self) -> f64 {
        self.filter.estimate()
    }

    pub fn variance(&self) -> f64 {
        self.filter.variance()
    }

    pub fn last_update_time(&self) -> Option<f64> {
        self.filter.state().last_update_time
    }

    pub fn phase(&self) -> EstimatorPhase {
        match self.previous_pose {
            Some(_) => EstimatorPhase::Steady,
            None => EstimatorPhase::AwaitingSecondSample,
        }
    }

    pub fn previous_pose(&self) -> Option<&PoseSample> {
        self.previous_pose.as_ref()
    }

    pub fn params(&self) -> &YawBiasParams {
        &self.params
    }

    pub fn counters(&self) -> UpdateCounters {
        self.counters
    }
}

impl Default for YawBiasEstimator {
    fn default() -> Self {
        Self::from_valid_params(YawBiasParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pose(x: f64, y: f64, heading: f64, t: f64) -> PoseSample {
        PoseSample::from_heading(x, y, heading, t)
    }

    #[test]
    fn test_estimator_creation() {
        let estimator = YawBiasEstimator::new(YawBiasParams::new(0.1, 2.0, 0.1)).unwrap();
        assert_eq!(estimator.phase(), EstimatorPhase::AwaitingSecondSample);
        assert_eq!(estimator.estimate(), 0.1);
        assert_eq!(estimator.variance(), 2.0);
        assert_eq!(estimator.last_update_time(), None);
    }

    #[test]
    fn test_estimator_rejects_invalid_params() {
        let params = YawBiasParams::new(0.0, 1.0, -0.1);
        assert!(matches!(
            YawBiasEstimator::new(params),
            Err(YawBiasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_update_seeds() {
        let mut estimator = YawBiasEstimator::default();
        let first = pose(0.0, 0.0, 0.0, 0.0);
        let outcome = estimator.update(&first, &TwistSample::new(3.0, 0.0));

        assert_eq!(outcome, UpdateOutcome::Seeded);
        assert_eq!(estimator.phase(), EstimatorPhase::Steady);
        assert_eq!(estimator.previous_pose(), Some(&first));
        assert_eq!(estimator.state(), FilterState::new(0.0, 1e9));
    }

    #[test]
    fn test_admitted_pair_is_fused() {
        let mut estimator = YawBiasEstimator::new(YawBiasParams::new(0.0, 1.0, 0.1)).unwrap();
        let twist = TwistSample::new(3.0, 0.0);
        estimator.update(&pose(0.0, 0.0, 0.0, 0.0), &twist);
        let outcome = estimator.update(&pose(5.0, 0.0, 0.05, 1.0), &twist);

        assert!(outcome.is_fused());
        let gain = 1.0 / 1.1;
        assert_relative_eq!(estimator.estimate(), gain * 0.05, epsilon = 1e-9);
        assert_relative_eq!(estimator.variance(), (1.0 - gain), epsilon = 1e-9);
        assert_eq!(estimator.last_update_time(), Some(1.0));
    }

    #[test]
    fn test_invalid_input_keeps_previous_pose() {
        let mut estimator = YawBiasEstimator::default();
        let twist = TwistSample::new(3.0, 0.0);
        let first = pose(0.0, 0.0, 0.0, 0.0);
        estimator.update(&first, &twist);

        let bad = pose(f64::NAN, 0.0, 0.0, 1.0);
        assert_eq!(estimator.update(&bad, &twist), UpdateOutcome::InvalidInput);
        assert_eq!(
            estimator.update(&pose(5.0, 0.0, 0.0, 1.0), &TwistSample::new(f64::NAN, 0.0)),
            UpdateOutcome::InvalidInput
        );
        assert_eq!(estimator.previous_pose(), Some(&first));
        assert_eq!(estimator.state(), FilterState::new(0.0, 1e9));
    }

    #[test]
    fn test_invalid_first_sample_does_not_seed() {
        let mut estimator = YawBiasEstimator::default();
        let bad = pose(0.0, 0.0, 0.0, f64::NAN);
        assert_eq!(
            estimator.update(&bad, &TwistSample::new(3.0, 0.0)),
            UpdateOutcome::InvalidInput
        );
        assert_eq!(estimator.phase(), EstimatorPhase::AwaitingSecondSample);
    }

    #[test]
    fn test_degenerate_fusion_reported() {
        let params = YawBiasParams::new(0.0, 0.0, 0.1);
        let mut estimator = YawBiasEstimator::new(params).unwrap();
        let twist = TwistSample::new(3.0, 0.0);
        estimator.update(&pose(0.0, 0.0, 0.0, 0.0), &twist);
        let outcome = estimator.update_with_variance(&pose(5.0, 0.0, 0.05, 1.0), &twist, 0.0);

        assert_eq!(outcome, UpdateOutcome::Degenerate);
        assert_eq!(estimator.state(), FilterState::new(0.0, 0.0));
        assert_eq!(estimator.counters().degenerate, 1);
    }

    #[test]
    fn test_counters_and_reset() {
        let mut estimator = YawBiasEstimator::default();
        let twist = TwistSample::new(3.0, 0.0);
        estimator.update(&pose(0.0, 0.0, 0.0, 0.0), &twist);
        estimator.update(&pose(5.0, 0.0, 0.0, 1.0), &twist);
        estimator.update(&pose(5.01, 0.0, 0.0, 2.0), &twist);

        let counters = estimator.counters();
        assert_eq!(counters.seeded, 1);
        assert_eq!(counters.fused, 1);
        assert_eq!(counters.rejected, 1);
        assert_eq!(counters.total(), 3);

        estimator.reset();
        assert_eq!(estimator.phase(), EstimatorPhase::AwaitingSecondSample);
        assert_eq!(estimator.counters(), UpdateCounters::default());
        assert_eq!(estimator.state(), FilterState::new(0.0, 1e9));
    }
}
