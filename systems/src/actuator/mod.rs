//! The threshold actuator retracts a controlled surface once a measured speed exceeds
//! a configurable threshold, and extends it again once the speed dropped back below it.
//!
//! A hysteresis band around the threshold prevents the surface from being commanded
//! back and forth when the measured speed hovers around the threshold:
//!
//! - `Extended` becomes `Retracted` when the speed exceeds `threshold + band`.
//! - `Retracted` becomes `Extended` when the speed drops below `threshold - band`.
//!
//! The band is a ratio of the threshold. A ratio of zero gives a bare threshold comparison.
use crate::{
    scheduler::{FlightLoopId, NextFlightLoop, Scheduler},
    shared::WarningThrottle,
    simulation::DataAccessError,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uom::si::{f64::*, ratio::percent, ratio::ratio, velocity::knot};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SensorError {
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("{0} is not a finite number")]
    NotFinite(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ActuatorError {
    #[error(transparent)]
    Simulator(#[from] DataAccessError),
    #[error("command rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(#[from] SensorError),
    #[error("actuator write failed: {0}")]
    ActuatorWriteFailed(#[from] ActuatorError),
}

/// Provides the measured speed.
pub trait SensorSource {
    fn read(&mut self) -> Result<Velocity, SensorError>;
}

/// Applies a commanded position to the controlled surface.
pub trait ActuatorSink {
    fn command(&mut self, state: ActuatorState) -> Result<(), ActuatorError>;
}

/// The last commanded position of the controlled surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActuatorState {
    Extended,
    Retracted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hookup {
    Unhooked,
    Hooked(FlightLoopId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub state: ActuatorState,
    pub transitioned: bool,
    /// The reason the tick was skipped, if it was.
    pub error: Option<ControlError>,
}
impl TickOutcome {
    fn unchanged(state: ActuatorState) -> Self {
        Self {
            state,
            transitioned: false,
            error: None,
        }
    }

    fn skipped(state: ActuatorState, error: ControlError) -> Self {
        Self {
            state,
            transitioned: false,
            error: Some(error),
        }
    }

    fn transitioned(state: ActuatorState) -> Self {
        Self {
            state,
            transitioned: true,
            error: None,
        }
    }
}

pub struct ThresholdActuator {
    threshold: Velocity,
    hysteresis: Ratio,
    state: ActuatorState,
    hookup: Hookup,
    sensor_warning: WarningThrottle,
    actuator_warning: WarningThrottle,
}
impl ThresholdActuator {
    pub const DEFAULT_HYSTERESIS_PERCENT: f64 = 2.;
    const WARNING_INTERVAL: Duration = Duration::from_secs(30);

    pub fn new(threshold: Velocity, hysteresis: Ratio) -> Result<Self, ControlError> {
        validate_threshold(threshold)?;
        validate_hysteresis(hysteresis)?;

        Ok(Self {
            threshold,
            hysteresis,
            state: ActuatorState::Extended,
            hookup: Hookup::Unhooked,
            sensor_warning: WarningThrottle::new(ThresholdActuator::WARNING_INTERVAL),
            actuator_warning: WarningThrottle::new(ThresholdActuator::WARNING_INTERVAL),
        })
    }

    pub fn with_default_hysteresis(threshold: Velocity) -> Result<Self, ControlError> {
        ThresholdActuator::new(
            threshold,
            Ratio::new::<percent>(ThresholdActuator::DEFAULT_HYSTERESIS_PERCENT),
        )
    }

    /// Registers the per tick evaluation with the scheduler.
    pub fn hook(&mut self, scheduler: &mut Scheduler) -> FlightLoopId {
        match self.hookup {
            Hookup::Hooked(id) => id,
            Hookup::Unhooked => {
                let id = scheduler.register(NextFlightLoop::EveryFrame);
                self.hookup = Hookup::Hooked(id);
                debug!(%id, "Threshold actuator hooked.");

                id
            }
        }
    }

    pub fn unhook(&mut self, scheduler: &mut Scheduler) {
        if let Hookup::Hooked(id) = self.hookup {
            scheduler.unregister(id);
            debug!(%id, "Threshold actuator unhooked.");
        }

        self.hookup = Hookup::Unhooked;
    }

    pub fn hookup(&self) -> Hookup {
        self.hookup
    }

    pub fn is_hooked(&self) -> bool {
        matches!(self.hookup, Hookup::Hooked(_))
    }

    pub fn flight_loop(&self) -> Option<FlightLoopId> {
        match self.hookup {
            Hookup::Hooked(id) => Some(id),
            Hookup::Unhooked => None,
        }
    }

    pub fn threshold(&self) -> Velocity {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: Velocity) -> Result<(), ControlError> {
        validate_threshold(threshold)?;
        self.threshold = threshold;

        Ok(())
    }

    pub fn hysteresis(&self) -> Ratio {
        self.hysteresis
    }

    pub fn set_hysteresis(&mut self, hysteresis: Ratio) -> Result<(), ControlError> {
        validate_hysteresis(hysteresis)?;
        self.hysteresis = hysteresis;

        Ok(())
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Evaluates a single tick. Does nothing while unhooked.
    pub fn evaluate_tick<S: SensorSource, A: ActuatorSink>(
        &mut self,
        delta: Duration,
        sensor: &mut S,
        sink: &mut A,
    ) -> TickOutcome {
        if !self.is_hooked() {
            return TickOutcome::unchanged(self.state);
        }

        let speed = match sensor.read().and_then(finite) {
            Ok(speed) => {
                if self.sensor_warning.reset() {
                    info!("Sensor is available again.");
                }

                speed
            }
            Err(err) => {
                let err = ControlError::from(err);
                if let Some(suppressed) = self.sensor_warning.failure(delta) {
                    warn!(error = %err, suppressed, "Skipping tick.");
                }

                return TickOutcome::skipped(self.state, err);
            }
        };

        let next = match self.next_state(speed) {
            Some(next) => next,
            None => return TickOutcome::unchanged(self.state),
        };

        match sink.command(next) {
            Ok(()) => {
                self.actuator_warning.reset();
                info!(
                    speed_kts = speed.get::<knot>(),
                    threshold_kts = self.threshold.get::<knot>(),
                    "Commanded {:?}.",
                    next
                );
                self.state = next;

                TickOutcome::transitioned(next)
            }
            Err(err) => {
                let err = ControlError::from(err);
                if let Some(suppressed) = self.actuator_warning.failure(delta) {
                    error!(error = %err, suppressed, "Failed to command {:?}.", next);
                }

                TickOutcome::skipped(self.state, err)
            }
        }
    }

    /// Compares in knots. Band edges given in knots must not be crossed by rounding.
    fn next_state(&self, speed: Velocity) -> Option<ActuatorState> {
        let speed = speed.get::<knot>();
        let threshold = self.threshold.get::<knot>();
        let band = threshold * self.hysteresis.get::<ratio>();

        match self.state {
            ActuatorState::Extended if speed > threshold + band => Some(ActuatorState::Retracted),
            ActuatorState::Retracted if speed < threshold - band => Some(ActuatorState::Extended),
            _ => None,
        }
    }
}

fn finite(speed: Velocity) -> Result<Velocity, SensorError> {
    if speed.get::<knot>().is_finite() {
        Ok(speed)
    } else {
        Err(SensorError::NotFinite("measured speed".to_owned()))
    }
}

fn validate_threshold(threshold: Velocity) -> Result<(), ControlError> {
    let value = threshold.get::<knot>();
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(ControlError::InvalidParameter {
            name: "threshold",
            value,
        })
    }
}

fn validate_hysteresis(hysteresis: Ratio) -> Result<(), ControlError> {
    let value = hysteresis.get::<percent>();
    if value.is_finite() && (0. ..100.).contains(&value) {
        Ok(())
    } else {
        Err(ControlError::InvalidParameter {
            name: "hysteresis",
            value,
        })
    }
}
