use std::time::Duration;
use systems::{
    actuator::{ControlError, ThresholdActuator, TickOutcome},
    flaps::{AirspeedSensor, FlapLever},
    plugin::{DataAccess, Host},
    scheduler::FlightLoopId,
    simulation::SimulatorReaderWriter,
};
use uom::si::{f64::*, velocity::knot};

/// Retracts the flaps when the aircraft exceeds the threshold speed.
/// The threshold is published so it can be adjusted in-flight using a data editor.
pub struct FlapRetractor {
    actuator: ThresholdActuator,
    airspeed: AirspeedSensor,
    extended_position: Ratio,
}
impl FlapRetractor {
    pub const THRESHOLD_KEY: &'static str = "PPLDemo/flap_retract_speed_kts";

    pub fn new(
        threshold: Velocity,
        hysteresis: Ratio,
        extended_position: Ratio,
    ) -> Result<Self, ControlError> {
        Ok(Self {
            actuator: ThresholdActuator::new(threshold, hysteresis)?,
            airspeed: AirspeedSensor::new(),
            extended_position,
        })
    }

    pub fn hook_to_sim<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        self.actuator.hook(host.scheduler_mut());
        host.publish_data(FlapRetractor::THRESHOLD_KEY, DataAccess::ReadWrite);
    }

    pub fn unhook_from_sim<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        self.actuator.unhook(host.scheduler_mut());
        host.unpublish_data(FlapRetractor::THRESHOLD_KEY);
    }

    /// Stops the per tick evaluation while keeping the threshold published.
    pub fn pause<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        self.actuator.unhook(host.scheduler_mut());
    }

    pub fn owns(&self, id: FlightLoopId) -> bool {
        self.actuator.flight_loop() == Some(id)
    }

    pub fn is_hooked(&self) -> bool {
        self.actuator.is_hooked()
    }

    pub fn tick<T: SimulatorReaderWriter>(
        &mut self,
        host: &mut Host<T>,
        elapsed: Duration,
    ) -> TickOutcome {
        self.airspeed.sample(&mut host.reader());

        let mut lever = FlapLever::new(host.writer(), self.extended_position);
        self.actuator.evaluate_tick(elapsed, &mut self.airspeed, &mut lever)
    }

    pub fn threshold(&self) -> Velocity {
        self.actuator.threshold()
    }

    pub fn threshold_knots(&self) -> f64 {
        self.threshold().get::<knot>()
    }

    pub fn set_threshold_knots(&mut self, knots: f64) -> Result<(), ControlError> {
        self.actuator.set_threshold(Velocity::new::<knot>(knots))
    }

    pub fn actuator(&self) -> &ThresholdActuator {
        &self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::assert_about_eq;
    use std::path::Path;
    use systems::{
        actuator::ActuatorState, scheduler::NextFlightLoop, simulation::test::TestReaderWriter,
    };
    use uom::si::ratio::percent;

    struct FlapRetractorTestBed {
        retractor: FlapRetractor,
        host: Host<TestReaderWriter>,
    }
    impl FlapRetractorTestBed {
        fn new() -> Self {
            let mut test_bed = Self {
                retractor: FlapRetractor::new(
                    Velocity::new::<knot>(80.),
                    Ratio::new::<percent>(2.),
                    Ratio::new::<percent>(50.),
                )
                .unwrap(),
                host: Host::new(TestReaderWriter::new(), Path::new("/aircraft")),
            };
            test_bed.retractor.hook_to_sim(&mut test_bed.host);

            test_bed
        }

        fn airspeed(mut self, knots: f64) -> Self {
            self.host
                .simulator_mut()
                .set_f64(AirspeedSensor::INDICATED_AIRSPEED_KEY, knots);
            self
        }

        fn tick(&mut self) -> TickOutcome {
            self.retractor.tick(&mut self.host, Duration::from_millis(50))
        }

        fn flap_request(&self) -> Option<f64> {
            self.host.simulator().get_f64(FlapLever::FLAP_REQUEST_KEY)
        }
    }

    #[test]
    fn hooking_publishes_the_threshold() {
        let test_bed = FlapRetractorTestBed::new();

        assert_eq!(
            test_bed.host.published_access(FlapRetractor::THRESHOLD_KEY),
            Some(DataAccess::ReadWrite)
        );
        assert!(test_bed.retractor.is_hooked());
    }

    #[test]
    fn owns_its_flight_loop_only() {
        let mut test_bed = FlapRetractorTestBed::new();
        let other = test_bed
            .host
            .scheduler_mut()
            .register(NextFlightLoop::EveryFrame);

        assert!(!test_bed.retractor.owns(other));
        assert_eq!(test_bed.host.scheduler().registered_count(), 2);
    }

    #[test]
    fn retracts_flaps_above_threshold() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);

        let outcome = test_bed.tick();

        assert_eq!(outcome.state, ActuatorState::Retracted);
        assert_about_eq!(test_bed.flap_request().unwrap(), 0.);
    }

    #[test]
    fn extends_flaps_again_below_threshold() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);
        test_bed.tick();

        let mut test_bed = test_bed.airspeed(60.);
        test_bed.tick();

        assert_about_eq!(test_bed.flap_request().unwrap(), 0.5);
    }

    #[test]
    fn does_not_touch_flaps_below_threshold() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(60.);

        test_bed.tick();

        assert_eq!(test_bed.flap_request(), None);
    }

    #[test]
    fn does_not_touch_flaps_without_airspeed() {
        let mut test_bed = FlapRetractorTestBed::new();

        let outcome = test_bed.tick();

        assert!(outcome.error.is_some());
        assert_eq!(test_bed.flap_request(), None);
    }

    #[test]
    fn keeps_flaps_extended_when_the_handle_is_read_only() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);
        test_bed
            .host
            .simulator_mut()
            .make_read_only(FlapLever::FLAP_REQUEST_KEY);

        let outcome = test_bed.tick();

        assert_eq!(outcome.state, ActuatorState::Extended);
        assert_eq!(
            test_bed.retractor.actuator().state(),
            ActuatorState::Extended
        );
    }

    #[test]
    fn writes_the_flap_handle_only_on_transitions() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);

        for _ in 0..3 {
            test_bed.tick();
        }

        assert_eq!(test_bed.host.simulator().write_count(), 1);
    }

    #[test]
    fn retracts_once_the_handle_becomes_writable_again() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);
        test_bed
            .host
            .simulator_mut()
            .make_read_only(FlapLever::FLAP_REQUEST_KEY);
        test_bed.tick();

        test_bed
            .host
            .simulator_mut()
            .make_writable(FlapLever::FLAP_REQUEST_KEY);
        let outcome = test_bed.tick();

        assert!(outcome.transitioned);
        assert_about_eq!(test_bed.flap_request().unwrap(), 0.);
    }

    #[test]
    fn unhooking_unpublishes_and_stops_ticking() {
        let mut test_bed = FlapRetractorTestBed::new().airspeed(90.);

        test_bed.retractor.unhook_from_sim(&mut test_bed.host);
        let outcome = test_bed.tick();

        assert!(!outcome.transitioned);
        assert_eq!(
            test_bed.host.published_access(FlapRetractor::THRESHOLD_KEY),
            None
        );
        assert_eq!(test_bed.host.scheduler().registered_count(), 0);
    }

    #[test]
    fn pausing_keeps_the_threshold_published() {
        let mut test_bed = FlapRetractorTestBed::new();

        test_bed.retractor.pause(&mut test_bed.host);

        assert!(!test_bed.retractor.is_hooked());
        assert!(test_bed
            .host
            .published_access(FlapRetractor::THRESHOLD_KEY)
            .is_some());
    }
}
