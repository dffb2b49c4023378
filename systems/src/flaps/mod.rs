use crate::{
    actuator::{ActuatorError, ActuatorSink, ActuatorState, SensorError, SensorSource},
    simulation::{SimulatorReader, SimulatorWriter},
};
use uom::si::{f64::*, ratio::ratio, velocity::knot};

/// Samples the indicated airspeed from the simulator once per tick.
pub struct AirspeedSensor {
    name: String,
    reading: Result<Velocity, SensorError>,
}
impl AirspeedSensor {
    pub const INDICATED_AIRSPEED_KEY: &'static str = "sim/flightmodel/position/indicated_airspeed";

    pub fn new() -> Self {
        Self::named(AirspeedSensor::INDICATED_AIRSPEED_KEY)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            reading: Err(SensorError::Unavailable(name.to_owned())),
        }
    }

    pub fn sample(&mut self, reader: &mut SimulatorReader) {
        self.reading = match reader.read_f64(&self.name) {
            Some(knots) if knots.is_finite() => Ok(Velocity::new::<knot>(knots)),
            Some(_) => Err(SensorError::NotFinite(self.name.clone())),
            None => Err(SensorError::Unavailable(self.name.clone())),
        };
    }
}
impl Default for AirspeedSensor {
    fn default() -> Self {
        Self::new()
    }
}
impl SensorSource for AirspeedSensor {
    fn read(&mut self) -> Result<Velocity, SensorError> {
        self.reading.clone()
    }
}

/// Moves the flap handle. Retracted is fully up, extended is the configured position.
pub struct FlapLever<'a> {
    writer: SimulatorWriter<'a>,
    extended_position: Ratio,
}
impl<'a> FlapLever<'a> {
    pub const FLAP_REQUEST_KEY: &'static str = "sim/flightmodel/controls/flaprqst";

    pub fn new(writer: SimulatorWriter<'a>, extended_position: Ratio) -> Self {
        Self {
            writer,
            extended_position,
        }
    }

    pub fn position_for(state: ActuatorState, extended_position: Ratio) -> Ratio {
        match state {
            ActuatorState::Extended => extended_position,
            ActuatorState::Retracted => Ratio::new::<ratio>(0.),
        }
    }
}
impl<'a> ActuatorSink for FlapLever<'a> {
    fn command(&mut self, state: ActuatorState) -> Result<(), ActuatorError> {
        let position = FlapLever::position_for(state, self.extended_position);
        self.writer
            .write_f64(FlapLever::FLAP_REQUEST_KEY, position.get::<ratio>())?;

        Ok(())
    }
}
