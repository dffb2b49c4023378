//! Provides the types for reading data from and writing data to the simulator.
use thiserror::Error;


#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataAccessError {
    #[error("data reference {0} does not exist")]
    NotFound(String),
    #[error("data reference {0} is read-only")]
    ReadOnly(String),
    #[error("data reference {name} rejected the value: {reason}")]
    Rejected { name: String, reason: String },
}

/// Trait for reading data from and writing data to the simulator.
pub trait SimulatorReaderWriter {
    /// Reads the current value of the named data reference.
    /// Returns `None` when the simulator doesn't provide it (yet).
    fn read(&mut self, name: &str) -> Option<f64>;
    /// Writes a value to the named data reference.
    fn write(&mut self, name: &str, value: f64) -> Result<(), DataAccessError>;
}

pub struct SimulatorReader<'a> {
    simulator_read_writer: &'a mut dyn SimulatorReaderWriter,
}
impl<'a> SimulatorReader<'a> {
    pub fn new(simulator_read_writer: &'a mut dyn SimulatorReaderWriter) -> Self {
        Self {
            simulator_read_writer,
        }
    }

    pub fn read_f64(&mut self, name: &str) -> Option<f64> {
        self.simulator_read_writer.read(name)
    }

    pub fn read_bool(&mut self, name: &str) -> Option<bool> {
        self.read_f64(name).map(to_bool)
    }
}

pub struct SimulatorWriter<'a> {
    simulator_read_writer: &'a mut dyn SimulatorReaderWriter,
}
impl<'a> SimulatorWriter<'a> {
    pub fn new(simulator_read_writer: &'a mut dyn SimulatorReaderWriter) -> Self {
        Self {
            simulator_read_writer,
        }
    }

    pub fn write_f64(&mut self, name: &str, value: f64) -> Result<(), DataAccessError> {
        self.simulator_read_writer.write(name, value)
    }

    pub fn write_bool(&mut self, name: &str, value: bool) -> Result<(), DataAccessError> {
        self.write_f64(name, from_bool(value))
    }
}

/// Converts a given `f64` representing a boolean value in the simulator into an actual `bool` value.
pub fn to_bool(value: f64) -> bool {
    (value - 1.).abs() < f64::EPSILON
}

/// Converts a given `bool` value into an `f64` representing that boolean value in the simulator.
pub fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
