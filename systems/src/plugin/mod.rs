//! The contract between a plugin and the host simulator.
//!
//! The host owns the plugin and calls into it through the [`Plugin`] trait. It starts the
//! plugin once, enables and disables it any number of times, calls its flight loops while
//! enabled, dispatches messages and menu selections, and finally stops it. Services the
//! plugin needs during those calls are provided by the [`Host`].
use crate::{
    scheduler::{FlightLoopId, NextFlightLoop},
    simulation::{DataAccessError, SimulatorReaderWriter},
    ui::MenuItemId,
};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::time::Duration;

mod host;
pub use host::{DataAccess, Host, PluginRunner, PluginState};

#[derive(Clone, Debug, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    pub signature: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PluginId(pub i32);
impl PluginId {
    pub const SIMULATOR: PluginId = PluginId(0);
}

/// Messages sent by the host to all plugins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum HostMessage {
    PlaneCrashed = 101,
    PlaneLoaded = 102,
    AirportLoaded = 103,
    SceneryLoaded = 104,
    AirplaneCountChanged = 105,
    PlaneUnloaded = 106,
    WillWritePrefs = 107,
    LiveryLoaded = 108,
}
impl HostMessage {
    pub fn from_raw(value: i64) -> Option<HostMessage> {
        FromPrimitive::from_i64(value)
    }
}

pub trait Plugin {
    type StartError: std::error::Error;

    fn info(&self) -> PluginInfo;

    fn start<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>)
        -> Result<(), Self::StartError>;

    fn stop<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>);

    /// Returns whether the plugin could be enabled.
    fn enable<T: SimulatorReaderWriter>(&mut self, _host: &mut Host<T>) -> bool {
        true
    }

    fn disable<T: SimulatorReaderWriter>(&mut self, _host: &mut Host<T>) {}

    fn receive_message<T: SimulatorReaderWriter>(
        &mut self,
        _host: &mut Host<T>,
        _from: PluginId,
        _message: HostMessage,
    ) {
    }

    /// Called for every flight loop registered by the plugin which is due.
    /// `elapsed` is the time since the loop was last called.
    fn flight_loop<T: SimulatorReaderWriter>(
        &mut self,
        host: &mut Host<T>,
        id: FlightLoopId,
        elapsed: Duration,
    ) -> NextFlightLoop;

    fn menu_action<T: SimulatorReaderWriter>(&mut self, _host: &mut Host<T>, _item: MenuItemId) {}

    /// Reads data the plugin published through [`Host::publish_data`].
    fn read_owned_data(&self, _name: &str) -> Option<f64> {
        None
    }

    /// Writes data the plugin published as [`DataAccess::ReadWrite`].
    fn write_owned_data(&mut self, name: &str, _value: f64) -> Result<(), DataAccessError> {
        Err(DataAccessError::NotFound(name.to_owned()))
    }
}
