use super::{HostMessage, Plugin, PluginId, PluginInfo};
use crate::{
    scheduler::Scheduler,
    simulation::{DataAccessError, SimulatorReader, SimulatorReaderWriter, SimulatorWriter},
    ui::{MenuItemId, Ui, WindowId},
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataAccess {
    ReadOnly,
    ReadWrite,
}

/// The services the host provides to a plugin.
pub struct Host<T: SimulatorReaderWriter> {
    simulator: T,
    scheduler: Scheduler,
    ui: Ui,
    published_data: BTreeMap<String, DataAccess>,
    aircraft_directory: PathBuf,
}
impl<T: SimulatorReaderWriter> Host<T> {
    pub fn new(simulator: T, aircraft_directory: &Path) -> Self {
        Self {
            simulator,
            scheduler: Scheduler::new(),
            ui: Ui::new(),
            published_data: BTreeMap::new(),
            aircraft_directory: aircraft_directory.to_owned(),
        }
    }

    pub fn reader(&mut self) -> SimulatorReader {
        SimulatorReader::new(&mut self.simulator)
    }

    pub fn writer(&mut self) -> SimulatorWriter {
        SimulatorWriter::new(&mut self.simulator)
    }

    pub fn simulator(&self) -> &T {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut T {
        &mut self.simulator
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Resolves a file name relative to the loaded aircraft.
    pub fn aircraft_path(&self, file_name: &str) -> PathBuf {
        self.aircraft_directory.join(file_name)
    }

    /// Makes plugin owned data visible to other plugins and data editors.
    pub fn publish_data(&mut self, name: &str, access: DataAccess) {
        self.published_data.insert(name.to_owned(), access);
    }

    pub fn unpublish_data(&mut self, name: &str) -> bool {
        self.published_data.remove(name).is_some()
    }

    pub fn published_access(&self, name: &str) -> Option<DataAccess> {
        self.published_data.get(name).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginState {
    Loaded,
    Started,
    Enabled,
    Stopped,
}

/// Runs a plugin the way the host simulator does, without the simulator.
pub struct PluginRunner<P: Plugin, T: SimulatorReaderWriter> {
    plugin: P,
    host: Host<T>,
    state: PluginState,
}
impl<P: Plugin, T: SimulatorReaderWriter> PluginRunner<P, T> {
    pub fn new(plugin: P, host: Host<T>) -> Self {
        Self {
            plugin,
            host,
            state: PluginState::Loaded,
        }
    }

    pub fn info(&self) -> PluginInfo {
        self.plugin.info()
    }

    /// Starts the plugin and enables it when it started successfully.
    pub fn start(&mut self) -> Result<(), P::StartError> {
        if self.state != PluginState::Loaded {
            return Ok(());
        }

        self.plugin.start(&mut self.host)?;
        self.state = PluginState::Started;
        self.enable();

        Ok(())
    }

    pub fn enable(&mut self) -> bool {
        if self.state == PluginState::Started && self.plugin.enable(&mut self.host) {
            self.state = PluginState::Enabled;
        }

        self.state == PluginState::Enabled
    }

    pub fn disable(&mut self) {
        if self.state == PluginState::Enabled {
            self.plugin.disable(&mut self.host);
            self.state = PluginState::Started;
        }
    }

    pub fn stop(&mut self) {
        self.disable();
        if self.state == PluginState::Started {
            self.plugin.stop(&mut self.host);
            self.state = PluginState::Stopped;

            if self.host.scheduler.registered_count() > 0 {
                warn!(
                    count = self.host.scheduler.registered_count(),
                    "Plugin left flight loops registered after stopping."
                );
            }
        }
    }

    /// Runs a single frame, calling every due flight loop while the plugin is enabled.
    pub fn frame(&mut self, delta: Duration) {
        if self.state != PluginState::Enabled {
            return;
        }

        for (id, elapsed) in self.host.scheduler.advance(delta) {
            // An earlier loop in this frame may have unregistered this one.
            if self.host.scheduler.is_registered(id) {
                let next = self.plugin.flight_loop(&mut self.host, id, elapsed);
                self.host.scheduler.reschedule(id, next);
            }
        }
    }

    /// Runs frames of `delta` until `duration` has passed. A zero `delta` runs no frames.
    pub fn run_for(&mut self, duration: Duration, delta: Duration) {
        if delta == Duration::from_secs(0) {
            warn!("Cannot run frames with a zero delta.");
            return;
        }

        let mut elapsed = Duration::from_secs(0);
        while elapsed < duration {
            self.frame(delta);
            elapsed += delta;
        }
    }

    pub fn send_message(&mut self, from: PluginId, message: i64) {
        if self.state == PluginState::Loaded || self.state == PluginState::Stopped {
            return;
        }

        match HostMessage::from_raw(message) {
            Some(message) => self.plugin.receive_message(&mut self.host, from, message),
            None => debug!(message, "Ignoring unknown message."),
        }
    }

    /// Selects a menu item as the user would. Returns whether the item exists.
    pub fn select_menu_item(&mut self, item: MenuItemId) -> bool {
        if !self.host.ui.has_menu_item(item) {
            return false;
        }

        self.plugin.menu_action(&mut self.host, item);
        true
    }

    /// Closes a window as the user would.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        self.host.ui.close_window(id).is_some()
    }

    /// Reads data as a data editor would: plugin owned data first, simulator data otherwise.
    pub fn read_data(&mut self, name: &str) -> Option<f64> {
        if self.host.published_access(name).is_some() {
            self.plugin.read_owned_data(name)
        } else {
            self.host.simulator.read(name)
        }
    }

    /// Writes data as a data editor would.
    pub fn write_data(&mut self, name: &str, value: f64) -> Result<(), DataAccessError> {
        match self.host.published_access(name) {
            Some(DataAccess::ReadWrite) => self.plugin.write_owned_data(name, value),
            Some(DataAccess::ReadOnly) => Err(DataAccessError::ReadOnly(name.to_owned())),
            None => self.host.simulator.write(name, value),
        }
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn host(&self) -> &Host<T> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host<T> {
        &mut self.host
    }
}
