use std::time::Duration;
use systems::{
    actuator::ControlError,
    config::{ConfigError, ConfigStore, TomlConfigStore},
    logging::{self, WorkerGuard},
    plugin::{Host, HostMessage, Plugin, PluginId, PluginInfo},
    scheduler::{FlightLoopId, NextFlightLoop},
    simulation::{DataAccessError, SimulatorReaderWriter},
    ui::{DisplayId, MenuItemId, OnScreenDisplay},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

mod flap_retractor;
mod menu;
mod message;
mod settings;

pub use flap_retractor::FlapRetractor;
pub use menu::{DemoMenu, Foo};
pub use message::MessageTimer;
pub use settings::{FlapSettings, FLAP_RETRACT_SPEED};

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Demonstrates the plugin features: a flap retractor with an editable threshold,
/// a delayed message window, an on screen display and a menu.
pub struct PplDemo {
    log: Option<WorkerGuard>,
    settings: Option<TomlConfigStore>,
    flap_retractor: Option<FlapRetractor>,
    message_timer: MessageTimer,
    on_screen_display: Option<DisplayId>,
    menu: DemoMenu,
}
impl PplDemo {
    pub const NAME: &'static str = "PPLDemo";
    pub const SETTINGS_FILE_NAME: &'static str = "PPLDemo.toml";
    pub const LOG_FILE_NAME: &'static str = "PPLDemo.log";
    pub const ON_SCREEN_DISPLAY_TEXT: &'static str = "Hi I'm a PPL::OnScreenDisplay";

    pub fn new() -> Self {
        Self::with_message_delay(MessageTimer::DEFAULT_DELAY)
    }

    pub fn with_message_delay(delay: Duration) -> Self {
        Self {
            log: None,
            settings: None,
            flap_retractor: None,
            message_timer: MessageTimer::new(delay),
            on_screen_display: None,
            menu: DemoMenu::new(),
        }
    }

    pub fn flap_retractor(&self) -> Option<&FlapRetractor> {
        self.flap_retractor.as_ref()
    }

    pub fn menu(&self) -> &DemoMenu {
        &self.menu
    }

    fn save_settings(&mut self) {
        if let (Some(settings), Some(retractor)) = (&mut self.settings, &self.flap_retractor) {
            info!("Saving settings file.");
            settings.save_threshold(FLAP_RETRACT_SPEED, retractor.threshold_knots());
            if let Err(err) = settings.save_file() {
                error!(error = %err, "Failed to save the settings file.");
            }
        }
    }
}
impl Default for PplDemo {
    fn default() -> Self {
        Self::new()
    }
}
impl Plugin for PplDemo {
    type StartError = StartError;

    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PplDemo::NAME.to_owned(),
            signature: PplDemo::NAME.to_owned(),
            description: "Demonstrates PPL features.".to_owned(),
        }
    }

    fn start<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) -> Result<(), StartError> {
        match logging::init(&host.aircraft_path(PplDemo::LOG_FILE_NAME)) {
            Ok(guard) => self.log = Some(guard),
            Err(err) => warn!(error = %err, "Not logging to the aircraft's log file."),
        }
        info!("Plugin started. Hello world!");

        let store = settings::load_or_create(&host.aircraft_path(PplDemo::SETTINGS_FILE_NAME))?;
        let flap_settings = FlapSettings::read(&store);
        let mut retractor = FlapRetractor::new(
            flap_settings.threshold,
            flap_settings.hysteresis,
            flap_settings.extended_position,
        )?;

        retractor.hook_to_sim(host);
        self.settings = Some(store);
        self.flap_retractor = Some(retractor);

        self.message_timer.schedule(host);
        self.on_screen_display = Some(host.ui_mut().show_display(OnScreenDisplay::new(
            200,
            50,
            PplDemo::ON_SCREEN_DISPLAY_TEXT,
        )));
        self.menu.create(host);

        Ok(())
    }

    fn stop<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        self.save_settings();

        if let Some(retractor) = &mut self.flap_retractor {
            retractor.unhook_from_sim(host);
        }

        self.message_timer.cancel(host);
        if let Some(id) = self.on_screen_display.take() {
            host.ui_mut().hide_display(id);
        }
        self.menu.destroy(host);

        info!("Plugin stopped.");
        self.log = None;
    }

    fn enable<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) -> bool {
        if let Some(retractor) = &mut self.flap_retractor {
            retractor.hook_to_sim(host);
        }

        true
    }

    fn disable<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        if let Some(retractor) = &mut self.flap_retractor {
            retractor.pause(host);
        }
    }

    fn receive_message<T: SimulatorReaderWriter>(
        &mut self,
        _host: &mut Host<T>,
        from: PluginId,
        message: HostMessage,
    ) {
        match message {
            HostMessage::PlaneLoaded => info!(from = from.0, "Plane loaded."),
            HostMessage::WillWritePrefs => self.save_settings(),
            _ => debug!(from = from.0, ?message, "Ignoring message."),
        }
    }

    fn flight_loop<T: SimulatorReaderWriter>(
        &mut self,
        host: &mut Host<T>,
        id: FlightLoopId,
        elapsed: Duration,
    ) -> NextFlightLoop {
        if let Some(retractor) = &mut self.flap_retractor {
            if retractor.owns(id) {
                retractor.tick(host, elapsed);
                return NextFlightLoop::EveryFrame;
            }
        }

        if self.message_timer.owns(id) {
            return self.message_timer.fire(host);
        }

        warn!(%id, "Called for an unknown flight loop.");
        NextFlightLoop::Stop
    }

    fn menu_action<T: SimulatorReaderWriter>(&mut self, _host: &mut Host<T>, item: MenuItemId) {
        if !self.menu.select(item) {
            debug!(?item, "Ignoring unknown menu item.");
        }
    }

    fn read_owned_data(&self, name: &str) -> Option<f64> {
        match name {
            FlapRetractor::THRESHOLD_KEY => self
                .flap_retractor
                .as_ref()
                .map(|retractor| retractor.threshold_knots()),
            Foo::KEY => Some(self.menu.foo().value() as f64),
            _ => None,
        }
    }

    fn write_owned_data(&mut self, name: &str, value: f64) -> Result<(), DataAccessError> {
        match name {
            FlapRetractor::THRESHOLD_KEY => {
                let retractor = self
                    .flap_retractor
                    .as_mut()
                    .ok_or_else(|| DataAccessError::NotFound(name.to_owned()))?;
                retractor
                    .set_threshold_knots(value)
                    .map_err(|err| DataAccessError::Rejected {
                        name: name.to_owned(),
                        reason: err.to_string(),
                    })?;
                info!(knots = value, "Flap retract speed changed.");

                Ok(())
            }
            Foo::KEY => self.menu.foo_mut().set_value(value),
            _ => Err(DataAccessError::NotFound(name.to_owned())),
        }
    }
}
