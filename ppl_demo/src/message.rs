use std::time::Duration;
use systems::{
    plugin::Host,
    scheduler::{FlightLoopId, NextFlightLoop},
    simulation::SimulatorReaderWriter,
    ui::{MessageWindow, WindowId},
};
use tracing::debug;

/// Pops up a message window once, a while after the plugin started.
pub struct MessageTimer {
    delay: Duration,
    flight_loop: Option<FlightLoopId>,
    window: Option<WindowId>,
}
impl MessageTimer {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);
    pub const TITLE: &'static str = "Hello, world!";
    pub const MESSAGE: &'static str = "I am a message box! Close me and you die.";

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            flight_loop: None,
            window: None,
        }
    }

    pub fn schedule<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        if self.flight_loop.is_none() {
            self.flight_loop = Some(
                host.scheduler_mut()
                    .register(NextFlightLoop::After(self.delay)),
            );
        }
    }

    pub fn owns(&self, id: FlightLoopId) -> bool {
        self.flight_loop == Some(id)
    }

    pub fn fire<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) -> NextFlightLoop {
        debug!("Showing message window.");
        self.window = Some(host.ui_mut().open_window(MessageWindow::new(
            500,
            100,
            MessageTimer::TITLE,
            MessageTimer::MESSAGE,
            true,
        )));

        NextFlightLoop::Stop
    }

    /// Unregisters the timer and closes the window if the user didn't already.
    pub fn cancel<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        if let Some(id) = self.flight_loop.take() {
            host.scheduler_mut().unregister(id);
        }

        if let Some(id) = self.window.take() {
            host.ui_mut().destroy_window(id);
        }
    }
}
impl Default for MessageTimer {
    fn default() -> Self {
        Self::new(MessageTimer::DEFAULT_DELAY)
    }
}
