pub mod actuator;
pub mod config;
pub mod flaps;
pub mod logging;
pub mod plugin;
pub mod scheduler;
pub mod shared;
pub mod simulation;
pub mod ui;
