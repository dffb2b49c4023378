use std::path::Path;
use systems::config::{ConfigError, ConfigKey, ConfigStore, TomlConfigStore};
use tracing::{error, warn};
use uom::si::{
    f64::*,
    ratio::{percent, ratio},
    velocity::knot,
};

pub const FLAP_RETRACT_SPEED: ConfigKey = ConfigKey::new("Config", "FlapRetractSpeedKts");
pub const FLAP_RETRACT_HYSTERESIS: ConfigKey =
    ConfigKey::new("Config", "FlapRetractHysteresisPct");
pub const FLAP_EXTENDED_RATIO: ConfigKey = ConfigKey::new("Config", "FlapExtendedRatio");

const DEFAULT_FLAP_RETRACT_SPEED_KTS: f64 = 80.;
const DEFAULT_FLAP_RETRACT_HYSTERESIS_PCT: f64 = 2.;
const DEFAULT_FLAP_EXTENDED_RATIO: f64 = 0.5;

const DEFAULTS: [(ConfigKey, f64); 3] = [
    (FLAP_RETRACT_SPEED, DEFAULT_FLAP_RETRACT_SPEED_KTS),
    (FLAP_RETRACT_HYSTERESIS, DEFAULT_FLAP_RETRACT_HYSTERESIS_PCT),
    (FLAP_EXTENDED_RATIO, DEFAULT_FLAP_EXTENDED_RATIO),
];

/// Loads the settings file, creating it with default values when it doesn't exist.
/// Keys missing from an existing file are added with their default value.
pub fn load_or_create(path: &Path) -> Result<TomlConfigStore, ConfigError> {
    let mut store = match TomlConfigStore::load_file(path) {
        Ok(store) => store,
        Err(ConfigError::FileNotFound(_)) => {
            warn!(
                path = %path.display(),
                "Ini file not found. Will create new one with default values."
            );
            TomlConfigStore::new(path)
        }
        Err(err) => return Err(err),
    };

    let mut seeded = false;
    for (key, value) in DEFAULTS.iter() {
        seeded |= store.seed_f64(*key, *value);
    }

    if seeded {
        if let Err(err) = store.save_file() {
            error!(error = %err, "Failed to save the settings file.");
        }
    }

    Ok(store)
}

#[derive(Clone, Copy, Debug)]
pub struct FlapSettings {
    pub threshold: Velocity,
    pub hysteresis: Ratio,
    pub extended_position: Ratio,
}
impl FlapSettings {
    /// Reads the flap settings. Values which can't be used are replaced by their default.
    pub fn read(store: &TomlConfigStore) -> Self {
        let threshold = store
            .load_threshold(FLAP_RETRACT_SPEED)
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.);
        let hysteresis = store
            .get_f64(FLAP_RETRACT_HYSTERESIS)
            .filter(|value| value.is_finite() && *value >= 0. && *value < 100.);
        let extended_position = store
            .get_f64(FLAP_EXTENDED_RATIO)
            .filter(|value| value.is_finite() && *value >= 0. && *value <= 1.);

        Self {
            threshold: Velocity::new::<knot>(or_default(
                FLAP_RETRACT_SPEED,
                threshold,
                DEFAULT_FLAP_RETRACT_SPEED_KTS,
            )),
            hysteresis: Ratio::new::<percent>(or_default(
                FLAP_RETRACT_HYSTERESIS,
                hysteresis,
                DEFAULT_FLAP_RETRACT_HYSTERESIS_PCT,
            )),
            extended_position: Ratio::new::<ratio>(or_default(
                FLAP_EXTENDED_RATIO,
                extended_position,
                DEFAULT_FLAP_EXTENDED_RATIO,
            )),
        }
    }
}

fn or_default(key: ConfigKey, value: Option<f64>, default: f64) -> f64 {
    value.unwrap_or_else(|| {
        warn!(%key, default, "Invalid or missing setting, using the default.");
        default
    })
}
