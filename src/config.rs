// config.rs

use crate::pulse_loop::ForwardMode;
use crate::smoother::{EstimatorConfig, EstimatorError};
use config::{Config, ConfigError, Environment, File};
use log::{debug, info};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PULSES_PER_REVOLUTION: u32 = 360;
pub const DEFAULT_SECONDS_PER_REVOLUTION: f64 = 1.8;
pub const DEFAULT_RENDER_BLOCK_MS: u64 = 10;
pub const DEFAULT_INSPECTOR_INTERVAL_MS: u64 = 100;

/// Name looked up in the working directory when no config path is given
const DEFAULT_CONFIG_NAME: &str = "platterrs";
const ENV_PREFIX: &str = "PLATTERRS";

#[derive(Debug)]
pub enum SettingsError {
    Load(ConfigError),
    Invalid { key: &'static str, reason: String },
    Estimator(EstimatorError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Load(e) => write!(f, "failed to load settings: {}", e),
            SettingsError::Invalid { key, reason } => {
                write!(f, "invalid setting '{}': {}", key, reason)
            }
            SettingsError::Estimator(e) => write!(f, "invalid platter geometry: {}", e),
        }
    }
}

impl Error for SettingsError {}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        SettingsError::Load(e)
    }
}

impl From<EstimatorError> for SettingsError {
    fn from(e: EstimatorError) -> Self {
        SettingsError::Estimator(e)
    }
}

/// Values given on the command line; these win over file and environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub pulses_per_revolution: Option<u32>,
    pub seconds_per_revolution: Option<f64>,
    pub controller: Option<u8>,
    pub raw_bytes: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub estimator: EstimatorConfig,
    pub render_block_ms: u64,
    pub inspector_interval_ms: u64,
    pub forward_mode: ForwardMode,
}

impl Settings {
    /// Layers defaults, the config file, `PLATTERRS_*` variables and `overrides`
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self, SettingsError> {
        Self::load_with_env(config_path, overrides, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(
        config_path: Option<&Path>,
        overrides: &Overrides,
        env: Environment,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default(
                "pulses_per_revolution",
                i64::from(DEFAULT_PULSES_PER_REVOLUTION),
            )?
            .set_default("seconds_per_revolution", DEFAULT_SECONDS_PER_REVOLUTION)?
            .set_default("render_block_ms", DEFAULT_RENDER_BLOCK_MS as i64)?
            .set_default("inspector_interval_ms", DEFAULT_INSPECTOR_INTERVAL_MS as i64)?
            .set_default("forward_mode", "data")?;

        builder = match config_path {
            Some(path) => {
                info!("Loading settings from {}", path.display());
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };
        builder = builder.add_source(env);

        if let Some(ppr) = overrides.pulses_per_revolution {
            builder = builder.set_override("pulses_per_revolution", i64::from(ppr))?;
        }
        if let Some(spr) = overrides.seconds_per_revolution {
            builder = builder.set_override("seconds_per_revolution", spr)?;
        }
        if let Some(controller) = overrides.controller {
            builder = builder.set_override("controller", i64::from(controller))?;
        }
        if overrides.raw_bytes {
            builder = builder.set_override("forward_mode", "raw")?;
        }

        Self::from_config(&builder.build()?)
    }

    fn from_config(cfg: &Config) -> Result<Self, SettingsError> {
        let ppr = cfg.get_int("pulses_per_revolution")?;
        let ppr = u32::try_from(ppr).map_err(|_| SettingsError::Invalid {
            key: "pulses_per_revolution",
            reason: format!("{} is out of range", ppr),
        })?;
        let spr = cfg.get_float("seconds_per_revolution")?;
        let estimator = EstimatorConfig::new(ppr, spr)?;

        let render_block_ms = positive_millis(cfg, "render_block_ms")?;
        let inspector_interval_ms = positive_millis(cfg, "inspector_interval_ms")?;
        let forward_mode = parse_forward_mode(cfg)?;

        debug!(
            "Settings: {} pulses/rev, {} s/rev, {} ms blocks, {:?}",
            ppr, spr, render_block_ms, forward_mode
        );

        Ok(Settings {
            estimator,
            render_block_ms,
            inspector_interval_ms,
            forward_mode,
        })
    }

    pub fn render_block(&self) -> Duration {
        Duration::from_millis(self.render_block_ms)
    }

    pub fn inspector_interval(&self) -> Duration {
        Duration::from_millis(self.inspector_interval_ms)
    }
}

fn positive_millis(cfg: &Config, key: &'static str) -> Result<u64, SettingsError> {
    let value = cfg.get_int(key)?;
    match u64::try_from(value) {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(SettingsError::Invalid {
            key,
            reason: format!("expected a positive number of milliseconds, got {}", value),
        }),
    }
}

fn parse_forward_mode(cfg: &Config) -> Result<ForwardMode, SettingsError> {
    let raw = match cfg.get_string("forward_mode")?.to_lowercase().as_str() {
        "data" => false,
        "raw" => true,
        other => {
            return Err(SettingsError::Invalid {
                key: "forward_mode",
                reason: format!("expected 'data' or 'raw', got '{}'", other),
            })
        }
    };

    // A controller number implies controller filtering, which raw mode has no room for.
    let number = match cfg.get_int("controller") {
        Ok(number) => number,
        Err(ConfigError::NotFound(_)) if raw => return Ok(ForwardMode::RawBytes),
        Err(ConfigError::NotFound(_)) => return Ok(ForwardMode::DataByte),
        Err(e) => return Err(e.into()),
    };
    if raw {
        return Err(SettingsError::Invalid {
            key: "controller",
            reason: format!("controller {} cannot be combined with raw forwarding", number),
        });
    }

    match u8::try_from(number) {
        Ok(cc) if cc < 0x80 => Ok(ForwardMode::Controller(cc)),
        _ => Err(SettingsError::Invalid {
            key: "controller",
            reason: format!("{} is not a 7-bit controller number", number),
        }),
    }
}

/// Path of the log directory under `home`
pub fn log_dir(home: &Path) -> PathBuf {
    home.join(".local")
        .join("share")
        .join("platterrs")
        .join("logs")
}
