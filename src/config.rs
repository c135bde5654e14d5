use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::assistant::AssistantSettings;
use crate::geo::GeoPoint;
use crate::location::LocationSourceKind;
use crate::run::RunTimings;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Initial assistant settings; edited at runtime through the API
    #[serde(default)]
    pub assistant: AssistantSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub tick_interval_ms: u64,
    pub countdown_secs: u8,
    pub hold_to_finish_secs: u64,
    pub start_latitude: f64,
    pub start_longitude: f64,
    /// Fixed seed for the simulated GPS walk; random when unset
    pub seed: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let start = GeoPoint::default();
        Self {
            tick_interval_ms: 1000,
            countdown_secs: 3,
            hold_to_finish_secs: 5,
            start_latitude: start.latitude,
            start_longitude: start.longitude,
            seed: None,
        }
    }
}

impl TrackerConfig {
    pub fn timings(&self) -> RunTimings {
        RunTimings {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            countdown_secs: self.countdown_secs.max(1),
            hold_to_finish: Duration::from_secs(self.hold_to_finish_secs),
        }
    }

    pub fn start_position(&self) -> GeoPoint {
        GeoPoint::new(self.start_latitude, self.start_longitude)
    }

    pub fn source_kind(&self) -> LocationSourceKind {
        LocationSourceKind::RandomWalk { seed: self.seed }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("THEO_RUN").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.assistant
            .validate()
            .context("Invalid assistant settings in config")?;

        Ok(cfg)
    }
}
