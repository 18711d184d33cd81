use crate::prelude::*;

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::sunspec::scanner::DEFAULT_MAX_MODELS;

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "Vec::new")]
    pub inverters: Vec<Device>,

    pub meter: Option<Device>,

    #[serde(default = "Config::default_scan")]
    pub scan: Scan,

    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "poll_interval_ms", default = "Config::default_poll_interval")]
    pub poll_interval: Duration,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// Optional path to append every sample to, one JSON document per line
    pub sample_file: Option<String>,
}

// Connection {{{
#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Connection {
    Tcp {
        host: String,
        #[serde(default = "Config::default_modbus_port")]
        port: u16,
        timeout_ms: Option<u64>,
    },
    Rtu {
        path: String,
        baud_rate: u32,
        timeout_ms: Option<u64>,
    },
}

impl Connection {
    pub fn timeout(&self) -> Duration {
        let timeout_ms = match self {
            Self::Tcp { timeout_ms, .. } | Self::Rtu { timeout_ms, .. } => *timeout_ms,
        };

        Duration::from_millis(timeout_ms.unwrap_or(10_000))
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp { host, port, .. } => write!(f, "tcp://{}:{}", host, port),
            Self::Rtu {
                path, baud_rate, ..
            } => write!(f, "rtu://{}@{}", path, baud_rate),
        }
    }
} // }}}

// Device {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
    #[serde(default = "Config::default_enabled")]
    pub enabled: bool,

    pub connection: Connection,

    #[serde(default = "Config::default_unit_id")]
    pub unit_id: u8,
}

impl Device {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }
} // }}}

// Scan {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Scan {
    #[serde(default = "Config::default_max_models")]
    pub max_models: usize,
}

impl Scan {
    pub fn max_models(&self) -> usize {
        self.max_models
    }
} // }}}

pub struct ConfigWrapper {
    config: Arc<Mutex<Config>>,
}

impl Clone for ConfigWrapper {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

impl ConfigWrapper {
    pub fn new(file: String) -> Result<Self> {
        Ok(Self::from_config(Config::new(file)?))
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn inverters(&self) -> Vec<Device> {
        self.lock().inverters.clone()
    }

    pub fn enabled_inverters(&self) -> Vec<Device> {
        self.inverters().into_iter().filter(|i| i.enabled()).collect()
    }

    pub fn meter(&self) -> Option<Device> {
        self.lock().meter.clone()
    }

    pub fn enabled_meter(&self) -> Option<Device> {
        self.meter().filter(|m| m.enabled())
    }

    pub fn scan(&self) -> Scan {
        self.lock().scan.clone()
    }

    pub fn poll_interval(&self) -> Duration {
        self.lock().poll_interval
    }

    pub fn loglevel(&self) -> String {
        self.lock().loglevel.clone()
    }

    pub fn sample_file(&self) -> Option<String> {
        self.lock().sample_file.clone()
    }
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        info!("Reading configuration from {}", file);
        let content = std::fs::read_to_string(&file)
            .map_err(|err| file_error!("error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)?;

        info!("Configuration loaded successfully:");
        info!(
            "  Inverters: {} configured, {} enabled",
            config.inverters.len(),
            config.inverters.iter().filter(|i| i.enabled).count()
        );
        for (i, inverter) in config.inverters.iter().enumerate() {
            info!("    Inverter[{}]:", i);
            Self::log_device(inverter);
        }

        info!("  Meter: {}", if config.meter.is_some() { "configured" } else { "none" });
        if let Some(meter) = &config.meter {
            Self::log_device(meter);
        }

        info!("  Scan Max Models: {}", config.scan.max_models);
        info!("  Poll Interval: {}ms", config.poll_interval.as_millis());
        info!("  Sample File: {}", config.sample_file.as_deref().unwrap_or("none"));
        info!("  Log Level: {}", config.loglevel);

        config.validate()?;
        Ok(config)
    }

    fn log_device(device: &Device) {
        info!("      Enabled: {}", device.enabled);
        info!("      Connection: {}", device.connection);
        info!("      Unit ID: {}", device.unit_id);
        info!("      Timeout: {}ms", device.connection.timeout().as_millis());
    }

    fn validate(&self) -> Result<()> {
        for (i, inverter) in self.inverters.iter().enumerate() {
            if inverter.enabled {
                Self::validate_device(&format!("inverters[{}]", i), inverter)?;
            }
        }

        if let Some(meter) = &self.meter {
            if meter.enabled {
                Self::validate_device("meter", meter)?;
            }
        }

        if self.inverters.iter().all(|i| !i.enabled) && !self.meter.as_ref().is_some_and(|m| m.enabled) {
            bail!("no enabled inverters or meter configured");
        }

        if self.poll_interval.is_zero() {
            bail!("poll_interval_ms must be greater than 0");
        }

        if self.scan.max_models == 0 {
            bail!("scan.max_models must be greater than 0");
        }

        Ok(())
    }

    fn validate_device(name: &str, device: &Device) -> Result<()> {
        match &device.connection {
            Connection::Tcp { host, port, .. } => {
                if host.is_empty() {
                    bail!("{}.connection.host cannot be empty", name);
                }
                if *port == 0 {
                    bail!("{}.connection.port must be between 1 and 65535", name);
                }
            }
            Connection::Rtu {
                path, baud_rate, ..
            } => {
                if path.is_empty() {
                    bail!("{}.connection.path cannot be empty", name);
                }
                if *baud_rate == 0 {
                    bail!("{}.connection.baud_rate must be greater than 0", name);
                }
            }
        }

        if device.connection.timeout().is_zero() {
            bail!("{}.connection.timeout_ms must be greater than 0", name);
        }

        Ok(())
    }

    fn default_enabled() -> bool {
        true
    }

    fn default_unit_id() -> u8 {
        1
    }

    fn default_modbus_port() -> u16 {
        502
    }

    fn default_scan() -> Scan {
        Scan {
            max_models: Self::default_max_models(),
        }
    }

    fn default_max_models() -> usize {
        DEFAULT_MAX_MODELS
    }

    fn default_poll_interval() -> Duration {
        Duration::from_millis(1000)
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}
