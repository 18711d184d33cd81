use crate::prelude::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::SunSpecError;
use crate::modbus::{ModbusConnections, ModbusTransport};
use crate::sunspec::metrics::*;
use crate::sunspec::models::*;
use crate::sunspec::ConnectionOptions;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub enum ChannelData {
    Sample(Box<DeviceSample>),
    Shutdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Inverter,
    Meter,
}

// samples {{{
#[derive(Clone, Debug, Serialize)]
pub struct DeviceSample {
    pub device: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub data: SampleData,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SampleData {
    Inverter(Box<InverterSample>),
    Meter(Box<MeterSample>),
}

#[derive(Clone, Debug, Serialize)]
pub struct InverterSample {
    pub common: CommonModel,
    pub inverter: InverterModel,
    pub nameplate: Option<NameplateModel>,
    pub settings: Option<SettingsModel>,
    pub status: Option<StatusModel>,
    pub controls: Option<ControlsModel>,
    pub mppt: Option<MpptModel>,
    pub metrics: InverterSampleMetrics,
}

#[derive(Clone, Debug, Serialize)]
pub struct InverterSampleMetrics {
    pub inverter: InverterMetrics,
    pub nameplate: Option<NameplateMetrics>,
    pub settings: Option<SettingsMetrics>,
    pub status: Option<StatusMetrics>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MeterSample {
    pub common: CommonModel,
    pub meter: MeterModel,
    pub metrics: MeterMetrics,
}
// }}}

// Models a device may legitimately not implement.
fn optional<T>(result: Result<T, SunSpecError>) -> Result<Option<T>, SunSpecError> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(SunSpecError::AddressNotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

// Device {{{
/// A polled SunSpec device and the last sample read from it.
pub struct Device {
    name: String,
    role: Role,
    connection: SunSpecConnection,
    last_sample: Mutex<Option<DeviceSample>>,
}

impl Device {
    pub fn new(name: String, role: Role, connection: SunSpecConnection) -> Self {
        Self {
            name,
            role,
            connection,
            last_sample: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_sample(&self) -> Option<DeviceSample> {
        self.last_sample.lock().ok().and_then(|sample| sample.clone())
    }

    pub async fn sample(&self) -> Result<DeviceSample> {
        let data = match self.role {
            Role::Inverter => SampleData::Inverter(Box::new(self.inverter_sample().await?)),
            Role::Meter => SampleData::Meter(Box::new(self.meter_sample().await?)),
        };

        let sample = DeviceSample {
            device: self.name.clone(),
            timestamp: Utc::now(),
            data,
        };

        if let Ok(mut last_sample) = self.last_sample.lock() {
            *last_sample = Some(sample.clone());
        }

        Ok(sample)
    }

    async fn inverter_sample(&self) -> Result<InverterSample, SunSpecError> {
        let c = &self.connection;

        let common = c.get_common_model().await?;
        let inverter = c.get_inverter_model().await?;
        let nameplate = optional(c.get_nameplate_model().await)?;
        let settings = optional(c.get_settings_model().await)?;
        let status = optional(c.get_status_model().await)?;
        let controls = optional(c.get_controls_model().await)?;
        let mppt = optional(c.get_mppt_model().await)?;

        let metrics = InverterSampleMetrics {
            inverter: inverter_metrics(&inverter)?,
            nameplate: nameplate.as_ref().map(nameplate_metrics),
            settings: settings.as_ref().map(settings_metrics),
            status: status.as_ref().map(status_metrics),
        };

        Ok(InverterSample {
            common,
            inverter,
            nameplate,
            settings,
            status,
            controls,
            mppt,
            metrics,
        })
    }

    async fn meter_sample(&self) -> Result<MeterSample, SunSpecError> {
        let common = self.connection.get_common_model().await?;
        let meter = self.connection.get_meter_model().await?;
        let metrics = meter_metrics(&meter)?;

        Ok(MeterSample {
            common,
            meter,
            metrics,
        })
    }

    pub async fn destroy(&self) {
        self.connection.destroy().await;
    }
} // }}}

/// Runs `f` up to `attempts` times, sleeping `delay` between failures.
pub async fn with_retry<T, F, Fut>(name: &str, attempts: u32, delay: Duration, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                debug!("{}: attempt {}/{} failed: {:#}", name, attempt, attempts, err);
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err.context(format!("{} failed after {} attempts", name, attempts))),
        }
    }
}

pub struct Poller {
    config: ConfigWrapper,
    channels: Channels,
    devices: Vec<Arc<Device>>,
}

impl Poller {
    pub fn new(config: ConfigWrapper, channels: Channels, connections: &ModbusConnections) -> Self {
        let options = ConnectionOptions {
            max_models: config.scan().max_models(),
        };
        let device = |name: String, role: Role, device: &config::Device| {
            let transport: Arc<dyn ModbusTransport> = connections.get(device.connection());
            let connection = SunSpecConnection::new(transport, device.unit_id(), options);
            Arc::new(Device::new(name, role, connection))
        };

        let mut devices: Vec<_> = config
            .enabled_inverters()
            .iter()
            .enumerate()
            .map(|(i, inverter)| device(format!("inverter{}", i), Role::Inverter, inverter))
            .collect();
        if let Some(meter) = config.enabled_meter() {
            devices.push(device("meter".to_string(), Role::Meter, &meter));
        }

        Self::with_devices(config, channels, devices)
    }

    pub fn with_devices(config: ConfigWrapper, channels: Channels, devices: Vec<Arc<Device>>) -> Self {
        Self {
            config,
            channels,
            devices,
        }
    }

    pub fn devices(&self) -> &[Arc<Device>] {
        &self.devices
    }

    /// Polls every device until shutdown, then releases their connections.
    pub async fn start(&self) -> Result<()> {
        info!("poller starting with {} devices", self.devices.len());

        let loops = self.devices.iter().map(|device| self.poll_loop(device.clone()));
        futures::future::join_all(loops).await;

        self.stop().await;
        info!("poller exiting");

        Ok(())
    }

    /// Polls every device once and returns the samples that succeeded.
    pub async fn poll_once(&self) -> Vec<DeviceSample> {
        let polls = self.devices.iter().map(|device| self.poll_device(device));

        futures::future::join_all(polls)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    pub async fn stop(&self) {
        for device in &self.devices {
            device.destroy().await;
        }
    }

    async fn poll_device(&self, device: &Device) -> Option<DeviceSample> {
        let start = Instant::now();
        let result = with_retry(device.name(), RETRY_ATTEMPTS, RETRY_DELAY, || device.sample()).await;

        match result {
            Ok(sample) => {
                trace!("{}: polled in {:?}", device.name(), start.elapsed());
                if self
                    .channels
                    .from_poller
                    .send(ChannelData::Sample(Box::new(sample.clone())))
                    .is_err()
                {
                    trace!("{}: no sample receivers", device.name());
                }
                Some(sample)
            }
            Err(err) => {
                error!("{}: error polling: {:#}", device.name(), err);
                None
            }
        }
    }

    async fn poll_loop(&self, device: Arc<Device>) {
        let mut receiver = self.channels.to_poller.subscribe();
        let interval = self.config.poll_interval();

        loop {
            let start = Instant::now();
            self.poll_device(&device).await;

            let delay = interval.saturating_sub(start.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                message = receiver.recv() => match message {
                    Ok(ChannelData::Shutdown) | Err(broadcast::error::RecvError::Closed) => break,
                    _ => {}
                },
            }
        }

        debug!("{}: poll loop exiting", device.name());
    }
}
