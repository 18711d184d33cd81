use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

use crate::error::{Result, SunSpecError, TransportError};
use crate::modbus::{ModbusTransport, MAX_READ_REGISTERS};
use crate::sunspec::models::common::COMMON_MODEL_ID;
use crate::sunspec::models::inverter::{INVERTER_INT_IDS, INVERTER_PRIORITY};
use crate::sunspec::models::meter::{METER_INT_IDS, METER_PRIORITY};
use crate::sunspec::models::*;
use crate::sunspec::scanner::{self, AddressTable, ModelAddress};
use crate::sunspec::schema::{SunSpecModel, WritableModel};

type ScanFuture = Shared<BoxFuture<'static, Result<Arc<AddressTable>>>>;

enum AddressCache {
    Unresolved,
    Resolving(ScanFuture),
    Resolved(Arc<AddressTable>),
}

#[derive(Clone, Copy, Debug)]
pub struct ConnectionOptions {
    /// Upper bound on model headers walked during a scan
    pub max_models: usize,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_models: scanner::DEFAULT_MAX_MODELS,
        }
    }
}

/// One SunSpec device (a unit ID behind a transport).
///
/// The model address table is scanned on first use and kept until a decode
/// shows it no longer matches the device. The common model is read once.
pub struct SunSpecConnection {
    transport: Arc<dyn ModbusTransport>,
    unit_id: u8,
    options: ConnectionOptions,
    addresses: Arc<Mutex<AddressCache>>,
    common: OnceCell<CommonModel>,
}

impl SunSpecConnection {
    pub fn new(transport: Arc<dyn ModbusTransport>, unit_id: u8, options: ConnectionOptions) -> Self {
        Self {
            transport,
            unit_id,
            options,
            addresses: Arc::new(Mutex::new(AddressCache::Unresolved)),
            common: OnceCell::new(),
        }
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    fn cache(addresses: &Mutex<AddressCache>) -> MutexGuard<'_, AddressCache> {
        // nothing panics while holding the lock
        match addresses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Resolves the address table, scanning the device if needed. Concurrent
    /// callers share a single in-flight scan.
    pub async fn model_addresses(&self) -> Result<Arc<AddressTable>> {
        let scan = {
            let mut cache = Self::cache(&self.addresses);
            match &*cache {
                AddressCache::Resolved(table) => return Ok(table.clone()),
                AddressCache::Resolving(scan) => scan.clone(),
                AddressCache::Unresolved => {
                    let scan = self.start_scan();
                    *cache = AddressCache::Resolving(scan.clone());
                    scan
                }
            }
        };

        scan.await
    }

    fn start_scan(&self) -> ScanFuture {
        let transport = self.transport.clone();
        let addresses = self.addresses.clone();
        let unit_id = self.unit_id;
        let max_models = self.options.max_models;

        async move {
            let result = scanner::scan_model_addresses(transport.as_ref(), unit_id, max_models)
                .await
                .map(Arc::new);

            let mut cache = Self::cache(&addresses);
            match &result {
                Ok(table) => *cache = AddressCache::Resolved(table.clone()),
                Err(err) => {
                    debug!("unit {}: error caching model addresses: {}", unit_id, err);
                    *cache = AddressCache::Unresolved;
                }
            }

            result
        }
        .boxed()
        .shared()
    }

    /// Drops the address table so the next request scans again.
    pub fn invalidate_model_addresses(&self) {
        let mut cache = Self::cache(&self.addresses);
        if let AddressCache::Resolved(_) = *cache {
            *cache = AddressCache::Unresolved;
        }
    }

    async fn find_address(&self, name: &'static str, candidates: &[u16]) -> Result<(u16, ModelAddress)> {
        self.model_addresses()
            .await?
            .first_of(candidates)
            .ok_or(SunSpecError::AddressNotFound(name))
    }

    // Reads a whole model window, split into requests the protocol allows.
    async fn read_window(&self, address: ModelAddress) -> Result<Vec<u16>> {
        let mut words = Vec::with_capacity(usize::from(address.length));
        let mut offset = 0u16;

        while offset < address.length {
            let length = (address.length - offset).min(MAX_READ_REGISTERS);
            let start = address.start + offset;
            let chunk = self.transport.read_registers(self.unit_id, start, length).await?;
            if chunk.len() != usize::from(length) {
                return Err(TransportError::ShortResponse {
                    expected: length,
                    received: chunk.len(),
                }
                .into());
            }

            words.extend_from_slice(&chunk);
            offset += length;
        }

        Ok(words)
    }

    async fn read_model<M: SunSpecModel>(&self, address: ModelAddress) -> Result<M> {
        debug!(
            "unit {}: reading {} model at {} length {}",
            self.unit_id,
            M::NAME,
            address.start,
            address.length
        );

        let words = self.read_window(address).await?;
        M::decode(&words).map_err(|err| {
            if err.is_stale_address() {
                warn!("unit {}: {}, rescanning model addresses", self.unit_id, err);
                self.invalidate_model_addresses();
            }
            err
        })
    }

    async fn get_model<M: SunSpecModel>(&self) -> Result<M> {
        let (_, address) = self.find_address(M::NAME, M::IDS).await?;
        self.read_model(address).await
    }

    async fn write_model<M: WritableModel>(&self, model: &M) -> Result<()> {
        let (_, address) = self.find_address(M::NAME, M::IDS).await?;

        for block in model.encode() {
            let start = address.start + block.offset;
            self.transport
                .write_registers(self.unit_id, start, &block.values)
                .await?;
        }

        Ok(())
    }

    pub async fn get_common_model(&self) -> Result<CommonModel> {
        self.common
            .get_or_try_init(|| async {
                let (_, address) = self
                    .find_address(CommonModel::NAME, &[COMMON_MODEL_ID])
                    .await?;
                self.read_model::<CommonModel>(address).await
            })
            .await
            .cloned()
    }

    pub async fn get_inverter_model(&self) -> Result<InverterModel> {
        let (id, address) = self.find_address("inverter", INVERTER_PRIORITY).await?;

        if INVERTER_INT_IDS.contains(&id) {
            self.read_model::<InverterModelInt>(address).await.map(Into::into)
        } else {
            self.read_model::<InverterModelFloat>(address).await.map(Into::into)
        }
    }

    pub async fn get_meter_model(&self) -> Result<MeterModel> {
        let (id, address) = self.find_address("meter", METER_PRIORITY).await?;

        if METER_INT_IDS.contains(&id) {
            self.read_model::<MeterModelInt>(address).await.map(Into::into)
        } else {
            self.read_model::<MeterModelFloat>(address).await.map(Into::into)
        }
    }

    pub async fn get_nameplate_model(&self) -> Result<NameplateModel> {
        self.get_model().await
    }

    pub async fn get_settings_model(&self) -> Result<SettingsModel> {
        self.get_model().await
    }

    pub async fn get_status_model(&self) -> Result<StatusModel> {
        self.get_model().await
    }

    pub async fn get_controls_model(&self) -> Result<ControlsModel> {
        self.get_model().await
    }

    pub async fn get_mppt_model(&self) -> Result<MpptModel> {
        self.get_model().await
    }

    pub async fn write_settings_model(&self, settings: &SettingsModel) -> Result<()> {
        self.write_model(settings).await
    }

    pub async fn write_controls_model(&self, controls: &ControlsModel) -> Result<()> {
        self.write_model(controls).await
    }

    /// Releases the transport. The connection is unusable afterwards.
    pub async fn destroy(&self) {
        self.transport.destroy().await;
    }
}
