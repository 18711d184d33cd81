use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, SunSpecError};
use crate::modbus::ModbusTransport;
use crate::sunspec::converters::{to_uint16, to_uint32};

/// First register of the SunSpec map
pub const SUNSPEC_BASE_ADDRESS: u16 = 40000;
/// "SunS" as a big-endian uint32
pub const SUNSPEC_SIGNATURE: u32 = 0x53756e53;
/// Model ID of the header that terminates the model chain
pub const END_MODEL_ID: u16 = 0xFFFF;

pub const DEFAULT_MAX_MODELS: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ModelAddress {
    /// Absolute register of the model's ID word
    pub start: u16,
    /// Register count, including the ID and length header
    pub length: u16,
}

/// Where each model discovered on a device lives.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AddressTable {
    models: BTreeMap<u16, ModelAddress>,
}

impl AddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u16, address: ModelAddress) {
        self.models.insert(id, address);
    }

    pub fn get(&self, id: u16) -> Option<ModelAddress> {
        self.models.get(&id).copied()
    }

    /// First of `candidates` present on the device, in the order given.
    pub fn first_of(&self, candidates: &[u16]) -> Option<(u16, ModelAddress)> {
        candidates
            .iter()
            .find_map(|id| self.get(*id).map(|address| (*id, address)))
    }

    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.models.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Walks the model chain of `unit_id` starting at the SunSpec base address.
///
/// Fails when the signature is missing, when the chain does not terminate
/// within `max_models` headers, or when it runs past the end of the 16-bit
/// register space.
pub async fn scan_model_addresses(
    transport: &dyn ModbusTransport,
    unit_id: u8,
    max_models: usize,
) -> Result<AddressTable> {
    transport.connect().await?;

    let signature = read_pair(transport, unit_id, SUNSPEC_BASE_ADDRESS).await?;
    let signature = to_uint32(signature);
    if signature != SUNSPEC_SIGNATURE {
        return Err(SunSpecError::SignatureMismatch(signature));
    }

    let mut table = AddressTable::new();
    let mut address = SUNSPEC_BASE_ADDRESS + 2;

    for _ in 0..=max_models {
        let [id, length] = read_pair(transport, unit_id, address).await?;
        let id = to_uint16([id]);
        let length = to_uint16([length]);

        if id == END_MODEL_ID && length == 0 {
            info!(
                "unit {}: found {} SunSpec models {:?}",
                unit_id,
                table.len(),
                table.ids().collect::<Vec<_>>()
            );
            return Ok(table);
        }

        let total = length.checked_add(2).ok_or_else(|| {
            SunSpecError::MalformedModelChain(format!("model {} length {} too large", id, length))
        })?;

        debug!("unit {}: model {} at {} length {}", unit_id, id, address, total);
        table.insert(id, ModelAddress { start: address, length: total });

        address = address.checked_add(total).ok_or_else(|| {
            SunSpecError::MalformedModelChain(format!(
                "model {} at {} runs past the register space",
                id, address
            ))
        })?;
    }

    Err(SunSpecError::MalformedModelChain(format!(
        "no end marker after {} models",
        max_models
    )))
}

async fn read_pair(transport: &dyn ModbusTransport, unit_id: u8, start: u16) -> Result<[u16; 2]> {
    let words = transport.read_registers(unit_id, start, 2).await?;

    <[u16; 2]>::try_from(words.as_slice()).map_err(|_| {
        crate::error::TransportError::ShortResponse {
            expected: 2,
            received: words.len(),
        }
        .into()
    })
}
