use serde::Serialize;

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, SunSpecModel};

pub const COMMON_MODEL_ID: u16 = 1;

/// Model 1: device identification, present on every SunSpec device.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommonModel {
    pub id: u16,
    pub length: u16,
    /// Manufacturer
    pub mn: String,
    /// Device model
    pub md: String,
    /// Options
    pub opt: String,
    /// Firmware version
    pub vr: String,
    /// Serial number
    pub sn: String,
    /// Modbus device address
    pub da: Option<u16>,
}

impl SunSpecModel for CommonModel {
    const NAME: &'static str = "common";
    const IDS: &'static [u16] = &[COMMON_MODEL_ID];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            mn: r.string(2, 16)?,
            md: r.string(18, 16)?,
            opt: r.string(34, 8)?,
            vr: r.string(42, 8)?,
            sn: r.string(50, 16)?,
            da: r.uint16_nullable(66)?,
        })
    }
}
