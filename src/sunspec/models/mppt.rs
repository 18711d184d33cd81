use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, SunSpecModel};

const HEADER_LENGTH: usize = 10;
const MODULE_LENGTH: usize = 20;

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum ModuleState {
    Off = 1,
    Sleeping = 2,
    Starting = 3,
    Mppt = 4,
    Throttled = 5,
    ShuttingDown = 6,
    Fault = 7,
    Standby = 8,
    Test = 9,
    Reserved = 10,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Model 160: multiple MPPT inverter extension. A fixed header followed by
/// `n` repeating module blocks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MpptModel {
    pub id: u16,
    pub length: u16,
    pub dca_sf: Option<i16>,
    pub dcv_sf: Option<i16>,
    pub dcw_sf: Option<i16>,
    pub dcwh_sf: Option<i16>,
    pub evt: u32,
    pub n: u16,
    pub tms_per: Option<u16>,
    pub modules: Vec<MpptModule>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MpptModule {
    pub id: u16,
    pub id_str: String,
    pub dca: Option<u16>,
    pub dcv: Option<u16>,
    pub dcw: Option<u16>,
    pub dcwh: u32,
    pub tms: u32,
    pub tmp: Option<i16>,
    pub dc_st: Option<ModuleState>,
    pub dc_evt: u32,
}

impl MpptModule {
    fn decode(r: ModelReader<'_>) -> Result<Self> {
        Ok(Self {
            id: r.uint16(0)?,
            id_str: r.string(1, 8)?,
            dca: r.uint16_nullable(9)?,
            dcv: r.uint16_nullable(10)?,
            dcw: r.uint16_nullable(11)?,
            dcwh: r.acc32(12)?,
            tms: r.uint32(14)?,
            tmp: r.int16_nullable(16)?,
            dc_st: r.enumeration_nullable(17)?,
            dc_evt: r.bitfield32(18)?,
        })
    }
}

impl SunSpecModel for MpptModel {
    const NAME: &'static str = "mppt";
    const IDS: &'static [u16] = &[160];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        let id = r.id(0, Self::IDS)?;
        let n = r.uint16(8)?;
        let modules = (0..usize::from(n))
            .map(|index| MpptModule::decode(r.slice(HEADER_LENGTH + index * MODULE_LENGTH, MODULE_LENGTH)?))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id,
            length: r.uint16(1)?,
            dca_sf: r.sunssf_nullable(2)?,
            dcv_sf: r.sunssf_nullable(3)?,
            dcw_sf: r.sunssf_nullable(4)?,
            dcwh_sf: r.sunssf_nullable(5)?,
            evt: r.bitfield32(6)?,
            n,
            tms_per: r.uint16_nullable(9)?,
            modules,
        })
    }
}
