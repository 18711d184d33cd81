use enum_dispatch::enum_dispatch;
use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, ModelRecord, SunSpecModel};

pub const INVERTER_INT_IDS: &[u16] = &[101, 102, 103];
pub const INVERTER_FLOAT_IDS: &[u16] = &[111, 112, 113];

/// Lookup order when a device exposes more than one inverter model.
pub const INVERTER_PRIORITY: &[u16] = &[103, 102, 101, 111, 112, 113];

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum OperatingState {
    Off = 1,
    Sleeping = 2,
    Starting = 3,
    Mppt = 4,
    Throttled = 5,
    ShuttingDown = 6,
    Fault = 7,
    Standby = 8,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Inverter model, in whichever register layout the device exposes.
#[enum_dispatch(ModelRecord)]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InverterModel {
    Int(InverterModelInt),
    Float(InverterModelFloat),
}

// InverterModelInt {{{
/// Models 101-103: integer registers with scale factors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InverterModelInt {
    pub id: u16,
    pub length: u16,
    pub a: u16,
    pub aph_a: u16,
    pub aph_b: Option<u16>,
    pub aph_c: Option<u16>,
    pub a_sf: i16,
    pub ppv_ph_ab: Option<u16>,
    pub ppv_ph_bc: Option<u16>,
    pub ppv_ph_ca: Option<u16>,
    pub ph_v_ph_a: u16,
    pub ph_v_ph_b: Option<u16>,
    pub ph_v_ph_c: Option<u16>,
    pub v_sf: i16,
    pub w: i16,
    pub w_sf: i16,
    pub hz: u16,
    pub hz_sf: i16,
    pub va: i16,
    pub va_sf: i16,
    pub v_ar: i16,
    pub v_ar_sf: i16,
    pub pf: i16,
    pub pf_sf: i16,
    pub wh: u32,
    pub wh_sf: i16,
    pub dca: Option<u16>,
    pub dca_sf: Option<i16>,
    pub dcv: Option<u16>,
    pub dcv_sf: Option<i16>,
    pub dcw: Option<i16>,
    pub dcw_sf: Option<i16>,
    pub tmp_cab: Option<i16>,
    pub tmp_snk: Option<i16>,
    pub tmp_trns: Option<i16>,
    pub tmp_ot: Option<i16>,
    pub tmp_sf: Option<i16>,
    pub st: OperatingState,
    pub st_vnd: Option<u16>,
    pub evt1: u32,
    pub evt2: u32,
    pub evt_vnd1: u32,
    pub evt_vnd2: u32,
    pub evt_vnd3: u32,
    pub evt_vnd4: u32,
}

impl SunSpecModel for InverterModelInt {
    const NAME: &'static str = "inverter";
    const IDS: &'static [u16] = INVERTER_INT_IDS;

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            a: r.uint16(2)?,
            aph_a: r.uint16(3)?,
            aph_b: r.uint16_nullable(4)?,
            aph_c: r.uint16_nullable(5)?,
            a_sf: r.sunssf(6)?,
            ppv_ph_ab: r.uint16_nullable(7)?,
            ppv_ph_bc: r.uint16_nullable(8)?,
            ppv_ph_ca: r.uint16_nullable(9)?,
            ph_v_ph_a: r.uint16(10)?,
            ph_v_ph_b: r.uint16_nullable(11)?,
            ph_v_ph_c: r.uint16_nullable(12)?,
            v_sf: r.sunssf(13)?,
            w: r.int16(14)?,
            w_sf: r.sunssf(15)?,
            hz: r.uint16(16)?,
            hz_sf: r.sunssf(17)?,
            va: r.int16(18)?,
            va_sf: r.sunssf(19)?,
            v_ar: r.int16(20)?,
            v_ar_sf: r.sunssf(21)?,
            pf: r.int16(22)?,
            pf_sf: r.sunssf(23)?,
            wh: r.acc32(24)?,
            wh_sf: r.sunssf(26)?,
            dca: r.uint16_nullable(27)?,
            dca_sf: r.sunssf_nullable(28)?,
            dcv: r.uint16_nullable(29)?,
            dcv_sf: r.sunssf_nullable(30)?,
            dcw: r.int16_nullable(31)?,
            dcw_sf: r.sunssf_nullable(32)?,
            tmp_cab: r.int16_nullable(33)?,
            tmp_snk: r.int16_nullable(34)?,
            tmp_trns: r.int16_nullable(35)?,
            tmp_ot: r.int16_nullable(36)?,
            tmp_sf: r.sunssf_nullable(37)?,
            st: r.enumeration(38)?,
            st_vnd: r.uint16_nullable(39)?,
            evt1: r.bitfield32(40)?,
            evt2: r.bitfield32(42)?,
            evt_vnd1: r.bitfield32(44)?,
            evt_vnd2: r.bitfield32(46)?,
            evt_vnd3: r.bitfield32(48)?,
            evt_vnd4: r.bitfield32(50)?,
        })
    }
}

impl ModelRecord for InverterModelInt {
    fn id(&self) -> u16 {
        self.id
    }

    fn length(&self) -> u16 {
        self.length
    }
} // }}}

// InverterModelFloat {{{
/// Models 111-113: every value is a self-scaled IEEE-754 float.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InverterModelFloat {
    pub id: u16,
    pub length: u16,
    pub a: f32,
    pub aph_a: f32,
    pub aph_b: Option<f32>,
    pub aph_c: Option<f32>,
    pub ppv_ph_ab: Option<f32>,
    pub ppv_ph_bc: Option<f32>,
    pub ppv_ph_ca: Option<f32>,
    pub ph_v_ph_a: f32,
    pub ph_v_ph_b: Option<f32>,
    pub ph_v_ph_c: Option<f32>,
    pub w: f32,
    pub hz: f32,
    pub va: f32,
    pub v_ar: f32,
    pub pf: f32,
    pub wh: f32,
    pub dca: Option<f32>,
    pub dcv: Option<f32>,
    pub dcw: Option<f32>,
    pub tmp_cab: Option<f32>,
    pub tmp_snk: Option<f32>,
    pub tmp_trns: Option<f32>,
    pub tmp_ot: Option<f32>,
    pub st: OperatingState,
    pub st_vnd: Option<u16>,
    pub evt1: u32,
    pub evt2: u32,
    pub evt_vnd1: u32,
    pub evt_vnd2: u32,
    pub evt_vnd3: u32,
    pub evt_vnd4: u32,
}

impl SunSpecModel for InverterModelFloat {
    const NAME: &'static str = "inverter";
    const IDS: &'static [u16] = INVERTER_FLOAT_IDS;

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            a: r.float(2)?,
            aph_a: r.float(4)?,
            aph_b: r.float_nullable(6)?,
            aph_c: r.float_nullable(8)?,
            ppv_ph_ab: r.float_nullable(10)?,
            ppv_ph_bc: r.float_nullable(12)?,
            ppv_ph_ca: r.float_nullable(14)?,
            ph_v_ph_a: r.float(16)?,
            ph_v_ph_b: r.float_nullable(18)?,
            ph_v_ph_c: r.float_nullable(20)?,
            w: r.float(22)?,
            hz: r.float(24)?,
            va: r.float(26)?,
            v_ar: r.float(28)?,
            pf: r.float(30)?,
            wh: r.float(32)?,
            dca: r.float_nullable(34)?,
            dcv: r.float_nullable(36)?,
            dcw: r.float_nullable(38)?,
            tmp_cab: r.float_nullable(40)?,
            tmp_snk: r.float_nullable(42)?,
            tmp_trns: r.float_nullable(44)?,
            tmp_ot: r.float_nullable(46)?,
            st: r.enumeration(48)?,
            st_vnd: r.uint16_nullable(49)?,
            evt1: r.bitfield32(50)?,
            evt2: r.bitfield32(52)?,
            evt_vnd1: r.bitfield32(54)?,
            evt_vnd2: r.bitfield32(56)?,
            evt_vnd3: r.bitfield32(58)?,
            evt_vnd4: r.bitfield32(60)?,
        })
    }
}

impl ModelRecord for InverterModelFloat {
    fn id(&self) -> u16 {
        self.id
    }

    fn length(&self) -> u16 {
        self.length
    }
} // }}}
