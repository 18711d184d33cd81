use enum_dispatch::enum_dispatch;
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, ModelRecord, SunSpecModel};

pub const METER_INT_IDS: &[u16] = &[201, 202, 203, 204];
pub const METER_FLOAT_IDS: &[u16] = &[211, 212, 213, 214];

/// Lookup order when a device exposes more than one meter model.
pub const METER_PRIORITY: &[u16] = &[204, 203, 202, 201, 211, 212, 213, 214];

/// Meter model, in whichever register layout the device exposes.
#[enum_dispatch(ModelRecord)]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeterModel {
    Int(MeterModelInt),
    Float(MeterModelFloat),
}

// MeterModelInt {{{
/// Models 201-204: integer registers with shared scale factors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeterModelInt {
    pub id: u16,
    pub length: u16,
    pub a: i16,
    pub aph_a: Option<i16>,
    pub aph_b: Option<i16>,
    pub aph_c: Option<i16>,
    pub a_sf: i16,
    pub ph_v: i16,
    pub ph_v_ph_a: Option<i16>,
    pub ph_v_ph_b: Option<i16>,
    pub ph_v_ph_c: Option<i16>,
    pub ppv: Option<i16>,
    pub ppv_ph_ab: Option<i16>,
    pub ppv_ph_bc: Option<i16>,
    pub ppv_ph_ca: Option<i16>,
    pub v_sf: i16,
    pub hz: i16,
    pub hz_sf: i16,
    pub w: i16,
    pub w_ph_a: Option<i16>,
    pub w_ph_b: Option<i16>,
    pub w_ph_c: Option<i16>,
    pub w_sf: i16,
    pub va: Option<i16>,
    pub va_ph_a: Option<i16>,
    pub va_ph_b: Option<i16>,
    pub va_ph_c: Option<i16>,
    pub va_sf: Option<i16>,
    pub v_ar: Option<i16>,
    pub v_ar_ph_a: Option<i16>,
    pub v_ar_ph_b: Option<i16>,
    pub v_ar_ph_c: Option<i16>,
    pub v_ar_sf: Option<i16>,
    pub pf: Option<i16>,
    pub pf_ph_a: Option<i16>,
    pub pf_ph_b: Option<i16>,
    pub pf_ph_c: Option<i16>,
    pub pf_sf: Option<i16>,
    pub tot_wh_exp: u32,
    pub tot_wh_exp_ph_a: u32,
    pub tot_wh_exp_ph_b: u32,
    pub tot_wh_exp_ph_c: u32,
    pub tot_wh_imp: u32,
    pub tot_wh_imp_ph_a: u32,
    pub tot_wh_imp_ph_b: u32,
    pub tot_wh_imp_ph_c: u32,
    pub tot_wh_sf: i16,
    pub tot_v_ah_exp: u32,
    pub tot_v_ah_exp_ph_a: u32,
    pub tot_v_ah_exp_ph_b: u32,
    pub tot_v_ah_exp_ph_c: u32,
    pub tot_v_ah_imp: u32,
    pub tot_v_ah_imp_ph_a: u32,
    pub tot_v_ah_imp_ph_b: u32,
    pub tot_v_ah_imp_ph_c: u32,
    pub tot_v_ah_sf: Option<i16>,
    pub tot_v_arh_imp_q1: u32,
    pub tot_v_arh_imp_q1_ph_a: u32,
    pub tot_v_arh_imp_q1_ph_b: u32,
    pub tot_v_arh_imp_q1_ph_c: u32,
    pub tot_v_arh_imp_q2: u32,
    pub tot_v_arh_imp_q2_ph_a: u32,
    pub tot_v_arh_imp_q2_ph_b: u32,
    pub tot_v_arh_imp_q2_ph_c: u32,
    pub tot_v_arh_exp_q3: u32,
    pub tot_v_arh_exp_q3_ph_a: u32,
    pub tot_v_arh_exp_q3_ph_b: u32,
    pub tot_v_arh_exp_q3_ph_c: u32,
    pub tot_v_arh_exp_q4: u32,
    pub tot_v_arh_exp_q4_ph_a: u32,
    pub tot_v_arh_exp_q4_ph_b: u32,
    pub tot_v_arh_exp_q4_ph_c: u32,
    pub tot_v_arh_sf: Option<i16>,
    pub evt: u32,
}

impl SunSpecModel for MeterModelInt {
    const NAME: &'static str = "meter";
    const IDS: &'static [u16] = METER_INT_IDS;

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            a: r.int16(2)?,
            aph_a: r.int16_nullable(3)?,
            aph_b: r.int16_nullable(4)?,
            aph_c: r.int16_nullable(5)?,
            a_sf: r.sunssf(6)?,
            ph_v: r.int16(7)?,
            ph_v_ph_a: r.int16_nullable(8)?,
            ph_v_ph_b: r.int16_nullable(9)?,
            ph_v_ph_c: r.int16_nullable(10)?,
            ppv: r.int16_nullable(11)?,
            ppv_ph_ab: r.int16_nullable(12)?,
            ppv_ph_bc: r.int16_nullable(13)?,
            ppv_ph_ca: r.int16_nullable(14)?,
            v_sf: r.sunssf(15)?,
            hz: r.int16(16)?,
            hz_sf: r.sunssf(17)?,
            w: r.int16(18)?,
            w_ph_a: r.int16_nullable(19)?,
            w_ph_b: r.int16_nullable(20)?,
            w_ph_c: r.int16_nullable(21)?,
            w_sf: r.sunssf(22)?,
            va: r.int16_nullable(23)?,
            va_ph_a: r.int16_nullable(24)?,
            va_ph_b: r.int16_nullable(25)?,
            va_ph_c: r.int16_nullable(26)?,
            va_sf: r.sunssf_nullable(27)?,
            v_ar: r.int16_nullable(28)?,
            v_ar_ph_a: r.int16_nullable(29)?,
            v_ar_ph_b: r.int16_nullable(30)?,
            v_ar_ph_c: r.int16_nullable(31)?,
            v_ar_sf: r.sunssf_nullable(32)?,
            pf: r.int16_nullable(33)?,
            pf_ph_a: r.int16_nullable(34)?,
            pf_ph_b: r.int16_nullable(35)?,
            pf_ph_c: r.int16_nullable(36)?,
            pf_sf: r.sunssf_nullable(37)?,
            tot_wh_exp: r.acc32(38)?,
            tot_wh_exp_ph_a: r.acc32(40)?,
            tot_wh_exp_ph_b: r.acc32(42)?,
            tot_wh_exp_ph_c: r.acc32(44)?,
            tot_wh_imp: r.acc32(46)?,
            tot_wh_imp_ph_a: r.acc32(48)?,
            tot_wh_imp_ph_b: r.acc32(50)?,
            tot_wh_imp_ph_c: r.acc32(52)?,
            tot_wh_sf: r.sunssf(54)?,
            tot_v_ah_exp: r.acc32(55)?,
            tot_v_ah_exp_ph_a: r.acc32(57)?,
            tot_v_ah_exp_ph_b: r.acc32(59)?,
            tot_v_ah_exp_ph_c: r.acc32(61)?,
            tot_v_ah_imp: r.acc32(63)?,
            tot_v_ah_imp_ph_a: r.acc32(65)?,
            tot_v_ah_imp_ph_b: r.acc32(67)?,
            tot_v_ah_imp_ph_c: r.acc32(69)?,
            tot_v_ah_sf: r.sunssf_nullable(71)?,
            tot_v_arh_imp_q1: r.acc32(72)?,
            tot_v_arh_imp_q1_ph_a: r.acc32(74)?,
            tot_v_arh_imp_q1_ph_b: r.acc32(76)?,
            tot_v_arh_imp_q1_ph_c: r.acc32(78)?,
            tot_v_arh_imp_q2: r.acc32(80)?,
            tot_v_arh_imp_q2_ph_a: r.acc32(82)?,
            tot_v_arh_imp_q2_ph_b: r.acc32(84)?,
            tot_v_arh_imp_q2_ph_c: r.acc32(86)?,
            tot_v_arh_exp_q3: r.acc32(88)?,
            tot_v_arh_exp_q3_ph_a: r.acc32(90)?,
            tot_v_arh_exp_q3_ph_b: r.acc32(92)?,
            tot_v_arh_exp_q3_ph_c: r.acc32(94)?,
            tot_v_arh_exp_q4: r.acc32(96)?,
            tot_v_arh_exp_q4_ph_a: r.acc32(98)?,
            tot_v_arh_exp_q4_ph_b: r.acc32(100)?,
            tot_v_arh_exp_q4_ph_c: r.acc32(102)?,
            tot_v_arh_sf: r.sunssf_nullable(104)?,
            evt: r.bitfield32(105)?,
        })
    }
}

impl ModelRecord for MeterModelInt {
    fn id(&self) -> u16 {
        self.id
    }

    fn length(&self) -> u16 {
        self.length
    }
} // }}}

// MeterModelFloat {{{
/// Models 211-214: every value is a self-scaled IEEE-754 float.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeterModelFloat {
    pub id: u16,
    pub length: u16,
    pub a: f32,
    pub aph_a: Option<f32>,
    pub aph_b: Option<f32>,
    pub aph_c: Option<f32>,
    pub ph_v: f32,
    pub ph_v_ph_a: Option<f32>,
    pub ph_v_ph_b: Option<f32>,
    pub ph_v_ph_c: Option<f32>,
    pub ppv: Option<f32>,
    pub ppv_ph_ab: Option<f32>,
    pub ppv_ph_bc: Option<f32>,
    pub ppv_ph_ca: Option<f32>,
    pub hz: f32,
    pub w: f32,
    pub w_ph_a: Option<f32>,
    pub w_ph_b: Option<f32>,
    pub w_ph_c: Option<f32>,
    pub va: Option<f32>,
    pub va_ph_a: Option<f32>,
    pub va_ph_b: Option<f32>,
    pub va_ph_c: Option<f32>,
    pub v_ar: Option<f32>,
    pub v_ar_ph_a: Option<f32>,
    pub v_ar_ph_b: Option<f32>,
    pub v_ar_ph_c: Option<f32>,
    pub pf: Option<f32>,
    pub pf_ph_a: Option<f32>,
    pub pf_ph_b: Option<f32>,
    pub pf_ph_c: Option<f32>,
    pub tot_wh_exp: f32,
    pub tot_wh_exp_ph_a: f32,
    pub tot_wh_exp_ph_b: f32,
    pub tot_wh_exp_ph_c: f32,
    pub tot_wh_imp: f32,
    pub tot_wh_imp_ph_a: f32,
    pub tot_wh_imp_ph_b: f32,
    pub tot_wh_imp_ph_c: f32,
    pub tot_v_ah_exp: f32,
    pub tot_v_ah_exp_ph_a: f32,
    pub tot_v_ah_exp_ph_b: f32,
    pub tot_v_ah_exp_ph_c: f32,
    pub tot_v_ah_imp: f32,
    pub tot_v_ah_imp_ph_a: f32,
    pub tot_v_ah_imp_ph_b: f32,
    pub tot_v_ah_imp_ph_c: f32,
    pub tot_v_arh_imp_q1: f32,
    pub tot_v_arh_imp_q1_ph_a: f32,
    pub tot_v_arh_imp_q1_ph_b: f32,
    pub tot_v_arh_imp_q1_ph_c: f32,
    pub tot_v_arh_imp_q2: f32,
    pub tot_v_arh_imp_q2_ph_a: f32,
    pub tot_v_arh_imp_q2_ph_b: f32,
    pub tot_v_arh_imp_q2_ph_c: f32,
    pub tot_v_arh_exp_q3: f32,
    pub tot_v_arh_exp_q3_ph_a: f32,
    pub tot_v_arh_exp_q3_ph_b: f32,
    pub tot_v_arh_exp_q3_ph_c: f32,
    pub tot_v_arh_exp_q4: f32,
    pub tot_v_arh_exp_q4_ph_a: f32,
    pub tot_v_arh_exp_q4_ph_b: f32,
    pub tot_v_arh_exp_q4_ph_c: f32,
    pub evt: u32,
}

impl SunSpecModel for MeterModelFloat {
    const NAME: &'static str = "meter";
    const IDS: &'static [u16] = METER_FLOAT_IDS;

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            a: r.float(2)?,
            aph_a: r.float_nullable(4)?,
            aph_b: r.float_nullable(6)?,
            aph_c: r.float_nullable(8)?,
            ph_v: r.float(10)?,
            ph_v_ph_a: r.float_nullable(12)?,
            ph_v_ph_b: r.float_nullable(14)?,
            ph_v_ph_c: r.float_nullable(16)?,
            ppv: r.float_nullable(18)?,
            ppv_ph_ab: r.float_nullable(20)?,
            ppv_ph_bc: r.float_nullable(22)?,
            ppv_ph_ca: r.float_nullable(24)?,
            hz: r.float(26)?,
            w: r.float(28)?,
            w_ph_a: r.float_nullable(30)?,
            w_ph_b: r.float_nullable(32)?,
            w_ph_c: r.float_nullable(34)?,
            va: r.float_nullable(36)?,
            va_ph_a: r.float_nullable(38)?,
            va_ph_b: r.float_nullable(40)?,
            va_ph_c: r.float_nullable(42)?,
            v_ar: r.float_nullable(44)?,
            v_ar_ph_a: r.float_nullable(46)?,
            v_ar_ph_b: r.float_nullable(48)?,
            v_ar_ph_c: r.float_nullable(50)?,
            pf: r.float_nullable(52)?,
            pf_ph_a: r.float_nullable(54)?,
            pf_ph_b: r.float_nullable(56)?,
            pf_ph_c: r.float_nullable(58)?,
            tot_wh_exp: r.float(60)?,
            tot_wh_exp_ph_a: r.float(62)?,
            tot_wh_exp_ph_b: r.float(64)?,
            tot_wh_exp_ph_c: r.float(66)?,
            tot_wh_imp: r.float(68)?,
            tot_wh_imp_ph_a: r.float(70)?,
            tot_wh_imp_ph_b: r.float(72)?,
            tot_wh_imp_ph_c: r.float(74)?,
            tot_v_ah_exp: r.float(76)?,
            tot_v_ah_exp_ph_a: r.float(78)?,
            tot_v_ah_exp_ph_b: r.float(80)?,
            tot_v_ah_exp_ph_c: r.float(82)?,
            tot_v_ah_imp: r.float(84)?,
            tot_v_ah_imp_ph_a: r.float(86)?,
            tot_v_ah_imp_ph_b: r.float(88)?,
            tot_v_ah_imp_ph_c: r.float(90)?,
            tot_v_arh_imp_q1: r.float(92)?,
            tot_v_arh_imp_q1_ph_a: r.float(94)?,
            tot_v_arh_imp_q1_ph_b: r.float(96)?,
            tot_v_arh_imp_q1_ph_c: r.float(98)?,
            tot_v_arh_imp_q2: r.float(100)?,
            tot_v_arh_imp_q2_ph_a: r.float(102)?,
            tot_v_arh_imp_q2_ph_b: r.float(104)?,
            tot_v_arh_imp_q2_ph_c: r.float(106)?,
            tot_v_arh_exp_q3: r.float(108)?,
            tot_v_arh_exp_q3_ph_a: r.float(110)?,
            tot_v_arh_exp_q3_ph_b: r.float(112)?,
            tot_v_arh_exp_q3_ph_c: r.float(114)?,
            tot_v_arh_exp_q4: r.float(116)?,
            tot_v_arh_exp_q4_ph_a: r.float(118)?,
            tot_v_arh_exp_q4_ph_b: r.float(120)?,
            tot_v_arh_exp_q4_ph_c: r.float(122)?,
            evt: r.bitfield32(124)?,
        })
    }
}

impl ModelRecord for MeterModelFloat {
    fn id(&self) -> u16 {
        self.id
    }

    fn length(&self) -> u16 {
        self.length
    }
} // }}}
