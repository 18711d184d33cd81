use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, SunSpecModel};

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum DerType {
    Pv = 4,
    PvStor = 82,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Model 120: inverter ratings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NameplateModel {
    pub id: u16,
    pub length: u16,
    pub der_typ: DerType,
    pub w_rtg: u16,
    pub w_rtg_sf: i16,
    pub va_rtg: u16,
    pub va_rtg_sf: i16,
    pub v_ar_rtg_q1: i16,
    pub v_ar_rtg_q2: Option<i16>,
    pub v_ar_rtg_q3: Option<i16>,
    pub v_ar_rtg_q4: Option<i16>,
    pub v_ar_rtg_sf: i16,
    pub a_rtg: u16,
    pub a_rtg_sf: i16,
    pub pf_rtg_q1: i16,
    pub pf_rtg_q2: Option<i16>,
    pub pf_rtg_q3: Option<i16>,
    pub pf_rtg_q4: Option<i16>,
    pub pf_rtg_sf: i16,
    pub wh_rtg: Option<u16>,
    pub wh_rtg_sf: Option<i16>,
    pub ahr_rtg: Option<u16>,
    pub ahr_rtg_sf: Option<i16>,
    pub max_cha_rte: Option<u16>,
    pub max_cha_rte_sf: Option<i16>,
    pub max_dis_cha_rte: Option<u16>,
    pub max_dis_cha_rte_sf: Option<i16>,
}

impl SunSpecModel for NameplateModel {
    const NAME: &'static str = "nameplate";
    const IDS: &'static [u16] = &[120];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            der_typ: r.enumeration(2)?,
            w_rtg: r.uint16(3)?,
            w_rtg_sf: r.sunssf(4)?,
            va_rtg: r.uint16(5)?,
            va_rtg_sf: r.sunssf(6)?,
            v_ar_rtg_q1: r.int16(7)?,
            v_ar_rtg_q2: r.int16_nullable(8)?,
            v_ar_rtg_q3: r.int16_nullable(9)?,
            v_ar_rtg_q4: r.int16_nullable(10)?,
            v_ar_rtg_sf: r.sunssf(11)?,
            a_rtg: r.uint16(12)?,
            a_rtg_sf: r.sunssf(13)?,
            pf_rtg_q1: r.int16(14)?,
            pf_rtg_q2: r.int16_nullable(15)?,
            pf_rtg_q3: r.int16_nullable(16)?,
            pf_rtg_q4: r.int16_nullable(17)?,
            pf_rtg_sf: r.sunssf(18)?,
            wh_rtg: r.uint16_nullable(19)?,
            wh_rtg_sf: r.sunssf_nullable(20)?,
            ahr_rtg: r.uint16_nullable(21)?,
            ahr_rtg_sf: r.sunssf_nullable(22)?,
            max_cha_rte: r.uint16_nullable(23)?,
            max_cha_rte_sf: r.sunssf_nullable(24)?,
            max_dis_cha_rte: r.uint16_nullable(25)?,
            max_dis_cha_rte_sf: r.sunssf_nullable(26)?,
        })
    }
}
