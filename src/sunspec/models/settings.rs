use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::converters::*;
use crate::sunspec::schema::{ModelReader, ModelWriter, RegisterWrite, SunSpecModel, WritableModel};

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum VArAction {
    Switch = 1,
    Maintain = 2,
    #[num_enum(catch_all)]
    Unknown(u16),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum ApparentPowerCalculation {
    Vector = 1,
    Arithmetic = 2,
    #[num_enum(catch_all)]
    Unknown(u16),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum ConnectedPhase {
    A = 1,
    B = 2,
    C = 3,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Model 121: basic settings. Every value field is read-write, the scale
/// factors are read-only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsModel {
    pub id: u16,
    pub length: u16,
    pub w_max: u16,
    pub v_ref: u16,
    pub v_ref_ofs: u16,
    pub v_max: Option<u16>,
    pub v_min: Option<u16>,
    pub va_max: Option<u16>,
    pub v_ar_max_q1: i16,
    pub v_ar_max_q2: Option<i16>,
    pub v_ar_max_q3: Option<i16>,
    pub v_ar_max_q4: i16,
    pub w_gra: Option<u16>,
    pub pf_min_q1: i16,
    pub pf_min_q2: Option<i16>,
    pub pf_min_q3: Option<i16>,
    pub pf_min_q4: i16,
    pub v_ar_act: Option<VArAction>,
    pub clc_tot_va: Option<ApparentPowerCalculation>,
    pub max_rmp_rte: Option<u16>,
    pub ecp_nom_hz: Option<u16>,
    pub conn_ph: Option<ConnectedPhase>,
    pub w_max_sf: i16,
    pub v_ref_sf: i16,
    pub v_ref_ofs_sf: i16,
    pub v_min_max_sf: Option<i16>,
    pub va_max_sf: Option<i16>,
    pub v_ar_max_sf: Option<i16>,
    pub w_gra_sf: Option<i16>,
    pub pf_min_sf: Option<i16>,
    pub max_rmp_rte_sf: Option<i16>,
    pub ecp_nom_hz_sf: Option<i16>,
}

impl SunSpecModel for SettingsModel {
    const NAME: &'static str = "settings";
    const IDS: &'static [u16] = &[121];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            w_max: r.uint16(2)?,
            v_ref: r.uint16(3)?,
            v_ref_ofs: r.uint16(4)?,
            v_max: r.uint16_nullable(5)?,
            v_min: r.uint16_nullable(6)?,
            va_max: r.uint16_nullable(7)?,
            v_ar_max_q1: r.int16(8)?,
            v_ar_max_q2: r.int16_nullable(9)?,
            v_ar_max_q3: r.int16_nullable(10)?,
            v_ar_max_q4: r.int16(11)?,
            w_gra: r.uint16_nullable(12)?,
            pf_min_q1: r.int16(13)?,
            pf_min_q2: r.int16_nullable(14)?,
            pf_min_q3: r.int16_nullable(15)?,
            pf_min_q4: r.int16(16)?,
            v_ar_act: r.enumeration_nullable(17)?,
            clc_tot_va: r.enumeration_nullable(18)?,
            max_rmp_rte: r.uint16_nullable(19)?,
            ecp_nom_hz: r.uint16_nullable(20)?,
            conn_ph: r.enumeration_nullable(21)?,
            w_max_sf: r.sunssf(22)?,
            v_ref_sf: r.sunssf(23)?,
            v_ref_ofs_sf: r.sunssf(24)?,
            v_min_max_sf: r.sunssf_nullable(25)?,
            va_max_sf: r.sunssf_nullable(26)?,
            v_ar_max_sf: r.sunssf_nullable(27)?,
            w_gra_sf: r.sunssf_nullable(28)?,
            pf_min_sf: r.sunssf_nullable(29)?,
            max_rmp_rte_sf: r.sunssf_nullable(30)?,
            ecp_nom_hz_sf: r.sunssf_nullable(31)?,
        })
    }
}

impl WritableModel for SettingsModel {
    fn encode(&self) -> Vec<RegisterWrite> {
        let mut writer = ModelWriter::new();
        writer
            .put(2, from_uint16(self.w_max))
            .put(3, from_uint16(self.v_ref))
            .put(4, from_uint16(self.v_ref_ofs))
            .put(5, from_uint16_nullable(self.v_max))
            .put(6, from_uint16_nullable(self.v_min))
            .put(7, from_uint16_nullable(self.va_max))
            .put(8, from_int16(self.v_ar_max_q1))
            .put(9, from_int16_nullable(self.v_ar_max_q2))
            .put(10, from_int16_nullable(self.v_ar_max_q3))
            .put(11, from_int16(self.v_ar_max_q4))
            .put(12, from_uint16_nullable(self.w_gra))
            .put(13, from_int16(self.pf_min_q1))
            .put(14, from_int16_nullable(self.pf_min_q2))
            .put(15, from_int16_nullable(self.pf_min_q3))
            .put(16, from_int16(self.pf_min_q4))
            .put(17, from_uint16_nullable(self.v_ar_act.map(u16::from)))
            .put(18, from_uint16_nullable(self.clc_tot_va.map(u16::from)))
            .put(19, from_uint16_nullable(self.max_rmp_rte))
            .put(20, from_uint16_nullable(self.ecp_nom_hz))
            .put(21, from_uint16_nullable(self.conn_ph.map(u16::from)));

        writer.finish()
    }
}
