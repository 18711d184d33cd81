use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;

use crate::error::Result;
use crate::sunspec::converters::*;
use crate::sunspec::schema::{ModelReader, ModelWriter, RegisterWrite, SunSpecModel, WritableModel};

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum ConnectControl {
    Disconnect = 0,
    Connect = 1,
    #[num_enum(catch_all)]
    Unknown(u16),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum Enable {
    Disabled = 0,
    Enabled = 1,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Which limit `VArWMaxPct`, `VArMaxPct` or `VArAvalPct` is relative to
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum VArPercentMode {
    Unset = 0,
    WMax = 1,
    VArMax = 2,
    VArAval = 3,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// Model 123: immediate controls. Everything ahead of the scale factors is
/// read-write.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlsModel {
    pub id: u16,
    pub length: u16,
    pub conn_win_tms: Option<u16>,
    pub conn_rvrt_tms: Option<u16>,
    pub conn: ConnectControl,
    pub w_max_lim_pct: u16,
    pub w_max_lim_pct_win_tms: Option<u16>,
    pub w_max_lim_pct_rvrt_tms: Option<u16>,
    pub w_max_lim_pct_rmp_tms: Option<u16>,
    pub w_max_lim_ena: Enable,
    pub out_pf_set: i16,
    pub out_pf_set_win_tms: Option<u16>,
    pub out_pf_set_rvrt_tms: Option<u16>,
    pub out_pf_set_rmp_tms: Option<u16>,
    pub out_pf_set_ena: Enable,
    pub v_ar_w_max_pct: Option<i16>,
    pub v_ar_max_pct: Option<i16>,
    pub v_ar_aval_pct: Option<i16>,
    pub v_ar_pct_win_tms: Option<u16>,
    pub v_ar_pct_rvrt_tms: Option<u16>,
    pub v_ar_pct_rmp_tms: Option<u16>,
    pub v_ar_pct_mod: Option<VArPercentMode>,
    pub v_ar_pct_ena: Enable,
    pub w_max_lim_pct_sf: i16,
    pub out_pf_set_sf: i16,
    pub v_ar_pct_sf: Option<i16>,
}

impl SunSpecModel for ControlsModel {
    const NAME: &'static str = "controls";
    const IDS: &'static [u16] = &[123];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            conn_win_tms: r.uint16_nullable(2)?,
            conn_rvrt_tms: r.uint16_nullable(3)?,
            conn: r.enumeration(4)?,
            w_max_lim_pct: r.uint16(5)?,
            w_max_lim_pct_win_tms: r.uint16_nullable(6)?,
            w_max_lim_pct_rvrt_tms: r.uint16_nullable(7)?,
            w_max_lim_pct_rmp_tms: r.uint16_nullable(8)?,
            w_max_lim_ena: r.enumeration(9)?,
            out_pf_set: r.int16(10)?,
            out_pf_set_win_tms: r.uint16_nullable(11)?,
            out_pf_set_rvrt_tms: r.uint16_nullable(12)?,
            out_pf_set_rmp_tms: r.uint16_nullable(13)?,
            out_pf_set_ena: r.enumeration(14)?,
            v_ar_w_max_pct: r.int16_nullable(15)?,
            v_ar_max_pct: r.int16_nullable(16)?,
            v_ar_aval_pct: r.int16_nullable(17)?,
            v_ar_pct_win_tms: r.uint16_nullable(18)?,
            v_ar_pct_rvrt_tms: r.uint16_nullable(19)?,
            v_ar_pct_rmp_tms: r.uint16_nullable(20)?,
            v_ar_pct_mod: r.enumeration_nullable(21)?,
            v_ar_pct_ena: r.enumeration(22)?,
            w_max_lim_pct_sf: r.sunssf(23)?,
            out_pf_set_sf: r.sunssf(24)?,
            v_ar_pct_sf: r.sunssf_nullable(25)?,
        })
    }
}

impl WritableModel for ControlsModel {
    fn encode(&self) -> Vec<RegisterWrite> {
        let mut writer = ModelWriter::new();
        writer
            .put(2, from_uint16_nullable(self.conn_win_tms))
            .put(3, from_uint16_nullable(self.conn_rvrt_tms))
            .put(4, from_uint16(self.conn.into()))
            .put(5, from_uint16(self.w_max_lim_pct))
            .put(6, from_uint16_nullable(self.w_max_lim_pct_win_tms))
            .put(7, from_uint16_nullable(self.w_max_lim_pct_rvrt_tms))
            .put(8, from_uint16_nullable(self.w_max_lim_pct_rmp_tms))
            .put(9, from_uint16(self.w_max_lim_ena.into()))
            .put(10, from_int16(self.out_pf_set))
            .put(11, from_uint16_nullable(self.out_pf_set_win_tms))
            .put(12, from_uint16_nullable(self.out_pf_set_rvrt_tms))
            .put(13, from_uint16_nullable(self.out_pf_set_rmp_tms))
            .put(14, from_uint16(self.out_pf_set_ena.into()))
            .put(15, from_int16_nullable(self.v_ar_w_max_pct))
            .put(16, from_int16_nullable(self.v_ar_max_pct))
            .put(17, from_int16_nullable(self.v_ar_aval_pct))
            .put(18, from_uint16_nullable(self.v_ar_pct_win_tms))
            .put(19, from_uint16_nullable(self.v_ar_pct_rvrt_tms))
            .put(20, from_uint16_nullable(self.v_ar_pct_rmp_tms))
            .put(21, from_uint16_nullable(self.v_ar_pct_mod.map(u16::from)))
            .put(22, from_uint16(self.v_ar_pct_ena.into()));

        writer.finish()
    }
}
