use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::error::Result;
use crate::sunspec::schema::{ModelReader, SunSpecModel};

/// Model 122: measurements and status.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusModel {
    pub id: u16,
    pub length: u16,
    pub pv_conn: u16,
    pub stor_conn: u16,
    pub ecp_conn: u16,
    // 64-bit counters overflow JSON numbers
    #[serde_as(as = "DisplayFromStr")]
    pub act_wh: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub act_v_ah: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub act_v_arh_q1: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub act_v_arh_q2: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub act_v_arh_q3: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub act_v_arh_q4: u64,
    pub v_ar_aval: Option<i16>,
    pub v_ar_aval_sf: Option<i16>,
    pub w_aval: Option<u16>,
    pub w_aval_sf: Option<i16>,
    pub st_set_lim_msk: u32,
    pub st_act_ctl: u32,
    pub tm_src: String,
    pub tms: u32,
    pub rt_st: u16,
    pub ris: Option<u16>,
    pub ris_sf: Option<i16>,
}

impl SunSpecModel for StatusModel {
    const NAME: &'static str = "status";
    const IDS: &'static [u16] = &[122];

    fn decode(words: &[u16]) -> Result<Self> {
        let r = ModelReader::new(Self::NAME, words);

        Ok(Self {
            id: r.id(0, Self::IDS)?,
            length: r.uint16(1)?,
            pv_conn: r.bitfield16(2)?,
            stor_conn: r.bitfield16(3)?,
            ecp_conn: r.bitfield16(4)?,
            act_wh: r.acc64(5)?,
            act_v_ah: r.acc64(9)?,
            act_v_arh_q1: r.acc64(13)?,
            act_v_arh_q2: r.acc64(17)?,
            act_v_arh_q3: r.acc64(21)?,
            act_v_arh_q4: r.acc64(25)?,
            v_ar_aval: r.int16_nullable(29)?,
            v_ar_aval_sf: r.sunssf_nullable(30)?,
            w_aval: r.uint16_nullable(31)?,
            w_aval_sf: r.sunssf_nullable(32)?,
            st_set_lim_msk: r.bitfield32(33)?,
            st_act_ctl: r.bitfield32(35)?,
            tm_src: r.string(37, 4)?,
            tms: r.uint32(41)?,
            rt_st: r.bitfield16(43)?,
            ris: r.uint16_nullable(44)?,
            ris_sf: r.sunssf_nullable(45)?,
        })
    }
}
