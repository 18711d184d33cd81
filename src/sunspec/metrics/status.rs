use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use super::*;
use crate::sunspec::models::StatusModel;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusMetrics {
    pub pv_conn: u16,
    pub stor_conn: u16,
    pub ecp_conn: u16,
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
    pub v_ar_aval: Option<f64>,
    pub w_aval: Option<f64>,
    pub st_set_lim_msk: u32,
    pub st_act_ctl: u32,
    pub tm_src: String,
    pub tms: u32,
    pub rt_st: u16,
    pub ris: Option<f64>,
}

pub fn status_metrics(status: &StatusModel) -> StatusMetrics {
    StatusMetrics {
        pv_conn: status.pv_conn,
        stor_conn: status.stor_conn,
        ecp_conn: status.ecp_conn,
        act_wh: status.act_wh,
        act_v_ah: status.act_v_ah,
        act_v_arh_q1: status.act_v_arh_q1,
        act_v_arh_q2: status.act_v_arh_q2,
        act_v_arh_q3: status.act_v_arh_q3,
        act_v_arh_q4: status.act_v_arh_q4,
        v_ar_aval: apply_scale_factor_nullable(status.v_ar_aval, status.v_ar_aval_sf),
        w_aval: apply_scale_factor_nullable(status.w_aval, status.w_aval_sf),
        st_set_lim_msk: status.st_set_lim_msk,
        st_act_ctl: status.st_act_ctl,
        tm_src: status.tm_src.clone(),
        tms: status.tms,
        rt_st: status.rt_st,
        ris: apply_scale_factor_nullable(status.ris, status.ris_sf),
    }
}
