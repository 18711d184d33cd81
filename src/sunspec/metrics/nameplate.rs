use serde::Serialize;

use super::*;
use crate::sunspec::models::nameplate::DerType;
use crate::sunspec::models::NameplateModel;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NameplateMetrics {
    pub der_typ: DerType,
    pub w_rtg: f64,
    pub va_rtg: f64,
    pub v_ar_rtg_q1: f64,
    pub v_ar_rtg_q2: Option<f64>,
    pub v_ar_rtg_q3: Option<f64>,
    pub v_ar_rtg_q4: Option<f64>,
    pub a_rtg: f64,
    pub pf_rtg_q1: f64,
    pub pf_rtg_q2: Option<f64>,
    pub pf_rtg_q3: Option<f64>,
    pub pf_rtg_q4: Option<f64>,
    pub wh_rtg: Option<f64>,
    pub ahr_rtg: Option<f64>,
    pub max_cha_rte: Option<f64>,
    pub max_dis_cha_rte: Option<f64>,
}

pub fn nameplate_metrics(nameplate: &NameplateModel) -> NameplateMetrics {
    let v_ar_rtg_sf = Some(nameplate.v_ar_rtg_sf);
    let pf_rtg_sf = Some(nameplate.pf_rtg_sf);

    NameplateMetrics {
        der_typ: nameplate.der_typ,
        w_rtg: apply_scale_factor(nameplate.w_rtg, nameplate.w_rtg_sf),
        va_rtg: apply_scale_factor(nameplate.va_rtg, nameplate.va_rtg_sf),
        v_ar_rtg_q1: apply_scale_factor(nameplate.v_ar_rtg_q1, nameplate.v_ar_rtg_sf),
        v_ar_rtg_q2: apply_scale_factor_nullable(nameplate.v_ar_rtg_q2, v_ar_rtg_sf),
        v_ar_rtg_q3: apply_scale_factor_nullable(nameplate.v_ar_rtg_q3, v_ar_rtg_sf),
        v_ar_rtg_q4: apply_scale_factor_nullable(nameplate.v_ar_rtg_q4, v_ar_rtg_sf),
        a_rtg: apply_scale_factor(nameplate.a_rtg, nameplate.a_rtg_sf),
        pf_rtg_q1: apply_scale_factor(nameplate.pf_rtg_q1, nameplate.pf_rtg_sf),
        pf_rtg_q2: apply_scale_factor_nullable(nameplate.pf_rtg_q2, pf_rtg_sf),
        pf_rtg_q3: apply_scale_factor_nullable(nameplate.pf_rtg_q3, pf_rtg_sf),
        pf_rtg_q4: apply_scale_factor_nullable(nameplate.pf_rtg_q4, pf_rtg_sf),
        wh_rtg: apply_scale_factor_nullable(nameplate.wh_rtg, nameplate.wh_rtg_sf),
        ahr_rtg: apply_scale_factor_nullable(nameplate.ahr_rtg, nameplate.ahr_rtg_sf),
        max_cha_rte: apply_scale_factor_nullable(nameplate.max_cha_rte, nameplate.max_cha_rte_sf),
        max_dis_cha_rte: apply_scale_factor_nullable(
            nameplate.max_dis_cha_rte,
            nameplate.max_dis_cha_rte_sf,
        ),
    }
}
