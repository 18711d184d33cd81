use serde::Serialize;

use super::*;
use crate::sunspec::models::{InverterModel, InverterModelFloat, InverterModelInt};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InverterMetrics {
    pub a: f64,
    pub aph_a: f64,
    pub aph_b: Option<f64>,
    pub aph_c: Option<f64>,
    pub ppv_ph_ab: Option<f64>,
    pub ppv_ph_bc: Option<f64>,
    pub ppv_ph_ca: Option<f64>,
    pub ph_v_ph_a: f64,
    pub ph_v_ph_b: Option<f64>,
    pub ph_v_ph_c: Option<f64>,
    pub w: f64,
    pub hz: f64,
    pub va: f64,
    pub v_ar: f64,
    pub pf: f64,
    pub wh: f64,
    pub dca: Option<f64>,
    pub dcv: Option<f64>,
    pub dcw: Option<f64>,
    pub phases: Phases,
}

pub fn inverter_metrics(inverter: &InverterModel) -> Result<InverterMetrics> {
    match inverter {
        InverterModel::Int(inverter) => inverter_metrics_int(inverter),
        InverterModel::Float(inverter) => inverter_metrics_float(inverter),
    }
}

pub fn inverter_metrics_int(inverter: &InverterModelInt) -> Result<InverterMetrics> {
    Ok(InverterMetrics {
        a: apply_scale_factor(inverter.a, inverter.a_sf),
        aph_a: apply_scale_factor(inverter.aph_a, inverter.a_sf),
        aph_b: apply_scale_factor_nullable(inverter.aph_b, Some(inverter.a_sf)),
        aph_c: apply_scale_factor_nullable(inverter.aph_c, Some(inverter.a_sf)),
        ppv_ph_ab: apply_scale_factor_nullable(inverter.ppv_ph_ab, Some(inverter.v_sf)),
        ppv_ph_bc: apply_scale_factor_nullable(inverter.ppv_ph_bc, Some(inverter.v_sf)),
        ppv_ph_ca: apply_scale_factor_nullable(inverter.ppv_ph_ca, Some(inverter.v_sf)),
        ph_v_ph_a: apply_scale_factor(inverter.ph_v_ph_a, inverter.v_sf),
        ph_v_ph_b: apply_scale_factor_nullable(inverter.ph_v_ph_b, Some(inverter.v_sf)),
        ph_v_ph_c: apply_scale_factor_nullable(inverter.ph_v_ph_c, Some(inverter.v_sf)),
        w: apply_scale_factor(inverter.w, inverter.w_sf),
        hz: apply_scale_factor(inverter.hz, inverter.hz_sf),
        va: apply_scale_factor(inverter.va, inverter.va_sf),
        v_ar: apply_scale_factor(inverter.v_ar, inverter.v_ar_sf),
        pf: apply_scale_factor(inverter.pf, inverter.pf_sf),
        wh: apply_scale_factor(inverter.wh, inverter.wh_sf),
        dca: apply_scale_factor_nullable(inverter.dca, inverter.dca_sf),
        dcv: apply_scale_factor_nullable(inverter.dcv, inverter.dcv_sf),
        dcw: apply_scale_factor_nullable(inverter.dcw, inverter.dcw_sf),
        phases: phases_from_inverter_id(inverter.id)?,
    })
}

pub fn inverter_metrics_float(inverter: &InverterModelFloat) -> Result<InverterMetrics> {
    Ok(InverterMetrics {
        a: widen(inverter.a),
        aph_a: widen(inverter.aph_a),
        aph_b: widen_nullable(inverter.aph_b),
        aph_c: widen_nullable(inverter.aph_c),
        ppv_ph_ab: widen_nullable(inverter.ppv_ph_ab),
        ppv_ph_bc: widen_nullable(inverter.ppv_ph_bc),
        ppv_ph_ca: widen_nullable(inverter.ppv_ph_ca),
        ph_v_ph_a: widen(inverter.ph_v_ph_a),
        ph_v_ph_b: widen_nullable(inverter.ph_v_ph_b),
        ph_v_ph_c: widen_nullable(inverter.ph_v_ph_c),
        w: widen(inverter.w),
        hz: widen(inverter.hz),
        va: widen(inverter.va),
        v_ar: widen(inverter.v_ar),
        pf: widen(inverter.pf),
        wh: widen(inverter.wh),
        dca: widen_nullable(inverter.dca),
        dcv: widen_nullable(inverter.dcv),
        dcw: widen_nullable(inverter.dcw),
        phases: phases_from_inverter_id(inverter.id)?,
    })
}
