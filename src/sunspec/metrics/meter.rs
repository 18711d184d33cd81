use serde::Serialize;

use super::*;
use crate::sunspec::models::{MeterModel, MeterModelFloat, MeterModelInt};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeterMetrics {
    pub a: f64,
    pub aph_a: Option<f64>,
    pub aph_b: Option<f64>,
    pub aph_c: Option<f64>,
    pub ph_v: f64,
    pub ph_v_ph_a: Option<f64>,
    pub ph_v_ph_b: Option<f64>,
    pub ph_v_ph_c: Option<f64>,
    pub ppv: Option<f64>,
    pub ppv_ph_ab: Option<f64>,
    pub ppv_ph_bc: Option<f64>,
    pub ppv_ph_ca: Option<f64>,
    pub hz: f64,
    pub w: f64,
    pub w_ph_a: Option<f64>,
    pub w_ph_b: Option<f64>,
    pub w_ph_c: Option<f64>,
    pub va: Option<f64>,
    pub va_ph_a: Option<f64>,
    pub va_ph_b: Option<f64>,
    pub va_ph_c: Option<f64>,
    pub v_ar: Option<f64>,
    pub v_ar_ph_a: Option<f64>,
    pub v_ar_ph_b: Option<f64>,
    pub v_ar_ph_c: Option<f64>,
    pub pf: Option<f64>,
    pub pf_ph_a: Option<f64>,
    pub pf_ph_b: Option<f64>,
    pub pf_ph_c: Option<f64>,
    pub tot_wh_exp: f64,
    pub tot_wh_imp: f64,
    pub tot_v_ah_exp: Option<f64>,
    pub tot_v_ah_imp: Option<f64>,
    pub phases: Phases,
}

pub fn meter_metrics(meter: &MeterModel) -> Result<MeterMetrics> {
    match meter {
        MeterModel::Int(meter) => meter_metrics_int(meter),
        MeterModel::Float(meter) => meter_metrics_float(meter),
    }
}

pub fn meter_metrics_int(meter: &MeterModelInt) -> Result<MeterMetrics> {
    let a_sf = Some(meter.a_sf);
    let v_sf = Some(meter.v_sf);
    let w_sf = Some(meter.w_sf);

    Ok(MeterMetrics {
        a: apply_scale_factor(meter.a, meter.a_sf),
        aph_a: apply_scale_factor_nullable(meter.aph_a, a_sf),
        aph_b: apply_scale_factor_nullable(meter.aph_b, a_sf),
        aph_c: apply_scale_factor_nullable(meter.aph_c, a_sf),
        ph_v: apply_scale_factor(meter.ph_v, meter.v_sf),
        ph_v_ph_a: apply_scale_factor_nullable(meter.ph_v_ph_a, v_sf),
        ph_v_ph_b: apply_scale_factor_nullable(meter.ph_v_ph_b, v_sf),
        ph_v_ph_c: apply_scale_factor_nullable(meter.ph_v_ph_c, v_sf),
        ppv: apply_scale_factor_nullable(meter.ppv, v_sf),
        ppv_ph_ab: apply_scale_factor_nullable(meter.ppv_ph_ab, v_sf),
        ppv_ph_bc: apply_scale_factor_nullable(meter.ppv_ph_bc, v_sf),
        ppv_ph_ca: apply_scale_factor_nullable(meter.ppv_ph_ca, v_sf),
        hz: apply_scale_factor(meter.hz, meter.hz_sf),
        w: apply_scale_factor(meter.w, meter.w_sf),
        w_ph_a: apply_scale_factor_nullable(meter.w_ph_a, w_sf),
        w_ph_b: apply_scale_factor_nullable(meter.w_ph_b, w_sf),
        w_ph_c: apply_scale_factor_nullable(meter.w_ph_c, w_sf),
        va: apply_scale_factor_nullable(meter.va, meter.va_sf),
        va_ph_a: apply_scale_factor_nullable(meter.va_ph_a, meter.va_sf),
        va_ph_b: apply_scale_factor_nullable(meter.va_ph_b, meter.va_sf),
        va_ph_c: apply_scale_factor_nullable(meter.va_ph_c, meter.va_sf),
        v_ar: apply_scale_factor_nullable(meter.v_ar, meter.v_ar_sf),
        v_ar_ph_a: apply_scale_factor_nullable(meter.v_ar_ph_a, meter.v_ar_sf),
        v_ar_ph_b: apply_scale_factor_nullable(meter.v_ar_ph_b, meter.v_ar_sf),
        v_ar_ph_c: apply_scale_factor_nullable(meter.v_ar_ph_c, meter.v_ar_sf),
        pf: apply_scale_factor_nullable(meter.pf, meter.pf_sf),
        pf_ph_a: apply_scale_factor_nullable(meter.pf_ph_a, meter.pf_sf),
        pf_ph_b: apply_scale_factor_nullable(meter.pf_ph_b, meter.pf_sf),
        pf_ph_c: apply_scale_factor_nullable(meter.pf_ph_c, meter.pf_sf),
        tot_wh_exp: apply_scale_factor(meter.tot_wh_exp, meter.tot_wh_sf),
        tot_wh_imp: apply_scale_factor(meter.tot_wh_imp, meter.tot_wh_sf),
        tot_v_ah_exp: apply_scale_factor_nullable(Some(meter.tot_v_ah_exp), meter.tot_v_ah_sf),
        tot_v_ah_imp: apply_scale_factor_nullable(Some(meter.tot_v_ah_imp), meter.tot_v_ah_sf),
        phases: phases_from_meter_id(meter.id)?,
    })
}

pub fn meter_metrics_float(meter: &MeterModelFloat) -> Result<MeterMetrics> {
    Ok(MeterMetrics {
        a: widen(meter.a),
        aph_a: widen_nullable(meter.aph_a),
        aph_b: widen_nullable(meter.aph_b),
        aph_c: widen_nullable(meter.aph_c),
        ph_v: widen(meter.ph_v),
        ph_v_ph_a: widen_nullable(meter.ph_v_ph_a),
        ph_v_ph_b: widen_nullable(meter.ph_v_ph_b),
        ph_v_ph_c: widen_nullable(meter.ph_v_ph_c),
        ppv: widen_nullable(meter.ppv),
        ppv_ph_ab: widen_nullable(meter.ppv_ph_ab),
        ppv_ph_bc: widen_nullable(meter.ppv_ph_bc),
        ppv_ph_ca: widen_nullable(meter.ppv_ph_ca),
        hz: widen(meter.hz),
        w: widen(meter.w),
        w_ph_a: widen_nullable(meter.w_ph_a),
        w_ph_b: widen_nullable(meter.w_ph_b),
        w_ph_c: widen_nullable(meter.w_ph_c),
        va: widen_nullable(meter.va),
        va_ph_a: widen_nullable(meter.va_ph_a),
        va_ph_b: widen_nullable(meter.va_ph_b),
        va_ph_c: widen_nullable(meter.va_ph_c),
        v_ar: widen_nullable(meter.v_ar),
        v_ar_ph_a: widen_nullable(meter.v_ar_ph_a),
        v_ar_ph_b: widen_nullable(meter.v_ar_ph_b),
        v_ar_ph_c: widen_nullable(meter.v_ar_ph_c),
        pf: widen_nullable(meter.pf),
        pf_ph_a: widen_nullable(meter.pf_ph_a),
        pf_ph_b: widen_nullable(meter.pf_ph_b),
        pf_ph_c: widen_nullable(meter.pf_ph_c),
        tot_wh_exp: widen(meter.tot_wh_exp),
        tot_wh_imp: widen(meter.tot_wh_imp),
        tot_v_ah_exp: Some(widen(meter.tot_v_ah_exp)),
        tot_v_ah_imp: Some(widen(meter.tot_v_ah_imp)),
        phases: phases_from_meter_id(meter.id)?,
    })
}
