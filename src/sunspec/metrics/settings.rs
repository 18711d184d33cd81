use serde::Serialize;

use super::*;
use crate::sunspec::models::settings::{ApparentPowerCalculation, ConnectedPhase, VArAction};
use crate::sunspec::models::SettingsModel;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsMetrics {
    pub w_max: f64,
    pub v_ref: f64,
    pub v_ref_ofs: f64,
    pub v_max: Option<f64>,
    pub v_min: Option<f64>,
    pub va_max: Option<f64>,
    pub v_ar_max_q1: Option<f64>,
    pub v_ar_max_q2: Option<f64>,
    pub v_ar_max_q3: Option<f64>,
    pub v_ar_max_q4: Option<f64>,
    pub w_gra: Option<f64>,
    pub pf_min_q1: Option<f64>,
    pub pf_min_q2: Option<f64>,
    pub pf_min_q3: Option<f64>,
    pub pf_min_q4: Option<f64>,
    pub v_ar_act: Option<VArAction>,
    pub clc_tot_va: Option<ApparentPowerCalculation>,
    pub max_rmp_rte: Option<f64>,
    pub ecp_nom_hz: Option<f64>,
    pub conn_ph: Option<ConnectedPhase>,
}

pub fn settings_metrics(settings: &SettingsModel) -> SettingsMetrics {
    SettingsMetrics {
        w_max: apply_scale_factor(settings.w_max, settings.w_max_sf),
        v_ref: apply_scale_factor(settings.v_ref, settings.v_ref_sf),
        v_ref_ofs: apply_scale_factor(settings.v_ref_ofs, settings.v_ref_ofs_sf),
        v_max: apply_scale_factor_nullable(settings.v_max, settings.v_min_max_sf),
        v_min: apply_scale_factor_nullable(settings.v_min, settings.v_min_max_sf),
        va_max: apply_scale_factor_nullable(settings.va_max, settings.va_max_sf),
        v_ar_max_q1: apply_scale_factor_nullable(Some(settings.v_ar_max_q1), settings.v_ar_max_sf),
        v_ar_max_q2: apply_scale_factor_nullable(settings.v_ar_max_q2, settings.v_ar_max_sf),
        v_ar_max_q3: apply_scale_factor_nullable(settings.v_ar_max_q3, settings.v_ar_max_sf),
        v_ar_max_q4: apply_scale_factor_nullable(Some(settings.v_ar_max_q4), settings.v_ar_max_sf),
        w_gra: apply_scale_factor_nullable(settings.w_gra, settings.w_gra_sf),
        pf_min_q1: apply_scale_factor_nullable(Some(settings.pf_min_q1), settings.pf_min_sf),
        pf_min_q2: apply_scale_factor_nullable(settings.pf_min_q2, settings.pf_min_sf),
        pf_min_q3: apply_scale_factor_nullable(settings.pf_min_q3, settings.pf_min_sf),
        pf_min_q4: apply_scale_factor_nullable(Some(settings.pf_min_q4), settings.pf_min_sf),
        v_ar_act: settings.v_ar_act,
        clc_tot_va: settings.clc_tot_va,
        max_rmp_rte: apply_scale_factor_nullable(settings.max_rmp_rte, settings.max_rmp_rte_sf),
        ecp_nom_hz: apply_scale_factor_nullable(settings.ecp_nom_hz, settings.ecp_nom_hz_sf),
        conn_ph: settings.conn_ph,
    }
}
