pub mod inverter;
pub mod meter;
pub mod nameplate;
pub mod settings;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SunSpecError};

pub use inverter::{inverter_metrics, InverterMetrics};
pub use meter::{meter_metrics, MeterMetrics};
pub use nameplate::{nameplate_metrics, NameplateMetrics};
pub use settings::{settings_metrics, SettingsMetrics};
pub use status::{status_metrics, StatusMetrics};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phases {
    SinglePhase,
    SplitPhase,
    ThreePhase,
}

pub fn phases_from_meter_id(id: u16) -> Result<Phases> {
    match id {
        201 | 211 => Ok(Phases::SinglePhase),
        202 | 212 => Ok(Phases::SplitPhase),
        203 | 204 | 213 | 214 => Ok(Phases::ThreePhase),
        _ => Err(SunSpecError::UnsupportedId(id)),
    }
}

pub fn phases_from_inverter_id(id: u16) -> Result<Phases> {
    match id {
        101 | 111 => Ok(Phases::SinglePhase),
        102 | 112 => Ok(Phases::SplitPhase),
        103 | 113 => Ok(Phases::ThreePhase),
        _ => Err(SunSpecError::UnsupportedId(id)),
    }
}

const EXACT_POWERS_OF_TEN: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

fn power_of_ten(exponent: u32) -> f64 {
    EXACT_POWERS_OF_TEN
        .get(exponent as usize)
        .copied()
        .unwrap_or_else(|| 10f64.powi(exponent as i32))
}

/// `value * 10^sf`, rounded as the decimal result would be: 3051 with
/// sf -2 is exactly `30.51`, not `30.510000000000002`.
pub fn apply_scale_factor(value: impl Into<f64>, sf: i16) -> f64 {
    let value = value.into();
    let exponent = u32::from(sf.unsigned_abs());

    if sf < 0 {
        value / power_of_ten(exponent)
    } else {
        value * power_of_ten(exponent)
    }
}

/// Null if either the value or its scale factor is absent.
pub fn apply_scale_factor_nullable<V: Into<f64>>(value: Option<V>, sf: Option<i16>) -> Option<f64> {
    value.zip(sf).map(|(value, sf)| apply_scale_factor(value, sf))
}

/// Widens a float register value through its shortest decimal form, so
/// `30.51f32` becomes `30.51f64` rather than `30.510000228881836`.
pub fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

pub fn widen_nullable(value: Option<f32>) -> Option<f64> {
    value.map(widen)
}
