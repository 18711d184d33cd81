pub mod common;
pub mod controls;
pub mod inverter;
pub mod meter;
pub mod mppt;
pub mod nameplate;
pub mod settings;
pub mod status;

pub use common::CommonModel;
pub use controls::ControlsModel;
pub use inverter::{InverterModel, InverterModelFloat, InverterModelInt};
pub use meter::{MeterModel, MeterModelFloat, MeterModelInt};
pub use mppt::MpptModel;
pub use nameplate::NameplateModel;
pub use settings::SettingsModel;
pub use status::StatusModel;
