// SunSpec model discovery, decoding and metrics.
//
// schema must be declared ahead of models: the enum_dispatch trait has to be
// expanded before the record enums that dispatch on it.
pub mod converters;
pub mod schema;

pub mod connection;
pub mod metrics;
pub mod models;
pub mod scanner;

pub use connection::{ConnectionOptions, SunSpecConnection};
pub use scanner::{AddressTable, ModelAddress};
pub use schema::{ModelRecord, SunSpecModel, WritableModel};
