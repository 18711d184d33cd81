pub mod connection;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config;
use crate::error::TransportError;

pub use connection::ModbusConnection;

/// Largest register count a single Modbus read request can carry
pub const MAX_READ_REGISTERS: u16 = 125;

/// Register I/O against one physical connection. Implementations serialize
/// requests so only one round trip is outstanding at a time.
#[async_trait]
pub trait ModbusTransport: Send + Sync {
    /// Opens the connection if it is not already open.
    async fn connect(&self) -> Result<(), TransportError>;

    async fn read_registers(
        &self,
        unit_id: u8,
        start: u16,
        length: u16,
    ) -> Result<Vec<u16>, TransportError>;

    async fn write_registers(
        &self,
        unit_id: u8,
        start: u16,
        data: &[u16],
    ) -> Result<(), TransportError>;

    /// Releases the connection; later requests fail.
    async fn destroy(&self);
}

/// One transport per distinct connection config, so devices sharing a bus
/// (several unit IDs on one serial port) share its lock.
#[derive(Default)]
pub struct ModbusConnections {
    connections: Mutex<HashMap<config::Connection, Arc<ModbusConnection>>>,
}

impl ModbusConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config: &config::Connection) -> Arc<ModbusConnection> {
        let mut connections = match self.connections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        connections
            .entry(config.clone())
            .or_insert_with(|| Arc::new(ModbusConnection::new(config.clone())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.connections.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
