use async_trait::async_trait;
use log::{debug, info, trace, warn};
use std::io;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::error::Elapsed;
use tokio_modbus::client::{rtu, tcp, Context};
use tokio_modbus::prelude::*;
use tokio_serial::SerialPortBuilderExt;

use crate::config;
use crate::error::TransportError;
use crate::modbus::ModbusTransport;

enum State {
    Disconnected,
    Connected(Context),
    Destroyed,
}

/// Modbus TCP or RTU client. The state mutex is held for a whole round trip,
/// which serializes every request made through this connection.
pub struct ModbusConnection {
    config: config::Connection,
    state: Mutex<State>,
}

impl ModbusConnection {
    pub fn new(config: config::Connection) -> Self {
        Self {
            config,
            state: Mutex::new(State::Disconnected),
        }
    }

    async fn open(&self) -> Result<Context, TransportError> {
        let timeout = self.config.timeout();
        let target = self.config.to_string();

        info!("connecting to {}", target);

        let connect = async {
            match &self.config {
                config::Connection::Tcp { host, port, .. } => {
                    let address = tokio::net::lookup_host((host.as_str(), *port))
                        .await?
                        .next()
                        .ok_or_else(|| {
                            io::Error::new(io::ErrorKind::NotFound, format!("{} did not resolve", host))
                        })?;
                    tcp::connect(address).await
                }
                config::Connection::Rtu {
                    path, baud_rate, ..
                } => {
                    let port = tokio_serial::new(path.as_str(), *baud_rate)
                        .open_native_async()
                        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
                    Ok(rtu::attach(port))
                }
            }
        };

        match tokio::time::timeout(timeout, connect).await {
            Ok(Ok(context)) => {
                info!("connected to {}", target);
                Ok(context)
            }
            Ok(Err(err)) => Err(TransportError::Connect {
                target,
                reason: err.to_string(),
            }),
            Err(_) => Err(TransportError::Timeout {
                operation: "connect",
                timeout,
            }),
        }
    }

    async fn ensure_connected<'a>(
        &self,
        state: &'a mut State,
    ) -> Result<&'a mut Context, TransportError> {
        match *state {
            State::Destroyed => return Err(TransportError::Destroyed),
            State::Disconnected => *state = State::Connected(self.open().await?),
            State::Connected(_) => {}
        }

        match state {
            State::Connected(context) => Ok(context),
            _ => Err(TransportError::Destroyed),
        }
    }

    // Exceptions come from a healthy link; anything else drops the context so
    // the next request reconnects.
    fn settle<T>(
        &self,
        state: &mut State,
        operation: &'static str,
        result: Result<tokio_modbus::Result<T>, Elapsed>,
    ) -> Result<T, TransportError> {
        match result {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(exception))) => Err(TransportError::Exception(format!("{:?}", exception))),
            Ok(Err(err)) => {
                warn!("{} {} failed, dropping connection: {}", self.config, operation, err);
                *state = State::Disconnected;
                Err(TransportError::Io(err.to_string()))
            }
            Err(_) => {
                let timeout = self.config.timeout();
                warn!("{} {} timed out after {:?}, dropping connection", self.config, operation, timeout);
                *state = State::Disconnected;
                Err(TransportError::Timeout { operation, timeout })
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }
}

#[async_trait]
impl ModbusTransport for ModbusConnection {
    async fn connect(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        self.ensure_connected(&mut state).await.map(|_| ())
    }

    async fn read_registers(
        &self,
        unit_id: u8,
        start: u16,
        length: u16,
    ) -> Result<Vec<u16>, TransportError> {
        let mut state = self.state.lock().await;
        let context = self.ensure_connected(&mut state).await?;

        trace!("{} read unit={} start={} length={}", self.config, unit_id, start, length);

        context.set_slave(Slave(unit_id));
        let result =
            tokio::time::timeout(self.timeout(), context.read_holding_registers(start, length)).await;
        let words = self.settle(&mut state, "read", result)?;

        if words.len() != usize::from(length) {
            return Err(TransportError::ShortResponse {
                expected: length,
                received: words.len(),
            });
        }

        Ok(words)
    }

    async fn write_registers(
        &self,
        unit_id: u8,
        start: u16,
        data: &[u16],
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        let context = self.ensure_connected(&mut state).await?;

        debug!("{} write unit={} start={} values={:?}", self.config, unit_id, start, data);

        context.set_slave(Slave(unit_id));
        let result =
            tokio::time::timeout(self.timeout(), context.write_multiple_registers(start, data)).await;
        self.settle(&mut state, "write", result)
    }

    async fn destroy(&self) {
        let mut state = self.state.lock().await;
        if let State::Connected(_) = *state {
            info!("closing {}", self.config);
        }
        *state = State::Destroyed;
    }
}
