#![allow(dead_code)]

pub use sunspec_bridge::prelude::*;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sunspec_bridge::error::TransportError;
use sunspec_bridge::modbus::ModbusTransport;
use sunspec_bridge::sunspec::converters::*;
use sunspec_bridge::sunspec::scanner::{END_MODEL_ID, SUNSPEC_BASE_ADDRESS};

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// MockTransport {{{
/// In-memory register space standing in for a Modbus device.
#[derive(Default)]
pub struct MockTransport {
    registers: Mutex<HashMap<u16, u16>>,
    reads: Mutex<Vec<(u16, u16)>>,
    writes: Mutex<Vec<(u16, Vec<u16>)>>,
    connects: AtomicUsize,
    fail: AtomicBool,
    destroyed: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device exposing `models` after the SunSpec signature.
    pub fn with_models(models: &[Vec<u16>]) -> Self {
        let transport = Self::new();
        transport.load(SUNSPEC_BASE_ADDRESS, &sunspec_map(models));
        transport
    }

    pub fn load(&self, start: u16, words: &[u16]) {
        let mut registers = self.registers.lock().unwrap();
        for (i, word) in words.iter().enumerate() {
            registers.insert(start + i as u16, *word);
        }
    }

    pub fn register(&self, address: u16) -> Option<u16> {
        self.registers.lock().unwrap().get(&address).copied()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> Vec<(u16, u16)> {
        self.reads.lock().unwrap().clone()
    }

    /// Number of scans started, counted as reads of the signature.
    pub fn scans(&self) -> usize {
        self.reads()
            .iter()
            .filter(|(start, _)| *start == SUNSPEC_BASE_ADDRESS)
            .count()
    }

    pub fn writes(&self) -> Vec<(u16, Vec<u16>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), TransportError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(TransportError::Destroyed);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Io("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ModbusTransport for MockTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.check()
    }

    async fn read_registers(
        &self,
        _unit_id: u8,
        start: u16,
        length: u16,
    ) -> Result<Vec<u16>, TransportError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.reads.lock().unwrap().push((start, length));
        self.check()?;

        let registers = self.registers.lock().unwrap();
        (start..start + length)
            .map(|address| {
                registers.get(&address).copied().ok_or_else(|| {
                    TransportError::Exception(format!("illegal data address {}", address))
                })
            })
            .collect()
    }

    async fn write_registers(
        &self,
        _unit_id: u8,
        start: u16,
        data: &[u16],
    ) -> Result<(), TransportError> {
        self.check()?;
        self.writes.lock().unwrap().push((start, data.to_vec()));
        self.load(start, data);
        Ok(())
    }

    async fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
} // }}}

// register maps {{{
/// Signature, the given models and the end marker, starting at 40000.
pub fn sunspec_map(models: &[Vec<u16>]) -> Vec<u16> {
    let mut words = from_uint32(0x53756e53).to_vec();
    for model in models {
        words.extend_from_slice(model);
    }
    words.extend_from_slice(&[END_MODEL_ID, 0]);
    words
}

/// Absolute address of the `index`th model in a map built by `sunspec_map`.
pub fn model_start(models: &[Vec<u16>], index: usize) -> u16 {
    let offset: usize = models[..index].iter().map(Vec::len).sum();
    SUNSPEC_BASE_ADDRESS + 2 + offset as u16
}

/// A model with `length` zeroed body registers.
pub fn blank_model(id: u16, length: u16) -> Vec<u16> {
    let mut words = vec![0; usize::from(length) + 2];
    words[0] = id;
    words[1] = length;
    words
}

fn put(words: &mut [u16], offset: usize, values: &[u16]) {
    words[offset..offset + values.len()].copy_from_slice(values);
}

pub fn string_words(value: &str, length: usize) -> Vec<u16> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(length * 2, 0);
    bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

pub fn common_words() -> Vec<u16> {
    let mut words = blank_model(1, 66);
    put(&mut words, 2, &string_words("Fronius", 16));
    put(&mut words, 18, &string_words("Symo 10.0-3-M", 16));
    put(&mut words, 34, &string_words("", 8));
    put(&mut words, 42, &string_words("0.3.30.2", 8));
    put(&mut words, 50, &string_words("34119102", 16));
    put(&mut words, 66, &[1]);
    words
}

/// Three phase inverter reporting 6990 W, in the integer layout.
pub fn inverter_int_words() -> Vec<u16> {
    let mut words = blank_model(103, 50);
    put(&mut words, 2, &[3051, 1016, 1017, 1018]);
    put(&mut words, 6, &from_sunssf(-2));
    put(&mut words, 7, &[39600, 39500, 39920, 23010, 22770, 22900]);
    put(&mut words, 13, &from_sunssf(-2));
    put(&mut words, 14, &from_int16(6990));
    put(&mut words, 15, &from_sunssf(0));
    put(&mut words, 16, &[4999]);
    put(&mut words, 17, &from_sunssf(-2));
    put(&mut words, 18, &from_int16(6990));
    put(&mut words, 19, &from_sunssf(0));
    put(&mut words, 20, &from_int16(-2500));
    put(&mut words, 21, &from_sunssf(-2));
    put(&mut words, 22, &from_int16(10000));
    put(&mut words, 23, &from_sunssf(-2));
    put(&mut words, 24, &from_acc32(77877496));
    put(&mut words, 26, &from_sunssf(0));
    // DCA, DCV and their scale factors are not implemented
    put(&mut words, 27, &[NULL_UINT16, NULL_INT16, NULL_UINT16, NULL_INT16]);
    put(&mut words, 31, &from_int16(7347));
    put(&mut words, 32, &from_sunssf(0));
    put(&mut words, 33, &[NULL_INT16; 5]);
    put(&mut words, 38, &[4, 4]);
    words
}

/// The same readings as `inverter_int_words`, in the float layout.
pub fn inverter_float_words(id: u16) -> Vec<u16> {
    let nan = from_float(f32::NAN);
    let mut words = blank_model(id, 60);
    let values: [(usize, f32); 16] = [
        (2, 30.51),
        (4, 10.16),
        (6, 10.17),
        (8, 10.18),
        (10, 396.0),
        (12, 395.0),
        (14, 399.2),
        (16, 230.1),
        (18, 227.7),
        (20, 229.0),
        (22, 6990.0),
        (24, 49.99),
        (26, 6990.0),
        (28, -25.0),
        (30, 100.0),
        (32, 77877496.0),
    ];
    for (offset, value) in values {
        put(&mut words, offset, &from_float(value));
    }
    put(&mut words, 34, &nan);
    put(&mut words, 36, &nan);
    put(&mut words, 38, &from_float(7347.0));
    for offset in [40, 42, 44, 46] {
        put(&mut words, offset, &nan);
    }
    put(&mut words, 48, &[4, 4]);
    words
}

/// Meter importing 1.5 kW, in the integer layout.
pub fn meter_int_words(id: u16) -> Vec<u16> {
    let mut words = blank_model(id, 105);
    put(&mut words, 2, &[652, 217, 218, 217]);
    put(&mut words, 6, &from_sunssf(-2));
    put(&mut words, 7, &[2401, 2399, 2402, 2403]);
    put(&mut words, 11, &[NULL_INT16; 4]);
    put(&mut words, 15, &from_sunssf(-1));
    put(&mut words, 16, &[5001]);
    put(&mut words, 17, &from_sunssf(-2));
    put(&mut words, 18, &[1500, 500, 500, 500]);
    put(&mut words, 22, &from_sunssf(0));
    put(&mut words, 23, &[NULL_INT16; 15]);
    put(&mut words, 38, &from_acc32(123456));
    put(&mut words, 46, &from_acc32(654321));
    put(&mut words, 54, &from_sunssf(0));
    put(&mut words, 71, &[NULL_INT16]);
    put(&mut words, 104, &[NULL_INT16]);
    words
}

/// The same readings as `meter_int_words`, in the float layout.
pub fn meter_float_words(id: u16) -> Vec<u16> {
    let nan = from_float(f32::NAN);
    let mut words = blank_model(id, 124);
    for offset in (4..60).step_by(2) {
        put(&mut words, offset, &nan);
    }
    let values: [(usize, f32); 13] = [
        (2, 6.52),
        (4, 2.17),
        (6, 2.18),
        (8, 2.17),
        (10, 240.1),
        (12, 239.9),
        (14, 240.2),
        (16, 240.3),
        (26, 50.01),
        (28, 1500.0),
        (30, 500.0),
        (32, 500.0),
        (34, 500.0),
    ];
    for (offset, value) in values {
        put(&mut words, offset, &from_float(value));
    }
    put(&mut words, 60, &from_float(123456.0));
    put(&mut words, 68, &from_float(654321.0));
    words
}

pub fn settings_words() -> Vec<u16> {
    let mut words = blank_model(121, 30);
    put(&mut words, 2, &[10000, 230, 0, 253, 207, 10000]);
    put(&mut words, 8, &from_int16(5000));
    put(&mut words, 9, &[NULL_INT16, NULL_INT16]);
    put(&mut words, 11, &from_int16(-5000));
    put(&mut words, 12, &[NULL_UINT16]);
    put(&mut words, 13, &from_int16(80));
    put(&mut words, 14, &[NULL_INT16, NULL_INT16]);
    put(&mut words, 16, &from_int16(-80));
    put(&mut words, 17, &[NULL_UINT16; 5]);
    put(&mut words, 22, &[0, 0, 0]);
    put(&mut words, 25, &from_sunssf(0));
    put(&mut words, 26, &from_sunssf(0));
    put(&mut words, 27, &from_sunssf(0));
    put(&mut words, 28, &[NULL_INT16]);
    put(&mut words, 29, &from_sunssf(-2));
    put(&mut words, 30, &[NULL_INT16, NULL_INT16]);
    words
}

/// Connected, unlimited, no reactive power control.
pub fn controls_words() -> Vec<u16> {
    let mut words = blank_model(123, 24);
    put(&mut words, 2, &[NULL_UINT16, NULL_UINT16, 1, 100]);
    put(&mut words, 6, &[NULL_UINT16; 3]);
    put(&mut words, 9, &[0]);
    put(&mut words, 10, &from_int16(100));
    put(&mut words, 11, &[NULL_UINT16; 3]);
    put(&mut words, 14, &[0]);
    put(&mut words, 15, &[NULL_INT16; 3]);
    put(&mut words, 18, &[NULL_UINT16; 4]);
    put(&mut words, 22, &[0]);
    put(&mut words, 23, &from_sunssf(0));
    put(&mut words, 24, &from_sunssf(-2));
    put(&mut words, 25, &[NULL_INT16]);
    words
}

/// Two MPPT trackers.
pub fn mppt_words() -> Vec<u16> {
    let mut words = blank_model(160, 48);
    put(&mut words, 2, &from_sunssf(-2));
    put(&mut words, 3, &from_sunssf(-1));
    put(&mut words, 4, &from_sunssf(0));
    put(&mut words, 5, &from_sunssf(0));
    put(&mut words, 8, &[2, NULL_UINT16]);
    for (index, (name, dcw)) in [("PV1", 3200), ("PV2", 2900)].into_iter().enumerate() {
        let block = 10 + index * 20;
        put(&mut words, block, &[index as u16 + 1]);
        put(&mut words, block + 1, &string_words(name, 8));
        put(&mut words, block + 9, &[812, 3950, dcw]);
        put(&mut words, block + 12, &from_acc32(1_000_000));
        put(&mut words, block + 14, &from_uint32(0));
        put(&mut words, block + 16, &[NULL_INT16, 4]);
    }
    words
}
// }}}
