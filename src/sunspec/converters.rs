// Register word <-> value conversions shared by every SunSpec model.
//
// Widths are fixed by the array types, so a field can never be decoded from
// the wrong number of registers.

use crate::error::{Result, SunSpecError};

/// "Not implemented" value for int16, sunssf and (by convention) uint16 fields
pub const NULL_INT16: u16 = 0x8000;
/// "Not implemented" value for uint16 and enum16 fields
pub const NULL_UINT16: u16 = 0xFFFF;

// decoders {{{
pub fn to_uint16([word]: [u16; 1]) -> u16 {
    word
}

pub fn to_int16([word]: [u16; 1]) -> i16 {
    word as i16
}

pub fn to_uint16_nullable([word]: [u16; 1]) -> Option<u16> {
    match word {
        NULL_INT16 | NULL_UINT16 => None,
        value => Some(value),
    }
}

pub fn to_int16_nullable([word]: [u16; 1]) -> Option<i16> {
    (word != NULL_INT16).then_some(word as i16)
}

pub fn to_sunssf(words: [u16; 1]) -> i16 {
    to_int16(words)
}

pub fn to_sunssf_nullable(words: [u16; 1]) -> Option<i16> {
    to_int16_nullable(words)
}

pub fn to_uint32([high, low]: [u16; 2]) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

pub fn to_acc32(words: [u16; 2]) -> u32 {
    to_uint32(words)
}

pub fn to_acc64(words: [u16; 4]) -> u64 {
    words
        .iter()
        .fold(0u64, |acc, word| (acc << 16) | u64::from(*word))
}

pub fn to_bitfield16([word]: [u16; 1]) -> u16 {
    word
}

pub fn to_bitfield32(words: [u16; 2]) -> u32 {
    to_uint32(words)
}

pub fn to_float(words: [u16; 2]) -> f32 {
    f32::from_bits(to_uint32(words))
}

pub fn to_float_nullable(words: [u16; 2]) -> Option<f32> {
    let value = to_float(words);
    (!value.is_nan()).then_some(value)
}

/// ASCII string packed two characters per register, NUL padded.
pub fn to_string(words: &[u16]) -> String {
    let bytes: Vec<u8> = words
        .iter()
        .flat_map(|word| word.to_be_bytes())
        .take_while(|byte| *byte != 0)
        .collect();

    String::from_utf8_lossy(&bytes).trim_end().to_string()
}

/// Reads a model ID and checks it belongs to `allowed`.
pub fn to_id(words: [u16; 1], allowed: &'static [u16], model: &'static str) -> Result<u16> {
    let id = to_uint16(words);
    if !allowed.contains(&id) {
        return Err(SunSpecError::DecodeMismatch {
            model,
            expected: allowed,
            found: id,
        });
    }

    Ok(id)
}
// }}}

// encoders {{{
pub fn from_uint16(value: u16) -> [u16; 1] {
    [value]
}

pub fn from_int16(value: i16) -> [u16; 1] {
    [value as u16]
}

pub fn from_uint16_nullable(value: Option<u16>) -> [u16; 1] {
    [value.unwrap_or(NULL_UINT16)]
}

pub fn from_int16_nullable(value: Option<i16>) -> [u16; 1] {
    [value.map_or(NULL_INT16, |v| v as u16)]
}

pub fn from_sunssf(value: i16) -> [u16; 1] {
    from_int16(value)
}

pub fn from_sunssf_nullable(value: Option<i16>) -> [u16; 1] {
    from_int16_nullable(value)
}

pub fn from_uint32(value: u32) -> [u16; 2] {
    [(value >> 16) as u16, value as u16]
}

pub fn from_acc32(value: u32) -> [u16; 2] {
    from_uint32(value)
}

pub fn from_float(value: f32) -> [u16; 2] {
    from_uint32(value.to_bits())
}
// }}}
