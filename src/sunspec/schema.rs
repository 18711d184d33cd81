use enum_dispatch::enum_dispatch;
use num_enum::FromPrimitive;

use crate::error::{Result, SunSpecError};
use crate::sunspec::converters::*;

/// A SunSpec model with a fixed register layout.
pub trait SunSpecModel: Sized {
    /// Name used in logs and errors
    const NAME: &'static str;
    /// Model IDs this layout decodes
    const IDS: &'static [u16];

    /// Decodes a full model window, header included.
    fn decode(words: &[u16]) -> Result<Self>;
}

/// A model whose read-write fields can be written back to the device.
pub trait WritableModel: SunSpecModel {
    /// Register blocks relative to the model start, in field order.
    fn encode(&self) -> Vec<RegisterWrite>;
}

/// Common accessors across dual-layout records.
#[enum_dispatch]
pub trait ModelRecord {
    fn id(&self) -> u16;
    fn length(&self) -> u16;
}

/// Bounds-checked, typed view over the registers of one model.
///
/// Every accessor takes an offset relative to the model start; the converter
/// behind it fixes how many registers the field spans.
#[derive(Clone, Copy, Debug)]
pub struct ModelReader<'a> {
    model: &'static str,
    words: &'a [u16],
}

impl<'a> ModelReader<'a> {
    pub fn new(model: &'static str, words: &'a [u16]) -> Self {
        Self { model, words }
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u16; N]> {
        self.words
            .get(offset..offset + N)
            .and_then(|slice| <[u16; N]>::try_from(slice).ok())
            .ok_or(SunSpecError::ShortModel {
                model: self.model,
                needed: offset + N,
                available: self.words.len(),
            })
    }

    /// Narrows the view to `length` registers starting at `offset`, e.g. one
    /// repeating block of a variable length model.
    pub fn slice(&self, offset: usize, length: usize) -> Result<ModelReader<'a>> {
        let words = self
            .words
            .get(offset..offset + length)
            .ok_or(SunSpecError::ShortModel {
                model: self.model,
                needed: offset + length,
                available: self.words.len(),
            })?;

        Ok(Self {
            model: self.model,
            words,
        })
    }

    pub fn id(&self, offset: usize, allowed: &'static [u16]) -> Result<u16> {
        to_id(self.array(offset)?, allowed, self.model)
    }

    pub fn uint16(&self, offset: usize) -> Result<u16> {
        self.array(offset).map(to_uint16)
    }

    pub fn uint16_nullable(&self, offset: usize) -> Result<Option<u16>> {
        self.array(offset).map(to_uint16_nullable)
    }

    pub fn int16(&self, offset: usize) -> Result<i16> {
        self.array(offset).map(to_int16)
    }

    pub fn int16_nullable(&self, offset: usize) -> Result<Option<i16>> {
        self.array(offset).map(to_int16_nullable)
    }

    pub fn sunssf(&self, offset: usize) -> Result<i16> {
        self.array(offset).map(to_sunssf)
    }

    pub fn sunssf_nullable(&self, offset: usize) -> Result<Option<i16>> {
        self.array(offset).map(to_sunssf_nullable)
    }

    pub fn uint32(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(to_uint32)
    }

    pub fn acc32(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(to_acc32)
    }

    pub fn acc64(&self, offset: usize) -> Result<u64> {
        self.array(offset).map(to_acc64)
    }

    pub fn bitfield16(&self, offset: usize) -> Result<u16> {
        self.array(offset).map(to_bitfield16)
    }

    pub fn bitfield32(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(to_bitfield32)
    }

    pub fn float(&self, offset: usize) -> Result<f32> {
        self.array(offset).map(to_float)
    }

    pub fn float_nullable(&self, offset: usize) -> Result<Option<f32>> {
        self.array(offset).map(to_float_nullable)
    }

    pub fn string(&self, offset: usize, length: usize) -> Result<String> {
        self.slice(offset, length).map(|view| to_string(view.words))
    }

    /// Enum registers keep values outside the known set, the enum's
    /// catch-all variant carries them.
    pub fn enumeration<E>(&self, offset: usize) -> Result<E>
    where
        E: FromPrimitive<Primitive = u16>,
    {
        self.uint16(offset).map(E::from_primitive)
    }

    pub fn enumeration_nullable<E>(&self, offset: usize) -> Result<Option<E>>
    where
        E: FromPrimitive<Primitive = u16>,
    {
        self.uint16_nullable(offset).map(|value| value.map(E::from_primitive))
    }
}

/// Contiguous block of registers to write, relative to the model start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterWrite {
    pub offset: u16,
    pub values: Vec<u16>,
}

/// Collects encoded fields, merging adjacent ones into a single block.
#[derive(Debug, Default)]
pub struct ModelWriter {
    blocks: Vec<RegisterWrite>,
}

impl ModelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<const N: usize>(&mut self, offset: u16, words: [u16; N]) -> &mut Self {
        match self.blocks.last_mut() {
            Some(block) if usize::from(block.offset) + block.values.len() == usize::from(offset) => {
                block.values.extend_from_slice(&words);
            }
            _ => self.blocks.push(RegisterWrite {
                offset,
                values: words.to_vec(),
            }),
        }

        self
    }

    pub fn finish(self) -> Vec<RegisterWrite> {
        self.blocks
    }
}
