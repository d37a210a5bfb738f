//! Growable byte buffer with typed, endian-aware reads and writes.

use super::{Endian, FixedPoint16};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// A fixed-width value that can be written to and read from a [`Buffer`].
pub trait WireValue: Copy + Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Append the encoded value to `out`.
    fn encode(self, endian: Endian, out: &mut Vec<u8>);

    /// Decode from exactly `Self::WIDTH` bytes.
    fn decode(raw: &[u8], endian: Endian) -> Self;

    /// Bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;
}

impl WireValue for u8 {
    const WIDTH: usize = 1;

    fn encode(self, _endian: Endian, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn decode(raw: &[u8], _endian: Endian) -> Self {
        raw[0]
    }

    fn to_bits(self) -> u64 {
        u64::from(self)
    }
}

impl WireValue for i8 {
    const WIDTH: usize = 1;

    fn encode(self, _endian: Endian, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn decode(raw: &[u8], _endian: Endian) -> Self {
        raw[0] as i8
    }

    fn to_bits(self) -> u64 {
        u64::from(self as u8)
    }
}

macro_rules! wire_int {
    ($ty:ty, $unsigned:ty, $width:expr, $read:ident, $write:ident) => {
        impl WireValue for $ty {
            const WIDTH: usize = $width;

            fn encode(self, endian: Endian, out: &mut Vec<u8>) {
                let mut raw = [0u8; $width];
                match endian {
                    Endian::Big => BigEndian::$write(&mut raw, self),
                    Endian::Little => LittleEndian::$write(&mut raw, self),
                }
                out.extend_from_slice(&raw);
            }

            fn decode(raw: &[u8], endian: Endian) -> Self {
                match endian {
                    Endian::Big => BigEndian::$read(raw),
                    Endian::Little => LittleEndian::$read(raw),
                }
            }

            fn to_bits(self) -> u64 {
                (self as $unsigned) as u64
            }
        }
    };
}

wire_int!(u16, u16, 2, read_u16, write_u16);
wire_int!(u32, u32, 4, read_u32, write_u32);
wire_int!(u64, u64, 8, read_u64, write_u64);
wire_int!(i16, u16, 2, read_i16, write_i16);
wire_int!(i32, u32, 4, read_i32, write_i32);
wire_int!(i64, u64, 8, read_i64, write_i64);

impl WireValue for FixedPoint16 {
    const WIDTH: usize = 2;

    fn encode(self, endian: Endian, out: &mut Vec<u8>) {
        self.raw().encode(endian, out);
    }

    fn decode(raw: &[u8], endian: Endian) -> Self {
        FixedPoint16::from_raw(u16::decode(raw, endian))
    }

    fn to_bits(self) -> u64 {
        u64::from(self.raw())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HexError {
    #[error("hex string has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex digit '{found}' at position {position}")]
    InvalidDigit { position: usize, found: char },
}

/// Request or response bytes. Writes append; reads advance an internal cursor.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
    read_pos: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Buffer {
            data: data.into(),
            read_pos: 0,
        }
    }

    /// Parse a hex string such as `"a912342005"`.
    pub fn from_hex(hex: &str) -> Result<Self, HexError> {
        if hex.len() % 2 != 0 {
            return Err(HexError::OddLength(hex.len()));
        }
        let digits: Vec<char> = hex.chars().collect();
        let mut data = Vec::with_capacity(digits.len() / 2);
        for (i, pair) in digits.chunks(2).enumerate() {
            let mut byte = 0u8;
            for (j, c) in pair.iter().enumerate() {
                let nibble = c.to_digit(16).ok_or(HexError::InvalidDigit {
                    position: 2 * i + j,
                    found: *c,
                })?;
                byte = (byte << 4) | nibble as u8;
            }
            data.push(byte);
        }
        Ok(Buffer::from_bytes(data))
    }

    pub fn to_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes not yet consumed by reads.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    pub fn write<T: WireValue>(&mut self, endian: Endian, value: T) {
        value.encode(endian, &mut self.data);
    }

    pub fn write_slice<T: WireValue>(&mut self, endian: Endian, values: &[T]) {
        for &value in values {
            value.encode(endian, &mut self.data);
        }
    }

    /// Read the next value, or `None` if fewer than `T::WIDTH` bytes remain.
    /// The cursor does not move on `None`.
    pub fn read<T: WireValue>(&mut self, endian: Endian) -> Option<T> {
        let end = self.read_pos.checked_add(T::WIDTH)?;
        let raw = self.data.get(self.read_pos..end)?;
        let value = T::decode(raw, endian);
        self.read_pos = end;
        Some(value)
    }

    /// Read exactly `count` values, or `None` if the buffer is too short.
    pub fn read_array<T: WireValue>(&mut self, endian: Endian, count: usize) -> Option<Vec<T>> {
        let needed = T::WIDTH.checked_mul(count)?;
        if self.remaining() < needed {
            return None;
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read(endian)?);
        }
        Some(out)
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Buffer {}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Buffer::from_bytes(data)
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        Buffer::from_bytes(data)
    }
}
