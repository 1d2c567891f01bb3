//! Typed big-endian accessors layered over [`GameProcess`].

use byteorder::{BigEndian, ByteOrder};

use crate::error::{MemoryError, Result};
use crate::process::GameProcess;

/// Width of a fixed-size integer in emulated memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// One byte
    U8 = 1,
    /// Two bytes, big-endian
    U16 = 2,
    /// Four bytes, big-endian
    U32 = 4,
}

impl Width {
    /// Number of bytes occupied.
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Largest value representable at this width.
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U8 => u8::MAX as u32,
            Self::U16 => u16::MAX as u32,
            Self::U32 => u32::MAX,
        }
    }
}

/// Typed access helpers available on every [`GameProcess`].
///
/// The GameCube is big-endian; every integer accessor here decodes and
/// encodes accordingly.
pub trait MemoryExt: GameProcess {
    /// Read an unsigned integer of the given width.
    fn read_fixed(&self, address: u32, width: Width) -> Result<u32> {
        let bytes = self.read_bytes(address, width.bytes())?;
        if bytes.len() != width.bytes() {
            return Err(MemoryError::ShortTransfer {
                address,
                expected: width.bytes(),
                actual: bytes.len(),
            });
        }
        Ok(match width {
            Width::U8 => u32::from(bytes[0]),
            Width::U16 => u32::from(BigEndian::read_u16(&bytes)),
            Width::U32 => BigEndian::read_u32(&bytes),
        })
    }

    /// Write an unsigned integer of the given width.
    fn write_fixed(&mut self, address: u32, width: Width, value: u32) -> Result<()> {
        if value > width.max_value() {
            return Err(MemoryError::ValueTooWide {
                value,
                width: width.bytes(),
            });
        }
        let mut buf = [0u8; 4];
        match width {
            Width::U8 => buf[0] = value as u8,
            Width::U16 => BigEndian::write_u16(&mut buf, value as u16),
            Width::U32 => BigEndian::write_u32(&mut buf, value),
        }
        self.write_bytes(address, &buf[..width.bytes()])
    }

    /// Read a NUL-terminated string of at most `max_len` bytes.
    ///
    /// A string that fills `max_len` without a terminator is returned whole.
    fn read_c_string(&self, address: u32, max_len: usize) -> Result<String> {
        let bytes = self.read_bytes(address, max_len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8(bytes[..end].to_vec())
            .map_err(|_| MemoryError::InvalidString { address })
    }

    /// Compare a byte range against an expected value.
    fn bytes_equal(&self, address: u32, expected: &[u8]) -> Result<bool> {
        Ok(self.read_bytes(address, expected.len())? == expected)
    }

    /// Read one byte.
    fn read_u8(&self, address: u32) -> Result<u8> {
        self.read_fixed(address, Width::U8).map(|v| v as u8)
    }

    /// Read a big-endian `u16`.
    fn read_u16(&self, address: u32) -> Result<u16> {
        self.read_fixed(address, Width::U16).map(|v| v as u16)
    }

    /// Write a big-endian `u16`.
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.write_fixed(address, Width::U16, u32::from(value))
    }

    /// Read a big-endian `u32`.
    fn read_u32(&self, address: u32) -> Result<u32> {
        self.read_fixed(address, Width::U32)
    }

    /// Write a big-endian `u32`.
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.write_fixed(address, Width::U32, value)
    }
}

impl<T: GameProcess + ?Sized> MemoryExt for T {}
