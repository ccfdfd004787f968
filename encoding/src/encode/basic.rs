//! Primitive encoders of binary data,
//! in either Little Endian or Big Endian.

use super::BasicEncode;
use byteordered::{ByteOrdered, Endianness};
use std::io::{self, Write};

/// A basic encoder of primitive elements in little endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LittleEndianBasicEncoder;

/// A basic encoder of primitive elements in big endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BigEndianBasicEncoder;

macro_rules! impl_basic_encode {
    ($t: ty, $endianness: expr, $ordered: path) => {
        impl BasicEncode for $t {
            fn endianness(&self) -> Endianness {
                $endianness
            }

            fn encode_us<W: Write>(&self, to: W, value: u16) -> io::Result<()> {
                $ordered(to).write_u16(value)
            }

            fn encode_ul<W: Write>(&self, to: W, value: u32) -> io::Result<()> {
                $ordered(to).write_u32(value)
            }

            fn encode_uv<W: Write>(&self, to: W, value: u64) -> io::Result<()> {
                $ordered(to).write_u64(value)
            }

            fn encode_ss<W: Write>(&self, to: W, value: i16) -> io::Result<()> {
                $ordered(to).write_i16(value)
            }

            fn encode_sl<W: Write>(&self, to: W, value: i32) -> io::Result<()> {
                $ordered(to).write_i32(value)
            }

            fn encode_sv<W: Write>(&self, to: W, value: i64) -> io::Result<()> {
                $ordered(to).write_i64(value)
            }

            fn encode_fl<W: Write>(&self, to: W, value: f32) -> io::Result<()> {
                $ordered(to).write_f32(value)
            }

            fn encode_fd<W: Write>(&self, to: W, value: f64) -> io::Result<()> {
                $ordered(to).write_f64(value)
            }
        }
    };
}

impl_basic_encode!(LittleEndianBasicEncoder, Endianness::Little, ByteOrdered::le);
impl_basic_encode!(BigEndianBasicEncoder, Endianness::Big, ByteOrdered::be);

/// A basic encoder with support for both Little Endian an Big Endian
/// encoding, decided at run-time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BasicEncoder {
    /// Encode in Little Endian
    LE(LittleEndianBasicEncoder),
    /// Encode in Big Endian
    BE(BigEndianBasicEncoder),
}

use self::BasicEncoder::{BE, LE};

impl BasicEncoder {
    /// Create a basic encoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => LE(LittleEndianBasicEncoder),
            Endianness::Big => BE(BigEndianBasicEncoder),
        }
    }
}

impl Default for BasicEncoder {
    fn default() -> Self {
        LE(LittleEndianBasicEncoder)
    }
}

impl From<Endianness> for BasicEncoder {
    fn from(endianness: Endianness) -> Self {
        BasicEncoder::new(endianness)
    }
}

macro_rules! for_both {
    ($s: expr, |$e: ident| $f: expr) => {
        match *$s {
            LE(ref $e) => $f,
            BE(ref $e) => $f,
        }
    };
}

impl BasicEncode for BasicEncoder {
    fn endianness(&self) -> Endianness {
        match *self {
            LE(_) => Endianness::Little,
            BE(_) => Endianness::Big,
        }
    }

    fn encode_us<W: Write>(&self, to: W, value: u16) -> io::Result<()> {
        for_both!(self, |e| e.encode_us(to, value))
    }

    fn encode_ul<W: Write>(&self, to: W, value: u32) -> io::Result<()> {
        for_both!(self, |e| e.encode_ul(to, value))
    }

    fn encode_uv<W: Write>(&self, to: W, value: u64) -> io::Result<()> {
        for_both!(self, |e| e.encode_uv(to, value))
    }

    fn encode_ss<W: Write>(&self, to: W, value: i16) -> io::Result<()> {
        for_both!(self, |e| e.encode_ss(to, value))
    }

    fn encode_sl<W: Write>(&self, to: W, value: i32) -> io::Result<()> {
        for_both!(self, |e| e.encode_sl(to, value))
    }

    fn encode_sv<W: Write>(&self, to: W, value: i64) -> io::Result<()> {
        for_both!(self, |e| e.encode_sv(to, value))
    }

    fn encode_fl<W: Write>(&self, to: W, value: f32) -> io::Result<()> {
        for_both!(self, |e| e.encode_fl(to, value))
    }

    fn encode_fd<W: Write>(&self, to: W, value: f64) -> io::Result<()> {
        for_both!(self, |e| e.encode_fd(to, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_write<F>(f: F, expected: &[u8])
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        assert_eq!(&buf[..], expected);
    }

    #[test]
    fn test_write_integers() {
        let le = LittleEndianBasicEncoder;
        let be = BigEndianBasicEncoder;

        test_write(|w| le.encode_us(w, 0x3CC3), &[0xC3, 0x3C]);
        test_write(|w| be.encode_us(w, 0xC33C), &[0xC3, 0x3C]);
        test_write(|w| le.encode_ul(w, 0xCC333CC3), &[0xC3, 0x3C, 0x33, 0xCC]);
        test_write(|w| be.encode_ul(w, 0xC33C33CC), &[0xC3, 0x3C, 0x33, 0xCC]);

        let le = BasicEncoder::new(Endianness::Little);
        let be = BasicEncoder::new(Endianness::Big);

        test_write(|w| le.encode_ss(w, 0x3CC3), &[0xC3, 0x3C]);
        test_write(|w| be.encode_ss(w, -0x3CC4), &[0xC3, 0x3C]);
        test_write(|w| le.encode_sv(w, -1), &[0xFF; 8]);
    }
}
