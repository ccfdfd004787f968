//! This module contains all DICOM data element encoding logic.
use self::explicit_be::ExplicitVRBigEndianEncoder;
use self::explicit_le::ExplicitVRLittleEndianEncoder;
use self::implicit_le::ImplicitVREncoder;
use byteordered::Endianness;
use dcmcodec_core::header::{DataElementHeader, Length};
use dcmcodec_core::{Tag, VR};
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{self, Write};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while encoding DICOM data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to write tag"))]
    WriteTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write element header"))]
    WriteHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item header"))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item delimiter"))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write sequence delimiter"))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write offset table"))]
    WriteOffsetTable {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// The value is too long for the 16-bit length field of its VR.
    #[snafu(display(
        "Value of {} element {} is {} bytes long, over the limit of its 16-bit length field",
        vr,
        tag,
        len
    ))]
    LengthOverflow {
        tag: Tag,
        vr: VR,
        len: Length,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type trait for an encoder of basic data properties.
/// Unlike `Encode` (and similar to `BasicDecode`), this trait is not object
/// safe because it's better to just provide a dynamic implementation.
pub trait BasicEncode {
    /// Retrieve the encoder's endianness.
    fn endianness(&self) -> Endianness;

    /// Encode an unsigned short value to the given writer.
    fn encode_us<W: Write>(&self, to: W, value: u16) -> io::Result<()>;

    /// Encode an unsigned long value to the given writer.
    fn encode_ul<W: Write>(&self, to: W, value: u32) -> io::Result<()>;

    /// Encode an unsigned very long value to the given writer.
    fn encode_uv<W: Write>(&self, to: W, value: u64) -> io::Result<()>;

    /// Encode a signed short value to the given writer.
    fn encode_ss<W: Write>(&self, to: W, value: i16) -> io::Result<()>;

    /// Encode a signed long value to the given writer.
    fn encode_sl<W: Write>(&self, to: W, value: i32) -> io::Result<()>;

    /// Encode a signed very long value to the given writer.
    fn encode_sv<W: Write>(&self, to: W, value: i64) -> io::Result<()>;

    /// Encode a single precision float value to the given writer.
    fn encode_fl<W: Write>(&self, to: W, value: f32) -> io::Result<()>;

    /// Encode a double precision float value to the given writer.
    fn encode_fd<W: Write>(&self, to: W, value: f64) -> io::Result<()>;

    /// Encode a DICOM attribute tag to the given writer.
    fn encode_tag<W: Write>(&self, mut to: W, tag: Tag) -> io::Result<()> {
        self.encode_us(&mut to, tag.group())?;
        self.encode_us(to, tag.element())
    }

    /// If this encoder is in Little Endian, evaluate the first function.
    /// Otherwise, evaluate the second one.
    #[inline]
    fn with_encoder<T, F1, F2>(&self, f_le: F1, f_be: F2) -> T
    where
        F1: FnOnce(self::basic::LittleEndianBasicEncoder) -> T,
        F2: FnOnce(self::basic::BigEndianBasicEncoder) -> T,
    {
        match self.endianness() {
            Endianness::Little => f_le(self::basic::LittleEndianBasicEncoder),
            Endianness::Big => f_be(self::basic::BigEndianBasicEncoder),
        }
    }
}

/// Type trait for a data element header encoder.
///
/// Values are encoded separately,
/// see [`encode_value`](crate::convert::encode_value).
pub trait Encode {
    /// Encode and write an element tag.
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write;

    /// Encode and write a data element header to the given destination.
    /// Returns the number of bytes effectively written on success.
    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write;

    /// Encode and write a DICOM sequence item header to the given destination.
    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write;

    /// Encode and write a DICOM sequence item delimiter to the given destination.
    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.encode_tag(&mut to, Tag::ITEM_DELIMITER)?;
        to.write_all(&[0u8; 4]).context(WriteItemDelimiterSnafu)
    }

    /// Encode and write a DICOM sequence delimiter to the given destination.
    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.encode_tag(&mut to, Tag::SEQUENCE_DELIMITER)?;
        to.write_all(&[0u8; 4]).context(WriteSequenceDelimiterSnafu)
    }

    /// Encode and write the basic offset table of an encapsulated pixel data
    /// as the first item of the pixel sequence.
    fn encode_offset_table<W>(&self, to: W, offset_table: &[u32]) -> Result<usize>
    where
        W: Write;
}

impl<T: ?Sized> Encode for &T
where
    T: Encode,
{
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_tag(to, tag)
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        (**self).encode_element_header(to, de)
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_header(to, len)
    }

    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_item_delimiter(to)
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        (**self).encode_sequence_delimiter(to)
    }

    fn encode_offset_table<W>(&self, to: W, offset_table: &[u32]) -> Result<usize>
    where
        W: Write,
    {
        (**self).encode_offset_table(to, offset_table)
    }
}

/// Write the item header and entries of a basic offset table
/// with the given basic encoder.
pub(crate) fn write_offset_table<W, B>(basic: &B, mut to: W, offset_table: &[u32]) -> Result<usize>
where
    W: Write,
    B: BasicEncode,
{
    let len = offset_table.len() as u32 * 4;
    basic
        .encode_tag(&mut to, Tag::ITEM)
        .context(WriteOffsetTableSnafu)?;
    basic.encode_ul(&mut to, len).context(WriteOffsetTableSnafu)?;
    for offset in offset_table {
        basic
            .encode_ul(&mut to, *offset)
            .context(WriteOffsetTableSnafu)?;
    }
    Ok(8 + len as usize)
}

/// A header encoder for any combination of byte order and VR explicitness,
/// decided at run-time.
#[derive(Debug, Copy, Clone)]
pub enum HeaderEncoder {
    /// Explicit VR Little Endian
    ExplicitLittleEndian(ExplicitVRLittleEndianEncoder),
    /// Explicit VR Big Endian
    ExplicitBigEndian(ExplicitVRBigEndianEncoder),
    /// Implicit VR, in either byte order
    Implicit(ImplicitVREncoder),
}

impl HeaderEncoder {
    /// Create a header encoder for the given settings.
    pub fn new(endianness: Endianness, explicit_vr: bool) -> Self {
        match (explicit_vr, endianness) {
            (true, Endianness::Little) => {
                HeaderEncoder::ExplicitLittleEndian(ExplicitVRLittleEndianEncoder::default())
            }
            (true, Endianness::Big) => {
                HeaderEncoder::ExplicitBigEndian(ExplicitVRBigEndianEncoder::default())
            }
            (false, endianness) => HeaderEncoder::Implicit(ImplicitVREncoder::new(endianness)),
        }
    }

    /// The byte order of this encoder.
    pub fn endianness(&self) -> Endianness {
        match self {
            HeaderEncoder::ExplicitLittleEndian(_) => Endianness::Little,
            HeaderEncoder::ExplicitBigEndian(_) => Endianness::Big,
            HeaderEncoder::Implicit(e) => e.endianness(),
        }
    }

    /// Whether the encoder writes explicit value representations.
    pub fn is_explicit_vr(&self) -> bool {
        !matches!(self, HeaderEncoder::Implicit(_))
    }
}

macro_rules! for_each_encoder {
    ($s: expr, |$e: ident| $f: expr) => {
        match $s {
            HeaderEncoder::ExplicitLittleEndian($e) => $f,
            HeaderEncoder::ExplicitBigEndian($e) => $f,
            HeaderEncoder::Implicit($e) => $f,
        }
    };
}

impl Encode for HeaderEncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_tag(to, tag))
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_element_header(to, de))
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_item_header(to, len))
    }

    fn encode_offset_table<W>(&self, to: W, offset_table: &[u32]) -> Result<usize>
    where
        W: Write,
    {
        for_each_encoder!(self, |e| e.encode_offset_table(to, offset_table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_have_zero_length() {
        let mut out = Vec::new();
        let enc = HeaderEncoder::new(Endianness::Big, true);
        enc.encode_item_delimiter(&mut out).unwrap();
        enc.encode_sequence_delimiter(&mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0xFF, 0xFE, 0xE0, 0x0D, 0, 0, 0, 0, //
                0xFF, 0xFE, 0xE0, 0xDD, 0, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn offset_table_item() {
        let mut out = Vec::new();
        let enc = HeaderEncoder::new(Endianness::Little, false);
        let written = enc.encode_offset_table(&mut out, &[0, 0x20]).unwrap();
        assert_eq!(written, 16);
        assert_eq!(
            out,
            vec![0xFE, 0xFF, 0x00, 0xE0, 8, 0, 0, 0, 0, 0, 0, 0, 0x20, 0, 0, 0]
        );
    }
}
