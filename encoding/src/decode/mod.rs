//! This module contains all DICOM data element decoding logic.

use self::explicit_be::ExplicitVRBigEndianDecoder;
use self::explicit_le::ExplicitVRLittleEndianDecoder;
use self::implicit_le::ImplicitVRDecoder;
use byteordered::Endianness;
use dcmcodec_core::dictionary::DataDictionary;
use dcmcodec_core::header::{DataElementHeader, SequenceItemHeader, SequenceItemHeaderError};
use dcmcodec_core::Tag;
use dcmcodec_dictionary_std::StandardDataDictionary;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while decoding DICOM data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header"))]
    ReadHeaderTag {
        backtrace: Option<Backtrace>,
        source: io::Error,
    },
    #[snafu(display("Failed to read the item header"))]
    ReadItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's item length field"))]
    ReadItemLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's tag field"))]
    ReadTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes"))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field"))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's value representation"))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Bad sequence item header"))]
    BadSequenceHeader { source: SequenceItemHeaderError },
}

impl Error {
    /// Whether the error was caused by the source
    /// having no more data at the very start of a header.
    pub fn is_clean_eof(&self) -> bool {
        matches!(
            self,
            Error::ReadHeaderTag { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Read the tag at the start of a data element header.
///
/// Running out of data before the first byte is reported as
/// [`ReadHeaderTag`](Error::ReadHeaderTag),
/// so that it can be told apart from a truncated header.
pub(crate) fn read_header_tag<S, B>(basic: &B, source: &mut S) -> Result<Tag>
where
    S: ?Sized + Read,
    B: BasicDecode,
{
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e).context(ReadHeaderTagSnafu),
        }
    }
    match filled {
        0 => Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(ReadHeaderTagSnafu),
        4 => basic.decode_tag(&buf[..]).context(ReadTagSnafu),
        _ => Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(ReadTagSnafu),
    }
}

/// Obtain the default data element decoder.
/// According to the standard, data elements are encoded in Implicit
/// VR Little Endian by default.
pub fn default_reader() -> ImplicitVRDecoder<StandardDataDictionary> {
    ImplicitVRDecoder::default()
}

/// Obtain a data element decoder for reading the data elements in a DICOM
/// file's Meta information. According to the standard, these are always
/// encoded in Explicit VR Little Endian.
pub fn file_header_decoder() -> ExplicitVRLittleEndianDecoder {
    ExplicitVRLittleEndianDecoder::default()
}

/// Type trait for reading and decoding basic data values from a data source.
///
/// This trait aims to provide methods for reading binary numbers based on the
/// source's endianness. Unlike `Decode`, this trait is not object safe.
/// However, it doesn't have to because there are, and only will be, two
/// possible implementations (`LittleEndianBasicDecoder` and
/// `BigEndianBasicDecoder`).
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S: Read>(&self, source: S) -> io::Result<u16>;

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S: Read>(&self, source: S) -> io::Result<u32>;

    /// Decode an unsigned very long value from the given source.
    fn decode_uv<S: Read>(&self, source: S) -> io::Result<u64>;

    /// Decode a signed short value from the given source.
    fn decode_ss<S: Read>(&self, source: S) -> io::Result<i16>;

    /// Decode a signed long value from the given source.
    fn decode_sl<S: Read>(&self, source: S) -> io::Result<i32>;

    /// Decode a signed very long value from the given source.
    fn decode_sv<S: Read>(&self, source: S) -> io::Result<i64>;

    /// Decode a single precision float value from the given source.
    fn decode_fl<S: Read>(&self, source: S) -> io::Result<f32>;

    /// Decode a double precision float value from the given source.
    fn decode_fd<S: Read>(&self, source: S) -> io::Result<f64>;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S: Read>(&self, mut source: S) -> io::Result<Tag> {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(source)?;
        Ok(Tag(g, e))
    }
}

/// Type trait for reading and decoding DICOM data element headers.
///
/// The specific behaviour of decoding, even when abstracted from the original source,
/// depends on the transfer syntax.
pub trait Decode {
    /// Fetch and decode the next data element header from the given source.
    /// This method returns only the header of the element.
    /// At the end of this operation, the source will be pointing at
    /// the element's value data, which should be read or skipped as necessary.
    ///
    /// Decoding an item or sequence delimiter is considered valid,
    /// and so should be properly handled by the decoder.
    /// The value representation in this case should be `UN`.
    ///
    /// Returns the expected header and the exact number of bytes read from the source.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next sequence item head from the given source.
    /// It is a separate method because value representation
    /// is always implicit when reading item headers and delimiters.
    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

impl<'a, T: ?Sized> Decode for &'a T
where
    T: Decode,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        (**self).decode_header(source)
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        (**self).decode_item_header(source)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        (**self).decode_tag(source)
    }
}

/// A header decoder for any combination of byte order and VR explicitness,
/// decided at run-time.
///
/// This is what a [`ByteStream`](crate::stream::ByteStream)
/// rebinds to whenever its encoding properties change.
#[derive(Debug, Clone)]
pub enum HeaderDecoder<D = StandardDataDictionary> {
    /// Explicit VR Little Endian
    ExplicitLittleEndian(ExplicitVRLittleEndianDecoder),
    /// Explicit VR Big Endian
    ExplicitBigEndian(ExplicitVRBigEndianDecoder),
    /// Implicit VR, in either byte order
    Implicit(ImplicitVRDecoder<D>),
}

impl HeaderDecoder<StandardDataDictionary> {
    /// Create a header decoder with the standard dictionary.
    pub fn new(endianness: Endianness, explicit_vr: bool) -> Self {
        HeaderDecoder::with_dict(endianness, explicit_vr, StandardDataDictionary)
    }
}

impl<D> HeaderDecoder<D> {
    /// Create a header decoder resolving implicit VRs
    /// with the given dictionary.
    pub fn with_dict(endianness: Endianness, explicit_vr: bool, dict: D) -> Self {
        match (explicit_vr, endianness) {
            (true, Endianness::Little) => {
                HeaderDecoder::ExplicitLittleEndian(ExplicitVRLittleEndianDecoder::default())
            }
            (true, Endianness::Big) => {
                HeaderDecoder::ExplicitBigEndian(ExplicitVRBigEndianDecoder::default())
            }
            (false, endianness) => {
                HeaderDecoder::Implicit(ImplicitVRDecoder::with_dict(endianness, dict))
            }
        }
    }

    /// The byte order of this decoder.
    pub fn endianness(&self) -> Endianness {
        match self {
            HeaderDecoder::ExplicitLittleEndian(_) => Endianness::Little,
            HeaderDecoder::ExplicitBigEndian(_) => Endianness::Big,
            HeaderDecoder::Implicit(d) => d.endianness(),
        }
    }

    /// Whether the decoder reads explicit value representations.
    pub fn is_explicit_vr(&self) -> bool {
        !matches!(self, HeaderDecoder::Implicit(_))
    }
}

macro_rules! for_each_decoder {
    ($s: expr, |$d: ident| $f: expr) => {
        match $s {
            HeaderDecoder::ExplicitLittleEndian($d) => $f,
            HeaderDecoder::ExplicitBigEndian($d) => $f,
            HeaderDecoder::Implicit($d) => $f,
        }
    };
}

impl<D> Decode for HeaderDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_header(source))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_item_header(source))
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        for_each_decoder!(self, |d| d.decode_tag(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::header::{HasLength, Header, Length};
    use dcmcodec_core::VR;

    #[test]
    fn header_decoder_follows_settings() {
        // (0010,0020) LO, 4 bytes
        let explicit: &[u8] = &[0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00];
        let implicit: &[u8] = &[0x10, 0x00, 0x20, 0x00, 0x04, 0x00, 0x00, 0x00];

        let dec = HeaderDecoder::new(Endianness::Little, true);
        assert!(dec.is_explicit_vr());
        let (header, len) = dec.decode_header(&mut &explicit[..]).unwrap();
        assert_eq!(header.tag(), Tag(0x0010, 0x0020));
        assert_eq!(header.vr(), VR::LO);
        assert_eq!(header.length(), Length(4));
        assert_eq!(len, 8);

        let dec = HeaderDecoder::new(Endianness::Little, false);
        assert!(!dec.is_explicit_vr());
        let (header, len) = dec.decode_header(&mut &implicit[..]).unwrap();
        assert_eq!(header.tag(), Tag(0x0010, 0x0020));
        assert_eq!(header.vr(), VR::LO);
        assert_eq!(header.length(), Length(4));
        assert_eq!(len, 8);
    }

    #[test]
    fn clean_eof_is_detected() {
        let dec = HeaderDecoder::new(Endianness::Little, true);
        let err = dec.decode_header(&mut &[][..]).unwrap_err();
        assert!(err.is_clean_eof());

        let err = dec.decode_header(&mut &[0x10, 0x00, 0x20, 0x00, b'L'][..]).unwrap_err();
        assert!(!err.is_clean_eof());
    }
}
