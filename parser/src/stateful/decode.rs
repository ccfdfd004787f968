//! This module provides a stateful decoder of data element headers and values.
//!
//! A [`StatefulDecoder`] binds a byte source to the encoding rules
//! of a transfer syntax, the active character sets,
//! and the diagnostics collected while reading.
//! It knows nothing about the structure of a data set:
//! that is the job of the [`DataSetReader`](crate::dataset::DataSetReader).

use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, NonConformantError, WarningKind};
use dcmcodec_core::header::{DataElementHeader, Header, Length};
use dcmcodec_core::value::C;
use dcmcodec_core::{CodecConfig, PrimitiveValue, Tag};
use dcmcodec_encoding::convert::{self, decode_value, ConvertContext};
use dcmcodec_encoding::stream::{self, ByteStream};
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::{Endianness, TransferSyntax};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Read, Seek, SeekFrom};

/// The tag of _Specific Character Set_.
pub(crate) const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not decode element header at position {:#x}", position))]
    DecodeElementHeader {
        position: u64,
        source: stream::Error,
    },
    #[snafu(display("Could not decode item header at position {:#x}", position))]
    DecodeItemHeader {
        position: u64,
        source: stream::Error,
    },
    #[snafu(display(
        "Could not read value of element {} at position {:#x}",
        tag,
        position
    ))]
    ReadValueData {
        tag: Tag,
        position: u64,
        source: stream::Error,
    },
    #[snafu(display("Could not read {} bytes at position {:#x}", len, position))]
    ReadBytes {
        len: u32,
        position: u64,
        source: stream::Error,
    },
    #[snafu(display("Could not convert value of element {}", tag))]
    ConvertValue { tag: Tag, source: convert::Error },
    #[snafu(display("Element {} has an undefined value length", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },
    #[snafu(display("Could not move the source to position {:#x}", position))]
    SeekReader {
        position: u64,
        source: stream::Error,
    },
    #[snafu(display("Invalid Specific Character Set"))]
    CharacterSet { source: NonConformantError },
    #[snafu(display("Non-conformant data at position {:#x}", position))]
    NonConformant {
        position: u64,
        source: NonConformantError,
    },
}

impl Error {
    /// Whether the source had no more data
    /// right where the next element or item header should start.
    pub fn is_clean_eof(&self) -> bool {
        match self {
            Error::DecodeElementHeader {
                source: stream::Error::DecodeHeader { source, .. },
                ..
            } => source.is_clean_eof(),
            Error::DecodeItemHeader {
                source:
                    stream::Error::UnexpectedEof {
                        read: 0,
                        position: at,
                        ..
                    },
                position,
            } => at == position,
            _ => false,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A stateful abstraction for the full DICOM content reading process.
///
/// The decoder keeps track of the number of bytes read,
/// the active character sets,
/// and every conformance warning found along the way.
#[derive(Debug)]
pub struct StatefulDecoder<S> {
    stream: ByteStream<S>,
    ctx: ConvertContext,
    diagnostics: Diagnostics,
}

impl<S> StatefulDecoder<S> {
    /// Create a decoder for the given transfer syntax,
    /// assuming that the source is at position 0.
    pub fn new(source: S, ts: &TransferSyntax, config: &CodecConfig) -> Self {
        Self::new_at(source, ts, config, 0)
    }

    /// Create a decoder for the given transfer syntax,
    /// with the source already at the given position.
    ///
    /// The position must be the one the source itself reports when seeking,
    /// so that rewinding and deferred reads land on the right bytes.
    pub fn new_at(source: S, ts: &TransferSyntax, config: &CodecConfig, position: u64) -> Self {
        Self::with_encoding(
            source,
            ts.endianness(),
            ts.is_explicit_vr(),
            config,
            position,
        )
    }

    /// Create a decoder for the file meta group,
    /// which is always in _Explicit VR Little Endian_.
    pub fn file_header_decoder(source: S, config: &CodecConfig, position: u64) -> Self {
        Self::with_encoding(source, Endianness::Little, true, config, position)
    }

    fn with_encoding(
        source: S,
        endianness: Endianness,
        explicit_vr: bool,
        config: &CodecConfig,
        position: u64,
    ) -> Self {
        StatefulDecoder {
            stream: ByteStream::new_at(source, endianness, explicit_vr, position),
            ctx: ConvertContext::from_config(endianness, config),
            diagnostics: Diagnostics::new(config.reading_validation),
        }
    }

    /// The number of bytes read so far,
    /// plus the position at which decoding started.
    #[inline]
    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    /// The conversion context used for values.
    pub fn context(&self) -> &ConvertContext {
        &self.ctx
    }

    /// The character sets in effect.
    pub fn charsets(&self) -> &CharacterSets {
        &self.ctx.charsets
    }

    /// Replace the character sets in effect.
    pub fn set_charsets(&mut self, charsets: CharacterSets) {
        self.ctx.charsets = charsets;
    }

    /// Whether element headers are expected to have an explicit VR.
    pub fn is_explicit_vr(&self) -> bool {
        self.stream.explicit_vr()
    }

    /// Switch between explicit and implicit VR headers.
    pub fn set_explicit_vr(&mut self, explicit_vr: bool) {
        self.stream.set_explicit_vr(explicit_vr);
    }

    /// The byte order of the data.
    pub fn endianness(&self) -> Endianness {
        self.stream.endianness()
    }

    /// The conformance warnings collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take the collected conformance warnings,
    /// leaving an empty collector with the same validation mode.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        let mode = self.diagnostics.mode();
        std::mem::replace(&mut self.diagnostics, Diagnostics::new(mode))
    }

    /// Report a conformance warning at the current position.
    pub fn report(&mut self, warning: ConformanceWarning) -> Result<()> {
        let position = self.position();
        self.diagnostics
            .report(warning.at(position))
            .context(NonConformantSnafu { position })
    }

    /// Access the underlying byte stream.
    pub fn stream_mut(&mut self) -> &mut ByteStream<S> {
        &mut self.stream
    }

    /// Unwrap the source.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

impl<S> StatefulDecoder<S>
where
    S: Read,
{
    /// Decode the next data element header.
    pub fn decode_header(&mut self) -> Result<DataElementHeader> {
        let position = self.position();
        self.stream
            .read_header()
            .map(|(header, _)| header)
            .context(DecodeElementHeaderSnafu { position })
    }

    /// Decode the next item header or delimiter.
    ///
    /// Item headers always have a 4-byte length,
    /// whatever the VR mode of the data set.
    /// The tag is returned as is,
    /// so that unexpected tags can be dealt with by the caller.
    pub fn decode_item_header(&mut self) -> Result<(Tag, Length)> {
        let position = self.position();
        let tag = self
            .stream
            .read_tag()
            .context(DecodeItemHeaderSnafu { position })?;
        let len = self
            .stream
            .read_ul()
            .context(DecodeItemHeaderSnafu { position })?;
        Ok((tag, Length(len)))
    }

    /// Eagerly read the raw bytes of the value described by the header.
    pub fn read_value_bytes(&mut self, header: &DataElementHeader) -> Result<Vec<u8>> {
        let len = header.len.get().context(UndefinedValueLengthSnafu { tag: header.tag })?;
        let position = self.position();
        self.stream
            .read(len as usize, true)
            .context(ReadValueDataSnafu {
                tag: header.tag,
                position,
            })
    }

    /// Eagerly read the value described by the header,
    /// converting it according to its value representation.
    ///
    /// Numbers in text form and date/time values are converted
    /// as the codec configuration says.
    /// Reading _Specific Character Set_ updates the character sets
    /// used for the values which follow.
    pub fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let ctx = self.ctx.clone();
        self.read_value_with(header, &ctx)
    }

    /// Eagerly read the value described by the header,
    /// keeping numbers in text form and dates as strings.
    pub fn read_value_preserved(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let mut ctx = self.ctx.clone();
        ctx.datetime_conversion = false;
        ctx.numeric_text_conversion = false;
        self.read_value_with(header, &ctx)
    }

    fn read_value_with(
        &mut self,
        header: &DataElementHeader,
        ctx: &ConvertContext,
    ) -> Result<PrimitiveValue> {
        let bytes = self.read_value_bytes(header)?;
        if bytes.len() % 2 == 1 {
            self.report(
                ConformanceWarning::new(
                    WarningKind::OddLength,
                    format!("Value of element {} has odd length {}", header.tag, bytes.len()),
                )
                .with_tag(header.tag),
            )?;
        }
        let value = decode_value(header.vr, &bytes, ctx, &mut self.diagnostics)
            .context(ConvertValueSnafu { tag: header.tag })?;

        if header.tag() == SPECIFIC_CHARACTER_SET {
            self.update_charsets(&value)?;
        }
        Ok(value)
    }

    /// Interpret a value of _Specific Character Set_
    /// and use it for the text which follows.
    pub fn update_charsets(&mut self, value: &PrimitiveValue) -> Result<()> {
        let terms = value.to_multi_str();
        let charsets = CharacterSets::from_terms(&terms[..], &mut self.diagnostics)
            .context(CharacterSetSnafu)?;
        tracing::debug!("Specific Character Set: {:?}", charsets.as_slice());
        self.ctx.charsets = charsets;
        Ok(())
    }

    /// Read `len` bytes into a vector of 32-bit numbers
    /// in the data set's byte order.
    pub fn read_u32_to_vec(&mut self, len: u32, out: &mut Vec<u32>) -> Result<()> {
        let position = self.position();
        for _ in 0..len / 4 {
            let v = self
                .stream
                .read_ul()
                .context(ReadBytesSnafu { len, position })?;
            out.push(v);
        }
        Ok(())
    }

    /// Read exactly `len` bytes to the end of the vector.
    pub fn read_to_vec(&mut self, len: u32, out: &mut Vec<u8>) -> Result<()> {
        let position = self.position();
        let bytes = self
            .stream
            .read(len as usize, true)
            .context(ReadBytesSnafu { len, position })?;
        out.extend(bytes);
        Ok(())
    }

    /// Read and discard exactly `len` bytes.
    pub fn skip_bytes(&mut self, len: u32) -> Result<()> {
        let position = self.position();
        self.stream
            .skip(u64::from(len))
            .context(ReadBytesSnafu { len, position })
    }
}

impl<S> StatefulDecoder<S>
where
    S: Read + Seek,
{
    /// Move the source to the given absolute position.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.stream
            .seek(SeekFrom::Start(position))
            .context(SeekReaderSnafu { position })?;
        Ok(())
    }

    /// Check whether the next 4 bytes are the given tag,
    /// without consuming them.
    pub fn peek_tag_is(&mut self, tag: Tag) -> Result<bool> {
        let position = self.position();
        self.stream
            .peek_tag_is(tag)
            .context(SeekReaderSnafu { position })
    }

    /// The total length of the source.
    pub fn source_len(&mut self) -> Result<u64> {
        let position = self.position();
        let end = self
            .stream
            .seek(SeekFrom::End(0))
            .context(SeekReaderSnafu { position })?;
        self.seek(position)?;
        Ok(end)
    }
}

/// Turn a private creator value into the creator string.
pub(crate) fn creator_of(value: &PrimitiveValue) -> Option<String> {
    let text = match value {
        PrimitiveValue::U8(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        other => other.to_str().into_owned(),
    };
    let text = text.trim_matches(|c: char| c == ' ' || c == '\0');
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Read the 32-bit numbers of a basic offset table from raw bytes.
pub(crate) fn offsets_from_bytes(bytes: &[u8], endianness: Endianness) -> C<u32> {
    bytes
        .chunks_exact(4)
        .map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            match endianness {
                Endianness::Little => u32::from_le_bytes(b),
                Endianness::Big => u32::from_be_bytes(b),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::VR;
    use dcmcodec_encoding::transfer_syntax::Codec;
    use std::io::Cursor;

    static EXPLICIT_LE: TransferSyntax = TransferSyntax::new(
        "1.2.840.10008.1.2.1",
        "Explicit VR Little Endian",
        Endianness::Little,
        true,
        Codec::None,
    );

    static IMPLICIT_LE: TransferSyntax = TransferSyntax::new(
        "1.2.840.10008.1.2",
        "Implicit VR Little Endian",
        Endianness::Little,
        false,
        Codec::None,
    );

    #[rustfmt::skip]
    static RAW: &[u8] = &[
        0x08, 0x00, 0x05, 0x00, b'C', b'S', 0x0A, 0x00, // (0008,0005) CS, len 10
            b'I', b'S', b'O', b'_', b'I', b'R', b' ', b'1', b'0', b'0',
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x04, 0x00, // (0010,0010) PN, len 4
            b'S', 0xE9, b'b', b' ',
        0x20, 0x00, 0x13, 0x00, b'I', b'S', 0x02, 0x00, // (0020,0013) IS, len 2
            b'1', b'2',
    ];

    #[test]
    fn decode_explicit_elements_with_charset() {
        let mut decoder =
            StatefulDecoder::new(Cursor::new(RAW), &EXPLICIT_LE, &CodecConfig::default());

        let header = decoder.decode_header().unwrap();
        assert_eq!(header, DataElementHeader::new(Tag(0x0008, 0x0005), VR::CS, Length(10)));
        decoder.read_value(&header).unwrap();

        let header = decoder.decode_header().unwrap();
        let value = decoder.read_value(&header).unwrap();
        assert_eq!(value, PrimitiveValue::Strs(C::from_elem("Séb".to_string(), 1)));

        let header = decoder.decode_header().unwrap();
        let value = decoder.read_value(&header).unwrap();
        assert_eq!(value, PrimitiveValue::I64(C::from_slice(&[12])));
        assert_eq!(decoder.position(), RAW.len() as u64);

        let err = decoder.decode_header().unwrap_err();
        assert!(err.is_clean_eof());
    }

    #[test]
    fn preserved_values_keep_text() {
        let mut decoder =
            StatefulDecoder::new(Cursor::new(&RAW[30..]), &EXPLICIT_LE, &CodecConfig::default());
        let header = decoder.decode_header().unwrap();
        let value = decoder.read_value_preserved(&header).unwrap();
        assert_eq!(value, PrimitiveValue::Strs(C::from_elem("12".to_string(), 1)));
    }

    #[test]
    fn odd_length_is_reported() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0x10, 0x00, 0x20, 0x00, 0x03, 0x00, 0x00, 0x00, // (0010,0020) implicit, len 3
                b'A', b'B', b'C',
        ];
        let mut decoder =
            StatefulDecoder::new(Cursor::new(raw), &IMPLICIT_LE, &CodecConfig::default());
        let header = decoder.decode_header().unwrap();
        assert_eq!(header.vr, VR::LO);
        let value = decoder.read_value(&header).unwrap();
        assert_eq!(value.to_str(), "ABC");
        assert_eq!(decoder.diagnostics().len(), 1);
        assert_eq!(decoder.diagnostics().warnings()[0].kind, WarningKind::OddLength);
    }

    #[test]
    fn truncated_value_is_an_error() {
        let raw: &[u8] = &[0x10, 0x00, 0x20, 0x00, 0x08, 0x00, 0x00, 0x00, b'A', b'B'];
        let mut decoder =
            StatefulDecoder::new(Cursor::new(raw), &IMPLICIT_LE, &CodecConfig::default());
        let header = decoder.decode_header().unwrap();
        let err = decoder.read_value(&header).unwrap_err();
        assert!(matches!(err, Error::ReadValueData { position: 8, .. }));
        assert!(!err.is_clean_eof());
    }

    #[test]
    fn item_headers_keep_unexpected_tags() {
        let raw: &[u8] = &[0xFE, 0xFF, 0x0D, 0xE0, 0x04, 0x00, 0x00, 0x00];
        let mut decoder =
            StatefulDecoder::new(Cursor::new(raw), &EXPLICIT_LE, &CodecConfig::default());
        let (tag, len) = decoder.decode_item_header().unwrap();
        assert_eq!(tag, Tag::ITEM_DELIMITER);
        assert_eq!(len.get(), Some(4));
    }
}
