//! Module holding a stateful DICOM data encoding abstraction.
//!
//! The [`StatefulEncoder`] writes element headers and values
//! in the encoding of a transfer syntax,
//! applying the necessary padding to conform to DICOM encoding rules
//! and keeping track of how many bytes were written.

use crate::stateful::decode::SPECIFIC_CHARACTER_SET;
use dcmcodec_core::diagnostic::{Diagnostics, NonConformantError};
use dcmcodec_core::header::{DataElementHeader, Length};
use dcmcodec_core::{CodecConfig, PrimitiveValue, Tag, VR};
use dcmcodec_encoding::convert::{self, encode_value, ConvertContext};
use dcmcodec_encoding::encode::{self as enc, Encode};
use dcmcodec_encoding::stream::{self, ByteStream};
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::{Endianness, TransferSyntax};
use snafu::{ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not encode header of element {} at position {:#x}", tag, position))]
    EncodeHeader {
        tag: Tag,
        position: u64,
        source: enc::Error,
    },
    #[snafu(display("Could not encode item delimitation at position {:#x}", position))]
    EncodeDelimiter { position: u64, source: enc::Error },
    #[snafu(display("Could not encode value of element {}", tag))]
    EncodeValue { tag: Tag, source: convert::Error },
    #[snafu(display("Could not write value data at position {:#x}", position))]
    WriteValueData {
        position: u64,
        source: stream::Error,
    },
    #[snafu(display("Invalid Specific Character Set"))]
    CharacterSet { source: NonConformantError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Also called a printer, this encoder type provides a stateful mid-level
/// abstraction for writing DICOM content.
/// Unlike [`Encode`], the stateful encoder knows how to write values
/// with the active character sets,
/// and collects the conformance warnings raised while doing so.
#[derive(Debug)]
pub struct StatefulEncoder<W> {
    stream: ByteStream<W>,
    ctx: ConvertContext,
    diagnostics: Diagnostics,
}

impl<W> StatefulEncoder<W> {
    /// Create an encoder for the given transfer syntax.
    pub fn new(to: W, ts: &TransferSyntax, config: &CodecConfig) -> Self {
        Self::with_encoding(to, ts.endianness(), ts.is_explicit_vr(), config)
    }

    /// Create an encoder for the file meta group,
    /// which is always in _Explicit VR Little Endian_.
    pub fn file_header_encoder(to: W, config: &CodecConfig) -> Self {
        Self::with_encoding(to, Endianness::Little, true, config)
    }

    fn with_encoding(to: W, endianness: Endianness, explicit_vr: bool, config: &CodecConfig) -> Self {
        StatefulEncoder {
            stream: ByteStream::new(to, endianness, explicit_vr),
            ctx: ConvertContext::from_config(endianness, config),
            diagnostics: Diagnostics::new(config.writing_validation),
        }
    }

    /// The number of bytes written so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    /// The character sets used for text values.
    pub fn charsets(&self) -> &CharacterSets {
        &self.ctx.charsets
    }

    /// Replace the character sets used for text values.
    pub fn set_charsets(&mut self, charsets: CharacterSets) {
        self.ctx.charsets = charsets;
    }

    /// The conformance warnings collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take the collected conformance warnings.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        let mode = self.diagnostics.mode();
        std::mem::replace(&mut self.diagnostics, Diagnostics::new(mode))
    }

    /// Unwrap the destination.
    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }
}

impl<W> StatefulEncoder<W>
where
    W: Write,
{
    /// Encode and write a data element header.
    pub fn encode_element_header(&mut self, header: DataElementHeader) -> Result<usize> {
        let position = self.position();
        let encoder = *self.stream.header_encoder();
        encoder
            .encode_element_header(&mut self.stream, header)
            .context(EncodeHeaderSnafu {
                tag: header.tag,
                position,
            })
    }

    /// Encode and write an item header.
    pub fn encode_item_header(&mut self, len: u32) -> Result<()> {
        let position = self.position();
        let encoder = *self.stream.header_encoder();
        encoder
            .encode_item_header(&mut self.stream, len)
            .context(EncodeHeaderSnafu {
                tag: Tag::ITEM,
                position,
            })
    }

    /// Encode and write an item delimiter.
    pub fn encode_item_delimiter(&mut self) -> Result<()> {
        let position = self.position();
        let encoder = *self.stream.header_encoder();
        encoder
            .encode_item_delimiter(&mut self.stream)
            .context(EncodeDelimiterSnafu { position })
    }

    /// Encode and write a sequence delimiter.
    pub fn encode_sequence_delimiter(&mut self) -> Result<()> {
        let position = self.position();
        let encoder = *self.stream.header_encoder();
        encoder
            .encode_sequence_delimiter(&mut self.stream)
            .context(EncodeDelimiterSnafu { position })
    }

    /// Encode and write the basic offset table item of a pixel sequence.
    pub fn encode_offset_table(&mut self, offset_table: &[u32]) -> Result<usize> {
        let position = self.position();
        let encoder = *self.stream.header_encoder();
        encoder
            .encode_offset_table(&mut self.stream, offset_table)
            .context(EncodeHeaderSnafu {
                tag: Tag::ITEM,
                position,
            })
    }

    /// Encode a primitive value into its padded raw bytes,
    /// without writing anything.
    ///
    /// The value is validated first.
    /// Violations are reported to the collected diagnostics,
    /// failing in strict validation mode.
    pub fn encode_value(&mut self, tag: Tag, vr: VR, value: &PrimitiveValue) -> Result<Vec<u8>> {
        encode_value(vr, value, &self.ctx, &mut self.diagnostics).context(EncodeValueSnafu { tag })
    }

    /// Encode and write a whole primitive data element.
    /// The length in the given header is replaced
    /// by the length of the encoded value.
    ///
    /// Writing _Specific Character Set_ switches the character sets
    /// used for the text values which follow.
    pub fn encode_primitive_element(
        &mut self,
        header: &DataElementHeader,
        value: &PrimitiveValue,
    ) -> Result<()> {
        let bytes = self.encode_value(header.tag, header.vr, value)?;
        let header = DataElementHeader::new(header.tag, header.vr, Length(bytes.len() as u32));
        self.encode_element_header(header)?;
        self.write_bytes(&bytes)?;

        if header.tag == SPECIFIC_CHARACTER_SET {
            let terms = value.to_multi_str();
            self.ctx.charsets = CharacterSets::from_terms(&terms[..], &mut self.diagnostics)
                .context(CharacterSetSnafu)?;
        }
        Ok(())
    }

    /// Write raw bytes, as they are.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let position = self.position();
        self.stream
            .write_bytes(bytes)
            .context(WriteValueDataSnafu { position })
    }

    /// Flush the destination.
    pub fn flush(&mut self) -> Result<()> {
        let position = self.position();
        self.stream.flush().context(WriteValueDataSnafu { position })
    }
}
