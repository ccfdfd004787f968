//! Module for the data set writer.
//!
//! The [`DataSetWriter`] turns a stream of [`DataToken`]s back into bytes.
//! Sequences and items are closed with delimiters
//! only when their length is undefined.
use crate::dataset::{DataToken, SeqTokenType};
use crate::stateful::encode::{self, StatefulEncoder};
use dcmcodec_core::diagnostic::Diagnostics;
use dcmcodec_core::header::{is_pixel_data_tag, DataElementHeader, Length};
use dcmcodec_core::{CodecConfig, PrimitiveValue, Tag, VR};
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::TransferSyntax;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not write {}", token))]
    WriteToken {
        token: String,
        source: encode::Error,
    },
    #[snafu(display("Unexpected token {}", token))]
    UnexpectedToken { token: String, backtrace: Backtrace },
    #[snafu(display("Value of element {} was never read from its source", tag))]
    DeferredValue { tag: Tag, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A token representing a sequence or item start.
#[derive(Debug)]
struct SeqToken {
    /// Whether it is the start of a sequence or the start of an item.
    typ: SeqTokenType,
    /// The length of the value, as indicated by the starting element,
    /// can be unknown.
    len: Length,
    /// Whether this is a pixel sequence, and if so,
    /// whether its offset table was written.
    pixel_data: Option<bool>,
    /// The character sets of the enclosing data set.
    saved_charsets: Option<CharacterSets>,
}

/// A stateful device for printing a DICOM data set in sequential order.
/// This is analogous to the [`DataSetReader`](super::DataSetReader)
/// type for converting data set tokens to bytes.
#[derive(Debug)]
pub struct DataSetWriter<W> {
    printer: StatefulEncoder<W>,
    seq_tokens: Vec<SeqToken>,
    last_header: Option<DataElementHeader>,
}

impl<W> DataSetWriter<W> {
    /// Create a writer for the given transfer syntax.
    pub fn with_ts(to: W, ts: &TransferSyntax, config: &CodecConfig) -> Self {
        DataSetWriter::new(StatefulEncoder::new(to, ts, config))
    }

    /// Create a writer on top of the given encoder.
    pub fn new(printer: StatefulEncoder<W>) -> Self {
        DataSetWriter {
            printer,
            seq_tokens: Vec::new(),
            last_header: None,
        }
    }

    /// The number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.printer.position()
    }

    /// Take the conformance warnings raised while writing.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.printer.take_diagnostics()
    }

    /// Unwrap the destination.
    pub fn into_inner(self) -> W {
        self.printer.into_inner()
    }
}

impl<W> DataSetWriter<W>
where
    W: Write,
{
    /// Feed the given sequence of tokens which are part of the same data set.
    pub fn write_sequence<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = DataToken>,
    {
        for token in tokens {
            self.write(token)?;
        }
        Ok(())
    }

    /// Feed the given data set token for writing the data set.
    pub fn write(&mut self, token: DataToken) -> Result<()> {
        // adjust the logic of sequence printing:
        // explicit length sequences or items should not print
        // the respective delimiter
        match token {
            DataToken::ElementHeader(header) => {
                if let Some(previous) = self.last_header.replace(header) {
                    return UnexpectedTokenSnafu {
                        token: format!("{:?} without a value", previous),
                    }
                    .fail();
                }
                Ok(())
            }
            DataToken::PrimitiveValue(value) => {
                let header = self.last_header.take().ok_or_else(|| {
                    UnexpectedTokenSnafu {
                        token: "PrimitiveValue without a header",
                    }
                    .build()
                })?;
                self.write_primitive(&header, &value)
            }
            DataToken::DeferredValue { header, .. } => DeferredValueSnafu { tag: header.tag }.fail(),
            DataToken::SequenceStart { tag, len } => {
                self.seq_tokens.push(SeqToken {
                    typ: SeqTokenType::Sequence,
                    len,
                    pixel_data: None,
                    saved_charsets: None,
                });
                self.write_header(DataElementHeader::new(tag, VR::SQ, len))
            }
            DataToken::PixelSequenceStart { tag } => {
                self.seq_tokens.push(SeqToken {
                    typ: SeqTokenType::Sequence,
                    len: Length::UNDEFINED,
                    pixel_data: Some(false),
                    saved_charsets: None,
                });
                self.write_header(DataElementHeader::new(tag, VR::OB, Length::UNDEFINED))
            }
            DataToken::ItemStart { len } => {
                self.seq_tokens.push(SeqToken {
                    typ: SeqTokenType::Item,
                    len,
                    pixel_data: None,
                    saved_charsets: Some(self.printer.charsets().clone()),
                });
                self.printer
                    .encode_item_header(len.0)
                    .context(WriteTokenSnafu { token: "ItemStart" })
            }
            DataToken::ItemEnd => {
                let token = self.seq_tokens.pop();
                match token {
                    Some(SeqToken {
                        typ: SeqTokenType::Item,
                        len,
                        saved_charsets,
                        ..
                    }) => {
                        if let Some(charsets) = saved_charsets {
                            self.printer.set_charsets(charsets);
                        }
                        if len.is_undefined() {
                            self.printer
                                .encode_item_delimiter()
                                .context(WriteTokenSnafu { token: "ItemEnd" })?;
                        }
                        Ok(())
                    }
                    _ => UnexpectedTokenSnafu {
                        token: "ItemEnd outside of an item",
                    }
                    .fail(),
                }
            }
            DataToken::SequenceEnd => {
                let token = self.seq_tokens.pop();
                match token {
                    Some(SeqToken {
                        typ: SeqTokenType::Sequence,
                        len,
                        pixel_data,
                        ..
                    }) => {
                        if pixel_data == Some(false) {
                            self.printer
                                .encode_offset_table(&[])
                                .context(WriteTokenSnafu { token: "SequenceEnd" })?;
                        }
                        if len.is_undefined() {
                            self.printer
                                .encode_sequence_delimiter()
                                .context(WriteTokenSnafu { token: "SequenceEnd" })?;
                        }
                        Ok(())
                    }
                    _ => UnexpectedTokenSnafu {
                        token: "SequenceEnd outside of a sequence",
                    }
                    .fail(),
                }
            }
            DataToken::OffsetTable(table) => {
                self.expect_pixel_sequence("OffsetTable")?;
                if let Some(SeqToken { pixel_data, .. }) = self.seq_tokens.last_mut() {
                    if *pixel_data == Some(true) {
                        return UnexpectedTokenSnafu {
                            token: "second OffsetTable",
                        }
                        .fail();
                    }
                    *pixel_data = Some(true);
                }
                self.printer
                    .encode_offset_table(&table)
                    .context(WriteTokenSnafu {
                        token: "OffsetTable",
                    })?;
                Ok(())
            }
            DataToken::ItemValue(data) => {
                self.expect_pixel_sequence("ItemValue")?;
                if let Some(SeqToken { pixel_data, .. }) = self.seq_tokens.last_mut() {
                    if *pixel_data == Some(false) {
                        *pixel_data = Some(true);
                        self.printer
                            .encode_offset_table(&[])
                            .context(WriteTokenSnafu { token: "ItemValue" })?;
                    }
                }
                self.write_fragment(&data)
            }
        }
    }

    fn expect_pixel_sequence(&self, token: &'static str) -> Result<()> {
        match self.seq_tokens.last() {
            Some(SeqToken {
                pixel_data: Some(_),
                ..
            }) => Ok(()),
            _ => UnexpectedTokenSnafu {
                token: format!("{} outside of a pixel sequence", token),
            }
            .fail(),
        }
    }

    fn write_header(&mut self, header: DataElementHeader) -> Result<()> {
        self.printer
            .encode_element_header(header)
            .context(WriteTokenSnafu {
                token: format!("{:?}", header),
            })?;
        Ok(())
    }

    fn write_primitive(&mut self, header: &DataElementHeader, value: &PrimitiveValue) -> Result<()> {
        if header.len.is_undefined() && is_pixel_data_tag(header.tag) {
            // encapsulated pixel data which could only be kept as raw bytes
            self.write_header(*header)?;
            let mut bytes = value.to_bytes().into_owned();
            if bytes.len() % 2 == 1 {
                bytes.push(0);
            }
            self.printer
                .write_bytes(&bytes)
                .context(WriteTokenSnafu {
                    token: "PrimitiveValue",
                })?;
            return self
                .printer
                .encode_sequence_delimiter()
                .context(WriteTokenSnafu {
                    token: "PrimitiveValue",
                });
        }
        self.printer
            .encode_primitive_element(header, value)
            .context(WriteTokenSnafu {
                token: format!("value of {}", header.tag),
            })
    }

    fn write_fragment(&mut self, data: &[u8]) -> Result<()> {
        let padded_len = (data.len() + 1) & !1;
        self.printer
            .encode_item_header(padded_len as u32)
            .context(WriteTokenSnafu { token: "ItemValue" })?;
        self.printer
            .write_bytes(data)
            .context(WriteTokenSnafu { token: "ItemValue" })?;
        if padded_len > data.len() {
            self.printer
                .write_bytes(&[0])
                .context(WriteTokenSnafu { token: "ItemValue" })?;
        }
        Ok(())
    }

    /// Flush the inner writer.
    pub fn flush(&mut self) -> Result<()> {
        self.printer
            .flush()
            .context(WriteTokenSnafu { token: "flush" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataSetReader;
    use dcmcodec_core::value::C;
    use dcmcodec_encoding::transfer_syntax::Codec;
    use dcmcodec_encoding::Endianness;
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

    fn validate_dataset_writer<I>(tokens: I, ts: &TransferSyntax, ground_truth: &[u8])
    where
        I: IntoIterator<Item = DataToken>,
    {
        let mut writer = DataSetWriter::with_ts(Vec::new(), ts, &CodecConfig::default());
        writer.write_sequence(tokens).expect("should write without an error");
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), ground_truth);
    }

    #[test]
    fn write_sequence_explicit() {
        let tokens = vec![
            DataToken::SequenceStart {
                tag: Tag(0x0018, 0x6011),
                len: Length(18),
            },
            DataToken::ItemStart { len: Length(10) },
            DataToken::ElementHeader(DataElementHeader::new(
                Tag(0x0018, 0x6012),
                VR::US,
                Length(2),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::U16(C::from_slice(&[1]))),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::SequenceStart {
                tag: Tag(0x0040, 0x0275),
                len: Length::UNDEFINED,
            },
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
        ];

        #[rustfmt::skip]
        static GROUND_TRUTH: &[u8] = &[
            0x18, 0x00, 0x11, 0x60, b'S', b'Q', 0x00, 0x00, 0x12, 0x00, 0x00, 0x00,
                0xFE, 0xFF, 0x00, 0xE0, 0x0A, 0x00, 0x00, 0x00,
                    0x18, 0x00, 0x12, 0x60, b'U', b'S', 0x02, 0x00, 0x01, 0x00,
            0x40, 0x00, 0x75, 0x02, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];

        validate_dataset_writer(tokens, &EXPLICIT_LE, GROUND_TRUTH);
    }

    #[test]
    fn write_element_with_actual_length() {
        let tokens = vec![
            DataToken::ElementHeader(DataElementHeader::new(
                Tag(0x0010, 0x0020),
                VR::LO,
                Length::UNDEFINED,
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("ABC")),
        ];

        #[rustfmt::skip]
        static GROUND_TRUTH: &[u8] = &[
            0x10, 0x00, 0x20, 0x00, 0x04, 0x00, 0x00, 0x00, b'A', b'B', b'C', b' ',
        ];

        validate_dataset_writer(tokens, &IMPLICIT_LE, GROUND_TRUTH);
    }

    #[test]
    fn write_explicit_element_with_actual_length() {
        let tokens = vec![
            DataToken::ElementHeader(DataElementHeader::new(
                Tag(0x0010, 0x0020),
                VR::LO,
                Length::UNDEFINED,
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("ABC")),
            DataToken::ElementHeader(DataElementHeader::new(
                Tag(0x0010, 0x0030),
                VR::DA,
                Length::UNDEFINED,
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("20240101")),
        ];

        #[rustfmt::skip]
        static GROUND_TRUTH: &[u8] = &[
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'A', b'B', b'C', b' ',
            0x10, 0x00, 0x30, 0x00, b'D', b'A', 0x08, 0x00,
            b'2', b'0', b'2', b'4', b'0', b'1', b'0', b'1',
        ];

        validate_dataset_writer(tokens, &EXPLICIT_LE, GROUND_TRUTH);
    }

    #[test]
    fn write_pixel_sequence_without_offset_table() {
        let tokens = vec![
            DataToken::PixelSequenceStart {
                tag: Tag(0x7FE0, 0x0010),
            },
            DataToken::ItemValue(vec![1, 2, 3]),
            DataToken::SequenceEnd,
        ];

        #[rustfmt::skip]
        static GROUND_TRUTH: &[u8] = &[
            0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFE, 0xFF, 0x00, 0xE0, 0x00, 0x00, 0x00, 0x00,
                0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x00,
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];

        validate_dataset_writer(tokens, &EXPLICIT_LE, GROUND_TRUTH);
    }

    #[test]
    fn deferred_values_cannot_be_written() {
        let header = DataElementHeader::new(Tag(0x0010, 0x0020), VR::LO, Length(4));
        let mut writer = DataSetWriter::with_ts(Vec::new(), &EXPLICIT_LE, &CodecConfig::default());
        writer.write(DataToken::ElementHeader(header)).unwrap();
        let err = writer
            .write(DataToken::DeferredValue { header, offset: 8 })
            .unwrap_err();
        assert!(matches!(err, Error::DeferredValue { .. }));
    }

    #[test]
    fn unbalanced_tokens_are_rejected() {
        let mut writer = DataSetWriter::with_ts(Vec::new(), &EXPLICIT_LE, &CodecConfig::default());
        assert!(matches!(
            writer.write(DataToken::ItemEnd),
            Err(Error::UnexpectedToken { .. })
        ));
        assert!(matches!(
            writer.write(DataToken::ItemValue(vec![0, 0])),
            Err(Error::UnexpectedToken { .. })
        ));
    }

    #[rustfmt::skip]
    static MIXED: &[u8] = &[
        0x08, 0x00, 0x15, 0x11, b'S', b'Q', 0x00, 0x00, 0x12, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x0A, 0x00, 0x00, 0x00,
                0x20, 0x00, 0x13, 0x00, b'I', b'S', 0x02, 0x00, b'4', b' ',
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x04, 0x00, b'D', b'o', b'e', b' ',
        0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, 0x05, 0x06,
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn read_then_write_gives_the_same_bytes() {
        let reader =
            DataSetReader::new_with_ts(Cursor::new(MIXED), &EXPLICIT_LE, &CodecConfig::default());
        let tokens = reader.collect::<std::result::Result<Vec<_>, _>>().unwrap();
        validate_dataset_writer(tokens, &EXPLICIT_LE, MIXED);
    }
}
