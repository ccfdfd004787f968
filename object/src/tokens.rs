//! Conversion of in-memory DICOM objects into data set tokens.
//!
//! Sequences and items are given explicit lengths by default,
//! which requires measuring the encoded size of every item
//! in the target transfer syntax.
use crate::mem::{charsets_of, InMemDicomObject, InMemElement};
use crate::{AccessError, WriteOptions};
use dcmcodec_core::header::Length;
use dcmcodec_core::{DataDictionary, DicomValue, ValidationMode};
use dcmcodec_dictionary_std::tags;
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::TransferSyntax;
use dcmcodec_parser::dataset::{DataSetWriter, DataToken};
use dcmcodec_parser::StatefulEncoder;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not access a data element
    #[snafu(display("Could not access a data element"))]
    Access {
        #[snafu(backtrace)]
        source: AccessError,
    },
    /// Could not measure the encoded length of an item
    #[snafu(display("Could not measure the encoded length of an item"))]
    MeasureItem {
        source: dcmcodec_parser::dataset::write::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Turns an in-memory object into the tokens
/// for writing it in a specific transfer syntax.
#[derive(Debug, Clone, Copy)]
pub struct ObjectTokens<'t> {
    ts: &'t TransferSyntax,
    options: WriteOptions,
}

impl<'t> ObjectTokens<'t> {
    pub fn new(ts: &'t TransferSyntax, options: WriteOptions) -> Self {
        ObjectTokens { ts, options }
    }

    /// Produce the full token stream of the given data set.
    pub fn tokens<D>(&self, obj: &InMemDicomObject<D>) -> Result<Vec<DataToken>>
    where
        D: DataDictionary + Clone,
    {
        let mut out = Vec::new();
        self.object_tokens(obj, CharacterSets::default(), &mut out)?;
        Ok(out)
    }

    fn object_tokens<D>(
        &self,
        obj: &InMemDicomObject<D>,
        mut charsets: CharacterSets,
        out: &mut Vec<DataToken>,
    ) -> Result<()>
    where
        D: DataDictionary + Clone,
    {
        for elem in obj.iter() {
            let elem = elem.context(AccessSnafu)?;
            if elem.header().tag == tags::SPECIFIC_CHARACTER_SET {
                charsets = charsets_of(elem.primitive());
            }
            self.element_tokens(elem, &charsets, out)?;
        }
        Ok(())
    }

    fn element_tokens<D>(
        &self,
        elem: &InMemElement<D>,
        charsets: &CharacterSets,
        out: &mut Vec<DataToken>,
    ) -> Result<()>
    where
        D: DataDictionary + Clone,
    {
        let tag = elem.header().tag;
        match elem.value() {
            DicomValue::Primitive(value) => {
                out.push(DataToken::ElementHeader(*elem.header()));
                out.push(DataToken::PrimitiveValue(value.clone()));
            }
            DicomValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.items().len());
                for item in seq.items() {
                    let mut tokens = Vec::new();
                    self.object_tokens(item, charsets.clone(), &mut tokens)?;
                    let len = if self.options.undefined_length_sequences {
                        Length::UNDEFINED
                    } else {
                        Length(self.measure(&tokens, charsets)?)
                    };
                    items.push((len, tokens));
                }

                let len = if self.options.undefined_length_sequences {
                    Length::UNDEFINED
                } else {
                    Length(items.iter().map(|(len, _)| 8 + len.0).sum())
                };
                out.push(DataToken::SequenceStart { tag, len });
                for (len, tokens) in items {
                    out.push(DataToken::ItemStart { len });
                    out.extend(tokens);
                    out.push(DataToken::ItemEnd);
                }
                out.push(DataToken::SequenceEnd);
            }
            DicomValue::PixelSequence(seq) => {
                out.push(DataToken::PixelSequenceStart { tag });
                out.push(DataToken::OffsetTable(seq.offset_table().into()));
                out.extend(seq.fragments().iter().cloned().map(DataToken::ItemValue));
                out.push(DataToken::SequenceEnd);
            }
        }
        Ok(())
    }

    /// The number of bytes taken by the given item contents.
    fn measure(&self, tokens: &[DataToken], charsets: &CharacterSets) -> Result<u32> {
        let config = self
            .options
            .config
            .writing_validation(ValidationMode::Ignore);
        let mut encoder = StatefulEncoder::new(std::io::sink(), self.ts, &config);
        encoder.set_charsets(charsets.clone());
        let mut writer = DataSetWriter::new(encoder);
        writer
            .write_sequence(tokens.iter().cloned())
            .context(MeasureItemSnafu)?;
        Ok(writer.position() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemDicomObject;
    use dcmcodec_core::value::{DataSetSequence, PixelFragmentSequence};
    use dcmcodec_core::{DataElement, DataElementHeader, PrimitiveValue, VR};
    use dcmcodec_transfer_syntax_registry::entries::{
        EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN,
    };

    fn nested_object() -> InMemDicomObject {
        let item = InMemDicomObject::from_element_iter([DataElement::new(
            tags::REFERENCED_SOP_CLASS_UID,
            VR::UI,
            "1.2",
        )]);
        InMemDicomObject::from_element_iter([
            DataElement::new(
                tags::REFERENCED_IMAGE_SEQUENCE,
                VR::SQ,
                DataSetSequence::new(vec![item], Length::UNDEFINED),
            ),
            DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"),
        ])
    }

    fn nested_tokens(seq_len: Length, item_len: Length) -> Vec<DataToken> {
        vec![
            DataToken::SequenceStart {
                tag: tags::REFERENCED_IMAGE_SEQUENCE,
                len: seq_len,
            },
            DataToken::ItemStart { len: item_len },
            DataToken::ElementHeader(DataElementHeader::new(
                tags::REFERENCED_SOP_CLASS_UID,
                VR::UI,
                Length(4),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("1.2")),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::ElementHeader(DataElementHeader::new(
                tags::PATIENT_NAME,
                VR::PN,
                Length(8),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("Doe^John")),
        ]
    }

    #[test]
    fn flat_object_into_tokens() {
        let obj = InMemDicomObject::from_element_iter([
            DataElement::new(tags::MODALITY, VR::CS, "OT"),
            DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"),
        ]);

        let tokens = ObjectTokens::new(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::default())
            .tokens(&obj)
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                DataToken::ElementHeader(DataElementHeader::new(tags::MODALITY, VR::CS, Length(2))),
                DataToken::PrimitiveValue(PrimitiveValue::from("OT")),
                DataToken::ElementHeader(DataElementHeader::new(
                    tags::PATIENT_NAME,
                    VR::PN,
                    Length(8),
                )),
                DataToken::PrimitiveValue(PrimitiveValue::from("Doe^John")),
            ]
        );
    }

    #[test]
    fn nested_object_into_tokens_with_lengths() {
        let obj = nested_object();
        // one element of 8 + 4 bytes in the item,
        // the sequence adds the item header
        for ts in [&EXPLICIT_VR_LITTLE_ENDIAN, &IMPLICIT_VR_LITTLE_ENDIAN] {
            let tokens = ObjectTokens::new(ts, WriteOptions::default())
                .tokens(&obj)
                .unwrap();
            assert_eq!(tokens, nested_tokens(Length(20), Length(12)));
        }
    }

    #[test]
    fn nested_object_into_tokens_undefined_length() {
        let obj = nested_object();
        let options = WriteOptions::new().undefined_length_sequences(true);
        let tokens = ObjectTokens::new(&EXPLICIT_VR_LITTLE_ENDIAN, options)
            .tokens(&obj)
            .unwrap();
        assert_eq!(
            tokens,
            nested_tokens(Length::UNDEFINED, Length::UNDEFINED)
        );
    }

    #[test]
    fn empty_sequence_into_tokens() {
        let obj = InMemDicomObject::from_element_iter([DataElement::new(
            tags::REFERENCED_IMAGE_SEQUENCE,
            VR::SQ,
            DataSetSequence::<InMemDicomObject>::empty(),
        )]);
        let tokens = ObjectTokens::new(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::default())
            .tokens(&obj)
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                DataToken::SequenceStart {
                    tag: tags::REFERENCED_IMAGE_SEQUENCE,
                    len: Length(0),
                },
                DataToken::SequenceEnd,
            ]
        );
    }

    #[test]
    fn encapsulated_pixel_data_into_tokens() {
        let obj = InMemDicomObject::from_element_iter([DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PixelFragmentSequence::new(vec![0_u32], vec![vec![0x99_u8; 32], vec![0x42; 16]]),
        )]);

        let tokens = ObjectTokens::new(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::default())
            .tokens(&obj)
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                DataToken::PixelSequenceStart {
                    tag: tags::PIXEL_DATA,
                },
                DataToken::OffsetTable(vec![0].into()),
                DataToken::ItemValue(vec![0x99; 32]),
                DataToken::ItemValue(vec![0x42; 16]),
                DataToken::SequenceEnd,
            ]
        );
    }
}
