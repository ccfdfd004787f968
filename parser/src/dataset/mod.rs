//! Interpretation of DICOM data sets as streams of tokens.
use dcmcodec_core::header::{DataElementHeader, Length};
use dcmcodec_core::value::C;
use dcmcodec_core::{PrimitiveValue, Tag};
use std::fmt;

pub mod read;
pub mod scan;
pub mod write;

pub use self::read::{DataSetReader, DataSetReaderOptions, ValueReadStrategy};
pub use self::write::DataSetWriter;

/// A token of a DICOM data set stream. This is part of the interpretation of a
/// data set as a stream of symbols, which may either represent data headers or
/// actual value data.
#[derive(Debug, Clone)]
pub enum DataToken {
    /// A data header of a primitive value.
    ElementHeader(DataElementHeader),
    /// The beginning of a sequence element.
    SequenceStart { tag: Tag, len: Length },
    /// The beginning of an encapsulated pixel data element.
    PixelSequenceStart { tag: Tag },
    /// The ending delimiter of a sequence or pixel sequence.
    SequenceEnd,
    /// The beginning of a new item in the sequence.
    ItemStart { len: Length },
    /// The ending delimiter of an item.
    ItemEnd,
    /// A primitive data element value.
    PrimitiveValue(PrimitiveValue),
    /// A primitive value which was left in the source.
    /// It spans `header.len` bytes, starting at `offset`.
    DeferredValue {
        header: DataElementHeader,
        offset: u64,
    },
    /// The basic offset table of a pixel sequence.
    OffsetTable(C<u32>),
    /// A compressed fragment of a pixel sequence.
    ItemValue(Vec<u8>),
}

impl fmt::Display for DataToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataToken::PrimitiveValue(v) => {
                write!(f, "PrimitiveValue({} values)", v.multiplicity())
            }
            DataToken::ItemValue(data) => write!(f, "ItemValue({} bytes)", data.len()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// This implementation treats undefined lengths as equal.
impl PartialEq<Self> for DataToken {
    fn eq(&self, other: &Self) -> bool {
        use DataToken::*;
        match (self, other) {
            (ElementHeader(h1), ElementHeader(h2)) => {
                h1.tag == h2.tag && h1.vr == h2.vr && h1.len.inner_eq(h2.len)
            }
            (SequenceStart { tag: tag1, len: len1 }, SequenceStart { tag: tag2, len: len2 }) => {
                tag1 == tag2 && len1.inner_eq(*len2)
            }
            (PixelSequenceStart { tag: tag1 }, PixelSequenceStart { tag: tag2 }) => tag1 == tag2,
            (ItemStart { len: len1 }, ItemStart { len: len2 }) => len1.inner_eq(*len2),
            (PrimitiveValue(v1), PrimitiveValue(v2)) => v1 == v2,
            (
                DeferredValue {
                    header: h1,
                    offset: o1,
                },
                DeferredValue {
                    header: h2,
                    offset: o2,
                },
            ) => o1 == o2 && h1.tag == h2.tag && h1.vr == h2.vr && h1.len.inner_eq(h2.len),
            (OffsetTable(t1), OffsetTable(t2)) => t1 == t2,
            (ItemValue(d1), ItemValue(d2)) => d1 == d2,
            (ItemEnd, ItemEnd) | (SequenceEnd, SequenceEnd) => true,
            _ => false,
        }
    }
}

/// The type of delimiter: sequence or item.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SeqTokenType {
    Sequence,
    Item,
}
