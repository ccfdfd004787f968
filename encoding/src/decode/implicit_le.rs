//! Implicit VR header decoding.
//!
//! Without a VR field in the header,
//! value representations are resolved with the help of a data dictionary.

use crate::decode::basic::BasicDecoder;
use crate::decode::{
    read_header_tag, BadSequenceHeaderSnafu, BasicDecode, Decode, ReadItemHeaderSnafu,
    ReadLengthSnafu, ReadTagSnafu, Result,
};
use byteordered::Endianness;
use dcmcodec_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dcmcodec_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmcodec_core::{Tag, VR};
use dcmcodec_dictionary_std::StandardDataDictionary;
use snafu::ResultExt;
use std::fmt;
use std::io::Read;

/// An implicit VR Little Endian decoder with the standard data dictionary.
pub type ImplicitVRLittleEndianDecoder = ImplicitVRDecoder<StandardDataDictionary>;

/// A data element decoder for implicit VR encodings.
///
/// This type contains an attribute dictionary for resolving
/// value representations.
/// Tags unknown to the dictionary are given the VR `UN`,
/// leaving it to the parser to look further
/// (private dictionaries, sequence inference).
#[derive(Clone)]
pub struct ImplicitVRDecoder<D> {
    dict: D,
    basic: BasicDecoder,
}

impl<D> fmt::Debug for ImplicitVRDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImplicitVRDecoder")
            .field("dict", &"«omitted»")
            .field("basic", &self.basic)
            .finish()
    }
}

impl ImplicitVRDecoder<StandardDataDictionary> {
    /// Retrieve a little endian decoder using the standard data dictionary.
    pub fn with_std_dict() -> Self {
        ImplicitVRDecoder::with_dict(Endianness::Little, StandardDataDictionary)
    }

    /// Retrieve a little endian decoder using the standard data dictionary.
    pub fn new() -> Self {
        Self::with_std_dict()
    }
}

impl Default for ImplicitVRDecoder<StandardDataDictionary> {
    fn default() -> Self {
        ImplicitVRDecoder::with_std_dict()
    }
}

impl<D> ImplicitVRDecoder<D> {
    /// Retrieve a decoder for the given byte order
    /// using a custom data dictionary.
    pub fn with_dict(endianness: Endianness, dictionary: D) -> Self {
        ImplicitVRDecoder {
            dict: dictionary,
            basic: BasicDecoder::new(endianness),
        }
    }

    /// The byte order of this decoder.
    pub fn endianness(&self) -> Endianness {
        self.basic.endianness()
    }
}

/// Whether the tag is of an element which must be read as `OW`
/// in implicit VR: _Pixel Data_ and _Overlay Data_ `(60xx,3000)`.
pub fn is_implicit_ow(tag: Tag) -> bool {
    tag == Tag(0x7FE0, 0x0010) || (tag.group() >> 8 == 0x60 && tag.element() == 0x3000)
}

impl<D> ImplicitVRDecoder<D>
where
    D: DataDictionary,
{
    /// Resolve the value representation of an element in implicit VR.
    pub fn resolve_vr(&self, tag: Tag) -> VR {
        if tag.group() == 0xFFFE {
            return VR::UN;
        }
        if is_implicit_ow(tag) {
            return VR::OW;
        }
        self.dict
            .by_tag(tag)
            .map(|entry| entry.vr().relaxed())
            .unwrap_or(VR::UN)
    }
}

impl<D> Decode for ImplicitVRDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = read_header_tag(&self.basic, source)?;
        let len = self.basic.decode_ul(&mut *source).context(ReadLengthSnafu)?;
        let vr = self.resolve_vr(tag);
        Ok((DataElementHeader::new(tag, vr, Length(len)), 8))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut *source)
            .context(ReadItemHeaderSnafu)?;
        let len = self.basic.decode_ul(&mut *source).context(ReadLengthSnafu)?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }

    #[inline]
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic.decode_tag(source).context(ReadTagSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::header::{HasLength, Header};

    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x10, 0x00, 0x10, 0x00,     // (0010,0010) Patient Name
            0x08, 0x00, 0x00, 0x00, // Length: 8
                b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        0x09, 0x00, 0x10, 0x10,     // (0009,1010) private, unknown
            0x02, 0x00, 0x00, 0x00, // Length: 2
                0x01, 0x02,
        0x00, 0x60, 0x00, 0x30,     // (6000,3000) Overlay Data
            0x00, 0x00, 0x00, 0x00, // Length: 0
        0xE0, 0x7F, 0x10, 0x00,     // (7FE0,0010) Pixel Data
            0x04, 0x00, 0x00, 0x00, // Length: 4
                0x05, 0x05, 0x05, 0x05,
    ];

    #[test]
    fn decode_with_dictionary() {
        let dec = ImplicitVRDecoder::default();
        let mut cursor = RAW;

        let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x0010, 0x0010));
        assert_eq!(elem.vr(), VR::PN);
        assert_eq!(elem.length(), Length(8));
        assert_eq!(bytes_read, 8);
        cursor = &cursor[8..];

        let (elem, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x0009, 0x1010));
        assert_eq!(elem.vr(), VR::UN);
        cursor = &cursor[2..];

        let (elem, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x6000, 0x3000));
        assert_eq!(elem.vr(), VR::OW);

        let (elem, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x7FE0, 0x0010));
        assert_eq!(elem.vr(), VR::OW);
        assert_eq!(elem.length(), Length(4));
    }

    #[test]
    fn decode_big_endian_item() {
        let dec = ImplicitVRDecoder::with_dict(Endianness::Big, StandardDataDictionary);
        let raw: &[u8] = &[0xFF, 0xFE, 0xE0, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let item = dec.decode_item_header(&mut &raw[..]).unwrap();
        assert!(matches!(item, SequenceItemHeader::Item { len } if len.is_undefined()));
    }
}
