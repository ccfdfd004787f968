//! Explicit VR Big Endian header decoding.

use crate::decode::basic::BigEndianBasicDecoder;
use crate::decode::explicit_le::parse_vr;
use crate::decode::{
    read_header_tag, BadSequenceHeaderSnafu, BasicDecode, Decode, ReadItemHeaderSnafu,
    ReadItemLengthSnafu, ReadLengthSnafu, ReadReservedSnafu, ReadTagSnafu, ReadVrSnafu, Result,
};
use byteordered::byteorder::{BigEndian, ByteOrder};
use dcmcodec_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmcodec_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Read;

/// A data element decoder for the Explicit VR Big Endian transfer syntax.
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRBigEndianDecoder {
    basic: BigEndianBasicDecoder,
}

impl Decode for ExplicitVRBigEndianDecoder {
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = read_header_tag(&self.basic, source)?;

        let mut buf = [0u8; 4];
        if tag.group() == 0xFFFE {
            source.read_exact(&mut buf).context(ReadItemLengthSnafu)?;
            let len = BigEndian::read_u32(&buf);
            return Ok((DataElementHeader::new(tag, VR::UN, Length(len)), 8));
        }

        source.read_exact(&mut buf[0..2]).context(ReadVrSnafu)?;
        let vr = parse_vr([buf[0], buf[1]], tag);

        let (len, bytes_read) = if vr.has_extended_length() {
            source
                .read_exact(&mut buf[0..2])
                .context(ReadReservedSnafu)?;
            source.read_exact(&mut buf).context(ReadLengthSnafu)?;
            (BigEndian::read_u32(&buf), 12)
        } else {
            source.read_exact(&mut buf[0..2]).context(ReadLengthSnafu)?;
            (u32::from(BigEndian::read_u16(&buf[0..2])), 8)
        };

        Ok((DataElementHeader::new(tag, vr, Length(len)), bytes_read))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 8];
        source.read_exact(&mut buf).context(ReadItemHeaderSnafu)?;
        let group = BigEndian::read_u16(&buf[0..2]);
        let element = BigEndian::read_u16(&buf[2..4]);
        let len = BigEndian::read_u32(&buf[4..8]);

        SequenceItemHeader::new((group, element), Length(len)).context(BadSequenceHeaderSnafu)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic.decode_tag(source).context(ReadTagSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRBigEndianDecoder;
    use crate::decode::Decode;
    use dcmcodec_core::header::{HasLength, Header, Length, SequenceItemHeader};
    use dcmcodec_core::{Tag, VR};

    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x00, 0x28, 0x00, 0x10,     // (0028,0010) Rows
            b'U', b'S',             // VR: US
            0x00, 0x02,             // Length: 2 bytes
                0x02, 0x00,         // 512
        0x00, 0x08, 0x11, 0x40,     // (0008,1140) Referenced Image Sequence
            b'S', b'Q',             // VR: SQ
            0x00, 0x00,             // Reserved
            0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
        0xFF, 0xFE, 0xE0, 0x00,     // Item
            0x00, 0x00, 0x00, 0x20, // Length: 32
    ];

    #[test]
    fn decode_data_elements() {
        let dec = ExplicitVRBigEndianDecoder::default();
        let mut cursor = RAW;

        let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x0028, 0x0010));
        assert_eq!(elem.vr(), VR::US);
        assert_eq!(elem.length(), Length(2));
        assert_eq!(bytes_read, 8);
        cursor = &cursor[2..];

        let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x0008, 0x1140));
        assert_eq!(elem.vr(), VR::SQ);
        assert!(elem.length().is_undefined());
        assert_eq!(bytes_read, 12);

        assert_eq!(
            dec.decode_item_header(&mut cursor).unwrap(),
            SequenceItemHeader::Item { len: Length(32) }
        );
        assert!(cursor.is_empty());
    }
}
