//! Explicit VR Little Endian header encoding.

use crate::encode::basic::LittleEndianBasicEncoder;
use crate::encode::{
    write_offset_table, BasicEncode, Encode, LengthOverflowSnafu, Result, WriteHeaderSnafu,
    WriteItemHeaderSnafu, WriteTagSnafu,
};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dcmcodec_core::header::{DataElementHeader, HasLength, Header};
use dcmcodec_core::Tag;
use snafu::{ensure, ResultExt};
use std::io::Write;

/// Lay out an explicit VR element header in the given byte order,
/// returning the buffer and the number of bytes used.
pub(crate) fn explicit_header_bytes<B: ByteOrder>(de: &DataElementHeader) -> Result<([u8; 12], usize)> {
    let mut buf = [0u8; 12];
    B::write_u16(&mut buf[0..], de.tag().group());
    B::write_u16(&mut buf[2..], de.tag().element());
    let vr_bytes = de.vr().to_bytes();
    buf[4] = vr_bytes[0];
    buf[5] = vr_bytes[1];
    if de.vr().has_extended_length() {
        // 2 reserved bytes followed by a 32-bit length
        B::write_u32(&mut buf[8..], de.length().0);
        Ok((buf, 12))
    } else {
        ensure!(
            de.length().0 <= u32::from(u16::MAX),
            LengthOverflowSnafu {
                tag: de.tag(),
                vr: de.vr(),
                len: de.length(),
            }
        );
        B::write_u16(&mut buf[6..], de.length().0 as u16);
        Ok((buf, 8))
    }
}

/// A concrete encoder for the transfer syntax ExplicitVRLittleEndian
#[derive(Debug, Default, Copy, Clone)]
pub struct ExplicitVRLittleEndianEncoder {
    basic: LittleEndianBasicEncoder,
}

impl Encode for ExplicitVRLittleEndianEncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        self.basic.encode_tag(to, tag).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        if de.tag().group() == 0xFFFE {
            // items and delimiters have no VR
            self.encode_tag(&mut to, de.tag())?;
            self.basic
                .encode_ul(&mut to, de.length().0)
                .context(WriteHeaderSnafu)?;
            return Ok(8);
        }
        let (buf, len) = explicit_header_bytes::<LittleEndian>(&de)?;
        to.write_all(&buf[..len]).context(WriteHeaderSnafu)?;
        Ok(len)
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 8];
        LittleEndian::write_u16(&mut buf, 0xFFFE);
        LittleEndian::write_u16(&mut buf[2..], 0xE000);
        LittleEndian::write_u32(&mut buf[4..], len);
        to.write_all(&buf).context(WriteItemHeaderSnafu)
    }

    fn encode_offset_table<W>(&self, to: W, offset_table: &[u32]) -> Result<usize>
    where
        W: Write,
    {
        write_offset_table(&self.basic, to, offset_table)
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRLittleEndianEncoder;
    use crate::encode::{Encode, Error};
    use dcmcodec_core::header::{DataElementHeader, Length};
    use dcmcodec_core::{Tag, VR};

    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x02, 0x00, 0x02, 0x00,     // (0002,0002) Media Storage SOP Class UID
            b'U', b'I',             // VR: UI
            0x1A, 0x00,             // Length: 26 bytes
        0x08, 0x00, 0x19, 0x01,     // (0008,0119) Long Code Value
            b'U', b'C',             // VR: UC
            0x00, 0x00,             // Reserved
            0x04, 0x00, 0x00, 0x00, // Length: 4 bytes
        0x08, 0x00, 0x40, 0x11,     // (0008,1140) Referenced Image Sequence
            b'S', b'Q',             // VR: SQ
            0x00, 0x00,             // Reserved
            0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
        0xFE, 0xFF, 0x00, 0xE0,     // Item
            0x0A, 0x00, 0x00, 0x00, // Length: 10
    ];

    #[test]
    fn encode_headers() {
        let enc = ExplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();

        let n = enc
            .encode_element_header(
                &mut out,
                DataElementHeader::new(Tag(0x0002, 0x0002), VR::UI, Length(26)),
            )
            .unwrap();
        assert_eq!(n, 8);
        let n = enc
            .encode_element_header(
                &mut out,
                DataElementHeader::new(Tag(0x0008, 0x0119), VR::UC, Length(4)),
            )
            .unwrap();
        assert_eq!(n, 12);
        let n = enc
            .encode_element_header(
                &mut out,
                DataElementHeader::new(Tag(0x0008, 0x1140), VR::SQ, Length::UNDEFINED),
            )
            .unwrap();
        assert_eq!(n, 12);
        enc.encode_item_header(&mut out, 10).unwrap();

        assert_eq!(&out[..], RAW);
    }

    #[test]
    fn short_length_overflow() {
        let enc = ExplicitVRLittleEndianEncoder::default();
        let err = enc
            .encode_element_header(
                Vec::new(),
                DataElementHeader::new(Tag(0x0010, 0x4000), VR::LT, Length(0x1_0000)),
            )
            .unwrap_err();
        assert!(matches!(err, Error::LengthOverflow { vr: VR::LT, .. }));
    }
}
