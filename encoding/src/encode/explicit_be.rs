//! Explicit VR Big Endian header encoding.

use crate::encode::basic::BigEndianBasicEncoder;
use crate::encode::explicit_le::explicit_header_bytes;
use crate::encode::{
    write_offset_table, BasicEncode, Encode, Result, WriteHeaderSnafu, WriteItemHeaderSnafu,
    WriteTagSnafu,
};
use byteordered::byteorder::{BigEndian, ByteOrder};
use dcmcodec_core::header::{DataElementHeader, HasLength, Header};
use dcmcodec_core::Tag;
use snafu::ResultExt;
use std::io::Write;

/// A concrete encoder for the transfer syntax ExplicitVRBigEndian
#[derive(Debug, Default, Copy, Clone)]
pub struct ExplicitVRBigEndianEncoder {
    basic: BigEndianBasicEncoder,
}

impl Encode for ExplicitVRBigEndianEncoder {
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
            self.encode_tag(&mut to, de.tag())?;
            self.basic
                .encode_ul(&mut to, de.length().0)
                .context(WriteHeaderSnafu)?;
            return Ok(8);
        }
        let (buf, len) = explicit_header_bytes::<BigEndian>(&de)?;
        to.write_all(&buf[..len]).context(WriteHeaderSnafu)?;
        Ok(len)
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE000);
        BigEndian::write_u32(&mut buf[4..], len);
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
    use super::ExplicitVRBigEndianEncoder;
    use crate::encode::Encode;
    use dcmcodec_core::header::{DataElementHeader, Length};
    use dcmcodec_core::{Tag, VR};

    #[test]
    fn encode_headers() {
        let enc = ExplicitVRBigEndianEncoder::default();
        let mut out = Vec::new();
        enc.encode_element_header(
            &mut out,
            DataElementHeader::new(Tag(0x0028, 0x0010), VR::US, Length(2)),
        )
        .unwrap();
        enc.encode_element_header(
            &mut out,
            DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OW, Length(8)),
        )
        .unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02,
            0x7F, 0xE0, 0x00, 0x10, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x08,
        ];
        assert_eq!(&out[..], expected);
    }
}
