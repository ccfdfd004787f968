//! Implicit VR header encoding.

use crate::encode::basic::BasicEncoder;
use crate::encode::{
    write_offset_table, BasicEncode, Encode, Result, WriteHeaderSnafu, WriteItemHeaderSnafu,
    WriteTagSnafu,
};
use byteordered::Endianness;
use dcmcodec_core::header::{DataElementHeader, HasLength, Header};
use dcmcodec_core::Tag;
use snafu::ResultExt;
use std::io::Write;

/// A concrete encoder for implicit VR transfer syntaxes,
/// Implicit VR Little Endian being the only standard one.
#[derive(Debug, Default, Copy, Clone)]
pub struct ImplicitVREncoder {
    basic: BasicEncoder,
}

impl ImplicitVREncoder {
    /// Create an implicit VR encoder in the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ImplicitVREncoder {
            basic: BasicEncoder::new(endianness),
        }
    }

    /// The byte order of this encoder.
    pub fn endianness(&self) -> Endianness {
        self.basic.endianness()
    }
}

impl Encode for ImplicitVREncoder {
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
        self.encode_tag(&mut to, de.tag())?;
        self.basic
            .encode_ul(&mut to, de.length().0)
            .context(WriteHeaderSnafu)?;
        Ok(8)
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag::ITEM)
            .context(WriteItemHeaderSnafu)?;
        self.basic
            .encode_ul(&mut to, len)
            .context(WriteItemHeaderSnafu)
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
    use super::ImplicitVREncoder;
    use crate::encode::Encode;
    use dcmcodec_core::header::{DataElementHeader, Length};
    use dcmcodec_core::{Tag, VR};

    #[test]
    fn encode_headers() {
        let enc = ImplicitVREncoder::default();
        let mut out = Vec::new();
        let n = enc
            .encode_element_header(
                &mut out,
                DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(8)),
            )
            .unwrap();
        assert_eq!(n, 8);
        enc.encode_item_header(&mut out, 0xFFFF_FFFF).unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        assert_eq!(&out[..], expected);
    }
}
