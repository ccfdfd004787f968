//! Implementation of Deflated Explicit VR Little Endian.
//!
//! The data set after the file meta group is compressed
//! as raw DEFLATE data, without a zlib header.
use dcmcodec_encoding::adapters::DatasetAdapter;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Immaterial type representing an adapter for deflated data.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FlateAdapter;

impl DatasetAdapter for FlateAdapter {
    fn decode_dataset(&self, src: &mut dyn Read) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        flate2::read::DeflateDecoder::new(src).read_to_end(&mut out)?;
        tracing::trace!("Inflated data set to {} bytes", out.len());
        Ok(out)
    }

    fn encode_dataset(&self, data: &[u8], dst: &mut dyn Write) -> io::Result<()> {
        let mut encoder = flate2::write::DeflateEncoder::new(dst, Compression::fast());
        encoder.write_all(data)?;
        encoder.finish()?.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_round_trip() {
        let data: Vec<u8> = b"ORIGINAL\\PRIMARY "
            .iter()
            .copied()
            .cycle()
            .take(4096)
            .collect();
        let mut compressed = Vec::new();
        FlateAdapter.encode_dataset(&data, &mut compressed).unwrap();
        assert!(compressed.len() < data.len());

        let restored = FlateAdapter.decode_dataset(&mut &compressed[..]).unwrap();
        assert_eq!(restored, data);
    }
}
