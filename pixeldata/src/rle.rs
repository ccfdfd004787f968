//! RLE Lossless image compression.
//!
//! A frame is split into segments,
//! one per sample and byte of the sample,
//! most significant byte first.
//! Each segment is run-length encoded row by row
//! and the frame starts with a 64 byte header
//! holding the number of segments and their offsets.
//!
//! Decoded frames are little endian,
//! in planar configuration 1 (one plane per sample).
use byteorder::{ByteOrder, LittleEndian};
use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, NonConformantError, WarningKind};
use snafu::{ensure, Backtrace, ResultExt, Snafu};

/// The size of the RLE header in bytes.
pub const HEADER_LENGTH: usize = 64;

/// The maximum number of segments in a frame.
pub const MAX_SEGMENTS: usize = 15;

/// The order of the byte segments of each sample in an RLE frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SegmentOrder {
    /// The most significant byte comes first, as required by the standard.
    #[default]
    MsbFirst,
    /// The least significant byte comes first,
    /// as written by some non-conformant encoders.
    LsbFirst,
}

/// An error decoding or encoding RLE Lossless frames.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Bits Allocated {} is not a multiple of 8", bits_allocated))]
    UnsupportedBitsAllocated {
        bits_allocated: u16,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "{} segments are needed, but RLE Lossless allows at most 15",
        segments
    ))]
    TooManySegments {
        segments: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("RLE frame of {} bytes is shorter than its header", length))]
    HeaderTooShort { length: usize, backtrace: Backtrace },
    #[snafu(display("RLE header declares {} segments", count))]
    BadSegmentCount { count: u32, backtrace: Backtrace },
    #[snafu(display(
        "RLE frame has {} segments, but {} were expected",
        found,
        expected
    ))]
    SegmentCountMismatch {
        found: usize,
        expected: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("RLE segment {} has invalid offset {}", index, offset))]
    SegmentOffset {
        index: usize,
        offset: u32,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "RLE segment {} decoded to {} bytes, but {} were expected",
        index,
        actual,
        expected
    ))]
    SegmentTooShort {
        index: usize,
        actual: usize,
        expected: usize,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Native frame has {} bytes, but {} were expected",
        actual,
        expected
    ))]
    FrameLength {
        actual: usize,
        expected: usize,
        backtrace: Backtrace,
    },
    /// Segment padding is not tolerated in strict mode
    #[snafu(display("Non-conformant RLE segment"))]
    NonConformant { source: NonConformantError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn bytes_per_sample(bits_allocated: u16) -> Result<usize> {
    ensure!(
        bits_allocated > 0 && bits_allocated % 8 == 0,
        UnsupportedBitsAllocatedSnafu { bits_allocated }
    );
    Ok(usize::from(bits_allocated / 8))
}

/// Read the segment offsets from an RLE header.
pub fn parse_rle_header(header: &[u8]) -> Result<Vec<u32>> {
    ensure!(
        header.len() >= HEADER_LENGTH,
        HeaderTooShortSnafu {
            length: header.len()
        }
    );
    let count = LittleEndian::read_u32(&header[0..4]);
    ensure!(
        count as usize <= MAX_SEGMENTS,
        BadSegmentCountSnafu { count }
    );
    let mut offsets = vec![0; count as usize];
    LittleEndian::read_u32_into(&header[4..4 + 4 * count as usize], &mut offsets);
    Ok(offsets)
}

/// Decode a single RLE segment.
///
/// The segment ends with its data,
/// or at the reserved header byte 128.
pub fn decode_segment(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;
    while pos < data.len() {
        let header = data[pos];
        pos += 1;
        match header {
            0..=127 => {
                let end = (pos + usize::from(header) + 1).min(data.len());
                out.extend_from_slice(&data[pos..end]);
                pos = end;
            }
            128 => break,
            _ => {
                let Some(&value) = data.get(pos) else {
                    break;
                };
                out.resize(out.len() + 257 - usize::from(header), value);
                pos += 1;
            }
        }
    }
    out
}

/// Decode one RLE frame into native pixel data,
/// little endian and in planar configuration 1.
///
/// Segments decoding to more than `rows * columns` bytes are truncated
/// and reported to `diagnostics`. Fewer bytes is an error.
pub fn rle_decode_frame(
    data: &[u8],
    rows: u16,
    columns: u16,
    samples_per_pixel: u16,
    bits_allocated: u16,
    segment_order: SegmentOrder,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<u8>> {
    let bytes_per_sample = bytes_per_sample(bits_allocated)?;
    let samples = usize::from(samples_per_pixel);
    let mut offsets = parse_rle_header(data)?;
    ensure!(
        offsets.len() == samples * bytes_per_sample,
        SegmentCountMismatchSnafu {
            found: offsets.len(),
            expected: samples * bytes_per_sample,
        }
    );
    offsets.push(data.len() as u32);

    let pixels = usize::from(rows) * usize::from(columns);
    let stride = pixels * bytes_per_sample;
    let mut frame = vec![0; stride * samples];

    for sample in 0..samples {
        for byte in 0..bytes_per_sample {
            let index = sample * bytes_per_sample + byte;
            let (start, end) = (offsets[index], offsets[index + 1]);
            ensure!(
                start as usize >= HEADER_LENGTH && start <= end && end as usize <= data.len(),
                SegmentOffsetSnafu {
                    index,
                    offset: start
                }
            );
            let segment = decode_segment(&data[start as usize..end as usize]);
            ensure!(
                segment.len() >= pixels,
                SegmentTooShortSnafu {
                    index,
                    actual: segment.len(),
                    expected: pixels,
                }
            );
            if segment.len() > pixels {
                diagnostics
                    .report(ConformanceWarning::new(
                        WarningKind::PixelDataPadding,
                        format!(
                            "RLE segment {} decoded to {} bytes, {} expected",
                            index,
                            segment.len(),
                            pixels
                        ),
                    ))
                    .context(NonConformantSnafu)?;
            }

            // position of this byte within a little endian sample
            let le_byte = match segment_order {
                SegmentOrder::MsbFirst => bytes_per_sample - byte - 1,
                SegmentOrder::LsbFirst => byte,
            };
            let plane = &mut frame[sample * stride..(sample + 1) * stride];
            for (dst, src) in plane
                .iter_mut()
                .skip(le_byte)
                .step_by(bytes_per_sample)
                .zip(&segment[..pixels])
            {
                *dst = *src;
            }
        }
    }
    Ok(frame)
}

/// Append the RLE encoding of a single row to `out`.
///
/// Runs of two or more equal bytes become replicate runs
/// of at most 128 bytes each.
/// Everything else is gathered into literal runs of at most 128 bytes.
pub fn encode_row(row: &[u8], out: &mut Vec<u8>) {
    fn flush_literal(literal: &[u8], out: &mut Vec<u8>) {
        for chunk in literal.chunks(128) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
    }

    let mut literal_start = 0;
    let mut i = 0;
    while i < row.len() {
        let value = row[i];
        let run = row[i..].iter().take_while(|&&b| b == value).count();
        if run >= 2 {
            flush_literal(&row[literal_start..i], out);
            let mut remaining = run;
            while remaining >= 2 {
                let n = remaining.min(128);
                out.push((257 - n) as u8);
                out.push(value);
                remaining -= n;
            }
            // a single leftover byte joins the next literal run
            literal_start = i + run - remaining;
        }
        i += run;
    }
    flush_literal(&row[literal_start..], out);
}

/// Encode a whole segment of `columns` bytes per row.
///
/// The result is padded to an even length.
pub fn encode_segment(data: &[u8], columns: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 64 + 2);
    if columns > 0 {
        for row in data.chunks(columns) {
            encode_row(row, &mut out);
        }
    }
    if out.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// Encode one frame of native little endian pixel data
/// into an RLE frame, header included.
///
/// `planar_configuration` tells whether the samples of each pixel
/// are interleaved (0) or kept in separate planes (1).
pub fn rle_encode_frame(
    frame: &[u8],
    rows: u16,
    columns: u16,
    samples_per_pixel: u16,
    bits_allocated: u16,
    planar_configuration: u16,
) -> Result<Vec<u8>> {
    let bytes_per_sample = bytes_per_sample(bits_allocated)?;
    let samples = usize::from(samples_per_pixel);
    let segments = samples * bytes_per_sample;
    ensure!(segments <= MAX_SEGMENTS, TooManySegmentsSnafu { segments });

    let pixels = usize::from(rows) * usize::from(columns);
    let expected = pixels * segments;
    ensure!(
        frame.len() == expected,
        FrameLengthSnafu {
            actual: frame.len(),
            expected,
        }
    );

    let mut out = vec![0; HEADER_LENGTH];
    LittleEndian::write_u32(&mut out[0..4], segments as u32);
    let mut segment = Vec::with_capacity(pixels);
    for sample in 0..samples {
        for byte in 0..bytes_per_sample {
            let le_byte = bytes_per_sample - byte - 1;
            segment.clear();
            segment.extend((0..pixels).map(|p| {
                let sample_index = if planar_configuration == 1 {
                    sample * pixels + p
                } else {
                    p * samples + sample
                };
                frame[sample_index * bytes_per_sample + le_byte]
            }));
            let index = sample * bytes_per_sample + byte;
            let offset = out.len() as u32;
            LittleEndian::write_u32(&mut out[4 + 4 * index..8 + 4 * index], offset);
            out.extend(encode_segment(&segment, usize::from(columns)));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::ValidationMode;
    use rstest::rstest;

    fn encoded_row(row: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode_row(row, &mut out);
        out
    }

    #[rstest]
    #[case(vec![5, 5], vec![0xFF, 5])]
    #[case(vec![7], vec![0x00, 7])]
    #[case(vec![1, 2, 3], vec![0x02, 1, 2, 3])]
    #[case(vec![1, 2, 2, 2, 3], vec![0x00, 1, 0xFE, 2, 0x00, 3])]
    #[case(vec![9; 128], vec![0x81, 9])]
    #[case(vec![9; 129], vec![0x81, 9, 0x00, 9])]
    #[case(vec![9; 130], vec![0x81, 9, 0xFF, 9])]
    fn encode_rows(#[case] row: Vec<u8>, #[case] expected: Vec<u8>) {
        assert_eq!(encoded_row(&row), expected);
        assert_eq!(decode_segment(&expected), row);
    }

    #[test]
    fn long_literal_runs_are_split() {
        let row: Vec<u8> = (0..130).map(|i| i as u8).collect();
        let out = encoded_row(&row);
        assert_eq!(out[0], 127);
        assert_eq!(out[129], 1);
        assert_eq!(out.len(), 132);
        assert_eq!(decode_segment(&out), row);
    }

    #[test]
    fn decode_packbits() {
        let encoded = [
            0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7,
            0xAA,
        ];
        let expected = [
            0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
        ];
        assert_eq!(decode_segment(&encoded), expected);
    }

    #[test]
    fn reserved_header_ends_segment() {
        assert_eq!(decode_segment(&[0x01, 1, 2, 0x80, 0x00, 3]), vec![1, 2]);
        // truncated literal and replicate runs
        assert_eq!(decode_segment(&[0x03, 1, 2]), vec![1, 2]);
        assert_eq!(decode_segment(&[0x00, 1, 0xFF]), vec![1]);
    }

    #[test]
    fn encode_small_frame() {
        let frame = rle_encode_frame(&[5, 5, 5, 5], 2, 2, 1, 8, 0).unwrap();
        let mut expected = vec![0; 64];
        expected[0] = 1;
        expected[4] = 0x40;
        expected.extend_from_slice(&[0xFF, 5, 0xFF, 5]);
        assert_eq!(frame, expected);
        assert_eq!(parse_rle_header(&frame).unwrap(), vec![64]);

        let mut diagnostics = Diagnostics::default();
        let decoded =
            rle_decode_frame(&frame, 2, 2, 1, 8, SegmentOrder::MsbFirst, &mut diagnostics).unwrap();
        assert_eq!(decoded, vec![5, 5, 5, 5]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn sixteen_bit_samples_are_little_endian() {
        // two pixels: 0x0102, 0x0304
        let native = [0x02, 0x01, 0x04, 0x03];
        let frame = rle_encode_frame(&native, 1, 2, 1, 16, 0).unwrap();
        let offsets = parse_rle_header(&frame).unwrap();
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets[0], 64);
        assert!(offsets[1] > offsets[0] && offsets[1] % 2 == 0);
        // most significant bytes first
        assert_eq!(decode_segment(&frame[offsets[0] as usize..offsets[1] as usize]), vec![0x01, 0x03]);

        let mut diagnostics = Diagnostics::default();
        let decoded =
            rle_decode_frame(&frame, 1, 2, 1, 16, SegmentOrder::MsbFirst, &mut diagnostics).unwrap();
        assert_eq!(decoded, native);

        let swapped =
            rle_decode_frame(&frame, 1, 2, 1, 16, SegmentOrder::LsbFirst, &mut diagnostics).unwrap();
        assert_eq!(swapped, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn colour_frames_decode_to_planes() {
        // two RGB pixels, interleaved
        let native = [10, 20, 30, 11, 21, 31];
        let frame = rle_encode_frame(&native, 1, 2, 3, 8, 0).unwrap();
        let mut diagnostics = Diagnostics::default();
        let decoded =
            rle_decode_frame(&frame, 1, 2, 3, 8, SegmentOrder::MsbFirst, &mut diagnostics).unwrap();
        assert_eq!(decoded, vec![10, 11, 20, 21, 30, 31]);

        let planar = rle_encode_frame(&decoded, 1, 2, 3, 8, 1).unwrap();
        assert_eq!(planar, frame);
    }

    #[test]
    fn padded_segment_is_reported() {
        let mut frame = vec![0; 64];
        frame[0] = 1;
        frame[4] = 64;
        frame.extend_from_slice(&[0xFD, 1]);
        let mut diagnostics = Diagnostics::default();
        let decoded =
            rle_decode_frame(&frame, 1, 2, 1, 8, SegmentOrder::MsbFirst, &mut diagnostics).unwrap();
        assert_eq!(decoded, vec![1, 1]);
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::PixelDataPadding);

        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(matches!(
            rle_decode_frame(&frame, 1, 2, 1, 8, SegmentOrder::MsbFirst, &mut strict),
            Err(Error::NonConformant { .. })
        ));

        assert!(matches!(
            rle_decode_frame(&frame, 3, 2, 1, 8, SegmentOrder::MsbFirst, &mut diagnostics),
            Err(Error::SegmentTooShort { actual: 4, expected: 6, .. })
        ));
    }

    #[test]
    fn frame_constraints() {
        assert!(matches!(
            rle_encode_frame(&[0; 32], 1, 1, 4, 64, 0),
            Err(Error::TooManySegments { segments: 32, .. })
        ));
        assert!(matches!(
            rle_encode_frame(&[0; 3], 1, 2, 1, 8, 0),
            Err(Error::FrameLength { actual: 3, expected: 2, .. })
        ));
        assert!(matches!(
            rle_encode_frame(&[0; 2], 1, 2, 1, 12, 0),
            Err(Error::UnsupportedBitsAllocated { bits_allocated: 12, .. })
        ));
        let mut diagnostics = Diagnostics::default();
        let frame = rle_encode_frame(&[1, 2], 1, 2, 1, 8, 0).unwrap();
        assert!(matches!(
            rle_decode_frame(&frame, 1, 1, 2, 8, SegmentOrder::MsbFirst, &mut diagnostics),
            Err(Error::SegmentCountMismatch { found: 1, expected: 2, .. })
        ));
    }
}
