//! Encapsulated pixel data.
//!
//! Encapsulated pixel data is a sequence of items,
//! always in explicit VR little endian:
//! the first item is the Basic Offset Table (possibly empty),
//! and every other item is a fragment of compressed frame data.
//! A frame may span more than one fragment.
//!
//! The functions here work on the raw bytes of the pixel data value,
//! without the trailing sequence delimiter,
//! or on a [`PixelFragmentSequence`] held in memory.
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, NonConformantError, WarningKind};
use dcmcodec_core::value::{PixelFragmentSequence, C};
use dcmcodec_core::Tag;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::ops::Range;

const ITEM_TAG_BYTES: [u8; 4] = [0xFE, 0xFF, 0x00, 0xE0];
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;
const EOI_MARKER: [u8; 2] = [0xFF, 0xD9];

/// An error processing encapsulated pixel data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not read encapsulated pixel data
    #[snafu(display("Could not read encapsulated pixel data"))]
    ReadItem {
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Unexpected tag {} at offset {} in encapsulated pixel data", tag, position))]
    UnexpectedTag {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Basic Offset Table length {} is not a multiple of 4", length))]
    OffsetTableLength { length: u32, backtrace: Backtrace },
    #[snafu(display("Undefined item length at offset {} in encapsulated pixel data", position))]
    UndefinedItemLength { position: u64, backtrace: Backtrace },
    #[snafu(display("Undefined fragment length in encapsulated pixel data"))]
    UndefinedFragmentLength { backtrace: Backtrace },
    /// The Basic Offset Table is empty and the number of frames is unknown
    #[snafu(display(
        "Frame boundaries are unknown: the Basic Offset Table is empty and the number of frames was not given"
    ))]
    UnknownFrameBoundaries { backtrace: Backtrace },
    #[snafu(display(
        "Encapsulated pixel data has fewer fragments ({}) than frames ({}) and no Basic Offset Table",
        fragments,
        frames
    ))]
    FewerFragmentsThanFrames {
        fragments: usize,
        frames: u32,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Encapsulated frame data of {} bytes is too large for the Basic Offset Table",
        total
    ))]
    OffsetTableOverflow { total: u64, backtrace: Backtrace },
    /// Frame boundaries had to be guessed and validation is strict
    #[snafu(display("Non-conformant encapsulated pixel data"))]
    NonConformant { source: NonConformantError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Read a little endian tag, or `None` at the end of the source.
fn read_tag<R: ?Sized + Read>(src: &mut R) -> Result<Option<Tag>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context(ReadItemSnafu),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(Tag(
            LittleEndian::read_u16(&buf[0..2]),
            LittleEndian::read_u16(&buf[2..4]),
        ))),
        _ => Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(ReadItemSnafu),
    }
}

fn read_length<R: ?Sized + Read>(src: &mut R) -> Result<u32> {
    src.read_u32::<LittleEndian>().context(ReadItemSnafu)
}

fn position<S: ?Sized + Seek>(src: &mut S) -> Result<u64> {
    src.stream_position().context(ReadItemSnafu)
}

/// Read the Basic Offset Table item at the start of `src`.
///
/// Returns whether the table has any entries, and the frame offsets.
/// An empty table yields a single offset of 0.
pub fn get_frame_offsets<R>(src: &mut R) -> Result<(bool, Vec<u32>)>
where
    R: ?Sized + Read + Seek,
{
    let start = position(src)?;
    let tag = match read_tag(src)? {
        Some(tag) => tag,
        None => {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(ReadItemSnafu)
        }
    };
    ensure!(
        tag == Tag::ITEM,
        UnexpectedTagSnafu {
            tag,
            position: start
        }
    );
    let length = read_length(src)?;
    ensure!(length % 4 == 0, OffsetTableLengthSnafu { length });

    if length == 0 {
        return Ok((false, vec![0]));
    }
    let mut offsets = vec![0; length as usize / 4];
    src.read_u32_into::<LittleEndian>(&mut offsets)
        .context(ReadItemSnafu)?;
    Ok((true, offsets))
}

/// Count the fragment items from the current position of `src`
/// up to the sequence delimiter or the end of the data.
///
/// The source is returned to its original position.
pub fn get_nr_fragments<R>(src: &mut R) -> Result<usize>
where
    R: ?Sized + Read + Seek,
{
    let start = position(src)?;
    let mut count = 0;
    loop {
        let here = position(src)?;
        match read_tag(src)? {
            None => break,
            Some(Tag::ITEM) => {
                let length = read_length(src)?;
                ensure!(
                    length != UNDEFINED_LENGTH,
                    UndefinedItemLengthSnafu { position: here + 4 }
                );
                src.seek(SeekFrom::Current(i64::from(length)))
                    .context(ReadItemSnafu)?;
                count += 1;
            }
            Some(Tag::SEQUENCE_DELIMITER) => break,
            Some(tag) => {
                return UnexpectedTagSnafu {
                    tag,
                    position: here,
                }
                .fail()
            }
        }
    }
    src.seek(SeekFrom::Start(start)).context(ReadItemSnafu)?;
    Ok(count)
}

/// An iterator over the fragments of encapsulated pixel data.
///
/// Created by [`generate_pixel_data_fragment`].
#[derive(Debug)]
pub struct FragmentIter<R> {
    src: R,
    done: bool,
}

impl<R> Iterator for FragmentIter<R>
where
    R: Read + Seek,
{
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.next_fragment();
        if !matches!(out, Ok(Some(_))) {
            self.done = true;
        }
        out.transpose()
    }
}

impl<R> FragmentIter<R>
where
    R: Read + Seek,
{
    fn next_fragment(&mut self) -> Result<Option<Vec<u8>>> {
        let here = position(&mut self.src)?;
        match read_tag(&mut self.src)? {
            None => Ok(None),
            Some(Tag::ITEM) => {
                let length = read_length(&mut self.src)?;
                ensure!(
                    length != UNDEFINED_LENGTH,
                    UndefinedItemLengthSnafu { position: here + 4 }
                );
                let mut fragment = vec![0; length as usize];
                self.src
                    .read_exact(&mut fragment)
                    .context(ReadItemSnafu)?;
                Ok(Some(fragment))
            }
            Some(Tag::SEQUENCE_DELIMITER) => {
                // leave the delimiter to the caller
                self.src
                    .seek(SeekFrom::Current(-4))
                    .context(ReadItemSnafu)?;
                Ok(None)
            }
            Some(tag) => UnexpectedTagSnafu {
                tag,
                position: here,
            }
            .fail(),
        }
    }
}

/// Iterate over the fragments of encapsulated pixel data,
/// starting at the first item after the Basic Offset Table.
pub fn generate_pixel_data_fragment<R>(src: R) -> FragmentIter<R>
where
    R: Read + Seek,
{
    FragmentIter { src, done: false }
}

/// Decide which fragments make up each frame.
///
/// With a Basic Offset Table, the offsets decide.
/// Without one, a single fragment is a single frame,
/// as many fragments as frames are one frame each,
/// and more fragments than frames are split
/// after each fragment ending with a JPEG EOI marker.
fn frame_ranges<F>(
    offset_table: &[u32],
    fragments: &[F],
    nr_frames: Option<u32>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Range<usize>>>
where
    F: AsRef<[u8]>,
{
    let nr_fragments = fragments.len();
    if nr_fragments == 0 {
        return Ok(Vec::new());
    }

    if !offset_table.is_empty() {
        let mut ranges = Vec::with_capacity(offset_table.len());
        let mut start = 0;
        let mut next_frame = 1;
        let mut position = 0_u64;
        for (i, fragment) in fragments.iter().enumerate() {
            if let Some(&offset) = offset_table.get(next_frame) {
                if position >= u64::from(offset) && i > start {
                    ranges.push(start..i);
                    start = i;
                    next_frame += 1;
                }
            }
            position += fragment.as_ref().len() as u64 + 8;
        }
        ranges.push(start..nr_fragments);
        return Ok(ranges);
    }

    if nr_fragments == 1 {
        return Ok(vec![0..1]);
    }

    let nr_frames = nr_frames
        .filter(|n| *n > 0)
        .context(UnknownFrameBoundariesSnafu)?;
    let frames = nr_frames as usize;

    if frames == nr_fragments {
        return Ok((0..nr_fragments).map(|i| i..i + 1).collect());
    }
    if frames == 1 {
        return Ok(vec![0..nr_fragments]);
    }
    ensure!(
        nr_fragments > frames,
        FewerFragmentsThanFramesSnafu {
            fragments: nr_fragments,
            frames: nr_frames,
        }
    );

    let mut ranges = Vec::with_capacity(frames);
    let mut start = 0;
    for (i, fragment) in fragments.iter().enumerate() {
        let fragment = fragment.as_ref();
        let tail = &fragment[fragment.len().saturating_sub(10)..];
        if tail.windows(2).any(|w| w == EOI_MARKER) {
            ranges.push(start..i + 1);
            start = i + 1;
        }
    }
    let leftover = start < nr_fragments;
    if leftover || ranges.len() != frames {
        diagnostics
            .report(ConformanceWarning::new(
                WarningKind::FrameBoundaries,
                format!(
                    "end of encapsulated pixel data reached with {} of {} frame boundaries found",
                    ranges.len(),
                    nr_frames
                ),
            ))
            .context(NonConformantSnafu)?;
        if leftover {
            ranges.push(start..nr_fragments);
        }
    }
    Ok(ranges)
}

fn group_by_ranges(fragments: Vec<Vec<u8>>, ranges: Vec<Range<usize>>) -> Vec<Vec<Vec<u8>>> {
    let mut fragments = fragments.into_iter();
    ranges
        .into_iter()
        .map(|range| fragments.by_ref().take(range.len()).collect())
        .collect()
}

/// Split encapsulated pixel data into frames,
/// each frame being the list of its fragments.
///
/// `nr_frames` is the value of _Number of Frames_,
/// only needed when the Basic Offset Table is empty.
pub fn generate_pixel_data(
    data: &[u8],
    nr_frames: Option<u32>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Vec<Vec<u8>>>> {
    let mut src = Cursor::new(data);
    let (has_bot, offsets) = get_frame_offsets(&mut src)?;
    let fragments = generate_pixel_data_fragment(&mut src).collect::<Result<Vec<_>>>()?;
    let offsets: &[u32] = if has_bot { &offsets } else { &[] };
    let ranges = frame_ranges(offsets, &fragments, nr_frames, diagnostics)?;
    Ok(group_by_ranges(fragments, ranges))
}

/// Split encapsulated pixel data into frames,
/// joining the fragments of each frame.
pub fn generate_pixel_data_frame(
    data: &[u8],
    nr_frames: Option<u32>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Vec<u8>>> {
    Ok(generate_pixel_data(data, nr_frames, diagnostics)?
        .into_iter()
        .map(|fragments| fragments.concat())
        .collect())
}

/// Read one item from `src`.
///
/// Returns `None` at a sequence delimiter or at the end of the data.
/// Non-item tags and delimiters with a length are tolerated
/// and reported to `diagnostics`.
pub fn read_item<R>(src: &mut R, diagnostics: &mut Diagnostics) -> Result<Option<Vec<u8>>>
where
    R: ?Sized + Read,
{
    let tag = match read_tag(src)? {
        Some(tag) => tag,
        None => return Ok(None),
    };
    let length = read_length(src)?;
    if tag == Tag::SEQUENCE_DELIMITER {
        if length != 0 {
            diagnostics
                .report(
                    ConformanceWarning::new(
                        WarningKind::DelimiterLength,
                        format!("expected zero length after delimiter, found {}", length),
                    )
                    .with_tag(tag),
                )
                .context(NonConformantSnafu)?;
        }
        return Ok(None);
    }
    if tag != Tag::ITEM {
        diagnostics
            .report(
                ConformanceWarning::new(
                    WarningKind::UnexpectedDelimiter,
                    format!("expected item, found {}", tag),
                )
                .with_tag(tag),
            )
            .context(NonConformantSnafu)?;
    }
    ensure!(length != UNDEFINED_LENGTH, UndefinedFragmentLengthSnafu);
    let mut data = vec![0; length as usize];
    src.read_exact(&mut data).context(ReadItemSnafu)?;
    Ok(Some(data))
}

/// Read all fragments of encapsulated pixel data,
/// skipping the Basic Offset Table.
pub fn decode_data_sequence(data: &[u8], diagnostics: &mut Diagnostics) -> Result<Vec<Vec<u8>>> {
    let mut src = data;
    let _offset_table = read_item(&mut src, diagnostics)?;
    let mut fragments = Vec::new();
    while let Some(item) = read_item(&mut src, diagnostics)? {
        fragments.push(item);
    }
    Ok(fragments)
}

/// Join all fragments of encapsulated pixel data.
pub fn defragment_data(data: &[u8], diagnostics: &mut Diagnostics) -> Result<Vec<u8>> {
    Ok(decode_data_sequence(data, diagnostics)?.concat())
}

/// Split a frame into fragments of at most `max_fragment_size` bytes.
///
/// Every fragment has an even length, so the size is rounded down
/// to an even number of at least 2,
/// and the last fragment is padded with a zero byte if needed.
/// A size of 0 yields a single fragment.
pub fn fragment_frame(frame: &[u8], max_fragment_size: usize) -> Vec<Vec<u8>> {
    if frame.is_empty() {
        return vec![Vec::new()];
    }
    let size = if max_fragment_size == 0 {
        frame.len()
    } else {
        (max_fragment_size & !1).max(2)
    };
    frame
        .chunks(size)
        .map(|chunk| {
            let mut fragment = chunk.to_vec();
            if fragment.len() % 2 == 1 {
                fragment.push(0);
            }
            fragment
        })
        .collect()
}

/// Wrap a fragment in an item.
pub fn itemize_fragment(fragment: &[u8]) -> Vec<u8> {
    let mut item = Vec::with_capacity(fragment.len() + 8);
    item.extend_from_slice(&ITEM_TAG_BYTES);
    item.extend_from_slice(&(fragment.len() as u32).to_le_bytes());
    item.extend_from_slice(fragment);
    item
}

/// Split a frame into fragments and wrap each one in an item.
pub fn itemize_frame(frame: &[u8], max_fragment_size: usize) -> Vec<u8> {
    fragment_frame(frame, max_fragment_size)
        .iter()
        .flat_map(|fragment| itemize_fragment(fragment))
        .collect()
}

/// Encapsulate frames into the bytes of a pixel data value,
/// without the trailing sequence delimiter.
///
/// With `has_bot`, the Basic Offset Table holds the offset
/// of the first fragment of each frame,
/// relative to the first byte after the table.
/// Otherwise the table is left empty.
pub fn encapsulate<F>(frames: &[F], max_fragment_size: usize, has_bot: bool) -> Result<Vec<u8>>
where
    F: AsRef<[u8]>,
{
    let mut items = Vec::new();
    let mut offsets = Vec::with_capacity(frames.len());
    for frame in frames {
        offsets.push(items.len() as u64);
        items.extend(itemize_frame(frame.as_ref(), max_fragment_size));
    }

    let mut out = Vec::with_capacity(items.len() + 8 + 4 * frames.len());
    out.extend_from_slice(&ITEM_TAG_BYTES);
    if has_bot {
        if let Some(&total) = offsets.last() {
            ensure!(total <= u64::from(u32::MAX), OffsetTableOverflowSnafu { total });
        }
        out.extend_from_slice(&(4 * offsets.len() as u32).to_le_bytes());
        for offset in offsets {
            out.extend_from_slice(&(offset as u32).to_le_bytes());
        }
    } else {
        out.extend_from_slice(&[0; 4]);
    }
    out.extend(items);
    Ok(out)
}

/// Encapsulate frames with one fragment per frame and an empty
/// Basic Offset Table, along with the values of
/// _Extended Offset Table_ and _Extended Offset Table Lengths_.
///
/// Returns `(pixel_data, extended_offset_table, extended_offset_table_lengths)`.
pub fn encapsulate_extended<F>(frames: &[F]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>)>
where
    F: AsRef<[u8]>,
{
    let mut offsets = Vec::with_capacity(frames.len() * 8);
    let mut lengths = Vec::with_capacity(frames.len() * 8);
    let mut offset = 0_u64;
    for frame in frames {
        let len = frame.as_ref().len() as u64;
        offsets.extend_from_slice(&offset.to_le_bytes());
        lengths.extend_from_slice(&len.to_le_bytes());
        offset += len + len % 2 + 8;
    }
    Ok((encapsulate(frames, 0, false)?, offsets, lengths))
}

/// Build an in-memory pixel fragment sequence out of native frames.
pub fn fragment_sequence(
    frames: &[Vec<u8>],
    max_fragment_size: usize,
    has_bot: bool,
) -> PixelFragmentSequence<Vec<u8>> {
    let mut offset_table: C<u32> = C::new();
    let mut fragments: C<Vec<u8>> = C::new();
    let mut position = 0_u32;
    for frame in frames {
        if has_bot {
            offset_table.push(position);
        }
        for fragment in fragment_frame(frame, max_fragment_size) {
            position = position.saturating_add(fragment.len() as u32 + 8);
            fragments.push(fragment);
        }
    }
    PixelFragmentSequence::new(offset_table, fragments)
}

/// Reassemble the frames of an in-memory pixel fragment sequence.
pub fn sequence_frames(
    sequence: &PixelFragmentSequence<Vec<u8>>,
    nr_frames: Option<u32>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Vec<u8>>> {
    let fragments = sequence.fragments();
    let ranges = frame_ranges(sequence.offset_table(), fragments, nr_frames, diagnostics)?;
    Ok(ranges
        .into_iter()
        .map(|range| fragments[range].concat())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::ValidationMode;
    use rstest::rstest;

    #[rustfmt::skip]
    const TWO_FRAMES_WITH_BOT: &[u8] = &[
        // Basic Offset Table with 2 entries
        0xFE, 0xFF, 0x00, 0xE0, 0x08, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x18, 0x00, 0x00, 0x00,
        // frame 1, in two fragments
        0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04,
        0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x05, 0x06, 0x07, 0x08,
        // frame 2
        0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, 0x09, 0x0A,
        // sequence delimiter
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    ];

    fn no_bot(fragments: &[&[u8]]) -> Vec<u8> {
        let mut out = vec![0xFE, 0xFF, 0x00, 0xE0, 0, 0, 0, 0];
        for fragment in fragments {
            out.extend(itemize_fragment(fragment));
        }
        out
    }

    #[test]
    fn read_frame_offsets() {
        let mut src = Cursor::new(TWO_FRAMES_WITH_BOT);
        assert_eq!(get_frame_offsets(&mut src).unwrap(), (true, vec![0, 24]));
        assert_eq!(src.position(), 16);

        let data = no_bot(&[]);
        let mut src = Cursor::new(&data[..]);
        assert_eq!(get_frame_offsets(&mut src).unwrap(), (false, vec![0]));
    }

    #[test]
    fn bad_offset_table() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0x06, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert!(matches!(
            get_frame_offsets(&mut Cursor::new(data)),
            Err(Error::OffsetTableLength { length: 6, .. })
        ));
        let data: &[u8] = &[0x08, 0x00, 0x10, 0x00, 0, 0, 0, 0];
        assert!(matches!(
            get_frame_offsets(&mut Cursor::new(data)),
            Err(Error::UnexpectedTag { position: 0, .. })
        ));
    }

    #[test]
    fn count_fragments() {
        let mut src = Cursor::new(TWO_FRAMES_WITH_BOT);
        src.set_position(16);
        assert_eq!(get_nr_fragments(&mut src).unwrap(), 3);
        assert_eq!(src.position(), 16);
    }

    #[test]
    fn fragments_stop_before_delimiter() {
        let mut src = Cursor::new(TWO_FRAMES_WITH_BOT);
        src.set_position(16);
        let fragments: Vec<_> = generate_pixel_data_fragment(&mut src)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            fragments,
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]
        );
        assert_eq!(src.position() as usize, TWO_FRAMES_WITH_BOT.len() - 8);
    }

    #[test]
    fn frames_follow_offset_table() {
        let mut diagnostics = Diagnostics::default();
        let frames = generate_pixel_data_frame(TWO_FRAMES_WITH_BOT, None, &mut diagnostics).unwrap();
        assert_eq!(frames, vec![vec![1, 2, 3, 4, 5, 6, 7, 8], vec![9, 10]]);
        assert!(diagnostics.is_empty());
    }

    #[rstest]
    #[case(None, 1, vec![vec![1, 2]])]
    #[case(Some(3), 3, vec![vec![1, 2], vec![3, 4], vec![5, 6]])]
    #[case(Some(1), 3, vec![vec![1, 2, 3, 4, 5, 6]])]
    fn frames_without_offset_table(
        #[case] nr_frames: Option<u32>,
        #[case] nr_fragments: usize,
        #[case] expected: Vec<Vec<u8>>,
    ) {
        let all: [&[u8]; 3] = [&[1, 2], &[3, 4], &[5, 6]];
        let data = no_bot(&all[..nr_fragments]);
        let mut diagnostics = Diagnostics::default();
        let frames = generate_pixel_data_frame(&data, nr_frames, &mut diagnostics).unwrap();
        assert_eq!(frames, expected);
    }

    #[test]
    fn frames_split_at_end_of_image() {
        let data = no_bot(&[&[0xFF, 0xD8, 1, 2, 0xFF, 0xD9], &[0xFF, 0xD8, 3, 4], &[5, 6, 0xFF, 0xD9]]);
        let mut diagnostics = Diagnostics::default();
        let frames = generate_pixel_data(&data, Some(2), &mut diagnostics).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 1);
        assert_eq!(frames[1].len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_end_of_image_is_reported() {
        let data = no_bot(&[&[1, 2], &[3, 4], &[5, 6]]);
        let mut diagnostics = Diagnostics::default();
        let frames = generate_pixel_data_frame(&data, Some(2), &mut diagnostics).unwrap();
        assert_eq!(frames, vec![vec![1, 2, 3, 4, 5, 6]]);
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::FrameBoundaries);

        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(matches!(
            generate_pixel_data_frame(&data, Some(2), &mut strict),
            Err(Error::NonConformant { .. })
        ));
    }

    #[test]
    fn unknown_frame_boundaries() {
        let mut diagnostics = Diagnostics::default();
        let data = no_bot(&[&[1, 2], &[3, 4]]);
        assert!(matches!(
            generate_pixel_data(&data, None, &mut diagnostics),
            Err(Error::UnknownFrameBoundaries { .. })
        ));
        assert!(matches!(
            generate_pixel_data(&data, Some(3), &mut diagnostics),
            Err(Error::FewerFragmentsThanFrames {
                fragments: 2,
                frames: 3,
                ..
            })
        ));
    }

    #[test]
    fn read_items() {
        let mut diagnostics = Diagnostics::default();
        assert_eq!(
            decode_data_sequence(TWO_FRAMES_WITH_BOT, &mut diagnostics).unwrap(),
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]
        );
        assert_eq!(
            defragment_data(TWO_FRAMES_WITH_BOT, &mut diagnostics).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
        );
        assert!(diagnostics.is_empty());

        let delimiter: &[u8] = &[0xFE, 0xFF, 0xDD, 0xE0, 0x02, 0x00, 0x00, 0x00];
        let mut src = delimiter;
        assert_eq!(read_item(&mut src, &mut diagnostics).unwrap(), None);
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::DelimiterLength);
    }

    #[rstest]
    #[case(5, 0, vec![6])]
    #[case(10, 4, vec![4, 4, 2])]
    #[case(9, 3, vec![2, 2, 2, 2, 2])]
    #[case(0, 4, vec![0])]
    fn fragment_sizes(#[case] len: usize, #[case] max: usize, #[case] sizes: Vec<usize>) {
        let frame: Vec<u8> = (0..len as u8).collect();
        let fragments = fragment_frame(&frame, max);
        assert_eq!(fragments.iter().map(Vec::len).collect::<Vec<_>>(), sizes);
        assert_eq!(&fragments.concat()[..len], &frame[..]);
    }

    #[test]
    fn encapsulate_with_offset_table() {
        let frames = vec![vec![1_u8, 2, 3], vec![4, 5, 6, 7]];
        let data = encapsulate(&frames, 0, true).unwrap();
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0x08, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x0C, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x04, 0x05, 0x06, 0x07,
        ];
        assert_eq!(data, expected);

        let mut diagnostics = Diagnostics::default();
        let decoded = generate_pixel_data_frame(&data, Some(2), &mut diagnostics).unwrap();
        assert_eq!(decoded, vec![vec![1, 2, 3, 0], vec![4, 5, 6, 7]]);
    }

    #[rstest]
    fn encapsulated_frames_are_recovered(
        #[values(1, 2, 10)] fragments_per_frame: usize,
        #[values(true, false)] has_bot: bool,
    ) {
        const FRAME_LEN: usize = 20;
        let max_fragment_size = FRAME_LEN / fragments_per_frame;
        let nr_frames = if has_bot { 3 } else { 1 };
        let frames: Vec<Vec<u8>> = (0..nr_frames)
            .map(|f| (0..FRAME_LEN).map(|i| (f * FRAME_LEN + i) as u8).collect())
            .collect();

        let data = encapsulate(&frames, max_fragment_size, has_bot).unwrap();

        let mut diagnostics = Diagnostics::default();
        let fragments = decode_data_sequence(&data, &mut diagnostics).unwrap();
        assert_eq!(fragments.len(), nr_frames * fragments_per_frame);

        let (bot, offsets) = get_frame_offsets(&mut Cursor::new(&data[..])).unwrap();
        assert_eq!(bot, has_bot);
        if has_bot {
            let frame_items_len = (fragments_per_frame * 8 + FRAME_LEN) as u32;
            assert_eq!(offsets, vec![0, frame_items_len, 2 * frame_items_len]);
            let decoded =
                generate_pixel_data_frame(&data, Some(nr_frames as u32), &mut diagnostics).unwrap();
            assert_eq!(decoded, frames);
        } else {
            assert_eq!(offsets, vec![0]);
            assert_eq!(defragment_data(&data, &mut diagnostics).unwrap(), frames[0]);
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn encapsulate_with_extended_offset_table() {
        let frames = vec![vec![1_u8, 2, 3], vec![4, 5, 6, 7]];
        let (data, offsets, lengths) = encapsulate_extended(&frames).unwrap();
        assert_eq!(&data[..8], &[0xFE, 0xFF, 0x00, 0xE0, 0, 0, 0, 0]);
        assert_eq!(data.len(), 8 + 12 + 12);
        assert_eq!(offsets, [0_u64.to_le_bytes(), 12_u64.to_le_bytes()].concat());
        assert_eq!(lengths, [3_u64.to_le_bytes(), 4_u64.to_le_bytes()].concat());
    }

    #[test]
    fn fragment_sequence_frames() {
        let frames = vec![vec![1_u8, 2, 3, 4, 5, 6], vec![7, 8]];
        let sequence = fragment_sequence(&frames, 4, true);
        assert_eq!(sequence.offset_table(), &[0, 22]);
        assert_eq!(sequence.fragments().len(), 3);

        let mut diagnostics = Diagnostics::default();
        assert_eq!(sequence_frames(&sequence, Some(2), &mut diagnostics).unwrap(), frames);

        let sequence = fragment_sequence(&frames, 0, false);
        assert!(sequence.offset_table().is_empty());
        assert_eq!(sequence_frames(&sequence, Some(2), &mut diagnostics).unwrap(), frames);
    }
}
