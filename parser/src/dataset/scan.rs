//! Searching the raw byte stream for a delimiter,
//! for values whose length is not known in advance.
use dcmcodec_core::Tag;
use dcmcodec_encoding::stream::{self, ByteStream};
use dcmcodec_encoding::Endianness;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{Read, Seek, SeekFrom};

/// The number of bytes read at a time by default.
pub const DEFAULT_READ_SIZE: usize = 8192;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not read data while searching for {}", delimiter))]
    ReadChunk {
        delimiter: Tag,
        source: stream::Error,
    },
    #[snafu(display(
        "End of data reached before finding {}, searching from position {:#x}",
        delimiter,
        position
    ))]
    DelimiterNotFound {
        delimiter: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not move past the delimiter at position {:#x}", position))]
    SkipDelimiter {
        position: u64,
        source: stream::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A value of undefined length found by [`read_undefined_length_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedValue {
    /// The bytes before the delimiter,
    /// or `None` if the value was deferred.
    pub bytes: Option<Vec<u8>>,
    /// The position of the delimiter tag.
    pub delimiter_position: u64,
    /// The length found after the delimiter tag,
    /// which should be zero.
    pub delimiter_len: u32,
}

/// Read a value of undefined length,
/// up to the first occurrence of the `delimiter` tag in the raw bytes.
///
/// The data is read `read_size` bytes at a time,
/// and the delimiter may span the boundary between two reads.
/// On success, the stream is left right after the delimiter
/// and its 4-byte length.
/// The delimiter length is returned as found,
/// for the caller to report a non-zero length.
///
/// If `defer` is set, nothing is kept in memory.
/// Reaching the end of the data before the delimiter is an error.
pub fn read_undefined_length_value<S>(
    stream: &mut ByteStream<S>,
    delimiter: Tag,
    read_size: usize,
    defer: bool,
) -> Result<ScannedValue>
where
    S: Read + Seek,
{
    let pattern = tag_bytes(delimiter, stream.endianness());
    let read_size = read_size.max(pattern.len());
    let start = stream.position();

    let mut value = Vec::new();
    // trailing bytes of the previous chunk, where a split delimiter may begin
    let mut carry: Vec<u8> = Vec::with_capacity(pattern.len() - 1);
    let mut consumed = start;

    let found_at = loop {
        let chunk = stream
            .read(read_size, false)
            .context(ReadChunkSnafu { delimiter })?;
        if chunk.is_empty() {
            return DelimiterNotFoundSnafu {
                delimiter,
                position: start,
            }
            .fail();
        }

        let window_start = consumed - carry.len() as u64;
        let mut window = std::mem::take(&mut carry);
        window.extend_from_slice(&chunk);
        consumed += chunk.len() as u64;
        if !defer {
            value.extend_from_slice(&chunk);
        }

        if let Some(i) = window.windows(pattern.len()).position(|w| w == pattern) {
            break window_start + i as u64;
        }

        let keep = window.len().min(pattern.len() - 1);
        carry.extend_from_slice(&window[window.len() - keep..]);
    };

    let after_tag = found_at + pattern.len() as u64;
    stream
        .seek(SeekFrom::Start(after_tag))
        .context(SkipDelimiterSnafu { position: found_at })?;
    let delimiter_len = stream
        .read_ul()
        .context(SkipDelimiterSnafu { position: found_at })?;

    let bytes = if defer {
        None
    } else {
        value.truncate((found_at - start) as usize);
        Some(value)
    };
    Ok(ScannedValue {
        bytes,
        delimiter_position: found_at,
        delimiter_len,
    })
}

fn tag_bytes(tag: Tag, endianness: Endianness) -> [u8; 4] {
    let (g, e) = match endianness {
        Endianness::Little => (tag.group().to_le_bytes(), tag.element().to_le_bytes()),
        Endianness::Big => (tag.group().to_be_bytes(), tag.element().to_be_bytes()),
    };
    [g[0], g[1], e[0], e[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rustfmt::skip]
    static DATA: &[u8] = &[
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        0x09, 0x0A, 0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00,
        0x00, 0x00, 0xAA, 0xBB,
    ];

    #[rstest]
    #[case(4)]
    #[case(5)]
    #[case(11)]
    #[case(12)]
    #[case(128)]
    fn find_delimiter_across_chunks(#[case] read_size: usize) {
        let mut stream = ByteStream::new(Cursor::new(DATA), Endianness::Little, true);
        let value =
            read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, read_size, false)
                .unwrap();
        assert_eq!(value.bytes.as_deref(), Some(&DATA[..10]));
        assert_eq!(value.delimiter_position, 10);
        assert_eq!(value.delimiter_len, 0);
        assert_eq!(stream.position(), 18);
        assert_eq!(stream.read(2, true).unwrap(), vec![0xAA, 0xBB]);
    }

    #[test]
    fn deferred_search_keeps_nothing() {
        let mut stream = ByteStream::new(Cursor::new(DATA), Endianness::Little, true);
        let value =
            read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, 3, true).unwrap();
        assert_eq!(value.bytes, None);
        assert_eq!(stream.position(), 18);
    }

    #[test]
    fn search_from_the_middle() {
        let mut cursor = Cursor::new(DATA);
        cursor.set_position(4);
        let mut stream = ByteStream::new_at(cursor, Endianness::Little, true, 4);
        let value =
            read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, 8, false).unwrap();
        assert_eq!(value.bytes.as_deref(), Some(&DATA[4..10]));
    }

    #[test]
    fn big_endian_delimiter() {
        let data = [0x01, 0x02, 0xFF, 0xFE, 0xE0, 0xDD, 0, 0, 0, 0];
        let mut stream = ByteStream::new(Cursor::new(&data[..]), Endianness::Big, true);
        let value =
            read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, 4, false).unwrap();
        assert_eq!(value.bytes, Some(vec![0x01, 0x02]));
    }

    #[test]
    fn delimiter_length_is_returned() {
        let data = [0x01, 0x02, 0xFE, 0xFF, 0xDD, 0xE0, 0x04, 0, 0, 0];
        let mut stream = ByteStream::new(Cursor::new(&data[..]), Endianness::Little, true);
        let value =
            read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, 4, false).unwrap();
        assert_eq!(
            value,
            ScannedValue {
                bytes: Some(vec![0x01, 0x02]),
                delimiter_position: 2,
                delimiter_len: 4,
            }
        );
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn missing_delimiter_is_an_error() {
        let mut stream = ByteStream::new(Cursor::new(&DATA[..10]), Endianness::Little, true);
        let err = read_undefined_length_value(&mut stream, Tag::SEQUENCE_DELIMITER, 4, false)
            .unwrap_err();
        assert!(matches!(err, Error::DelimiterNotFound { position: 0, .. }));
    }
}
