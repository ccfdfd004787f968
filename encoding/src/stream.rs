//! A byte stream wrapper which knows how the data in it is encoded.
//!
//! [`ByteStream`] wraps a byte source (or sink)
//! together with a byte order and whether value representations are explicit.
//! Changing either property rebinds the header codec and the basic
//! number codec used by the stream,
//! so that subsequent reads and writes follow the new encoding.
use crate::decode::basic::BasicDecoder;
use crate::decode::{self, BasicDecode, Decode, HeaderDecoder};
use crate::encode::basic::BasicEncoder;
use crate::encode::{BasicEncode, HeaderEncoder};
use byteordered::Endianness;
use dcmcodec_core::header::{DataElementHeader, SequenceItemHeader};
use dcmcodec_core::Tag;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// The number of extra attempts made to fill an exact-length read
/// before giving up on the source.
pub const EXACT_READ_RETRIES: usize = 3;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The source ran out of data before the requested length was read.
    #[snafu(display(
        "Unexpected end of data: read {} of {} bytes expected, starting at position {:#x}",
        read,
        expected,
        position
    ))]
    UnexpectedEof {
        position: u64,
        expected: usize,
        read: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read from source at position {:#x}", position))]
    ReadSource {
        position: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write to sink at position {:#x}", position))]
    WriteSink {
        position: u64,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not seek to {:?}", target))]
    SeekSource {
        target: SeekFrom,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode header at position {:#x}", position))]
    DecodeHeader {
        position: u64,
        #[snafu(backtrace)]
        source: decode::Error,
    },
}

impl Error {
    /// The number of bytes missing from an exact read, if that was the cause.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            Error::UnexpectedEof { expected, read, .. } => Some(expected - read),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A byte source or sink with a known encoding.
#[derive(Debug)]
pub struct ByteStream<S> {
    inner: S,
    position: u64,
    explicit_vr: bool,
    basic_decoder: BasicDecoder,
    basic_encoder: BasicEncoder,
    header_decoder: HeaderDecoder,
    header_encoder: HeaderEncoder,
}

impl<S> ByteStream<S> {
    /// Wrap a source or sink, starting at position 0.
    pub fn new(inner: S, endianness: Endianness, explicit_vr: bool) -> Self {
        Self::new_at(inner, endianness, explicit_vr, 0)
    }

    /// Wrap a source or sink which is already at the given position.
    pub fn new_at(inner: S, endianness: Endianness, explicit_vr: bool, position: u64) -> Self {
        ByteStream {
            inner,
            position,
            explicit_vr,
            basic_decoder: BasicDecoder::new(endianness),
            basic_encoder: BasicEncoder::new(endianness),
            header_decoder: HeaderDecoder::new(endianness, explicit_vr),
            header_encoder: HeaderEncoder::new(endianness, explicit_vr),
        }
    }

    /// The byte order of the data.
    pub fn endianness(&self) -> Endianness {
        self.basic_decoder.endianness()
    }

    /// Whether value representations are explicit in element headers.
    pub fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Change the byte order of subsequent reads and writes.
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.basic_decoder = BasicDecoder::new(endianness);
        self.basic_encoder = BasicEncoder::new(endianness);
        self.rebind_headers();
    }

    /// Change whether subsequent element headers have an explicit VR.
    pub fn set_explicit_vr(&mut self, explicit_vr: bool) {
        self.explicit_vr = explicit_vr;
        self.rebind_headers();
    }

    fn rebind_headers(&mut self) {
        let endianness = self.endianness();
        self.header_decoder = HeaderDecoder::new(endianness, self.explicit_vr);
        self.header_encoder = HeaderEncoder::new(endianness, self.explicit_vr);
    }

    /// The header decoder currently bound to the stream.
    pub fn header_decoder(&self) -> &HeaderDecoder {
        &self.header_decoder
    }

    /// The header encoder currently bound to the stream.
    pub fn header_encoder(&self) -> &HeaderEncoder {
        &self.header_encoder
    }

    /// The current byte position, relative to the start of the stream.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Retrieve a reference to the underlying source or sink.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Retrieve a mutable reference to the underlying source or sink.
    ///
    /// The tracked position is not updated by operations
    /// done directly on the inner value.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap the underlying source or sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> ByteStream<S>
where
    S: Read,
{
    /// Read as many bytes as the source provides in one pass,
    /// up to the length of the buffer.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(e).context(ReadSourceSnafu {
                        position: self.position + filled as u64,
                    })
                }
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read up to `length` bytes.
    ///
    /// When `need_exact_length` is set
    /// and the source returns fewer bytes than requested,
    /// as may happen with network streams,
    /// reading is attempted again up to [`EXACT_READ_RETRIES`] times
    /// before failing with [`Error::UnexpectedEof`].
    pub fn read(&mut self, length: usize, need_exact_length: bool) -> Result<Vec<u8>> {
        let start = self.position;
        let mut buf = vec![0u8; length];
        let mut filled = self.fill(&mut buf)?;
        if need_exact_length {
            let mut attempts = 0;
            while filled < length && attempts < EXACT_READ_RETRIES {
                filled += self.fill(&mut buf[filled..])?;
                attempts += 1;
            }
            if filled < length {
                return UnexpectedEofSnafu {
                    position: start,
                    expected: length,
                    read: filled,
                }
                .fail();
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    /// Fill the whole buffer, with the same retry policy as [`read`](Self::read).
    pub fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.position;
        let mut filled = self.fill(buf)?;
        let mut attempts = 0;
        while filled < buf.len() && attempts < EXACT_READ_RETRIES {
            filled += self.fill(&mut buf[filled..])?;
            attempts += 1;
        }
        if filled < buf.len() {
            return UnexpectedEofSnafu {
                position: start,
                expected: buf.len(),
                read: filled,
            }
            .fail();
        }
        Ok(())
    }

    /// Read an attribute tag in the stream's byte order.
    pub fn read_tag(&mut self) -> Result<Tag> {
        let mut buf = [0u8; 4];
        self.read_exact_into(&mut buf)?;
        let position = self.position;
        self.basic_decoder
            .decode_tag(&buf[..])
            .context(ReadSourceSnafu { position })
    }

    /// Read an unsigned short in the stream's byte order.
    pub fn read_us(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_into(&mut buf)?;
        let position = self.position;
        self.basic_decoder
            .decode_us(&buf[..])
            .context(ReadSourceSnafu { position })
    }

    /// Read an unsigned long in the stream's byte order.
    pub fn read_ul(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_into(&mut buf)?;
        let position = self.position;
        self.basic_decoder
            .decode_ul(&buf[..])
            .context(ReadSourceSnafu { position })
    }

    /// Read the header of the next data element
    /// with the currently bound header decoder.
    ///
    /// Returns the header and the number of bytes it took.
    pub fn read_header(&mut self) -> Result<(DataElementHeader, usize)> {
        let position = self.position;
        let decoder = self.header_decoder.clone();
        let mut counter = CountingReader::new(&mut self.inner);
        let out = decoder.decode_header(&mut counter);
        self.position += counter.count;
        out.context(DecodeHeaderSnafu { position })
    }

    /// Read the header of the next sequence item or delimiter.
    pub fn read_item_header(&mut self) -> Result<SequenceItemHeader> {
        let position = self.position;
        let decoder = self.header_decoder.clone();
        let mut counter = CountingReader::new(&mut self.inner);
        let out = decoder.decode_item_header(&mut counter);
        self.position += counter.count;
        out.context(DecodeHeaderSnafu { position })
    }

    /// Read and discard the given number of bytes.
    pub fn skip(&mut self, length: u64) -> Result<()> {
        let start = self.position;
        let copied = io::copy(&mut (&mut self.inner).take(length), &mut io::sink())
            .context(ReadSourceSnafu { position: start })?;
        self.position += copied;
        if copied < length {
            return UnexpectedEofSnafu {
                position: start,
                expected: length as usize,
                read: copied as usize,
            }
            .fail();
        }
        Ok(())
    }
}

impl<S> ByteStream<S>
where
    S: Read + Seek,
{
    /// Move to another position in the stream.
    ///
    /// Positions are relative to the start of the wrapped stream
    /// as recorded when the wrapper was created.
    pub fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        let pos = self
            .inner
            .seek(target)
            .context(SeekSourceSnafu { target })?;
        self.position = pos;
        Ok(pos)
    }

    /// Read the next bytes without consuming them.
    /// Returns fewer bytes if the stream ends first.
    pub fn peek(&mut self, length: usize) -> Result<Vec<u8>> {
        let start = self.position;
        let bytes = self.read(length, false)?;
        self.seek(SeekFrom::Start(start))?;
        Ok(bytes)
    }

    /// Check whether the next 4 bytes are the given tag,
    /// without consuming them.
    pub fn peek_tag_is(&mut self, tag: Tag) -> Result<bool> {
        let bytes = self.peek(4)?;
        if bytes.len() < 4 {
            return Ok(false);
        }
        let position = self.position;
        let next = self
            .basic_decoder
            .decode_tag(&bytes[..])
            .context(ReadSourceSnafu { position })?;
        Ok(next == tag)
    }
}

impl<S> ByteStream<S>
where
    S: Write,
{
    /// Write all bytes to the sink.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let position = self.position;
        self.inner
            .write_all(bytes)
            .context(WriteSinkSnafu { position })?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Write an attribute tag in the stream's byte order.
    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        let mut buf = [0u8; 4];
        let position = self.position;
        self.basic_encoder
            .encode_tag(&mut buf[..], tag)
            .context(WriteSinkSnafu { position })?;
        self.write_bytes(&buf)
    }

    /// Write an unsigned short in the stream's byte order.
    pub fn write_us(&mut self, value: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        let position = self.position;
        self.basic_encoder
            .encode_us(&mut buf[..], value)
            .context(WriteSinkSnafu { position })?;
        self.write_bytes(&buf)
    }

    /// Write an unsigned long in the stream's byte order.
    pub fn write_ul(&mut self, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        let position = self.position;
        self.basic_encoder
            .encode_ul(&mut buf[..], value)
            .context(WriteSinkSnafu { position })?;
        self.write_bytes(&buf)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        let position = self.position;
        self.inner.flush().context(WriteSinkSnafu { position })
    }
}

impl<S: Read> Read for ByteStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<S: Write> Write for ByteStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A reader adapter which counts the bytes read through it.
#[derive(Debug)]
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        CountingReader { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
