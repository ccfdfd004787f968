//! This module contains a mid-level abstraction for reading DICOM content
//! sequentially.
//!
//! The [`DataSetReader`] iterates over the data set as a stream of
//! [`DataToken`]s, keeping track of sequence and item boundaries,
//! the character sets in effect,
//! and the private creators of each level.
//! Recoverable framing problems are reported as conformance warnings
//! and read past.
use crate::dataset::scan::{self, read_undefined_length_value, DEFAULT_READ_SIZE};
use crate::dataset::{DataToken, SeqTokenType};
use crate::stateful::decode::{
    self, creator_of, offsets_from_bytes, StatefulDecoder, SPECIFIC_CHARACTER_SET,
};
use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, WarningKind};
use dcmcodec_core::header::{DataElementHeader, Header, Length};
use dcmcodec_core::value::C;
use dcmcodec_core::{CodecConfig, PrimitiveValue, Tag, VR};
use dcmcodec_dictionary_std::{dictionary_vr, private_dictionary_vr};
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::TransferSyntax;
use snafu::{Backtrace, ResultExt, Snafu};
use std::collections::{HashMap, VecDeque};
use std::io::{Read, Seek};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not read data element header"))]
    ReadHeader { source: decode::Error },
    #[snafu(display("Could not read item header"))]
    ReadItemHeader { source: decode::Error },
    #[snafu(display("Could not read value of element {}", tag))]
    ReadValue { tag: Tag, source: decode::Error },
    #[snafu(display(
        "Element {} at position {:#x} has an undefined length, but is not a sequence",
        tag,
        position
    ))]
    UndefinedLengthValue {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Could not read encapsulated pixel data {} at position {:#x}",
        tag,
        position
    ))]
    UndefinedLengthScan {
        tag: Tag,
        position: u64,
        source: scan::Error,
    },
    #[snafu(display("Non-conformant data set"))]
    Report { source: decode::Error },
    #[snafu(display("Could not reposition the data source"))]
    Reposition { source: decode::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A predicate on the header of a top level element.
/// When it holds, reading stops right before that element.
pub type StopPredicate = fn(Tag, VR, Length) -> bool;

/// How to read primitive values.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueReadStrategy {
    /// Values are converted according to their value representation.
    /// Numbers in text form and dates and times are parsed
    /// as the codec configuration says.
    #[default]
    Interpreted,
    /// Values are decoded,
    /// but numbers in text form and dates and times stay as text.
    Preserved,
    /// Values are kept as raw bytes.
    Raw,
}

/// The set of options for the data set reader.
#[derive(Debug, Copy, Clone)]
#[non_exhaustive]
pub struct DataSetReaderOptions {
    /// How primitive values are read
    pub value_read: ValueReadStrategy,
    /// Stop before the first top level element which satisfies this predicate
    pub stop_when: Option<StopPredicate>,
    /// Values longer than this many bytes are left in the source
    pub defer_size: Option<u32>,
    /// Whether UN is replaced by the dictionary VR in explicit VR data
    pub replace_un: bool,
    /// The position of the data set in the source
    pub base_offset: u64,
    /// The chunk size when searching for a delimiter
    pub read_size: usize,
}

impl Default for DataSetReaderOptions {
    fn default() -> Self {
        DataSetReaderOptions::from_config(&CodecConfig::default())
    }
}

impl DataSetReaderOptions {
    /// Options following the given codec configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        DataSetReaderOptions {
            value_read: ValueReadStrategy::Interpreted,
            stop_when: None,
            defer_size: config.defer_size,
            replace_un: config.replace_un_with_known_vr,
            base_offset: 0,
            read_size: DEFAULT_READ_SIZE,
        }
    }

    /// Replace the value reading strategy of the options.
    pub fn value_read(mut self, value_read: ValueReadStrategy) -> Self {
        self.value_read = value_read;
        self
    }

    /// Stop reading before the first top level element
    /// which satisfies the predicate.
    pub fn stop_when(mut self, predicate: StopPredicate) -> Self {
        self.stop_when = Some(predicate);
        self
    }

    /// Leave values longer than the given size in the source.
    pub fn defer_size(mut self, defer_size: Option<u32>) -> Self {
        self.defer_size = defer_size;
        self
    }

    /// Whether to replace UN with the dictionary VR.
    pub fn replace_un(mut self, replace_un: bool) -> Self {
        self.replace_un = replace_un;
        self
    }

    /// Set the position of the reader's source.
    pub fn base_offset(mut self, base_offset: u64) -> Self {
        self.base_offset = base_offset;
        self
    }

    /// Set the chunk size used when searching for a delimiter.
    pub fn read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size;
        self
    }
}

/// An open sequence or item.
#[derive(Debug)]
struct SeqToken {
    /// Whether it is the start of a sequence or the start of an item.
    typ: SeqTokenType,
    /// The length of the value, as indicated by the starting element,
    /// can be unknown.
    len: Length,
    /// The number of bytes read when this token was found.
    base_offset: u64,
    /// The VR mode to restore when the sequence ends.
    restore_explicit_vr: Option<bool>,
    /// The character sets of the enclosing data set.
    saved_charsets: Option<CharacterSets>,
}

/// What a single reading step produced.
enum Next {
    Token(DataToken),
    Skip,
    Done,
}

/// A higher-level reader, which iterates over the data set as a stream of
/// [`DataToken`]s, built on top of a [`StatefulDecoder`].
#[derive(Debug)]
pub struct DataSetReader<S> {
    /// the stateful decoder
    decoder: StatefulDecoder<S>,
    /// reader options
    options: DataSetReaderOptions,
    /// whether the reader is expecting an item header next (or a sequence delimiter)
    in_sequence: bool,
    /// whether a check for a sequence or item delimitation is pending
    delimiter_check_pending: bool,
    /// a stack of delimiters
    seq_delimiters: Vec<SeqToken>,
    /// the private creators of each data set level
    creators: Vec<HashMap<Tag, String>>,
    /// fuse the iteration process if true
    hard_break: bool,
    /// last decoded header
    last_header: Option<DataElementHeader>,
    /// tokens already read, waiting to be yielded
    pending: VecDeque<DataToken>,
}

impl<S> DataSetReader<S> {
    /// Create a new data set reader with the given decoder.
    pub fn new(decoder: StatefulDecoder<S>, options: DataSetReaderOptions) -> Self {
        DataSetReader {
            decoder,
            options,
            in_sequence: false,
            delimiter_check_pending: false,
            seq_delimiters: Vec::new(),
            creators: vec![HashMap::new()],
            hard_break: false,
            last_header: None,
            pending: VecDeque::new(),
        }
    }

    /// Create a new data set reader for the given transfer syntax,
    /// with the options of the codec configuration.
    pub fn new_with_ts(source: S, ts: &TransferSyntax, config: &CodecConfig) -> Self {
        Self::new_with_ts_options(source, ts, config, DataSetReaderOptions::from_config(config))
    }

    /// Create a new data set reader for the given transfer syntax
    /// with the given options.
    ///
    /// The source must be at the position given by `options.base_offset`.
    pub fn new_with_ts_options(
        source: S,
        ts: &TransferSyntax,
        config: &CodecConfig,
        options: DataSetReaderOptions,
    ) -> Self {
        let decoder = StatefulDecoder::new_at(source, ts, config, options.base_offset);
        Self::new(decoder, options)
    }

    /// The current position of the reader in the source.
    pub fn position(&self) -> u64 {
        self.decoder.position()
    }

    /// The conformance warnings collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.decoder.diagnostics()
    }

    /// Take the conformance warnings collected so far.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.decoder.take_diagnostics()
    }

    /// The character sets in effect at the current position.
    pub fn charsets(&self) -> &CharacterSets {
        self.decoder.charsets()
    }

    /// Unwrap the underlying decoder.
    pub fn into_decoder(self) -> StatefulDecoder<S> {
        self.decoder
    }
}

impl<S> Iterator for DataSetReader<S>
where
    S: Read + Seek,
{
    type Item = Result<DataToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }
        if self.hard_break {
            return None;
        }
        match self.step() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.hard_break = true;
                self.pending.pop_front().map(Ok)
            }
            Err(e) => {
                self.hard_break = true;
                Some(Err(e))
            }
        }
    }
}

impl<S> DataSetReader<S>
where
    S: Read + Seek,
{
    fn step(&mut self) -> Result<Option<DataToken>> {
        loop {
            if self.delimiter_check_pending {
                if let Some(token) = self.update_seq_delimiters()? {
                    return Ok(Some(token));
                }
            }

            let next = if self.in_sequence {
                self.read_item_header()?
            } else if let Some(header) = self.last_header.take() {
                let token = self.read_value_token(header)?;
                self.delimiter_check_pending = true;
                Next::Token(token)
            } else {
                self.read_element()?
            };

            match next {
                Next::Token(token) => return Ok(Some(token)),
                Next::Skip => continue,
                Next::Done => return Ok(None),
            }
        }
    }

    /// Read the next item header or sequence delimiter.
    fn read_item_header(&mut self) -> Result<Next> {
        let position = self.decoder.position();
        let (tag, len) = match self.decoder.decode_item_header() {
            Ok(out) => out,
            Err(e) if e.is_clean_eof() => {
                self.finish_at_eof()?;
                return Ok(Next::Done);
            }
            Err(e) => return Err(e).context(ReadItemHeaderSnafu),
        };

        match tag {
            Tag::ITEM => Ok(Next::Token(self.start_item(len))),
            Tag::SEQUENCE_DELIMITER => {
                if len.0 != 0 {
                    self.report(
                        ConformanceWarning::new(
                            WarningKind::DelimiterLength,
                            format!("Sequence delimiter with length {:#x}", len.0),
                        )
                        .at(position),
                    )?;
                }
                self.end_innermost();
                Ok(Next::Token(DataToken::SequenceEnd))
            }
            Tag::ITEM_DELIMITER => {
                self.report(
                    ConformanceWarning::new(
                        WarningKind::StrayDelimiter,
                        "Item delimiter outside of an item, skipping",
                    )
                    .at(position),
                )?;
                Ok(Next::Skip)
            }
            other => {
                self.report(
                    ConformanceWarning::new(
                        WarningKind::UnexpectedDelimiter,
                        format!("Expected an item, found {}; reading it as an item", other),
                    )
                    .with_tag(other)
                    .at(position),
                )?;
                Ok(Next::Token(self.start_item(len)))
            }
        }
    }

    /// Read the next data element header, at data set level.
    fn read_element(&mut self) -> Result<Next> {
        let start = self.decoder.position();
        let header = match self.decoder.decode_header() {
            Ok(header) => header,
            Err(e) if e.is_clean_eof() => {
                self.finish_at_eof()?;
                return Ok(Next::Done);
            }
            Err(e) => return Err(e).context(ReadHeaderSnafu),
        };

        match header.tag {
            Tag::ITEM_DELIMITER => return self.read_item_delimiter(header.len, start),
            Tag::SEQUENCE_DELIMITER => return self.read_misplaced_sequence_delimiter(start),
            Tag::ITEM => {
                self.report(
                    ConformanceWarning::new(
                        WarningKind::StrayDelimiter,
                        "Item header outside of a sequence, skipping",
                    )
                    .at(start),
                )?;
                return Ok(Next::Skip);
            }
            _ => {}
        }

        if self.seq_delimiters.is_empty() {
            if let Some(stop) = self.options.stop_when {
                if stop(header.tag, header.vr, header.len) {
                    tracing::debug!("Stopping before element {} at {:#x}", header.tag, start);
                    self.decoder.seek(start).context(RepositionSnafu)?;
                    return Ok(Next::Done);
                }
            }
        }

        let was_explicit_un = header.vr == VR::UN && self.decoder.is_explicit_vr();
        let header = self.resolve_vr(header);

        if header.vr == VR::SQ {
            let restore = if was_explicit_un {
                // the content of an explicit UN is always in implicit VR
                self.decoder.set_explicit_vr(false);
                Some(true)
            } else {
                None
            };
            return Ok(Next::Token(self.start_sequence(header.tag, header.len, restore)));
        }

        if header.is_encapsulated_pixeldata() {
            return self.read_pixel_sequence(header, start).map(Next::Token);
        }

        if header.len.is_undefined() {
            if header.vr == VR::UN {
                if self.decoder.is_explicit_vr() {
                    tracing::debug!(
                        "Reading UN element {} of undefined length as an implicit VR sequence",
                        header.tag
                    );
                    self.decoder.set_explicit_vr(false);
                    return Ok(Next::Token(self.start_sequence(
                        header.tag,
                        header.len,
                        Some(true),
                    )));
                }
                let is_item = self
                    .decoder
                    .peek_tag_is(Tag::ITEM)
                    .context(RepositionSnafu)?;
                let is_end = self
                    .decoder
                    .peek_tag_is(Tag::SEQUENCE_DELIMITER)
                    .context(RepositionSnafu)?;
                if is_item || is_end {
                    tracing::debug!(
                        "Element {} of undefined length is followed by {}, reading it as a sequence",
                        header.tag,
                        if is_item { "an item" } else { "a sequence delimiter" }
                    );
                    return Ok(Next::Token(self.start_sequence(header.tag, header.len, None)));
                }
            }
            return UndefinedLengthValueSnafu {
                tag: header.tag,
                position: start,
            }
            .fail();
        }

        self.last_header = Some(header);
        Ok(Next::Token(DataToken::ElementHeader(header)))
    }

    fn read_item_delimiter(&mut self, len: Length, position: u64) -> Result<Next> {
        let in_item = matches!(
            self.seq_delimiters.last(),
            Some(SeqToken {
                typ: SeqTokenType::Item,
                ..
            })
        );
        if !in_item {
            self.report(
                ConformanceWarning::new(
                    WarningKind::StrayDelimiter,
                    "Item delimiter outside of an item, skipping",
                )
                .at(position),
            )?;
            return Ok(Next::Skip);
        }
        if len.0 != 0 {
            self.report(
                ConformanceWarning::new(
                    WarningKind::DelimiterLength,
                    format!("Item delimiter with length {:#x}", len.0),
                )
                .at(position),
            )?;
        }
        self.end_innermost();
        Ok(Next::Token(DataToken::ItemEnd))
    }

    /// A sequence delimiter found where an element was expected
    /// closes the current item as well, if there is one.
    fn read_misplaced_sequence_delimiter(&mut self, position: u64) -> Result<Next> {
        let depth = self.seq_delimiters.len();
        let closes_item = depth >= 2
            && self.seq_delimiters[depth - 1].typ == SeqTokenType::Item
            && self.seq_delimiters[depth - 2].len.is_undefined();
        if !closes_item {
            self.report(
                ConformanceWarning::new(
                    WarningKind::StrayDelimiter,
                    "Sequence delimiter outside of a sequence, skipping",
                )
                .at(position),
            )?;
            return Ok(Next::Skip);
        }

        self.report(
            ConformanceWarning::new(
                WarningKind::UnexpectedDelimiter,
                "Sequence delimiter before the item delimiter, closing both",
            )
            .at(position),
        )?;
        self.end_innermost();
        self.end_innermost();
        self.pending.push_back(DataToken::SequenceEnd);
        Ok(Next::Token(DataToken::ItemEnd))
    }

    /// Resolve the VR of a header which the source left undetermined.
    fn resolve_vr(&self, header: DataElementHeader) -> DataElementHeader {
        if header.vr != VR::UN {
            return header;
        }
        let tag = header.tag;
        let explicit = self.decoder.is_explicit_vr();
        if explicit && !self.options.replace_un {
            return header;
        }

        let vr = if tag.is_private_creator() {
            Some(VR::LO)
        } else if tag.is_private() {
            tag.private_creator_tag()
                .and_then(|creator_tag| self.creators.last()?.get(&creator_tag))
                .and_then(|creator| private_dictionary_vr(tag, creator).ok())
        } else if explicit {
            Some(dictionary_vr(tag)).filter(|vr| *vr != VR::UN)
        } else {
            None
        };

        match vr {
            Some(vr) => {
                tracing::debug!("Element {} has VR UN, reading it as {}", tag, vr);
                DataElementHeader::new(tag, vr, header.len)
            }
            None => header,
        }
    }

    fn read_value_token(&mut self, header: DataElementHeader) -> Result<DataToken> {
        let tag = header.tag;
        if let (Some(limit), Some(len)) = (self.options.defer_size, header.len.get()) {
            let needed_now = tag.is_private_creator() || tag == SPECIFIC_CHARACTER_SET;
            if len > limit && !needed_now {
                let offset = self.decoder.position();
                self.decoder
                    .skip_bytes(len)
                    .context(ReadValueSnafu { tag })?;
                return Ok(DataToken::DeferredValue { header, offset });
            }
        }

        let value = match self.options.value_read {
            ValueReadStrategy::Interpreted => self.decoder.read_value(&header),
            ValueReadStrategy::Preserved => self.decoder.read_value_preserved(&header),
            ValueReadStrategy::Raw => self
                .decoder
                .read_value_bytes(&header)
                .map(|bytes| PrimitiveValue::U8(C::from_vec(bytes))),
        }
        .context(ReadValueSnafu { tag })?;

        if tag.is_private_creator() {
            if let (Some(creator), Some(level)) = (creator_of(&value), self.creators.last_mut()) {
                level.insert(tag, creator);
            }
        }
        Ok(DataToken::PrimitiveValue(value))
    }

    /// Read a whole encapsulated pixel data element.
    ///
    /// The fragments are first read item by item.
    /// Should that fail,
    /// the value is taken as raw bytes up to the sequence delimiter.
    fn read_pixel_sequence(&mut self, header: DataElementHeader, start: u64) -> Result<DataToken> {
        let tag = header.tag;
        let after_header = self.decoder.position();
        match self.scan_fragments() {
            Ok(fragments) => {
                let EncapsulatedFragments {
                    offset_table,
                    fragments,
                    odd_delimiter,
                } = fragments;
                if let Some((position, len)) = odd_delimiter {
                    self.report(
                        ConformanceWarning::new(
                            WarningKind::DelimiterLength,
                            format!("Sequence delimiter with length {:#x}", len),
                        )
                        .with_tag(tag)
                        .at(position),
                    )?;
                }
                if let Some(offset_table) = offset_table {
                    self.pending.push_back(DataToken::OffsetTable(offset_table));
                }
                self.pending
                    .extend(fragments.into_iter().map(DataToken::ItemValue));
                self.pending.push_back(DataToken::SequenceEnd);
                self.delimiter_check_pending = true;
                Ok(DataToken::PixelSequenceStart { tag })
            }
            Err(reason) => {
                tracing::debug!(
                    "Could not read the fragments of {}: {}; searching for the sequence delimiter",
                    tag,
                    reason
                );
                self.decoder.seek(after_header).context(RepositionSnafu)?;
                let read_size = self.options.read_size;
                let scanned = read_undefined_length_value(
                    self.decoder.stream_mut(),
                    Tag::SEQUENCE_DELIMITER,
                    read_size,
                    false,
                )
                .context(UndefinedLengthScanSnafu {
                    tag,
                    position: start,
                })?;
                if scanned.delimiter_len != 0 {
                    self.report(
                        ConformanceWarning::new(
                            WarningKind::DelimiterLength,
                            format!("Sequence delimiter with length {:#x}", scanned.delimiter_len),
                        )
                        .with_tag(tag)
                        .at(scanned.delimiter_position),
                    )?;
                }
                let bytes = scanned.bytes.unwrap_or_default();

                self.report(
                    ConformanceWarning::new(
                        WarningKind::InvalidValue,
                        format!(
                            "Encapsulated pixel data is not a valid item sequence ({}), keeping {} raw bytes",
                            reason,
                            bytes.len()
                        ),
                    )
                    .with_tag(tag)
                    .at(start),
                )?;
                self.pending
                    .push_back(DataToken::PrimitiveValue(PrimitiveValue::U8(C::from_vec(bytes))));
                self.delimiter_check_pending = true;
                Ok(DataToken::ElementHeader(DataElementHeader::new(
                    tag,
                    VR::OB,
                    Length::UNDEFINED,
                )))
            }
        }
    }

    /// Read the items of a pixel sequence,
    /// failing on anything but items of defined length
    /// and the final sequence delimiter.
    fn scan_fragments(&mut self) -> std::result::Result<EncapsulatedFragments, String> {
        let end = self.decoder.source_len().map_err(|e| e.to_string())?;
        let mut out = EncapsulatedFragments {
            offset_table: None,
            fragments: Vec::new(),
            odd_delimiter: None,
        };
        loop {
            let position = self.decoder.position();
            let (tag, len) = self
                .decoder
                .decode_item_header()
                .map_err(|e| e.to_string())?;
            match tag {
                Tag::ITEM => {
                    let len = len
                        .get()
                        .ok_or_else(|| format!("item at {:#x} has undefined length", position))?;
                    if self.decoder.position() + u64::from(len) > end {
                        return Err(format!(
                            "item at {:#x} of length {} goes past the end of the data",
                            position, len
                        ));
                    }
                    let mut data = Vec::with_capacity(len as usize);
                    self.decoder
                        .read_to_vec(len, &mut data)
                        .map_err(|e| e.to_string())?;
                    if out.offset_table.is_none() {
                        if len % 4 != 0 {
                            return Err(format!(
                                "basic offset table length {} is not a multiple of 4",
                                len
                            ));
                        }
                        out.offset_table = Some(offsets_from_bytes(&data, self.decoder.endianness()));
                    } else {
                        out.fragments.push(data);
                    }
                }
                Tag::SEQUENCE_DELIMITER => {
                    if len.0 != 0 {
                        out.odd_delimiter = Some((position, len.0));
                    }
                    return Ok(out);
                }
                other => {
                    return Err(format!("unexpected tag {} at {:#x}", other, position));
                }
            }
        }
    }

    fn start_sequence(&mut self, tag: Tag, len: Length, restore: Option<bool>) -> DataToken {
        self.in_sequence = true;
        self.seq_delimiters.push(SeqToken {
            typ: SeqTokenType::Sequence,
            len,
            base_offset: self.decoder.position(),
            restore_explicit_vr: restore,
            saved_charsets: None,
        });
        self.delimiter_check_pending = true;
        DataToken::SequenceStart { tag, len }
    }

    fn start_item(&mut self, len: Length) -> DataToken {
        self.in_sequence = false;
        self.seq_delimiters.push(SeqToken {
            typ: SeqTokenType::Item,
            len,
            base_offset: self.decoder.position(),
            restore_explicit_vr: None,
            saved_charsets: Some(self.decoder.charsets().clone()),
        });
        self.creators.push(HashMap::new());
        self.delimiter_check_pending = true;
        DataToken::ItemStart { len }
    }

    /// Close the innermost sequence or item,
    /// restoring the state of the enclosing level.
    fn end_innermost(&mut self) {
        if let Some(token) = self.seq_delimiters.pop() {
            match token.typ {
                SeqTokenType::Item => {
                    if let Some(charsets) = token.saved_charsets {
                        self.decoder.set_charsets(charsets);
                    }
                    if self.creators.len() > 1 {
                        self.creators.pop();
                    }
                    self.in_sequence = true;
                }
                SeqTokenType::Sequence => {
                    if let Some(explicit_vr) = token.restore_explicit_vr {
                        self.decoder.set_explicit_vr(explicit_vr);
                    }
                    self.in_sequence = false;
                }
            }
        }
        self.delimiter_check_pending = true;
    }

    /// Close the innermost sequence or item
    /// if the reader went through all of its defined length.
    fn update_seq_delimiters(&mut self) -> Result<Option<DataToken>> {
        if let Some(sd) = self.seq_delimiters.last() {
            if let Some(len) = sd.len.get() {
                let end_of_sequence = sd.base_offset + u64::from(len);
                let position = self.decoder.position();
                if position >= end_of_sequence {
                    let typ = sd.typ;
                    if position > end_of_sequence {
                        self.report(
                            ConformanceWarning::new(
                                WarningKind::UnexpectedDelimiter,
                                format!(
                                    "{:?} of length {} ended {} bytes past its end",
                                    typ,
                                    len,
                                    position - end_of_sequence
                                ),
                            )
                            .at(position),
                        )?;
                    }
                    self.end_innermost();
                    let token = match typ {
                        SeqTokenType::Sequence => DataToken::SequenceEnd,
                        SeqTokenType::Item => DataToken::ItemEnd,
                    };
                    return Ok(Some(token));
                }
            }
        }
        self.delimiter_check_pending = false;
        Ok(None)
    }

    /// Close whatever is still open at the end of the data.
    fn finish_at_eof(&mut self) -> Result<()> {
        if self.seq_delimiters.is_empty() {
            return Ok(());
        }
        let position = self.decoder.position();
        self.report(
            ConformanceWarning::new(
                WarningKind::UnexpectedDelimiter,
                format!(
                    "Data ended with {} sequences or items left open",
                    self.seq_delimiters.len()
                ),
            )
            .at(position),
        )?;
        while let Some(token) = self.seq_delimiters.last() {
            let end = match token.typ {
                SeqTokenType::Sequence => DataToken::SequenceEnd,
                SeqTokenType::Item => DataToken::ItemEnd,
            };
            self.end_innermost();
            self.pending.push_back(end);
        }
        Ok(())
    }

    fn report(&mut self, warning: ConformanceWarning) -> Result<()> {
        self.decoder.report(warning).context(ReportSnafu)
    }
}

/// The content of a well-formed pixel sequence.
struct EncapsulatedFragments {
    offset_table: Option<C<u32>>,
    fragments: Vec<Vec<u8>>,
    /// position and length of a sequence delimiter with a non-zero length
    odd_delimiter: Option<(u64, u32)>,
}
