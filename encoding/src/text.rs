//! Text encoding and decoding in DICOM data sets,
//! with support for the character repertoires
//! named by the Specific Character Set (0008,0005) attribute.
//!
//! The Character Repertoires supported here are:
//! - ISO 8859 (parts 1 to 8, plus ISO-IR 148 and ISO-IR 166)
//! - JIS X 0201 (ISO-IR 13), JIS X 0208 (ISO-IR 87)
//!   and JIS X 0212 (ISO-IR 159)
//! - KS X 1001 (ISO-IR 149) for Korean
//! - GB 2312 (ISO-IR 58), GBK and GB 18030
//! - ISO 10646 in UTF-8 (ISO-IR 192)
//!
//! A single [`SpecificCharacterSet`] is a [`TextCodec`].
//! When the attribute has more than one value,
//! code extension techniques come into play:
//! [`CharacterSets`] follows the ISO 2022 escape sequences in the byte stream
//! and resets the active code page after every delimiter.

use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, NonConformantError, WarningKind};
use encoding::all::{
    GB18030, GBK, ISO_2022_JP, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5,
    ISO_8859_6, ISO_8859_7, ISO_8859_8, UTF_8, WINDOWS_1254, WINDOWS_31J, WINDOWS_874,
    WINDOWS_949,
};
use encoding::{DecoderTrap, EncoderTrap, EncodingRef};
use smallvec::{smallvec, SmallVec};
use snafu::{Backtrace, ResultExt, Snafu};
use std::borrow::Cow;
use std::fmt;

/// The escape character which starts an ISO 2022 escape sequence.
pub const ESC: u8 = 0x1b;

/// Delimiters which reset the active code page in text values.
pub const TEXT_DELIMITERS: &[u8] = b"\r\n\t\x0c";

/// Delimiters which reset the active code page in person names.
pub const PN_DELIMITERS: &[u8] = b"\r\n\t\x0c^=";

/// An error type for text encoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    EncodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
    /// The text could not be encoded with any of the character sets
    /// and the validation mode does not allow replacement characters.
    #[snafu(display("Cannot encode text with the active character sets"))]
    EncodeNonConformant {
        /// the reported warning
        source: NonConformantError,
    },
}

/// An error type for text decoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    DecodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
    /// The text could not be decoded
    /// and the validation mode does not allow replacement characters.
    #[snafu(display("Cannot decode text with the active character sets"))]
    DecodeNonConformant {
        /// the reported warning
        source: NonConformantError,
    },
}

type EncodeResult<T> = Result<T, EncodeTextError>;
type DecodeResult<T> = Result<T, DecodeTextError>;

/// A holder of encoding and decoding mechanisms for text in DICOM content,
/// which according to the standard, depends on the specific character set.
pub trait TextCodec {
    /// Obtain the defined term (unique name) of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008, 0005) element to refer to this codec.
    ///
    /// Should contain no leading or trailing spaces.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting string
    /// _may_ contain backslash characters ('\') to delimit individual values,
    /// and should be split later on if required.
    fn decode(&self, text: &[u8]) -> DecodeResult<String>;

    /// Encode a text value into a byte vector. The input string can
    /// feature multiple text values by using the backslash character ('\')
    /// as the value delimiter.
    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>>;
}

impl<T: ?Sized> TextCodec for &T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        (**self).decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        (**self).encode(text)
    }
}

/// An enum type for all supported character sets.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SpecificCharacterSet {
    /// **ISO-IR 6**: the default character set.
    #[default]
    Default,
    /// **ISO-IR 13**: the JIS X 0201 Katakana and Romaji character set.
    IsoIr13,
    /// **ISO-IR 100** (ISO-8859-1): Right-hand part of the Latin alphabet no. 1,
    /// the Western Europe character set.
    IsoIr100,
    /// **ISO-IR 101** (ISO-8859-2): Right-hand part of the Latin alphabet no. 2,
    /// the Central/Eastern Europe character set.
    IsoIr101,
    /// **ISO-IR 109** (ISO-8859-3): Right-hand part of the Latin alphabet no. 3,
    /// the South Europe character set.
    IsoIr109,
    /// **ISO-IR 110** (ISO-8859-4): Right-hand part of the Latin alphabet no. 4,
    /// the North Europe character set.
    IsoIr110,
    /// **ISO-IR 126** (ISO-8859-7): The Latin/Greek character set.
    IsoIr126,
    /// **ISO-IR 127** (ISO-8859-6): The Latin/Arabic character set.
    IsoIr127,
    /// **ISO-IR 138** (ISO-8859-8): The Latin/Hebrew character set.
    IsoIr138,
    /// **ISO-IR 144** (ISO-8859-5): The Latin/Cyrillic character set.
    IsoIr144,
    /// **ISO-IR 148** (ISO-8859-9): The Latin alphabet no. 5, for Turkish.
    IsoIr148,
    /// **ISO-IR 166** (TIS 620-2533): The Thai character set.
    IsoIr166,
    /// **ISO-IR 192**: The Unicode character set based on the UTF-8 encoding.
    IsoIr192,
    /// **GB18030**: The Simplified Chinese character set.
    Gb18030,
    /// **GBK**: The Simplified Chinese character set, GB 2312 extended.
    Gbk,
    /// **ISO 2022 IR 87**: JIS X 0208, the Japanese Kanji character set.
    IsoIr87,
    /// **ISO 2022 IR 159**: JIS X 0212, the supplementary Kanji character set.
    IsoIr159,
    /// **ISO 2022 IR 149**: KS X 1001, the Korean character set.
    IsoIr149,
    /// **ISO 2022 IR 58**: GB 2312, the Simplified Chinese character set.
    IsoIr58,
}

impl SpecificCharacterSet {
    /// Obtain the specific character set identified by the given code string.
    ///
    /// Supported code strings include the possible values
    /// in the respective DICOM element (0008, 0005).
    ///
    /// # Example
    ///
    /// ```
    /// # use dcmcodec_encoding::text::SpecificCharacterSet;
    /// let character_set = SpecificCharacterSet::from_code("ISO_IR 100");
    /// assert_eq!(character_set, Some(SpecificCharacterSet::IsoIr100));
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim_matches(|c: char| c == ' ' || c == '\0') {
            "" | "Default" | "ISO_IR 6" | "ISO 2022 IR 6" => Some(Default),
            "ISO_IR 13" | "ISO 2022 IR 13" => Some(IsoIr13),
            "ISO_IR 100" | "ISO 2022 IR 100" => Some(IsoIr100),
            "ISO_IR 101" | "ISO 2022 IR 101" => Some(IsoIr101),
            "ISO_IR 109" | "ISO 2022 IR 109" => Some(IsoIr109),
            "ISO_IR 110" | "ISO 2022 IR 110" => Some(IsoIr110),
            "ISO_IR 126" | "ISO 2022 IR 126" => Some(IsoIr126),
            "ISO_IR 127" | "ISO 2022 IR 127" => Some(IsoIr127),
            "ISO_IR 138" | "ISO 2022 IR 138" => Some(IsoIr138),
            "ISO_IR 144" | "ISO 2022 IR 144" => Some(IsoIr144),
            "ISO_IR 148" | "ISO 2022 IR 148" => Some(IsoIr148),
            "ISO_IR 166" | "ISO 2022 IR 166" => Some(IsoIr166),
            "ISO_IR 192" => Some(IsoIr192),
            "GB18030" => Some(Gb18030),
            "GBK" | "ISO 2022 GBK" => Some(Gbk),
            "ISO 2022 IR 87" => Some(IsoIr87),
            "ISO 2022 IR 159" => Some(IsoIr159),
            "ISO 2022 IR 149" => Some(IsoIr149),
            "ISO 2022 IR 58" | "ISO 2022 58" => Some(IsoIr58),
            _ => None,
        }
    }

    /// Identify the character set designated by an escape sequence.
    pub fn from_escape_sequence(sequence: &[u8]) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match sequence {
            b"\x1b(B" => Some(Default),
            b"\x1b-A" => Some(IsoIr100),
            b"\x1b)I" | b"\x1b(J" => Some(IsoIr13),
            b"\x1b$B" => Some(IsoIr87),
            b"\x1b-B" => Some(IsoIr101),
            b"\x1b-C" => Some(IsoIr109),
            b"\x1b-D" => Some(IsoIr110),
            b"\x1b-F" => Some(IsoIr126),
            b"\x1b-G" => Some(IsoIr127),
            b"\x1b-H" => Some(IsoIr138),
            b"\x1b-L" => Some(IsoIr144),
            b"\x1b-M" => Some(IsoIr148),
            b"\x1b-T" => Some(IsoIr166),
            b"\x1b$)C" => Some(IsoIr149),
            b"\x1b$(D" => Some(IsoIr159),
            b"\x1b$)A" => Some(IsoIr58),
            _ => None,
        }
    }

    /// The escape sequence which switches to this character set,
    /// given the bytes that are about to follow it.
    ///
    /// Returns `None` for the stand-alone character sets,
    /// which are not subject to code extensions.
    pub fn escape_sequence(self, encoded: &[u8]) -> Option<&'static [u8]> {
        use self::SpecificCharacterSet::*;
        let seq: &'static [u8] = match self {
            Default => b"\x1b(B",
            // JIS X 0201 katakana lives in G1, romaji in G0
            IsoIr13 => match encoded.first() {
                Some(b) if *b >= 0x80 => b"\x1b)I",
                _ => b"\x1b(J",
            },
            IsoIr100 => b"\x1b-A",
            IsoIr101 => b"\x1b-B",
            IsoIr109 => b"\x1b-C",
            IsoIr110 => b"\x1b-D",
            IsoIr126 => b"\x1b-F",
            IsoIr127 => b"\x1b-G",
            IsoIr138 => b"\x1b-H",
            IsoIr144 => b"\x1b-L",
            IsoIr148 => b"\x1b-M",
            IsoIr166 => b"\x1b-T",
            IsoIr87 => b"\x1b$B",
            IsoIr159 => b"\x1b$(D",
            IsoIr149 => b"\x1b$)C",
            IsoIr58 => b"\x1b$)A",
            IsoIr192 | Gb18030 | Gbk => return None,
        };
        Some(seq)
    }

    /// Whether this character set may only appear on its own
    /// in the Specific Character Set attribute.
    pub fn is_stand_alone(self) -> bool {
        matches!(
            self,
            SpecificCharacterSet::IsoIr192
                | SpecificCharacterSet::Gb18030
                | SpecificCharacterSet::Gbk
        )
    }

    /// Whether the underlying codec keeps track of its own escape sequences,
    /// so that a fragment in this character set is decoded whole,
    /// escape sequence included.
    fn is_self_escaping(self) -> bool {
        matches!(
            self,
            SpecificCharacterSet::IsoIr87 | SpecificCharacterSet::IsoIr159
        )
    }

    /// Whether a designation of this character set
    /// survives the delimiters within a value.
    fn keeps_designation(self) -> bool {
        self.is_self_escaping() || self == SpecificCharacterSet::IsoIr58
    }

    /// The codec from the `encoding` crate behind this character set.
    pub fn encoding(self) -> EncodingRef {
        use self::SpecificCharacterSet::*;
        match self {
            Default | IsoIr100 => ISO_8859_1,
            IsoIr101 => ISO_8859_2,
            IsoIr109 => ISO_8859_3,
            IsoIr110 => ISO_8859_4,
            IsoIr126 => ISO_8859_7,
            IsoIr127 => ISO_8859_6,
            IsoIr138 => ISO_8859_8,
            IsoIr144 => ISO_8859_5,
            IsoIr148 => WINDOWS_1254,
            IsoIr166 => WINDOWS_874,
            IsoIr13 => WINDOWS_31J,
            IsoIr87 | IsoIr159 => ISO_2022_JP,
            IsoIr149 => WINDOWS_949,
            IsoIr58 | Gbk => GBK,
            Gb18030 => GB18030,
            IsoIr192 => UTF_8,
        }
    }

    /// Decode with replacement characters in place of invalid sequences.
    pub fn decode_lossy(self, text: &[u8]) -> String {
        self.encoding()
            .decode(text, DecoderTrap::Replace)
            .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
    }

    /// Encode with `?` in place of characters outside of the repertoire.
    pub fn encode_lossy(self, text: &str) -> Vec<u8> {
        self.encoding()
            .encode(text, EncoderTrap::Replace)
            .unwrap_or_else(|_| text.bytes().map(|b| if b.is_ascii() { b } else { b'?' }).collect())
    }

    /// The number of leading characters of `text`
    /// which this character set can encode.
    fn encodable_prefix(self, text: &str) -> usize {
        let encoding = self.encoding();
        let mut count = 0;
        for c in text.chars() {
            let mut buf = [0; 4];
            match encoding.encode(c.encode_utf8(&mut buf), EncoderTrap::Strict) {
                // half-width katakana and romaji are single byte
                Ok(bytes) if self == SpecificCharacterSet::IsoIr13 && bytes.len() != 1 => break,
                Ok(_) => count += 1,
                Err(_) => break,
            }
        }
        count
    }
}

impl fmt::Display for SpecificCharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TextCodec for SpecificCharacterSet {
    fn name(&self) -> &'static str {
        use self::SpecificCharacterSet::*;
        match self {
            Default => "ISO_IR 6",
            IsoIr13 => "ISO_IR 13",
            IsoIr100 => "ISO_IR 100",
            IsoIr101 => "ISO_IR 101",
            IsoIr109 => "ISO_IR 109",
            IsoIr110 => "ISO_IR 110",
            IsoIr126 => "ISO_IR 126",
            IsoIr127 => "ISO_IR 127",
            IsoIr138 => "ISO_IR 138",
            IsoIr144 => "ISO_IR 144",
            IsoIr148 => "ISO_IR 148",
            IsoIr166 => "ISO_IR 166",
            IsoIr192 => "ISO_IR 192",
            Gb18030 => "GB18030",
            Gbk => "GBK",
            IsoIr87 => "ISO 2022 IR 87",
            IsoIr159 => "ISO 2022 IR 159",
            IsoIr149 => "ISO 2022 IR 149",
            IsoIr58 => "ISO 2022 IR 58",
        }
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        self.encoding()
            .decode(text, DecoderTrap::Strict)
            .map_err(|message| DecodeCustomSnafu { message }.build())
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        self.encoding()
            .encode(text, EncoderTrap::Strict)
            .map_err(|message| EncodeCustomSnafu { message }.build())
    }
}

/// The character sets in effect for a data set,
/// as declared by all values of Specific Character Set (0008,0005).
///
/// The first character set is active at the start of every value
/// and after every delimiter.
/// The others may be switched to with escape sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterSets {
    sets: SmallVec<[SpecificCharacterSet; 2]>,
}

impl Default for CharacterSets {
    fn default() -> Self {
        CharacterSets::single(SpecificCharacterSet::Default)
    }
}

impl From<SpecificCharacterSet> for CharacterSets {
    fn from(set: SpecificCharacterSet) -> Self {
        CharacterSets::single(set)
    }
}

impl CharacterSets {
    /// A single character set without code extensions.
    pub fn single(set: SpecificCharacterSet) -> Self {
        CharacterSets { sets: smallvec![set] }
    }

    /// Interpret the values of Specific Character Set.
    ///
    /// Common misspellings of the defined terms are corrected,
    /// and unknown terms fall back to the default character set.
    /// Stand-alone character sets are not combined with others:
    /// as the first value the others are dropped,
    /// as a later value the stand-alone one is dropped.
    /// Each of these cases is reported to `diagnostics`.
    pub fn from_terms<S: AsRef<str>>(
        terms: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, NonConformantError> {
        let mut sets: SmallVec<[SpecificCharacterSet; 2]> = SmallVec::new();
        for (i, term) in terms.iter().enumerate() {
            let term = term.as_ref().trim_matches(|c: char| c == ' ' || c == '\0');
            let set = if i == 0 && term.is_empty() {
                SpecificCharacterSet::Default
            } else {
                resolve_term(term, diagnostics)?
            };
            sets.push(set);
        }

        if sets.is_empty() {
            return Ok(CharacterSets::default());
        }

        if sets.len() > 1 {
            if sets[0].is_stand_alone() {
                diagnostics.report(ConformanceWarning::new(
                    WarningKind::UnknownCharacterSet,
                    format!(
                        "Value '{}' for Specific Character Set does not allow code extensions, ignoring the other values",
                        sets[0]
                    ),
                ))?;
                sets.truncate(1);
            } else {
                let first = sets[0];
                let mut kept: SmallVec<[SpecificCharacterSet; 2]> = smallvec![first];
                for set in sets.into_iter().skip(1) {
                    if set.is_stand_alone() {
                        diagnostics.report(ConformanceWarning::new(
                            WarningKind::UnknownCharacterSet,
                            format!(
                                "Value '{}' cannot be used as code extension, ignoring it",
                                set
                            ),
                        ))?;
                    } else {
                        kept.push(set);
                    }
                }
                sets = kept;
            }
        }

        Ok(CharacterSets { sets })
    }

    /// The character set active at the start of each value.
    pub fn first(&self) -> SpecificCharacterSet {
        self.sets.first().copied().unwrap_or_default()
    }

    /// All character sets, in declaration order.
    pub fn as_slice(&self) -> &[SpecificCharacterSet] {
        &self.sets
    }

    /// Whether this is the default repertoire without code extensions.
    pub fn is_default(&self) -> bool {
        self.sets.as_slice() == [SpecificCharacterSet::Default]
    }

    fn contains(&self, set: SpecificCharacterSet) -> bool {
        self.sets.contains(&set)
    }

    /// Decode a text value, following escape sequences.
    ///
    /// `delimiters` are the bytes after which the first character set
    /// becomes active again
    /// ([`TEXT_DELIMITERS`] or [`PN_DELIMITERS`]).
    /// Undecodable input is reported and replaced.
    pub fn decode(
        &self,
        text: &[u8],
        delimiters: &[u8],
        diagnostics: &mut Diagnostics,
    ) -> DecodeResult<String> {
        if !text.contains(&ESC) {
            return self.decode_plain(text, diagnostics);
        }

        let mut out = String::with_capacity(text.len());
        for fragment in split_fragments(text) {
            let part = if fragment[0] == ESC {
                self.decode_escaped(fragment, delimiters, diagnostics)?
            } else {
                self.decode_plain(fragment, diagnostics)?
            };
            out.push_str(&part);
        }
        Ok(out)
    }

    fn decode_plain(&self, text: &[u8], diagnostics: &mut Diagnostics) -> DecodeResult<String> {
        let first = self.first();
        match first.decode(text) {
            Ok(s) => Ok(s),
            Err(_) => {
                diagnostics
                    .report(ConformanceWarning::new(
                        WarningKind::TextDecoding,
                        format!(
                            "Failed to decode text with character set {}, using replacement characters",
                            first
                        ),
                    ))
                    .context(DecodeNonConformantSnafu)?;
                Ok(first.decode_lossy(text))
            }
        }
    }

    fn decode_escaped(
        &self,
        fragment: &[u8],
        delimiters: &[u8],
        diagnostics: &mut Diagnostics,
    ) -> DecodeResult<String> {
        let seq_len = if fragment.starts_with(b"\x1b$(") || fragment.starts_with(b"\x1b$)") {
            4
        } else {
            3
        };
        let seq_len = seq_len.min(fragment.len());
        let first = self.first();

        let set = match SpecificCharacterSet::from_escape_sequence(&fragment[..seq_len]) {
            Some(set) if set == SpecificCharacterSet::Default || self.contains(set) => set,
            _ => {
                diagnostics
                    .report(ConformanceWarning::new(
                        WarningKind::UnknownEscapeSequence,
                        format!(
                            "Found unknown escape sequence in encoded string value, using character set {}",
                            first
                        ),
                    ))
                    .context(DecodeNonConformantSnafu)?;
                return Ok(first.decode_lossy(fragment));
            }
        };

        let decoded = if set.is_self_escaping() {
            set.decode(fragment)
        } else {
            let body = &fragment[seq_len..];
            match body.iter().position(|b| delimiters.contains(b)) {
                Some(index) if !set.keeps_designation() => {
                    let (head, tail) = body.split_at(index);
                    set.decode(head)
                        .and_then(|head| first.decode(tail).map(|tail| head + &tail))
                }
                _ => set.decode(body),
            }
        };

        match decoded {
            Ok(s) => Ok(s),
            Err(_) => {
                diagnostics
                    .report(ConformanceWarning::new(
                        WarningKind::TextDecoding,
                        format!(
                            "Failed to decode text with character set {}, using replacement characters",
                            set
                        ),
                    ))
                    .context(DecodeNonConformantSnafu)?;
                Ok(first.decode_lossy(fragment))
            }
        }
    }

    /// Encode a text value,
    /// switching character sets with escape sequences where needed.
    ///
    /// The text is encoded one run at a time between `delimiters`,
    /// since the first character set is active again after each of them.
    /// If no combination of the character sets can encode the text,
    /// this is reported and the first character set is used
    /// with replacement characters.
    pub fn encode(
        &self,
        text: &str,
        delimiters: &[u8],
        diagnostics: &mut Diagnostics,
    ) -> EncodeResult<Vec<u8>> {
        if self.sets.len() == 1 {
            return self.encode_run(text, diagnostics);
        }

        let mut out = Vec::with_capacity(text.len());
        let mut start = 0;
        for (i, c) in text.char_indices() {
            if c.is_ascii() && delimiters.contains(&(c as u8)) {
                out.extend(self.encode_run(&text[start..i], diagnostics)?);
                out.push(c as u8);
                start = i + 1;
            }
        }
        out.extend(self.encode_run(&text[start..], diagnostics)?);
        Ok(out)
    }

    fn encode_run(&self, text: &str, diagnostics: &mut Diagnostics) -> EncodeResult<Vec<u8>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let first = self.first();

        for (i, set) in self.sets.iter().copied().enumerate() {
            if let Ok(mut encoded) = set.encode(text) {
                if set.is_self_escaping() {
                    self.close_self_escaping(&mut encoded);
                } else if i > 0 {
                    if let Some(seq) = set.escape_sequence(&encoded) {
                        let mut out = seq.to_vec();
                        out.extend(encoded);
                        encoded = out;
                    }
                }
                return Ok(encoded);
            }
        }

        if self.sets.len() > 1 {
            if let Some(encoded) = self.encode_parts(text) {
                return Ok(encoded);
            }
        }

        let names = self.sets.iter().map(|s| s.name()).collect::<Vec<_>>();
        diagnostics
            .report(ConformanceWarning::new(
                WarningKind::TextDecoding,
                format!(
                    "Failed to encode value with character sets {}, using replacement characters",
                    names.join(", ")
                ),
            ))
            .context(EncodeNonConformantSnafu)?;
        Ok(first.encode_lossy(text))
    }

    /// Encode the text piece by piece,
    /// each with the character set covering the longest run of characters.
    fn encode_parts(&self, text: &str) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() * 2);
        let mut rest = text;
        let mut last = self.first();

        while !rest.is_empty() {
            let total = rest.chars().count();
            let mut best = (0, self.first());
            for set in self.sets.iter().copied() {
                let n = set.encodable_prefix(rest);
                if n > best.0 {
                    best = (n, set);
                }
                if n == total {
                    break;
                }
            }

            let (count, set) = best;
            if count == 0 {
                return None;
            }

            let split = rest
                .char_indices()
                .nth(count)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let (part, tail) = rest.split_at(split);
            let mut encoded = set.encode(part).ok()?;
            if set.is_self_escaping() {
                strip_ascii_designation(&mut encoded);
            } else if let Some(seq) = set.escape_sequence(&encoded) {
                out.extend_from_slice(seq);
            }
            out.extend(encoded);
            last = set;
            rest = tail;
        }

        if last.is_self_escaping() {
            self.close_self_escaping(&mut out);
        }
        Some(out)
    }

    /// Replace the trailing return to ASCII
    /// with the escape sequence of the first character set.
    fn close_self_escaping(&self, encoded: &mut Vec<u8>) {
        strip_ascii_designation(encoded);
        if let Some(seq) = self.first().escape_sequence(&[]) {
            encoded.extend_from_slice(seq);
        }
    }
}

fn strip_ascii_designation(encoded: &mut Vec<u8>) {
    if encoded.ends_with(b"\x1b(B") {
        encoded.truncate(encoded.len() - 3);
    }
}

/// Split a byte string into a leading chunk without escape sequences
/// followed by chunks which each start with an escape character.
fn split_fragments(text: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut starts: Vec<usize> = text
        .iter()
        .enumerate()
        .filter(|(i, b)| **b == ESC && *i > 0)
        .map(|(i, _)| i)
        .collect();
    starts.insert(0, 0);
    let ends = starts.iter().skip(1).copied().chain(std::iter::once(text.len())).collect::<Vec<_>>();
    starts
        .into_iter()
        .zip(ends)
        .filter(|(start, end)| end > start)
        .map(move |(start, end)| &text[start..end])
}

/// Map a Specific Character Set term to a character set,
/// correcting the usual misspellings.
fn resolve_term(
    term: &str,
    diagnostics: &mut Diagnostics,
) -> Result<SpecificCharacterSet, NonConformantError> {
    if let Some(set) = SpecificCharacterSet::from_code(term) {
        return Ok(set);
    }

    let fixed = fix_term(term);
    if let Some(set) = fixed.as_deref().and_then(SpecificCharacterSet::from_code) {
        diagnostics.report(ConformanceWarning::new(
            WarningKind::UnknownCharacterSet,
            format!(
                "Incorrect value for Specific Character Set '{}' - assuming '{}'",
                term, set
            ),
        ))?;
        return Ok(set);
    }

    diagnostics.report(ConformanceWarning::new(
        WarningKind::UnknownCharacterSet,
        format!(
            "Unknown value for Specific Character Set '{}' - using default character set",
            term
        ),
    ))?;
    Ok(SpecificCharacterSet::Default)
}

/// Correct a misspelled term, if it follows a known pattern.
fn fix_term(term: &str) -> Option<String> {
    let bytes = term.as_bytes();
    // "ISO-IR 100", "ISO IR 100"
    if bytes.len() > 6 && bytes.starts_with(b"ISO") && bytes[3] != b'_' && &bytes[4..6] == b"IR" {
        return Some(format!("ISO_IR{}", &term[6..]));
    }
    // "ISO-2022-IR-87", "ISO_2022 IR 87"
    if bytes.len() > 12 && !term.starts_with("ISO 2022 IR ") && is_2022_ir(bytes) {
        return term.get(12..).map(|rest| format!("ISO 2022 IR {}", rest));
    }
    // "ISO_IR100"
    if term.starts_with("ISO_IR") && bytes.get(6).map_or(false, u8::is_ascii_digit) {
        return Some(format!("ISO_IR {}", &term[6..]));
    }
    None
}

fn is_2022_ir(bytes: &[u8]) -> bool {
    bytes.len() >= 12
        && &bytes[..3] == b"ISO"
        && &bytes[4..8] == b"2022"
        && &bytes[9..11] == b"IR"
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::ValidationMode;

    fn test_codec<T>(codec: T, string: &str, bytes: &[u8])
    where
        T: TextCodec,
    {
        assert_eq!(codec.encode(string).expect("encoding"), bytes);
        assert_eq!(codec.decode(bytes).expect("decoding"), string);
    }

    fn sets(terms: &[&str]) -> CharacterSets {
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        CharacterSets::from_terms(terms, &mut diagnostics).unwrap()
    }

    #[test]
    fn iso_ir_6_baseline() {
        let codec = SpecificCharacterSet::Default;
        test_codec(codec, "Smith^John", b"Smith^John");
    }

    #[test]
    fn iso_ir_192_baseline() {
        let codec = SpecificCharacterSet::IsoIr192;
        test_codec(&codec, "Simões^John", "Simões^John".as_bytes());
        test_codec(codec, "Иванков^Андрей", "Иванков^Андрей".as_bytes());
    }

    #[test]
    fn iso_ir_100_baseline() {
        let codec = SpecificCharacterSet::IsoIr100;
        test_codec(&codec, "Simões^João", b"Sim\xF5es^Jo\xE3o");
        test_codec(codec, "Günther^Hans", b"G\xfcnther^Hans");
    }

    #[test]
    fn iso_ir_101_baseline() {
        let codec = SpecificCharacterSet::IsoIr101;
        test_codec(codec, "Günther^Hans", b"G\xfcnther^Hans");
    }

    #[test]
    fn iso_ir_144_baseline() {
        let codec = SpecificCharacterSet::IsoIr144;
        test_codec(
            codec,
            "Иванков^Андрей",
            b"\xb8\xd2\xd0\xdd\xda\xde\xd2^\xb0\xdd\xd4\xe0\xd5\xd9",
        );
    }

    #[test]
    fn codes_and_names_agree() {
        use SpecificCharacterSet::*;
        for set in [
            Default, IsoIr13, IsoIr100, IsoIr101, IsoIr109, IsoIr110, IsoIr126, IsoIr127,
            IsoIr138, IsoIr144, IsoIr148, IsoIr166, IsoIr192, Gb18030, Gbk, IsoIr87, IsoIr159,
            IsoIr149, IsoIr58,
        ] {
            assert_eq!(SpecificCharacterSet::from_code(set.name()), Some(set));
        }
        assert_eq!(
            SpecificCharacterSet::from_code("ISO 2022 IR 100 "),
            Some(IsoIr100)
        );
    }

    #[test]
    fn misspelled_terms_are_corrected() {
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let cs = CharacterSets::from_terms(&["ISO_IR100"], &mut diagnostics).unwrap();
        assert_eq!(cs.first(), SpecificCharacterSet::IsoIr100);
        let cs = CharacterSets::from_terms(&["ISO IR 144"], &mut diagnostics).unwrap();
        assert_eq!(cs.first(), SpecificCharacterSet::IsoIr144);
        let cs = CharacterSets::from_terms(&["", "ISO-2022-IR-87"], &mut diagnostics).unwrap();
        assert_eq!(
            cs.as_slice(),
            &[SpecificCharacterSet::Default, SpecificCharacterSet::IsoIr87]
        );
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics
            .warnings()
            .iter()
            .all(|w| w.kind == WarningKind::UnknownCharacterSet));
    }

    #[test]
    fn unknown_term_falls_back_to_default() {
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let cs = CharacterSets::from_terms(&["KLINGON"], &mut diagnostics).unwrap();
        assert!(cs.is_default());
        assert_eq!(diagnostics.len(), 1);

        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(CharacterSets::from_terms(&["KLINGON"], &mut strict).is_err());
    }

    #[test]
    fn stand_alone_sets_are_not_combined() {
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let cs = CharacterSets::from_terms(&["ISO_IR 192", "ISO 2022 IR 100"], &mut diagnostics)
            .unwrap();
        assert_eq!(cs.as_slice(), &[SpecificCharacterSet::IsoIr192]);
        let cs = CharacterSets::from_terms(&["ISO 2022 IR 100", "GB18030"], &mut diagnostics)
            .unwrap();
        assert_eq!(cs.as_slice(), &[SpecificCharacterSet::IsoIr100]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn decode_with_escape_sequence() {
        let cs = sets(&["", "ISO 2022 IR 144"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let text = cs
            .decode(b"Smith^\x1b-L\xb8\xd2\xd0\xdd", PN_DELIMITERS, &mut diagnostics)
            .unwrap();
        assert_eq!(text, "Smith^Иван");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn delimiter_resets_code_page() {
        let cs = sets(&["ISO 2022 IR 100", "ISO 2022 IR 144"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        // after '^' the bytes are Latin-1 again
        let text = cs
            .decode(b"\x1b-L\xb8\xd2^G\xfcnther", PN_DELIMITERS, &mut diagnostics)
            .unwrap();
        assert_eq!(text, "Ив^Günther");
        // '^' is not a delimiter for other text
        let text = cs
            .decode(b"\x1b-L\xb8\xd2^\xb8", TEXT_DELIMITERS, &mut diagnostics)
            .unwrap();
        assert_eq!(text, "Ив^И");
    }

    #[test]
    fn decode_japanese_kanji() {
        let cs = sets(&["", "ISO 2022 IR 87"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let text = cs
            .decode(
                b"Yamada^Tarou=\x1b$B;3ED\x1b(B^\x1b$BB@O:\x1b(B",
                PN_DELIMITERS,
                &mut diagnostics,
            )
            .unwrap();
        assert_eq!(text, "Yamada^Tarou=山田^太郎");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_escape_sequence_is_reported() {
        let cs = sets(&["", "ISO 2022 IR 100"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Warn);
        let text = cs
            .decode(b"abc\x1b-Ldef", TEXT_DELIMITERS, &mut diagnostics)
            .unwrap();
        assert!(text.starts_with("abc"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.warnings()[0].kind,
            WarningKind::UnknownEscapeSequence
        );

        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(cs.decode(b"abc\x1b-Ldef", TEXT_DELIMITERS, &mut strict).is_err());
    }

    #[test]
    fn encode_with_code_extension() {
        let cs = sets(&["", "ISO 2022 IR 144"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Strict);
        let bytes = cs.encode("Иванков", TEXT_DELIMITERS, &mut diagnostics).unwrap();
        assert_eq!(bytes, b"\x1b-L\xb8\xd2\xd0\xdd\xda\xde\xd2");
        let back = cs
            .decode(&bytes, TEXT_DELIMITERS, &mut diagnostics)
            .unwrap();
        assert_eq!(back, "Иванков");
    }

    #[test]
    fn encode_in_parts() {
        let cs = sets(&["ISO 2022 IR 126", "ISO 2022 IR 144"]);
        let mut diagnostics = Diagnostics::new(ValidationMode::Strict);
        // Greek then Cyrillic, neither set covers both
        let bytes = cs.encode("Διον^Иван", TEXT_DELIMITERS, &mut diagnostics).unwrap();
        assert_eq!(&bytes, b"\x1b-F\xc4\xe9\xef\xed^\x1b-L\xb8\xd2\xd0\xdd");

        // each name component starts over in the first character set
        let bytes = cs.encode("Διον^Иван", PN_DELIMITERS, &mut diagnostics).unwrap();
        assert_eq!(&bytes, b"\xc4\xe9\xef\xed^\x1b-L\xb8\xd2\xd0\xdd");
        let back = cs.decode(&bytes, PN_DELIMITERS, &mut diagnostics).unwrap();
        assert_eq!(back, "Διον^Иван");
    }

    #[test]
    fn unencodable_text() {
        let cs = CharacterSets::single(SpecificCharacterSet::Default);
        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(cs.encode("Иван", TEXT_DELIMITERS, &mut strict).is_err());

        let mut lenient = Diagnostics::new(ValidationMode::Warn);
        let bytes = cs.encode("Иван", TEXT_DELIMITERS, &mut lenient).unwrap();
        assert_eq!(bytes, b"????");
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn fragments_are_split_at_escape() {
        let parts: Vec<&[u8]> = split_fragments(b"ab\x1b-Lcd\x1b(Be").collect();
        assert_eq!(parts, vec![&b"ab"[..], b"\x1b-Lcd", b"\x1b(Be"]);
        let parts: Vec<&[u8]> = split_fragments(b"\x1b$B;3").collect();
        assert_eq!(parts, vec![&b"\x1b$B;3"[..]]);
    }
}
