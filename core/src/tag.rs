//! The DICOM attribute tag and its conversions.
//!
//! A [`Tag`] is a pair of 16-bit numbers `(group, element)`.
//! Tags are totally ordered by their combined 32-bit value,
//! which is the same order used when writing a data set.
//!
//! Conversions from wider integers, integer pairs and strings
//! are fallible and report a [`TagError`].
//! Comparisons against other tag-like values coerce the other side:
//! equality is `false` when coercion fails,
//! whereas [`Tag::try_cmp`] reports the failure.

use snafu::{ensure, Snafu};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// An error which may occur when converting a value into a tag.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[non_exhaustive]
pub enum TagError {
    /// A component or the combined value does not fit in the tag.
    #[snafu(display("Tag value {:#X} is out of range", value))]
    Overflow { value: i128 },
    /// A component or the combined value is negative.
    #[snafu(display("Tag value {} cannot be negative", value))]
    Negative { value: i128 },
    /// Text is neither a hexadecimal tag nor a known keyword.
    #[snafu(display("Unable to create an element tag from '{}'", text))]
    InvalidText { text: String },
    /// Keyword is not in the data dictionary.
    #[snafu(display("Unknown DICOM keyword '{}'", keyword))]
    UnknownKeyword { keyword: String },
}

impl From<Infallible> for TagError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// The data type for DICOM data element tags.
///
/// Both `(u16, u16)` and `[u16; 2]` can be converted to this type,
/// as well as a combined `u32` value.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// The _Item_ structural marker `(FFFE,E000)`.
    pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
    /// The _Item Delimitation Item_ marker `(FFFE,E00D)`.
    pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
    /// The _Sequence Delimitation Item_ marker `(FFFE,E0DD)`.
    pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);

    /// Create a tag from its group and element parts.
    #[inline]
    pub const fn new(group: GroupNumber, element: ElementNumber) -> Self {
        Tag(group, element)
    }

    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Create a tag from its combined 32-bit value `0xGGGGEEEE`.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Tag((value >> 16) as u16, (value & 0xFFFF) as u16)
    }

    /// Retrieve the combined 32-bit value `0xGGGGEEEE` of this tag.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        ((self.0 as u32) << 16) | self.1 as u32
    }

    /// Create a tag from two integer components,
    /// checking that each of them fits in 16 bits.
    pub fn try_from_components(group: i64, element: i64) -> Result<Self, TagError> {
        Ok(Tag(check_component(group)?, check_component(element)?))
    }

    /// Create a tag from two hexadecimal strings,
    /// with or without a `0x` prefix.
    ///
    /// ```
    /// # use dcmcodec_core::Tag;
    /// assert_eq!(Tag::parse_pair("0x10", "0x20").unwrap(), Tag(0x0010, 0x0020));
    /// assert_eq!(Tag::parse_pair("15", "0").unwrap(), Tag(0x0015, 0x0000));
    /// ```
    pub fn parse_pair(group: &str, element: &str) -> Result<Self, TagError> {
        let group = parse_hex(group)?;
        let element = parse_hex(element)?;
        Ok(Tag(check_component(group)?, check_component(element)?))
    }

    /// Whether the tag belongs to a private (odd) group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether this is a private creator tag,
    /// in the form `(gggg,00xx)` with an odd group
    /// and `xx` between `0x10` and `0xFF`.
    #[inline]
    pub fn is_private_creator(self) -> bool {
        self.is_private() && (0x0010..=0x00FF).contains(&self.1)
    }

    /// For a private data element `(gggg,xxee)`,
    /// retrieve the tag of the private creator element `(gggg,00xx)`
    /// which reserves its block.
    ///
    /// Returns `None` for public tags,
    /// private creator tags and private group lengths.
    pub fn private_creator_tag(self) -> Option<Tag> {
        if !self.is_private() || self.1 < 0x1000 {
            return None;
        }
        Some(Tag(self.0, self.1 >> 8))
    }

    /// Whether this is a group length tag `(gggg,0000)`.
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0x0000
    }

    /// Whether this is one of the three structural markers
    /// (item, item delimiter, or sequence delimiter).
    #[inline]
    pub fn is_structural(self) -> bool {
        self == Tag::ITEM || self == Tag::ITEM_DELIMITER || self == Tag::SEQUENCE_DELIMITER
    }

    /// Compare this tag against any value which may be coerced into a tag.
    ///
    /// Unlike equality, ordering is meaningless when the other value
    /// is not a tag, so a failed coercion is reported as an error.
    ///
    /// ```
    /// # use dcmcodec_core::Tag;
    /// # use std::cmp::Ordering;
    /// assert_eq!(Tag(0x0001, 0x0001).try_cmp((0x0001_u16, 0x0002_u16)).unwrap(), Ordering::Less);
    /// assert!(Tag(0x0001, 0x0002).try_cmp("Somethin").is_err());
    /// ```
    pub fn try_cmp<T>(&self, other: T) -> Result<Ordering, TagError>
    where
        T: TryInto<Tag>,
        T::Error: Into<TagError>,
    {
        let other: Tag = other.try_into().map_err(Into::into)?;
        Ok(self.cmp(&other))
    }
}

fn check_component<T>(value: T) -> Result<u16, TagError>
where
    T: Into<i128> + Copy,
{
    let value: i128 = value.into();
    ensure!(value >= 0, NegativeSnafu { value });
    ensure!(value <= 0xFFFF, OverflowSnafu { value });
    Ok(value as u16)
}

fn parse_hex(text: &str) -> Result<i128, TagError> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() > 16 {
        return InvalidTextSnafu { text }.fail();
    }
    let value = i128::from_str_radix(digits, 16).map_err(|_| TagError::InvalidText {
        text: text.to_string(),
    })?;
    Ok(if negative { -value } else { value })
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// Parse a tag from text in one of the following forms:
///
/// - `(gggg,eeee)` or `gggg,eeee`
/// - a single hexadecimal number such as `00100010` or `0x00100010`
///
/// Keywords are not resolved here,
/// see [`DataDictionary::parse_tag`](crate::DataDictionary::parse_tag).
impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(s);
        if let Some((group, element)) = inner.split_once(',') {
            return Tag::parse_pair(group, element);
        }
        let value = parse_hex(inner)?;
        Tag::try_from(value)
    }
}

impl TryFrom<&str> for Tag {
    type Error = TagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i128> for Tag {
    type Error = TagError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        ensure!(value >= 0, NegativeSnafu { value });
        ensure!(value <= 0xFFFF_FFFF, OverflowSnafu { value });
        Ok(Tag::from_u32(value as u32))
    }
}

impl TryFrom<i64> for Tag {
    type Error = TagError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Tag::try_from(i128::from(value))
    }
}

impl TryFrom<u64> for Tag {
    type Error = TagError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Tag::try_from(i128::from(value))
    }
}

impl TryFrom<(i64, i64)> for Tag {
    type Error = TagError;

    fn try_from((group, element): (i64, i64)) -> Result<Self, Self::Error> {
        Tag::try_from_components(group, element)
    }
}

impl TryFrom<(&str, &str)> for Tag {
    type Error = TagError;

    fn try_from((group, element): (&str, &str)) -> Result<Self, Self::Error> {
        Tag::parse_pair(group, element)
    }
}

impl From<u32> for Tag {
    #[inline]
    fn from(value: u32) -> Tag {
        Tag::from_u32(value)
    }
}

impl From<Tag> for u32 {
    #[inline]
    fn from(tag: Tag) -> u32 {
        tag.to_u32()
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl PartialEq<u32> for Tag {
    fn eq(&self, other: &u32) -> bool {
        self.to_u32() == *other
    }
}

/// A value which does not fit in a tag is never equal to one.
impl PartialEq<i64> for Tag {
    fn eq(&self, other: &i64) -> bool {
        Tag::try_from(*other).map_or(false, |t| t == *self)
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        other.parse::<Tag>().map_or(false, |t| t == *self)
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialOrd<u32> for Tag {
    fn partial_cmp(&self, other: &u32) -> Option<Ordering> {
        Some(self.to_u32().cmp(other))
    }
}

impl PartialOrd<(u16, u16)> for Tag {
    fn partial_cmp(&self, other: &(u16, u16)) -> Option<Ordering> {
        Some(self.cmp(&Tag::from(*other)))
    }
}

impl PartialOrd<[u16; 2]> for Tag {
    fn partial_cmp(&self, other: &[u16; 2]) -> Option<Ordering> {
        Some(self.cmp(&Tag::from(*other)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn tag_from_u16_array() {
        let t = Tag::from([0x0010u16, 0x0020u16]);
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn ordering_follows_combined_value() {
        let tags = [
            Tag(0x0008, 0x0016),
            Tag(0x0002, 0x0010),
            Tag(0x7FE0, 0x0010),
            Tag(0x0008, 0x0005),
            Tag(0x0010, 0x0010),
        ];
        for a in &tags {
            for b in &tags {
                assert_eq!(a < b, a.to_u32() < b.to_u32());
                assert_eq!(a == b, a.to_u32() == b.to_u32());
            }
        }
        assert!(Tag(0x0000, 0x0000) <= 1u32);
        assert!(Tag(0x0001, 0x0002) > (0x0001, 0x0001));
        assert!(!(Tag(0x0001, 0x0002) < [0x0001, 0x0002]));
    }

    #[test]
    fn coerced_equality() {
        assert_eq!(Tag(0x0001, 0x0002), 0x0001_0002_u32);
        assert_eq!(Tag(0x0001, 0x0002), 0x0001_0002_i64);
        assert_eq!(Tag(0x0001, 0x0002), (0x0001, 0x0002));
        assert_eq!(Tag(0x0001, 0x0002), "(0001,0002)");
        // failed coercions are never equal
        assert_ne!(Tag(0x0001, 0x0002), "eraa");
        assert_ne!(Tag(0x0000, 0x0000), -1_i64);
        assert_ne!(Tag(0xFFFF, 0xFFFF), 0xF_FFFF_FFFF_i64);
    }

    #[test]
    fn failed_coercion_on_ordering_is_an_error() {
        assert!(matches!(
            Tag(0x0001, 0x0002).try_cmp("Somethin"),
            Err(TagError::InvalidText { .. })
        ));
        assert_eq!(
            Tag(0x0001, 0x0002).try_cmp(0x0001_0002_u32),
            Ok(Ordering::Equal)
        );
        assert_eq!(Tag(0x0001, 0x0002).try_cmp(-1_i64), Err(TagError::Negative { value: -1 }));
    }

    #[test]
    fn construction_bounds() {
        assert_eq!(Tag::try_from(0x0001_0002_i64).unwrap(), Tag(0x0001, 0x0002));
        assert!(matches!(
            Tag::try_from(0xF_FFFF_FFF1_i64),
            Err(TagError::Overflow { .. })
        ));
        assert!(matches!(Tag::try_from(-1_i64), Err(TagError::Negative { .. })));
        assert!(matches!(
            Tag::try_from_components(0xFFFF, 0xFFFF1),
            Err(TagError::Overflow { .. })
        ));
        assert!(matches!(
            Tag::try_from_components(65536, 0),
            Err(TagError::Overflow { .. })
        ));
        assert!(matches!(
            Tag::try_from_components(0, -1),
            Err(TagError::Negative { .. })
        ));
        assert!(matches!(
            Tag::parse_pair("0x0", "-0x1"),
            Err(TagError::Negative { .. })
        ));
        assert!(matches!(
            Tag::parse_pair("0xFFFF", "0xFFFF1"),
            Err(TagError::Overflow { .. })
        ));
    }

    #[test]
    fn parse_from_text() {
        assert_eq!("(0010,0020)".parse::<Tag>().unwrap(), Tag(0x0010, 0x0020));
        assert_eq!("0010,0020".parse::<Tag>().unwrap(), Tag(0x0010, 0x0020));
        assert_eq!("0x10002000".parse::<Tag>().unwrap(), Tag(0x1000, 0x2000));
        assert_eq!("0x2000".parse::<Tag>().unwrap(), Tag(0x0000, 0x2000));
        assert_eq!("15".parse::<Tag>().unwrap(), Tag(0x0000, 0x0015));
        assert!(matches!(
            "0xFFFFFFFF1".parse::<Tag>(),
            Err(TagError::Overflow { .. })
        ));
        assert!(matches!("-0x01".parse::<Tag>(), Err(TagError::Negative { .. })));
        assert!(matches!(
            "hello".parse::<Tag>(),
            Err(TagError::InvalidText { .. })
        ));
    }

    #[test]
    fn private_tags() {
        assert!(Tag(0x0001, 0x0001).is_private());
        assert!(!Tag(0x0002, 0x0001).is_private());
        assert!(!Tag(0x0008, 0x0010).is_private_creator());
        assert!(!Tag(0x0009, 0x000F).is_private_creator());
        assert!(Tag(0x0009, 0x0010).is_private_creator());
        assert!(Tag(0x0009, 0x00FF).is_private_creator());
        assert!(!Tag(0x0009, 0x0100).is_private_creator());
        assert_eq!(Tag(0x0029, 0x1010).private_creator_tag(), Some(Tag(0x0029, 0x0010)));
        assert_eq!(Tag(0x0029, 0x0010).private_creator_tag(), None);
        assert_eq!(Tag(0x0028, 0x1010).private_creator_tag(), None);
    }

    #[test]
    fn tag_display() {
        assert_eq!(Tag(0x0000, 0x0000).to_string(), "(0000,0000)");
        assert_eq!(Tag(0xFFFF, 0xFFFE).to_string(), "(FFFF,FFFE)");
        assert_eq!(format!("{:?}", Tag(0x0010, 0x0020)), "Tag(0x0010, 0x0020)");
    }
}
