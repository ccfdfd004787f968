//! Core data element dictionary types.
//!
//! A data dictionary maps attribute tags and keywords
//! to a record with the attribute's typical value representation,
//! value multiplicity and description.
//! The standard dictionary lives in its own crate;
//! only the stub dictionary is provided here.

pub mod stub;

use crate::header::VR;
use crate::tag::{Tag, TagError};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::str::FromStr;
use std::sync::Arc;

pub use self::stub::StubDataDictionary;

/// Specification of a range of tags pertaining to an attribute.
/// Very often, the dictionary of attributes indicates a unique
/// group part and element part `(group,elem)`,
/// but occasionally an attribute may cover
/// a range of groups or elements instead.
/// For example,
/// _Overlay Data_ (60xx,3000) has more than one possible tag,
/// since it is part of a repeating group.
/// Moreover, a unique variant is defined for group length tags
/// and another one for private creator tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagRange {
    /// Only a specific tag
    Single(Tag),
    /// The two rightmost digits of the _group_ portion are open:
    /// `(GGxx,EEEE)`
    Group100(Tag),
    /// The two rightmost digits of the _element_ portion are open:
    /// `(GGGG,EExx)`
    Element100(Tag),
    /// Generic group length tag,
    /// refers to any attribute of the form `(GGGG,0000)`,
    /// save for those with their own single tag record
    /// such as _File Meta Information Group Length_ (0002,0000).
    GroupLength,
    /// Generic private creator tag,
    /// refers to any tag from (GGGG,0010) to (GGGG,00FF),
    /// where `GGGG` is an odd number.
    PrivateCreator,
}

impl TagRange {
    /// Retrieve the inner tag representation of this range.
    ///
    /// Open components are zeroed out.
    /// Returns a zeroed out tag if it is a group length tag.
    /// If it is a private creator tag,
    /// this method returns `Tag(0x0009, 0x0010)`.
    pub fn inner(self) -> Tag {
        match self {
            TagRange::Single(tag) => tag,
            TagRange::Group100(tag) => tag,
            TagRange::Element100(tag) => tag,
            TagRange::GroupLength => Tag(0x0000, 0x0000),
            TagRange::PrivateCreator => Tag(0x0009, 0x0010),
        }
    }

    /// Check whether the given tag is covered by this range.
    pub fn contains(self, tag: Tag) -> bool {
        match self {
            TagRange::Single(t) => t == tag,
            TagRange::Group100(t) => t.group() == tag.group() & 0xFF00 && t.element() == tag.element(),
            TagRange::Element100(t) => {
                t.group() == tag.group() && t.element() == tag.element() & 0xFF00
            }
            TagRange::GroupLength => tag.element() == 0x0000,
            TagRange::PrivateCreator => tag.is_private_creator(),
        }
    }
}

/// An error returned when parsing an invalid tag range.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum TagRangeParseError {
    #[snafu(display("Not enough tag components, expected tag (group, element)"))]
    MissingTag { backtrace: Backtrace },
    #[snafu(display("Not enough tag components, expected tag element"))]
    MissingTagElement { backtrace: Backtrace },
    #[snafu(display(
        "tag component `group` has an invalid length: got {} but must be 4",
        got
    ))]
    InvalidGroupLength { got: usize, backtrace: Backtrace },
    #[snafu(display(
        "tag component `element` has an invalid length: got {} but must be 4",
        got
    ))]
    InvalidElementLength { got: usize, backtrace: Backtrace },
    #[snafu(display("unsupported tag range"))]
    UnsupportedTagRange { backtrace: Backtrace },
    #[snafu(display("invalid tag component `group`"))]
    InvalidTagGroup {
        backtrace: Backtrace,
        source: std::num::ParseIntError,
    },
    #[snafu(display("invalid tag component `element`"))]
    InvalidTagElement {
        backtrace: Backtrace,
        source: std::num::ParseIntError,
    },
}

impl FromStr for TagRange {
    type Err = TagRangeParseError;

    fn from_str(mut s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('(') && s.ends_with(')') {
            s = &s[1..s.len() - 1];
        }
        let mut parts = s.split(',');
        let group = parts.next().context(MissingTagSnafu)?.trim();
        let elem = parts.next().context(MissingTagElementSnafu)?.trim();
        ensure!(
            group.len() == 4,
            InvalidGroupLengthSnafu { got: group.len() }
        );
        ensure!(
            elem.len() == 4,
            InvalidElementLengthSnafu { got: elem.len() }
        );

        let open = |part: &str| part[2..].eq_ignore_ascii_case("xx");
        match (open(group), open(elem)) {
            (true, true) => UnsupportedTagRangeSnafu.fail(),
            (true, false) => {
                let group =
                    u16::from_str_radix(&group[..2], 16).context(InvalidTagGroupSnafu)? << 8;
                let elem = u16::from_str_radix(elem, 16).context(InvalidTagElementSnafu)?;
                Ok(TagRange::Group100(Tag(group, elem)))
            }
            (false, true) => {
                let group = u16::from_str_radix(group, 16).context(InvalidTagGroupSnafu)?;
                let elem =
                    u16::from_str_radix(&elem[..2], 16).context(InvalidTagElementSnafu)? << 8;
                Ok(TagRange::Element100(Tag(group, elem)))
            }
            (false, false) => {
                let group = u16::from_str_radix(group, 16).context(InvalidTagGroupSnafu)?;
                let elem = u16::from_str_radix(elem, 16).context(InvalidTagElementSnafu)?;
                Ok(TagRange::Single(Tag(group, elem)))
            }
        }
    }
}

/// A "virtual" value representation (VR) descriptor
/// which extends the standard enumeration with context-dependent VRs.
///
/// As an example, the _Pixel Data_ attribute
/// can have a value representation of either [`OB`](VR::OB) or [`OW`](VR::OW).
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum VirtualVr {
    /// The value representation is exactly known
    /// and does not depend on context.
    Exact(VR),
    /// A pixel sample value with a short magnitude,
    /// either [`US`](VR::US) or [`SS`](VR::SS)
    /// depending on _Pixel Representation_.
    Xs,
    /// Overlay data, either [`OB`](VR::OB) or [`OW`](VR::OW).
    Ox,
    /// Pixel data, either [`OB`](VR::OB) or [`OW`](VR::OW).
    Px,
    /// LUT data, either [`US`](VR::US) or [`OW`](VR::OW).
    Lt,
}

impl From<VR> for VirtualVr {
    fn from(value: VR) -> Self {
        VirtualVr::Exact(value)
    }
}

impl VirtualVr {
    /// Return the underlying value representation
    /// in the case that it can be unambiguously defined without context.
    pub fn exact(self) -> Option<VR> {
        match self {
            VirtualVr::Exact(vr) => Some(vr),
            _ => None,
        }
    }

    /// Return the underlying value representation,
    /// making a relaxed conversion if it cannot be
    /// accurately resolved without context.
    ///
    /// - [`Xs`](VirtualVr::Xs) is relaxed to [`US`](VR::US)
    /// - [`Ox`](VirtualVr::Ox), [`Px`](VirtualVr::Px)
    ///   and [`Lt`](VirtualVr::Lt) are relaxed to [`OW`](VR::OW)
    pub fn relaxed(self) -> VR {
        match self {
            VirtualVr::Exact(vr) => vr,
            VirtualVr::Xs => VR::US,
            VirtualVr::Ox | VirtualVr::Px | VirtualVr::Lt => VR::OW,
        }
    }
}

/// Type trait for a dictionary of DICOM attributes.
///
/// The main purpose of an attribute dictionary is
/// to retrieve a record containing additional information about a data element,
/// in one of the following ways:
///
/// - By DICOM tag, via [`by_tag`](DataDictionary::by_tag);
/// - By its keyword via [`by_name`](DataDictionary::by_name);
/// - By an expression which may either be a keyword
///   or a tag printed in one of its standard forms,
///   using [`by_expr`](DataDictionary::by_expr).
///
/// Entries are returned by value,
/// so that dictionaries which admit new entries at run time
/// can be shared across threads.
/// Entry types are expected to be cheap to clone.
pub trait DataDictionary {
    /// The type of the dictionary entry.
    type Entry: DataDictionaryEntry;

    /// Fetch a data element entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<Self::Entry>;

    /// Fetch an entry by its keyword
    /// (e.g. "PatientName" or "SOPInstanceUID").
    /// Keywords are case sensitive.
    fn by_name(&self, name: &str) -> Option<Self::Entry>;

    /// Fetch an entry by its keyword or by DICOM tag expression,
    /// in any of the forms accepted by [`Tag::from_str`].
    fn by_expr(&self, expr: &str) -> Option<Self::Entry> {
        match expr.parse() {
            Ok(tag) => self.by_tag(tag),
            Err(_) => self.by_name(expr),
        }
    }

    /// Use this data element dictionary to interpret a DICOM tag,
    /// either written in one of the forms accepted by [`Tag::from_str`]
    /// or as a keyword.
    ///
    /// Fails with [`TagError::UnknownKeyword`]
    /// if the text is neither a tag nor a known keyword.
    fn parse_tag(&self, expr: &str) -> Result<Tag, TagError> {
        match expr.parse() {
            Ok(tag) => Ok(tag),
            Err(_) => self
                .by_name(expr.trim())
                .map(|e| e.tag())
                .ok_or_else(|| TagError::UnknownKeyword {
                    keyword: expr.to_string(),
                }),
        }
    }
}

impl<D> DataDictionary for &D
where
    D: DataDictionary + ?Sized,
{
    type Entry = D::Entry;

    fn by_tag(&self, tag: Tag) -> Option<Self::Entry> {
        (**self).by_tag(tag)
    }

    fn by_name(&self, name: &str) -> Option<Self::Entry> {
        (**self).by_name(name)
    }
}

/// The data element dictionary entry type,
/// representing a DICOM attribute.
pub trait DataDictionaryEntry {
    /// The full possible tag range of the attribute,
    /// which this dictionary entry can represent.
    fn tag_range(&self) -> TagRange;

    /// Fetch a single tag applicable to this attribute.
    ///
    /// Note that this is not necessarily
    /// the original tag used as key for this entry.
    fn tag(&self) -> Tag {
        self.tag_range().inner()
    }

    /// The keyword of the attribute, with no spaces, usually in UpperCamelCase.
    fn alias(&self) -> &str;

    /// The extended value representation descriptor of the attribute.
    fn vr(&self) -> VirtualVr;

    /// The value multiplicity rule, such as `1`, `1-n` or `2-2n`.
    fn vm(&self) -> &str;

    /// The human readable name of the attribute.
    fn description(&self) -> &str;

    /// Whether the attribute has been retired from the standard.
    fn is_retired(&self) -> bool;
}

impl<E> DataDictionaryEntry for Arc<E>
where
    E: DataDictionaryEntry + ?Sized,
{
    fn tag_range(&self) -> TagRange {
        (**self).tag_range()
    }
    fn alias(&self) -> &str {
        (**self).alias()
    }
    fn vr(&self) -> VirtualVr {
        (**self).vr()
    }
    fn vm(&self) -> &str {
        (**self).vm()
    }
    fn description(&self) -> &str {
        (**self).description()
    }
    fn is_retired(&self) -> bool {
        (**self).is_retired()
    }
}

/// A data type for a dictionary entry with full ownership.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataDictionaryEntryBuf {
    /// The attribute tag range
    pub tag: TagRange,
    /// The keyword of the attribute
    pub alias: String,
    /// The typical value representation of the attribute
    pub vr: VirtualVr,
    /// The value multiplicity rule
    pub vm: String,
    /// The human readable attribute name
    pub description: String,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl DataDictionaryEntry for DataDictionaryEntryBuf {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        &self.alias
    }
    fn vr(&self) -> VirtualVr {
        self.vr
    }
    fn vm(&self) -> &str {
        &self.vm
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

/// A data type for a dictionary entry with string slices,
/// as kept in static dictionary tables.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DataDictionaryEntryRef<'a> {
    /// The attribute tag or tag range
    pub tag: TagRange,
    /// The keyword of the attribute
    pub alias: &'a str,
    /// The extended value representation descriptor of the attribute
    pub vr: VirtualVr,
    /// The value multiplicity rule
    pub vm: &'a str,
    /// The human readable attribute name
    pub description: &'a str,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl<'a> DataDictionaryEntry for DataDictionaryEntryRef<'a> {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VirtualVr {
        self.vr
    }
    fn vm(&self) -> &str {
        self.vm
    }
    fn description(&self) -> &str {
        self.description
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl From<DataDictionaryEntryRef<'_>> for DataDictionaryEntryBuf {
    fn from(e: DataDictionaryEntryRef<'_>) -> Self {
        DataDictionaryEntryBuf {
            tag: e.tag,
            alias: e.alias.to_string(),
            vr: e.vr,
            vm: e.vm.to_string(),
            description: e.description.to_string(),
            retired: e.retired,
        }
    }
}

/// Check whether the text is a well formed value multiplicity rule.
///
/// Admitted forms are `n`, `n-m` and `n-kn`
/// where `n`, `m` and `k` are decimal numbers
/// and `k` may be omitted (as in `1-n`).
///
/// ```
/// # use dcmcodec_core::dictionary::is_valid_vm;
/// assert!(is_valid_vm("1"));
/// assert!(is_valid_vm("1-3"));
/// assert!(is_valid_vm("2-2n"));
/// assert!(is_valid_vm("1-n"));
/// assert!(!is_valid_vm("n"));
/// assert!(!is_valid_vm("1-"));
/// assert!(!is_valid_vm("one"));
/// ```
pub fn is_valid_vm(vm: &str) -> bool {
    fn is_number(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }
    match vm.split_once('-') {
        None => is_number(vm),
        Some((low, high)) => {
            is_number(low)
                && (is_number(high)
                    || high
                        .strip_suffix('n')
                        .map_or(false, |k| k.is_empty() || is_number(k)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_range() {
        let tag: TagRange = "(1234,5678)".parse().unwrap();
        assert_eq!(tag, TagRange::Single(Tag(0x1234, 0x5678)));

        let tag: TagRange = "1234,5678".parse().unwrap();
        assert_eq!(tag, TagRange::Single(Tag(0x1234, 0x5678)));

        let tag: TagRange = "60xx,3000".parse().unwrap();
        assert_eq!(tag, TagRange::Group100(Tag(0x6000, 0x3000)));

        let tag: TagRange = "1234,56xx".parse().unwrap();
        assert_eq!(tag, TagRange::Element100(Tag(0x1234, 0x5600)));

        assert!("xxxx,xxxx".parse::<TagRange>().is_err());
        assert!("123,5678".parse::<TagRange>().is_err());
    }

    #[test]
    fn tag_range_contains() {
        let overlay = TagRange::Group100(Tag(0x6000, 0x3000));
        assert!(overlay.contains(Tag(0x6002, 0x3000)));
        assert!(!overlay.contains(Tag(0x6002, 0x3001)));
        assert!(!overlay.contains(Tag(0x6102, 0x3000)));
        assert!(TagRange::GroupLength.contains(Tag(0x0008, 0x0000)));
        assert!(TagRange::PrivateCreator.contains(Tag(0x0009, 0x0011)));
        assert!(!TagRange::PrivateCreator.contains(Tag(0x0008, 0x0011)));
    }

    #[test]
    fn parse_tag_with_stub() {
        let dict = StubDataDictionary;
        assert_eq!(dict.parse_tag("(0010,0010)"), Ok(Tag(0x0010, 0x0010)));
        assert_eq!(
            dict.parse_tag("PatientName"),
            Err(TagError::UnknownKeyword {
                keyword: "PatientName".to_string()
            })
        );
    }
}
