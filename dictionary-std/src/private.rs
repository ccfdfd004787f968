//! Private data element dictionaries.
//!
//! Private attributes are only meaningful in the context
//! of the private creator which reserved their block,
//! so each creator has a dictionary of its own.
//! Entries are usually agnostic of the block number,
//! and are therefore keyed by a masked tag.
use dcmcodec_core::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// The masked tag under which a private dictionary entry is recorded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrivateTagKey {
    /// `ggggeeee`: an exact tag.
    Exact(Tag),
    /// `ggggxxee`: any block of the given group.
    Block {
        /// the full group number
        group: u16,
        /// the low byte of the element number
        element: u8,
    },
    /// `ggxxxxee`: any block of any group sharing the upper byte.
    GroupBlock {
        /// the upper byte of the group number
        group_high: u8,
        /// the low byte of the element number
        element: u8,
    },
}

impl PrivateTagKey {
    /// The candidate keys for looking up the given tag,
    /// from most to least specific.
    pub fn candidates(tag: Tag) -> [PrivateTagKey; 3] {
        let element = (tag.element() & 0xFF) as u8;
        [
            PrivateTagKey::Exact(tag),
            PrivateTagKey::Block {
                group: tag.group(),
                element,
            },
            PrivateTagKey::GroupBlock {
                group_high: (tag.group() >> 8) as u8,
                element,
            },
        ]
    }
}

impl fmt::Display for PrivateTagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateTagKey::Exact(tag) => write!(f, "{:04x}{:04x}", tag.0, tag.1),
            PrivateTagKey::Block { group, element } => write!(f, "{:04x}xx{:02x}", group, element),
            PrivateTagKey::GroupBlock {
                group_high,
                element,
            } => write!(f, "{:02x}xxxx{:02x}", group_high, element),
        }
    }
}

/// A record of a private attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDictionaryEntry {
    /// The value representation of the attribute
    pub vr: VR,
    /// The value multiplicity rule
    pub vm: String,
    /// The human readable attribute name
    pub description: String,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl PrivateDictionaryEntry {
    /// Create a new private entry which is not retired.
    pub fn new(vr: VR, vm: impl Into<String>, description: impl Into<String>) -> Self {
        PrivateDictionaryEntry {
            vr,
            vm: vm.into(),
            description: description.into(),
            retired: false,
        }
    }
}

type CreatorDictionary = HashMap<PrivateTagKey, Arc<PrivateDictionaryEntry>>;

static PRIVATE_DICT: Lazy<RwLock<HashMap<String, CreatorDictionary>>> =
    Lazy::new(|| RwLock::new(init_private_dictionaries()));

/// Look up a private entry for a tag under the given private creator.
///
/// Returns `Ok(None)` if the creator is known
/// but has no entry for the tag,
/// and `Err(())` if the creator is not known at all.
pub(crate) fn lookup(
    tag: Tag,
    creator: &str,
) -> Result<Option<Arc<PrivateDictionaryEntry>>, ()> {
    let dicts = PRIVATE_DICT.read().unwrap_or_else(PoisonError::into_inner);
    let dict = dicts.get(creator.trim_end_matches([' ', '\0'])).ok_or(())?;
    Ok(PrivateTagKey::candidates(tag)
        .iter()
        .find_map(|key| dict.get(key))
        .cloned())
}

/// Insert entries into the dictionary of the given creator.
/// The tags are recorded in the `ggggxxee` form.
pub(crate) fn insert<I>(creator: &str, entries: I)
where
    I: IntoIterator<Item = (Tag, PrivateDictionaryEntry)>,
{
    let mut dicts = PRIVATE_DICT.write().unwrap_or_else(PoisonError::into_inner);
    let dict = dicts.entry(creator.to_string()).or_default();
    for (tag, entry) in entries {
        let key = PrivateTagKey::Block {
            group: tag.group(),
            element: (tag.element() & 0xFF) as u8,
        };
        dict.insert(key, Arc::new(entry));
    }
}

fn init_private_dictionaries() -> HashMap<String, CreatorDictionary> {
    use PrivateTagKey::*;

    let mut dicts: HashMap<String, CreatorDictionary> = HashMap::new();
    let mut add = |creator: &str, key: PrivateTagKey, vr: VR, vm: &str, description: &str| {
        dicts
            .entry(creator.to_string())
            .or_default()
            .insert(key, Arc::new(PrivateDictionaryEntry::new(vr, vm, description)));
    };

    add("SIEMENS CSA HEADER", Block { group: 0x0029, element: 0x08 }, VR::CS, "1", "CSA Image Header Type");
    add("SIEMENS CSA HEADER", Block { group: 0x0029, element: 0x09 }, VR::LO, "1", "CSA Image Header Version");
    add("SIEMENS CSA HEADER", Block { group: 0x0029, element: 0x10 }, VR::OB, "1", "CSA Image Header Info");
    add("SIEMENS CSA HEADER", Block { group: 0x0029, element: 0x18 }, VR::CS, "1", "CSA Series Header Type");
    add("SIEMENS CSA HEADER", Block { group: 0x0029, element: 0x20 }, VR::OB, "1", "CSA Series Header Info");
    add("SIEMENS MR HEADER", Block { group: 0x0019, element: 0x0C }, VR::IS, "1", "B Value");
    add("SIEMENS MR HEADER", Block { group: 0x0051, element: 0x0B }, VR::SH, "1", "Acquisition Matrix Text");
    add("GEMS_IDEN_01", Block { group: 0x0009, element: 0x01 }, VR::LO, "2", "Full fidelity");
    add("GEMS_IDEN_01", Block { group: 0x0009, element: 0x02 }, VR::SH, "1", "Suite id");
    add("GEMS_ACQU_01", Block { group: 0x0019, element: 0x9C }, VR::SS, "1", "Pulse Sequence Mode");
    add("Philips Imaging DD 001", Block { group: 0x2001, element: 0x03 }, VR::FL, "1", "Diffusion B-Factor");
    add("Philips Imaging DD 001", Block { group: 0x2001, element: 0x0B }, VR::CS, "1", "Image Plane Orientation");
    add("PAPYRUS 3.0", GroupBlock { group_high: 0x60, element: 0x10 }, VR::LT, "1", "Overlay Comment");
    add("ACUSON", Exact(Tag(0x0009, 0x1000)), VR::IS, "1", "Lossy Compression Ratio");
    dicts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_keys() {
        let [exact, block, group_block] = PrivateTagKey::candidates(Tag(0x0029, 0x1110));
        assert_eq!(exact.to_string(), "00291110");
        assert_eq!(block.to_string(), "0029xx10");
        assert_eq!(group_block.to_string(), "00xxxx10");
    }

    #[test]
    fn builtin_lookup() {
        let entry = lookup(Tag(0x0029, 0x1010), "SIEMENS CSA HEADER")
            .unwrap()
            .expect("entry should exist");
        assert_eq!(entry.vr, VR::OB);
        assert_eq!(entry.description, "CSA Image Header Info");

        // any block, with padding on the creator
        let entry = lookup(Tag(0x0029, 0x2110), "SIEMENS CSA HEADER ")
            .unwrap()
            .expect("entry should exist");
        assert_eq!(entry.vr, VR::OB);

        // repeating groups
        let entry = lookup(Tag(0x6003, 0x1010), "PAPYRUS 3.0")
            .unwrap()
            .expect("entry should exist");
        assert_eq!(entry.vr, VR::LT);

        assert_eq!(lookup(Tag(0x0029, 0x10FF), "SIEMENS CSA HEADER"), Ok(None));
        assert_eq!(lookup(Tag(0x0029, 0x1010), "NOBODY"), Err(()));
    }
}
