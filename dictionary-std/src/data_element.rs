//! The standard data element dictionary.
//!
//! The registry is built from the static table in [`tags`](crate::tags)
//! upon first use and may then be extended at run time
//! through [`add_dict_entries`](crate::add_dict_entries).
use crate::tags::ENTRIES;
use dcmcodec_core::dictionary::{
    DataDictionary, DataDictionaryEntry, DataDictionaryEntryBuf, DataDictionaryEntryRef,
    TagRange::*, VirtualVr,
};
use dcmcodec_core::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The entry type handed out by the standard dictionary.
pub type StandardEntry = Arc<DataDictionaryEntryBuf>;

static DICT: Lazy<RwLock<StandardDataDictionaryRegistry>> =
    Lazy::new(|| RwLock::new(init_dictionary()));

/// Acquire shared access to the standard dictionary registry.
///
/// Note that one does not generally have to call this
/// unless when retrieving the underlying registry is important.
/// The unit type [`StandardDataDictionary`]
/// already provides a lazy loaded singleton implementing the necessary traits.
pub fn registry() -> RwLockReadGuard<'static, StandardDataDictionaryRegistry> {
    // entries are only inserted after validation,
    // so a poisoned lock still holds a consistent registry
    DICT.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn registry_mut() -> RwLockWriteGuard<'static, StandardDataDictionaryRegistry> {
    DICT.write().unwrap_or_else(PoisonError::into_inner)
}

/// The data struct actually containing the standard dictionary.
///
/// This structure is made opaque via the unit type [`StandardDataDictionary`],
/// which provides a lazy loaded singleton.
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: name → entry
    by_name: HashMap<String, StandardEntry>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, StandardEntry>,
    /// repeating elements of the form (ggxx, eeee). The `xx` portion is zeroed.
    repeating_ggxx: HashSet<Tag>,
    /// repeating elements of the form (gggg, eexx). The `xx` portion is zeroed.
    repeating_eexx: HashSet<Tag>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> StandardDataDictionaryRegistry {
        StandardDataDictionaryRegistry {
            by_name: HashMap::with_capacity(ENTRIES.len() + 16),
            by_tag: HashMap::with_capacity(ENTRIES.len() + 16),
            repeating_ggxx: HashSet::with_capacity(16),
            repeating_eexx: HashSet::new(),
        }
    }

    /// record the given dictionary entry,
    /// replacing any previous entry with the same tag
    pub(crate) fn index(&mut self, entry: DataDictionaryEntryBuf) -> &mut Self {
        let entry = Arc::new(entry);
        let tag = entry.tag.inner();
        if let Some(old) = self.by_tag.insert(tag, Arc::clone(&entry)) {
            if old.alias != entry.alias {
                self.by_name.remove(&old.alias);
            }
        }
        self.by_name.insert(entry.alias.clone(), Arc::clone(&entry));
        match entry.tag {
            Group100(tag) => {
                self.repeating_ggxx.insert(tag);
            }
            Element100(tag) => {
                self.repeating_eexx.insert(tag);
            }
            _ => {}
        }
        self
    }

    /// Look up an entry specifically declared for the given tag,
    /// including repeating group and element ranges
    /// but excluding the generic group length and private creator entries.
    pub fn declared(&self, tag: Tag) -> Option<&StandardEntry> {
        self.by_tag.get(&tag).or_else(|| {
            // check tags repeating in different groups
            let group_trimmed = Tag(tag.0 & 0xFF00, tag.1);
            if self.repeating_ggxx.contains(&group_trimmed) {
                return self.by_tag.get(&group_trimmed);
            }
            // check tags repeating in different elements
            let elem_trimmed = Tag(tag.0, tag.1 & 0xFF00);
            if self.repeating_eexx.contains(&elem_trimmed) {
                return self.by_tag.get(&elem_trimmed);
            }
            None
        })
    }

    /// Look up an entry by tag,
    /// falling back to the generic private creator and group length entries.
    pub fn get(&self, tag: Tag) -> Option<StandardEntry> {
        self.declared(tag).cloned().or_else(|| {
            if tag.is_private_creator() {
                return Some(Arc::clone(&PRIVATE_CREATOR_ENTRY));
            }
            if tag.element() == 0x0000 {
                return Some(Arc::clone(&GROUP_LENGTH_ENTRY));
            }
            None
        })
    }

    /// Look up an entry by keyword.
    pub fn get_by_name(&self, name: &str) -> Option<StandardEntry> {
        self.by_name.get(name).cloned()
    }

    /// The number of entries in the registry.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Generic Group Length dictionary entry.
static GROUP_LENGTH_ENTRY: Lazy<StandardEntry> = Lazy::new(|| {
    Arc::new(
        DataDictionaryEntryRef {
            tag: GroupLength,
            alias: "GenericGroupLength",
            vr: VirtualVr::Exact(VR::UL),
            vm: "1",
            description: "Generic Group Length",
            retired: true,
        }
        .into(),
    )
});

/// Generic Private Creator dictionary entry.
static PRIVATE_CREATOR_ENTRY: Lazy<StandardEntry> = Lazy::new(|| {
    Arc::new(
        DataDictionaryEntryRef {
            tag: PrivateCreator,
            alias: "PrivateCreator",
            vr: VirtualVr::Exact(VR::LO),
            vm: "1",
            description: "Private Creator",
            retired: false,
        }
        .into(),
    )
});

/// A data element dictionary which consults
/// the library's global DICOM attribute registry.
///
/// This is the type which would generally be used
/// whenever a data element dictionary is needed,
/// such as when reading DICOM objects.
///
/// The dictionary index is automatically initialized upon the first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    type Entry = StandardEntry;

    fn by_name(&self, name: &str) -> Option<Self::Entry> {
        registry().get_by_name(name)
    }

    fn by_tag(&self, tag: Tag) -> Option<Self::Entry> {
        registry().get(tag)
    }
}

impl StandardDataDictionary {
    /// Resolve the value representation of the given tag,
    /// if it can be determined without further context.
    pub fn vr_of(&self, tag: Tag) -> Option<VR> {
        self.by_tag(tag).map(|e| e.vr().relaxed())
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index((*entry).into());
    }
    // generic group length is not a table entry,
    // but it can still be found by name
    d.by_name
        .insert("GenericGroupLength".to_string(), Arc::clone(&GROUP_LENGTH_ENTRY));
    d
}

#[cfg(test)]
mod tests {
    use super::StandardDataDictionary;
    use dcmcodec_core::dictionary::{DataDictionary, DataDictionaryEntry, TagRange::*, VirtualVr};
    use dcmcodec_core::header::{Tag, VR};
    use dcmcodec_core::tag::TagError;

    // tests for just a few attributes to make sure that the entries
    // were well installed into the crate
    #[test]
    fn smoke_test() {
        let dict = StandardDataDictionary::default();

        let patient_name = dict.by_name("PatientName").expect("PatientName should exist");
        assert_eq!(patient_name.tag_range(), Single(Tag(0x0010, 0x0010)));
        assert_eq!(patient_name.vr(), VirtualVr::Exact(VR::PN));
        assert_eq!(patient_name.vm(), "1");
        assert_eq!(patient_name.description(), "Patient's Name");

        let modality = dict.by_name("Modality").expect("Modality should exist");
        assert_eq!(modality.tag(), Tag(0x0008, 0x0060));
        assert_eq!(modality.vr(), VirtualVr::Exact(VR::CS));

        let pixel_data = dict
            .by_tag(Tag(0x7FE0, 0x0010))
            .expect("Pixel Data attribute should exist");
        assert_eq!(pixel_data.tag_range(), Single(Tag(0x7FE0, 0x0010)));
        assert_eq!(pixel_data.alias(), "PixelData");
        assert_eq!(pixel_data.vr(), VirtualVr::Px);
        assert_eq!(pixel_data.vr().relaxed(), VR::OW);

        let overlay_data = dict
            .by_tag(Tag(0x6000, 0x3000))
            .expect("Overlay Data attribute should exist");
        assert_eq!(overlay_data.tag_range(), Group100(Tag(0x6000, 0x3000)));
        assert_eq!(overlay_data.alias(), "OverlayData");

        // repeated overlay data
        let overlay_data = dict
            .by_tag(Tag(0x60EE, 0x3000))
            .expect("Repeated Overlay Data attribute should exist");
        assert_eq!(overlay_data.tag_range(), Group100(Tag(0x6000, 0x3000)));
        assert_eq!(overlay_data.alias(), "OverlayData");
        assert_eq!(overlay_data.vr(), VirtualVr::Ox);
    }

    #[test]
    fn constants_available() {
        use crate::tags::*;
        assert_eq!(PATIENT_NAME, Tag(0x0010, 0x0010));
        assert_eq!(MODALITY, Tag(0x0008, 0x0060));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));
        assert_eq!(STATUS, Tag(0x0000, 0x0900));
        assert_eq!(OVERLAY_DATA, Tag(0x6000, 0x3000));
    }

    #[test]
    fn can_parse_tags() {
        let dict = StandardDataDictionary;

        assert_eq!(dict.parse_tag("(7FE0,0010)"), Ok(crate::tags::PIXEL_DATA));
        assert_eq!(dict.parse_tag("0010,21C0"), Ok(Tag(0x0010, 0x21C0)));
        assert_eq!(
            dict.parse_tag("OperatorsName"),
            Ok(crate::tags::OPERATORS_NAME)
        );

        // can't parse these
        assert!(dict.parse_tag("").is_err());
        assert!(dict.parse_tag("1111,2222,3333").is_err());
        assert_eq!(
            dict.parse_tag("OperatorNickname"),
            Err(TagError::UnknownKeyword {
                keyword: "OperatorNickname".to_string()
            })
        );
    }

    #[test]
    fn can_query_by_expression() {
        let dict = StandardDataDictionary;

        let e = dict.by_expr("(0010,0010)").expect("entry by tag");
        assert_eq!(e.alias(), "PatientName");

        let e = dict.by_expr("0008,0060").expect("entry by tag");
        assert_eq!(e.alias(), "Modality");

        let e = dict.by_expr("OperatorsName").expect("entry by keyword");
        assert_eq!(e.tag(), crate::tags::OPERATORS_NAME);
        assert_eq!(e.vm(), "1-n");

        // keywords are case sensitive
        assert!(dict.by_expr("OPERATORSNAME").is_none());
    }

    #[test]
    fn has_group_length_tags() {
        use crate::tags::*;
        let dict = StandardDataDictionary::default();

        let e = dict
            .by_tag(FILE_META_INFORMATION_GROUP_LENGTH)
            .expect("meta group length");
        assert_eq!(e.tag_range(), Single(FILE_META_INFORMATION_GROUP_LENGTH));
        assert_eq!(e.alias(), "FileMetaInformationGroupLength");
        assert_eq!(e.vr(), VirtualVr::Exact(VR::UL));

        let e = dict.by_tag(COMMAND_GROUP_LENGTH).expect("command group length");
        assert_eq!(e.alias(), "CommandGroupLength");

        // generic group length
        let e = dict.by_tag(Tag(0x7FE0, 0x0000)).expect("generic group length");
        assert_eq!(e.tag_range(), GroupLength);
        assert_eq!(e.alias(), "GenericGroupLength");
        assert_eq!(e.vr(), VirtualVr::Exact(VR::UL));

        let e = dict.by_name("GenericGroupLength").expect("by name");
        assert_eq!(e.tag_range(), GroupLength);
    }

    #[test]
    fn has_private_creator() {
        let dict = StandardDataDictionary::default();

        for tag in [
            Tag(0x0009, 0x0010),
            Tag(0x0009, 0x0011),
            Tag(0x000B, 0x0010),
            Tag(0x00ED, 0x00FF),
        ] {
            let e = dict.by_tag(tag).expect("private creator");
            assert_eq!(e.tag_range(), PrivateCreator);
            assert_eq!(e.vr(), VirtualVr::Exact(VR::LO));
        }
        // private data elements proper are not known
        assert!(dict.by_tag(Tag(0x0009, 0x1010)).is_none());
    }
}
