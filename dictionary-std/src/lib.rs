//! This crate implements the standard DICOM dictionaries and constants
//! used by the dataset codec.
//!
//! ## Run-time dictionaries
//!
//! - [`data_element`]: information about the DICOM attributes
//!   specified in the standard,
//!   used by default when reading and writing data sets.
//!   It is provided as a singleton behind the unit type
//!   [`StandardDataDictionary`].
//! - [`private`]: dictionaries of private attributes,
//!   one per private creator.
//!
//! Both kinds of dictionaries may be extended at run time
//! with [`add_dict_entries`] and [`add_private_dict_entries`].
//! Registered entries live behind a read-write lock,
//! so lookups from multiple threads may happen concurrently.
//!
//! ## Constants
//!
//! - [`tags`], which map an attribute keyword to a DICOM tag
//! - [`uids`], for transfer syntax and SOP class unique identifiers
//!
//! ## Example
//!
//! ```
//! use dcmcodec_core::{Tag, VR};
//! use dcmcodec_dictionary_std::{dictionary_vr, keyword_for_tag, tags};
//!
//! assert_eq!(dictionary_vr(tags::PATIENT_NAME), VR::PN);
//! assert_eq!(keyword_for_tag(Tag(0x0008, 0x0060)).as_deref(), Some("Modality"));
//! // unknown tags are reported as UN
//! assert_eq!(dictionary_vr(Tag(0x0009, 0x1001)), VR::UN);
//! ```
pub mod data_element;
pub mod private;
pub mod tags;
pub mod uids;

pub use data_element::{StandardDataDictionary, StandardDataDictionaryRegistry};
pub use private::{PrivateDictionaryEntry, PrivateTagKey};

use dcmcodec_core::dictionary::{
    is_valid_vm, DataDictionary, DataDictionaryEntry, DataDictionaryEntryBuf, TagRange,
    VirtualVr,
};
use dcmcodec_core::header::{Tag, VR};
use snafu::{ensure, OptionExt, Snafu};
use std::sync::Arc;

/// An error raised when looking up or registering dictionary entries.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[non_exhaustive]
pub enum LookupError {
    /// The tag is not in the dictionary.
    #[snafu(display("Tag {} not found in the data dictionary", tag))]
    UnknownTag { tag: Tag },

    /// The keyword is not in the dictionary.
    #[snafu(display("Keyword `{}` not found in the data dictionary", keyword))]
    UnknownKeyword { keyword: String },

    /// The private creator has no dictionary.
    #[snafu(display("Private creator '{}' not in the private dictionary", creator))]
    UnknownPrivateCreator { creator: String },

    /// The private creator's dictionary has no entry for the tag.
    #[snafu(display(
        "Tag {} not in private dictionary for private creator '{}'",
        tag,
        creator
    ))]
    UnknownPrivateTag { tag: Tag, creator: String },

    /// A private tag was given to the public dictionary.
    #[snafu(display(
        "Private tag {} cannot be added using `add_dict_entries`; use `add_private_dict_entries` instead",
        tag
    ))]
    PrivateTagInPublicDictionary { tag: Tag },

    /// A public tag was given to a private dictionary.
    #[snafu(display(
        "Non-private tag {} cannot be added using `add_private_dict_entries`; use `add_dict_entries` instead",
        tag
    ))]
    PublicTagInPrivateDictionary { tag: Tag },

    /// The value multiplicity rule is malformed.
    #[snafu(display("Invalid value multiplicity `{}`", vm))]
    InvalidVm { vm: String },

    /// Generic tag ranges cannot be registered.
    #[snafu(display("Tag range {:?} cannot be registered", range))]
    UnsupportedTagRange { range: TagRange },
}

/// Result type for dictionary lookups.
pub type Result<T, E = LookupError> = std::result::Result<T, E>;

fn entry(tag: Tag) -> Result<Arc<DataDictionaryEntryBuf>> {
    StandardDataDictionary.by_tag(tag).context(UnknownTagSnafu { tag })
}

/// The value representation of the attribute with the given tag.
///
/// Context-dependent representations are relaxed
/// (for instance, _Pixel Data_ yields `OW`).
/// Returns [`VR::UN`] if the tag is not in the dictionary.
pub fn dictionary_vr(tag: Tag) -> VR {
    StandardDataDictionary
        .by_tag(tag)
        .map_or(VR::UN, |e| e.vr().relaxed())
}

/// The value multiplicity rule of the attribute with the given tag.
pub fn dictionary_vm(tag: Tag) -> Result<String> {
    entry(tag).map(|e| e.vm.clone())
}

/// The human readable name of the attribute with the given tag.
pub fn dictionary_description(tag: Tag) -> Result<String> {
    entry(tag).map(|e| e.description.clone())
}

/// The keyword of the attribute with the given tag.
pub fn dictionary_keyword(tag: Tag) -> Result<String> {
    entry(tag).map(|e| e.alias.clone())
}

/// Whether the attribute with the given tag has been retired.
pub fn dictionary_is_retired(tag: Tag) -> Result<bool> {
    entry(tag).map(|e| e.retired)
}

/// Whether the tag is declared in the public dictionary,
/// either directly or as part of a repeating group.
///
/// The generic group length and private creator records do not count.
pub fn dictionary_has_tag(tag: Tag) -> bool {
    data_element::registry().declared(tag).is_some()
}

/// The keyword of the attribute with the given tag, if known.
pub fn keyword_for_tag(tag: Tag) -> Option<String> {
    data_element::registry()
        .declared(tag)
        .map(|e| e.alias.clone())
}

/// The tag of the attribute with the given keyword, if known.
pub fn tag_for_keyword(keyword: &str) -> Option<Tag> {
    StandardDataDictionary.by_name(keyword).map(|e| e.tag())
}

/// Look up the private dictionary entry for a tag
/// reserved by the given private creator.
pub fn private_entry(tag: Tag, creator: &str) -> Result<Arc<PrivateDictionaryEntry>> {
    match private::lookup(tag, creator) {
        Ok(Some(entry)) => Ok(entry),
        Ok(None) => UnknownPrivateTagSnafu { tag, creator }.fail(),
        Err(()) => UnknownPrivateCreatorSnafu { creator }.fail(),
    }
}

/// The value representation of a private attribute.
pub fn private_dictionary_vr(tag: Tag, creator: &str) -> Result<VR> {
    private_entry(tag, creator).map(|e| e.vr)
}

/// The value multiplicity rule of a private attribute.
pub fn private_dictionary_vm(tag: Tag, creator: &str) -> Result<String> {
    private_entry(tag, creator).map(|e| e.vm.clone())
}

/// The human readable name of a private attribute.
pub fn private_dictionary_description(tag: Tag, creator: &str) -> Result<String> {
    private_entry(tag, creator).map(|e| e.description.clone())
}

/// Add a single attribute to the public dictionary,
/// replacing any existing entry with the same tag.
///
/// Fails if the tag is private or if the multiplicity rule is malformed.
pub fn add_dict_entry(
    tag: Tag,
    vr: VR,
    keyword: &str,
    description: &str,
    vm: &str,
) -> Result<()> {
    add_dict_entries([DataDictionaryEntryBuf {
        tag: TagRange::Single(tag),
        alias: keyword.to_string(),
        vr: VirtualVr::Exact(vr),
        vm: vm.to_string(),
        description: description.to_string(),
        retired: false,
    }])
}

/// Add several attributes to the public dictionary.
///
/// All entries are validated before any of them is registered,
/// so either all of them are added or none is.
pub fn add_dict_entries<I>(entries: I) -> Result<()>
where
    I: IntoIterator<Item = DataDictionaryEntryBuf>,
{
    let entries: Vec<_> = entries.into_iter().collect();
    for e in &entries {
        match e.tag {
            TagRange::Single(tag) => {
                ensure!(!tag.is_private(), PrivateTagInPublicDictionarySnafu { tag })
            }
            TagRange::Group100(_) | TagRange::Element100(_) => {}
            range => return UnsupportedTagRangeSnafu { range }.fail(),
        }
        ensure!(is_valid_vm(&e.vm), InvalidVmSnafu { vm: e.vm.clone() });
    }

    let mut registry = data_element::registry_mut();
    for e in entries {
        tracing::debug!("Registering dictionary entry {} {:?}", e.alias, e.tag);
        registry.index(e);
    }
    Ok(())
}

/// Add a single attribute to the dictionary of a private creator.
///
/// The upper byte of the element number is ignored,
/// so the entry applies to any block reserved by the creator.
pub fn add_private_dict_entry(
    creator: &str,
    tag: Tag,
    vr: VR,
    description: &str,
    vm: &str,
) -> Result<()> {
    add_private_dict_entries(
        creator,
        [(tag, PrivateDictionaryEntry::new(vr, vm, description))],
    )
}

/// Add several attributes to the dictionary of a private creator.
///
/// All entries are validated before any of them is registered.
pub fn add_private_dict_entries<I>(creator: &str, entries: I) -> Result<()>
where
    I: IntoIterator<Item = (Tag, PrivateDictionaryEntry)>,
{
    let entries: Vec<_> = entries.into_iter().collect();
    for (tag, e) in &entries {
        ensure!(
            tag.is_private(),
            PublicTagInPrivateDictionarySnafu { tag: *tag }
        );
        ensure!(is_valid_vm(&e.vm), InvalidVmSnafu { vm: e.vm.clone() });
    }
    private::insert(creator, entries);
    Ok(())
}
