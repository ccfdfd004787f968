//! In-memory representation of a DICOM data set.
//!
//! An [`InMemDicomObject`] is a collection of data elements ordered by tag.
//! Elements may be inserted, replaced and removed freely.
//! Sequence items are in-memory objects too,
//! and each one remembers which sequence and position it was read from.
//!
//! Objects read from a file may leave large values in the file
//! (see [`CodecConfig::defer_size`]).
//! Such values are read back the first time that they are accessed,
//! and stay in memory afterwards.
//!
//! # Example
//!
//! ```
//! # use dcmcodec_object::InMemDicomObject;
//! # use dcmcodec_core::{DataElement, VR};
//! use dcmcodec_dictionary_std::tags;
//!
//! let mut obj = InMemDicomObject::new_empty();
//! obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"));
//! obj.put_str("PatientID", "0123")?;
//!
//! assert_eq!(obj.element(tags::PATIENT_ID)?.to_str()?, "0123");
//! assert_eq!(obj.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use itertools::Itertools;
use once_cell::sync::OnceCell;
use smallvec::SmallVec;
use snafu::{ensure, OptionExt, ResultExt};
use std::collections::{btree_map, BTreeMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::meta::FileMetaTableBuilder;
use crate::{
    AccessError, BuildMetaTableSnafu, CoerceValueSnafu, DecodeValueSnafu, FileDicomObject,
    InflateDataSetSnafu, InvalidGroupSnafu, MaterializeError, MaterializeSnafu,
    MissingElementValueSnafu, NoSuchAttributeNameSnafu, NoSuchDataElementTagSnafu,
    OpenSourceSnafu, PrematureEndSnafu, PrivateAccessSnafu, PrivateCreatorNotFoundSnafu,
    PrivateElementError, PutError, ReadError, ReadTokenSnafu, ReadUnsupportedTransferSyntaxSnafu,
    UnexpectedTokenSnafu, UnknownAttributeSnafu, UnknownTransferSyntaxSnafu, WithMetaError,
};
use dcmcodec_core::dictionary::{DataDictionaryEntry, VirtualVr};
use dcmcodec_core::header::{DataElementHeader, GroupNumber, HasLength, Length};
use dcmcodec_core::value::{DataSetSequence, InMemFragment, PixelFragmentSequence, C};
use dcmcodec_core::{
    CodecConfig, DataDictionary, DataElement, DicomValue, Diagnostics, PrimitiveValue, Tag,
    ValidationMode, VR,
};
use dcmcodec_dictionary_std::{tags, StandardDataDictionary};
use dcmcodec_encoding::text::CharacterSets;
use dcmcodec_encoding::TransferSyntax;
use dcmcodec_parser::dataset::read::Result as ParserResult;
use dcmcodec_parser::dataset::{DataSetReader, DataSetReaderOptions, DataToken};
use dcmcodec_parser::StatefulDecoder;

/// A full in-memory DICOM data element.
pub type InMemElement<D = StandardDataDictionary> = DataElement<InMemDicomObject<D>, InMemFragment>;

type InMemValue<D> = DicomValue<InMemDicomObject<D>, InMemFragment>;

/// The position of a sequence item in its parent data set:
/// the tag of the sequence element and the index of the item in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentLink {
    pub sequence_tag: Tag,
    pub item_index: usize,
}

/// Where the deferred values of a data set can be read back from.
#[derive(Debug)]
pub(crate) struct DeferredSource {
    pub(crate) path: PathBuf,
    pub(crate) ts_uid: String,
    pub(crate) config: CodecConfig,
}

/// A data element whose value was left in the source file.
#[derive(Debug, Clone)]
struct DeferredElement<D> {
    header: DataElementHeader,
    offset: u64,
    charsets: CharacterSets,
    source: Arc<DeferredSource>,
    cell: OnceCell<InMemElement<D>>,
}

impl<D> DeferredElement<D> {
    fn get(&self) -> Result<&InMemElement<D>, AccessError> {
        self.cell
            .get_or_try_init(|| self.load())
            .context(MaterializeSnafu {
                tag: self.header.tag,
                filename: &self.source.path,
            })
    }

    fn load(&self) -> Result<InMemElement<D>, MaterializeError> {
        let source = &self.source;
        let ts = crate::lookup_transfer_syntax(&source.ts_uid).context(
            UnknownTransferSyntaxSnafu {
                uid: &source.ts_uid,
            },
        )?;
        tracing::debug!(
            "Reading deferred value of {} at offset {} from {}",
            self.header.tag,
            self.offset,
            source.path.display()
        );
        let file = File::open(&source.path).context(OpenSourceSnafu)?;
        let mut decoder = StatefulDecoder::new_at(BufReader::new(file), ts, &source.config, 0);
        decoder.seek(self.offset).context(DecodeValueSnafu)?;
        decoder.set_charsets(self.charsets.clone());
        let value = decoder.read_value(&self.header).context(DecodeValueSnafu)?;
        Ok(DataElement::new_with_len(
            self.header.tag,
            self.header.vr,
            self.header.len,
            value,
        ))
    }
}

#[derive(Debug, Clone)]
enum Slot<D> {
    Loaded(InMemElement<D>),
    Deferred(Box<DeferredElement<D>>),
}

impl<D> Slot<D> {
    fn get(&self) -> Result<&InMemElement<D>, AccessError> {
        match self {
            Slot::Loaded(elem) => Ok(elem),
            Slot::Deferred(deferred) => deferred.get(),
        }
    }

    fn header(&self) -> &DataElementHeader {
        match self {
            Slot::Loaded(elem) => elem.header(),
            Slot::Deferred(deferred) => &deferred.header,
        }
    }

    fn into_element(self) -> Result<InMemElement<D>, AccessError> {
        match self {
            Slot::Loaded(elem) => Ok(elem),
            Slot::Deferred(deferred) => {
                deferred.get()?;
                let DeferredElement { header, cell, .. } = *deferred;
                cell.into_inner()
                    .context(NoSuchDataElementTagSnafu { tag: header.tag })
            }
        }
    }
}

/// Shared state while building an object from a token stream.
pub(crate) struct BuildContext<D> {
    pub(crate) dict: D,
    pub(crate) source: Option<Arc<DeferredSource>>,
}

/// A DICOM data set held in memory,
/// with elements sorted by tag.
#[derive(Debug, Clone)]
pub struct InMemDicomObject<D = StandardDataDictionary> {
    entries: BTreeMap<Tag, Slot<D>>,
    dict: D,
    /// The length of the data set as recorded in the source,
    /// undefined for new objects.
    len: Length,
    parent: Option<ParentLink>,
}

/// Two objects are equal when they hold the same elements
/// with the same values.
/// Recorded lengths are not compared,
/// and deferred values are read in the process.
impl<D> PartialEq for InMemDicomObject<D> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((t1, s1), (t2, s2))| {
                    t1 == t2
                        && match (s1.get(), s2.get()) {
                            (Ok(e1), Ok(e2)) => element_eq(e1, e2),
                            _ => false,
                        }
                })
    }
}

fn element_eq<D>(e1: &InMemElement<D>, e2: &InMemElement<D>) -> bool {
    if e1.header().tag != e2.header().tag || e1.vr() != e2.vr() {
        return false;
    }
    match (e1.value(), e2.value()) {
        (DicomValue::Primitive(v1), DicomValue::Primitive(v2)) => primitive_eq(v1, v2),
        (DicomValue::Sequence(s1), DicomValue::Sequence(s2)) => s1.items() == s2.items(),
        (DicomValue::PixelSequence(p1), DicomValue::PixelSequence(p2)) => {
            p1.offset_table() == p2.offset_table() && p1.fragments() == p2.fragments()
        }
        _ => false,
    }
}

/// A single string compares equal to a list with just that string.
fn primitive_eq(v1: &PrimitiveValue, v2: &PrimitiveValue) -> bool {
    match (v1, v2) {
        (PrimitiveValue::Str(s), PrimitiveValue::Strs(c))
        | (PrimitiveValue::Strs(c), PrimitiveValue::Str(s)) => c.len() == 1 && c[0] == *s,
        _ => v1 == v2,
    }
}

impl<D> HasLength for InMemDicomObject<D> {
    fn length(&self) -> Length {
        self.len
    }
}

impl InMemDicomObject<StandardDataDictionary> {
    /// Create a new empty DICOM object.
    pub fn new_empty() -> Self {
        InMemDicomObject::new_empty_with_dict(StandardDataDictionary)
    }

    /// Construct a DICOM object from a sequence of data elements.
    pub fn from_element_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = InMemElement<StandardDataDictionary>>,
    {
        Self::from_iter_with_dict(iter, StandardDataDictionary)
    }

    /// Read a data set from the given source,
    /// encoded in the given transfer syntax.
    ///
    /// The data set starts at the current position of the source
    /// and is read until its end.
    /// Values are never deferred.
    pub fn read_dataset_with_ts<S>(
        from: S,
        ts: &TransferSyntax,
        config: &CodecConfig,
    ) -> Result<Self, ReadError>
    where
        S: Read + Seek,
    {
        Self::read_dataset_with_dict_ts(from, StandardDataDictionary, ts, config)
    }

    /// Read a data set from the given source,
    /// encoded in the given transfer syntax,
    /// along with the conformance warnings raised while reading it.
    pub fn read_dataset_with_ts_diagnostics<S>(
        from: S,
        ts: &TransferSyntax,
        config: &CodecConfig,
    ) -> Result<(Self, Diagnostics), ReadError>
    where
        S: Read + Seek,
    {
        Self::read_dataset_with_dict_ts_diagnostics(from, StandardDataDictionary, ts, config)
    }
}

impl<D> InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    /// Create a new empty object, using the given dictionary
    /// for name lookup.
    pub fn new_empty_with_dict(dict: D) -> Self {
        InMemDicomObject {
            entries: BTreeMap::new(),
            dict,
            len: Length::UNDEFINED,
            parent: None,
        }
    }

    /// Construct a DICOM object from a sequence of data elements,
    /// using the given dictionary for name lookup.
    pub fn from_iter_with_dict<I>(iter: I, dict: D) -> Self
    where
        I: IntoIterator<Item = InMemElement<D>>,
    {
        let mut obj = InMemDicomObject::new_empty_with_dict(dict);
        obj.extend(iter);
        obj
    }

    /// Read a data set from the given source,
    /// encoded in the given transfer syntax,
    /// using the given dictionary for name lookup.
    ///
    /// Conformance warnings are only logged.
    /// See [`read_dataset_with_dict_ts_diagnostics`](Self::read_dataset_with_dict_ts_diagnostics)
    /// to retrieve them.
    pub fn read_dataset_with_dict_ts<S>(
        from: S,
        dict: D,
        ts: &TransferSyntax,
        config: &CodecConfig,
    ) -> Result<Self, ReadError>
    where
        S: Read + Seek,
    {
        let (obj, diagnostics) =
            Self::read_dataset_with_dict_ts_diagnostics(from, dict, ts, config)?;
        for warning in diagnostics.warnings() {
            tracing::debug!("{}", warning);
        }
        Ok(obj)
    }

    /// Read a data set from the given source
    /// using the given dictionary,
    /// along with the conformance warnings raised while reading it.
    ///
    /// Under [`ValidationMode::Strict`] the first warning fails the read instead.
    pub fn read_dataset_with_dict_ts_diagnostics<S>(
        mut from: S,
        dict: D,
        ts: &TransferSyntax,
        config: &CodecConfig,
    ) -> Result<(Self, Diagnostics), ReadError>
    where
        S: Read + Seek,
    {
        let position = from.stream_position().context(crate::RepositionSnafu)?;
        Self::read_body(from, position, ts, dict, config, None, None)
    }

    /// Read a whole data set body.
    ///
    /// Deferred values are only possible when the path
    /// to the source file is known.
    pub(crate) fn read_body<S>(
        mut source: S,
        position: u64,
        ts: &TransferSyntax,
        dict: D,
        config: &CodecConfig,
        read_until: Option<Tag>,
        path: Option<&Path>,
    ) -> Result<(Self, Diagnostics), ReadError>
    where
        S: Read + Seek,
    {
        if ts.unsupported() {
            return ReadUnsupportedTransferSyntaxSnafu { uid: ts.uid() }.fail();
        }

        let mut options = DataSetReaderOptions::from_config(config);
        if read_until == Some(tags::PIXEL_DATA) {
            options = options.stop_when(stop_at_pixel_data);
        }

        if let Some(adapter) = ts.dataset_adapter() {
            let data = adapter
                .decode_dataset(&mut source)
                .context(InflateDataSetSnafu)?;
            let options = options.defer_size(None);
            let reader = DataSetReader::new_with_ts_options(Cursor::new(data), ts, config, options);
            return Self::build_root(reader, dict, None, read_until, ts);
        }

        let deferred = match (path, config.defer_size) {
            (Some(path), Some(_)) => Some(Arc::new(DeferredSource {
                path: path.to_path_buf(),
                ts_uid: ts.uid().to_string(),
                config: *config,
            })),
            _ => {
                options = options.defer_size(None);
                None
            }
        };
        let options = options.base_offset(position);
        let reader = DataSetReader::new_with_ts_options(source, ts, config, options);
        Self::build_root(reader, dict, deferred, read_until, ts)
    }

    fn build_root<S>(
        mut reader: DataSetReader<S>,
        dict: D,
        source: Option<Arc<DeferredSource>>,
        read_until: Option<Tag>,
        ts: &TransferSyntax,
    ) -> Result<(Self, Diagnostics), ReadError>
    where
        S: Read + Seek,
    {
        let ctx = BuildContext { dict, source };
        let mut obj = Self::build_object(
            &mut reader,
            &ctx,
            CharacterSets::default(),
            false,
            Length::UNDEFINED,
            read_until,
        )?;
        if !ts.is_explicit_vr() {
            obj.resolve_context_vrs(PixelContext::default());
        }
        Ok((obj, reader.take_diagnostics()))
    }

    /// Settle the value representation of elements
    /// which the dictionary only knows up to their context,
    /// such as _Pixel Data_ (OB or OW)
    /// or _Smallest Image Pixel Value_ (US or SS).
    ///
    /// Only needed for data sets read in implicit VR,
    /// where these elements are first read with their widest VR.
    /// Items inherit the image attributes of the data set holding them.
    fn resolve_context_vrs(&mut self, inherited: PixelContext) {
        let context = PixelContext {
            bits_allocated: self
                .loaded_u16(tags::BITS_ALLOCATED)
                .or(inherited.bits_allocated),
            pixel_representation: self
                .loaded_u16(tags::PIXEL_REPRESENTATION)
                .or(inherited.pixel_representation),
        };
        let has_lut_descriptor = self.entries.contains_key(&tags::LUT_DESCRIPTOR);

        let mut changes = Vec::new();
        for (&tag, slot) in &self.entries {
            if let Slot::Loaded(elem) = slot {
                if elem.primitive().is_none() {
                    continue;
                }
            }
            let Some(entry) = self.dict.by_tag(tag) else {
                continue;
            };
            let vr = match entry.vr() {
                VirtualVr::Px => narrow_ob(context.bits_allocated),
                VirtualVr::Ox if tag.group() >> 8 == 0x60 => {
                    narrow_ob(self.loaded_u16(Tag(tag.group(), 0x0100)))
                }
                VirtualVr::Ox => VR::OW,
                VirtualVr::Xs if context.pixel_representation == Some(1) && !is_descriptor(tag) => {
                    VR::SS
                }
                VirtualVr::Xs => VR::US,
                VirtualVr::Lt if has_lut_descriptor => VR::US,
                VirtualVr::Lt => VR::OW,
                _ => continue,
            };
            if slot.header().vr != vr {
                changes.push((tag, vr));
            }
        }

        for (tag, vr) in changes {
            tracing::debug!("Element {} read in implicit VR resolved to {}", tag, vr);
            let Some(slot) = self.entries.get_mut(&tag) else {
                continue;
            };
            match slot {
                Slot::Loaded(elem) => {
                    let (header, value) =
                        std::mem::replace(elem, DataElement::empty(tag, vr)).into_parts();
                    *elem = DataElement::new_with_len(tag, vr, header.len, reinterpret(value, vr));
                }
                // read with the new VR when first accessed
                Slot::Deferred(deferred) => deferred.header.vr = vr,
            }
        }

        for slot in self.entries.values_mut() {
            if let Slot::Loaded(elem) = slot {
                if let Some(items) = elem.value_mut().items_mut() {
                    for item in items.iter_mut() {
                        item.resolve_context_vrs(context);
                    }
                }
            }
        }
    }

    fn loaded_u16(&self, tag: Tag) -> Option<u16> {
        match self.entries.get(&tag) {
            Some(Slot::Loaded(elem)) => elem.to_int().ok(),
            _ => None,
        }
    }

    /// Retrieve a particular DICOM element by its tag.
    ///
    /// A deferred value is read from its source first.
    pub fn element(&self, tag: Tag) -> Result<&InMemElement<D>, AccessError> {
        self.entries
            .get(&tag)
            .context(NoSuchDataElementTagSnafu { tag })?
            .get()
    }

    /// Retrieve a particular DICOM element by its keyword.
    pub fn element_by_name(&self, name: &str) -> Result<&InMemElement<D>, AccessError> {
        let tag = self.lookup_name(name)?;
        self.element(tag)
    }

    /// Retrieve a particular DICOM element,
    /// or `None` if the object does not have it.
    pub fn element_opt(&self, tag: Tag) -> Result<Option<&InMemElement<D>>, AccessError> {
        self.entries.get(&tag).map(Slot::get).transpose()
    }

    /// Retrieve the header of an element
    /// without reading a deferred value.
    pub fn header(&self, tag: Tag) -> Option<&DataElementHeader> {
        self.entries.get(&tag).map(Slot::header)
    }

    /// Whether the element with this tag still has its value
    /// in the source file.
    pub fn is_deferred(&self, tag: Tag) -> bool {
        match self.entries.get(&tag) {
            Some(Slot::Deferred(deferred)) => deferred.cell.get().is_none(),
            _ => false,
        }
    }

    /// Insert a data element to the object, replacing (and returning) any
    /// previous element of the same attribute.
    ///
    /// Items of a sequence element are linked to their new position.
    /// A replaced element whose value was never read is not returned.
    pub fn put(&mut self, mut elt: InMemElement<D>) -> Option<InMemElement<D>> {
        let tag = elt.header().tag;
        if let Some(items) = elt.value_mut().items_mut() {
            for (i, item) in items.iter_mut().enumerate() {
                item.parent = Some(ParentLink {
                    sequence_tag: tag,
                    item_index: i,
                });
            }
        }
        match self.entries.insert(tag, Slot::Loaded(elt)) {
            Some(Slot::Loaded(old)) => Some(old),
            Some(Slot::Deferred(old)) => old.cell.into_inner(),
            None => None,
        }
    }

    /// Insert an element described by an attribute keyword or tag
    /// and the textual form of its value.
    ///
    /// The value representation comes from the data dictionary,
    /// `UN` when the attribute is not known.
    /// See [`put_coerced`](Self::put_coerced) for how the text is interpreted.
    pub fn put_str(&mut self, expr: &str, text: &str) -> Result<Option<InMemElement<D>>, PutError> {
        let tag = self
            .dict
            .parse_tag(expr)
            .context(UnknownAttributeSnafu { name: expr })?;
        let vr = self
            .dict
            .by_tag(tag)
            .map(|entry| entry.vr().relaxed())
            .unwrap_or(VR::UN);
        self.put_coerced(tag, vr, text)
    }

    /// Insert an element from the textual form of its value.
    ///
    /// Multiple values are separated by a backslash,
    /// except in text VRs which hold a single value.
    /// Numbers, dates and times are parsed into their binary form.
    pub fn put_coerced(
        &mut self,
        tag: Tag,
        vr: VR,
        text: &str,
    ) -> Result<Option<InMemElement<D>>, PutError> {
        let mut value = PrimitiveValue::Empty;
        if !text.is_empty() {
            if vr.is_single_valued_text() {
                value
                    .push_coerced(vr, text)
                    .context(CoerceValueSnafu { tag })?;
            } else {
                for part in text.split('\\') {
                    value
                        .push_coerced(vr, part)
                        .context(CoerceValueSnafu { tag })?;
                }
            }
        }
        Ok(self.put(DataElement::new(tag, vr, value)))
    }

    /// Remove a DICOM element by its tag,
    /// reporting whether it was present.
    pub fn remove_element(&mut self, tag: Tag) -> bool {
        self.entries.remove(&tag).is_some()
    }

    /// Remove a DICOM element by its keyword,
    /// reporting whether it was present.
    pub fn remove_element_by_name(&mut self, name: &str) -> Result<bool, AccessError> {
        let tag = self.lookup_name(name)?;
        Ok(self.remove_element(tag))
    }

    /// Remove and return a particular DICOM element by its tag.
    pub fn take_element(&mut self, tag: Tag) -> Result<InMemElement<D>, AccessError> {
        self.entries
            .remove(&tag)
            .context(NoSuchDataElementTagSnafu { tag })?
            .into_element()
    }

    /// Remove and return a particular DICOM element by its keyword.
    pub fn take_element_by_name(&mut self, name: &str) -> Result<InMemElement<D>, AccessError> {
        let tag = self.lookup_name(name)?;
        self.take_element(tag)
    }

    /// Remove all private data elements.
    pub fn remove_private_tags(&mut self) {
        self.entries.retain(|tag, _| !tag.is_private());
    }

    /// Obtain an iterator over the elements of this object, in tag order.
    ///
    /// Deferred values are read as they are reached.
    pub fn iter(&self) -> Iter<'_, D> {
        Iter {
            inner: self.entries.values(),
        }
    }

    /// Obtain an iterator over the tags of the object's elements.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.keys().copied()
    }

    /// The number of elements at the root of this object.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the object has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All elements of the given group, in tag order.
    pub fn group(&self, group: GroupNumber) -> Result<Vec<&InMemElement<D>>, AccessError> {
        self.entries
            .range(Tag(group, 0x0000)..=Tag(group, 0xFFFF))
            .map(|(_, slot)| slot.get())
            .collect()
    }

    /// All elements of the private block reserved by the given creator
    /// in an odd group, including the private creator element.
    pub fn private_block(
        &self,
        group: GroupNumber,
        creator: &str,
    ) -> Result<Vec<&InMemElement<D>>, PrivateElementError> {
        ensure!(group % 2 == 1, InvalidGroupSnafu { group });
        let block = self.private_block_number(group, creator)?;
        let start = Tag(group, block << 8);
        let end = Tag(group, (block << 8) | 0x00FF);

        let creator_elem = self
            .element(Tag(group, block))
            .context(PrivateAccessSnafu)?;
        std::iter::once(Ok(creator_elem))
            .chain(self.entries.range(start..=end).map(|(_, slot)| slot.get()))
            .collect::<Result<Vec<_>, _>>()
            .context(PrivateAccessSnafu)
    }

    fn private_block_number(
        &self,
        group: GroupNumber,
        creator: &str,
    ) -> Result<u16, PrivateElementError> {
        for (tag, slot) in self
            .entries
            .range(Tag(group, 0x0010)..=Tag(group, 0x00FF))
        {
            let elem = slot.get().context(PrivateAccessSnafu)?;
            if let Ok(value) = elem.to_str() {
                if value.trim() == creator {
                    return Ok(tag.element());
                }
            }
        }
        PrivateCreatorNotFoundSnafu { creator, group }.fail()
    }

    /// Visit every element of the object and of its nested items,
    /// depth first.
    ///
    /// The visitor receives the path of items leading to each element,
    /// empty for elements at the root.
    pub fn walk<F>(&self, mut visitor: F) -> Result<(), AccessError>
    where
        F: FnMut(&[ParentLink], &InMemElement<D>),
    {
        let mut path = Vec::new();
        self.walk_impl(&mut path, &mut visitor)
    }

    fn walk_impl<F>(&self, path: &mut Vec<ParentLink>, visitor: &mut F) -> Result<(), AccessError>
    where
        F: FnMut(&[ParentLink], &InMemElement<D>),
    {
        for elem in self.iter() {
            let elem = elem?;
            visitor(path, elem);
            if let Some(items) = elem.items() {
                for (item_index, item) in items.iter().enumerate() {
                    path.push(ParentLink {
                        sequence_tag: elem.header().tag,
                        item_index,
                    });
                    item.walk_impl(path, visitor)?;
                    path.pop();
                }
            }
        }
        Ok(())
    }

    /// The position of this object in its parent data set,
    /// if it is a sequence item.
    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    /// The character sets declared by this object's
    /// _Specific Character Set_,
    /// or the default character repertoire.
    pub fn charset(&self) -> CharacterSets {
        let Ok(Some(elem)) = self.element_opt(tags::SPECIFIC_CHARACTER_SET) else {
            return CharacterSets::default();
        };
        charsets_of(elem.primitive())
    }

    /// Create a DICOM file by attaching a file meta group.
    ///
    /// The media storage SOP class and instance UIDs
    /// are taken from this object's _SOP Class UID_
    /// and _SOP Instance UID_ when they are present.
    pub fn with_meta(
        self,
        mut meta: FileMetaTableBuilder,
    ) -> Result<FileDicomObject<Self>, WithMetaError> {
        if let Some(elem) = self
            .element_opt(tags::SOP_CLASS_UID)
            .context(crate::PrepareMetaTableSnafu)?
        {
            if let Ok(uid) = elem.to_str() {
                meta = meta.media_storage_sop_class_uid(uid);
            }
        }
        if let Some(elem) = self
            .element_opt(tags::SOP_INSTANCE_UID)
            .context(crate::PrepareMetaTableSnafu)?
        {
            if let Ok(uid) = elem.to_str() {
                meta = meta.media_storage_sop_instance_uid(uid);
            }
        }
        let meta = meta.build().context(BuildMetaTableSnafu)?;
        Ok(FileDicomObject::from_parts(meta, self, Diagnostics::default()))
    }

    /// Create a DICOM file with exactly the given file meta group.
    pub fn with_exact_meta(self, meta: crate::FileMetaTable) -> FileDicomObject<Self> {
        FileDicomObject::from_parts(meta, self, Diagnostics::default())
    }

    fn lookup_name(&self, name: &str) -> Result<Tag, AccessError> {
        self.dict
            .by_name(name)
            .context(NoSuchAttributeNameSnafu { name })
            .map(|entry| entry.tag())
    }

    /// Build an object from a stream of data set tokens.
    ///
    /// When `in_item` is set, the object ends at the next item delimiter.
    /// Reading stops right before the first root element
    /// at or beyond `read_until`.
    pub(crate) fn build_object<I>(
        dataset: &mut I,
        ctx: &BuildContext<D>,
        mut charsets: CharacterSets,
        in_item: bool,
        len: Length,
        read_until: Option<Tag>,
    ) -> Result<Self, ReadError>
    where
        I: ?Sized + Iterator<Item = ParserResult<DataToken>>,
    {
        let mut entries: BTreeMap<Tag, Slot<D>> = BTreeMap::new();
        let stop_at = |tag: Tag| read_until.map(|until| until <= tag).unwrap_or(false);

        while let Some(token) = dataset.next() {
            let (tag, slot) = match token.context(ReadTokenSnafu)? {
                DataToken::PixelSequenceStart { tag } => {
                    if stop_at(tag) {
                        break;
                    }
                    let value = Self::build_encapsulated_data(&mut *dataset)?;
                    (tag, Slot::Loaded(DataElement::new(tag, VR::OB, value)))
                }
                DataToken::ElementHeader(header) => {
                    if stop_at(header.tag) {
                        break;
                    }
                    let next = dataset.next().context(MissingElementValueSnafu)?;
                    match next.context(ReadTokenSnafu)? {
                        DataToken::PrimitiveValue(value) => {
                            if header.tag == tags::SPECIFIC_CHARACTER_SET {
                                charsets = charsets_of(Some(&value));
                            }
                            let elem =
                                DataElement::new_with_len(header.tag, header.vr, header.len, value);
                            (header.tag, Slot::Loaded(elem))
                        }
                        DataToken::DeferredValue { header, offset } => {
                            let Some(source) = ctx.source.clone() else {
                                return UnexpectedTokenSnafu {
                                    token: Box::new(DataToken::DeferredValue { header, offset }),
                                }
                                .fail();
                            };
                            let deferred = DeferredElement {
                                header,
                                offset,
                                charsets: charsets.clone(),
                                source,
                                cell: OnceCell::new(),
                            };
                            (header.tag, Slot::Deferred(Box::new(deferred)))
                        }
                        token => {
                            return UnexpectedTokenSnafu {
                                token: Box::new(token),
                            }
                            .fail()
                        }
                    }
                }
                DataToken::SequenceStart { tag, len } => {
                    if stop_at(tag) {
                        break;
                    }
                    let items = Self::build_sequence(tag, &mut *dataset, ctx, &charsets)?;
                    let elem = DataElement::new_with_len(
                        tag,
                        VR::SQ,
                        len,
                        DataSetSequence::new(items, len),
                    );
                    (tag, Slot::Loaded(elem))
                }
                DataToken::ItemEnd if in_item => {
                    return Ok(InMemDicomObject {
                        entries,
                        dict: ctx.dict.clone(),
                        len,
                        parent: None,
                    });
                }
                token => {
                    return UnexpectedTokenSnafu {
                        token: Box::new(token),
                    }
                    .fail()
                }
            };
            entries.insert(tag, slot);
        }

        if in_item {
            return PrematureEndSnafu.fail();
        }

        Ok(InMemDicomObject {
            entries,
            dict: ctx.dict.clone(),
            len,
            parent: None,
        })
    }

    fn build_sequence<I>(
        tag: Tag,
        dataset: &mut I,
        ctx: &BuildContext<D>,
        charsets: &CharacterSets,
    ) -> Result<C<Self>, ReadError>
    where
        I: ?Sized + Iterator<Item = ParserResult<DataToken>>,
    {
        let mut items: C<Self> = SmallVec::new();
        while let Some(token) = dataset.next() {
            match token.context(ReadTokenSnafu)? {
                DataToken::ItemStart { len } => {
                    let mut item =
                        Self::build_object(&mut *dataset, ctx, charsets.clone(), true, len, None)?;
                    item.parent = Some(ParentLink {
                        sequence_tag: tag,
                        item_index: items.len(),
                    });
                    items.push(item);
                }
                DataToken::SequenceEnd => return Ok(items),
                token => {
                    return UnexpectedTokenSnafu {
                        token: Box::new(token),
                    }
                    .fail()
                }
            }
        }
        PrematureEndSnafu.fail()
    }

    fn build_encapsulated_data<I>(
        dataset: &mut I,
    ) -> Result<PixelFragmentSequence<InMemFragment>, ReadError>
    where
        I: ?Sized + Iterator<Item = ParserResult<DataToken>>,
    {
        let mut offset_table = C::new();
        let mut fragments = C::new();
        while let Some(token) = dataset.next() {
            match token.context(ReadTokenSnafu)? {
                DataToken::OffsetTable(table) => offset_table = table,
                DataToken::ItemValue(data) => fragments.push(data),
                DataToken::SequenceEnd => {
                    return Ok(PixelFragmentSequence::new(offset_table, fragments))
                }
                token => {
                    return UnexpectedTokenSnafu {
                        token: Box::new(token),
                    }
                    .fail()
                }
            }
        }
        PrematureEndSnafu.fail()
    }
}

/// Image attributes in scope of a data set.
#[derive(Debug, Default, Clone, Copy)]
struct PixelContext {
    bits_allocated: Option<u16>,
    pixel_representation: Option<u16>,
}

/// OB for samples of up to 8 bits, OW otherwise.
fn narrow_ob(bits_allocated: Option<u16>) -> VR {
    match bits_allocated {
        Some(bits) if bits <= 8 => VR::OB,
        _ => VR::OW,
    }
}

/// LUT descriptors keep their first and third values unsigned.
fn is_descriptor(tag: Tag) -> bool {
    tag == tags::LUT_DESCRIPTOR
        || (tag.group() == 0x0028 && (0x1101..=0x1103).contains(&tag.element()))
}

/// Convert a value read with the widest VR of its element
/// into the representation of the narrower one.
/// Implicit VR is always little endian.
fn reinterpret<D>(value: InMemValue<D>, vr: VR) -> InMemValue<D> {
    match (value, vr) {
        (DicomValue::Primitive(PrimitiveValue::U16(values)), VR::SS) => {
            PrimitiveValue::I16(values.into_iter().map(|v| v as i16).collect()).into()
        }
        (DicomValue::Primitive(PrimitiveValue::U8(bytes)), VR::US) => PrimitiveValue::U16(
            bytes
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect(),
        )
        .into(),
        (value, _) => value,
    }
}

fn stop_at_pixel_data(tag: Tag, _vr: VR, _len: Length) -> bool {
    tag >= tags::PIXEL_DATA
}

/// Resolve the character sets named by a _Specific Character Set_ value.
/// Unknown terms were already reported by the reader.
pub(crate) fn charsets_of(value: Option<&PrimitiveValue>) -> CharacterSets {
    let Some(value) = value else {
        return CharacterSets::default();
    };
    let terms = value.to_multi_str();
    let terms = terms.iter().map(|t| t.trim()).collect_vec();
    let mut diagnostics = Diagnostics::new(ValidationMode::Ignore);
    CharacterSets::from_terms(&terms, &mut diagnostics).unwrap_or_default()
}

impl<D> Extend<InMemElement<D>> for InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = InMemElement<D>>,
    {
        for elem in iter {
            self.put(elem);
        }
    }
}

/// Iterator over the elements of an [`InMemDicomObject`].
#[derive(Debug)]
pub struct Iter<'a, D> {
    inner: btree_map::Values<'a, Tag, Slot<D>>,
}

impl<'a, D> Iterator for Iter<'a, D> {
    type Item = Result<&'a InMemElement<D>, AccessError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Slot::get)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, D> IntoIterator for &'a InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    type Item = Result<&'a InMemElement<D>, AccessError>;
    type IntoIter = Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::dicom_value;
    use dcmcodec_transfer_syntax_registry::entries::{
        EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN,
    };

    fn build(tokens: Vec<DataToken>) -> Result<InMemDicomObject, ReadError> {
        let ctx = BuildContext {
            dict: StandardDataDictionary,
            source: None,
        };
        InMemDicomObject::build_object(
            &mut tokens.into_iter().map(Ok),
            &ctx,
            CharacterSets::default(),
            false,
            Length::UNDEFINED,
            None,
        )
    }

    fn nested_object() -> InMemDicomObject {
        let item = InMemDicomObject::from_element_iter([DataElement::new(
            tags::REFERENCED_SOP_CLASS_UID,
            VR::UI,
            "1.2",
        )]);
        InMemDicomObject::from_element_iter([
            DataElement::new(
                tags::REFERENCED_IMAGE_SEQUENCE,
                VR::SQ,
                DataSetSequence::new(vec![item], Length::UNDEFINED),
            ),
            DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"),
        ])
    }

    #[test]
    fn inmem_object_compare() {
        let mut obj1 = InMemDicomObject::new_empty();
        let mut obj2 = InMemDicomObject::new_empty();
        assert_eq!(obj1, obj2);
        let empty_patient_name = DataElement::empty(tags::PATIENT_NAME, VR::PN);
        obj1.put(empty_patient_name.clone());
        assert_ne!(obj1, obj2);
        obj2.put(empty_patient_name);
        assert_eq!(obj1, obj2);
    }

    #[test]
    fn inmem_object_read_dataset() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0008,1140) ReferencedImageSequence, undefined length
            0x08, 0x00, 0x40, 0x11, 0xFF, 0xFF, 0xFF, 0xFF,
            // item, undefined length
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            // (0008,1150) ReferencedSOPClassUID, "1.2\0"
            0x08, 0x00, 0x50, 0x11, 0x04, 0x00, 0x00, 0x00,
            b'1', b'.', b'2', 0x00,
            // item delimiter
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // sequence delimiter
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // (0010,0010) PatientName, "Doe^John"
            0x10, 0x00, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00,
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        ];

        let obj = InMemDicomObject::read_dataset_with_ts(
            Cursor::new(DATA),
            &IMPLICIT_VR_LITTLE_ENDIAN,
            &CodecConfig::default(),
        )
        .unwrap();

        assert_eq!(obj, nested_object());

        let name = obj.element(tags::PATIENT_NAME).unwrap();
        assert_eq!(name.vr(), VR::PN);
        assert_eq!(name.to_str().unwrap(), "Doe^John");

        let items = obj
            .element(tags::REFERENCED_IMAGE_SEQUENCE)
            .unwrap()
            .items()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].parent(),
            Some(ParentLink {
                sequence_tag: tags::REFERENCED_IMAGE_SEQUENCE,
                item_index: 0,
            })
        );
        assert_eq!(
            items[0]
                .element(tags::REFERENCED_SOP_CLASS_UID)
                .unwrap()
                .to_str()
                .unwrap(),
            "1.2"
        );
    }

    fn implicit_vr_round_trip(obj: &InMemDicomObject) -> InMemDicomObject {
        let mut bytes = Vec::new();
        obj.write_dataset_with_ts(&mut bytes, &IMPLICIT_VR_LITTLE_ENDIAN)
            .unwrap();
        InMemDicomObject::read_dataset_with_ts(
            Cursor::new(bytes),
            &IMPLICIT_VR_LITTLE_ENDIAN,
            &CodecConfig::default(),
        )
        .unwrap()
    }

    #[rstest::rstest]
    #[case(8, VR::OB)]
    #[case(16, VR::OW)]
    fn implicit_vr_pixel_data_follows_bits_allocated(#[case] bits: u16, #[case] vr: VR) {
        let obj = InMemDicomObject::from_element_iter([
            DataElement::new(tags::BITS_ALLOCATED, VR::US, dicom_value!(U16, [bits])),
            DataElement::new(tags::PIXEL_DATA, vr, PrimitiveValue::from(vec![1_u8, 2, 3, 4])),
        ]);

        let read = implicit_vr_round_trip(&obj);

        assert_eq!(read.element(tags::PIXEL_DATA).unwrap().vr(), vr);
        assert_eq!(read, obj);
    }

    #[test]
    fn implicit_vr_pixel_value_follows_pixel_representation() {
        let signed = InMemDicomObject::from_element_iter([
            DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, dicom_value!(U16, [1])),
            DataElement::new(tags::SMALLEST_IMAGE_PIXEL_VALUE, VR::SS, dicom_value!(I16, [-2])),
        ]);
        let read = implicit_vr_round_trip(&signed);
        let elem = read.element(tags::SMALLEST_IMAGE_PIXEL_VALUE).unwrap();
        assert_eq!(elem.vr(), VR::SS);
        assert_eq!(elem.primitive(), Some(&dicom_value!(I16, [-2])));
        assert_eq!(read, signed);

        let unsigned = InMemDicomObject::from_element_iter([
            DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, dicom_value!(U16, [0])),
            DataElement::new(tags::SMALLEST_IMAGE_PIXEL_VALUE, VR::US, dicom_value!(U16, [2])),
        ]);
        let read = implicit_vr_round_trip(&unsigned);
        assert_eq!(
            read.element(tags::SMALLEST_IMAGE_PIXEL_VALUE).unwrap().vr(),
            VR::US
        );
        assert_eq!(read, unsigned);
    }

    #[test]
    fn implicit_vr_lut_data_follows_lut_descriptor() {
        let item = InMemDicomObject::from_element_iter([
            DataElement::new(tags::LUT_DESCRIPTOR, VR::US, dicom_value!(U16, [4, 0, 16])),
            DataElement::new(tags::LUT_DATA, VR::US, dicom_value!(U16, [1, 2, 3, 4])),
        ]);
        // signed pixels do not change the descriptor
        let obj = InMemDicomObject::from_element_iter([
            DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, dicom_value!(U16, [1])),
            DataElement::new(
                tags::MODALITY_LUT_SEQUENCE,
                VR::SQ,
                DataSetSequence::new(vec![item], Length::UNDEFINED),
            ),
        ]);

        let read = implicit_vr_round_trip(&obj);

        let items = read
            .element(tags::MODALITY_LUT_SEQUENCE)
            .unwrap()
            .items()
            .unwrap();
        let descriptor = items[0].element(tags::LUT_DESCRIPTOR).unwrap();
        assert_eq!(descriptor.vr(), VR::US);
        let data = items[0].element(tags::LUT_DATA).unwrap();
        assert_eq!(data.vr(), VR::US);
        assert_eq!(data.primitive(), Some(&dicom_value!(U16, [1, 2, 3, 4])));
        assert_eq!(read, obj);
    }

    #[test]
    fn implicit_vr_overlay_data_follows_overlay_bits_allocated() {
        let obj = InMemDicomObject::from_element_iter([
            DataElement::new(tags::OVERLAY_BITS_ALLOCATED, VR::US, dicom_value!(U16, [1])),
            DataElement::new(
                tags::OVERLAY_DATA,
                VR::OB,
                PrimitiveValue::from(vec![0xFF_u8, 0, 0xFF, 0, 0x0F, 0xF0, 0, 0]),
            ),
        ]);

        let read = implicit_vr_round_trip(&obj);

        assert_eq!(read.element(tags::OVERLAY_DATA).unwrap().vr(), VR::OB);
        assert_eq!(read, obj);
    }

    #[test]
    fn undefined_length_value_is_written_with_its_actual_length() {
        let obj = InMemDicomObject::from_element_iter([DataElement::new_with_len(
            tags::PATIENT_ID,
            VR::LO,
            Length::UNDEFINED,
            "ABC",
        )]);

        let mut bytes = Vec::new();
        obj.write_dataset_with_ts(&mut bytes, &EXPLICIT_VR_LITTLE_ENDIAN)
            .unwrap();
        assert_eq!(
            bytes,
            [0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'A', b'B', b'C', b' ']
        );

        let read = InMemDicomObject::read_dataset_with_ts(
            Cursor::new(bytes),
            &EXPLICIT_VR_LITTLE_ENDIAN,
            &CodecConfig::default(),
        )
        .unwrap();
        let elem = read.element(tags::PATIENT_ID).unwrap();
        assert_eq!(elem.header().len, Length(4));
        assert_eq!(elem.to_str().unwrap(), "ABC");
    }

    #[test]
    fn read_dataset_reports_diagnostics() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0010,0020) PatientID, odd length 3, "ABC"
            0x10, 0x00, 0x20, 0x00, 0x03, 0x00, 0x00, 0x00,
            b'A', b'B', b'C',
        ];

        let (obj, diagnostics) = InMemDicomObject::read_dataset_with_ts_diagnostics(
            Cursor::new(DATA),
            &IMPLICIT_VR_LITTLE_ENDIAN,
            &CodecConfig::default(),
        )
        .unwrap();

        assert_eq!(obj.element(tags::PATIENT_ID).unwrap().to_str().unwrap(), "ABC");
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn inmem_object_from_tokens() {
        let tokens = vec![
            DataToken::SequenceStart {
                tag: tags::REFERENCED_IMAGE_SEQUENCE,
                len: Length::UNDEFINED,
            },
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ElementHeader(DataElementHeader::new(
                tags::REFERENCED_SOP_CLASS_UID,
                VR::UI,
                Length(4),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("1.2")),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::ElementHeader(DataElementHeader::new(
                tags::PATIENT_NAME,
                VR::PN,
                Length(8),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("Doe^John")),
        ];

        let obj = build(tokens).unwrap();
        assert_eq!(obj, nested_object());
    }

    #[test]
    fn inmem_object_encapsulated_pixel_data_from_tokens() {
        let tokens = vec![
            DataToken::PixelSequenceStart {
                tag: tags::PIXEL_DATA,
            },
            DataToken::OffsetTable(C::new()),
            DataToken::ItemValue(vec![0x99; 32]),
            DataToken::ItemValue(vec![0x42; 16]),
            DataToken::SequenceEnd,
        ];

        let obj = build(tokens).unwrap();
        let elem = obj.element(tags::PIXEL_DATA).unwrap();
        assert_eq!(elem.vr(), VR::OB);
        assert!(elem.header().len.is_undefined());
        let fragments = elem.fragments().unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], vec![0x99; 32]);
        assert_eq!(fragments[1], vec![0x42; 16]);
    }

    #[test]
    fn inmem_object_unterminated_item_fails() {
        let tokens = vec![
            DataToken::SequenceStart {
                tag: tags::REFERENCED_IMAGE_SEQUENCE,
                len: Length::UNDEFINED,
            },
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
        ];
        assert!(matches!(build(tokens), Err(ReadError::PrematureEnd { .. })));
    }

    #[test]
    fn inmem_object_header_without_value_fails() {
        let tokens = vec![DataToken::ElementHeader(DataElementHeader::new(
            tags::PATIENT_NAME,
            VR::PN,
            Length(8),
        ))];
        assert!(matches!(
            build(tokens),
            Err(ReadError::MissingElementValue { .. })
        ));
    }

    #[test]
    fn inmem_object_deferred_token_without_source_fails() {
        let header = DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(1024));
        let tokens = vec![
            DataToken::ElementHeader(header),
            DataToken::DeferredValue {
                header,
                offset: 256,
            },
        ];
        assert!(matches!(
            build(tokens),
            Err(ReadError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn inmem_object_read_until() {
        let tokens = vec![
            DataToken::ElementHeader(DataElementHeader::new(tags::MODALITY, VR::CS, Length(2))),
            DataToken::PrimitiveValue(PrimitiveValue::from("OT")),
            DataToken::ElementHeader(DataElementHeader::new(
                tags::PATIENT_NAME,
                VR::PN,
                Length(8),
            )),
            DataToken::PrimitiveValue(PrimitiveValue::from("Doe^John")),
        ];
        let ctx = BuildContext {
            dict: StandardDataDictionary,
            source: None,
        };
        let obj = InMemDicomObject::build_object(
            &mut tokens.into_iter().map(Ok),
            &ctx,
            CharacterSets::default(),
            false,
            Length::UNDEFINED,
            Some(tags::PATIENT_NAME),
        )
        .unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.element(tags::MODALITY).is_ok());
        assert!(obj.element_opt(tags::PATIENT_NAME).unwrap().is_none());
    }

    #[test]
    fn inmem_object_put_and_take() {
        let mut obj = InMemDicomObject::new_empty();
        let patient_name = DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John");
        assert_eq!(obj.put(patient_name.clone()), None);
        assert_eq!(
            obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^Jane")),
            Some(patient_name)
        );

        assert_eq!(
            obj.element_by_name("PatientName").unwrap().to_str().unwrap(),
            "Doe^Jane"
        );
        let taken = obj.take_element_by_name("PatientName").unwrap();
        assert_eq!(taken.to_str().unwrap(), "Doe^Jane");
        assert!(obj.is_empty());

        assert!(matches!(
            obj.take_element(tags::PATIENT_NAME),
            Err(AccessError::NoSuchDataElementTag { .. })
        ));
        assert!(matches!(
            obj.element_by_name("NotAnAttribute"),
            Err(AccessError::NoSuchAttributeName { .. })
        ));
    }

    #[test]
    fn inmem_object_remove_elements() {
        let mut obj = nested_object();
        assert!(obj.remove_element_by_name("PatientName").unwrap());
        assert!(!obj.remove_element(tags::PATIENT_NAME));
        assert_eq!(
            obj.tags().collect::<Vec<_>>(),
            vec![tags::REFERENCED_IMAGE_SEQUENCE]
        );
    }

    #[test]
    fn inmem_object_put_str() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put_str("PatientName", "Doe^John").unwrap();
        obj.put_str("(0028,0010)", "512").unwrap();
        obj.put_str("0028,0011", "256").unwrap();
        obj.put_str("ImageType", "ORIGINAL\\PRIMARY").unwrap();
        obj.put_str("ImageComments", "a \\ b").unwrap();

        assert_eq!(
            obj.element(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
            "Doe^John"
        );

        let rows = obj.element(tags::ROWS).unwrap();
        assert_eq!(rows.vr(), VR::US);
        assert_eq!(rows.primitive(), Some(&dicom_value!(U16, [512])));
        assert_eq!(obj.element(tags::COLUMNS).unwrap().to_int::<u16>().unwrap(), 256);

        let image_type = obj.element(Tag(0x0008, 0x0008)).unwrap();
        assert_eq!(image_type.vr(), VR::CS);
        assert_eq!(
            image_type.to_multi_str().unwrap(),
            &["ORIGINAL".to_string(), "PRIMARY".to_string()][..]
        );

        // LT holds a single value
        let comments = obj.element(Tag(0x0020, 0x4000)).unwrap();
        assert_eq!(comments.vr(), VR::LT);
        assert_eq!(comments.to_str().unwrap(), "a \\ b");

        assert!(matches!(
            obj.put_str("NotAnAttribute", "x"),
            Err(PutError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            obj.put_str("Rows", "many"),
            Err(PutError::CoerceValue { .. })
        ));
    }

    #[test]
    fn inmem_object_groups_and_private_blocks() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"));
        obj.put(DataElement::new(tags::PATIENT_ID, VR::LO, "0123"));
        obj.put(DataElement::new(tags::MODALITY, VR::CS, "OT"));
        obj.put(DataElement::new(Tag(0x0009, 0x0010), VR::LO, "ACME 1.1"));
        obj.put(DataElement::new(Tag(0x0009, 0x0011), VR::LO, "OTHER"));
        obj.put(DataElement::new(Tag(0x0009, 0x1001), VR::LO, "first"));
        obj.put(DataElement::new(Tag(0x0009, 0x1002), VR::LO, "second"));
        obj.put(DataElement::new(Tag(0x0009, 0x1101), VR::LO, "other"));

        let group = obj.group(0x0010).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].header().tag, tags::PATIENT_NAME);

        let block = obj.private_block(0x0009, "ACME 1.1").unwrap();
        let block_tags = block.iter().map(|e| e.header().tag).collect_vec();
        assert_eq!(
            block_tags,
            vec![Tag(0x0009, 0x0010), Tag(0x0009, 0x1001), Tag(0x0009, 0x1002)]
        );

        assert!(matches!(
            obj.private_block(0x0010, "ACME 1.1"),
            Err(PrivateElementError::InvalidGroup { group: 0x0010 })
        ));
        assert!(matches!(
            obj.private_block(0x0009, "NOBODY"),
            Err(PrivateElementError::PrivateCreatorNotFound { .. })
        ));

        obj.remove_private_tags();
        assert_eq!(obj.len(), 3);
        assert!(obj.tags().all(|tag| !tag.is_private()));
    }

    #[test]
    fn inmem_object_walk() {
        let obj = nested_object();
        let mut visited = Vec::new();
        obj.walk(|path, elem| visited.push((path.to_vec(), elem.header().tag)))
            .unwrap();

        assert_eq!(
            visited,
            vec![
                (vec![], tags::REFERENCED_IMAGE_SEQUENCE),
                (
                    vec![ParentLink {
                        sequence_tag: tags::REFERENCED_IMAGE_SEQUENCE,
                        item_index: 0,
                    }],
                    tags::REFERENCED_SOP_CLASS_UID
                ),
                (vec![], tags::PATIENT_NAME),
            ]
        );
    }

    #[test]
    fn inmem_object_charset() {
        let mut obj = InMemDicomObject::new_empty();
        assert_eq!(obj.charset(), CharacterSets::default());
        obj.put(DataElement::new(
            tags::SPECIFIC_CHARACTER_SET,
            VR::CS,
            "ISO_IR 192",
        ));
        assert_ne!(obj.charset(), CharacterSets::default());
    }

    #[test]
    fn inmem_object_with_meta() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            "1.2.840.10008.5.1.4.1.1.7",
        ));
        obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.1234"));

        let file_obj = obj
            .with_meta(FileMetaTableBuilder::new().transfer_syntax("1.2.840.10008.1.2.1"))
            .unwrap();
        assert_eq!(
            file_obj.meta().media_storage_sop_class_uid(),
            "1.2.840.10008.5.1.4.1.1.7"
        );
        assert_eq!(file_obj.meta().media_storage_sop_instance_uid(), "2.25.1234");
    }

    #[test]
    fn inmem_object_with_meta_requires_instance_uid() {
        let obj = InMemDicomObject::new_empty();
        assert!(matches!(
            obj.with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
            ),
            Err(WithMetaError::BuildMetaTable { .. })
        ));
    }
}
