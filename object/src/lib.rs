#![allow(clippy::derive_partial_eq_without_eq)]
//! This crate contains a high-level abstraction for reading and manipulating
//! DICOM data sets.
//! At this level, a data set is comparable to a dictionary of elements,
//! in which some of them can have data sets themselves (sequence items).
//!
//! Loading a DICOM file can be done via the function [`open_file`].
//! For additional file reading options, use [`OpenFileOptions`].
//! New data sets can be built from scratch using [`InMemDicomObject`]
//! (see the [`mem`] module for more details).
//!
//! # Examples
//!
//! Read an object and fetch some attributes:
//!
//! ```no_run
//! use dcmcodec_dictionary_std::tags;
//! use dcmcodec_object::open_file;
//! # fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let obj = open_file("0001.dcm")?;
//!
//! let patient_name = obj.element(tags::PATIENT_NAME)?.to_str()?;
//! let modality = obj.element_by_name("Modality")?.to_str()?;
//! # Ok(())
//! # }
//! ```
//!
//! The pixel data and the elements after it can be left unread:
//!
//! ```no_run
//! use dcmcodec_object::OpenFileOptions;
//!
//! let obj = OpenFileOptions::new()
//!     .read_until(dcmcodec_dictionary_std::tags::PIXEL_DATA)
//!     .open_file("0002.dcm")?;
//! # Result::<(), dcmcodec_object::ReadError>::Ok(())
//! ```
//!
//! Writing a file requires a [file meta table](crate::meta::FileMetaTable).
//! When creating a new data set from scratch,
//! use a [`FileMetaTableBuilder`] and [`with_meta`](InMemDicomObject::with_meta):
//!
//! ```no_run
//! # use dcmcodec_object::{InMemDicomObject, FileMetaTableBuilder};
//! # fn something(obj: InMemDicomObject) -> Result<(), Box<dyn std::error::Error>> {
//! use dcmcodec_dictionary_std::uids;
//!
//! let file_obj = obj.with_meta(
//!     FileMetaTableBuilder::new()
//!         .transfer_syntax(uids::IMPLICIT_VR_LITTLE_ENDIAN)
//!         .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1")
//! )?;
//! file_obj.write_to_file("0001_new.dcm")?;
//! # Ok(())
//! # }
//! ```
//!
//! A plain data set, without preamble or file meta group,
//! is written with [`write_dataset_with_ts`](InMemDicomObject::write_dataset_with_ts):
//!
//! ```
//! # use dcmcodec_object::InMemDicomObject;
//! # use dcmcodec_core::{DataElement, Tag, VR};
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut obj = InMemDicomObject::new_empty();
//! obj.put(DataElement::new(Tag(0x0010, 0x0010), VR::PN, "Doe^John"));
//!
//! let mut serialized = Vec::new();
//! let ts = &dcmcodec_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
//! obj.write_dataset_with_ts(&mut serialized, ts)?;
//! assert_eq!(serialized.len(), 16);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
pub mod file;
pub mod mem;
pub mod meta;
pub mod pixeldata;
pub mod tokens;

pub use crate::file::{from_reader, open_file, OpenFileOptions, ReadPreamble};
pub use crate::mem::{InMemDicomObject, InMemElement, ParentLink};
pub use crate::meta::{FileMetaTable, FileMetaTableBuilder};
pub use dcmcodec_core::Tag;
pub use dcmcodec_dictionary_std::StandardDataDictionary;

use crate::tokens::ObjectTokens;
use dcmcodec_core::diagnostic::Diagnostics;
use dcmcodec_core::header::GroupNumber;
use dcmcodec_core::{CodecConfig, DataDictionary};
use dcmcodec_encoding::TransferSyntax;
use dcmcodec_parser::dataset::DataSetWriter;
use dcmcodec_transfer_syntax_registry::TransferSyntaxRegistry;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The implementation class UID of this library,
/// written to the file meta group of new files.
///
/// Generated as a UUID-derived UID, as per the standard, part 5, section B.2.
pub const IMPLEMENTATION_CLASS_UID: &str = "2.25.318426052817043581227462590131849617352";

/// The implementation version name of this library.
pub const IMPLEMENTATION_VERSION_NAME: &str = "DCMCODEC 0.3";

/// The default implementation of a root DICOM object.
pub type DefaultDicomObject<D = StandardDataDictionary> = FileDicomObject<mem::InMemDicomObject<D>>;

/// Look up a transfer syntax in the built-in registry.
pub(crate) fn lookup_transfer_syntax(uid: &str) -> Option<&'static TransferSyntax> {
    let uid = uid.trim_end_matches(|c: char| c == '\0' || c == ' ');
    TransferSyntaxRegistry.iter().find(|ts| ts.uid() == uid)
}

/// An error which may occur when loading a DICOM object
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum ReadError {
    #[snafu(display("Could not open file '{}'", filename.display()))]
    OpenFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not read from file '{}'", filename.display()))]
    ReadFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not read preamble bytes
    ReadPreambleBytes {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not move to another position of the source
    Reposition {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not parse meta group data set"))]
    ParseMetaDataSet {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    #[snafu(display("Could not read data set token"))]
    ReadToken {
        source: dcmcodec_parser::dataset::read::Error,
    },
    #[snafu(display("Could not inflate the data set"))]
    InflateDataSet {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Missing element value after header token"))]
    MissingElementValue { backtrace: Backtrace },
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    ReadUnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Unexpected token {:?}", token))]
    UnexpectedToken {
        token: Box<dcmcodec_parser::dataset::DataToken>,
        backtrace: Backtrace,
    },
    #[snafu(display("Premature data set end"))]
    PrematureEnd { backtrace: Backtrace },
    #[snafu(display("Non-conformant file"))]
    NonConformantFile {
        source: dcmcodec_core::diagnostic::NonConformantError,
    },
}

/// An error which may occur when writing a DICOM object
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum WriteError {
    #[snafu(display("Could not write to file '{}'", filename.display()))]
    WriteFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not write object preamble"))]
    WritePreamble {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not write magic code"))]
    WriteMagicCode {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not print meta group data set"))]
    PrintMetaDataSet {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    #[snafu(display("Could not prepare data set tokens"))]
    PrepareTokens {
        #[snafu(backtrace)]
        source: crate::tokens::Error,
    },
    #[snafu(display("Could not print data set"))]
    PrintDataSet {
        source: dcmcodec_parser::dataset::write::Error,
    },
    #[snafu(display("Could not deflate the data set"))]
    DeflateDataSet {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    WriteUnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
}

/// An error which may occur when looking up a DICOM object's attributes.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum AccessError {
    #[snafu(display("No such data element with tag {}", tag))]
    NoSuchDataElementTag { tag: Tag, backtrace: Backtrace },

    /// Could not resolve attribute name from the data dictionary
    #[snafu(display("Unknown data attribute named `{}`", name))]
    NoSuchAttributeName { name: Box<str> },

    /// The value of a deferred element could not be read back
    /// from the file it was found in.
    #[snafu(display("Could not read the deferred value of {} from '{}'", tag, filename.display()))]
    Materialize {
        tag: Tag,
        filename: std::path::PathBuf,
        #[snafu(source(from(MaterializeError, Box::new)))]
        source: Box<MaterializeError>,
    },
}

/// The reason why a deferred value could not be read.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum MaterializeError {
    /// Could not open the backing file
    OpenSource {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// The transfer syntax of the source is no longer known
    #[snafu(display("Unknown transfer syntax `{}`", uid))]
    UnknownTransferSyntax { uid: String, backtrace: Backtrace },
    /// Could not decode the value
    DecodeValue {
        source: dcmcodec_parser::stateful::decode::Error,
    },
}

/// An error which may occur when inserting an element
/// from a textual description.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum PutError {
    /// The text is neither a tag nor a known keyword
    #[snafu(display("Unknown attribute `{}`", name))]
    UnknownAttribute {
        name: String,
        source: dcmcodec_core::tag::TagError,
    },
    /// The text does not fit the value representation
    #[snafu(display("Invalid value for {}", tag))]
    CoerceValue {
        tag: Tag,
        source: dcmcodec_core::value::ModifyValueError,
    },
}

/// An error which may occur when looking up private data elements.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum PrivateElementError {
    #[snafu(display("Group number must be odd, found {:#06x}", group))]
    InvalidGroup { group: GroupNumber },
    #[snafu(display("Private creator {} not found in group {:#06x}", creator, group))]
    PrivateCreatorNotFound { creator: String, group: GroupNumber },
    #[snafu(display("Could not access private element"))]
    PrivateAccess {
        #[snafu(backtrace)]
        source: AccessError,
    },
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum WithMetaError {
    /// Could not build file meta table
    BuildMetaTable {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    /// Could not prepare file meta table
    PrepareMetaTable {
        #[snafu(backtrace)]
        source: AccessError,
    },
}

/// Options for writing a data set.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
    /// Write sequences and items with undefined length,
    /// closing them with delimiters.
    /// Otherwise their lengths are computed and written up front.
    pub undefined_length_sequences: bool,
    /// The codec configuration for value encoding and validation.
    pub config: CodecConfig,
}

impl WriteOptions {
    pub fn new() -> Self {
        WriteOptions::default()
    }

    /// Set whether sequences and items are written with undefined length.
    pub fn undefined_length_sequences(mut self, value: bool) -> Self {
        self.undefined_length_sequences = value;
        self
    }

    /// Set the codec configuration.
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }
}

/// A root DICOM object retrieved from a standard DICOM file,
/// containing additional information from the file meta group
/// in a separate table value.
#[derive(Debug, Clone)]
pub struct FileDicomObject<O> {
    meta: FileMetaTable,
    obj: O,
    diagnostics: Diagnostics,
}

/// This implementation ignores the collected diagnostics.
impl<O: PartialEq> PartialEq for FileDicomObject<O> {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta && self.obj == other.obj
    }
}

impl<O> FileDicomObject<O> {
    /// Retrieve the processed meta header table.
    pub fn meta(&self) -> &FileMetaTable {
        &self.meta
    }

    /// Retrieve a mutable reference to the processed meta header table.
    ///
    /// Considerable care should be taken when modifying this table,
    /// as it may influence object reading and writing operations.
    pub fn meta_mut(&mut self) -> &mut FileMetaTable {
        &mut self.meta
    }

    /// The conformance warnings raised while reading the object.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Retrieve the inner DICOM object structure, discarding the meta table.
    pub fn into_inner(self) -> O {
        self.obj
    }

    pub(crate) fn from_parts(meta: FileMetaTable, obj: O, diagnostics: Diagnostics) -> Self {
        FileDicomObject {
            meta,
            obj,
            diagnostics,
        }
    }
}

impl<D> FileDicomObject<InMemDicomObject<D>>
where
    D: DataDictionary + Clone,
{
    /// Write the entire object as a DICOM file
    /// into the given file path.
    /// Preamble, magic code, and file meta group will be included
    /// before the inner object.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let path = path.as_ref();
        let file = File::create(path).context(WriteFileSnafu { filename: path })?;
        let mut to = BufWriter::new(file);

        // write preamble
        to.write_all(&[0_u8; 128][..])
            .context(WriteFileSnafu { filename: path })?;

        self.write_from_magic(&mut to)?;
        to.flush().context(WriteFileSnafu { filename: path })
    }

    /// Write the entire object as a DICOM file
    /// into the given writer.
    /// Preamble, magic code, and file meta group will be included
    /// before the inner object.
    pub fn write_all<W: Write>(&self, to: W) -> Result<(), WriteError> {
        let mut to = BufWriter::new(to);

        // write preamble
        to.write_all(&[0_u8; 128][..]).context(WritePreambleSnafu)?;

        self.write_from_magic(&mut to)?;
        to.flush().context(WritePreambleSnafu)
    }

    fn write_from_magic<W: Write>(&self, mut to: W) -> Result<(), WriteError> {
        to.write_all(&meta::DICM_MAGIC_CODE)
            .context(WriteMagicCodeSnafu)?;
        self.meta.write(&mut to).context(PrintMetaDataSetSnafu)?;
        self.write_dataset(to)
    }

    /// Write the file meta group set into the given writer.
    ///
    /// This is equivalent to `self.meta().write(to)`.
    pub fn write_meta<W: Write>(&self, to: W) -> Result<(), WriteError> {
        self.meta.write(to).context(PrintMetaDataSetSnafu)
    }

    /// Write the inner data set into the given writer,
    /// without preamble, magic code, nor file meta group.
    ///
    /// The transfer syntax is selected from the file meta table.
    pub fn write_dataset<W: Write>(&self, to: W) -> Result<(), WriteError> {
        self.write_dataset_with_options(to, WriteOptions::default())
    }

    /// Write the inner data set into the given writer
    /// with the given options.
    pub fn write_dataset_with_options<W: Write>(
        &self,
        to: W,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        let uid = self.meta.transfer_syntax();
        let ts = lookup_transfer_syntax(uid)
            .with_context(|| WriteUnsupportedTransferSyntaxSnafu { uid })?;
        self.obj.write_dataset_with_ts_options(to, ts, options)
    }
}

impl<D> InMemDicomObject<D>
where
    D: DataDictionary + Clone,
{
    /// Write this object's data set into the given writer,
    /// with the specified transfer syntax,
    /// without preamble, magic code, nor file meta group.
    ///
    /// The default character set is assumed
    /// until the _Specific Character Set_ is found in the data set.
    pub fn write_dataset_with_ts<W>(&self, to: W, ts: &TransferSyntax) -> Result<(), WriteError>
    where
        W: Write,
    {
        self.write_dataset_with_ts_options(to, ts, WriteOptions::default())
    }

    /// Write this object's data set into the given writer,
    /// with the specified transfer syntax and write options.
    ///
    /// Data sets in a deflated transfer syntax are encoded first,
    /// then compressed as a whole.
    pub fn write_dataset_with_ts_options<W>(
        &self,
        mut to: W,
        ts: &TransferSyntax,
        options: WriteOptions,
    ) -> Result<(), WriteError>
    where
        W: Write,
    {
        if ts.unsupported() {
            return WriteUnsupportedTransferSyntaxSnafu { uid: ts.uid() }.fail();
        }
        let tokens = ObjectTokens::new(ts, options)
            .tokens(self)
            .context(PrepareTokensSnafu)?;

        if let Some(adapter) = ts.dataset_adapter() {
            let mut writer = DataSetWriter::with_ts(Vec::new(), ts, &options.config);
            writer.write_sequence(tokens).context(PrintDataSetSnafu)?;
            let data = writer.into_inner();
            adapter
                .encode_dataset(&data, &mut to)
                .context(DeflateDataSetSnafu)?;
            return to.flush().context(DeflateDataSetSnafu);
        }

        let mut writer = DataSetWriter::with_ts(to, ts, &options.config);
        writer.write_sequence(tokens).context(PrintDataSetSnafu)?;
        writer.flush().context(PrintDataSetSnafu)
    }
}

impl<O> ::std::ops::Deref for FileDicomObject<O> {
    type Target = O;

    fn deref(&self) -> &Self::Target {
        &self.obj
    }
}

impl<O> ::std::ops::DerefMut for FileDicomObject<O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.obj
    }
}

#[cfg(test)]
mod tests {
    use dcmcodec_core::{DataElement, PrimitiveValue, VR};
    use dcmcodec_dictionary_std::tags;

    use crate::meta::FileMetaTableBuilder;
    use crate::{AccessError, FileDicomObject, InMemDicomObject, OpenFileOptions};

    fn assert_type_not_too_large<T>(max_size: usize) {
        let size = std::mem::size_of::<T>();
        if size > max_size {
            panic!(
                "Type {} of byte size {} exceeds acceptable size {}",
                std::any::type_name::<T>(),
                size,
                max_size
            );
        }
    }

    #[test]
    fn errors_not_too_large() {
        assert_type_not_too_large::<AccessError>(64);
    }

    #[test]
    fn smoke_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoke-test.dcm");

        let meta = FileMetaTableBuilder::new()
            .transfer_syntax(
                dcmcodec_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN.uid(),
            )
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1")
            .media_storage_sop_instance_uid("1.2.3.456")
            .implementation_class_uid("1.2.345.6.7890.1.234")
            .build()
            .unwrap();
        let obj = InMemDicomObject::new_empty().with_exact_meta(meta);

        obj.write_to_file(&path).unwrap();

        let obj2 = OpenFileOptions::new().open_file(&path).unwrap();

        assert_eq!(obj, obj2);
        assert!(obj2.diagnostics().is_empty());
    }

    /// A FileDicomObject<InMemDicomObject>
    /// can be used like a DICOM object.
    #[test]
    fn file_dicom_object_can_use_inner() {
        let mut obj = InMemDicomObject::new_empty();

        obj.put(DataElement::new(
            tags::PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("John Doe"),
        ));

        let mut obj: FileDicomObject<_> = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
                    .media_storage_sop_instance_uid("1.2.23456789")
                    .transfer_syntax("1.2.840.10008.1.2.1"),
            )
            .unwrap();

        assert_eq!(
            obj.element(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
            "John Doe",
        );

        // can be removed with take
        obj.take_element(tags::PATIENT_NAME).unwrap();

        assert!(matches!(
            obj.element(tags::PATIENT_NAME),
            Err(AccessError::NoSuchDataElementTag { .. }),
        ));
    }
}
