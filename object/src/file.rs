//! Opening DICOM files and reading them from byte sources.
use dcmcodec_core::diagnostic::{ConformanceWarning, WarningKind};
use dcmcodec_core::{CodecConfig, DataDictionary, Diagnostics, Tag};
use dcmcodec_dictionary_std::{tags, StandardDataDictionary};
use dcmcodec_transfer_syntax_registry::entries::IMPLICIT_VR_LITTLE_ENDIAN;
use snafu::{OptionExt, ResultExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::mem::InMemDicomObject;
use crate::meta::{FileMetaTable, FileMetaTableBuilder, MetaRead, DICM_MAGIC_CODE};
use crate::{
    lookup_transfer_syntax, DefaultDicomObject, FileDicomObject, NonConformantFileSnafu,
    OpenFileSnafu, ParseMetaDataSetSnafu, ReadError, ReadPreambleBytesSnafu,
    ReadUnsupportedTransferSyntaxSnafu, RepositionSnafu,
};

type Result<T, E = ReadError> = std::result::Result<T, E>;

/// Create a DICOM object by reading from a byte source.
///
/// This function assumes the standard file encoding structure without the
/// preamble: magic code, file meta group, followed by the rest of the data set.
pub fn from_reader<F>(file: F) -> Result<DefaultDicomObject>
where
    F: Read + Seek,
{
    OpenFileOptions::new().from_reader(file)
}

/// Create a DICOM object by reading from a file.
///
/// This function assumes the standard file encoding structure: 128-byte
/// preamble, magic code, file meta group, and the rest of the data set.
pub fn open_file<P>(path: P) -> Result<DefaultDicomObject>
where
    P: AsRef<Path>,
{
    OpenFileOptions::new().open_file(path)
}

/// A builder type for opening a DICOM file with additional options.
///
/// # Example
///
/// ```no_run
/// # use dcmcodec_object::OpenFileOptions;
/// use dcmcodec_core::CodecConfig;
///
/// let file = OpenFileOptions::new()
///     .read_until(dcmcodec_dictionary_std::tags::PIXEL_DATA)
///     .config(CodecConfig::default().defer_size(Some(4096)))
///     .open_file("path/to/file.dcm")?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct OpenFileOptions<D = StandardDataDictionary> {
    dict: D,
    read_until: Option<Tag>,
    read_preamble: ReadPreamble,
    force: bool,
    config: CodecConfig,
}

impl OpenFileOptions {
    pub fn new() -> Self {
        OpenFileOptions::default()
    }
}

impl<D> OpenFileOptions<D> {
    /// Set the operation to read only until the given tag is found.
    ///
    /// The reading process ends right before this tag,
    /// or any other tag that comes after it,
    /// in the object's root data set.
    /// An element with the exact tag is excluded from the output.
    pub fn read_until(mut self, tag: Tag) -> Self {
        self.read_until = Some(tag);
        self
    }

    /// Set the operation to read all elements of the data set to the end.
    ///
    /// This is the default behavior.
    pub fn read_all(mut self) -> Self {
        self.read_until = None;
        self
    }

    /// Set whether to read the 128-byte DICOM file preamble.
    pub fn read_preamble(mut self, option: ReadPreamble) -> Self {
        self.read_preamble = option;
        self
    }

    /// Accept sources without a preamble, magic code or file meta group.
    ///
    /// A meta group at the very start of the source is still read.
    /// Otherwise the source is read as a bare data set
    /// in implicit VR little endian.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the codec configuration used for reading.
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the data element dictionary to use when reading the file.
    pub fn dictionary<Di>(self, dict: Di) -> OpenFileOptions<Di>
    where
        Di: DataDictionary + Clone,
    {
        OpenFileOptions {
            dict,
            read_until: self.read_until,
            read_preamble: self.read_preamble,
            force: self.force,
            config: self.config,
        }
    }
}

impl<D> OpenFileOptions<D>
where
    D: DataDictionary + Clone,
{
    /// Open the file at the given path.
    ///
    /// Values may be left in the file
    /// when the configuration sets a deferral size.
    pub fn open_file<P>(self, path: P) -> Result<DefaultDicomObject<D>>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).context(OpenFileSnafu { filename: path })?;
        let mut file = BufReader::new(file);
        let read_preamble = self.read_preamble != ReadPreamble::Never;
        self.read(&mut file, read_preamble, Some(path))
    }

    /// Obtain a DICOM object by reading from a byte source.
    ///
    /// Unless configured otherwise,
    /// the source is expected to start at the magic code.
    /// Values are never deferred.
    pub fn from_reader<R>(self, mut from: R) -> Result<DefaultDicomObject<D>>
    where
        R: Read + Seek,
    {
        let read_preamble = self.read_preamble == ReadPreamble::Always;
        self.read(&mut from, read_preamble, None)
    }

    fn read<S>(
        self,
        source: &mut S,
        read_preamble: bool,
        path: Option<&Path>,
    ) -> Result<DefaultDicomObject<D>>
    where
        S: Read + Seek,
    {
        let start = source.stream_position().context(RepositionSnafu)?;
        if self.force {
            return self.read_forced(source, start, path);
        }

        let position = if read_preamble {
            let mut preamble = [0u8; 128];
            source
                .read_exact(&mut preamble)
                .context(ReadPreambleBytesSnafu)?;
            start + 128
        } else {
            start
        };
        let meta = FileMetaTable::read_from(&mut *source, &self.config, position)
            .context(ParseMetaDataSetSnafu)?;
        self.read_body(source, meta, path)
    }

    fn read_forced<S>(
        self,
        source: &mut S,
        start: u64,
        path: Option<&Path>,
    ) -> Result<DefaultDicomObject<D>>
    where
        S: Read + Seek,
    {
        let mut head = Vec::with_capacity(132);
        (&mut *source)
            .take(132)
            .read_to_end(&mut head)
            .context(ReadPreambleBytesSnafu)?;

        let magic_at = if head.get(128..132) == Some(&DICM_MAGIC_CODE[..]) {
            Some(start + 128)
        } else if head.get(0..4) == Some(&DICM_MAGIC_CODE[..]) {
            Some(start)
        } else {
            None
        };
        if let Some(position) = magic_at {
            source
                .seek(SeekFrom::Start(position))
                .context(RepositionSnafu)?;
            let meta = FileMetaTable::read_from(&mut *source, &self.config, position)
                .context(ParseMetaDataSetSnafu)?;
            return self.read_body(source, meta, path);
        }

        source
            .seek(SeekFrom::Start(start))
            .context(RepositionSnafu)?;
        if head.starts_with(&[0x02, 0x00]) {
            tracing::debug!("No magic code, reading file meta group at the start");
            let meta = FileMetaTable::read_group(&mut *source, &self.config, start)
                .context(ParseMetaDataSetSnafu)?;
            return self.read_body(source, meta, path);
        }

        let OpenFileOptions {
            dict,
            read_until,
            config,
            ..
        } = self;
        let mut diagnostics = Diagnostics::new(config.reading_validation);
        diagnostics
            .report(
                ConformanceWarning::new(
                    WarningKind::MissingFileMeta,
                    "No file meta group, reading as implicit VR little endian",
                )
                .at(start),
            )
            .context(NonConformantFileSnafu)?;

        let ts = &IMPLICIT_VR_LITTLE_ENDIAN;
        let (obj, body_diagnostics) =
            InMemDicomObject::read_body(source, start, ts, dict, &config, read_until, path)?;
        diagnostics.absorb(body_diagnostics);

        let uid_of = |tag| {
            obj.element_opt(tag)
                .ok()
                .flatten()
                .and_then(|e| e.to_str().ok().map(|s| s.into_owned()))
                .unwrap_or_default()
        };
        let meta = FileMetaTableBuilder::new()
            .transfer_syntax(ts.uid())
            .media_storage_sop_class_uid(uid_of(tags::SOP_CLASS_UID))
            .media_storage_sop_instance_uid(uid_of(tags::SOP_INSTANCE_UID))
            .build()
            .context(ParseMetaDataSetSnafu)?;

        Ok(FileDicomObject::from_parts(meta, obj, diagnostics))
    }

    fn read_body<S>(
        self,
        source: &mut S,
        meta: MetaRead,
        path: Option<&Path>,
    ) -> Result<DefaultDicomObject<D>>
    where
        S: Read + Seek,
    {
        let MetaRead {
            table,
            end,
            mut diagnostics,
        } = meta;
        let uid = table.transfer_syntax();
        let ts = lookup_transfer_syntax(uid)
            .with_context(|| ReadUnsupportedTransferSyntaxSnafu { uid })?;
        tracing::debug!("Reading data set in {} ({})", ts.name(), ts.uid());

        let (obj, body_diagnostics) = InMemDicomObject::read_body(
            source,
            end,
            ts,
            self.dict,
            &self.config,
            self.read_until,
            path,
        )?;
        diagnostics.absorb(body_diagnostics);
        Ok(FileDicomObject::from_parts(table, obj, diagnostics))
    }
}

/// Whether to read the 128-byte DICOM file preamble.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ReadPreamble {
    /// Read the preamble only when opening a file by path,
    /// and do not read the preamble when reading from a byte source.
    #[default]
    Auto,
    /// Never read the preamble,
    /// thus assuming that the original source does not have it.
    Never,
    /// Always read the preamble first,
    /// thus assuming that the original source always has it.
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::{DataElement, VR};
    use dcmcodec_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
    use std::io::Cursor;

    fn sample_file() -> DefaultDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(tags::SOP_CLASS_UID, VR::UI, "1.2.840.10008.5.1.4.1.1.7"));
        obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.1234"));
        obj.put(DataElement::new(tags::MODALITY, VR::CS, "OT"));
        obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"));
        obj.with_meta(FileMetaTableBuilder::new().transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid()))
            .unwrap()
    }

    #[test]
    fn read_from_reader_without_preamble() {
        let file = sample_file();
        let mut bytes = Vec::new();
        file.write_all(&mut bytes).unwrap();

        // from_reader expects the magic code first
        let read = from_reader(Cursor::new(&bytes[128..])).unwrap();
        assert_eq!(read, file);
        assert!(read.diagnostics().is_empty());

        let read = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Always)
            .from_reader(Cursor::new(&bytes))
            .unwrap();
        assert_eq!(read, file);
    }

    #[test]
    fn reject_source_without_magic_code() {
        let file = sample_file();
        let mut bytes = Vec::new();
        file.write_dataset(&mut bytes).unwrap();

        let err = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Never)
            .from_reader(Cursor::new(&bytes))
            .unwrap_err();
        assert!(matches!(err, ReadError::ParseMetaDataSet { .. }));
    }

    #[test]
    fn force_reads_meta_group_without_magic_code() {
        let file = sample_file();
        let mut bytes = Vec::new();
        file.write_meta(&mut bytes).unwrap();
        file.write_dataset(&mut bytes).unwrap();

        let read = OpenFileOptions::new()
            .force(true)
            .from_reader(Cursor::new(&bytes))
            .unwrap();
        assert_eq!(read, file);
    }

    #[test]
    fn force_reads_bare_implicit_data_set() {
        let file = sample_file();
        let mut implicit = Vec::new();
        file.write_dataset_with_ts(&mut implicit, &IMPLICIT_VR_LITTLE_ENDIAN)
            .unwrap();

        let read = OpenFileOptions::new()
            .force(true)
            .from_reader(Cursor::new(&implicit))
            .unwrap();
        assert_eq!(read.meta().transfer_syntax(), IMPLICIT_VR_LITTLE_ENDIAN.uid());
        assert_eq!(
            read.meta().media_storage_sop_instance_uid(),
            "2.25.1234"
        );
        assert_eq!(&*read, &*file);
        assert_eq!(read.diagnostics().len(), 1);
        assert_eq!(
            read.diagnostics().warnings()[0].kind,
            WarningKind::MissingFileMeta
        );
    }

    #[test]
    fn force_also_reads_regular_files() {
        let file = sample_file();
        let mut bytes = Vec::new();
        file.write_all(&mut bytes).unwrap();

        let read = OpenFileOptions::new()
            .force(true)
            .from_reader(Cursor::new(&bytes))
            .unwrap();
        assert_eq!(read, file);
    }

    #[test]
    fn unknown_transfer_syntax_is_rejected() {
        let mut file = sample_file();
        let mut bytes = Vec::new();
        file.meta_mut().set_transfer_syntax("1.2.3.4.5.6");
        file.write_meta(&mut bytes).unwrap();

        let mut source = DICM_MAGIC_CODE.to_vec();
        source.extend(bytes);
        let err = from_reader(Cursor::new(source)).unwrap_err();
        assert!(matches!(
            err,
            ReadError::ReadUnsupportedTransferSyntax { .. }
        ));
    }
}
