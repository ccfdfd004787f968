//! Module containing data structures and readers of DICOM file meta information tables.
//!
//! The file meta group (group `0002`) is always encoded
//! in _Explicit VR Little Endian_,
//! whatever the transfer syntax of the data set which follows.
use crate::{IMPLEMENTATION_CLASS_UID, IMPLEMENTATION_VERSION_NAME};
use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, WarningKind};
use dcmcodec_core::header::{DataElementHeader, Length};
use dcmcodec_core::{dicom_value, CodecConfig, DataElement, PrimitiveValue, Tag, VR};
use dcmcodec_dictionary_std::tags;
use dcmcodec_parser::stateful::decode::{self, StatefulDecoder};
use dcmcodec_parser::stateful::encode::{self, StatefulEncoder};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Read, Seek, Write};

/// The magic code which follows the preamble of a DICOM file.
pub const DICM_MAGIC_CODE: [u8; 4] = *b"DICM";

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The file meta group parser could not read
    /// the magic code `DICM` from its source.
    #[snafu(display("Could not start reading DICOM data"))]
    ReadMagicCode {
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// Invalid DICOM data, detected from checking the `DICM` code.
    #[snafu(display("Invalid DICOM data: magic code not found"))]
    NotDicom { backtrace: Backtrace },

    /// An issue occurred while decoding the next data element
    /// in the file meta data set.
    #[snafu(display("Could not decode data element"))]
    DecodeElement { source: decode::Error },

    /// The file meta group parser could not fetch
    /// the value of a data element from its source.
    #[snafu(display("Could not read value of {}", tag))]
    ReadValueData { tag: Tag, source: decode::Error },

    /// The value length of a data element in the file meta group
    /// was unexpected.
    #[snafu(display("Unexpected length {} for data element tagged {}", length, tag))]
    UnexpectedDataValueLength {
        tag: Tag,
        length: Length,
        backtrace: Backtrace,
    },

    /// The value length of a data element is undefined,
    /// but knowing the length is required in its context.
    #[snafu(display("Undefined value length for data element tagged {}", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },

    /// A required file meta data element is missing.
    #[snafu(display("Missing data element `{}`", alias))]
    MissingElement {
        alias: &'static str,
        backtrace: Backtrace,
    },

    /// The file meta group does not conform
    /// and validation is strict.
    #[snafu(display("Non-conformant file meta group"))]
    NonConformant { source: decode::Error },

    /// The file meta group data set could not be written.
    #[snafu(display("Could not write file meta group data set"))]
    WriteSet { source: encode::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// DICOM File Meta Information Table.
///
/// This data type contains the relevant parts of the file meta information table, as
/// specified in [1].
/// Text values are kept without their trailing padding.
///
/// [1]: http://dicom.nema.org/medical/dicom/current/output/chtml/part10/chapter_7.html
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length, as last read or built.
    /// It is recomputed whenever the table is written.
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: [u8; 2],
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: String,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: String,
    /// Transfer Syntax UID
    pub transfer_syntax: String,
    /// Implementation Class UID
    pub implementation_class_uid: String,

    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
    /// Sending Application Entity Title
    pub sending_application_entity_title: Option<String>,
    /// Receiving Application Entity Title
    pub receiving_application_entity_title: Option<String>,
    /// Private Information Creator UID
    pub private_information_creator_uid: Option<String>,
    /// Private Information
    pub private_information: Option<Vec<u8>>,
}

/// The outcome of reading a file meta group from a source.
#[derive(Debug)]
pub(crate) struct MetaRead {
    pub table: FileMetaTable,
    /// position of the source right after the group
    pub end: u64,
    pub diagnostics: Diagnostics,
}

fn trimmed(value: &PrimitiveValue) -> String {
    value
        .to_str()
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .to_string()
}

impl FileMetaTable {
    /// Read the magic code and the file meta group from the given source,
    /// which must be positioned right after the 128-byte preamble, if any.
    pub fn from_reader<R: Read + Seek>(mut file: R) -> Result<Self> {
        let position = file.stream_position().context(ReadMagicCodeSnafu)?;
        Self::read_from(file, &CodecConfig::default(), position).map(|read| read.table)
    }

    /// Read the magic code, then the file meta group.
    /// `position` is the current position of the source.
    pub(crate) fn read_from<R: Read + Seek>(
        mut file: R,
        config: &CodecConfig,
        position: u64,
    ) -> Result<MetaRead> {
        let mut buff = [0u8; 4];
        file.read_exact(&mut buff).context(ReadMagicCodeSnafu)?;
        ensure!(buff == DICM_MAGIC_CODE, NotDicomSnafu);
        Self::read_group(file, config, position + 4)
    }

    /// Read the file meta group elements,
    /// stopping at the first element of another group.
    ///
    /// A missing or wrong group length is tolerated with a warning.
    pub(crate) fn read_group<R: Read + Seek>(
        file: R,
        config: &CodecConfig,
        position: u64,
    ) -> Result<MetaRead> {
        let mut decoder = StatefulDecoder::file_header_decoder(file, config, position);
        let mut builder = FileMetaTableBuilder::new();

        let first = decoder.decode_header().context(DecodeElementSnafu)?;
        let group_end = if first.tag == tags::FILE_META_INFORMATION_GROUP_LENGTH {
            ensure!(
                first.len == Length(4),
                UnexpectedDataValueLengthSnafu {
                    tag: first.tag,
                    length: first.len,
                }
            );
            let value = decoder
                .read_value_preserved(&first)
                .context(ReadValueDataSnafu { tag: first.tag })?;
            let group_length: u32 = value.to_int().map_err(|_| {
                UnexpectedDataValueLengthSnafu {
                    tag: first.tag,
                    length: first.len,
                }
                .build()
            })?;
            builder = builder.group_length(group_length);
            Some(decoder.position() + u64::from(group_length))
        } else {
            decoder
                .report(ConformanceWarning::new(
                    WarningKind::InvalidValue,
                    "File meta group starts without its group length",
                ))
                .context(NonConformantSnafu)?;
            decoder.seek(position).context(DecodeElementSnafu)?;
            None
        };

        loop {
            if let Some(end) = group_end {
                if decoder.position() >= end {
                    break;
                }
            }
            let start = decoder.position();
            let header = match decoder.decode_header() {
                Ok(header) => header,
                Err(e) if e.is_clean_eof() && group_end.is_none() => break,
                Err(e) => return Err(e).context(DecodeElementSnafu),
            };
            if header.tag.group() != 0x0002 {
                if group_end.is_some() {
                    decoder
                        .report(
                            ConformanceWarning::new(
                                WarningKind::InvalidValue,
                                "File meta group length goes past the end of the group",
                            )
                            .with_tag(header.tag),
                        )
                        .context(NonConformantSnafu)?;
                }
                decoder.seek(start).context(DecodeElementSnafu)?;
                break;
            }
            ensure!(
                header.len.is_defined(),
                UndefinedValueLengthSnafu { tag: header.tag }
            );
            let value = decoder
                .read_value_preserved(&header)
                .context(ReadValueDataSnafu { tag: header.tag })?;

            builder = match header.tag {
                tags::FILE_META_INFORMATION_VERSION => {
                    let bytes = value.to_bytes();
                    ensure!(
                        bytes.len() == 2,
                        UnexpectedDataValueLengthSnafu {
                            tag: header.tag,
                            length: header.len,
                        }
                    );
                    builder.information_version([bytes[0], bytes[1]])
                }
                tags::MEDIA_STORAGE_SOP_CLASS_UID => {
                    builder.media_storage_sop_class_uid(trimmed(&value))
                }
                tags::MEDIA_STORAGE_SOP_INSTANCE_UID => {
                    builder.media_storage_sop_instance_uid(trimmed(&value))
                }
                tags::TRANSFER_SYNTAX_UID => builder.transfer_syntax(trimmed(&value)),
                tags::IMPLEMENTATION_CLASS_UID => builder.implementation_class_uid(trimmed(&value)),
                tags::IMPLEMENTATION_VERSION_NAME => {
                    builder.implementation_version_name(trimmed(&value))
                }
                tags::SOURCE_APPLICATION_ENTITY_TITLE => {
                    builder.source_application_entity_title(trimmed(&value))
                }
                tags::SENDING_APPLICATION_ENTITY_TITLE => {
                    builder.sending_application_entity_title(trimmed(&value))
                }
                tags::RECEIVING_APPLICATION_ENTITY_TITLE => {
                    builder.receiving_application_entity_title(trimmed(&value))
                }
                tags::PRIVATE_INFORMATION_CREATOR_UID => {
                    builder.private_information_creator_uid(trimmed(&value))
                }
                tags::PRIVATE_INFORMATION => builder.private_information(value.to_bytes().into_owned()),
                tag => {
                    tracing::debug!("Ignoring file meta element {}", tag);
                    builder
                }
            };
        }

        if let Some(end) = group_end {
            if decoder.position() > end {
                decoder
                    .report(ConformanceWarning::new(
                        WarningKind::InvalidValue,
                        format!(
                            "File meta group ends at {:#x}, past its declared length",
                            decoder.position()
                        ),
                    ))
                    .context(NonConformantSnafu)?;
            }
        }

        // implementation class UID is required, but often missing
        if builder.implementation_class_uid.is_none() {
            decoder
                .report(
                    ConformanceWarning::new(
                        WarningKind::InvalidValue,
                        "Missing Implementation Class UID",
                    )
                    .with_tag(tags::IMPLEMENTATION_CLASS_UID),
                )
                .context(NonConformantSnafu)?;
        }

        let table = builder.build()?;
        Ok(MetaRead {
            table,
            end: decoder.position(),
            diagnostics: decoder.take_diagnostics(),
        })
    }

    /// The transfer syntax UID, without padding.
    pub fn transfer_syntax(&self) -> &str {
        self.transfer_syntax
            .trim_end_matches(|c: char| c == '\0' || c == ' ')
    }

    /// The media storage SOP class UID, without padding.
    pub fn media_storage_sop_class_uid(&self) -> &str {
        self.media_storage_sop_class_uid
            .trim_end_matches(|c: char| c == '\0' || c == ' ')
    }

    /// The media storage SOP instance UID, without padding.
    pub fn media_storage_sop_instance_uid(&self) -> &str {
        self.media_storage_sop_instance_uid
            .trim_end_matches(|c: char| c == '\0' || c == ' ')
    }

    /// Replace the transfer syntax UID.
    pub fn set_transfer_syntax(&mut self, uid: impl Into<String>) {
        self.transfer_syntax = uid.into();
        self.update_information_group_length();
    }

    /// Recompute the group length from the elements of the table.
    pub fn update_information_group_length(&mut self) {
        self.information_group_length = self.calculate_information_group_length();
    }

    /// The byte length of all elements after the group length,
    /// as encoded in _Explicit VR Little Endian_.
    pub fn calculate_information_group_length(&self) -> u32 {
        self.body_elements()
            .iter()
            .map(|e| {
                let header_len = if e.vr().has_extended_length() { 12 } else { 8 };
                let value_len = e.primitive().map(|v| v.calculate_byte_len()).unwrap_or(0);
                (header_len + value_len) as u32
            })
            .sum()
    }

    fn body_elements(&self) -> Vec<DataElement> {
        let mut elems = vec![
            DataElement::new(
                tags::FILE_META_INFORMATION_VERSION,
                VR::OB,
                dicom_value!(U8, [self.information_version[0], self.information_version[1]]),
            ),
            DataElement::new(
                tags::MEDIA_STORAGE_SOP_CLASS_UID,
                VR::UI,
                PrimitiveValue::from(self.media_storage_sop_class_uid()),
            ),
            DataElement::new(
                tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(self.media_storage_sop_instance_uid()),
            ),
            DataElement::new(
                tags::TRANSFER_SYNTAX_UID,
                VR::UI,
                PrimitiveValue::from(self.transfer_syntax()),
            ),
            DataElement::new(
                tags::IMPLEMENTATION_CLASS_UID,
                VR::UI,
                PrimitiveValue::from(self.implementation_class_uid.as_str()),
            ),
        ];
        let optional = [
            (
                tags::IMPLEMENTATION_VERSION_NAME,
                VR::SH,
                &self.implementation_version_name,
            ),
            (
                tags::SOURCE_APPLICATION_ENTITY_TITLE,
                VR::AE,
                &self.source_application_entity_title,
            ),
            (
                tags::SENDING_APPLICATION_ENTITY_TITLE,
                VR::AE,
                &self.sending_application_entity_title,
            ),
            (
                tags::RECEIVING_APPLICATION_ENTITY_TITLE,
                VR::AE,
                &self.receiving_application_entity_title,
            ),
            (
                tags::PRIVATE_INFORMATION_CREATOR_UID,
                VR::UI,
                &self.private_information_creator_uid,
            ),
        ];
        for (tag, vr, value) in optional {
            if let Some(v) = value {
                elems.push(DataElement::new(tag, vr, PrimitiveValue::from(v.as_str())));
            }
        }
        if let Some(v) = &self.private_information {
            elems.push(DataElement::new(
                tags::PRIVATE_INFORMATION,
                VR::OB,
                PrimitiveValue::from(v.as_slice()),
            ));
        }
        elems
    }

    /// Obtain the elements of the file meta group,
    /// starting with a freshly computed group length.
    pub fn to_element_iter(&self) -> impl Iterator<Item = DataElement> {
        let group_length: DataElement = DataElement::new(
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            VR::UL,
            dicom_value!(U32, self.calculate_information_group_length()),
        );
        std::iter::once(group_length).chain(self.body_elements())
    }

    /// Write the file meta group, without the magic code,
    /// in _Explicit VR Little Endian_.
    ///
    /// The group length is always recomputed.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        self.write_with(writer, &CodecConfig::default())
    }

    pub(crate) fn write_with<W: Write>(&self, writer: W, config: &CodecConfig) -> Result<()> {
        let mut encoder = StatefulEncoder::file_header_encoder(writer, config);
        for elem in self.to_element_iter() {
            let header = DataElementHeader::new(elem.header().tag, elem.vr(), elem.header().len);
            let value = elem.primitive().cloned().unwrap_or(PrimitiveValue::Empty);
            encoder
                .encode_primitive_element(&header, &value)
                .context(WriteSetSnafu)?;
        }
        encoder.flush().context(WriteSetSnafu)
    }
}

/// A builder for DICOM meta information tables.
#[derive(Debug, Default, Clone)]
pub struct FileMetaTableBuilder {
    /// File Meta Information Group Length (UL)
    information_group_length: Option<u32>,
    /// File Meta Information Version (OB)
    information_version: Option<[u8; 2]>,
    /// Media Storage SOP Class UID (UI)
    media_storage_sop_class_uid: Option<String>,
    /// Media Storage SOP Instance UID (UI)
    media_storage_sop_instance_uid: Option<String>,
    /// Transfer Syntax UID (UI)
    transfer_syntax: Option<String>,
    /// Implementation Class UID (UI)
    implementation_class_uid: Option<String>,

    /// Implementation Version Name (SH)
    implementation_version_name: Option<String>,
    /// Source Application Entity Title (AE)
    source_application_entity_title: Option<String>,
    /// Sending Application Entity Title (AE)
    sending_application_entity_title: Option<String>,
    /// Receiving Application Entity Title (AE)
    receiving_application_entity_title: Option<String>,
    /// Private Information Creator UID (UI)
    private_information_creator_uid: Option<String>,
    /// Private Information (OB)
    private_information: Option<Vec<u8>>,
}

fn unpadded<T: Into<String>>(value: T) -> String {
    let mut s = value.into();
    let len = s.trim_end_matches(|c: char| c == '\0' || c == ' ').len();
    s.truncate(len);
    s
}

impl FileMetaTableBuilder {
    /// Create a new, empty builder.
    pub fn new() -> FileMetaTableBuilder {
        FileMetaTableBuilder::default()
    }

    /// Define the meta information group length.
    /// It only serves as the initial value of the table's field.
    pub fn group_length(mut self, value: u32) -> FileMetaTableBuilder {
        self.information_group_length = Some(value);
        self
    }

    /// Define the meta information version.
    pub fn information_version(mut self, value: [u8; 2]) -> FileMetaTableBuilder {
        self.information_version = Some(value);
        self
    }

    /// Define the media storage SOP class UID.
    pub fn media_storage_sop_class_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.media_storage_sop_class_uid = Some(unpadded(value));
        self
    }

    /// Define the media storage SOP instance UID.
    pub fn media_storage_sop_instance_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.media_storage_sop_instance_uid = Some(unpadded(value));
        self
    }

    /// Define the transfer syntax UID.
    pub fn transfer_syntax<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.transfer_syntax = Some(unpadded(value));
        self
    }

    /// Define the implementation class UID.
    pub fn implementation_class_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.implementation_class_uid = Some(unpadded(value));
        self
    }

    /// Define the implementation version name.
    pub fn implementation_version_name<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.implementation_version_name = Some(unpadded(value));
        self
    }

    /// Define the source application entity title.
    pub fn source_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.source_application_entity_title = Some(unpadded(value));
        self
    }

    /// Define the sending application entity title.
    pub fn sending_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.sending_application_entity_title = Some(unpadded(value));
        self
    }

    /// Define the receiving application entity title.
    pub fn receiving_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.receiving_application_entity_title = Some(unpadded(value));
        self
    }

    /// Define the private information creator UID.
    pub fn private_information_creator_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.private_information_creator_uid = Some(unpadded(value));
        self
    }

    /// Define the private information as a vector of bytes.
    pub fn private_information<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<Vec<u8>>,
    {
        self.private_information = Some(value.into());
        self
    }

    /// Build the table.
    ///
    /// The information version defaults to `[0, 1]`.
    /// When no implementation class UID is given,
    /// the one of this library is used,
    /// along with its implementation version name.
    pub fn build(self) -> Result<FileMetaTable> {
        let information_version = self.information_version.unwrap_or([0, 1]);
        let media_storage_sop_class_uid = self
            .media_storage_sop_class_uid
            .context(MissingElementSnafu {
                alias: "MediaStorageSOPClassUID",
            })?;
        let media_storage_sop_instance_uid = self
            .media_storage_sop_instance_uid
            .context(MissingElementSnafu {
                alias: "MediaStorageSOPInstanceUID",
            })?;
        let transfer_syntax = self.transfer_syntax.context(MissingElementSnafu {
            alias: "TransferSyntaxUID",
        })?;
        let (implementation_class_uid, implementation_version_name) =
            match self.implementation_class_uid {
                Some(uid) => (uid, self.implementation_version_name),
                None => (
                    IMPLEMENTATION_CLASS_UID.to_string(),
                    self.implementation_version_name
                        .or_else(|| Some(IMPLEMENTATION_VERSION_NAME.to_string())),
                ),
            };

        let mut table = FileMetaTable {
            information_group_length: 0,
            information_version,
            media_storage_sop_class_uid,
            media_storage_sop_instance_uid,
            transfer_syntax,
            implementation_class_uid,
            implementation_version_name,
            source_application_entity_title: self.source_application_entity_title,
            sending_application_entity_title: self.sending_application_entity_title,
            receiving_application_entity_title: self.receiving_application_entity_title,
            private_information_creator_uid: self.private_information_creator_uid,
            private_information: self.private_information,
        };
        table.information_group_length = match self.information_group_length {
            Some(len) => len,
            None => table.calculate_information_group_length(),
        };
        Ok(table)
    }
}
