//! Attribute tag constants and the public dictionary table.
//!
//! Each constant maps an attribute keyword to its tag.
//! Attributes of repeating groups or elements
//! are declared with the open portion zeroed out.
use dcmcodec_core::dictionary::{DataDictionaryEntryRef, TagRange::*, VirtualVr::*};
use dcmcodec_core::header::{Tag, VR};

type E = DataDictionaryEntryRef<'static>;

/// Command Group Length (0000,0000) UL 1
pub const COMMAND_GROUP_LENGTH: Tag = Tag(0x0000, 0x0000);
/// Affected SOP Class UID (0000,0002) UI 1
pub const AFFECTED_SOP_CLASS_UID: Tag = Tag(0x0000, 0x0002);
/// Command Field (0000,0100) US 1
pub const COMMAND_FIELD: Tag = Tag(0x0000, 0x0100);
/// Message ID (0000,0110) US 1
pub const MESSAGE_ID: Tag = Tag(0x0000, 0x0110);
/// Status (0000,0900) US 1
pub const STATUS: Tag = Tag(0x0000, 0x0900);
/// File Meta Information Group Length (0002,0000) UL 1
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version (0002,0001) OB 1
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID (0002,0002) UI 1
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID (0002,0003) UI 1
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID (0002,0010) UI 1
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID (0002,0012) UI 1
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name (0002,0013) SH 1
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// Source Application Entity Title (0002,0016) AE 1
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/// Sending Application Entity Title (0002,0017) AE 1
pub const SENDING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0017);
/// Receiving Application Entity Title (0002,0018) AE 1
pub const RECEIVING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0018);
/// Source Presentation Address (0002,0026) UR 1
pub const SOURCE_PRESENTATION_ADDRESS: Tag = Tag(0x0002, 0x0026);
/// Sending Presentation Address (0002,0027) UR 1
pub const SENDING_PRESENTATION_ADDRESS: Tag = Tag(0x0002, 0x0027);
/// Receiving Presentation Address (0002,0028) UR 1
pub const RECEIVING_PRESENTATION_ADDRESS: Tag = Tag(0x0002, 0x0028);
/// Private Information Creator UID (0002,0100) UI 1
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
/// Private Information (0002,0102) OB 1
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);
/// Length to End (0008,0001) UL 1 (retired)
pub const LENGTH_TO_END: Tag = Tag(0x0008, 0x0001);
/// Specific Character Set (0008,0005) CS 1-n
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// Language Code Sequence (0008,0006) SQ 1
pub const LANGUAGE_CODE_SEQUENCE: Tag = Tag(0x0008, 0x0006);
/// Image Type (0008,0008) CS 2-n
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/// Recognition Code (0008,0010) SH 1 (retired)
pub const RECOGNITION_CODE: Tag = Tag(0x0008, 0x0010);
/// Instance Creation Date (0008,0012) DA 1
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
/// Instance Creation Time (0008,0013) TM 1
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
/// Instance Creator UID (0008,0014) UI 1
pub const INSTANCE_CREATOR_UID: Tag = Tag(0x0008, 0x0014);
/// SOP Class UID (0008,0016) UI 1
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOP Instance UID (0008,0018) UI 1
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// Study Date (0008,0020) DA 1
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/// Series Date (0008,0021) DA 1
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
/// Acquisition Date (0008,0022) DA 1
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
/// Content Date (0008,0023) DA 1
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
/// Acquisition DateTime (0008,002A) DT 1
pub const ACQUISITION_DATE_TIME: Tag = Tag(0x0008, 0x002A);
/// Study Time (0008,0030) TM 1
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
/// Series Time (0008,0031) TM 1
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
/// Acquisition Time (0008,0032) TM 1
pub const ACQUISITION_TIME: Tag = Tag(0x0008, 0x0032);
/// Content Time (0008,0033) TM 1
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
/// Accession Number (0008,0050) SH 1
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
/// Modality (0008,0060) CS 1
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// Conversion Type (0008,0064) CS 1
pub const CONVERSION_TYPE: Tag = Tag(0x0008, 0x0064);
/// Manufacturer (0008,0070) LO 1
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
/// Institution Name (0008,0080) LO 1
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
/// Institution Address (0008,0081) ST 1
pub const INSTITUTION_ADDRESS: Tag = Tag(0x0008, 0x0081);
/// Referring Physician's Name (0008,0090) PN 1
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
/// Code Value (0008,0100) SH 1
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
/// Coding Scheme Designator (0008,0102) SH 1
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
/// Coding Scheme Version (0008,0103) SH 1
pub const CODING_SCHEME_VERSION: Tag = Tag(0x0008, 0x0103);
/// Code Meaning (0008,0104) LO 1
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
/// Long Code Value (0008,0119) UC 1
pub const LONG_CODE_VALUE: Tag = Tag(0x0008, 0x0119);
/// URN Code Value (0008,0120) UR 1
pub const URN_CODE_VALUE: Tag = Tag(0x0008, 0x0120);
/// Timezone Offset From UTC (0008,0201) SH 1
pub const TIMEZONE_OFFSET_FROM_UTC: Tag = Tag(0x0008, 0x0201);
/// Station Name (0008,1010) SH 1
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
/// Study Description (0008,1030) LO 1
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
/// Series Description (0008,103E) LO 1
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
/// Institutional Department Name (0008,1040) LO 1
pub const INSTITUTIONAL_DEPARTMENT_NAME: Tag = Tag(0x0008, 0x1040);
/// Performing Physician's Name (0008,1050) PN 1-n
pub const PERFORMING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x1050);
/// Operators' Name (0008,1070) PN 1-n
pub const OPERATORS_NAME: Tag = Tag(0x0008, 0x1070);
/// Manufacturer's Model Name (0008,1090) LO 1
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);
/// Referenced Study Sequence (0008,1110) SQ 1
pub const REFERENCED_STUDY_SEQUENCE: Tag = Tag(0x0008, 0x1110);
/// Referenced Series Sequence (0008,1115) SQ 1
pub const REFERENCED_SERIES_SEQUENCE: Tag = Tag(0x0008, 0x1115);
/// Referenced Image Sequence (0008,1140) SQ 1
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
/// Referenced SOP Class UID (0008,1150) UI 1
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
/// Referenced SOP Instance UID (0008,1155) UI 1
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);
/// Referenced Frame Number (0008,1160) IS 1-n
pub const REFERENCED_FRAME_NUMBER: Tag = Tag(0x0008, 0x1160);
/// Derivation Description (0008,2111) ST 1
pub const DERIVATION_DESCRIPTION: Tag = Tag(0x0008, 0x2111);
/// Source Image Sequence (0008,2112) SQ 1
pub const SOURCE_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x2112);
/// Derivation Code Sequence (0008,9215) SQ 1
pub const DERIVATION_CODE_SEQUENCE: Tag = Tag(0x0008, 0x9215);
/// Patient's Name (0010,0010) PN 1
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// Patient ID (0010,0020) LO 1
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// Issuer of Patient ID (0010,0021) LO 1
pub const ISSUER_OF_PATIENT_ID: Tag = Tag(0x0010, 0x0021);
/// Patient's Birth Date (0010,0030) DA 1
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
/// Patient's Birth Time (0010,0032) TM 1
pub const PATIENT_BIRTH_TIME: Tag = Tag(0x0010, 0x0032);
/// Patient's Sex (0010,0040) CS 1
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
/// Other Patient IDs (0010,1000) LO 1-n (retired)
pub const OTHER_PATIENT_I_DS: Tag = Tag(0x0010, 0x1000);
/// Other Patient Names (0010,1001) PN 1-n
pub const OTHER_PATIENT_NAMES: Tag = Tag(0x0010, 0x1001);
/// Other Patient IDs Sequence (0010,1002) SQ 1
pub const OTHER_PATIENT_I_DS_SEQUENCE: Tag = Tag(0x0010, 0x1002);
/// Patient's Age (0010,1010) AS 1
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);
/// Patient's Size (0010,1020) DS 1
pub const PATIENT_SIZE: Tag = Tag(0x0010, 0x1020);
/// Patient's Weight (0010,1030) DS 1
pub const PATIENT_WEIGHT: Tag = Tag(0x0010, 0x1030);
/// Ethnic Group (0010,2160) SH 1
pub const ETHNIC_GROUP: Tag = Tag(0x0010, 0x2160);
/// Pregnancy Status (0010,21C0) US 1
pub const PREGNANCY_STATUS: Tag = Tag(0x0010, 0x21C0);
/// Patient Comments (0010,4000) LT 1
pub const PATIENT_COMMENTS: Tag = Tag(0x0010, 0x4000);
/// Contrast/Bolus Agent (0018,0010) LO 1
pub const CONTRAST_BOLUS_AGENT: Tag = Tag(0x0018, 0x0010);
/// Body Part Examined (0018,0015) CS 1
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
/// Slice Thickness (0018,0050) DS 1
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
/// KVP (0018,0060) DS 1
pub const KVP: Tag = Tag(0x0018, 0x0060);
/// Spacing Between Slices (0018,0088) DS 1
pub const SPACING_BETWEEN_SLICES: Tag = Tag(0x0018, 0x0088);
/// Software Versions (0018,1020) LO 1-n
pub const SOFTWARE_VERSIONS: Tag = Tag(0x0018, 0x1020);
/// Protocol Name (0018,1030) LO 1
pub const PROTOCOL_NAME: Tag = Tag(0x0018, 0x1030);
/// Exposure Time (0018,1150) IS 1
pub const EXPOSURE_TIME: Tag = Tag(0x0018, 0x1150);
/// X-Ray Tube Current (0018,1151) IS 1
pub const X_RAY_TUBE_CURRENT: Tag = Tag(0x0018, 0x1151);
/// Exposure (0018,1152) IS 1
pub const EXPOSURE: Tag = Tag(0x0018, 0x1152);
/// Imager Pixel Spacing (0018,1164) DS 2
pub const IMAGER_PIXEL_SPACING: Tag = Tag(0x0018, 0x1164);
/// Patient Position (0018,5100) CS 1
pub const PATIENT_POSITION: Tag = Tag(0x0018, 0x5100);
/// Sequence of Ultrasound Regions (0018,6011) SQ 1
pub const SEQUENCE_OF_ULTRASOUND_REGIONS: Tag = Tag(0x0018, 0x6011);
/// Physical Delta X (0018,602C) FD 1
pub const PHYSICAL_DELTA_X: Tag = Tag(0x0018, 0x602C);
/// Physical Delta Y (0018,602E) FD 1
pub const PHYSICAL_DELTA_Y: Tag = Tag(0x0018, 0x602E);
/// Study Instance UID (0020,000D) UI 1
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// Series Instance UID (0020,000E) UI 1
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// Study ID (0020,0010) SH 1
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
/// Series Number (0020,0011) IS 1
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
/// Acquisition Number (0020,0012) IS 1
pub const ACQUISITION_NUMBER: Tag = Tag(0x0020, 0x0012);
/// Instance Number (0020,0013) IS 1
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/// Patient Orientation (0020,0020) CS 2
pub const PATIENT_ORIENTATION: Tag = Tag(0x0020, 0x0020);
/// Image Position (Patient) (0020,0032) DS 3
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
/// Image Orientation (Patient) (0020,0037) DS 6
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
/// Frame of Reference UID (0020,0052) UI 1
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
/// Laterality (0020,0060) CS 1
pub const LATERALITY: Tag = Tag(0x0020, 0x0060);
/// Slice Location (0020,1041) DS 1
pub const SLICE_LOCATION: Tag = Tag(0x0020, 0x1041);
/// Image Comments (0020,4000) LT 1
pub const IMAGE_COMMENTS: Tag = Tag(0x0020, 0x4000);
/// Concatenation UID (0020,9161) UI 1
pub const CONCATENATION_UID: Tag = Tag(0x0020, 0x9161);
/// Samples per Pixel (0028,0002) US 1
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// Photometric Interpretation (0028,0004) CS 1
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Planar Configuration (0028,0006) US 1
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
/// Number of Frames (0028,0008) IS 1
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// Frame Increment Pointer (0028,0009) AT 1-n
pub const FRAME_INCREMENT_POINTER: Tag = Tag(0x0028, 0x0009);
/// Rows (0028,0010) US 1
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011) US 1
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Pixel Spacing (0028,0030) DS 2
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// Pixel Aspect Ratio (0028,0034) IS 2
pub const PIXEL_ASPECT_RATIO: Tag = Tag(0x0028, 0x0034);
/// Bits Allocated (0028,0100) US 1
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Bits Stored (0028,0101) US 1
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// High Bit (0028,0102) US 1
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation (0028,0103) US 1
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// Smallest Image Pixel Value (0028,0106) US or SS 1
pub const SMALLEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0106);
/// Largest Image Pixel Value (0028,0107) US or SS 1
pub const LARGEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0107);
/// Pixel Padding Value (0028,0120) US or SS 1
pub const PIXEL_PADDING_VALUE: Tag = Tag(0x0028, 0x0120);
/// Burned In Annotation (0028,0301) CS 1
pub const BURNED_IN_ANNOTATION: Tag = Tag(0x0028, 0x0301);
/// Window Center (0028,1050) DS 1-n
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
/// Window Width (0028,1051) DS 1-n
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
/// Rescale Intercept (0028,1052) DS 1
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
/// Rescale Slope (0028,1053) DS 1
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
/// Rescale Type (0028,1054) LO 1
pub const RESCALE_TYPE: Tag = Tag(0x0028, 0x1054);
/// Red Palette Color Lookup Table Descriptor (0028,1101) US or SS 3
pub const RED_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR: Tag = Tag(0x0028, 0x1101);
/// Red Palette Color Lookup Table Data (0028,1201) OW 1
pub const RED_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1201);
/// Lossy Image Compression (0028,2110) CS 1
pub const LOSSY_IMAGE_COMPRESSION: Tag = Tag(0x0028, 0x2110);
/// Lossy Image Compression Ratio (0028,2112) DS 1-n
pub const LOSSY_IMAGE_COMPRESSION_RATIO: Tag = Tag(0x0028, 0x2112);
/// Lossy Image Compression Method (0028,2114) CS 1-n
pub const LOSSY_IMAGE_COMPRESSION_METHOD: Tag = Tag(0x0028, 0x2114);
/// Modality LUT Sequence (0028,3000) SQ 1
pub const MODALITY_LUT_SEQUENCE: Tag = Tag(0x0028, 0x3000);
/// LUT Descriptor (0028,3002) US or SS 3
pub const LUT_DESCRIPTOR: Tag = Tag(0x0028, 0x3002);
/// LUT Data (0028,3006) US or OW 1-n
pub const LUT_DATA: Tag = Tag(0x0028, 0x3006);
/// VOI LUT Sequence (0028,3010) SQ 1
pub const VOI_LUT_SEQUENCE: Tag = Tag(0x0028, 0x3010);
/// Pixel Data Provider URL (0028,7FE0) UR 1
pub const PIXEL_DATA_PROVIDER_URL: Tag = Tag(0x0028, 0x7FE0);
/// Requested Procedure Description (0032,1060) LO 1
pub const REQUESTED_PROCEDURE_DESCRIPTION: Tag = Tag(0x0032, 0x1060);
/// Performed Procedure Step Start Date (0040,0244) DA 1
pub const PERFORMED_PROCEDURE_STEP_START_DATE: Tag = Tag(0x0040, 0x0244);
/// Performed Procedure Step Start Time (0040,0245) TM 1
pub const PERFORMED_PROCEDURE_STEP_START_TIME: Tag = Tag(0x0040, 0x0245);
/// Performed Protocol Code Sequence (0040,0260) SQ 1
pub const PERFORMED_PROTOCOL_CODE_SEQUENCE: Tag = Tag(0x0040, 0x0260);
/// Request Attributes Sequence (0040,0275) SQ 1
pub const REQUEST_ATTRIBUTES_SEQUENCE: Tag = Tag(0x0040, 0x0275);
/// Relationship Type (0040,A010) CS 1
pub const RELATIONSHIP_TYPE: Tag = Tag(0x0040, 0xA010);
/// Value Type (0040,A040) CS 1
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
/// Concept Name Code Sequence (0040,A043) SQ 1
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
/// UID (0040,A124) UI 1
pub const UID: Tag = Tag(0x0040, 0xA124);
/// Text Value (0040,A160) UT 1
pub const TEXT_VALUE: Tag = Tag(0x0040, 0xA160);
/// Concept Code Sequence (0040,A168) SQ 1
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA168);
/// Content Sequence (0040,A730) SQ 1
pub const CONTENT_SEQUENCE: Tag = Tag(0x0040, 0xA730);
/// Numeric Value (0040,A30A) DS 1-n
pub const NUMERIC_VALUE: Tag = Tag(0x0040, 0xA30A);
/// Real World Value Mapping Sequence (0040,9096) SQ 1
pub const REAL_WORLD_VALUE_MAPPING_SEQUENCE: Tag = Tag(0x0040, 0x9096);
/// Real World Value LUT Data (0040,9212) FD 1-n
pub const REAL_WORLD_VALUE_LUT_DATA: Tag = Tag(0x0040, 0x9212);
/// Number of Slices (0054,0081) US 1
pub const NUMBER_OF_SLICES: Tag = Tag(0x0054, 0x0081);
/// Storage Media File-set UID (0088,0140) UI 1
pub const STORAGE_MEDIA_FILE_SET_UID: Tag = Tag(0x0088, 0x0140);
/// Icon Image Sequence (0088,0200) SQ 1
pub const ICON_IMAGE_SEQUENCE: Tag = Tag(0x0088, 0x0200);
/// Shared Functional Groups Sequence (5200,9229) SQ 1
pub const SHARED_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9229);
/// Per-Frame Functional Groups Sequence (5200,9230) SQ 1
pub const PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9230);
/// Curve Dimensions (50xx,0005) US 1 (retired)
pub const CURVE_DIMENSIONS: Tag = Tag(0x5000, 0x0005);
/// Curve Data (50xx,3000) OB or OW 1 (retired)
pub const CURVE_DATA: Tag = Tag(0x5000, 0x3000);
/// Overlay Rows (60xx,0010) US 1
pub const OVERLAY_ROWS: Tag = Tag(0x6000, 0x0010);
/// Overlay Columns (60xx,0011) US 1
pub const OVERLAY_COLUMNS: Tag = Tag(0x6000, 0x0011);
/// Overlay Type (60xx,0040) CS 1
pub const OVERLAY_TYPE: Tag = Tag(0x6000, 0x0040);
/// Overlay Origin (60xx,0050) SS 2
pub const OVERLAY_ORIGIN: Tag = Tag(0x6000, 0x0050);
/// Overlay Bits Allocated (60xx,0100) US 1
pub const OVERLAY_BITS_ALLOCATED: Tag = Tag(0x6000, 0x0100);
/// Overlay Bit Position (60xx,0102) US 1
pub const OVERLAY_BIT_POSITION: Tag = Tag(0x6000, 0x0102);
/// Overlay Data (60xx,3000) OB or OW 1
pub const OVERLAY_DATA: Tag = Tag(0x6000, 0x3000);
/// Extended Offset Table (7FE0,0001) OV 1
pub const EXTENDED_OFFSET_TABLE: Tag = Tag(0x7FE0, 0x0001);
/// Extended Offset Table Lengths (7FE0,0002) OV 1
pub const EXTENDED_OFFSET_TABLE_LENGTHS: Tag = Tag(0x7FE0, 0x0002);
/// Float Pixel Data (7FE0,0008) OF 1
pub const FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0008);
/// Double Float Pixel Data (7FE0,0009) OD 1
pub const DOUBLE_FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0009);
/// Pixel Data (7FE0,0010) OB or OW 1
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
/// Variable Pixel Data (7Fxx,0010) OB or OW 1 (retired)
pub const VARIABLE_PIXEL_DATA: Tag = Tag(0x7F00, 0x0010);
/// Digital Signatures Sequence (FFFA,FFFA) SQ 1
pub const DIGITAL_SIGNATURES_SEQUENCE: Tag = Tag(0xFFFA, 0xFFFA);
/// Data Set Trailing Padding (FFFC,FFFC) OB 1
pub const DATA_SET_TRAILING_PADDING: Tag = Tag(0xFFFC, 0xFFFC);
/// Item (FFFE,E000) UN 1
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// Item Delimitation Item (FFFE,E00D) UN 1
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/// Sequence Delimitation Item (FFFE,E0DD) UN 1
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);

#[rustfmt::skip]
pub(crate) const ENTRIES: &[E] = &[
    E { tag: Single(Tag(0x0000, 0x0000)), alias: "CommandGroupLength", vr: Exact(VR::UL), vm: "1", description: "Command Group Length", retired: false },
    E { tag: Single(Tag(0x0000, 0x0002)), alias: "AffectedSOPClassUID", vr: Exact(VR::UI), vm: "1", description: "Affected SOP Class UID", retired: false },
    E { tag: Single(Tag(0x0000, 0x0100)), alias: "CommandField", vr: Exact(VR::US), vm: "1", description: "Command Field", retired: false },
    E { tag: Single(Tag(0x0000, 0x0110)), alias: "MessageID", vr: Exact(VR::US), vm: "1", description: "Message ID", retired: false },
    E { tag: Single(Tag(0x0000, 0x0900)), alias: "Status", vr: Exact(VR::US), vm: "1", description: "Status", retired: false },
    E { tag: Single(Tag(0x0002, 0x0000)), alias: "FileMetaInformationGroupLength", vr: Exact(VR::UL), vm: "1", description: "File Meta Information Group Length", retired: false },
    E { tag: Single(Tag(0x0002, 0x0001)), alias: "FileMetaInformationVersion", vr: Exact(VR::OB), vm: "1", description: "File Meta Information Version", retired: false },
    E { tag: Single(Tag(0x0002, 0x0002)), alias: "MediaStorageSOPClassUID", vr: Exact(VR::UI), vm: "1", description: "Media Storage SOP Class UID", retired: false },
    E { tag: Single(Tag(0x0002, 0x0003)), alias: "MediaStorageSOPInstanceUID", vr: Exact(VR::UI), vm: "1", description: "Media Storage SOP Instance UID", retired: false },
    E { tag: Single(Tag(0x0002, 0x0010)), alias: "TransferSyntaxUID", vr: Exact(VR::UI), vm: "1", description: "Transfer Syntax UID", retired: false },
    E { tag: Single(Tag(0x0002, 0x0012)), alias: "ImplementationClassUID", vr: Exact(VR::UI), vm: "1", description: "Implementation Class UID", retired: false },
    E { tag: Single(Tag(0x0002, 0x0013)), alias: "ImplementationVersionName", vr: Exact(VR::SH), vm: "1", description: "Implementation Version Name", retired: false },
    E { tag: Single(Tag(0x0002, 0x0016)), alias: "SourceApplicationEntityTitle", vr: Exact(VR::AE), vm: "1", description: "Source Application Entity Title", retired: false },
    E { tag: Single(Tag(0x0002, 0x0017)), alias: "SendingApplicationEntityTitle", vr: Exact(VR::AE), vm: "1", description: "Sending Application Entity Title", retired: false },
    E { tag: Single(Tag(0x0002, 0x0018)), alias: "ReceivingApplicationEntityTitle", vr: Exact(VR::AE), vm: "1", description: "Receiving Application Entity Title", retired: false },
    E { tag: Single(Tag(0x0002, 0x0026)), alias: "SourcePresentationAddress", vr: Exact(VR::UR), vm: "1", description: "Source Presentation Address", retired: false },
    E { tag: Single(Tag(0x0002, 0x0027)), alias: "SendingPresentationAddress", vr: Exact(VR::UR), vm: "1", description: "Sending Presentation Address", retired: false },
    E { tag: Single(Tag(0x0002, 0x0028)), alias: "ReceivingPresentationAddress", vr: Exact(VR::UR), vm: "1", description: "Receiving Presentation Address", retired: false },
    E { tag: Single(Tag(0x0002, 0x0100)), alias: "PrivateInformationCreatorUID", vr: Exact(VR::UI), vm: "1", description: "Private Information Creator UID", retired: false },
    E { tag: Single(Tag(0x0002, 0x0102)), alias: "PrivateInformation", vr: Exact(VR::OB), vm: "1", description: "Private Information", retired: false },
    E { tag: Single(Tag(0x0008, 0x0001)), alias: "LengthToEnd", vr: Exact(VR::UL), vm: "1", description: "Length to End", retired: true },
    E { tag: Single(Tag(0x0008, 0x0005)), alias: "SpecificCharacterSet", vr: Exact(VR::CS), vm: "1-n", description: "Specific Character Set", retired: false },
    E { tag: Single(Tag(0x0008, 0x0006)), alias: "LanguageCodeSequence", vr: Exact(VR::SQ), vm: "1", description: "Language Code Sequence", retired: false },
    E { tag: Single(Tag(0x0008, 0x0008)), alias: "ImageType", vr: Exact(VR::CS), vm: "2-n", description: "Image Type", retired: false },
    E { tag: Single(Tag(0x0008, 0x0010)), alias: "RecognitionCode", vr: Exact(VR::SH), vm: "1", description: "Recognition Code", retired: true },
    E { tag: Single(Tag(0x0008, 0x0012)), alias: "InstanceCreationDate", vr: Exact(VR::DA), vm: "1", description: "Instance Creation Date", retired: false },
    E { tag: Single(Tag(0x0008, 0x0013)), alias: "InstanceCreationTime", vr: Exact(VR::TM), vm: "1", description: "Instance Creation Time", retired: false },
    E { tag: Single(Tag(0x0008, 0x0014)), alias: "InstanceCreatorUID", vr: Exact(VR::UI), vm: "1", description: "Instance Creator UID", retired: false },
    E { tag: Single(Tag(0x0008, 0x0016)), alias: "SOPClassUID", vr: Exact(VR::UI), vm: "1", description: "SOP Class UID", retired: false },
    E { tag: Single(Tag(0x0008, 0x0018)), alias: "SOPInstanceUID", vr: Exact(VR::UI), vm: "1", description: "SOP Instance UID", retired: false },
    E { tag: Single(Tag(0x0008, 0x0020)), alias: "StudyDate", vr: Exact(VR::DA), vm: "1", description: "Study Date", retired: false },
    E { tag: Single(Tag(0x0008, 0x0021)), alias: "SeriesDate", vr: Exact(VR::DA), vm: "1", description: "Series Date", retired: false },
    E { tag: Single(Tag(0x0008, 0x0022)), alias: "AcquisitionDate", vr: Exact(VR::DA), vm: "1", description: "Acquisition Date", retired: false },
    E { tag: Single(Tag(0x0008, 0x0023)), alias: "ContentDate", vr: Exact(VR::DA), vm: "1", description: "Content Date", retired: false },
    E { tag: Single(Tag(0x0008, 0x002A)), alias: "AcquisitionDateTime", vr: Exact(VR::DT), vm: "1", description: "Acquisition DateTime", retired: false },
    E { tag: Single(Tag(0x0008, 0x0030)), alias: "StudyTime", vr: Exact(VR::TM), vm: "1", description: "Study Time", retired: false },
    E { tag: Single(Tag(0x0008, 0x0031)), alias: "SeriesTime", vr: Exact(VR::TM), vm: "1", description: "Series Time", retired: false },
    E { tag: Single(Tag(0x0008, 0x0032)), alias: "AcquisitionTime", vr: Exact(VR::TM), vm: "1", description: "Acquisition Time", retired: false },
    E { tag: Single(Tag(0x0008, 0x0033)), alias: "ContentTime", vr: Exact(VR::TM), vm: "1", description: "Content Time", retired: false },
    E { tag: Single(Tag(0x0008, 0x0050)), alias: "AccessionNumber", vr: Exact(VR::SH), vm: "1", description: "Accession Number", retired: false },
    E { tag: Single(Tag(0x0008, 0x0060)), alias: "Modality", vr: Exact(VR::CS), vm: "1", description: "Modality", retired: false },
    E { tag: Single(Tag(0x0008, 0x0064)), alias: "ConversionType", vr: Exact(VR::CS), vm: "1", description: "Conversion Type", retired: false },
    E { tag: Single(Tag(0x0008, 0x0070)), alias: "Manufacturer", vr: Exact(VR::LO), vm: "1", description: "Manufacturer", retired: false },
    E { tag: Single(Tag(0x0008, 0x0080)), alias: "InstitutionName", vr: Exact(VR::LO), vm: "1", description: "Institution Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x0081)), alias: "InstitutionAddress", vr: Exact(VR::ST), vm: "1", description: "Institution Address", retired: false },
    E { tag: Single(Tag(0x0008, 0x0090)), alias: "ReferringPhysicianName", vr: Exact(VR::PN), vm: "1", description: "Referring Physician's Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x0100)), alias: "CodeValue", vr: Exact(VR::SH), vm: "1", description: "Code Value", retired: false },
    E { tag: Single(Tag(0x0008, 0x0102)), alias: "CodingSchemeDesignator", vr: Exact(VR::SH), vm: "1", description: "Coding Scheme Designator", retired: false },
    E { tag: Single(Tag(0x0008, 0x0103)), alias: "CodingSchemeVersion", vr: Exact(VR::SH), vm: "1", description: "Coding Scheme Version", retired: false },
    E { tag: Single(Tag(0x0008, 0x0104)), alias: "CodeMeaning", vr: Exact(VR::LO), vm: "1", description: "Code Meaning", retired: false },
    E { tag: Single(Tag(0x0008, 0x0119)), alias: "LongCodeValue", vr: Exact(VR::UC), vm: "1", description: "Long Code Value", retired: false },
    E { tag: Single(Tag(0x0008, 0x0120)), alias: "URNCodeValue", vr: Exact(VR::UR), vm: "1", description: "URN Code Value", retired: false },
    E { tag: Single(Tag(0x0008, 0x0201)), alias: "TimezoneOffsetFromUTC", vr: Exact(VR::SH), vm: "1", description: "Timezone Offset From UTC", retired: false },
    E { tag: Single(Tag(0x0008, 0x1010)), alias: "StationName", vr: Exact(VR::SH), vm: "1", description: "Station Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x1030)), alias: "StudyDescription", vr: Exact(VR::LO), vm: "1", description: "Study Description", retired: false },
    E { tag: Single(Tag(0x0008, 0x103E)), alias: "SeriesDescription", vr: Exact(VR::LO), vm: "1", description: "Series Description", retired: false },
    E { tag: Single(Tag(0x0008, 0x1040)), alias: "InstitutionalDepartmentName", vr: Exact(VR::LO), vm: "1", description: "Institutional Department Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x1050)), alias: "PerformingPhysicianName", vr: Exact(VR::PN), vm: "1-n", description: "Performing Physician's Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x1070)), alias: "OperatorsName", vr: Exact(VR::PN), vm: "1-n", description: "Operators' Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x1090)), alias: "ManufacturerModelName", vr: Exact(VR::LO), vm: "1", description: "Manufacturer's Model Name", retired: false },
    E { tag: Single(Tag(0x0008, 0x1110)), alias: "ReferencedStudySequence", vr: Exact(VR::SQ), vm: "1", description: "Referenced Study Sequence", retired: false },
    E { tag: Single(Tag(0x0008, 0x1115)), alias: "ReferencedSeriesSequence", vr: Exact(VR::SQ), vm: "1", description: "Referenced Series Sequence", retired: false },
    E { tag: Single(Tag(0x0008, 0x1140)), alias: "ReferencedImageSequence", vr: Exact(VR::SQ), vm: "1", description: "Referenced Image Sequence", retired: false },
    E { tag: Single(Tag(0x0008, 0x1150)), alias: "ReferencedSOPClassUID", vr: Exact(VR::UI), vm: "1", description: "Referenced SOP Class UID", retired: false },
    E { tag: Single(Tag(0x0008, 0x1155)), alias: "ReferencedSOPInstanceUID", vr: Exact(VR::UI), vm: "1", description: "Referenced SOP Instance UID", retired: false },
    E { tag: Single(Tag(0x0008, 0x1160)), alias: "ReferencedFrameNumber", vr: Exact(VR::IS), vm: "1-n", description: "Referenced Frame Number", retired: false },
    E { tag: Single(Tag(0x0008, 0x2111)), alias: "DerivationDescription", vr: Exact(VR::ST), vm: "1", description: "Derivation Description", retired: false },
    E { tag: Single(Tag(0x0008, 0x2112)), alias: "SourceImageSequence", vr: Exact(VR::SQ), vm: "1", description: "Source Image Sequence", retired: false },
    E { tag: Single(Tag(0x0008, 0x9215)), alias: "DerivationCodeSequence", vr: Exact(VR::SQ), vm: "1", description: "Derivation Code Sequence", retired: false },
    E { tag: Single(Tag(0x0010, 0x0010)), alias: "PatientName", vr: Exact(VR::PN), vm: "1", description: "Patient's Name", retired: false },
    E { tag: Single(Tag(0x0010, 0x0020)), alias: "PatientID", vr: Exact(VR::LO), vm: "1", description: "Patient ID", retired: false },
    E { tag: Single(Tag(0x0010, 0x0021)), alias: "IssuerOfPatientID", vr: Exact(VR::LO), vm: "1", description: "Issuer of Patient ID", retired: false },
    E { tag: Single(Tag(0x0010, 0x0030)), alias: "PatientBirthDate", vr: Exact(VR::DA), vm: "1", description: "Patient's Birth Date", retired: false },
    E { tag: Single(Tag(0x0010, 0x0032)), alias: "PatientBirthTime", vr: Exact(VR::TM), vm: "1", description: "Patient's Birth Time", retired: false },
    E { tag: Single(Tag(0x0010, 0x0040)), alias: "PatientSex", vr: Exact(VR::CS), vm: "1", description: "Patient's Sex", retired: false },
    E { tag: Single(Tag(0x0010, 0x1000)), alias: "OtherPatientIDs", vr: Exact(VR::LO), vm: "1-n", description: "Other Patient IDs", retired: true },
    E { tag: Single(Tag(0x0010, 0x1001)), alias: "OtherPatientNames", vr: Exact(VR::PN), vm: "1-n", description: "Other Patient Names", retired: false },
    E { tag: Single(Tag(0x0010, 0x1002)), alias: "OtherPatientIDsSequence", vr: Exact(VR::SQ), vm: "1", description: "Other Patient IDs Sequence", retired: false },
    E { tag: Single(Tag(0x0010, 0x1010)), alias: "PatientAge", vr: Exact(VR::AS), vm: "1", description: "Patient's Age", retired: false },
    E { tag: Single(Tag(0x0010, 0x1020)), alias: "PatientSize", vr: Exact(VR::DS), vm: "1", description: "Patient's Size", retired: false },
    E { tag: Single(Tag(0x0010, 0x1030)), alias: "PatientWeight", vr: Exact(VR::DS), vm: "1", description: "Patient's Weight", retired: false },
    E { tag: Single(Tag(0x0010, 0x2160)), alias: "EthnicGroup", vr: Exact(VR::SH), vm: "1", description: "Ethnic Group", retired: false },
    E { tag: Single(Tag(0x0010, 0x21C0)), alias: "PregnancyStatus", vr: Exact(VR::US), vm: "1", description: "Pregnancy Status", retired: false },
    E { tag: Single(Tag(0x0010, 0x4000)), alias: "PatientComments", vr: Exact(VR::LT), vm: "1", description: "Patient Comments", retired: false },
    E { tag: Single(Tag(0x0018, 0x0010)), alias: "ContrastBolusAgent", vr: Exact(VR::LO), vm: "1", description: "Contrast/Bolus Agent", retired: false },
    E { tag: Single(Tag(0x0018, 0x0015)), alias: "BodyPartExamined", vr: Exact(VR::CS), vm: "1", description: "Body Part Examined", retired: false },
    E { tag: Single(Tag(0x0018, 0x0050)), alias: "SliceThickness", vr: Exact(VR::DS), vm: "1", description: "Slice Thickness", retired: false },
    E { tag: Single(Tag(0x0018, 0x0060)), alias: "KVP", vr: Exact(VR::DS), vm: "1", description: "KVP", retired: false },
    E { tag: Single(Tag(0x0018, 0x0088)), alias: "SpacingBetweenSlices", vr: Exact(VR::DS), vm: "1", description: "Spacing Between Slices", retired: false },
    E { tag: Single(Tag(0x0018, 0x1020)), alias: "SoftwareVersions", vr: Exact(VR::LO), vm: "1-n", description: "Software Versions", retired: false },
    E { tag: Single(Tag(0x0018, 0x1030)), alias: "ProtocolName", vr: Exact(VR::LO), vm: "1", description: "Protocol Name", retired: false },
    E { tag: Single(Tag(0x0018, 0x1150)), alias: "ExposureTime", vr: Exact(VR::IS), vm: "1", description: "Exposure Time", retired: false },
    E { tag: Single(Tag(0x0018, 0x1151)), alias: "XRayTubeCurrent", vr: Exact(VR::IS), vm: "1", description: "X-Ray Tube Current", retired: false },
    E { tag: Single(Tag(0x0018, 0x1152)), alias: "Exposure", vr: Exact(VR::IS), vm: "1", description: "Exposure", retired: false },
    E { tag: Single(Tag(0x0018, 0x1164)), alias: "ImagerPixelSpacing", vr: Exact(VR::DS), vm: "2", description: "Imager Pixel Spacing", retired: false },
    E { tag: Single(Tag(0x0018, 0x5100)), alias: "PatientPosition", vr: Exact(VR::CS), vm: "1", description: "Patient Position", retired: false },
    E { tag: Single(Tag(0x0018, 0x6011)), alias: "SequenceOfUltrasoundRegions", vr: Exact(VR::SQ), vm: "1", description: "Sequence of Ultrasound Regions", retired: false },
    E { tag: Single(Tag(0x0018, 0x602C)), alias: "PhysicalDeltaX", vr: Exact(VR::FD), vm: "1", description: "Physical Delta X", retired: false },
    E { tag: Single(Tag(0x0018, 0x602E)), alias: "PhysicalDeltaY", vr: Exact(VR::FD), vm: "1", description: "Physical Delta Y", retired: false },
    E { tag: Single(Tag(0x0020, 0x000D)), alias: "StudyInstanceUID", vr: Exact(VR::UI), vm: "1", description: "Study Instance UID", retired: false },
    E { tag: Single(Tag(0x0020, 0x000E)), alias: "SeriesInstanceUID", vr: Exact(VR::UI), vm: "1", description: "Series Instance UID", retired: false },
    E { tag: Single(Tag(0x0020, 0x0010)), alias: "StudyID", vr: Exact(VR::SH), vm: "1", description: "Study ID", retired: false },
    E { tag: Single(Tag(0x0020, 0x0011)), alias: "SeriesNumber", vr: Exact(VR::IS), vm: "1", description: "Series Number", retired: false },
    E { tag: Single(Tag(0x0020, 0x0012)), alias: "AcquisitionNumber", vr: Exact(VR::IS), vm: "1", description: "Acquisition Number", retired: false },
    E { tag: Single(Tag(0x0020, 0x0013)), alias: "InstanceNumber", vr: Exact(VR::IS), vm: "1", description: "Instance Number", retired: false },
    E { tag: Single(Tag(0x0020, 0x0020)), alias: "PatientOrientation", vr: Exact(VR::CS), vm: "2", description: "Patient Orientation", retired: false },
    E { tag: Single(Tag(0x0020, 0x0032)), alias: "ImagePositionPatient", vr: Exact(VR::DS), vm: "3", description: "Image Position (Patient)", retired: false },
    E { tag: Single(Tag(0x0020, 0x0037)), alias: "ImageOrientationPatient", vr: Exact(VR::DS), vm: "6", description: "Image Orientation (Patient)", retired: false },
    E { tag: Single(Tag(0x0020, 0x0052)), alias: "FrameOfReferenceUID", vr: Exact(VR::UI), vm: "1", description: "Frame of Reference UID", retired: false },
    E { tag: Single(Tag(0x0020, 0x0060)), alias: "Laterality", vr: Exact(VR::CS), vm: "1", description: "Laterality", retired: false },
    E { tag: Single(Tag(0x0020, 0x1041)), alias: "SliceLocation", vr: Exact(VR::DS), vm: "1", description: "Slice Location", retired: false },
    E { tag: Single(Tag(0x0020, 0x4000)), alias: "ImageComments", vr: Exact(VR::LT), vm: "1", description: "Image Comments", retired: false },
    E { tag: Single(Tag(0x0020, 0x9161)), alias: "ConcatenationUID", vr: Exact(VR::UI), vm: "1", description: "Concatenation UID", retired: false },
    E { tag: Single(Tag(0x0028, 0x0002)), alias: "SamplesPerPixel", vr: Exact(VR::US), vm: "1", description: "Samples per Pixel", retired: false },
    E { tag: Single(Tag(0x0028, 0x0004)), alias: "PhotometricInterpretation", vr: Exact(VR::CS), vm: "1", description: "Photometric Interpretation", retired: false },
    E { tag: Single(Tag(0x0028, 0x0006)), alias: "PlanarConfiguration", vr: Exact(VR::US), vm: "1", description: "Planar Configuration", retired: false },
    E { tag: Single(Tag(0x0028, 0x0008)), alias: "NumberOfFrames", vr: Exact(VR::IS), vm: "1", description: "Number of Frames", retired: false },
    E { tag: Single(Tag(0x0028, 0x0009)), alias: "FrameIncrementPointer", vr: Exact(VR::AT), vm: "1-n", description: "Frame Increment Pointer", retired: false },
    E { tag: Single(Tag(0x0028, 0x0010)), alias: "Rows", vr: Exact(VR::US), vm: "1", description: "Rows", retired: false },
    E { tag: Single(Tag(0x0028, 0x0011)), alias: "Columns", vr: Exact(VR::US), vm: "1", description: "Columns", retired: false },
    E { tag: Single(Tag(0x0028, 0x0030)), alias: "PixelSpacing", vr: Exact(VR::DS), vm: "2", description: "Pixel Spacing", retired: false },
    E { tag: Single(Tag(0x0028, 0x0034)), alias: "PixelAspectRatio", vr: Exact(VR::IS), vm: "2", description: "Pixel Aspect Ratio", retired: false },
    E { tag: Single(Tag(0x0028, 0x0100)), alias: "BitsAllocated", vr: Exact(VR::US), vm: "1", description: "Bits Allocated", retired: false },
    E { tag: Single(Tag(0x0028, 0x0101)), alias: "BitsStored", vr: Exact(VR::US), vm: "1", description: "Bits Stored", retired: false },
    E { tag: Single(Tag(0x0028, 0x0102)), alias: "HighBit", vr: Exact(VR::US), vm: "1", description: "High Bit", retired: false },
    E { tag: Single(Tag(0x0028, 0x0103)), alias: "PixelRepresentation", vr: Exact(VR::US), vm: "1", description: "Pixel Representation", retired: false },
    E { tag: Single(Tag(0x0028, 0x0106)), alias: "SmallestImagePixelValue", vr: Xs, vm: "1", description: "Smallest Image Pixel Value", retired: false },
    E { tag: Single(Tag(0x0028, 0x0107)), alias: "LargestImagePixelValue", vr: Xs, vm: "1", description: "Largest Image Pixel Value", retired: false },
    E { tag: Single(Tag(0x0028, 0x0120)), alias: "PixelPaddingValue", vr: Xs, vm: "1", description: "Pixel Padding Value", retired: false },
    E { tag: Single(Tag(0x0028, 0x0301)), alias: "BurnedInAnnotation", vr: Exact(VR::CS), vm: "1", description: "Burned In Annotation", retired: false },
    E { tag: Single(Tag(0x0028, 0x1050)), alias: "WindowCenter", vr: Exact(VR::DS), vm: "1-n", description: "Window Center", retired: false },
    E { tag: Single(Tag(0x0028, 0x1051)), alias: "WindowWidth", vr: Exact(VR::DS), vm: "1-n", description: "Window Width", retired: false },
    E { tag: Single(Tag(0x0028, 0x1052)), alias: "RescaleIntercept", vr: Exact(VR::DS), vm: "1", description: "Rescale Intercept", retired: false },
    E { tag: Single(Tag(0x0028, 0x1053)), alias: "RescaleSlope", vr: Exact(VR::DS), vm: "1", description: "Rescale Slope", retired: false },
    E { tag: Single(Tag(0x0028, 0x1054)), alias: "RescaleType", vr: Exact(VR::LO), vm: "1", description: "Rescale Type", retired: false },
    E { tag: Single(Tag(0x0028, 0x1101)), alias: "RedPaletteColorLookupTableDescriptor", vr: Xs, vm: "3", description: "Red Palette Color Lookup Table Descriptor", retired: false },
    E { tag: Single(Tag(0x0028, 0x1201)), alias: "RedPaletteColorLookupTableData", vr: Exact(VR::OW), vm: "1", description: "Red Palette Color Lookup Table Data", retired: false },
    E { tag: Single(Tag(0x0028, 0x2110)), alias: "LossyImageCompression", vr: Exact(VR::CS), vm: "1", description: "Lossy Image Compression", retired: false },
    E { tag: Single(Tag(0x0028, 0x2112)), alias: "LossyImageCompressionRatio", vr: Exact(VR::DS), vm: "1-n", description: "Lossy Image Compression Ratio", retired: false },
    E { tag: Single(Tag(0x0028, 0x2114)), alias: "LossyImageCompressionMethod", vr: Exact(VR::CS), vm: "1-n", description: "Lossy Image Compression Method", retired: false },
    E { tag: Single(Tag(0x0028, 0x3000)), alias: "ModalityLUTSequence", vr: Exact(VR::SQ), vm: "1", description: "Modality LUT Sequence", retired: false },
    E { tag: Single(Tag(0x0028, 0x3002)), alias: "LUTDescriptor", vr: Xs, vm: "3", description: "LUT Descriptor", retired: false },
    E { tag: Single(Tag(0x0028, 0x3006)), alias: "LUTData", vr: Lt, vm: "1-n", description: "LUT Data", retired: false },
    E { tag: Single(Tag(0x0028, 0x3010)), alias: "VOILUTSequence", vr: Exact(VR::SQ), vm: "1", description: "VOI LUT Sequence", retired: false },
    E { tag: Single(Tag(0x0028, 0x7FE0)), alias: "PixelDataProviderURL", vr: Exact(VR::UR), vm: "1", description: "Pixel Data Provider URL", retired: false },
    E { tag: Single(Tag(0x0032, 0x1060)), alias: "RequestedProcedureDescription", vr: Exact(VR::LO), vm: "1", description: "Requested Procedure Description", retired: false },
    E { tag: Single(Tag(0x0040, 0x0244)), alias: "PerformedProcedureStepStartDate", vr: Exact(VR::DA), vm: "1", description: "Performed Procedure Step Start Date", retired: false },
    E { tag: Single(Tag(0x0040, 0x0245)), alias: "PerformedProcedureStepStartTime", vr: Exact(VR::TM), vm: "1", description: "Performed Procedure Step Start Time", retired: false },
    E { tag: Single(Tag(0x0040, 0x0260)), alias: "PerformedProtocolCodeSequence", vr: Exact(VR::SQ), vm: "1", description: "Performed Protocol Code Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0x0275)), alias: "RequestAttributesSequence", vr: Exact(VR::SQ), vm: "1", description: "Request Attributes Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0xA010)), alias: "RelationshipType", vr: Exact(VR::CS), vm: "1", description: "Relationship Type", retired: false },
    E { tag: Single(Tag(0x0040, 0xA040)), alias: "ValueType", vr: Exact(VR::CS), vm: "1", description: "Value Type", retired: false },
    E { tag: Single(Tag(0x0040, 0xA043)), alias: "ConceptNameCodeSequence", vr: Exact(VR::SQ), vm: "1", description: "Concept Name Code Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0xA124)), alias: "UID", vr: Exact(VR::UI), vm: "1", description: "UID", retired: false },
    E { tag: Single(Tag(0x0040, 0xA160)), alias: "TextValue", vr: Exact(VR::UT), vm: "1", description: "Text Value", retired: false },
    E { tag: Single(Tag(0x0040, 0xA168)), alias: "ConceptCodeSequence", vr: Exact(VR::SQ), vm: "1", description: "Concept Code Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0xA730)), alias: "ContentSequence", vr: Exact(VR::SQ), vm: "1", description: "Content Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0xA30A)), alias: "NumericValue", vr: Exact(VR::DS), vm: "1-n", description: "Numeric Value", retired: false },
    E { tag: Single(Tag(0x0040, 0x9096)), alias: "RealWorldValueMappingSequence", vr: Exact(VR::SQ), vm: "1", description: "Real World Value Mapping Sequence", retired: false },
    E { tag: Single(Tag(0x0040, 0x9212)), alias: "RealWorldValueLUTData", vr: Exact(VR::FD), vm: "1-n", description: "Real World Value LUT Data", retired: false },
    E { tag: Single(Tag(0x0054, 0x0081)), alias: "NumberOfSlices", vr: Exact(VR::US), vm: "1", description: "Number of Slices", retired: false },
    E { tag: Single(Tag(0x0088, 0x0140)), alias: "StorageMediaFileSetUID", vr: Exact(VR::UI), vm: "1", description: "Storage Media File-set UID", retired: false },
    E { tag: Single(Tag(0x0088, 0x0200)), alias: "IconImageSequence", vr: Exact(VR::SQ), vm: "1", description: "Icon Image Sequence", retired: false },
    E { tag: Single(Tag(0x5200, 0x9229)), alias: "SharedFunctionalGroupsSequence", vr: Exact(VR::SQ), vm: "1", description: "Shared Functional Groups Sequence", retired: false },
    E { tag: Single(Tag(0x5200, 0x9230)), alias: "PerFrameFunctionalGroupsSequence", vr: Exact(VR::SQ), vm: "1", description: "Per-Frame Functional Groups Sequence", retired: false },
    E { tag: Group100(Tag(0x5000, 0x0005)), alias: "CurveDimensions", vr: Exact(VR::US), vm: "1", description: "Curve Dimensions", retired: true },
    E { tag: Group100(Tag(0x5000, 0x3000)), alias: "CurveData", vr: Ox, vm: "1", description: "Curve Data", retired: true },
    E { tag: Group100(Tag(0x6000, 0x0010)), alias: "OverlayRows", vr: Exact(VR::US), vm: "1", description: "Overlay Rows", retired: false },
    E { tag: Group100(Tag(0x6000, 0x0011)), alias: "OverlayColumns", vr: Exact(VR::US), vm: "1", description: "Overlay Columns", retired: false },
    E { tag: Group100(Tag(0x6000, 0x0040)), alias: "OverlayType", vr: Exact(VR::CS), vm: "1", description: "Overlay Type", retired: false },
    E { tag: Group100(Tag(0x6000, 0x0050)), alias: "OverlayOrigin", vr: Exact(VR::SS), vm: "2", description: "Overlay Origin", retired: false },
    E { tag: Group100(Tag(0x6000, 0x0100)), alias: "OverlayBitsAllocated", vr: Exact(VR::US), vm: "1", description: "Overlay Bits Allocated", retired: false },
    E { tag: Group100(Tag(0x6000, 0x0102)), alias: "OverlayBitPosition", vr: Exact(VR::US), vm: "1", description: "Overlay Bit Position", retired: false },
    E { tag: Group100(Tag(0x6000, 0x3000)), alias: "OverlayData", vr: Ox, vm: "1", description: "Overlay Data", retired: false },
    E { tag: Single(Tag(0x7FE0, 0x0001)), alias: "ExtendedOffsetTable", vr: Exact(VR::OV), vm: "1", description: "Extended Offset Table", retired: false },
    E { tag: Single(Tag(0x7FE0, 0x0002)), alias: "ExtendedOffsetTableLengths", vr: Exact(VR::OV), vm: "1", description: "Extended Offset Table Lengths", retired: false },
    E { tag: Single(Tag(0x7FE0, 0x0008)), alias: "FloatPixelData", vr: Exact(VR::OF), vm: "1", description: "Float Pixel Data", retired: false },
    E { tag: Single(Tag(0x7FE0, 0x0009)), alias: "DoubleFloatPixelData", vr: Exact(VR::OD), vm: "1", description: "Double Float Pixel Data", retired: false },
    E { tag: Single(Tag(0x7FE0, 0x0010)), alias: "PixelData", vr: Px, vm: "1", description: "Pixel Data", retired: false },
    E { tag: Group100(Tag(0x7F00, 0x0010)), alias: "VariablePixelData", vr: Ox, vm: "1", description: "Variable Pixel Data", retired: true },
    E { tag: Single(Tag(0xFFFA, 0xFFFA)), alias: "DigitalSignaturesSequence", vr: Exact(VR::SQ), vm: "1", description: "Digital Signatures Sequence", retired: false },
    E { tag: Single(Tag(0xFFFC, 0xFFFC)), alias: "DataSetTrailingPadding", vr: Exact(VR::OB), vm: "1", description: "Data Set Trailing Padding", retired: false },
    E { tag: Single(Tag(0xFFFE, 0xE000)), alias: "Item", vr: Exact(VR::UN), vm: "1", description: "Item", retired: false },
    E { tag: Single(Tag(0xFFFE, 0xE00D)), alias: "ItemDelimitationItem", vr: Exact(VR::UN), vm: "1", description: "Item Delimitation Item", retired: false },
    E { tag: Single(Tag(0xFFFE, 0xE0DD)), alias: "SequenceDelimitationItem", vr: Exact(VR::UN), vm: "1", description: "Sequence Delimitation Item", retired: false },
];
