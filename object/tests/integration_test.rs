use std::io::Cursor;

use dcmcodec_core::header::Length;
use dcmcodec_core::value::DataSetSequence;
use dcmcodec_core::{CodecConfig, DataElement, Diagnostics, PrimitiveValue, VR};
use dcmcodec_dictionary_std::{tags, uids};
use dcmcodec_encoding::TransferSyntax;
use dcmcodec_object::{
    open_file, AccessError, DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject,
    OpenFileOptions, ReadPreamble, WriteOptions,
};
use dcmcodec_pixeldata::{compress_rle, decompress_rle, SegmentOrder};
use dcmcodec_transfer_syntax_registry::entries::{
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN, EXPLICIT_VR_BIG_ENDIAN, EXPLICIT_VR_LITTLE_ENDIAN,
    IMPLICIT_VR_LITTLE_ENDIAN, RLE_LOSSLESS,
};
use rstest::rstest;

fn referenced_image(class_uid: &str, instance_uid: &str) -> InMemDicomObject {
    InMemDicomObject::from_element_iter([
        DataElement::new(tags::REFERENCED_SOP_CLASS_UID, VR::UI, class_uid),
        DataElement::new(tags::REFERENCED_SOP_INSTANCE_UID, VR::UI, instance_uid),
    ])
}

/// A data set with nested sequences, non-ASCII text and native pixel data.
fn sample_object() -> InMemDicomObject {
    let mut inner = referenced_image(uids::CT_IMAGE_STORAGE, "2.25.3");
    inner.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Zoë^Ana"));
    let mut outer = referenced_image(uids::CT_IMAGE_STORAGE, "2.25.2");
    outer.put(DataElement::new(
        tags::REFERENCED_IMAGE_SEQUENCE,
        VR::SQ,
        DataSetSequence::new(vec![inner], Length::UNDEFINED),
    ));

    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(tags::SPECIFIC_CHARACTER_SET, VR::CS, "ISO_IR 192"));
    obj.put(DataElement::new(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE));
    obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.1"));
    obj.put(DataElement::new(tags::MODALITY, VR::CS, "OT"));
    obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Müller^Hans"));
    obj.put(DataElement::new(
        tags::REFERENCED_IMAGE_SEQUENCE,
        VR::SQ,
        DataSetSequence::new(
            vec![outer, referenced_image(uids::CT_IMAGE_STORAGE, "2.25.4")],
            Length::UNDEFINED,
        ),
    ));
    obj.put_str("Rows", "4").unwrap();
    obj.put_str("Columns", "4").unwrap();
    obj.put_str("SamplesPerPixel", "1").unwrap();
    obj.put_str("BitsAllocated", "8").unwrap();
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from((0..16).collect::<Vec<u8>>()),
    ));
    obj
}

fn sample_file(ts: &TransferSyntax) -> DefaultDicomObject {
    sample_object()
        .with_meta(FileMetaTableBuilder::new().transfer_syntax(ts.uid()))
        .unwrap()
}

#[rstest]
#[case(&EXPLICIT_VR_LITTLE_ENDIAN)]
#[case(&IMPLICIT_VR_LITTLE_ENDIAN)]
#[case(&EXPLICIT_VR_BIG_ENDIAN)]
#[case(&DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN)]
fn write_and_read_back_file(#[case] ts: &TransferSyntax) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.dcm");

    let file = sample_file(ts);
    file.write_to_file(&path).unwrap();

    let read = open_file(&path).unwrap();
    assert_eq!(read.meta().transfer_syntax(), ts.uid());
    assert_eq!(read, file);
    assert!(read.diagnostics().is_empty());

    let name = read.element(tags::PATIENT_NAME).unwrap();
    assert_eq!(name.to_str().unwrap(), "Müller^Hans");

    let items = read
        .element(tags::REFERENCED_IMAGE_SEQUENCE)
        .unwrap()
        .items()
        .unwrap();
    assert_eq!(items.len(), 2);
    let nested = items[0]
        .element(tags::REFERENCED_IMAGE_SEQUENCE)
        .unwrap()
        .items()
        .unwrap();
    assert_eq!(
        nested[0].element(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
        "Zoë^Ana"
    );
}

#[rstest]
#[case(false)]
#[case(true)]
fn write_and_read_back_data_set(#[case] undefined_length_sequences: bool) {
    let obj = sample_object();
    let options = WriteOptions::new().undefined_length_sequences(undefined_length_sequences);

    let mut bytes = Vec::new();
    obj.write_dataset_with_ts_options(&mut bytes, &EXPLICIT_VR_LITTLE_ENDIAN, options)
        .unwrap();

    let read = InMemDicomObject::read_dataset_with_ts(
        Cursor::new(&bytes),
        &EXPLICIT_VR_LITTLE_ENDIAN,
        &CodecConfig::default(),
    )
    .unwrap();
    assert_eq!(read, obj);

    let header = read.header(tags::REFERENCED_IMAGE_SEQUENCE).unwrap();
    assert_eq!(header.len.is_undefined(), undefined_length_sequences);
}

#[test]
fn file_meta_group_is_always_explicit_vr_little_endian() {
    let file = sample_file(&IMPLICIT_VR_LITTLE_ENDIAN);
    let mut bytes = Vec::new();
    file.write_all(&mut bytes).unwrap();

    assert_eq!(&bytes[128..132], b"DICM");
    // (0002,0000) UL 4
    assert_eq!(&bytes[132..140], &[0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00]);
    let group_length = u32::from_le_bytes([bytes[140], bytes[141], bytes[142], bytes[143]]);

    // the main data set starts right after the group, without a VR
    let body = 144 + group_length as usize;
    assert_eq!(&bytes[body..body + 4], &[0x08, 0x00, 0x05, 0x00]);
    assert_eq!(&bytes[body + 4..body + 8], &[0x0A, 0x00, 0x00, 0x00]);
}

#[test]
fn deferred_values_are_read_on_access() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deferred.dcm");

    let mut obj = sample_object();
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(vec![0x5A_u8; 2048]),
    ));
    let file = obj
        .with_meta(FileMetaTableBuilder::new().transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid()))
        .unwrap();
    file.write_to_file(&path).unwrap();

    let eager = open_file(&path).unwrap();
    let lazy = OpenFileOptions::new()
        .config(CodecConfig::default().defer_size(Some(256)))
        .open_file(&path)
        .unwrap();

    assert!(lazy.is_deferred(tags::PIXEL_DATA));
    assert!(!lazy.is_deferred(tags::PATIENT_NAME));
    assert_eq!(lazy.header(tags::PIXEL_DATA).unwrap().len, Length(2048));

    let pixel_data = lazy.element(tags::PIXEL_DATA).unwrap();
    assert_eq!(pixel_data.primitive().unwrap().to_bytes(), &[0x5A; 2048][..]);
    assert!(!lazy.is_deferred(tags::PIXEL_DATA));
    assert_eq!(lazy, eager);
}

#[test]
fn deferred_value_of_missing_file_fails_on_access() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moved.dcm");

    let mut obj = sample_object();
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(vec![0x11_u8; 1024]),
    ));
    obj.with_meta(FileMetaTableBuilder::new().transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid()))
        .unwrap()
        .write_to_file(&path)
        .unwrap();

    let lazy = OpenFileOptions::new()
        .config(CodecConfig::default().defer_size(Some(256)))
        .open_file(&path)
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    // values read eagerly are still there
    assert!(lazy.element(tags::PATIENT_NAME).is_ok());
    assert!(matches!(
        lazy.element(tags::PIXEL_DATA),
        Err(AccessError::Materialize { .. })
    ));
}

#[test]
fn read_until_pixel_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("until.dcm");
    sample_file(&EXPLICIT_VR_LITTLE_ENDIAN)
        .write_to_file(&path)
        .unwrap();

    let obj = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(&path)
        .unwrap();
    assert!(obj.element_opt(tags::PIXEL_DATA).unwrap().is_none());
    assert_eq!(obj.element(tags::ROWS).unwrap().to_int::<u16>().unwrap(), 4);
}

#[test]
fn walk_reports_item_paths() {
    let obj = sample_object();
    let mut deepest = Vec::new();
    obj.walk(|path, _elem| {
        if path.len() > deepest.len() {
            deepest = path.to_vec();
        }
    })
    .unwrap();

    assert_eq!(deepest.len(), 2);
    assert_eq!(deepest[0].sequence_tag, tags::REFERENCED_IMAGE_SEQUENCE);
    assert_eq!(deepest[0].item_index, 0);
    assert_eq!(deepest[1].item_index, 0);
}

#[test]
fn rle_lossless_compress_and_decompress() {
    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, "Doe^John"));
    obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.5"));
    obj.put_str("Rows", "2").unwrap();
    obj.put_str("Columns", "2").unwrap();
    obj.put_str("SamplesPerPixel", "1").unwrap();
    obj.put_str("BitsAllocated", "8").unwrap();
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(vec![5_u8; 4]),
    ));
    let mut file = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        )
        .unwrap();

    compress_rle(&mut file).unwrap();
    assert_eq!(file.meta().transfer_syntax(), RLE_LOSSLESS.uid());

    // RLE header with a single segment at offset 64
    let expected_frame: Vec<u8> = {
        let mut header = vec![0_u8; 64];
        header[0] = 1;
        header[4] = 0x40;
        header.extend([0xFF, 0x05, 0xFF, 0x05]);
        header
    };

    // write and read back in RLE Lossless
    let mut bytes = Vec::new();
    file.write_all(&mut bytes).unwrap();
    let mut read = OpenFileOptions::new()
        .read_preamble(ReadPreamble::Always)
        .from_reader(Cursor::new(&bytes))
        .unwrap();

    let pixel_data = read.element(tags::PIXEL_DATA).unwrap();
    assert!(pixel_data.header().len.is_undefined());
    let fragments = pixel_data.fragments().unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0], expected_frame);

    let mut diagnostics = Diagnostics::default();
    decompress_rle(&mut read, SegmentOrder::MsbFirst, &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(read.meta().transfer_syntax(), EXPLICIT_VR_LITTLE_ENDIAN.uid());
    let pixel_data = read.element(tags::PIXEL_DATA).unwrap();
    assert_eq!(pixel_data.primitive().unwrap().to_bytes(), &[5, 5, 5, 5][..]);
    assert_eq!(
        read.element(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
        "Doe^John"
    );
}
