//! The adapters behind the deflate and RLE entries.
use dcmcodec_transfer_syntax_registry::entries;

#[cfg(feature = "deflate")]
#[test]
fn deflated_entry_has_dataset_adapter() {
    let ts = &entries::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN;
    assert!(ts.fully_supported());
    assert!(!ts.is_encapsulated_pixel_data());

    let adapter = ts.dataset_adapter().expect("deflate adapter");
    let data = b"\x08\x00\x60\x00CS\x02\x00MR".repeat(32);
    let mut compressed = Vec::new();
    adapter.encode_dataset(&data, &mut compressed).unwrap();
    let inflated = adapter.decode_dataset(&mut &compressed[..]).unwrap();
    assert_eq!(inflated, data);
}

#[cfg(not(feature = "deflate"))]
#[test]
fn deflated_entry_is_unsupported() {
    let ts = &entries::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN;
    assert!(ts.unsupported());
    assert!(ts.dataset_adapter().is_none());
}

#[cfg(feature = "rle")]
#[test]
fn rle_entry_has_pixel_data_adapter() {
    let ts = &entries::RLE_LOSSLESS;
    assert!(ts.fully_supported());
    assert!(ts.is_encapsulated_pixel_data());
    assert!(ts.pixel_data_adapter().is_some());
    assert!(ts.dataset_adapter().is_none());
}

#[cfg(not(feature = "rle"))]
#[test]
fn rle_entry_is_a_stub() {
    let ts = &entries::RLE_LOSSLESS;
    assert!(ts.is_encapsulated_pixel_data());
    assert!(!ts.fully_supported());
}
