//! Lookup of the built-in transfer syntaxes.
use dcmcodec_encoding::{Endianness, TransferSyntaxIndex};
use dcmcodec_transfer_syntax_registry::TransferSyntaxRegistry;
use rstest::rstest;

fn assert_fully_supported<T>(registry: T, uid: &str, name: &str)
where
    T: TransferSyntaxIndex,
{
    let ts = registry.get(uid);
    assert!(ts.is_some(), "Registry did not provide TS {}", uid);
    let ts = ts.unwrap();
    assert_eq!(ts.uid(), uid.trim_end_matches('\0'));
    assert_eq!(ts.name(), name);
    assert!(ts.fully_supported());
}

#[test]
fn contains_base_ts() {
    let registry = TransferSyntaxRegistry;

    // contains implicit VR little endian and is fully supported
    assert_fully_supported(registry, "1.2.840.10008.1.2", "Implicit VR Little Endian");
    // should work the same for trailing null characters
    assert_fully_supported(registry, "1.2.840.10008.1.2\0", "Implicit VR Little Endian");
    assert_fully_supported(registry, "1.2.840.10008.1.2.1", "Explicit VR Little Endian");
    assert_fully_supported(registry, "1.2.840.10008.1.2.1\0", "Explicit VR Little Endian");
    assert_fully_supported(registry, "1.2.840.10008.1.2.2", "Explicit VR Big Endian");
    assert_fully_supported(registry, "1.2.840.10008.1.2.2\0", "Explicit VR Big Endian");
}

#[rstest]
#[case("1.2.840.10008.1.2", Endianness::Little, false)]
#[case("1.2.840.10008.1.2.1", Endianness::Little, true)]
#[case("1.2.840.10008.1.2.2", Endianness::Big, true)]
#[case("1.2.840.10008.1.2.1.99", Endianness::Little, true)]
#[case("1.2.840.10008.1.2.5", Endianness::Little, true)]
fn header_encoding(#[case] uid: &str, #[case] endianness: Endianness, #[case] explicit: bool) {
    let ts = TransferSyntaxRegistry.get(uid).unwrap();
    assert_eq!(ts.endianness(), endianness);
    assert_eq!(ts.is_explicit_vr(), explicit);
}

#[rstest]
#[case("1.2.840.10008.1.2.4.50")]
#[case("1.2.840.10008.1.2.4.51")]
#[case("1.2.840.10008.1.2.4.57")]
#[case("1.2.840.10008.1.2.4.70")]
#[case("1.2.840.10008.1.2.4.80")]
#[case("1.2.840.10008.1.2.4.81")]
#[case("1.2.840.10008.1.2.4.90")]
#[case("1.2.840.10008.1.2.4.91")]
fn jpeg_family_is_opaque(#[case] uid: &str) {
    let ts = TransferSyntaxRegistry.get(uid).unwrap();
    assert!(ts.is_encapsulated_pixel_data());
    assert!(!ts.fully_supported());
    assert!(ts.pixel_data_adapter().is_none());
    assert!(ts.is_explicit_vr());
}

#[test]
fn trailing_space_is_ignored() {
    let ts = TransferSyntaxRegistry.get("1.2.840.10008.1.2.4.50 ").unwrap();
    assert_eq!(ts.uid(), "1.2.840.10008.1.2.4.50");
}

#[test]
fn unknown_uid_is_absent() {
    assert!(TransferSyntaxRegistry.get("1.2.840.10008.1.2.4.201").is_none());
    assert!(TransferSyntaxRegistry.get("").is_none());
}

#[test]
fn iterates_all_entries() {
    let mut uids: Vec<_> = TransferSyntaxRegistry.iter().map(|ts| ts.uid()).collect();
    uids.sort_unstable();
    assert_eq!(uids.len(), 13);
    assert!(uids.contains(&"1.2.840.10008.1.2.1.99"));
    assert!(uids.contains(&"1.2.840.10008.1.2.5"));
}

#[test]
fn default_ts() {
    let ts = dcmcodec_transfer_syntax_registry::default();
    assert_eq!(ts.uid(), "1.2.840.10008.1.2");
    assert!(ts.is_codec_free());
}
