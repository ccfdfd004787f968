//! This crate contains the registry of DICOM transfer syntaxes
//! known to the data set codec.
//! The registry maps the UID of a transfer syntax
//! into the respective transfer syntax specifier.
//!
//! The built-in entries cover the three uncompressed transfer syntaxes,
//! Deflated Explicit VR Little Endian (with the `deflate` feature),
//! RLE Lossless (with the `rle` feature),
//! and the JPEG family, whose encapsulated pixel data is kept opaque.
//!
//! # Example
//!
//! ```
//! use dcmcodec_encoding::TransferSyntaxIndex;
//! use dcmcodec_transfer_syntax_registry::TransferSyntaxRegistry;
//!
//! let ts = TransferSyntaxRegistry.get("1.2.840.10008.1.2.1\0").unwrap();
//! assert_eq!(ts.name(), "Explicit VR Little Endian");
//! assert!(ts.is_explicit_vr());
//! ```

pub mod entries;

#[cfg(feature = "deflate")]
pub mod deflate;

use byteordered::Endianness;
use dcmcodec_encoding::transfer_syntax::{Codec, TransferSyntax, TransferSyntaxIndex};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

pub use dcmcodec_encoding::transfer_syntax;

/// Main implementation of a registry of DICOM transfer syntaxes.
///
/// Consumers would generally use [`TransferSyntaxRegistry`] instead.
pub struct TransferSyntaxRegistryImpl {
    m: HashMap<&'static str, &'static TransferSyntax>,
}

impl fmt::Debug for TransferSyntaxRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: HashMap<&str, &str> =
            self.m.iter().map(|(uid, ts)| (*uid, ts.name())).collect();
        f.debug_struct("TransferSyntaxRegistryImpl")
            .field("m", &entries)
            .finish()
    }
}

impl TransferSyntaxRegistryImpl {
    /// Obtain an iterator of all registered transfer syntaxes.
    pub fn iter(&self) -> impl Iterator<Item = &'static TransferSyntax> + '_ {
        self.m.values().copied()
    }

    /// Obtain a DICOM transfer syntax by its respective UID.
    ///
    /// Trailing null characters and spaces in `uid` are ignored.
    fn get<U: AsRef<str>>(&self, uid: U) -> Option<&'static TransferSyntax> {
        let ts_uid = uid
            .as_ref()
            .trim_end_matches(|c: char| c == '\0' || c == ' ');
        self.m.get(ts_uid).copied()
    }

    /// Register the given transfer syntax (TS) to the system.
    /// An entry with the same UID is only overridden
    /// when the new one provides an implementation
    /// that the previous one lacked.
    fn register(&mut self, ts: &'static TransferSyntax) -> bool {
        use std::collections::hash_map::Entry;
        match self.m.entry(ts.uid()) {
            Entry::Occupied(mut e) => {
                let replace = matches!(
                    (e.get().codec(), ts.codec()),
                    (Codec::Unsupported, Codec::Dataset(_))
                        | (Codec::EncapsulatedPixelData, Codec::PixelData(_))
                );
                if replace {
                    e.insert(ts);
                } else {
                    tracing::debug!(
                        "Transfer syntax {} already registered, keeping previous entry",
                        ts.uid()
                    );
                }
                replace
            }
            Entry::Vacant(e) => {
                e.insert(ts);
                true
            }
        }
    }
}

/// Zero-sized representative of the main transfer syntax registry.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxRegistry {
    /// Obtain an iterator of all registered transfer syntaxes.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'static TransferSyntax> {
        get_registry().iter()
    }
}

impl TransferSyntaxIndex for TransferSyntaxRegistry {
    #[inline]
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        get_registry().get(uid)
    }
}

lazy_static! {
    static ref REGISTRY: TransferSyntaxRegistryImpl = {
        let mut registry = TransferSyntaxRegistryImpl {
            m: HashMap::with_capacity(16),
        };

        use self::entries::*;
        let built_in_ts: [&'static TransferSyntax; 13] = [
            &IMPLICIT_VR_LITTLE_ENDIAN,
            &EXPLICIT_VR_LITTLE_ENDIAN,
            &EXPLICIT_VR_BIG_ENDIAN,
            &DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
            &RLE_LOSSLESS,
            &JPEG_BASELINE,
            &JPEG_EXTENDED,
            &JPEG_LOSSLESS_NON_HIERARCHICAL,
            &JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION,
            &JPEG_LS_LOSSLESS_IMAGE_COMPRESSION,
            &JPEG_LS_LOSSY_IMAGE_COMPRESSION,
            &JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
            &JPEG_2000_IMAGE_COMPRESSION,
        ];

        for ts in built_in_ts {
            registry.register(ts);
        }
        registry
    };
}

/// Retrieve a reference to the global codec registry.
#[inline]
pub(crate) fn get_registry() -> &'static TransferSyntaxRegistryImpl {
    &REGISTRY
}

/// Retrieve the default transfer syntax,
/// Implicit VR Little Endian.
pub fn default() -> &'static TransferSyntax {
    &entries::IMPLICIT_VR_LITTLE_ENDIAN
}

/// Create a transfer syntax with encapsulated pixel data
/// which the registry does not decode.
pub(crate) const fn create_ts_stub(uid: &'static str, name: &'static str) -> TransferSyntax {
    TransferSyntax::new(
        uid,
        name,
        Endianness::Little,
        true,
        Codec::EncapsulatedPixelData,
    )
}
