//! The DICOM transfer syntax descriptor.
//!
//! A [`TransferSyntax`] names the byte order and VR mode of a data set,
//! and whether the pixel data or the whole data set
//! needs an adapter on top of the header codecs.
//!
//! This crate does not host the known transfer syntaxes.
//! They are listed in the transfer syntax registry crate,
//! which implements [`TransferSyntaxIndex`].

use crate::adapters::{DatasetAdapter, PixelDataAdapter};
use crate::decode::basic::BasicDecoder;
use crate::decode::HeaderDecoder;
use crate::encode::HeaderEncoder;
use std::fmt;

pub use byteordered::Endianness;

/// A DICOM transfer syntax specifier.
#[derive(Debug)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// The transfer syntax' requirements and implemented capabilities.
    codec: Codec,
}

/// Trait for containers of transfer syntax specifiers.
pub trait TransferSyntaxIndex {
    /// Obtain a DICOM transfer syntax by its respective UID.
    ///
    /// Implementations of this method should be robust to the possible
    /// presence of trailing null characters (`\0`) or spaces in `uid`.
    fn get(&self, uid: &str) -> Option<&TransferSyntax>;
}

impl<T: ?Sized> TransferSyntaxIndex for &T
where
    T: TransferSyntaxIndex,
{
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        (**self).get(uid)
    }
}

/// A description and possible implementation regarding
/// the encoding and decoding requirements of a transfer syntax.
/// This is also used as a means to describe whether pixel data is encapsulated
/// and whether this implementation supports it.
#[derive(Clone, Copy)]
pub enum Codec {
    /// No codec is given, nor is it required.
    None,
    /// Custom encoding and decoding of the entire data set is required, but
    /// not supported.
    Unsupported,
    /// Pixel data is encapsulated, but there is no codec for it.
    /// Data sets can still be read and written,
    /// with the pixel data kept in its encapsulated form.
    EncapsulatedPixelData,
    /// Pixel data is encapsulated,
    /// and a codec is provided for reading and writing it.
    PixelData(&'static dyn PixelDataAdapter),
    /// The whole data set is transformed, and a codec is provided.
    Dataset(&'static dyn DatasetAdapter),
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::None => f.write_str("None"),
            Codec::Unsupported => f.write_str("Unsupported"),
            Codec::EncapsulatedPixelData => f.write_str("EncapsulatedPixelData"),
            Codec::PixelData(_) => f.write_str("PixelData(..)"),
            Codec::Dataset(_) => f.write_str("Dataset(..)"),
        }
    }
}

impl TransferSyntax {
    /// Create a new transfer syntax descriptor.
    ///
    /// Only transfer syntax implementors are expected to construct
    /// descriptors from scratch.
    /// Everyone else should look up an existing registry by UID.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        codec: Codec,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            codec,
        }
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Whether the value representation is explicit in element headers.
    pub const fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Obtain this transfer syntax' codec specification.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Check whether this transfer syntax specifier provides a complete
    /// implementation.
    pub fn fully_supported(&self) -> bool {
        matches!(
            self.codec,
            Codec::None | Codec::Dataset(_) | Codec::PixelData(_),
        )
    }

    /// Check whether no codecs are required for this transfer syntax.
    pub fn is_codec_free(&self) -> bool {
        matches!(self.codec, Codec::None)
    }

    /// Check whether reading and writing of data sets is unsupported.
    pub fn unsupported(&self) -> bool {
        matches!(self.codec, Codec::Unsupported)
    }

    /// Whether pixel data in this transfer syntax is encapsulated.
    pub fn is_encapsulated_pixel_data(&self) -> bool {
        matches!(
            self.codec,
            Codec::EncapsulatedPixelData | Codec::PixelData(_)
        )
    }

    /// The pixel data codec, if there is one.
    pub fn pixel_data_adapter(&self) -> Option<&'static dyn PixelDataAdapter> {
        match self.codec {
            Codec::PixelData(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// The data set codec, if there is one.
    pub fn dataset_adapter(&self) -> Option<&'static dyn DatasetAdapter> {
        match self.codec {
            Codec::Dataset(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// The element header decoder for this transfer syntax.
    ///
    /// The decoder does not consider data set compression,
    /// so the source must be adapted before decoding.
    pub fn header_decoder(&self) -> HeaderDecoder {
        HeaderDecoder::new(self.byte_order, self.explicit_vr)
    }

    /// The element header encoder for this transfer syntax.
    pub fn header_encoder(&self) -> HeaderEncoder {
        HeaderEncoder::new(self.byte_order, self.explicit_vr)
    }

    /// Obtain a dynamic basic decoder, based on this transfer syntax' expected endianness.
    pub fn basic_decoder(&self) -> BasicDecoder {
        BasicDecoder::from(self.endianness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static EXPLICIT_BE: TransferSyntax = TransferSyntax::new(
        "1.2.840.10008.1.2.2",
        "Explicit VR Big Endian",
        Endianness::Big,
        true,
        Codec::None,
    );

    static JPEG: TransferSyntax = TransferSyntax::new(
        "1.2.840.10008.1.2.4.50",
        "JPEG Baseline (Process 1)",
        Endianness::Little,
        true,
        Codec::EncapsulatedPixelData,
    );

    #[test]
    fn descriptors() {
        assert!(EXPLICIT_BE.is_codec_free());
        assert!(EXPLICIT_BE.fully_supported());
        assert!(!EXPLICIT_BE.is_encapsulated_pixel_data());
        assert_eq!(EXPLICIT_BE.header_decoder().endianness(), Endianness::Big);
        assert!(EXPLICIT_BE.header_encoder().is_explicit_vr());

        assert!(JPEG.is_encapsulated_pixel_data());
        assert!(!JPEG.fully_supported());
        assert!(JPEG.pixel_data_adapter().is_none());
        assert_eq!(format!("{:?}", JPEG.codec()), "EncapsulatedPixelData");
    }
}
