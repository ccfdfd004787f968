//! The transfer syntax specifiers known to the registry.
//!
//! - **Fully implemented** means that data sets can be read and written,
//!   and that encapsulated pixel data, if any, can be decoded and encoded.
//! - **Stub descriptors** describe transfer syntaxes
//!   whose encapsulated pixel data is kept opaque.
//!   Data sets in these transfer syntaxes can still be read and written.

use crate::create_ts_stub;
use byteordered::Endianness;
use dcmcodec_encoding::transfer_syntax::{Codec, TransferSyntax};

#[cfg(feature = "deflate")]
use crate::deflate::FlateAdapter;
#[cfg(feature = "rle")]
use dcmcodec_pixeldata::RleLosslessAdapter;

#[cfg(feature = "deflate")]
static FLATE_ADAPTER: FlateAdapter = FlateAdapter;
#[cfg(feature = "rle")]
static RLE_LOSSLESS_ADAPTER: RleLosslessAdapter = RleLosslessAdapter::new();

// -- the three base transfer syntaxes, fully supported --

/// **Fully implemented:** Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub static IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    Codec::None,
);

/// **Fully implemented:** Explicit VR Little Endian
pub static EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    Endianness::Little,
    true,
    Codec::None,
);

/// **Fully implemented:** Explicit VR Big Endian
pub static EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    Codec::None,
);

// -- data set adapters --

/// **Fully implemented:** Deflated Explicit VR Little Endian
#[cfg(feature = "deflate")]
pub static DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
    Codec::Dataset(&FLATE_ADAPTER),
);

/// **Stub descriptor:** Deflated Explicit VR Little Endian
#[cfg(not(feature = "deflate"))]
pub static DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
    Codec::Unsupported,
);

// -- pixel data adapters --

/// **Fully implemented:** RLE Lossless
#[cfg(feature = "rle")]
pub static RLE_LOSSLESS: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.5",
    "RLE Lossless",
    Endianness::Little,
    true,
    Codec::PixelData(&RLE_LOSSLESS_ADAPTER),
);

/// **Stub descriptor:** RLE Lossless
#[cfg(not(feature = "rle"))]
pub static RLE_LOSSLESS: TransferSyntax = create_ts_stub("1.2.840.10008.1.2.5", "RLE Lossless");

// -- encapsulated pixel data, kept opaque --

/// **Stub descriptor:** JPEG Baseline (Process 1)
pub static JPEG_BASELINE: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");

/// **Stub descriptor:** JPEG Extended (Process 2 & 4)
pub static JPEG_EXTENDED: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");

/// **Stub descriptor:** JPEG Lossless, Non-Hierarchical (Process 14)
pub static JPEG_LOSSLESS_NON_HIERARCHICAL: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
);

/// **Stub descriptor:** JPEG Lossless, Non-Hierarchical, First-Order Prediction
/// (Process 14 [Selection Value 1])
pub static JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
);

/// **Stub descriptor:** JPEG-LS Lossless Image Compression
pub static JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
);

/// **Stub descriptor:** JPEG-LS Lossy (Near-Lossless) Image Compression
pub static JPEG_LS_LOSSY_IMAGE_COMPRESSION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
);

/// **Stub descriptor:** JPEG 2000 Image Compression (Lossless Only)
pub static JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
);

/// **Stub descriptor:** JPEG 2000 Image Compression
pub static JPEG_2000_IMAGE_COMPRESSION: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression");
