//! Pixel data handling for the DICOM data set codec.
//!
//! - [`encapsulation`] splits encapsulated pixel data into frames
//!   and builds encapsulated pixel data out of frames,
//!   with or without an offset table.
//! - [`rle`] implements the RLE Lossless image codec.
//! - [`compress_rle`] and [`decompress_rle`] convert the pixel data
//!   of a whole object to and from RLE Lossless.
//!
//! The [`RleLosslessAdapter`] is what the transfer syntax registry
//! hands out for the RLE Lossless transfer syntax.
//!
//! # Example
//!
//! ```
//! use dcmcodec_pixeldata::rle::{rle_decode_frame, rle_encode_frame, SegmentOrder};
//! use dcmcodec_core::Diagnostics;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = rle_encode_frame(&[5, 5, 5, 5], 2, 2, 1, 8, 0)?;
//! let mut diagnostics = Diagnostics::default();
//! let native = rle_decode_frame(&frame, 2, 2, 1, 8, SegmentOrder::MsbFirst, &mut diagnostics)?;
//! assert_eq!(native, [5, 5, 5, 5]);
//! # Ok(())
//! # }
//! ```
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]

pub mod encapsulation;
pub mod rle;

mod adapter;
mod transcode;

pub use adapter::RleLosslessAdapter;
pub use rle::SegmentOrder;
pub use transcode::{compress_rle, decompress_rle, Error, Result};
