#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! DICOM encoding and decoding primitives.
//!
//! This crate provides the lowest layer of the data set codec:
//!
//! - [`stream`] wraps a byte source or sink
//!   with the byte order and VR explicitness of a transfer syntax;
//! - [`decode`] and [`encode`] read and write data element headers
//!   in each of the standard encodings;
//! - [`text`] holds the character set codecs
//!   selected by _Specific Character Set_,
//!   including ISO 2022 code extensions;
//! - [`convert`] turns raw value bytes into [`PrimitiveValue`]s and back,
//!   one rule per value representation,
//!   and validates values before they are written;
//! - [`transfer_syntax`] hosts the concept of a transfer syntax specifier,
//!   which is used to produce decoders and encoders at run-time;
//! - [`adapters`] declares the traits through which
//!   pixel data codecs plug into a transfer syntax.
//!
//! All APIs are based on synchronous I/O.
//!
//! [`PrimitiveValue`]: dcmcodec_core::PrimitiveValue

pub mod adapters;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod stream;
pub mod text;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use convert::{decode_value, encode_value, validate_value, ConvertContext};
pub use decode::Decode;
pub use encode::Encode;
pub use stream::ByteStream;
pub use text::{CharacterSets, SpecificCharacterSet};
pub use transfer_syntax::{Codec, TransferSyntax, TransferSyntaxIndex};
