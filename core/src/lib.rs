#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! This is the core library of the DICOM data set codec,
//! containing the concepts, data structures and traits
//! shared by every other crate in the workspace.
//!
//! - [`tag`] defines the DICOM attribute tag
//!   and its conversions from other representations.
//! - [`header`] comprises the data types for DICOM element headers,
//!   including value representations and value lengths.
//! - [`dictionary`] describes common behavior of DICOM data dictionaries,
//!   which translate keywords and tags to a dictionary entry.
//! - [`value`] holds definitions for values in DICOM data elements,
//!   with awareness of multiplicity, representation
//!   and the possible presence of sequences.
//! - [`diagnostic`] holds the non-fatal conformance warnings
//!   collected while reading or writing data sets.
//! - [`config`] holds the codec configuration,
//!   which is passed explicitly to every read and write entry point.

pub mod config;
pub mod diagnostic;
pub mod dictionary;
pub mod header;
pub mod tag;
pub mod value;

pub use config::{CodecConfig, ValidationMode};
pub use diagnostic::{ConformanceWarning, Diagnostics, WarningKind};
pub use dictionary::DataDictionary;
pub use header::{DataElement, DataElementHeader, Length, VR};
pub use tag::Tag;
pub use value::{PrimitiveValue, Value as DicomValue};

// re-export crates that are part of the public API
pub use chrono;
pub use smallvec;
