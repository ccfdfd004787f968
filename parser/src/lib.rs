//! This crate works on top of the DICOM encoding primitives
//! to provide transfer syntax resolution and abstraction for parsing DICOM data sets,
//! which ultimately enables the user to perceive the DICOM object as a sequence of tokens.
//!
//! The main types of this crate are:
//!
//! - [`StatefulDecoder`], which reads element headers and values
//!   with the encoding of a transfer syntax and the active character sets;
//! - [`StatefulEncoder`], its writing counterpart;
//! - [`DataSetReader`], an iterator of [`DataToken`]s
//!   over a whole data set, including sequences and encapsulated pixel data;
//! - [`DataSetWriter`], which turns data set tokens back into bytes.
//!
//! Recoverable deviations from the standard are collected
//! as conformance warnings along the way,
//! so that consumers may decide what to do with them.
//!
//! For the time being, all APIs are based on synchronous I/O.

pub mod dataset;

pub mod stateful {
    //! Stateful decoding and encoding of data element headers and values.
    pub mod decode;
    pub mod encode;
}

pub use dataset::scan::{read_undefined_length_value, ScannedValue};
pub use dataset::{
    DataSetReader, DataSetReaderOptions, DataSetWriter, DataToken, ValueReadStrategy,
};
pub use stateful::decode::StatefulDecoder;
pub use stateful::encode::StatefulEncoder;
