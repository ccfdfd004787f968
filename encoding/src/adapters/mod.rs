//! Adapters for transfer syntaxes which need more than a header codec:
//! those with encapsulated pixel data,
//! and those which compress the whole data set.
//!
//! The traits here let codec crates work on DICOM objects
//! without depending on the object crate.
use dcmcodec_core::diagnostic::{Diagnostics, NonConformantError};
use dcmcodec_core::value::C;
use dcmcodec_core::VR;
use snafu::Snafu;
use std::io::{Read, Write};

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error decoding pixel data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum DecodeError {
    /// A custom error when decoding fails
    #[snafu(display("Error decoding pixel data: {}", message))]
    CustomDecode { message: String, source: BoxedError },

    /// A required attribute is missing from the DICOM object
    #[snafu(display("Missing required attribute: {}", name))]
    MissingAttribute { name: &'static str },

    /// The pixel data is not encapsulated in the expected way
    #[snafu(display("Pixel data is not encapsulated"))]
    NotEncapsulated,

    /// Non-conformant pixel data in strict mode
    #[snafu(display("Non-conformant pixel data"))]
    NonConformantPixels { source: NonConformantError },
}

/// An error encoding pixel data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum EncodeError {
    /// A custom error when encoding fails
    #[snafu(display("Error encoding pixel data: {}", message))]
    CustomEncode { message: String, source: BoxedError },

    /// A required attribute is missing from the DICOM object
    #[snafu(display("Missing required attribute: {}", name))]
    MissingEncodeAttribute { name: &'static str },

    /// The pixel data is not in native form
    #[snafu(display("Pixel data is not native"))]
    NotNative,

    /// The adapter does not encode
    #[snafu(display("Encoding is not implemented"))]
    NotImplemented,
}

pub type DecodeResult<T, E = DecodeError> = Result<T, E>;

pub type EncodeResult<T, E = EncodeError> = Result<T, E>;

/// The pixel data of an object, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPixelData {
    /// Either a single buffer if native pixel data
    /// or byte fragments if encapsulated
    pub fragments: C<Vec<u8>>,

    /// The offset table for the fragments,
    /// or empty if there is none
    pub offset_table: C<u32>,

    /// Whether the pixel data is encapsulated
    pub encapsulated: bool,
}

/// A DICOM object trait to be interpreted as pixel data.
///
/// It is defined in this crate so that
/// transfer syntax implementers only have to depend on the encoding crate.
pub trait PixelDataObject {
    /// The UID of the transfer syntax the object is encoded in
    fn transfer_syntax_uid(&self) -> &str;

    /// Return the Rows attribute or None if it is not found
    fn rows(&self) -> Option<u16>;

    /// Return the Columns attribute or None if it is not found
    fn cols(&self) -> Option<u16>;

    /// Return the SamplesPerPixel attribute or None if it is not found
    fn samples_per_pixel(&self) -> Option<u16>;

    /// Return the BitsAllocated attribute or None if it is not set
    fn bits_allocated(&self) -> Option<u16>;

    /// Return the NumberOfFrames attribute or None if it is not set
    fn number_of_frames(&self) -> Option<u32>;

    /// Return the PlanarConfiguration attribute or None if it is not set
    fn planar_configuration(&self) -> Option<u16>;

    /// Should return either a single buffer if native pixel data
    /// or byte fragments if encapsulated.
    /// Returns None if no pixel data is found
    fn raw_pixel_data(&self) -> Option<RawPixelData>;
}

/// A DICOM object whose pixel data can be replaced.
pub trait PixelDataObjectMut: PixelDataObject {
    /// Replace the pixel data with native pixel data.
    fn set_native_pixel_data(&mut self, data: Vec<u8>, vr: VR);

    /// Replace the pixel data with encapsulated fragments
    /// of undefined length.
    fn set_encapsulated_pixel_data(&mut self, offset_table: C<u32>, fragments: C<Vec<u8>>);

    /// Record the transfer syntax which the pixel data now follows.
    fn set_transfer_syntax(&mut self, uid: &str);

    /// Set the PlanarConfiguration attribute.
    fn set_planar_configuration(&mut self, value: u16);
}

/// Decoding and encoding of encapsulated pixel data
/// for a specific transfer syntax.
pub trait PixelDataAdapter: Send + Sync {
    /// Decode all frames of the object into native pixel data,
    /// appended to `dst`.
    fn decode(
        &self,
        src: &dyn PixelDataObject,
        dst: &mut Vec<u8>,
        diagnostics: &mut Diagnostics,
    ) -> DecodeResult<()>;

    /// Encode one frame of the native pixel data in `src`,
    /// appending the encoded frame to `dst`.
    ///
    /// Implementers may choose not to support image encoding
    /// by leaving the default method implementation.
    #[allow(unused_variables)]
    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: u32,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        NotImplementedSnafu.fail()
    }
}

/// Transformation of the byte stream of a whole data set,
/// as in the deflated transfer syntax.
pub trait DatasetAdapter: Send + Sync {
    /// Read the remainder of `src` and restore the plain data set bytes.
    fn decode_dataset(&self, src: &mut dyn Read) -> std::io::Result<Vec<u8>>;

    /// Write the plain data set bytes in `data` to `dst` in adapted form.
    fn encode_dataset(&self, data: &[u8], dst: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub;

    impl PixelDataAdapter for Stub {
        fn decode(
            &self,
            _src: &dyn PixelDataObject,
            dst: &mut Vec<u8>,
            _diagnostics: &mut Diagnostics,
        ) -> DecodeResult<()> {
            dst.push(0);
            Ok(())
        }
    }

    struct Image;

    impl PixelDataObject for Image {
        fn transfer_syntax_uid(&self) -> &str {
            "1.2.840.10008.1.2.5"
        }
        fn rows(&self) -> Option<u16> {
            Some(1)
        }
        fn cols(&self) -> Option<u16> {
            Some(1)
        }
        fn samples_per_pixel(&self) -> Option<u16> {
            Some(1)
        }
        fn bits_allocated(&self) -> Option<u16> {
            Some(8)
        }
        fn number_of_frames(&self) -> Option<u32> {
            None
        }
        fn planar_configuration(&self) -> Option<u16> {
            None
        }
        fn raw_pixel_data(&self) -> Option<RawPixelData> {
            None
        }
    }

    #[test]
    fn encoding_is_optional() {
        let mut out = Vec::new();
        assert!(matches!(
            Stub.encode_frame(&Image, 0, &mut out),
            Err(EncodeError::NotImplemented)
        ));
        let mut diagnostics = Diagnostics::default();
        Stub.decode(&Image, &mut out, &mut diagnostics).unwrap();
        assert_eq!(out, vec![0]);
    }
}
