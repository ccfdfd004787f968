//! Pixel data adapter for the RLE Lossless transfer syntax.
use crate::encapsulation;
use crate::rle::{self, SegmentOrder};
use dcmcodec_core::diagnostic::Diagnostics;
use dcmcodec_core::value::PixelFragmentSequence;
use dcmcodec_encoding::adapters::{
    DecodeError, DecodeResult, EncodeError, EncodeResult, NotEncapsulatedSnafu, NotNativeSnafu,
    PixelDataAdapter, PixelDataObject,
};
use snafu::{ensure, OptionExt};

/// The image attributes needed to process the pixel data of an object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ImageParams {
    pub rows: u16,
    pub columns: u16,
    pub samples_per_pixel: u16,
    pub bits_allocated: u16,
    pub frames: u32,
}

impl ImageParams {
    /// Collect the attributes,
    /// or name the first one missing.
    pub fn of(src: &(impl PixelDataObject + ?Sized)) -> Result<Self, &'static str> {
        Ok(ImageParams {
            rows: src.rows().ok_or("Rows")?,
            columns: src.cols().ok_or("Columns")?,
            samples_per_pixel: src.samples_per_pixel().ok_or("SamplesPerPixel")?,
            bits_allocated: src.bits_allocated().ok_or("BitsAllocated")?,
            frames: src.number_of_frames().unwrap_or(1),
        })
    }

    /// The size in bytes of one native frame.
    pub fn frame_size(&self) -> usize {
        usize::from(self.rows)
            * usize::from(self.columns)
            * usize::from(self.samples_per_pixel)
            * usize::from(self.bits_allocated / 8)
    }
}

fn decode_failed(message: &str, e: impl std::error::Error + Send + Sync + 'static) -> DecodeError {
    DecodeError::CustomDecode {
        message: message.to_string(),
        source: Box::new(e),
    }
}

fn encode_failed(message: &str, e: impl std::error::Error + Send + Sync + 'static) -> EncodeError {
    EncodeError::CustomEncode {
        message: message.to_string(),
        source: Box::new(e),
    }
}

/// Pixel data adapter for RLE Lossless (UID `1.2.840.10008.1.2.5`).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RleLosslessAdapter {
    order: SegmentOrder,
}

impl RleLosslessAdapter {
    /// An adapter for conformant data, most significant byte segments first.
    pub const fn new() -> Self {
        RleLosslessAdapter {
            order: SegmentOrder::MsbFirst,
        }
    }

    /// An adapter expecting the given segment order when decoding.
    pub const fn with_order(order: SegmentOrder) -> Self {
        RleLosslessAdapter { order }
    }
}

impl PixelDataAdapter for RleLosslessAdapter {
    /// Decode all frames into native pixel data,
    /// in planar configuration 1.
    fn decode(
        &self,
        src: &dyn PixelDataObject,
        dst: &mut Vec<u8>,
        diagnostics: &mut Diagnostics,
    ) -> DecodeResult<()> {
        let params =
            ImageParams::of(src).map_err(|name| DecodeError::MissingAttribute { name })?;
        let raw = src.raw_pixel_data().context(NotEncapsulatedSnafu)?;
        ensure!(raw.encapsulated, NotEncapsulatedSnafu);

        let sequence = PixelFragmentSequence::new(raw.offset_table, raw.fragments);
        let frames = encapsulation::sequence_frames(&sequence, Some(params.frames), diagnostics)
            .map_err(|e| decode_failed("Could not split RLE frames", e))?;

        dst.reserve(params.frame_size() * frames.len());
        for frame in frames {
            let decoded = rle::rle_decode_frame(
                &frame,
                params.rows,
                params.columns,
                params.samples_per_pixel,
                params.bits_allocated,
                self.order,
                diagnostics,
            )
            .map_err(|e| decode_failed("Could not decode RLE frame", e))?;
            dst.extend(decoded);
        }
        Ok(())
    }

    fn encode_frame(
        &self,
        src: &dyn PixelDataObject,
        frame: u32,
        dst: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        let params =
            ImageParams::of(src).map_err(|name| EncodeError::MissingEncodeAttribute { name })?;
        let raw = src.raw_pixel_data().context(NotNativeSnafu)?;
        ensure!(!raw.encapsulated, NotNativeSnafu);
        let data = raw.fragments.first().context(NotNativeSnafu)?;

        let frame_size = params.frame_size();
        let start = frame as usize * frame_size;
        let native = data
            .get(start..start + frame_size)
            .context(NotNativeSnafu)?;
        let encoded = rle::rle_encode_frame(
            native,
            params.rows,
            params.columns,
            params.samples_per_pixel,
            params.bits_allocated,
            src.planar_configuration().unwrap_or(0),
        )
        .map_err(|e| encode_failed("Could not encode RLE frame", e))?;
        dst.extend(encoded);
        Ok(())
    }
}
