//! Conversion of whole objects between native pixel data and RLE Lossless.
use crate::adapter::{ImageParams, RleLosslessAdapter};
use crate::rle::{self, SegmentOrder};
use dcmcodec_core::diagnostic::Diagnostics;
use dcmcodec_core::value::C;
use dcmcodec_core::VR;
use dcmcodec_dictionary_std::uids;
use dcmcodec_encoding::adapters::{PixelDataAdapter, PixelDataObjectMut};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub struct Error(InnerError);

/// An error occurred while converting the pixel data of an object.
#[derive(Debug, Snafu)]
pub(crate) enum InnerError {
    /// Object is in transfer syntax {uid}, not RLE Lossless
    NotRleLossless { uid: String },

    /// Missing required attribute {name}
    MissingAttribute { name: &'static str },

    /// Object has no native pixel data
    NoNativePixelData,

    /// Native pixel data has {actual} bytes, but {expected} were expected
    PixelDataLength { actual: usize, expected: usize },

    /// Could not encode frame
    EncodeFrame { source: rle::Error },

    /// Could not decode pixel data
    DecodePixelData {
        source: dcmcodec_encoding::adapters::DecodeError,
    },
}

/// Alias for the result of converting pixel data.
pub type Result<T, E = Error> = std::result::Result<T, E>;

fn encode_frames(frames: Vec<&[u8]>, params: &ImageParams, planar: u16) -> Result<Vec<Vec<u8>>> {
    let encode = |frame: &[u8]| {
        rle::rle_encode_frame(
            frame,
            params.rows,
            params.columns,
            params.samples_per_pixel,
            params.bits_allocated,
            planar,
        )
        .context(EncodeFrameSnafu)
    };
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        frames
            .into_par_iter()
            .map(encode)
            .collect::<Result<Vec<_>, InnerError>>()
            .map_err(Error)
    }
    #[cfg(not(feature = "rayon"))]
    {
        frames
            .into_iter()
            .map(encode)
            .collect::<Result<Vec<_>, InnerError>>()
            .map_err(Error)
    }
}

/// Compress the native pixel data of an object with RLE Lossless.
///
/// Every frame becomes one fragment,
/// stored as pixel data of undefined length with an empty Basic Offset Table.
/// The object's transfer syntax is set to RLE Lossless.
pub fn compress_rle<O>(obj: &mut O) -> Result<()>
where
    O: PixelDataObjectMut,
{
    let params = ImageParams::of(&*obj).map_err(|name| Error(InnerError::MissingAttribute { name }))?;
    let raw = obj.raw_pixel_data().context(NoNativePixelDataSnafu)?;
    ensure!(!raw.encapsulated, NoNativePixelDataSnafu);
    let data = raw.fragments.first().context(NoNativePixelDataSnafu)?;

    let frame_size = params.frame_size();
    let expected = frame_size * params.frames as usize;
    ensure!(
        data.len() >= expected,
        PixelDataLengthSnafu {
            actual: data.len(),
            expected,
        }
    );
    let frames: Vec<&[u8]> = if frame_size == 0 {
        Vec::new()
    } else {
        data[..expected].chunks(frame_size).collect()
    };
    let planar = obj.planar_configuration().unwrap_or(0);
    let fragments = encode_frames(frames, &params, planar)?;

    tracing::debug!("Compressed {} frames with RLE Lossless", fragments.len());
    obj.set_encapsulated_pixel_data(C::new(), C::from_vec(fragments));
    obj.set_transfer_syntax(uids::RLE_LOSSLESS);
    Ok(())
}

/// Restore native pixel data from RLE Lossless,
/// with the given segment order.
///
/// The object's transfer syntax becomes Explicit VR Little Endian,
/// and _Planar Configuration_ is set to 1 for multi-sample images.
pub fn decompress_rle<O>(
    obj: &mut O,
    order: SegmentOrder,
    diagnostics: &mut Diagnostics,
) -> Result<()>
where
    O: PixelDataObjectMut,
{
    let uid = obj.transfer_syntax_uid().trim_end_matches(|c| c == '\0' || c == ' ');
    ensure!(
        uid == uids::RLE_LOSSLESS,
        NotRleLosslessSnafu {
            uid: uid.to_string()
        }
    );
    let params = ImageParams::of(&*obj).map_err(|name| Error(InnerError::MissingAttribute { name }))?;

    let mut native = Vec::new();
    RleLosslessAdapter::with_order(order)
        .decode(&*obj, &mut native, diagnostics)
        .context(DecodePixelDataSnafu)?;

    let vr = if params.bits_allocated > 8 { VR::OW } else { VR::OB };
    obj.set_native_pixel_data(native, vr);
    obj.set_transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    if params.samples_per_pixel > 1 {
        obj.set_planar_configuration(1);
    }
    Ok(())
}
