//! Conversion of raw element values from and into primitive values,
//! one rule per value representation.
//!
//! - Binary numbers (US, SS, UL, SL, FL, FD, OF, OD, OL, OV, SV, UV)
//!   are reinterpreted in the byte order of the data set.
//! - OB and UN stay raw bytes. OW stays raw bytes in little endian,
//!   so big endian words are swapped on the way in and out.
//! - AT values are pairs of 16-bit numbers.
//! - DS and IS are decoded into numbers,
//!   with the original text kept when parsing fails.
//! - DA, TM and DT become date and time values when enabled.
//! - All other text is split on backslashes
//!   (except for LT, ST, UT and UR),
//!   and decoded with the active character sets.
//!
//! Encoded values always have an even length,
//! padded with the representation's padding byte.

use crate::text::{CharacterSets, DecodeTextError, EncodeTextError, SpecificCharacterSet};
use crate::text::{PN_DELIMITERS, TEXT_DELIMITERS};
use byteordered::{ByteOrdered, Endianness};
use dcmcodec_core::diagnostic::{ConformanceWarning, Diagnostics, NonConformantError, WarningKind};
use dcmcodec_core::value::{ConvertValueError, DicomDate, DicomDateTime, DicomTime, C};
use dcmcodec_core::{CodecConfig, PrimitiveValue, Tag, VR};
use itertools::Itertools;
use smallvec::smallvec;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};

mod validate;

pub use self::validate::{validate_value, ValueViolation};

/// An error converting a value.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not read binary numbers
    #[snafu(display("Could not read {} values", vr))]
    ReadNumbers {
        vr: VR,
        source: std::io::Error,
        backtrace: Backtrace,
    },
    /// Could not write binary numbers
    #[snafu(display("Could not write {} values", vr))]
    WriteNumbers {
        vr: VR,
        source: std::io::Error,
        backtrace: Backtrace,
    },
    /// Could not decode text
    #[snafu(display("Could not decode {} text", vr))]
    DecodeText { vr: VR, source: DecodeTextError },
    /// Could not encode text
    #[snafu(display("Could not encode {} text", vr))]
    EncodeText { vr: VR, source: EncodeTextError },
    /// The value is not conformant and validation is strict
    #[snafu(display("Non-conformant {} value", vr))]
    NonConformant { vr: VR, source: NonConformantError },
    /// The value held cannot be represented in the VR
    #[snafu(display("Value cannot be encoded as {}", vr))]
    IncompatibleValue {
        vr: VR,
        source: ConvertValueError,
    },
    /// The number cannot be written as a decimal string
    #[snafu(display("Cannot write {} as a decimal string", value))]
    FormatDecimal { value: f64, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The data set state which value conversion depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertContext {
    /// the byte order of binary values
    pub endianness: Endianness,
    /// the character sets of the data set
    pub charsets: CharacterSets,
    /// whether DA, TM and DT are decoded into date and time values
    pub datetime_conversion: bool,
    /// whether DS and IS are decoded into numbers
    pub numeric_text_conversion: bool,
}

impl Default for ConvertContext {
    fn default() -> Self {
        ConvertContext::new(Endianness::Little)
    }
}

impl ConvertContext {
    /// A context with the default character set
    /// and the default conversion settings.
    pub fn new(endianness: Endianness) -> Self {
        ConvertContext::from_config(endianness, &CodecConfig::default())
    }

    /// A context with the conversion settings of a codec configuration.
    pub fn from_config(endianness: Endianness, config: &CodecConfig) -> Self {
        ConvertContext {
            endianness,
            charsets: CharacterSets::default(),
            datetime_conversion: config.datetime_conversion,
            numeric_text_conversion: config.numeric_text_conversion,
        }
    }

    /// Replace the character sets.
    pub fn with_charsets(mut self, charsets: CharacterSets) -> Self {
        self.charsets = charsets;
        self
    }
}

macro_rules! read_numbers {
    ($vr: expr, $bytes: expr, $endianness: expr, $t: ty, $read: ident, $variant: ident) => {{
        let width = std::mem::size_of::<$t>();
        let mut out: C<$t> = smallvec![<$t>::default(); $bytes.len() / width];
        ByteOrdered::runtime(&$bytes[..out.len() * width], $endianness)
            .$read(&mut out)
            .context(ReadNumbersSnafu { vr: $vr })?;
        PrimitiveValue::$variant(out)
    }};
}

/// Decode the raw bytes of a primitive value.
///
/// Recoverable problems, such as a length which is not a multiple
/// of the value width or numbers which do not parse,
/// are reported to `diagnostics`.
pub fn decode_value(
    vr: VR,
    bytes: &[u8],
    ctx: &ConvertContext,
    diagnostics: &mut Diagnostics,
) -> Result<PrimitiveValue> {
    if bytes.is_empty() {
        return Ok(PrimitiveValue::Empty);
    }

    if let Some(width) = vr.binary_width() {
        if bytes.len() % width != 0 {
            diagnostics
                .report(ConformanceWarning::new(
                    WarningKind::InvalidValue,
                    format!(
                        "{} value length {} is not a multiple of {}, ignoring trailing bytes",
                        vr,
                        bytes.len(),
                        width
                    ),
                ))
                .context(NonConformantSnafu { vr })?;
        }
    }

    let e = ctx.endianness;
    let value = match vr {
        VR::OB | VR::UN | VR::SQ => PrimitiveValue::U8(C::from_slice(bytes)),
        VR::OW => {
            let mut data = bytes[..bytes.len() & !1].to_vec();
            if e == Endianness::Big {
                swap_words(&mut data);
            }
            PrimitiveValue::U8(C::from_vec(data))
        }
        VR::US => read_numbers!(vr, bytes, e, u16, read_u16_into, U16),
        VR::SS => read_numbers!(vr, bytes, e, i16, read_i16_into, I16),
        VR::UL | VR::OL => read_numbers!(vr, bytes, e, u32, read_u32_into, U32),
        VR::SL => read_numbers!(vr, bytes, e, i32, read_i32_into, I32),
        VR::FL | VR::OF => read_numbers!(vr, bytes, e, f32, read_f32_into, F32),
        VR::FD | VR::OD => read_numbers!(vr, bytes, e, f64, read_f64_into, F64),
        VR::SV => read_numbers!(vr, bytes, e, i64, read_i64_into, I64),
        VR::UV | VR::OV => read_numbers!(vr, bytes, e, u64, read_u64_into, U64),
        VR::AT => {
            let mut parts: C<u16> = smallvec![0; bytes.len() / 4 * 2];
            ByteOrdered::runtime(&bytes[..parts.len() * 2], e)
                .read_u16_into(&mut parts)
                .context(ReadNumbersSnafu { vr })?;
            PrimitiveValue::Tags(parts.chunks_exact(2).map(|p| Tag(p[0], p[1])).collect())
        }
        vr if vr.is_single_valued_text() => {
            let text = decode_text(vr, bytes, ctx, diagnostics)?;
            PrimitiveValue::Str(text.trim_end_matches([' ', '\0']).to_string())
        }
        _ => {
            let values = decode_strings(vr, bytes, ctx, diagnostics)?;
            match vr {
                VR::DS | VR::IS if ctx.numeric_text_conversion => {
                    decode_numeric_text(vr, values, diagnostics)?
                }
                VR::DA | VR::TM | VR::DT if ctx.datetime_conversion => {
                    decode_datetime(vr, values, diagnostics)?
                }
                _ => PrimitiveValue::Strs(values),
            }
        }
    };
    Ok(value)
}

fn decode_text(
    vr: VR,
    bytes: &[u8],
    ctx: &ConvertContext,
    diagnostics: &mut Diagnostics,
) -> Result<String> {
    if vr.uses_character_set() {
        let delimiters = if vr == VR::PN {
            PN_DELIMITERS
        } else {
            TEXT_DELIMITERS
        };
        ctx.charsets
            .decode(bytes, delimiters, diagnostics)
            .context(DecodeTextSnafu { vr })
    } else {
        Ok(SpecificCharacterSet::Default.decode_lossy(bytes))
    }
}

/// Split a multi-valued text value and decode each value.
fn decode_strings(
    vr: VR,
    bytes: &[u8],
    ctx: &ConvertContext,
    diagnostics: &mut Diagnostics,
) -> Result<C<String>> {
    let trim_start = matches!(vr, VR::AE | VR::AS | VR::CS | VR::DS | VR::IS | VR::UI);
    bytes
        .split(|b| *b == b'\\')
        .map(|part| {
            let text = decode_text(vr, part, ctx, diagnostics)?;
            let text = text.trim_end_matches([' ', '\0']);
            let text = if trim_start { text.trim_start() } else { text };
            Ok(text.to_string())
        })
        .collect()
}

fn decode_numeric_text(
    vr: VR,
    values: C<String>,
    diagnostics: &mut Diagnostics,
) -> Result<PrimitiveValue> {
    if values.iter().all(|v| v.is_empty()) {
        return Ok(PrimitiveValue::Empty);
    }

    let parsed = if vr == VR::IS {
        values
            .iter()
            .map(|v| parse_is(v))
            .collect::<Option<C<i64>>>()
            .map(PrimitiveValue::I64)
    } else {
        values
            .iter()
            .map(|v| parse_ds(v))
            .collect::<Option<C<f64>>>()
            .map(PrimitiveValue::F64)
    };

    match parsed {
        Some(value) => Ok(value),
        None => {
            diagnostics
                .report(ConformanceWarning::new(
                    WarningKind::InvalidNumericText,
                    format!(
                        "Invalid {} value \"{}\", keeping the original text",
                        vr,
                        values.iter().join("\\")
                    ),
                ))
                .context(NonConformantSnafu { vr })?;
            Ok(PrimitiveValue::Strs(values))
        }
    }
}

/// Parse an integer string, also admitting a float with no fraction.
fn parse_is(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix('+').unwrap_or(text);
    if let Ok(v) = digits.parse::<i64>() {
        return Some(v);
    }
    let v = parse_ds(text)?;
    if v.fract() == 0. && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_ds(text: &str) -> Option<f64> {
    let text = text.trim();
    let v = text.parse::<f64>().ok()?;
    // "inf" and "NaN" are accepted by Rust, but not by DICOM
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

fn decode_datetime(
    vr: VR,
    values: C<String>,
    diagnostics: &mut Diagnostics,
) -> Result<PrimitiveValue> {
    let parsed = match vr {
        VR::DA => values
            .iter()
            .map(|v| DicomDate::parse(v))
            .collect::<Result<C<_>, _>>()
            .map(PrimitiveValue::Date),
        VR::TM => values
            .iter()
            .map(|v| DicomTime::parse(v))
            .collect::<Result<C<_>, _>>()
            .map(PrimitiveValue::Time),
        _ => values
            .iter()
            .map(|v| DicomDateTime::parse(v))
            .collect::<Result<C<_>, _>>()
            .map(PrimitiveValue::DateTime),
    };

    match parsed {
        Ok(value) => Ok(value),
        Err(e) => {
            diagnostics
                .report(ConformanceWarning::new(
                    WarningKind::InvalidDateTime,
                    format!("Invalid {} value: {}, keeping the original text", vr, e),
                ))
                .context(NonConformantSnafu { vr })?;
            Ok(PrimitiveValue::Strs(values))
        }
    }
}

/// Swap the bytes of each 16-bit word in place.
pub fn swap_words(data: &mut [u8]) {
    for word in data.chunks_exact_mut(2) {
        word.swap(0, 1);
    }
}

macro_rules! write_numbers {
    ($vr: expr, $out: expr, $endianness: expr, $values: expr, $write: ident) => {{
        let mut writer = ByteOrdered::runtime(&mut $out, $endianness);
        for v in $values {
            writer.$write(v).context(WriteNumbersSnafu { vr: $vr })?;
        }
    }};
}

/// Encode a primitive value into its raw bytes,
/// padded to an even length.
///
/// The value is validated against the rules of its representation first,
/// reporting any violation to `diagnostics`.
pub fn encode_value(
    vr: VR,
    value: &PrimitiveValue,
    ctx: &ConvertContext,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<u8>> {
    for violation in validate_value(vr, value) {
        diagnostics
            .report(ConformanceWarning::new(WarningKind::InvalidValue, violation.to_string()))
            .context(NonConformantSnafu { vr })?;
    }

    let e = ctx.endianness;
    let mut out: Vec<u8> = Vec::with_capacity(value.calculate_byte_len());
    match (vr, value) {
        (_, PrimitiveValue::Empty) => {}
        (VR::OB | VR::UN | VR::SQ, value) => out.extend_from_slice(&value.to_bytes()),
        (VR::OW, PrimitiveValue::U16(words)) => {
            write_numbers!(vr, out, e, words.iter().copied(), write_u16)
        }
        (VR::OW, value) => {
            out.extend_from_slice(&value.to_bytes());
            if e == Endianness::Big {
                swap_words(&mut out);
            }
        }
        (VR::US, value) => write_numbers!(vr, out, e, ints::<u16>(vr, value)?, write_u16),
        (VR::SS, value) => write_numbers!(vr, out, e, ints::<i16>(vr, value)?, write_i16),
        (VR::UL | VR::OL, value) => {
            write_numbers!(vr, out, e, ints::<u32>(vr, value)?, write_u32)
        }
        (VR::SL, value) => write_numbers!(vr, out, e, ints::<i32>(vr, value)?, write_i32),
        (VR::SV, value) => write_numbers!(vr, out, e, ints::<i64>(vr, value)?, write_i64),
        (VR::UV | VR::OV, value) => {
            write_numbers!(vr, out, e, ints::<u64>(vr, value)?, write_u64)
        }
        (VR::FL | VR::OF, PrimitiveValue::F32(values)) => {
            write_numbers!(vr, out, e, values.iter().copied(), write_f32)
        }
        (VR::FL | VR::OF, value) => write_numbers!(
            vr,
            out,
            e,
            floats(vr, value)?.into_iter().map(|v| v as f32),
            write_f32
        ),
        (VR::FD | VR::OD, value) => write_numbers!(vr, out, e, floats(vr, value)?, write_f64),
        (VR::AT, value) => {
            let tags = value.to_tags().context(IncompatibleValueSnafu { vr })?;
            write_numbers!(
                vr,
                out,
                e,
                tags.iter().flat_map(|t| [t.group(), t.element()]),
                write_u16
            )
        }
        (vr, value) => {
            let text = text_of(vr, value)?;
            out = encode_text(vr, &text, ctx, diagnostics)?;
        }
    }

    if out.len() % 2 == 1 {
        out.push(vr.padding());
    }
    Ok(out)
}

fn ints<T>(vr: VR, value: &PrimitiveValue) -> Result<Vec<T>>
where
    T: num_traits::NumCast + std::str::FromStr<Err = std::num::ParseIntError>,
{
    value.to_multi_int::<T>().context(IncompatibleValueSnafu { vr })
}

fn floats(vr: VR, value: &PrimitiveValue) -> Result<Vec<f64>> {
    value.to_multi_float64().context(IncompatibleValueSnafu { vr })
}

/// The textual form of a value, values joined by backslashes.
fn text_of(vr: VR, value: &PrimitiveValue) -> Result<String> {
    let text = match value {
        PrimitiveValue::Str(s) => s.clone(),
        PrimitiveValue::Strs(values) => values.iter().join("\\"),
        PrimitiveValue::F64(values) if vr == VR::DS => values
            .iter()
            .map(|v| format_ds(*v).context(FormatDecimalSnafu { value: *v }))
            .collect::<Result<Vec<_>>>()?
            .join("\\"),
        PrimitiveValue::F32(values) if vr == VR::DS => values
            .iter()
            .map(|v| format_ds(f64::from(*v)).context(FormatDecimalSnafu { value: f64::from(*v) }))
            .collect::<Result<Vec<_>>>()?
            .join("\\"),
        other => other.to_str().into_owned(),
    };
    Ok(text)
}

fn encode_text(
    vr: VR,
    text: &str,
    ctx: &ConvertContext,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<u8>> {
    if vr.uses_character_set() {
        let delimiters = if vr == VR::PN {
            PN_DELIMITERS
        } else {
            TEXT_DELIMITERS
        };
        ctx.charsets
            .encode(text, delimiters, diagnostics)
            .context(EncodeTextSnafu { vr })
    } else {
        CharacterSets::default()
            .encode(text, TEXT_DELIMITERS, diagnostics)
            .context(EncodeTextSnafu { vr })
    }
}

/// Format a number as a decimal string (DS) of at most 16 characters,
/// keeping as much precision as fits.
///
/// Returns `None` for infinite and NaN values.
///
/// ```
/// # use dcmcodec_encoding::convert::format_ds;
/// assert_eq!(format_ds(1.5).as_deref(), Some("1.5"));
/// assert_eq!(format_ds(std::f64::consts::PI).as_deref(), Some("3.14159265358979"));
/// assert_eq!(format_ds(1e20).as_deref(), Some("1e20"));
/// ```
pub fn format_ds(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let plain = value.to_string();
    if plain.len() <= 16 {
        return Some(plain);
    }

    let abs = value.abs();
    if (1e-4..1e16).contains(&abs) {
        for precision in (0..=16).rev() {
            let text = trim_fraction(&format!("{:.*}", precision, value));
            if text.len() <= 16 {
                return Some(text);
            }
        }
    }

    for precision in (0..=15).rev() {
        let text = format!("{:.*e}", precision, value);
        let text = match text.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_fraction(mantissa), exponent),
            None => text,
        };
        if text.len() <= 16 {
            return Some(text);
        }
    }
    None
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::dicom_value;
    use dcmcodec_core::ValidationMode;

    fn lenient() -> Diagnostics {
        Diagnostics::new(ValidationMode::Warn)
    }

    #[test]
    fn decode_binary_numbers() {
        let ctx = ConvertContext::new(Endianness::Little);
        let mut diag = lenient();
        let value = decode_value(VR::US, &[0x00, 0x02, 0x01, 0x00], &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(U16, [512, 1]));

        let value = decode_value(VR::FD, &1.5_f64.to_le_bytes(), &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(F64, [1.5]));

        let be = ConvertContext::new(Endianness::Big);
        let value = decode_value(VR::SL, &[0xFF, 0xFF, 0xFF, 0xFE], &be, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(I32, [-2]));
        assert!(diag.is_empty());
    }

    #[test]
    fn trailing_partial_number_is_dropped() {
        let ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(VR::US, &[0x01, 0x00, 0x02], &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(U16, [1]));
        assert_eq!(diag.warnings()[0].kind, WarningKind::InvalidValue);
    }

    #[test]
    fn other_word_is_swapped_on_big_endian() {
        let be = ConvertContext::new(Endianness::Big);
        let mut diag = lenient();
        let value = decode_value(VR::OW, &[0x12, 0x34, 0x56, 0x78], &be, &mut diag).unwrap();
        assert_eq!(value, PrimitiveValue::from(vec![0x34_u8, 0x12, 0x78, 0x56]));
        let bytes = encode_value(VR::OW, &value, &be, &mut diag).unwrap();
        assert_eq!(bytes, vec![0x12, 0x34, 0x56, 0x78]);

        let le = ConvertContext::new(Endianness::Little);
        let value = decode_value(VR::OW, &[0x12, 0x34], &le, &mut diag).unwrap();
        assert_eq!(value, PrimitiveValue::from(vec![0x12_u8, 0x34]));
    }

    #[test]
    fn decode_attribute_tags() {
        let ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(
            VR::AT,
            &[0x10, 0x00, 0x10, 0x00, 0xE0, 0x7F, 0x10, 0x00],
            &ctx,
            &mut diag,
        )
        .unwrap();
        assert_eq!(
            value,
            PrimitiveValue::Tags(smallvec![Tag(0x0010, 0x0010), Tag(0x7FE0, 0x0010)])
        );
    }

    #[test]
    fn decode_multi_valued_text() {
        let ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(VR::CS, b"ORIGINAL\\PRIMARY ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["ORIGINAL", "PRIMARY"]));

        let value = decode_value(VR::UI, b"1.2.840.10008.1.2\0", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["1.2.840.10008.1.2"]));

        // backslashes are regular characters in LT
        let value = decode_value(VR::LT, b"C:\\dir\\file ", &ctx, &mut diag).unwrap();
        assert_eq!(value, PrimitiveValue::Str("C:\\dir\\file".to_string()));
    }

    #[test]
    fn decode_numeric_text() {
        let ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(VR::DS, b" 1.5\\-2e3 ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(F64, [1.5, -2000.]));
        let value = decode_value(VR::IS, b"+12\\3.0 ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(I64, [12, 3]));
        assert!(diag.is_empty());
    }

    #[test]
    fn invalid_numeric_text_is_kept() {
        let ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(VR::IS, b"12\\abc ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["12", "abc"]));
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::InvalidNumericText);

        let mut strict = Diagnostics::new(ValidationMode::Strict);
        assert!(decode_value(VR::IS, b"12\\abc ", &ctx, &mut strict).is_err());

        let mut ctx = ConvertContext::default();
        ctx.numeric_text_conversion = false;
        let value = decode_value(VR::DS, b"1.5 ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["1.5"]));
    }

    #[test]
    fn datetime_conversion_is_optional() {
        let mut ctx = ConvertContext::default();
        let mut diag = lenient();
        let value = decode_value(VR::DA, b"20240131", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["20240131"]));

        ctx.datetime_conversion = true;
        let value = decode_value(VR::DA, b"20240131", &ctx, &mut diag).unwrap();
        let date = value.to_date().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 31));

        let value = decode_value(VR::TM, b"25", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["25"]));
        assert_eq!(diag.warnings()[0].kind, WarningKind::InvalidDateTime);
    }

    #[test]
    fn decode_person_name_with_charsets() {
        let mut setup = lenient();
        let charsets = CharacterSets::from_terms(&["", "ISO 2022 IR 144"], &mut setup).unwrap();
        let ctx = ConvertContext::default().with_charsets(charsets);
        let mut diag = lenient();
        let value = decode_value(
            VR::PN,
            b"Ivan^\x1b-L\xb8\xd2\xd0\xdd\\Smith^John",
            &ctx,
            &mut diag,
        )
        .unwrap();
        assert_eq!(value, dicom_value!(Strs, ["Ivan^Иван", "Smith^John"]));
    }

    #[test]
    fn encode_pads_to_even_length() {
        let ctx = ConvertContext::default();
        let mut diag = Diagnostics::new(ValidationMode::Strict);
        let bytes = encode_value(VR::PN, &"Doe^John".into(), &ctx, &mut diag).unwrap();
        assert_eq!(bytes, b"Doe^John");
        let bytes = encode_value(VR::LO, &"ABC".into(), &ctx, &mut diag).unwrap();
        assert_eq!(bytes, b"ABC ");
        let bytes = encode_value(VR::UI, &"1.2.3".into(), &ctx, &mut diag).unwrap();
        assert_eq!(bytes, b"1.2.3\0");
        let bytes = encode_value(VR::OB, &vec![1_u8, 2, 3].into(), &ctx, &mut diag).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 0]);

        // and decoding drops the padding again
        let value = decode_value(VR::LO, b"ABC ", &ctx, &mut diag).unwrap();
        assert_eq!(value, dicom_value!(Strs, ["ABC"]));
    }

    #[test]
    fn encode_numbers_in_byte_order() {
        let le = ConvertContext::new(Endianness::Little);
        let be = ConvertContext::new(Endianness::Big);
        let mut diag = Diagnostics::new(ValidationMode::Strict);
        let value = dicom_value!(U16, [1, 0x0203]);
        assert_eq!(
            encode_value(VR::US, &value, &le, &mut diag).unwrap(),
            vec![1, 0, 3, 2]
        );
        assert_eq!(
            encode_value(VR::US, &value, &be, &mut diag).unwrap(),
            vec![0, 1, 2, 3]
        );
        let value = PrimitiveValue::Tags(smallvec![Tag(0x0028, 0x0010)]);
        assert_eq!(
            encode_value(VR::AT, &value, &be, &mut diag).unwrap(),
            vec![0x00, 0x28, 0x00, 0x10]
        );
    }

    #[test]
    fn encode_decimal_strings() {
        let ctx = ConvertContext::default();
        let mut diag = Diagnostics::new(ValidationMode::Strict);
        let value = dicom_value!(F64, [0.5, std::f64::consts::PI]);
        let bytes = encode_value(VR::DS, &value, &ctx, &mut diag).unwrap();
        assert_eq!(bytes, b"0.5\\3.14159265358979");
        assert!(encode_value(VR::DS, &dicom_value!(F64, [f64::NAN]), &ctx, &mut diag).is_err());
    }

    #[test]
    fn encode_rejects_invalid_values_in_strict_mode() {
        let ctx = ConvertContext::default();
        let mut strict = Diagnostics::new(ValidationMode::Strict);
        let value = PrimitiveValue::from("lower case");
        assert!(encode_value(VR::CS, &value, &ctx, &mut strict).is_err());

        let mut lenient = lenient();
        let bytes = encode_value(VR::CS, &value, &ctx, &mut lenient).unwrap();
        assert_eq!(bytes, b"lower case");
        assert_eq!(lenient.warnings()[0].kind, WarningKind::InvalidValue);
    }

    #[test]
    fn decimal_string_formatting() {
        assert_eq!(format_ds(0.1 + 0.2).as_deref(), Some("0.3"));
        assert_eq!(format_ds(-1.234e-20).as_deref(), Some("-1.234e-20"));
        assert_eq!(format_ds(123456789012345678.0).as_deref(), Some("1.23456789012e17"));
        assert_eq!(format_ds(f64::INFINITY), None);
        for v in [1.0 / 3.0, 2.0_f64.sqrt() * 1e9, -98765.4321e-3] {
            let text = format_ds(v).unwrap();
            assert!(text.len() <= 16, "{} is too long", text);
        }
    }
}
