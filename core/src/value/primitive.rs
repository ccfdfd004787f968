//! Declaration and implementation of a DICOM primitive value.
//!
//! See [`PrimitiveValue`].

use super::{
    CastValueError, ConvertValueError, DicomDate, DicomDateTime, DicomTime, InvalidValueReadError,
    C,
};
use crate::header::{HasLength, Length, Tag, VR};
use itertools::Itertools;
use num_traits::NumCast;
use snafu::{OptionExt, ResultExt, Snafu};
use std::borrow::Cow;
use std::str::FromStr;

/// An enum representing a primitive value from a DICOM element.
/// The result of decoding an element's data value
/// may be one of the enumerated types
/// depending on its content and value representation.
///
/// Multiple elements are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
///
/// See the macro [`dicom_value!`](crate::dicom_value) for a more intuitive means
/// of constructing these values.
///
/// # Example
///
/// ```
/// # use dcmcodec_core::PrimitiveValue;
/// # use smallvec::smallvec;
/// let value = PrimitiveValue::from("Smith^John");
/// assert_eq!(value, PrimitiveValue::Str("Smith^John".to_string()));
/// assert_eq!(value.multiplicity(), 1);
///
/// let value = PrimitiveValue::from(512_u16);
/// assert_eq!(value, PrimitiveValue::U16(smallvec![512]));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub enum PrimitiveValue {
    /// No data. Usually employed for zero-lengthed values.
    Empty,

    /// A sequence of strings.
    /// Used for AE, AS, PN, SH, CS, LO, UI and UC.
    /// Also used for DS and IS values which failed numeric parsing,
    /// and for DA, TM and DT when date-time conversion is disabled.
    Strs(C<String>),

    /// A single string.
    /// Used for ST, LT, UT and UR, which are never multi-valued.
    Str(String),

    /// A sequence of attribute tags.
    /// Used specifically for AT.
    Tags(C<Tag>),

    /// The value is a sequence of unsigned 8-bit integers.
    /// Used for OB and UN.
    U8(C<u8>),

    /// The value is a sequence of signed 16-bit integers.
    /// Used for SS.
    I16(C<i16>),

    /// A sequence of unsigned 16-bit integers.
    /// Used for US. Decoded OW values are kept as bytes instead.
    U16(C<u16>),

    /// A sequence of signed 32-bit integers.
    /// Used for SL.
    I32(C<i32>),

    /// A sequence of unsigned 32-bit integers.
    /// Used for UL and OL.
    U32(C<u32>),

    /// A sequence of signed 64-bit integers.
    /// Used for SV and IS.
    I64(C<i64>),

    /// A sequence of unsigned 64-bit integers.
    /// Used for UV and OV.
    U64(C<u64>),

    /// The value is a sequence of 32-bit floating point numbers.
    /// Used for OF and FL.
    F32(C<f32>),

    /// The value is a sequence of 64-bit floating point numbers.
    /// Used for OD, FD and DS.
    F64(C<f64>),

    /// A sequence of dates.
    /// Used for the DA representation.
    Date(C<DicomDate>),

    /// A sequence of time values.
    /// Used for the TM representation.
    Time(C<DicomTime>),

    /// A sequence of date-time values.
    /// Used for the DT representation.
    DateTime(C<DicomDateTime>),
}

/// An error modifying a primitive value in place.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ModifyValueError {
    /// The value cannot hold values of the given representation.
    #[snafu(display("Cannot append {} values to a {:?} value", vr, original))]
    IncompatibleTypes { vr: VR, original: ValueType },
    /// The text is not a valid value of the given representation.
    #[snafu(display("`{}` is not a valid {} value", text, vr))]
    InvalidText {
        text: String,
        vr: VR,
        source: InvalidValueReadError,
    },
    /// The text contains the value delimiter.
    #[snafu(display("`{}` contains a value delimiter", text))]
    ContainsDelimiter { text: String },
    /// The representation admits only one value, which is already present.
    #[snafu(display("{} is single-valued", vr))]
    SingleValued { vr: VR },
}

/// A utility macro for implementing the conversion from a core type into a
/// DICOM primitive value with a single element.
macro_rules! impl_from_for_primitive {
    ($typ: ty, $variant: ident) => {
        impl From<$typ> for PrimitiveValue {
            fn from(value: $typ) -> Self {
                PrimitiveValue::$variant(C::from_elem(value, 1))
            }
        }

        impl<const N: usize> From<[$typ; N]> for PrimitiveValue {
            fn from(value: [$typ; N]) -> Self {
                PrimitiveValue::$variant(C::from_iter(value))
            }
        }
    };
}

impl_from_for_primitive!(u8, U8);
impl_from_for_primitive!(u16, U16);
impl_from_for_primitive!(i16, I16);
impl_from_for_primitive!(u32, U32);
impl_from_for_primitive!(i32, I32);
impl_from_for_primitive!(u64, U64);
impl_from_for_primitive!(i64, I64);
impl_from_for_primitive!(f32, F32);
impl_from_for_primitive!(f64, F64);
impl_from_for_primitive!(Tag, Tags);
impl_from_for_primitive!(DicomDate, Date);
impl_from_for_primitive!(DicomTime, Time);
impl_from_for_primitive!(DicomDateTime, DateTime);

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Str(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Str(value.to_owned())
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(value: Vec<u8>) -> Self {
        PrimitiveValue::U8(C::from(value))
    }
}

impl From<&[u8]> for PrimitiveValue {
    fn from(value: &[u8]) -> Self {
        PrimitiveValue::U8(C::from(value))
    }
}

/// Apply an expression to every number in a numeric variant,
/// evaluating to `None` for the other variants.
macro_rules! map_numbers {
    ($value: expr, |$x: ident| $body: expr) => {
        match $value {
            PrimitiveValue::U8(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::I16(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::U16(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::I32(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::U32(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::I64(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::U64(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::F32(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            PrimitiveValue::F64(c) => Some(c.iter().map(|&$x| $body).collect::<Vec<_>>()),
            _ => None,
        }
    };
}

/// Apply an expression to the first number of a numeric variant.
macro_rules! map_first_number {
    ($value: expr, |$x: ident| $body: expr) => {
        match $value {
            PrimitiveValue::U8(c) => c.first().map(|&$x| $body),
            PrimitiveValue::I16(c) => c.first().map(|&$x| $body),
            PrimitiveValue::U16(c) => c.first().map(|&$x| $body),
            PrimitiveValue::I32(c) => c.first().map(|&$x| $body),
            PrimitiveValue::U32(c) => c.first().map(|&$x| $body),
            PrimitiveValue::I64(c) => c.first().map(|&$x| $body),
            PrimitiveValue::U64(c) => c.first().map(|&$x| $body),
            PrimitiveValue::F32(c) => c.first().map(|&$x| $body),
            PrimitiveValue::F64(c) => c.first().map(|&$x| $body),
            _ => None,
        }
    };
}

fn trim_text(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
}

fn parse_int<T>(s: &str) -> Result<T, InvalidValueReadError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    // a leading plus sign is admitted in IS
    s.strip_prefix('+')
        .unwrap_or(s)
        .parse()
        .context(super::ParseIntegerSnafu)
}

fn parse_float<T>(s: &str) -> Result<T, InvalidValueReadError>
where
    T: FromStr<Err = std::num::ParseFloatError>,
{
    s.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .parse()
        .context(super::ParseFloatSnafu)
}

fn narrow<T: NumCast, N: NumCast + ToString + Copy>(n: N) -> Result<T, InvalidValueReadError> {
    T::from(n).context(super::NarrowConvertSnafu {
        value: n.to_string(),
    })
}

impl PrimitiveValue {
    /// Create a single unsigned 16-bit value.
    pub fn new_u16(value: u16) -> Self {
        PrimitiveValue::U16(C::from_elem(value, 1))
    }

    /// Create a single unsigned 32-bit value.
    pub fn new_u32(value: u32) -> Self {
        PrimitiveValue::U32(C::from_elem(value, 1))
    }

    /// Create a sequence of strings.
    pub fn strs<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrimitiveValue::Strs(values.into_iter().map(Into::into).collect())
    }

    /// Obtain the number of individual elements. This number may not
    /// match the DICOM value multiplicity in some value representations.
    pub fn multiplicity(&self) -> u32 {
        use self::PrimitiveValue::*;
        let n = match self {
            Empty => 0,
            Str(_) => 1,
            Strs(c) => c.len(),
            Tags(c) => c.len(),
            U8(c) => c.len(),
            I16(c) => c.len(),
            U16(c) => c.len(),
            I32(c) => c.len(),
            U32(c) => c.len(),
            I64(c) => c.len(),
            U64(c) => c.len(),
            F32(c) => c.len(),
            F64(c) => c.len(),
            Date(c) => c.len(),
            Time(c) => c.len(),
            DateTime(c) => c.len(),
        };
        n as u32
    }

    /// Check whether the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.multiplicity() == 0
    }

    /// Retrieve the specific type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            PrimitiveValue::Empty => ValueType::Empty,
            PrimitiveValue::Strs(_) => ValueType::Strs,
            PrimitiveValue::Str(_) => ValueType::Str,
            PrimitiveValue::Tags(_) => ValueType::Tags,
            PrimitiveValue::U8(_) => ValueType::U8,
            PrimitiveValue::I16(_) => ValueType::I16,
            PrimitiveValue::U16(_) => ValueType::U16,
            PrimitiveValue::I32(_) => ValueType::I32,
            PrimitiveValue::U32(_) => ValueType::U32,
            PrimitiveValue::I64(_) => ValueType::I64,
            PrimitiveValue::U64(_) => ValueType::U64,
            PrimitiveValue::F32(_) => ValueType::F32,
            PrimitiveValue::F64(_) => ValueType::F64,
            PrimitiveValue::Date(_) => ValueType::Date,
            PrimitiveValue::Time(_) => ValueType::Time,
            PrimitiveValue::DateTime(_) => ValueType::DateTime,
        }
    }

    /// Determine the minimum number of bytes that this value would need to
    /// occupy in a DICOM file, without compression and without the header.
    /// As mandated by the standard, it is always even.
    ///
    /// Numbers held in text representations (DS, IS)
    /// are measured in their binary width,
    /// so the encoded length of such values may differ.
    pub fn calculate_byte_len(&self) -> usize {
        use self::PrimitiveValue::*;
        let len = match self {
            Empty => 0,
            U8(c) => c.len(),
            I16(c) => c.len() * 2,
            U16(c) => c.len() * 2,
            U32(c) => c.len() * 4,
            I32(c) => c.len() * 4,
            U64(c) => c.len() * 8,
            I64(c) => c.len() * 8,
            F32(c) => c.len() * 4,
            F64(c) => c.len() * 8,
            Tags(c) => c.len() * 4,
            Str(s) => s.len(),
            Strs(c) => joined_len(c.iter().map(|s| s.len())),
            Date(c) => joined_len(c.iter().map(|v| v.as_str().len())),
            Time(c) => joined_len(c.iter().map(|v| v.as_str().len())),
            DateTime(c) => joined_len(c.iter().map(|v| v.as_str().len())),
        };
        (len + 1) & !1
    }

    /// Convert the primitive value into a string representation.
    ///
    /// String values already encoded with the `Str` and `Strs` variants
    /// are provided as is, without trailing padding.
    /// In the case of `Strs`, the strings are first joined together
    /// with a backslash (`'\\'`).
    /// Date and time values are given in their original text.
    /// All other type variants are first converted to a string,
    /// then joined together with a backslash.
    ///
    /// # Example
    ///
    /// ```
    /// # use dcmcodec_core::dicom_value;
    /// assert_eq!(
    ///     dicom_value!(Strs, ["DERIVED", "PRIMARY "]).to_str(),
    ///     "DERIVED\\PRIMARY",
    /// );
    /// assert_eq!(dicom_value!(U16, [512, 64]).to_str(), "512\\64");
    /// ```
    pub fn to_str(&self) -> Cow<'_, str> {
        match self {
            PrimitiveValue::Empty => Cow::Borrowed(""),
            PrimitiveValue::Str(s) => Cow::Borrowed(trim_text(s)),
            PrimitiveValue::Strs(c) if c.len() == 1 => Cow::Borrowed(trim_text(&c[0])),
            PrimitiveValue::Strs(c) => Cow::Owned(c.iter().map(|s| trim_text(s)).join("\\")),
            PrimitiveValue::Date(c) => Cow::Owned(c.iter().map(|v| v.as_str()).join("\\")),
            PrimitiveValue::Time(c) => Cow::Owned(c.iter().map(|v| v.as_str()).join("\\")),
            PrimitiveValue::DateTime(c) => Cow::Owned(c.iter().map(|v| v.as_str()).join("\\")),
            PrimitiveValue::Tags(c) => Cow::Owned(c.iter().join("\\")),
            other => Cow::Owned(
                map_numbers!(other, |x| x.to_string())
                    .unwrap_or_default()
                    .join("\\"),
            ),
        }
    }

    /// Convert the primitive value into a sequence of strings,
    /// one per individual value.
    pub fn to_multi_str(&self) -> Cow<'_, [String]> {
        match self {
            PrimitiveValue::Empty => Cow::Borrowed(&[]),
            PrimitiveValue::Str(s) => Cow::Borrowed(std::slice::from_ref(s)),
            PrimitiveValue::Strs(c) => Cow::Borrowed(&c[..]),
            PrimitiveValue::Date(c) => Cow::Owned(c.iter().map(|v| v.to_string()).collect()),
            PrimitiveValue::Time(c) => Cow::Owned(c.iter().map(|v| v.to_string()).collect()),
            PrimitiveValue::DateTime(c) => Cow::Owned(c.iter().map(|v| v.to_string()).collect()),
            PrimitiveValue::Tags(c) => Cow::Owned(c.iter().map(|v| v.to_string()).collect()),
            other => Cow::Owned(map_numbers!(other, |x| x.to_string()).unwrap_or_default()),
        }
    }

    /// Retrieve this value as raw bytes.
    ///
    /// Binary numbers are given in little endian.
    /// Text values are given as their UTF-8 bytes, without padding.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            PrimitiveValue::Empty => Cow::Borrowed(&[]),
            PrimitiveValue::U8(c) => Cow::Borrowed(&c[..]),
            PrimitiveValue::Str(s) => Cow::Borrowed(trim_text(s).as_bytes()),
            PrimitiveValue::Tags(c) => Cow::Owned(
                c.iter()
                    .flat_map(|t| {
                        let [a, b] = t.group().to_le_bytes();
                        let [c, d] = t.element().to_le_bytes();
                        [a, b, c, d]
                    })
                    .collect(),
            ),
            PrimitiveValue::I16(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::U16(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::I32(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::U32(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::I64(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::U64(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::F32(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            PrimitiveValue::F64(c) => Cow::Owned(c.iter().flat_map(|x| x.to_le_bytes()).collect()),
            other => match other.to_str() {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        }
    }

    fn convert_error(
        &self,
        requested: &'static str,
        cause: Option<InvalidValueReadError>,
    ) -> ConvertValueError {
        ConvertValueError {
            requested,
            original: self.value_type(),
            cause,
        }
    }

    /// Retrieve a single integer of type `T` from this value.
    ///
    /// If the value is already represented as a number,
    /// it is returned after a conversion to `T`,
    /// failing if the number cannot be represented by `T`.
    /// If the value is a string or sequence of strings,
    /// the first string is parsed to obtain a number.
    ///
    /// # Example
    ///
    /// ```
    /// # use dcmcodec_core::PrimitiveValue;
    /// # use smallvec::smallvec;
    /// assert_eq!(
    ///     PrimitiveValue::I32(smallvec![1, 2, 5]).to_int::<u32>(),
    ///     Ok(1_u32),
    /// );
    /// assert_eq!(PrimitiveValue::from("505 ").to_int::<i32>(), Ok(505));
    /// ```
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        let out = match self {
            PrimitiveValue::Str(s) => Some(parse_int(s)),
            PrimitiveValue::Strs(c) => c.first().map(|s| parse_int(s)),
            other => map_first_number!(other, |x| narrow(x)),
        };
        match out {
            Some(Ok(v)) => Ok(v),
            Some(Err(e)) => Err(self.convert_error("integer", Some(e))),
            None => Err(self.convert_error("integer", None)),
        }
    }

    /// Retrieve all values as integers of type `T`.
    pub fn to_multi_int<T>(&self) -> Result<Vec<T>, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        let out = match self {
            PrimitiveValue::Empty => Some(vec![]),
            PrimitiveValue::Str(s) => Some(s.split('\\').map(parse_int).collect()),
            PrimitiveValue::Strs(c) => Some(c.iter().map(|s| parse_int(s)).collect()),
            other => map_numbers!(other, |x| narrow(x)),
        };
        match out {
            Some(values) => values
                .into_iter()
                .collect::<Result<Vec<T>, _>>()
                .map_err(|e| self.convert_error("integers", Some(e))),
            None => Err(self.convert_error("integers", None)),
        }
    }

    /// Retrieve a single double-precision floating point number
    /// from this value.
    ///
    /// ```
    /// # use dcmcodec_core::PrimitiveValue;
    /// assert_eq!(PrimitiveValue::from(" -6.75").to_float64(), Ok(-6.75));
    /// ```
    pub fn to_float64(&self) -> Result<f64, ConvertValueError> {
        let out = match self {
            PrimitiveValue::Str(s) => Some(parse_float(s)),
            PrimitiveValue::Strs(c) => c.first().map(|s| parse_float(s)),
            other => map_first_number!(other, |x| narrow(x)),
        };
        match out {
            Some(Ok(v)) => Ok(v),
            Some(Err(e)) => Err(self.convert_error("float64", Some(e))),
            None => Err(self.convert_error("float64", None)),
        }
    }

    /// Retrieve all values as double-precision floating point numbers.
    pub fn to_multi_float64(&self) -> Result<Vec<f64>, ConvertValueError> {
        let out = match self {
            PrimitiveValue::Empty => Some(vec![]),
            PrimitiveValue::Str(s) => Some(s.split('\\').map(parse_float).collect()),
            PrimitiveValue::Strs(c) => Some(c.iter().map(|s| parse_float(s)).collect()),
            other => map_numbers!(other, |x| narrow(x)),
        };
        match out {
            Some(values) => values
                .into_iter()
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| self.convert_error("float64s", Some(e))),
            None => Err(self.convert_error("float64s", None)),
        }
    }

    fn first_text(&self) -> Option<&str> {
        match self {
            PrimitiveValue::Str(s) => s.split('\\').next(),
            PrimitiveValue::Strs(c) => c.first().map(|s| s.as_str()),
            _ => None,
        }
    }

    /// Retrieve a single date from this value,
    /// parsing it from text if necessary.
    pub fn to_date(&self) -> Result<DicomDate, ConvertValueError> {
        match self {
            PrimitiveValue::Date(c) if !c.is_empty() => Ok(c[0].clone()),
            other => match other.first_text() {
                Some(text) => DicomDate::parse(text)
                    .context(super::ParseDateTimeSnafu)
                    .map_err(|e| self.convert_error("DicomDate", Some(e))),
                None => Err(self.convert_error("DicomDate", None)),
            },
        }
    }

    /// Retrieve a single time from this value,
    /// parsing it from text if necessary.
    pub fn to_time(&self) -> Result<DicomTime, ConvertValueError> {
        match self {
            PrimitiveValue::Time(c) if !c.is_empty() => Ok(c[0].clone()),
            other => match other.first_text() {
                Some(text) => DicomTime::parse(text)
                    .context(super::ParseDateTimeSnafu)
                    .map_err(|e| self.convert_error("DicomTime", Some(e))),
                None => Err(self.convert_error("DicomTime", None)),
            },
        }
    }

    /// Retrieve a single date-time from this value,
    /// parsing it from text if necessary.
    pub fn to_datetime(&self) -> Result<DicomDateTime, ConvertValueError> {
        match self {
            PrimitiveValue::DateTime(c) if !c.is_empty() => Ok(c[0].clone()),
            other => match other.first_text() {
                Some(text) => DicomDateTime::parse(text)
                    .context(super::ParseDateTimeSnafu)
                    .map_err(|e| self.convert_error("DicomDateTime", Some(e))),
                None => Err(self.convert_error("DicomDateTime", None)),
            },
        }
    }

    /// Retrieve the value as a sequence of attribute tags.
    ///
    /// Text is parsed in the forms accepted by [`Tag`]'s `FromStr`.
    pub fn to_tags(&self) -> Result<Cow<'_, [Tag]>, ConvertValueError> {
        match self {
            PrimitiveValue::Tags(c) => Ok(Cow::Borrowed(&c[..])),
            PrimitiveValue::Empty => Ok(Cow::Borrowed(&[])),
            PrimitiveValue::Str(s) => self.parse_tags(s.split('\\')).map(Cow::Owned),
            PrimitiveValue::Strs(c) => self
                .parse_tags(c.iter().map(|s| s.as_str()))
                .map(Cow::Owned),
            _ => Err(self.convert_error("tags", None)),
        }
    }

    fn parse_tags<'a>(
        &self,
        texts: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<Tag>, ConvertValueError> {
        texts
            .map(|s| Tag::from_str(trim_text(s)).context(super::ParseTagSnafu))
            .collect::<Result<Vec<Tag>, _>>()
            .map_err(|e| self.convert_error("tags", Some(e)))
    }

    /// Append the value in `text` after interpreting it
    /// according to the value representation `vr`.
    ///
    /// The text is parsed first, so that the value
    /// is left untouched if it is not valid.
    /// Values kept in their textual form accept the text as is
    /// once it has been validated.
    ///
    /// # Example
    ///
    /// ```
    /// # use dcmcodec_core::{PrimitiveValue, VR};
    /// # use smallvec::smallvec;
    /// let mut value = PrimitiveValue::Empty;
    /// value.push_coerced(VR::IS, "12").unwrap();
    /// value.push_coerced(VR::IS, " -4").unwrap();
    /// assert_eq!(value, PrimitiveValue::I64(smallvec![12, -4]));
    /// assert!(value.push_coerced(VR::IS, "1.5").is_err());
    /// assert_eq!(value.multiplicity(), 2);
    /// ```
    pub fn push_coerced(&mut self, vr: VR, text: &str) -> Result<(), ModifyValueError> {
        macro_rules! push_to {
            ($this: ident, $variant: ident, $value: expr) => {{
                let value = $value.context(InvalidTextSnafu { text, vr })?;
                match $this {
                    PrimitiveValue::$variant(c) => {
                        c.push(value);
                        Ok(())
                    }
                    PrimitiveValue::Empty => {
                        *$this = PrimitiveValue::$variant(C::from_elem(value, 1));
                        Ok(())
                    }
                    PrimitiveValue::Strs(c) => {
                        c.push(trim_text(text).to_string());
                        Ok(())
                    }
                    other => IncompatibleTypesSnafu {
                        vr,
                        original: other.value_type(),
                    }
                    .fail(),
                }
            }};
        }

        match vr {
            VR::SQ => IncompatibleTypesSnafu {
                vr,
                original: self.value_type(),
            }
            .fail(),
            VR::IS | VR::SV => push_to!(self, I64, parse_int::<i64>(text)),
            VR::DS | VR::FD | VR::OD => push_to!(self, F64, parse_float::<f64>(text)),
            VR::FL | VR::OF => push_to!(self, F32, parse_float::<f32>(text)),
            VR::US | VR::OW => push_to!(self, U16, parse_int::<u16>(text)),
            VR::SS => push_to!(self, I16, parse_int::<i16>(text)),
            VR::UL | VR::OL => push_to!(self, U32, parse_int::<u32>(text)),
            VR::SL => push_to!(self, I32, parse_int::<i32>(text)),
            VR::UV | VR::OV => push_to!(self, U64, parse_int::<u64>(text)),
            VR::OB | VR::UN => push_to!(self, U8, parse_int::<u8>(text)),
            VR::AT => push_to!(
                self,
                Tags,
                Tag::from_str(trim_text(text)).context(super::ParseTagSnafu)
            ),
            VR::DA => push_to!(
                self,
                Date,
                DicomDate::parse(text).context(super::ParseDateTimeSnafu)
            ),
            VR::TM => push_to!(
                self,
                Time,
                DicomTime::parse(text).context(super::ParseDateTimeSnafu)
            ),
            VR::DT => push_to!(
                self,
                DateTime,
                DicomDateTime::parse(text).context(super::ParseDateTimeSnafu)
            ),
            vr if vr.is_single_valued_text() => match self {
                PrimitiveValue::Empty => {
                    *self = PrimitiveValue::Str(text.to_string());
                    Ok(())
                }
                _ => SingleValuedSnafu { vr }.fail(),
            },
            _ => {
                snafu::ensure!(!text.contains('\\'), ContainsDelimiterSnafu { text });
                match self {
                    PrimitiveValue::Strs(c) => {
                        c.push(text.to_string());
                        Ok(())
                    }
                    PrimitiveValue::Str(s) => {
                        let first = std::mem::take(s);
                        *self = PrimitiveValue::Strs(C::from_vec(vec![first, text.to_string()]));
                        Ok(())
                    }
                    PrimitiveValue::Empty => {
                        *self = PrimitiveValue::Strs(C::from_elem(text.to_string(), 1));
                        Ok(())
                    }
                    other => IncompatibleTypesSnafu {
                        vr,
                        original: other.value_type(),
                    }
                    .fail(),
                }
            }
        }
    }
}

fn joined_len(lengths: impl Iterator<Item = usize>) -> usize {
    let (total, count) = lengths.fold((0, 0), |(total, count), len| (total + len, count + 1));
    if count == 0 {
        0
    } else {
        total + count - 1
    }
}

/// Macro for implementing getters to single and multi-values of each variant.
///
/// Should be placed inside `PrimitiveValue`'s impl block.
macro_rules! impl_primitive_getters {
    ($name_single: ident, $name_multi: ident, $variant: ident, $ret: ty) => {
        /// Get a single value of the requested type.
        /// If it contains multiple values,
        /// only the first one is returned.
        /// An error is returned if the variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret, CastValueError> {
            match self {
                PrimitiveValue::$variant(c) if c.is_empty() => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: ValueType::Empty,
                }),
                PrimitiveValue::$variant(c) => Ok(c[0].clone()),
                value => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: value.value_type(),
                }),
            }
        }

        /// Get a sequence of values of the requested type without copying.
        /// An error is returned if the variant is not compatible.
        pub fn $name_multi(&self) -> Result<&[$ret], CastValueError> {
            match self {
                PrimitiveValue::$variant(c) => Ok(c),
                value => Err(CastValueError {
                    requested: stringify!($name_multi),
                    got: value.value_type(),
                }),
            }
        }
    };
}

/// Per variant, strongly checked getters to DICOM values.
///
/// Conversions from one representation to another do not take place
/// when using these methods.
impl PrimitiveValue {
    /// Get a single string value. If it contains multiple strings,
    /// only the first one is returned.
    /// An error is returned if the variant is not compatible.
    ///
    /// To enable conversions of other variants to a textual representation,
    /// see [`to_str()`](PrimitiveValue::to_str) instead.
    pub fn string(&self) -> Result<&str, CastValueError> {
        match self {
            PrimitiveValue::Strs(c) if !c.is_empty() => Ok(&c[0]),
            PrimitiveValue::Str(s) => Ok(s),
            value => Err(CastValueError {
                requested: "Str",
                got: value.value_type(),
            }),
        }
    }

    /// Get the inner sequence of string values
    /// if the variant is either `Str` or `Strs`.
    pub fn strings(&self) -> Result<&[String], CastValueError> {
        match self {
            PrimitiveValue::Strs(c) => Ok(c),
            PrimitiveValue::Str(s) => Ok(std::slice::from_ref(s)),
            value => Err(CastValueError {
                requested: "strings",
                got: value.value_type(),
            }),
        }
    }

    impl_primitive_getters!(tag, tags, Tags, Tag);
    impl_primitive_getters!(date, dates, Date, DicomDate);
    impl_primitive_getters!(time, times, Time, DicomTime);
    impl_primitive_getters!(datetime, datetimes, DateTime, DicomDateTime);
    impl_primitive_getters!(uint8, uint8_slice, U8, u8);
    impl_primitive_getters!(uint16, uint16_slice, U16, u16);
    impl_primitive_getters!(int16, int16_slice, I16, i16);
    impl_primitive_getters!(uint32, uint32_slice, U32, u32);
    impl_primitive_getters!(int32, int32_slice, I32, i32);
    impl_primitive_getters!(int64, int64_slice, I64, i64);
    impl_primitive_getters!(uint64, uint64_slice, U64, u64);
    impl_primitive_getters!(float32, float32_slice, F32, f32);
    impl_primitive_getters!(float64, float64_slice, F64, f64);
}

/// The output of this method is equivalent to calling the method `to_str`
impl std::fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl HasLength for PrimitiveValue {
    fn length(&self) -> Length {
        Length::defined(self.calculate_byte_len() as u32)
    }
}

/// An enum representing an abstraction of a DICOM element's data value type.
/// This should be the equivalent of `PrimitiveValue` without the content,
/// plus the `Item` and `PixelSequence` entries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ValueType {
    /// No data. Used for any value of length 0.
    Empty,
    /// An item. Used for elements in a SQ, regardless of content.
    Item,
    /// Used for the values of encapsulated pixel data.
    PixelSequence,
    /// A sequence of strings.
    Strs,
    /// A single string.
    Str,
    /// A sequence of attribute tags.
    Tags,
    /// A sequence of unsigned 8-bit integers.
    U8,
    /// A sequence of signed 16-bit integers.
    I16,
    /// A sequence of unsigned 16-bit integers.
    U16,
    /// A sequence of signed 32-bit integers.
    I32,
    /// A sequence of unsigned 32-bit integers.
    U32,
    /// A sequence of signed 64-bit integers.
    I64,
    /// A sequence of unsigned 64-bit integers.
    U64,
    /// A sequence of 32-bit floating point numbers.
    F32,
    /// A sequence of 64-bit floating point numbers.
    F64,
    /// A sequence of dates.
    Date,
    /// A sequence of date-time values.
    DateTime,
    /// A sequence of time values.
    Time,
}

/// Construct a [`PrimitiveValue`] from a variant name and its content.
///
/// ```
/// # use dcmcodec_core::{dicom_value, PrimitiveValue};
/// let value = dicom_value!(Strs, ["ORIGINAL", "PRIMARY"]);
/// assert_eq!(value.multiplicity(), 2);
/// let value = dicom_value!(F64, [1.5, 3.]);
/// assert_eq!(value.to_str(), "1.5\\3");
/// let value = dicom_value!(U16, 16);
/// assert_eq!(value, PrimitiveValue::from(16_u16));
/// ```
#[macro_export]
macro_rules! dicom_value {
    () => {
        $crate::value::PrimitiveValue::Empty
    };
    (Str, $elem: expr) => {
        $crate::value::PrimitiveValue::Str(::std::string::String::from($elem))
    };
    (Strs, [ $($elem: expr),* $(,)? ]) => {
        $crate::value::PrimitiveValue::Strs(
            $crate::smallvec::smallvec![$(::std::string::String::from($elem),)*]
        )
    };
    ($typ: ident, [ $($elem: expr),* $(,)? ]) => {
        $crate::value::PrimitiveValue :: $typ ($crate::smallvec::smallvec![$($elem,)*])
    };
    ($typ: ident, $elem: expr) => {
        $crate::value::PrimitiveValue :: $typ ($crate::value::C::from_elem($elem, 1))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom_value;
    use smallvec::smallvec;

    #[test]
    fn primitive_value_to_str() {
        assert_eq!(PrimitiveValue::Empty.to_str(), "");
        assert_eq!(dicom_value!(Str, "Smith^John\0").to_str(), "Smith^John");
        assert_eq!(
            dicom_value!(Tags, [Tag(0x0010, 0x0010), Tag(0x7FE0, 0x0010)]).to_str(),
            "(0010,0010)\\(7FE0,0010)"
        );
        let dates = PrimitiveValue::Date(smallvec![
            DicomDate::parse("20010101").unwrap(),
            DicomDate::parse("2002.02.02").unwrap(),
        ]);
        assert_eq!(dates.to_str(), "20010101\\2002.02.02");
    }

    #[test]
    fn primitive_value_byte_len_is_even() {
        assert_eq!(dicom_value!(Strs, ["ABC"]).calculate_byte_len(), 4);
        assert_eq!(dicom_value!(Strs, ["AB", "C"]).calculate_byte_len(), 4);
        assert_eq!(dicom_value!(U16, [1, 2, 3]).calculate_byte_len(), 6);
        assert_eq!(dicom_value!(U8, [1, 2, 3]).calculate_byte_len(), 4);
        assert_eq!(PrimitiveValue::Empty.calculate_byte_len(), 0);
    }

    #[test]
    fn primitive_value_to_int() {
        assert_eq!(dicom_value!(Strs, ["  42 "]).to_int::<u16>(), Ok(42));
        assert_eq!(dicom_value!(Strs, ["+7"]).to_int::<i32>(), Ok(7));
        assert_eq!(dicom_value!(I64, [-3, 4]).to_multi_int::<i32>(), Ok(vec![-3, 4]));

        let err = dicom_value!(I32, [-1]).to_int::<u32>().unwrap_err();
        assert_eq!(err.original, ValueType::I32);
        assert!(matches!(
            err.cause,
            Some(InvalidValueReadError::NarrowConvert { .. })
        ));

        let err = dicom_value!(Strs, ["1.5"]).to_int::<i32>().unwrap_err();
        assert!(matches!(
            err.cause,
            Some(InvalidValueReadError::ParseInteger { .. })
        ));
        assert!(dicom_value!(Tags, [Tag(0, 0)]).to_int::<i32>().is_err());
    }

    #[test]
    fn primitive_value_to_float() {
        assert_eq!(dicom_value!(Str, "1.5\\-2e3").to_multi_float64(), Ok(vec![1.5, -2000.]));
        assert_eq!(dicom_value!(U16, [3]).to_float64(), Ok(3.));
        assert!(dicom_value!(Strs, ["abc"]).to_float64().is_err());
    }

    #[test]
    fn primitive_value_to_bytes() {
        assert_eq!(&*dicom_value!(U16, [0x0102, 0x0304]).to_bytes(), &[2, 1, 4, 3]);
        assert_eq!(&*dicom_value!(Str, "AB ").to_bytes(), b"AB");
        assert_eq!(
            &*dicom_value!(Tags, [Tag(0x0010, 0x0020)]).to_bytes(),
            &[0x10, 0x00, 0x20, 0x00]
        );
    }

    #[test]
    fn primitive_value_to_date() {
        let value = dicom_value!(Strs, ["20240131"]);
        assert_eq!(value.to_date().unwrap().as_str(), "20240131");
        let value = dicom_value!(Strs, ["20240132"]);
        assert!(matches!(
            value.to_date().unwrap_err().cause,
            Some(InvalidValueReadError::ParseDateTime { .. })
        ));
        let value = dicom_value!(Strs, ["101010.5"]);
        assert_eq!(value.to_time().unwrap().as_str(), "101010.5");
    }

    #[test]
    fn primitive_value_to_tags() {
        let value = dicom_value!(Strs, ["(0008,0016)", "00100010"]);
        assert_eq!(
            &*value.to_tags().unwrap(),
            &[Tag(0x0008, 0x0016), Tag(0x0010, 0x0010)]
        );
    }

    #[test]
    fn push_coerced_keeps_value_on_failure() {
        let mut value = dicom_value!(F64, [1.5]);
        assert!(value.push_coerced(VR::DS, "x").is_err());
        assert_eq!(value, dicom_value!(F64, [1.5]));
        value.push_coerced(VR::DS, "2.5").unwrap();
        assert_eq!(value, dicom_value!(F64, [1.5, 2.5]));

        // text fallback values accept validated text
        let mut value = dicom_value!(Strs, ["1e999"]);
        value.push_coerced(VR::DS, "3").unwrap();
        assert_eq!(value, dicom_value!(Strs, ["1e999", "3"]));

        let mut value = PrimitiveValue::Empty;
        value.push_coerced(VR::CS, "ORIGINAL").unwrap();
        value.push_coerced(VR::CS, "PRIMARY").unwrap();
        assert_eq!(value, dicom_value!(Strs, ["ORIGINAL", "PRIMARY"]));
        assert!(matches!(
            value.push_coerced(VR::CS, "A\\B"),
            Err(ModifyValueError::ContainsDelimiter { .. })
        ));

        let mut value = PrimitiveValue::Empty;
        value.push_coerced(VR::LT, "some text").unwrap();
        assert!(matches!(
            value.push_coerced(VR::LT, "more"),
            Err(ModifyValueError::SingleValued { .. })
        ));

        let mut value = dicom_value!(U16, [1]);
        assert!(matches!(
            value.push_coerced(VR::DA, "20200101"),
            Err(ModifyValueError::IncompatibleTypes { .. })
        ));
    }
}
