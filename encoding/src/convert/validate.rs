//! Checks of textual values against the rules of their value representation,
//! performed before a value is written.
//!
//! Binary values and values already held as numbers or dates
//! are correct by construction and are not checked here.
use dcmcodec_core::{PrimitiveValue, VR};
use std::fmt;

/// A rule of a value representation which a value does not follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueViolation {
    /// The value is longer than the representation allows
    TooLong { vr: VR, value: String, max: usize },
    /// The value has characters outside of the representation's repertoire
    Repertoire { vr: VR, value: String },
    /// The value does not have the form required by the representation
    Format {
        vr: VR,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ValueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueViolation::TooLong { vr, value, max } => write!(
                f,
                "{} value {:?} is longer than {} characters",
                vr, value, max
            ),
            ValueViolation::Repertoire { vr, value } => write!(
                f,
                "{} value {:?} has characters not allowed in {}",
                vr, value, vr
            ),
            ValueViolation::Format {
                vr,
                value,
                expected,
            } => write!(f, "{} value {:?} is not {}", vr, value, expected),
        }
    }
}

/// The maximum number of characters of a single value.
fn max_length(vr: VR) -> Option<usize> {
    match vr {
        VR::AE | VR::CS | VR::DS | VR::SH => Some(16),
        VR::AS => Some(4),
        VR::IS => Some(12),
        VR::LO | VR::UI => Some(64),
        VR::LT => Some(10240),
        VR::ST => Some(1024),
        _ => None,
    }
}

/// Check every textual value in `value` against the rules of `vr`.
///
/// An empty vector means that the value can be written as is.
pub fn validate_value(vr: VR, value: &PrimitiveValue) -> Vec<ValueViolation> {
    let mut violations = Vec::new();
    match value {
        PrimitiveValue::Str(s) => validate_str(vr, s, &mut violations),
        PrimitiveValue::Strs(values) => {
            for s in values {
                validate_str(vr, s, &mut violations);
            }
        }
        _ => {}
    }
    violations
}

fn validate_str(vr: VR, value: &str, violations: &mut Vec<ValueViolation>) {
    if value.is_empty() {
        return;
    }

    if let Some(max) = max_length(vr) {
        if value.chars().count() > max {
            violations.push(ValueViolation::TooLong {
                vr,
                value: value.to_string(),
                max,
            });
        }
    }

    if vr == VR::PN {
        let groups: Vec<&str> = value.split('=').collect();
        if groups.len() > 3 {
            violations.push(ValueViolation::Format {
                vr,
                value: value.to_string(),
                expected: "at most three component groups",
            });
        }
        if groups.iter().any(|g| g.chars().count() > 64) {
            violations.push(ValueViolation::TooLong {
                vr,
                value: value.to_string(),
                max: 64,
            });
        }
        return;
    }

    let repertoire_ok = match vr {
        VR::AE => value.bytes().all(|b| (0x20..0x7f).contains(&b) && b != b'\\'),
        VR::CS => value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b' ' || b == b'_'),
        VR::UI => value.bytes().all(|b| b.is_ascii_digit() || b == b'.'),
        _ => true,
    };
    if !repertoire_ok {
        violations.push(ValueViolation::Repertoire {
            vr,
            value: value.to_string(),
        });
        return;
    }

    let format = match vr {
        VR::AS => is_age(value).then_some(()).ok_or("an age like 018Y"),
        VR::DS => is_decimal(value.trim_matches(' '))
            .then_some(())
            .ok_or("a decimal number"),
        VR::IS => is_integer(value.trim_matches(' '))
            .then_some(())
            .ok_or("a 32-bit integer"),
        VR::DA => is_range_of(value, is_date)
            .then_some(())
            .ok_or("a date like YYYYMMDD"),
        VR::TM => is_range_of(value.trim_end_matches(' '), is_time)
            .then_some(())
            .ok_or("a time like HHMMSS.FFFFFF"),
        VR::UI => is_uid(value.trim_end_matches('\0'))
            .then_some(())
            .ok_or("a UID of dot-separated numbers"),
        _ => Ok(()),
    };
    if let Err(expected) = format {
        violations.push(ValueViolation::Format {
            vr,
            value: value.to_string(),
            expected,
        });
    }
}

fn is_age(value: &str) -> bool {
    let b = value.as_bytes();
    b.len() == 4 && b[..3].iter().all(u8::is_ascii_digit) && b"DWMY".contains(&b[3])
}

fn digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            (int.is_empty() || digits(int))
                && (frac.is_empty() || digits(frac))
                && !(int.is_empty() && frac.is_empty())
        }
        None => digits(mantissa),
    };
    let exponent_ok = match exponent {
        Some(e) => digits(e.strip_prefix(['+', '-']).unwrap_or(e)),
        None => true,
    };
    mantissa_ok && exponent_ok
}

fn is_integer(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits(unsigned) && value.parse::<i32>().is_ok()
}

fn is_date(value: &str) -> bool {
    if value.len() != 8 || !digits(value) {
        return false;
    }
    let month: u32 = value[4..6].parse().unwrap_or(0);
    let day: u32 = value[6..8].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn is_time(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    if !digits(whole) || whole.len() % 2 != 0 || whole.len() > 6 {
        return false;
    }
    if let Some(fraction) = fraction {
        if whole.len() != 6 || !digits(fraction) || fraction.len() > 6 {
            return false;
        }
    }
    let limits = [23, 59, 60];
    whole
        .as_bytes()
        .chunks(2)
        .zip(limits)
        .all(|(pair, limit)| u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0') <= limit)
}

/// Whether `value` is a single value or a range of values,
/// where one of the range's ends may be absent.
fn is_range_of(value: &str, single: fn(&str) -> bool) -> bool {
    match value.split_once('-') {
        Some((from, to)) => {
            !(from.is_empty() && to.is_empty())
                && (from.is_empty() || single(from))
                && (to.is_empty() || single(to))
        }
        None => single(value),
    }
}

fn is_uid(value: &str) -> bool {
    value
        .split('.')
        .all(|part| digits(part) && (part == "0" || !part.starts_with('0')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmcodec_core::dicom_value;
    use rstest::rstest;

    #[rstest]
    #[case(VR::AE, "STORESCP")]
    #[case(VR::AS, "018Y")]
    #[case(VR::CS, "ORIGINAL")]
    #[case(VR::CS, "DERIVED_2 X")]
    #[case(VR::DS, " -1.5e3 ")]
    #[case(VR::DS, ".5")]
    #[case(VR::IS, "+42")]
    #[case(VR::DA, "20240229")]
    #[case(VR::DA, "20240101-")]
    #[case(VR::TM, "235960.123456")]
    #[case(VR::TM, "0930")]
    #[case(VR::UI, "1.2.840.10008.1.2.1")]
    #[case(VR::PN, "Doe^John=ドウ^ジョン")]
    #[case(VR::LO, "")]
    fn valid_values(#[case] vr: VR, #[case] value: &str) {
        assert_eq!(validate_value(vr, &PrimitiveValue::from(value)), vec![]);
    }

    #[rstest]
    #[case(VR::AE, "BACK\\SLASH")]
    #[case(VR::AS, "18Y")]
    #[case(VR::CS, "lower case")]
    #[case(VR::DS, "1.2.3")]
    #[case(VR::DS, "e5")]
    #[case(VR::IS, "3000000000")]
    #[case(VR::IS, "4.0")]
    #[case(VR::DA, "2024-01")]
    #[case(VR::DA, "20241301")]
    #[case(VR::TM, "2460")]
    #[case(VR::TM, "12.5")]
    #[case(VR::UI, "1.02.3")]
    #[case(VR::UI, "1..2")]
    #[case(VR::SH, "seventeen letters")]
    #[case(VR::PN, "a=b=c=d")]
    fn invalid_values(#[case] vr: VR, #[case] value: &str) {
        let violations = validate_value(vr, &PrimitiveValue::from(value));
        assert_eq!(violations.len(), 1, "{:?}", violations);
    }

    #[test]
    fn every_value_is_checked() {
        let value = dicom_value!(Strs, ["ORIGINAL", "primary", "axial"]);
        let violations = validate_value(VR::CS, &value);
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].to_string(),
            "CS value \"primary\" has characters not allowed in CS"
        );
    }

    #[test]
    fn numbers_are_not_checked() {
        let value = dicom_value!(F64, [123456789.123456789, 0.5]);
        assert!(validate_value(VR::DS, &value).is_empty());
    }
}
