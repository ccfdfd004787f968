//! Date, time and date-time values, as found in the DA, TM and DT
//! value representations.
//!
//! Each value keeps the text it was parsed from,
//! so that writing it back yields the exact same bytes.
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use snafu::{ensure, OptionExt, Snafu};
use std::fmt;

/// An error parsing or building a date/time value.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The text does not follow the DA pattern.
    #[snafu(display("Invalid date `{}`", text))]
    InvalidDate { text: String },
    /// The text does not follow the TM pattern.
    #[snafu(display("Invalid time `{}`", text))]
    InvalidTime { text: String },
    /// The text does not follow the DT pattern.
    #[snafu(display("Invalid date-time `{}`", text))]
    InvalidDateTime { text: String },
    /// The UTC offset suffix is malformed or out of range.
    #[snafu(display("Invalid UTC offset `{}`", text))]
    InvalidOffset { text: String },
}

type Result<T, E = Error> = std::result::Result<T, E>;

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a run of ASCII digits into a number,
/// assuming that `is_digits` has been checked beforehand.
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Parse a fraction of a second (1 to 6 digits) into microseconds.
fn fraction_micros(s: &str) -> Option<u32> {
    if s.len() > 6 || !is_digits(s) {
        return None;
    }
    Some(digits(s) * 10u32.pow(6 - s.len() as u32))
}

fn trim_value(text: &str) -> &str {
    text.trim_end_matches(|c| c == ' ' || c == '\0')
}

/// A DICOM date (DA).
///
/// Accepts the standard `YYYYMMDD` form
/// and the legacy `YYYY.MM.DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DicomDate {
    date: NaiveDate,
    text: String,
}

impl DicomDate {
    /// Parse a date from its textual representation.
    /// Trailing padding is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let text = trim_value(text);
        let compact: String = if text.len() == 10 && text.as_bytes()[4] == b'.' {
            ensure!(text.as_bytes()[7] == b'.', InvalidDateSnafu { text });
            text.split('.').collect()
        } else {
            text.to_string()
        };
        ensure!(
            compact.len() == 8 && is_digits(&compact),
            InvalidDateSnafu { text }
        );
        let date = NaiveDate::from_ymd_opt(
            digits(&compact[0..4]) as i32,
            digits(&compact[4..6]),
            digits(&compact[6..8]),
        )
        .context(InvalidDateSnafu { text })?;
        Ok(DicomDate {
            date,
            text: text.to_string(),
        })
    }

    /// Build a date from its components.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()).context(
            InvalidDateSnafu {
                text: format!("{:04}{:02}{:02}", year, month, day),
            },
        )?;
        Ok(date.into())
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// The month component.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// The day component.
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The text this value is encoded as.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<NaiveDate> for DicomDate {
    fn from(date: NaiveDate) -> Self {
        DicomDate {
            date,
            text: date.format("%Y%m%d").to_string(),
        }
    }
}

impl fmt::Display for DicomDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A DICOM time (TM).
///
/// Accepts `HH`, `HHMM`, `HHMMSS` and `HHMMSS.FFFFFF`
/// (with 1 to 6 fraction digits),
/// as well as the legacy `HH:MM:SS` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DicomTime {
    time: NaiveTime,
    text: String,
}

impl DicomTime {
    /// Parse a time from its textual representation.
    /// Trailing padding is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let text = trim_value(text);
        let time = parse_time_part(&text.replace(':', "")).context(InvalidTimeSnafu { text })?;
        Ok(DicomTime {
            time,
            text: text.to_string(),
        })
    }

    /// Build a time from hours, minutes and seconds.
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Result<Self> {
        let time = NaiveTime::from_hms_opt(hour.into(), minute.into(), second.into()).context(
            InvalidTimeSnafu {
                text: format!("{:02}{:02}{:02}", hour, minute, second),
            },
        )?;
        Ok(time.into())
    }

    /// Build a time from hours, minutes, seconds and microseconds.
    pub fn from_hms_micro(hour: u8, minute: u8, second: u8, micro: u32) -> Result<Self> {
        let time =
            NaiveTime::from_hms_micro_opt(hour.into(), minute.into(), second.into(), micro)
                .context(InvalidTimeSnafu {
                    text: format!("{:02}{:02}{:02}.{:06}", hour, minute, second, micro),
                })?;
        Ok(time.into())
    }

    /// The time of day.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// The text this value is encoded as.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn format_time(time: NaiveTime) -> String {
    let micro = time.nanosecond() / 1_000;
    if micro == 0 {
        time.format("%H%M%S").to_string()
    } else {
        format!("{}.{:06}", time.format("%H%M%S"), micro)
    }
}

impl From<NaiveTime> for DicomTime {
    fn from(time: NaiveTime) -> Self {
        DicomTime {
            time,
            text: format_time(time),
        }
    }
}

impl fmt::Display for DicomTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parse `HH[MM[SS[.F{1,6}]]]`.
fn parse_time_part(s: &str) -> Option<NaiveTime> {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (s, None),
    };
    if !is_digits(whole) || !matches!(whole.len(), 2 | 4 | 6) {
        return None;
    }
    // a fraction is only admitted after the seconds
    if frac.is_some() && whole.len() != 6 {
        return None;
    }
    let hour = digits(&whole[0..2]);
    let minute = whole.get(2..4).map(digits).unwrap_or(0);
    // leap second 60 is clamped
    let second = whole.get(4..6).map(digits).unwrap_or(0).min(59);
    let micro = match frac {
        Some(f) => fraction_micros(f)?,
        None => 0,
    };
    NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
}

/// A DICOM date-time (DT).
///
/// Accepts `YYYY[MM[DD[HH[MM[SS[.F{1,6}]]]]]][&ZZXX]`,
/// where the omitted components take their lowest value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DicomDateTime {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
    text: String,
}

impl DicomDateTime {
    /// Parse a date-time from its textual representation.
    /// Trailing padding is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let text = trim_value(text);
        // the sign of the offset can only appear after the year
        let (body, offset) = match text
            .char_indices()
            .skip(4)
            .find(|(_, c)| *c == '+' || *c == '-')
        {
            Some((i, _)) => (&text[..i], Some(parse_offset(&text[i..])?)),
            None => (text, None),
        };
        let (date_part, time_part) = if body.len() > 8 {
            body.split_at(8)
        } else {
            (body, "")
        };
        ensure!(
            is_digits(date_part) && matches!(date_part.len(), 4 | 6 | 8),
            InvalidDateTimeSnafu { text }
        );
        let year = digits(&date_part[0..4]) as i32;
        let month = date_part.get(4..6).map(digits).unwrap_or(1);
        let day = date_part.get(6..8).map(digits).unwrap_or(1);
        let date =
            NaiveDate::from_ymd_opt(year, month, day).context(InvalidDateTimeSnafu { text })?;
        let time = if time_part.is_empty() {
            NaiveTime::from_hms_opt(0, 0, 0)
        } else {
            parse_time_part(time_part)
        }
        .context(InvalidDateTimeSnafu { text })?;
        Ok(DicomDateTime {
            datetime: NaiveDateTime::new(date, time),
            offset,
            text: text.to_string(),
        })
    }

    /// Build a complete date-time value.
    pub fn from_date_and_time(
        date: NaiveDate,
        time: NaiveTime,
        offset: Option<FixedOffset>,
    ) -> Self {
        let mut text = format!("{}{}", date.format("%Y%m%d"), format_time(time));
        if let Some(offset) = offset {
            let secs = offset.local_minus_utc();
            let sign = if secs < 0 { '-' } else { '+' };
            let mins = secs.abs() / 60;
            text.push_str(&format!("{}{:02}{:02}", sign, mins / 60, mins % 60));
        }
        DicomDateTime {
            datetime: NaiveDateTime::new(date, time),
            offset,
            text,
        }
    }

    /// The local date and time.
    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The UTC offset, if one was specified.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The text this value is encoded as.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn parse_offset(s: &str) -> Result<FixedOffset> {
    let rest = &s[1..];
    ensure!(
        rest.len() == 4 && is_digits(rest),
        InvalidOffsetSnafu { text: s }
    );
    let secs = (digits(&rest[0..2]) * 3600 + digits(&rest[2..4]) * 60) as i32;
    let secs = if s.starts_with('-') { -secs } else { secs };
    FixedOffset::east_opt(secs).context(InvalidOffsetSnafu { text: s })
}

impl fmt::Display for DicomDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        let date = DicomDate::parse("20200229").unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert_eq!(date.to_string(), "20200229");

        let legacy = DicomDate::parse("1994.10.12 ").unwrap();
        assert_eq!((legacy.year(), legacy.month(), legacy.day()), (1994, 10, 12));
        assert_eq!(legacy.as_str(), "1994.10.12");

        assert!(DicomDate::parse("20190229").is_err());
        assert!(DicomDate::parse("2019").is_err());
        assert!(DicomDate::parse("2019-01-01").is_err());
        assert_eq!(
            DicomDate::from_ymd(1994, 10, 12).unwrap().as_str(),
            "19941012"
        );
    }

    #[test]
    fn times() {
        let t = DicomTime::parse("1030").unwrap();
        assert_eq!(t.time(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        let t = DicomTime::parse("235959.25").unwrap();
        assert_eq!(t.time(), NaiveTime::from_hms_micro_opt(23, 59, 59, 250_000).unwrap());
        assert_eq!(t.as_str(), "235959.25");
        let t = DicomTime::parse("07:15:00").unwrap();
        assert_eq!(t.time(), NaiveTime::from_hms_opt(7, 15, 0).unwrap());

        assert!(DicomTime::parse("25").is_err());
        assert!(DicomTime::parse("123").is_err());
        assert!(DicomTime::parse("1230.5").is_err());
        assert_eq!(
            DicomTime::from_hms_micro(8, 0, 1, 500).unwrap().as_str(),
            "080001.000500"
        );
    }

    #[test]
    fn datetimes() {
        let dt = DicomDateTime::parse("2021").unwrap();
        assert_eq!(
            dt.datetime(),
            NaiveDate::from_ymd_opt(2021, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(dt.offset(), None);

        let dt = DicomDateTime::parse("20210315083000.5-0500").unwrap();
        assert_eq!(
            dt.datetime(),
            NaiveDate::from_ymd_opt(2021, 3, 15)
                .unwrap()
                .and_hms_micro_opt(8, 30, 0, 500_000)
                .unwrap()
        );
        assert_eq!(dt.offset(), FixedOffset::west_opt(5 * 3600));
        assert_eq!(dt.as_str(), "20210315083000.5-0500");

        assert!(DicomDateTime::parse("202").is_err());
        assert!(DicomDateTime::parse("20210315+05").is_err());

        let built = DicomDateTime::from_date_and_time(
            NaiveDate::from_ymd_opt(2000, 12, 31).unwrap(),
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            FixedOffset::east_opt(3600),
        );
        assert_eq!(built.as_str(), "20001231230000+0100");
    }
}
