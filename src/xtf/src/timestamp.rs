//! Record timestamps
//!
//! XTF stores dates as separate year/month/day/hour/minute/second fields
//! plus a sub-second field whose width and unit depend on the record type
//! (hundredths in ping headers, milliseconds in attitude records,
//! microseconds in gyro and navigation records, ...).
//!
//! A timestamp is accepted only when every field fits its canonical text
//! layout `YYYY-MM-DD-HH-mm-ss-<sub-second>`: a four-digit year from 1 to
//! 9999, a real calendar day, a 24-hour time without leap seconds, and a
//! sub-second value with no more digits than its precision allows. Anything
//! else decodes to `None`, which callers treat as "no time available".

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::cursor::ByteCursor;
use crate::Result;

/// Width of the sub-second field, in decimal digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// No sub-second field
    Seconds,
    /// Hundredths of a second (2 digits)
    Centis,
    /// Milliseconds (3 digits)
    Millis,
    /// Ten-thousandths of a second (4 digits)
    TenThousandths,
    /// Microseconds (6 digits)
    Micros,
}

impl Precision {
    pub const fn digits(self) -> u32 {
        match self {
            Precision::Seconds => 0,
            Precision::Centis => 2,
            Precision::Millis => 3,
            Precision::TenThousandths => 4,
            Precision::Micros => 6,
        }
    }

    /// Convert a sub-second value to nanoseconds, if it fits the width
    fn nanos(self, value: u32) -> Option<u32> {
        let digits = self.digits();
        if u64::from(value) >= 10u64.pow(digits) {
            return None;
        }
        Some(value * 10u32.pow(9 - digits))
    }
}

/// Date and time fields as stored in a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub subsecond: u32,
}

impl DateTimeFields {
    /// Read the 7-byte year..second block shared by most records
    ///
    /// The sub-second field is left at zero; its width differs per record
    /// type, so the caller reads it.
    pub(crate) fn read_date(cur: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            year: cur.read_u16()?,
            month: cur.read_u8()?,
            day: cur.read_u8()?,
            hour: cur.read_u8()?,
            minute: cur.read_u8()?,
            second: cur.read_u8()?,
            subsecond: 0,
        })
    }

    pub fn with_subsecond(mut self, subsecond: u32) -> Self {
        self.subsecond = subsecond;
        self
    }

    /// Compose the calendar timestamp these fields describe
    pub fn compose(&self, precision: Precision) -> Option<NaiveDateTime> {
        compose(self, precision)
    }

    /// Text layout used by XTF tooling: `YYYY-MM-DD-HH-mm-ss[-sub]`
    pub fn canonical(&self, precision: Precision) -> String {
        let mut text = format!(
            "{:04}-{:02}-{:02}-{:02}-{:02}-{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        let digits = precision.digits() as usize;
        if digits > 0 {
            text.push_str(&format!("-{:0width$}", self.subsecond, width = digits));
        }
        text
    }
}

/// Compose a timestamp, returning `None` when any field is out of range
pub fn compose(fields: &DateTimeFields, precision: Precision) -> Option<NaiveDateTime> {
    if !(1..=9999).contains(&fields.year) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(
        i32::from(fields.year),
        u32::from(fields.month),
        u32::from(fields.day),
    )?;
    time_on(
        date,
        fields.hour,
        fields.minute,
        fields.second,
        fields.subsecond,
        precision,
    )
}

/// Compose a time of day against the date of an already decoded timestamp
///
/// Ping headers carry the navigation fix time and the computer clock time
/// as hour/minute/second/hundredths only; they share the ping's date.
pub fn compose_time_of_day(
    date: Option<NaiveDate>,
    hour: u8,
    minute: u8,
    second: u8,
    subsecond: u32,
    precision: Precision,
) -> Option<NaiveDateTime> {
    time_on(date?, hour, minute, second, subsecond, precision)
}

fn time_on(
    date: NaiveDate,
    hour: u8,
    minute: u8,
    second: u8,
    subsecond: u32,
    precision: Precision,
) -> Option<NaiveDateTime> {
    let nanos = precision.nanos(subsecond)?;
    // from_hms_nano_opt rejects hour 24, minute 60 and second 60
    let time = NaiveTime::from_hms_nano_opt(
        u32::from(hour),
        u32::from(minute),
        u32::from(second),
        nanos,
    )?;
    Some(date.and_time(time))
}

/// Render a decoded timestamp in the canonical layout
pub fn format_canonical(time: &NaiveDateTime, precision: Precision) -> String {
    match precision.digits() {
        0 => time.format("%Y-%m-%d-%H-%M-%S").to_string(),
        2 => format!("{}-{:02}", time.format("%Y-%m-%d-%H-%M-%S"), subsec(time, 2)),
        3 => time.format("%Y-%m-%d-%H-%M-%S-%3f").to_string(),
        6 => time.format("%Y-%m-%d-%H-%M-%S-%6f").to_string(),
        digits => format!(
            "{}-{:0width$}",
            time.format("%Y-%m-%d-%H-%M-%S"),
            subsec(time, digits),
            width = digits as usize
        ),
    }
}

fn subsec(time: &NaiveDateTime, digits: u32) -> u32 {
    use chrono::Timelike;
    time.nanosecond() / 10u32.pow(9 - digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn fields(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTimeFields {
        DateTimeFields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            subsecond: 0,
        }
    }

    #[test]
    fn test_compose_centis() {
        let t = fields(2019, 7, 14, 13, 5, 59)
            .with_subsecond(42)
            .compose(Precision::Centis)
            .unwrap();
        assert_eq!(t.year(), 2019);
        assert_eq!(t.month(), 7);
        assert_eq!(t.day(), 14);
        assert_eq!(t.second(), 59);
        assert_eq!(t.nanosecond(), 420_000_000);
    }

    #[test]
    fn test_compose_micros() {
        let t = fields(2021, 2, 28, 0, 0, 0)
            .with_subsecond(999_999)
            .compose(Precision::Micros)
            .unwrap();
        assert_eq!(t.nanosecond(), 999_999_000);
    }

    #[test]
    fn test_subsecond_wider_than_precision() {
        let f = fields(2021, 2, 28, 0, 0, 0);
        assert!(f.with_subsecond(100).compose(Precision::Centis).is_none());
        assert!(f.with_subsecond(1000).compose(Precision::Millis).is_none());
        assert!(f.with_subsecond(10_000).compose(Precision::TenThousandths).is_none());
        assert!(f.with_subsecond(1_000_000).compose(Precision::Micros).is_none());
        assert!(f.with_subsecond(1).compose(Precision::Seconds).is_none());
    }

    #[test]
    fn test_out_of_range_fields() {
        assert!(fields(2020, 13, 1, 0, 0, 0).compose(Precision::Seconds).is_none());
        assert!(fields(2020, 0, 1, 0, 0, 0).compose(Precision::Seconds).is_none());
        assert!(fields(2021, 2, 29, 0, 0, 0).compose(Precision::Seconds).is_none());
        assert!(fields(2020, 2, 29, 0, 0, 0).compose(Precision::Seconds).is_some());
        assert!(fields(2020, 1, 1, 24, 0, 0).compose(Precision::Seconds).is_none());
        assert!(fields(2020, 1, 1, 0, 60, 0).compose(Precision::Seconds).is_none());
        assert!(fields(2020, 1, 1, 0, 0, 60).compose(Precision::Seconds).is_none());
    }

    #[test]
    fn test_year_bounds() {
        assert!(fields(0, 1, 1, 0, 0, 0).compose(Precision::Seconds).is_none());
        assert!(fields(1, 1, 1, 0, 0, 0).compose(Precision::Seconds).is_some());
        assert!(fields(9999, 12, 31, 23, 59, 59).compose(Precision::Seconds).is_some());
        assert!(fields(10000, 1, 1, 0, 0, 0).compose(Precision::Seconds).is_none());
    }

    #[test]
    fn test_all_zero_fields_are_invalid() {
        assert!(DateTimeFields::default().compose(Precision::Centis).is_none());
    }

    #[test]
    fn test_time_of_day_reuses_date() {
        let date = NaiveDate::from_ymd_opt(2018, 5, 6);
        let t = compose_time_of_day(date, 23, 59, 58, 7, Precision::Centis).unwrap();
        assert_eq!(t.date(), date.unwrap());
        assert_eq!(t.hour(), 23);
        assert_eq!(t.nanosecond(), 70_000_000);

        assert!(compose_time_of_day(None, 1, 2, 3, 4, Precision::Centis).is_none());
        assert!(compose_time_of_day(date, 25, 0, 0, 0, Precision::Centis).is_none());
    }

    #[test]
    fn test_canonical_layout() {
        let f = fields(2007, 3, 9, 4, 5, 6).with_subsecond(7);
        assert_eq!(f.canonical(Precision::Centis), "2007-03-09-04-05-06-07");
        assert_eq!(f.canonical(Precision::Millis), "2007-03-09-04-05-06-007");
        assert_eq!(f.canonical(Precision::Micros), "2007-03-09-04-05-06-000007");
        assert_eq!(f.canonical(Precision::Seconds), "2007-03-09-04-05-06");
    }

    #[test]
    fn test_format_canonical_round_trip() {
        for (precision, sub) in [
            (Precision::Centis, 7),
            (Precision::Millis, 123),
            (Precision::TenThousandths, 4321),
            (Precision::Micros, 654_321),
        ] {
            let f = fields(2007, 3, 9, 4, 5, 6).with_subsecond(sub);
            let t = f.compose(precision).unwrap();
            assert_eq!(format_canonical(&t, precision), f.canonical(precision));
        }
    }
}
