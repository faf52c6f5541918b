// Licensed under the Apache-2.0 license

//! Calendar values and their register encoding.

use crate::error::Error;
use crate::rtc::bcd::{bcd_to_dec, dec_to_bcd};
use crate::rtc::registers::{
    HOURS_12_MASK, HOURS_24_MASK, HOURS_PM, SECONDS, TIME_BLOCK_LEN, YEAR,
};
use core::fmt;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// The SECONDS..=YEAR register block as it sits on the device, BCD encoded.
///
/// `hours` is raw: its layout depends on the 12/24-hour mode bit.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TimeRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub weekday: u8,
    pub date: u8,
    pub month: u8,
    pub year: u8,
}

const _: () = assert!(
    core::mem::size_of::<TimeRegisters>() == TIME_BLOCK_LEN
        && (YEAR - SECONDS) as usize + 1 == TIME_BLOCK_LEN
);

impl TimeRegisters {
    /// Encode `dt`; the hour is written in 12-hour form when `twelve_hour`.
    #[must_use]
    pub fn encode(dt: &DateTime, twelve_hour: bool) -> Self {
        Self {
            seconds: dec_to_bcd(dt.second),
            minutes: dec_to_bcd(dt.minute),
            hours: encode_hours(dt.hour, twelve_hour),
            weekday: dt.weekday,
            date: dec_to_bcd(dt.date),
            month: dec_to_bcd(dt.month),
            year: dec_to_bcd(year_in_century(dt.year)),
        }
    }

    #[must_use]
    pub fn decode(&self, twelve_hour: bool) -> DateTime {
        DateTime {
            year: 2000 + u16::from(bcd_to_dec(self.year)),
            month: bcd_to_dec(self.month),
            date: bcd_to_dec(self.date),
            weekday: self.weekday & 0x07,
            hour: decode_hours(self.hours, twelve_hour),
            minute: bcd_to_dec(self.minutes & 0x7F),
            second: bcd_to_dec(self.seconds & 0x7F),
        }
    }
}

/// Wall-clock time in 24-hour form. `weekday` is 0 for Sunday.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub date: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Build a value from its calendar fields, deriving the weekday.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] if any field is out of range for the RTC
    /// (years 2000..=2099).
    pub fn new<E>(
        year: u16,
        month: u8,
        date: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Error<E>> {
        let dt = Self {
            year,
            month,
            date,
            weekday: day_of_week(year, month, date),
            hour,
            minute,
            second,
        };
        if dt.is_valid() {
            Ok(dt)
        } else {
            Err(Error::InvalidTime)
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (2000..=2099).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=days_in_month(self.year, self.month)).contains(&self.date)
            && self.weekday <= 6
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
    }
}

/// ISO-8601, `2024-03-05T14:07:09`.
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.date, self.hour, self.minute, self.second
        )
    }
}

/// Day of the week for a Gregorian date, 0 = Sunday.
#[must_use]
pub fn day_of_week(year: u16, month: u8, date: u8) -> u8 {
    const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 3 { year.saturating_sub(1) } else { year };
    let offset = OFFSETS
        .get(usize::from(month.saturating_sub(1)))
        .copied()
        .unwrap_or(0);
    let days = y + y / 4 - y / 100 + y / 400 + offset + u16::from(date);
    // Always < 7.
    (days % 7) as u8
}

#[must_use]
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Hour register value for a 24-hour `hour`.
#[must_use]
pub const fn encode_hours(hour: u8, twelve_hour: bool) -> u8 {
    if !twelve_hour {
        return dec_to_bcd(hour);
    }
    let pm = if hour >= 12 { HOURS_PM } else { 0 };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    dec_to_bcd(h12) | pm
}

/// 24-hour value of an hour register.
#[must_use]
pub const fn decode_hours(raw: u8, twelve_hour: bool) -> u8 {
    if !twelve_hour {
        return bcd_to_dec(raw & HOURS_24_MASK);
    }
    let h12 = bcd_to_dec(raw & HOURS_12_MASK) % 12;
    if raw & HOURS_PM != 0 {
        h12 + 12
    } else {
        h12
    }
}

const fn year_in_century(year: u16) -> u8 {
    // Always < 100.
    (year % 100) as u8
}

/// Parse a compile-time stamp: `date` as `"Mmm dd yyyy"` (day may be space
/// padded, `"Mar  5 2024"`) and `time` as `"hh:mm:ss"`.
///
/// # Errors
///
/// [`Error::InvalidTime`] if either string is malformed or out of range.
pub fn parse_build_timestamp<E>(date: &str, time: &str) -> Result<DateTime, Error<E>> {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let mut parts = date.split_whitespace();
    let (Some(month), Some(day), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::InvalidTime);
    };
    let month = MONTHS
        .iter()
        .position(|m| *m == month)
        .and_then(|i| u8::try_from(i + 1).ok())
        .ok_or(Error::<E>::InvalidTime)?;
    let day: u8 = day.parse().map_err(|_| Error::<E>::InvalidTime)?;
    let year: u16 = year.parse().map_err(|_| Error::<E>::InvalidTime)?;

    let mut fields = time.split(':').map(str::parse::<u8>);
    let (Some(Ok(hour)), Some(Ok(minute)), Some(Ok(second)), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::InvalidTime);
    };

    DateTime::new(year, month, day, hour, minute, second)
}
