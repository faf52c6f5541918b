// Licensed under the Apache-2.0 license

//! RV-3028-C7 real-time clock.
//!
//! The driver caches the SECONDS..=YEAR block. [`Rv3028::update_time`] refreshes
//! the cache from the device; every setter edits the cache and writes the whole
//! block back in one transaction, so call `update_time` before a field setter
//! or the other fields are overwritten with stale values.

use crate::common::{Logger, NoOpLogger};
use crate::error::Error;
use crate::i2c::traits::RegisterAccess;
use crate::rtc::bcd::{bcd_to_dec, dec_to_bcd};
use crate::rtc::registers::{self, ALARM_DISABLE, HOURS_PM};
use crate::rtc::time::{
    decode_hours, encode_hours, parse_build_timestamp, DateTime, TimeRegisters,
};
use embedded_hal::i2c::I2c;
use paste::paste;
use zerocopy::IntoBytes;

/// Day part of an alarm. The RTC matches either a weekday or a date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmDay {
    /// 0 = Sunday.
    Weekday(u8),
    Date(u8),
}

/// Alarm match fields. `None` leaves a field out of the comparison, so an
/// alarm with only `minute` set fires once an hour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Alarm {
    pub minute: Option<u8>,
    /// 24-hour form; converted to the device's current hour mode.
    pub hour: Option<u8>,
    pub day: Option<AlarmDay>,
}

impl Alarm {
    fn is_valid(&self) -> bool {
        self.minute.map_or(true, |m| m <= 59)
            && self.hour.map_or(true, |h| h <= 23)
            && match self.day {
                None => true,
                Some(AlarmDay::Weekday(d)) => d <= 6,
                Some(AlarmDay::Date(d)) => (1..=31).contains(&d),
            }
    }
}

pub struct Rv3028<I2C, L: Logger = NoOpLogger> {
    i2c: I2C,
    address: u8,
    time: TimeRegisters,
    twelve_hour: bool,
    logger: L,
}

impl<I2C: I2c> Rv3028<I2C, NoOpLogger> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, registers::DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self::with_logger(i2c, address, NoOpLogger)
    }
}

impl<I2C: I2c, L: Logger> Rv3028<I2C, L> {
    pub fn with_logger(i2c: I2C, address: u8, logger: L) -> Self {
        Self {
            i2c,
            address,
            time: TimeRegisters::default(),
            twelve_hour: false,
            logger,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Refresh the cached time block and hour mode from the device.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure; the cache is left untouched.
    pub fn update_time(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut block = TimeRegisters::default();
        self.i2c
            .read_register_region(self.address, registers::SECONDS, block.as_mut_bytes())?;
        let ctrl2 = self.i2c.read_register(self.address, registers::CTRL2)?;
        self.time = block;
        self.twelve_hour = ctrl2 & registers::CTRL2_12_24 != 0;
        Ok(())
    }

    /// Cached time in 24-hour form.
    pub fn date_time(&self) -> DateTime {
        self.time.decode(self.twelve_hour)
    }

    /// Cached hour as the device shows it: `1..=12` in 12-hour mode.
    pub fn hours(&self) -> u8 {
        if self.twelve_hour {
            bcd_to_dec(self.time.hours & registers::HOURS_12_MASK)
        } else {
            self.hours_24()
        }
    }

    pub fn hours_24(&self) -> u8 {
        decode_hours(self.time.hours, self.twelve_hour)
    }

    /// Full year, `2000..=2099`.
    pub fn year(&self) -> u16 {
        2000 + u16::from(bcd_to_dec(self.time.year))
    }

    /// Set the hour from its 24-hour value and rewrite the time block.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] above 23, without bus traffic.
    pub fn set_hours(&mut self, hour: u8) -> Result<(), Error<I2C::Error>> {
        if hour > 23 {
            return Err(Error::InvalidTime);
        }
        let twelve_hour = self.refresh_hour_mode()?;
        self.time.hours = encode_hours(hour, twelve_hour);
        self.write_time()
    }

    /// # Errors
    ///
    /// [`Error::InvalidTime`] outside `2000..=2099`, without bus traffic.
    pub fn set_year(&mut self, year: u16) -> Result<(), Error<I2C::Error>> {
        let year = year
            .checked_sub(2000)
            .and_then(|y| u8::try_from(y).ok())
            .filter(|y| *y <= 99)
            .ok_or(Error::<I2C::Error>::InvalidTime)?;
        self.refresh_hour_mode()?;
        self.time.year = dec_to_bcd(year);
        self.write_time()
    }

    /// Write a complete date and time.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] if `dt` is not a valid RTC date, without bus
    /// traffic.
    pub fn set_time(&mut self, dt: &DateTime) -> Result<(), Error<I2C::Error>> {
        if !dt.is_valid() {
            return Err(Error::InvalidTime);
        }
        let twelve_hour = self.is_12_hour()?;
        self.time = TimeRegisters::encode(dt, twelve_hour);
        self.write_time()?;
        self.logger.debug(format_args!("RV-3028 time set to {dt}"));
        Ok(())
    }

    /// Set the clock from compiler-style stamps, `"Mmm dd yyyy"` and
    /// `"hh:mm:ss"`. The weekday is derived from the date.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] if either stamp does not parse.
    pub fn set_to_build_time(&mut self, date: &str, time: &str) -> Result<(), Error<I2C::Error>> {
        let dt = parse_build_timestamp::<I2C::Error>(date, time).inspect_err(|_| {
            self.logger.warn(format_args!(
                "RV-3028 build timestamp {date:?} {time:?} rejected"
            ));
        })?;
        self.set_time(&dt)
    }

    /// Reads the mode bit from the device.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn is_12_hour(&mut self) -> Result<bool, Error<I2C::Error>> {
        let ctrl2 = self.i2c.read_register(self.address, registers::CTRL2)?;
        self.twelve_hour = ctrl2 & registers::CTRL2_12_24 != 0;
        Ok(self.twelve_hour)
    }

    /// PM according to the cached hour.
    pub fn is_pm(&self) -> bool {
        if self.twelve_hour {
            self.time.hours & HOURS_PM != 0
        } else {
            self.hours_24() >= 12
        }
    }

    /// Switch to 12-hour mode, converting the stored hour and alarm hour.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn set_12_hour(&mut self) -> Result<(), Error<I2C::Error>> {
        self.switch_hour_mode(true)
    }

    /// Switch to 24-hour mode, converting the stored hour and alarm hour.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn set_24_hour(&mut self) -> Result<(), Error<I2C::Error>> {
        self.switch_hour_mode(false)
    }

    /// Program the alarm match registers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTime`] for out of range fields, without bus traffic.
    pub fn set_alarm(&mut self, alarm: &Alarm) -> Result<(), Error<I2C::Error>> {
        if !alarm.is_valid() {
            return Err(Error::InvalidTime);
        }
        let twelve_hour = self.is_12_hour()?;

        let minute = alarm.minute.map_or(ALARM_DISABLE, dec_to_bcd);
        let hour = alarm
            .hour
            .map_or(ALARM_DISABLE, |h| encode_hours(h, twelve_hour));
        let (day, by_date) = match alarm.day {
            None => (ALARM_DISABLE, false),
            Some(AlarmDay::Weekday(d)) => (d, false),
            Some(AlarmDay::Date(d)) => (dec_to_bcd(d), true),
        };

        self.i2c.write_multiple_registers(
            self.address,
            registers::MINUTES_ALARM,
            &[minute, hour, day],
        )?;
        if by_date {
            self.modify_register(registers::CTRL1, 0, registers::CTRL1_WADA)
        } else {
            self.modify_register(registers::CTRL1, registers::CTRL1_WADA, 0)
        }
    }

    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn enable_alarm_interrupt(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_register(registers::CTRL2, 0, registers::CTRL2_AIE)
    }

    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn disable_alarm_interrupt(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_register(registers::CTRL2, registers::CTRL2_AIE, 0)
    }

    /// True once the alarm has matched, until cleared.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn read_alarm_flag(&mut self) -> Result<bool, Error<I2C::Error>> {
        let status = self.i2c.read_register(self.address, registers::STATUS)?;
        Ok(status & registers::STATUS_AF != 0)
    }

    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn clear_alarm_flag(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_register(registers::STATUS, registers::STATUS_AF, 0)
    }

    /// Re-read the mode bit and re-encode the cached hour if the device
    /// changed mode since the cache was filled.
    fn refresh_hour_mode(&mut self) -> Result<bool, Error<I2C::Error>> {
        let cached = self.twelve_hour;
        let current = self.is_12_hour()?;
        if current != cached {
            self.time.hours = encode_hours(decode_hours(self.time.hours, cached), current);
        }
        Ok(current)
    }

    fn write_time(&mut self) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_multiple_registers(self.address, registers::SECONDS, self.time.as_bytes())
    }

    fn modify_register(&mut self, offset: u8, clear: u8, set: u8) -> Result<(), Error<I2C::Error>> {
        let value = self.i2c.read_register(self.address, offset)?;
        self.i2c
            .write_register(self.address, offset, (value & !clear) | set)
    }

    fn switch_hour_mode(&mut self, twelve_hour: bool) -> Result<(), Error<I2C::Error>> {
        let current = self.is_12_hour()?;
        if current == twelve_hour {
            return Ok(());
        }

        let hours = self.i2c.read_register(self.address, registers::HOURS)?;
        let alarm = self.i2c.read_register(self.address, registers::HOURS_ALARM)?;

        let (clear, set) = if twelve_hour {
            (0, registers::CTRL2_12_24)
        } else {
            (registers::CTRL2_12_24, 0)
        };
        self.modify_register(registers::CTRL2, clear, set)?;
        self.twelve_hour = twelve_hour;

        let hours = encode_hours(decode_hours(hours, current), twelve_hour);
        self.i2c.write_register(self.address, registers::HOURS, hours)?;
        self.time.hours = hours;

        if alarm & ALARM_DISABLE == 0 {
            let alarm = encode_hours(decode_hours(alarm, current), twelve_hour);
            self.i2c
                .write_register(self.address, registers::HOURS_ALARM, alarm)?;
        }

        self.logger.debug(format_args!(
            "RV-3028 switched to {}-hour mode",
            if twelve_hour { 12 } else { 24 }
        ));
        Ok(())
    }
}

/// Getter for a cached BCD field and a setter that validates the range and
/// rewrites the whole block.
macro_rules! impl_time_field {
    ($field:ident, $range:expr) => {
        paste! {
            impl<I2C: I2c, L: Logger> Rv3028<I2C, L> {
                #[doc = concat!("Cached ", stringify!($field), ".")]
                pub fn $field(&self) -> u8 {
                    bcd_to_dec(self.time.$field)
                }

                #[doc = concat!("Set ", stringify!($field), " and rewrite the time block.")]
                ///
                /// # Errors
                ///
                /// [`Error::InvalidTime`] if out of range, without bus traffic.
                pub fn [<set_ $field>](&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
                    if !($range).contains(&value) {
                        return Err(Error::InvalidTime);
                    }
                    self.refresh_hour_mode()?;
                    self.time.$field = dec_to_bcd(value);
                    self.write_time()
                }
            }
        }
    };
}

impl_time_field!(seconds, 0..=59);
impl_time_field!(minutes, 0..=59);
impl_time_field!(weekday, 0..=6);
impl_time_field!(date, 1..=31);
impl_time_field!(month, 1..=12);
