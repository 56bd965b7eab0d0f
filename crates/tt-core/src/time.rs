//! Weekdays, clock times and weekly meeting slots.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TimetableError};

/// Minutes in one day; the largest valid [`ClockTime`].
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Day of the week, numbered 1 (Monday) to 7 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    /// Day 1.
    Monday,
    /// Day 2.
    Tuesday,
    /// Day 3.
    Wednesday,
    /// Day 4.
    Thursday,
    /// Day 5.
    Friday,
    /// Day 6.
    Saturday,
    /// Day 7.
    Sunday,
}

impl Weekday {
    /// All days in week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Resolves a day from its 1-based number.
    pub fn from_number(number: u8) -> Result<Self, TimetableError> {
        match number {
            1..=7 => Ok(Self::ALL[usize::from(number - 1)]),
            other => Err(TimetableError::Data(
                ErrorInfo::new("weekday-range", "weekday must be within 1..=7")
                    .with_context("value", other.to_string()),
            )),
        }
    }

    /// Returns the 1-based day number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Three letter English abbreviation.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = TimetableError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::from_number(value)
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.number()
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Wall-clock time within a day, stored as minutes after midnight.
///
/// `24:00` is accepted so a slot may end exactly at midnight; nothing later is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Builds a time from hours and minutes.
    pub fn hm(hours: u16, minutes: u16) -> Result<Self, TimetableError> {
        if minutes >= 60 {
            return Err(TimetableError::Data(
                ErrorInfo::new("clock-minutes", "minutes must be below 60")
                    .with_context("minutes", minutes.to_string()),
            ));
        }
        Self::from_minutes(hours.saturating_mul(60).saturating_add(minutes))
    }

    /// Builds a time from minutes after midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, TimetableError> {
        if minutes > MINUTES_PER_DAY {
            return Err(TimetableError::Data(
                ErrorInfo::new("clock-range", "time must not exceed 24:00")
                    .with_context("minutes", minutes.to_string()),
            ));
        }
        Ok(Self(minutes))
    }

    /// Parses `"HH:MM"` (a `.` separator is accepted as well).
    pub fn parse(text: &str) -> Result<Self, TimetableError> {
        let malformed = || {
            TimetableError::Data(
                ErrorInfo::new("clock-parse", "expected a time formatted as HH:MM")
                    .with_context("input", text),
            )
        };
        let trimmed = text.trim();
        let (hours, minutes) = trimmed
            .split_once(':')
            .or_else(|| trimmed.split_once('.'))
            .ok_or_else(malformed)?;
        let hours: u16 = hours.trim().parse().map_err(|_| malformed())?;
        let minutes: u16 = minutes.trim().parse().map_err(|_| malformed())?;
        Self::hm(hours, minutes)
    }

    /// Minutes after midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClockTime::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One weekly meeting: a day and a half-open `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Meeting day.
    pub day: Weekday,
    /// Inclusive start time.
    pub start: ClockTime,
    /// Exclusive end time.
    pub end: ClockTime,
}

impl TimeSlot {
    /// Creates a validated slot.
    pub fn new(day: Weekday, start: ClockTime, end: ClockTime) -> Result<Self, TimetableError> {
        let slot = Self { day, start, end };
        slot.validate()?;
        Ok(slot)
    }

    /// Parses `"<day> HH:MM-HH:MM"` where `<day>` is 1..=7.
    pub fn parse(day: u8, range: &str) -> Result<Self, TimetableError> {
        let (start, end) = range.split_once('-').ok_or_else(|| {
            TimetableError::Data(
                ErrorInfo::new("slot-parse", "expected a range formatted as HH:MM-HH:MM")
                    .with_context("input", range),
            )
        })?;
        Self::new(
            Weekday::from_number(day)?,
            ClockTime::parse(start)?,
            ClockTime::parse(end)?,
        )
    }

    /// Checks `start < end`; both ends are already bounded to a single day.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.start >= self.end {
            return Err(TimetableError::Data(
                ErrorInfo::new("slot-order", "slot start must precede its end")
                    .with_context("slot", self.to_string()),
            ));
        }
        Ok(())
    }

    /// Length of the meeting in minutes.
    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes().saturating_sub(self.start.minutes()))
    }

    /// True when both slots share a day and their intervals intersect.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}
