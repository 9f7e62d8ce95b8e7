//! Clock times and half-open booking intervals.
//!
//! Booking times travel as `"HH:MM"` strings. [`ClockTime`] parses them
//! strictly into minutes since midnight, and [`TimeSlot`] pairs a start
//! and an end into a non-empty half-open interval `[start, end)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

/// Time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Builds a clock time from hours and minutes.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidClockTime`] if `hour > 23` or
    /// `minute > 59`.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidClockTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Minutes elapsed since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidClockTime(s.to_string());
        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u8 = hh.parse().map_err(|_| invalid())?;
        let minute: u8 = mm.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Non-empty half-open interval `[start, end)` within one day.
///
/// Touching intervals (`10:00-11:00` and `11:00-12:00`) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct TimeSlot {
    /// Inclusive start.
    #[serde(rename = "start_time")]
    #[schema(value_type = String, example = "18:00")]
    start: ClockTime,
    /// Exclusive end.
    #[serde(rename = "end_time")]
    #[schema(value_type = String, example = "19:00")]
    end: ClockTime,
}

impl TimeSlot {
    /// Creates a slot, rejecting zero-length and inverted intervals.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTimeSlot`] if `start >= end`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::EmptyTimeSlot {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both endpoints from `"HH:MM"` strings.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidClockTime`] for a malformed endpoint
    /// and [`DomainError::EmptyTimeSlot`] if `start >= end`.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Inclusive start of the slot.
    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    /// Exclusive end of the slot.
    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    /// Returns `true` if both half-open intervals share at least one minute.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length of the slot in hours.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.end.minutes() - self.start.minutes()) / 60.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> TimeSlot {
        let Ok(slot) = TimeSlot::parse(start, end) else {
            panic!("valid slot {start}-{end}");
        };
        slot
    }

    #[test]
    fn parses_valid_clock_times() {
        assert_eq!("00:00".parse::<ClockTime>().map(ClockTime::minutes), Ok(0));
        assert_eq!("09:30".parse::<ClockTime>().map(ClockTime::minutes), Ok(570));
        assert_eq!("23:59".parse::<ClockTime>().map(ClockTime::minutes), Ok(1439));
    }

    #[test]
    fn rejects_malformed_clock_times() {
        for bad in ["24:00", "9:30", "09:60", "0930", "ab:cd", "09:3", "+9:30", ""] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn displays_zero_padded() {
        let Ok(time) = ClockTime::from_hm(7, 5) else {
            panic!("valid time");
        };
        assert_eq!(time.to_string(), "07:05");
    }

    #[test]
    fn rejects_zero_length_and_inverted_slots() {
        assert!(matches!(
            TimeSlot::parse("10:00", "10:00"),
            Err(DomainError::EmptyTimeSlot { .. })
        ));
        assert!(matches!(
            TimeSlot::parse("11:00", "10:00"),
            Err(DomainError::EmptyTimeSlot { .. })
        ));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        let a = slot("10:00", "11:00");
        let b = slot("11:00", "12:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn partial_and_nested_slots_overlap() {
        let a = slot("09:00", "10:00");
        assert!(a.overlaps(&slot("09:30", "10:30")));
        assert!(a.overlaps(&slot("08:00", "09:01")));
        assert!(a.overlaps(&slot("09:15", "09:45")));
        assert!(a.overlaps(&slot("08:00", "12:00")));
    }

    #[test]
    fn duration_in_hours() {
        assert!((slot("18:00", "19:30").duration_hours() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_as_strings() {
        let Ok(json) = serde_json::to_value(slot("18:00", "19:00")) else {
            panic!("serialization failed");
        };
        assert_eq!(json["start_time"], "18:00");
        assert_eq!(json["end_time"], "19:00");
    }
}
