//! # Slot and Day-Mask Arithmetic
//!
//! The engine discretizes a day into 288 five-minute slots and addresses
//! weekdays through 7-character binary masks. This module holds the pure
//! conversions between human-readable clock times / day names and that
//! positional encoding. The approach is to accept input that is not
//! technically in spec, as long as it is still reasonable: an inverted range
//! clamps to a single slot instead of failing the whole problem.
//!
//! Bit 0 of a day mask is **Monday**, bit 6 is Sunday. Historical encoder
//! revisions disagreed on this; the convention here matches the one the
//! engine-side decoder uses and must be changed on both sides or not at all.

use std::{fmt, str::FromStr};

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, verify},
    sequence::separated_pair,
    IResult,
};
use thiserror::Error;

/// Number of five-minute slots in a day
pub const SLOTS_PER_DAY: u32 = 288;

/// Width of a slot in minutes
pub const MINUTES_PER_SLOT: u32 = 5;

/// Slots per hour, used when rendering clock strings
pub const SLOTS_PER_HOUR: u32 = 12;

/// Weekday names in mask-bit order (bit 0 first)
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Errors from converting clock-time ranges to slots
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum InvalidTimeRange {
    /// The input does not match `H:MM-H:MM`
    #[error("time range does not match `H:MM-H:MM`: `{0}`")]
    Pattern(String),
    /// An hour component is 24 or more
    #[error("hour out of range in `{0}`")]
    Hour(String),
    /// A minute component is 60 or more
    #[error("minute out of range in `{0}`")]
    Minute(String),
}

/// Error from parsing a day-mask string
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("day mask must be exactly 7 characters of `0`/`1`: `{0}`")]
pub struct InvalidDayMask(pub String);

/// Parses one `H:MM` clock time into (hour, minute), without bounds checks
fn clock_time(input: &str) -> IResult<&str, (u32, u32)> {
    let (input, (hour, minute)) = separated_pair(
        verify(digit1, |s: &str| s.len() <= 2),
        char(':'),
        verify(digit1, |s: &str| s.len() == 2),
    )(input)?;
    // digit1 guarantees the unwraps cannot fail on <= 2 digit input
    Ok((
        input,
        (hour.parse().expect("checked digits"), minute.parse().expect("checked digits")),
    ))
}

/// Converts a clock-time range `H:MM-H:MM` to a `(start_slot, length)` pair.
///
/// The start slot is minutes-since-midnight divided by five (floor). When the
/// end does not lie after the start, or the range spans less than one slot,
/// the length clamps to one slot so that a malformed range still produces a
/// legal entry.
///
/// # Errors
///
/// [`InvalidTimeRange`] when the input does not match the pattern or a
/// component is out of range.
///
/// ```
/// assert_eq!(ttwire::slots::time_range_to_slot("7:45-9:15"), Ok((93, 18)));
/// ```
pub fn time_range_to_slot(range: &str) -> Result<(u32, u32), InvalidTimeRange> {
    let trimmed = range.trim();
    let (_, ((from_h, from_m), (to_h, to_m))) =
        all_consuming(separated_pair(clock_time, char('-'), clock_time))(trimmed)
            .map_err(|_| InvalidTimeRange::Pattern(range.to_string()))?;
    if from_h > 23 || to_h > 23 {
        return Err(InvalidTimeRange::Hour(range.to_string()));
    }
    if from_m > 59 || to_m > 59 {
        return Err(InvalidTimeRange::Minute(range.to_string()));
    }
    let start_min = from_h * 60 + from_m;
    let end_min = to_h * 60 + to_m;
    let start = start_min / MINUTES_PER_SLOT;
    let length = if end_min > start_min {
        ((end_min - start_min) / MINUTES_PER_SLOT).max(1)
    } else {
        1
    };
    Ok((start, length))
}

/// Returns the mask-bit index of a weekday name, matched case-insensitively
pub fn day_index(name: &str) -> Option<usize> {
    DAY_NAMES.iter().position(|d| d.eq_ignore_ascii_case(name))
}

/// A 7-bit weekday mask, Monday first
///
/// Renders as the engine's 7-character binary string via [`fmt::Display`] and
/// parses back via [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DayMask(u8);

impl DayMask {
    /// The empty mask
    #[must_use]
    pub fn empty() -> DayMask {
        DayMask(0)
    }

    /// A mask with only the given bit set
    ///
    /// Indices of 7 or above are ignored.
    #[must_use]
    pub fn single(day: usize) -> DayMask {
        let mut mask = DayMask(0);
        mask.set(day);
        mask
    }

    /// Builds a mask from weekday names, matched case-insensitively
    ///
    /// Unknown names are ignored; the engine side has no representation for
    /// them.
    pub fn from_days<'a, I>(days: I) -> DayMask
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mask = DayMask(0);
        for day in days {
            if let Some(idx) = day_index(day) {
                mask.set(idx);
            }
        }
        mask
    }

    /// Sets the bit for a day index; indices of 7 or above are ignored
    pub fn set(&mut self, day: usize) {
        if day < 7 {
            self.0 |= 1 << day;
        }
    }

    /// Whether the bit for a day index is set
    #[must_use]
    pub fn contains(self, day: usize) -> bool {
        day < 7 && self.0 & (1 << day) != 0
    }

    /// Whether no day is selected
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The selected weekday names in Monday..Sunday order
    #[must_use]
    pub fn day_names(self) -> Vec<&'static str> {
        (0..7)
            .filter(|&idx| self.contains(idx))
            .map(|idx| DAY_NAMES[idx])
            .collect()
    }
}

impl fmt::Display for DayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in 0..7 {
            write!(f, "{}", u8::from(self.contains(idx)))?;
        }
        Ok(())
    }
}

impl FromStr for DayMask {
    type Err = InvalidDayMask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != 7 {
            return Err(InvalidDayMask(s.to_string()));
        }
        let mut mask = DayMask(0);
        for (idx, c) in s.chars().enumerate() {
            match c {
                '1' => mask.set(idx),
                '0' => (),
                _ => return Err(InvalidDayMask(s.to_string())),
            }
        }
        Ok(mask)
    }
}

/// Renders a slot index as a 12-hour clock string, e.g. `7:30 AM`
///
/// Slot indices at or above [`SLOTS_PER_DAY`] wrap into the next day, which
/// only occurs for end times of entries running past midnight.
#[must_use]
pub fn slot_to_clock(slot: u32) -> String {
    let hour = (slot / SLOTS_PER_HOUR) % 24;
    let minute = (slot % SLOTS_PER_HOUR) * MINUTES_PER_SLOT;
    let period = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

#[cfg(test)]
mod tests {
    use super::{
        day_index, slot_to_clock, time_range_to_slot, DayMask, InvalidDayMask, InvalidTimeRange,
    };
    use std::str::FromStr;

    #[test]
    fn range_pass() {
        assert_eq!(time_range_to_slot("7:45-9:15"), Ok((93, 18)));
        assert_eq!(time_range_to_slot("0:00-0:05"), Ok((0, 1)));
        assert_eq!(time_range_to_slot("12:00-13:30"), Ok((144, 18)));
        assert_eq!(time_range_to_slot("23:00-23:55"), Ok((276, 11)));
        // surrounding whitespace is tolerated
        assert_eq!(time_range_to_slot(" 7:45-9:15 "), Ok((93, 18)));
    }

    #[test]
    fn range_clamps_inverted() {
        assert_eq!(time_range_to_slot("9:15-9:15"), Ok((111, 1)));
        assert_eq!(time_range_to_slot("9:15-7:45"), Ok((111, 1)));
        // shorter than one slot also clamps
        assert_eq!(time_range_to_slot("9:15-9:17"), Ok((111, 1)));
    }

    #[test]
    fn range_fail() {
        assert_eq!(
            time_range_to_slot("7:45"),
            Err(InvalidTimeRange::Pattern("7:45".to_string()))
        );
        assert_eq!(
            time_range_to_slot("745-915"),
            Err(InvalidTimeRange::Pattern("745-915".to_string()))
        );
        assert_eq!(
            time_range_to_slot("7:4-9:15"),
            Err(InvalidTimeRange::Pattern("7:4-9:15".to_string()))
        );
        assert_eq!(
            time_range_to_slot("25:00-26:00"),
            Err(InvalidTimeRange::Hour("25:00-26:00".to_string()))
        );
        assert_eq!(
            time_range_to_slot("7:45-9:75"),
            Err(InvalidTimeRange::Minute("7:45-9:75".to_string()))
        );
        assert_eq!(
            time_range_to_slot(""),
            Err(InvalidTimeRange::Pattern(String::new()))
        );
    }

    #[test]
    fn mask_from_days() {
        let mask = DayMask::from_days(["Monday", "Wednesday", "Friday"]);
        assert_eq!(mask.to_string(), "1010100");
        let mask = DayMask::from_days(["tuesday", "THURSDAY"]);
        assert_eq!(mask.to_string(), "0101000");
        // unknown names are dropped
        let mask = DayMask::from_days(["Monday", "Moonday"]);
        assert_eq!(mask.to_string(), "1000000");
    }

    #[test]
    fn mask_round_trip() {
        let mask = DayMask::from_str("1000100").unwrap();
        assert_eq!(mask.day_names(), vec!["Monday", "Friday"]);
        assert_eq!(mask.to_string(), "1000100");
        assert!(DayMask::from_str("0000000").unwrap().is_empty());
    }

    #[test]
    fn mask_fail() {
        assert_eq!(
            DayMask::from_str("101010"),
            Err(InvalidDayMask("101010".to_string()))
        );
        assert_eq!(
            DayMask::from_str("10101000"),
            Err(InvalidDayMask("10101000".to_string()))
        );
        assert_eq!(
            DayMask::from_str("10a0100"),
            Err(InvalidDayMask("10a0100".to_string()))
        );
    }

    #[test]
    fn clock_rendering() {
        assert_eq!(slot_to_clock(90), "7:30 AM");
        assert_eq!(slot_to_clock(0), "12:00 AM");
        assert_eq!(slot_to_clock(144), "12:00 PM");
        assert_eq!(slot_to_clock(287), "11:55 PM");
        assert_eq!(slot_to_clock(93), "7:45 AM");
    }

    #[test]
    fn day_lookup() {
        assert_eq!(day_index("Monday"), Some(0));
        assert_eq!(day_index("sunday"), Some(6));
        assert_eq!(day_index("Mon"), None);
    }
}
