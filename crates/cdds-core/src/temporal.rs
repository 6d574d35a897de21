//! # Temporal Types — 360-Day Model Calendar
//!
//! Climate model output is produced on a 360-day calendar: twelve months of
//! thirty days each. `ModelDate` is a point on that calendar and
//! `TimeRange` a half-open `[start, end)` interval between two points.
//!
//! ## Invariant
//!
//! A `TimeRange` always has `start < end`. Ranges that merely touch
//! (`a.end == b.start`) do not overlap. Only touching ranges extend one
//! another: a later range separated by a gap neither overlaps nor continues.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ─── Model Calendar ──────────────────────────────────────────────────

const DAYS_PER_YEAR: i64 = 360;
const DAYS_PER_MONTH: i64 = 30;
const SECONDS_PER_DAY: i64 = 86_400;

/// A point in time on the 360-day model calendar, with seconds precision.
///
/// Field order matches significance, so the derived ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelDate {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl ModelDate {
    /// Midnight on the given day.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        Self::with_time(year, month, day, 0, 0, 0)
    }

    /// A fully specified point on the model calendar.
    pub fn with_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, ValidationError> {
        let valid = (1..=12).contains(&month)
            && (1..=30).contains(&day)
            && hour < 24
            && minute < 60
            && second < 60;
        if !valid {
            return Err(ValidationError::InvalidModelDate {
                year,
                month,
                day,
                hour,
                minute,
            });
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// The first instant of the given year.
    pub fn year_start(year: i32) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day component (1-30).
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Minute component (0-59).
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Seconds since the model calendar epoch (year 0).
    pub fn to_seconds(&self) -> i64 {
        let days = i64::from(self.year) * DAYS_PER_YEAR
            + i64::from(self.month - 1) * DAYS_PER_MONTH
            + i64::from(self.day - 1);
        days * SECONDS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Inverse of [`ModelDate::to_seconds`].
    pub fn from_seconds(total: i64) -> Self {
        let days = total.div_euclid(SECONDS_PER_DAY);
        let secs = total.rem_euclid(SECONDS_PER_DAY);
        let year = days.div_euclid(DAYS_PER_YEAR);
        let day_of_year = days.rem_euclid(DAYS_PER_YEAR);
        // All narrowing casts below are bounded by the moduli above.
        Self {
            year: year as i32,
            month: (day_of_year / DAYS_PER_MONTH) as u32 + 1,
            day: (day_of_year % DAYS_PER_MONTH) as u32 + 1,
            hour: (secs / 3600) as u32,
            minute: ((secs % 3600) / 60) as u32,
            second: (secs % 60) as u32,
        }
    }

    /// Shift forward (or backward, for negative values) by days and seconds.
    pub fn shifted(&self, days: i64, seconds: i64) -> Self {
        Self::from_seconds(self.to_seconds() + days * SECONDS_PER_DAY + seconds)
    }
}

impl std::fmt::Display for ModelDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.hour != 0 || self.minute != 0 || self.second != 0 {
            write!(f, "T{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        }
        Ok(())
    }
}

// ─── Time Ranges ─────────────────────────────────────────────────────

/// A half-open `[start, end)` interval on the model calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: ModelDate,
    end: ModelDate,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: ModelDate,
    end: ModelDate,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ValidationError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTimeRange`] unless `start < end`.
    pub fn new(start: ModelDate, end: ModelDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Whole model years `[start_year, end_year)`.
    pub fn years(start_year: i32, end_year: i32) -> Result<Self, ValidationError> {
        Self::new(
            ModelDate::year_start(start_year),
            ModelDate::year_start(end_year),
        )
    }

    /// Inclusive start.
    pub fn start(&self) -> ModelDate {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> ModelDate {
        self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one instant.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this range starts exactly where `other` ends.
    pub fn continues(&self, other: &TimeRange) -> bool {
        self.start == other.end
    }

    /// Whether this range ends exactly where `other` starts.
    pub fn leads_into(&self, other: &TimeRange) -> bool {
        self.end == other.start
    }

    /// The smallest range covering both.
    pub fn hull(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ─── Frequencies ─────────────────────────────────────────────────────

/// Output frequency of a MIP variable.
///
/// The frequency fixes how dates are written in output file names and how
/// long the final period of a file lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Yearly means.
    #[serde(rename = "yr")]
    Yr,
    /// Yearly instantaneous.
    #[serde(rename = "yrPt")]
    YrPt,
    /// Decadal.
    #[serde(rename = "dec")]
    Dec,
    /// Monthly means.
    #[serde(rename = "mon")]
    Mon,
    /// Monthly climatology.
    #[serde(rename = "monC")]
    MonC,
    /// Daily.
    #[serde(rename = "day")]
    Day,
    /// Six-hourly means.
    #[serde(rename = "6hr")]
    SixHr,
    /// Three-hourly means.
    #[serde(rename = "3hr")]
    ThreeHr,
    /// Hourly means.
    #[serde(rename = "1hr")]
    OneHr,
    /// Hourly climatology.
    #[serde(rename = "1hrCM")]
    OneHrCm,
    /// Six-hourly instantaneous.
    #[serde(rename = "6hrPt")]
    SixHrPt,
    /// Three-hourly instantaneous.
    #[serde(rename = "3hrPt")]
    ThreeHrPt,
    /// Hourly instantaneous.
    #[serde(rename = "1hrPt")]
    OneHrPt,
    /// Sub-hourly instantaneous.
    #[serde(rename = "subhrPt")]
    SubhrPt,
}

impl Frequency {
    /// All known frequencies.
    pub const ALL: [Frequency; 14] = [
        Self::Yr,
        Self::YrPt,
        Self::Dec,
        Self::Mon,
        Self::MonC,
        Self::Day,
        Self::SixHr,
        Self::ThreeHr,
        Self::OneHr,
        Self::OneHrCm,
        Self::SixHrPt,
        Self::ThreeHrPt,
        Self::OneHrPt,
        Self::SubhrPt,
    ];

    /// The label used in data requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yr => "yr",
            Self::YrPt => "yrPt",
            Self::Dec => "dec",
            Self::Mon => "mon",
            Self::MonC => "monC",
            Self::Day => "day",
            Self::SixHr => "6hr",
            Self::ThreeHr => "3hr",
            Self::OneHr => "1hr",
            Self::OneHrCm => "1hrCM",
            Self::SixHrPt => "6hrPt",
            Self::ThreeHrPt => "3hrPt",
            Self::OneHrPt => "1hrPt",
            Self::SubhrPt => "subhrPt",
        }
    }

    /// Number of characters in a file name date stamp at this frequency.
    pub fn stamp_len(&self) -> usize {
        match self {
            Self::Yr | Self::YrPt | Self::Dec => 4,
            Self::Mon | Self::MonC => 6,
            Self::Day => 8,
            Self::SixHr
            | Self::ThreeHr
            | Self::OneHr
            | Self::OneHrCm
            | Self::SixHrPt
            | Self::ThreeHrPt
            | Self::OneHrPt => 12,
            Self::SubhrPt => 14,
        }
    }

    /// Length of the last period in a file, as `(days, seconds)`.
    ///
    /// `None` for sub-hourly data, where the step depends on the model
    /// timestep and has to be read from the file names themselves.
    pub fn step(&self) -> Option<(i64, i64)> {
        match self {
            Self::Yr | Self::YrPt | Self::Dec => Some((360, 0)),
            Self::Mon | Self::MonC => Some((30, 0)),
            Self::Day => Some((1, 0)),
            Self::SixHr | Self::SixHrPt => Some((0, 6 * 3600)),
            Self::ThreeHr | Self::ThreeHrPt => Some((0, 3 * 3600)),
            Self::OneHr | Self::OneHrCm | Self::OneHrPt => Some((0, 3600)),
            Self::SubhrPt => None,
        }
    }

    /// Parse a file name date stamp written at this frequency.
    pub fn parse_stamp(&self, stamp: &str) -> Result<ModelDate, ValidationError> {
        let invalid = || ValidationError::InvalidOutputFileName(stamp.to_string());
        if stamp.len() != self.stamp_len() || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let field = |from: usize, to: usize, default: u32| -> Result<u32, ValidationError> {
            if stamp.len() < to {
                return Ok(default);
            }
            stamp[from..to].parse().map_err(|_| invalid())
        };
        let year: i32 = stamp[0..4].parse().map_err(|_| invalid())?;
        ModelDate::with_time(
            year,
            field(4, 6, 1)?,
            field(6, 8, 1)?,
            field(8, 10, 0)?,
            field(10, 12, 0)?,
            field(12, 14, 0)?,
        )
        .map_err(|_| invalid())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownFrequency(s.to_string()))
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
