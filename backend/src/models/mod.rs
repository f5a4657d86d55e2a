//! Domain models for flight listings.
//!
//! Each semi-structured text field of a listing has a typed counterpart here
//! with an explicit parse function:
//!
//! - [`JourneyDate`] - `D/M/Y` journey date
//! - [`ClockTime`] - `H:M` departure/arrival time
//! - [`FlightDuration`] - free-text duration such as `2h 50m`
//! - [`TotalStops`] - stop-count vocabulary

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Column names of the flight listing dataset.
pub mod columns {
    // Raw text columns
    pub const DATE_OF_JOURNEY: &str = "Date_of_Journey";
    pub const ARRIVAL_TIME: &str = "Arrival_Time";
    pub const DEP_TIME: &str = "Dep_Time";
    pub const DURATION: &str = "Duration";
    pub const TOTAL_STOPS: &str = "Total_Stops";
    pub const ROUTE: &str = "Route";
    pub const AIRLINE: &str = "Airline";
    pub const SOURCE: &str = "Source";
    pub const DESTINATION: &str = "Destination";

    // Derived columns
    pub const DATE: &str = "Date";
    pub const MONTH: &str = "Month";
    pub const YEAR: &str = "Year";
    pub const ARRIVAL_HOUR: &str = "Arrival_hour";
    pub const ARRIVAL_MIN: &str = "Arrival_min";
    pub const DEPT_HOUR: &str = "Dept_hour";
    pub const DEPT_MIN: &str = "Dept_min";
    pub const DUR_HOUR: &str = "Dur_hour";
    pub const DUR_MIN: &str = "Dur_min";

    // Optional columns used by the summary report
    pub const CLASS: &str = "Class";
    pub const PRICE: &str = "Price";

    /// Columns that must be present before any stage runs.
    pub const REQUIRED: [&str; 9] = [
        DATE_OF_JOURNEY,
        ARRIVAL_TIME,
        DEP_TIME,
        DURATION,
        TOTAL_STOPS,
        ROUTE,
        AIRLINE,
        SOURCE,
        DESTINATION,
    ];

    /// Nominal columns that get one-hot encoded.
    pub const NOMINAL: [&str; 3] = [AIRLINE, SOURCE, DESTINATION];
}

/// A value did not have the shape its field requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}")]
pub struct ShapeError {
    pub expected: &'static str,
}

impl ShapeError {
    fn new(expected: &'static str) -> Self {
        Self { expected }
    }
}

fn parse_component(token: &str, expected: &'static str) -> Result<u32, ShapeError> {
    let token = token.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(ShapeError::new(expected));
    }
    token.parse::<u32>().map_err(|_| ShapeError::new(expected))
}

// =============================================================================
// Journey date
// =============================================================================

/// Journey date split from a `D/M/Y` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl JourneyDate {
    pub const SHAPE: &'static str = "D/M/Y";

    /// Parse `D/M/Y`: exactly three slash-separated numeric tokens.
    pub fn parse(raw: &str) -> Result<Self, ShapeError> {
        let parts: Vec<&str> = raw.trim().split('/').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(ShapeError::new(Self::SHAPE));
        };

        Ok(Self {
            day: parse_component(day, Self::SHAPE)?,
            month: parse_component(month, Self::SHAPE)?,
            year: parse_component(year, Self::SHAPE)?,
        })
    }
}

// =============================================================================
// Clock time
// =============================================================================

/// Hour and minute of a departure or arrival.
///
/// No clock-range check: `25:75` is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub const SHAPE: &'static str = "H:M";
    pub const ARRIVAL_SHAPE: &'static str = "H:M optionally followed by a date";

    /// Parse a strict `H:M` value.
    pub fn parse(raw: &str) -> Result<Self, ShapeError> {
        Self::parse_with(raw.trim(), Self::SHAPE)
    }

    /// Parse the leading `H:M` token of an arrival value, discarding any
    /// trailing date fragment (`"01:10 22 Mar"`).
    pub fn parse_leading(raw: &str) -> Result<Self, ShapeError> {
        let token = raw.split_whitespace().next().unwrap_or("");
        Self::parse_with(token, Self::ARRIVAL_SHAPE)
    }

    fn parse_with(token: &str, expected: &'static str) -> Result<Self, ShapeError> {
        let (hour, minute) = token.split_once(':').ok_or(ShapeError::new(expected))?;
        if minute.contains(':') {
            return Err(ShapeError::new(expected));
        }
        Ok(Self {
            hour: parse_component(hour, expected)?,
            minute: parse_component(minute, expected)?,
        })
    }
}

// =============================================================================
// Flight duration
// =============================================================================

const HOUR_MARKER: char = 'h';
const MINUTE_MARKER: char = 'm';

static HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)h").expect("valid hours pattern"));
static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)m").expect("valid minutes pattern"));

/// Duration normalized from free text (`"2h 50m"`, `"2h"`, `"50m"`, missing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl FlightDuration {
    /// Normalize a possibly-missing duration. Never fails: anything that
    /// cannot be read defaults to zero.
    pub fn normalize(raw: Option<&str>) -> Self {
        let text = Self::complete_markers(raw);
        Self {
            hours: extract_leading_number(&HOURS_RE, &text),
            minutes: extract_leading_number(&MINUTES_RE, &text),
        }
    }

    /// Rewrite a raw value so both the hour and minute halves are present.
    ///
    /// ```ignore
    /// assert_eq!(FlightDuration::complete_markers(Some("50m")), "0h 50m");
    /// assert_eq!(FlightDuration::complete_markers(Some("2h")), "2h 0m");
    /// assert_eq!(FlightDuration::complete_markers(None), "0h 0m");
    /// ```
    pub fn complete_markers(raw: Option<&str>) -> String {
        let mut text = raw.unwrap_or("0h 0m").trim().to_string();
        if !text.contains(HOUR_MARKER) {
            text = format!("0{HOUR_MARKER} {text}");
        }
        if !text.contains(MINUTE_MARKER) {
            text = format!("{text} 0{MINUTE_MARKER}");
        }
        text
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }
}

fn extract_leading_number(re: &Regex, text: &str) -> u32 {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

// =============================================================================
// Total stops
// =============================================================================

/// Number of stops of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TotalStops {
    NonStop,
    One,
    Two,
    Three,
    Four,
}

impl TotalStops {
    /// Ordinal used when the stop count is missing.
    ///
    /// Unknown counts are treated as one stop, the most common case in the
    /// source data, not as non-stop.
    pub const MISSING: TotalStops = TotalStops::One;

    pub const VOCABULARY: [(&'static str, TotalStops); 5] = [
        ("non-stop", TotalStops::NonStop),
        ("1 stop", TotalStops::One),
        ("2 stops", TotalStops::Two),
        ("3 stops", TotalStops::Three),
        ("4 stops", TotalStops::Four),
    ];

    /// Parse a vocabulary phrase. Returns `None` for anything outside it.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::VOCABULARY
            .iter()
            .find(|(phrase, _)| *phrase == raw)
            .map(|(_, stops)| *stops)
    }

    /// Parse a possibly-missing cell, substituting [`Self::MISSING`] for null.
    pub fn from_cell(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some(text) => Self::parse(text),
            None => Some(Self::MISSING),
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            TotalStops::NonStop => 0,
            TotalStops::One => 1,
            TotalStops::Two => 2,
            TotalStops::Three => 3,
            TotalStops::Four => 4,
        }
    }

    pub fn phrase(self) -> &'static str {
        Self::VOCABULARY
            .iter()
            .find(|(_, stops)| *stops == self)
            .map(|(phrase, _)| *phrase)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for TotalStops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
