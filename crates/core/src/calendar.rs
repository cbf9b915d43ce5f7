//! Fixed-offset calendar: day keys, timestamp parsing and date ranges.
//!
//! The shop reports in Indian Standard Time (UTC+05:30). A monetary event is
//! attributed to the calendar day it falls on once its instant is shifted by
//! that fixed offset; the host timezone never takes part.

use core::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};

/// UTC+05:30 in seconds.
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day bucket a record is attributed to.
///
/// `Unbucketed` renders as the empty string: the record had no usable
/// timestamp. It sorts before every dated key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayKey {
    Unbucketed,
    Day(NaiveDate),
}

impl DayKey {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DayKey::Day(d) => Some(*d),
            DayKey::Unbucketed => None,
        }
    }

    pub fn is_unbucketed(&self) -> bool {
        matches!(self, DayKey::Unbucketed)
    }

    /// Midnight UTC of the keyed day.
    pub fn midnight_utc(&self) -> Option<DateTime<Utc>> {
        self.date()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        DayKey::Day(value)
    }
}

impl core::fmt::Display for DayKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DayKey::Unbucketed => Ok(()),
            DayKey::Day(d) => write!(f, "{}", d.format(DAY_KEY_FORMAT)),
        }
    }
}

impl FromStr for DayKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(DayKey::Unbucketed);
        }
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map(DayKey::Day)
            .map_err(|e| DomainError::invalid_date(format!("day key {s:?}: {e}")))
    }
}

impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses the timestamp forms the data-access layer produces.
///
/// Zone-less values are read as UTC (the database stores UTC); a bare date is
/// midnight UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DAY_KEY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A timestamp column as received from the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampField {
    #[default]
    Missing,
    Instant(DateTime<Utc>),
    /// Present but unparseable; the raw text is kept for diagnostics.
    Invalid(String),
}

impl TimestampField {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Missing,
            JsonValue::String(s) if s.trim().is_empty() => Self::Missing,
            JsonValue::String(s) => parse_timestamp(s)
                .map(Self::Instant)
                .unwrap_or_else(|| Self::Invalid(s.clone())),
            // Epoch milliseconds.
            JsonValue::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(Self::Instant)
                .unwrap_or_else(|| Self::Invalid(n.to_string())),
            other => Self::Invalid(other.to_string()),
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<DateTime<Utc>> for TimestampField {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl<'de> Deserialize<'de> for TimestampField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(Self::from_json(&raw))
    }
}

/// One link of a record's timestamp fallback chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimestampCandidate<'a> {
    pub field: &'static str,
    pub value: &'a TimestampField,
}

impl<'a> TimestampCandidate<'a> {
    pub fn new(field: &'static str, value: &'a TimestampField) -> Self {
        Self { field, value }
    }
}

/// Outcome of walking a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    pub key: DayKey,
    /// Fields that were present but unparseable and therefore skipped.
    pub rejected: Vec<&'static str>,
    /// Field the key was taken from.
    pub source: Option<&'static str>,
}

/// Buckets instants into calendar days under a fixed UTC offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DayBucketer {
    offset: FixedOffset,
}

impl DayBucketer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Indian Standard Time, the shop's reporting calendar.
    pub fn ist() -> Self {
        // 19_800 s is inside the ±86_400 s range east_opt accepts.
        Self::new(FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_key(&self, instant: DateTime<Utc>) -> DayKey {
        DayKey::Day(instant.with_timezone(&self.offset).date_naive())
    }

    pub fn day_key_of(&self, field: &TimestampField) -> DayKey {
        field
            .instant()
            .map(|dt| self.day_key(dt))
            .unwrap_or(DayKey::Unbucketed)
    }

    /// First present-and-parseable candidate wins.
    pub fn resolve(&self, chain: &[TimestampCandidate<'_>]) -> ResolvedDay {
        let mut rejected = Vec::new();
        for candidate in chain {
            match candidate.value {
                TimestampField::Instant(dt) => {
                    return ResolvedDay {
                        key: self.day_key(*dt),
                        rejected,
                        source: Some(candidate.field),
                    };
                }
                TimestampField::Invalid(_) => rejected.push(candidate.field),
                TimestampField::Missing => {}
            }
        }
        ResolvedDay {
            key: DayKey::Unbucketed,
            rejected,
            source: None,
        }
    }

    pub fn today(&self) -> DayKey {
        self.today_at(Utc::now())
    }

    pub fn today_at(&self, now: DateTime<Utc>) -> DayKey {
        self.day_key(now)
    }

    pub fn today_date_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }
}

impl Default for DayBucketer {
    fn default() -> Self {
        Self::ist()
    }
}

/// Day key of a raw timestamp under `offset`; unparseable or missing input
/// yields [`DayKey::Unbucketed`].
pub fn local_date_key(timestamp: Option<&str>, offset: FixedOffset) -> DayKey {
    timestamp
        .and_then(parse_timestamp)
        .map(|dt| DayBucketer::new(offset).day_key(dt))
        .unwrap_or(DayKey::Unbucketed)
}

/// Day key of the current instant under `offset`.
pub fn today_key(offset: FixedOffset) -> DayKey {
    DayBucketer::new(offset).today()
}

/// Parses `+05:30`, `-0400`, `+05`, `Z` or `UTC`.
pub fn parse_utc_offset(text: &str) -> DomainResult<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || DomainError::invalid_date(format!("utc offset {text:?}"));

    let (sign, rest) = match text.chars().next() {
        Some('+') => (1, &text[1..]),
        Some('-') => (-1, &text[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Inclusive range of calendar days.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn contains_key(&self, key: DayKey) -> bool {
        key.date().is_some_and(|d| self.contains(d))
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Sunday through Saturday around `day`.
    pub fn week_containing(day: NaiveDate) -> Self {
        let back = u64::from(day.weekday().num_days_from_sunday());
        let start = day.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// First through last day of the month around `day`.
    pub fn month_containing(day: NaiveDate) -> Self {
        let start = day.with_day(1).unwrap_or(day);
        let (year, month) = if day.month() == 12 {
            (day.year() + 1, 1)
        } else {
            (day.year(), day.month() + 1)
        };
        let end = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// `today - days` through `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Sunday-aligned weeks overlapping this range, clipped to it.
    pub fn weeks_within(&self) -> Vec<DateRange> {
        let mut weeks = Vec::new();
        let mut week_start = Self::week_containing(self.start).start;
        while week_start <= self.end {
            let week_end = week_start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
            weeks.push(Self {
                start: week_start.max(self.start),
                end: week_end.min(self.end),
            });
            match week_start.checked_add_days(Days::new(7)) {
                Some(next) => week_start = next,
                None => break,
            }
        }
        weeks
    }
}

impl core::fmt::Display for DateRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DAY_KEY_FORMAT),
            self.end.format(DAY_KEY_FORMAT)
        )
    }
}

impl FromStr for DateRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| DomainError::invalid_date(format!("date range {s:?}")))?;
        let parse = |part: &str| -> DomainResult<NaiveDate> {
            match part.parse::<DayKey>()? {
                DayKey::Day(d) => Ok(d),
                DayKey::Unbucketed => Err(DomainError::invalid_date(format!("date range {s:?}"))),
            }
        };
        Self::new(parse(start)?, parse(end)?)
    }
}
