use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use tailorshop_core::{DateRange, DayBucketer, DayKey, DomainError};

/// Days a report is restricted to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every bucket, including records with no usable date.
    AllTime,
    Day(NaiveDate),
    Range(DateRange),
}

impl Scope {
    pub fn contains(&self, key: DayKey) -> bool {
        match self {
            Scope::AllTime => true,
            Scope::Day(day) => key == DayKey::Day(*day),
            Scope::Range(range) => range.contains_key(key),
        }
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Scope::AllTime => f.write_str("all"),
            Scope::Day(day) => write!(f, "{}", DayKey::Day(*day)),
            Scope::Range(range) => write!(f, "{range}"),
        }
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if matches!(s, "all" | "all-time" | "all_time") {
            return Ok(Scope::AllTime);
        }
        if s.contains("..") {
            return s.parse().map(Scope::Range);
        }
        match s.parse::<DayKey>()? {
            DayKey::Day(day) => Ok(Scope::Day(day)),
            DayKey::Unbucketed => Err(DomainError::invalid_date("empty scope")),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The date filters offered by the profit screens, resolved against "now".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Today,
    /// Today and the seven days before it.
    Week,
    /// Today and the thirty days before it.
    Month,
    /// Sunday through Saturday of the current week.
    ThisWeek,
    /// First through last day of the current month.
    ThisMonth,
    Fixed(Scope),
}

impl DateFilter {
    pub fn resolve(&self, bucketer: &DayBucketer, now: DateTime<Utc>) -> Scope {
        let today = bucketer.today_date_at(now);
        match self {
            DateFilter::All => Scope::AllTime,
            DateFilter::Today => Scope::Day(today),
            DateFilter::Week => Scope::Range(DateRange::trailing(today, 7)),
            DateFilter::Month => Scope::Range(DateRange::trailing(today, 30)),
            DateFilter::ThisWeek => Scope::Range(DateRange::week_containing(today)),
            DateFilter::ThisMonth => Scope::Range(DateRange::month_containing(today)),
            DateFilter::Fixed(scope) => *scope,
        }
    }

    /// Inclusive day range for the filter; `None` for all time.
    pub fn range(&self, bucketer: &DayBucketer, now: DateTime<Utc>) -> Option<DateRange> {
        match self.resolve(bucketer, now) {
            Scope::AllTime => None,
            Scope::Day(day) => Some(DateRange::single(day)),
            Scope::Range(range) => Some(range),
        }
    }
}

impl FromStr for DateFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "today" => DateFilter::Today,
            "week" => DateFilter::Week,
            "month" => DateFilter::Month,
            "this-week" | "this_week" => DateFilter::ThisWeek,
            "this-month" | "this_month" => DateFilter::ThisMonth,
            other => match other.parse::<Scope>()? {
                Scope::AllTime => DateFilter::All,
                scope => DateFilter::Fixed(scope),
            },
        })
    }
}
