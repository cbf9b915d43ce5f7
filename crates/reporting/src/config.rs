use chrono::FixedOffset;

use tailorshop_core::{DayBucketer, parse_utc_offset};

use crate::aggregator::RevenueAggregator;

/// Environment variable holding the reporting calendar's UTC offset.
pub const UTC_OFFSET_ENV: &str = "TAILORSHOP_UTC_OFFSET";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub utc_offset: FixedOffset,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset: DayBucketer::ist().offset(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset uses IST; an unparseable value is logged and also uses IST.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(UTC_OFFSET_ENV) {
            match parse_utc_offset(&raw) {
                Ok(offset) => config.utc_offset = offset,
                Err(e) => tracing::warn!(
                    variable = UTC_OFFSET_ENV,
                    value = %raw,
                    error = %e,
                    "ignoring invalid utc offset"
                ),
            }
        }
        config
    }

    pub fn with_utc_offset(self, utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    pub fn bucketer(&self) -> DayBucketer {
        DayBucketer::new(self.utc_offset)
    }

    pub fn aggregator(&self) -> RevenueAggregator {
        RevenueAggregator::new(self.bucketer())
    }
}
