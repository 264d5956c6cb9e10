use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{EngineError, ResultEngine};

/// The "now" a report is computed against.
///
/// The engine never reads the system clock; callers build one of these from
/// their own notion of the current instant and the team's timezone, so the
/// same inputs always yield the same report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportClock {
    pub now: DateTime<Utc>,
    pub timezone: Tz,
}

impl ReportClock {
    pub fn new(now: DateTime<Utc>, timezone: Tz) -> Self {
        Self { now, timezone }
    }

    /// Build a clock from an IANA timezone name.
    pub fn with_timezone_name(now: DateTime<Utc>, timezone: &str) -> ResultEngine<Self> {
        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| EngineError::InvalidFilter(format!("unknown timezone: {timezone}")))?;
        Ok(Self { now, timezone })
    }

    /// The calendar date in the team's timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.timezone).date_naive()
    }

    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.today().year()
    }

    /// 1-based month.
    #[must_use]
    pub fn current_month(&self) -> u32 {
        self.today().month()
    }
}
