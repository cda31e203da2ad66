use anyhow::{Context, Result, anyhow};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};

/// The instant every date window of a single invocation is derived from.
///
/// Sale dates are stored as `YYYY-MM-DD...` strings, so the clock hands out
/// string prefixes and bounds rather than parsed dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportClock {
    now: OffsetDateTime,
}

impl ReportClock {
    /// Local wall-clock time, falling back to UTC when the local offset
    /// cannot be determined.
    #[must_use]
    pub fn system() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self { now }
    }

    #[must_use]
    pub const fn fixed(now: OffsetDateTime) -> Self {
        Self { now }
    }

    /// `YYYY-MM` of the current calendar month.
    #[must_use]
    pub fn month_prefix(self) -> String {
        format!("{:04}-{:02}", self.now.year(), u8::from(self.now.month()))
    }

    /// `LIKE` pattern matching every date string in the current month.
    #[must_use]
    pub fn month_like_pattern(self) -> String {
        format!("{}%", self.month_prefix())
    }

    /// Inclusive lower bound (`YYYY-MM-DD`) of a window ending today.
    pub fn window_start(self, days: i64) -> Result<String> {
        let start = self
            .now
            .date()
            .checked_sub(Duration::days(days))
            .ok_or_else(|| anyhow!("date window of {days} days underflows the calendar"))?;
        Ok(format_date(start))
    }

    /// ISO-8601 rendering of `now`.
    pub fn timestamp(self) -> Result<String> {
        self.now
            .format(&Rfc3339)
            .context("failed to format report timestamp")
    }

    /// `YYYYMMDD_HHMMSS`, second precision.
    #[must_use]
    pub fn backup_stamp(self) -> String {
        format!(
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            self.now.year(),
            u8::from(self.now.month()),
            self.now.day(),
            self.now.hour(),
            self.now.minute(),
            self.now.second()
        )
    }
}

fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
