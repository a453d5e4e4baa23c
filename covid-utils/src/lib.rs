//! Shared utility functions for the COVID-19 dataset crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};

    /// Canonical output format, "YYYY-MM-DD"
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Date-only formats accepted from source files, tried in order.
    /// ISO forms come first so that an ambiguous value like "2021-02-03"
    /// is never read day-first.
    pub const SOURCE_DATE_FORMATS: [&str; 5] =
        ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

    /// Datetime formats whose date part is kept.
    const SOURCE_DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.fZ"];

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)?)
    }

    /// Best-effort parse of a date cell from a source CSV.
    ///
    /// Accepts ISO dates, day-first dates and ISO datetimes. Returns `None`
    /// when nothing matches; callers drop such rows.
    pub fn parse_source_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        SOURCE_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| {
                SOURCE_DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    /// The Monday that closes the week containing `date`.
    ///
    /// Weeks run Tuesday through Monday, so a Monday maps to itself and a
    /// Tuesday maps six days ahead.
    pub fn week_ending_monday(date: &NaiveDate) -> NaiveDate {
        let from_monday = date.weekday().num_days_from_monday() as i64;
        let ahead = (7 - from_monday) % 7;
        *date + TimeDelta::days(ahead)
    }

    /// First day (a Tuesday) of the week that ends on `week_ending`.
    pub fn week_start(week_ending: &NaiveDate) -> NaiveDate {
        debug_assert_eq!(week_ending.weekday(), Weekday::Mon);
        *week_ending - TimeDelta::days(6)
    }

}

/// Lenient numeric coercion for source cells
pub mod numbers {
    fn is_missing(s: &str) -> bool {
        matches!(
            s.to_lowercase().as_str(),
            "" | "null" | "nan" | "n/a" | "na" | "none"
        )
    }

    /// Coerce a cell to a non-negative count.
    ///
    /// Missing, non-numeric and negative values become 0. Decimal strings
    /// are truncated toward zero.
    pub fn coerce_count(s: &str) -> u64 {
        let s = s.trim();
        if is_missing(s) {
            return 0;
        }
        if let Ok(n) = s.parse::<u64>() {
            return n;
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
            _ => 0,
        }
    }

    /// Coerce a cell to a non-negative float with the same rules as
    /// [`coerce_count`], without truncation.
    pub fn coerce_rate(s: &str) -> f64 {
        let s = s.trim();
        if is_missing(s) {
            return 0.0;
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f,
            _ => 0.0,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_coerce_count() {
            assert_eq!(coerce_count("42"), 42);
            assert_eq!(coerce_count(" 7 "), 7);
            assert_eq!(coerce_count("12.9"), 12);
            assert_eq!(coerce_count(""), 0);
            assert_eq!(coerce_count("NaN"), 0);
            assert_eq!(coerce_count("n/a"), 0);
            assert_eq!(coerce_count("-5"), 0);
            assert_eq!(coerce_count("abc"), 0);
        }

        #[test]
        fn test_coerce_rate() {
            assert_eq!(coerce_rate("1234.5"), 1234.5);
            assert_eq!(coerce_rate(""), 0.0);
            assert_eq!(coerce_rate("-3.2"), 0.0);
            assert_eq!(coerce_rate("inf"), 0.0);
        }
    }
}
