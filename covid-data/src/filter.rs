use covid_core::{CaseTable, DateRange, WORLD};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default number of rows in a top-N ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Which rows a query covers: one named country or every country summed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CountrySelection {
    World,
    Country(String),
}

impl FromStr for CountrySelection {
    type Err = std::convert::Infallible;

    /// "World" in any casing selects the aggregate; anything else is taken
    /// as a country name verbatim (trimmed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(WORLD) {
            Ok(CountrySelection::World)
        } else {
            Ok(CountrySelection::Country(s.to_string()))
        }
    }
}

impl fmt::Display for CountrySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountrySelection::World => f.write_str(WORLD),
            CountrySelection::Country(name) => f.write_str(name),
        }
    }
}

impl Serialize for CountrySelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// User-selected query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub country: CountrySelection,
    /// Inclusive on both ends.
    pub range: DateRange,
    /// Always at least 1; 1 means no smoothing.
    pub smoothing_window: usize,
    pub top_n: usize,
}

impl Filter {
    pub fn new(country: CountrySelection, range: DateRange) -> Self {
        Filter {
            country,
            range,
            smoothing_window: 1,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Filter spanning every date the selection has data for, or `None`
    /// when the selection matches no rows.
    pub fn full_range(table: &CaseTable, country: CountrySelection) -> Option<Self> {
        let range = match &country {
            CountrySelection::World => table.date_bounds(),
            CountrySelection::Country(name) => table.country_date_bounds(name),
        }?;
        Some(Filter::new(country, range))
    }

    /// Window values below 1 are raised to 1.
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window.max(1);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}
