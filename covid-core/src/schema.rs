//! Canonical column names and the source-specific aliases that map onto them.
//!
//! Headers are matched case-insensitively after trimming, so `New_cases`,
//! `new_cases` and ` NEW_CASES ` all resolve to the same column.

use crate::error::{CoreError, Result};
use csv::StringRecord;

/// A canonical column and every header name known to carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const DATE: Column = Column {
    name: "date",
    aliases: &["date_reported", "date"],
};
pub const COUNTRY: Column = Column {
    name: "country",
    aliases: &["country", "location", "country/region", "country_region"],
};
pub const COUNTRY_CODE: Column = Column {
    name: "country_code",
    aliases: &["country_code", "iso_code"],
};
pub const WHO_REGION: Column = Column {
    name: "who_region",
    aliases: &["who_region"],
};
pub const NEW_CASES: Column = Column {
    name: "new_cases",
    aliases: &["new_cases", "new cases"],
};
pub const TOTAL_CASES: Column = Column {
    name: "total_cases",
    aliases: &["cumulative_cases", "total_cases", "total cases"],
};
pub const NEW_DEATHS: Column = Column {
    name: "new_deaths",
    aliases: &["new_deaths", "new deaths"],
};
pub const TOTAL_DEATHS: Column = Column {
    name: "total_deaths",
    aliases: &["cumulative_deaths", "total_deaths", "total deaths"],
};
pub const TOTAL_VACCINATIONS: Column = Column {
    name: "total_vaccinations",
    aliases: &["total_vaccinations"],
};
pub const AT_LEAST_ONE_DOSE: Column = Column {
    name: "at_least_one_dose",
    aliases: &["people_vaccinated", "at_least_one_dose"],
};
pub const FULLY_VACCINATED: Column = Column {
    name: "fully_vaccinated",
    aliases: &["people_fully_vaccinated", "fully_vaccinated"],
};
pub const BOOSTED: Column = Column {
    name: "boosted",
    aliases: &["total_boosters", "boosted"],
};
pub const DOSES_PER_MILLION: Column = Column {
    name: "doses_per_million",
    aliases: &["daily_vaccinations_per_million", "doses_per_million"],
};

/// Positions of canonical columns within one CSV header.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    headers: Vec<String>,
}

impl HeaderIndex {
    pub fn new(headers: &StringRecord) -> Self {
        HeaderIndex {
            headers: headers.iter().map(normalize_header).collect(),
        }
    }

    /// Index of the first header matching any alias of `column`.
    ///
    /// Aliases are tried in declaration order, so when a file carries two
    /// candidates the earlier alias wins.
    pub fn find(&self, column: &Column) -> Option<usize> {
        column
            .aliases
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h == alias))
    }

    /// Like [`find`](Self::find) but a missing column is an error.
    pub fn require(&self, column: &Column) -> Result<usize> {
        self.find(column)
            .ok_or(CoreError::MissingColumn(column.name))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Fetch a trimmed cell, treating a short row as an empty cell.
pub fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}
