//! Per-country and world-aggregated daily series.

use crate::filter::{CountrySelection, Filter};
use crate::models::DerivedPoint;
use chrono::NaiveDate;
use covid_core::{CaseRecord, CaseTable, CountryDated};
use std::collections::BTreeMap;

/// Case and death counts for one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DailyCounts {
    pub new_cases: u64,
    pub total_cases: u64,
    pub new_deaths: u64,
    pub total_deaths: u64,
}

impl DailyCounts {
    fn of(record: &CaseRecord) -> Self {
        DailyCounts {
            new_cases: record.new_cases,
            total_cases: record.total_cases,
            new_deaths: record.new_deaths,
            total_deaths: record.total_deaths,
        }
    }

    fn add(&mut self, record: &CaseRecord) {
        self.new_cases += record.new_cases;
        self.total_cases += record.total_cases;
        self.new_deaths += record.new_deaths;
        self.total_deaths += record.total_deaths;
    }

    fn into_point(self, date: NaiveDate) -> DerivedPoint {
        DerivedPoint {
            date,
            new_cases: self.new_cases,
            new_deaths: self.new_deaths,
            total_cases: self.total_cases,
            total_deaths: self.total_deaths,
            new_cases_smoothed: self.new_cases as f64,
            new_deaths_smoothed: self.new_deaths as f64,
        }
    }
}

/// Sum every record by date. Duplicate (country, date) rows are summed too.
pub(crate) fn world_by_date<'a, I>(records: I) -> BTreeMap<NaiveDate, DailyCounts>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, DailyCounts> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().add(record);
    }
    by_date
}

/// Rows that make up the world total. A source's own "World" rows are used
/// when it has any; otherwise every country row is used and aggregate rows
/// (continents, income groups) are left out.
pub(crate) fn world_rows(records: &[CaseRecord]) -> impl Iterator<Item = &CaseRecord> {
    let has_world = records.iter().any(|r| r.is_world());
    records.iter().filter(move |r| {
        if has_world {
            r.is_world()
        } else {
            !r.is_aggregate()
        }
    })
}

/// One country's rows keyed by date; a repeated date keeps the row that
/// appears last in the table.
pub(crate) fn country_by_date<'a, I>(records: I, country: &str) -> BTreeMap<NaiveDate, DailyCounts>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    records
        .into_iter()
        .filter(|r| r.country == country)
        .map(|r| (r.date, DailyCounts::of(r)))
        .collect()
}

/// Daily series for the filter's country and date range, ascending by date.
///
/// For [`CountrySelection::World`] the source's own world rows are used
/// when present, otherwise all countries are summed per date. An
/// unknown country or an empty range yields an empty series. Smoothed
/// fields equal the raw values; see [`crate::smoothing::smooth`].
pub fn country_series(table: &CaseTable, filter: &Filter) -> Vec<DerivedPoint> {
    let in_range = |r: &&CaseRecord| filter.range.contains(&r.date);
    let by_date = match &filter.country {
        CountrySelection::World => world_by_date(world_rows(table.records()).filter(in_range)),
        CountrySelection::Country(name) => {
            country_by_date(table.records().iter().filter(in_range), name)
        }
    };
    let series: Vec<DerivedPoint> = by_date
        .into_iter()
        .map(|(date, counts)| counts.into_point(date))
        .collect();
    log::info!(
        "query: country_series({}) returned {} records",
        filter.country,
        series.len()
    );
    series
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use covid_core::{CaseRecord, CaseTable};

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn record(country: &str, date: NaiveDate, new_cases: u64, total_cases: u64) -> CaseRecord {
        CaseRecord {
            date,
            country: country.to_string(),
            country_code: None,
            who_region: None,
            new_cases,
            total_cases,
            new_deaths: new_cases / 10,
            total_deaths: total_cases / 10,
        }
    }

    /// Testland has 3 days of totals, Otherland 2 overlapping days.
    pub fn two_countries() -> CaseTable {
        CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 1), 100, 100),
            record("Otherland", ymd(2021, 1, 2), 50, 50),
            record("Testland", ymd(2021, 1, 2), 50, 150),
            record("Otherland", ymd(2021, 1, 3), 30, 80),
            record("Testland", ymd(2021, 1, 3), 50, 200),
        ])
    }

    /// OWID-shaped file: two countries, Kosovo under an OWID code, a
    /// continent row and the world row for one date.
    pub const OWID_SAMPLE: &str = include_str!("../../fixtures/owid-cases-sample.csv");

    /// Testland and Otherland plus a continent row, without a world row.
    pub fn with_continent_row() -> CaseTable {
        let mut europe = record("Europe", ymd(2021, 1, 1), 100, 100);
        europe.country_code = Some("OWID_EUR".into());
        CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 1), 100, 100),
            record("Otherland", ymd(2021, 1, 1), 50, 50),
            europe,
        ])
    }

    /// Testland 2021-01-01..05 with new_cases 10..50.
    pub fn testland_five_days() -> CaseTable {
        let mut total = 0;
        CaseTable::new(
            [10u64, 20, 30, 40, 50]
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    total += n;
                    record("Testland", ymd(2021, 1, 1 + i as u32), *n, total)
                })
                .collect(),
        )
    }
}
