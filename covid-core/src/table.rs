//! Normalized, immutable tables built from source CSV text.
//!
//! Normalization is best-effort: rows with an unparsable date or an empty
//! country are dropped, and numeric cells that fail to parse become zero.
//! A source only fails as a whole when its header lacks a required column.

use crate::date_range::DateRange;
use crate::error::{CoreError, Result};
use crate::record::{CaseRecord, CountryDated, VaccinationMetrics, VaccinationRecord};
use crate::schema::{self, cell, HeaderIndex};
use covid_utils::dates::parse_source_date;
use covid_utils::numbers::{coerce_count, coerce_rate};
use csv::ReaderBuilder;
use log::{debug, info};
use std::collections::BTreeSet;

/// A table that can be built from the body of a CSV source.
pub trait Dataset: Sized {
    /// Short label used in log lines.
    const KIND: &'static str;

    fn from_csv_str(csv_data: &str) -> Result<Self>;

    fn row_count(&self) -> usize;
}

/// Rows kept and dropped while normalizing one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RowTally {
    kept: usize,
    bad_date: usize,
    no_country: usize,
}

/// Shared read-only helpers over a vector of country/date records.
fn distinct_countries<T: CountryDated>(records: &[T]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.country().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn bounds_where<T: CountryDated>(records: &[T], keep: impl Fn(&T) -> bool) -> Option<DateRange> {
    let mut dates = records.iter().filter(|r| keep(r)).map(|r| r.date());
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange(min, max))
}

/// Normalized case/death table, rows in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        CaseTable { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, distinct country names.
    pub fn countries(&self) -> Vec<String> {
        distinct_countries(&self.records)
    }

    /// Earliest and latest date across the whole table.
    pub fn date_bounds(&self) -> Option<DateRange> {
        bounds_where(&self.records, |_| true)
    }

    /// Earliest and latest date reported by one country.
    pub fn country_date_bounds(&self, country: &str) -> Option<DateRange> {
        bounds_where(&self.records, |r| r.country == country)
    }
}

impl Dataset for CaseTable {
    const KIND: &'static str = "cases";

    /// Parse a case CSV (WHO daily export or an OWID-style file).
    ///
    /// Required columns: date, country, new/total cases, new/total deaths.
    /// Country code and WHO region are carried through when present.
    fn from_csv_str(csv_data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let index = HeaderIndex::new(rdr.headers()?);
        let date_ix = index.require(&schema::DATE)?;
        let country_ix = index.require(&schema::COUNTRY)?;
        let new_cases_ix = index.require(&schema::NEW_CASES)?;
        let total_cases_ix = index.require(&schema::TOTAL_CASES)?;
        let new_deaths_ix = index.require(&schema::NEW_DEATHS)?;
        let total_deaths_ix = index.require(&schema::TOTAL_DEATHS)?;
        let code_ix = index.find(&schema::COUNTRY_CODE);
        let region_ix = index.find(&schema::WHO_REGION);

        let optional = |r: &csv::StringRecord, ix: Option<usize>| {
            ix.map(|i| cell(r, i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut tally = RowTally::default();
        let mut records = Vec::new();
        for result in rdr.records() {
            let r = result?;
            let Some(date) = parse_source_date(cell(&r, date_ix)) else {
                tally.bad_date += 1;
                continue;
            };
            let country = cell(&r, country_ix);
            if country.is_empty() {
                tally.no_country += 1;
                continue;
            }
            records.push(CaseRecord {
                date,
                country: country.to_string(),
                country_code: optional(&r, code_ix),
                who_region: optional(&r, region_ix),
                new_cases: coerce_count(cell(&r, new_cases_ix)),
                total_cases: coerce_count(cell(&r, total_cases_ix)),
                new_deaths: coerce_count(cell(&r, new_deaths_ix)),
                total_deaths: coerce_count(cell(&r, total_deaths_ix)),
            });
            tally.kept += 1;
        }
        log_tally(Self::KIND, &tally);
        Ok(CaseTable { records })
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Column layout of a vaccination source, detected from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VaccinationLayout {
    Cumulative {
        total: usize,
        one_dose: usize,
        fully: usize,
        boosted: usize,
    },
    DailyRate {
        per_million: usize,
    },
}

impl VaccinationLayout {
    fn detect(index: &HeaderIndex) -> Result<Self> {
        let cumulative = (
            index.find(&schema::TOTAL_VACCINATIONS),
            index.find(&schema::AT_LEAST_ONE_DOSE),
            index.find(&schema::FULLY_VACCINATED),
            index.find(&schema::BOOSTED),
        );
        if let (Some(total), Some(one_dose), Some(fully), Some(boosted)) = cumulative {
            return Ok(VaccinationLayout::Cumulative {
                total,
                one_dose,
                fully,
                boosted,
            });
        }
        if let Some(per_million) = index.find(&schema::DOSES_PER_MILLION) {
            return Ok(VaccinationLayout::DailyRate { per_million });
        }
        Err(CoreError::UnknownLayout(index.headers().join(",")))
    }

    fn read(&self, r: &csv::StringRecord) -> VaccinationMetrics {
        match *self {
            VaccinationLayout::Cumulative {
                total,
                one_dose,
                fully,
                boosted,
            } => VaccinationMetrics::Cumulative {
                total_vaccinations: coerce_count(cell(r, total)),
                at_least_one_dose: coerce_count(cell(r, one_dose)),
                fully_vaccinated: coerce_count(cell(r, fully)),
                boosted: coerce_count(cell(r, boosted)),
            },
            VaccinationLayout::DailyRate { per_million } => VaccinationMetrics::DailyRate {
                doses_per_million: coerce_rate(cell(r, per_million)),
            },
        }
    }
}

/// Normalized vaccination table, rows in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccinationTable {
    records: Vec<VaccinationRecord>,
}

impl VaccinationTable {
    pub fn new(records: Vec<VaccinationRecord>) -> Self {
        VaccinationTable { records }
    }

    pub fn records(&self) -> &[VaccinationRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn countries(&self) -> Vec<String> {
        distinct_countries(&self.records)
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.records.iter().any(|r| r.country == country)
    }
}

impl Dataset for VaccinationTable {
    const KIND: &'static str = "vaccinations";

    /// Parse a vaccination CSV in either the cumulative-counts layout or
    /// the doses-per-million layout. When a header carries both, the
    /// cumulative layout is used.
    fn from_csv_str(csv_data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let index = HeaderIndex::new(rdr.headers()?);
        let date_ix = index.require(&schema::DATE)?;
        let country_ix = index.require(&schema::COUNTRY)?;
        let layout = VaccinationLayout::detect(&index)?;
        debug!("vaccination layout: {:?}", layout);

        let mut tally = RowTally::default();
        let mut records = Vec::new();
        for result in rdr.records() {
            let r = result?;
            let Some(date) = parse_source_date(cell(&r, date_ix)) else {
                tally.bad_date += 1;
                continue;
            };
            let country = cell(&r, country_ix);
            if country.is_empty() {
                tally.no_country += 1;
                continue;
            }
            records.push(VaccinationRecord {
                date,
                country: country.to_string(),
                metrics: layout.read(&r),
            });
            tally.kept += 1;
        }
        log_tally(Self::KIND, &tally);
        Ok(VaccinationTable { records })
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }
}

fn log_tally(kind: &str, tally: &RowTally) {
    if tally.bad_date > 0 || tally.no_country > 0 {
        debug!(
            "{} normalize: dropped {} rows with unparsable dates, {} without a country",
            kind, tally.bad_date, tally.no_country
        );
    }
    info!("{} normalize: kept {} rows", kind, tally.kept);
}
