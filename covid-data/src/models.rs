//! Query result model structs.
//!
//! All structs derive `Serialize` so the presentation layer can write them
//! out as CSV rows or JSON without further shaping.

use chrono::NaiveDate;
use covid_core::{VaccinationMetrics, VaccinationRecord};
use serde::Serialize;

/// One day of a country (or world) series with its smoothed counterparts.
///
/// Until [`crate::smoothing::smooth`] runs, the smoothed fields hold the
/// raw daily values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DerivedPoint {
    pub date: NaiveDate,
    pub new_cases: u64,
    pub new_deaths: u64,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases_smoothed: f64,
    pub new_deaths_smoothed: f64,
}

/// New cases and deaths summed over one Tuesday-to-Monday week.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeeklyBucket {
    /// First day of the week (a Tuesday).
    pub week_start: NaiveDate,
    /// Last day of the week (a Monday); the bucket label.
    pub week_ending: NaiveDate,
    pub new_cases: u64,
    pub new_deaths: u64,
}

/// Headline numbers for the selected country and range.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct Kpis {
    /// Cumulative cases as of the last date in range.
    pub total_cases: u64,
    /// Cumulative deaths as of the last date in range.
    pub total_deaths: u64,
    /// Sum of daily new cases over the range.
    pub new_cases: u64,
    /// Sum of daily new deaths over the range.
    pub new_deaths: u64,
}

/// Flat vaccination row. Columns absent from the source layout are `None`
/// so every row has the same shape when written as CSV.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VaccinationPoint {
    pub date: NaiveDate,
    pub country: String,
    pub total_vaccinations: Option<u64>,
    pub at_least_one_dose: Option<u64>,
    pub fully_vaccinated: Option<u64>,
    pub boosted: Option<u64>,
    pub doses_per_million: Option<f64>,
}

impl From<&VaccinationRecord> for VaccinationPoint {
    fn from(record: &VaccinationRecord) -> Self {
        let mut point = VaccinationPoint {
            date: record.date,
            country: record.country.clone(),
            total_vaccinations: None,
            at_least_one_dose: None,
            fully_vaccinated: None,
            boosted: None,
            doses_per_million: None,
        };
        match record.metrics {
            VaccinationMetrics::Cumulative {
                total_vaccinations,
                at_least_one_dose,
                fully_vaccinated,
                boosted,
            } => {
                point.total_vaccinations = Some(total_vaccinations);
                point.at_least_one_dose = Some(at_least_one_dose);
                point.fully_vaccinated = Some(fully_vaccinated);
                point.boosted = Some(boosted);
            }
            VaccinationMetrics::DailyRate { doses_per_million } => {
                point.doses_per_million = Some(doses_per_million);
            }
        }
        point
    }
}
