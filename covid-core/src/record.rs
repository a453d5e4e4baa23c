use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel country name meaning "aggregate over every country".
pub const WORLD: &str = "World";

/// Code prefix OWID uses for rows that are not countries (continents,
/// income groups, the world).
pub const OWID_CODE_PREFIX: &str = "OWID_";

/// OWID codes under [`OWID_CODE_PREFIX`] that still name a single country.
pub const OWID_COUNTRY_CODES: [&str; 2] = ["OWID_KOS", "OWID_CYN"];

/// Anything keyed by (country, date). Lets snapshot and filtering code
/// work over both case and vaccination records.
pub trait CountryDated {
    fn country(&self) -> &str;
    fn date(&self) -> NaiveDate;

    /// True for a row the source itself labels as the world total.
    fn is_world(&self) -> bool {
        self.country().eq_ignore_ascii_case(WORLD)
    }

    /// True for a row summing several countries. Such rows must not be
    /// added into world totals or ranked against countries.
    fn is_aggregate(&self) -> bool {
        self.is_world()
    }
}

/// One day of case and death counts for one country.
///
/// `total_*` columns are cumulative and expected to be non-decreasing per
/// country; `new_*` columns are the day-over-day deltas as reported. Neither
/// is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub country: String,
    /// ISO-style code when the source carries one (used for map coloring)
    pub country_code: Option<String>,
    pub who_region: Option<String>,
    pub new_cases: u64,
    pub total_cases: u64,
    pub new_deaths: u64,
    pub total_deaths: u64,
}

/// Vaccination figures. Sources publish one of two shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VaccinationMetrics {
    /// Cumulative counts of people / doses
    Cumulative {
        total_vaccinations: u64,
        at_least_one_dose: u64,
        fully_vaccinated: u64,
        boosted: u64,
    },
    /// 7-day average of doses administered per million people
    DailyRate { doses_per_million: f64 },
}

impl VaccinationMetrics {
    /// Element-wise sum of two cumulative readings. Rate readings cannot be
    /// summed across countries and yield `None`.
    pub fn checked_add(&self, other: &VaccinationMetrics) -> Option<VaccinationMetrics> {
        match (self, other) {
            (
                VaccinationMetrics::Cumulative {
                    total_vaccinations: a1,
                    at_least_one_dose: b1,
                    fully_vaccinated: c1,
                    boosted: d1,
                },
                VaccinationMetrics::Cumulative {
                    total_vaccinations: a2,
                    at_least_one_dose: b2,
                    fully_vaccinated: c2,
                    boosted: d2,
                },
            ) => Some(VaccinationMetrics::Cumulative {
                total_vaccinations: a1 + a2,
                at_least_one_dose: b1 + b2,
                fully_vaccinated: c1 + c2,
                boosted: d1 + d2,
            }),
            _ => None,
        }
    }

    pub fn is_cumulative(&self) -> bool {
        matches!(self, VaccinationMetrics::Cumulative { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub date: NaiveDate,
    pub country: String,
    pub metrics: VaccinationMetrics,
}

impl CountryDated for CaseRecord {
    fn country(&self) -> &str {
        &self.country
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn is_aggregate(&self) -> bool {
        self.is_world()
            || self.country_code.as_deref().is_some_and(|code| {
                code.starts_with(OWID_CODE_PREFIX) && !OWID_COUNTRY_CODES.contains(&code)
            })
    }
}

impl CountryDated for VaccinationRecord {
    fn country(&self) -> &str {
        &self.country
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
}
