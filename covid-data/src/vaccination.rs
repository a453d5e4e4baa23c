//! Vaccination views. Missing data for a selection is reported as `None`
//! so callers can omit the section instead of failing.

use crate::filter::{CountrySelection, Filter};
use crate::models::VaccinationPoint;
use crate::snapshot::latest_per_country;
use chrono::NaiveDate;
use covid_core::{CountryDated, VaccinationMetrics, VaccinationRecord, VaccinationTable, WORLD};
use std::collections::BTreeMap;

/// Sum cumulative rows per date. Rate rows are skipped.
fn sum_cumulative<'a, I>(records: I) -> BTreeMap<NaiveDate, VaccinationMetrics>
where
    I: IntoIterator<Item = &'a VaccinationRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, VaccinationMetrics> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.metrics.is_cumulative()) {
        match by_date.get_mut(&record.date) {
            Some(sum) => {
                if let Some(added) = sum.checked_add(&record.metrics) {
                    *sum = added;
                }
            }
            None => {
                by_date.insert(record.date, record.metrics.clone());
            }
        }
    }
    by_date
}

/// Vaccination rows for the filter's selection and range, ascending by date.
///
/// Returns `None` when the table has nothing for the selection at all. For
/// the world, rows literally named "World" are used when the source has
/// them; otherwise cumulative rows are summed across countries per date.
/// Rate-only sources without a "World" row have no world view.
pub fn vaccination_series(table: &VaccinationTable, filter: &Filter) -> Option<Vec<VaccinationPoint>> {
    let records = table.records();
    let by_date: BTreeMap<NaiveDate, VaccinationPoint> = match &filter.country {
        CountrySelection::Country(name) => {
            if !table.has_country(name) {
                return None;
            }
            records
                .iter()
                .filter(|r| &r.country == name && filter.range.contains(&r.date))
                .map(|r| (r.date, VaccinationPoint::from(r)))
                .collect()
        }
        CountrySelection::World if records.iter().any(|r| r.is_world()) => records
            .iter()
            .filter(|r| r.is_world() && filter.range.contains(&r.date))
            .map(|r| (r.date, VaccinationPoint::from(r)))
            .collect(),
        CountrySelection::World => {
            if !records.iter().any(|r| r.metrics.is_cumulative()) {
                return None;
            }
            sum_cumulative(records.iter().filter(|r| filter.range.contains(&r.date)))
                .into_iter()
                .map(|(date, metrics)| {
                    let record = VaccinationRecord {
                        date,
                        country: WORLD.to_string(),
                        metrics,
                    };
                    (date, VaccinationPoint::from(&record))
                })
                .collect()
        }
    };
    let series: Vec<VaccinationPoint> = by_date.into_values().collect();
    log::info!(
        "query: vaccination_series({}) returned {} records",
        filter.country,
        series.len()
    );
    Some(series)
}

/// Most recent vaccination row per country.
pub fn latest_vaccinations(table: &VaccinationTable) -> Vec<VaccinationPoint> {
    latest_per_country(table.records())
        .iter()
        .map(VaccinationPoint::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::ymd;
    use covid_core::{DateRange, Dataset};

    const VACCINATION_SAMPLE: &str = include_str!("../../fixtures/vaccinations-sample.csv");

    fn filter(country: &str) -> Filter {
        Filter::new(
            country.parse().unwrap(),
            DateRange(ymd(2021, 1, 1), ymd(2021, 1, 5)),
        )
    }

    fn cumulative(country: &str, date: NaiveDate, total: u64) -> VaccinationRecord {
        VaccinationRecord {
            date,
            country: country.to_string(),
            metrics: VaccinationMetrics::Cumulative {
                total_vaccinations: total,
                at_least_one_dose: total,
                fully_vaccinated: 0,
                boosted: 0,
            },
        }
    }

    #[test]
    fn test_country_series_in_range() {
        let table = VaccinationTable::from_csv_str(VACCINATION_SAMPLE).unwrap();
        let series = vaccination_series(&table, &filter("Testland")).unwrap();
        let dates: Vec<_> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![ymd(2021, 1, 2), ymd(2021, 1, 3), ymd(2021, 1, 5)]);
        assert_eq!(series[2].total_vaccinations, Some(2500));
        assert_eq!(series[2].boosted, Some(100));
    }

    #[test]
    fn test_missing_country_is_none() {
        let table = VaccinationTable::from_csv_str(VACCINATION_SAMPLE).unwrap();
        assert!(vaccination_series(&table, &filter("Otherland")).is_none());
    }

    #[test]
    fn test_country_out_of_range_is_empty() {
        let table = VaccinationTable::from_csv_str(VACCINATION_SAMPLE).unwrap();
        let late = filter("Testland").with_range(DateRange(ymd(2022, 1, 1), ymd(2022, 1, 2)));
        assert_eq!(vaccination_series(&table, &late), Some(vec![]));
    }

    #[test]
    fn test_world_sums_cumulative() {
        let table = VaccinationTable::new(vec![
            cumulative("Testland", ymd(2021, 1, 2), 100),
            cumulative("Otherland", ymd(2021, 1, 2), 40),
            cumulative("Otherland", ymd(2021, 1, 3), 60),
        ]);
        let series = vaccination_series(&table, &filter("World")).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].country, "World");
        assert_eq!(series[0].total_vaccinations, Some(140));
        assert_eq!(series[1].total_vaccinations, Some(60));
    }

    #[test]
    fn test_world_prefers_world_rows() {
        let table = VaccinationTable::new(vec![
            cumulative("Testland", ymd(2021, 1, 2), 100),
            cumulative("World", ymd(2021, 1, 2), 9000),
        ]);
        let series = vaccination_series(&table, &filter("World")).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total_vaccinations, Some(9000));
    }

    #[test]
    fn test_world_rate_only_is_none() {
        let table = VaccinationTable::new(vec![VaccinationRecord {
            date: ymd(2021, 1, 2),
            country: "Testland".into(),
            metrics: VaccinationMetrics::DailyRate {
                doses_per_million: 10.0,
            },
        }]);
        assert!(vaccination_series(&table, &filter("World")).is_none());
    }

    #[test]
    fn test_latest_vaccinations() {
        let table = VaccinationTable::new(vec![
            cumulative("Testland", ymd(2021, 1, 2), 100),
            cumulative("Otherland", ymd(2021, 1, 4), 40),
            cumulative("Testland", ymd(2021, 1, 3), 150),
        ]);
        let latest = latest_vaccinations(&table);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].country, "Otherland");
        assert_eq!(latest[1].total_vaccinations, Some(150));
    }
}
