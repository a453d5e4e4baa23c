//! Latest row per country and top-N rankings over it.

use covid_core::{CaseRecord, CaseTable, CountryDated};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The most recent record of every country.
///
/// Exactly one row per distinct country, carrying that country's maximum
/// date. When a country reports its maximum date more than once, the row
/// that appears last in the input wins. Rows come back in the input order
/// of the selected records.
pub fn latest_per_country<T: CountryDated + Clone>(records: &[T]) -> Vec<T> {
    let mut best: HashMap<&str, usize> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        best.entry(record.country())
            .and_modify(|b| {
                if record.date() >= records[*b].date() {
                    *b = i;
                }
            })
            .or_insert(i);
    }
    let mut picked: Vec<usize> = best.into_values().collect();
    picked.sort_unstable();
    let latest: Vec<T> = picked.into_iter().map(|i| records[i].clone()).collect();
    log::info!("query: latest_per_country returned {} records", latest.len());
    latest
}

/// Column a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMetric {
    #[default]
    TotalCases,
    TotalDeaths,
}

impl RankMetric {
    pub fn value(&self, record: &CaseRecord) -> u64 {
        match self {
            RankMetric::TotalCases => record.total_cases,
            RankMetric::TotalDeaths => record.total_deaths,
        }
    }
}

impl FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cases" | "total_cases" => Ok(RankMetric::TotalCases),
            "deaths" | "total_deaths" => Ok(RankMetric::TotalDeaths),
            other => Err(format!("unknown ranking metric: {} (expected cases or deaths)", other)),
        }
    }
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankMetric::TotalCases => f.write_str("cases"),
            RankMetric::TotalDeaths => f.write_str("deaths"),
        }
    }
}

/// First `n` rows of `snapshot` ordered by `metric`, largest first.
///
/// The sort is stable, so equal values keep their snapshot order. `n` has
/// no upper bound; asking for more rows than exist returns them all.
pub fn top_n(snapshot: &[CaseRecord], n: usize, metric: RankMetric) -> Vec<CaseRecord> {
    let mut ranked = snapshot.to_vec();
    ranked.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    ranked.truncate(n);
    ranked
}

/// Latest snapshot of `table` ranked by `metric`. Aggregate rows (the
/// world, continents) are not ranked.
pub fn rank_countries(table: &CaseTable, n: usize, metric: RankMetric) -> Vec<CaseRecord> {
    let countries: Vec<CaseRecord> = latest_per_country(table.records())
        .into_iter()
        .filter(|r| !r.is_aggregate())
        .collect();
    top_n(&countries, n, metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::{record, two_countries, ymd, OWID_SAMPLE};
    use covid_core::{Dataset, VaccinationRecord, VaccinationTable};
    use std::collections::HashSet;

    const WHO_SAMPLE: &str = include_str!("../../fixtures/who-sample.csv");
    const VACCINATION_SAMPLE: &str = include_str!("../../fixtures/vaccinations-sample.csv");

    #[test]
    fn test_latest_two_countries() {
        let table = two_countries();
        let latest = latest_per_country(table.records());
        assert_eq!(latest.len(), 2);
        let otherland = latest.iter().find(|r| r.country == "Otherland").unwrap();
        let testland = latest.iter().find(|r| r.country == "Testland").unwrap();
        assert_eq!(otherland.total_cases, 80);
        assert_eq!(testland.total_cases, 200);
    }

    #[test]
    fn test_latest_has_max_date_per_country() {
        let table = CaseTable::from_csv_str(WHO_SAMPLE).unwrap();
        let latest = latest_per_country(table.records());
        let countries: HashSet<_> = latest.iter().map(|r| r.country.clone()).collect();
        assert_eq!(countries.len(), latest.len());
        assert_eq!(countries.len(), table.countries().len());
        for row in &latest {
            let bounds = table.country_date_bounds(&row.country).unwrap();
            assert_eq!(row.date, bounds.end());
        }
    }

    #[test]
    fn test_latest_ignores_input_order() {
        let table = CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 3), 1, 30),
            record("Testland", ymd(2021, 1, 1), 1, 10),
        ]);
        let latest = latest_per_country(table.records());
        assert_eq!(latest[0].date, ymd(2021, 1, 3));
    }

    #[test]
    fn test_latest_tie_last_wins() {
        let table = CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 3), 1, 30),
            record("Testland", ymd(2021, 1, 3), 2, 31),
        ]);
        let latest = latest_per_country(table.records());
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].total_cases, 31);
    }

    #[test]
    fn test_latest_vaccinations() {
        let table = VaccinationTable::from_csv_str(VACCINATION_SAMPLE).unwrap();
        let latest: Vec<VaccinationRecord> = latest_per_country(table.records());
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].date, ymd(2021, 1, 8));
    }

    #[test]
    fn test_top_n_orders_descending() {
        let snapshot = vec![
            record("A", ymd(2021, 1, 1), 0, 10),
            record("B", ymd(2021, 1, 1), 0, 30),
            record("C", ymd(2021, 1, 1), 0, 20),
        ];
        let top: Vec<_> = top_n(&snapshot, 2, RankMetric::TotalCases)
            .into_iter()
            .map(|r| r.country)
            .collect();
        assert_eq!(top, vec!["B", "C"]);
    }

    #[test]
    fn test_top_n_ties_keep_order() {
        let snapshot = vec![
            record("A", ymd(2021, 1, 1), 0, 10),
            record("B", ymd(2021, 1, 1), 0, 20),
            record("C", ymd(2021, 1, 1), 0, 10),
        ];
        let top: Vec<_> = top_n(&snapshot, 10, RankMetric::TotalCases)
            .into_iter()
            .map(|r| r.country)
            .collect();
        assert_eq!(top, vec!["B", "A", "C"]);
        assert!(top_n(&snapshot, 0, RankMetric::TotalCases).is_empty());
    }

    #[test]
    fn test_rank_by_deaths() {
        let mut otherland = record("Otherland", ymd(2021, 1, 1), 0, 10);
        otherland.total_deaths = 99;
        let table = CaseTable::new(vec![record("Testland", ymd(2021, 1, 1), 0, 500), otherland]);
        let by_deaths = rank_countries(&table, 1, RankMetric::TotalDeaths);
        assert_eq!(by_deaths[0].country, "Otherland");
        let by_cases = rank_countries(&table, 1, "cases".parse().unwrap());
        assert_eq!(by_cases[0].country, "Testland");
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("Deaths".parse::<RankMetric>(), Ok(RankMetric::TotalDeaths));
        assert!("vaccines".parse::<RankMetric>().is_err());
        assert_eq!(RankMetric::default().to_string(), "cases");
    }

    #[test]
    fn test_rank_skips_aggregate_rows() {
        let table = CaseTable::from_csv_str(OWID_SAMPLE).unwrap();
        let ranked: Vec<_> = rank_countries(&table, 10, RankMetric::TotalCases)
            .into_iter()
            .map(|r| r.country)
            .collect();
        assert_eq!(ranked, vec!["Testland", "Otherland", "Kosovo"]);
        // the snapshot itself still has one row per name in the file
        assert_eq!(latest_per_country(table.records()).len(), 6);
    }
}
