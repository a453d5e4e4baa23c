//! Weekly totals, bucketed into Tuesday-to-Monday weeks.

use crate::filter::{CountrySelection, Filter};
use crate::models::WeeklyBucket;
use crate::series::world_rows;
use chrono::NaiveDate;
use covid_core::{CaseRecord, CaseTable};
use covid_utils::dates::{week_ending_monday, week_start};
use std::collections::BTreeMap;

fn bucket<'a, I>(records: I) -> Vec<WeeklyBucket>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut weeks: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for record in records {
        let sums = weeks.entry(week_ending_monday(&record.date)).or_default();
        sums.0 += record.new_cases;
        sums.1 += record.new_deaths;
    }
    weeks
        .into_iter()
        .map(|(week_ending, (new_cases, new_deaths))| WeeklyBucket {
            week_start: week_start(&week_ending),
            week_ending,
            new_cases,
            new_deaths,
        })
        .collect()
}

/// Rows counted for `scope`; the world follows [`world_rows`].
fn scoped_rows<'a>(table: &'a CaseTable, scope: &CountrySelection) -> Vec<&'a CaseRecord> {
    match scope {
        CountrySelection::World => world_rows(table.records()).collect(),
        CountrySelection::Country(name) => {
            table.records().iter().filter(|r| &r.country == name).collect()
        }
    }
}

/// Weekly sums of new cases and deaths for one country or the world.
///
/// Every row is counted, duplicates included. Weeks without rows are
/// omitted rather than zero-filled.
pub fn weekly_aggregate(table: &CaseTable, scope: &CountrySelection) -> Vec<WeeklyBucket> {
    let buckets = bucket(scoped_rows(table, scope));
    log::info!(
        "query: weekly_aggregate({}) returned {} records",
        scope,
        buckets.len()
    );
    buckets
}

/// [`weekly_aggregate`] restricted to the filter's date range. Weeks that
/// straddle a range bound only count the in-range days.
pub fn weekly_for_filter(table: &CaseTable, filter: &Filter) -> Vec<WeeklyBucket> {
    bucket(
        scoped_rows(table, &filter.country)
            .into_iter()
            .filter(|r| filter.range.contains(&r.date)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::{record, two_countries, ymd, OWID_SAMPLE};
    use chrono::{Datelike, Weekday};
    use covid_core::{DateRange, Dataset};

    const WHO_SAMPLE: &str = include_str!("../../fixtures/who-sample.csv");

    #[test]
    fn test_monday_closes_week() {
        // 2021-01-04 is a Monday, 2021-01-05 a Tuesday
        let table = CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 4), 10, 10),
            record("Testland", ymd(2021, 1, 5), 20, 30),
            record("Testland", ymd(2021, 1, 11), 5, 35),
        ]);
        let weeks = weekly_aggregate(&table, &CountrySelection::Country("Testland".into()));
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_ending, ymd(2021, 1, 4));
        assert_eq!(weeks[0].new_cases, 10);
        assert_eq!(weeks[1].week_start, ymd(2021, 1, 5));
        assert_eq!(weeks[1].week_ending, ymd(2021, 1, 11));
        assert_eq!(weeks[1].new_cases, 25);
    }

    #[test]
    fn test_empty_weeks_omitted() {
        let table = CaseTable::new(vec![
            record("Testland", ymd(2021, 1, 4), 10, 10),
            record("Testland", ymd(2021, 2, 1), 10, 20),
        ]);
        let weeks = weekly_aggregate(&table, &CountrySelection::World);
        assert_eq!(weeks.len(), 2);
    }

    #[test]
    fn test_world_scope_sums_countries() {
        let weeks = weekly_aggregate(&two_countries(), &CountrySelection::World);
        // 2021-01-01..03 all fall in the week ending Monday 2021-01-04
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].new_cases, 100 + 50 + 50 + 50 + 30);
        assert_eq!(weeks[0].new_deaths, 10 + 5 + 5 + 5 + 3);
    }

    #[test]
    fn test_buckets_partition_input_dates() {
        let table = CaseTable::from_csv_str(WHO_SAMPLE).unwrap();
        let weeks = weekly_aggregate(&table, &CountrySelection::World);
        for w in &weeks {
            assert_eq!(w.week_ending.weekday(), Weekday::Mon);
            assert_eq!((w.week_ending - w.week_start).num_days(), 6);
            let in_bucket = table
                .records()
                .iter()
                .filter(|r| DateRange(w.week_start, w.week_ending).contains(&r.date));
            let (cases, deaths) =
                in_bucket.fold((0, 0), |(c, d), r| (c + r.new_cases, d + r.new_deaths));
            assert_eq!((w.new_cases, w.new_deaths), (cases, deaths));
        }
        assert!(weeks.windows(2).all(|p| p[0].week_ending < p[1].week_start));
        for r in table.records() {
            assert!(weeks
                .iter()
                .any(|w| DateRange(w.week_start, w.week_ending).contains(&r.date)));
        }
    }

    #[test]
    fn test_weekly_for_filter_clips_range() {
        let table = CaseTable::from_csv_str(WHO_SAMPLE).unwrap();
        let filter = Filter::new(
            CountrySelection::Country("Testland".into()),
            DateRange(ymd(2021, 1, 3), ymd(2021, 1, 5)),
        );
        let weeks = weekly_for_filter(&table, &filter);
        // Jan 3 and 4 close the first week; Jan 5 opens the next
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].new_cases, 30 + 40);
        assert_eq!(weeks[1].new_cases, 50);
    }

    #[test]
    fn test_world_weeks_from_source_world_rows() {
        let table = CaseTable::from_csv_str(OWID_SAMPLE).unwrap();
        let weeks = weekly_aggregate(&table, &CountrySelection::World);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].new_cases, 16);
        assert_eq!(weeks[0].new_deaths, 2);
    }
}
