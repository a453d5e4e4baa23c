use crate::filter::{CountrySelection, Filter};
use crate::models::{DerivedPoint, Kpis};
use crate::series::{country_by_date, world_by_date, world_rows};
use covid_core::CaseTable;

impl Kpis {
    /// Totals from the last row by date; new cases and deaths summed over
    /// the whole series. An empty series gives all zeros.
    pub fn from_series(series: &[DerivedPoint]) -> Self {
        let last = series.iter().max_by_key(|p| p.date);
        Kpis {
            total_cases: last.map_or(0, |p| p.total_cases),
            total_deaths: last.map_or(0, |p| p.total_deaths),
            new_cases: series.iter().map(|p| p.new_cases).sum(),
            new_deaths: series.iter().map(|p| p.new_deaths).sum(),
        }
    }
}

/// KPIs for `series`, the filtered view of `table`.
///
/// An empty series falls back to the largest totals the selection reports
/// anywhere in the table, with zero new cases and deaths.
pub fn kpis_with_fallback(table: &CaseTable, filter: &Filter, series: &[DerivedPoint]) -> Kpis {
    if !series.is_empty() {
        return Kpis::from_series(series);
    }
    let by_date = match &filter.country {
        CountrySelection::World => world_by_date(world_rows(table.records())),
        CountrySelection::Country(name) => country_by_date(table.records(), name),
    };
    log::debug!(
        "kpi: empty range for {}, falling back to unfiltered maxima",
        filter.country
    );
    Kpis {
        total_cases: by_date.values().map(|c| c.total_cases).max().unwrap_or(0),
        total_deaths: by_date.values().map(|c| c.total_deaths).max().unwrap_or(0),
        new_cases: 0,
        new_deaths: 0,
    }
}
