//! Command handlers. Each one loads what it needs through the session,
//! runs one engine query and writes the result.

use crate::output::{self, Format};
use crate::session::Session;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use covid_core::{CaseTable, DateRange};
use covid_data::{
    country_series, kpis_with_fallback, latest_per_country, latest_vaccinations, rank_countries,
    smooth, vaccination_series, weekly_for_filter, CountrySelection, DashboardView, Filter,
    RankMetric,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Write;

/// Query parameters as given on the command line, before defaults from
/// the data are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub country: CountrySelection,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub window: usize,
    pub top: usize,
}

impl FilterRequest {
    /// Build a [`Filter`], filling a missing start or end from the dates the
    /// selection reports (or the whole table for an unknown country).
    pub fn resolve(&self, table: &CaseTable) -> anyhow::Result<Filter> {
        let bounds = match &self.country {
            CountrySelection::World => table.date_bounds(),
            CountrySelection::Country(name) => {
                let own = table.country_date_bounds(name);
                if own.is_none() {
                    warn!("no rows for country {:?}; results will be empty", name);
                }
                own.or_else(|| table.date_bounds())
            }
        };
        let (start, end) = match (self.start, self.end, bounds) {
            (Some(s), Some(e), _) => (s, e),
            (s, e, Some(b)) => (s.unwrap_or(b.start()), e.unwrap_or(b.end())),
            (_, _, None) => bail!("the case table is empty; pass both --start and --end"),
        };
        let range = DateRange(start, end);
        if range.is_empty() {
            bail!("start date {} is after end date {}", start, end);
        }
        debug!("query: {} over {} days from {}", self.country, range.num_days(), start);
        Ok(Filter::new(self.country.clone(), range)
            .with_smoothing_window(self.window)
            .with_top_n(self.top))
    }
}

#[derive(Debug, Serialize)]
struct CountryRow<'a> {
    country: &'a str,
}

/// One-row KPI report.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub country: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: String,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
}

pub async fn run_countries<W: Write>(session: &Session, out: W, format: Format) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let countries = cases.table.countries();
    let rows: Vec<CountryRow> = countries.iter().map(|c| CountryRow { country: c }).collect();
    info!("{} countries in {}", rows.len(), cases.source);
    output::write_rows(out, &rows, format)
}

pub async fn run_series<W: Write>(
    session: &Session,
    request: &FilterRequest,
    out: W,
    format: Format,
) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let filter = request.resolve(&cases.table)?;
    let series = smooth(&country_series(&cases.table, &filter), filter.smoothing_window);
    output::write_rows(out, &series, format)
}

pub async fn run_summary<W: Write>(
    session: &Session,
    request: &FilterRequest,
    out: W,
    format: Format,
) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let filter = request.resolve(&cases.table)?;
    let series = country_series(&cases.table, &filter);
    let kpis = kpis_with_fallback(&cases.table, &filter, &series);
    let summary = Summary {
        country: filter.country.to_string(),
        start: filter.range.start(),
        end: filter.range.end(),
        source: cases.source.clone(),
        total_cases: kpis.total_cases,
        total_deaths: kpis.total_deaths,
        new_cases: kpis.new_cases,
        new_deaths: kpis.new_deaths,
    };
    output::write_rows(out, &[summary], format)
}

pub async fn run_top<W: Write>(
    session: &Session,
    top: usize,
    metric: RankMetric,
    out: W,
    format: Format,
) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let ranked = rank_countries(&cases.table, top, metric);
    info!("top {} countries by {}", ranked.len(), metric);
    output::write_rows(out, &ranked, format)
}

pub async fn run_latest<W: Write>(session: &Session, out: W, format: Format) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let latest = latest_per_country(cases.table.records());
    output::write_rows(out, &latest, format)
}

pub async fn run_weekly<W: Write>(
    session: &Session,
    request: &FilterRequest,
    out: W,
    format: Format,
) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let filter = request.resolve(&cases.table)?;
    let weekly = weekly_for_filter(&cases.table, &filter);
    output::write_rows(out, &weekly, format)
}

/// Vaccination rows for the selection, or the latest row per country when
/// `latest` is set. Missing vaccination data writes nothing.
pub async fn run_vaccinations<W: Write>(
    session: &Session,
    request: &FilterRequest,
    latest: bool,
    out: W,
    format: Format,
) -> anyhow::Result<()> {
    let Some(vaccinations) = session.vaccinations().await else {
        info!("no vaccination data loaded; nothing to report");
        return Ok(());
    };
    if latest {
        return output::write_rows(out, &latest_vaccinations(&vaccinations.table), format);
    }
    let cases = session.cases().await?;
    let filter = request.resolve(&cases.table)?;
    match vaccination_series(&vaccinations.table, &filter) {
        Some(series) => output::write_rows(out, &series, format),
        None => {
            info!("no vaccination rows for {}; section omitted", filter.country);
            Ok(())
        }
    }
}

/// Every view for one filter as a single JSON document.
pub async fn run_dashboard<W: Write>(
    session: &Session,
    request: &FilterRequest,
    metric: RankMetric,
    out: W,
) -> anyhow::Result<()> {
    let cases = session.cases().await?;
    let vaccinations = session.vaccinations().await;
    let filter = request
        .resolve(&cases.table)
        .context("cannot build dashboard filter")?;
    let view = DashboardView::compute(
        &cases.table,
        vaccinations.as_ref().map(|v| &v.table),
        &filter,
        metric,
    )
    .with_source(cases.source.clone());
    output::write_json(out, &view)
}
