use crate::filter::Filter;
use crate::kpi::kpis_with_fallback;
use crate::models::{DerivedPoint, Kpis, VaccinationPoint, WeeklyBucket};
use crate::series::country_series;
use crate::smoothing::smooth;
use crate::snapshot::{rank_countries, RankMetric};
use crate::vaccination::vaccination_series;
use crate::weekly::weekly_for_filter;
use covid_core::{CaseRecord, CaseTable, VaccinationTable};
use serde::Serialize;

/// Everything a dashboard renders for one filter, computed in one pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub filter: Filter,
    /// Where the case table was loaded from, when known.
    pub source: Option<String>,
    pub kpis: Kpis,
    pub series: Vec<DerivedPoint>,
    pub weekly: Vec<WeeklyBucket>,
    pub top: Vec<CaseRecord>,
    pub rank_metric: String,
    /// `None` when no vaccination table was given or it has no rows for
    /// the selection.
    pub vaccinations: Option<Vec<VaccinationPoint>>,
}

impl DashboardView {
    pub fn compute(
        cases: &CaseTable,
        vaccinations: Option<&VaccinationTable>,
        filter: &Filter,
        metric: RankMetric,
    ) -> Self {
        let series = smooth(&country_series(cases, filter), filter.smoothing_window);
        DashboardView {
            filter: filter.clone(),
            source: None,
            kpis: kpis_with_fallback(cases, filter, &series),
            weekly: weekly_for_filter(cases, filter),
            top: rank_countries(cases, filter.top_n, metric),
            rank_metric: metric.to_string(),
            vaccinations: vaccinations.and_then(|t| vaccination_series(t, filter)),
            series,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
