//! Query and aggregation engine over normalized COVID-19 tables.
//!
//! Every operation is a pure function of a table and a [`Filter`], so a
//! presentation layer can recompute its views on each filter change:
//!
//! ```rust
//! use covid_core::{CaseRecord, CaseTable, DateRange};
//! use covid_data::{country_series, smooth, CountrySelection, Filter};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2021, 1, d).unwrap();
//! let table = CaseTable::new(
//!     (1..=3)
//!         .map(|d| CaseRecord {
//!             date: day(d),
//!             country: "Testland".to_string(),
//!             country_code: None,
//!             who_region: None,
//!             new_cases: 10 * d as u64,
//!             total_cases: 0,
//!             new_deaths: 0,
//!             total_deaths: 0,
//!         })
//!         .collect(),
//! );
//! let filter = Filter::new(CountrySelection::World, DateRange(day(1), day(3)));
//! let series = smooth(&country_series(&table, &filter), 3);
//! assert_eq!(series[1].new_cases_smoothed, 20.0);
//! ```

pub mod filter;
pub mod kpi;
pub mod models;
pub mod series;
pub mod smoothing;
pub mod snapshot;
pub mod vaccination;
pub mod view;
pub mod weekly;

pub use filter::{CountrySelection, Filter};
pub use kpi::kpis_with_fallback;
pub use models::{DerivedPoint, Kpis, VaccinationPoint, WeeklyBucket};
pub use series::country_series;
pub use smoothing::{centered_rolling_mean, smooth};
pub use snapshot::{latest_per_country, rank_countries, top_n, RankMetric};
pub use vaccination::{latest_vaccinations, vaccination_series};
pub use view::DashboardView;
pub use weekly::{weekly_aggregate, weekly_for_filter};
