//! Record types, CSV normalization and source loading for COVID-19
//! case, death and vaccination datasets.
//!
//! Tables are loaded through [`loader::Loader`], which walks a list of
//! [`source::Source`] candidates, and are memoized per session with
//! [`cache::TableCache`].

pub mod cache;
pub mod date_range;
pub mod error;
pub mod loader;
pub mod record;
pub mod remote;
pub mod schema;
pub mod source;
pub mod table;

pub use date_range::DateRange;
pub use error::{CoreError, DataUnavailableError, SourceAttempt};
pub use record::{
    CaseRecord, CountryDated, VaccinationMetrics, VaccinationRecord, OWID_CODE_PREFIX,
    OWID_COUNTRY_CODES, WORLD,
};
pub use source::{Loaded, Source};
pub use table::{CaseTable, Dataset, VaccinationTable};
