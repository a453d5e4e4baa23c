//! Loaded tables for the lifetime of one process.

use covid_core::cache::TableCache;
use covid_core::loader::Loader;
use covid_core::{CaseTable, Loaded, Source, VaccinationTable};
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Candidate sources plus the memoized tables loaded from them.
pub struct Session {
    loader: Loader,
    case_sources: Vec<Source>,
    vaccination_sources: Vec<Source>,
    cases: TableCache<Loaded<CaseTable>>,
    vaccinations: TableCache<Loaded<VaccinationTable>>,
}

impl Session {
    pub fn new(
        loader: Loader,
        case_sources: Vec<Source>,
        vaccination_sources: Vec<Source>,
        ttl: Duration,
    ) -> Self {
        Session {
            loader,
            case_sources,
            vaccination_sources,
            cases: TableCache::new(ttl),
            vaccinations: TableCache::new(ttl),
        }
    }

    /// The case table, loading it on first use or after the TTL lapses.
    pub async fn cases(&self) -> anyhow::Result<Arc<Loaded<CaseTable>>> {
        let loaded = self
            .cases
            .get_or_load(|| self.loader.load_first::<CaseTable>(&self.case_sources))
            .await?;
        Ok(loaded)
    }

    /// The vaccination table, or `None` when no vaccination sources are
    /// configured or none of them loads. Vaccination data is optional, so
    /// a failure here is logged as a warning rather than returned.
    pub async fn vaccinations(&self) -> Option<Arc<Loaded<VaccinationTable>>> {
        if self.vaccination_sources.is_empty() {
            return None;
        }
        match self
            .vaccinations
            .get_or_load(|| {
                self.loader
                    .load_first::<VaccinationTable>(&self.vaccination_sources)
            })
            .await
        {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                warn!("session: vaccination data unavailable, section omitted: {}", e);
                None
            }
        }
    }
}
