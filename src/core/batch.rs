use log::{info, warn};
use std::sync::Arc;

use super::config::ScraperConfig;
use super::errors::{ScraperError, ScraperResult};
use super::outcome::{BatchEntry, BatchResult, Outcome};
use super::router::{route, SourceKind};
use crate::browser::{BrowserLauncher, ChromeDriverLauncher};
use crate::http::HttpClient;
use crate::sources::{CountySource, KingSource, KitsapSource, PierceSource};
use crate::StatsTracker;

/// Splits a comma-separated parcel list, dropping blank entries.
pub fn parse_parcel_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drives extraction over an ordered list of parcels.
///
/// Parcels run one after another; every parcel gets exactly one outcome, in
/// input order, whatever happens to the others. A running batch cannot be
/// cancelled part way through.
pub struct BatchRunner {
    config: ScraperConfig,
    king: KingSource,
    kitsap: KitsapSource,
    pierce: PierceSource,
    stats: Arc<StatsTracker>,
}

impl BatchRunner {
    /// Runner backed by a live HTTP client and chromedriver.
    pub fn new(config: ScraperConfig) -> ScraperResult<Self> {
        let launcher = Arc::new(ChromeDriverLauncher::new(&config));
        Self::with_launcher(config, launcher)
    }

    pub fn with_launcher(
        config: ScraperConfig,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> ScraperResult<Self> {
        let stats = Arc::new(StatsTracker::new());
        let client = HttpClient::new(&config)?.with_stats(Arc::clone(&stats));

        Ok(Self {
            king: KingSource::new(client.clone(), &config),
            kitsap: KitsapSource::new(client, &config),
            pierce: PierceSource::new(launcher, &config),
            config,
            stats,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    fn source(&self, kind: SourceKind) -> Option<&dyn CountySource> {
        match kind {
            SourceKind::King => Some(&self.king),
            SourceKind::Kitsap => Some(&self.kitsap),
            SourceKind::Pierce => Some(&self.pierce),
            SourceKind::Unsupported => None,
        }
    }

    /// Extracts a single parcel, converting every failure into an outcome.
    pub async fn run_one(&self, parcel: &str, assessor_url: &str) -> Outcome {
        let kind = route(assessor_url);
        let Some(source) = self.source(kind) else {
            return ScraperError::UnsupportedSource {
                url: assessor_url.to_string(),
            }
            .into();
        };

        info!("Scraping parcel {} from {} County", parcel, kind.county_name());
        match source.scrape(parcel).await {
            Ok(record) => Outcome::Found(record),
            Err(e) => {
                warn!("Parcel {} failed: {}", parcel, e);
                e.into()
            }
        }
    }

    pub async fn run(&self, parcels: &[String], assessor_url: &str) -> BatchResult {
        let mut results = Vec::with_capacity(parcels.len());

        for parcel in parcels {
            let parcel = parcel.trim();
            let outcome = self.run_one(parcel, assessor_url).await;
            self.stats.record_outcome(&outcome);
            results.push(BatchEntry {
                parcel: parcel.to_string(),
                outcome,
            });
        }

        self.stats.finish();
        info!("Batch of {} parcels completed", results.len());
        BatchResult { results }
    }
}
