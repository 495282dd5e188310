use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::outcome::{ErrorKind, Outcome};

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_requests: usize,
    pub failed_requests: usize,
    pub bytes_downloaded: usize,
    pub parcels_found: usize,
    pub parcel_errors: HashMap<ErrorKind, usize>,
    pub average_response_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                total_requests: 0,
                failed_requests: 0,
                bytes_downloaded: 0,
                parcels_found: 0,
                parcel_errors: HashMap::new(),
                average_response_time: 0.0,
            })),
        }
    }

    pub fn record_request(&self, size: usize, duration: Duration) {
        let mut stats = self.stats.write();
        stats.total_requests += 1;
        stats.bytes_downloaded += size;

        let completed = stats.total_requests - stats.failed_requests;
        let current_total = stats.average_response_time * (completed - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_response_time = (current_total + new_duration) / completed as f64;
    }

    pub fn record_failed_request(&self) {
        let mut stats = self.stats.write();
        stats.total_requests += 1;
        stats.failed_requests += 1;
    }

    pub fn record_outcome(&self, outcome: &Outcome) {
        let mut stats = self.stats.write();
        match outcome.error_kind() {
            None => stats.parcels_found += 1,
            Some(kind) => *stats.parcel_errors.entry(kind).or_insert(0) += 1,
        }
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!("Duration: {} seconds", duration.num_seconds());
        info!(
            "Requests: {} total, {} failed, {:.2} KB downloaded, {:.2}ms average",
            stats.total_requests,
            stats.failed_requests,
            stats.bytes_downloaded as f64 / 1_000.0,
            stats.average_response_time
        );
        info!("Parcels found: {}", stats.parcels_found);
        for (kind, count) in &stats.parcel_errors {
            info!("Parcel errors ({:?}): {}", kind, count);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
