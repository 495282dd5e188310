//! County-specific extraction behind one interface.
//!
//! Each source builds a [`ParcelRecord`] with every field it can produce and
//! leaves the existence decision to [`check_parcel`].

pub mod king;
pub mod kitsap;
pub mod pierce;

use async_trait::async_trait;
use log::debug;

use crate::core::record::ParcelRecord;
use crate::core::router::SourceKind;
use crate::core::validate::check_parcel;
use crate::ScraperResult;

pub use king::KingSource;
pub use kitsap::KitsapSource;
pub use pierce::PierceSource;

#[async_trait]
pub trait CountySource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetches and extracts every field this source knows about.
    async fn extract_fields(&self, parcel: &str) -> ScraperResult<ParcelRecord>;

    /// Extracts a parcel and rejects it when nothing was found.
    async fn scrape(&self, parcel: &str) -> ScraperResult<ParcelRecord> {
        let record = self.extract_fields(parcel).await?;
        for (field, value) in record.iter() {
            debug!("{} {}: {:?}", self.kind().county_name(), field, value);
        }
        check_parcel(&record, self.kind().county_name())?;
        Ok(record)
    }
}
