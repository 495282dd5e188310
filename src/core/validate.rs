use super::errors::{ScraperError, ScraperResult};
use super::record::ParcelRecord;

/// Rejects a record in which every field came back absent.
///
/// One present field is enough: county sites routinely omit sections, so a
/// partial record still means the parcel exists.
// An all-absent record can also mean every selector broke after a markup
// change; the two cases are not distinguishable here.
pub fn check_parcel(record: &ParcelRecord, county: &str) -> ScraperResult<()> {
    if record.is_empty() {
        return Err(ScraperError::NotFound {
            county: county.to_string(),
        });
    }
    Ok(())
}
