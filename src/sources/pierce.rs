use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::CountySource;
use crate::browser::{BrowserLauncher, BrowserSession, Locator};
use crate::core::config::ScraperConfig;
use crate::core::record::{Field, FieldValue, ParcelRecord};
use crate::core::router::SourceKind;
use crate::ScraperResult;

/// Cell whose presence marks the summary page as rendered.
const SUMMARY_ANCHOR: &str = "Parcel Number";

const SUMMARY_LABELS: [(&str, Field); 4] = [
    ("Parcel Number", Field::Parcel),
    ("Site Address", Field::SiteAddress),
    ("Use Code", Field::LandUseDescription),
    ("Taxpayer Name", Field::TaxpayerName),
];

const LEGAL_PANEL: &str = "Tax Description";
const RELATED_LABEL: &str = "Group Account Number";

/// Pierce County ATIP: a JavaScript application read through a browser session.
pub struct PierceSource {
    launcher: Arc<dyn BrowserLauncher>,
    base_url: String,
    field_wait: Duration,
    page_load_wait: Duration,
}

impl PierceSource {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: &ScraperConfig) -> Self {
        Self {
            launcher,
            base_url: config.pierce_base_url.trim_end_matches('/').to_string(),
            field_wait: config.field_wait,
            page_load_wait: config.page_load_wait,
        }
    }

    pub fn page_url(&self, parcel: &str, view: &str) -> String {
        format!("{}/app/v2/propertyDetail/{}/{}", self.base_url, parcel, view)
    }

    /// Value cell after `label`, or absent when it never renders.
    async fn field(&self, session: &mut dyn BrowserSession, label: &str) -> Option<String> {
        let locator = Locator::ValueAfterLabel(label.to_string());
        match session.wait_for(&locator, self.field_wait).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Pierce field '{}' unavailable: {}", label, e);
                None
            }
        }
    }

    async fn first_match(
        &self,
        session: &mut dyn BrowserSession,
        locator: &Locator,
    ) -> Option<String> {
        match session.find_all(locator).await {
            Ok(texts) => texts.into_iter().next(),
            Err(e) => {
                debug!("Pierce {} unavailable: {}", locator, e);
                None
            }
        }
    }

    async fn related_parcels(&self, session: &mut dyn BrowserSession) -> Option<FieldValue> {
        let links = session
            .find_all(&Locator::LinksAfterLabel(RELATED_LABEL.to_string()))
            .await
            .unwrap_or_else(|e| {
                debug!("Pierce related parcels unavailable: {}", e);
                Vec::new()
            });

        let related = links
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .map(|text| format!("{} {}", RELATED_LABEL, text))
            .collect();
        FieldValue::list(related)
    }

    /// The anchor wait is the only fatal lookup on the summary page.
    async fn scrape_summary(
        &self,
        session: &mut dyn BrowserSession,
        parcel: &str,
        record: &mut ParcelRecord,
    ) -> ScraperResult<()> {
        session.navigate(&self.page_url(parcel, "summary")).await?;
        session
            .wait_for(
                &Locator::LabelCell(SUMMARY_ANCHOR.to_string()),
                self.page_load_wait,
            )
            .await?;

        for (label, field) in SUMMARY_LABELS {
            record.set_text(field, self.field(session, label).await);
        }

        let legal = self
            .first_match(session, &Locator::PanelBody(LEGAL_PANEL.to_string()))
            .await;
        record.set_text(Field::LegalDescription, legal);
        record.set(Field::RelatedParcels, self.related_parcels(session).await);
        Ok(())
    }

    /// Reads one labelled value from a secondary page view.
    async fn scrape_view(
        &self,
        session: &mut dyn BrowserSession,
        parcel: &str,
        view: &str,
        label: &str,
    ) -> Option<String> {
        if let Err(e) = session.navigate(&self.page_url(parcel, view)).await {
            warn!("Pierce {} page unavailable for {}: {}", view, parcel, e);
            return None;
        }
        self.field(session, label).await
    }

    async fn extract_with(
        &self,
        session: &mut dyn BrowserSession,
        parcel: &str,
    ) -> ScraperResult<ParcelRecord> {
        let mut record = ParcelRecord::with_fields(&Field::ALL);
        self.scrape_summary(session, parcel, &mut record).await?;

        let exemptions = self.scrape_view(session, parcel, "taxes", "Type").await;
        record.set_text(Field::Exemptions, exemptions);

        let acres = self.scrape_view(session, parcel, "land", "Acres").await;
        record.supplement(Field::LandAcres, acres);
        Ok(record)
    }
}

#[async_trait]
impl CountySource for PierceSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Pierce
    }

    async fn extract_fields(&self, parcel: &str) -> ScraperResult<ParcelRecord> {
        let mut session = self.launcher.open().await?;
        let result = self.extract_with(session.as_mut(), parcel).await;
        if let Err(e) = session.close().await {
            warn!("Failed to close browser session for {}: {}", parcel, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::MockBrowser;
    use crate::core::outcome::ErrorKind;
    use crate::ScraperError;

    const BASE: &str = "http://pierce.test";

    const SUMMARY: &str = r##"
        <table>
          <tr><td>Parcel Number</td><td>0120034001</td></tr>
          <tr><td>Site Address</td><td>930 TACOMA AVE S</td></tr>
          <tr><td>Use Code</td><td>1101 Single Family Dwelling</td></tr>
          <tr><td>Taxpayer Name</td><td>DOE JANE</td></tr>
          <tr><td>Group Account Number</td><td><a href="#">0120034002</a><a href="#"> </a></td></tr>
        </table>
        <div class="panel">
          <div class="panel-heading"><div class="panel-title">Tax Description</div></div>
          <div class="panel-body"><div>Section 03 Township 20 Range 03 Quarter 11</div></div>
        </div>
    "##;

    const TAXES: &str = "<table><tr><td>Type</td><td>Senior/Disabled</td></tr></table>";
    const LAND: &str = "<table><tr><td>Acres</td><td>0.17</td></tr></table>";

    fn config() -> ScraperConfig {
        ScraperConfig::default().with_pierce_base_url(BASE)
    }

    fn page(parcel: &str, view: &str) -> String {
        format!("{}/app/v2/propertyDetail/{}/{}", BASE, parcel, view)
    }

    fn source(browser: &MockBrowser) -> PierceSource {
        PierceSource::new(Arc::new(browser.clone()), &config())
    }

    #[tokio::test]
    async fn test_full_extraction() {
        let browser = MockBrowser::new()
            .with_page(page("0120034001", "summary"), SUMMARY)
            .with_page(page("0120034001", "taxes"), TAXES)
            .with_page(page("0120034001", "land"), LAND);

        let record = source(&browser).scrape("0120034001").await.unwrap();

        assert_eq!(record.text(Field::Parcel), Some("0120034001"));
        assert_eq!(record.text(Field::SiteAddress), Some("930 TACOMA AVE S"));
        assert_eq!(
            record.text(Field::LandUseDescription),
            Some("1101 Single Family Dwelling")
        );
        assert_eq!(record.text(Field::TaxpayerName), Some("DOE JANE"));
        assert_eq!(
            record.text(Field::LegalDescription),
            Some("Section 03 Township 20 Range 03 Quarter 11")
        );
        assert_eq!(record.text(Field::Exemptions), Some("Senior/Disabled"));
        assert_eq!(record.text(Field::LandAcres), Some("0.17"));
        assert_eq!(
            record.get(Field::RelatedParcels),
            Some(&FieldValue::List(vec![
                "Group Account Number 0120034002".to_string()
            ]))
        );
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_missing_sections_are_absent() {
        let summary = "<table><tr><td>Parcel Number</td><td>77</td></tr></table>";
        let browser = MockBrowser::new().with_page(page("77", "summary"), summary);

        let record = source(&browser).scrape("77").await.unwrap();

        assert_eq!(record.text(Field::Parcel), Some("77"));
        assert!(record.contains(Field::RelatedParcels));
        assert!(record.get(Field::RelatedParcels).is_none());
        assert!(record.get(Field::Exemptions).is_none());
        assert!(record.get(Field::LandAcres).is_none());
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_anchor_timeout_is_fatal_and_closes_session() {
        let browser = MockBrowser::new();

        let err = source(&browser).scrape("A").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RenderTimeout);
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_summary_navigation_failure_is_fatal_and_closes_session() {
        let browser = MockBrowser::new()
            .with_page(page("A", "summary"), SUMMARY)
            .with_failing_navigation(page("A", "summary"));

        let err = source(&browser).scrape("A").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Browser);
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_secondary_view_navigation_failure_leaves_field_absent() {
        let browser = MockBrowser::new()
            .with_page(page("0120034001", "summary"), SUMMARY)
            .with_failing_navigation(page("0120034001", "taxes"))
            .with_page(page("0120034001", "land"), LAND);

        let record = source(&browser).scrape("0120034001").await.unwrap();

        assert!(record.contains(Field::Exemptions));
        assert!(record.get(Field::Exemptions).is_none());
        assert_eq!(record.text(Field::LandAcres), Some("0.17"));
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_blank_summary_is_not_found_and_closes_session() {
        let summary = "<table><tr><td>Parcel Number</td><td></td></tr></table>";
        let browser = MockBrowser::new().with_page(page("0", "summary"), summary);

        let err = source(&browser).scrape("0").await.unwrap_err();

        assert!(matches!(err, ScraperError::NotFound { ref county } if county == "Pierce"));
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_is_browser_error() {
        let browser = MockBrowser::new().with_failing_open();

        let err = source(&browser).scrape("A").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Browser);
        assert_eq!(browser.opened(), 0);
    }
}
