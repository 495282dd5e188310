use async_trait::async_trait;
use log::warn;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::CountySource;
use crate::core::config::ScraperConfig;
use crate::core::record::{Field, ParcelRecord};
use crate::core::router::SourceKind;
use crate::http::HttpClient;
use crate::parser::html;
use crate::ScraperResult;

static LEGAL_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.col-xs-12.col-sm-6.col-md-6.col-lg-8").expect("static selector")
});

const GENERAL_LABELS: [(&str, Field); 4] = [
    ("Taxpayer Name", Field::TaxpayerName),
    ("Parcel", Field::Parcel),
    ("Site Address", Field::SiteAddress),
    ("Property Class", Field::LandUseDescription),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KitsapPage {
    General,
    Legal,
    Land,
}

impl KitsapPage {
    const ALL: [KitsapPage; 3] = [KitsapPage::General, KitsapPage::Legal, KitsapPage::Land];

    fn query(&self) -> &'static str {
        match self {
            KitsapPage::General => "general",
            KitsapPage::Legal => "taxdescription",
            KitsapPage::Land => "landlocation",
        }
    }
}

/// Kitsap County parcel search: three page views per parcel, merged by field.
pub struct KitsapSource {
    client: HttpClient,
    base_url: String,
}

impl KitsapSource {
    pub fn new(client: HttpClient, config: &ScraperConfig) -> Self {
        Self {
            client,
            base_url: config.kitsap_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, parcel: &str, page: KitsapPage) -> String {
        format!(
            "{}/pdetails/Details?parcel={}&page={}",
            self.base_url,
            parcel,
            page.query()
        )
    }

    /// A failed page leaves its fields absent instead of failing the parcel.
    async fn fetch_page(&self, parcel: &str, page: KitsapPage) -> Option<String> {
        let url = self.page_url(parcel, page);
        match self.client.get(&url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Kitsap {:?} page unavailable for {}: {}", page, parcel, e);
                None
            }
        }
    }
}

/// Applies one fetched page's fields to the record.
pub fn merge_page(record: &mut ParcelRecord, page: KitsapPage, body: &str) {
    let doc = Html::parse_document(body);
    match page {
        KitsapPage::General => {
            for (label, field) in GENERAL_LABELS {
                record.set_text(field, html::value_after_strong_label(&doc, label));
            }
        }
        KitsapPage::Legal => {
            record.set_text(
                Field::LegalDescription,
                html::first_blockquote_in(&doc, &LEGAL_BLOCK),
            );
        }
        KitsapPage::Land => {
            record.set_text(
                Field::LandAcres,
                html::value_after_strong_label(&doc, "Acres"),
            );
            // The land view's description is more specific than the property class.
            record.supplement(
                Field::LandUseDescription,
                html::value_after_strong_label(&doc, "Land Use Description"),
            );
        }
    }
}

#[async_trait]
impl CountySource for KitsapSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Kitsap
    }

    async fn extract_fields(&self, parcel: &str) -> ScraperResult<ParcelRecord> {
        let mut record = ParcelRecord::with_fields(&Field::ALL);
        for page in KitsapPage::ALL {
            if let Some(body) = self.fetch_page(parcel, page).await {
                merge_page(&mut record, page, &body);
            }
        }
        Ok(record)
    }
}
