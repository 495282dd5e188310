use async_trait::async_trait;
use scraper::Html;

use super::CountySource;
use crate::core::config::ScraperConfig;
use crate::core::record::{Field, ParcelRecord};
use crate::core::router::SourceKind;
use crate::http::HttpClient;
use crate::parser::html;
use crate::ScraperResult;

const LABELS: [(&str, Field); 5] = [
    ("Parcel", Field::Parcel),
    ("Name", Field::TaxpayerName),
    ("Predominant Use", Field::LandUseDescription),
    ("Acres", Field::LandAcres),
    ("Site Address", Field::SiteAddress),
];

/// Rendered outside the label/value table.
const LEGAL_DESCRIPTION_ID: &str = "cphContent_FormViewLegalDescription_LabelLegalDescription";

/// King County eRealProperty: one static detail page per parcel.
pub struct KingSource {
    client: HttpClient,
    base_url: String,
}

impl KingSource {
    pub fn new(client: HttpClient, config: &ScraperConfig) -> Self {
        Self {
            client,
            base_url: config.king_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn detail_url(&self, parcel: &str) -> String {
        format!(
            "{}/Assessor/eRealProperty/Detail.aspx?ParcelNbr={}",
            self.base_url, parcel
        )
    }
}

/// Reads the King detail page into a record.
pub fn parse_detail_page(body: &str) -> ParcelRecord {
    let doc = Html::parse_document(body);
    let mut record = ParcelRecord::with_fields(&Field::ALL);

    for (label, field) in LABELS {
        record.set_text(field, html::value_after_label(&doc, label));
    }
    record.set_text(
        Field::LegalDescription,
        html::text_by_id(&doc, LEGAL_DESCRIPTION_ID),
    );
    record
}

#[async_trait]
impl CountySource for KingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::King
    }

    async fn extract_fields(&self, parcel: &str) -> ScraperResult<ParcelRecord> {
        let body = self.client.get(&self.detail_url(parcel)).await?;
        Ok(parse_detail_page(&body))
    }
}
