use serde::Serialize;

use super::config::ScraperConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    King,
    Kitsap,
    Pierce,
    Unsupported,
}

const HOST_FRAGMENTS: [(&str, SourceKind); 3] = [
    ("kingcounty", SourceKind::King),
    ("kitsap.gov", SourceKind::Kitsap),
    ("piercecountywa", SourceKind::Pierce),
];

/// Maps an assessor URL to its source by case-insensitive host fragment.
pub fn route(assessor_url: &str) -> SourceKind {
    let url = assessor_url.to_lowercase();
    HOST_FRAGMENTS
        .iter()
        .find(|(fragment, _)| url.contains(fragment))
        .map(|(_, kind)| *kind)
        .unwrap_or(SourceKind::Unsupported)
}

impl SourceKind {
    pub fn county_name(&self) -> &'static str {
        match self {
            SourceKind::King => "King",
            SourceKind::Kitsap => "Kitsap",
            SourceKind::Pierce => "Pierce",
            SourceKind::Unsupported => "Unsupported",
        }
    }

    /// Public detail page for a parcel, used as the report's parcel summary link.
    pub fn summary_url(&self, parcel: &str, config: &ScraperConfig) -> Option<String> {
        match self {
            SourceKind::King => Some(format!(
                "{}/Assessor/eRealProperty/Detail.aspx?ParcelNbr={}",
                config.king_base_url.trim_end_matches('/'),
                parcel
            )),
            SourceKind::Kitsap => Some(format!(
                "{}/pdetails/Details?parcel={}&page=general",
                config.kitsap_base_url.trim_end_matches('/'),
                parcel
            )),
            SourceKind::Pierce => Some(format!(
                "{}/app/v2/propertyDetail/{}/summary",
                config.pierce_base_url.trim_end_matches('/'),
                parcel
            )),
            SourceKind::Unsupported => None,
        }
    }
}
