//! Values a report writer needs from a batch.
//!
//! Document generation itself lives outside this crate; these helpers fix the
//! field order, the "N/A" convention and the download file name.

use crate::core::config::ScraperConfig;
use crate::core::outcome::BatchResult;
use crate::core::record::{Field, ParcelRecord};
use crate::core::router::route;

pub const NOT_AVAILABLE: &str = "N/A";

const MAX_STEM_LEN: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    /// Link to the parcel's page on the assessor site.
    ParcelSummary,
    Record(Field),
}

pub const REPORT_FIELDS: [ReportField; 8] = [
    ReportField::ParcelSummary,
    ReportField::Record(Field::SiteAddress),
    ReportField::Record(Field::TaxpayerName),
    ReportField::Record(Field::LandAcres),
    ReportField::Record(Field::LandUseDescription),
    ReportField::Record(Field::LegalDescription),
    ReportField::Record(Field::Exemptions),
    ReportField::Record(Field::RelatedParcels),
];

impl ReportField {
    pub fn label(&self) -> &'static str {
        match self {
            ReportField::ParcelSummary => "Parcel Summary",
            ReportField::Record(field) => field.label(),
        }
    }
}

pub fn field_or_na(record: &ParcelRecord, field: Field) -> String {
    record
        .get(field)
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Label/value lines for one parcel, in report order.
pub fn report_lines(
    record: &ParcelRecord,
    parcel: &str,
    assessor_url: &str,
    config: &ScraperConfig,
) -> Vec<(&'static str, String)> {
    let kind = route(assessor_url);
    REPORT_FIELDS
        .iter()
        .map(|rf| {
            let value = match rf {
                ReportField::ParcelSummary => kind
                    .summary_url(parcel, config)
                    .unwrap_or_else(|| assessor_url.to_string()),
                ReportField::Record(field) => field_or_na(record, *field),
            };
            (rf.label(), value)
        })
        .collect()
}

/// File name stem built from each parcel's site address, or its id.
pub fn file_stem(batch: &BatchResult) -> String {
    let mut combined = batch
        .iter()
        .map(|entry| {
            entry
                .outcome
                .record()
                .and_then(|r| r.text(Field::SiteAddress))
                .unwrap_or(entry.parcel.as_str())
                .replace(' ', "_")
        })
        .collect::<Vec<_>>()
        .join("_");

    if combined.chars().count() > MAX_STEM_LEN {
        combined = combined.chars().take(MAX_STEM_LEN).collect::<String>() + "_etc";
    }
    format!("{}_Property_Summary", combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::{BatchEntry, ErrorKind, Outcome};
    use crate::core::record::FieldValue;

    fn record_with_address(address: &str) -> ParcelRecord {
        let mut record = ParcelRecord::with_fields(&Field::ALL);
        record.set_text(Field::SiteAddress, Some(address.to_string()));
        record
    }

    #[test]
    fn test_report_lines_fill_na() {
        let mut record = record_with_address("1 MAIN ST");
        record.set(
            Field::RelatedParcels,
            FieldValue::list(vec![
                "Group Account Number 1".to_string(),
                "Group Account Number 2".to_string(),
            ]),
        );
        let lines = report_lines(
            &record,
            "123",
            "https://blue.kingcounty.com",
            &ScraperConfig::default(),
        );

        assert_eq!(lines.len(), REPORT_FIELDS.len());
        assert_eq!(
            lines[0],
            (
                "Parcel Summary",
                "https://blue.kingcounty.com/Assessor/eRealProperty/Detail.aspx?ParcelNbr=123"
                    .to_string()
            )
        );
        assert_eq!(lines[1], ("Site Address", "1 MAIN ST".to_string()));
        assert_eq!(lines[2], ("Taxpayer Name", "N/A".to_string()));
        assert_eq!(lines[6], ("Exemptions", "N/A".to_string()));
        assert_eq!(
            lines[7],
            (
                "Related Parcels",
                "Group Account Number 1, Group Account Number 2".to_string()
            )
        );
    }

    #[test]
    fn test_file_stem_uses_address_or_parcel() {
        let batch = BatchResult {
            results: vec![
                BatchEntry {
                    parcel: "1".to_string(),
                    outcome: Outcome::Found(record_with_address("1 MAIN ST")),
                },
                BatchEntry {
                    parcel: "2".to_string(),
                    outcome: Outcome::Error {
                        kind: ErrorKind::NotFound,
                        message: "missing".to_string(),
                    },
                },
            ],
        };
        assert_eq!(file_stem(&batch), "1_MAIN_ST_2_Property_Summary");
    }

    #[test]
    fn test_file_stem_truncates() {
        let results = (0..40)
            .map(|i| BatchEntry {
                parcel: format!("parcel{:03}", i),
                outcome: Outcome::Error {
                    kind: ErrorKind::Transport,
                    message: String::new(),
                },
            })
            .collect();
        let stem = file_stem(&BatchResult { results });

        assert!(stem.ends_with("_etc_Property_Summary"));
        assert_eq!(stem.len(), MAX_STEM_LEN + "_etc_Property_Summary".len());
    }
}
