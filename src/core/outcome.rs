use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::errors::ScraperError;
use super::record::ParcelRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    RenderTimeout,
    NotFound,
    UnsupportedSource,
    Browser,
}

/// Result of extracting one parcel from one source.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found(ParcelRecord),
    Error { kind: ErrorKind, message: String },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn record(&self) -> Option<&ParcelRecord> {
        match self {
            Outcome::Found(record) => Some(record),
            Outcome::Error { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Found(_) => None,
            Outcome::Error { kind, .. } => Some(*kind),
        }
    }
}

impl From<ScraperError> for Outcome {
    fn from(err: ScraperError) -> Self {
        Outcome::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Result<ParcelRecord, ScraperError>> for Outcome {
    fn from(result: Result<ParcelRecord, ScraperError>) -> Self {
        match result {
            Ok(record) => Outcome::Found(record),
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub parcel: String,
    pub outcome: Outcome,
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("parcel_number", &self.parcel)?;
        match &self.outcome {
            Outcome::Found(record) => map.serialize_entry("data", record)?,
            Outcome::Error { kind, message } => {
                map.serialize_entry("error", message)?;
                map.serialize_entry("kind", kind)?;
            }
        }
        map.end()
    }
}

/// Per-parcel outcomes in caller input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub results: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry> {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Field;
    use serde_json::json;

    #[test]
    fn test_entry_json_shape() {
        let mut record = ParcelRecord::with_fields(&[Field::Parcel]);
        record.set_text(Field::Parcel, Some("42".to_string()));
        let batch = BatchResult {
            results: vec![
                BatchEntry {
                    parcel: "42".to_string(),
                    outcome: Outcome::Found(record),
                },
                BatchEntry {
                    parcel: "43".to_string(),
                    outcome: ScraperError::NotFound {
                        county: "King".to_string(),
                    }
                    .into(),
                },
            ],
        };

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({"results": [
                {"parcel_number": "42", "data": {"Parcel": "42"}},
                {
                    "parcel_number": "43",
                    "error": "Parcel Number not found in King County's Assessor Page!",
                    "kind": "not_found"
                }
            ]})
        );
    }
}
