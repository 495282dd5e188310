//! The canonical parcel record every source produces.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical field names shared by every county source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Parcel,
    TaxpayerName,
    SiteAddress,
    LandUseDescription,
    LandAcres,
    LegalDescription,
    Exemptions,
    RelatedParcels,
}

impl Field {
    /// Every canonical field; each record carries all of them.
    pub const ALL: [Field; 8] = [
        Field::Parcel,
        Field::TaxpayerName,
        Field::SiteAddress,
        Field::LandUseDescription,
        Field::LandAcres,
        Field::LegalDescription,
        Field::Exemptions,
        Field::RelatedParcels,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Parcel => "Parcel",
            Field::TaxpayerName => "Taxpayer Name",
            Field::SiteAddress => "Site Address",
            Field::LandUseDescription => "Land Use Description",
            Field::LandAcres => "Land Acres",
            Field::LegalDescription => "Legal Description",
            Field::Exemptions => "Exemptions",
            Field::RelatedParcels => "Related Parcels",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Builds a text value, treating blank text as absent.
    pub fn text(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(FieldValue::Text(trimmed.to_string()))
        }
    }

    /// Builds a list value, treating an empty list as absent.
    pub fn list(items: Vec<String>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(FieldValue::List(items))
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::List(items) => items.serialize(serializer),
        }
    }
}

/// Mapping from canonical field to an optional value.
///
/// Sources start from [`Field::ALL`], so a field that was not found on the page,
/// or that the county never publishes, is present with `None` rather than
/// missing from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelRecord {
    fields: BTreeMap<Field, Option<FieldValue>>,
}

impl ParcelRecord {
    /// Creates a record with every listed field set to absent.
    pub fn with_fields(fields: &[Field]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f, None)).collect(),
        }
    }

    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        self.fields.insert(field, value);
    }

    pub fn set_text(&mut self, field: Field, value: Option<String>) {
        self.set(field, value.and_then(FieldValue::text));
    }

    /// Only overwrites when the new value is present.
    pub fn supplement(&mut self, field: Field, value: Option<String>) {
        if let Some(value) = value.and_then(FieldValue::text) {
            self.fields.insert(field, Some(value));
        } else {
            self.fields.entry(field).or_insert(None);
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field).and_then(|v| v.as_ref())
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&FieldValue>)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_ref()))
    }
}

impl Serialize for ParcelRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.label(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_fields_starts_absent() {
        let record = ParcelRecord::with_fields(&Field::ALL);
        assert!(record.is_empty());
        assert!(record.contains(Field::LegalDescription));
        assert!(record.contains(Field::Exemptions));
        assert!(!ParcelRecord::with_fields(&[Field::Parcel]).contains(Field::Exemptions));
    }

    #[test]
    fn test_blank_text_is_absent() {
        let mut record = ParcelRecord::with_fields(&[Field::SiteAddress]);
        record.set_text(Field::SiteAddress, Some("   ".to_string()));
        assert!(record.is_empty());
        assert!(record.contains(Field::SiteAddress));
    }

    #[test]
    fn test_supplement_keeps_existing_value() {
        let mut record = ParcelRecord::with_fields(&[Field::LandUseDescription]);
        record.set_text(Field::LandUseDescription, Some("Residential".to_string()));
        record.supplement(Field::LandUseDescription, None);
        assert_eq!(record.text(Field::LandUseDescription), Some("Residential"));

        record.supplement(Field::LandUseDescription, Some("Single Family".to_string()));
        assert_eq!(record.text(Field::LandUseDescription), Some("Single Family"));
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let mut record = ParcelRecord::with_fields(&[Field::Parcel, Field::RelatedParcels]);
        record.set_text(Field::Parcel, Some("0123".to_string()));
        record.set(
            Field::RelatedParcels,
            FieldValue::list(vec!["Group Account Number 9".to_string()]),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"Parcel": "0123", "Related Parcels": ["Group Account Number 9"]})
        );

        let empty = ParcelRecord::with_fields(&[Field::Exemptions]);
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({"Exemptions": null})
        );
    }
}
