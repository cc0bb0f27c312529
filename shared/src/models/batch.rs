//! Herb batch records as delivered by the data-access layer
//!
//! Decoding is deliberately forgiving: upstream services send loosely typed
//! JSON, so every field is optional and a value of the wrong shape decodes
//! as absent instead of failing the whole payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::parse_timestamp;

/// Category label used for batches without a species
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// A traceable batch of harvested herb material
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchRecord {
    #[serde(
        alias = "batchID",
        alias = "batchId",
        deserialize_with = "lenient::string_or_empty"
    )]
    pub batch_id: String,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub species: Option<String>,
    #[serde(
        alias = "farmerID",
        alias = "farmerId",
        deserialize_with = "lenient::optional_string"
    )]
    pub farmer_id: Option<String>,
    #[serde(
        alias = "cultivationLocation",
        deserialize_with = "lenient::optional_string"
    )]
    pub cultivation_location: Option<String>,
    /// Raw harvest timestamp, see [`crate::parse_timestamp`]
    #[serde(alias = "harvestDate", deserialize_with = "lenient::optional_string")]
    pub harvest_date: Option<String>,
    #[serde(alias = "currentOwner", deserialize_with = "lenient::optional_string")]
    pub current_owner: Option<String>,
    /// Append-only custody log, oldest first
    #[serde(alias = "ownerHistory", deserialize_with = "lenient::optional_sequence")]
    pub owner_history: Option<Vec<OwnerEvent>>,
    #[serde(
        alias = "processingSteps",
        deserialize_with = "lenient::optional_sequence"
    )]
    pub processing_steps: Option<Vec<ProcessingStep>>,
    #[serde(alias = "createdAt", deserialize_with = "lenient::optional_string")]
    pub created_at: Option<String>,
    #[serde(alias = "updatedAt", deserialize_with = "lenient::optional_string")]
    pub updated_at: Option<String>,
}

/// One custody transfer in a batch's owner history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OwnerEvent {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub owner: Option<String>,
    /// Some producers send the custodian as `name` instead of `owner`
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub timestamp: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub note: Option<String>,
}

impl OwnerEvent {
    /// Custodian label, preferring `owner` over `name`
    pub fn custodian(&self) -> Option<&str> {
        non_empty(self.owner.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }
}

/// One logged processing step (drying, grinding, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingStep {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub step: Option<String>,
    /// Some producers send the step label as `name` instead of `step`
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub details: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_string"
    )]
    pub timestamp: Option<String>,
}

impl ProcessingStep {
    /// Step label, preferring `step` over `name`
    pub fn label(&self) -> Option<&str> {
        non_empty(self.step.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }
}

impl BatchRecord {
    /// Species label with missing or empty values mapped to [`UNKNOWN_SPECIES`]
    pub fn species_label(&self) -> &str {
        non_empty(self.species.as_deref()).unwrap_or(UNKNOWN_SPECIES)
    }

    /// Farmer identity used for distinct counting; `None` is the unknown farmer
    pub fn farmer_key(&self) -> Option<&str> {
        non_empty(self.farmer_id.as_deref())
    }

    pub fn has_owner_history(&self) -> bool {
        self.owner_history.as_ref().is_some_and(|events| !events.is_empty())
    }

    pub fn has_processing_steps(&self) -> bool {
        self.processing_steps
            .as_ref()
            .is_some_and(|steps| !steps.is_empty())
    }

    /// Origin, harvest date and current custodian are all recorded
    pub fn has_essential_fields(&self) -> bool {
        non_empty(self.cultivation_location.as_deref()).is_some()
            && non_empty(self.harvest_date.as_deref()).is_some()
            && non_empty(self.current_owner.as_deref()).is_some()
    }

    /// Timestamp used for time bucketing: `created_at` when parseable, else `harvest_date`
    pub fn activity_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.harvest_date.as_deref().and_then(parse_timestamp))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Errors for payloads whose overall shape is unusable
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("expected a JSON array of batches, found {0}")]
    NotAList(&'static str),

    #[error("expected a JSON object for a batch, found {0}")]
    NotAnObject(&'static str),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Decode a batch list payload.
///
/// The payload itself must be an array. Elements that are not objects decode
/// as records with every field absent so that totals still account for them.
pub fn parse_batch_list(value: Value) -> Result<Vec<BatchRecord>, PayloadError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(decode_record).collect()),
        other => Err(PayloadError::NotAList(json_kind(&other))),
    }
}

/// Decode a single batch payload, which must be a JSON object
pub fn parse_batch(value: Value) -> Result<BatchRecord, PayloadError> {
    match value {
        Value::Object(_) => Ok(decode_record(value)),
        other => Err(PayloadError::NotAnObject(json_kind(&other))),
    }
}

/// Decode a batch list from JSON text
pub fn parse_batch_list_str(json: &str) -> Result<Vec<BatchRecord>, PayloadError> {
    parse_batch_list(serde_json::from_str(json)?)
}

/// Accepted spellings per field, canonical snake_case name first
const FIELD_ALIASES: [(&str, &[&str]); 10] = [
    ("batch_id", &["batchID", "batchId"]),
    ("species", &[]),
    ("farmer_id", &["farmerID", "farmerId"]),
    ("cultivation_location", &["cultivationLocation"]),
    ("harvest_date", &["harvestDate"]),
    ("current_owner", &["currentOwner"]),
    ("owner_history", &["ownerHistory"]),
    ("processing_steps", &["processingSteps"]),
    ("created_at", &["createdAt"]),
    ("updated_at", &["updatedAt"]),
];

/// Fold every alias onto its canonical key so a record carrying two
/// spellings of one field still decodes. The snake_case value wins unless
/// it is null.
fn canonicalize(mut fields: Map<String, Value>) -> Map<String, Value> {
    for (canonical, aliases) in FIELD_ALIASES {
        let mut chosen = fields.remove(canonical).filter(|v| !v.is_null());
        for alias in aliases {
            let value = fields.remove(*alias).filter(|v| !v.is_null());
            chosen = chosen.or(value);
        }
        if let Some(value) = chosen {
            fields.insert(canonical.to_string(), value);
        }
    }
    fields
}

fn decode_record(value: Value) -> BatchRecord {
    match value {
        Value::Object(fields) => {
            serde_json::from_value(Value::Object(canonicalize(fields))).unwrap_or_default()
        }
        _ => BatchRecord::default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_text(Option::<Value>::deserialize(deserializer)?))
    }

    pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(optional_string(deserializer)?.unwrap_or_default())
    }

    /// Arrays decode element-wise; any other shape is treated as absent
    pub fn optional_sequence<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        })
    }

    fn scalar_text(value: Option<Value>) -> Option<String> {
        match value? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_snake_case_record() {
        let record = parse_batch(json!({
            "batch_id": "AYU-001",
            "species": "Ashwagandha",
            "farmer_id": "F-9",
            "cultivation_location": "Madhya Pradesh",
            "harvest_date": "2024-03-01",
            "current_owner": "Processor-3",
            "owner_history": [{"owner": "F-9", "timestamp": "2024-03-01T00:00:00Z"}],
            "processing_steps": [{"step": "Drying", "details": "Shade dried"}],
            "created_at": "2024-03-02T09:00:00Z",
            "updated_at": "2024-03-04T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.batch_id, "AYU-001");
        assert_eq!(record.species.as_deref(), Some("Ashwagandha"));
        assert!(record.has_owner_history());
        assert!(record.has_processing_steps());
        assert!(record.has_essential_fields());
        assert_eq!(
            record.processing_steps.unwrap()[0].details.as_deref(),
            Some("Shade dried")
        );
    }

    #[test]
    fn test_decode_camel_case_aliases() {
        let record = parse_batch(json!({
            "batchID": "AYU-002",
            "farmerID": "F-1",
            "cultivationLocation": "Kerala",
            "harvestDate": "2024-05-10",
            "currentOwner": "F-1",
            "ownerHistory": [],
            "processingSteps": [],
            "createdAt": "2024-05-11T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.batch_id, "AYU-002");
        assert_eq!(record.farmer_id.as_deref(), Some("F-1"));
        assert_eq!(record.owner_history, Some(vec![]));
        assert!(!record.has_owner_history());
        assert!(record.has_essential_fields());
    }

    #[test]
    fn test_both_spellings_of_a_field_keep_the_record() {
        let record = parse_batch(json!({
            "batch_id": "AYU-1",
            "batchId": "AYU-1",
            "species": "Tulsi",
            "farmer_id": "F1",
            "farmerID": "F9",
            "createdAt": "2024-05-11T00:00:00Z",
            "created_at": null
        }))
        .unwrap();

        assert_eq!(record.batch_id, "AYU-1");
        assert_eq!(record.species.as_deref(), Some("Tulsi"));
        // snake_case wins over the alias
        assert_eq!(record.farmer_id.as_deref(), Some("F1"));
        // a null canonical value falls back to the alias
        assert_eq!(record.created_at.as_deref(), Some("2024-05-11T00:00:00Z"));

        let records = parse_batch_list(json!([
            {"batchID": "AYU-2", "batchId": "AYU-2", "species": "Neem"}
        ]))
        .unwrap();
        assert_eq!(records[0].batch_id, "AYU-2");
        assert_eq!(records[0].species_label(), "Neem");
    }

    #[test]
    fn test_missing_fields_decode_as_absent() {
        let record = parse_batch(json!({})).unwrap();
        assert_eq!(record, BatchRecord::default());
        assert_eq!(record.species_label(), UNKNOWN_SPECIES);
        assert!(record.farmer_key().is_none());
        assert!(record.activity_timestamp().is_none());
    }

    #[test]
    fn test_wrong_shapes_degrade_instead_of_failing() {
        let record = parse_batch(json!({
            "batch_id": 42,
            "species": {"latin": "Withania somnifera"},
            "owner_history": "transferred once",
            "processing_steps": [ "drying", {"name": "Grinding"} ],
            "current_owner": null
        }))
        .unwrap();

        assert_eq!(record.batch_id, "42");
        assert!(record.species.is_none());
        assert!(record.owner_history.is_none());
        assert!(record.current_owner.is_none());

        let steps = record.processing_steps.unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], ProcessingStep::default());
        assert_eq!(steps[1].label(), Some("Grinding"));
    }

    #[test]
    fn test_list_keeps_non_object_elements() {
        let records = parse_batch_list(json!([{"batch_id": "A"}, 7, null])).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].batch_id, "A");
        assert_eq!(records[1], BatchRecord::default());
    }

    #[test]
    fn test_payload_shape_errors() {
        assert!(matches!(
            parse_batch_list(json!({"batches": []})),
            Err(PayloadError::NotAList("an object"))
        ));
        assert!(matches!(
            parse_batch(json!([1, 2])),
            Err(PayloadError::NotAnObject("an array"))
        ));
        assert!(matches!(
            parse_batch_list_str("[{"),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_activity_timestamp_falls_back_to_harvest_date() {
        let record = BatchRecord {
            created_at: Some("garbage".into()),
            harvest_date: Some("2024-08-15".into()),
            ..Default::default()
        };
        let ts = record.activity_timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m").to_string(), "2024-08");
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let record = BatchRecord {
            species: Some(String::new()),
            farmer_id: Some(String::new()),
            cultivation_location: Some("Uttarakhand".into()),
            harvest_date: Some(String::new()),
            current_owner: Some("Lab-2".into()),
            ..Default::default()
        };
        assert_eq!(record.species_label(), UNKNOWN_SPECIES);
        assert!(record.farmer_key().is_none());
        assert!(!record.has_essential_fields());
    }

    #[test]
    fn test_event_labels_prefer_primary_field() {
        let event = OwnerEvent {
            owner: Some(String::new()),
            name: Some("Distributor".into()),
            ..Default::default()
        };
        assert_eq!(event.custodian(), Some("Distributor"));

        let step = ProcessingStep {
            step: Some("Washing".into()),
            name: Some("ignored".into()),
            ..Default::default()
        };
        assert_eq!(step.label(), Some("Washing"));
    }
}
