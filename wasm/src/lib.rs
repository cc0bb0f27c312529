//! WebAssembly module for the AyurChain supply-chain dashboard
//!
//! Provides client-side computation for:
//! - Dashboard analytics over fetched batch JSON
//! - Batch lookup within a fetched list
//! - Last-request-wins sequencing of batch lookups

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::analytics::*;
pub use shared::lookup::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&"AyurChain analytics module loaded".into());
}

fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn with_batches<T, F>(batches_json: &str, view: F) -> Result<String, String>
where
    T: Serialize,
    F: FnOnce(&[BatchRecord]) -> T,
{
    let records = parse_batch_list_str(batches_json)
        .map_err(|e| format!("Invalid batches JSON: {}", e))?;
    to_json(&view(&records))
}

fn dashboard_json(batches_json: &str) -> Result<String, String> {
    with_batches(batches_json, build_dashboard)
}

fn find_batch_json(batches_json: &str, batch_id: &str) -> Result<Option<String>, String> {
    validate_batch_id(batch_id).map_err(String::from)?;
    let records = parse_batch_list_str(batches_json)
        .map_err(|e| format!("Invalid batches JSON: {}", e))?;

    match find_batch(&records, batch_id) {
        Ok(record) => to_json(&describe_batch(record)).map(Some),
        Err(LookupError::NotFound(_)) => Ok(None),
        Err(e @ LookupError::DuplicateBatchId { .. }) => Err(e.to_string()),
    }
}

/// Compute every dashboard view from a JSON array of batches
#[wasm_bindgen]
pub fn compute_dashboard(batches_json: &str) -> Result<String, JsValue> {
    dashboard_json(batches_json).map_err(to_js_error)
}

/// Species distribution in first-seen order
#[wasm_bindgen]
pub fn group_species(batches_json: &str) -> Result<String, JsValue> {
    with_batches(batches_json, group_by_species).map_err(to_js_error)
}

/// Twelve-month batch flow, January first
#[wasm_bindgen]
pub fn monthly_batch_flow(batches_json: &str) -> Result<String, JsValue> {
    with_batches(batches_json, monthly_flow).map_err(to_js_error)
}

/// Traceability, processing and completeness percentages
#[wasm_bindgen]
pub fn compliance(batches_json: &str) -> Result<String, JsValue> {
    with_batches(batches_json, compliance_metrics).map_err(to_js_error)
}

/// Totals, distinct farmers and recent activity
#[wasm_bindgen]
pub fn activity_summary(batches_json: &str) -> Result<String, JsValue> {
    with_batches(batches_json, summarize).map_err(to_js_error)
}

/// Peak-month throughput and farmer/batch ratio percentages
#[wasm_bindgen]
pub fn additional_stats(batches_json: &str) -> Result<String, JsValue> {
    with_batches(batches_json, derived_stats).map_err(to_js_error)
}

/// Detail view JSON for `batch_id`, or `undefined` when no batch matches
#[wasm_bindgen]
pub fn find_batch_in(batches_json: &str, batch_id: &str) -> Result<Option<String>, JsValue> {
    find_batch_json(batches_json, batch_id).map_err(to_js_error)
}

/// Chart colour for the n-th species slice
#[wasm_bindgen]
pub fn species_slice_color(index: usize) -> String {
    species_color(index).to_string()
}

/// Browser-side lookup state with stale-response protection.
///
/// Call `begin` before each fetch and hand the returned token back with the
/// response; responses for superseded tokens are ignored.
#[wasm_bindgen]
#[derive(Default)]
pub struct BatchLookupSession {
    sequencer: LookupSequencer<BatchDetailView>,
}

#[wasm_bindgen]
impl BatchLookupSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup and return its token
    pub fn begin(&mut self) -> f64 {
        self.sequencer.begin().value() as f64
    }

    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    /// Apply a fetched batch JSON object; returns false if the response was stale.
    /// A malformed payload is applied as a failure.
    pub fn complete_found(&mut self, token: f64, batch_json: &str) -> bool {
        let outcome = serde_json::from_str::<serde_json::Value>(batch_json)
            .map_err(|e| e.to_string())
            .and_then(|value| parse_batch(value).map_err(|e| e.to_string()))
            .map(|record| LookupOutcome::Found(describe_batch(&record)))
            .unwrap_or_else(|e| LookupOutcome::Failed(format!("Malformed batch: {}", e)));
        self.apply(token, outcome)
    }

    pub fn complete_not_found(&mut self, token: f64) -> bool {
        self.apply(token, LookupOutcome::NotFound)
    }

    pub fn complete_failed(&mut self, token: f64, message: &str) -> bool {
        self.apply(token, LookupOutcome::Failed(message.to_string()))
    }

    /// Current state as JSON: `{"state": "idle" | "found" | "not_found" | "failed", ...}`
    pub fn current(&self) -> String {
        session_state_json(self.sequencer.current())
    }
}

impl BatchLookupSession {
    fn apply(&mut self, token: f64, outcome: LookupOutcome<BatchDetailView>) -> bool {
        let token = RequestToken::from_value(token as u64);
        match self.sequencer.complete(token, outcome) {
            Completion::Applied => true,
            Completion::Stale => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::debug_1(&JsValue::from_str(&format!(
                    "Discarded stale lookup response #{}",
                    token.value()
                )));
                false
            }
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum SessionState<'a> {
    Idle,
    Found { batch: &'a BatchDetailView },
    NotFound { message: &'static str },
    Failed { message: &'a str },
}

fn session_state_json(outcome: Option<&LookupOutcome<BatchDetailView>>) -> String {
    let state = match outcome {
        None => SessionState::Idle,
        Some(LookupOutcome::Found(batch)) => SessionState::Found { batch },
        Some(LookupOutcome::NotFound) => SessionState::NotFound {
            message: "Batch not found. Please check the batch ID and try again.",
        },
        Some(LookupOutcome::Failed(message)) => SessionState::Failed {
            message: message.as_str(),
        },
    };
    serde_json::to_string(&state).unwrap_or_else(|_| r#"{"state":"idle"}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const BATCHES: &str = r#"[
        {"batchID": "AYU-1", "species": "Ashwagandha", "farmerID": "F1",
         "ownerHistory": [{"owner": "F1"}], "createdAt": "2024-01-05T00:00:00Z"},
        {"batchID": "AYU-2", "species": "Ashwagandha", "farmerID": "F2",
         "createdAt": "2024-03-05T00:00:00Z"},
        {"batchID": "AYU-3", "species": "", "harvestDate": "2024-03-10"}
    ]"#;

    #[test]
    fn test_dashboard_json() {
        let json: Value = serde_json::from_str(&dashboard_json(BATCHES).unwrap()).unwrap();

        assert_eq!(json["summary"]["total_batches"], 3);
        assert_eq!(json["summary"]["distinct_farmers"], 3);
        assert_eq!(json["species_distribution"][0]["name"], "Ashwagandha");
        assert_eq!(json["species_distribution"][1]["name"], "Unknown");
        assert_eq!(json["monthly_flow"][2]["month"], "Mar");
        assert_eq!(json["monthly_flow"][2]["batch_count"], 2);
        assert_eq!(json["compliance"][0]["percent"], 33);
        assert_eq!(json["stats"]["peak_month_throughput"], 67);
        assert_eq!(json["stats"]["farmer_batch_ratio"], 100);
    }

    #[test]
    fn test_additional_stats_on_empty_list() {
        let json: Value =
            serde_json::from_str(&with_batches("[]", derived_stats).unwrap()).unwrap();
        assert_eq!(json["peak_month_throughput"], 0);
        assert_eq!(json["farmer_batch_ratio"], 0);
    }

    #[test]
    fn test_dashboard_rejects_non_list() {
        assert!(dashboard_json(r#"{"batch_id": "AYU-1"}"#).is_err());
        assert!(dashboard_json("not json").is_err());
    }

    #[test]
    fn test_find_batch_json() {
        let found = find_batch_json(BATCHES, "AYU-2").unwrap().unwrap();
        let json: Value = serde_json::from_str(&found).unwrap();
        assert_eq!(json["batch_id"], "AYU-2");

        assert_eq!(find_batch_json(BATCHES, "AYU-9").unwrap(), None);
        assert!(find_batch_json(BATCHES, "  ").is_err());
    }

    #[test]
    fn test_find_batch_json_flags_duplicates() {
        let batches = r#"[{"batch_id": "D"}, {"batch_id": "D"}]"#;
        let err = find_batch_json(batches, "D").unwrap_err();
        assert!(err.contains("appears 2 times"));
    }

    #[test]
    fn test_lookup_session_discards_stale_response() {
        let mut session = BatchLookupSession::new();
        assert_eq!(session.current(), r#"{"state":"idle"}"#);

        let first = session.begin();
        let second = session.begin();
        assert!(session.complete_not_found(second));
        assert!(!session.complete_found(first, r#"{"batch_id": "AYU-1"}"#));

        let state: Value = serde_json::from_str(&session.current()).unwrap();
        assert_eq!(state["state"], "not_found");
    }

    #[test]
    fn test_lookup_session_found_and_malformed() {
        let mut session = BatchLookupSession::new();
        let token = session.begin();
        assert!(session.complete_found(token, r#"{"batch_id": "AYU-1", "species": "Tulsi"}"#));
        let state: Value = serde_json::from_str(&session.current()).unwrap();
        assert_eq!(state["state"], "found");
        assert_eq!(state["batch"]["species"], "Tulsi");

        let token = session.begin();
        assert!(session.is_loading());
        assert!(session.complete_found(token, "[]"));
        let state: Value = serde_json::from_str(&session.current()).unwrap();
        assert_eq!(state["state"], "failed");
    }

    #[test]
    fn test_species_slice_color() {
        assert_eq!(species_slice_color(1), "#F59E0B");
    }
}
