//! WASM bindings for slotwise-engine.
//!
//! Exposes slot recommendations to JavaScript via `wasm-bindgen`. Complex
//! values cross the boundary as JSON strings: the caller passes a scheduling
//! snapshot (`events`, `time_slots`, `users`, `availability`) and gets
//! recommendations back in the same shape the `slotwise` CLI prints.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slotwise-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slotwise-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slotwise_wasm.wasm
//! ```

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use slotwise_engine::model::TimeSlot;
use slotwise_engine::recommend::candidate_starts;
use slotwise_engine::{InMemoryStore, RecommendConfig, RecommendationService};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DDTHH:MM:SS`, which is
/// read as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn config(step_minutes: Option<u32>) -> Result<RecommendConfig, JsValue> {
    match step_minutes {
        Some(step) => RecommendConfig::new(step).map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(RecommendConfig::default()),
    }
}

fn load_store(snapshot_json: &str) -> Result<InMemoryStore, JsValue> {
    InMemoryStore::from_json(snapshot_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Ranked slot recommendations for one event of a snapshot.
///
/// Returns a JSON array of recommendation objects, highest attendance first.
///
/// # Arguments
/// - `snapshot_json` -- JSON object with `events`, `time_slots`, `users`, `availability`
/// - `event_id` -- Event to schedule
/// - `step_minutes` -- Optional grid spacing for candidate starts (default 15)
#[wasm_bindgen(js_name = "recommend")]
pub fn recommend(
    snapshot_json: &str,
    event_id: u64,
    step_minutes: Option<u32>,
) -> Result<String, JsValue> {
    let store = load_store(snapshot_json)?;
    let service = RecommendationService::with_config(&store, config(step_minutes)?);

    let recommendations = service
        .get_recommendations(event_id)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_json(&recommendations)
}

/// The candidate start times the engine would try for a slot.
///
/// Returns a JSON array of RFC 3339 strings; empty when the slot is shorter
/// than the meeting.
#[wasm_bindgen(js_name = "candidateStarts")]
pub fn candidate_starts_js(
    slot_start: &str,
    slot_end: &str,
    duration_minutes: u32,
    step_minutes: Option<u32>,
) -> Result<String, JsValue> {
    let slot = TimeSlot {
        id: 0,
        event_id: 0,
        start_time: parse_datetime(slot_start)?,
        end_time: parse_datetime(slot_end)?,
    };
    let config = config(step_minutes)?;

    let starts: Vec<String> = candidate_starts(
        &slot,
        Duration::minutes(i64::from(duration_minutes)),
        config.step(),
    )
    .iter()
    .map(|dt| dt.to_rfc3339())
    .collect();

    to_json(&starts)
}

/// Validate a snapshot and return its record counts as JSON.
#[wasm_bindgen(js_name = "validateSnapshot")]
pub fn validate_snapshot(snapshot_json: &str) -> Result<String, JsValue> {
    let store = load_store(snapshot_json)?;
    to_json(&serde_json::json!({
        "events": store.event_count(),
        "time_slots": store.time_slot_count(),
        "users": store.user_count(),
        "availability": store.availability_count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE_ID_SNAPSHOT: &str = r#"{
        "events": [{"id": 5000000000, "title": "Planning", "duration_minutes": 60}],
        "time_slots": [{"id": 1, "event_id": 5000000000,
                        "start_time": "2026-03-16T09:00:00Z", "end_time": "2026-03-16T11:00:00Z"}],
        "users": [{"id": 1, "name": "Alice", "email": "alice@example.com", "timezone": "UTC"}],
        "availability": [{"id": 1, "user_id": 1, "event_id": 5000000000,
                          "start_time": "2026-03-16T09:00:00Z", "end_time": "2026-03-16T10:00:00Z"}]
    }"#;

    #[test]
    fn recommend_reaches_event_ids_beyond_u32() {
        let json = recommend(WIDE_ID_SNAPSHOT, 5_000_000_000, None).unwrap();
        let recs: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(recs[0]["time_slot"]["event_id"], 5_000_000_000u64);
        assert_eq!(recs[0]["matching_percentage"], 100.0);
        assert_eq!(recs[0]["start_options"][0], "2026-03-16T09:00:00Z");
    }
}
