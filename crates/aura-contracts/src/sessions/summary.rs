use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// End-of-session report for a try-on run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub stage_reached: String,
    pub selected_products: Vec<String>,
    pub generated_images: Vec<String>,
    pub fallback_used: bool,
}

pub fn write_summary(
    path: &Path,
    summary: &SessionSummary,
    extra: Option<&Map<String, Value>>,
) -> anyhow::Result<()> {
    let mut payload = Map::new();
    payload.insert(
        "session_id".to_string(),
        Value::String(summary.session_id.clone()),
    );
    payload.insert(
        "started_at".to_string(),
        Value::String(summary.started_at.clone()),
    );
    payload.insert(
        "finished_at".to_string(),
        Value::String(summary.finished_at.clone()),
    );
    payload.insert(
        "stage_reached".to_string(),
        Value::String(summary.stage_reached.clone()),
    );
    payload.insert(
        "selected_products".to_string(),
        Value::Array(
            summary
                .selected_products
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ),
    );
    payload.insert(
        "generated_images".to_string(),
        Value::Array(
            summary
                .generated_images
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ),
    );
    payload.insert(
        "fallback_used".to_string(),
        Value::Bool(summary.fallback_used),
    );
    payload.insert("ts".to_string(), Value::String(now_utc_iso()));
    if let Some(extra) = extra {
        for (key, value) in extra {
            payload.insert(key.clone(), value.clone());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&Value::Object(payload))?)?;
    Ok(())
}

fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
