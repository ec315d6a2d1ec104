use crawler_core::{ParameterSet, Platform, ValueKind};
use serde_json::{json, Map, Value};

use crate::StartRequest;

pub const TASK_TYPE: &str = "discovery";

/// YouTube discovery parameters, sent flat. The engagement weights stay local.
const YOUTUBE_WIRE_KEYS: [&str; 10] = [
    "ai_ratio_threshold",
    "sample_video_count",
    "search_results_per_keyword",
    "expand_batch_size",
    "expand_recommended_videos",
    "update_recent_videos",
    "max_qualified_kols",
    "rate_limit_delay",
    "max_retries",
    "active_days_threshold",
];

/// Map the in-memory parameters of `platform` into the start request body.
pub fn build_start_request(platform: Platform, params: &ParameterSet) -> StartRequest {
    let params = match platform {
        Platform::YouTube => youtube_params(params),
        Platform::GitHub => github_params(params),
    };
    StartRequest {
        platform: platform.as_str().to_string(),
        task_type: TASK_TYPE.to_string(),
        params,
    }
}

fn youtube_params(params: &ParameterSet) -> Value {
    let map: Map<String, Value> = YOUTUBE_WIRE_KEYS
        .iter()
        .map(|key| (key.to_string(), wire_value(params, key)))
        .collect();
    Value::Object(map)
}

fn github_params(params: &ParameterSet) -> Value {
    let v = |key| wire_value(params, key);
    json!({
        "min_followers": v("min_followers"),
        "min_stars": v("min_stars"),
        "min_repo_stars": v("min_repo_stars"),
        "max_developers_per_run": v("max_developers_per_run"),
        "rate_limit": {
            "min_delay": v("min_delay"),
            "max_delay": v("max_delay"),
            "initial_cooldown": v("initial_cooldown"),
            "max_429_backoff": v("max_429_backoff"),
        },
        "academic_min_followers": v("academic_min_followers"),
        "academic_min_stars": v("academic_min_stars"),
        "discovery_strategy": {
            "enable_deduplication": true,
            "deduplication_scope": "session",
            "discovery_buffer_ratio": v("discovery_buffer_ratio"),
            "max_discovery_per_batch": v("max_discovery_per_batch"),
            "min_discovery_per_batch": v("min_discovery_per_batch"),
        },
    })
}

fn wire_value(params: &ParameterSet, key: &str) -> Value {
    let Some(spec) = params.spec(key) else {
        return Value::Null;
    };
    let value = params.get(key).unwrap_or(spec.default);
    match spec.kind {
        ValueKind::Integer => json!(value.round() as i64),
        ValueKind::Float => json!(value),
    }
}
