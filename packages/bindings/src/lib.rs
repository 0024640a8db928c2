use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct EligibilityBindingInput {
    members: Vec<groupnest_core::Member>,
    #[serde(default)]
    exclude_ids: Vec<String>,
}

#[napi]
pub fn eligible_members(input_json: String) -> NapiResult<String> {
    let binding_input: EligibilityBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let eligible = groupnest_core::eligibility::eligible_members(
        &binding_input.members,
        &binding_input.exclude_ids,
    );
    serde_json::to_string(&eligible).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Group metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn group_metrics(input_json: String) -> NapiResult<String> {
    let input: groupnest_core::metrics::group::GroupMetricsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        groupnest_core::metrics::group::calculate_group_metrics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Contribution models
// ---------------------------------------------------------------------------

#[napi]
pub fn contribution_models(input_json: String) -> NapiResult<String> {
    let input: groupnest_core::contributions::engine::ContributionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = groupnest_core::contributions::engine::calculate_contribution_models(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct CustomSplitBindingInput {
    members: Vec<groupnest_core::Member>,
    #[serde(default)]
    exclude_ids: Vec<String>,
    assignments: Vec<groupnest_core::contributions::models::CustomAssignment>,
    target_cost: rust_decimal::Decimal,
}

/// Validate a hand-authored split on its own, without recomputing the
/// standard models. Intended for edit-time feedback in the host app.
#[napi]
pub fn validate_custom_split(input_json: String) -> NapiResult<String> {
    let binding_input: CustomSplitBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let eligible = groupnest_core::eligibility::eligible_members(
        &binding_input.members,
        &binding_input.exclude_ids,
    );
    let model = groupnest_core::contributions::custom::validate_custom_split(
        &eligible,
        &binding_input.assignments,
        binding_input.target_cost,
    );
    serde_json::to_string(&model).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_group(input_json: String) -> NapiResult<String> {
    let input: groupnest_core::evaluation::EvaluationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = groupnest_core::evaluation::evaluate_group(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Evaluation cache
// ---------------------------------------------------------------------------

const CACHE_TTL: Duration = Duration::from_secs(300);

static EVALUATION_CACHE: OnceLock<Mutex<groupnest_core::cache::MemoryInsightCache<String>>> =
    OnceLock::new();

fn evaluation_cache() -> &'static Mutex<groupnest_core::cache::MemoryInsightCache<String>> {
    EVALUATION_CACHE.get_or_init(|| {
        Mutex::new(groupnest_core::cache::InsightCache::new(
            groupnest_core::cache::InMemoryStore::new(),
            CACHE_TTL,
        ))
    })
}

/// Cached variant of `evaluate_group`, keyed by `group_id`. Entries live for
/// five minutes; a caller that mutates a group should invalidate its key.
#[napi]
pub fn evaluate_group_cached(input_json: String) -> NapiResult<String> {
    let input: groupnest_core::evaluation::EvaluationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let key = input
        .group_id
        .clone()
        .ok_or_else(|| napi::Error::from_reason("group_id is required for cached evaluation"))?;

    let mut cache = evaluation_cache()
        .lock()
        .map_err(|_| napi::Error::from_reason("evaluation cache lock poisoned"))?;
    cache.get_or_compute(&key, || {
        let output = groupnest_core::evaluation::evaluate_group(&input).map_err(to_napi_error)?;
        serde_json::to_string(&output).map_err(to_napi_error)
    })
}

#[napi]
pub fn invalidate_group_cache(group_id: String) -> NapiResult<bool> {
    let mut cache = evaluation_cache()
        .lock()
        .map_err(|_| napi::Error::from_reason("evaluation cache lock poisoned"))?;
    Ok(cache.invalidate(&group_id))
}

#[napi]
pub fn clear_group_cache() -> NapiResult<()> {
    let mut cache = evaluation_cache()
        .lock()
        .map_err(|_| napi::Error::from_reason("evaluation cache lock poisoned"))?;
    cache.clear();
    Ok(())
}
