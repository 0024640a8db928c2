use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::contributions::engine::{calculate_contribution_models, ContributionInput};
use crate::contributions::models::{ContributionModelsOutput, CustomAssignment};
use crate::metrics::group::{calculate_group_metrics, GroupMetricsInput, GroupMetricsOutput};
use crate::{types::*, GroupnestError, GroupnestResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Why a group snapshot is being re-evaluated. Carried through to the
/// assumptions record so downstream consumers can tell a scheduled refresh
/// from a member-driven one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeTrigger {
    MemberStatusChanged,
    CreditCheckCompleted,
    CostUpdated,
    Manual,
}

impl fmt::Display for RecomputeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecomputeTrigger::MemberStatusChanged => "member_status_changed",
            RecomputeTrigger::CreditCheckCompleted => "credit_check_completed",
            RecomputeTrigger::CostUpdated => "cost_updated",
            RecomputeTrigger::Manual => "manual",
        };
        write!(f, "{label}")
    }
}

/// Snapshot of a group at evaluation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Defaults to a manual run when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<RecomputeTrigger>,
    pub members: Vec<Member>,
    pub estimated_monthly_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_assignment: Option<Vec<CustomAssignment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_equal_ratio: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEvaluation {
    /// Absent when the group has fewer than two eligible members; the
    /// contribution models still come back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<GroupMetricsOutput>,
    pub contribution_models: ContributionModelsOutput,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One full pass over a group snapshot: affordability metrics plus every
/// contribution model. A group too small for metrics degrades to models
/// only; a group with no eligible members at all is an error.
pub fn evaluate_group(
    input: &EvaluationInput,
) -> GroupnestResult<ComputationOutput<GroupEvaluation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let trigger = input.trigger.unwrap_or(RecomputeTrigger::Manual);

    let contribution_input = ContributionInput {
        members: input.members.clone(),
        estimated_monthly_cost: input.estimated_monthly_cost,
        exclude_ids: Vec::new(),
        custom_assignment: input.custom_assignment.clone(),
        hybrid_equal_ratio: input.hybrid_equal_ratio,
    };
    let contributions = calculate_contribution_models(&contribution_input)?;
    warnings.extend(contributions.warnings);

    let metrics_input = GroupMetricsInput {
        members: input.members.clone(),
        estimated_monthly_cost: input.estimated_monthly_cost,
        annual_rate: input.annual_rate,
    };
    let metrics = match calculate_group_metrics(&metrics_input) {
        Ok(envelope) => {
            warnings.extend(envelope.warnings);
            Some(envelope.result)
        }
        Err(GroupnestError::InsufficientMembers { eligible }) => {
            warnings.push(format!(
                "Group metrics skipped: {eligible} eligible member(s), at least 2 are required."
            ));
            None
        }
        Err(other) => return Err(other),
    };

    let output = GroupEvaluation {
        metrics,
        contribution_models: contributions.result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "group_id": input.group_id,
        "trigger": trigger.to_string(),
        "annual_rate": input
            .annual_rate
            .unwrap_or(DEFAULT_ANNUAL_RATE)
            .to_string(),
    });

    Ok(with_metadata(
        "Full Group Evaluation (metrics + contribution models)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
