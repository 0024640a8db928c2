use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::contributions::custom::validate_custom_split;
use crate::contributions::models::*;
use crate::eligibility::{eligible_members, validate_members};
use crate::{types::*, GroupnestError, GroupnestResult};

/// Weight on the equal component when the caller does not pick one
const DEFAULT_HYBRID_EQUAL_RATIO: Rate = dec!(0.5);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionInput {
    pub members: Vec<Member>,
    /// Target all-in monthly cost every model must cover.
    pub estimated_monthly_cost: Money,
    /// Member ids to drop for what-if simulation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_ids: Vec<String>,
    /// Caller-authored split to validate alongside the computed models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_assignment: Option<Vec<CustomAssignment>>,
    /// Blend weight on the equal component of the hybrid model, in [0, 1].
    /// Defaults to 0.5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_equal_ratio: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build every contribution model side by side over the eligible roster:
/// equal, income-proportional, unit-weighted and the equal/proportional
/// hybrid, plus validation of a caller-authored custom split when supplied.
pub fn calculate_contribution_models(
    input: &ContributionInput,
) -> GroupnestResult<ComputationOutput<ContributionModelsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let eligible = eligible_members(&input.members, &input.exclude_ids);
    if eligible.is_empty() {
        return Err(GroupnestError::NoEligibleMembers);
    }

    let cost = input.estimated_monthly_cost;
    let equal_ratio = input
        .hybrid_equal_ratio
        .unwrap_or(DEFAULT_HYBRID_EQUAL_RATIO);

    let total_income: Money = eligible.iter().map(|m| m.monthly_income).sum();
    if total_income.is_zero() {
        warnings.push(
            "Combined monthly income is zero; income-weighted models have nothing to weight and come back underfunded."
                .to_string(),
        );
    }

    let custom = input.custom_assignment.as_ref().map(|assignments| {
        if input.exclude_ids.is_empty() {
            validate_custom_split(&eligible, assignments, cost)
        } else {
            // The custom split is the group's negotiated agreement. What-if
            // exclusions never rewrite it; it stays validated against the
            // full eligible roster.
            let full_roster = eligible_members(&input.members, &[]);
            let mut model = validate_custom_split(&full_roster, assignments, cost);
            model.note = Some(
                "Custom split reflects the authored agreement for the full roster; exclusions do not recalculate it."
                    .to_string(),
            );
            warnings.push(
                "Member exclusions apply to computed models only; the custom split was validated against the full roster."
                    .to_string(),
            );
            model
        }
    });

    let output = ContributionModelsOutput {
        equal: equal_split(&eligible, cost),
        proportional: proportional_split(&eligible, cost, total_income),
        unit_weighted: unit_weighted_split(&eligible, cost),
        hybrid: hybrid_split(&eligible, cost, equal_ratio, total_income),
        custom,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "hybrid_equal_ratio": equal_ratio.to_string(),
        "affordability_income_share": AFFORDABILITY_INCOME_SHARE.to_string(),
        "unit_weights": {
            "studio": UnitSize::Studio.weight().to_string(),
            "one_bedroom": UnitSize::OneBedroom.weight().to_string(),
            "two_bedroom": UnitSize::TwoBedroom.weight().to_string(),
            "three_bedroom_plus": UnitSize::ThreeBedroomPlus.weight().to_string(),
        },
    });

    Ok(with_metadata(
        "Contribution Split Modelling (equal / proportional / unit-weighted / hybrid)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &ContributionInput) -> GroupnestResult<()> {
    if input.estimated_monthly_cost <= Decimal::ZERO {
        return Err(GroupnestError::InvalidInput {
            field: "estimated_monthly_cost".into(),
            reason: "Monthly housing cost must be positive.".into(),
        });
    }
    if let Some(ratio) = input.hybrid_equal_ratio {
        if ratio < Decimal::ZERO || ratio > Decimal::ONE {
            return Err(GroupnestError::InvalidInput {
                field: "hybrid_equal_ratio".into(),
                reason: "Hybrid blend ratio must lie in [0, 1].".into(),
            });
        }
    }
    if let Some(assignments) = &input.custom_assignment {
        if assignments.is_empty() {
            return Err(GroupnestError::InvalidInput {
                field: "custom_assignment".into(),
                reason: "Custom assignment, when present, cannot be empty.".into(),
            });
        }
    }
    validate_members(&input.members)
}

/// Round raw shares to cents without letting the rounding drift the model
/// total: every share but the last rounds on its own, and the final member
/// is handed whatever remains of the running total.
fn allocate(eligible: &[&Member], raw_shares: &[Decimal]) -> Vec<MemberContribution> {
    let mut remaining: Decimal = raw_shares.iter().sum();
    eligible
        .iter()
        .zip(raw_shares)
        .enumerate()
        .map(|(i, (member, share))| {
            let payment = if i + 1 == raw_shares.len() {
                round_money(remaining)
            } else {
                round_money(*share)
            };
            remaining -= payment;
            annotate_member(member, payment)
        })
        .collect()
}

fn equal_split(eligible: &[&Member], cost: Money) -> ContributionModel {
    let share = cost / Decimal::from(eligible.len() as u64);
    let shares = vec![share; eligible.len()];
    plain_model(ContributionModelType::Equal, allocate(eligible, &shares))
}

fn proportional_split(eligible: &[&Member], cost: Money, total_income: Money) -> ContributionModel {
    let shares: Vec<Decimal> = eligible
        .iter()
        .map(|m| {
            if total_income > Decimal::ZERO {
                m.monthly_income * cost / total_income
            } else {
                Decimal::ZERO
            }
        })
        .collect();
    plain_model(
        ContributionModelType::Proportional,
        allocate(eligible, &shares),
    )
}

fn unit_weighted_split(eligible: &[&Member], cost: Money) -> ContributionModel {
    // Weights are all positive, so the denominator never vanishes
    let total_weight: Decimal = eligible.iter().map(|m| m.unit_size.weight()).sum();
    let shares: Vec<Decimal> = eligible
        .iter()
        .map(|m| m.unit_size.weight() * cost / total_weight)
        .collect();
    plain_model(
        ContributionModelType::UnitWeighted,
        allocate(eligible, &shares),
    )
}

fn hybrid_split(
    eligible: &[&Member],
    cost: Money,
    equal_ratio: Rate,
    total_income: Money,
) -> ContributionModel {
    let equal_share = cost / Decimal::from(eligible.len() as u64);
    let shares: Vec<Decimal> = eligible
        .iter()
        .map(|m| {
            let proportional_share = if total_income > Decimal::ZERO {
                m.monthly_income * cost / total_income
            } else {
                Decimal::ZERO
            };
            equal_ratio * equal_share + (Decimal::ONE - equal_ratio) * proportional_share
        })
        .collect();
    plain_model(ContributionModelType::Hybrid, allocate(eligible, &shares))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
