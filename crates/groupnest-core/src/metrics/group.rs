use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::eligibility::{eligible_members, validate_members};
use crate::metrics::resilience::{compute_removal_matrix, ResilienceEntry};
use crate::{types::*, GroupnestError, GroupnestResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetricsInput {
    pub members: Vec<Member>,
    /// Projected all-in monthly housing cost for the whole group.
    pub estimated_monthly_cost: Money,
    /// Annual nominal rate for loan sizing. Defaults to 7% when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetricsOutput {
    pub combined_monthly_income: Money,
    pub combined_monthly_obligations: Money,
    pub combined_total_debt: Money,
    pub eligible_member_count: usize,
    /// (obligations + housing cost) / income, `None` when income is zero.
    pub group_dti: Option<Rate>,
    pub dti_classification: DtiClassification,
    /// Qualifying payment capacity: income at the 43% wall less obligations,
    /// floored at zero.
    pub max_monthly_payment: Money,
    /// Principal a 30-year amortizing loan at the assumed rate supports with
    /// `max_monthly_payment`.
    pub estimated_loan_amount: Money,
    /// Distinct employment types over eligible member count.
    pub income_diversity_score: Decimal,
    pub resilience_matrix: Vec<ResilienceEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Aggregate a group's financial position: combined income, obligations and
/// debt across eligible members, the group DTI with its classification, the
/// borrowing capacity the group qualifies for, and the per-member removal
/// matrix.
pub fn calculate_group_metrics(
    input: &GroupMetricsInput,
) -> GroupnestResult<ComputationOutput<GroupMetricsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let eligible = eligible_members(&input.members, &[]);
    if eligible.len() < 2 {
        return Err(GroupnestError::InsufficientMembers {
            eligible: eligible.len(),
        });
    }

    let annual_rate = input.annual_rate.unwrap_or(DEFAULT_ANNUAL_RATE);
    let cost = input.estimated_monthly_cost;

    // -- Combined figures -----------------------------------------------------
    let total_income: Money = eligible.iter().map(|m| m.monthly_income).sum();
    let total_obligations: Money = eligible.iter().map(|m| m.monthly_obligations).sum();
    let total_debt: Money = eligible.iter().map(|m| m.total_debt).sum();

    // -- Group DTI ------------------------------------------------------------
    let group_dti = if total_income > Decimal::ZERO {
        Some(round_ratio((total_obligations + cost) / total_income))
    } else {
        warnings.push(
            "Combined monthly income is zero; DTI and payment capacity are undefined.".to_string(),
        );
        None
    };
    let dti_classification = classify_dti(group_dti);

    // -- Payment capacity and loan sizing -------------------------------------
    let capacity = total_income * DTI_ACCEPTABLE_CEILING - total_obligations;
    if total_income > Decimal::ZERO && capacity < Decimal::ZERO {
        warnings.push(
            "Existing obligations already exceed the qualifying payment capacity.".to_string(),
        );
    }
    let max_monthly_payment = round_money(capacity.max(Decimal::ZERO));
    let estimated_loan_amount = round_money(estimate_loan_amount(max_monthly_payment, annual_rate));

    let output = GroupMetricsOutput {
        combined_monthly_income: round_money(total_income),
        combined_monthly_obligations: round_money(total_obligations),
        combined_total_debt: round_money(total_debt),
        eligible_member_count: eligible.len(),
        group_dti,
        dti_classification,
        max_monthly_payment,
        estimated_loan_amount,
        income_diversity_score: income_diversity(&eligible),
        resilience_matrix: compute_removal_matrix(&eligible, cost),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": annual_rate.to_string(),
        "loan_term_months": LOAN_TERM_MONTHS,
        "dti_healthy_ceiling": DTI_HEALTHY_CEILING.to_string(),
        "dti_acceptable_ceiling": DTI_ACCEPTABLE_CEILING.to_string(),
    });

    Ok(with_metadata(
        "Group Affordability Metrics (combined-income DTI)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &GroupMetricsInput) -> GroupnestResult<()> {
    if input.estimated_monthly_cost <= Decimal::ZERO {
        return Err(GroupnestError::InvalidInput {
            field: "estimated_monthly_cost".into(),
            reason: "Monthly housing cost must be positive.".into(),
        });
    }
    if let Some(rate) = input.annual_rate {
        if rate < Decimal::ZERO {
            return Err(GroupnestError::InvalidInput {
                field: "annual_rate".into(),
                reason: "Annual rate cannot be negative.".into(),
            });
        }
    }
    validate_members(&input.members)
}

/// Invert the standard amortization formula: the principal a fixed monthly
/// payment can service over the full term.
fn estimate_loan_amount(max_payment: Money, annual_rate: Rate) -> Money {
    if max_payment <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let monthly_rate = annual_rate / Decimal::from(12);
    if monthly_rate.is_zero() {
        // Interest-free: straight-line over the term
        return max_payment * Decimal::from(LOAN_TERM_MONTHS);
    }

    // (1 + r)^n via iterative multiplication
    let mut compound = Decimal::ONE;
    for _ in 0..LOAN_TERM_MONTHS {
        compound *= Decimal::ONE + monthly_rate;
    }

    max_payment * (compound - Decimal::ONE) / (monthly_rate * compound)
}

fn income_diversity(eligible: &[&Member]) -> Decimal {
    let distinct: HashSet<EmploymentType> = eligible.iter().map(|m| m.employment_type).collect();
    round_score(Decimal::from(distinct.len() as u64) / Decimal::from(eligible.len() as u64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
