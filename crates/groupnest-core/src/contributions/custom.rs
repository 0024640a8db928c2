use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use crate::contributions::models::*;
use crate::types::*;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check a caller-authored split against the eligible roster. Bad entries are
/// recorded and skipped, never fatal: the model always comes back with every
/// eligible member annotated (unassigned members at zero) and a balance
/// verdict over the entries that did apply.
pub fn validate_custom_split(
    eligible: &[&Member],
    assignments: &[CustomAssignment],
    target_cost: Money,
) -> ContributionModel {
    let eligible_ids: HashSet<&str> = eligible.iter().map(|m| m.id.as_str()).collect();

    let mut applied: HashMap<&str, Decimal> = HashMap::new();
    let mut rejected: Vec<AssignmentIssue> = Vec::new();

    for assignment in assignments {
        let id = assignment.member_id.as_str();
        if id.is_empty() {
            rejected.push(AssignmentIssue {
                member_id: String::new(),
                reason: "Assignment is missing a member id.".to_string(),
            });
        } else if assignment.payment_amount < Decimal::ZERO {
            rejected.push(AssignmentIssue {
                member_id: id.to_string(),
                reason: "Payment amount cannot be negative.".to_string(),
            });
        } else if !eligible_ids.contains(id) {
            rejected.push(AssignmentIssue {
                member_id: id.to_string(),
                reason: "No eligible member matches this id.".to_string(),
            });
        } else if applied.contains_key(id) {
            rejected.push(AssignmentIssue {
                member_id: id.to_string(),
                reason: "Duplicate assignment; the first occurrence stands.".to_string(),
            });
        } else {
            applied.insert(id, assignment.payment_amount);
        }
    }

    let members: Vec<MemberContribution> = eligible
        .iter()
        .map(|m| {
            let payment = applied.get(m.id.as_str()).copied().unwrap_or(Decimal::ZERO);
            annotate_member(m, payment)
        })
        .collect();

    let assigned_total: Decimal = applied.values().copied().sum();
    let balance = balance_against(assigned_total, target_cost);

    ContributionModel {
        model_type: ContributionModelType::Custom,
        members,
        balance: Some(balance),
        rejected,
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// The difference is rounded to cents before classification, so the verdict
/// and the reported amount always agree.
fn balance_against(assigned_total: Decimal, target_cost: Money) -> BalanceStatus {
    let diff = round_money(assigned_total - target_cost);
    if diff.abs() < CENT_TOLERANCE {
        BalanceStatus::Balanced
    } else if diff > Decimal::ZERO {
        BalanceStatus::Overage { amount: diff }
    } else {
        BalanceStatus::Shortfall { amount: -diff }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
