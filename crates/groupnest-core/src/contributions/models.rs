use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;

// ---------------------------------------------------------------------------
// Model types
// ---------------------------------------------------------------------------

/// The split strategies a group can compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionModelType {
    Equal,
    Proportional,
    UnitWeighted,
    Hybrid,
    Custom,
}

impl fmt::Display for ContributionModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContributionModelType::Equal => "equal",
            ContributionModelType::Proportional => "proportional",
            ContributionModelType::UnitWeighted => "unit_weighted",
            ContributionModelType::Hybrid => "hybrid",
            ContributionModelType::Custom => "custom",
        };
        write!(f, "{label}")
    }
}

/// One member's line in a contribution model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberContribution {
    pub member_id: String,
    pub display_name: String,
    pub payment_amount: Money,
    /// Payment over income, `None` for members with no income.
    pub percentage_of_income: Option<Rate>,
    /// Income minus obligations minus this payment. Negative means the
    /// member is underwater on the month.
    pub breathing_room: Money,
    /// True when the payment takes more than 30% of the member's income.
    pub exceeds_affordability: bool,
}

/// How a custom split squares against the target cost. The difference is
/// rounded to cents before it is classified: a gap under half a cent reads
/// as `Balanced`, anything that rounds to a cent or more is reported at its
/// rounded size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceStatus {
    Balanced,
    Overage { amount: Money },
    Shortfall { amount: Money },
}

/// A custom assignment entry that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentIssue {
    pub member_id: String,
    pub reason: String,
}

/// Caller-provided payment for one member in a custom split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAssignment {
    pub member_id: String,
    pub payment_amount: Money,
}

/// One fully annotated split model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionModel {
    pub model_type: ContributionModelType,
    pub members: Vec<MemberContribution>,
    /// Only the custom model carries a balance verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<AssignmentIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Every model side by side, typed field per strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionModelsOutput {
    pub equal: ContributionModel,
    pub proportional: ContributionModel,
    pub unit_weighted: ContributionModel,
    pub hybrid: ContributionModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<ContributionModel>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Annotate one member's payment with affordability figures. The percentage
/// is taken on the rounded payment so it matches what the member sees.
pub(crate) fn annotate_member(member: &Member, raw_payment: Decimal) -> MemberContribution {
    let payment_amount = round_money(raw_payment);

    let percentage_of_income = if member.monthly_income > Decimal::ZERO {
        Some(round_ratio(payment_amount / member.monthly_income))
    } else {
        None
    };

    let exceeds_affordability = percentage_of_income
        .map(|p| p > AFFORDABILITY_INCOME_SHARE)
        .unwrap_or(false);

    MemberContribution {
        member_id: member.id.clone(),
        display_name: member.display_name.clone(),
        payment_amount,
        percentage_of_income,
        breathing_room: round_money(
            member.monthly_income - member.monthly_obligations - payment_amount,
        ),
        exceeds_affordability,
    }
}

pub(crate) fn plain_model(
    model_type: ContributionModelType,
    members: Vec<MemberContribution>,
) -> ContributionModel {
    ContributionModel {
        model_type,
        members,
        balance: None,
        rejected: Vec::new(),
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
