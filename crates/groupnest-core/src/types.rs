use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and ratios expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

// ---------------------------------------------------------------------------
// Shared affordability thresholds
// ---------------------------------------------------------------------------

/// DTI at or below this is classified healthy
pub const DTI_HEALTHY_CEILING: Rate = dec!(0.36);

/// DTI at or below this is classified acceptable; above is risky. Also the
/// qualifying factor for maximum payment capacity (43% lending wall).
pub const DTI_ACCEPTABLE_CEILING: Rate = dec!(0.43);

/// A member paying more than this share of income is flagged
pub const AFFORDABILITY_INCOME_SHARE: Rate = dec!(0.30);

/// Standard 30-year amortization term
pub const LOAN_TERM_MONTHS: u32 = 360;

/// Annual rate assumed when the caller does not supply one
pub const DEFAULT_ANNUAL_RATE: Rate = dec!(0.07);

/// Custom splits within one cent of the target are considered balanced
pub const CENT_TOLERANCE: Money = dec!(0.01);

/// Round a monetary value to cents, half away from zero
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a ratio to four decimal places, half away from zero
pub fn round_ratio(value: Decimal) -> Rate {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a unitless score to two decimal places, half away from zero
pub fn round_score(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Group membership model
// ---------------------------------------------------------------------------

/// How a member earns. Closed set: an unknown category fails at the
/// deserialization boundary rather than defaulting silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    SelfEmployed,
    Contract,
    Retired,
    Student,
    Unemployed,
}

/// Unit a member occupies, driving the unit-weighted split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSize {
    Studio,
    OneBedroom,
    TwoBedroom,
    ThreeBedroomPlus,
}

impl UnitSize {
    /// Relative cost weight of the unit. Exhaustive so a new size forces a
    /// decision here.
    pub fn weight(self) -> Decimal {
        match self {
            UnitSize::Studio => dec!(0.75),
            UnitSize::OneBedroom => dec!(1.00),
            UnitSize::TwoBedroom => dec!(1.25),
            UnitSize::ThreeBedroomPlus => dec!(1.50),
        }
    }
}

/// Application approval state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
    Declined,
}

/// Credit check progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditCheckState {
    NotStarted,
    InProgress,
    Complete,
    Failed,
}

/// Pipeline state a member must clear before counting toward group figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityStatus {
    pub approval: ApprovalState,
    pub credit_check: CreditCheckState,
}

impl EligibilityStatus {
    /// Approved and credit-complete, nothing less
    pub fn is_eligible(&self) -> bool {
        self.approval == ApprovalState::Approved
            && self.credit_check == CreditCheckState::Complete
    }
}

/// One member of a housing group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub monthly_income: Money,
    pub monthly_obligations: Money,
    #[serde(default)]
    pub total_debt: Money,
    pub employment_type: EmploymentType,
    pub unit_size: UnitSize,
    pub eligibility: EligibilityStatus,
}

/// Classification of a group DTI ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiClassification {
    Healthy,
    Acceptable,
    Risky,
    /// No income to divide by
    Unknown,
}

impl fmt::Display for DtiClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DtiClassification::Healthy => "healthy",
            DtiClassification::Acceptable => "acceptable",
            DtiClassification::Risky => "risky",
            DtiClassification::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Classify a rounded DTI ratio. Boundary values fall into the safer band:
/// exactly 0.36 is healthy, exactly 0.43 is acceptable.
pub fn classify_dti(dti: Option<Rate>) -> DtiClassification {
    match dti {
        None => DtiClassification::Unknown,
        Some(d) if d <= DTI_HEALTHY_CEILING => DtiClassification::Healthy,
        Some(d) if d <= DTI_ACCEPTABLE_CEILING => DtiClassification::Acceptable,
        Some(_) => DtiClassification::Risky,
    }
}

// ---------------------------------------------------------------------------
// Computation envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
