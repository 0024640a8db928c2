use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// What the group looks like if one member walks away
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceEntry {
    pub member_id: String,
    pub display_name: String,
    /// Group DTI recomputed without this member, `None` when the remainder
    /// has no income.
    pub dti_without: Option<Rate>,
    /// True when losing this member pushes the remainder past the lending
    /// wall. Strictly above: landing exactly on the ceiling still clears.
    pub is_critical_dependency: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recompute the group DTI once per eligible member with that member's income
/// and obligations removed. Entries come back in roster order.
pub fn compute_removal_matrix(eligible: &[&Member], monthly_cost: Money) -> Vec<ResilienceEntry> {
    let total_income: Money = eligible.iter().map(|m| m.monthly_income).sum();
    let total_obligations: Money = eligible.iter().map(|m| m.monthly_obligations).sum();

    eligible
        .iter()
        .map(|member| {
            let income_without = total_income - member.monthly_income;
            let obligations_without = total_obligations - member.monthly_obligations;

            let dti_without = if income_without > Decimal::ZERO {
                Some(round_ratio(
                    (obligations_without + monthly_cost) / income_without,
                ))
            } else {
                None
            };

            let is_critical_dependency = dti_without
                .map(|dti| dti > DTI_ACCEPTABLE_CEILING)
                .unwrap_or(false);

            ResilienceEntry {
                member_id: member.id.clone(),
                display_name: member.display_name.clone(),
                dti_without,
                is_critical_dependency,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn member(id: &str, income: Decimal, obligations: Decimal) -> Member {
        Member {
            id: id.to_string(),
            display_name: format!("Member {id}"),
            monthly_income: income,
            monthly_obligations: obligations,
            total_debt: Decimal::ZERO,
            employment_type: EmploymentType::FullTime,
            unit_size: UnitSize::OneBedroom,
            eligibility: EligibilityStatus {
                approval: ApprovalState::Approved,
                credit_check: CreditCheckState::Complete,
            },
        }
    }

    #[test]
    fn test_removal_dti_per_member() {
        let members = vec![
            member("a", dec!(9000), dec!(500)),
            member("b", dec!(4000), dec!(300)),
            member("c", dec!(5000), dec!(200)),
        ];
        let refs: Vec<&Member> = members.iter().collect();

        let matrix = compute_removal_matrix(&refs, dec!(3000));

        // without a: (300 + 200 + 3000) / (4000 + 5000) = 3500 / 9000
        assert_eq!(matrix[0].dti_without, Some(dec!(0.3889)));
        // without b: (500 + 200 + 3000) / (9000 + 5000) = 3700 / 14000
        assert_eq!(matrix[1].dti_without, Some(dec!(0.2643)));
        // without c: (500 + 300 + 3000) / (9000 + 4000) = 3800 / 13000
        assert_eq!(matrix[2].dti_without, Some(dec!(0.2923)));

        assert!(matrix.iter().all(|e| !e.is_critical_dependency));
    }

    #[test]
    fn test_dominant_earner_is_critical() {
        let members = vec![
            member("anchor", dec!(12000), dec!(500)),
            member("b", dec!(2000), dec!(300)),
            member("c", dec!(2500), dec!(200)),
        ];
        let refs: Vec<&Member> = members.iter().collect();

        let matrix = compute_removal_matrix(&refs, dec!(3000));

        // without anchor: (300 + 200 + 3000) / 4500 = 0.7778 > 0.43
        assert_eq!(matrix[0].dti_without, Some(dec!(0.7778)));
        assert!(matrix[0].is_critical_dependency);
        assert!(!matrix[1].is_critical_dependency);
        assert!(!matrix[2].is_critical_dependency);
    }

    #[test]
    fn test_exactly_on_ceiling_is_not_critical() {
        // without b: (1300 + 3000) / 10000 = 0.43 exactly
        let members = vec![
            member("a", dec!(10000), dec!(1300)),
            member("b", dec!(4000), dec!(0)),
        ];
        let refs: Vec<&Member> = members.iter().collect();

        let matrix = compute_removal_matrix(&refs, dec!(3000));

        assert_eq!(matrix[1].dti_without, Some(dec!(0.43)));
        assert!(!matrix[1].is_critical_dependency);
    }

    #[test]
    fn test_sole_earner_leaves_no_denominator() {
        let members = vec![
            member("earner", dec!(8000), dec!(400)),
            member("student", dec!(0), dec!(100)),
        ];
        let refs: Vec<&Member> = members.iter().collect();

        let matrix = compute_removal_matrix(&refs, dec!(2500));

        assert_eq!(matrix[0].dti_without, None);
        assert!(!matrix[0].is_critical_dependency);
        // without the student the earner still carries everything
        assert_eq!(matrix[1].dti_without, Some(dec!(0.3625)));
    }
}
