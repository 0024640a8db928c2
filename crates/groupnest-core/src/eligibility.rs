use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::types::Member;
use crate::{GroupnestError, GroupnestResult};

/// Filter a group roster down to the members whose figures may count toward
/// group-level computations. Keeps roster order. A member passes when they
/// are approved with a complete credit check and their id is not excluded.
pub fn eligible_members<'a>(members: &'a [Member], exclude_ids: &[String]) -> Vec<&'a Member> {
    let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
    members
        .iter()
        .filter(|m| m.eligibility.is_eligible())
        .filter(|m| !excluded.contains(m.id.as_str()))
        .collect()
}

/// Roster hygiene shared by every operation that takes members as input.
pub(crate) fn validate_members(members: &[Member]) -> GroupnestResult<()> {
    for member in members {
        if member.monthly_income < Decimal::ZERO {
            return Err(GroupnestError::InvalidInput {
                field: "members".into(),
                reason: format!("Member '{}' has a negative monthly income.", member.id),
            });
        }
        if member.monthly_obligations < Decimal::ZERO {
            return Err(GroupnestError::InvalidInput {
                field: "members".into(),
                reason: format!("Member '{}' has negative monthly obligations.", member.id),
            });
        }
        if member.total_debt < Decimal::ZERO {
            return Err(GroupnestError::InvalidInput {
                field: "members".into(),
                reason: format!("Member '{}' has negative total debt.", member.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApprovalState, CreditCheckState, EligibilityStatus, EmploymentType, UnitSize};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn member(id: &str, approval: ApprovalState, credit_check: CreditCheckState) -> Member {
        Member {
            id: id.to_string(),
            display_name: format!("Member {id}"),
            monthly_income: dec!(4000),
            monthly_obligations: dec!(200),
            total_debt: dec!(10000),
            employment_type: EmploymentType::FullTime,
            unit_size: UnitSize::OneBedroom,
            eligibility: EligibilityStatus {
                approval,
                credit_check,
            },
        }
    }

    #[test]
    fn test_filters_out_incomplete_pipeline_states() {
        let members = vec![
            member("a", ApprovalState::Approved, CreditCheckState::Complete),
            member("b", ApprovalState::Pending, CreditCheckState::Complete),
            member("c", ApprovalState::Approved, CreditCheckState::InProgress),
            member("d", ApprovalState::Declined, CreditCheckState::Failed),
            member("e", ApprovalState::Approved, CreditCheckState::Complete),
        ];

        let eligible = eligible_members(&members, &[]);
        let ids: Vec<&str> = eligible.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
    }

    #[test]
    fn test_exclusion_removes_only_named_ids() {
        let members = vec![
            member("a", ApprovalState::Approved, CreditCheckState::Complete),
            member("b", ApprovalState::Approved, CreditCheckState::Complete),
            member("c", ApprovalState::Approved, CreditCheckState::Complete),
        ];

        let eligible = eligible_members(&members, &["b".to_string()]);
        let ids: Vec<&str> = eligible.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_roster_order_is_preserved() {
        let members = vec![
            member("z", ApprovalState::Approved, CreditCheckState::Complete),
            member("m", ApprovalState::Approved, CreditCheckState::Complete),
            member("a", ApprovalState::Approved, CreditCheckState::Complete),
        ];

        let eligible = eligible_members(&members, &[]);
        let ids: Vec<&str> = eligible.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_unknown_exclusion_id_is_ignored() {
        let members = vec![
            member("a", ApprovalState::Approved, CreditCheckState::Complete),
            member("b", ApprovalState::Approved, CreditCheckState::Complete),
        ];

        let eligible = eligible_members(&members, &["ghost".to_string()]);
        assert_eq!(eligible.len(), 2);
    }

    #[test]
    fn test_empty_roster_yields_empty() {
        let eligible = eligible_members(&[], &[]);
        assert!(eligible.is_empty());
    }

    #[test]
    fn test_validate_members_names_the_offender() {
        let mut members = vec![
            member("a", ApprovalState::Approved, CreditCheckState::Complete),
            member("b", ApprovalState::Approved, CreditCheckState::Complete),
        ];
        members[1].monthly_obligations = dec!(-50);

        let err = validate_members(&members).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'b'"), "unexpected message: {message}");
        assert!(message.contains("obligations"), "unexpected message: {message}");
    }
}
