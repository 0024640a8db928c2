use groupnest_core::contributions::engine::{calculate_contribution_models, ContributionInput};
use groupnest_core::contributions::models::{BalanceStatus, ContributionModel, CustomAssignment};
use groupnest_core::{
    ApprovalState, CreditCheckState, EligibilityStatus, EmploymentType, GroupnestError, Member,
    UnitSize,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn member(
    id: &str,
    income: Decimal,
    obligations: Decimal,
    unit_size: UnitSize,
) -> Member {
    Member {
        id: id.to_string(),
        display_name: format!("Member {id}"),
        monthly_income: income,
        monthly_obligations: obligations,
        total_debt: Decimal::ZERO,
        employment_type: EmploymentType::FullTime,
        unit_size,
        eligibility: EligibilityStatus {
            approval: ApprovalState::Approved,
            credit_check: CreditCheckState::Complete,
        },
    }
}

fn sample_group() -> ContributionInput {
    ContributionInput {
        members: vec![
            member("a", dec!(6000), dec!(400), UnitSize::Studio),
            member("b", dec!(4000), dec!(250), UnitSize::OneBedroom),
            member("c", dec!(5000), dec!(350), UnitSize::TwoBedroom),
        ],
        estimated_monthly_cost: dec!(3000),
        exclude_ids: Vec::new(),
        custom_assignment: None,
        hybrid_equal_ratio: None,
    }
}

fn payments(model: &ContributionModel) -> Vec<Decimal> {
    model.members.iter().map(|m| m.payment_amount).collect()
}

// ===========================================================================
// Split model tests
// ===========================================================================

#[test]
fn test_worked_scenario_across_all_models() {
    let result = calculate_contribution_models(&sample_group()).unwrap();
    let models = &result.result;

    // equal: 3000 / 3
    assert_eq!(
        payments(&models.equal),
        vec![dec!(1000.00), dec!(1000.00), dec!(1000.00)]
    );
    // proportional: 6000/15000, 4000/15000, 5000/15000 of 3000
    assert_eq!(
        payments(&models.proportional),
        vec![dec!(1200.00), dec!(800.00), dec!(1000.00)]
    );
    // unit weights 0.75 / 1.00 / 1.25 over a 3.00 total
    assert_eq!(
        payments(&models.unit_weighted),
        vec![dec!(750.00), dec!(1000.00), dec!(1250.00)]
    );
    // hybrid at the default 0.5 blend
    assert_eq!(
        payments(&models.hybrid),
        vec![dec!(1100.00), dec!(900.00), dec!(1000.00)]
    );
    assert!(models.custom.is_none());
}

#[test]
fn test_models_exhaust_the_cost_within_a_cent() {
    // 1000 / 6 = 166.666...: rounding every share on its own would overshoot
    // the cost by two cents
    let incomes = [
        dec!(6000),
        dec!(4000),
        dec!(5000),
        dec!(3500),
        dec!(4500),
        dec!(5500),
    ];
    let input = ContributionInput {
        members: incomes
            .iter()
            .enumerate()
            .map(|(i, income)| member(&format!("m{i}"), *income, dec!(300), UnitSize::OneBedroom))
            .collect(),
        estimated_monthly_cost: dec!(1000),
        exclude_ids: Vec::new(),
        custom_assignment: None,
        hybrid_equal_ratio: None,
    };
    let result = calculate_contribution_models(&input).unwrap();
    let models = &result.result;

    for model in [
        &models.equal,
        &models.proportional,
        &models.unit_weighted,
        &models.hybrid,
    ] {
        let total: Decimal = model.members.iter().map(|m| m.payment_amount).sum();
        assert!(
            (total - dec!(1000)).abs() <= dec!(0.01),
            "{} model sums to {total}",
            model.model_type
        );
    }

    // the final member absorbs the rounding remainder
    assert_eq!(
        payments(&models.equal),
        vec![
            dec!(166.67),
            dec!(166.67),
            dec!(166.67),
            dec!(166.67),
            dec!(166.67),
            dec!(166.65)
        ]
    );
}

#[test]
fn test_equal_income_members_pay_the_same_in_every_model() {
    // b and c match on income and unit size; d sits last so the rounding
    // remainder lands on a member outside the pair
    let input = ContributionInput {
        members: vec![
            member("b", dec!(5000), dec!(300), UnitSize::OneBedroom),
            member("c", dec!(5000), dec!(250), UnitSize::OneBedroom),
            member("d", dec!(4000), dec!(350), UnitSize::TwoBedroom),
        ],
        estimated_monthly_cost: dec!(1000),
        exclude_ids: Vec::new(),
        custom_assignment: None,
        hybrid_equal_ratio: None,
    };
    let result = calculate_contribution_models(&input).unwrap();
    let models = &result.result;

    for model in [
        &models.equal,
        &models.proportional,
        &models.unit_weighted,
        &models.hybrid,
    ] {
        assert_eq!(
            model.members[0].payment_amount, model.members[1].payment_amount,
            "{} model pays b and c differently",
            model.model_type
        );
    }

    // 5000 / 14000 of 1000 lands on 357.14 for both b and c
    assert_eq!(
        payments(&models.proportional),
        vec![dec!(357.14), dec!(357.14), dec!(285.72)]
    );
}

#[test]
fn test_hybrid_payment_stays_between_equal_and_proportional() {
    let mut input = sample_group();
    input.hybrid_equal_ratio = Some(dec!(0.3));
    let result = calculate_contribution_models(&input).unwrap();
    let models = &result.result;

    for i in 0..3 {
        let equal = models.equal.members[i].payment_amount;
        let proportional = models.proportional.members[i].payment_amount;
        let hybrid = models.hybrid.members[i].payment_amount;
        let lo = equal.min(proportional);
        let hi = equal.max(proportional);
        assert!(
            hybrid >= lo && hybrid <= hi,
            "hybrid {hybrid} outside [{lo}, {hi}] for member {i}"
        );
    }
}

#[test]
fn test_zero_income_member_has_null_percentage() {
    let mut input = sample_group();
    input.members[1].monthly_income = Decimal::ZERO;
    let result = calculate_contribution_models(&input).unwrap();
    let line = &result.result.equal.members[1];

    assert_eq!(line.payment_amount, dec!(1000.00));
    assert_eq!(line.percentage_of_income, None);
    assert!(!line.exceeds_affordability);
}

#[test]
fn test_affordability_flag_is_strictly_above_thirty_percent() {
    let input = ContributionInput {
        members: vec![
            member("exact", dec!(5000), dec!(0), UnitSize::OneBedroom),
            member("over", dec!(4000), dec!(0), UnitSize::OneBedroom),
        ],
        estimated_monthly_cost: dec!(3000),
        exclude_ids: Vec::new(),
        custom_assignment: None,
        hybrid_equal_ratio: None,
    };
    let result = calculate_contribution_models(&input).unwrap();
    let equal = &result.result.equal;

    // 1500 / 5000 = 0.30 exactly: not flagged
    assert_eq!(equal.members[0].percentage_of_income, Some(dec!(0.3000)));
    assert!(!equal.members[0].exceeds_affordability);
    // 1500 / 4000 = 0.375: flagged
    assert_eq!(equal.members[1].percentage_of_income, Some(dec!(0.3750)));
    assert!(equal.members[1].exceeds_affordability);
}

#[test]
fn test_breathing_room_goes_negative_for_an_underwater_member() {
    let mut input = sample_group();
    input.members[1].monthly_obligations = dec!(3200);
    let result = calculate_contribution_models(&input).unwrap();

    // 4000 - 3200 - 1000
    assert_eq!(result.result.equal.members[1].breathing_room, dec!(-200.00));
}

// ===========================================================================
// Custom split tests
// ===========================================================================

#[test]
fn test_custom_split_balance_verdicts() {
    let mut input = sample_group();
    input.custom_assignment = Some(vec![
        CustomAssignment {
            member_id: "a".to_string(),
            payment_amount: dec!(1500),
        },
        CustomAssignment {
            member_id: "b".to_string(),
            payment_amount: dec!(500),
        },
        CustomAssignment {
            member_id: "c".to_string(),
            payment_amount: dec!(1000),
        },
    ]);

    let result = calculate_contribution_models(&input).unwrap();
    let custom = result.result.custom.as_ref().unwrap();
    assert_eq!(custom.balance, Some(BalanceStatus::Balanced));
    assert!(custom.rejected.is_empty());

    // push a to 1550: fifty dollars over
    input.custom_assignment.as_mut().unwrap()[0].payment_amount = dec!(1550);
    let result = calculate_contribution_models(&input).unwrap();
    assert_eq!(
        result.result.custom.as_ref().unwrap().balance,
        Some(BalanceStatus::Overage {
            amount: dec!(50.00)
        })
    );

    // drop a to 1450: fifty dollars short
    input.custom_assignment.as_mut().unwrap()[0].payment_amount = dec!(1450);
    let result = calculate_contribution_models(&input).unwrap();
    assert_eq!(
        result.result.custom.as_ref().unwrap().balance,
        Some(BalanceStatus::Shortfall {
            amount: dec!(50.00)
        })
    );
}

#[test]
fn test_custom_split_records_unmatched_assignments() {
    let mut input = sample_group();
    input.custom_assignment = Some(vec![
        CustomAssignment {
            member_id: "a".to_string(),
            payment_amount: dec!(3000),
        },
        CustomAssignment {
            member_id: "nobody".to_string(),
            payment_amount: dec!(400),
        },
    ]);

    let result = calculate_contribution_models(&input).unwrap();
    let custom = result.result.custom.as_ref().unwrap();

    assert_eq!(custom.rejected.len(), 1);
    assert_eq!(custom.rejected[0].member_id, "nobody");
    // the unmatched 400 never counts, so the applied total still balances
    assert_eq!(custom.balance, Some(BalanceStatus::Balanced));
}

#[test]
fn test_exclusion_does_not_recalculate_the_custom_split() {
    let mut input = sample_group();
    input.exclude_ids = vec!["b".to_string()];
    input.custom_assignment = Some(vec![
        CustomAssignment {
            member_id: "a".to_string(),
            payment_amount: dec!(1200),
        },
        CustomAssignment {
            member_id: "b".to_string(),
            payment_amount: dec!(800),
        },
        CustomAssignment {
            member_id: "c".to_string(),
            payment_amount: dec!(1000),
        },
    ]);

    let result = calculate_contribution_models(&input).unwrap();
    let models = &result.result;

    // computed models drop b
    assert_eq!(models.equal.members.len(), 2);
    assert_eq!(
        payments(&models.proportional),
        vec![dec!(1636.36), dec!(1363.64)]
    );

    // the custom split still covers all three and stays balanced
    let custom = models.custom.as_ref().unwrap();
    assert_eq!(custom.members.len(), 3);
    assert_eq!(custom.balance, Some(BalanceStatus::Balanced));
    assert!(custom.note.as_ref().unwrap().contains("full roster"));
}

// ===========================================================================
// Eligibility edge tests
// ===========================================================================

#[test]
fn test_single_eligible_member_carries_everything() {
    let mut input = sample_group();
    input.exclude_ids = vec!["a".to_string(), "b".to_string()];

    let result = calculate_contribution_models(&input).unwrap();
    assert_eq!(payments(&result.result.equal), vec![dec!(3000.00)]);
    assert_eq!(payments(&result.result.proportional), vec![dec!(3000.00)]);
}

#[test]
fn test_no_eligible_members_is_an_error() {
    let mut input = sample_group();
    for m in &mut input.members {
        m.eligibility.approval = ApprovalState::Pending;
    }

    let err = calculate_contribution_models(&input).unwrap_err();
    assert!(matches!(err, GroupnestError::NoEligibleMembers));
}
