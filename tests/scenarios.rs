//! End-to-end checks of the rule engine and memo over whole transactions

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secondary_market::{
    analyze_form, evaluate, format_memo, AccountingTreatment, BuyerType, ContingentEvent,
    EconomicInterest, EntityInvolvement, EntrySide, FormValue, ParseMode, RawTransactionInput,
    SellerType, ShareStatus, TransactionInput, YesNo,
};

fn sale(seller: SellerType, buyer: BuyerType, price: Decimal, fair_value: Decimal, shares: u64) -> TransactionInput {
    TransactionInput::new(seller, buyer, price, fair_value, shares)
}

fn with_unset<T: FormValue>() -> Vec<Option<T>> {
    std::iter::once(None).chain(T::ALL.iter().copied().map(Some)).collect()
}

/// Every combination of categorical answers over a few price points
fn transaction_grid() -> Vec<TransactionInput> {
    let prices = [(dec!(15), dec!(10)), (dec!(10), dec!(10)), (dec!(8.25), dec!(10))];
    let mut grid = Vec::new();

    for seller in SellerType::ALL {
        for buyer in BuyerType::ALL {
            for interest in with_unset::<EconomicInterest>() {
                for involvement in with_unset::<EntityInvolvement>() {
                    for status in with_unset::<ShareStatus>() {
                        for inducement in with_unset::<YesNo>() {
                            for pattern in with_unset::<YesNo>() {
                                for contingent in with_unset::<ContingentEvent>() {
                                    for (price, fair_value) in prices {
                                        grid.push(TransactionInput {
                                            economic_interest: interest,
                                            entity_involvement: involvement,
                                            share_status: status,
                                            months_held: dec!(3),
                                            previously_cost: dec!(4),
                                            is_short_term_inducement: inducement,
                                            has_pattern: pattern,
                                            contingent_event: contingent,
                                            ..sale(*seller, *buyer, price, fair_value, 1000)
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    grid
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_properties_hold_for_every_combination() {
    for input in transaction_grid() {
        let result = evaluate(&input);
        let shares = Decimal::from(input.number_of_shares);

        assert_eq!(
            result.excess_per_share,
            (input.transaction_price - input.fair_value).max(Decimal::ZERO),
            "{:?}",
            input
        );
        assert_eq!(result.total_transaction_value, input.transaction_price * shares);
        assert_eq!(result.is_compensatory, result.compensation_amount > Decimal::ZERO, "{:?}", input);
        assert_eq!(
            result.requires_reclassification,
            !result.reclassification_reason.is_empty(),
            "{:?}",
            input
        );
        assert!(result.is_balanced(), "unbalanced entries for {:?}", input);
        assert!(!result.reasoning.is_empty());
    }
}

#[test]
fn test_evaluation_is_idempotent_across_grid() {
    for input in transaction_grid().into_iter().step_by(37) {
        assert_eq!(evaluate(&input), evaluate(&input));
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_investor_sells_to_entity() {
    let result = evaluate(&sale(SellerType::Investor, BuyerType::Entity, dec!(15), dec!(10), 1000));

    assert_eq!(result.accounting_treatment, AccountingTreatment::Distribution);
    assert_eq!(result.excess_per_share, dec!(5));
    assert_eq!(result.total_excess, dec!(5000));
    assert_eq!(result.journal_entries.len(), 3);

    let credits: Decimal = result
        .journal_entries
        .iter()
        .filter(|e| e.side == EntrySide::Credit)
        .map(|e| e.amount)
        .sum();
    assert_eq!(credits, dec!(15000));
}

#[test]
fn test_scenario_employee_sells_to_entity() {
    let result = evaluate(&sale(SellerType::CurrentEmployee, BuyerType::Entity, dec!(15), dec!(10), 1000));

    assert!(result.is_compensatory);
    assert_eq!(result.compensation_amount, dec!(5000));
    assert_eq!(result.accounting_treatment, AccountingTreatment::Compensation);
}

#[test]
fn test_scenario_founder_to_de_minimis_related_party() {
    let input = TransactionInput {
        economic_interest: Some(EconomicInterest::DeMinimis),
        entity_involvement: Some(EntityInvolvement::NotInvolved),
        ..sale(SellerType::Founder, BuyerType::RelatedParty, dec!(15), dec!(10), 1000)
    };
    let result = evaluate(&input);

    assert!(!result.is_compensatory);
    assert_eq!(result.accounting_treatment, AccountingTreatment::NonCompensatory);
    assert!(result.journal_entries.is_empty());
}

#[test]
fn test_scenario_no_excess_for_any_buyer() {
    for buyer in BuyerType::ALL {
        let result = evaluate(&sale(SellerType::CurrentEmployee, *buyer, dec!(10), dec!(10), 1000));

        assert!(!result.is_compensatory, "{:?}", buyer);
        assert_eq!(result.accounting_treatment, AccountingTreatment::NoExcess);
        assert!(result.journal_entries.is_empty());
    }
}

#[test]
fn test_scenario_pattern_of_repurchases() {
    let input = TransactionInput {
        share_status: Some(ShareStatus::Immature),
        months_held: dec!(3),
        has_pattern: Some(YesNo::Yes),
        previously_cost: dec!(4),
        ..sale(SellerType::CurrentEmployee, BuyerType::Entity, dec!(15), dec!(10), 1000)
    };
    let result = evaluate(&input);

    assert!(result.requires_reclassification);
    assert!(result.is_immature);

    let groups = result.entry_groups();
    let reclass = groups
        .iter()
        .find(|g| g.section == Some("Reclassification Entry"))
        .expect("sectioned entry group");
    assert_eq!(reclass.entries[0].account, "Compensation Cost");
    assert_eq!(reclass.entries[0].amount, dec!(11000));
    assert_eq!(reclass.total(EntrySide::Credit), dec!(15000));
    assert!(result.treatment_label.ends_with(" + Liability Reclassification"));
}

#[test]
fn test_scenario_inducement_exception() {
    for pattern in with_unset::<YesNo>() {
        for contingent in with_unset::<ContingentEvent>() {
            let input = TransactionInput {
                share_status: Some(ShareStatus::Immature),
                months_held: dec!(3),
                is_short_term_inducement: Some(YesNo::Yes),
                has_pattern: pattern,
                contingent_event: contingent,
                ..sale(SellerType::Executive, BuyerType::Entity, dec!(15), dec!(10), 1000)
            };
            let result = evaluate(&input);

            assert!(!result.requires_reclassification);
            assert!(result.reclassification_reason.is_empty());
        }
    }
}

// ============================================================================
// FORM → MEMO
// ============================================================================

#[test]
fn test_form_to_memo() {
    let raw = RawTransactionInput {
        company_name: "Acme Robotics".to_string(),
        transaction_date: "2025-03-15".to_string(),
        transaction_price: "$15.00".to_string(),
        fair_value: "10".to_string(),
        number_of_shares: "1,000".to_string(),
        seller_type: "current_employee".to_string(),
        buyer_type: "entity".to_string(),
        ..Default::default()
    };

    let (input, result) = analyze_form(&raw, ParseMode::Strict).unwrap();
    let memo = format_memo(&input, &result);

    assert!(memo.starts_with("MEMORANDUM"));
    assert!(memo.contains("Acme Robotics"));
    assert!(memo.contains("$5,000.00"));
    assert!(memo.contains("JOURNAL ENTRIES"));
    assert!(memo.contains("AUTHORITATIVE GUIDANCE"));
}

#[test]
fn test_lenient_form_treats_garbage_as_zero() {
    let raw = RawTransactionInput {
        transaction_price: "fifteen".to_string(),
        fair_value: "10".to_string(),
        number_of_shares: "1000".to_string(),
        seller_type: "investor".to_string(),
        buyer_type: "entity".to_string(),
        ..Default::default()
    };

    assert!(analyze_form(&raw, ParseMode::Strict).is_err());

    let (input, result) = analyze_form(&raw, ParseMode::Lenient).unwrap();
    assert_eq!(input.transaction_price, Decimal::ZERO);
    assert_eq!(result.accounting_treatment, AccountingTreatment::NoImpact);
    assert!(result.journal_entries.is_empty());
}
