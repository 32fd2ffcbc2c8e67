// 🧭 Rule Engine - ASC 718 decision tree for secondary-market transactions
//
// Evaluation order (each decision point records one reasoning step before its children):
//   1. Seller type        investor → distribution / capital transaction / no impact
//   2. Service provider   price vs. fair value → buyer type → interest / involvement
//   3. Maturity overlay   immature shares (< 6 months) → liability reclassification
//
// Pure: no I/O, no shared state. Same input, same result, same order.

use crate::analysis::{AccountingTreatment, AnalysisResult, DecisionPoint, JournalEntry, ReasoningStep};
use crate::input::{
    BuyerType, ContingentEvent, EconomicInterest, EntityInvolvement, ShareStatus,
    TransactionInput,
};
use crate::money::{format_currency, format_plain};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Shares held for less than this many months are immature
pub const IMMATURITY_MONTHS: Decimal = dec!(6);

pub const RECLASSIFICATION_SECTION: &str = "Reclassification Entry";
pub const RECLASSIFICATION_SUFFIX: &str = " + Liability Reclassification";

pub const PATTERN_REASON: &str = "Pattern of repurchasing immature shares — substantive liability";
pub const CONTINGENT_REASON: &str = "Contingent repurchase event probable — contingent liability";

const TREASURY_STOCK: &str = "Treasury Stock/Equity";
const RETAINED_EARNINGS: &str = "Retained Earnings (Distribution)";
const CASH: &str = "Cash";
const APIC: &str = "Additional Paid-in Capital";
const APIC_CONTRIBUTION: &str = "APIC (Capital Contribution)";
const COMPENSATION_COST: &str = "Compensation Cost";
const LIABILITY: &str = "Share-Based Payment Liability";

// ============================================================================
// EVALUATION STATE
// ============================================================================

/// Amounts derived once from the input, before any branching
#[derive(Debug, Clone, Copy)]
struct Figures {
    shares: Decimal,
    excess_per_share: Decimal,
    total_excess: Decimal,
    total_value: Decimal,
    fair_value_total: Decimal,
}

impl Figures {
    fn from_input(input: &TransactionInput) -> Self {
        let shares = Decimal::from(input.number_of_shares);
        let excess_per_share = input
            .transaction_price
            .saturating_sub(input.fair_value)
            .max(Decimal::ZERO);

        // Saturates rather than panics; `validate` rejects totals this large
        Figures {
            shares,
            excess_per_share,
            total_excess: excess_per_share.saturating_mul(shares),
            total_value: input.transaction_price.saturating_mul(shares),
            fair_value_total: input.fair_value.saturating_mul(shares),
        }
    }

    fn has_excess(&self) -> bool {
        self.total_excess > Decimal::ZERO
    }
}

/// Append-only trail of reasoning and journal entries
#[derive(Debug, Default)]
struct Trail {
    reasoning: Vec<ReasoningStep>,
    entries: Vec<JournalEntry>,
}

impl Trail {
    fn record(&mut self, point: DecisionPoint, conclusion: String, alert: bool) {
        debug!(step = point.label(), alert, "{}", conclusion);
        self.reasoning.push(ReasoningStep {
            point,
            conclusion,
            alert,
        });
    }

    fn post(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }
}

/// Outcome of the maturity overlay
#[derive(Debug, Default)]
struct Overlay {
    is_immature: bool,
    reclassification_reason: Option<&'static str>,
    posted_entries: bool,
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Classify one transaction.
///
/// Never fails: absent optional answers take the most conservative branch.
pub fn evaluate(input: &TransactionInput) -> AnalysisResult {
    let figures = Figures::from_input(input);
    let mut trail = Trail::default();

    let treatment = if input.seller_type.is_investor() {
        evaluate_investor(input, &figures, &mut trail)
    } else {
        evaluate_service_provider(input, &figures, &mut trail)
    };

    // The overlay only applies when a service provider sold
    let overlay = if input.seller_type.is_investor() {
        Overlay::default()
    } else {
        evaluate_maturity(input, &figures, &mut trail)
    };

    let compensation_amount = if treatment == AccountingTreatment::Compensation {
        figures.total_excess
    } else {
        Decimal::ZERO
    };

    let mut treatment_label = treatment.label().to_string();
    if overlay.posted_entries {
        treatment_label.push_str(RECLASSIFICATION_SUFFIX);
    }

    debug!(
        treatment = treatment.as_str(),
        compensation = %compensation_amount,
        reclassify = overlay.reclassification_reason.is_some(),
        "evaluation complete"
    );

    AnalysisResult {
        is_compensatory: compensation_amount > Decimal::ZERO,
        compensation_amount,
        excess_per_share: figures.excess_per_share,
        total_excess: figures.total_excess,
        total_transaction_value: figures.total_value,
        accounting_treatment: treatment,
        treatment_label,
        reasoning: trail.reasoning,
        requires_reclassification: overlay.reclassification_reason.is_some(),
        reclassification_reason: overlay
            .reclassification_reason
            .map(str::to_string)
            .unwrap_or_default(),
        journal_entries: trail.entries,
        is_immature: overlay.is_immature,
    }
}

// ============================================================================
// STEP 1: INVESTOR SELLER
// ============================================================================

fn evaluate_investor(
    input: &TransactionInput,
    figures: &Figures,
    trail: &mut Trail,
) -> AccountingTreatment {
    trail.record(
        DecisionPoint::SellerType,
        "Seller is an investor, not an employee or other service provider; the transaction is \
         not subject to the ASC 718 compensation framework."
            .to_string(),
        false,
    );

    if !figures.has_excess() {
        trail.record(DecisionPoint::PriceVsFairValue, no_excess_text(input), false);
        return AccountingTreatment::NoImpact;
    }

    trail.record(DecisionPoint::PriceVsFairValue, excess_text(input, figures), false);

    if input.buyer_type == BuyerType::Entity {
        trail.record(
            DecisionPoint::BuyerType,
            "The Company repurchased the shares above fair value; the excess is a distribution \
             to the selling shareholder (ASC 505-30)."
                .to_string(),
            true,
        );
        trail.post(JournalEntry::debit(TREASURY_STOCK, figures.fair_value_total));
        trail.post(JournalEntry::debit(RETAINED_EARNINGS, figures.total_excess));
        trail.post(JournalEntry::credit(CASH, figures.total_value));
        AccountingTreatment::Distribution
    } else {
        trail.record(
            DecisionPoint::BuyerType,
            format!(
                "Buyer is {}; the transfer is between shareholders and the Company records no entry.",
                input.buyer_type.with_article()
            ),
            false,
        );
        AccountingTreatment::CapitalTransaction
    }
}

// ============================================================================
// STEP 2: EMPLOYEE / FOUNDER / EXECUTIVE SELLER
// ============================================================================

fn evaluate_service_provider(
    input: &TransactionInput,
    figures: &Figures,
    trail: &mut Trail,
) -> AccountingTreatment {
    trail.record(
        DecisionPoint::SellerType,
        format!(
            "Seller is {} who provides services to the Company; any excess over fair value must \
             be evaluated as potential compensation under ASC 718.",
            input.seller_type.with_article()
        ),
        false,
    );

    if !figures.has_excess() {
        trail.record(
            DecisionPoint::PriceVsFairValue,
            format!("{} No compensation cost arises.", no_excess_text(input)),
            false,
        );
        return AccountingTreatment::NoExcess;
    }

    trail.record(
        DecisionPoint::PriceVsFairValue,
        format!("{} The excess may represent compensation.", excess_text(input, figures)),
        true,
    );

    match input.buyer_type {
        BuyerType::Entity => {
            trail.record(
                DecisionPoint::BuyerType,
                "The Company repurchased the shares; the excess of the repurchase price over fair \
                 value is compensation cost (ASC 718-20-35-7)."
                    .to_string(),
                true,
            );
            trail.post(JournalEntry::debit(APIC, figures.fair_value_total));
            trail.post(JournalEntry::debit(COMPENSATION_COST, figures.total_excess));
            trail.post(JournalEntry::credit(CASH, figures.total_value));
            AccountingTreatment::Compensation
        }
        BuyerType::RelatedParty | BuyerType::EconomicHolder => {
            trail.record(
                DecisionPoint::BuyerType,
                format!(
                    "Buyer is {}; such holders are presumed to act on behalf of the Company \
                     (ASC 718-10-15-4).",
                    input.buyer_type.with_article()
                ),
                false,
            );
            evaluate_holder_interest(input, figures, trail)
        }
        BuyerType::NewInvestor => {
            trail.record(
                DecisionPoint::BuyerType,
                "Buyer is a new investor with no existing economic interest in the Company; \
                 classification depends on the Company's involvement."
                    .to_string(),
                false,
            );
            evaluate_new_investor(input, figures, trail)
        }
    }
}

/// Related party or economic interest holder bought the shares
fn evaluate_holder_interest(
    input: &TransactionInput,
    figures: &Figures,
    trail: &mut Trail,
) -> AccountingTreatment {
    if input.economic_interest != Some(EconomicInterest::DeMinimis) {
        let interest = match input.economic_interest {
            Some(EconomicInterest::Significant) => "significant",
            _ => "not documented as de minimis",
        };
        trail.record(
            DecisionPoint::EconomicInterest,
            format!(
                "The holder's economic interest is {}; the presumption stands and the excess is \
                 compensation cost contributed to the Company by the holder.",
                interest
            ),
            true,
        );
        post_capital_contribution(figures, trail);
        return AccountingTreatment::Compensation;
    }

    trail.record(
        DecisionPoint::EconomicInterest,
        "The holder's economic interest is de minimis; the presumption may be overcome unless \
         the Company facilitated the transaction."
            .to_string(),
        false,
    );

    if input.entity_involvement == Some(EntityInvolvement::Facilitated) {
        trail.record(
            DecisionPoint::EntityInvolvement,
            "The Company facilitated the transaction; the presumption is not overcome and the \
             excess is compensation cost."
                .to_string(),
            true,
        );
        post_capital_contribution(figures, trail);
        AccountingTreatment::Compensation
    } else {
        trail.record(
            DecisionPoint::EntityInvolvement,
            format!(
                "The Company's involvement was {}; the presumption is overcome and the \
                 transaction is not compensatory.",
                involvement_phrase(input.entity_involvement)
            ),
            false,
        );
        AccountingTreatment::NonCompensatory
    }
}

fn evaluate_new_investor(
    input: &TransactionInput,
    figures: &Figures,
    trail: &mut Trail,
) -> AccountingTreatment {
    match input.entity_involvement {
        Some(EntityInvolvement::Facilitated) => {
            trail.record(
                DecisionPoint::EntityInvolvement,
                "The Company facilitated the sale to the new investor; the excess is compensation \
                 cost."
                    .to_string(),
                true,
            );
            post_capital_contribution(figures, trail);
            AccountingTreatment::Compensation
        }
        Some(EntityInvolvement::Minimal) => {
            trail.record(
                DecisionPoint::EntityInvolvement,
                "The Company's involvement was limited to protective rights (right of first \
                 refusal, transfer approval); the transaction is not compensatory."
                    .to_string(),
                false,
            );
            AccountingTreatment::NonCompensatory
        }
        Some(EntityInvolvement::NotInvolved) | None => {
            trail.record(
                DecisionPoint::EntityInvolvement,
                format!(
                    "The Company's involvement was {}; no basis to treat the excess as \
                     compensation.",
                    involvement_phrase(input.entity_involvement)
                ),
                false,
            );
            AccountingTreatment::NonCompensatory
        }
    }
}

/// Holder pays the excess on the Company's behalf
fn post_capital_contribution(figures: &Figures, trail: &mut Trail) {
    trail.post(JournalEntry::debit(COMPENSATION_COST, figures.total_excess));
    trail.post(JournalEntry::credit(APIC_CONTRIBUTION, figures.total_excess));
}

// ============================================================================
// STEP 3: MATURITY OVERLAY
// ============================================================================

/// Immaturity needs an explicit `immature` share status plus fewer than six months held.
/// The input model reads "immature" as any status other than `mature`, while the decision
/// tree only enters this step on `immature`; an unset status follows the decision tree,
/// because `monthsHeld` defaults to zero and would otherwise flag every unanswered form.
fn evaluate_maturity(input: &TransactionInput, figures: &Figures, trail: &mut Trail) -> Overlay {
    if input.share_status != Some(ShareStatus::Immature) || input.months_held >= IMMATURITY_MONTHS {
        return Overlay::default();
    }

    trail.record(
        DecisionPoint::ShareMaturity,
        format!(
            "Shares were held {} months after vesting or exercise (less than {}); immature shares \
             require liability classification review.",
            format_plain(input.months_held),
            format_plain(IMMATURITY_MONTHS)
        ),
        true,
    );

    let mut overlay = Overlay {
        is_immature: true,
        ..Overlay::default()
    };

    if input.is_short_term_inducement.is_some_and(|v| v.is_yes()) {
        trail.record(
            DecisionPoint::RepurchaseFeature,
            "The repurchase is a short-term inducement; the exception applies and equity \
             classification is retained."
                .to_string(),
            false,
        );
    } else if input.has_pattern.is_some_and(|v| v.is_yes()) {
        trail.record(
            DecisionPoint::RepurchaseFeature,
            "The Company has a pattern of repurchasing immature shares; the awards are substantive \
             liabilities and must be reclassified."
                .to_string(),
            true,
        );
        post_reclassification(input, figures, trail);
        overlay.reclassification_reason = Some(PATTERN_REASON);
        overlay.posted_entries = true;
    } else if input.contingent_event == Some(ContingentEvent::Probable) {
        trail.record(
            DecisionPoint::RepurchaseFeature,
            "A contingent repurchase event is probable; the awards are contingent liabilities and \
             must be reclassified."
                .to_string(),
            true,
        );
        overlay.reclassification_reason = Some(CONTINGENT_REASON);
    } else {
        trail.record(
            DecisionPoint::RepurchaseFeature,
            "No pattern of repurchases and no probable contingent event; equity classification is \
             retained."
                .to_string(),
            false,
        );
    }

    overlay
}

/// Move the award to a liability at the repurchase amount.
/// The equity reversal is capped at the liability so the entry always balances.
fn post_reclassification(input: &TransactionInput, figures: &Figures, trail: &mut Trail) {
    let reclass_amount = figures.total_value;
    let previously_recognized = input.previously_cost.saturating_mul(figures.shares);
    let incremental = reclass_amount.saturating_sub(previously_recognized).max(Decimal::ZERO);
    let equity_reversal = previously_recognized.min(reclass_amount);

    trail.post(JournalEntry::debit(COMPENSATION_COST, incremental).in_section(RECLASSIFICATION_SECTION));
    trail.post(JournalEntry::debit(APIC, equity_reversal).in_section(RECLASSIFICATION_SECTION));
    trail.post(JournalEntry::credit(LIABILITY, reclass_amount).in_section(RECLASSIFICATION_SECTION));
}

// ============================================================================
// PHRASES
// ============================================================================

fn excess_text(input: &TransactionInput, figures: &Figures) -> String {
    format!(
        "Transaction price of {} exceeds fair value of {} by {} per share ({} in total).",
        format_currency(input.transaction_price),
        format_currency(input.fair_value),
        format_currency(figures.excess_per_share),
        format_currency(figures.total_excess)
    )
}

fn no_excess_text(input: &TransactionInput) -> String {
    format!(
        "Transaction price of {} does not exceed fair value of {}; there is no excess consideration.",
        format_currency(input.transaction_price),
        format_currency(input.fair_value)
    )
}

fn involvement_phrase(involvement: Option<EntityInvolvement>) -> &'static str {
    match involvement {
        Some(EntityInvolvement::Facilitated) => "active facilitation",
        Some(EntityInvolvement::Minimal) => "minimal",
        Some(EntityInvolvement::NotInvolved) => "none",
        None => "not documented",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EntrySide;
    use crate::input::{FormValue, SellerType, YesNo};

    fn employee_sale(buyer: BuyerType) -> TransactionInput {
        TransactionInput::new(SellerType::CurrentEmployee, buyer, dec!(15), dec!(10), 1000)
    }

    fn points(result: &AnalysisResult) -> Vec<DecisionPoint> {
        result.visited()
    }

    #[test]
    fn test_investor_sells_to_entity_is_distribution() {
        let input = TransactionInput::new(SellerType::Investor, BuyerType::Entity, dec!(15), dec!(10), 1000);
        let result = evaluate(&input);

        assert_eq!(result.accounting_treatment, AccountingTreatment::Distribution);
        assert!(!result.is_compensatory);
        assert_eq!(result.compensation_amount, Decimal::ZERO);
        assert_eq!(result.excess_per_share, dec!(5));
        assert_eq!(result.total_excess, dec!(5000));

        let accounts: Vec<(EntrySide, &str, Decimal)> = result
            .journal_entries
            .iter()
            .map(|e| (e.side, e.account.as_str(), e.amount))
            .collect();
        assert_eq!(
            accounts,
            vec![
                (EntrySide::Debit, TREASURY_STOCK, dec!(10000)),
                (EntrySide::Debit, RETAINED_EARNINGS, dec!(5000)),
                (EntrySide::Credit, CASH, dec!(15000)),
            ]
        );
        assert_eq!(
            points(&result),
            vec![DecisionPoint::SellerType, DecisionPoint::PriceVsFairValue, DecisionPoint::BuyerType]
        );
    }

    #[test]
    fn test_investor_to_investor_is_capital_transaction() {
        let input =
            TransactionInput::new(SellerType::Investor, BuyerType::NewInvestor, dec!(15), dec!(10), 1000);
        let result = evaluate(&input);

        assert_eq!(result.accounting_treatment, AccountingTreatment::CapitalTransaction);
        assert!(result.journal_entries.is_empty());
    }

    #[test]
    fn test_investor_without_excess_has_no_impact() {
        let input = TransactionInput::new(SellerType::Investor, BuyerType::Entity, dec!(8), dec!(10), 1000);
        let result = evaluate(&input);

        assert_eq!(result.accounting_treatment, AccountingTreatment::NoImpact);
        assert_eq!(result.excess_per_share, Decimal::ZERO);
        assert_eq!(result.total_transaction_value, dec!(8000));
        assert_eq!(result.reasoning.len(), 2);
    }

    #[test]
    fn test_investor_skips_maturity_overlay() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(2),
            has_pattern: Some(YesNo::Yes),
            ..TransactionInput::new(SellerType::Investor, BuyerType::Entity, dec!(15), dec!(10), 1000)
        };
        let result = evaluate(&input);

        assert!(!result.is_immature);
        assert!(!result.requires_reclassification);
        assert!(!points(&result).contains(&DecisionPoint::ShareMaturity));
    }

    #[test]
    fn test_entity_repurchase_from_employee_is_compensation() {
        let result = evaluate(&employee_sale(BuyerType::Entity));

        assert!(result.is_compensatory);
        assert_eq!(result.compensation_amount, dec!(5000));
        assert_eq!(result.accounting_treatment, AccountingTreatment::Compensation);
        assert_eq!(result.treatment_label, "Compensation Cost");
        assert_eq!(result.journal_entries[0].account, APIC);
        assert_eq!(result.journal_entries[0].amount, dec!(10000));
        assert_eq!(result.journal_entries[1].account, COMPENSATION_COST);
        assert_eq!(result.journal_entries[2].amount, dec!(15000));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_significant_holder_is_compensation() {
        let input = TransactionInput {
            economic_interest: Some(EconomicInterest::Significant),
            ..employee_sale(BuyerType::EconomicHolder)
        };
        let result = evaluate(&input);

        assert!(result.is_compensatory);
        assert_eq!(result.journal_entries.len(), 2);
        assert_eq!(result.journal_entries[1].account, APIC_CONTRIBUTION);
        assert_eq!(result.journal_entries[1].amount, dec!(5000));
    }

    #[test]
    fn test_unspecified_interest_keeps_presumption() {
        let result = evaluate(&employee_sale(BuyerType::RelatedParty));
        assert_eq!(result.accounting_treatment, AccountingTreatment::Compensation);
        assert!(result.reasoning[3].conclusion.contains("not documented as de minimis"));
    }

    #[test]
    fn test_de_minimis_holder_depends_on_facilitation() {
        let base = TransactionInput {
            economic_interest: Some(EconomicInterest::DeMinimis),
            ..employee_sale(BuyerType::RelatedParty)
        };

        let overcome = evaluate(&base);
        assert_eq!(overcome.accounting_treatment, AccountingTreatment::NonCompensatory);
        assert!(overcome.journal_entries.is_empty());
        assert_eq!(overcome.reasoning.len(), 5);

        let facilitated = evaluate(&TransactionInput {
            entity_involvement: Some(EntityInvolvement::Facilitated),
            ..base
        });
        assert!(facilitated.is_compensatory);
        assert_eq!(facilitated.compensation_amount, dec!(5000));
        assert_eq!(facilitated.journal_entries.len(), 2);
    }

    #[test]
    fn test_new_investor_branches() {
        let with = |involvement| {
            evaluate(&TransactionInput {
                entity_involvement: involvement,
                ..employee_sale(BuyerType::NewInvestor)
            })
        };

        assert_eq!(
            with(Some(EntityInvolvement::Facilitated)).accounting_treatment,
            AccountingTreatment::Compensation
        );
        assert_eq!(
            with(Some(EntityInvolvement::Minimal)).accounting_treatment,
            AccountingTreatment::NonCompensatory
        );

        let unset = with(None);
        assert_eq!(unset.accounting_treatment, AccountingTreatment::NonCompensatory);
        assert!(unset.journal_entries.is_empty());
        assert!(!unset.is_compensatory);
    }

    #[test]
    fn test_no_excess_stops_employee_branch() {
        for buyer in BuyerType::ALL {
            let input = TransactionInput::new(SellerType::Founder, *buyer, dec!(10), dec!(10), 1000);
            let result = evaluate(&input);

            assert_eq!(result.accounting_treatment, AccountingTreatment::NoExcess);
            assert!(!result.is_compensatory);
            assert!(result.journal_entries.is_empty());
            assert_eq!(
                points(&result),
                vec![DecisionPoint::SellerType, DecisionPoint::PriceVsFairValue]
            );
        }
    }

    #[test]
    fn test_zero_shares_is_no_excess() {
        let input = TransactionInput::new(SellerType::Executive, BuyerType::Entity, dec!(15), dec!(10), 0);
        let result = evaluate(&input);

        assert_eq!(result.excess_per_share, dec!(5));
        assert_eq!(result.accounting_treatment, AccountingTreatment::NoExcess);
        assert!(!result.is_compensatory);
    }

    #[test]
    fn test_pattern_reclassification() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(3),
            has_pattern: Some(YesNo::Yes),
            previously_cost: dec!(4),
            ..employee_sale(BuyerType::Entity)
        };
        let result = evaluate(&input);

        assert!(result.is_immature);
        assert!(result.requires_reclassification);
        assert_eq!(result.reclassification_reason, PATTERN_REASON);
        assert_eq!(result.treatment_label, "Compensation Cost + Liability Reclassification");
        assert_eq!(result.accounting_treatment, AccountingTreatment::Compensation);

        let reclass: Vec<&JournalEntry> = result
            .journal_entries
            .iter()
            .filter(|e| e.section.as_deref() == Some(RECLASSIFICATION_SECTION))
            .collect();
        assert_eq!(reclass.len(), 3);
        assert_eq!(reclass[0].amount, dec!(11000));
        assert_eq!(reclass[1].amount, dec!(4000));
        assert_eq!(reclass[2].amount, dec!(15000));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_reclassification_caps_equity_reversal() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(1),
            has_pattern: Some(YesNo::Yes),
            previously_cost: dec!(20),
            ..employee_sale(BuyerType::NewInvestor)
        };
        let result = evaluate(&input);

        let amounts: Vec<Decimal> = result.journal_entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Decimal::ZERO, dec!(15000), dec!(15000)]);
        assert!(result.is_balanced());
    }

    #[test]
    fn test_contingent_event_reclassifies_without_entries() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(5.9),
            contingent_event: Some(ContingentEvent::Probable),
            ..TransactionInput::new(SellerType::FormerEmployee, BuyerType::Entity, dec!(10), dec!(10), 500)
        };
        let result = evaluate(&input);

        assert_eq!(result.accounting_treatment, AccountingTreatment::NoExcess);
        assert!(result.requires_reclassification);
        assert_eq!(result.reclassification_reason, CONTINGENT_REASON);
        assert!(result.journal_entries.is_empty());
        assert_eq!(result.treatment_label, "No Excess Consideration");
    }

    #[test]
    fn test_inducement_exception_wins() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(3),
            is_short_term_inducement: Some(YesNo::Yes),
            has_pattern: Some(YesNo::Yes),
            contingent_event: Some(ContingentEvent::Probable),
            ..employee_sale(BuyerType::Entity)
        };
        let result = evaluate(&input);

        assert!(result.is_immature);
        assert!(!result.requires_reclassification);
        assert!(result.reclassification_reason.is_empty());
        assert_eq!(result.journal_entries.len(), 3);
    }

    #[test]
    fn test_overlay_requires_immature_status_and_short_holding() {
        let six_months = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(6),
            has_pattern: Some(YesNo::Yes),
            ..employee_sale(BuyerType::Entity)
        };
        assert!(!evaluate(&six_months).is_immature);

        let status_unknown = TransactionInput {
            share_status: None,
            months_held: dec!(1),
            has_pattern: Some(YesNo::Yes),
            ..employee_sale(BuyerType::Entity)
        };
        let result = evaluate(&status_unknown);
        assert!(!result.is_immature);
        assert_eq!(result.reasoning.len(), 3);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(3),
            has_pattern: Some(YesNo::Yes),
            previously_cost: dec!(4),
            economic_interest: Some(EconomicInterest::DeMinimis),
            entity_involvement: Some(EntityInvolvement::Facilitated),
            ..employee_sale(BuyerType::EconomicHolder)
        };

        assert_eq!(evaluate(&input), evaluate(&input));
    }

    #[test]
    fn test_unrepresentable_totals_saturate() {
        let input = TransactionInput {
            share_status: Some(ShareStatus::Immature),
            months_held: dec!(1),
            has_pattern: Some(YesNo::Yes),
            previously_cost: dec!(100000000000000000000),
            ..TransactionInput::new(
                SellerType::CurrentEmployee,
                BuyerType::Entity,
                dec!(100000000000000000000),
                Decimal::ZERO,
                1_000_000_000,
            )
        };
        assert!(input.validate().is_err());

        let result = evaluate(&input);
        assert!(result.is_compensatory);
        assert_eq!(result.compensation_amount, Decimal::MAX);
        assert_eq!(result.total_transaction_value, Decimal::MAX);
        assert!(result.is_balanced());
    }

    #[test]
    fn test_summary_line() {
        let result = evaluate(&employee_sale(BuyerType::Entity));
        let summary = result.summary();

        assert!(summary.starts_with("Compensation Cost: excess $5.00/share, compensation $5000.00"));
        assert!(summary.ends_with("3 journal entries"));
    }
}
