// ⚖️ Analysis Result - what the rule engine concludes
// Verdict, derived amounts, the reasoning trail and the illustrative journal entries.
//
// Produced once per evaluation and never modified afterwards. Reasoning steps and
// journal entries appear in the order the rules were evaluated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNTING TREATMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingTreatment {
    /// Entity repurchased from an investor above fair value
    Distribution,
    /// Investor-to-investor trade, nothing for the entity to record
    CapitalTransaction,
    /// Investor sold at or below fair value
    NoImpact,
    /// Excess over fair value is compensation cost
    Compensation,
    NonCompensatory,
    /// Service provider sold at or below fair value
    NoExcess,
}

impl AccountingTreatment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountingTreatment::Distribution => "distribution",
            AccountingTreatment::CapitalTransaction => "capital_transaction",
            AccountingTreatment::NoImpact => "no_impact",
            AccountingTreatment::Compensation => "compensation",
            AccountingTreatment::NonCompensatory => "non_compensatory",
            AccountingTreatment::NoExcess => "no_excess",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountingTreatment::Distribution => "Distribution to Shareholder",
            AccountingTreatment::CapitalTransaction => "Capital Transaction",
            AccountingTreatment::NoImpact => "No Accounting Impact",
            AccountingTreatment::Compensation => "Compensation Cost",
            AccountingTreatment::NonCompensatory => "Non-Compensatory",
            AccountingTreatment::NoExcess => "No Excess Consideration",
        }
    }
}

// ============================================================================
// REASONING TRAIL
// ============================================================================

/// The question asked at each node of the decision tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPoint {
    SellerType,
    PriceVsFairValue,
    BuyerType,
    EconomicInterest,
    EntityInvolvement,
    ShareMaturity,
    RepurchaseFeature,
}

impl DecisionPoint {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionPoint::SellerType => "Seller Type",
            DecisionPoint::PriceVsFairValue => "Price vs. Fair Value",
            DecisionPoint::BuyerType => "Buyer Type",
            DecisionPoint::EconomicInterest => "Economic Interest",
            DecisionPoint::EntityInvolvement => "Entity Involvement",
            DecisionPoint::ShareMaturity => "Share Maturity",
            DecisionPoint::RepurchaseFeature => "Repurchase Feature",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStep {
    pub point: DecisionPoint,
    pub conclusion: String,
    /// Conclusion needs the reader's attention (compensation, liability)
    pub alert: bool,
}

impl ReasoningStep {
    pub fn label(&self) -> &'static str {
        self.point.label()
    }
}

// ============================================================================
// JOURNAL ENTRIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    Debit,
    Credit,
}

impl EntrySide {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntrySide::Debit => "Dr",
            EntrySide::Credit => "Cr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Heading for a group of entries (e.g. "Reclassification Entry")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub side: EntrySide,
    pub account: String,
    pub amount: Decimal,
}

impl JournalEntry {
    pub fn debit(account: &str, amount: Decimal) -> Self {
        JournalEntry {
            section: None,
            side: EntrySide::Debit,
            account: account.to_string(),
            amount,
        }
    }

    pub fn credit(account: &str, amount: Decimal) -> Self {
        JournalEntry {
            section: None,
            side: EntrySide::Credit,
            account: account.to_string(),
            amount,
        }
    }

    pub fn in_section(mut self, section: &str) -> Self {
        self.section = Some(section.to_string());
        self
    }

    /// "Dr Compensation Cost"
    pub fn label(&self) -> String {
        format!("{} {}", self.side.prefix(), self.account)
    }
}

/// Consecutive entries sharing the same section label
#[derive(Debug, Clone, PartialEq)]
pub struct EntryGroup<'a> {
    pub section: Option<&'a str>,
    pub entries: Vec<&'a JournalEntry>,
}

impl EntryGroup<'_> {
    pub fn total(&self, side: EntrySide) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.side == side)
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount))
    }

    pub fn is_balanced(&self) -> bool {
        self.total(EntrySide::Debit) == self.total(EntrySide::Credit)
    }
}

// ============================================================================
// ANALYSIS RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_compensatory: bool,

    /// Compensation cost to recognize (zero unless compensatory)
    pub compensation_amount: Decimal,

    /// max(0, price - fair value)
    pub excess_per_share: Decimal,

    /// excess per share x shares
    pub total_excess: Decimal,

    /// price x shares
    pub total_transaction_value: Decimal,

    pub accounting_treatment: AccountingTreatment,

    /// Treatment label including any overlay suffix
    pub treatment_label: String,

    pub reasoning: Vec<ReasoningStep>,

    pub requires_reclassification: bool,

    /// Empty unless `requires_reclassification`
    #[serde(default)]
    pub reclassification_reason: String,

    pub journal_entries: Vec<JournalEntry>,

    pub is_immature: bool,
}

impl AnalysisResult {
    /// Group journal entries by section, preserving derivation order
    pub fn entry_groups(&self) -> Vec<EntryGroup<'_>> {
        let mut groups: Vec<EntryGroup<'_>> = Vec::new();

        for entry in &self.journal_entries {
            let section = entry.section.as_deref();
            match groups.last_mut() {
                Some(group) if group.section == section => group.entries.push(entry),
                _ => groups.push(EntryGroup {
                    section,
                    entries: vec![entry],
                }),
            }
        }

        groups
    }

    /// Every entry group has equal debits and credits
    pub fn is_balanced(&self) -> bool {
        self.entry_groups().iter().all(|group| group.is_balanced())
    }

    /// Decision points visited, in evaluation order
    pub fn visited(&self) -> Vec<DecisionPoint> {
        self.reasoning.iter().map(|step| step.point).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: excess ${:.2}/share, compensation ${:.2}, {} reasoning steps, {} journal entries",
            self.treatment_label,
            self.excess_per_share,
            self.compensation_amount,
            self.reasoning.len(),
            self.journal_entries.len()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
