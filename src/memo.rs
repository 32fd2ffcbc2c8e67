// 📄 Memo Formatter - narrative memorandum over an AnalysisResult
//
// Template instantiation only: every figure comes from the input or the result,
// nothing is recomputed here. Rounding to cents happens in `money`.

use crate::analysis::{AccountingTreatment, AnalysisResult};
use crate::error::AnalysisError;
use crate::input::{ShareStatus, TransactionInput};
use crate::money::{format_count, format_currency, format_plain};
use anyhow::{Context as AnyhowContext, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const RULE_WIDTH: usize = 72;
const LABEL_WIDTH: usize = 48;
const AMOUNT_WIDTH: usize = 18;

pub const NO_ENTRIES_TEXT: &str = "No journal entries required for this transaction.";

/// Citations printed for every memo, in order
const CITATIONS: [&str; 3] = [
    "ASC 718-10-15-4: Share-based payments awarded by related parties and economic interest holders",
    "ASC 718-20-35-7: Repurchase or cancellation of equity instruments",
    "ASC 505-30: Treasury stock and distributions to shareholders",
];

/// Only cited when the seller provides services to the Company
const MATURITY_CITATION: &str = "ASC 718-10-25-9: Repurchase features and immature shares";

// ============================================================================
// SETTINGS
// ============================================================================

/// Header fields and placeholders. Everything else in the memo is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoSettings {
    pub to: String,
    pub from: String,
    pub company_placeholder: String,
    pub date_placeholder: String,
}

impl Default for MemoSettings {
    fn default() -> Self {
        MemoSettings {
            to: "Accounting Policy File".to_string(),
            from: "Technical Accounting".to_string(),
            company_placeholder: "[Company Name]".to_string(),
            date_placeholder: "[Transaction Date]".to_string(),
        }
    }
}

impl MemoSettings {
    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read memo settings: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse memo settings JSON")
    }
}

// ============================================================================
// FORMATTER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoFormatter {
    settings: MemoSettings,
}

impl MemoFormatter {
    pub fn new(settings: MemoSettings) -> Self {
        MemoFormatter { settings }
    }

    /// Memo for a transaction that may not have been analyzed yet
    pub fn try_format(
        &self,
        input: &TransactionInput,
        result: Option<&AnalysisResult>,
    ) -> std::result::Result<String, AnalysisError> {
        result
            .map(|result| self.format(input, result))
            .ok_or(AnalysisError::NotAnalyzed)
    }

    pub fn format(&self, input: &TransactionInput, result: &AnalysisResult) -> String {
        let company = self.company(input);
        let mut memo = Memo::default();

        self.header(&mut memo, input, &company);
        background(&mut memo, input, result, &company);
        price_section(&mut memo, input, result);
        analysis_section(&mut memo, input, result);
        assessment_section(&mut memo, input, result, &company);
        if result.requires_reclassification {
            reclassification_section(&mut memo, input, result);
        }
        journal_section(&mut memo, result);
        conclusion_section(&mut memo, result, &company);
        citation_section(&mut memo, input);

        debug!(lines = memo.lines.len(), "memo formatted");
        memo.finish()
    }

    fn company(&self, input: &TransactionInput) -> String {
        non_empty(&input.company_name)
            .unwrap_or(self.settings.company_placeholder.as_str())
            .to_string()
    }

    fn header(&self, memo: &mut Memo, input: &TransactionInput, company: &str) {
        let date = non_empty(&input.transaction_date)
            .map(display_date)
            .unwrap_or_else(|| self.settings.date_placeholder.clone());

        memo.line("MEMORANDUM");
        memo.rule();
        memo.blank();
        memo.line(format!("TO:       {}", self.settings.to));
        memo.line(format!("FROM:     {}", self.settings.from));
        memo.line(format!("DATE:     {}", date));
        memo.line(format!(
            "RE:       ASC 718 Analysis of Secondary Market Transaction - {}",
            company
        ));
        memo.blank();
        memo.rule();
    }
}

/// Memo with default settings
pub fn format(input: &TransactionInput, result: &AnalysisResult) -> String {
    MemoFormatter::default().format(input, result)
}

/// `Secondary_Market_Transaction_Memo_<date or "draft">.txt`
pub fn memo_filename(input: &TransactionInput) -> String {
    let stamp = non_empty(&input.transaction_date)
        .map(|date| date.replace(['/', '\\'], "-"))
        .unwrap_or_else(|| "draft".to_string());

    format!("Secondary_Market_Transaction_Memo_{}.txt", stamp)
}

// ============================================================================
// SECTIONS
// ============================================================================

fn background(memo: &mut Memo, input: &TransactionInput, result: &AnalysisResult, company: &str) {
    memo.heading("BACKGROUND");

    let date = non_empty(&input.transaction_date)
        .map(display_date)
        .unwrap_or_else(|| "the transaction date".to_string());

    let mut paragraph = format!(
        "On {}, {} of {} sold {} shares of common stock to {} at {} per share, for total \
         consideration of {}. The fair value of the common stock on that date was {} per share.",
        date,
        input.seller_type.with_article(),
        company,
        format_count(input.number_of_shares),
        input.buyer_type.with_article(),
        format_currency(input.transaction_price),
        format_currency(result.total_transaction_value),
        format_currency(input.fair_value)
    );

    if input.seller_type.is_investor() {
        paragraph.push_str(
            " The seller holds the shares as an investment and does not provide services to the \
             Company.",
        );
    } else {
        paragraph.push_str(&format!(
            " Because the seller provides services to {}, the transaction must be evaluated under \
             ASC 718 to determine whether any portion of the price represents compensation.",
            company
        ));
        if let Some(status) = input.share_status {
            paragraph.push_str(&format!(
                " The shares are {} and were held {} months after vesting or exercise.",
                match status {
                    ShareStatus::Mature => "mature",
                    ShareStatus::Immature => "immature",
                },
                format_plain(input.months_held)
            ));
        }
    }

    memo.line(paragraph);
}

fn price_section(memo: &mut Memo, input: &TransactionInput, result: &AnalysisResult) {
    memo.heading("PRICE VERSUS FAIR VALUE");

    if result.total_excess > Decimal::ZERO {
        memo.line(format!(
            "The transaction price of {} per share exceeds the fair value of {} per share by {} \
             per share, resulting in total excess consideration of {}.",
            format_currency(input.transaction_price),
            format_currency(input.fair_value),
            format_currency(result.excess_per_share),
            format_currency(result.total_excess)
        ));
    } else if result.excess_per_share > Decimal::ZERO {
        memo.line(format!(
            "The transaction price of {} per share exceeds the fair value of {} per share, but no \
             shares were transferred. No excess consideration was paid.",
            format_currency(input.transaction_price),
            format_currency(input.fair_value)
        ));
    } else {
        memo.line(format!(
            "The transaction price of {} per share does not exceed the fair value of {} per share. \
             No excess consideration was paid.",
            format_currency(input.transaction_price),
            format_currency(input.fair_value)
        ));
    }
}

fn analysis_section(memo: &mut Memo, input: &TransactionInput, result: &AnalysisResult) {
    memo.heading("ANALYSIS");

    if input.seller_type.is_investor() {
        memo.line(
            "Because the seller is an investor and not an employee or other service provider, \
             the transaction is outside the scope of ASC 718 and no compensation cost arises.",
        );
        memo.blank();

        let treatment = match result.accounting_treatment {
            AccountingTreatment::Distribution => format!(
                "The Company repurchased the shares at a price above fair value. The excess of {} \
                 is accounted for as a distribution to the selling shareholder, charged to \
                 retained earnings, and the shares are recorded in treasury stock at fair value.",
                format_currency(result.total_excess)
            ),
            AccountingTreatment::CapitalTransaction => format!(
                "The shares were sold to {}. The transfer is a capital transaction between \
                 shareholders; the Company is not a party to it and records no entry.",
                input.buyer_type.with_article()
            ),
            _ => "The shares were sold at or below fair value, so the transaction has no \
                  accounting impact for the Company."
                .to_string(),
        };
        memo.line(treatment);
        return;
    }

    memo.line("The transaction was evaluated against the ASC 718 decision framework in the following order:");
    memo.blank();
    for step in &result.reasoning {
        let marker = if step.alert { "!" } else { "•" };
        memo.line(format!("  {} {}: {}", marker, step.label(), step.conclusion));
    }
}

fn assessment_section(
    memo: &mut Memo,
    input: &TransactionInput,
    result: &AnalysisResult,
    company: &str,
) {
    memo.heading("COMPENSATION ASSESSMENT");

    if result.is_compensatory {
        memo.line(format!(
            "The transaction is COMPENSATORY. {} should recognize compensation cost of {}, equal \
             to the excess of the transaction price over fair value ({} per share).",
            company,
            format_currency(result.compensation_amount),
            format_currency(result.excess_per_share)
        ));
    } else if input.seller_type.is_investor() {
        memo.line(
            "The transaction is NOT COMPENSATORY. The seller is not a service provider, so no \
             compensation cost is recognized under ASC 718.",
        );
    } else {
        memo.line(
            "The transaction is NOT COMPENSATORY. No compensation cost is recognized under ASC 718.",
        );
    }

    memo.blank();
    memo.line(format!("Accounting treatment: {}", result.treatment_label));
}

fn reclassification_section(memo: &mut Memo, input: &TransactionInput, result: &AnalysisResult) {
    memo.heading("LIABILITY RECLASSIFICATION");

    memo.line(format!(
        "The shares are immature: they were held {} months after vesting or exercise, less than \
         the six months required to avoid liability classification. {}. The award must be \
         reclassified from equity to a liability and remeasured at fair value at each reporting \
         date until settlement (ASC 718-10-25-9).",
        format_plain(input.months_held),
        result.reclassification_reason
    ));

    if result.journal_entries.iter().any(|e| e.section.is_some()) {
        memo.blank();
        memo.line(format!(
            "The reclassification entry below records the liability at the repurchase amount of {}.",
            format_currency(result.total_transaction_value)
        ));
    }
}

fn journal_section(memo: &mut Memo, result: &AnalysisResult) {
    memo.heading("JOURNAL ENTRIES");

    let groups = result.entry_groups();
    if groups.is_empty() {
        memo.line(NO_ENTRIES_TEXT);
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            memo.blank();
        }
        if let Some(section) = group.section {
            memo.line(format!("{}:", section));
        }
        for entry in &group.entries {
            memo.line(entry_line(&entry.label(), entry.amount));
        }
    }
}

fn conclusion_section(memo: &mut Memo, result: &AnalysisResult, company: &str) {
    memo.heading("CONCLUSION");

    let mut conclusion = if result.is_compensatory {
        format!(
            "Based on the analysis above, {} will recognize compensation cost of {} in the period \
             in which the transaction occurred.",
            company,
            format_currency(result.compensation_amount)
        )
    } else if result.accounting_treatment == AccountingTreatment::Distribution {
        format!(
            "Based on the analysis above, {} will account for the excess of {} as a distribution \
             to the selling shareholder. No compensation cost is recognized.",
            company,
            format_currency(result.total_excess)
        )
    } else {
        format!(
            "Based on the analysis above, the transaction has no impact on {}'s compensation cost.",
            company
        )
    };

    if result.requires_reclassification {
        conclusion.push_str(" The award is reclassified as a liability as described above.");
    }

    memo.line(conclusion);
}

fn citation_section(memo: &mut Memo, input: &TransactionInput) {
    memo.heading("AUTHORITATIVE GUIDANCE");

    for citation in CITATIONS {
        memo.line(format!("  - {}", citation));
    }
    if !input.seller_type.is_investor() {
        memo.line(format!("  - {}", MATURITY_CITATION));
    }
}

// ============================================================================
// HELPERS
// ============================================================================

#[derive(Debug, Default)]
struct Memo {
    lines: Vec<String>,
}

impl Memo {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn rule(&mut self) {
        self.lines.push("=".repeat(RULE_WIDTH));
    }

    fn heading(&mut self, title: &str) {
        self.blank();
        self.lines.push(title.to_string());
        self.lines.push("-".repeat(title.chars().count()));
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Account label left-aligned, amount right-aligned; credits indented
fn entry_line(label: &str, amount: Decimal) -> String {
    let indent = if label.starts_with("Cr ") { "      " } else { "  " };
    let label = format!("{}{}", indent, label);
    format!(
        "{:<label_width$}{:>amount_width$}",
        label,
        format_currency(amount),
        label_width = LABEL_WIDTH,
        amount_width = AMOUNT_WIDTH
    )
}

fn non_empty(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// ISO dates render long-form ("January 5, 2025"); anything else verbatim
fn display_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
