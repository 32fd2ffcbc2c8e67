// Secondary Market Analysis - Core Library
// ASC 718 classification of secondary-market share transactions.
// Exposes all modules for use in CLI, TUI, API server, and tests.

pub mod input;     // Transaction input + form parsing
pub mod analysis;  // Analysis result data contract
pub mod engine;    // Rule engine (decision tree)
pub mod memo;      // Memo formatter
pub mod money;     // Display formatting for amounts
pub mod export;    // Memo / journal CSV files
pub mod error;

#[cfg(feature = "server")]
pub mod api;       // REST API (axum)

// Re-export commonly used types
pub use input::{
    TransactionInput, RawTransactionInput, ParseMode, FormValue,
    SellerType, BuyerType, EconomicInterest, EntityInvolvement, ShareStatus, YesNo, ContingentEvent,
};
pub use analysis::{
    AnalysisResult, AccountingTreatment, ReasoningStep, DecisionPoint,
    JournalEntry, EntrySide, EntryGroup,
};
pub use engine::evaluate;
pub use memo::{format as format_memo, memo_filename, MemoFormatter, MemoSettings};
pub use export::{write_memo, write_journal_csv, write_journal_csv_file};
pub use error::{InputError, AnalysisError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a submitted form and evaluate it
pub fn analyze_form(
    raw: &RawTransactionInput,
    mode: ParseMode,
) -> Result<(TransactionInput, AnalysisResult), InputError> {
    let input = raw.parse(mode)?;
    let result = evaluate(&input);
    Ok((input, result))
}
