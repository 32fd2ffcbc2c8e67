// 💾 Export - memo text files and journal-entry CSV
// The core never decides where files go; callers pass a directory or path.

use crate::analysis::AnalysisResult;
use crate::input::TransactionInput;
use crate::memo::memo_filename;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One CSV row per journal entry
#[derive(Debug, Serialize)]
struct JournalRow<'a> {
    section: &'a str,
    side: &'static str,
    account: &'a str,
    amount: Decimal,
}

/// Write the memo as UTF-8 text into `dir`, named after the transaction date
pub fn write_memo<P: AsRef<Path>>(dir: P, input: &TransactionInput, memo: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;

    let path = dir.join(memo_filename(input));
    fs::write(&path, memo).with_context(|| format!("Failed to write memo: {:?}", path))?;

    info!(path = %path.display(), bytes = memo.len(), "memo written");
    Ok(path)
}

/// Serialize journal entries as `section,side,account,amount`
pub fn write_journal_csv<W: Write>(writer: W, result: &AnalysisResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in &result.journal_entries {
        csv_writer
            .serialize(JournalRow {
                section: entry.section.as_deref().unwrap_or(""),
                side: entry.side.prefix(),
                account: &entry.account,
                amount: entry.amount,
            })
            .context("Failed to serialize journal entry")?;
    }

    csv_writer.flush().context("Failed to flush journal CSV")?;
    Ok(())
}

pub fn write_journal_csv_file<P: AsRef<Path>>(path: P, result: &AnalysisResult) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    write_journal_csv(file, result)?;

    info!(path = %path.display(), entries = result.journal_entries.len(), "journal entries exported");
    Ok(())
}
