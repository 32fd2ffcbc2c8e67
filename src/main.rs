// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use secondary_market::money::{format_count, format_currency};
use secondary_market::{
    evaluate, write_journal_csv_file, write_memo, AnalysisResult, MemoFormatter, MemoSettings,
    ParseMode, RawTransactionInput, TransactionInput,
};

#[derive(Parser, Debug)]
#[command(name = "secondary-market")]
#[command(about = "ASC 718 analysis of secondary-market share transactions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Memo header settings (JSON)
    #[arg(long, global = true, env = "SMA_MEMO_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a transaction described in a JSON file
    Analyze(AnalyzeArgs),
    /// Print an example transaction JSON to start from
    Template,
    /// Interactive terminal UI (default)
    Tui {
        /// Directory memos are saved into
        #[arg(long, default_value = ".")]
        memo_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Transaction JSON (typed values, or form strings with --lenient)
    file: PathBuf,

    /// Print the analysis result as JSON
    #[arg(long)]
    json: bool,

    /// Print the full memo
    #[arg(long)]
    memo: bool,

    /// Save the memo into this directory
    #[arg(long, value_name = "DIR")]
    save_memo: Option<PathBuf>,

    /// Export journal entries as CSV
    #[arg(long, value_name = "PATH")]
    entries_csv: Option<PathBuf>,

    /// Read the file as form strings; malformed numbers become zero
    #[arg(long)]
    lenient: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("secondary_market=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let formatter = load_formatter(cli.settings.as_ref())?;

    match cli.command {
        Some(Command::Analyze(args)) => run_analyze(&args, &formatter)?,
        Some(Command::Template) => run_template()?,
        Some(Command::Tui { memo_dir }) => run_ui_mode(formatter, memo_dir)?,
        None => run_ui_mode(formatter, PathBuf::from("."))?,
    }

    Ok(())
}

fn load_formatter(path: Option<&PathBuf>) -> Result<MemoFormatter> {
    let settings = match path {
        Some(path) => MemoSettings::from_file(path)?,
        None => MemoSettings::default(),
    };
    Ok(MemoFormatter::new(settings))
}

fn load_input(args: &AnalyzeArgs) -> Result<TransactionInput> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read transaction file: {:?}", args.file))?;

    if args.lenient {
        let raw: RawTransactionInput =
            serde_json::from_str(&content).context("Failed to parse transaction form JSON")?;
        return Ok(raw.parse(ParseMode::Lenient)?);
    }

    let input: TransactionInput =
        serde_json::from_str(&content).context("Failed to parse transaction JSON")?;
    input.validate()?;
    Ok(input)
}

fn run_analyze(args: &AnalyzeArgs, formatter: &MemoFormatter) -> Result<()> {
    let input = load_input(args)?;
    let result = evaluate(&input);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if args.memo {
        println!("{}", formatter.format(&input, &result));
    } else {
        print_report(&input, &result);
    }

    if let Some(dir) = &args.save_memo {
        let path = write_memo(dir, &input, &formatter.format(&input, &result))?;
        eprintln!("💾 Memo saved: {}", path.display());
    }

    if let Some(path) = &args.entries_csv {
        write_journal_csv_file(path, &result)?;
        eprintln!("📄 Journal entries exported: {}", path.display());
    }

    Ok(())
}

fn print_report(input: &TransactionInput, result: &AnalysisResult) {
    println!("📊 Secondary Market Transaction Analysis");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "   {} shares at {} (fair value {})",
        format_count(input.number_of_shares),
        format_currency(input.transaction_price),
        format_currency(input.fair_value)
    );

    let verdict = if result.is_compensatory { "⚠️ " } else { "✅" };
    println!("\n{} {}", verdict, result.summary());
    println!("   Compensation: {}", format_currency(result.compensation_amount));
    println!("   Total excess: {}", format_currency(result.total_excess));

    println!("\n🧭 Reasoning");
    for (i, step) in result.reasoning.iter().enumerate() {
        let marker = if step.alert { "!" } else { " " };
        println!("  {}{}. {}: {}", marker, i + 1, step.label(), step.conclusion);
    }

    if result.journal_entries.is_empty() {
        println!("\n📒 No journal entries required");
    } else {
        println!("\n📒 Journal Entries");
        for group in result.entry_groups() {
            if let Some(section) = group.section {
                println!("   [{}]", section);
            }
            for entry in group.entries {
                println!("   {:<48}{:>18}", entry.label(), format_currency(entry.amount));
            }
        }
    }

    if result.requires_reclassification {
        println!("\n🔁 Liability reclassification: {}", result.reclassification_reason);
    }
}

fn run_template() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&TransactionInput::sample())?);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(formatter: MemoFormatter, memo_dir: PathBuf) -> Result<()> {
    println!("🖥️  Loading Secondary Market Analysis UI...\n");

    let mut app = ui::App::new(formatter, memo_dir);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_formatter: MemoFormatter, _memo_dir: PathBuf) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: secondary-market analyze <FILE>");
    std::process::exit(1);
}
