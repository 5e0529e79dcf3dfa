//! Command-line probe for the workbook core.
//!
//! # Responsibility
//! - Report the linked core version.
//! - Fetch a passage through the production fallback chain and print it.

use bible_study_core::{
    core_version, default_log_level, init_logging, LanguageVariant, Passage, PassageFetcher,
    ScriptureConfig,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bible-study", version, about = "Bible-study workbook core tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core crate version.
    Version,
    /// Fetch a passage and print one `chapter:verse text` line per verse.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// English book name, e.g. "John" or "1 Corinthians".
    #[arg(long)]
    book: String,
    #[arg(long)]
    chapter: u32,
    /// Last chapter; defaults to `--chapter`.
    #[arg(long)]
    chapter_end: Option<u32>,
    #[arg(long)]
    verse_start: Option<u32>,
    #[arg(long)]
    verse_end: Option<u32>,
    /// Language variant: en, zh-hans or zh-hant.
    #[arg(long, default_value = "en")]
    lang: String,
    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Version => {
            println!("bible_study_core version={}", core_version());
            ExitCode::SUCCESS
        }
        Command::Fetch(args) => match run_fetch(args).await {
            Ok(code) => code,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::from(2)
            }
        },
    }
}

async fn run_fetch(args: FetchArgs) -> Result<ExitCode, String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        init_logging(default_log_level(), log_dir)?;
    }

    let lang = LanguageVariant::parse(&args.lang)
        .ok_or_else(|| format!("unsupported language `{}`", args.lang))?;
    let passage = Passage::new(
        args.book,
        args.chapter,
        args.chapter_end.unwrap_or(args.chapter),
        args.verse_start,
        args.verse_end,
    )
    .map_err(|err| err.to_string())?;

    let fetcher =
        PassageFetcher::from_config(&ScriptureConfig::default()).map_err(|err| err.to_string())?;
    let outcome = fetcher.fetch_with_report(&passage, lang).await;
    if outcome.verses.is_empty() {
        eprintln!("no provider returned {}", passage.label(lang));
        return Ok(ExitCode::FAILURE);
    }

    info!(
        "event=cli_fetch module=cli status=ok verse_count={} failed_attempts={}",
        outcome.verses.len(),
        outcome.failed_attempts
    );
    for verse in &outcome.verses {
        println!("{} {}", verse.reference(), verse.text);
    }
    Ok(ExitCode::SUCCESS)
}
