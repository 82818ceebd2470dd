//! ddc - index and audit a corpus of scanned newspaper pages.
//!
//! Usage:
//!   ddc scan [PATH]           Corpus summary, newspapers and years
//!   ddc libraries [PATH]      Holdings by library
//!   ddc completeness [PATH]   Issues with missing or duplicate pages
//!   ddc missing [PATH]        Cadence and missing-issue estimates
//!   ddc validate [PATH]       Check filenames against the convention
//!   ddc export [PATH]         Export the full report to JSON
//!   ddc name CODE DATE PAGE LIB   Build a canonical filename
//!   ddc --help                Show help

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ddcorpus_analyze::{
    CompletenessChecker, CorpusReport, GapConfig, IssueGap, MissingIssueAnalyzer,
};
use ddcorpus_core::{
    CorpusSnapshot, ImageExtension, IssueDate, LibraryCode, NewspaperCode, PageRecord,
    ReferenceTables, encode,
};
use ddcorpus_scan::{CorpusScanner, ScanConfig, validate_directory};

#[derive(Parser)]
#[command(
    name = "ddc",
    version,
    about = "Index and audit a corpus of scanned newspaper pages",
    long_about = "ddc indexes page images named CODE_YYYY_MM_DD_PPP_LIB[_SHELFMARK].ext \
                  and reports on what the collection holds: issues with missing or \
                  duplicate pages, publication cadence, and issues likely missing \
                  altogether."
)]
struct Cli {
    /// Reference tables (TOML) to use instead of the built-in ones
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Where and how to walk the corpus.
#[derive(Args)]
struct CorpusArgs {
    /// Corpus root directory
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Maximum directory depth to descend
    #[arg(long)]
    max_depth: Option<u32>,

    /// Skip entries whose name matches this glob (repeatable)
    #[arg(short, long = "ignore")]
    ignore: Vec<String>,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Threads used for decoding filenames (0 = all cores)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the corpus and show a summary
    Scan {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Also show pages per month
        #[arg(long)]
        monthly: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what each holding library contributes
    Libraries {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Break holdings down by year
        #[arg(long)]
        by_year: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find issues with missing or duplicate pages
    Completeness {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Maximum number of problem issues to list
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Estimate cadence and missing issues per newspaper
    Missing {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Report coverage gaps longer than this many days
        #[arg(long, default_value = "60")]
        gap_days: i64,

        /// Maximum number of gaps to list per newspaper
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check every page filename against the naming convention
    Validate {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Suggest corrected filenames where possible
        #[arg(short, long)]
        suggest: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export the full corpus report to JSON
    Export {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Coverage gap threshold in days
        #[arg(long, default_value = "60")]
        gap_days: i64,
    },

    /// Build a canonical page filename from its fields
    Name {
        /// Newspaper code, e.g. TID
        newspaper: NewspaperCode,

        /// Issue date, YYYY-MM-DD
        date: IssueDate,

        /// Page number, 1-999
        page: u16,

        /// Holding library code, e.g. SB
        library: LibraryCode,

        /// Archival shelfmark
        #[arg(long)]
        shelfmark: Option<String>,

        /// File extension
        #[arg(long, default_value = "jpg")]
        ext: ImageExtension,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let tables = load_tables(cli.tables.as_deref())?;

    match cli.command {
        Command::Scan {
            corpus,
            monthly,
            format,
        } => run_scan(&corpus, &tables, monthly, format)?,
        Command::Libraries {
            corpus,
            by_year,
            format,
        } => run_libraries(&corpus, &tables, by_year, format)?,
        Command::Completeness {
            corpus,
            top,
            format,
        } => run_completeness(&corpus, &tables, top, format)?,
        Command::Missing {
            corpus,
            gap_days,
            top,
            format,
        } => run_missing(&corpus, &tables, gap_days, top, format)?,
        Command::Validate {
            corpus,
            suggest,
            format,
        } => run_validate(&corpus, suggest, format)?,
        Command::Export {
            corpus,
            output,
            gap_days,
        } => run_export(&corpus, &tables, output, gap_days)?,
        Command::Name {
            newspaper,
            date,
            page,
            library,
            shelfmark,
            ext,
        } => {
            let record =
                PageRecord::new(newspaper, date, page, library, shelfmark.as_deref(), ext);
            println!("{}", encode(&record)?);
        }
    }

    Ok(())
}

fn load_tables(path: Option<&Path>) -> Result<ReferenceTables> {
    match path {
        Some(path) => {
            let tables = ReferenceTables::load(path).with_context(|| {
                format!("Cannot load reference tables from {}", path.display())
            })?;
            tracing::debug!(
                path = %path.display(),
                newspapers = tables.newspapers.len(),
                libraries = tables.libraries.len(),
                "loaded reference tables"
            );
            Ok(tables)
        }
        None => Ok(ReferenceTables::default()),
    }
}

fn scan_config(args: &CorpusArgs) -> Result<ScanConfig> {
    ScanConfig::builder()
        .root(args.path.clone())
        .follow_symlinks(args.follow_symlinks)
        .max_depth(args.max_depth)
        .ignore_patterns(args.ignore.clone())
        .include_hidden(!args.no_hidden)
        .threads(args.threads)
        .build()
        .context("Invalid scan options")
}

/// Scan the corpus, reporting progress on stderr.
fn scan_corpus(args: &CorpusArgs) -> Result<CorpusSnapshot> {
    let config = scan_config(args)?;
    eprintln!("Scanning {}...", args.path.display());

    let snapshot = CorpusScanner::new().scan(&config).context("Scan failed")?;
    if snapshot.has_warnings() {
        eprintln!("{} warning(s) during scan", snapshot.warnings.len());
    }
    Ok(snapshot)
}

/// Scan and show the corpus summary.
fn run_scan(
    args: &CorpusArgs,
    tables: &ReferenceTables,
    monthly: bool,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = scan_corpus(args)?;
    let index = &snapshot.index;
    let summary = index.summary();

    if let OutputFormat::Json = format {
        let value = serde_json::json!({
            "root": snapshot.root_path,
            "summary": summary,
            "pages_by_newspaper": index.pages_by_newspaper(),
            "pages_by_year": index.pages_by_year(),
            "invalid_files": index.invalid_files(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("{}", "─".repeat(70));
    println!(" {}", snapshot.root_path.display());
    println!(
        " {} newspapers, {} issues, {} pages",
        summary.total_newspapers, summary.total_issues, summary.total_pages
    );
    if let Some((first, last)) = summary.year_range {
        println!(" Years {first}-{last}");
    }
    if let Some(avg) = summary.average_pages_per_issue {
        println!(" {avg:.1} pages per issue on average");
    }
    println!(
        " {} invalid file(s), scanned in {:.2}s",
        summary.invalid_files,
        snapshot.scan_duration.as_secs_f64()
    );
    println!("{}", "─".repeat(70));
    println!();

    println!(" Newspapers:");
    for code in index.newspapers() {
        let years = index
            .year_range(code)
            .map(|(a, b)| format!("{a}-{b}"))
            .unwrap_or_default();
        println!(
            "   {}  {:<40} {:>7} issues {:>8} pages  {}",
            code,
            truncate(&tables.newspaper_name(code), 40),
            index.issue_count(code),
            index.page_count(code),
            years
        );
    }
    println!();

    println!(" Pages by year:");
    for (year, pages) in index.pages_by_year() {
        println!(
            "   {year}  {:>8} pages {:>6} issues {:>3} newspapers",
            pages,
            index.issues_in_year(*year),
            index.newspapers_in_year(*year)
        );
    }
    println!();

    if monthly {
        println!(" Pages by month:");
        for ((year, month), by_paper) in index.pages_by_month() {
            let total: u64 = by_paper.values().sum();
            let split = by_paper
                .iter()
                .map(|(code, pages)| format!("{code} {pages}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("   {year:04}-{month:02}  {total:>8}  ({split})");
        }
        println!();
    }

    let invalid = index.invalid_files().iter().map(|f| (&f.path, f.diagnostic()));
    print_invalid_sample(invalid, 10);

    Ok(())
}

/// Show holdings by library.
fn run_libraries(
    args: &CorpusArgs,
    tables: &ReferenceTables,
    by_year: bool,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = scan_corpus(args)?;
    let index = &snapshot.index;
    let report = CorpusReport::build(index, tables);

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&report.libraries)?);
        return Ok(());
    }

    println!();
    println!("{}", "─".repeat(70));
    println!(" Library Holdings");
    println!("{}", "─".repeat(70));
    println!();

    for library in &report.libraries {
        println!(
            " {} - {} ({} pages, {} issues)",
            library.code, library.name, library.pages, library.issues
        );
        for holding in &library.newspapers {
            let years = holding
                .year_range
                .map(|(a, b)| format!("{a}-{b}"))
                .unwrap_or_default();
            println!(
                "   {}  {:<40} {:>7} issues {:>8} pages  {}",
                holding.newspaper,
                truncate(&holding.name, 40),
                holding.issues,
                holding.pages,
                years
            );
            if !holding.shelfmarks.is_empty() {
                let marks: Vec<&str> = holding.shelfmarks.iter().map(|s| s.as_str()).collect();
                println!("         shelfmarks: {}", marks.join(", "));
            }
            if by_year {
                for (year, held) in index.holding_by_year(&library.code, &holding.newspaper) {
                    println!(
                        "         {year}  {:>6} issues {:>8} pages",
                        held.issues, held.pages
                    );
                }
            }
        }
        println!();
    }

    Ok(())
}

/// Report issues with missing or duplicate pages.
fn run_completeness(
    args: &CorpusArgs,
    tables: &ReferenceTables,
    top_n: usize,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = scan_corpus(args)?;
    eprintln!("Checking issue completeness...");
    let report = CompletenessChecker::new().check(&snapshot.index);

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{}", "─".repeat(70));
    println!(" Issue Completeness Report");
    println!("{}", "─".repeat(70));
    println!();
    println!(
        " {} of {} issues complete",
        report.complete_issues, report.total_issues
    );
    println!();

    for paper in &report.newspapers {
        println!(
            "   {}  {:<34} {:>6} issues {:>6} complete ({:>5.1}%)  {} missing, {} duplicated",
            paper.newspaper,
            truncate(&tables.newspaper_name(&paper.newspaper), 34),
            paper.total_issues,
            paper.complete_issues,
            paper.complete_percent(),
            paper.issues_with_missing,
            paper.issues_with_duplicates
        );
    }
    println!();

    if !report.has_problems() {
        println!(" No issues with missing or duplicate pages.");
        return Ok(());
    }

    println!(" Problem issues:");
    for problem in report.problems.iter().take(top_n) {
        println!(
            "   {} {}  {} page(s), max page {}, {:.1}% complete",
            problem.newspaper,
            problem.date,
            problem.pages.total_pages,
            problem.pages.max_page,
            problem.pages.completeness_percent()
        );
        if problem.pages.has_missing() {
            println!("     missing: {}", join_pages(&problem.pages.missing));
        }
        if problem.pages.has_duplicates() {
            println!("     duplicates: {}", join_pages(&problem.pages.duplicates));
        }
    }
    let remaining = report.problems.len().saturating_sub(top_n);
    if remaining > 0 {
        println!("   ... and {remaining} more");
    }
    println!();

    Ok(())
}

/// Report cadence, missing issues and coverage gaps.
fn run_missing(
    args: &CorpusArgs,
    tables: &ReferenceTables,
    gap_days: i64,
    top_n: usize,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = scan_corpus(args)?;
    let config = GapConfig::builder()
        .coverage_gap_days(gap_days)
        .build()
        .context("Invalid gap options")?;

    eprintln!("Estimating missing issues...");
    let report = MissingIssueAnalyzer::with_config(config).analyze(&snapshot.index);

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{}", "─".repeat(70));
    println!(" Missing Issue Estimates");
    println!("{}", "─".repeat(70));
    println!();
    println!(
        " {} issue(s) estimated missing across {} newspaper(s)",
        report.total_estimated_missing,
        report.newspapers.len()
    );
    println!();

    for paper in &report.newspapers {
        let profile = &paper.profile;
        println!(
            " {} - {}",
            paper.newspaper,
            tables.newspaper_name(&paper.newspaper)
        );
        println!(
            "   {} (mean gap {:.2} days, range {}-{}, baseline {})",
            profile.cadence,
            profile.average_gap_days,
            profile.min_gap_days,
            profile.max_gap_days,
            profile.expected_gap_days
        );
        println!(
            "   {} issues, {} estimated missing, {:.1}% estimated complete",
            profile.issue_count, paper.estimated_missing, paper.estimated_completeness
        );
        print_gaps("significant gaps", &paper.significant_gaps, top_n);
        print_gaps(
            &format!("gaps over {gap_days} days"),
            &paper.coverage_gaps,
            top_n,
        );
        if !paper.skipped_dates.is_empty() {
            let dates: Vec<String> = paper.skipped_dates.iter().map(ToString::to_string).collect();
            println!("   not calendar dates: {}", dates.join(", "));
        }
        println!();
    }

    if !report.excluded.is_empty() {
        println!(" Too few dated issues to estimate:");
        for excluded in &report.excluded {
            println!(
                "   {} - {} ({} issue(s))",
                excluded.newspaper,
                tables.newspaper_name(&excluded.newspaper),
                excluded.issue_count
            );
        }
        println!();
    }

    Ok(())
}

/// Validate filenames under a directory.
fn run_validate(args: &CorpusArgs, suggest: bool, format: OutputFormat) -> Result<()> {
    let config = scan_config(args)?;
    eprintln!("Validating {}...", args.path.display());
    let report = validate_directory(&config, suggest).context("Validation failed")?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        " {} file(s) checked: {} valid, {} invalid",
        report.total(),
        report.valid.len(),
        report.invalid.len()
    );
    println!();

    for entry in &report.invalid {
        let shown = entry.path.strip_prefix(&report.root).unwrap_or(&entry.path);
        println!("   {}", shown.display());
        println!("     {}", entry.diagnostic);
        if let Some(suggestion) = &entry.suggestion {
            println!("     suggested: {suggestion}");
        }
    }
    if suggest && !report.is_clean() {
        println!();
        println!(
            " {} of {} invalid file(s) have a suggested name",
            report.fixable().count(),
            report.invalid.len()
        );
    }

    Ok(())
}

/// Export the full report to JSON.
fn run_export(
    args: &CorpusArgs,
    tables: &ReferenceTables,
    output: Option<PathBuf>,
    gap_days: i64,
) -> Result<()> {
    let snapshot = scan_corpus(args)?;
    let gaps = GapConfig::builder()
        .coverage_gap_days(gap_days)
        .build()
        .context("Invalid gap options")?;

    let report = CorpusReport::build_with(&snapshot.index, tables, gaps);
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

fn print_gaps(label: &str, gaps: &[IssueGap], top_n: usize) {
    if gaps.is_empty() {
        return;
    }
    println!("   {label}:");
    for gap in gaps.iter().take(top_n) {
        if gap.estimated_missing > 0 {
            println!(
                "     {} to {} ({} days, ~{} missing)",
                gap.from, gap.to, gap.gap_days, gap.estimated_missing
            );
        } else {
            println!("     {} to {} ({} days)", gap.from, gap.to, gap.gap_days);
        }
    }
    if gaps.len() > top_n {
        println!("     ... and {} more", gaps.len() - top_n);
    }
}

fn print_invalid_sample<'a>(
    invalid: impl ExactSizeIterator<Item = (&'a PathBuf, String)>,
    limit: usize,
) {
    let total = invalid.len();
    if total == 0 {
        return;
    }
    println!(" Invalid files ({total}):");
    for (path, diagnostic) in invalid.take(limit) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        println!("   {name}: {diagnostic}");
    }
    if total > limit {
        println!("   ... and {} more", total - limit);
    }
    println!();
}

fn join_pages<'a>(pages: impl IntoIterator<Item = &'a u16>) -> String {
    pages
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncate a string to max length in characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}
