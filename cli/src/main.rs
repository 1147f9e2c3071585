//! thesisfmt CLI - thesis formatting checker

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use thesisfmt::classify::{collect_classified, load_classified, save_classified};
use thesisfmt::render::{self, JsonFormat};
use thesisfmt::units::{lookup_unit, parse_measurement};
use thesisfmt::{
    CheckMode, CheckOptions, CheckReport, ClassifiedParagraph, ClassifyOptions, Document,
    RuleClassifier, RuleConfig,
};

#[derive(Parser)]
#[command(name = "thesisfmt")]
#[command(version)]
#[command(about = "Check and correct thesis formatting in Word documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document and attach review comments
    Check {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output .docx file (default: <stem>_checked.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Correct formatting in place of comments
    Fix {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output .docx file (default: <stem>_fixed.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also leave a comment for every correction
        #[arg(long)]
        comment_corrections: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Classify paragraphs and print or save the list
    Classify {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Confidence below which a label falls back to body text
        #[arg(long, default_value = "0.6")]
        threshold: f32,
    },

    /// Print the document outline
    Outline {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Rulebook (YAML); the built-in rules if not specified
        #[arg(short, long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Classified paragraph list (JSON) to use instead of classifying
        #[arg(long, value_name = "FILE")]
        classified: Option<PathBuf>,
    },

    /// Parse a measurement literal and optionally convert it
    Unit {
        /// Literal such as "2字符", "12pt", "1.5倍" or "小四"
        #[arg(value_name = "LITERAL")]
        literal: String,

        /// Target unit (pt, cm, mm, in, emu, 字符, 行)
        #[arg(long, value_name = "UNIT")]
        to: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Rulebook (YAML); the built-in rules if not specified
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Message language
    #[arg(long, value_enum, default_value = "zh")]
    lang: Lang,

    /// Write the report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Compact JSON report
    #[arg(long)]
    compact: bool,

    /// Classified paragraph list (JSON) to use instead of classifying
    #[arg(long, value_name = "FILE")]
    classified: Option<PathBuf>,

    /// Comment author
    #[arg(long, default_value = "thesisfmt")]
    author: String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Lang {
    /// Chinese messages
    Zh,
    /// English messages
    En,
}

impl From<Lang> for thesisfmt::Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Zh => thesisfmt::Language::Zh,
            Lang::En => thesisfmt::Language::En,
        }
    }
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            input,
            output,
            common,
        } => cmd_check(&input, output.as_deref(), &common, CheckMode::Annotate, false),
        Commands::Fix {
            input,
            output,
            comment_corrections,
            common,
        } => cmd_check(
            &input,
            output.as_deref(),
            &common,
            CheckMode::Correct,
            comment_corrections,
        ),
        Commands::Classify {
            input,
            output,
            threshold,
        } => cmd_classify(&input, output.as_deref(), threshold),
        Commands::Outline {
            input,
            rules,
            classified,
        } => cmd_outline(&input, rules.as_deref(), classified.as_deref()),
        Commands::Unit { literal, to } => cmd_unit(&literal, to.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&Path>) -> thesisfmt::Result<RuleConfig> {
    match path {
        Some(path) => RuleConfig::from_file(path),
        None => RuleConfig::default_rules(),
    }
}

fn classified_for(
    doc: &Document,
    classified: Option<&Path>,
) -> thesisfmt::Result<Vec<ClassifiedParagraph>> {
    match classified {
        Some(path) => load_classified(path),
        None => {
            let classifier = RuleClassifier::new()?;
            let (items, stats) = collect_classified(doc, &classifier, &ClassifyOptions::default());
            if stats.batch_failures > 0 {
                log::warn!(
                    "{} classifier batch(es) fell back to per-item calls",
                    stats.batch_failures
                );
            }
            Ok(items)
        }
    }
}

fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_{}.docx", stem, suffix))
}

fn cmd_check(
    input: &Path,
    output: Option<&Path>,
    common: &CommonArgs,
    mode: CheckMode,
    comment_corrections: bool,
) -> CliResult {
    let suffix = match mode {
        CheckMode::Annotate => "checked",
        CheckMode::Correct => "fixed",
    };
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, suffix));

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading rules...");
    let config = load_rules(common.rules.as_deref())?;
    let mut doc = thesisfmt::open(input)?;
    pb.inc(1);

    pb.set_message("Classifying paragraphs...");
    let classified = classified_for(&doc, common.classified.as_deref())?;
    pb.inc(1);

    pb.set_message("Checking...");
    let options = CheckOptions::new()
        .with_mode(mode)
        .with_language(common.lang.into())
        .with_author(common.author.clone(), initials(&common.author))
        .with_correction_comments(comment_corrections);
    let report = thesisfmt::check_document(&mut doc, &config, &classified, options)?;
    pb.inc(1);

    pb.set_message("Saving...");
    doc.save(&output)?;
    if let Some(path) = &common.report {
        write_report(&report, path, common.compact)?;
    }
    pb.inc(1);
    pb.finish_and_clear();

    print!("{}", render::to_text(&report, common.lang.into()));
    println!("{} {}", "Saved to".green(), output.display());
    if let Some(path) = &common.report {
        println!("{} {}", "Report".green(), path.display());
    }
    Ok(())
}

fn initials(author: &str) -> String {
    author
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect()
}

fn write_report(report: &CheckReport, path: &Path, compact: bool) -> CliResult {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    fs::write(path, render::to_json(report, format)?)?;
    Ok(())
}

fn cmd_classify(input: &Path, output: Option<&Path>, threshold: f32) -> CliResult {
    let doc = thesisfmt::open(input)?;
    let classifier = RuleClassifier::new()?;
    let options = ClassifyOptions::new().with_threshold(threshold);
    let (items, stats) = collect_classified(&doc, &classifier, &options);

    if let Some(path) = output {
        save_classified(path, &items)?;
        println!(
            "{} {} paragraphs to {}",
            "Saved".green(),
            items.len(),
            path.display()
        );
    } else {
        for item in &items {
            println!(
                "{:<24} {:.2}  {}",
                item.category.cyan(),
                item.confidence,
                item.text
            );
        }
    }
    if stats.downgraded > 0 {
        println!(
            "{} {} low-confidence label(s) set to body text",
            "Note:".yellow(),
            stats.downgraded
        );
    }
    Ok(())
}

fn cmd_outline(input: &Path, rules: Option<&Path>, classified: Option<&Path>) -> CliResult {
    let config = load_rules(rules)?;
    let doc = thesisfmt::open(input)?;
    let items = classified_for(&doc, classified)?;

    let checker = thesisfmt::Checker::new(&config, CheckOptions::default());
    let (mut outline, promoted) = checker.build_outline(&items)?;
    let matches = thesisfmt::outline::attach_paragraphs(&mut outline, &doc);

    print!("{}", render::outline_to_text(&outline));
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Nodes".bold(), outline.len());
    println!("{}: {}", "Matched".bold(), matches.attached);
    println!("{}: {}", "Promoted".bold(), promoted);
    if !outline.skipped().is_empty() {
        println!("{}: {}", "Skipped".bold(), outline.skipped().len());
    }
    if !matches.duplicates.is_empty() {
        println!("{}: {}", "Duplicate fingerprints".bold(), matches.duplicates.len());
    }
    Ok(())
}

fn cmd_unit(literal: &str, to: Option<&str>) -> CliResult {
    let value = parse_measurement(literal)?;
    println!("{}: {}", "Parsed".bold(), value);
    if let Some(target) = to {
        let unit = lookup_unit(target).ok_or_else(|| format!("unknown unit: {}", target))?;
        println!("{}: {}", "Converted".bold(), value.convert_to(unit)?);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "thesisfmt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Thesis formatting checker for Word documents");
    println!();
    println!("License: MIT");
}
