//! lang-advisor CLI: programming language recommendations from project criteria.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use lang_advisor::advisor::{Advisor, Recommendation, Selection};
use lang_advisor::config::{AdvisorConfig, InputPolicy, Locale};
use lang_advisor::knowledge::KnowledgeBase;

#[derive(Parser)]
#[command(
    name = "lang-advisor",
    version,
    about = "Recommend a programming language for a project"
)]
struct Cli {
    /// Config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file (TOML). Overrides the config; defaults to the bundled catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Reject identifiers that are not registered criteria.
    #[arg(long, global = true)]
    strict: bool,

    /// Language of the bundled catalog labels and "no match" message (en, id).
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable criteria.
    Criteria,

    /// List the possible recommendations.
    Conclusions,

    /// List rules in evaluation order.
    Rules,

    /// Recommend languages for the selected criteria.
    Recommend {
        /// Criterion codes, space- or comma-separated (e.g. "P_web,P_easy").
        codes: Vec<String>,

        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Validate the catalog and print a summary.
    Check,

    /// Write a config file with the effective settings.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct RecommendReport<'a> {
    selected: Vec<&'a str>,
    ignored: &'a [String],
    matched: bool,
    recommendations: Vec<String>,
}

impl<'a> RecommendReport<'a> {
    fn new(kb: &'a KnowledgeBase, selection: &'a Selection, recommendation: Recommendation) -> Self {
        Self {
            selected: selection.facts.iter().map(|&f| kb.code(f)).collect(),
            ignored: &selection.ignored,
            matched: recommendation.is_match(),
            recommendations: recommendation.into_lines(),
        }
    }
}

/// Flatten positional arguments, splitting each on commas.
fn split_codes(args: &[String]) -> Vec<&str> {
    args.iter().flat_map(|arg| arg.split(',')).collect()
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => AdvisorConfig::load(path)?,
        None => AdvisorConfig::default(),
    };
    if let Some(catalog) = cli.catalog {
        config.catalog = Some(catalog);
    }
    if cli.strict {
        config.input_policy = InputPolicy::Strict;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    let load = || Advisor::from_config(&config);

    match cli.command {
        Commands::Criteria => {
            let advisor = load()?;
            let kb = advisor.knowledge();
            println!("Criteria ({}):", kb.criteria_len());
            for (_, entry) in kb.criteria() {
                println!("  {:<12} {}", entry.id, entry.label);
            }
        }

        Commands::Conclusions => {
            let advisor = load()?;
            let kb = advisor.knowledge();
            println!("Conclusions ({}):", kb.conclusions_len());
            for (_, entry) in kb.conclusions() {
                println!("  {:<12} {}", entry.id, entry.label);
            }
        }

        Commands::Rules => {
            let advisor = load()?;
            let kb = advisor.knowledge();
            println!("Rules ({}), in evaluation order:", advisor.rules().len());
            for (i, rule) in advisor.rules().rules().iter().enumerate() {
                let premises: Vec<&str> = rule.premises().iter().map(|&p| kb.code(p)).collect();
                println!(
                    "  {:>2}. {} [{}]: {} => {}",
                    i + 1,
                    rule.name(),
                    rule.specificity(),
                    premises.join(" + "),
                    kb.code(rule.conclusion().into())
                );
            }
        }

        Commands::Recommend { codes, json } => {
            let advisor = load()?;
            let selection = advisor.resolve_selection(split_codes(&codes).as_slice())?;
            let recommendation = advisor.recommend_selection(&selection)?;

            if json {
                let report = RecommendReport::new(advisor.knowledge(), &selection, recommendation);
                let out = serde_json::to_string_pretty(&report).into_diagnostic()?;
                println!("{out}");
            } else {
                for code in &selection.ignored {
                    eprintln!("warning: ignoring unknown criterion \"{code}\"");
                }
                for line in recommendation.into_lines() {
                    println!("{line}");
                }
            }
        }

        Commands::Check => {
            let advisor = load()?;
            let kb = advisor.knowledge();
            println!("Catalog OK");
            println!("  criteria:    {}", kb.criteria_len());
            println!("  conclusions: {}", kb.conclusions_len());
            println!("  rules:       {}", advisor.rules().len());
            println!("  policy:      {:?}", advisor.policy());
        }

        // Needs no catalog, so a broken catalog path can still be written out.
        Commands::InitConfig { path } => {
            config.save(&path)?;
            println!("Wrote config to {}", path.display());
        }
    }

    Ok(())
}
