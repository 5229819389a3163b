//! seo-audit main entry point
//!
//! Command-line driver for the audit engine. Results are printed as JSON.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use seo_audit::audit::Auditor;
use seo_audit::config::{load_config_with_hash, Config};
use seo_audit::indexing::IndexNowSubmitter;
use seo_audit::output::write_markdown_report;
use seo_audit::schema::{fields_from_document, generate, to_script_tag, validate};
use seo_audit::storage::{open_storage, AuditStore};
use seo_audit::vitals::{VitalsAggregator, VitalsSample};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Website SEO audit and optimization engine
///
/// Audits live pages, checks their links, generates JSON-LD markup and
/// notifies IndexNow endpoints about changed URLs.
#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(version)]
#[command(about = "Website SEO audit and optimization engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a page and score it
    Audit {
        url: String,

        #[command(flatten)]
        vitals: VitalsArgs,

        /// Also check the page's links
        #[arg(long)]
        links: bool,

        /// Write a markdown report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Store the result in the configured database
        #[arg(long)]
        save: bool,
    },

    /// Check the links of one or more pages
    Links {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Links probed per page (overrides the config)
        #[arg(long)]
        max_links: Option<usize>,

        /// Store the result in the configured database
        #[arg(long)]
        save: bool,
    },

    /// Generate JSON-LD for a page
    Schema {
        /// Schema type, e.g. Product or Organization
        schema_type: String,

        url: String,

        /// Extra or overriding field, as key=value (value may be JSON)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Submit URLs to the IndexNow endpoint, one batch per host
    Submit {
        /// IndexNow API key
        #[arg(long)]
        key: String,

        #[arg(required = true)]
        urls: Vec<String>,
    },
}

/// Field measurements in milliseconds (CLS unit-less)
#[derive(Args, Debug)]
struct VitalsArgs {
    #[arg(long)]
    lcp: Option<f64>,
    #[arg(long)]
    fid: Option<f64>,
    #[arg(long)]
    cls: Option<f64>,
    #[arg(long)]
    fcp: Option<f64>,
    #[arg(long)]
    ttfb: Option<f64>,
}

impl VitalsArgs {
    fn sample(&self) -> VitalsSample {
        VitalsSample {
            lcp: self.lcp,
            fid: self.fid,
            cls: self.cls,
            fcp: self.fcp,
            ttfb: self.ttfb,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }

    let value = value.trim();
    let parsed = if value.starts_with('{') || value.starts_with('[') {
        serde_json::from_str(value).map_err(|e| format!("invalid JSON for {}: {}", key, e))?
    } else {
        Value::from(value)
    };

    Ok((key.to_string(), parsed))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => (Config::default(), "default".to_string()),
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping");
            interrupt.cancel();
        }
    });

    let auditor = Auditor::new(&config)?;

    match cli.command {
        Command::Audit {
            url,
            vitals,
            links,
            report,
            save,
        } => {
            handle_audit(
                &auditor,
                &config,
                &config_hash,
                &url,
                &vitals.sample(),
                links,
                report.as_deref(),
                save,
                &cancel,
            )
            .await
        }
        Command::Links {
            urls,
            max_links,
            save,
        } => {
            let max_links = max_links.unwrap_or(config.crawler.max_links);
            let scan = auditor.scanner().scan_many(&urls, max_links, &cancel).await?;
            if save {
                let mut storage = open_storage(Path::new(&config.storage.database_path))?;
                let id = storage.save_link_scan(&scan)?;
                tracing::info!("Saved link scan {}", id);
            }
            print_json(&scan)
        }
        Command::Schema {
            schema_type,
            url,
            fields,
        } => {
            let document = auditor.fetch_document(&url, &cancel).await?;
            let mut merged = fields_from_document(&schema_type, &document)?;
            merged.extend(fields);

            let schema = generate(&schema_type, &merged)?;
            let report = validate(&Value::Object(schema.clone()));
            for suggestion in &report.suggestions {
                tracing::info!("{}", suggestion);
            }
            println!("{}", to_script_tag(&schema));
            Ok(())
        }
        Command::Submit { key, urls } => {
            let submitter = IndexNowSubmitter::new(auditor.fetcher().client().clone(), &config.indexing)?;
            let reports = submitter.submit_by_host(&urls, &key).await?;
            print_json(&reports)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_audit(
    auditor: &Auditor,
    config: &Config,
    config_hash: &str,
    url: &str,
    sample: &VitalsSample,
    with_links: bool,
    report: Option<&Path>,
    save: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let aggregator = VitalsAggregator::new();
    aggregator.ingest(sample);
    let vitals = aggregator.current_vitals();
    let vitals = (!vitals.is_empty()).then_some(&vitals);

    let (audit, links) = if with_links {
        let site = auditor.audit_site(url, vitals, cancel).await?;
        (site.audit, Some(site.links))
    } else {
        (auditor.audit(url, vitals, cancel).await?, None)
    };

    tracing::info!("{} scored {}/100 with {} issues", audit.url, audit.seo_score, audit.issues.len());

    if let Some(path) = report {
        write_markdown_report(&audit, links.as_ref(), path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if save {
        let mut storage = open_storage(Path::new(&config.storage.database_path))?;
        let id = storage.save_audit(&audit, config_hash)?;
        if let Some(scan) = &links {
            storage.save_link_scan(scan)?;
        }
        tracing::info!("Saved audit {}", id);
    }

    match links {
        Some(links) => print_json(&serde_json::json!({ "audit": audit, "links": links })),
        None => print_json(&audit),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_audit=info,warn"),
            1 => EnvFilter::new("seo_audit=debug,info"),
            2 => EnvFilter::new("seo_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
