use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

mod ascii_charts;
mod cli_output;
mod config;
mod dashboard;
mod dataset;
mod error;
mod format;
mod tags;

use cli_output::{OutputMode, OutputWriter};
use config::DashConfig;
use dashboard::{DashboardView, Filters, SortOrder};
use dataset::{load_dataset_file, Catalog};

#[derive(Parser)]
#[command(name = "scenario-dash")]
#[command(about = "Compare settlement scenarios across class-action datasets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (human, plain, json). Auto-detected when omitted
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Dataset JSON file to use instead of the built-in tables
    #[arg(long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the scenario dashboard
    Dashboard {
        /// Dataset key (woolworths, coles) or "all"
        #[arg(short, long, default_value = "all")]
        dataset: String,

        /// Approach filter (e.g. "Judgement Based")
        #[arg(long)]
        approach: Option<String>,

        /// FWO filter (e.g. "With FWO")
        #[arg(long)]
        fwo: Option<String>,

        /// Set-off filter (e.g. "Pay Period")
        #[arg(long)]
        setoff: Option<String>,

        /// 557C condition filter (datasets that show it only)
        #[arg(long = "cond557c")]
        cond557c: Option<String>,

        /// Sort bars: desc, asc, original
        #[arg(short, long)]
        sort: Option<String>,

        /// Show the data table
        #[arg(long)]
        table: bool,
    },

    /// Extract tags from scenario descriptions (reads stdin lines when none given)
    Tag {
        /// Scenario descriptions
        texts: Vec<String>,
    },

    /// List available datasets
    Datasets,

    /// Show the filter choices for a dataset
    Options {
        /// Dataset key (woolworths, coles) or "all"
        #[arg(short, long, default_value = "all")]
        dataset: String,
    },
}

#[derive(Serialize)]
struct DatasetSummary<'a> {
    key: &'a str,
    name: &'a str,
    title: &'a str,
    scenarios: usize,
    show_557c_filter: bool,
}

/// Dataset file from the flag, else from config, else the built-in tables
fn load_catalog(data: Option<PathBuf>, config: &DashConfig) -> Result<Catalog> {
    match data.or_else(|| config.data_file.clone()) {
        Some(path) => {
            info!("Loading scenarios from {}", path.display());
            Ok(Catalog::new(vec![load_dataset_file(&path)?]))
        }
        None => Ok(Catalog::builtin()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mode = match cli.format.as_deref() {
        Some(f) => f.parse::<OutputMode>()?,
        None => OutputMode::auto(),
    };
    let out = OutputWriter::new(mode);
    let config = DashConfig::load()?;
    debug!("Config: {:?}", config);

    match cli.command {
        Commands::Dashboard {
            dataset,
            approach,
            fwo,
            setoff,
            cond557c,
            sort,
            table,
        } => {
            info!("Rendering dashboard for {}", dataset);

            let catalog = load_catalog(cli.data, &config)?;
            let sort: SortOrder = sort.as_deref().unwrap_or(&config.default_sort).parse()?;
            let filters = Filters::new(approach, fwo, setoff, cond557c);

            let views: Vec<DashboardView> = catalog
                .select(&dataset)?
                .into_iter()
                .map(|ds| DashboardView::build(ds, &filters, sort))
                .collect();

            if out.is_json() {
                out.emit_json(&views)?;
            } else {
                out.block(&dashboard::render_page(&out, &views, &config, table));
            }

            Ok(())
        }

        Commands::Tag { texts } => {
            let texts = if texts.is_empty() {
                debug!("Reading scenario descriptions from stdin");
                io::stdin()
                    .lock()
                    .lines()
                    .collect::<io::Result<Vec<_>>>()?
                    .into_iter()
                    .filter(|line| !line.trim().is_empty())
                    .collect()
            } else {
                texts
            };

            let tagged: Vec<tags::ScenarioTags> = texts.iter().map(|t| tags::extract(t)).collect();

            if out.is_json() {
                out.emit_json(&tagged)?;
            } else {
                let rows = tagged
                    .iter()
                    .map(|t| {
                        vec![
                            t.label.clone(),
                            t.approach.to_string(),
                            t.fwo.to_string(),
                            t.setoff.to_string(),
                            t.cond557c.to_string(),
                            t.clause.to_string(),
                        ]
                    })
                    .collect();
                out.table(
                    &["label", "approach", "fwo", "setoff", "cond_557c", "clause"],
                    rows,
                );
            }

            Ok(())
        }

        Commands::Datasets => {
            let catalog = load_catalog(cli.data, &config)?;
            let summaries: Vec<DatasetSummary> = catalog
                .datasets
                .iter()
                .map(|d| DatasetSummary {
                    key: &d.key,
                    name: &d.name,
                    title: &d.title,
                    scenarios: d.len(),
                    show_557c_filter: d.show_557c_filter,
                })
                .collect();

            if out.is_json() {
                out.emit_json(&summaries)?;
            } else {
                let rows = summaries
                    .iter()
                    .map(|s| {
                        vec![
                            s.key.to_string(),
                            s.name.to_string(),
                            s.scenarios.to_string(),
                            if s.show_557c_filter { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                out.table(&["key", "name", "scenarios", "557C filter"], rows);
            }

            Ok(())
        }

        Commands::Options { dataset } => {
            let catalog = load_catalog(cli.data, &config)?;
            let selected = catalog.select(&dataset)?;

            if out.is_json() {
                let options: Vec<_> = selected
                    .iter()
                    .map(|ds| {
                        serde_json::json!({
                            "dataset": ds.key,
                            "options": dashboard::filter_options(ds),
                        })
                    })
                    .collect();
                out.emit_json(&options)?;
                return Ok(());
            }

            for ds in selected {
                let opts = dashboard::filter_options(ds);
                out.section(&ds.name);
                let mut rows = vec![
                    ("Approach", opts.approach.join(", ")),
                    ("FWO", opts.fwo.join(", ")),
                    ("Set-off", opts.setoff.join(", ")),
                ];
                if let Some(cond) = opts.cond557c {
                    rows.push(("557C Condition", cond.join(", ")));
                }
                out.key_values(&rows);
            }

            Ok(())
        }
    }
}
