//! oxiquery command-line driver
//!
//! Builds a single operator tree over a dataset and prints every row it
//! produces.
//!
//! ```bash
//! # Built-in sample data
//! oxiquery scan movies
//! oxiquery sort movies --column 1
//! oxiquery filter movies --column 2 --op '>=' --value 2003
//! oxiquery join movies ratings --left-column 0 --right-column 0 --explain
//!
//! # Your own relations
//! oxiquery --dataset data.json scan users
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use oxiquery::api::{Dataset, QueryBuilder};
use oxiquery::{Config, ExecutionOperator, RowIter, Value};

/// Pull-based query execution over in-memory relations
#[derive(Parser, Debug)]
#[command(name = "oxiquery", version, about = "Run a single operator tree over a dataset")]
struct Args {
    /// Configuration file path (TOML)
    #[arg(long, value_name = "FILE", env = "OXIQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset file (JSON); defaults to the built-in movies/ratings sample
    #[arg(short = 'd', long, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Print the operator tree before executing it
    #[arg(long)]
    explain: bool,

    /// Emit each row as a JSON array
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    query: Query,
}

#[derive(Subcommand, Debug)]
enum Query {
    /// Sequential scan of a relation
    Scan { relation: String },
    /// Scan a relation and sort it ascending on one column
    Sort {
        relation: String,
        #[arg(short, long)]
        column: usize,
    },
    /// Scan a relation and keep rows where `column <op> value`
    Filter {
        relation: String,
        #[arg(short, long)]
        column: usize,
        /// One of <, >, <=, >=, =
        #[arg(short, long)]
        op: String,
        /// Literal operand: integer, float, true/false, null, or text
        #[arg(short, long, allow_hyphen_values = true)]
        value: String,
    },
    /// Inner equi-join of two relations
    Join {
        left: String,
        right: String,
        #[arg(long, default_value_t = 0)]
        left_column: usize,
        #[arg(long, default_value_t = 0)]
        right_column: usize,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let log_level = init_logging();

    let config = Config::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(handle) = log_level {
        handle
            .reload(log_filter(&config.log_level))
            .context("failed to apply configured log level")?;
    }

    let dataset = load_dataset(&args, &config)?;
    let query = build_query(&args.query, &dataset, &config)?;

    if args.explain {
        print!("{}", query.explain());
    }

    let mut root = query.build();
    root.open().context("failed to open query")?;

    let mut count = 0usize;
    for row in RowIter::new(&mut *root) {
        let row = row.context("query execution failed")?;
        if args.json {
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!("{}", row);
        }
        count += 1;
    }
    info!(rows = count, "query finished");
    Ok(())
}

/// Installs the stderr subscriber before anything else runs.
///
/// `RUST_LOG` fixes the filter for the whole run. Otherwise logging starts
/// at `info` and the returned handle swaps in the configured level once the
/// configuration file has been read.
fn init_logging() -> Option<reload::Handle<EnvFilter, Registry>> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let fixed = from_env.is_some();
    let (filter, handle) = reload::Layer::new(from_env.unwrap_or_else(|| log_filter("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).without_time())
        .init();

    if fixed {
        None
    } else {
        Some(handle)
    }
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("oxiquery={}", level))
}

fn load_dataset(args: &Args, config: &Config) -> Result<Dataset> {
    match args.dataset.as_ref().or(config.dataset_path.as_ref()) {
        Some(path) => {
            info!(path = %path.display(), "loading dataset");
            Dataset::load(path).with_context(|| format!("failed to load dataset {}", path.display()))
        }
        None => Ok(Dataset::sample()),
    }
}

fn build_query(query: &Query, dataset: &Dataset, config: &Config) -> Result<QueryBuilder> {
    let scan = |name: &str| -> Result<QueryBuilder> {
        Ok(QueryBuilder::scan(dataset.relation(name)?).with_config(config))
    };

    let builder = match query {
        Query::Scan { relation } => scan(relation.as_str())?,
        Query::Sort { relation, column } => scan(relation.as_str())?.sort(*column),
        Query::Filter { relation, column, op, value } => scan(relation.as_str())?
            .filter(*column, op, Value::parse_literal(value))
            .with_context(|| format!("invalid filter on column {}", column))?,
        Query::Join { left, right, left_column, right_column } => {
            scan(left.as_str())?.join(scan(right.as_str())?, *left_column, *right_column)
        }
    };
    Ok(builder)
}
