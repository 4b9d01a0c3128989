//! Command-line front-end to the OWIDplus LIVE n-gram service
//!
//! Searches an n-gram across all years of the corpus, optionally reshapes the
//! results, and prints them as CSV (or as a Sankey graph in JSON) on stdout.

use anyhow::Context;
use clap::Parser;
use dialoguer::FuzzySelect;
use log::LevelFilter;
use owid_timeline::{
    config::DEFAULT_BASE_URL, output, progress::ProgressReport, table::DEFAULT_MERGE_LABEL, Client,
    Config, Granulation, Layer, Result, SankeyData, SearchItem, Year, MAX_N,
};
use std::str::FromStr;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Track word usage over time in the OWIDplus LIVE news corpus
///
/// Every year of the corpus is searched, starting with the focus year, and
/// frequencies are reported per day, both as raw counts and in parts per
/// million of the n-grams recorded that day.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Tokens of the searched n-gram (1 to 3), e.g. "lemma:Hund" or "pos:VVFIN"
    ///
    /// Tokens without a layer prefix are matched as word-forms.
    #[arg(required = true, num_args = 1..=3)]
    tokens: Vec<QueryToken>,

    /// Focus year, which is searched first
    ///
    /// Will interactively prompt for one of the corpus years if not specified.
    #[arg(short, long)]
    year: Option<Year>,

    /// Base URL of the API
    #[arg(long, env = "OWID_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Box<str>,

    /// Time resolution of the output: date, week, month, quarter or year
    #[arg(short, long)]
    granulation: Option<Granulation>,

    /// Width of the trailing moving average applied to each n-gram's series
    ///
    /// Values below 2 disable smoothing.
    #[arg(short, long, default_value = "1")]
    moving_average: usize,

    /// Sum all matching n-grams into a single series with this label
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_MERGE_LABEL)]
    merge: Option<Box<str>>,

    /// Add a column where tokens are resolved to this layer (lemma or pos)
    #[arg(short, long)]
    lookup: Option<Layer>,

    /// Print the token flow graph of the results as JSON instead of a table
    ///
    /// Only available for 2- and 3-token searches.
    #[arg(long, default_value_t = false, conflicts_with_all = ["merge", "lookup"])]
    sankey: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        let args = Args::parse();
        anyhow::ensure!(
            args.tokens.len() <= MAX_N,
            "the service can only search n-grams of up to {MAX_N} tokens"
        );
        anyhow::ensure!(
            !args.sankey || args.tokens.len() >= 2,
            "Sankey diagrams need a search of 2 or 3 tokens"
        );
        Ok(args)
    }

    /// Search items for the requested tokens
    pub fn search_items(&self) -> Vec<SearchItem> {
        (self.tokens.iter().enumerate())
            .map(|(position, QueryToken(layer, token))| {
                SearchItem::new(position, *layer, token.clone())
            })
            .collect()
    }
}

/// Token of the searched n-gram, with the layer it is matched against
#[derive(Clone, Debug)]
struct QueryToken(Layer, Box<str>);
//
impl FromStr for QueryToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some((prefix, token)) = s.split_once(':') {
            match prefix.parse() {
                Ok(layer) => return Ok(Self(layer, token.into())),
                Err(e) => log::warn!("Searching {s:?} as a word-form: {e}"),
            }
        }
        Ok(Self(Layer::WordForm, s.into()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;

    // Connect to the service
    let config = Config::new(&args.base_url);
    let report = ProgressReport::new();
    let client = Client::connect(config)
        .await
        .context("connecting to the n-gram service")?
        .with_progress(report);

    // Pick a focus year
    let year = match args.year {
        Some(year) => year,
        None => prompt_year(client.years())?,
    };

    // Run the search
    let items = args.search_items();
    let n = items.len();
    let mut table = client.search_advanced(year, n, &items).await?;
    log::info!("Search for {items:?} returned {} rows", table.len());

    // Reshape the results, merging first since it changes row grouping
    if let Some(label) = &args.merge {
        table = client.merge_all_results(table, label);
    }
    if let Some(granulation) = args.granulation {
        table = table.granulate(granulation.bucket_fn());
    }
    table = table.moving_average(args.moving_average);

    // Emit the results
    let mut stdout = BufWriter::new(tokio::io::stdout());
    if args.sankey {
        let sankey = SankeyData::from_table(n, &table)?;
        let json = serde_json::to_vec_pretty(&sankey).context("serializing Sankey data")?;
        stdout.write_all(&json).await?;
        stdout.write_all(b"\n").await?;
    } else {
        if let Some(layer) = args.lookup {
            table = client.lookup_table(year, layer, table).await?;
        }
        output::write_csv(&table, &mut stdout).await?;
    }
    stdout.flush().await?;
    Ok(())
}

/// Ask the user to select a focus year
fn prompt_year(years: &[Year]) -> Result<Year> {
    anyhow::ensure!(!years.is_empty(), "the service did not report any year");
    let year_names = years.iter().map(Year::to_string).collect::<Vec<_>>();
    let year_idx = FuzzySelect::new()
        .with_prompt("Which year should be searched first?")
        .items(&year_names)
        .default(0)
        .interact()
        .context("prompting for a focus year")?;
    Ok(years[year_idx])
}

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
