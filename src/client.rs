//! Connection to the n-gram search service

use crate::{
    config::Config,
    error::Error,
    norm::{NormTable, NormTables},
    progress::ProgressReport,
    query::{Layer, SearchItem, SearchRequest},
    table::{RawRow, Table},
    Ngram, Result, Year, MAX_N,
};
use anyhow::Context;
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeMap, sync::Arc};

/// Search response: n-gram → day → number of occurences
///
/// Frequencies are accepted as any JSON number and truncated to integers.
type SearchResponse = BTreeMap<Ngram, BTreeMap<Box<str>, f64>>;

/// Client of the n-gram search service
///
/// The list of years covered by the corpus and the normalization baselines
/// are downloaded once on [`connect()`](Self::connect), and never change
/// afterwards.
#[derive(Clone, Debug)]
pub struct Client {
    /// Underlying HTTP client
    pub(crate) http: reqwest::Client,

    /// Service configuration
    pub(crate) config: Arc<Config>,

    /// Years covered by the corpus, in decreasing order
    years: Box<[Year]>,

    /// Corpus size baselines
    norms: Arc<NormTables>,

    /// Where progress should be reported, if anywhere
    report: Option<ProgressReport>,
}
//
impl Client {
    /// Connect to the service, fetching the year list and normalization data
    pub async fn connect(config: Arc<Config>) -> Result<Self> {
        let http = reqwest::Client::new();

        let mut years = get_json::<Vec<Year>>(&http, &config, "years")
            .await
            .context("fetching the list of years")?;
        years.sort_unstable_by(|a, b| b.cmp(a));
        log::info!("Corpus covers years {years:?}");

        let norms = get_json::<Vec<NormTable>>(&http, &config, "norm")
            .await
            .context("fetching normalization data")?;
        let norms = NormTables::from_tables(norms).context("decoding normalization data")?;

        Ok(Self {
            http,
            config,
            years: years.into(),
            norms: Arc::new(norms),
            report: None,
        })
    }

    /// Report the progress of multi-year searches
    pub fn with_progress(self, report: ProgressReport) -> Self {
        Self {
            report: Some(report),
            ..self
        }
    }

    /// Years covered by the corpus, in decreasing order
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Corpus size baselines
    pub fn norms(&self) -> &NormTables {
        &self.norms
    }

    /// Order in which years are queried: focus year first, then all other
    /// years in decreasing order
    pub fn focus_order(&self, year: Year) -> Vec<Year> {
        std::iter::once(year)
            .chain(self.years.iter().copied().filter(|&y| y != year))
            .collect()
    }

    /// Search n-grams of 1 to 3 tokens, each given as a (layer, token) pair
    ///
    /// Token positions are assigned in order. If the second token is absent,
    /// the third one is ignored.
    pub async fn search_simple(
        &self,
        year: Year,
        first: (Layer, &str),
        second: Option<(Layer, &str)>,
        third: Option<(Layer, &str)>,
    ) -> Result<Table> {
        let tokens = std::iter::once(first)
            .chain(second.into_iter().chain(third.filter(|_| second.is_some())));
        let items = tokens
            .enumerate()
            .map(|(position, (layer, token))| SearchItem::new(position, layer, token))
            .collect::<Vec<_>>();
        self.search(items.len(), year, &items).await
    }

    /// Search n-grams of length n with arbitrary token constraints
    pub async fn search_advanced(
        &self,
        year: Year,
        n: usize,
        items: &[SearchItem],
    ) -> Result<Table> {
        self.search(n, year, items).await
    }

    /// Recompute the ppm column of a table against baselines for length n
    pub fn normalize(&self, n: usize, table: Table) -> Result<Table> {
        check_n(n)?;
        Ok(table.normalize(n, &self.norms))
    }

    /// Collapse all n-grams of a table into one series named `label`
    pub fn merge_all_results(&self, table: Table, label: &str) -> Table {
        table.merge_all(label, &self.norms)
    }

    /// Query every year, focus year first, and gather normalized results
    async fn search(&self, n: usize, year: Year, items: &[SearchItem]) -> Result<Table> {
        check_n(n)?;
        let years = self.focus_order(year);
        let tracker = (self.report.as_ref())
            .map(|report| report.add_requests("Querying years", years.len()));

        let mut raw_rows = Vec::new();
        for year in years {
            let request = SearchRequest { n, year, items };
            log::debug!("Searching {request:?}");
            let response =
                post_json::<_, SearchResponse>(&self.http, &self.config, "search", &request)
                    .await
                    .with_context(|| format!("searching {n}-grams in year {year}"));
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    if let Some(tracker) = &tracker {
                        tracker.finish();
                    }
                    return Err(e);
                }
            };
            for (ngram, days) in response {
                for (date, frequency) in days {
                    raw_rows.push(RawRow {
                        ngram: ngram.clone(),
                        date,
                        frequency: frequency as u64,
                    });
                }
            }
            if let Some(tracker) = &tracker {
                tracker.make_progress(1);
            }
        }

        log::debug!("Collected {} raw observations", raw_rows.len());
        if raw_rows.is_empty() {
            return Ok(Table::new());
        }
        Ok(Table::from_search_results(n, raw_rows, &self.norms))
    }
}

/// Make sure that the service supports n-grams of length n
fn check_n(n: usize) -> Result<()> {
    if (1..=MAX_N).contains(&n) {
        Ok(())
    } else {
        Err(Error::InvalidN(n).into())
    }
}

/// Send a GET request to some endpoint and decode the JSON response
async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    config: &Config,
    endpoint: &str,
) -> Result<T> {
    let url = config.endpoint(endpoint);
    let response = http
        .get(&url)
        .send()
        .await
        .and_then(Response::error_for_status)
        .with_context(|| format!("requesting {url}"))?;
    response
        .json()
        .await
        .with_context(|| format!("decoding response from {url}"))
}

/// Send a POST request with a JSON body to some endpoint and decode the JSON
/// response
pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
    http: &reqwest::Client,
    config: &Config,
    endpoint: &str,
    body: &B,
) -> Result<T> {
    let url = config.endpoint(endpoint);
    let response = http
        .post(&url)
        .json(body)
        .send()
        .await
        .and_then(Response::error_for_status)
        .with_context(|| format!("posting to {url}"))?;
    response
        .json()
        .await
        .with_context(|| format!("decoding response from {url}"))
}
