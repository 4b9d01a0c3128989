//! Resolution of tokens to another annotation layer (lemmas, POS tags)

use crate::{
    client::{post_json, Client},
    error::Error,
    query::{Layer, LookupRequest},
    table::Table,
    Result, Year,
};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;

/// Token → resolved form
pub type LookupResult = HashMap<Box<str>, Box<str>>;

/// Body of a `POST /lookup` response
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LookupResponse {
    /// Resolved tokens, separated by spaces
    #[serde(default)]
    lookup: String,
}

impl Client {
    /// Resolve the tokens of an n-gram to some layer
    pub async fn lookup_single(
        &self,
        year: Year,
        layer: Layer,
        ngram: &str,
    ) -> Result<LookupResult> {
        let mut tokens = Vec::new();
        for token in ngram.split(' ') {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        self.lookup(year, layer, &tokens).await
    }

    /// Add a column to a table where the tokens of each n-gram are resolved
    /// to some layer
    ///
    /// All distinct tokens of the table are resolved with a single request.
    pub async fn lookup_table(&self, year: Year, layer: Layer, table: Table) -> Result<Table> {
        let resolved = {
            let tokens = table.distinct_tokens();
            if tokens.is_empty() {
                LookupResult::new()
            } else {
                self.lookup(year, layer, &tokens).await?
            }
        };
        Ok(table.with_resolved(layer, |row| {
            row.tokens()
                .map(|token| resolved.get(token).map_or(token, |r| &**r))
                .collect::<Vec<_>>()
                .join(" ")
                .into()
        }))
    }

    /// Resolve a list of distinct tokens
    async fn lookup(&self, year: Year, layer: Layer, tokens: &[&str]) -> Result<LookupResult> {
        let request = LookupRequest {
            layer,
            year,
            query: tokens.join(" "),
        };
        log::debug!("Looking up {request:?}");
        let response = post_json::<_, LookupResponse>(&self.http, &self.config, "lookup", &request)
            .await
            .with_context(|| format!("looking up {} tokens in layer {layer}", tokens.len()))?;
        pair_resolved(tokens, &response.lookup)
    }
}

/// Pair each sent token with its resolved form
///
/// The service must resolve every token, so a token count mismatch is an
/// error rather than something that we try to recover from.
fn pair_resolved(tokens: &[&str], resolved: &str) -> Result<LookupResult> {
    let resolved = resolved.split(' ').collect::<Vec<_>>();
    if resolved.len() != tokens.len() {
        log::error!("Lookup of {tokens:?} was answered with {resolved:?}");
        return Err(Error::InconsistentLookup {
            sent: tokens.len(),
            received: resolved.len(),
        }
        .into());
    }
    Ok(tokens
        .iter()
        .zip(resolved)
        .map(|(&token, resolved)| (token.into(), resolved.into()))
        .collect())
}
