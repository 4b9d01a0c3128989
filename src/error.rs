//! Failures that callers may want to tell apart
//!
//! Everything else (transport errors, HTTP error statuses, undecodable
//! bodies) goes through [`anyhow`] with some context attached. These errors
//! are wrapped the same way, and can be recovered with
//! [`anyhow::Error::downcast_ref()`].

/// Error conditions with a meaning of their own
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The lookup service did not resolve as many tokens as we sent
    #[error("inconsistent lookup result: sent {sent} tokens, received {received}")]
    InconsistentLookup {
        /// Number of tokens in the query
        sent: usize,

        /// Number of tokens in the answer
        received: usize,
    },

    /// Sankey diagrams only make sense for bigrams and trigrams
    #[error("n must be 2 or 3 for a Sankey diagram, got {0}")]
    InvalidSankeyN(usize),

    /// No row of the table could be turned into a Sankey link
    #[error("no ngram of the expected length to build a Sankey diagram from")]
    EmptySankey,

    /// The service only supports 1- to 3-grams
    #[error("n must be between 1 and 3, got {0}")]
    InvalidN(usize),

    /// The normalization data does not have one table per ngram length
    #[error("expected 3 normalization tables, got {0}")]
    MalformedNorm(usize),
}
