//! Client for the OWIDplus LIVE n-gram frequency service
//!
//! The service counts how often word-forms, lemmas or part-of-speech sequences
//! of up to three tokens appear in a daily news corpus. This crate queries it
//! year by year, flattens the answers into a [`Table`] of dated frequencies,
//! normalizes them against the corpus size, and reshapes the result for
//! charting (time buckets, moving averages, Sankey flows).

pub mod client;
pub mod config;
pub mod error;
pub mod granulation;
pub mod lookup;
pub mod norm;
pub mod output;
pub mod progress;
pub mod query;
pub mod sankey;
pub mod table;

pub use crate::{
    client::Client,
    config::Config,
    error::Error,
    granulation::Granulation,
    norm::NormTables,
    query::{Layer, SearchItem},
    sankey::{SankeyData, SankeyLink},
    table::{Row, Table},
};

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Space-separated token sequence, as reported by the service
pub type Ngram = Box<str>;

/// Year of Gregorian Calendar
pub type Year = i16;

/// Longest n-gram that the service can search for
pub const MAX_N: usize = 3;
