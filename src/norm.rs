//! Corpus size baselines used to normalize raw frequencies
//!
//! For each n-gram length, the service publishes the total number of n-grams
//! that were recorded on each day. Dividing a raw frequency by this total gives
//! a rate that can be compared across days of very different corpus sizes.

use crate::{error::Error, Result, MAX_N};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Day → total number of n-grams recorded on that day
pub type NormTable = BTreeMap<Box<str>, u64>;

/// Format of the dates used as keys by the service
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Baselines for each supported n-gram length
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NormTables([NormTable; MAX_N]);
//
impl NormTables {
    /// Build from the tables returned by `GET /norm`, in increasing n order
    pub fn from_tables(tables: Vec<NormTable>) -> Result<Self> {
        let num_tables = tables.len();
        let tables: [NormTable; MAX_N] = tables
            .try_into()
            .map_err(|_| Error::MalformedNorm(num_tables))?;
        Ok(Self(tables))
    }

    /// Baselines for n-grams of length n, if supported
    pub fn table(&self, n: usize) -> Option<&NormTable> {
        n.checked_sub(1).and_then(|idx| self.0.get(idx))
    }

    /// Total number of n-grams of length n that were recorded on some day
    ///
    /// The day is given in the service's `YYYY-MM-DD` notation. Unsupported
    /// lengths have no baseline.
    pub fn baseline(&self, n: usize, date: &str) -> Option<u64> {
        self.table(n)?.get(date).copied()
    }

    /// Like [`baseline()`](Self::baseline), but for a parsed date
    pub fn baseline_on(&self, n: usize, date: NaiveDate) -> Option<u64> {
        self.baseline(n, &date.format(DATE_FORMAT).to_string())
    }
}

/// Turn a raw frequency into parts per million of some baseline
///
/// A missing or zero baseline yields a rate of 0 rather than a division error.
pub fn ppm(frequency: f64, baseline: Option<u64>) -> f64 {
    match baseline {
        Some(total) if total > 0 => frequency / total as f64 * 1_000_000.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, u64)]) -> NormTable {
        entries.iter().map(|&(d, c)| (d.into(), c)).collect()
    }

    #[test]
    fn one_table_per_ngram_length() {
        let norms = NormTables::from_tables(vec![
            table(&[("2022-01-01", 1_000)]),
            table(&[("2022-01-01", 900)]),
            table(&[("2022-01-01", 800)]),
        ])
        .unwrap();
        assert_eq!(norms.baseline(1, "2022-01-01"), Some(1_000));
        assert_eq!(norms.baseline(3, "2022-01-01"), Some(800));
        assert_eq!(norms.baseline(2, "2022-01-02"), None);
        assert_eq!(
            norms.baseline_on(2, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()),
            Some(900)
        );
        assert!(norms.table(0).is_none());
        assert!(norms.table(4).is_none());
    }

    #[test]
    fn wrong_table_count_is_rejected() {
        let err = NormTables::from_tables(vec![NormTable::new(), NormTable::new()]).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::MalformedNorm(2)));
    }

    #[test]
    fn zero_baseline_yields_zero_rate() {
        assert_eq!(ppm(42.0, Some(0)), 0.0);
        assert_eq!(ppm(42.0, None), 0.0);
        assert_eq!(ppm(3.0, Some(2_000_000)), 1.5);
    }
}
