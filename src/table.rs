//! Tabular search results and the reshaping operations that apply to them
//!
//! Search results are a flat list of `(N-Gram, Date, Frequency,
//! Frequency (ppm))` rows, optionally augmented with the tokens of each
//! n-gram resolved to another annotation layer. Every operation consumes a
//! table and produces a new one, sorted by increasing date.

use crate::{
    norm::{self, NormTables, DATE_FORMAT},
    query::Layer,
    Ngram,
};
use chrono::NaiveDate;
use std::collections::{hash_map, BTreeMap, HashMap, VecDeque};

/// Label given to merged results by default
pub const DEFAULT_MERGE_LABEL: &str = "All";

/// Names of the columns that every table has
pub const BASE_COLUMNS: [&str; 4] = ["N-Gram", "Date", "Frequency", "Frequency (ppm)"];

/// Frequency of an n-gram on some day (or coarser time bucket)
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Space-separated tokens of the n-gram
    pub ngram: Ngram,

    /// Day of the observation, if the service provided a valid date
    pub date: Option<NaiveDate>,

    /// Number of occurences
    ///
    /// This is an integer count as long as no moving average was applied.
    pub frequency: f64,

    /// Occurences per million n-grams recorded on that day
    pub frequency_ppm: f64,

    /// N-gram tokens resolved to the table's lookup layer, if any
    pub resolved: Option<Box<str>>,
}
//
impl Row {
    /// Row without any normalization or lookup data yet
    pub fn new(ngram: impl Into<Ngram>, date: Option<NaiveDate>, frequency: f64) -> Self {
        Self {
            ngram: ngram.into(),
            date,
            frequency,
            frequency_ppm: 0.0,
            resolved: None,
        }
    }

    /// Tokens of the n-gram
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.ngram.split(' ')
    }
}

/// Raw observation from a search response
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RawRow {
    /// N-gram as reported by the service
    pub ngram: Ngram,

    /// Day of the observation in the service's notation
    pub date: Box<str>,

    /// Number of occurences
    pub frequency: u64,
}

/// Search results, sorted by increasing date
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Result rows
    rows: Vec<Row>,

    /// Layer that [`Row::resolved`] refers to, if a lookup was performed
    resolved_layer: Option<Layer>,
}
//
impl Table {
    /// Table without any row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows, which will be sorted by date
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Self {
            rows: rows.into_iter().collect(),
            resolved_layer: None,
        };
        table.sort_by_date();
        table
    }

    /// Normalize raw search results into a table
    ///
    /// Baselines are looked up using the date string exactly as the service
    /// sent it, which is then parsed. Unparseable dates become `None`.
    pub(crate) fn from_search_results(
        n: usize,
        raw_rows: impl IntoIterator<Item = RawRow>,
        norms: &NormTables,
    ) -> Self {
        Self::from_rows(raw_rows.into_iter().map(|raw| {
            let frequency = raw.frequency as f64;
            let frequency_ppm = norm::ppm(frequency, norms.baseline(n, &raw.date));
            let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).ok();
            if date.is_none() {
                log::warn!("Service reported {:?} on unparseable date {:?}", raw.ngram, raw.date);
            }
            Row {
                ngram: raw.ngram,
                date,
                frequency,
                frequency_ppm,
                resolved: None,
            }
        }))
    }

    /// Rows of the table
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Truth that there is no row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Layer of the resolved column, if there is one
    pub fn resolved_layer(&self) -> Option<Layer> {
        self.resolved_layer
    }

    /// Names of the table's columns
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = BASE_COLUMNS.to_vec();
        if let Some(layer) = self.resolved_layer {
            names.push(layer.column_name());
        }
        names
    }

    /// Distinct tokens of all n-grams, in order of first appearance
    pub fn distinct_tokens(&self) -> Vec<&str> {
        let mut seen = HashMap::new();
        for token in self.rows.iter().flat_map(Row::tokens) {
            let next_idx = seen.len();
            seen.entry(token).or_insert(next_idx);
        }
        let mut tokens = seen.into_iter().collect::<Vec<_>>();
        tokens.sort_unstable_by_key(|&(_token, idx)| idx);
        tokens.into_iter().map(|(token, _idx)| token).collect()
    }

    /// Attach a resolved column, computed from each row
    pub(crate) fn with_resolved(
        mut self,
        layer: Layer,
        mut resolve: impl FnMut(&Row) -> Box<str>,
    ) -> Self {
        for row in &mut self.rows {
            row.resolved = Some(resolve(row));
        }
        self.resolved_layer = Some(layer);
        self
    }

    /// Recompute the ppm column using the baselines for n-grams of length n
    ///
    /// Any previous ppm value is discarded, so normalizing twice gives the
    /// same result as normalizing once.
    pub fn normalize(mut self, n: usize, norms: &NormTables) -> Self {
        for row in &mut self.rows {
            let baseline = row.date.and_then(|date| norms.baseline_on(n, date));
            row.frequency_ppm = norm::ppm(row.frequency, baseline);
        }
        self.sort_by_date();
        self
    }

    /// Map each date into a coarser time bucket, then sum frequencies within
    /// each (n-gram, bucket) group
    ///
    /// Rows without a valid date are dropped, and so is the resolved column.
    /// This should be done before applying a moving average, which expects
    /// one row per n-gram and date.
    pub fn granulate(self, mut bucket: impl FnMut(NaiveDate) -> NaiveDate) -> Self {
        let mut groups = BTreeMap::<(NaiveDate, Ngram), (f64, f64)>::new();
        for row in self.rows {
            let Some(date) = row.date else {
                log::trace!("Dropped undated row {row:?} from granulation");
                continue;
            };
            let sums = groups.entry((bucket(date), row.ngram)).or_default();
            sums.0 += row.frequency;
            sums.1 += row.frequency_ppm;
        }
        let rows = groups
            .into_iter()
            .map(|((date, ngram), (frequency, frequency_ppm))| Row {
                ngram,
                date: Some(date),
                frequency,
                frequency_ppm,
                resolved: None,
            })
            .collect();
        Self {
            rows,
            resolved_layer: None,
        }
    }

    /// Replace frequencies with their trailing moving average over
    /// `window_size` observations of the same n-gram
    ///
    /// The first observations of each n-gram are averaged over the points that
    /// are available so far. Windows smaller than 2 leave the table unchanged.
    pub fn moving_average(mut self, window_size: usize) -> Self {
        if window_size < 2 {
            return self;
        }
        self.sort_by_date();

        /// Trailing window of (frequency, ppm) observations for one n-gram
        type Window = VecDeque<(f64, f64)>;
        let mut windows = HashMap::<Ngram, Window>::new();
        for row in &mut self.rows {
            let window = match windows.entry(row.ngram.clone()) {
                hash_map::Entry::Occupied(o) => o.into_mut(),
                hash_map::Entry::Vacant(v) => v.insert(Window::with_capacity(window_size)),
            };
            if window.len() == window_size {
                window.pop_front();
            }
            window.push_back((row.frequency, row.frequency_ppm));
            let len = window.len() as f64;
            let (sum, sum_ppm) = window
                .iter()
                .fold((0.0, 0.0), |(acc, acc_ppm), (freq, ppm)| (acc + freq, acc_ppm + ppm));
            row.frequency = sum / len;
            row.frequency_ppm = sum_ppm / len;
        }
        self
    }

    /// Collapse all n-grams into a single series named `label`
    ///
    /// Frequencies are summed per date and normalized against the unigram
    /// baselines, whatever the length of the original n-grams. Rows without a
    /// valid date are dropped. This must happen before granulation or
    /// smoothing since it changes how rows are grouped.
    pub fn merge_all(self, label: &str, norms: &NormTables) -> Self {
        let mut totals = BTreeMap::<NaiveDate, f64>::new();
        for row in self.rows {
            if let Some(date) = row.date {
                *totals.entry(date).or_default() += row.frequency;
            }
        }
        let label = Ngram::from(label);
        let rows = totals
            .into_iter()
            .map(|(date, frequency)| Row::new(label.clone(), Some(date), frequency));
        Self::from_rows(rows).normalize(1, norms)
    }

    /// Stable sort by increasing date, with undated rows last
    fn sort_by_date(&mut self) {
        self.rows.sort_by_key(|row| (row.date.is_none(), row.date));
    }
}
