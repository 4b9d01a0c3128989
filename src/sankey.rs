//! Token flow graphs for Sankey diagrams
//!
//! Each bigram or trigram of a table is seen as a path through its tokens.
//! Tokens become nodes, consecutive tokens become links, and links are
//! weighted by the summed ppm frequency of the n-grams that go through them.

use crate::{error::Error, table::Table, Result};
use serde::Serialize;
use std::collections::{hash_map, HashMap};

/// Flow between two tokens
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SankeyLink {
    /// Index of the preceding token in [`SankeyData::nodes`]
    pub source: usize,

    /// Index of the following token in [`SankeyData::nodes`]
    pub target: usize,

    /// Summed ppm frequency of the n-grams going through this link
    pub value: f64,
}

/// Nodes and links of a Sankey diagram
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SankeyData {
    /// Distinct tokens, in order of first appearance
    pub nodes: Vec<Box<str>>,

    /// Links between tokens, in order of first appearance
    pub links: Vec<SankeyLink>,
}
//
impl SankeyData {
    /// Build the token flow graph of a table of n-grams of length n
    ///
    /// Only n = 2 and n = 3 are supported. Rows whose n-gram does not have
    /// exactly n tokens (e.g. merged results) are ignored. A table where no
    /// row qualifies is an error.
    pub fn from_table(n: usize, table: &Table) -> Result<Self> {
        if !(2..=3).contains(&n) {
            return Err(Error::InvalidSankeyN(n).into());
        }

        let mut node_indices = HashMap::<&str, usize>::new();
        let mut nodes = Vec::<Box<str>>::new();
        let mut link_indices = HashMap::<(usize, usize), usize>::new();
        let mut links = Vec::<SankeyLink>::new();
        for row in table.rows() {
            let tokens = row.tokens().collect::<Vec<_>>();
            if tokens.len() != n {
                log::trace!("Skipped {:?} which is not a {n}-gram", row.ngram);
                continue;
            }

            // Assign node indices in order of first appearance
            let indices = tokens
                .iter()
                .map(|&token| match node_indices.entry(token) {
                    hash_map::Entry::Occupied(o) => *o.get(),
                    hash_map::Entry::Vacant(v) => {
                        nodes.push(token.into());
                        *v.insert(nodes.len() - 1)
                    }
                })
                .collect::<Vec<_>>();

            // Accumulate ppm frequency along each link of the path
            for pair in indices.windows(2) {
                let (source, target) = (pair[0], pair[1]);
                match link_indices.entry((source, target)) {
                    hash_map::Entry::Occupied(o) => links[*o.get()].value += row.frequency_ppm,
                    hash_map::Entry::Vacant(v) => {
                        v.insert(links.len());
                        links.push(SankeyLink {
                            source,
                            target,
                            value: row.frequency_ppm,
                        });
                    }
                }
            }
        }

        if links.is_empty() {
            return Err(Error::EmptySankey.into());
        }
        Ok(Self { nodes, links })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::row;

    fn link(source: usize, target: usize, value: f64) -> SankeyLink {
        SankeyLink {
            source,
            target,
            value,
        }
    }

    #[test]
    fn links_accumulate_ppm_frequencies() {
        let table = Table::from_rows([
            row("a b", "2022-01-01", 10.0, 1.0),
            row("a b", "2022-01-02", 20.0, 2.0),
            row("b c", "2022-01-03", 30.0, 3.0),
        ]);
        let sankey = SankeyData::from_table(2, &table).unwrap();
        let nodes = sankey.nodes.iter().map(|n| &**n).collect::<Vec<_>>();
        assert_eq!(nodes, ["a", "b", "c"]);
        assert_eq!(sankey.links, [link(0, 1, 3.0), link(1, 2, 3.0)]);
    }

    #[test]
    fn trigrams_make_two_links_and_misfits_are_skipped() {
        let table = Table::from_rows([
            row("der Hund lief", "2022-01-01", 1.0, 0.5),
            row("All", "2022-01-01", 1.0, 9.0),
            row("der Hund", "2022-01-01", 1.0, 9.0),
            row("die Katze lief", "2022-01-02", 1.0, 0.25),
        ]);
        let sankey = SankeyData::from_table(3, &table).unwrap();
        let nodes = sankey.nodes.iter().map(|n| &**n).collect::<Vec<_>>();
        assert_eq!(nodes, ["der", "Hund", "lief", "die", "Katze"]);
        assert_eq!(
            sankey.links,
            [
                link(0, 1, 0.5),
                link(1, 2, 0.5),
                link(3, 4, 0.25),
                link(4, 2, 0.25)
            ]
        );
    }

    #[test]
    fn unsupported_lengths_are_rejected() {
        let table = Table::from_rows([row("a", "2022-01-01", 1.0, 1.0)]);
        for n in [0, 1, 4] {
            let err = SankeyData::from_table(n, &table).unwrap_err();
            assert_eq!(err.downcast_ref::<Error>(), Some(&Error::InvalidSankeyN(n)));
        }
    }

    #[test]
    fn no_matching_row_is_an_error() {
        let table = Table::from_rows([row("All", "2022-01-01", 1.0, 1.0)]);
        let err = SankeyData::from_table(2, &table).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptySankey));
        let err = SankeyData::from_table(2, &Table::new()).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptySankey));
    }
}
