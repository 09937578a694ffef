//! Similarity table extended with replicate labels.

use crate::data::table::SimilarityTable;

/// A [`SimilarityTable`] with one boolean replicate label per pair row.
///
/// Produced by [`crate::operations::assign_replicates`]; the label is true
/// iff the two profiles of the pair share the same replicate-group key.
#[derive(Debug, Clone)]
pub struct LabeledTable {
    table: SimilarityTable,
    group_replicate: Vec<bool>,
}

impl LabeledTable {
    pub(crate) fn new(table: SimilarityTable, group_replicate: Vec<bool>) -> Self {
        debug_assert_eq!(table.n_rows(), group_replicate.len());
        Self {
            table,
            group_replicate,
        }
    }

    /// The underlying melted similarity table.
    pub fn table(&self) -> &SimilarityTable {
        &self.table
    }

    /// Replicate labels, one per pair row.
    pub fn group_replicate(&self) -> &[bool] {
        &self.group_replicate
    }

    /// Number of pair rows.
    pub fn n_rows(&self) -> usize {
        self.table.n_rows()
    }

    /// Number of rows labeled as replicate pairs.
    ///
    /// Counts ordered rows, so with a mirrored table this is twice the
    /// number of unordered replicate pairs.
    pub fn n_replicate_pairs(&self) -> usize {
        self.group_replicate.iter().filter(|&&r| r).count()
    }
}
