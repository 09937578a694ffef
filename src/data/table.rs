//! Melted similarity table: the long-form pairwise input contract.

use crate::error::{EvalError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Suffix distinguishing side-A metadata columns.
pub const PAIR_A_SUFFIX: &str = "_pair_a";
/// Suffix distinguishing side-B metadata columns.
pub const PAIR_B_SUFFIX: &str = "_pair_b";
/// Column holding the side-A profile index.
pub const PAIR_A_INDEX_COL: &str = "pair_a_index";
/// Column holding the side-B profile index.
pub const PAIR_B_INDEX_COL: &str = "pair_b_index";
/// Column holding the pairwise similarity score.
pub const SIMILARITY_METRIC_COL: &str = "similarity_metric";

/// An elongated symmetric similarity matrix: one row per ordered pair of
/// profiles, with the metadata of both profiles duplicated under suffixed
/// column names.
///
/// The upstream melt guarantees no self-pairs and that the mirrored rows
/// `(x,y)` and `(y,x)` carry the same similarity value; [`SimilarityTable::validate`]
/// checks the parts of that contract that can be verified cheaply.
#[derive(Debug, Clone)]
pub struct SimilarityTable {
    /// Base (unsuffixed) metadata column names.
    metadata_columns: Vec<String>,
    /// Side-A metadata values, keyed by base column name.
    side_a: HashMap<String, Vec<String>>,
    /// Side-B metadata values, keyed by base column name.
    side_b: HashMap<String, Vec<String>>,
    /// Side-A profile indices.
    pair_a_index: Vec<usize>,
    /// Side-B profile indices.
    pair_b_index: Vec<usize>,
    /// Pairwise similarity scores.
    similarity: Vec<f64>,
}

impl SimilarityTable {
    /// Create an empty table with the given metadata columns.
    pub fn new(metadata_columns: &[&str]) -> Self {
        let metadata_columns: Vec<String> =
            metadata_columns.iter().map(|s| s.to_string()).collect();
        let side_a = metadata_columns
            .iter()
            .map(|c| (c.clone(), Vec::new()))
            .collect();
        let side_b = metadata_columns
            .iter()
            .map(|c| (c.clone(), Vec::new()))
            .collect();
        Self {
            metadata_columns,
            side_a,
            side_b,
            pair_a_index: Vec::new(),
            pair_b_index: Vec::new(),
            similarity: Vec::new(),
        }
    }

    /// Append one ordered pair.
    ///
    /// `a_values` and `b_values` must supply one value per metadata column,
    /// in the order given to [`SimilarityTable::new`].
    pub fn push_pair(
        &mut self,
        a_index: usize,
        b_index: usize,
        a_values: &[&str],
        b_values: &[&str],
        similarity: f64,
    ) -> Result<()> {
        if a_values.len() != self.metadata_columns.len()
            || b_values.len() != self.metadata_columns.len()
        {
            return Err(EvalError::InvalidTable(format!(
                "Expected {} metadata values per side, got {} (A) / {} (B)",
                self.metadata_columns.len(),
                a_values.len(),
                b_values.len()
            )));
        }
        for (col, (&a, &b)) in self
            .metadata_columns
            .iter()
            .zip(a_values.iter().zip(b_values.iter()))
        {
            self.side_a.get_mut(col).unwrap().push(a.to_string());
            self.side_b.get_mut(col).unwrap().push(b.to_string());
        }
        self.pair_a_index.push(a_index);
        self.pair_b_index.push(b_index);
        self.similarity.push(similarity);
        Ok(())
    }

    /// Load a melted similarity table from a TSV file.
    ///
    /// Expected header: `pair_a_index`, `pair_b_index`, `similarity_metric`,
    /// plus `<name>_pair_a` / `<name>_pair_b` pairs for every metadata column.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        for required in [PAIR_A_INDEX_COL, PAIR_B_INDEX_COL, SIMILARITY_METRIC_COL] {
            if !headers.iter().any(|h| h == required) {
                return Err(EvalError::InvalidTable(format!(
                    "Melted table is missing required column '{}'",
                    required
                )));
            }
        }

        // Base metadata columns are recovered from the side-A suffix; each
        // must have a matching side-B column.
        let mut metadata_columns = Vec::new();
        for h in &headers {
            if let Some(base) = h.strip_suffix(PAIR_A_SUFFIX) {
                let b_name = format!("{}{}", base, PAIR_B_SUFFIX);
                if !headers.iter().any(|h| *h == b_name) {
                    return Err(EvalError::InvalidTable(format!(
                        "Column '{}' has no matching '{}'",
                        h, b_name
                    )));
                }
                metadata_columns.push(base.to_string());
            }
        }

        let col_idx: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        let base_refs: Vec<&str> = metadata_columns.iter().map(|s| s.as_str()).collect();
        let mut table = Self::new(&base_refs);

        for record in reader.records() {
            let record = record?;
            let field = |name: &str| -> Result<&str> {
                record
                    .get(col_idx[name])
                    .ok_or_else(|| EvalError::InvalidTable(format!("Short row, missing '{}'", name)))
            };

            let a_index: usize = field(PAIR_A_INDEX_COL)?.trim().parse().map_err(|_| {
                EvalError::InvalidTable(format!("Non-integer '{}'", PAIR_A_INDEX_COL))
            })?;
            let b_index: usize = field(PAIR_B_INDEX_COL)?.trim().parse().map_err(|_| {
                EvalError::InvalidTable(format!("Non-integer '{}'", PAIR_B_INDEX_COL))
            })?;
            let similarity: f64 = field(SIMILARITY_METRIC_COL)?.trim().parse().map_err(|_| {
                EvalError::InvalidTable(format!("Non-numeric '{}'", SIMILARITY_METRIC_COL))
            })?;

            let mut a_values = Vec::with_capacity(metadata_columns.len());
            let mut b_values = Vec::with_capacity(metadata_columns.len());
            for base in &metadata_columns {
                a_values.push(field(&format!("{}{}", base, PAIR_A_SUFFIX))?);
                b_values.push(field(&format!("{}{}", base, PAIR_B_SUFFIX))?);
            }
            table.push_pair(a_index, b_index, &a_values, &b_values, similarity)?;
        }

        if table.n_rows() == 0 {
            return Err(EvalError::EmptyData("No pairs in melted table".to_string()));
        }
        Ok(table)
    }

    /// Number of pair rows.
    pub fn n_rows(&self) -> usize {
        self.similarity.len()
    }

    /// Base (unsuffixed) metadata column names.
    pub fn metadata_columns(&self) -> &[String] {
        &self.metadata_columns
    }

    /// Similarity scores, one per row.
    pub fn similarity(&self) -> &[f64] {
        &self.similarity
    }

    /// Side-A profile indices.
    pub fn pair_a_index(&self) -> &[usize] {
        &self.pair_a_index
    }

    /// Side-B profile indices.
    pub fn pair_b_index(&self) -> &[usize] {
        &self.pair_b_index
    }

    /// Check whether a base metadata column exists (on both sides).
    pub fn has_column(&self, column: &str) -> bool {
        self.metadata_columns.contains(&column.to_string())
    }

    /// Side-A values for a base metadata column.
    pub fn side_a_column(&self, column: &str) -> Result<&[String]> {
        self.side_a
            .get(column)
            .map(|v| v.as_slice())
            .ok_or_else(|| EvalError::MissingColumn(format!("{}{}", column, PAIR_A_SUFFIX)))
    }

    /// Side-B values for a base metadata column.
    pub fn side_b_column(&self, column: &str) -> Result<&[String]> {
        self.side_b
            .get(column)
            .map(|v| v.as_slice())
            .ok_or_else(|| EvalError::MissingColumn(format!("{}{}", column, PAIR_B_SUFFIX)))
    }

    /// Validate the melted-table shape contract.
    ///
    /// Checks that the table is non-empty, carries at least one metadata
    /// column, contains no self-pairs, and has finite similarity scores.
    pub fn validate(&self) -> Result<()> {
        if self.n_rows() == 0 {
            return Err(EvalError::EmptyData(
                "Similarity table has no rows".to_string(),
            ));
        }
        if self.metadata_columns.is_empty() {
            return Err(EvalError::InvalidTable(
                "Similarity table has no metadata columns".to_string(),
            ));
        }
        for (i, (&a, &b)) in self
            .pair_a_index
            .iter()
            .zip(self.pair_b_index.iter())
            .enumerate()
        {
            if a == b {
                return Err(EvalError::InvalidTable(format!(
                    "Self-pair at row {} (profile index {})",
                    i, a
                )));
            }
        }
        for (i, &s) in self.similarity.iter().enumerate() {
            if !s.is_finite() {
                return Err(EvalError::InvalidTable(format!(
                    "Non-finite similarity at row {}",
                    i
                )));
            }
        }
        Ok(())
    }
}
