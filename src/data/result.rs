//! Result tables for the retrieval and enrichment metrics.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Requested rank cutoff(s) for precision/recall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KParam {
    /// One or more fixed integer cutoffs, evaluated independently.
    Fixed(Vec<usize>),
    /// Natural cutoff: use each group's replicate count R.
    Natural,
}

impl From<usize> for KParam {
    fn from(k: usize) -> Self {
        KParam::Fixed(vec![k])
    }
}

impl From<Vec<usize>> for KParam {
    fn from(ks: Vec<usize>) -> Self {
        KParam::Fixed(ks)
    }
}

/// The cutoff a precision/recall row was evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankCutoff {
    /// Fixed cutoff of k rows.
    #[serde(rename = "k")]
    K(usize),
    /// Natural cutoff at the group's replicate count.
    #[serde(rename = "R")]
    R(usize),
}

impl RankCutoff {
    /// The numeric cutoff value.
    pub fn value(&self) -> usize {
        match self {
            RankCutoff::K(k) => *k,
            RankCutoff::R(r) => *r,
        }
    }

    /// Column name for this cutoff mode ("k" or "R").
    pub fn column_name(&self) -> &'static str {
        match self {
            RankCutoff::K(_) => "k",
            RankCutoff::R(_) => "R",
        }
    }
}

/// Precision and recall for one group at one cutoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionRecallRow {
    /// Group key values, one per groupby column.
    pub group_key: Vec<String>,
    /// Cutoff this row was evaluated at.
    pub cutoff: RankCutoff,
    /// Fraction of the top-cutoff rows that are replicates.
    pub precision: f64,
    /// Fraction of all replicates within the top-cutoff rows.
    /// `None` in the natural-cutoff mode, NaN for groups with no replicates.
    pub recall: Option<f64>,
}

/// Precision/recall results for all groups and cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionRecallTable {
    /// Groupby column names (unsuffixed), aligned with each row's key.
    pub groupby_columns: Vec<String>,
    /// Per-(group, cutoff) rows.
    pub rows: Vec<PrecisionRecallRow>,
}

impl PrecisionRecallTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the row for a specific group key and cutoff value.
    pub fn get(&self, group_key: &[&str], cutoff: usize) -> Option<&PrecisionRecallRow> {
        self.rows
            .iter()
            .find(|r| r.group_key == group_key && r.cutoff.value() == cutoff)
    }

    /// Write results to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // The natural-cutoff mode reports no recall, so it drops the column.
        let natural = matches!(self.rows.first(), Some(r) if matches!(r.cutoff, RankCutoff::R(_)));
        let cutoff_col = self
            .rows
            .first()
            .map(|r| r.cutoff.column_name())
            .unwrap_or("k");
        if natural {
            writeln!(
                writer,
                "{}\t{}\tprecision",
                self.groupby_columns.join("\t"),
                cutoff_col
            )?;
        } else {
            writeln!(
                writer,
                "{}\t{}\tprecision\trecall",
                self.groupby_columns.join("\t"),
                cutoff_col
            )?;
        }
        for r in &self.rows {
            match r.recall {
                Some(recall) if !natural => writeln!(
                    writer,
                    "{}\t{}\t{:.6}\t{:.6}",
                    r.group_key.join("\t"),
                    r.cutoff.value(),
                    r.precision,
                    recall
                )?,
                _ => writeln!(
                    writer,
                    "{}\t{}\t{:.6}",
                    r.group_key.join("\t"),
                    r.cutoff.value(),
                    r.precision
                )?,
            }
        }
        Ok(())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Average precision for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AveragePrecisionRow {
    /// Group key values, one per groupby column.
    pub group_key: Vec<String>,
    /// Average precision over the full ranking; NaN for groups with no
    /// replicates.
    pub average_precision: f64,
}

/// Average precision results for all groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AveragePrecisionTable {
    /// Groupby column names (unsuffixed), aligned with each row's key.
    pub groupby_columns: Vec<String>,
    /// Per-group rows.
    pub rows: Vec<AveragePrecisionRow>,
}

impl AveragePrecisionTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the row for a specific group key.
    pub fn get(&self, group_key: &[&str]) -> Option<&AveragePrecisionRow> {
        self.rows.iter().find(|r| r.group_key == group_key)
    }

    /// Mean average precision over all groups with defined AP.
    pub fn mean_average_precision(&self) -> f64 {
        let defined: Vec<f64> = self
            .rows
            .iter()
            .map(|r| r.average_precision)
            .filter(|ap| !ap.is_nan())
            .collect();
        if defined.is_empty() {
            return f64::NAN;
        }
        defined.iter().sum::<f64>() / defined.len() as f64
    }

    /// Write results to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{}\taverage_precision",
            self.groupby_columns.join("\t")
        )?;
        for r in &self.rows {
            writeln!(
                writer,
                "{}\t{:.6}",
                r.group_key.join("\t"),
                r.average_precision
            )?;
        }
        Ok(())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Enrichment test result for one percentile threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentRow {
    /// Requested similarity percentile in [0, 1].
    pub enrichment_percentile: f64,
    /// Similarity value at that percentile.
    pub threshold: f64,
    /// Sample odds ratio of the replicate-above-threshold contingency table.
    pub odds_ratio: f64,
    /// One-sided ("greater") Fisher exact p-value.
    pub p_value: f64,
}

/// Enrichment results across percentile thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentTable {
    /// One row per requested percentile.
    pub rows: Vec<EnrichmentRow>,
}

impl EnrichmentTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row with the largest odds ratio.
    pub fn most_enriched(&self) -> Option<&EnrichmentRow> {
        self.rows
            .iter()
            .filter(|r| !r.odds_ratio.is_nan())
            .max_by(|a, b| a.odds_ratio.total_cmp(&b.odds_ratio))
    }

    /// Write results to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "enrichment_percentile\tthreshold\todds_ratio\tp_value"
        )?;
        for r in &self.rows {
            writeln!(
                writer,
                "{}\t{:.6}\t{:.4}\t{:.4e}",
                r.enrichment_percentile, r.threshold, r.odds_ratio, r.p_value
            )?;
        }
        Ok(())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
