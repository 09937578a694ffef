//! Replicate-retrieval quality metrics for pairwise similarity matrices.
//!
//! Given a precomputed similarity matrix between biological sample profiles
//! in long ("melted") form, this library measures how well replicate
//! profiles (same perturbation) rank above non-replicate pairs.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (SimilarityTable, LabeledTable, result tables)
//! - **operations**: The evaluation operations (assign_replicates,
//!   precision_recall, enrichment)
//! - **stats**: Statistical primitives (quantile, rank metrics, Fisher exact test)
//!
//! # Example
//!
//! ```no_run
//! use replicate_eval::prelude::*;
//!
//! // Load a melted similarity table produced upstream
//! let table = SimilarityTable::from_tsv("similarity_melted.tsv").unwrap();
//!
//! // Precision/recall at k = 5 and 10 per sample, plus average precision
//! let (pr, ap) = precision_recall(
//!     &table,
//!     &["Metadata_perturbation"],
//!     &["Metadata_sample"],
//!     vec![5, 10].into(),
//! )
//! .unwrap();
//!
//! // Global enrichment of replicates above the 90th similarity percentile
//! let enr = enrichment(&table, &["Metadata_perturbation"], &[0.9]).unwrap();
//!
//! pr.to_tsv("precision_recall.tsv").unwrap();
//! ap.to_tsv("average_precision.tsv").unwrap();
//! enr.to_tsv("enrichment.tsv").unwrap();
//! ```

pub mod data;
pub mod error;
pub mod operations;
pub mod stats;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        AveragePrecisionRow, AveragePrecisionTable, EnrichmentRow, EnrichmentTable, KParam,
        LabeledTable, PrecisionRecallRow, PrecisionRecallTable, RankCutoff, SimilarityTable,
    };
    pub use crate::error::{EvalError, Result};
    pub use crate::operations::{assign_replicates, enrichment, precision_recall};
    pub use crate::stats::{
        average_precision, fisher_exact_greater, precision_at_natural, precision_recall_at,
        quantile, FisherResult,
    };
}
