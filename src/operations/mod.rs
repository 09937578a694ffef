//! Evaluation operations over melted similarity tables.

mod enrichment;
mod precision_recall;
mod replicates;

pub use enrichment::enrichment;
pub use precision_recall::precision_recall;
pub use replicates::assign_replicates;
