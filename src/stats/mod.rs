//! Statistical primitives: quantiles, rank metrics, and the Fisher exact test.

mod fisher;
mod quantile;
mod ranking;

pub use fisher::{fisher_exact_greater, FisherResult};
pub use quantile::quantile;
pub use ranking::{average_precision, precision_at_natural, precision_recall_at};
