//! Data structures for similarity-table evaluation.

mod labeled;
mod result;
mod table;

pub use labeled::LabeledTable;
pub use result::{
    AveragePrecisionRow, AveragePrecisionTable, EnrichmentRow, EnrichmentTable, KParam,
    PrecisionRecallRow, PrecisionRecallTable, RankCutoff,
};
pub use table::{
    SimilarityTable, PAIR_A_INDEX_COL, PAIR_A_SUFFIX, PAIR_B_INDEX_COL, PAIR_B_SUFFIX,
    SIMILARITY_METRIC_COL,
};
