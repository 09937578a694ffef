//! Pair labeling: mark which rows of a melted similarity table join two
//! replicates of the same perturbation.

use crate::data::{LabeledTable, SimilarityTable};
use crate::error::Result;

/// Label every pair row as replicate / non-replicate.
///
/// A pair is a group replicate iff ALL columns named in `replicate_groups`
/// are equal between the pair's two sides; a single mismatching column makes
/// the pair a non-replicate. This is a column-adding transform: no rows are
/// dropped or reordered.
///
/// # Arguments
/// * `table` - Melted similarity table.
/// * `replicate_groups` - Base metadata column names identifying replicates
///   (e.g., the perturbation column).
///
/// # Errors
/// `EvalError::MissingColumn` if any requested column is absent from either
/// side of the table; `EvalError::InvalidParameter` if no columns were
/// requested.
pub fn assign_replicates(
    table: &SimilarityTable,
    replicate_groups: &[&str],
) -> Result<LabeledTable> {
    if replicate_groups.is_empty() {
        return Err(crate::error::EvalError::InvalidParameter(
            "replicate_groups must name at least one column".to_string(),
        ));
    }

    let mut sides = Vec::with_capacity(replicate_groups.len());
    for column in replicate_groups {
        let a = table.side_a_column(column)?;
        let b = table.side_b_column(column)?;
        sides.push((a, b));
    }

    let group_replicate: Vec<bool> = (0..table.n_rows())
        .map(|row| sides.iter().all(|(a, b)| a[row] == b[row]))
        .collect();

    Ok(LabeledTable::new(table.clone(), group_replicate))
}
