//! Precision/recall orchestration across replicate groups and rank cutoffs.

use crate::data::{
    AveragePrecisionRow, AveragePrecisionTable, KParam, PrecisionRecallRow, PrecisionRecallTable,
    RankCutoff, SimilarityTable,
};
use crate::error::{EvalError, Result};
use crate::operations::replicates::assign_replicates;
use crate::stats::{average_precision, precision_at_natural, precision_recall_at};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Precision/recall at k and average precision for every groupby group.
///
/// Labels the table once, sorts it globally by descending similarity (ties
/// broken by ascending pair indices so results are deterministic), then
/// partitions rows by the side-A values of `groupby_columns` and evaluates
/// each group independently. Fixed cutoffs are evaluated per requested `k`
/// and unioned into one table, k-major; average precision is computed once
/// per group regardless of `k`.
///
/// # Arguments
/// * `table` - Melted similarity table.
/// * `replicate_groups` - Metadata columns defining replicate identity.
/// * `groupby_columns` - Metadata columns partitioning rows into per-sample
///   groups (matched against side A).
/// * `k` - Fixed cutoff(s), or [`KParam::Natural`] for precision at R.
///
/// # Returns
/// The per-(group, cutoff) precision/recall table and the per-group average
/// precision table. Group keys use the original unsuffixed column names.
pub fn precision_recall(
    table: &SimilarityTable,
    replicate_groups: &[&str],
    groupby_columns: &[&str],
    k: KParam,
) -> Result<(PrecisionRecallTable, AveragePrecisionTable)> {
    table.validate()?;
    if groupby_columns.is_empty() {
        return Err(EvalError::InvalidParameter(
            "groupby_columns must name at least one column".to_string(),
        ));
    }
    for column in groupby_columns {
        table.side_a_column(column)?;
    }
    if let KParam::Fixed(ks) = &k {
        if ks.is_empty() {
            return Err(EvalError::InvalidParameter(
                "k must contain at least one cutoff".to_string(),
            ));
        }
        if let Some(bad) = ks.iter().find(|&&k_| k_ == 0) {
            return Err(EvalError::InvalidParameter(format!(
                "Rank cutoff must be >= 1, got {}",
                bad
            )));
        }
    }

    let labeled = assign_replicates(table, replicate_groups)?;
    let melted = labeled.table();
    let sims = melted.similarity();

    // Global descending-similarity ranking; ties fall back to pair indices.
    let mut order: Vec<usize> = (0..melted.n_rows()).collect();
    order.sort_by(|&a, &b| {
        sims[b]
            .total_cmp(&sims[a])
            .then_with(|| melted.pair_a_index()[a].cmp(&melted.pair_a_index()[b]))
            .then_with(|| melted.pair_b_index()[a].cmp(&melted.pair_b_index()[b]))
    });

    let key_columns: Vec<&[String]> = groupby_columns
        .iter()
        .map(|c| melted.side_a_column(c))
        .collect::<Result<_>>()?;

    // Partition the ranked rows by group key; BTreeMap fixes the output
    // order so the parallel fan-out below cannot reorder results.
    let mut partitions: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
    for &row in &order {
        let key: Vec<String> = key_columns.iter().map(|col| col[row].clone()).collect();
        partitions.entry(key).or_default().push(row);
    }

    let groups: Vec<(Vec<String>, Vec<bool>, Vec<f64>)> = partitions
        .into_iter()
        .map(|(key, rows)| {
            let flags: Vec<bool> = rows.iter().map(|&r| labeled.group_replicate()[r]).collect();
            let scores: Vec<f64> = rows.iter().map(|&r| sims[r]).collect();
            (key, flags, scores)
        })
        .collect();

    let mut pr_rows = Vec::new();
    match &k {
        KParam::Fixed(ks) => {
            for &k_ in ks {
                let rows: Vec<PrecisionRecallRow> = groups
                    .par_iter()
                    .map(|(key, flags, _)| {
                        let (precision, recall) = precision_recall_at(flags, k_);
                        PrecisionRecallRow {
                            group_key: key.clone(),
                            cutoff: RankCutoff::K(k_),
                            precision,
                            recall: Some(recall),
                        }
                    })
                    .collect();
                pr_rows.extend(rows);
            }
        }
        KParam::Natural => {
            let rows: Vec<PrecisionRecallRow> = groups
                .par_iter()
                .map(|(key, flags, _)| {
                    let (r, precision) = precision_at_natural(flags);
                    PrecisionRecallRow {
                        group_key: key.clone(),
                        cutoff: RankCutoff::R(r),
                        precision,
                        recall: None,
                    }
                })
                .collect();
            pr_rows.extend(rows);
        }
    }

    let ap_rows: Vec<AveragePrecisionRow> = groups
        .par_iter()
        .map(|(key, flags, scores)| AveragePrecisionRow {
            group_key: key.clone(),
            average_precision: average_precision(scores, flags),
        })
        .collect();

    let groupby: Vec<String> = groupby_columns.iter().map(|s| s.to_string()).collect();
    Ok((
        PrecisionRecallTable {
            groupby_columns: groupby.clone(),
            rows: pr_rows,
        },
        AveragePrecisionTable {
            groupby_columns: groupby,
            rows: ap_rows,
        },
    ))
}
