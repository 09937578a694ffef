//! Enrichment of replicate pairs above similarity percentile thresholds.

use crate::data::{EnrichmentRow, EnrichmentTable, SimilarityTable};
use crate::error::{EvalError, Result};
use crate::operations::replicates::assign_replicates;
use crate::stats::{fisher_exact_greater, quantile};

/// Test how strongly replicate pairs concentrate above each similarity
/// percentile threshold.
///
/// For each requested percentile, the similarity value at that percentile
/// (linear-interpolation quantile over the whole table) becomes a threshold,
/// and a 2x2 contingency table of (replicate x strictly-above-threshold)
/// counts is tested with a one-sided ("greater") Fisher exact test.
///
/// The melted table holds both mirrored directions of every unordered pair,
/// so each contingency cell counts every pair twice; cells are halved before
/// testing. An odd cell means the input was not mirror-symmetric and fails
/// with `EvalError::AsymmetricPairs`.
///
/// # Arguments
/// * `table` - Melted similarity table.
/// * `replicate_groups` - Metadata columns defining replicate identity.
/// * `percentiles` - Percentiles in [0, 1], each evaluated independently.
pub fn enrichment(
    table: &SimilarityTable,
    replicate_groups: &[&str],
    percentiles: &[f64],
) -> Result<EnrichmentTable> {
    table.validate()?;
    if percentiles.is_empty() {
        return Err(EvalError::InvalidParameter(
            "percentile must contain at least one value".to_string(),
        ));
    }

    let labeled = assign_replicates(table, replicate_groups)?;
    let sims = labeled.table().similarity();
    let flags = labeled.group_replicate();

    let rows = percentiles
        .iter()
        .map(|&p| {
            let threshold = quantile(sims, p)?;

            let mut v11 = 0u64; // replicate, above threshold
            let mut v12 = 0u64; // non-replicate, above threshold
            let mut v21 = 0u64; // replicate, at or below threshold
            let mut v22 = 0u64; // non-replicate, at or below threshold
            for (&sim, &replicate) in sims.iter().zip(flags.iter()) {
                match (replicate, sim > threshold) {
                    (true, true) => v11 += 1,
                    (false, true) => v12 += 1,
                    (true, false) => v21 += 1,
                    (false, false) => v22 += 1,
                }
            }

            let halved = halve_cells([v11, v12, v21, v22])?;
            let fisher = fisher_exact_greater(halved[0], halved[1], halved[2], halved[3]);

            Ok(EnrichmentRow {
                enrichment_percentile: p,
                threshold,
                odds_ratio: fisher.odds_ratio,
                p_value: fisher.p_value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EnrichmentTable { rows })
}

/// Halve the ordered-pair contingency cells down to unordered-pair counts.
fn halve_cells(cells: [u64; 4]) -> Result<[u64; 4]> {
    const NAMES: [&str; 4] = [
        "replicate/above",
        "non-replicate/above",
        "replicate/below",
        "non-replicate/below",
    ];
    for (name, &v) in NAMES.iter().zip(cells.iter()) {
        if v % 2 != 0 {
            return Err(EvalError::AsymmetricPairs(format!(
                "{} cell is {}; a mirrored pair table must have even counts",
                name, v
            )));
        }
    }
    Ok([cells[0] / 2, cells[1] / 2, cells[2] / 2, cells[3] / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Mirrored table of unordered pairs: 10 replicate pairs with high
    /// similarity and 90 non-replicate pairs spread uniformly below.
    fn create_enriched_table() -> SimilarityTable {
        let mut table = SimilarityTable::new(&["Metadata_group"]);
        let mut push_mirrored =
            |table: &mut SimilarityTable, a: usize, b: usize, ga: &str, gb: &str, sim: f64| {
                table.push_pair(a, b, &[ga], &[gb], sim).unwrap();
                table.push_pair(b, a, &[gb], &[ga], sim).unwrap();
            };

        for i in 0..10 {
            let group = format!("g{}", i);
            push_mirrored(
                &mut table,
                2 * i,
                2 * i + 1,
                &group,
                &group,
                0.95 + 0.005 * i as f64,
            );
        }
        for i in 0..90 {
            let (a, b) = (100 + 2 * i, 101 + 2 * i);
            push_mirrored(
                &mut table,
                a,
                b,
                &format!("x{}", i),
                &format!("y{}", i),
                i as f64 / 100.0,
            );
        }
        table
    }

    #[test]
    fn test_enrichment_at_high_percentile() {
        let table = create_enriched_table();
        let result = enrichment(&table, &["Metadata_group"], &[0.9]).unwrap();

        assert_eq!(result.len(), 1);
        let row = &result.rows[0];
        assert_relative_eq!(row.enrichment_percentile, 0.9);
        // All 10 replicate pairs and no non-replicates sit above the 90th
        // percentile: maximal enrichment.
        assert!(row.odds_ratio > 1.0);
        assert!(row.p_value < 0.05, "p = {}", row.p_value);
    }

    #[test]
    fn test_threshold_matches_quantile() {
        let table = create_enriched_table();
        let labeled = assign_replicates(&table, &["Metadata_group"]).unwrap();
        let expected = quantile(labeled.table().similarity(), 0.75).unwrap();

        let result = enrichment(&table, &["Metadata_group"], &[0.75]).unwrap();
        assert_relative_eq!(result.rows[0].threshold, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_multiple_percentiles_independent() {
        let table = create_enriched_table();
        let result = enrichment(&table, &["Metadata_group"], &[0.5, 0.9, 0.95]).unwrap();

        assert_eq!(result.len(), 3);
        let percentiles: Vec<f64> =
            result.rows.iter().map(|r| r.enrichment_percentile).collect();
        assert_eq!(percentiles, vec![0.5, 0.9, 0.95]);
        // Thresholds rise with the percentile.
        assert!(result.rows[0].threshold < result.rows[1].threshold);
        assert!(result.rows[1].threshold < result.rows[2].threshold);
        // Replicates are concentrated at the top everywhere here.
        for row in &result.rows {
            assert!(row.p_value < 0.05);
        }
    }

    #[test]
    fn test_no_association() {
        // Replicate and non-replicate pairs interleaved over similarity:
        // odds ratio near 1, far from significant.
        let mut table = SimilarityTable::new(&["Metadata_group"]);
        for i in 0..20 {
            let (group_a, group_b) = if i % 2 == 0 {
                (format!("g{}", i), format!("g{}", i))
            } else {
                (format!("x{}", i), format!("y{}", i))
            };
            let sim = i as f64 / 20.0;
            table
                .push_pair(2 * i, 2 * i + 1, &[&group_a], &[&group_b], sim)
                .unwrap();
            table
                .push_pair(2 * i + 1, 2 * i, &[&group_b], &[&group_a], sim)
                .unwrap();
        }

        let result = enrichment(&table, &["Metadata_group"], &[0.5]).unwrap();
        assert!(result.rows[0].p_value > 0.05);
    }

    #[test]
    fn test_odd_counts_rejected() {
        // One direction only: every cell count is odd or mismatched.
        let mut table = SimilarityTable::new(&["Metadata_group"]);
        table.push_pair(0, 1, &["g0"], &["g0"], 0.9).unwrap();
        table.push_pair(2, 3, &["x"], &["y"], 0.1).unwrap();
        table.push_pair(3, 2, &["y"], &["x"], 0.1).unwrap();

        let err = enrichment(&table, &["Metadata_group"], &[0.5]).unwrap_err();
        assert!(matches!(err, EvalError::AsymmetricPairs(_)));
    }

    #[test]
    fn test_empty_percentiles_rejected() {
        let table = create_enriched_table();
        assert!(enrichment(&table, &["Metadata_group"], &[]).is_err());
    }

    #[test]
    fn test_out_of_range_percentile_rejected() {
        let table = create_enriched_table();
        assert!(enrichment(&table, &["Metadata_group"], &[1.2]).is_err());
    }

    #[test]
    fn test_most_enriched_row() {
        // Two replicate pairs sit low (0.3) so both odds ratios are finite;
        // the stricter threshold concentrates replicates harder.
        let mut table = create_enriched_table();
        table.push_pair(200, 201, &["g90"], &["g90"], 0.3).unwrap();
        table.push_pair(201, 200, &["g90"], &["g90"], 0.3).unwrap();
        table.push_pair(202, 203, &["g91"], &["g91"], 0.3).unwrap();
        table.push_pair(203, 202, &["g91"], &["g91"], 0.3).unwrap();

        let result = enrichment(&table, &["Metadata_group"], &[0.3, 0.5]).unwrap();
        assert!(result.rows[0].odds_ratio.is_finite());
        assert!(result.rows[1].odds_ratio.is_finite());
        assert!(result.rows[1].odds_ratio > result.rows[0].odds_ratio);

        let best = result.most_enriched().unwrap();
        assert_relative_eq!(best.enrichment_percentile, 0.5);
    }
}
