//! One-sided Fisher exact test for 2x2 contingency tables.

use statrs::function::gamma::ln_gamma;

/// Result of a one-sided Fisher exact test.
#[derive(Debug, Clone, Copy)]
pub struct FisherResult {
    /// Sample odds ratio `(a*d)/(b*c)`; infinite when only the denominator
    /// is zero, NaN when both products are zero.
    pub odds_ratio: f64,
    /// Upper-tail p-value `P(X >= a)` under the hypergeometric null.
    pub p_value: f64,
}

/// One-sided ("greater") Fisher exact test on the table `[[a, b], [c, d]]`.
///
/// Tests whether the odds of being in the first column are greater in the
/// first row than the second. The p-value is the hypergeometric upper tail
/// with all margins fixed, summed in log-space for stability.
pub fn fisher_exact_greater(a: u64, b: u64, c: u64, d: u64) -> FisherResult {
    let numerator = a as f64 * d as f64;
    let denominator = b as f64 * c as f64;
    let odds_ratio = if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    };

    // X ~ Hypergeometric(N, K, n): N = grand total, K = first-row total,
    // n = first-column total, observed successes a.
    let big_n = a + b + c + d;
    let big_k = a + b;
    let n = a + c;

    let p_value = if big_n == 0 {
        f64::NAN
    } else {
        hypergeometric_upper_tail(a, big_n, big_k, n)
    };

    FisherResult {
        odds_ratio,
        p_value,
    }
}

/// Hypergeometric upper-tail probability `P(X >= k)`.
fn hypergeometric_upper_tail(k: u64, big_n: u64, big_k: u64, n: u64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    let max_i = n.min(big_k);
    if k > max_i {
        return 0.0;
    }
    // Support lower bound: i >= n - (N - K).
    let min_support = n.saturating_sub(big_n - big_k);

    let log_denom = ln_choose(big_n, n);
    let mut sum = 0.0_f64;
    for i in k.max(min_support)..=max_i {
        let log_p = ln_choose(big_k, i) + ln_choose(big_n - big_k, n - i) - log_denom;
        sum += log_p.exp();
    }
    sum.min(1.0)
}

/// Natural log of the binomial coefficient C(n, k).
fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    ln_gamma(n as f64 + 1.0) - ln_gamma(k as f64 + 1.0) - ln_gamma((n - k) as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_tail_probability() {
        // [[5, 0], [1, 4]]: P(X >= 5) = C(6,5)*C(4,0)/C(10,5) = 6/252
        let result = fisher_exact_greater(5, 0, 1, 4);
        assert_relative_eq!(result.p_value, 6.0 / 252.0, epsilon = 1e-10);
        assert!(result.odds_ratio.is_infinite());
    }

    #[test]
    fn test_symmetric_table() {
        // [[3, 1], [1, 3]]: P(X >= 3) = (C(4,3)*C(4,1) + C(4,4)*C(4,0)) / C(8,4)
        //                             = (16 + 1) / 70
        let result = fisher_exact_greater(3, 1, 1, 3);
        assert_relative_eq!(result.p_value, 17.0 / 70.0, epsilon = 1e-10);
        assert_relative_eq!(result.odds_ratio, 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_no_association() {
        // Equal odds in both rows: odds ratio 1, p-value well above 0.5.
        let result = fisher_exact_greater(5, 5, 5, 5);
        assert_relative_eq!(result.odds_ratio, 1.0, epsilon = 1e-10);
        assert!(result.p_value > 0.5);
        assert!(result.p_value <= 1.0);
    }

    #[test]
    fn test_zero_observed() {
        // k = 0 always gives p = 1.
        let result = fisher_exact_greater(0, 10, 10, 10);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.odds_ratio, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_strong_enrichment_significant() {
        let result = fisher_exact_greater(10, 0, 0, 90);
        assert!(result.p_value < 1e-6, "p = {}", result.p_value);
        assert!(result.odds_ratio.is_infinite());
    }

    #[test]
    fn test_both_products_zero() {
        let result = fisher_exact_greater(0, 5, 0, 5);
        assert!(result.odds_ratio.is_nan());
    }

    #[test]
    fn test_empty_table() {
        let result = fisher_exact_greater(0, 0, 0, 0);
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_pvalue_in_unit_interval() {
        for &(a, b, c, d) in &[(2u64, 3u64, 4u64, 5u64), (7, 1, 2, 8), (1, 1, 1, 1)] {
            let result = fisher_exact_greater(a, b, c, d);
            assert!(result.p_value > 0.0 && result.p_value <= 1.0);
        }
    }

    #[test]
    fn test_ln_choose() {
        assert_relative_eq!(ln_choose(5, 2).exp(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(ln_choose(10, 5).exp(), 252.0, epsilon = 1e-6);
        assert_eq!(ln_choose(3, 5), f64::NEG_INFINITY);
    }
}
