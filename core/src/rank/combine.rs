//! Conjunctive composition of independently ranked sub-queries.

use super::Scores;
use crate::config::ScoreCombine;

/// Min-max scale scores into `[0, 1]`. When every score is equal they all become `1`.
pub fn min_max(scores: &Scores) -> Scores {
    let (lo, hi) = scores
        .values()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let range = hi - lo;
    scores
        .iter()
        .map(|(&doc, &s)| (doc, if range > 0.0 { (s - lo) / range } else { 1.0 }))
        .collect()
}

/// Documents present in both score sets, with their combined scores.
pub fn intersect(a: &Scores, b: &Scores, combine: ScoreCombine) -> Scores {
    let (a, b) = match combine {
        ScoreCombine::Sum => (a.clone(), b.clone()),
        ScoreCombine::MinMax => (min_max(a), min_max(b)),
    };
    let (small, large) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    small
        .iter()
        .filter_map(|(doc, s)| large.get(doc).map(|t| (*doc, s + t)))
        .collect()
}

/// Fold sub-results pairwise, smallest first.
pub fn intersect_all(mut results: Vec<Scores>, combine: ScoreCombine) -> Scores {
    results.sort_by_key(|s| s.len());
    let mut results = results.into_iter();
    let Some(mut acc) = results.next() else {
        return Scores::new();
    };
    for next in results {
        acc = intersect(&acc, &next, combine);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(u32, f32)]) -> Scores {
        pairs.iter().copied().collect()
    }

    #[test]
    fn keeps_shared_docs_summed() {
        let out = intersect(&scores(&[(1, 0.5), (2, 0.3)]), &scores(&[(2, 0.1), (3, 0.9)]), ScoreCombine::Sum);
        assert_eq!(out.len(), 1);
        assert!((out[&2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_scores_still_count_as_present() {
        let out = intersect(&scores(&[(1, 0.0)]), &scores(&[(1, 0.0)]), ScoreCombine::Sum);
        assert!(out.contains_key(&1));
    }

    #[test]
    fn min_max_scaling() {
        let out = min_max(&scores(&[(1, 2.0), (2, 4.0), (3, 3.0)]));
        assert_eq!(out[&1], 0.0);
        assert_eq!(out[&2], 1.0);
        assert_eq!(out[&3], 0.5);
        assert_eq!(min_max(&scores(&[(7, 0.3)]))[&7], 1.0);
    }

    #[test]
    fn normalized_sum() {
        let a = scores(&[(1, 10.0), (2, 20.0)]);
        let b = scores(&[(1, 0.9), (2, 0.1)]);
        let out = intersect(&a, &b, ScoreCombine::MinMax);
        assert_eq!(out[&1], 1.0);
        assert_eq!(out[&2], 1.0);
    }

    #[test]
    fn folds_many() {
        let out = intersect_all(
            vec![scores(&[(1, 1.0), (2, 1.0), (3, 1.0)]), scores(&[(2, 1.0), (3, 1.0)]), scores(&[(3, 1.0)])],
            ScoreCombine::Sum,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[&3], 3.0);
        assert!(intersect_all(Vec::new(), ScoreCombine::Sum).is_empty());
    }
}
