//! Approximate matching of a query against a single piece of text.
//!
//! The query is aligned against the best-matching substring of the candidate
//! (Sellers' variant of edit distance, extended with adjacent transpositions),
//! so a short query inside a long title costs nothing for the surrounding text.
//! The score is the edit count divided by the query length: `0.0` is an exact
//! occurrence and `1.0` means nothing of the query survived.

use crate::model::NormalizedText;

pub const DEFAULT_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub score: f64,
    pub edits: usize,
    /// Half-open span in the candidate's normalized characters.
    pub start: usize,
    pub end: usize,
}

/// Scores `query` against `candidate`; `None` when either side is empty.
pub fn similarity(query: &str, candidate: &str) -> Option<Similarity> {
    best_alignment(
        NormalizedText::new(query).chars(),
        NormalizedText::new(candidate).chars(),
    )
}

/// Lower bound on the score: a query longer than the candidate needs at least
/// one edit per surplus character.
pub fn length_floor(query_len: usize, candidate_len: usize) -> f64 {
    if query_len == 0 {
        return 0.0;
    }
    query_len.saturating_sub(candidate_len) as f64 / query_len as f64
}

/// [`best_alignment`] restricted to scores at most `threshold`. Pairs whose
/// length difference alone exceeds the threshold skip the alignment.
pub fn best_alignment_within(
    query: &[char],
    candidate: &[char],
    threshold: f64,
) -> Option<Similarity> {
    if length_floor(query.len(), candidate.len()) > threshold {
        return None;
    }
    best_alignment(query, candidate).filter(|sim| sim.score <= threshold)
}

pub fn best_alignment(query: &[char], candidate: &[char]) -> Option<Similarity> {
    let m = query.len();
    let n = candidate.len();
    if m == 0 || n == 0 {
        return None;
    }

    let width = n + 1;
    let mut cost = vec![0usize; (m + 1) * width];
    let mut origin = vec![0usize; (m + 1) * width];

    for j in 0..=n {
        origin[j] = j;
    }
    for i in 1..=m {
        cost[i * width] = i;
    }

    for i in 1..=m {
        for j in 1..=n {
            let here = i * width + j;
            let diag = (i - 1) * width + (j - 1);
            let up = (i - 1) * width + j;
            let left = i * width + (j - 1);

            let substitution = usize::from(query[i - 1] != candidate[j - 1]);
            let mut best = cost[diag] + substitution;
            let mut best_origin = origin[diag];

            if cost[up] + 1 < best {
                best = cost[up] + 1;
                best_origin = origin[up];
            }
            if cost[left] + 1 < best {
                best = cost[left] + 1;
                best_origin = origin[left];
            }
            if i > 1
                && j > 1
                && query[i - 1] == candidate[j - 2]
                && query[i - 2] == candidate[j - 1]
            {
                let swap = (i - 2) * width + (j - 2);
                if cost[swap] + 1 < best {
                    best = cost[swap] + 1;
                    best_origin = origin[swap];
                }
            }

            cost[here] = best;
            origin[here] = best_origin;
        }
    }

    let last_row = m * width;
    let mut best_end = 0;
    for j in 1..=n {
        if cost[last_row + j] < cost[last_row + best_end] {
            best_end = j;
        }
    }

    let edits = cost[last_row + best_end];
    let start = origin[last_row + best_end];
    Some(Similarity {
        score: (edits as f64 / m as f64).min(1.0),
        edits,
        start,
        end: best_end.max(start),
    })
}

#[cfg(test)]
mod tests {
    use super::{best_alignment_within, length_floor, similarity, DEFAULT_THRESHOLD};
    use crate::model::NormalizedText;

    #[test]
    fn exact_occurrence_scores_zero() {
        let sim = similarity("even", "Break-Even Point").unwrap();
        assert_eq!(sim.edits, 0);
        assert_eq!(sim.score, 0.0);
        assert_eq!((sim.start, sim.end), (6, 10));
    }

    #[test]
    fn tolerates_missing_letters() {
        let sim = similarity("brek evn", "Break-Even Point").unwrap();
        assert_eq!(sim.edits, 2);
        assert!(sim.score <= DEFAULT_THRESHOLD);
    }

    #[test]
    fn adjacent_transposition_costs_one_edit() {
        let sim = similarity("roudning", "Rounding").unwrap();
        assert_eq!(sim.edits, 1);
        let swapped = similarity("tpi", "tip").unwrap();
        assert_eq!(swapped.edits, 1);
    }

    #[test]
    fn unrelated_text_is_rejected_by_threshold() {
        let query = NormalizedText::new("break even");
        let candidate = NormalizedText::new("Decimal Point Shifter");
        assert!(best_alignment_within(query.chars(), candidate.chars(), DEFAULT_THRESHOLD).is_none());
    }

    #[test]
    fn overlong_query_is_rejected_by_length_alone() {
        assert_eq!(length_floor(10, 4), 0.6);
        assert_eq!(length_floor(4, 10), 0.0);

        let pasted: String = "tip ".repeat(500);
        let query = NormalizedText::new(&pasted);
        let candidate = NormalizedText::new("Tip Calculator");
        assert!(best_alignment_within(query.chars(), candidate.chars(), DEFAULT_THRESHOLD).is_none());

        let close = NormalizedText::new("tip calculatr");
        let sim = best_alignment_within(close.chars(), candidate.chars(), DEFAULT_THRESHOLD).unwrap();
        assert_eq!(sim.edits, 1);
    }

    #[test]
    fn empty_sides_do_not_match() {
        assert!(similarity("", "anything").is_none());
        assert!(similarity("   ", "anything").is_none());
        assert!(similarity("query", "").is_none());
    }
}
