//! Word aligner
//!
//! Pairs reference words with learner words. Two strategies share one entry
//! point:
//! - `Optimal`: word-level edit-distance table, used for statistics
//! - `Greedy`: bounded lookahead, used while the learner is typing
//!
//! Optimal tie-break: the path is traced back from the end of both sequences,
//! preferring match, then substitution, then insertion, then deletion. Extra
//! and missing words therefore land as far left as the minimal cost allows.

use crate::matching::fuzzy::{
    apply_position_penalty, FuzzyScorer, ACCEPTANCE_THRESHOLD, EXACT_MATCH_SCORE,
    LOOKAHEAD_WINDOW,
};
use crate::matching::types::{AlignmentMode, AlignmentPair};

/// Tables above this many cells are logged
const LARGE_TABLE_CELLS: usize = 1_000_000;

/// Word aligner
#[derive(Debug, Clone, Copy)]
pub struct WordAligner {
    scorer: FuzzyScorer,
    lookahead: usize,
    acceptance_threshold: f64,
}

impl WordAligner {
    pub fn new(check_capitalization: bool) -> Self {
        Self {
            scorer: FuzzyScorer::new(check_capitalization),
            lookahead: LOOKAHEAD_WINDOW,
            acceptance_threshold: ACCEPTANCE_THRESHOLD,
        }
    }

    /// Override the greedy lookahead window (at least one word)
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead.max(1);
        self
    }

    /// Override the greedy acceptance threshold
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    pub fn align<R, U>(&self, reference: &[R], user: &[U], mode: AlignmentMode) -> Vec<AlignmentPair>
    where
        R: AsRef<str>,
        U: AsRef<str>,
    {
        let pairs = match mode {
            AlignmentMode::Greedy => self.align_greedy(reference, user),
            AlignmentMode::Optimal => self.align_optimal(reference, user),
        };

        tracing::debug!(
            "align: mode={:?}, reference={}, user={}, ops={}",
            mode,
            reference.len(),
            user.len(),
            pairs.len()
        );

        pairs
    }

    fn pair_for(&self, reference: &str, user: &str, score: f64) -> AlignmentPair {
        if score >= EXACT_MATCH_SCORE {
            AlignmentPair::matched(reference, user)
        } else {
            AlignmentPair::substitution(reference, user, score)
        }
    }

    fn align_greedy<R, U>(&self, reference: &[R], user: &[U]) -> Vec<AlignmentPair>
    where
        R: AsRef<str>,
        U: AsRef<str>,
    {
        let check_capitalization = self.scorer.check_capitalization();
        let mut pairs = Vec::with_capacity(reference.len().max(user.len()));
        let mut cursor = 0usize;

        for expected in reference {
            let expected = expected.as_ref();
            let window_end = cursor.saturating_add(self.lookahead).min(user.len());

            // (offset, penalized, raw); nearest candidate wins ties
            let mut best: Option<(usize, f64, f64)> = None;
            for (offset, candidate) in user[cursor..window_end].iter().enumerate() {
                let raw = self.scorer.score(candidate.as_ref(), expected).score;
                let penalized = apply_position_penalty(raw, offset, check_capitalization);
                if best.map_or(true, |(_, score, _)| penalized > score) {
                    best = Some((offset, penalized, raw));
                }
            }

            match best {
                Some((offset, penalized, raw)) if penalized > self.acceptance_threshold => {
                    for skipped in &user[cursor..cursor + offset] {
                        pairs.push(AlignmentPair::insertion(skipped.as_ref()));
                    }
                    let typed = user[cursor + offset].as_ref();
                    pairs.push(self.pair_for(expected, typed, raw));
                    cursor += offset + 1;
                }
                // Learner left the word out; the same user word is retried
                _ => pairs.push(AlignmentPair::deletion(expected)),
            }
        }

        for extra in &user[cursor.min(user.len())..] {
            pairs.push(AlignmentPair::insertion(extra.as_ref()));
        }

        pairs
    }

    fn align_optimal<R, U>(&self, reference: &[R], user: &[U]) -> Vec<AlignmentPair>
    where
        R: AsRef<str>,
        U: AsRef<str>,
    {
        let m = reference.len();
        let n = user.len();

        if (m + 1) * (n + 1) > LARGE_TABLE_CELLS {
            tracing::warn!("align: large edit-distance table (reference={}, user={})", m, n);
        }

        let scores: Vec<Vec<f64>> = reference
            .iter()
            .map(|r| {
                user.iter()
                    .map(|u| self.scorer.score(u.as_ref(), r.as_ref()).score)
                    .collect()
            })
            .collect();
        let is_match = |i: usize, j: usize| scores[i][j] >= EXACT_MATCH_SCORE;

        let mut table = vec![vec![0usize; n + 1]; m + 1];
        for (i, row) in table.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=n {
            table[0][j] = j;
        }
        for i in 1..=m {
            for j in 1..=n {
                let diagonal = table[i - 1][j - 1] + usize::from(!is_match(i - 1, j - 1));
                let insertion = table[i][j - 1] + 1;
                let deletion = table[i - 1][j] + 1;
                table[i][j] = diagonal.min(insertion).min(deletion);
            }
        }

        let mut pairs = Vec::with_capacity(m.max(n));
        let mut i = m;
        let mut j = n;
        while i > 0 || j > 0 {
            if i > 0 && j > 0 {
                let matched = is_match(i - 1, j - 1);
                let step = usize::from(!matched);
                if table[i][j] == table[i - 1][j - 1] + step {
                    let expected = reference[i - 1].as_ref();
                    let typed = user[j - 1].as_ref();
                    pairs.push(self.pair_for(expected, typed, scores[i - 1][j - 1]));
                    i -= 1;
                    j -= 1;
                    continue;
                }
            }
            if j > 0 && table[i][j] == table[i][j - 1] + 1 {
                pairs.push(AlignmentPair::insertion(user[j - 1].as_ref()));
                j -= 1;
            } else {
                pairs.push(AlignmentPair::deletion(reference[i - 1].as_ref()));
                i -= 1;
            }
        }
        pairs.reverse();

        pairs
    }
}

/// Align in the given mode
pub fn align<R, U>(
    reference: &[R],
    user: &[U],
    check_capitalization: bool,
    mode: AlignmentMode,
) -> Vec<AlignmentPair>
where
    R: AsRef<str>,
    U: AsRef<str>,
{
    WordAligner::new(check_capitalization).align(reference, user, mode)
}

/// Lookahead alignment for live feedback
pub fn align_greedy<R, U>(reference: &[R], user: &[U], check_capitalization: bool) -> Vec<AlignmentPair>
where
    R: AsRef<str>,
    U: AsRef<str>,
{
    align(reference, user, check_capitalization, AlignmentMode::Greedy)
}

/// Minimal edit-distance alignment for statistics
pub fn align_exact<R, U>(reference: &[R], user: &[U], check_capitalization: bool) -> Vec<AlignmentPair>
where
    R: AsRef<str>,
    U: AsRef<str>,
{
    align(reference, user, check_capitalization, AlignmentMode::Optimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{AlignmentOp, AlignmentStats};

    fn ops(pairs: &[AlignmentPair]) -> Vec<AlignmentOp> {
        pairs.iter().map(|p| p.op()).collect()
    }

    #[test]
    fn test_umlaut_substitution() {
        let reference = ["Berlin", "ist", "schön"];
        let user = ["Berlin", "ist", "schon"];

        for mode in [AlignmentMode::Greedy, AlignmentMode::Optimal] {
            let pairs = align(&reference, &user, false, mode);
            let stats = AlignmentStats::from_pairs(&pairs);
            assert_eq!(stats.matches, 2, "{:?}", mode);
            assert_eq!(stats.substitutions, 1, "{:?}", mode);
            assert_eq!(pairs[2].reference_word(), Some("schön"));
            assert_eq!(pairs[2].user_word(), Some("schon"));
            assert!(pairs[2].score() >= 0.5);
        }
    }

    #[test]
    fn test_compound_substitution() {
        let pairs = align_greedy(&["Montagmorgen"], &["morgen"], false);
        assert_eq!(ops(&pairs), vec![AlignmentOp::Substitution]);
        assert!((pairs[0].score() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_greedy_skipped_first_word() {
        let pairs = align_greedy(&["Es", "ist", "kalt"], &["ist", "kalt"], false);
        assert_eq!(
            ops(&pairs),
            vec![AlignmentOp::Deletion, AlignmentOp::Match, AlignmentOp::Match]
        );
        assert_eq!(pairs[0].reference_word(), Some("Es"));
        assert_eq!(pairs[0].user_word(), None);
    }

    #[test]
    fn test_optimal_skipped_first_word() {
        let pairs = align_exact(&["Es", "ist", "kalt"], &["ist", "kalt"], false);
        assert_eq!(
            ops(&pairs),
            vec![AlignmentOp::Deletion, AlignmentOp::Match, AlignmentOp::Match]
        );
    }

    #[test]
    fn test_greedy_extra_words_before_match() {
        let pairs = align_greedy(&["kalt"], &["sehr", "sehr", "kalt"], false);
        assert_eq!(
            ops(&pairs),
            vec![
                AlignmentOp::Insertion,
                AlignmentOp::Insertion,
                AlignmentOp::Match
            ]
        );
    }

    #[test]
    fn test_greedy_lookahead_is_bounded() {
        let user = ["a1", "b2", "c3", "d4", "e5", "kalt"];
        let pairs = align_greedy(&["kalt"], &user, false);
        // "kalt" sits 5 words ahead, outside the window
        assert_eq!(pairs[0].op(), AlignmentOp::Deletion);
        assert_eq!(pairs.len(), 7);
        assert!(pairs[1..].iter().all(|p| p.op() == AlignmentOp::Insertion));
    }

    #[test]
    fn test_greedy_trailing_insertions() {
        let pairs = align_greedy(&["Es"], &["Es", "ist", "kalt"], false);
        assert_eq!(
            ops(&pairs),
            vec![
                AlignmentOp::Match,
                AlignmentOp::Insertion,
                AlignmentOp::Insertion
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let empty: [&str; 0] = [];
        for mode in [AlignmentMode::Greedy, AlignmentMode::Optimal] {
            let pairs = align(&["a", "b"], &empty, false, mode);
            assert_eq!(ops(&pairs), vec![AlignmentOp::Deletion, AlignmentOp::Deletion]);

            let pairs = align(&empty, &["a", "b"], false, mode);
            assert_eq!(ops(&pairs), vec![AlignmentOp::Insertion, AlignmentOp::Insertion]);

            assert!(align(&empty, &empty, false, mode).is_empty());
        }
    }

    #[test]
    fn test_exact_round_trip() {
        let samples: Vec<Vec<&str>> = vec![
            vec!["Es"],
            vec!["Berlin", "ist", "schön"],
            vec!["der", "die", "das", "der", "die"],
            vec!["Montagmorgen", "morgen", "Morgen"],
        ];
        for words in samples {
            for caps in [true, false] {
                let pairs = align_exact(&words, &words, caps);
                assert_eq!(pairs.len(), words.len());
                assert!(pairs.iter().all(|p| p.op() == AlignmentOp::Match));
            }
        }
    }

    #[test]
    fn test_disjoint_length_invariant() {
        let reference = ["aaa", "bbb", "ccc", "ddd"];
        let user = ["xyz", "qrs"];
        let pairs = align_exact(&reference, &user, false);
        let stats = AlignmentStats::from_pairs(&pairs);
        assert_eq!(pairs.len(), 4);
        assert_eq!(stats.matches, 0);
        assert_eq!(stats.substitutions, 2);
        assert_eq!(stats.deletions, 2);
        assert_eq!(stats.reference_len(), reference.len());
        assert_eq!(stats.user_len(), user.len());

        let pairs = align_exact(&user, &reference, false);
        let stats = AlignmentStats::from_pairs(&pairs);
        assert_eq!(pairs.len(), 4);
        assert_eq!(stats.substitutions, 2);
        assert_eq!(stats.insertions, 2);
    }

    #[test]
    fn test_modes_agree_on_substitution_only_input() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["Berlin", "ist", "schön"], vec!["Berlin", "ist", "schon"]),
            (vec!["Ich", "habe", "Hunger"], vec!["ich", "hab", "Hunger"]),
            (vec!["Der", "Hund", "bellt"], vec!["Der", "Hunt", "belt"]),
            (vec!["eins", "zwei"], vec!["eins", "zwei"]),
        ];
        for (reference, user) in cases {
            for caps in [true, false] {
                let greedy = AlignmentStats::from_pairs(&align_greedy(&reference, &user, caps));
                let exact = AlignmentStats::from_pairs(&align_exact(&reference, &user, caps));
                assert_eq!(greedy.matches, exact.matches, "{:?} / {:?}", reference, user);
            }
        }
    }

    #[test]
    fn test_capitalization_is_substitution_when_checked() {
        let pairs = align_exact(&["Berlin"], &["berlin"], true);
        assert_eq!(pairs[0].op(), AlignmentOp::Substitution);

        let pairs = align_exact(&["Berlin"], &["berlin"], false);
        assert_eq!(pairs[0].op(), AlignmentOp::Match);
    }

    #[test]
    fn test_optimal_prefers_leftmost_insertion() {
        let pairs = align_exact(&["ja"], &["ja", "ja"], false);
        assert_eq!(ops(&pairs), vec![AlignmentOp::Insertion, AlignmentOp::Match]);
    }

    #[test]
    fn test_huge_lookahead_saturates() {
        let aligner = WordAligner::new(false).with_lookahead(usize::MAX);
        let pairs = aligner.align(&["es", "ist"], &["es", "ist"], AlignmentMode::Greedy);
        assert_eq!(ops(&pairs), vec![AlignmentOp::Match, AlignmentOp::Match]);
    }

    #[test]
    fn test_custom_lookahead() {
        let aligner = WordAligner::new(false).with_lookahead(1);
        let pairs = aligner.align(&["kalt"], &["sehr", "kalt"], AlignmentMode::Greedy);
        assert_eq!(
            ops(&pairs),
            vec![
                AlignmentOp::Deletion,
                AlignmentOp::Insertion,
                AlignmentOp::Insertion
            ]
        );
    }
}
