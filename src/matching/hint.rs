//! Hint-aware correction
//!
//! With hints on, the learner sees the first letters of every expected word
//! and only has to type the rest. A substitution is accepted when what the
//! learner typed is a run of the expected word that starts inside the revealed
//! letters (re-typing revealed letters is allowed) and reaches past them.

use crate::matching::types::{AlignmentOp, AlignmentPair, HintLevel};

/// Words longer than this reveal three letters at the partial level
const LONG_WORD_CHARS: usize = 5;

/// Character shown for each hidden letter
pub const HIDDEN_LETTER: char = '_';

/// Number of letters revealed for `expected` at `level`
pub fn visible_letters(level: HintLevel, expected: &str) -> usize {
    let len = expected.chars().count();
    let visible = match level {
        HintLevel::Off => 0,
        HintLevel::FirstLetter => 1,
        HintLevel::PartialLetters => {
            if len > LONG_WORD_CHARS {
                3
            } else {
                2
            }
        }
    };
    visible.min(len)
}

/// Whether an aligned pair counts as correct at the given hint level
///
/// Matches are always correct, insertions and deletions never are. At each
/// hint level the learner must supply at least one letter hidden at that
/// level.
pub fn is_correct_with_hint(pair: &AlignmentPair, level: HintLevel) -> bool {
    match pair.op() {
        AlignmentOp::Match => true,
        AlignmentOp::Insertion | AlignmentOp::Deletion => false,
        AlignmentOp::Substitution => match (pair.reference_word(), pair.user_word()) {
            (Some(expected), Some(typed)) => accepts_typed(expected, typed, level),
            _ => false,
        },
    }
}

/// Hint-level check on a raw word pair
///
/// Accepted at `level` when the hidden-part rule accepts at any hint level up
/// to it, so a larger hint never rejects what a smaller one accepted.
pub fn accepts_typed(expected: &str, typed: &str, level: HintLevel) -> bool {
    if expected == typed {
        return true;
    }
    if typed.is_empty() {
        return false;
    }

    let expected_chars: Vec<char> = expected.chars().collect();
    let typed_chars: Vec<char> = typed.chars().collect();

    [HintLevel::FirstLetter, HintLevel::PartialLetters]
        .into_iter()
        .filter(|l| *l <= level)
        .any(|l| {
            let visible = visible_letters(l, expected);
            completes_hidden_part(&expected_chars, &typed_chars, visible)
        })
}

/// `typed` is a run of `expected` starting inside the first `visible` letters
/// and ending past them
fn completes_hidden_part(expected: &[char], typed: &[char], visible: usize) -> bool {
    (0..=visible).any(|start| {
        let end = start + typed.len();
        end > visible && end <= expected.len() && expected[start..end] == typed[..]
    })
}

/// Hint rendering: revealed letters, then one placeholder per hidden letter
pub fn hint_text(expected: &str, level: HintLevel) -> String {
    let visible = visible_letters(level, expected);
    expected
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { c } else { HIDDEN_LETTER })
        .collect()
}
