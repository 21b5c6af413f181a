//! Matching core
//!
//! Compares the expected sentence against what the learner typed.
//!
//! ## Flow
//! 1. Normalization (umlaut digraphs, punctuation, whitespace, case)
//! 2. Word splitting
//! 3. Alignment (greedy lookahead or edit-distance table), scored by the
//!    fuzzy ladder
//! 4. Hint-aware correction of substitutions

mod aligner;
mod fuzzy;
mod hint;
mod normalizer;
mod rules;
mod tokenizer;
mod types;

pub use aligner::{align, align_exact, align_greedy, WordAligner};
pub use fuzzy::{
    apply_position_penalty, similarity, FuzzyMatch, FuzzyMatchType, FuzzyScorer,
    ACCEPTANCE_THRESHOLD, EXACT_MATCH_SCORE, LOOKAHEAD_WINDOW,
};
pub use hint::{accepts_typed, hint_text, is_correct_with_hint, visible_letters, HIDDEN_LETTER};
pub use normalizer::{normalize, split_words, substitute_umlauts};
pub use rules::UMLAUT_DIGRAPHS;
pub use tokenizer::{Token, TokenType, Tokenizer, WordToken};
pub use types::{AlignmentMode, AlignmentOp, AlignmentPair, AlignmentStats, HintLevel};
