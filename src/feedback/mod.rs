//! Learner feedback
//!
//! Per-word verdicts, character diffs for misspelled words and the exercise
//! report.

mod char_diff;
mod scorer;
mod types;

pub use char_diff::{char_diff, CharSpan, CharSpanKind};
pub use scorer::{
    accuracy_percent, compute_report, compute_report_with, hint_penalty_multiplier,
    score_formula, speed_factor, words_per_minute, MAX_SPEED_FACTOR,
};
pub use types::{DictationReport, SentenceComparison, SentenceResult, WordFeedback};
