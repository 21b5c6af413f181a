// Feedback and report types

use serde::{Deserialize, Serialize};

use crate::feedback::char_diff::CharSpan;
use crate::matching::{AlignmentPair, AlignmentStats, HintLevel};

/// Outcome of one attempted sentence
///
/// Unattempted sentences have no result at all (`None` in the session list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceResult {
    pub expected: String,
    pub actual: String,
    pub is_correct: bool,
}

/// Per-word verdict shown to the learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordFeedback {
    /// Typed exactly
    Correct { word: String },
    /// Accepted because only the hidden part of the hint had to be typed
    HintCorrected { expected: String, typed: String },
    /// Paired with the expected word but wrong
    Misspelled {
        expected: String,
        typed: String,
        similarity: f64,
        diff: Vec<CharSpan>,
    },
    /// Expected word left out
    Missing { expected: String },
    /// Typed word with no counterpart
    Extra { typed: String },
    /// Live only: the learner has not reached this word yet
    Pending { expected: String },
    /// Live only: the last word is still being typed and is on track
    Typing { expected: String, typed: String },
}

impl WordFeedback {
    pub fn is_correct(&self) -> bool {
        matches!(
            self,
            WordFeedback::Correct { .. } | WordFeedback::HintCorrected { .. }
        )
    }

    /// Expected word this verdict refers to, if any
    pub fn expected(&self) -> Option<&str> {
        match self {
            WordFeedback::Correct { word } => Some(word),
            WordFeedback::HintCorrected { expected, .. }
            | WordFeedback::Misspelled { expected, .. }
            | WordFeedback::Missing { expected }
            | WordFeedback::Pending { expected }
            | WordFeedback::Typing { expected, .. } => Some(expected),
            WordFeedback::Extra { .. } => None,
        }
    }
}

/// Full comparison of one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceComparison {
    pub expected: String,
    pub actual: String,
    pub hint_level: HintLevel,
    pub pairs: Vec<AlignmentPair>,
    pub feedback: Vec<WordFeedback>,
    pub stats: AlignmentStats,
    pub is_correct: bool,
}

impl SentenceComparison {
    pub fn to_result(&self) -> SentenceResult {
        SentenceResult {
            expected: self.expected.clone(),
            actual: self.actual.clone(),
            is_correct: self.is_correct,
        }
    }

    /// Words judged correct, hint corrections included
    pub fn correct_words(&self) -> usize {
        self.feedback.iter().filter(|f| f.is_correct()).count()
    }
}

/// Aggregate result of an exercise
///
/// Derived from segments and sentence results each time it is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictationReport {
    /// Reference words over the entire transcript
    pub total_reference_words: usize,
    pub attempted_sentences: usize,
    pub skipped_sentences: usize,
    /// Matches plus hint-corrected substitutions
    pub correct_words: usize,
    pub hint_corrected_words: usize,
    pub substituted_words: usize,
    pub inserted_words: usize,
    pub deleted_words: usize,
    pub user_word_count: usize,
    pub accuracy_percent: f64,
    pub words_per_minute: f64,
    pub speed_factor: f64,
    pub hint_penalty_multiplier: f64,
    pub max_hint_level_used: HintLevel,
    pub elapsed_seconds: f64,
    /// 0..=100
    pub score: u32,
}
