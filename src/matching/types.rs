//! Matching type definitions

use serde::{Deserialize, Serialize};

/// Alignment operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentOp {
    /// Reference word reproduced (exactly, under the capitalization rule)
    Match,
    /// Reference word paired with a different user word
    Substitution,
    /// User word with no reference counterpart
    Insertion,
    /// Reference word the learner left out
    Deletion,
}

/// One step of an alignment
///
/// `reference_word` is `None` only for insertions, `user_word` only for
/// deletions. The constructors are the only way to build a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPair {
    reference_word: Option<String>,
    user_word: Option<String>,
    op: AlignmentOp,
    /// Fuzzy score that justified the pairing (0.0 for insertions/deletions)
    score: f64,
}

impl AlignmentPair {
    pub fn matched(reference: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            reference_word: Some(reference.into()),
            user_word: Some(user.into()),
            op: AlignmentOp::Match,
            score: 1.0,
        }
    }

    pub fn substitution(reference: impl Into<String>, user: impl Into<String>, score: f64) -> Self {
        Self {
            reference_word: Some(reference.into()),
            user_word: Some(user.into()),
            op: AlignmentOp::Substitution,
            score,
        }
    }

    pub fn insertion(user: impl Into<String>) -> Self {
        Self {
            reference_word: None,
            user_word: Some(user.into()),
            op: AlignmentOp::Insertion,
            score: 0.0,
        }
    }

    pub fn deletion(reference: impl Into<String>) -> Self {
        Self {
            reference_word: Some(reference.into()),
            user_word: None,
            op: AlignmentOp::Deletion,
            score: 0.0,
        }
    }

    pub fn op(&self) -> AlignmentOp {
        self.op
    }

    pub fn reference_word(&self) -> Option<&str> {
        self.reference_word.as_deref()
    }

    pub fn user_word(&self) -> Option<&str> {
        self.user_word.as_deref()
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Hint level for the whole exercise
///
/// Ordered, so `max()` over the levels used gives the penalty level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HintLevel {
    /// No letters revealed
    #[default]
    Off,
    /// First letter revealed
    FirstLetter,
    /// Two or three leading letters revealed
    PartialLetters,
}

impl HintLevel {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(HintLevel::Off),
            1 => Some(HintLevel::FirstLetter),
            2 => Some(HintLevel::PartialLetters),
            _ => None,
        }
    }

    pub fn as_level(&self) -> u8 {
        match self {
            HintLevel::Off => 0,
            HintLevel::FirstLetter => 1,
            HintLevel::PartialLetters => 2,
        }
    }
}

/// Alignment strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Bounded lookahead, used while the learner is typing
    Greedy,
    /// Full edit-distance table, used for statistics and reports
    #[default]
    Optimal,
}

/// Per-op counts of an alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub matches: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl AlignmentStats {
    pub fn from_pairs(pairs: &[AlignmentPair]) -> Self {
        let mut stats = Self::default();
        for pair in pairs {
            match pair.op() {
                AlignmentOp::Match => stats.matches += 1,
                AlignmentOp::Substitution => stats.substitutions += 1,
                AlignmentOp::Insertion => stats.insertions += 1,
                AlignmentOp::Deletion => stats.deletions += 1,
            }
        }
        stats
    }

    /// Reference words consumed (everything except insertions)
    pub fn reference_len(&self) -> usize {
        self.matches + self.substitutions + self.deletions
    }

    /// User words consumed (everything except deletions)
    pub fn user_len(&self) -> usize {
        self.matches + self.substitutions + self.insertions
    }
}
