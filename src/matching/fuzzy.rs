//! Fuzzy word scorer
//!
//! Scores how close a typed word is to an expected word. The ladder is
//! evaluated top to bottom; a later rung only replaces the current score when
//! it is strictly greater.
//!
//! 1. Exact match → 1.0
//! 2. Case-only difference (capitalization checked) → 0.95
//! 3. Compound containment (≥ 4 chars) → 0.85
//! 4. Edit distance → 0.5..=0.9
//! 5. Character positions → fraction of aligned equal chars
//! 6. Function words → at least 0.95

use strsim::levenshtein;

use crate::matching::rules::SHORT_WORDS;

/// Score above which a candidate is usable during alignment
pub const ACCEPTANCE_THRESHOLD: f64 = 0.38;

/// Score at or above which a pair counts as a match
pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Number of upcoming user words examined per reference word
pub const LOOKAHEAD_WINDOW: usize = 5;

const CASE_ONLY_SCORE: f64 = 0.95;
const FUNCTION_WORD_SCORE: f64 = 0.95;
const COMPOUND_SCORE: f64 = 0.85;
const COMPOUND_MIN_CHARS: usize = 4;
const EDIT_DISTANCE_MAX_RATIO: f64 = 0.6;
const EDIT_DISTANCE_BASE: f64 = 0.5;
const EDIT_DISTANCE_SPAN: f64 = 0.4;
const EDIT_DISTANCE_CEILING: f64 = 0.9;
const POSITION_PENALTY: f64 = 0.03;
const POSITION_PENALTY_STRICT: f64 = 0.01;
const POSITION_PENALTY_FLOOR: f64 = 0.4;

/// Scoring result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    /// Similarity in [0, 1]
    pub score: f64,
    /// Rung of the ladder that produced the score
    pub match_type: FuzzyMatchType,
}

/// Rung of the scoring ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyMatchType {
    /// Identical words
    Exact,
    /// Same letters, different case
    CaseOnly,
    /// One word contains the other
    Compound,
    /// Levenshtein similarity
    EditDistance,
    /// Character-position overlap
    Positional,
    /// Function-word leniency
    FunctionWord,
    /// Nothing in common
    None,
}

impl FuzzyMatch {
    fn new(score: f64, match_type: FuzzyMatchType) -> Self {
        Self { score, match_type }
    }

    fn none() -> Self {
        Self::new(0.0, FuzzyMatchType::None)
    }

    /// Replace with `other` when it scores strictly higher
    fn raise(&mut self, other: Option<FuzzyMatch>) {
        if let Some(other) = other {
            if other.score > self.score {
                *self = other;
            }
        }
    }
}

/// Fuzzy scorer
#[derive(Debug, Clone, Copy)]
pub struct FuzzyScorer {
    check_capitalization: bool,
}

impl FuzzyScorer {
    pub fn new(check_capitalization: bool) -> Self {
        Self {
            check_capitalization,
        }
    }

    pub fn check_capitalization(&self) -> bool {
        self.check_capitalization
    }

    /// Score a candidate (typed) word against the expected word
    pub fn score(&self, candidate: &str, expected: &str) -> FuzzyMatch {
        if candidate == expected {
            return FuzzyMatch::new(1.0, FuzzyMatchType::Exact);
        }
        if candidate.is_empty() || expected.is_empty() {
            return FuzzyMatch::none();
        }

        let candidate_lower = candidate.to_lowercase();
        let expected_lower = expected.to_lowercase();

        if candidate_lower == expected_lower {
            if !self.check_capitalization {
                return FuzzyMatch::new(1.0, FuzzyMatchType::Exact);
            }
            // Near miss; capitalization is enforced by the correctness decision
            let match_type = if SHORT_WORDS.contains(&candidate_lower) {
                FuzzyMatchType::FunctionWord
            } else {
                FuzzyMatchType::CaseOnly
            };
            let score = if match_type == FuzzyMatchType::FunctionWord {
                FUNCTION_WORD_SCORE
            } else {
                CASE_ONLY_SCORE
            };
            return FuzzyMatch::new(score, match_type);
        }

        let (a, b) = if self.check_capitalization {
            (candidate, expected)
        } else {
            (candidate_lower.as_str(), expected_lower.as_str())
        };

        let mut best = FuzzyMatch::none();
        best.raise(compound_containment(&candidate_lower, &expected_lower));
        best.raise(edit_distance_similarity(a, b));
        best.raise(positional_similarity(a, b));
        best
    }
}

/// Similarity in [0, 1] between a typed word and the expected word
pub fn similarity(candidate: &str, expected: &str, check_capitalization: bool) -> f64 {
    FuzzyScorer::new(check_capitalization)
        .score(candidate, expected)
        .score
}

/// Penalize candidates that sit `offset` words ahead of the cursor
///
/// Floored at 0.4; a score already at or below the floor is left as is.
pub fn apply_position_penalty(score: f64, offset: usize, check_capitalization: bool) -> f64 {
    if offset == 0 || score <= POSITION_PENALTY_FLOOR {
        return score;
    }
    let per_step = if check_capitalization {
        POSITION_PENALTY_STRICT
    } else {
        POSITION_PENALTY
    };
    (score - offset as f64 * per_step).max(POSITION_PENALTY_FLOOR)
}

/// Compound containment: "morgen" inside "montagmorgen"
fn compound_containment(a: &str, b: &str) -> Option<FuzzyMatch> {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if shorter.chars().count() >= COMPOUND_MIN_CHARS && longer.contains(shorter) {
        return Some(FuzzyMatch::new(COMPOUND_SCORE, FuzzyMatchType::Compound));
    }
    None
}

fn edit_distance_similarity(a: &str, b: &str) -> Option<FuzzyMatch> {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return None;
    }

    let ratio = levenshtein(a, b) as f64 / longer as f64;
    if ratio >= EDIT_DISTANCE_MAX_RATIO {
        return None;
    }

    let score = (EDIT_DISTANCE_BASE + EDIT_DISTANCE_SPAN * (1.0 - ratio))
        .clamp(EDIT_DISTANCE_BASE, EDIT_DISTANCE_CEILING);
    Some(FuzzyMatch::new(score, FuzzyMatchType::EditDistance))
}

fn positional_similarity(a: &str, b: &str) -> Option<FuzzyMatch> {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return None;
    }

    let same = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    Some(FuzzyMatch::new(
        same as f64 / longer as f64,
        FuzzyMatchType::Positional,
    ))
}
