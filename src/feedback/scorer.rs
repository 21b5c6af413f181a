// Scorer
//
// score = round(clamp(accuracy% × speed factor × hint multiplier, 0, 100))
//
// Speed and accuracy multiply; the hint penalty is applied once for the whole
// exercise, based on the highest hint level used.

use crate::captions::{reference_word_count, Segment};
use crate::feedback::types::{DictationReport, SentenceResult};
use crate::matching::{
    is_correct_with_hint, split_words, AlignmentMode, AlignmentOp, HintLevel, WordAligner,
};

/// Speed factor ceiling
pub const MAX_SPEED_FACTOR: f64 = 2.5;

/// Words per minute worth one unit of speed factor
const WPM_PER_SPEED_UNIT: f64 = 10.0;

const MAX_SCORE: f64 = 100.0;

/// Hint penalty multiplier for the highest level used
pub fn hint_penalty_multiplier(level: HintLevel) -> f64 {
    match level {
        HintLevel::Off => 1.0,
        HintLevel::FirstLetter => 0.8,
        HintLevel::PartialLetters => 0.6,
    }
}

/// correct / (correct + substitutions + insertions) × 100, 0 when nothing was typed
pub fn accuracy_percent(correct: usize, substitutions: usize, insertions: usize) -> f64 {
    let denominator = correct + substitutions + insertions;
    if denominator == 0 {
        return 0.0;
    }
    correct as f64 / denominator as f64 * 100.0
}

/// Typed words per minute, 0 without elapsed time
pub fn words_per_minute(user_words: usize, elapsed_seconds: f64) -> f64 {
    if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
        return 0.0;
    }
    user_words as f64 / (elapsed_seconds / 60.0)
}

pub fn speed_factor(words_per_minute: f64) -> f64 {
    (words_per_minute / WPM_PER_SPEED_UNIT).min(MAX_SPEED_FACTOR)
}

/// Final 0..=100 score
pub fn score_formula(accuracy_percent: f64, words_per_minute: f64, max_hint_level: HintLevel) -> u32 {
    let raw = accuracy_percent * speed_factor(words_per_minute) * hint_penalty_multiplier(max_hint_level);
    if !raw.is_finite() {
        return 0;
    }
    raw.clamp(0.0, MAX_SCORE).round() as u32
}

/// Word counts gathered over attempted sentences
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    correct: usize,
    hint_corrected: usize,
    substitutions: usize,
    insertions: usize,
    deletions: usize,
    user_words: usize,
    attempted: usize,
}

/// Build the report with the default (optimal) alignment
pub fn compute_report(
    segments: &[Segment],
    results: &[Option<SentenceResult>],
    elapsed_seconds: f64,
    max_hint_level_used: HintLevel,
    check_capitalization: bool,
) -> DictationReport {
    compute_report_with(
        &WordAligner::new(check_capitalization),
        AlignmentMode::Optimal,
        segments,
        results,
        elapsed_seconds,
        max_hint_level_used,
        check_capitalization,
    )
}

/// Build the report with an explicit aligner and mode
pub fn compute_report_with(
    aligner: &WordAligner,
    mode: AlignmentMode,
    segments: &[Segment],
    results: &[Option<SentenceResult>],
    elapsed_seconds: f64,
    max_hint_level_used: HintLevel,
    check_capitalization: bool,
) -> DictationReport {
    let mut tally = Tally::default();

    for result in results.iter().flatten() {
        let reference = split_words(&result.expected, check_capitalization);
        let typed = split_words(&result.actual, check_capitalization);

        tally.attempted += 1;
        tally.user_words += typed.len();

        for pair in aligner.align(&reference, &typed, mode) {
            match pair.op() {
                AlignmentOp::Match => tally.correct += 1,
                AlignmentOp::Substitution => {
                    if is_correct_with_hint(&pair, max_hint_level_used) {
                        tally.correct += 1;
                        tally.hint_corrected += 1;
                    } else {
                        tally.substitutions += 1;
                    }
                }
                AlignmentOp::Insertion => tally.insertions += 1,
                AlignmentOp::Deletion => tally.deletions += 1,
            }
        }
    }

    let accuracy = accuracy_percent(tally.correct, tally.substitutions, tally.insertions);
    let wpm = words_per_minute(tally.user_words, elapsed_seconds);
    let score = score_formula(accuracy, wpm, max_hint_level_used);

    tracing::debug!(
        "compute_report: attempted={}, correct={}, sub={}, ins={}, del={}, accuracy={:.1}, wpm={:.1}, score={}",
        tally.attempted,
        tally.correct,
        tally.substitutions,
        tally.insertions,
        tally.deletions,
        accuracy,
        wpm,
        score
    );

    DictationReport {
        total_reference_words: reference_word_count(segments),
        attempted_sentences: tally.attempted,
        skipped_sentences: segments.len().saturating_sub(tally.attempted),
        correct_words: tally.correct,
        hint_corrected_words: tally.hint_corrected,
        substituted_words: tally.substitutions,
        inserted_words: tally.insertions,
        deleted_words: tally.deletions,
        user_word_count: tally.user_words,
        accuracy_percent: accuracy,
        words_per_minute: wpm,
        speed_factor: speed_factor(wpm),
        hint_penalty_multiplier: hint_penalty_multiplier(max_hint_level_used),
        max_hint_level_used,
        elapsed_seconds: if elapsed_seconds.is_finite() {
            elapsed_seconds.max(0.0)
        } else {
            0.0
        },
        score,
    }
}
