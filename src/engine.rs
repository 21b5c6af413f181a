//! Dictation engine
//!
//! Combines normalization, alignment, hint correction and scoring behind one
//! configured value.

use std::time::Instant;

use crate::captions::Segment;
use crate::config::EngineConfig;
use crate::feedback::{
    char_diff, compute_report_with, DictationReport, SentenceComparison, SentenceResult,
    WordFeedback,
};
use crate::matching::{
    accepts_typed, hint_text, similarity, split_words, substitute_umlauts, visible_letters,
    AlignmentMode, AlignmentOp, AlignmentPair, AlignmentStats, HintLevel, Tokenizer,
    WordAligner,
};

/// Dictation engine (reusable, holds no per-exercise state)
#[derive(Debug, Clone)]
pub struct DictationEngine {
    config: EngineConfig,
    aligner: WordAligner,
}

impl Default for DictationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DictationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let aligner = config.aligner();
        Self { config, aligner }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalize with the configured case handling
    pub fn normalize(&self, text: &str) -> String {
        crate::matching::normalize(text, self.config.check_capitalization)
    }

    /// Normalized words of a sentence
    pub fn words(&self, text: &str) -> Vec<String> {
        split_words(text, self.config.check_capitalization)
    }

    /// Digraph replacement applied to the input box while typing
    pub fn rewrite_live_input(&self, text: &str) -> String {
        substitute_umlauts(text)
    }

    /// Hint rendering for every word of a sentence
    pub fn hints(&self, expected: &str, level: HintLevel) -> Vec<String> {
        self.words(expected)
            .iter()
            .map(|word| hint_text(word, level))
            .collect()
    }

    pub fn align(&self, expected: &str, actual: &str, mode: AlignmentMode) -> Vec<AlignmentPair> {
        self.aligner
            .align(&self.words(expected), &self.words(actual), mode)
    }

    /// Compare a submitted sentence
    pub fn compare_sentence(
        &self,
        expected: &str,
        actual: &str,
        hint_level: HintLevel,
    ) -> SentenceComparison {
        let start = Instant::now();

        let pairs = self.align(expected, actual, self.config.report_alignment_mode);
        let feedback: Vec<WordFeedback> = pairs
            .iter()
            .map(|pair| verdict(pair, hint_level))
            .collect();

        let comparison = build_comparison(expected, actual, hint_level, pairs, feedback);

        tracing::debug!(
            "compare_sentence: {} words, correct={}, is_correct={}, {}us",
            comparison.feedback.len(),
            comparison.correct_words(),
            comparison.is_correct,
            start.elapsed().as_micros()
        );

        comparison
    }

    /// Feedback while the learner is still typing
    ///
    /// Reference words after the last typed word are `Pending`, not missing.
    /// A last word still being typed is `Typing` while it is on track for the
    /// next expected word.
    pub fn live_feedback(
        &self,
        expected: &str,
        partial: &str,
        hint_level: HintLevel,
    ) -> SentenceComparison {
        let caps = self.config.check_capitalization;
        let reference = self.words(expected);
        let typed: Vec<String> = Tokenizer::words(partial, caps)
            .into_iter()
            .map(|token| token.normalized)
            .collect();
        let mode = self.config.live_alignment_mode;

        if Tokenizer::ends_mid_word(partial) {
            if let Some((last, completed)) = typed.split_last() {
                let mut pairs = self.aligner.align(&reference, completed, mode);
                let mut feedback = live_verdicts(&pairs, hint_level);

                let next = pairs
                    .iter()
                    .rposition(|p| p.user_word().is_some())
                    .map_or(0, |idx| idx + 1);
                let next_expected = pairs
                    .get(next)
                    .filter(|p| p.op() == AlignmentOp::Deletion)
                    .and_then(|p| p.reference_word())
                    .map(str::to_string);

                if let Some(word) = next_expected {
                    if word == *last {
                        pairs[next] = AlignmentPair::matched(word.as_str(), last.as_str());
                        feedback[next] = WordFeedback::Correct { word };
                        return build_comparison(expected, partial, hint_level, pairs, feedback);
                    }
                    if on_track(&word, last, hint_level) {
                        let score = similarity(last, &word, caps);
                        pairs[next] = AlignmentPair::substitution(word.as_str(), last.as_str(), score);
                        feedback[next] = WordFeedback::Typing {
                            expected: word,
                            typed: last.clone(),
                        };
                        return build_comparison(expected, partial, hint_level, pairs, feedback);
                    }
                }
            }
        }

        let pairs = self.aligner.align(&reference, &typed, mode);
        let feedback = live_verdicts(&pairs, hint_level);
        build_comparison(expected, partial, hint_level, pairs, feedback)
    }

    /// Report with the configured aligner and report mode
    pub fn report(
        &self,
        segments: &[Segment],
        results: &[Option<SentenceResult>],
        elapsed_seconds: f64,
        max_hint_level_used: HintLevel,
    ) -> DictationReport {
        compute_report_with(
            &self.aligner,
            self.config.report_alignment_mode,
            segments,
            results,
            elapsed_seconds,
            max_hint_level_used,
            self.config.check_capitalization,
        )
    }
}

/// Verdicts with trailing deletions shown as not reached yet
fn live_verdicts(pairs: &[AlignmentPair], hint_level: HintLevel) -> Vec<WordFeedback> {
    let last_typed = pairs.iter().rposition(|p| p.user_word().is_some());
    pairs
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            let reached = last_typed.is_some_and(|last| idx < last);
            if pair.op() == AlignmentOp::Deletion && !reached {
                WordFeedback::Pending {
                    expected: pair.reference_word().unwrap_or_default().to_string(),
                }
            } else {
                verdict(pair, hint_level)
            }
        })
        .collect()
}

/// Whether a partly typed word can still become the expected word
///
/// With hints, typing may start anywhere inside the revealed letters.
fn on_track(expected: &str, typed: &str, hint_level: HintLevel) -> bool {
    let visible = visible_letters(hint_level, expected);
    expected
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(expected.len()))
        .take(visible + 1)
        .any(|start| expected[start..].starts_with(typed))
}

/// Verdict for one aligned pair of a finished sentence
fn verdict(pair: &AlignmentPair, hint_level: HintLevel) -> WordFeedback {
    let expected = pair.reference_word().unwrap_or_default().to_string();
    let typed = pair.user_word().unwrap_or_default().to_string();

    match pair.op() {
        AlignmentOp::Match => WordFeedback::Correct { word: expected },
        AlignmentOp::Substitution => {
            if accepts_typed(&expected, &typed, hint_level) {
                WordFeedback::HintCorrected { expected, typed }
            } else {
                let diff = char_diff(&expected, &typed);
                WordFeedback::Misspelled {
                    expected,
                    typed,
                    similarity: pair.score(),
                    diff,
                }
            }
        }
        AlignmentOp::Deletion => WordFeedback::Missing { expected },
        AlignmentOp::Insertion => WordFeedback::Extra { typed },
    }
}

fn build_comparison(
    expected: &str,
    actual: &str,
    hint_level: HintLevel,
    pairs: Vec<AlignmentPair>,
    feedback: Vec<WordFeedback>,
) -> SentenceComparison {
    let stats = AlignmentStats::from_pairs(&pairs);
    let is_correct = feedback.iter().all(WordFeedback::is_correct);

    SentenceComparison {
        expected: expected.to_string(),
        actual: actual.to_string(),
        hint_level,
        pairs,
        feedback,
        stats,
        is_correct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::CharSpanKind;

    fn engine() -> DictationEngine {
        DictationEngine::default()
    }

    #[test]
    fn test_compare_correct_sentence() {
        let result = engine().compare_sentence("Berlin ist schön.", "berlin ist schoen", HintLevel::Off);
        assert!(result.is_correct);
        assert_eq!(result.correct_words(), 3);
        assert_eq!(result.stats.matches, 3);
        assert_eq!(result.to_result().actual, "berlin ist schoen");
    }

    #[test]
    fn test_compare_misspelled_word() {
        let result = engine().compare_sentence("Berlin ist schön.", "Berlin ist schon", HintLevel::Off);
        assert!(!result.is_correct);
        assert_eq!(result.stats.matches, 2);
        assert_eq!(result.stats.substitutions, 1);

        match &result.feedback[2] {
            WordFeedback::Misspelled {
                expected,
                typed,
                similarity,
                diff,
            } => {
                assert_eq!(expected, "schön");
                assert_eq!(typed, "schon");
                assert!(*similarity >= 0.5);
                assert!(diff.iter().any(|s| s.kind == CharSpanKind::Missing && s.text == "ö"));
            }
            other => panic!("unexpected feedback: {:?}", other),
        }
        assert!(!result.to_result().is_correct);
    }

    #[test]
    fn test_compare_missing_and_extra() {
        let result = engine().compare_sentence("Es ist kalt", "ist kalt heute", HintLevel::Off);
        assert_eq!(
            result.feedback,
            vec![
                WordFeedback::Missing {
                    expected: "es".to_string()
                },
                WordFeedback::Correct {
                    word: "ist".to_string()
                },
                WordFeedback::Correct {
                    word: "kalt".to_string()
                },
                WordFeedback::Extra {
                    typed: "heute".to_string()
                },
            ]
        );
        assert!(!result.is_correct);
    }

    #[test]
    fn test_compare_with_hint() {
        let result = engine().compare_sentence("Es ist kalt", "Es st kalt", HintLevel::FirstLetter);
        assert!(result.is_correct);
        assert_eq!(
            result.feedback[1],
            WordFeedback::HintCorrected {
                expected: "ist".to_string(),
                typed: "st".to_string()
            }
        );

        let result = engine().compare_sentence("Es ist kalt", "Es st kalt", HintLevel::Off);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_capitalization_checked() {
        let strict = DictationEngine::new(EngineConfig {
            check_capitalization: true,
            ..EngineConfig::default()
        });
        assert!(!strict.compare_sentence("Berlin", "berlin", HintLevel::Off).is_correct);
        assert!(strict.compare_sentence("Berlin", "Berlin", HintLevel::Off).is_correct);
        assert!(engine().compare_sentence("Berlin", "berlin", HintLevel::Off).is_correct);
    }

    #[test]
    fn test_live_feedback_typing() {
        let result = engine().live_feedback("Es ist kalt", "Es is", HintLevel::Off);
        assert_eq!(
            result.feedback,
            vec![
                WordFeedback::Correct {
                    word: "es".to_string()
                },
                WordFeedback::Typing {
                    expected: "ist".to_string(),
                    typed: "is".to_string()
                },
                WordFeedback::Pending {
                    expected: "kalt".to_string()
                },
            ]
        );
        assert!(!result.is_correct);
    }

    #[test]
    fn test_live_feedback_pending_after_space() {
        let result = engine().live_feedback("Es ist kalt", "Es ist ", HintLevel::Off);
        assert_eq!(result.feedback.len(), 3);
        assert!(result.feedback[0].is_correct());
        assert!(result.feedback[1].is_correct());
        assert!(matches!(result.feedback[2], WordFeedback::Pending { .. }));
    }

    #[test]
    fn test_live_feedback_empty_input() {
        let result = engine().live_feedback("Es ist kalt", "", HintLevel::Off);
        assert!(result
            .feedback
            .iter()
            .all(|f| matches!(f, WordFeedback::Pending { .. })));

        let result = engine().live_feedback("Es ist kalt", "Es ist kalt", HintLevel::Off);
        assert!(result.is_correct);
    }

    #[test]
    fn test_live_feedback_single_letter() {
        let result = engine().live_feedback("Berlin ist schön", "Berlin i", HintLevel::Off);
        assert_eq!(result.feedback.len(), 3);
        assert!(matches!(result.feedback[1], WordFeedback::Typing { .. }));
        assert!(matches!(result.feedback[2], WordFeedback::Pending { .. }));
    }

    #[test]
    fn test_live_feedback_off_track() {
        let result = engine().live_feedback("Es ist kalt", "Es ist warm", HintLevel::Off);
        assert!(result.feedback[0].is_correct());
        assert!(result.feedback[1].is_correct());
        assert!(!result.is_correct);
        assert!(!matches!(result.feedback[2], WordFeedback::Typing { .. }));
    }

    #[test]
    fn test_on_track_with_hint() {
        assert!(on_track("kalt", "ka", HintLevel::Off));
        assert!(!on_track("kalt", "al", HintLevel::Off));
        assert!(on_track("kalt", "al", HintLevel::FirstLetter));
        assert!(on_track("schön", "hö", HintLevel::PartialLetters));
        assert!(!on_track("schön", "n", HintLevel::PartialLetters));
    }

    #[test]
    fn test_hints() {
        assert_eq!(
            engine().hints("Es ist Montagmorgen", HintLevel::PartialLetters),
            vec!["es".to_string(), "is_".to_string(), format!("mon{}", "_".repeat(9))]
        );
        assert_eq!(engine().rewrite_live_input("schoen"), "schön");
    }

    #[test]
    fn test_report_uses_config() {
        let segments = crate::captions::segment_captions(
            "WEBVTT\n\n00:01.000 --> 00:02.000\nEs ist kalt.\n",
        );
        let comparison = engine().compare_sentence(&segments[0].text, "Es ist kalt", HintLevel::Off);
        let report = engine().report(&segments, &[Some(comparison.to_result())], 18.0, HintLevel::Off);
        // 3 words in 0.3 minutes → 10 wpm → speed factor 1.0
        assert_eq!(report.correct_words, 3);
        assert_eq!(report.score, 100);
    }
}
