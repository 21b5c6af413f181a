//! German dictation matching and scoring
//!
//! The learner hears one caption segment at a time and types it. This crate
//! turns caption payloads into sentences, compares typed text with the
//! expected text word by word (umlaut digraphs, typos, compounds, hints) and
//! scores the whole exercise.
//!
//! ```ignore
//! let segments = dictation_engine::segment_captions(payload);
//! let engine = DictationEngine::default();
//! let comparison = engine.compare_sentence(&segments[0].text, typed, HintLevel::Off);
//! ```

pub mod captions;
pub mod config;
pub mod engine;
pub mod feedback;
pub mod matching;
pub mod session;

pub use captions::{segment_captions, Segment};
pub use config::EngineConfig;
pub use engine::DictationEngine;
pub use feedback::{
    compute_report, score_formula, DictationReport, SentenceComparison, SentenceResult,
    WordFeedback,
};
pub use matching::{
    align, align_exact, align_greedy, is_correct_with_hint, normalize, similarity,
    substitute_umlauts, AlignmentMode, AlignmentOp, AlignmentPair, HintLevel,
};
pub use session::{ExerciseSession, Navigation, PlaybackRequest, SessionState};
