//! Exercise session
//!
//! Drives one dictation exercise: which sentence is current, what the player
//! should play, which results have been stored, and the hint level in force.
//!
//! Idle → Playing → WaitingForInput → Navigating → (next sentence) … → Completed
//!
//! A report can be requested in any state.

use std::time::Instant;

use anyhow::{bail, Result};
use uuid::Uuid;

use crate::captions::{segment_captions, Segment};
use crate::config::EngineConfig;
use crate::engine::DictationEngine;
use crate::feedback::{DictationReport, SentenceComparison, SentenceResult};
use crate::matching::HintLevel;
use crate::session::types::{Navigation, PlaybackRequest, SessionState};

pub struct ExerciseSession {
    id: Uuid,
    engine: DictationEngine,
    segments: Vec<Segment>,
    /// One slot per segment, `None` until attempted
    results: Vec<Option<SentenceResult>>,
    current: usize,
    state: SessionState,
    hint_level: HintLevel,
    max_hint_level_used: HintLevel,
    started_at: Option<Instant>,
}

impl ExerciseSession {
    pub fn new(segments: Vec<Segment>, config: EngineConfig) -> Self {
        let id = Uuid::new_v4();
        tracing::info!("Session {}: created with {} segments", id, segments.len());

        Self {
            id,
            engine: DictationEngine::new(config),
            results: vec![None; segments.len()],
            segments,
            current: 0,
            state: SessionState::Idle,
            hint_level: HintLevel::Off,
            max_hint_level_used: HintLevel::Off,
            started_at: None,
        }
    }

    /// Build a session straight from a caption payload
    pub fn from_captions(payload: &str, config: EngineConfig) -> Result<Self> {
        let segments = segment_captions(payload);
        if segments.is_empty() {
            bail!("caption payload contains no usable cues");
        }
        Ok(Self::new(segments, config))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine(&self) -> &DictationEngine {
        &self.engine
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn results(&self) -> &[Option<SentenceResult>] {
        &self.results
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_segment(&self) -> Option<&Segment> {
        self.segments.get(self.current)
    }

    pub fn hint_level(&self) -> HintLevel {
        self.hint_level
    }

    pub fn max_hint_level_used(&self) -> HintLevel {
        self.max_hint_level_used
    }

    /// Seconds since `start()`, 0 before that
    pub fn elapsed_seconds(&self) -> f64 {
        self.started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Begin with the current segment
    pub fn start(&mut self) -> Result<PlaybackRequest> {
        self.expect_state("start", &[SessionState::Idle])?;
        if self.segments.is_empty() {
            bail!("cannot start a session without segments");
        }

        self.started_at = Some(Instant::now());
        tracing::info!("Session {}: started", self.id);
        self.play_current()
    }

    /// The player reached the end of the segment
    pub fn playback_ended(&mut self) -> Result<()> {
        self.expect_state("end playback", &[SessionState::Playing])?;
        self.state = SessionState::WaitingForInput;
        Ok(())
    }

    /// Play the current segment again
    pub fn replay(&mut self) -> Result<PlaybackRequest> {
        self.expect_state(
            "replay",
            &[
                SessionState::Playing,
                SessionState::WaitingForInput,
                SessionState::Navigating,
            ],
        )?;
        self.play_current()
    }

    /// Change the hint level; the highest level ever set counts for the report
    pub fn set_hint_level(&mut self, level: HintLevel) -> Result<()> {
        if self.state == SessionState::Completed {
            bail!("cannot change hints while {}", self.state);
        }

        self.hint_level = level;
        if level > self.max_hint_level_used {
            tracing::info!(
                "Session {}: hint level raised to {}",
                self.id,
                level.as_level()
            );
            self.max_hint_level_used = level;
        }
        Ok(())
    }

    /// Hint rendering for the words of the current sentence
    pub fn current_hints(&self) -> Vec<String> {
        self.current_segment()
            .map(|segment| self.engine.hints(&segment.text, self.hint_level))
            .unwrap_or_default()
    }

    /// Feedback on partial input for the current sentence
    pub fn live_feedback(&self, partial: &str) -> Result<SentenceComparison> {
        let segment = self.input_segment("give live feedback")?;
        Ok(self
            .engine
            .live_feedback(&segment.text, partial, self.hint_level))
    }

    /// Store the learner's answer for the current sentence
    pub fn submit(&mut self, input: &str) -> Result<SentenceComparison> {
        let segment = self.input_segment("submit")?;
        let comparison = self
            .engine
            .compare_sentence(&segment.text, input, self.hint_level);

        tracing::info!(
            "Session {}: sentence {} submitted, correct={}",
            self.id,
            self.current + 1,
            comparison.is_correct
        );

        self.results[self.current] = Some(comparison.to_result());
        self.state = SessionState::Navigating;
        Ok(comparison)
    }

    /// Leave the current sentence without an answer
    ///
    /// An earlier stored answer for this sentence is kept.
    pub fn skip(&mut self) -> Result<()> {
        self.expect_state(
            "skip",
            &[SessionState::Playing, SessionState::WaitingForInput],
        )?;
        tracing::info!("Session {}: sentence {} skipped", self.id, self.current + 1);
        self.state = SessionState::Navigating;
        Ok(())
    }

    /// Move to the following sentence, or complete after the last one
    pub fn next(&mut self) -> Result<Navigation> {
        self.expect_navigable("go to the next sentence")?;

        if self.current + 1 >= self.segments.len() {
            self.complete();
            return Ok(Navigation::Completed);
        }

        self.current += 1;
        self.play_current().map(Navigation::Play)
    }

    pub fn previous(&mut self) -> Result<PlaybackRequest> {
        self.expect_navigable("go to the previous sentence")?;
        if self.current == 0 {
            bail!("already at the first sentence");
        }

        self.current -= 1;
        self.play_current()
    }

    pub fn go_to(&mut self, index: usize) -> Result<PlaybackRequest> {
        self.expect_navigable("jump to a sentence")?;
        if index >= self.segments.len() {
            bail!(
                "sentence index {} out of range (0..{})",
                index,
                self.segments.len()
            );
        }

        self.current = index;
        self.play_current()
    }

    /// Report for the results stored so far
    ///
    /// Allowed in every state, including mid-sentence.
    pub fn report(&self, elapsed_seconds: f64) -> DictationReport {
        self.engine.report(
            &self.segments,
            &self.results,
            elapsed_seconds,
            self.max_hint_level_used,
        )
    }

    /// Complete the exercise and report
    ///
    /// Without an explicit elapsed time, the time since `start()` is used.
    pub fn finish(&mut self, elapsed_seconds: Option<f64>) -> DictationReport {
        let elapsed = elapsed_seconds.unwrap_or_else(|| self.elapsed_seconds());
        self.complete();
        self.report(elapsed)
    }

    /// Drop every result and go back to the first sentence
    pub fn restart(&mut self) {
        tracing::info!("Session {}: restarted", self.id);
        self.results = vec![None; self.segments.len()];
        self.current = 0;
        self.state = SessionState::Idle;
        self.max_hint_level_used = self.hint_level;
        self.started_at = None;
    }

    fn play_current(&mut self) -> Result<PlaybackRequest> {
        let Some(segment) = self.segments.get(self.current) else {
            bail!("no segment at index {}", self.current);
        };
        let request = PlaybackRequest::for_segment(self.current, segment);
        self.state = SessionState::Playing;

        tracing::debug!(
            "Session {}: playing segment {} ({:.3}s - {:.3}s)",
            self.id,
            request.index,
            request.start_time,
            request.end_time
        );
        Ok(request)
    }

    fn complete(&mut self) {
        if self.state != SessionState::Completed {
            tracing::info!(
                "Session {}: completed, {} of {} sentences attempted",
                self.id,
                self.results.iter().flatten().count(),
                self.segments.len()
            );
        }
        self.state = SessionState::Completed;
    }

    fn input_segment(&self, action: &str) -> Result<&Segment> {
        if !self.state.accepts_input() {
            bail!("cannot {} while {}", action, self.state);
        }
        match self.segments.get(self.current) {
            Some(segment) => Ok(segment),
            None => bail!("no segment at index {}", self.current),
        }
    }

    /// Navigation is allowed once playback has begun and before completion
    fn expect_navigable(&self, action: &str) -> Result<()> {
        self.expect_state(
            action,
            &[
                SessionState::Playing,
                SessionState::WaitingForInput,
                SessionState::Navigating,
            ],
        )
    }

    fn expect_state(&self, action: &str, allowed: &[SessionState]) -> Result<()> {
        if !allowed.contains(&self.state) {
            bail!("cannot {} while {}", action, self.state);
        }
        Ok(())
    }
}
