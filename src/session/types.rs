// Session types
//
// - Session state (SessionState)
// - What the audio player should play next (PlaybackRequest)
// - Result of moving between sentences (Navigation)

use serde::{Deserialize, Serialize};

use crate::captions::Segment;

/// Exercise state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Loaded, not started
    #[default]
    Idle,
    /// Current segment is being played
    Playing,
    /// Playback finished, waiting for the learner
    WaitingForInput,
    /// Sentence submitted or skipped, waiting to move on
    Navigating,
    /// Exercise finished
    Completed,
}

impl SessionState {
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Playing => "playing",
            SessionState::WaitingForInput => "waiting for input",
            SessionState::Navigating => "navigating",
            SessionState::Completed => "completed",
        }
    }

    /// Whether the learner may type or submit
    ///
    /// Typing during playback is allowed.
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::Playing | SessionState::WaitingForInput)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Segment window for the audio player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
}

impl PlaybackRequest {
    pub fn for_segment(index: usize, segment: &Segment) -> Self {
        Self {
            index,
            start_time: segment.start_time,
            end_time: segment.end_time,
        }
    }
}

/// Outcome of moving to another sentence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// Play this segment next
    Play(PlaybackRequest),
    /// No sentence left
    Completed,
}
