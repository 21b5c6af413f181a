//! Exercise session state machine

mod controller;
mod types;

pub use controller::ExerciseSession;
pub use types::{Navigation, PlaybackRequest, SessionState};
