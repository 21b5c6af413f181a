// Caption segmenter
//
// Turns a WebVTT-like caption payload into timed sentences:
//
//   WEBVTT
//
//   00:00:01.000 --> 00:00:03.500
//   Berlin ist schön.
//
// Garbled input is tolerated: bad timestamp components read as zero, cues
// without text are skipped, inverted cues are dropped with a warning.

use serde::{Deserialize, Serialize};

use crate::matching::split_words;

/// Format header token
pub const HEADER: &str = "WEBVTT";

/// Separator between start and end timestamp
const TIMING_ARROW: &str = "-->";

/// One timed caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    /// Start in seconds
    pub start_time: f64,
    /// End in seconds, always greater than `start_time`
    pub end_time: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Parse a caption payload into ordered segments
///
/// Only the first text line after a timestamp line is used; a blank line ends
/// the block. Lines before the first timestamp of a block (cue identifiers,
/// `NOTE` comments) are ignored.
pub fn segment_captions(payload: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pending: Option<(f64, f64)> = None;
    let mut skipped = 0usize;

    for (line_no, raw_line) in payload.lines().enumerate() {
        let line = raw_line.trim_start_matches('\u{feff}').trim();

        if line.is_empty() {
            if pending.take().is_some() {
                skipped += 1;
            }
            continue;
        }

        if line.starts_with(HEADER) {
            continue;
        }

        if line.contains(TIMING_ARROW) {
            if pending.replace(parse_timing(line)).is_some() {
                skipped += 1;
            }
            continue;
        }

        let Some((start_time, end_time)) = pending.take() else {
            continue;
        };

        let text = strip_markup(line);
        if text.is_empty() {
            skipped += 1;
            continue;
        }

        if start_time >= end_time {
            tracing::warn!(
                "Captions: dropping cue at line {} with start {:.3}s >= end {:.3}s",
                line_no + 1,
                start_time,
                end_time
            );
            continue;
        }

        segments.push(Segment {
            text,
            start_time,
            end_time,
        });
    }

    if pending.is_some() {
        skipped += 1;
    }

    tracing::debug!(
        "segment_captions: {} segments, {} cues without text",
        segments.len(),
        skipped
    );

    segments
}

/// Reference word count over the whole transcript
pub fn reference_word_count(segments: &[Segment]) -> usize {
    segments
        .iter()
        .map(|s| split_words(&s.text, true).len())
        .sum()
}

/// Parse `start --> end [settings]`
fn parse_timing(line: &str) -> (f64, f64) {
    let (left, right) = line.split_once(TIMING_ARROW).unwrap_or((line, ""));
    let end_token = right.split_whitespace().next().unwrap_or("");
    (parse_timestamp(left.trim()), parse_timestamp(end_token))
}

/// Parse `[HH:]MM:SS.mmm` into seconds
///
/// Each unparsable component counts as zero. `,` is accepted as the
/// millisecond separator.
pub fn parse_timestamp(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .split(':')
        .fold(0.0, |total, component| total * 60.0 + parse_component(component))
}

fn parse_component(component: &str) -> f64 {
    component
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Remove inline tags (`<v Anna>`, `<i>`, `<00:01.000>`) and common entities
fn strip_markup(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;

    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
