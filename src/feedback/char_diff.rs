// Character diff
//
// Shows the learner where a misspelled word went wrong: runs of characters
// that are equal, missing (only in the expected word) or extra (only in what
// was typed). Uses an LCS table.

use serde::{Deserialize, Serialize};

/// Above this many characters per side, fall back to prefix/suffix diff
const MAX_CHARS: usize = 256;

/// Kind of a diff run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharSpanKind {
    Equal,
    /// In the expected word, not typed
    Missing,
    /// Typed, not in the expected word
    Extra,
}

/// A run of characters with the same diff kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSpan {
    pub kind: CharSpanKind,
    pub text: String,
}

/// Diff operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffOp {
    Equal,
    Insert,
    Delete,
}

/// Diff an expected word against the typed word
pub fn char_diff(expected: &str, actual: &str) -> Vec<CharSpan> {
    let expected_chars: Vec<char> = expected.chars().collect();
    let actual_chars: Vec<char> = actual.chars().collect();

    if expected_chars.len() > MAX_CHARS || actual_chars.len() > MAX_CHARS {
        tracing::debug!(
            "char_diff: long input (expected={}, actual={}), using quick diff",
            expected_chars.len(),
            actual_chars.len()
        );
        return quick_diff(&expected_chars, &actual_chars);
    }

    let table = lcs_table(&expected_chars, &actual_chars);
    let ops = build_ops(&expected_chars, &actual_chars, &table);
    group_ops(&expected_chars, &actual_chars, &ops)
}

fn lcs_table(a: &[char], b: &[char]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            if a[i] == b[j] {
                table[i + 1][j + 1] = table[i][j] + 1;
            } else {
                table[i + 1][j + 1] = table[i + 1][j].max(table[i][j + 1]);
            }
        }
    }
    table
}

fn build_ops(a: &[char], b: &[char], table: &[Vec<usize>]) -> Vec<DiffOp> {
    let mut ops = Vec::new();
    let mut i = a.len();
    let mut j = b.len();
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            ops.push(DiffOp::Equal);
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            ops.push(DiffOp::Insert);
            j -= 1;
        } else {
            ops.push(DiffOp::Delete);
            i -= 1;
        }
    }
    ops.reverse();
    ops
}

fn group_ops(expected: &[char], actual: &[char], ops: &[DiffOp]) -> Vec<CharSpan> {
    let mut spans: Vec<CharSpan> = Vec::new();
    let mut ei = 0usize;
    let mut ai = 0usize;

    for op in ops {
        let (kind, ch) = match op {
            DiffOp::Equal => {
                ei += 1;
                ai += 1;
                (CharSpanKind::Equal, expected[ei - 1])
            }
            DiffOp::Delete => {
                ei += 1;
                (CharSpanKind::Missing, expected[ei - 1])
            }
            DiffOp::Insert => {
                ai += 1;
                (CharSpanKind::Extra, actual[ai - 1])
            }
        };
        push_char(&mut spans, kind, ch);
    }

    spans
}

fn push_char(spans: &mut Vec<CharSpan>, kind: CharSpanKind, ch: char) {
    match spans.last_mut() {
        Some(last) if last.kind == kind => last.text.push(ch),
        _ => spans.push(CharSpan {
            kind,
            text: ch.to_string(),
        }),
    }
}

/// Common prefix and suffix, everything between is one change
fn quick_diff(expected: &[char], actual: &[char]) -> Vec<CharSpan> {
    let prefix_len = expected
        .iter()
        .zip(actual.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let suffix_len = expected[prefix_len..]
        .iter()
        .rev()
        .zip(actual[prefix_len..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let expected_end = expected.len() - suffix_len;
    let actual_end = actual.len() - suffix_len;

    let mut spans = Vec::new();
    for (kind, chars) in [
        (CharSpanKind::Equal, &expected[..prefix_len]),
        (CharSpanKind::Missing, &expected[prefix_len..expected_end]),
        (CharSpanKind::Extra, &actual[prefix_len..actual_end]),
        (CharSpanKind::Equal, &expected[expected_end..]),
    ] {
        if !chars.is_empty() {
            spans.push(CharSpan {
                kind,
                text: chars.iter().collect(),
            });
        }
    }
    spans
}
