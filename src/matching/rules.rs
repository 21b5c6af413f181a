//! Matching rule tables
//!
//! Umlaut digraph table, exception lexicon and the function-word list used by
//! the fuzzy scorer.

use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, MatchKind};

/// Umlaut alternatives as typed on keyboards without umlaut keys
///
/// No pattern ends with a character that starts another pattern, so a single
/// leftmost-first pass gives the same result as replacing them one by one.
pub const UMLAUT_DIGRAPHS: [(&str, &str); 10] = [
    ("oe", "ö"),
    ("o/", "ö"),
    ("o:", "ö"),
    ("ae", "ä"),
    ("a/", "ä"),
    ("a:", "ä"),
    ("ue", "ü"),
    ("u/", "ü"),
    ("u:", "ü"),
    ("s/", "ß"),
];

/// Words the digraph table gets wrong or cannot reach
const EXCEPTION_LEXICON: [(&str, &str); 3] = [
    ("schoener", "schöner"),
    ("schoen", "schön"),
    ("felle", "fälle"),
];

/// High-frequency function words that get a lenient score on exact match
const FUNCTION_WORDS: [&str; 7] = ["in", "ihr", "ist", "es", "der", "die", "das"];

lazy_static::lazy_static! {
    /// Shared digraph table for the normalizer and live input substitution
    pub static ref UMLAUT_TABLE: UmlautTable = UmlautTable::new();

    /// Exception lexicon applied after digraph substitution
    pub static ref EXCEPTIONS: ExceptionLexicon = ExceptionLexicon::new();

    /// Function words for the short-word leniency rule
    pub static ref SHORT_WORDS: FunctionWords = FunctionWords::new();
}

/// Umlaut digraph replacer
pub struct UmlautTable {
    automaton: AhoCorasick,
    replacements: Vec<&'static str>,
}

impl UmlautTable {
    pub fn new() -> Self {
        let patterns: Vec<&'static str> = UMLAUT_DIGRAPHS.iter().map(|(from, _)| *from).collect();
        let replacements = UMLAUT_DIGRAPHS.iter().map(|(_, to)| *to).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(patterns)
            .expect("umlaut digraph patterns are static and valid");

        Self {
            automaton,
            replacements,
        }
    }

    /// Replace every digraph occurrence (case-sensitive, literal)
    pub fn replace(&self, text: &str) -> String {
        self.automaton.replace_all(text, &self.replacements)
    }
}

impl Default for UmlautTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-word exception lexicon
pub struct ExceptionLexicon {
    map: HashMap<&'static str, &'static str>,
}

impl ExceptionLexicon {
    pub fn new() -> Self {
        Self {
            map: EXCEPTION_LEXICON.into_iter().collect(),
        }
    }

    /// Look up a word (case-insensitive)
    pub fn lookup(&self, word: &str) -> Option<&'static str> {
        self.map.get(word.to_lowercase().as_str()).copied()
    }

    /// Replace lexicon words inside `text`
    ///
    /// A word is a maximal run of alphanumeric characters. The replacement
    /// follows the source casing: all caps, leading capital or lowercase.
    pub fn apply(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut word_start: Option<usize> = None;

        for (idx, ch) in text.char_indices() {
            if ch.is_alphanumeric() {
                if word_start.is_none() {
                    word_start = Some(idx);
                }
                continue;
            }
            if let Some(start) = word_start.take() {
                self.push_word(&mut result, &text[start..idx]);
            }
            result.push(ch);
        }
        if let Some(start) = word_start {
            self.push_word(&mut result, &text[start..]);
        }

        result
    }

    fn push_word(&self, out: &mut String, word: &str) {
        let Some(replacement) = self.lookup(word) else {
            out.push_str(word);
            return;
        };

        // Keep the source casing pattern
        if word.chars().all(|c| !c.is_lowercase()) {
            out.push_str(&replacement.to_uppercase());
            return;
        }
        if !word.chars().next().is_some_and(char::is_uppercase) {
            out.push_str(replacement);
            return;
        }

        let mut chars = replacement.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
}

impl Default for ExceptionLexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed set of function words
pub struct FunctionWords {
    words: HashSet<&'static str>,
}

impl FunctionWords {
    pub fn new() -> Self {
        Self {
            words: FUNCTION_WORDS.into_iter().collect(),
        }
    }

    /// Case-insensitive membership
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_lowercase().as_str())
    }
}

impl Default for FunctionWords {
    fn default() -> Self {
        Self::new()
    }
}
