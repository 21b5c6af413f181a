//! Word tokenizer
//!
//! Splits raw learner input into word and whitespace runs, keeping byte
//! offsets so feedback can point back into the text box.

use crate::matching::normalizer::normalize;

/// Token type
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    /// Run of non-whitespace characters
    Word,
    /// Run of whitespace
    Whitespace,
}

/// Token
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
    /// Start byte offset in the source text
    pub start: usize,
    /// End byte offset in the source text (exclusive)
    pub end: usize,
}

/// A raw word together with its normalized form
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    pub raw: String,
    pub normalized: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenizer
pub struct Tokenizer;

impl Tokenizer {
    /// Split text into alternating word / whitespace tokens
    pub fn tokenize(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_type: Option<TokenType> = None;
        let mut current_start = 0;

        for (idx, ch) in text.char_indices() {
            let char_type = Self::classify_char(ch);

            match current_type {
                Some(ref ct) if ct == &char_type => {}
                Some(ct) => {
                    tokens.push(Token {
                        text: text[current_start..idx].to_string(),
                        token_type: ct,
                        start: current_start,
                        end: idx,
                    });
                    current_start = idx;
                    current_type = Some(char_type);
                }
                None => {
                    current_start = idx;
                    current_type = Some(char_type);
                }
            }
        }

        if let Some(ct) = current_type {
            tokens.push(Token {
                text: text[current_start..].to_string(),
                token_type: ct,
                start: current_start,
                end: text.len(),
            });
        }

        tokens
    }

    /// Words of the text with their normalized forms
    ///
    /// Chunks that normalize to nothing (pure punctuation) are dropped. No
    /// digraph spans whitespace, so the normalized forms equal
    /// [`crate::matching::split_words`] on the whole text.
    pub fn words(text: &str, preserve_case: bool) -> Vec<WordToken> {
        Self::tokenize(text)
            .into_iter()
            .filter(|t| t.token_type == TokenType::Word)
            .filter_map(|t| {
                let normalized = normalize(&t.text, preserve_case);
                if normalized.is_empty() {
                    return None;
                }
                Some(WordToken {
                    raw: t.text,
                    normalized,
                    start: t.start,
                    end: t.end,
                })
            })
            .collect()
    }

    /// Whether the learner is still inside the last word
    pub fn ends_mid_word(text: &str) -> bool {
        text.chars().last().is_some_and(|c| !c.is_whitespace())
    }

    fn classify_char(ch: char) -> TokenType {
        if ch.is_whitespace() {
            TokenType::Whitespace
        } else {
            TokenType::Word
        }
    }
}
