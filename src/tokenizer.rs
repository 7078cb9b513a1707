use std::{path::PathBuf, sync::Arc};

use regex::Regex;
use tokenizers::Tokenizer as HfTokenizer;

use crate::{
    config::TokenizerConfig,
    errors::Result,
    vocab::{wordpiece_vocab, Vocabulary},
};

/// A token and the char range `[start, end)` it came from in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(value: impl Into<String>, start: usize, end: usize) -> Self {
        Token {
            value: value.into(),
            start,
            end,
        }
    }
}

#[derive(Debug)]
pub enum Tokenizer {
    Regex(RegexTokenizer),
    WordPiece(WordPieceTokenizer),
}

impl Tokenizer {
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let tokenizer = match config {
            TokenizerConfig::Regex {
                split_regex,
                lowercase,
            } => Tokenizer::Regex(RegexTokenizer::new(split_regex, *lowercase)?),
            TokenizerConfig::WordPiece { path } => {
                Tokenizer::WordPiece(WordPieceTokenizer::from_file(path.clone())?)
            }
        };

        Ok(tokenizer)
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        match self {
            Tokenizer::Regex(tokenizer) => Ok(tokenizer.tokenize(text)),
            Tokenizer::WordPiece(tokenizer) => tokenizer.tokenize(text),
        }
    }

    pub fn as_wordpiece(&self) -> Option<&WordPieceTokenizer> {
        match self {
            Tokenizer::WordPiece(tokenizer) => Some(tokenizer),
            Tokenizer::Regex(_) => None,
        }
    }

    /// The vocabulary a tokenizer ships with, if any. Word-piece tokenizers
    /// carry their own table, so no corpus pass is needed for them.
    pub fn fixed_vocab(&self) -> Result<Option<Arc<Vocabulary>>> {
        let Some(tokenizer) = self.as_wordpiece() else {
            return Ok(None);
        };

        let vocab = wordpiece_vocab(tokenizer.vocab())?;
        tracing::info!("using WordPiece vocabulary with {} tokens", vocab.len());

        Ok(Some(vocab))
    }
}

/// Splits on every match of `split_regex`; the pieces in between are tokens.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    split_regex: Regex,
    lowercase: bool,
}

impl RegexTokenizer {
    pub fn new(split_regex: &str, lowercase: bool) -> Result<Self> {
        Ok(RegexTokenizer {
            split_regex: Regex::new(split_regex)?,
            lowercase,
        })
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut cursor = CharCursor::new(text);
        let mut tokens = vec![];
        let mut begin = 0;

        let separators = self
            .split_regex
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .chain(std::iter::once((text.len(), text.len())));

        for (sep_start, sep_end) in separators {
            if sep_start > begin {
                let piece = &text[begin..sep_start];
                let value = if self.lowercase {
                    piece.to_lowercase()
                } else {
                    piece.to_string()
                };

                let start = cursor.char_offset(begin);
                let end = cursor.char_offset(sep_start);
                tokens.push(Token::new(value, start, end));
            }
            begin = begin.max(sep_end);
        }

        tokens
    }
}

/// Converts increasing byte offsets to char offsets in a single pass.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        CharCursor {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        debug_assert!(byte >= self.byte);
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// A Hugging Face tokenizer whose model is WordPiece.
#[derive(Debug)]
pub struct WordPieceTokenizer {
    inner: HfTokenizer,
}

impl WordPieceTokenizer {
    pub fn from_bytes<T>(tokenizer_bytes: T) -> Result<Self>
    where
        T: AsRef<[u8]>,
    {
        let inner = HfTokenizer::from_bytes(tokenizer_bytes)?;

        Ok(WordPieceTokenizer { inner })
    }

    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path: PathBuf = path.into();
        let tokenizer_bytes = std::fs::read(path)?;

        Self::from_bytes(tokenizer_bytes)
    }

    /// Offsets of `##` pieces point at their own substring, not the whole word.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let encoding = self.inner.encode_char_offsets(text, false)?;

        let tokens = encoding
            .get_tokens()
            .iter()
            .zip(encoding.get_offsets())
            .map(|(value, &(start, end))| Token::new(value.as_str(), start, end))
            .collect();

        Ok(tokens)
    }

    /// The tokenizer's own vocabulary, ordered by id.
    pub fn vocab(&self) -> Vec<String> {
        let mut entries: Vec<(String, u32)> = self.inner.get_vocab(true).into_iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        entries.into_iter().map(|(token, _)| token).collect()
    }
}
