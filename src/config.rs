use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::Result;

pub const DEFAULT_SPLIT_REGEX: &str = r"\W+";

fn default_split_regex() -> String {
    DEFAULT_SPLIT_REGEX.to_string()
}

fn default_lowercase() -> bool {
    true
}

/// Which tokenizer a tensorizer should build.
///
/// Serialized with a `"type"` tag:
///
/// ```json
/// { "type": "Regex", "split_regex": "\\s+", "lowercase": false }
/// { "type": "WordPiece", "path": "bert-base-uncased/tokenizer.json" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TokenizerConfig {
    Regex {
        #[serde(default = "default_split_regex")]
        split_regex: String,
        #[serde(default = "default_lowercase")]
        lowercase: bool,
    },
    /// A Hugging Face `tokenizer.json` with a WordPiece model.
    WordPiece { path: PathBuf },
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig::Regex {
            split_regex: default_split_regex(),
            lowercase: default_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTensorizerConfig {
    pub column: String,
    pub tokenizer: TokenizerConfig,
    pub add_bos_token: bool,
    pub add_eos_token: bool,
    pub max_seq_len: Option<usize>,
}

impl Default for TokenTensorizerConfig {
    fn default() -> Self {
        TokenTensorizerConfig {
            column: "text".to_string(),
            tokenizer: TokenizerConfig::default(),
            add_bos_token: false,
            add_eos_token: false,
            max_seq_len: None,
        }
    }
}

/// Column names and limits for [`crate::SquadTensorizer`].
///
/// # Fields
/// - `doc_column`, `ques_column`: model inputs
/// - `answers_column`, `answer_starts_column`: labels
/// - `max_ques_seq_len`, `max_doc_seq_len`: truncation limits per text column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadTensorizerConfig {
    pub doc_column: String,
    pub ques_column: String,
    pub answers_column: String,
    pub answer_starts_column: String,
    pub tokenizer: TokenizerConfig,
    pub max_ques_seq_len: usize,
    pub max_doc_seq_len: usize,
}

impl Default for SquadTensorizerConfig {
    fn default() -> Self {
        SquadTensorizerConfig {
            doc_column: "doc".to_string(),
            ques_column: "question".to_string(),
            answers_column: "answers".to_string(),
            answer_starts_column: "answer_starts".to_string(),
            tokenizer: TokenizerConfig::default(),
            max_ques_seq_len: 64,
            max_doc_seq_len: 256,
        }
    }
}

/// JSON loading shared by every config type.
pub trait ConfigFromJson: DeserializeOwned {
    fn from_json_slice<T>(bytes: T) -> Result<Self>
    where
        T: AsRef<[u8]>,
    {
        Ok(serde_json::from_slice(bytes.as_ref())?)
    }

    fn from_path<P>(path: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path: PathBuf = path.into();
        let bytes = std::fs::read(path)?;

        Self::from_json_slice(bytes)
    }
}

impl ConfigFromJson for TokenizerConfig {}
impl ConfigFromJson for TokenTensorizerConfig {}
impl ConfigFromJson for SquadTensorizerConfig {}
