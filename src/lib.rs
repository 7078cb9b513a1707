mod squad;

mod config;
mod errors;
mod initializer;
mod padding;
mod row;
mod tensorizer;
mod token_tensorizer;
mod tokenizer;
mod vocab;

pub use config::{
    ConfigFromJson, SquadTensorizerConfig, TokenTensorizerConfig, TokenizerConfig,
    DEFAULT_SPLIT_REGEX,
};
pub use errors::{Result, TensorizerError};
pub use initializer::{InitProgress, InitState, Initializer, VocabInit};
pub use padding::{lengths_to_tensor, pad_and_tensorize, pad_mask};
pub use row::{row_from_value, Row, RowExt};
pub use squad::{
    align_answer_spans, NumberizedSquad, SquadBatch, SquadBatchTuple, SquadTensorizer,
    TextSource, SPAN_PAD_IDX,
};
pub use tensorizer::Tensorizer;
pub use token_tensorizer::{LookedUpTokens, TokenTensorizer};
pub use tokenizer::{RegexTokenizer, Token, Tokenizer, WordPieceTokenizer};
pub use vocab::{
    wordpiece_vocab, VocabBuilder, Vocabulary, BOS, EOS, MASK, PAD, UNK, WORDPIECE_REPLACEMENTS,
};
