use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::{
    config::TokenTensorizerConfig,
    errors::{Result, TensorizerError},
    initializer::{Initializer, VocabInit},
    padding::{lengths_to_tensor, pad_and_tensorize},
    row::{Row, RowExt},
    tensorizer::Tensorizer,
    tokenizer::Tokenizer,
    vocab::{VocabBuilder, Vocabulary, BOS, EOS},
};

/// Token ids of one text plus the char span each id came from.
/// BOS/EOS/PAD tokens inserted by the tensorizer have no span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookedUpTokens {
    pub ids: Vec<i64>,
    pub spans: Vec<Option<(usize, usize)>>,
}

impl LookedUpTokens {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Tokenizes one text column and maps it to ids.
#[derive(Debug)]
pub struct TokenTensorizer {
    text_column: String,
    tokenizer: Arc<Tokenizer>,
    vocab: Option<Arc<Vocabulary>>,
    add_bos_token: bool,
    add_eos_token: bool,
    max_seq_len: Option<usize>,
}

impl TokenTensorizer {
    pub fn new(
        text_column: impl Into<String>,
        tokenizer: Arc<Tokenizer>,
        vocab: Option<Arc<Vocabulary>>,
        max_seq_len: Option<usize>,
    ) -> Self {
        TokenTensorizer {
            text_column: text_column.into(),
            tokenizer,
            vocab,
            add_bos_token: false,
            add_eos_token: false,
            max_seq_len,
        }
    }

    pub fn with_special_tokens(mut self, add_bos_token: bool, add_eos_token: bool) -> Self {
        self.add_bos_token = add_bos_token;
        self.add_eos_token = add_eos_token;
        self
    }

    pub fn from_config(config: &TokenTensorizerConfig) -> Result<Self> {
        let tokenizer = Tokenizer::from_config(&config.tokenizer)?;
        let vocab = tokenizer.fixed_vocab()?;

        Ok(TokenTensorizer::new(
            config.column.as_str(),
            Arc::new(tokenizer),
            vocab,
            config.max_seq_len,
        )
        .with_special_tokens(config.add_bos_token, config.add_eos_token))
    }

    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    pub fn tokenizer(&self) -> &Arc<Tokenizer> {
        &self.tokenizer
    }

    pub fn max_seq_len(&self) -> Option<usize> {
        self.max_seq_len
    }

    pub fn vocab(&self) -> Option<&Arc<Vocabulary>> {
        self.vocab.as_ref()
    }

    pub fn initialize(&mut self, vocab_builder: Option<VocabBuilder>) -> Initializer<'_, Self> {
        let mut builder = vocab_builder.unwrap_or_default();
        builder.use_bos |= self.add_bos_token;
        builder.use_eos |= self.add_eos_token;

        Initializer::new(self, builder)
    }

    /// Tokenize, truncate to `max_seq_len` (room is kept for BOS/EOS), and
    /// look up ids. Text with no tokens becomes a single PAD.
    pub fn lookup_tokens(&self, text: &str) -> Result<LookedUpTokens> {
        let vocab = self
            .vocab
            .as_ref()
            .ok_or(TensorizerError::VocabNotInitialized)?;

        let mut tokens = self.tokenizer.tokenize(text)?;
        if let Some(max_seq_len) = self.max_seq_len {
            let reserved = usize::from(self.add_bos_token) + usize::from(self.add_eos_token);
            tokens.truncate(max_seq_len.saturating_sub(reserved));
        }

        let mut looked_up = LookedUpTokens {
            ids: Vec::with_capacity(tokens.len() + 2),
            spans: Vec::with_capacity(tokens.len() + 2),
        };

        if self.add_bos_token {
            looked_up.ids.push(vocab.lookup(BOS));
            looked_up.spans.push(None);
        }
        for token in &tokens {
            looked_up.ids.push(vocab.lookup(&token.value));
            looked_up.spans.push(Some((token.start, token.end)));
        }
        if self.add_eos_token {
            looked_up.ids.push(vocab.lookup(EOS));
            looked_up.spans.push(None);
        }
        if looked_up.is_empty() {
            looked_up.ids.push(vocab.get_pad_index());
            looked_up.spans.push(None);
        }

        Ok(looked_up)
    }
}

impl VocabInit for TokenTensorizer {
    fn vocab(&self) -> Option<&Arc<Vocabulary>> {
        self.vocab.as_ref()
    }

    fn observe_row(&self, row: &Row, builder: &mut VocabBuilder) -> Result<()> {
        let text = row.text(&self.text_column)?;
        let tokens = self.tokenizer.tokenize(text)?;
        builder.add_all(tokens.iter().map(|t| t.value.as_str()));

        Ok(())
    }

    fn attach_vocab(&mut self, vocab: Arc<Vocabulary>) {
        self.vocab = Some(vocab);
    }
}

impl Tensorizer for TokenTensorizer {
    type Numberized = (Vec<i64>, usize);
    type Batch = (Array2<i64>, Array1<i64>);

    fn numberize(&self, row: &Row) -> Result<Self::Numberized> {
        let looked_up = self.lookup_tokens(row.text(&self.text_column)?)?;
        let len = looked_up.len();

        Ok((looked_up.ids, len))
    }

    fn tensorize(&self, batch: &[Self::Numberized]) -> Result<Self::Batch> {
        let vocab = self
            .vocab
            .as_ref()
            .ok_or(TensorizerError::VocabNotInitialized)?;

        let (tokens, lengths): (Vec<&[i64]>, Vec<usize>) = batch
            .iter()
            .map(|(ids, len)| (ids.as_slice(), *len))
            .unzip();

        Ok((
            pad_and_tensorize(&tokens, vocab.get_pad_index())?,
            lengths_to_tensor(&lengths),
        ))
    }

    fn sort_key(&self, numberized: &Self::Numberized) -> usize {
        numberized.1
    }
}
