use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use crate::errors::{Result, TensorizerError};

pub const UNK: &str = "__UNKNOWN__";
pub const PAD: &str = "__PAD__";
pub const BOS: &str = "__BEGIN_OF_SENTENCE__";
pub const EOS: &str = "__END_OF_SENTENCE__";
pub const MASK: &str = "__MASK__";

/// BERT-style special tokens mapped onto the canonical symbols above.
pub static WORDPIECE_REPLACEMENTS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("[UNK]", UNK),
            ("[PAD]", PAD),
            ("[CLS]", BOS),
            ("[SEP]", EOS),
            ("[MASK]", MASK),
        ])
    });

/// Frozen token <-> id mapping. Shared as `Arc<Vocabulary>` once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    itos: Vec<String>,
    idx: HashMap<String, usize>,
    unk_index: usize,
    pad_index: usize,
}

impl Vocabulary {
    /// Both [`UNK`] and [`PAD`] must be present after replacements are applied.
    pub fn new(
        vocab_list: Vec<String>,
        replacements: Option<&HashMap<&str, &str>>,
    ) -> Result<Self> {
        let itos: Vec<String> = match replacements {
            Some(replacements) => vocab_list
                .into_iter()
                .map(|token| match replacements.get(token.as_str()) {
                    Some(replacement) => replacement.to_string(),
                    None => token,
                })
                .collect(),
            None => vocab_list,
        };

        let idx: HashMap<String, usize> = itos
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        let special_index = |symbol: &str| {
            idx.get(symbol).copied().ok_or_else(|| {
                TensorizerError::ValueError(format!("vocabulary has no {symbol} token"))
            })
        };
        let unk_index = special_index(UNK)?;
        let pad_index = special_index(PAD)?;

        Ok(Vocabulary {
            itos,
            idx,
            unk_index,
            pad_index,
        })
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    pub fn get_pad_index(&self) -> i64 {
        self.pad_index as i64
    }

    pub fn get_unk_index(&self) -> i64 {
        self.unk_index as i64
    }

    pub fn contains(&self, token: &str) -> bool {
        self.idx.contains_key(token)
    }

    pub fn lookup(&self, token: &str) -> i64 {
        self.idx.get(token).copied().unwrap_or(self.unk_index) as i64
    }

    pub fn lookup_all<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<i64> {
        tokens.iter().map(|t| self.lookup(t.as_ref())).collect()
    }

    pub fn token(&self, id: i64) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.itos.get(i))
            .map(String::as_str)
    }

    pub fn idx(&self) -> &HashMap<String, usize> {
        &self.idx
    }

    pub fn tokens(&self) -> &[String] {
        &self.itos
    }
}

/// Accumulates token counts over a corpus, then freezes them into a [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct VocabBuilder {
    counter: HashMap<String, usize>,
    first_seen: Vec<String>,

    pub use_unk: bool,
    pub unk_index: usize,
    pub use_pad: bool,
    pub pad_index: usize,
    pub use_bos: bool,
    pub bos_index: usize,
    pub use_eos: bool,
    pub eos_index: usize,

    pub min_count: usize,
    pub size_from_data: Option<usize>,
}

impl Default for VocabBuilder {
    fn default() -> Self {
        VocabBuilder {
            counter: HashMap::new(),
            first_seen: vec![],
            use_unk: true,
            unk_index: 0,
            use_pad: true,
            pad_index: 1,
            use_bos: false,
            bos_index: 2,
            use_eos: false,
            eos_index: 3,
            min_count: 1,
            size_from_data: None,
        }
    }
}

impl VocabBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        match self.counter.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counter.insert(token.to_string(), 1);
                self.first_seen.push(token.to_string());
            }
        }
    }

    pub fn add_all<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.add(token.as_ref());
        }
    }

    pub fn count(&self, token: &str) -> usize {
        self.counter.get(token).copied().unwrap_or(0)
    }

    /// Corpus tokens by descending count (first-seen order on ties), then the
    /// enabled special symbols inserted at their reserved indices.
    pub fn make_vocab(&self) -> Result<Vocabulary> {
        let mut specials: Vec<(usize, &str)> = [
            (self.use_unk, self.unk_index, UNK),
            (self.use_pad, self.pad_index, PAD),
            (self.use_bos, self.bos_index, BOS),
            (self.use_eos, self.eos_index, EOS),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, index, symbol)| (index, symbol))
        .collect();
        specials.sort();

        let mut corpus_tokens: Vec<&String> = self
            .first_seen
            .iter()
            .filter(|token| !specials.iter().any(|(_, s)| *s == token.as_str()))
            .filter(|token| self.count(token) >= self.min_count)
            .collect();
        corpus_tokens.sort_by(|a, b| self.count(b).cmp(&self.count(a)));
        if let Some(size) = self.size_from_data {
            corpus_tokens.truncate(size);
        }

        let mut vocab_list: Vec<String> = corpus_tokens.into_iter().cloned().collect();
        for (index, symbol) in specials {
            let index = index.min(vocab_list.len());
            vocab_list.insert(index, symbol.to_string());
        }

        Vocabulary::new(vocab_list, None)
    }
}

/// Builds the fixed vocabulary of a word-piece tokenizer.
pub fn wordpiece_vocab(tokens: Vec<String>) -> Result<Arc<Vocabulary>> {
    Ok(Arc::new(Vocabulary::new(
        tokens,
        Some(&*WORDPIECE_REPLACEMENTS),
    )?))
}
