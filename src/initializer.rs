use std::sync::Arc;

use crate::{
    errors::{Result, TensorizerError},
    row::Row,
    vocab::{VocabBuilder, Vocabulary},
};

/// A tensorizer whose vocabulary can be built from a corpus pass.
pub trait VocabInit {
    fn vocab(&self) -> Option<&Arc<Vocabulary>>;

    /// Add the tokens of one row to `builder`.
    fn observe_row(&self, row: &Row, builder: &mut VocabBuilder) -> Result<()>;

    /// Store the finished vocabulary. Called exactly once per corpus pass.
    fn attach_vocab(&mut self, vocab: Arc<Vocabulary>);
}

#[derive(Debug)]
pub enum InitState {
    AwaitingRow(VocabBuilder),
    Finalizing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitProgress {
    NeedsRows,
    NoWorkRemains,
}

/// Drives one corpus pass: `submit_row` for every row, then `finish`.
///
/// When the target already has a vocabulary the pass starts in
/// [`InitState::Done`] and every submitted row is consumed unused.
/// Dropping an unfinished initializer finalizes the vocabulary.
pub struct Initializer<'a, T: VocabInit> {
    target: &'a mut T,
    state: InitState,
    rows_seen: usize,
}

impl<'a, T: VocabInit> Initializer<'a, T> {
    pub(crate) fn new(target: &'a mut T, builder: VocabBuilder) -> Self {
        let state = if target.vocab().is_some() {
            tracing::debug!("vocabulary already present, skipping corpus pass");
            InitState::Done
        } else {
            InitState::AwaitingRow(builder)
        };

        Initializer {
            target,
            state,
            rows_seen: 0,
        }
    }

    pub fn state(&self) -> &InitState {
        &self.state
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn submit_row(&mut self, row: &Row) -> Result<InitProgress> {
        match &mut self.state {
            InitState::AwaitingRow(builder) => {
                self.target.observe_row(row, builder)?;
                self.rows_seen += 1;
                Ok(InitProgress::NeedsRows)
            }
            InitState::Finalizing | InitState::Done => Ok(InitProgress::NoWorkRemains),
        }
    }

    /// Feeds `rows` until the pass reports no remaining work, then finishes.
    pub fn consume<'r, I>(mut self, rows: I) -> Result<Arc<Vocabulary>>
    where
        I: IntoIterator<Item = &'r Row>,
    {
        for row in rows {
            if self.submit_row(row)? == InitProgress::NoWorkRemains {
                break;
            }
        }

        self.finish()
    }

    pub fn finish(mut self) -> Result<Arc<Vocabulary>> {
        self.finalize()?;

        self.target
            .vocab()
            .cloned()
            .ok_or(TensorizerError::VocabNotInitialized)
    }

    fn finalize(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, InitState::Finalizing);

        if let InitState::AwaitingRow(builder) = state {
            let vocab = Arc::new(builder.make_vocab()?);
            tracing::info!(
                "vocabulary built from {} rows: {} tokens",
                self.rows_seen,
                vocab.len()
            );
            self.target.attach_vocab(vocab);
        }

        self.state = InitState::Done;
        Ok(())
    }
}

impl<T: VocabInit> Drop for Initializer<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            tracing::warn!("vocabulary finalization failed: {e}");
        }
    }
}
