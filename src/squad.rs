use std::{collections::HashMap, sync::Arc};

use ndarray::{Array1, Array2};

use crate::{
    config::SquadTensorizerConfig,
    errors::{Result, TensorizerError},
    initializer::{Initializer, VocabInit},
    padding::{lengths_to_tensor, pad_and_tensorize, pad_mask},
    row::{Row, RowExt},
    tensorizer::Tensorizer,
    token_tensorizer::{LookedUpTokens, TokenTensorizer},
    tokenizer::Tokenizer,
    vocab::{VocabBuilder, Vocabulary},
};

/// Pad value for answer span positions; never a valid token index.
pub const SPAN_PAD_IDX: i64 = -100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Document,
    Question,
}

/// One row after `numberize`. Answer indices point into `doc_tokens` and
/// are inclusive: the span is `doc_tokens[start..=end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberizedSquad {
    pub doc_tokens: Vec<i64>,
    pub doc_len: usize,
    pub ques_tokens: Vec<i64>,
    pub ques_len: usize,
    pub answer_start_indices: Vec<i64>,
    pub answer_end_indices: Vec<i64>,
}

pub type SquadBatchTuple = (
    Array2<i64>,
    Array1<i64>,
    Array2<u8>,
    Array2<i64>,
    Array1<i64>,
    Array2<u8>,
    Array2<i64>,
    Array2<i64>,
);

/// Padded batch. Masks are 1 at pad positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadBatch {
    pub doc_tokens: Array2<i64>,
    pub doc_seq_len: Array1<i64>,
    pub doc_mask: Array2<u8>,
    pub ques_tokens: Array2<i64>,
    pub ques_seq_len: Array1<i64>,
    pub ques_mask: Array2<u8>,
    pub answer_start_idx: Array2<i64>,
    pub answer_end_idx: Array2<i64>,
}

impl SquadBatch {
    /// Positional form; metric reporters rely on `doc_tokens` coming first.
    pub fn into_tuple(self) -> SquadBatchTuple {
        (
            self.doc_tokens,
            self.doc_seq_len,
            self.doc_mask,
            self.ques_tokens,
            self.ques_seq_len,
            self.ques_mask,
            self.answer_start_idx,
            self.answer_end_idx,
        )
    }
}

impl From<SquadBatch> for SquadBatchTuple {
    fn from(batch: SquadBatch) -> Self {
        batch.into_tuple()
    }
}

/// Produces inputs and answer spans for SQuAD-style question answering.
///
/// The document and question tensorizers share one tokenizer and, once
/// built, one vocabulary.
#[derive(Debug)]
pub struct SquadTensorizer {
    doc_tensorizer: TokenTensorizer,
    ques_tensorizer: TokenTensorizer,
    answers_column: String,
    answer_starts_column: String,
    vocab: Option<Arc<Vocabulary>>,
}

impl SquadTensorizer {
    pub fn new(
        doc_tensorizer: TokenTensorizer,
        ques_tensorizer: TokenTensorizer,
        answers_column: impl Into<String>,
        answer_starts_column: impl Into<String>,
        vocab: Option<Arc<Vocabulary>>,
    ) -> Self {
        SquadTensorizer {
            doc_tensorizer,
            ques_tensorizer,
            answers_column: answers_column.into(),
            answer_starts_column: answer_starts_column.into(),
            vocab,
        }
    }

    pub fn from_config(config: &SquadTensorizerConfig) -> Result<Self> {
        let tokenizer = Tokenizer::from_config(&config.tokenizer)?;

        Self::from_tokenizer(config, tokenizer)
    }

    /// Like [`SquadTensorizer::from_config`] with an already built tokenizer;
    /// `config.tokenizer` is ignored.
    pub fn from_tokenizer(config: &SquadTensorizerConfig, tokenizer: Tokenizer) -> Result<Self> {
        let tokenizer = Arc::new(tokenizer);
        let vocab = tokenizer.fixed_vocab()?;

        let doc_tensorizer = TokenTensorizer::new(
            config.doc_column.as_str(),
            Arc::clone(&tokenizer),
            vocab.clone(),
            Some(config.max_doc_seq_len),
        );
        let ques_tensorizer = TokenTensorizer::new(
            config.ques_column.as_str(),
            tokenizer,
            vocab.clone(),
            Some(config.max_ques_seq_len),
        );

        Ok(SquadTensorizer::new(
            doc_tensorizer,
            ques_tensorizer,
            config.answers_column.as_str(),
            config.answer_starts_column.as_str(),
            vocab,
        ))
    }

    pub fn vocab(&self) -> Option<&Arc<Vocabulary>> {
        self.vocab.as_ref()
    }

    pub fn doc_tensorizer(&self) -> &TokenTensorizer {
        &self.doc_tensorizer
    }

    pub fn ques_tensorizer(&self) -> &TokenTensorizer {
        &self.ques_tensorizer
    }

    /// Starts the corpus pass. Pad and unknown symbols get ids 0 and 1.
    pub fn initialize(&mut self, vocab_builder: Option<VocabBuilder>) -> Initializer<'_, Self> {
        let mut builder = vocab_builder.unwrap_or_default();
        builder.pad_index = 0;
        builder.unk_index = 1;

        Initializer::new(self, builder)
    }

    /// Used when decoding predicted spans back to tokens.
    pub fn lookup_tokens(&self, text: &str, source: TextSource) -> Result<LookedUpTokens> {
        match source {
            TextSource::Document => self.doc_tensorizer.lookup_tokens(text),
            TextSource::Question => self.ques_tensorizer.lookup_tokens(text),
        }
    }

    fn shared_vocab(&self) -> Result<&Arc<Vocabulary>> {
        let vocab = self
            .vocab
            .as_ref()
            .ok_or(TensorizerError::VocabNotInitialized)?;

        for (name, sub) in [
            ("question", &self.ques_tensorizer),
            ("document", &self.doc_tensorizer),
        ] {
            let sub_vocab = sub
                .vocab()
                .unwrap_or_else(|| panic!("{name} tensorizer has no vocabulary"));
            assert_eq!(
                vocab.len(),
                sub_vocab.len(),
                "{name} vocabulary size differs from the shared vocabulary"
            );
            assert!(
                Arc::ptr_eq(vocab, sub_vocab),
                "{name} tensorizer does not reference the shared vocabulary"
            );
        }

        Ok(vocab)
    }
}

/// Maps char-level answers onto inclusive doc token indices.
///
/// An answer's start must coincide with some token's start offset and its end
/// (`start + answer chars`) with some token's end offset; a side that does not,
/// or whose offset is `None`, is [`SPAN_PAD_IDX`]. Starts are mapped for every
/// entry of `answer_starts`, ends only for the pairs zipped with `answers`.
/// If either list ends up empty or all [`SPAN_PAD_IDX`], both collapse to
/// `[SPAN_PAD_IDX]`.
pub fn align_answer_spans(
    doc_spans: &[Option<(usize, usize)>],
    answers: &[&str],
    answer_starts: &[Option<usize>],
) -> (Vec<i64>, Vec<i64>) {
    let mut start_idx_map = HashMap::with_capacity(doc_spans.len());
    let mut end_idx_map = HashMap::with_capacity(doc_spans.len());
    for (token_idx, span) in doc_spans.iter().enumerate() {
        if let Some((start, end)) = *span {
            start_idx_map.insert(start, token_idx as i64);
            end_idx_map.insert(end, token_idx as i64);
        }
    }

    let starts: Vec<i64> = answer_starts
        .iter()
        .map(|raw| {
            raw.and_then(|raw| start_idx_map.get(&raw).copied())
                .unwrap_or(SPAN_PAD_IDX)
        })
        .collect();
    let ends: Vec<i64> = answer_starts
        .iter()
        .zip(answers)
        .map(|(raw, answer)| {
            raw.and_then(|raw| raw.checked_add(answer.chars().count()))
                .and_then(|raw_end| end_idx_map.get(&raw_end).copied())
                .unwrap_or(SPAN_PAD_IDX)
        })
        .collect();

    if starts.is_empty() || ends.is_empty() || only_pad(&starts) || only_pad(&ends) {
        return (vec![SPAN_PAD_IDX], vec![SPAN_PAD_IDX]);
    }

    (starts, ends)
}

fn only_pad(indices: &[i64]) -> bool {
    indices.iter().all(|&i| i == SPAN_PAD_IDX)
}

impl VocabInit for SquadTensorizer {
    fn vocab(&self) -> Option<&Arc<Vocabulary>> {
        self.vocab.as_ref()
    }

    fn observe_row(&self, row: &Row, builder: &mut VocabBuilder) -> Result<()> {
        self.ques_tensorizer.observe_row(row, builder)?;
        self.doc_tensorizer.observe_row(row, builder)
    }

    fn attach_vocab(&mut self, vocab: Arc<Vocabulary>) {
        self.ques_tensorizer.attach_vocab(Arc::clone(&vocab));
        self.doc_tensorizer.attach_vocab(Arc::clone(&vocab));
        self.vocab = Some(vocab);
    }
}

impl Tensorizer for SquadTensorizer {
    type Numberized = NumberizedSquad;
    type Batch = SquadBatch;

    fn numberize(&self, row: &Row) -> Result<NumberizedSquad> {
        self.shared_vocab()?;

        let ques = self
            .ques_tensorizer
            .lookup_tokens(row.text(self.ques_tensorizer.text_column())?)?;
        let doc = self
            .doc_tensorizer
            .lookup_tokens(row.text(self.doc_tensorizer.text_column())?)?;

        let answers = row.text_list(&self.answers_column)?;
        let answer_starts = row.offset_list(&self.answer_starts_column)?;

        let (answer_start_indices, answer_end_indices) =
            align_answer_spans(&doc.spans, &answers, &answer_starts);
        if !answer_starts.is_empty() && only_pad(&answer_start_indices) {
            tracing::warn!(
                "none of {} answers align with document tokens",
                answer_starts.len()
            );
        }

        Ok(NumberizedSquad {
            doc_len: doc.len(),
            doc_tokens: doc.ids,
            ques_len: ques.len(),
            ques_tokens: ques.ids,
            answer_start_indices,
            answer_end_indices,
        })
    }

    fn tensorize(&self, batch: &[NumberizedSquad]) -> Result<SquadBatch> {
        let pad = self
            .vocab
            .as_ref()
            .ok_or(TensorizerError::VocabNotInitialized)?
            .get_pad_index();

        let mut doc_tokens = Vec::with_capacity(batch.len());
        let mut doc_lens = Vec::with_capacity(batch.len());
        let mut ques_tokens = Vec::with_capacity(batch.len());
        let mut ques_lens = Vec::with_capacity(batch.len());
        let mut answer_starts = Vec::with_capacity(batch.len());
        let mut answer_ends = Vec::with_capacity(batch.len());
        for n in batch {
            doc_tokens.push(n.doc_tokens.as_slice());
            doc_lens.push(n.doc_len);
            ques_tokens.push(n.ques_tokens.as_slice());
            ques_lens.push(n.ques_len);
            answer_starts.push(n.answer_start_indices.as_slice());
            answer_ends.push(n.answer_end_indices.as_slice());
        }

        let doc_tokens = pad_and_tensorize(&doc_tokens, pad)?;
        let ques_tokens = pad_and_tensorize(&ques_tokens, pad)?;
        let answer_start_idx = pad_and_tensorize(&answer_starts, SPAN_PAD_IDX)?;
        let answer_end_idx = pad_and_tensorize(&answer_ends, SPAN_PAD_IDX)?;

        tracing::debug!(
            "tensorized {} examples: doc len {}, question len {}",
            batch.len(),
            doc_tokens.ncols(),
            ques_tokens.ncols()
        );

        Ok(SquadBatch {
            doc_mask: pad_mask(&doc_tokens, pad),
            doc_tokens,
            doc_seq_len: lengths_to_tensor(&doc_lens),
            ques_mask: pad_mask(&ques_tokens, pad),
            ques_tokens,
            ques_seq_len: lengths_to_tensor(&ques_lens),
            answer_start_idx,
            answer_end_idx,
        })
    }

    /// Not supported: documents and questions have independent lengths.
    fn sort_key(&self, _numberized: &NumberizedSquad) -> usize {
        unimplemented!("SquadTensorizer::sort_key() should not be called")
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use serde_json::json;

    use super::*;
    use crate::{
        initializer::{InitProgress, InitState},
        row::row_from_value,
        tokenizer::WordPieceTokenizer,
        vocab::{PAD, UNK},
    };

    const WORDPIECE_JSON: &str = include_str!("../tests/fixtures/wordpiece.json");

    fn squad_row(doc: &str, question: &str, answers: &[&str], starts: &[usize]) -> Row {
        row_from_value(json!({
            "doc": doc,
            "question": question,
            "answers": answers,
            "answer_starts": starts,
        }))
        .unwrap()
    }

    fn initialized(corpus: &[Row], config: &SquadTensorizerConfig) -> SquadTensorizer {
        let mut tensorizer = SquadTensorizer::from_config(config).unwrap();
        tensorizer.initialize(None).consume(corpus).unwrap();
        tensorizer
    }

    fn cat_row(answers: &[&str], starts: &[usize]) -> Row {
        squad_row(
            "The cat sat on the mat.",
            "Where did the cat sit?",
            answers,
            starts,
        )
    }

    fn cat_tensorizer() -> SquadTensorizer {
        initialized(&[cat_row(&[], &[])], &SquadTensorizerConfig::default())
    }

    #[test]
    fn vocab_is_shared_with_reserved_ids() {
        let corpus = [squad_row("a b", "c", &[], &[])];
        let tensorizer = initialized(&corpus, &SquadTensorizerConfig::default());

        let vocab = tensorizer.vocab().unwrap();
        assert_eq!(vocab.get_pad_index(), 0);
        assert_eq!(vocab.get_unk_index(), 1);
        assert_eq!(vocab.tokens(), &[PAD, UNK, "c", "a", "b"]);

        let doc_vocab = tensorizer.doc_tensorizer().vocab().unwrap();
        let ques_vocab = tensorizer.ques_tensorizer().vocab().unwrap();
        assert_eq!(vocab.len(), doc_vocab.len());
        assert_eq!(vocab.len(), ques_vocab.len());
        assert!(Arc::ptr_eq(vocab, doc_vocab));
        assert!(Arc::ptr_eq(vocab, ques_vocab));
    }

    #[test]
    fn initialize_row_by_row() {
        let mut tensorizer = SquadTensorizer::from_config(&SquadTensorizerConfig::default()).unwrap();

        let mut init = tensorizer.initialize(None);
        for row in [squad_row("x y", "z", &[], &[]), squad_row("y", "w", &[], &[])] {
            assert_eq!(init.submit_row(&row).unwrap(), InitProgress::NeedsRows);
        }
        assert_eq!(init.rows_seen(), 2);
        let vocab = init.finish().unwrap();

        for token in ["x", "y", "z", "w"] {
            assert!(vocab.contains(token));
        }
        assert_eq!(vocab.lookup("y"), 2);
    }

    #[test]
    fn reinitializing_keeps_the_vocab() {
        let mut tensorizer = cat_tensorizer();
        let before = Arc::clone(tensorizer.vocab().unwrap());

        let mut init = tensorizer.initialize(None);
        assert!(matches!(init.state(), InitState::Done));
        for _ in 0..3 {
            assert_eq!(
                init.submit_row(&squad_row("brand new", "words", &[], &[]))
                    .unwrap(),
                InitProgress::NoWorkRemains
            );
        }
        init.finish().unwrap();

        assert!(Arc::ptr_eq(&before, tensorizer.vocab().unwrap()));
        assert!(!before.contains("brand"));
    }

    #[test]
    fn answer_maps_to_token_span() {
        let tensorizer = cat_tensorizer();
        let doc = "The cat sat on the mat.";
        let row = cat_row(&["the mat"], &[15]);

        let numberized = tensorizer.numberize(&row).unwrap();

        assert_eq!(numberized.doc_len, 6);
        assert_eq!(numberized.ques_len, 5);
        assert_eq!(numberized.answer_start_indices, vec![4]);
        assert_eq!(numberized.answer_end_indices, vec![5]);

        let spans = tensorizer
            .lookup_tokens(doc, TextSource::Document)
            .unwrap()
            .spans;
        let (start, _) = spans[4].unwrap();
        let (_, end) = spans[5].unwrap();
        let answer: String = doc.chars().skip(start).take(end - start).collect();
        assert_eq!(answer, "the mat");
    }

    #[test]
    fn multiple_answers() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer
            .numberize(&cat_row(&["mat", "on the mat"], &[19, 12]))
            .unwrap();

        assert_eq!(numberized.answer_start_indices, vec![5, 3]);
        assert_eq!(numberized.answer_end_indices, vec![5, 5]);
    }

    #[test]
    fn no_answers_is_unanswerable() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&[], &[])).unwrap();

        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX]);
        assert_eq!(numberized.answer_end_indices, vec![SPAN_PAD_IDX]);
    }

    #[test]
    fn unaligned_start_collapses() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&["he mat"], &[16])).unwrap();

        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX]);
        assert_eq!(numberized.answer_end_indices, vec![SPAN_PAD_IDX]);
    }

    #[test]
    fn unaligned_end_collapses() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&["the ma"], &[15])).unwrap();

        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX]);
        assert_eq!(numberized.answer_end_indices, vec![SPAN_PAD_IDX]);
    }

    #[test]
    fn partially_aligned_answers_keep_their_slots() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer
            .numberize(&cat_row(&["he mat", "mat"], &[16, 19]))
            .unwrap();

        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX, 5]);
        assert_eq!(numberized.answer_end_indices, vec![5, 5]);
    }

    #[test]
    fn truncated_answer_is_unanswerable() {
        let config = SquadTensorizerConfig {
            max_doc_seq_len: 3,
            max_ques_seq_len: 2,
            ..Default::default()
        };
        let tensorizer = initialized(&[cat_row(&[], &[])], &config);

        let numberized = tensorizer.numberize(&cat_row(&["the mat"], &[15])).unwrap();

        assert_eq!(numberized.doc_len, 3);
        assert_eq!(numberized.ques_len, 2);
        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX]);
        assert_eq!(numberized.answer_end_indices, vec![SPAN_PAD_IDX]);
    }

    #[test]
    fn align_without_answers() {
        let spans = [Some((0, 3))];
        assert_eq!(
            align_answer_spans(&spans, &[], &[]),
            (vec![SPAN_PAD_IDX], vec![SPAN_PAD_IDX])
        );
    }

    #[test]
    fn align_skips_tokens_without_offsets() {
        let spans = [None, Some((0, 3)), Some((4, 7)), None];
        assert_eq!(
            align_answer_spans(&spans, &["abc def"], &[Some(0)]),
            (vec![1], vec![2])
        );
    }

    #[test]
    fn align_uses_char_lengths() {
        // "né à" is 4 chars but 6 bytes
        let spans = [Some((0, 2)), Some((3, 4)), Some((5, 9))];
        assert_eq!(
            align_answer_spans(&spans, &["né à"], &[Some(0)]),
            (vec![0], vec![1])
        );
    }

    fn assert_unanswerable(numberized: &NumberizedSquad) {
        assert_eq!(numberized.answer_start_indices, vec![SPAN_PAD_IDX]);
        assert_eq!(numberized.answer_end_indices, vec![SPAN_PAD_IDX]);
    }

    #[test]
    fn answer_without_start_is_unanswerable() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&["cat"], &[])).unwrap();

        assert_unanswerable(&numberized);
    }

    #[test]
    fn start_without_answer_is_unanswerable() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&[], &[4])).unwrap();

        assert_unanswerable(&numberized);
    }

    #[test]
    fn extra_starts_keep_only_zipped_ends() {
        let spans = [Some((0, 3)), Some((4, 7)), Some((8, 11))];
        assert_eq!(
            align_answer_spans(&spans, &["cat"], &[Some(4), Some(8)]),
            (vec![1, 2], vec![1])
        );
    }

    #[test]
    fn negative_start_is_unanswerable() {
        let tensorizer = cat_tensorizer();
        let row = row_from_value(json!({
            "doc": "The cat sat on the mat.",
            "question": "Where did the cat sit?",
            "answers": ["cat"],
            "answer_starts": [-1],
        }))
        .unwrap();

        assert_unanswerable(&tensorizer.numberize(&row).unwrap());
    }

    #[test]
    fn huge_start_is_unanswerable() {
        let tensorizer = cat_tensorizer();
        let row = row_from_value(json!({
            "doc": "The cat sat on the mat.",
            "question": "Where did the cat sit?",
            "answers": ["cat"],
            "answer_starts": [u64::MAX],
        }))
        .unwrap();

        assert_unanswerable(&tensorizer.numberize(&row).unwrap());
    }

    #[test]
    fn align_end_offset_overflow_is_unmatched() {
        let spans = [Some((0, 3))];
        assert_eq!(
            align_answer_spans(&spans, &["abc"], &[Some(usize::MAX)]),
            (vec![SPAN_PAD_IDX], vec![SPAN_PAD_IDX])
        );
        assert_eq!(
            align_answer_spans(&spans, &["abc", "abc"], &[Some(0), Some(usize::MAX)]),
            (vec![0, SPAN_PAD_IDX], vec![0, SPAN_PAD_IDX])
        );
    }

    #[test]
    fn numberize_before_initialize() {
        let tensorizer = SquadTensorizer::from_config(&SquadTensorizerConfig::default()).unwrap();
        assert!(matches!(
            tensorizer.numberize(&cat_row(&[], &[])),
            Err(TensorizerError::VocabNotInitialized)
        ));
    }

    #[test]
    #[should_panic(expected = "vocabulary size differs")]
    fn separate_vocabularies_are_a_bug() {
        let tokenizer = Arc::new(Tokenizer::from_config(&Default::default()).unwrap());
        let vocab = |tokens: &[&str]| {
            let mut builder = VocabBuilder::new();
            builder.add_all(tokens);
            Some(Arc::new(builder.make_vocab().unwrap()))
        };

        let doc = TokenTensorizer::new("doc", Arc::clone(&tokenizer), vocab(&["a"]), None);
        let ques = TokenTensorizer::new("question", tokenizer, vocab(&["a", "b"]), None);
        let tensorizer = SquadTensorizer::new(doc, ques, "answers", "answer_starts", vocab(&["a"]));

        let _ = tensorizer.numberize(&squad_row("a", "b", &[], &[]));
    }

    #[test]
    #[should_panic(expected = "does not reference the shared vocabulary")]
    fn equal_sized_copies_are_a_bug() {
        let tokenizer = Arc::new(Tokenizer::from_config(&Default::default()).unwrap());
        let vocab = || {
            let mut builder = VocabBuilder::new();
            builder.add("a");
            Some(Arc::new(builder.make_vocab().unwrap()))
        };

        let doc = TokenTensorizer::new("doc", Arc::clone(&tokenizer), vocab(), None);
        let ques = TokenTensorizer::new("question", tokenizer, vocab(), None);
        let tensorizer = SquadTensorizer::new(doc, ques, "answers", "answer_starts", vocab());

        let _ = tensorizer.numberize(&squad_row("a", "a", &[], &[]));
    }

    #[test]
    #[should_panic(expected = "should not be called")]
    fn sort_key_is_unsupported() {
        let tensorizer = cat_tensorizer();
        let numberized = tensorizer.numberize(&cat_row(&[], &[])).unwrap();
        tensorizer.sort_key(&numberized);
    }

    #[test]
    fn tensorize_pads_tokens_and_spans_separately() {
        let rows = [
            squad_row("a b c", "b", &["b"], &[2]),
            squad_row("c a", "a c b", &["c", "a"], &[0, 2]),
        ];
        let tensorizer = initialized(&rows, &SquadTensorizerConfig::default());
        // pad=0, unk=1, b=2, a=3, c=4

        let numberized: Vec<_> = rows
            .iter()
            .map(|row| tensorizer.numberize(row).unwrap())
            .collect();
        let batch = tensorizer.tensorize(&numberized).unwrap();

        assert_eq!(batch.doc_tokens, array![[3, 2, 4], [4, 3, 0]]);
        assert_eq!(batch.doc_seq_len, array![3, 2]);
        assert_eq!(batch.doc_mask, array![[0, 0, 0], [0, 0, 1]]);
        assert_eq!(batch.ques_tokens, array![[2, 0, 0], [3, 4, 2]]);
        assert_eq!(batch.ques_seq_len, array![1, 3]);
        assert_eq!(batch.ques_mask, array![[0, 1, 1], [0, 0, 0]]);
        assert_eq!(batch.answer_start_idx, array![[1, SPAN_PAD_IDX], [0, 1]]);
        assert_eq!(batch.answer_end_idx, array![[1, SPAN_PAD_IDX], [0, 1]]);

        let doc_tokens = batch.doc_tokens.clone();
        let tuple = batch.into_tuple();
        assert_eq!(tuple.0, doc_tokens);
    }

    #[test]
    fn tensorize_empty_batch() {
        let tensorizer = cat_tensorizer();
        assert!(matches!(
            tensorizer.tensorize(&[]),
            Err(TensorizerError::EmptyBatch)
        ));
    }

    #[test]
    fn wordpiece_skips_corpus_pass() {
        let tokenizer =
            Tokenizer::WordPiece(WordPieceTokenizer::from_bytes(WORDPIECE_JSON).unwrap());
        let mut tensorizer =
            SquadTensorizer::from_tokenizer(&SquadTensorizerConfig::default(), tokenizer).unwrap();

        let vocab = Arc::clone(tensorizer.vocab().unwrap());
        assert_eq!(vocab.get_pad_index(), 0);
        assert_eq!(vocab.get_unk_index(), 1);
        assert!(Arc::ptr_eq(&vocab, tensorizer.doc_tensorizer().vocab().unwrap()));

        let row = squad_row(
            "The dog quickly sat.",
            "Where did the dog run?",
            &["quickly"],
            &[8],
        );
        let mut init = tensorizer.initialize(None);
        assert_eq!(init.submit_row(&row).unwrap(), InitProgress::NoWorkRemains);
        init.finish().unwrap();
        assert!(Arc::ptr_eq(&vocab, tensorizer.vocab().unwrap()));

        let numberized = tensorizer.numberize(&row).unwrap();
        assert_eq!(numberized.doc_tokens, vec![5, 14, 10, 11, 7, 17]);
        assert_eq!(numberized.ques_tokens, vec![15, 16, 5, 14, 12, 18]);
        assert_eq!(numberized.answer_start_indices, vec![2]);
        assert_eq!(numberized.answer_end_indices, vec![3]);
    }
}
