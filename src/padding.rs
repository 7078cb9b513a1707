use ndarray::{Array1, Array2};

use crate::errors::{Result, TensorizerError};

/// Right-pads every sequence to the longest one in the batch.
pub fn pad_and_tensorize<S>(batch: &[S], pad_value: i64) -> Result<Array2<i64>>
where
    S: AsRef<[i64]>,
{
    if batch.is_empty() {
        return Err(TensorizerError::EmptyBatch);
    }

    let max_len = batch.iter().map(|s| s.as_ref().len()).max().unwrap_or(0);

    let mut data = Vec::with_capacity(batch.len() * max_len);
    for seq in batch {
        let seq = seq.as_ref();
        data.extend_from_slice(seq);
        data.extend(std::iter::repeat(pad_value).take(max_len - seq.len()));
    }

    Ok(Array2::from_shape_vec((batch.len(), max_len), data)?)
}

pub fn lengths_to_tensor(lengths: &[usize]) -> Array1<i64> {
    lengths.iter().map(|&len| len as i64).collect()
}

/// 1 where `tokens` holds `pad_value`, 0 elsewhere.
pub fn pad_mask(tokens: &Array2<i64>, pad_value: i64) -> Array2<u8> {
    tokens.mapv(|t| u8::from(t == pad_value))
}
