use crate::{errors::Result, row::Row};

/// Turns raw rows into numeric arrays in two steps: `numberize` one row at a
/// time, then `tensorize` a batch of numberized rows.
pub trait Tensorizer {
    type Numberized;
    type Batch;

    fn numberize(&self, row: &Row) -> Result<Self::Numberized>;

    fn tensorize(&self, batch: &[Self::Numberized]) -> Result<Self::Batch>;

    /// Key used to sort or bucket numberized rows by length.
    fn sort_key(&self, numberized: &Self::Numberized) -> usize;
}
