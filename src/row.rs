use serde_json::{Map, Value};

use crate::errors::{Result, TensorizerError};

/// One raw example, keyed by column name.
pub type Row = Map<String, Value>;

/// Typed column access on a [`Row`].
pub trait RowExt {
    fn column(&self, column: &str) -> Result<&Value>;

    fn text(&self, column: &str) -> Result<&str> {
        self.column(column)?
            .as_str()
            .ok_or_else(|| invalid(column, "a string"))
    }

    fn text_list(&self, column: &str) -> Result<Vec<&str>> {
        let values = self
            .column(column)?
            .as_array()
            .ok_or_else(|| invalid(column, "a list of strings"))?;

        values
            .iter()
            .map(|v| v.as_str().ok_or_else(|| invalid(column, "a list of strings")))
            .collect()
    }

    /// Integer offsets; negative ones (e.g. `-1` for "no answer") and ones
    /// beyond `usize` come back as `None`.
    fn offset_list(&self, column: &str) -> Result<Vec<Option<usize>>> {
        let values = self
            .column(column)?
            .as_array()
            .ok_or_else(|| invalid(column, "a list of integer offsets"))?;

        values
            .iter()
            .map(|v| match (v.as_u64(), v.as_i64()) {
                (Some(offset), _) => Ok(usize::try_from(offset).ok()),
                (None, Some(_)) => Ok(None),
                (None, None) => Err(invalid(column, "a list of integer offsets")),
            })
            .collect()
    }
}

impl RowExt for Row {
    fn column(&self, column: &str) -> Result<&Value> {
        self.get(column)
            .ok_or_else(|| TensorizerError::MissingColumn(column.to_string()))
    }
}

fn invalid(column: &str, expected: &'static str) -> TensorizerError {
    TensorizerError::InvalidColumn {
        column: column.to_string(),
        expected,
    }
}

/// Builds a [`Row`] from a JSON object literal; anything else is rejected.
pub fn row_from_value(value: Value) -> Result<Row> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(TensorizerError::ValueError(format!(
            "row must be a JSON object, got {other}"
        ))),
    }
}
