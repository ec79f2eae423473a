//! Per-column accumulation of SQLite values into Arrow arrays.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryBuilder, Float64Builder, Int64Builder, NullArray, StringBuilder,
};
use arrow::datatypes::DataType;
use imfeat_result::{Error, Result};
use rusqlite::types::ValueRef;

/// Builder for one output column. The variant is fixed by the column's resolved Arrow type.
pub(crate) enum ColumnDecoder {
    Int64(Int64Builder),
    Float64(Float64Builder),
    Utf8(StringBuilder),
    Binary(BinaryBuilder),
    Null(usize),
}

impl ColumnDecoder {
    pub(crate) fn for_type(data_type: &DataType, capacity: usize) -> Result<Self> {
        Ok(match data_type {
            DataType::Int64 => Self::Int64(Int64Builder::with_capacity(capacity)),
            DataType::Float64 => Self::Float64(Float64Builder::with_capacity(capacity)),
            DataType::Utf8 => Self::Utf8(StringBuilder::with_capacity(capacity, capacity * 8)),
            DataType::Binary => Self::Binary(BinaryBuilder::with_capacity(capacity, capacity * 8)),
            DataType::Null => Self::Null(0),
            other => {
                return Err(Error::Internal(format!(
                    "no SQLite decoder for Arrow type {other:?}"
                )));
            }
        })
    }

    /// Append one value. On mismatch the returned message describes the offending value; the
    /// caller attaches table, column and row.
    pub(crate) fn append(&mut self, value: ValueRef<'_>) -> std::result::Result<(), String> {
        match (self, value) {
            (Self::Int64(b), ValueRef::Null) => b.append_null(),
            (Self::Float64(b), ValueRef::Null) => b.append_null(),
            (Self::Utf8(b), ValueRef::Null) => b.append_null(),
            (Self::Binary(b), ValueRef::Null) => b.append_null(),
            (Self::Null(len), ValueRef::Null) => *len += 1,

            (Self::Int64(b), ValueRef::Integer(v)) => b.append_value(v),
            (Self::Float64(b), ValueRef::Integer(v)) => b.append_value(v as f64),
            (Self::Float64(b), ValueRef::Real(v)) => b.append_value(v),

            (Self::Utf8(b), ValueRef::Text(bytes)) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|err| format!("text is not valid UTF-8: {err}"))?;
                b.append_value(text);
            }
            (Self::Utf8(b), ValueRef::Integer(v)) => b.append_value(v.to_string()),
            // `{:?}` renders 1.0 as "1.0", not "1".
            (Self::Utf8(b), ValueRef::Real(v)) => b.append_value(format!("{v:?}")),

            (Self::Binary(b), ValueRef::Blob(bytes)) => b.append_value(bytes),
            (Self::Binary(b), ValueRef::Text(bytes)) => b.append_value(bytes),

            (decoder, value) => {
                return Err(format!(
                    "{} value does not fit a {} column",
                    storage_class(value),
                    decoder.type_name()
                ));
            }
        }
        Ok(())
    }

    /// Emit the accumulated array and reset the builder for the next batch.
    pub(crate) fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Int64(b) => Arc::new(b.finish()),
            Self::Float64(b) => Arc::new(b.finish()),
            Self::Utf8(b) => Arc::new(b.finish()),
            Self::Binary(b) => Arc::new(b.finish()),
            Self::Null(len) => Arc::new(NullArray::new(std::mem::take(len))),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Int64(_) => "Int64",
            Self::Float64(_) => "Float64",
            Self::Utf8(_) => "Utf8",
            Self::Binary(_) => "Binary",
            Self::Null(_) => "Null",
        }
    }
}

fn storage_class(value: ValueRef<'_>) -> &'static str {
    match value {
        ValueRef::Null => "NULL",
        ValueRef::Integer(_) => "INTEGER",
        ValueRef::Real(_) => "REAL",
        ValueRef::Text(_) => "TEXT",
        ValueRef::Blob(_) => "BLOB",
    }
}
