use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::datatypes::{Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use imfeat_result::{Error, Result};
use rustc_hash::FxHashSet;

/// Ordered collection of uniquely named, row-aligned Arrow columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Wrap a batch, rejecting schemas that repeat a column name.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        ensure_unique_names(batch.schema_ref().fields().iter().map(|f| f.name().as_str()))?;
        Ok(Self { batch })
    }

    /// Build a table from `(name, array)` pairs. Every column is declared nullable.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use arrow::array::{ArrayRef, Int64Array};
    /// use imfeat_table::Table;
    ///
    /// let ids: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
    /// let table = Table::from_arrays(vec![("ImageNumber", ids)]).unwrap();
    /// assert_eq!(table.num_rows(), 3);
    /// assert_eq!(table.column_names(), vec!["ImageNumber"]);
    /// ```
    pub fn from_arrays<S: Into<String>>(columns: Vec<(S, ArrayRef)>) -> Result<Self> {
        let mut fields: Vec<FieldRef> = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());
        for (name, array) in columns {
            fields.push(Arc::new(Field::new(name, array.data_type().clone(), true)));
            arrays.push(array);
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Self::try_new(batch)
    }

    /// Concatenate row-wise batches sharing `schema` into a single table.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Self::try_new(batch)
    }

    /// Zero-row table with the given schema.
    pub fn empty(schema: SchemaRef) -> Result<Self> {
        Self::try_new(RecordBatch::new_empty(schema))
    }

    #[inline]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    #[inline]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Project the named columns in the order given.
    ///
    /// Fails with [`Error::ColumnNotFound`] for an unknown name and with
    /// [`Error::InvalidArgumentError`] if a name is requested twice.
    pub fn select_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let schema = self.batch.schema_ref();
        let mut seen = FxHashSet::default();
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(Error::InvalidArgumentError(format!(
                    "column '{name}' requested more than once"
                )));
            }
            let idx = schema
                .index_of(name)
                .map_err(|_| Error::ColumnNotFound(name.to_string()))?;
            indices.push(idx);
        }
        self.project(&indices)
    }

    /// Project every column whose name satisfies `predicate`, keeping source order.
    pub fn select_where<F>(&self, mut predicate: F) -> Result<Table>
    where
        F: FnMut(&str) -> bool,
    {
        let indices: Vec<usize> = self
            .batch
            .schema_ref()
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| predicate(field.name()))
            .map(|(idx, _)| idx)
            .collect();
        self.project(&indices)
    }

    /// Append the columns of `other` after the columns of `self`.
    ///
    /// A column of `other` whose name already exists in `self` is skipped, so the result keeps
    /// the left-hand copy in its left-hand position. Both tables must have the same row count.
    pub fn concat_columns(&self, other: &Table) -> Result<Table> {
        if self.num_rows() != other.num_rows() {
            return Err(Error::InvalidArgumentError(format!(
                "cannot concatenate columns of tables with {} and {} rows",
                self.num_rows(),
                other.num_rows()
            )));
        }

        let left_schema = self.batch.schema_ref();
        let mut fields: Vec<FieldRef> = left_schema.fields().iter().cloned().collect();
        let mut columns: Vec<ArrayRef> = self.batch.columns().to_vec();
        let mut seen: FxHashSet<&str> = left_schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();

        let mut skipped = 0usize;
        for (field, column) in other
            .batch
            .schema_ref()
            .fields()
            .iter()
            .zip(other.batch.columns())
        {
            if !seen.insert(field.name().as_str()) {
                skipped += 1;
                continue;
            }
            fields.push(Arc::clone(field));
            columns.push(Arc::clone(column));
        }
        if skipped > 0 {
            tracing::trace!("concat_columns: skipped {} duplicate column(s)", skipped);
        }

        let schema = Arc::new(Schema::new_with_metadata(
            fields,
            left_schema.metadata().clone(),
        ));
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
        Ok(Table { batch })
    }

    // Projection keeps the row count even when no columns are selected.
    fn project(&self, indices: &[usize]) -> Result<Table> {
        let batch = self.batch.project(indices)?;
        Ok(Table { batch })
    }
}

impl TryFrom<RecordBatch> for Table {
    type Error = Error;

    fn try_from(batch: RecordBatch) -> Result<Self> {
        Table::try_new(batch)
    }
}

impl From<Table> for RecordBatch {
    fn from(table: Table) -> Self {
        table.batch
    }
}

fn ensure_unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(Error::InvalidArgumentError(format!(
                "duplicate column name '{name}'"
            )));
        }
    }
    Ok(())
}
