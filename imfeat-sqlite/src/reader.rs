use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use imfeat_result::{Error, Result};
use imfeat_table::Table;
use rusqlite::Connection;
use rustc_hash::FxHashSet;

use crate::decode::ColumnDecoder;
use crate::inference::{self, ColumnSpec};
use crate::source::{self, map_sqlite_error, quote_ident};

/// Table read by [`load_table`](crate::load_table) when the caller does not name one.
pub const DEFAULT_TABLE_NAME: &str = "Per_Image";

const DEFAULT_BATCH_SIZE: usize = 8192;

#[derive(Debug, Clone)]
pub struct SqliteReadOptions {
    pub table_name: String,
    /// Rows per emitted batch. Values below one are treated as one.
    pub batch_size: usize,
    /// Restrict the read to these columns. Output keeps the table's column order.
    pub columns: Option<Vec<String>>,
    /// Rows sampled when a column's declared type does not decide its Arrow type.
    /// `None` inspects every row.
    pub type_sample_rows: Option<usize>,
}

impl Default for SqliteReadOptions {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            columns: None,
            type_sample_rows: None,
        }
    }
}

impl SqliteReadOptions {
    pub fn for_table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SqliteReader {
    options: SqliteReadOptions,
}

impl SqliteReader {
    pub fn new(options: SqliteReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SqliteReadOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SqliteReadOptions {
        &mut self.options
    }

    pub fn into_options(self) -> SqliteReadOptions {
        self.options
    }

    /// Tables and views in the source, sorted by name.
    pub fn list_tables(&self, location: &str) -> Result<Vec<String>> {
        let conn = source::open_read_only(location)?;
        source::table_names(&conn, location)
    }

    pub fn infer_schema(&self, location: &str) -> Result<SchemaRef> {
        let session = self.open(location)?;
        Ok(session.schema())
    }

    /// Open the source and resolve the column types of the configured table.
    pub fn open(&self, location: &str) -> Result<SqliteReadSession> {
        let conn = source::open_read_only(location)?;
        tracing::debug!(
            "opening table '{}' from '{}'",
            self.options.table_name,
            location
        );

        let source::DeclaredTable {
            name: table,
            columns: declared,
        } = source::declared_columns(&conn, location, &self.options.table_name)?;
        let declared = match &self.options.columns {
            None => declared,
            Some(wanted) => {
                let present: FxHashSet<&str> = declared.iter().map(|c| c.name.as_str()).collect();
                if let Some(missing) = wanted.iter().find(|name| !present.contains(name.as_str())) {
                    return Err(Error::ColumnNotFound(missing.clone()));
                }
                let wanted: FxHashSet<&str> = wanted.iter().map(String::as_str).collect();
                declared
                    .into_iter()
                    .filter(|c| wanted.contains(c.name.as_str()))
                    .collect()
            }
        };

        let columns = inference::resolve_columns(
            &conn,
            location,
            &table,
            &declared,
            self.options.type_sample_rows,
        )?;
        let schema = inference::schema_for(&columns);

        Ok(SqliteReadSession {
            conn,
            location: location.to_string(),
            table,
            columns,
            schema,
            batch_size: self.options.batch_size.max(1),
        })
    }
}

/// An opened source with a resolved schema, ready to stream the table as Arrow batches.
pub struct SqliteReadSession {
    conn: Connection,
    location: String,
    table: String,
    columns: Vec<ColumnSpec>,
    schema: SchemaRef,
    batch_size: usize,
}

impl SqliteReadSession {
    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Stream every row of the table, in storage order, as batches of at most `batch_size`
    /// rows. Returns the total row count.
    ///
    /// Stops at the first decode failure or callback error and returns it.
    pub fn scan_batches<F>(&self, mut on_batch: F) -> Result<usize>
    where
        F: FnMut(RecordBatch) -> Result<()>,
    {
        let sql = self.select_sql();
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| map_sqlite_error(&self.location, err))?;
        let mut rows = stmt
            .query([])
            .map_err(|err| map_sqlite_error(&self.location, err))?;

        let mut decoders = self
            .columns
            .iter()
            .map(|c| ColumnDecoder::for_type(&c.data_type, self.batch_size))
            .collect::<Result<Vec<_>>>()?;

        let mut total = 0usize;
        let mut pending = 0usize;
        while let Some(row) = rows
            .next()
            .map_err(|err| map_sqlite_error(&self.location, err))?
        {
            for (idx, decoder) in decoders.iter_mut().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|err| map_sqlite_error(&self.location, err))?;
                decoder.append(value).map_err(|reason| {
                    Error::data_decode(&self.table, &self.columns[idx].name, total, reason)
                })?;
            }
            total += 1;
            pending += 1;

            if pending == self.batch_size {
                on_batch(self.flush(&mut decoders, pending)?)?;
                pending = 0;
            }
        }
        if pending > 0 {
            on_batch(self.flush(&mut decoders, pending)?)?;
        }

        Ok(total)
    }

    /// Materialise the whole table.
    pub fn into_table(self) -> Result<Table> {
        let mut batches = Vec::new();
        let rows = self.scan_batches(|batch| {
            tracing::trace!("read batch of {} rows from '{}'", batch.num_rows(), self.table);
            batches.push(batch);
            Ok(())
        })?;

        let table = Table::from_batches(self.schema(), &batches)?;
        tracing::debug!(
            "loaded '{}' from '{}': {} rows, {} columns, {} batches",
            self.table,
            self.location,
            rows,
            table.num_columns(),
            batches.len()
        );
        Ok(table)
    }

    fn select_sql(&self) -> String {
        // A projection with no columns still has to count rows.
        let projection = if self.columns.is_empty() {
            "1".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| quote_ident(&c.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("SELECT {} FROM {}", projection, quote_ident(&self.table))
    }

    fn flush(&self, decoders: &mut [ColumnDecoder], rows: usize) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = decoders.iter_mut().map(ColumnDecoder::finish).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        let batch = RecordBatch::try_new_with_options(self.schema(), arrays, &options)?;
        Ok(batch)
    }
}
