//! In-memory table abstraction used between the loader and the extractor.
//!
//! A [`Table`] is an Arrow [`RecordBatch`](arrow::record_batch::RecordBatch) whose column names
//! are unique. Arrow already guarantees that every column has the same length and that rows are
//! aligned by position; this crate adds the naming invariant and the explicit column operations
//! the extractor is written against:
//!
//! - [`Table::select_by_names`]: project named columns in caller order
//! - [`Table::select_where`]: project columns whose name satisfies a predicate, in source order
//! - [`Table::concat_columns`]: column-wise concatenation where the left side wins on duplicate
//!   names
//!
//! Every operation returns a fresh table; array buffers are reference counted, so selected
//! columns share memory with their source rather than being copied.

pub mod table;

pub use table::Table;
