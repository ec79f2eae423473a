//! Fixtures shaped like an image-analysis export: a `Per_Image` table of per-image
//! measurements plus a `Per_Object` table that the loader should ignore unless asked for.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rusqlite::Connection;
use tempfile::NamedTempFile;

/// Schema and contents of the on-disk fixture written by [`write_per_image_sqlite`].
pub const PER_IMAGE_DDL: &str = "
    CREATE TABLE Per_Image (
        ImageNumber INTEGER NOT NULL,
        Metadata_Plate TEXT,
        Metadata_Well TEXT,
        Image_Correlation_A REAL,
        Image_Correlation_B REAL,
        Image_ImageQuality_X REAL,
        Image_Count_Cells INTEGER,
        Unrelated
    );
    INSERT INTO Per_Image VALUES (1, 'P1', 'A01', 0.11, 0.21, 1.5, 120, 'x');
    INSERT INTO Per_Image VALUES (2, 'P1', 'A02', 0.12, 0.22, 1.6, 98, 'y');
    INSERT INTO Per_Image VALUES (3, 'P1', 'B01', NULL, 0.23, 1.7, 143, NULL);
    CREATE TABLE Per_Object (
        ImageNumber INTEGER,
        ObjectNumber INTEGER,
        Nuclei_AreaShape_Area REAL
    );
    INSERT INTO Per_Object VALUES (1, 1, 402.0);
";

pub const PER_IMAGE_ROWS: usize = 3;

/// Write a SQLite database to a temp file and run `sql` against it.
///
/// Panics on failure; only meant for test setup.
pub fn sqlite_fixture(sql: &str) -> NamedTempFile {
    let tmp = NamedTempFile::new().expect("create tmp sqlite file");
    let conn = Connection::open(tmp.path()).expect("open fixture database");
    conn.execute_batch(sql).expect("populate fixture database");
    tmp
}

/// `Per_Image`/`Per_Object` fixture database.
pub fn write_per_image_sqlite() -> NamedTempFile {
    sqlite_fixture(PER_IMAGE_DDL)
}

/// In-memory batch with the columns used throughout the extraction examples:
/// `ImageNumber, Image_Correlation_A, Image_Correlation_B, Image_ImageQuality_X, Unrelated`.
pub fn image_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("ImageNumber", DataType::Int64, false),
        Field::new("Image_Correlation_A", DataType::Float64, true),
        Field::new("Image_Correlation_B", DataType::Float64, true),
        Field::new("Image_ImageQuality_X", DataType::Float64, true),
        Field::new("Unrelated", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
        Arc::new(Float64Array::from(vec![0.1, 0.2, 0.3, 0.4])),
        Arc::new(Float64Array::from(vec![Some(1.0), None, Some(3.0), Some(4.0)])),
        Arc::new(Float64Array::from(vec![9.0, 8.0, 7.0, 6.0])),
        Arc::new(StringArray::from(vec![Some("a"), Some("b"), None, Some("d")])),
    ];
    RecordBatch::try_new(schema, columns).expect("image batch")
}
