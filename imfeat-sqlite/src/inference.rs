//! Arrow type resolution for SQLite columns.
//!
//! SQLite stores values dynamically, so a column's declared type is only a hint. The declared type
//! is mapped through SQLite's affinity rules. Columns whose affinity does not pin a storage class
//! (NUMERIC, or no declared type at all) are resolved by sampling the storage classes actually
//! present, and INTEGER columns are sampled for stray REAL values.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use imfeat_result::Result;
use rusqlite::Connection;

use crate::source::{DeclaredColumn, map_sqlite_error, quote_ident};

/// A column to read: its name, the Arrow type values decode into, and nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn to_field(&self) -> Field {
        Field::new(&self.name, self.data_type.clone(), self.nullable)
    }
}

/// How a column's Arrow type is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeRule {
    /// The declared affinity pins the type.
    Declared(DataType),
    /// INTEGER affinity: Int64, widened to Float64 when REAL values are stored. SQLite keeps
    /// non-integral numbers as REAL even in INTEGER columns.
    Integer,
    /// NUMERIC affinity or no declared type: decided by the storage classes present.
    Observed,
}

/// Classify a declared type using SQLite's affinity rules.
pub(crate) fn type_rule(decl_type: &str) -> TypeRule {
    let decl = decl_type.to_ascii_uppercase();
    if decl.contains("INT") {
        TypeRule::Integer
    } else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
        TypeRule::Declared(DataType::Utf8)
    } else if decl.contains("BLOB") {
        TypeRule::Declared(DataType::Binary)
    } else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") {
        TypeRule::Declared(DataType::Float64)
    } else {
        TypeRule::Observed
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StorageClasses {
    integer: bool,
    real: bool,
    text: bool,
    blob: bool,
}

impl StorageClasses {
    const INTEGER: i64 = 1;
    const REAL: i64 = 2;
    const TEXT: i64 = 4;
    const BLOB: i64 = 8;

    fn from_bits(bits: i64) -> Self {
        Self {
            integer: bits & Self::INTEGER != 0,
            real: bits & Self::REAL != 0,
            text: bits & Self::TEXT != 0,
            blob: bits & Self::BLOB != 0,
        }
    }

    fn data_type(self) -> DataType {
        if self.blob {
            DataType::Binary
        } else if self.text {
            DataType::Utf8
        } else if self.real {
            DataType::Float64
        } else if self.integer {
            DataType::Int64
        } else {
            DataType::Null
        }
    }
}

/// Storage classes present in each of `columns`, gathered in a single pass over the table.
fn sample_storage_classes(
    conn: &Connection,
    location: &str,
    table: &str,
    columns: &[&str],
    sample_rows: Option<usize>,
) -> Result<Vec<StorageClasses>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let inner = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("{} AS c{idx}", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ");
    // One bit mask per column, built from the StorageClasses bit constants.
    let flags = (0..columns.len())
        .map(|idx| {
            format!(
                "COALESCE(MAX(typeof(c{idx}) = 'integer') * {} \
                 | MAX(typeof(c{idx}) = 'real') * {} \
                 | MAX(typeof(c{idx}) = 'text') * {} \
                 | MAX(typeof(c{idx}) = 'blob') * {}, 0)",
                StorageClasses::INTEGER,
                StorageClasses::REAL,
                StorageClasses::TEXT,
                StorageClasses::BLOB,
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {flags} FROM (SELECT {inner} FROM {} LIMIT ?1)",
        quote_ident(table)
    );

    // A negative LIMIT means unbounded.
    let limit = sample_rows
        .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        .unwrap_or(-1);
    conn.query_row(&sql, [limit], |row| {
        (0..columns.len())
            .map(|idx| row.get::<_, i64>(idx).map(StorageClasses::from_bits))
            .collect::<rusqlite::Result<Vec<_>>>()
    })
    .map_err(|err| map_sqlite_error(location, err))
}

/// Resolve the Arrow type of every declared column. Columns whose declaration is not decisive
/// are sampled together in one query.
pub(crate) fn resolve_columns(
    conn: &Connection,
    location: &str,
    table: &str,
    declared: &[DeclaredColumn],
    sample_rows: Option<usize>,
) -> Result<Vec<ColumnSpec>> {
    let rules: Vec<TypeRule> = declared.iter().map(|c| type_rule(&c.decl_type)).collect();
    let sampled: Vec<&str> = declared
        .iter()
        .zip(&rules)
        .filter(|(_, rule)| !matches!(rule, TypeRule::Declared(_)))
        .map(|(column, _)| column.name.as_str())
        .collect();
    let mut observed =
        sample_storage_classes(conn, location, table, &sampled, sample_rows)?.into_iter();

    let mut specs = Vec::with_capacity(declared.len());
    for (column, rule) in declared.iter().zip(rules) {
        let data_type = match rule {
            TypeRule::Declared(data_type) => data_type,
            TypeRule::Integer | TypeRule::Observed => {
                let classes = observed.next().unwrap_or_default();
                let data_type = match rule {
                    TypeRule::Integer if classes.real => DataType::Float64,
                    TypeRule::Integer => DataType::Int64,
                    _ => classes.data_type(),
                };
                tracing::trace!(
                    "inferred {:?} for {}.{} (declared '{}')",
                    data_type,
                    table,
                    column.name,
                    column.decl_type
                );
                data_type
            }
        };
        let nullable = !column.not_null || data_type == DataType::Null;
        specs.push(ColumnSpec {
            name: column.name.clone(),
            data_type,
            nullable,
        });
    }
    Ok(specs)
}

pub(crate) fn schema_for(specs: &[ColumnSpec]) -> SchemaRef {
    Arc::new(Schema::new(
        specs.iter().map(ColumnSpec::to_field).collect::<Vec<_>>(),
    ))
}
