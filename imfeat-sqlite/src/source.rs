//! Location handling and catalog lookups against an opened SQLite source.

use std::path::PathBuf;

use imfeat_result::{Error, Result};
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension};

const SQLITE_URL_PREFIX: &str = "sqlite:///";

/// Declared column as reported by `pragma_table_info`, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeclaredColumn {
    pub(crate) name: String,
    /// Declared type text, empty when the column was created without one.
    pub(crate) decl_type: String,
    pub(crate) not_null: bool,
}

/// A table resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeclaredTable {
    /// Name as stored in the catalog, which may differ in case from the requested name.
    pub(crate) name: String,
    pub(crate) columns: Vec<DeclaredColumn>,
}

/// Turn a location string into a filesystem path.
///
/// Accepts a plain path or an SQLAlchemy-style `sqlite:///path` URL. In-memory databases are
/// rejected because they cannot hold a pre-existing table.
pub(crate) fn resolve_location(location: &str) -> Result<PathBuf> {
    let path = location.strip_prefix(SQLITE_URL_PREFIX).unwrap_or(location);
    if path.is_empty() || path == ":memory:" {
        return Err(Error::source_unavailable(
            location,
            "in-memory databases cannot be loaded",
        ));
    }

    let meta = std::fs::metadata(path).map_err(|err| Error::source_unavailable(location, err))?;
    if meta.is_dir() {
        return Err(Error::source_unavailable(location, "location is a directory"));
    }
    Ok(PathBuf::from(path))
}

/// Open the source read-only. The file is never created.
pub(crate) fn open_read_only(location: &str) -> Result<Connection> {
    let path = resolve_location(location)?;
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(&path, flags).map_err(|err| map_sqlite_error(location, err))
}

/// Names of all tables and views, sorted.
pub(crate) fn table_names(conn: &Connection, location: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .map_err(|err| map_sqlite_error(location, err))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
        .map_err(|err| map_sqlite_error(location, err))?;
    Ok(names)
}

/// Declared columns of `table`, or [`Error::TableNotFound`].
///
/// Table names are matched case-insensitively, as SQLite resolves identifiers.
pub(crate) fn declared_columns(
    conn: &Connection,
    location: &str,
    table: &str,
) -> Result<DeclaredTable> {
    let name = conn
        .query_row(
            "SELECT name FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|err| map_sqlite_error(location, err))?
        .ok_or_else(|| Error::table_not_found(table))?;

    let mut stmt = conn
        .prepare(r#"SELECT name, type, "notnull" FROM pragma_table_info(?1) ORDER BY cid"#)
        .map_err(|err| map_sqlite_error(location, err))?;
    let columns = stmt
        .query_map([name.as_str()], |row| {
            Ok(DeclaredColumn {
                name: row.get(0)?,
                decl_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                not_null: row.get::<_, i64>(2)? != 0,
            })
        })
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
        .map_err(|err| map_sqlite_error(location, err))?;
    Ok(DeclaredTable { name, columns })
}

/// Quote an identifier for interpolation into SQL text.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Classify a driver error. Failures to reach the database are reported as an unavailable
/// source; anything else is unexpected at this layer.
pub(crate) fn map_sqlite_error(location: &str, err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::PermissionDenied
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
            ) =>
        {
            Error::source_unavailable(location, &err)
        }
        _ => Error::Internal(format!("sqlite error on '{location}': {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imfeat_test_utils::write_per_image_sqlite;

    #[test]
    fn url_prefix_is_stripped() {
        let tmp = write_per_image_sqlite();
        let path = tmp.path().to_str().expect("utf8 path");
        let url = format!("sqlite:///{path}");

        assert_eq!(resolve_location(&url).unwrap(), tmp.path());
        assert_eq!(resolve_location(path).unwrap(), tmp.path());
    }

    #[test]
    fn memory_and_missing_locations_are_unavailable() {
        for location in [":memory:", "sqlite:///", "/definitely/not/here.sqlite"] {
            let err = resolve_location(location).unwrap_err();
            assert!(
                matches!(err, Error::SourceUnavailable { .. }),
                "{location}: {err:?}"
            );
        }
    }

    #[test]
    fn declared_columns_follow_table_order() {
        let tmp = write_per_image_sqlite();
        let location = tmp.path().to_str().unwrap();
        let conn = open_read_only(location).unwrap();

        let table = declared_columns(&conn, location, "Per_Object").unwrap();
        let columns = table.columns;
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ImageNumber", "ObjectNumber", "Nuclei_AreaShape_Area"]);
        assert_eq!(columns[2].decl_type, "REAL");

        let err = declared_columns(&conn, location, "Per_Nothing").unwrap_err();
        assert!(matches!(err, Error::TableNotFound { table } if table == "Per_Nothing"));
    }

    #[test]
    fn table_lookup_ignores_case() {
        let tmp = write_per_image_sqlite();
        let location = tmp.path().to_str().unwrap();
        let conn = open_read_only(location).unwrap();

        let table = declared_columns(&conn, location, "per_object").unwrap();
        assert_eq!(table.name, "Per_Object");
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("Image"), "\"Image\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
