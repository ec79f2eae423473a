use std::io::Write;

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use imfeat_result::Error;
use imfeat_sqlite::{SqliteReadOptions, SqliteReader, load_default_table, load_table};
use imfeat_test_utils::{
    PER_IMAGE_ROWS, init_tracing_for_tests, sqlite_fixture, write_per_image_sqlite,
};
use tempfile::NamedTempFile;

fn location(tmp: &NamedTempFile) -> &str {
    tmp.path().to_str().expect("utf8 temp path")
}

#[test]
fn loads_every_column_in_declared_order() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let table = load_table(location(&tmp), "Per_Image").expect("load Per_Image");

    assert_eq!(
        table.column_names(),
        vec![
            "ImageNumber",
            "Metadata_Plate",
            "Metadata_Well",
            "Image_Correlation_A",
            "Image_Correlation_B",
            "Image_ImageQuality_X",
            "Image_Count_Cells",
            "Unrelated",
        ]
    );
    assert_eq!(table.num_rows(), PER_IMAGE_ROWS);

    let ids = table
        .column_by_name("ImageNumber")
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .expect("ImageNumber is Int64");
    assert_eq!(ids.values().to_vec(), vec![1, 2, 3]);

    let wells = table
        .column_by_name("Metadata_Well")
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .expect("Metadata_Well is Utf8");
    let wells: Vec<_> = wells.iter().map(|w| w.unwrap().to_string()).collect();
    assert_eq!(wells, vec!["A01", "A02", "B01"]);

    let corr = table
        .column_by_name("Image_Correlation_A")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .expect("Image_Correlation_A is Float64");
    assert_eq!(corr.value(0), 0.11);
    assert!(corr.is_null(2));
}

#[test]
fn default_table_is_per_image() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let by_default = load_default_table(location(&tmp)).expect("default load");
    let by_name = load_table(location(&tmp), "Per_Image").expect("named load");
    assert_eq!(by_default, by_name);
}

#[test]
fn sqlalchemy_url_is_accepted() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let url = format!("sqlite:///{}", location(&tmp));
    let table = load_table(&url, "Per_Object").expect("load via url");
    assert_eq!(table.num_rows(), 1);
    assert_eq!(
        table.schema().field_with_name("Nuclei_AreaShape_Area").unwrap().data_type(),
        &DataType::Float64
    );
}

#[test]
fn missing_source_is_unavailable_and_not_created() {
    init_tracing_for_tests();
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.sqlite");
    let err = load_table(path.to_str().unwrap(), "Per_Image").unwrap_err();

    assert!(matches!(err, Error::SourceUnavailable { .. }), "{err:?}");
    assert!(err.is_not_found());
    assert!(!path.exists());
}

#[test]
fn non_database_file_is_unavailable() {
    init_tracing_for_tests();
    let mut tmp = NamedTempFile::new().expect("tmp file");
    writeln!(tmp, "ImageNumber,Image_Count_Cells").unwrap();
    writeln!(tmp, "1,120").unwrap();
    tmp.flush().unwrap();

    let err = load_table(location(&tmp), "Per_Image").unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }), "{err:?}");
}

#[test]
fn missing_table_is_not_found() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let err = load_table(location(&tmp), "Per_Experiment").unwrap_err();
    assert!(matches!(&err, Error::TableNotFound { table } if table == "Per_Experiment"));
    assert!(err.is_not_found());
}

#[test]
fn undecodable_value_reports_table_column_and_row() {
    init_tracing_for_tests();
    let tmp = sqlite_fixture(
        "CREATE TABLE Per_Image (ImageNumber INTEGER, Image_Count_Cells INTEGER);
         INSERT INTO Per_Image VALUES (1, 10);
         INSERT INTO Per_Image VALUES (2, 'many');",
    );
    let err = load_default_table(location(&tmp)).unwrap_err();
    match err {
        Error::DataDecode {
            table, column, row, ..
        } => {
            assert_eq!(table, "Per_Image");
            assert_eq!(column, "Image_Count_Cells");
            assert_eq!(row, 1);
        }
        other => panic!("expected DataDecode, got {other:?}"),
    }
}

#[test]
fn empty_table_keeps_its_schema() {
    init_tracing_for_tests();
    let tmp = sqlite_fixture("CREATE TABLE Per_Image (ImageNumber INTEGER, Image_Area REAL);");
    let table = load_default_table(location(&tmp)).expect("load empty");
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.column_names(), vec!["ImageNumber", "Image_Area"]);
}

#[test]
fn list_tables_is_sorted() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let tables = SqliteReader::default()
        .list_tables(location(&tmp))
        .expect("list tables");
    assert_eq!(tables, vec!["Per_Image", "Per_Object"]);
}

#[test]
fn loading_does_not_modify_the_source() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let before = std::fs::read(tmp.path()).unwrap();
    load_default_table(location(&tmp)).expect("load");
    let after = std::fs::read(tmp.path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn integer_column_holding_reals_loads_as_float() {
    init_tracing_for_tests();
    let tmp = sqlite_fixture(
        "CREATE TABLE Per_Image (ImageNumber INTEGER, Image_Count_Cells INTEGER);
         INSERT INTO Per_Image VALUES (1, 10);
         INSERT INTO Per_Image VALUES (2, 2.5);",
    );
    let table = load_default_table(location(&tmp)).expect("load mixed integer column");

    let ids = table.schema().field_with_name("ImageNumber").unwrap().data_type().clone();
    assert_eq!(ids, DataType::Int64);
    let counts = table
        .column_by_name("Image_Count_Cells")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .expect("Image_Count_Cells widened to Float64");
    assert_eq!(counts.values().to_vec(), vec![10.0, 2.5]);
}

#[test]
fn table_name_is_matched_without_case() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let table = load_table(location(&tmp), "per_image").expect("load lower-case name");
    assert_eq!(table.num_rows(), PER_IMAGE_ROWS);

    let session = SqliteReader::new(SqliteReadOptions::for_table("PER_IMAGE"))
        .open(location(&tmp))
        .expect("open upper-case name");
    assert_eq!(session.table_name(), "Per_Image");
}
