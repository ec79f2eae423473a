use arrow::array::{Array, Float64Array};
use imfeat_result::Error;
use imfeat_table::Table;
use imfeat_test_utils::{image_batch, init_tracing_for_tests};

#[test]
fn batches_concatenate_row_wise() {
    init_tracing_for_tests();
    let batch = image_batch();
    let head = batch.slice(0, 1);
    let tail = batch.slice(1, batch.num_rows() - 1);

    let table = Table::from_batches(batch.schema(), &[head, tail]).expect("concat");
    assert_eq!(table.batch(), &batch);
}

#[test]
fn empty_table_keeps_schema() {
    init_tracing_for_tests();
    let table = Table::empty(image_batch().schema()).expect("empty");
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 5);
}

#[test]
fn predicate_projection_then_concat_dedupes() {
    init_tracing_for_tests();
    let table = Table::try_from(image_batch()).expect("table");
    let ids = table.select_by_names(&["ImageNumber", "Image_Correlation_B"]).unwrap();
    let corr = table
        .select_where(|name| name.starts_with("Image_Correlation"))
        .unwrap();

    let out = ids.concat_columns(&corr).unwrap();
    assert_eq!(
        out.column_names(),
        vec!["ImageNumber", "Image_Correlation_B", "Image_Correlation_A"]
    );

    let b = out
        .column_by_name("Image_Correlation_B")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .expect("Float64");
    assert!(b.is_null(1));
    assert_eq!(b.value(2), 3.0);
}

#[test]
fn missing_column_is_not_found_family() {
    init_tracing_for_tests();
    let table = Table::try_from(image_batch()).expect("table");
    let err = table.select_by_names(&["Metadata_Well"]).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, Error::ColumnNotFound(_)));
    assert!(!table.contains_column("Metadata_Well"));
}
