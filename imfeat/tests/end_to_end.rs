use arrow::array::{Array, Float64Array, Int64Array};
use imfeat::{Error, extract_from_sqlite};
use imfeat_test_utils::{PER_IMAGE_ROWS, init_tracing_for_tests, write_per_image_sqlite};

#[test]
fn sqlite_to_reduced_table() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let out = extract_from_sqlite(
        tmp.path().to_str().unwrap(),
        "Per_Image",
        &["Image_Correlation", "Image_Count"],
        ["ImageNumber", "Metadata_Well", "Metadata_Site"],
        ["Metadata_Plate", "Metadata_Well"],
    )
    .expect("extract from sqlite");

    assert_eq!(
        out.column_names(),
        vec![
            "ImageNumber",
            "Metadata_Plate",
            "Metadata_Well",
            "Image_Correlation_A",
            "Image_Correlation_B",
            "Image_Count_Cells",
        ]
    );
    assert_eq!(out.num_rows(), PER_IMAGE_ROWS);

    let counts = out
        .column_by_name("Image_Count_Cells")
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .expect("counts");
    assert_eq!(counts.values().to_vec(), vec![120, 98, 143]);

    let corr = out
        .column_by_name("Image_Correlation_A")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .expect("correlation");
    assert!(corr.is_null(2));
}

#[test]
fn loader_errors_propagate_unchanged() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let err = extract_from_sqlite(
        tmp.path().to_str().unwrap(),
        "Per_Well",
        &["Image_"],
        ["ImageNumber"],
        ["ImageNumber"],
    )
    .unwrap_err();
    assert!(matches!(err, Error::TableNotFound { table } if table == "Per_Well"));
}
