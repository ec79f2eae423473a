use imfeat_test_utils::{PER_IMAGE_ROWS, image_batch, init_tracing_for_tests, write_per_image_sqlite};
use rusqlite::Connection;

#[test]
fn per_image_fixture_has_expected_rows() {
    init_tracing_for_tests();
    let tmp = write_per_image_sqlite();
    let conn = Connection::open(tmp.path()).expect("open fixture");
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM Per_Image", [], |row| row.get(0))
        .expect("count rows");
    assert_eq!(rows as usize, PER_IMAGE_ROWS);
}

#[test]
fn image_batch_is_row_aligned() {
    init_tracing_for_tests();
    let batch = image_batch();
    assert_eq!(batch.num_columns(), 5);
    assert_eq!(batch.num_rows(), 4);
}
