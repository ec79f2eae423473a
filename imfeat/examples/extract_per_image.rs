//! Extract image-level feature categories from a SQLite export and print the result.
//!
//! Usage: `cargo run -p imfeat --example extract_per_image -- <sqlite> [category ...]`
//!
//! Without categories, correlation and image-quality features are extracted.

use arrow::util::pretty::pretty_format_batches;
use imfeat::{ExtractOptions, FeatureExtractor, load_default_table};
use tracing_subscriber::EnvFilter;

const IMAGE_COLUMNS: [&str; 4] = [
    "ImageNumber",
    "Metadata_Plate",
    "Metadata_Well",
    "Metadata_Site",
];
const STRATA: [&str; 2] = ["Metadata_Plate", "Metadata_Well"];

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(location) = args.next() else {
        eprintln!("usage: extract_per_image <sqlite> [category ...]");
        std::process::exit(2);
    };
    let mut categories: Vec<String> = args.collect();
    if categories.is_empty() {
        categories = vec!["Image_Correlation".into(), "Image_ImageQuality".into()];
    }

    let table = load_default_table(&location)?;
    let extraction = FeatureExtractor::new(ExtractOptions::default()).extract(
        categories.as_slice(),
        &table,
        IMAGE_COLUMNS,
        STRATA,
    )?;

    println!(
        "{} retained, {} feature columns; skipped identifiers: {:?}",
        extraction.report.retained_columns.len(),
        extraction.report.feature_columns.len(),
        extraction.report.absent_columns
    );
    println!("{}", pretty_format_batches(&[extraction.table.into_batch()])?);
    Ok(())
}
