use imfeat_result::{Error, Result};
use imfeat_table::Table;
use rustc_hash::FxHashSet;

use crate::options::ExtractOptions;
use crate::selection::{self, CategorySet};

/// What an extraction selected and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Retained identifier and strata columns, in output order.
    pub retained_columns: Vec<String>,
    /// Feature columns placed after the retained block, in source order. Feature columns that
    /// are also retained are listed only under `retained_columns`.
    pub feature_columns: Vec<String>,
    /// Category prefixes that matched no column.
    pub unmatched_categories: Vec<String>,
    /// Requested keep or strata names the source table does not have.
    pub absent_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub table: Table,
    pub report: ExtractionReport,
}

/// Builds reduced tables of retained columns followed by feature-category columns.
///
/// Stateless apart from its options; a single extractor can serve any number of tables.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    options: ExtractOptions,
}

impl FeatureExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Select `keep_columns ∪ strata` (where present in `table`) followed by every column whose
    /// name starts with one of `categories`.
    ///
    /// The output has one column per name. A column that is both retained and a feature sits
    /// in the retained block. Rows are carried through unchanged.
    pub fn extract<C, K, S>(
        &self,
        categories: &[C],
        table: &Table,
        keep_columns: K,
        strata: S,
    ) -> Result<Extraction>
    where
        C: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let categories = CategorySet::new(categories);
        let features = selection::match_features(table, &categories);

        if !features.unmatched.is_empty() {
            if self.options.require_category_matches {
                return Err(Error::InvalidArgumentError(format!(
                    "categories not present in table: {}",
                    features.unmatched.join(", ")
                )));
            }
            for prefix in &features.unmatched {
                tracing::warn!("category '{}' matched no column", prefix);
            }
        }

        let retained = selection::resolve_retained(
            table,
            keep_columns,
            strata,
            self.options.retained_order,
        );
        for name in &retained.absent {
            tracing::debug!("requested column '{}' not in table, skipping", name);
        }

        let retained_table = table.select_by_names(retained.columns.as_slice())?;
        let feature_table = table.select_where(|name| categories.matches(name))?;
        let output = retained_table.concat_columns(&feature_table)?;

        let retained_names: FxHashSet<&str> =
            retained.columns.iter().map(String::as_str).collect();
        let feature_columns: Vec<String> = features
            .columns
            .into_iter()
            .filter(|name| !retained_names.contains(name.as_str()))
            .collect();

        tracing::debug!(
            "extracted {} retained and {} feature columns over {} rows",
            retained.columns.len(),
            feature_columns.len(),
            output.num_rows()
        );

        Ok(Extraction {
            table: output,
            report: ExtractionReport {
                retained_columns: retained.columns,
                feature_columns,
                unmatched_categories: features.unmatched,
                absent_columns: retained.absent,
            },
        })
    }
}

/// Names of the columns of `table` that start with one of `categories`, in source order.
pub fn feature_columns<C: AsRef<str>>(table: &Table, categories: &[C]) -> Vec<String> {
    selection::match_features(table, &CategorySet::new(categories)).columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RetainedOrder;
    use imfeat_test_utils::image_batch;

    fn table() -> Table {
        Table::try_new(image_batch()).unwrap()
    }

    const NO_STRATA: [&str; 0] = [];

    #[test]
    fn report_separates_retained_from_features() {
        let out = FeatureExtractor::default()
            .extract(
                &["Image_", "Missing_"],
                &table(),
                ["Image_Correlation_B", "ImageNumber", "Metadata_Site"],
                NO_STRATA,
            )
            .unwrap();

        assert_eq!(
            out.report.retained_columns,
            vec!["ImageNumber", "Image_Correlation_B"]
        );
        assert_eq!(
            out.report.feature_columns,
            vec!["Image_Correlation_A", "Image_ImageQuality_X"]
        );
        assert_eq!(out.report.unmatched_categories, vec!["Missing_"]);
        assert_eq!(out.report.absent_columns, vec!["Metadata_Site"]);
        assert_eq!(
            out.table.column_names(),
            vec![
                "ImageNumber",
                "Image_Correlation_B",
                "Image_Correlation_A",
                "Image_ImageQuality_X",
            ]
        );
    }

    #[test]
    fn strict_mode_rejects_unmatched_categories() {
        let extractor = FeatureExtractor::new(ExtractOptions::strict());
        let err = extractor
            .extract(
                &["Image_Correlation", "Image_Granularity"],
                &table(),
                ["ImageNumber"],
                NO_STRATA,
            )
            .unwrap_err();
        assert!(
            matches!(&err, Error::InvalidArgumentError(msg) if msg.contains("Image_Granularity")),
            "{err:?}"
        );

        let ok = extractor
            .extract(&["Image_Correlation"], &table(), ["ImageNumber"], NO_STRATA)
            .unwrap();
        assert!(ok.report.unmatched_categories.is_empty());
    }

    #[test]
    fn source_order_option_moves_retained_block() {
        let extractor = FeatureExtractor::new(ExtractOptions {
            retained_order: RetainedOrder::SourceOrder,
            ..Default::default()
        });
        let out = extractor
            .extract(
                &["Image_ImageQuality"],
                &table(),
                ["Unrelated"],
                ["ImageNumber"],
            )
            .unwrap();
        assert_eq!(
            out.table.column_names(),
            vec!["ImageNumber", "Unrelated", "Image_ImageQuality_X"]
        );
    }

    #[test]
    fn feature_columns_lists_matches_only() {
        let names = feature_columns(&table(), &["Image_Correlation", "Unrel"]);
        assert_eq!(
            names,
            vec!["Image_Correlation_A", "Image_Correlation_B", "Unrelated"]
        );
    }
}
