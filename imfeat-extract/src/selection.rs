//! Column-name selection: category prefix matching and retained-name resolution.

use std::collections::BTreeSet;

use imfeat_table::Table;
use rustc_hash::FxHashSet;

use crate::options::RetainedOrder;

/// Validated list of category prefixes.
///
/// A column belongs to the set when its name starts with at least one prefix. Matching is an
/// exact, case-sensitive byte prefix test, so the empty prefix matches every column.
#[derive(Debug, Clone)]
pub struct CategorySet {
    prefixes: Vec<String>,
}

impl CategorySet {
    pub fn new<C: AsRef<str>>(categories: &[C]) -> Self {
        Self {
            prefixes: categories
                .iter()
                .map(|category| category.as_ref().to_string())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    #[inline]
    pub fn matches(&self, column: &str) -> bool {
        self.prefixes.iter().any(|p| column.starts_with(p.as_str()))
    }
}

/// Feature columns and the categories that found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FeatureMatch {
    /// Matching columns in source order.
    pub(crate) columns: Vec<String>,
    /// Prefixes without a single matching column, in caller order.
    pub(crate) unmatched: Vec<String>,
}

pub(crate) fn match_features(table: &Table, categories: &CategorySet) -> FeatureMatch {
    let mut hit = vec![false; categories.prefixes().len()];
    let mut columns = Vec::new();
    for name in table.column_names() {
        let mut selected = false;
        for (idx, prefix) in categories.prefixes().iter().enumerate() {
            if name.starts_with(prefix.as_str()) {
                hit[idx] = true;
                selected = true;
            }
        }
        // Selected once even when several prefixes match.
        if selected {
            columns.push(name.to_string());
        }
    }

    let unmatched = categories
        .prefixes()
        .iter()
        .zip(&hit)
        .filter(|(_, hit)| !**hit)
        .map(|(prefix, _)| prefix.clone())
        .collect();
    FeatureMatch { columns, unmatched }
}

/// Retained names present in the table, and requested names that are not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RetainedMatch {
    pub(crate) columns: Vec<String>,
    /// Requested names absent from the table, sorted.
    pub(crate) absent: Vec<String>,
}

/// Union `keep` and `strata`, intersect with the table's columns and order the result.
pub(crate) fn resolve_retained<K, S>(
    table: &Table,
    keep: K,
    strata: S,
    order: RetainedOrder,
) -> RetainedMatch
where
    K: IntoIterator,
    K::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    let requested: BTreeSet<String> = keep
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .chain(strata.into_iter().map(|name| name.as_ref().to_string()))
        .collect();

    let (present, absent): (Vec<String>, Vec<String>) = requested
        .into_iter()
        .partition(|name| table.contains_column(name));

    let columns = match order {
        RetainedOrder::Lexicographic => present,
        RetainedOrder::SourceOrder => {
            let wanted: FxHashSet<&str> = present.iter().map(String::as_str).collect();
            table
                .column_names()
                .into_iter()
                .filter(|name| wanted.contains(name))
                .map(str::to_string)
                .collect()
        }
    };

    RetainedMatch { columns, absent }
}
