/// Order of the retained (identifier and strata) columns at the front of the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetainedOrder {
    /// Sorted by column name, compared bytewise. This is the order a sorted set union produces.
    #[default]
    Lexicographic,
    /// The order the columns appear in the source table.
    SourceOrder,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub retained_order: RetainedOrder,
    /// Fail with `InvalidArgumentError` when a category prefix matches no column instead of
    /// returning a table without that category.
    pub require_category_matches: bool,
}

impl ExtractOptions {
    pub fn strict() -> Self {
        Self {
            require_category_matches: true,
            ..Default::default()
        }
    }
}
