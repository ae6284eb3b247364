//! Direct filter: keep rows whose axis value equals the classified value

use crate::dataset::{Dataset, RelevanceMap};
use crate::tool::ToolOutput;

/// Keep rows whose `column` equals `value` exactly (both sides trimmed).
///
/// - empty `value`: nothing was classified, all rows pass unscored
/// - missing `column`: all rows pass unscored
/// - otherwise matching rows are scored 1.0; no match gives an empty dataset
pub fn filter_by_value(dataset: &Dataset, column: &str, value: &str) -> ToolOutput {
    let value = value.trim();
    if value.is_empty() || !dataset.has_column(column) {
        return ToolOutput::identity(dataset);
    }

    let filtered = dataset.filter(|row| row.text(column).as_deref() == Some(value));
    let relevance: RelevanceMap = filtered.row_ids().into_iter().map(|id| (id, 1.0)).collect();
    ToolOutput::new(filtered, relevance)
}
