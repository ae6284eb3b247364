//! Text cleanup applied to every cell during normalization

use crate::dataset::Cell;

/// Spreadsheet export artifact for a carriage return
const CR_ARTIFACT: &str = "_x000D_";

/// Remove export artifacts and double quotes, trim, collapse whitespace runs.
pub fn clean_text(text: &str) -> String {
    text.replace(CR_ARTIFACT, " ")
        .replace('"', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`clean_text`] for text cells; null and numeric cells are left alone.
pub fn clean_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(clean_text(s)),
        other => other.clone(),
    }
}
