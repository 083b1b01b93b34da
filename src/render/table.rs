//! Plain-text table rendering of a results grid.

use crate::matrix::grid::ResultsGrid;

const ENDPOINT_WIDTH: usize = 30;
const CELL_WIDTH: usize = 15;

/// Render the grid as a fixed-width table.
///
/// Pending cells show their indicator's current glyph; resolved cells
/// show the formatted outcome. An unrendered or endpoint-free grid gets a
/// placeholder line instead of an empty frame.
pub fn render_table(grid: &ResultsGrid) -> String {
    if grid.rows().is_empty() {
        return "No results to display\n".to_string();
    }

    let table_width = ENDPOINT_WIDTH + grid.columns().len() * (CELL_WIDTH + 3);
    let rule = "=".repeat(table_width);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{:<width$}", "Endpoint", width = ENDPOINT_WIDTH));
    for role in grid.columns() {
        out.push_str(&format!(" | {role:^width$}", width = CELL_WIDTH));
    }
    out.push('\n');
    out.push_str(&"-".repeat(table_width));
    out.push('\n');

    for (r, endpoint) in grid.rows().iter().enumerate() {
        out.push_str(&format!("{endpoint:<width$}", width = ENDPOINT_WIDTH));
        for c in 0..grid.columns().len() {
            let cell = grid.cell_text(r, c);
            out.push_str(&format!(" | {cell:^width$}", width = CELL_WIDTH));
        }
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');

    out
}
