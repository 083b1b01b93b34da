//! Results grid: one render generation of endpoint-by-role cells plus the
//! pending indicators they own, reconciled against an unordered stream of
//! per-cell updates.

use crate::matrix::cell::{CellOutcome, CellValue, PENDING_SENTINEL};
use crate::matrix::indicator::PendingIndicator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Input to a render: rows in display order, each carrying its cells in
/// display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub rows: Vec<SnapshotRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub endpoint: String,
    pub cells: Vec<(String, CellValue)>,
}

impl ResultsSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Grid of cells for the currently rendered run.
///
/// Generation 0 is the never-rendered state; every render discards the
/// previous generation's cells and indicators before installing the next,
/// so nothing keeps animating against cells that no longer exist.
pub struct ResultsGrid {
    generation: u64,
    rows: Vec<String>,
    columns: Vec<String>,
    row_index: BTreeMap<String, usize>,
    col_index: BTreeMap<String, usize>,
    cells: BTreeMap<(usize, usize), CellValue>,
    // Every entry is running; stopping an indicator always removes it.
    indicators: BTreeMap<(usize, usize), Rc<PendingIndicator>>,
}

impl ResultsGrid {
    pub fn new() -> Self {
        Self {
            generation: 0,
            rows: Vec::new(),
            columns: Vec::new(),
            row_index: BTreeMap::new(),
            col_index: BTreeMap::new(),
            cells: BTreeMap::new(),
            indicators: BTreeMap::new(),
        }
    }

    /// Rebuild the grid from a snapshot, starting a new generation.
    ///
    /// Row order is the snapshot's row order. Column order is the union of
    /// role names across all rows by first appearance; for snapshots whose
    /// rows agree on roles that is exactly the first row's order. A
    /// combination the snapshot never mentions gets no cell: it renders
    /// blank, and stays blank until an update lands there.
    pub fn render(&mut self, snapshot: &ResultsSnapshot) {
        self.release_indicators();
        self.rows.clear();
        self.columns.clear();
        self.row_index.clear();
        self.col_index.clear();
        self.cells.clear();
        self.generation += 1;

        for row in &snapshot.rows {
            if self.row_index.contains_key(&row.endpoint) {
                // Duplicate row label: the first one wins.
                continue;
            }
            let r = self.rows.len();
            self.rows.push(row.endpoint.clone());
            self.row_index.insert(row.endpoint.clone(), r);

            for (role, value) in &row.cells {
                let c = match self.col_index.get(role) {
                    Some(&c) => c,
                    None => {
                        let c = self.columns.len();
                        self.columns.push(role.clone());
                        self.col_index.insert(role.clone(), c);
                        c
                    }
                };
                self.cells.insert((r, c), *value);
                match value {
                    CellValue::Pending => {
                        self.indicators
                            .entry((r, c))
                            .or_insert_with(PendingIndicator::start);
                    }
                    CellValue::Done(_) => {
                        if let Some(indicator) = self.indicators.remove(&(r, c)) {
                            indicator.stop();
                        }
                    }
                }
            }
        }
    }

    /// Deliver one result into the current generation.
    ///
    /// Unknown endpoint or role names are benign no-ops (`false`); late
    /// deliveries for a superseded render are expected, not an error. A
    /// pending cell resolves at most once per generation: its indicator is
    /// stopped and released before the outcome is written. Later updates
    /// for the same cell overwrite in place.
    pub fn update_result(&mut self, endpoint: &str, role: &str, outcome: CellOutcome) -> bool {
        let (Some(&r), Some(&c)) = (self.row_index.get(endpoint), self.col_index.get(role)) else {
            return false;
        };
        if let Some(indicator) = self.indicators.remove(&(r, c)) {
            indicator.stop();
        }
        self.cells.insert((r, c), CellValue::Done(outcome));
        true
    }

    /// Advance every running indicator one animation frame.
    pub fn tick(&self) {
        for indicator in self.indicators.values() {
            indicator.tick();
        }
    }

    /// 0 until the first render.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row labels (endpoint names) in display order.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column labels (role names) in display order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Text for one cell: the indicator's glyph while pending, the
    /// formatted outcome once resolved, empty where no cell exists.
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        match self.cells.get(&(row, col)) {
            Some(CellValue::Done(outcome)) => outcome.to_string(),
            Some(CellValue::Pending) => self
                .indicators
                .get(&(row, col))
                .map(|i| i.glyph().to_string())
                .unwrap_or_else(|| PENDING_SENTINEL.to_string()),
            None => String::new(),
        }
    }

    /// Cells still awaiting a result.
    pub fn pending_cells(&self) -> usize {
        self.cells.values().filter(|v| v.is_pending()).count()
    }

    /// Indicators currently animating, one per pending cell.
    pub fn running_indicators(&self) -> usize {
        self.indicators.len()
    }

    /// Handle for the indicator at a named cell, if that cell is pending.
    pub fn indicator_at(&self, endpoint: &str, role: &str) -> Option<Rc<PendingIndicator>> {
        let r = *self.row_index.get(endpoint)?;
        let c = *self.col_index.get(role)?;
        self.indicators.get(&(r, c)).cloned()
    }

    fn release_indicators(&mut self) {
        for (_, indicator) in std::mem::take(&mut self.indicators) {
            indicator.stop();
        }
    }
}

impl Default for ResultsGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Tearing the grid down stops everything it still owns.
impl Drop for ResultsGrid {
    fn drop(&mut self) {
        self.release_indicators();
    }
}
