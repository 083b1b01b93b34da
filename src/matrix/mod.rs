//! Results matrix: cell values, pending indicators, and the grid that
//! reconciles unordered result streams against the rendered run.

pub mod cell;
pub mod grid;
pub mod indicator;

pub use cell::{CellOutcome, CellValue, OutcomeStatus, PENDING_SENTINEL};
pub use grid::{ResultsGrid, ResultsSnapshot, SnapshotRow};
pub use indicator::PendingIndicator;
