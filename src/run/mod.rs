//! Runner contract and the loop that feeds a results grid.
//!
//! A runner receives a serializable snapshot of the specification and
//! yields per-cell outcome events in whatever order they complete. The
//! orchestrator renders the all-pending grid for that snapshot, then
//! forwards each event into it; events whose names no longer match the
//! grid are dropped benignly.

pub mod sim;

use crate::Result;
use crate::matrix::cell::CellValue;
use crate::matrix::grid::{ResultsGrid, ResultsSnapshot, SnapshotRow};
use crate::spec::store::{SpecStore, Specification};
use serde::{Deserialize, Serialize};

pub use sim::{SimulatedResponse, SimulatedRunner, judge, sample_store};

/// Serializable snapshot handed to a runner.
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub spec: Specification,
}

/// One delivered event: which cell it belongs to plus its value.
///
/// Runners may stream pending markers as acknowledgements; the
/// orchestrator drops them, since rendered cells already start pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub endpoint: String,
    pub role: String,

    #[serde(flatten)]
    pub value: CellValue,
}

/// External test-execution engine, seen as a single event stream.
pub trait Runner {
    /// Start executing the request. The iterator yields outcomes in
    /// arrival order, which carries no cross-cell guarantee.
    fn execute(&mut self, request: &RunRequest) -> Result<Box<dyn Iterator<Item = RunOutcome>>>;
}

/// Replays a fixed script of events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    pub events: Vec<RunOutcome>,
}

impl ScriptedRunner {
    pub fn new(events: Vec<RunOutcome>) -> Self {
        Self { events }
    }
}

impl Runner for ScriptedRunner {
    fn execute(&mut self, _request: &RunRequest) -> Result<Box<dyn Iterator<Item = RunOutcome>>> {
        Ok(Box::new(self.events.clone().into_iter()))
    }
}

/// The full endpoint-by-role cross for a specification, every cell
/// pending. Rows follow endpoint order, cells follow role order.
pub fn pending_snapshot(spec: &Specification) -> ResultsSnapshot {
    let roles = spec.role_names();
    let rows = spec
        .endpoints
        .iter()
        .map(|endpoint| SnapshotRow {
            endpoint: endpoint.name.clone(),
            cells: roles
                .iter()
                .map(|role| (role.to_string(), CellValue::Pending))
                .collect(),
        })
        .collect();
    ResultsSnapshot { rows }
}

/// Counters for one driven run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Events that landed in the grid.
    pub applied: usize,
    /// Pending markers and events whose names missed the grid.
    pub ignored: usize,
}

/// Snapshot the store, render the all-pending grid, and reconcile the
/// runner's event stream into it.
pub fn run_matrix<R: Runner>(
    store: &SpecStore,
    runner: &mut R,
    grid: &mut ResultsGrid,
) -> Result<RunReport> {
    run_matrix_with(store, runner, grid, |_| {})
}

/// Like [`run_matrix`], invoking `on_event` after the initial render and
/// again after every delivered event. The CLI repaints there.
pub fn run_matrix_with<R, F>(
    store: &SpecStore,
    runner: &mut R,
    grid: &mut ResultsGrid,
    mut on_event: F,
) -> Result<RunReport>
where
    R: Runner,
    F: FnMut(&ResultsGrid),
{
    let request = RunRequest {
        spec: store.snapshot(),
    };
    grid.render(&pending_snapshot(&request.spec));
    on_event(grid);

    let mut report = RunReport::default();
    for event in runner.execute(&request)? {
        match event.value {
            CellValue::Done(outcome) => {
                if grid.update_result(&event.endpoint, &event.role, outcome) {
                    report.applied += 1;
                } else {
                    report.ignored += 1;
                }
            }
            CellValue::Pending => report.ignored += 1,
        }
        on_event(grid);
    }
    Ok(report)
}
