//! Simulated runner: canned responses judged against the specification.
//!
//! Stands in for a real execution engine in demos and tests. Responses are
//! scripted per (endpoint, role); unscripted pairs echo the expectation
//! itself. Outcomes are delivered column-major (role by role across all
//! endpoints), so arrival order never matches the grid's row order.

use crate::Result;
use crate::matrix::cell::{CellOutcome, CellValue};
use crate::run::{RunOutcome, RunRequest, Runner};
use crate::spec::store::{Expectation, SpecStore};
use std::collections::BTreeMap;

/// What the pretend server answered for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedResponse {
    pub status: u16,
    pub latency_ms: Option<u64>,
}

/// Compare an expectation against an observed response.
///
/// No expectation means the pair was not under test. A status match passes
/// and keeps the observed latency; a mismatch fails with the observed
/// code.
pub fn judge(expect: Option<&Expectation>, actual: &SimulatedResponse) -> CellOutcome {
    match expect {
        None => CellOutcome::skip(),
        Some(e) if e.status == actual.status => CellOutcome::pass(actual.status, actual.latency_ms),
        Some(_) => CellOutcome::fail(actual.status),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedRunner {
    responses: BTreeMap<(String, String), SimulatedResponse>,
}

impl SimulatedRunner {
    /// No script at all: every expectation is echoed back, so every cell
    /// under test passes.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Script one response.
    pub fn respond(&mut self, endpoint: &str, role: &str, status: u16, latency_ms: Option<u64>) {
        self.responses.insert(
            (endpoint.to_string(), role.to_string()),
            SimulatedResponse { status, latency_ms },
        );
    }

    /// The canned run behind the demo: a server that rejects guests
    /// everywhere but the public listing and turns away non-admin writes.
    pub fn sample() -> Self {
        let mut sim = Self::default();
        sim.respond("GET /api/users", "guest", 200, Some(45));
        sim.respond("GET /api/users", "user", 200, Some(42));
        sim.respond("GET /api/users", "admin", 200, Some(38));
        sim.respond("GET /api/admin", "guest", 403, None);
        sim.respond("GET /api/admin", "user", 403, None);
        sim.respond("GET /api/admin", "admin", 200, Some(51));
        sim.respond("POST /api/users", "guest", 401, None);
        sim.respond("POST /api/users", "user", 201, Some(120));
        sim.respond("POST /api/users", "admin", 201, Some(98));
        sim.respond("DELETE /api/admin/users", "guest", 403, None);
        sim.respond("DELETE /api/admin/users", "user", 403, None);
        sim.respond("DELETE /api/admin/users", "admin", 204, Some(75));
        sim
    }
}

impl Runner for SimulatedRunner {
    fn execute(&mut self, request: &RunRequest) -> Result<Box<dyn Iterator<Item = RunOutcome>>> {
        let spec = &request.spec;
        let roles = spec.role_names();
        let mut events = Vec::new();
        for (col, role) in roles.iter().enumerate() {
            for (row, endpoint) in spec.endpoints.iter().enumerate() {
                let key = (endpoint.name.clone(), role.to_string());
                let actual = self.responses.get(&key).copied().unwrap_or_else(|| {
                    let expected = endpoint.expect.get(*role).map_or(200, |e| e.status);
                    SimulatedResponse {
                        status: expected,
                        latency_ms: Some(derived_latency(row, col)),
                    }
                });
                events.push(RunOutcome {
                    endpoint: endpoint.name.clone(),
                    role: role.to_string(),
                    value: CellValue::Done(judge(endpoint.expect.get(*role), &actual)),
                });
            }
        }
        Ok(Box::new(events.into_iter()))
    }
}

/// Stable pretend latency for echoed expectations.
fn derived_latency(row: usize, col: usize) -> u64 {
    20 + ((row as u64 * 17 + col as u64 * 29) % 80)
}

/// The demo specification, built through the store's own operations so
/// endpoint guest expectations come from method seeding.
pub fn sample_store() -> SpecStore {
    let mut store = SpecStore::new();
    store.add_role("user", "Authorization: Bearer {token}", "user-dev-token");
    store.add_role("admin", "Authorization: Bearer {token}", "admin-dev-token");

    store.add_endpoint("GET /api/users", "GET", "/api/users");
    store.add_endpoint("GET /api/admin", "GET", "/api/admin");
    store.add_endpoint("POST /api/users", "POST", "/api/users");
    store.add_endpoint("DELETE /api/admin/users", "DELETE", "/api/admin/users");

    // Guests keep their seeded defaults; authenticated roles are expected
    // to succeed everywhere.
    for (index, status) in [(0, 200), (1, 200), (2, 201), (3, 204)] {
        for role in ["user", "admin"] {
            store.set_expectation(index, role, status).unwrap();
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::cell::OutcomeStatus;
    use crate::matrix::grid::ResultsGrid;
    use crate::run::run_matrix;
    use pretty_assertions::assert_eq;

    #[test]
    fn judge_covers_skip_pass_and_fail() {
        let expect = Expectation { status: 200 };
        let ok = SimulatedResponse {
            status: 200,
            latency_ms: Some(12),
        };
        let denied = SimulatedResponse {
            status: 403,
            latency_ms: Some(9),
        };

        assert_eq!(judge(None, &ok), CellOutcome::skip());
        assert_eq!(judge(Some(&expect), &ok), CellOutcome::pass(200, Some(12)));
        assert_eq!(judge(Some(&expect), &denied), CellOutcome::fail(403));
    }

    #[test]
    fn sample_run_reproduces_the_demo_table() {
        let store = sample_store();
        let mut runner = SimulatedRunner::sample();
        let mut grid = ResultsGrid::new();

        let report = run_matrix(&store, &mut runner, &mut grid).unwrap();

        assert_eq!(report.applied, 12);
        assert_eq!(report.ignored, 0);
        assert_eq!(grid.pending_cells(), 0);
        assert_eq!(
            grid.rows(),
            vec![
                "GET /api/users",
                "GET /api/admin",
                "POST /api/users",
                "DELETE /api/admin/users"
            ]
        );
        assert_eq!(grid.columns(), vec!["guest", "user", "admin"]);

        assert_eq!(grid.cell_text(0, 0), "✅ 200  45ms");
        assert_eq!(grid.cell_text(0, 1), "✅ 200  42ms");
        assert_eq!(grid.cell_text(0, 2), "✅ 200  38ms");
        assert_eq!(grid.cell_text(1, 0), "❌ 403");
        assert_eq!(grid.cell_text(1, 1), "❌ 403");
        assert_eq!(grid.cell_text(1, 2), "✅ 200  51ms");
        assert_eq!(grid.cell_text(2, 0), "❌ 401");
        assert_eq!(grid.cell_text(2, 1), "✅ 201  120ms");
        assert_eq!(grid.cell_text(2, 2), "✅ 201  98ms");
        assert_eq!(grid.cell_text(3, 0), "❌ 403");
        assert_eq!(grid.cell_text(3, 1), "❌ 403");
        assert_eq!(grid.cell_text(3, 2), "✅ 204  75ms");
    }

    #[test]
    fn passthrough_passes_expected_cells_and_skips_the_rest() {
        let mut store = SpecStore::new();
        store.add_role("admin", "Authorization: Bearer {token}", "tok");
        store.add_endpoint("GET /api/health", "GET", "/api/health");
        // Guest was seeded; admin is left without an expectation.

        let mut runner = SimulatedRunner::passthrough();
        let mut grid = ResultsGrid::new();
        run_matrix(&store, &mut runner, &mut grid).unwrap();

        assert_eq!(
            grid.cell(0, 0).copied(),
            Some(CellValue::Done(CellOutcome::pass(
                200,
                Some(derived_latency(0, 0))
            )))
        );
        match grid.cell(0, 1) {
            Some(CellValue::Done(outcome)) => assert_eq!(outcome.status, OutcomeStatus::Skip),
            other => panic!("admin cell unresolved: {other:?}"),
        }
    }
}
