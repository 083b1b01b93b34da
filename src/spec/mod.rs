//! Spec layer: JSON file shapes + the validated in-memory aggregate.
//!
//! This module is intentionally separate from the results grid and
//! rendering. It owns:
//! - the specification model (roles, endpoints, default headers)
//! - the store guarding its invariants and fanning out change signals
//! - the raw file shapes and their validation

pub mod file;
pub mod store;

pub use file::{RawEndpoint, RawRole, SpecFile, to_json_pretty};
pub use store::{
    AuthKind, ClearHeaders, Endpoint, Expectation, GUEST_ROLE, Role, SpecError, SpecStore,
    Specification, baseline_headers, default_status_for,
};
