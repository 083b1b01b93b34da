//! Specification aggregate: roles, endpoints, and default headers.
//!
//! `SpecStore` is the single writer for the aggregate. Every mutation
//! either commits and fires one change notification, or fails leaving the
//! aggregate untouched. External readers only ever get `&Specification`
//! or an owned snapshot, never a mutable alias.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Name of the always-present unauthenticated baseline role.
pub const GUEST_ROLE: &str = "guest";

/// Header set installed on a new store and restored by a bulk clear.
pub fn baseline_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

/// Default expected status seeded for the guest role when an endpoint is
/// added: reads succeed, creates return 201, deletes return no content.
pub fn default_status_for(method: &str) -> u16 {
    match method.to_ascii_uppercase().as_str() {
        "GET" => 200,
        "POST" => 201,
        "DELETE" => 204,
        _ => 200,
    }
}

/// How a role authenticates its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    /// No credentials attached (the guest baseline).
    None,
    /// A literal header line carries the role's credentials.
    Header,
}

/// A named authentication identity used to probe endpoint behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub name: String,
    pub auth: AuthKind,
    /// Header line attached to this role's requests, e.g.
    /// `Authorization: Bearer {token}`.
    #[serde(rename = "header")]
    pub header_spec: String,
    pub token: String,
}

impl Role {
    /// The unauthenticated baseline present in every specification.
    pub fn guest() -> Self {
        Self {
            name: GUEST_ROLE.to_string(),
            auth: AuthKind::None,
            header_spec: String::new(),
            token: String::new(),
        }
    }
}

/// The outcome a role is expected to receive on an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expectation {
    pub status: u16,
}

/// One endpoint under test, carrying its per-role expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub name: String,
    pub method: String,
    pub path: String,
    pub expect: BTreeMap<String, Expectation>,
}

/// The full authorization test matrix definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specification {
    pub roles: Vec<Role>,
    pub endpoints: Vec<Endpoint>,
    pub default_headers: BTreeMap<String, String>,
}

impl Specification {
    /// A fresh specification: the guest role plus the Accept baseline.
    pub fn new() -> Self {
        Self {
            roles: vec![Role::guest()],
            endpoints: Vec::new(),
            default_headers: baseline_headers(),
        }
    }

    /// Look up a role by name.
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// Role names in insertion order (guest first on a fresh store).
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

impl Default for Specification {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation failure taxonomy for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The operation is never permitted, e.g. removing the guest role.
    InvalidOperation(String),
    /// The named role, header, or indexed endpoint does not exist.
    NotFound(String),
}

impl Display for SpecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::InvalidOperation(msg) | SpecError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SpecError {}

/// Result of a bulk header clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearHeaders {
    /// The set was replaced with the Accept baseline.
    Cleared,
    /// The set was already empty or already the baseline; nothing changed
    /// and no notification was emitted.
    NothingToClear,
}

/// Single-writer owner of the specification aggregate.
pub struct SpecStore {
    spec: Specification,
    observers: Vec<Box<dyn Fn()>>,
}

impl SpecStore {
    pub fn new() -> Self {
        Self {
            spec: Specification::new(),
            observers: Vec::new(),
        }
    }

    /// Wrap an externally built specification.
    ///
    /// Baseline invariants are re-established on entry: the guest role is
    /// inserted if absent, every endpoint gains a guest expectation, and
    /// expectations naming unknown roles are dropped.
    pub fn from_spec(mut spec: Specification) -> Self {
        if spec.role(GUEST_ROLE).is_none() {
            spec.roles.insert(0, Role::guest());
        }
        let known: BTreeSet<String> = spec.roles.iter().map(|r| r.name.clone()).collect();
        for endpoint in &mut spec.endpoints {
            endpoint.expect.retain(|role, _| known.contains(role));
            let seed = default_status_for(&endpoint.method);
            endpoint
                .expect
                .entry(GUEST_ROLE.to_string())
                .or_insert(Expectation { status: seed });
        }
        Self {
            spec,
            observers: Vec::new(),
        }
    }

    /// Read-only view of the aggregate.
    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    /// Owned copy, e.g. for building a run request.
    pub fn snapshot(&self) -> Specification {
        self.spec.clone()
    }

    /// Register a change observer.
    ///
    /// Observers are invoked synchronously after every committed mutation,
    /// with no payload; they re-read the aggregate for details. They must
    /// not mutate the store from inside the callback.
    pub fn subscribe(&mut self, observer: impl Fn() + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer();
        }
    }

    /// Insert or overwrite a role. The auth kind is derived from the
    /// header spec: a blank spec means the role sends no credentials.
    pub fn add_role(&mut self, name: &str, header_spec: &str, token: &str) {
        let auth = if header_spec.trim().is_empty() {
            AuthKind::None
        } else {
            AuthKind::Header
        };
        let role = Role {
            name: name.to_string(),
            auth,
            header_spec: header_spec.to_string(),
            token: token.to_string(),
        };
        match self.spec.roles.iter().position(|r| r.name == name) {
            Some(i) => self.spec.roles[i] = role,
            None => self.spec.roles.push(role),
        }
        self.notify();
    }

    /// Remove a role together with every expectation that references it.
    ///
    /// The cascade is atomic: the role and all of its expectation entries
    /// disappear in one commit (one notification), or nothing changes.
    pub fn remove_role(&mut self, name: &str) -> Result<(), SpecError> {
        if name == GUEST_ROLE {
            return Err(SpecError::InvalidOperation(
                "the guest role cannot be removed".to_string(),
            ));
        }
        let Some(position) = self.spec.roles.iter().position(|r| r.name == name) else {
            return Err(SpecError::NotFound(format!("no role named '{name}'")));
        };
        self.spec.roles.remove(position);
        for endpoint in &mut self.spec.endpoints {
            endpoint.expect.remove(name);
        }
        self.notify();
        Ok(())
    }

    /// Insert or overwrite a default header sent with every request.
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.spec
            .default_headers
            .insert(key.to_string(), value.to_string());
        self.notify();
    }

    /// Remove a single default header. Removing the last entry is allowed;
    /// only the bulk clear restores the Accept baseline.
    pub fn remove_header(&mut self, key: &str) -> Result<(), SpecError> {
        if self.spec.default_headers.remove(key).is_none() {
            return Err(SpecError::NotFound(format!("no header named '{key}'")));
        }
        self.notify();
        Ok(())
    }

    /// Replace the whole header set with the Accept baseline.
    pub fn clear_all_headers(&mut self) -> ClearHeaders {
        let baseline = baseline_headers();
        if self.spec.default_headers.is_empty() || self.spec.default_headers == baseline {
            return ClearHeaders::NothingToClear;
        }
        self.spec.default_headers = baseline;
        self.notify();
        ClearHeaders::Cleared
    }

    /// Append an endpoint, or overwrite the one with the same name in
    /// place. Expectations are seeded with a guest entry whose status
    /// follows the method convention.
    pub fn add_endpoint(&mut self, name: &str, method: &str, path: &str) {
        let mut expect = BTreeMap::new();
        expect.insert(
            GUEST_ROLE.to_string(),
            Expectation {
                status: default_status_for(method),
            },
        );
        let endpoint = Endpoint {
            name: name.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            expect,
        };
        match self.spec.endpoints.iter().position(|e| e.name == name) {
            Some(i) => self.spec.endpoints[i] = endpoint,
            None => self.spec.endpoints.push(endpoint),
        }
        self.notify();
    }

    /// Record the outcome a role is expected to receive on an endpoint.
    pub fn set_expectation(
        &mut self,
        endpoint_index: usize,
        role: &str,
        status: u16,
    ) -> Result<(), SpecError> {
        if self.spec.role(role).is_none() {
            return Err(SpecError::NotFound(format!("no role named '{role}'")));
        }
        let Some(endpoint) = self.spec.endpoints.get_mut(endpoint_index) else {
            return Err(SpecError::NotFound(format!(
                "endpoint index {endpoint_index} is out of range"
            )));
        };
        endpoint
            .expect
            .insert(role.to_string(), Expectation { status });
        self.notify();
        Ok(())
    }

    /// Remove an endpoint and the expectations it carries.
    pub fn remove_endpoint(&mut self, index: usize) -> Result<(), SpecError> {
        if index >= self.spec.endpoints.len() {
            return Err(SpecError::NotFound(format!(
                "endpoint index {index} is out of range"
            )));
        }
        self.spec.endpoints.remove(index);
        self.notify();
        Ok(())
    }
}

impl Default for SpecStore {
    fn default() -> Self {
        Self::new()
    }
}
