//! Spec files: raw JSON shapes plus validation into the in-memory model.
//!
//! JSON shape:
//!
//! ```json
//! {
//!   "roles": [
//!     { "name": "admin", "header": "Authorization: Bearer {token}", "token": "s3cret" }
//!   ],
//!   "endpoints": [
//!     {
//!       "name": "GET /api/admin",
//!       "method": "GET",
//!       "path": "/api/admin",
//!       "expect": { "guest": { "status": 403 }, "admin": { "status": 200 } }
//!     }
//!   ],
//!   "default_headers": { "Accept": "application/json" }
//! }
//! ```
//!
//! Validation rejects duplicate names and expectations that reference
//! unknown roles. The guest baseline (the role itself and a per-endpoint
//! expectation) is seeded rather than required of the file.

use crate::Result;
use crate::spec::store::{
    AuthKind, Endpoint, Expectation, GUEST_ROLE, Role, Specification, baseline_headers,
    default_status_for,
};
use anyhow::bail;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Deserialize)]
pub struct SpecFile {
    #[serde(default)]
    pub roles: Vec<RawRole>,

    #[serde(default)]
    pub endpoints: Vec<RawEndpoint>,

    #[serde(default = "baseline_headers")]
    pub default_headers: BTreeMap<String, String>,
}

/// Role record as it appears in a spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRole {
    pub name: String,

    /// Explicit auth kind; derived from `header` when absent.
    #[serde(default)]
    pub auth: Option<AuthKind>,

    #[serde(default)]
    pub header: String,

    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEndpoint {
    pub name: String,
    pub method: String,
    pub path: String,

    #[serde(default)]
    pub expect: BTreeMap<String, RawExpectation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawExpectation {
    pub status: u16,
}

impl SpecFile {
    /// Parse a JSON spec file.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate names and references, then build the in-memory model.
    pub fn validate_and_build(&self) -> Result<Specification> {
        // 1) Roles: trimmed, non-empty, unique; file order preserved;
        //    guest injected at the front when the file omits it.
        let mut roles: Vec<Role> = Vec::new();
        let mut known: BTreeSet<String> = BTreeSet::new();
        for raw in &self.roles {
            let name = raw.name.trim();
            if name.is_empty() {
                bail!("role name must not be empty");
            }
            if !known.insert(name.to_string()) {
                bail!("duplicate role name in spec file: {name}");
            }
            let auth = match raw.auth {
                Some(kind) => kind,
                None if raw.header.trim().is_empty() => AuthKind::None,
                None => AuthKind::Header,
            };
            roles.push(Role {
                name: name.to_string(),
                auth,
                header_spec: raw.header.clone(),
                token: raw.token.clone(),
            });
        }
        if !known.contains(GUEST_ROLE) {
            roles.insert(0, Role::guest());
            known.insert(GUEST_ROLE.to_string());
        }

        // 2) Endpoints: unique names; every expectation must name a role
        //    declared above; missing guest expectations are seeded from
        //    the method convention.
        let mut endpoints: Vec<Endpoint> = Vec::new();
        let mut endpoint_names: BTreeSet<String> = BTreeSet::new();
        for raw in &self.endpoints {
            let name = raw.name.trim();
            if name.is_empty() {
                bail!("endpoint name must not be empty");
            }
            if !endpoint_names.insert(name.to_string()) {
                bail!("duplicate endpoint name in spec file: {name}");
            }
            let mut expect: BTreeMap<String, Expectation> = BTreeMap::new();
            for (role, raw_expect) in &raw.expect {
                if !known.contains(role) {
                    bail!("endpoint '{name}' expects unknown role '{role}'");
                }
                expect.insert(
                    role.clone(),
                    Expectation {
                        status: raw_expect.status,
                    },
                );
            }
            expect.entry(GUEST_ROLE.to_string()).or_insert(Expectation {
                status: default_status_for(&raw.method),
            });
            endpoints.push(Endpoint {
                name: name.to_string(),
                method: raw.method.clone(),
                path: raw.path.clone(),
                expect,
            });
        }

        Ok(Specification {
            roles,
            endpoints,
            default_headers: self.default_headers.clone(),
        })
    }
}

/// Pretty-printed JSON for saving a specification back to disk. The output
/// parses back through [`SpecFile`] unchanged.
pub fn to_json_pretty(spec: &Specification) -> Result<String> {
    Ok(serde_json::to_string_pretty(spec)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "roles": [
            { "name": "admin", "header": "Authorization: Bearer {token}", "token": "s3cret" },
            { "name": "user", "header": "Authorization: Bearer {token}", "token": "u5er" }
        ],
        "endpoints": [
            {
                "name": "GET /api/users",
                "method": "GET",
                "path": "/api/users",
                "expect": { "admin": { "status": 200 }, "user": { "status": 200 } }
            }
        ]
    }"#;

    #[test]
    fn builds_spec_with_guest_injected_first() {
        let spec = SpecFile::parse(SAMPLE)
            .unwrap()
            .validate_and_build()
            .unwrap();
        assert_eq!(spec.role_names(), vec!["guest", "admin", "user"]);
        assert_eq!(spec.default_headers, baseline_headers());
        // Guest expectation seeded from the GET default.
        assert_eq!(spec.endpoints[0].expect[GUEST_ROLE].status, 200);
    }

    #[test]
    fn rejects_unknown_expectation_role() {
        let text = r#"{
            "endpoints": [
                {
                    "name": "users", "method": "GET", "path": "/api/users",
                    "expect": { "phantom": { "status": 200 } }
                }
            ]
        }"#;
        let err = SpecFile::parse(text)
            .unwrap()
            .validate_and_build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown role 'phantom'"));
    }

    #[test]
    fn rejects_duplicate_role_names() {
        let text = r#"{ "roles": [ { "name": "admin" }, { "name": "admin" } ] }"#;
        let err = SpecFile::parse(text)
            .unwrap()
            .validate_and_build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate role name"));
    }

    #[test]
    fn rejects_duplicate_endpoint_names() {
        let text = r#"{
            "endpoints": [
                { "name": "users", "method": "GET", "path": "/api/users" },
                { "name": "users", "method": "POST", "path": "/api/users" }
            ]
        }"#;
        let err = SpecFile::parse(text)
            .unwrap()
            .validate_and_build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate endpoint name"));
    }

    #[test]
    fn rejects_blank_names() {
        let text = r#"{ "roles": [ { "name": "   " } ] }"#;
        assert!(
            SpecFile::parse(text)
                .unwrap()
                .validate_and_build()
                .is_err()
        );
    }

    #[test]
    fn auth_kind_derives_from_header_when_absent() {
        let text = r#"{
            "roles": [
                { "name": "svc", "header": "X-Api-Key: k" },
                { "name": "anon" },
                { "name": "odd", "auth": "none", "header": "X-Ignored: v" }
            ]
        }"#;
        let spec = SpecFile::parse(text)
            .unwrap()
            .validate_and_build()
            .unwrap();
        assert_eq!(spec.role("svc").unwrap().auth, AuthKind::Header);
        assert_eq!(spec.role("anon").unwrap().auth, AuthKind::None);
        // An explicit kind wins over derivation.
        assert_eq!(spec.role("odd").unwrap().auth, AuthKind::None);
    }

    #[test]
    fn save_and_reload_agree() {
        let spec = SpecFile::parse(SAMPLE)
            .unwrap()
            .validate_and_build()
            .unwrap();
        let saved = to_json_pretty(&spec).unwrap();
        let reloaded = SpecFile::parse(&saved)
            .unwrap()
            .validate_and_build()
            .unwrap();
        assert_eq!(reloaded, spec);
    }
}
