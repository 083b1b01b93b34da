//! Cell values: outcome statuses, the pending sentinel, display text.
//!
//! Wire shape of one cell:
//!
//! ```json
//! { "status": "PASS", "http": 200, "latency_ms": 45 }
//! { "status": "⏳" }
//! ```
//!
//! Exactly `PASS`, `FAIL`, and `SKIP` resolve; every other status string
//! decodes as pending, so a misspelled status can never fabricate a
//! resolved cell.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Status marker carried by a pending cell in serialized form.
pub const PENDING_SENTINEL: &str = "⏳";

pub const GLYPH_PASS: &str = "✅";
pub const GLYPH_FAIL: &str = "❌";
pub const GLYPH_SKIP: &str = "⏭️";

/// Judgement the runner reached for one (endpoint, role) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeStatus {
    Pass,
    Fail,
    Skip,
}

impl OutcomeStatus {
    /// Exact-match parse of the wire string; anything else is pending.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "SKIP" => Some(Self::Skip),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

/// A resolved cell: the judgement plus optional observed code and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOutcome {
    pub status: OutcomeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CellOutcome {
    pub fn pass(http: u16, latency_ms: Option<u64>) -> Self {
        Self {
            status: OutcomeStatus::Pass,
            http: Some(http),
            latency_ms,
        }
    }

    pub fn fail(http: u16) -> Self {
        Self {
            status: OutcomeStatus::Fail,
            http: Some(http),
            latency_ms: None,
        }
    }

    pub fn skip() -> Self {
        Self {
            status: OutcomeStatus::Skip,
            http: None,
            latency_ms: None,
        }
    }
}

/// Display is a pure function of the outcome: pass shows the code and the
/// latency, fail shows the code, skip shows the glyph alone.
impl Display for CellOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            OutcomeStatus::Pass => {
                write!(f, "{GLYPH_PASS}")?;
                if let Some(code) = self.http {
                    write!(f, " {code}")?;
                }
                if let Some(ms) = self.latency_ms {
                    write!(f, "  {ms}ms")?;
                }
                Ok(())
            }
            OutcomeStatus::Fail => {
                write!(f, "{GLYPH_FAIL}")?;
                if let Some(code) = self.http {
                    write!(f, " {code}")?;
                }
                Ok(())
            }
            OutcomeStatus::Skip => write!(f, "{GLYPH_SKIP}"),
        }
    }
}

/// One matrix cell: awaiting the runner, or carrying its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCell", into = "RawCell")]
pub enum CellValue {
    Pending,
    Done(CellOutcome),
}

impl CellValue {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Serialized cell record, the bridge that keeps the sentinel unambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCell {
    status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    http: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match OutcomeStatus::parse(&raw.status) {
            Some(status) => CellValue::Done(CellOutcome {
                status,
                http: raw.http,
                latency_ms: raw.latency_ms,
            }),
            None => CellValue::Pending,
        }
    }
}

impl From<CellValue> for RawCell {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Pending => RawCell {
                status: PENDING_SENTINEL.to_string(),
                http: None,
                latency_ms: None,
            },
            CellValue::Done(outcome) => RawCell {
                status: outcome.status.as_str().to_string(),
                http: outcome.http,
                latency_ms: outcome.latency_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pass_text_shows_code_and_latency() {
        assert_eq!(CellOutcome::pass(200, Some(42)).to_string(), "✅ 200  42ms");
        assert_eq!(CellOutcome::pass(204, None).to_string(), "✅ 204");
    }

    #[test]
    fn fail_text_shows_code_only() {
        assert_eq!(CellOutcome::fail(403).to_string(), "❌ 403");
        let bare = CellOutcome {
            status: OutcomeStatus::Fail,
            http: None,
            latency_ms: Some(9),
        };
        assert_eq!(bare.to_string(), "❌");
    }

    #[test]
    fn skip_text_is_the_glyph_alone() {
        let skip = CellOutcome {
            status: OutcomeStatus::Skip,
            http: Some(418),
            latency_ms: Some(3),
        };
        assert_eq!(skip.to_string(), "⏭️");
    }

    #[test]
    fn only_exact_statuses_decode_as_resolved() {
        let done: CellValue =
            serde_json::from_str(r#"{ "status": "PASS", "http": 200, "latency_ms": 45 }"#).unwrap();
        assert_eq!(done, CellValue::Done(CellOutcome::pass(200, Some(45))));

        let sentinel: CellValue = serde_json::from_str(r#"{ "status": "⏳" }"#).unwrap();
        assert_eq!(sentinel, CellValue::Pending);

        let typo: CellValue = serde_json::from_str(r#"{ "status": "pass", "http": 200 }"#).unwrap();
        assert_eq!(typo, CellValue::Pending);

        let unknown: CellValue = serde_json::from_str(r#"{ "status": "RUNNING" }"#).unwrap();
        assert_eq!(unknown, CellValue::Pending);
    }

    #[test]
    fn pending_serializes_as_the_sentinel() {
        let json = serde_json::to_string(&CellValue::Pending).unwrap();
        assert_eq!(json, format!(r#"{{"status":"{PENDING_SENTINEL}"}}"#));
    }

    #[test]
    fn resolved_cells_omit_absent_fields() {
        let json = serde_json::to_string(&CellValue::Done(CellOutcome::skip())).unwrap();
        assert_eq!(json, r#"{"status":"SKIP"}"#);
    }
}
