use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Something odd about the geometry at one slice. Diagnostics never stop a
/// computation, the slice area is still computed from whatever closed loops
/// were found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Chains of segments that never came back to where they started. Their
    /// segments are left out of the area.
    OpenChains { chains: usize, segments: usize },
    /// Points where other than two segments meet.
    NonManifoldNodes { nodes: usize },
    /// Loops that cross each other, so holes were told apart by winding
    /// instead of containment.
    OverlappingLoops { loops: usize },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OpenChains { chains, segments } => {
                write!(f, "{chains} open chain(s) made of {segments} segment(s)")
            }
            Diagnostic::NonManifoldNodes { nodes } => {
                write!(f, "{nodes} non-manifold node(s)")
            }
            Diagnostic::OverlappingLoops { loops } => {
                write!(f, "{loops} loop(s) do not nest cleanly")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Diagnostic;

    #[test]
    fn serializes_with_kind_tag() {
        let diagnostic = Diagnostic::OpenChains {
            chains: 2,
            segments: 7,
        };
        let json = serde_json::to_string(&diagnostic).unwrap();
        assert_eq!(json, r#"{"kind":"open_chains","chains":2,"segments":7}"#);
        assert_eq!(diagnostic.to_string(), "2 open chain(s) made of 7 segment(s)");
    }
}
