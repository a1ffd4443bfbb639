use serde::{Deserialize, Serialize};

/// Relationship carried by a [`DependencyEdge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Import,
    Extends,
    Calls,
}

/// Directed file-to-file relationship inferred from an import-like statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// Number of raw targets in `source` that resolved to `target`
    pub weight: u32,
    /// `target` also depends on `source`
    pub circular: bool,
}

impl DependencyEdge {
    pub fn import(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Import,
            weight: 1,
            circular: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_serializes_camel_case() {
        let edge = DependencyEdge::import("src_a_ts", "src_b_ts");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["kind"], "import");
        assert_eq!(json["weight"], 1);
        assert_eq!(json["circular"], false);
    }
}
