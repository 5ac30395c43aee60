//! Analysis result types produced by the code analyzer.

use serde::Serialize;

use super::knowledge::NO_COUNTERPART;

/// A legacy method call that has no target-version equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecatedEndpoint {
    pub method: String,
    pub replacement: String,
}

impl DeprecatedEndpoint {
    /// Returns true if the replacement descriptor names a real target operation.
    pub fn has_equivalent(&self) -> bool {
        !self.replacement.starts_with(NO_COUNTERPART)
    }
}

/// Something in the source that will break after migrating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingChange {
    pub change: String,
    pub explanation: String,
}

/// A source attribute path with a known target location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMapping {
    pub source: String,
    pub target: String,
    pub note: String,
}

/// Structured result of one analysis run.
///
/// Every list follows knowledge-base iteration order, so analyzing the same
/// input twice yields equal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    pub deprecated_endpoints: Vec<DeprecatedEndpoint>,
    pub breaking_changes: Vec<BreakingChange>,
    pub attribute_mappings: Vec<AttributeMapping>,
    /// Recognized method names present in the input.
    pub method_names: Vec<String>,
}

impl CodeAnalysis {
    /// Returns true if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.deprecated_endpoints.is_empty()
            && self.breaking_changes.is_empty()
            && self.attribute_mappings.is_empty()
            && self.method_names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_equivalent() {
        let legacy = DeprecatedEndpoint {
            method: "confirmShipment".into(),
            replacement: NO_COUNTERPART.into(),
        };
        assert!(!legacy.has_equivalent());

        let renamed = DeprecatedEndpoint {
            method: "getOrders".into(),
            replacement: "search_orders (with filters)".into(),
        };
        assert!(renamed.has_equivalent());
    }

    #[test]
    fn test_serializes_camel_case() {
        let analysis = CodeAnalysis {
            method_names: vec!["getOrders".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["methodNames"][0], "getOrders");
        assert!(json["deprecatedEndpoints"].as_array().unwrap().is_empty());
        assert!(!analysis.is_empty());
        assert!(CodeAnalysis::default().is_empty());
    }
}
