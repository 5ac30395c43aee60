//! Lexical detection of legacy API usage in source text.
//!
//! Detection is whole-word matching against the knowledge base. It will
//! false-positive on unrelated identifiers that collide with a tracked name
//! and will miss calls made through aliases or indirect references.

use tracing::debug;

use crate::transform::contains_word;

use super::analysis::{AttributeMapping, BreakingChange, CodeAnalysis, DeprecatedEndpoint};
use super::knowledge::{Availability, MigrationData};

/// Scans source text for methods and attributes tracked by a knowledge base.
pub struct CodeAnalyzer<'a> {
    data: &'a MigrationData,
    /// Whether to also report attributes not yet available in the target.
    /// Off unless requested.
    include_unsupported: bool,
}

impl<'a> CodeAnalyzer<'a> {
    /// Create an analyzer over the given knowledge base.
    pub fn new(data: &'a MigrationData) -> Self {
        Self {
            data,
            include_unsupported: false,
        }
    }

    /// Opt into an extra pass that reports unsupported attributes as
    /// breaking changes.
    pub fn include_unsupported(mut self, enabled: bool) -> Self {
        self.include_unsupported = enabled;
        self
    }

    /// Analyze a piece of source text.
    pub fn analyze(&self, source: &str) -> CodeAnalysis {
        let mut analysis = CodeAnalysis::default();

        // Methods, in table order
        for (method, mapping) in &self.data.method_mapping {
            if !contains_word(source, method) {
                continue;
            }
            analysis.method_names.push(method.clone());

            if mapping.availability == Availability::Unavailable {
                analysis.deprecated_endpoints.push(DeprecatedEndpoint {
                    method: method.clone(),
                    replacement: mapping.target.clone(),
                });
                analysis.breaking_changes.push(BreakingChange {
                    change: format!("{method} has no replacement in the target version"),
                    explanation: mapping.notes.clone(),
                });
            }
        }

        for attr in &self.data.deprecated_attributes {
            if contains_word(source, attr) {
                analysis.breaking_changes.push(BreakingChange {
                    change: format!("Deprecated attribute: {attr}"),
                    explanation: "This attribute is removed in the new version and has no replacement"
                        .to_string(),
                });
            }
        }

        if self.include_unsupported {
            for attr in &self.data.unsupported_attributes {
                if contains_word(source, attr) {
                    analysis.breaking_changes.push(BreakingChange {
                        change: format!("Unsupported attribute: {attr}"),
                        explanation: "This attribute is not yet available in the new version"
                            .to_string(),
                    });
                }
            }
        }

        for (source_path, target_path) in &self.data.attribute_mapping {
            if contains_word(source, source_path) {
                analysis.attribute_mappings.push(AttributeMapping {
                    source: source_path.clone(),
                    target: target_path.clone(),
                    note: format!("Mapped from {source_path} to {target_path}"),
                });
            }
        }

        debug!(
            methods = analysis.method_names.len(),
            deprecated = analysis.deprecated_endpoints.len(),
            breaking = analysis.breaking_changes.len(),
            mappings = analysis.attribute_mappings.len(),
            "Analyzed source"
        );

        analysis
    }
}

/// Analyze `source` against `data` with default settings.
pub fn analyze(source: &str, data: &MigrationData) -> CodeAnalysis {
    CodeAnalyzer::new(data).analyze(source)
}
