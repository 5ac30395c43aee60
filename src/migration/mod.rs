//! Migration assistant for moving client code from Orders API v0 to
//! 2026-01-01.
//!
//! The pipeline is lexical: the [`analyzer`] finds tracked method and
//! attribute names as whole words, the [`generator`] rewrites them with an
//! ordered transform pipeline, and [`report`] renders the result.
//!
//! ```
//! use sp_orders_mcp::migration::{MigrationAssistant, MigrationRequest};
//!
//! let request = MigrationRequest::new("orders-v0", "orders-2026-01-01")
//!     .with_source("const info = await getOrderBuyerInfo(orderId);")
//!     .analysis_only(true);
//! let report = MigrationAssistant::new().run(&request).unwrap();
//! assert!(report.contains("getOrderBuyerInfo"));
//! ```

pub mod analysis;
pub mod analyzer;
pub mod generator;
pub mod knowledge;
pub mod report;

pub use analysis::{AttributeMapping, BreakingChange, CodeAnalysis, DeprecatedEndpoint};
pub use analyzer::{CodeAnalyzer, analyze};
pub use generator::{CodeGenerator, generate};
pub use knowledge::{Availability, MethodMapping, MigrationData, ORDERS_2026_01_01, ORDERS_V0};
pub use report::{
    ReportOptions, render_analysis_report, render_general_guidance, render_migration_report,
    render_migration_report_with,
};

use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{Error, Result};

/// Migration paths the assistant knows about, as (source, target) labels.
pub const SUPPORTED_PATHS: &[(&str, &str)] = &[(ORDERS_V0, ORDERS_2026_01_01)];

/// Returns the knowledge base for a migration path, if supported.
pub fn knowledge_for(source_version: &str, target_version: &str) -> Option<&'static MigrationData> {
    match (source_version, target_version) {
        (ORDERS_V0, ORDERS_2026_01_01) => Some(knowledge::orders_v0()),
        _ => None,
    }
}

/// Like [`knowledge_for`], but an unsupported path is an error listing the
/// supported ones.
pub fn require_knowledge(
    source_version: &str,
    target_version: &str,
) -> Result<&'static MigrationData> {
    knowledge_for(source_version, target_version).ok_or_else(|| Error::UnsupportedMigration {
        source_version: source_version.to_string(),
        target_version: target_version.to_string(),
        supported: SUPPORTED_PATHS
            .iter()
            .map(|(source, target)| format!("{source} → {target}"))
            .collect(),
    })
}

/// Arguments of one migration assistant invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationRequest {
    /// Code to analyze. Without it, general guidance is rendered.
    #[serde(default)]
    pub source_code: Option<String>,
    pub source_version: String,
    pub target_version: String,
    /// Language of the source, used to label the refactored code block.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub analysis_only: bool,
}

impl MigrationRequest {
    /// Create a request for general guidance on a migration path.
    pub fn new(source_version: impl Into<String>, target_version: impl Into<String>) -> Self {
        Self {
            source_code: None,
            source_version: source_version.into(),
            target_version: target_version.into(),
            language: None,
            analysis_only: false,
        }
    }

    /// Attach source code to analyze.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_code = Some(source.into());
        self
    }

    /// Set the source language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Stop after the analysis report.
    pub fn analysis_only(mut self, enabled: bool) -> Self {
        self.analysis_only = enabled;
        self
    }
}

/// Routes a request to guidance, analysis or full migration.
#[derive(Debug)]
pub struct MigrationAssistant {
    include_unsupported: bool,
}

impl Default for MigrationAssistant {
    fn default() -> Self {
        Self {
            include_unsupported: false,
        }
    }
}

impl MigrationAssistant {
    /// Create an assistant with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report attributes not yet in the target version as breaking
    /// changes. Off by default.
    pub fn include_unsupported(mut self, enabled: bool) -> Self {
        self.include_unsupported = enabled;
        self
    }

    /// Run the assistant and return the rendered document.
    #[instrument(skip(self, request), fields(
        source = %request.source_version,
        target = %request.target_version,
        analysis_only = request.analysis_only,
    ))]
    pub fn run(&self, request: &MigrationRequest) -> Result<String> {
        let data = require_knowledge(&request.source_version, &request.target_version)?;

        let source = match request.source_code.as_deref() {
            Some(source) if !source.trim().is_empty() => source,
            _ => {
                info!("Rendering general migration guidance");
                return Ok(render_general_guidance(data));
            }
        };

        let analysis = CodeAnalyzer::new(data)
            .include_unsupported(self.include_unsupported)
            .analyze(source);

        if request.analysis_only {
            info!("Rendering analysis report");
            return Ok(render_analysis_report(&analysis, data));
        }

        let refactored = generate(source, &analysis, &request.target_version)?;
        let options = ReportOptions {
            language: request.language.as_deref().unwrap_or("javascript"),
            original: Some(source),
        };
        info!("Rendering migration report");
        Ok(render_migration_report_with(&analysis, &refactored, data, &options))
    }
}
