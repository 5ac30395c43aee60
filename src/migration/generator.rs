//! Best-effort rewriting of legacy source text.
//!
//! The rewrite is an ordered [`TransformBuilder`] pipeline. Later steps see
//! the output of earlier ones, so the order below is part of the contract:
//!
//! 1. attribute paths found by the analyzer are replaced by their targets
//! 2. the fixed method rename table is applied unconditionally
//! 3. calls with no target equivalent are annotated in place
//! 4. the legacy URL prefix is rewritten
//! 5. a summary header is prepended

use tracing::debug;

use crate::error::Result;
use crate::transform::TransformBuilder;

use super::analysis::CodeAnalysis;

/// Legacy URL path prefix.
pub const LEGACY_PATH_PREFIX: &str = "/orders/v0/";

/// Dated URL path prefix replacing [`LEGACY_PATH_PREFIX`].
pub const DATED_PATH_PREFIX: &str = "/orders/2026-01-01/";

/// Legacy accessors that collapse onto a unified target method.
const METHOD_RENAMES: &[(&str, &str)] = &[
    ("getOrders", "searchOrders"),
    ("getOrderAddress", "getOrder"),
    ("getOrderItems", "getOrder"),
    ("getOrderItemsBuyerInfo", "getOrder"),
];

/// Builds the rewrite pipeline for one analysis.
pub struct CodeGenerator<'a> {
    analysis: &'a CodeAnalysis,
    target_version: String,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator for the given analysis and target version label.
    pub fn new(analysis: &'a CodeAnalysis, target_version: impl Into<String>) -> Self {
        Self {
            analysis,
            target_version: target_version.into(),
        }
    }

    /// Build the ordered transform pipeline.
    pub fn pipeline(&self) -> Result<TransformBuilder> {
        let mut builder = TransformBuilder::new();

        // Longer paths first so a nested path is not clobbered by its parent.
        let mut mappings: Vec<_> = self.analysis.attribute_mappings.iter().collect();
        mappings.sort_by(|a, b| b.source.len().cmp(&a.source.len()));
        for mapping in mappings {
            builder = builder.replace_word(&mapping.source, mapping.target.as_str())?;
        }

        for (old, new) in METHOD_RENAMES {
            builder = builder.replace_word(old, *new)?;
        }

        for endpoint in &self.analysis.deprecated_endpoints {
            if endpoint.has_equivalent() {
                continue;
            }
            let annotated = format!(
                "{} /* Continue using the legacy v0 path - no {} equivalent */",
                endpoint.method, self.target_version
            );
            builder = builder.replace_word(&endpoint.method, annotated)?;
        }

        builder = builder.replace_literal(LEGACY_PATH_PREFIX, DATED_PATH_PREFIX);

        Ok(builder.prepend(self.header()))
    }

    /// Apply the pipeline to `source`.
    pub fn generate(&self, source: &str) -> Result<String> {
        let pipeline = self.pipeline()?;
        debug!(steps = pipeline.len(), "Generating refactored code");
        pipeline.apply(source)
    }

    fn header(&self) -> String {
        format!(
            "/*\n \
             * Migrated to Orders API {target}\n \
             * - Attributes updated: {attrs}\n \
             * - Methods analyzed: {methods}\n \
             * - Breaking changes found: {breaking}\n \
             *\n \
             * Some legacy endpoints have no {target} equivalent and must keep\n \
             * using the v0 path. Review every change before deploying.\n \
             */\n\n",
            target = self.target_version,
            attrs = self.analysis.attribute_mappings.len(),
            methods = self.analysis.method_names.len(),
            breaking = self.analysis.breaking_changes.len(),
        )
    }
}

/// Rewrite `source` using `analysis`, targeting `target_version`.
pub fn generate(source: &str, analysis: &CodeAnalysis, target_version: &str) -> Result<String> {
    CodeGenerator::new(analysis, target_version).generate(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::analyzer::analyze;
    use crate::migration::knowledge::{ORDERS_2026_01_01, orders_v0};

    fn body(generated: &str) -> &str {
        let end = generated.find("*/\n\n").unwrap();
        &generated[end + 4..]
    }

    #[test]
    fn test_header_counts() {
        let source = "order.OrderStatus; getOrderBuyerInfo(id);";
        let analysis = analyze(source, orders_v0());
        let out = generate(source, &analysis, ORDERS_2026_01_01).unwrap();

        assert!(out.starts_with("/*\n * Migrated to Orders API orders-2026-01-01\n"));
        assert!(out.contains(" * - Attributes updated: 1\n"));
        assert!(out.contains(" * - Methods analyzed: 1\n"));
        assert!(out.contains(" * - Breaking changes found: 1\n"));
    }

    #[test]
    fn test_unavailable_call_is_annotated() {
        let source = "const info = await getOrderBuyerInfo(orderId);";
        let analysis = analyze(source, orders_v0());
        let out = generate(source, &analysis, ORDERS_2026_01_01).unwrap();

        assert_eq!(
            body(&out),
            "const info = await getOrderBuyerInfo /* Continue using the legacy v0 path - no orders-2026-01-01 equivalent */(orderId);"
        );
    }

    #[test]
    fn test_renames_are_unconditional() {
        let analysis = CodeAnalysis::default();
        let out = generate("getOrders(); getOrderItems(id);", &analysis, ORDERS_2026_01_01).unwrap();
        assert_eq!(body(&out), "searchOrders(); getOrder(id);");
    }

    #[test]
    fn test_attribute_replacement_is_word_bounded() {
        let source = "a = o.OrderStatus; b = o.OrderStatusText;";
        let analysis = analyze(source, orders_v0());
        let out = generate(source, &analysis, ORDERS_2026_01_01).unwrap();
        assert_eq!(
            body(&out),
            "a = o.Order.fulfillment.fulfillmentStatus; b = o.OrderStatusText;"
        );
    }

    #[test]
    fn test_nested_path_wins_over_parent() {
        let source = "u = i.ItemBuyerInfo.BuyerCustomizedInfo.CustomizedURL;";
        let analysis = analyze(source, orders_v0());
        let out = generate(source, &analysis, ORDERS_2026_01_01).unwrap();
        assert_eq!(
            body(&out),
            "u = i.Order.orderItems.product.customization.customizedUrl;"
        );
    }

    #[test]
    fn test_no_signals_only_adds_header_and_path_rewrite() {
        let source = "fetch(`${host}/orders/v0/orders/${id}`);\nconsole.log('done');\n";
        let analysis = analyze(source, orders_v0());
        assert!(analysis.is_empty());

        let out = generate(source, &analysis, ORDERS_2026_01_01).unwrap();
        assert_eq!(
            body(&out),
            "fetch(`${host}/orders/2026-01-01/orders/${id}`);\nconsole.log('done');\n"
        );
    }

    #[test]
    fn test_pipeline_order() {
        let analysis = analyze("getOrderRegulatedInfo(id)", orders_v0());
        let steps = CodeGenerator::new(&analysis, ORDERS_2026_01_01)
            .pipeline()
            .unwrap()
            .describe();

        assert_eq!(steps.len(), METHOD_RENAMES.len() + 3);
        assert!(steps[0].starts_with("Replace word 'getOrders'"));
        assert!(steps[4].starts_with("Replace word 'getOrderRegulatedInfo'"));
        assert!(steps[5].starts_with("Replace literal '/orders/v0/'"));
        assert!(steps[6].starts_with("Prepend"));
    }
}
