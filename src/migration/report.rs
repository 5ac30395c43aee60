//! Human-readable rendering of guidance, analyses and migrations.

use std::fmt::Write;

use crate::diff::ChangeSummary;

use super::analysis::CodeAnalysis;
use super::knowledge::{Availability, MigrationData};

/// Attribute mappings highlighted in the general guidance.
const HIGHLIGHTED_MAPPINGS: &[&str] = &[
    "AmazonOrderId",
    "OrderStatus",
    "IsPrime",
    "IsBusinessOrder",
    "OrderTotal",
    "ShippingAddress",
    "BuyerInfo.BuyerEmail",
    "QuantityShipped",
];

/// Number of items shown in a preview list before truncating.
const PREVIEW_LEN: usize = 5;

const CHECKLIST: &[&str] = &[
    "Review API method availability and plan a v0 fallback for unsupported operations",
    "Update attribute references to the new nested structure",
    "Replace boolean flags with `programs` array checks",
    "Add the `includedData` parameter where needed (BUYER, RECIPIENT, etc.)",
    "Update endpoint URLs from `/orders/v0/` to `/orders/2026-01-01/`",
    "Update error handling for new response formats",
    "Test with the sandbox environment before production",
    "Update client types and interfaces",
    "Monitor for v0 API deprecation announcements",
];

const TESTING_RECOMMENDATIONS: &[(&str, &str)] = &[
    ("Unit Tests", "Update test cases to match the new response structure"),
    ("Integration Tests", "Test against the SP-API sandbox environment"),
    ("Error Handling", "Verify error responses match the new format"),
    (
        "Performance",
        "Monitor API response times and adjust `includedData` usage",
    ),
    (
        "Backward Compatibility",
        "Ensure the v0 fallback works for unsupported operations",
    ),
];

const REFERENCE_DOCS: &str = "https://developer-docs.amazon.com/sp-api/docs/orders-api-v1-reference";
const MIGRATION_GUIDE_DOCS: &str =
    "https://developer-docs.amazon.com/sp-api/docs/orders-api-v0-to-v1-migration-guide";
const DEVELOPER_GUIDE_DOCS: &str = "https://developer-docs.amazon.com/sp-api/";

/// Presentation options for the full migration report.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    /// Fence language for the refactored code block.
    pub language: &'a str,
    /// Original source, used to summarize line changes.
    pub original: Option<&'a str>,
}

impl Default for ReportOptions<'_> {
    fn default() -> Self {
        Self {
            language: "javascript",
            original: None,
        }
    }
}

/// Render the general migration guide, used when no source code is given.
pub fn render_general_guidance(data: &MigrationData) -> String {
    let mut out = String::new();

    writeln!(out, "# Orders API Migration Guide: v0 → 2026-01-01").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Overview").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "This guide helps you migrate from Orders API v0 to the 2026-01-01 version."
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "**Key Changes:**").unwrap();
    writeln!(out, "- New nested data structure (buyer, recipient, fulfillment, etc.)").unwrap();
    writeln!(out, "- Enhanced data sets with the `includedData` parameter").unwrap();
    writeln!(out, "- A `programs` array replaces boolean flags").unwrap();
    writeln!(out, "- Financial breakdowns with proceeds and expense tracking").unwrap();
    writeln!(out, "- Some v0 operations have no counterpart and stay on v0").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "## API Method Mapping").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "### Available in 2026-01-01").unwrap();
    writeln!(out).unwrap();
    for (method, mapping) in data.methods_with(Availability::Available) {
        writeln!(out, "- **{method}** → {}", mapping.target).unwrap();
        writeln!(out, "  {}", mapping.notes).unwrap();
        writeln!(out).unwrap();
    }
    writeln!(out, "### Not Available (continue using v0)").unwrap();
    writeln!(out).unwrap();
    for (method, mapping) in data.methods_with(Availability::Unavailable) {
        writeln!(out, "- **{method}**").unwrap();
        writeln!(out, "  {}", mapping.notes).unwrap();
        writeln!(out).unwrap();
    }

    writeln!(out, "## Key Attribute Mappings").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Common v0 attributes and their new equivalents:").unwrap();
    writeln!(out).unwrap();
    for source in HIGHLIGHTED_MAPPINGS {
        if let Some(target) = data.attribute_target(source) {
            writeln!(out, "- `{source}` → `{target}`").unwrap();
        }
    }
    writeln!(out).unwrap();
    writeln!(
        out,
        "[View complete mapping list for all {} attributes]",
        data.attribute_mapping.len()
    )
    .unwrap();
    writeln!(out).unwrap();

    writeln!(out, "## Breaking Changes").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "### Deprecated Attributes ({})",
        data.deprecated_attributes.len()
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "These attributes are removed with no replacement:").unwrap();
    writeln!(out).unwrap();
    write_preview(&mut out, &data.deprecated_attributes);
    writeln!(
        out,
        "### Not Supported Attributes ({})",
        data.unsupported_attributes.len()
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "These attributes are not available in the current release:").unwrap();
    writeln!(out).unwrap();
    write_preview(&mut out, &data.unsupported_attributes);

    writeln!(out, "## New Features").unwrap();
    writeln!(out).unwrap();
    for capability in &data.new_capabilities {
        writeln!(out, "- {capability}").unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "## Code Examples").unwrap();
    writeln!(out).unwrap();
    write_example(
        &mut out,
        "Checking Prime Orders",
        "if (order.IsPrime) {\n  // handle prime order\n}",
        "if (order.programs?.includes('PRIME')) {\n  // handle prime order\n}",
    );
    write_example(
        &mut out,
        "Getting Order Status",
        "const status = order.OrderStatus;",
        "const status = order.fulfillment.fulfillmentStatus;",
    );
    writeln!(out, "### Searching Orders").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "```javascript").unwrap();
    writeln!(out, "const response = await fetch(").unwrap();
    writeln!(
        out,
        "  'https://sellingpartnerapi-na.amazon.com/orders/2026-01-01/orders?' +"
    )
    .unwrap();
    writeln!(out, "  new URLSearchParams({{").unwrap();
    writeln!(out, "    createdAfter: '2025-12-01T00:00:00Z',").unwrap();
    writeln!(out, "    marketplaceIds: 'ATVPDKIKX0DER',").unwrap();
    writeln!(out, "    includedData: 'BUYER,RECIPIENT,FULFILLMENT'").unwrap();
    writeln!(out, "  }}),").unwrap();
    writeln!(out, "  {{ headers: {{ 'x-amz-access-token': accessToken }} }}").unwrap();
    writeln!(out, ");").unwrap();
    writeln!(out, "```").unwrap();
    writeln!(out).unwrap();

    write_checklist(&mut out);

    writeln!(out, "## Resources").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "- [SP-API Orders Documentation]({REFERENCE_DOCS})").unwrap();
    writeln!(out, "- [Migration Guide]({MIGRATION_GUIDE_DOCS})").unwrap();
    writeln!(out, "- [SP-API Developer Guide]({DEVELOPER_GUIDE_DOCS})").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "## Need More Help?").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "- **Code Analysis:** Provide your source code for detailed analysis and automated refactoring"
    )
    .unwrap();
    writeln!(
        out,
        "- **Specific Attributes:** Ask about specific v0 attributes for detailed mapping"
    )
    .unwrap();
    writeln!(
        out,
        "- **API Methods:** Ask about specific v0 methods for migration guidance"
    )
    .unwrap();

    out
}

/// Render the findings of one analysis run.
pub fn render_analysis_report(analysis: &CodeAnalysis, data: &MigrationData) -> String {
    let mut out = String::new();

    writeln!(out, "# Migration Analysis Report").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Summary").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "- **API Calls Found:** {}", analysis.method_names.len()).unwrap();
    writeln!(
        out,
        "- **Attributes to Update:** {}",
        analysis.attribute_mappings.len()
    )
    .unwrap();
    writeln!(
        out,
        "- **Breaking Changes:** {}",
        analysis.breaking_changes.len()
    )
    .unwrap();
    writeln!(
        out,
        "- **Deprecated Endpoints:** {}",
        analysis.deprecated_endpoints.len()
    )
    .unwrap();
    writeln!(out).unwrap();

    if !analysis.deprecated_endpoints.is_empty() {
        writeln!(out, "## Deprecated Endpoints").unwrap();
        writeln!(out).unwrap();
        for endpoint in &analysis.deprecated_endpoints {
            writeln!(out, "- **{}** → {}", endpoint.method, endpoint.replacement).unwrap();
        }
        writeln!(out).unwrap();
    }

    if !analysis.breaking_changes.is_empty() {
        writeln!(out, "## Breaking Changes").unwrap();
        writeln!(out).unwrap();
        for (idx, change) in analysis.breaking_changes.iter().enumerate() {
            writeln!(out, "{}. **{}**", idx + 1, change.change).unwrap();
            writeln!(out, "   {}", change.explanation).unwrap();
            writeln!(out).unwrap();
        }
    }

    if !analysis.attribute_mappings.is_empty() {
        writeln!(out, "## Attribute Mappings").unwrap();
        writeln!(out).unwrap();
        for mapping in &analysis.attribute_mappings {
            writeln!(out, "- `{}` → `{}`", mapping.source, mapping.target).unwrap();
        }
        writeln!(out).unwrap();
    }

    if !analysis.method_names.is_empty() {
        writeln!(out, "## API Methods Detected").unwrap();
        writeln!(out).unwrap();
        for method in &analysis.method_names {
            let status = data
                .method(method)
                .map(|m| m.availability.label())
                .unwrap_or("Unknown");
            writeln!(out, "- **{method}** - {status}").unwrap();
        }
        writeln!(out).unwrap();
    }

    write_checklist(&mut out);

    out
}

/// Render the analysis report followed by the refactored code.
pub fn render_migration_report(
    analysis: &CodeAnalysis,
    refactored: &str,
    data: &MigrationData,
) -> String {
    render_migration_report_with(analysis, refactored, data, &ReportOptions::default())
}

/// Like [`render_migration_report`], with explicit presentation options.
pub fn render_migration_report_with(
    analysis: &CodeAnalysis,
    refactored: &str,
    data: &MigrationData,
    options: &ReportOptions<'_>,
) -> String {
    let mut out = render_analysis_report(analysis, data);

    writeln!(out).unwrap();
    writeln!(out, "---").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Refactored Code").unwrap();
    writeln!(out).unwrap();
    if let Some(original) = options.original {
        writeln!(
            out,
            "**Change Summary:** {}",
            ChangeSummary::between(original, refactored)
        )
        .unwrap();
        writeln!(out).unwrap();
    }
    writeln!(out, "```{}", options.language).unwrap();
    writeln!(out, "{}", refactored.trim_end_matches('\n')).unwrap();
    writeln!(out, "```").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "## Testing Recommendations").unwrap();
    writeln!(out).unwrap();
    for (idx, (title, detail)) in TESTING_RECOMMENDATIONS.iter().enumerate() {
        writeln!(out, "{}. **{title}:** {detail}", idx + 1).unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "## Additional Resources").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "- [SP-API Orders Documentation]({REFERENCE_DOCS})").unwrap();
    writeln!(out, "- [Migration Guide]({MIGRATION_GUIDE_DOCS})").unwrap();
    writeln!(
        out,
        "- Call `migration_assistant` without source code for the full attribute mapping guide"
    )
    .unwrap();

    out
}

fn write_preview(out: &mut String, items: &[String]) {
    for item in items.iter().take(PREVIEW_LEN) {
        writeln!(out, "- {item}").unwrap();
    }
    if items.len() > PREVIEW_LEN {
        writeln!(out, "- ... and {} more", items.len() - PREVIEW_LEN).unwrap();
    }
    writeln!(out).unwrap();
}

fn write_example(out: &mut String, title: &str, before: &str, after: &str) {
    writeln!(out, "### {title}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "**v0:**").unwrap();
    writeln!(out, "```javascript\n{before}\n```").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "**2026-01-01:**").unwrap();
    writeln!(out, "```javascript\n{after}\n```").unwrap();
    writeln!(out).unwrap();
}

fn write_checklist(out: &mut String) {
    writeln!(out, "## Migration Checklist").unwrap();
    writeln!(out).unwrap();
    for item in CHECKLIST {
        writeln!(out, "- [ ] {item}").unwrap();
    }
    writeln!(out).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::analyzer::analyze;
    use crate::migration::knowledge::orders_v0;

    #[test]
    fn test_guidance_lists_both_availabilities() {
        let guide = render_general_guidance(orders_v0());

        assert!(guide.contains("Migration Guide"));
        assert!(guide.contains("## API Method Mapping"));
        assert!(guide.contains("Key Attribute Mappings"));
        assert!(guide.contains("- **getOrders** → search_orders (with filters)"));
        assert!(guide.contains("- **confirmShipment**\n"));
        assert!(guide.contains("- `IsPrime` → `Order.programs (check for PRIME)`"));
        assert!(guide.contains(&format!(
            "[View complete mapping list for all {} attributes]",
            orders_v0().attribute_mapping.len()
        )));
    }

    #[test]
    fn test_guidance_truncates_previews() {
        let guide = render_general_guidance(orders_v0());
        assert!(guide.contains("### Deprecated Attributes (8)"));
        assert!(guide.contains("- ... and 3 more"));
        assert!(guide.contains("- ... and 27 more"));
        assert!(guide.contains("- PromiseResponseDueDate\n"));
        assert!(!guide.contains("- IsEstimatedShipDateSet"));
    }

    #[test]
    fn test_preview_of_short_list_is_not_truncated() {
        let mut out = String::new();
        write_preview(&mut out, &["a".to_string(), "b".to_string()]);
        assert_eq!(out, "- a\n- b\n\n");
    }

    #[test]
    fn test_analysis_report_sections() {
        let analysis = analyze("getOrderBuyerInfo(orderId); order.IsPrime;", orders_v0());
        let report = render_analysis_report(&analysis, orders_v0());

        assert!(report.starts_with("# Migration Analysis Report\n"));
        assert!(report.contains("- **Deprecated Endpoints:** 1"));
        assert!(report.contains("1. **getOrderBuyerInfo has no replacement in the target version**"));
        assert!(report.contains("- **getOrderBuyerInfo** - ❌ Not Available"));
        assert!(report.contains("- `IsPrime` → `Order.programs (check for PRIME)`"));
        assert!(report.contains("## Migration Checklist"));
        assert!(!report.contains("Refactored Code"));
    }

    #[test]
    fn test_empty_analysis_omits_sections() {
        let report = render_analysis_report(&CodeAnalysis::default(), orders_v0());
        assert!(report.contains("- **API Calls Found:** 0"));
        assert!(!report.contains("## Deprecated Endpoints"));
        assert!(!report.contains("## API Methods Detected"));
    }

    #[test]
    fn test_migration_report_fence_and_summary() {
        let analysis = CodeAnalysis::default();
        let options = ReportOptions {
            language: "typescript",
            original: Some("a\n"),
        };
        let report = render_migration_report_with(&analysis, "header\na\n", orders_v0(), &options);

        assert!(report.contains("## Refactored Code"));
        assert!(report.contains("```typescript\nheader\na\n```"));
        assert!(report.contains("**Change Summary:** 1 line(s) added, 0 line(s) removed"));
        assert!(report.contains("5. **Backward Compatibility:**"));

        let default = render_migration_report(&analysis, "x", orders_v0());
        assert!(default.contains("```javascript\nx\n```"));
        assert!(!default.contains("Change Summary"));
    }
}
