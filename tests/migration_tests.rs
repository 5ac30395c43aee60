//! End-to-end tests for the migration assistant pipeline.

use pretty_assertions::assert_eq;
use sp_orders_mcp::error::Error;
use sp_orders_mcp::migration::knowledge::{NO_COUNTERPART, orders_v0};
use sp_orders_mcp::prelude::*;

const BUYER_INFO_SOURCE: &str = "\
async function loadBuyer(orderId) {
  const info = await getOrderBuyerInfo(orderId);
  return info;
}
";

fn run(request: MigrationRequest) -> String {
    MigrationAssistant::new().run(&request).unwrap()
}

#[test]
fn test_guidance_lists_both_method_groups() {
    let guide = run(MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01));

    assert!(guide.contains("## API Method Mapping"));
    assert!(guide.contains("### Available in 2026-01-01"));
    assert!(guide.contains("### Not Available (continue using v0)"));
    assert!(guide.contains("- **getOrders** →"));
    assert!(guide.contains("- **getOrderBuyerInfo**"));
    assert!(!guide.contains("# Migration Analysis Report"));
}

#[test]
fn test_analysis_only_names_unavailable_method() {
    let report = run(
        MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01)
            .with_source(BUYER_INFO_SOURCE)
            .analysis_only(true),
    );

    assert!(report.starts_with("# Migration Analysis Report"));
    assert!(report.contains(&format!("- **getOrderBuyerInfo** → {NO_COUNTERPART}")));
    assert!(report.contains("- **getOrderBuyerInfo** - ❌ Not Available"));
    assert!(report.contains("## Migration Checklist"));
    assert!(!report.contains("## Refactored Code"));
    assert!(!report.contains("```"));
}

#[test]
fn test_full_migration_annotates_legacy_call() {
    let report = run(
        MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01).with_source(BUYER_INFO_SOURCE),
    );

    assert!(report.starts_with("# Migration Analysis Report"));
    assert!(report.contains("## Refactored Code"));
    assert!(report.contains("```javascript"));
    assert!(report.contains(
        "getOrderBuyerInfo /* Continue using the legacy v0 path - no orders-2026-01-01 equivalent */(orderId)"
    ));
    assert!(report.contains("**Change Summary:**"));
}

#[test]
fn test_language_labels_code_block() {
    let report = run(
        MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01)
            .with_source("orders = client.getOrders(CreatedAfter=since)")
            .with_language("python"),
    );
    assert!(report.contains("```python"));
    assert!(report.contains("client.searchOrders("));
}

#[test]
fn test_unsupported_pair_is_rejected() {
    let err = MigrationAssistant::new()
        .run(&MigrationRequest::new("orders-v1", "orders-v2").with_source(BUYER_INFO_SOURCE))
        .unwrap_err();

    assert!(err.is_precondition());
    let message = err.to_string();
    assert!(message.starts_with("Unsupported migration path: orders-v1 → orders-v2\n"));
    assert!(message.contains("Supported migrations:\n- orders-v0 → orders-2026-01-01"));
    match err {
        Error::UnsupportedMigration { supported, .. } => {
            assert_eq!(supported, vec!["orders-v0 → orders-2026-01-01".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unsupported_attributes_are_not_breaking_by_default() {
    let source = "const m = order.PaymentMethod;";
    let analysis = analyze(source, orders_v0());
    assert!(analysis.breaking_changes.is_empty());

    let migrated = generate(source, &analysis, ORDERS_2026_01_01).unwrap();
    assert!(migrated.contains(" * - Breaking changes found: 0\n"));

    let report = run(
        MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01)
            .with_source(source)
            .analysis_only(true),
    );
    assert!(!report.contains("Unsupported attribute"));

    let opted_in = MigrationAssistant::new()
        .include_unsupported(true)
        .run(
            &MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01)
                .with_source(source)
                .analysis_only(true),
        )
        .unwrap();
    assert!(opted_in.contains("Unsupported attribute: PaymentMethod"));
}

#[test]
fn test_every_unavailable_method_is_flagged_once() {
    let data = orders_v0();
    for (method, _) in data.methods_with(Availability::Unavailable) {
        let source = format!("const result = await api.{method}(orderId);");
        let analysis = analyze(&source, data);

        let endpoints: Vec<_> = analysis
            .deprecated_endpoints
            .iter()
            .filter(|e| e.method == method)
            .collect();
        assert_eq!(endpoints.len(), 1, "{method}");
        assert!(
            analysis
                .breaking_changes
                .iter()
                .any(|c| c.change.starts_with(method)),
            "{method}"
        );
    }
}

#[test]
fn test_every_mapping_is_found_and_rewritten() {
    let data = orders_v0();
    for (source_path, target_path) in &data.attribute_mapping {
        let source = format!("const v = order.{source_path};\nconst w = x{source_path}y;\n");
        let analysis = analyze(&source, data);

        assert!(
            analysis
                .attribute_mappings
                .iter()
                .any(|m| &m.source == source_path && &m.target == target_path),
            "{source_path}"
        );

        let migrated = generate(&source, &analysis, ORDERS_2026_01_01).unwrap();
        assert!(
            !migrated.contains(&format!("order.{source_path};")),
            "{source_path} left in place"
        );
        assert!(
            migrated.contains(&format!("x{source_path}y")),
            "{source_path} rewritten inside a longer identifier"
        );
    }
}

#[test]
fn test_nested_path_rewritten_before_parent() {
    let data = orders_v0();
    let source = "const url = item.ItemBuyerInfo.BuyerCustomizedInfo.CustomizedURL;";
    let analysis = analyze(source, data);
    let migrated = generate(source, &analysis, ORDERS_2026_01_01).unwrap();

    let expected = data
        .attribute_target("ItemBuyerInfo.BuyerCustomizedInfo.CustomizedURL")
        .unwrap();
    assert!(migrated.contains(&format!("item.{expected};")));
}

#[test]
fn test_analysis_is_order_stable() {
    let data = orders_v0();
    let source = "getOrderItems(id); order.OrderStatus; order.IsPrime; getOrderBuyerInfo(id);";
    let first = analyze(source, data);
    let second = analyze(source, data);
    assert_eq!(first, second);
    // Table order, not source order
    assert_eq!(first.method_names, vec!["getOrderBuyerInfo", "getOrderItems"]);
    assert_eq!(
        first
            .attribute_mappings
            .iter()
            .map(|m| m.source.as_str())
            .collect::<Vec<_>>(),
        vec!["OrderStatus", "IsPrime"]
    );
}

#[test]
fn test_no_signals_only_adds_header_and_path() {
    let source = "fetch(`${host}/orders/v0/orders/${id}`).then(render);\n";
    let analysis = analyze(source, orders_v0());
    assert_eq!(analysis, CodeAnalysis::default());

    let migrated = generate(source, &analysis, ORDERS_2026_01_01).unwrap();
    assert!(migrated.starts_with("/*\n * Migrated to Orders API orders-2026-01-01\n"));
    assert!(migrated.ends_with("*/\n\nfetch(`${host}/orders/2026-01-01/orders/${id}`).then(render);\n"));
}

#[test]
fn test_renames_are_whole_word() {
    let source = "getOrders(); getOrdersCount(); myGetOrderItems(); getOrderItems();";
    let analysis = analyze(source, orders_v0());
    let migrated = generate(source, &analysis, ORDERS_2026_01_01).unwrap();

    assert!(migrated.contains("searchOrders(); getOrdersCount(); myGetOrderItems(); getOrder();"));
}
