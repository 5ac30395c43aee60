//! Text rendering of Orders API payloads.

use std::fmt::Write;

use serde_json::Value;

const RULE_WIDTH: usize = 50;

/// Borrow a string at a JSON pointer, if present.
fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Render any scalar at a JSON pointer, or `default`.
fn field(value: &Value, pointer: &str, default: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn money(value: &Value, pointer: &str) -> Option<String> {
    let amount = value.pointer(pointer)?;
    Some(format!(
        "{} {}",
        field(amount, "/amount", "?"),
        field(amount, "/currencyCode", "")
    )
    .trim_end()
    .to_string())
}

fn array<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Render a `searchOrders` response.
pub fn format_orders(data: &Value) -> String {
    let orders = array(data, "/orders");
    if orders.is_empty() {
        return "No orders found matching the criteria.".to_string();
    }

    let mut out = String::new();
    writeln!(out, "Found {} orders:", orders.len()).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH)).unwrap();
    writeln!(out).unwrap();

    for (idx, order) in orders.iter().enumerate() {
        writeln!(out, "**Order {}**", idx + 1).unwrap();
        writeln!(out, "Order ID: {}", field(order, "/orderId", "N/A")).unwrap();
        writeln!(out, "Created: {}", field(order, "/createdTime", "N/A")).unwrap();
        writeln!(
            out,
            "Status: {}",
            field(order, "/fulfillment/fulfillmentStatus", "Unknown")
        )
        .unwrap();
        writeln!(
            out,
            "Marketplace: {}",
            field(order, "/salesChannel/marketplaceName", "N/A")
        )
        .unwrap();

        if order.get("buyer").is_some() {
            writeln!(out, "Buyer: {}", field(order, "/buyer/buyerName", "N/A")).unwrap();
        }

        if let Some(addr) = order.pointer("/recipient/deliveryAddress") {
            writeln!(
                out,
                "Shipping: {}, {}, {} {}",
                field(addr, "/addressLine1", ""),
                field(addr, "/city", ""),
                field(addr, "/stateOrRegion", ""),
                field(addr, "/postalCode", "")
            )
            .unwrap();
        }

        let items = array(order, "/orderItems");
        if !items.is_empty() {
            writeln!(out, "Items: {} item(s)", items.len()).unwrap();
            for (item_idx, item) in items.iter().enumerate() {
                let price = money(item, "/product/price/unitPrice").unwrap_or_else(|| "N/A".into());
                writeln!(
                    out,
                    "  {}. {} (Qty: {}, Price: {})",
                    item_idx + 1,
                    field(item, "/product/title", "Unknown"),
                    field(item, "/quantityOrdered", "?"),
                    price
                )
                .unwrap();
            }
        }

        writeln!(out).unwrap();
        writeln!(out, "{}", "-".repeat(40)).unwrap();
        writeln!(out).unwrap();
    }

    if let Some(token) = text(data, "/pagination/nextToken") {
        writeln!(out, "**Next page available** - Use paginationToken: {token}").unwrap();
    }

    out
}

/// Render a `getOrder` response. Accepts either `{order: ...}` or the order
/// itself.
pub fn format_order(data: &Value) -> String {
    let order = data.get("order").unwrap_or(data);
    let mut out = String::new();

    writeln!(out, "**Order Details**").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH)).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "**Basic Information**").unwrap();
    writeln!(out, "Order ID: {}", field(order, "/orderId", "N/A")).unwrap();
    writeln!(out, "Created: {}", field(order, "/createdTime", "N/A")).unwrap();
    writeln!(out, "Last Updated: {}", field(order, "/lastUpdatedTime", "N/A")).unwrap();
    writeln!(
        out,
        "Marketplace: {}",
        field(order, "/salesChannel/marketplaceName", "N/A")
    )
    .unwrap();
    writeln!(
        out,
        "Channel: {}",
        field(order, "/salesChannel/channelName", "N/A")
    )
    .unwrap();

    let programs: Vec<&str> = array(order, "/programs")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    if !programs.is_empty() {
        writeln!(out, "Programs: {}", programs.join(", ")).unwrap();
    }

    if let Some(buyer) = order.get("buyer") {
        writeln!(out).unwrap();
        writeln!(out, "**Buyer Information**").unwrap();
        writeln!(out, "Name: {}", field(buyer, "/buyerName", "N/A")).unwrap();
        writeln!(out, "Email: {}", field(buyer, "/buyerEmail", "N/A")).unwrap();
        if let Some(company) = text(buyer, "/buyerCompanyName") {
            writeln!(out, "Company: {company}").unwrap();
        }
        if let Some(po) = text(buyer, "/buyerPurchaseOrderNumber") {
            writeln!(out, "PO Number: {po}").unwrap();
        }
    }

    if let Some(addr) = order.pointer("/recipient/deliveryAddress") {
        writeln!(out).unwrap();
        writeln!(out, "**Shipping Address**").unwrap();
        writeln!(out, "Name: {}", field(addr, "/name", "N/A")).unwrap();
        if let Some(company) = text(addr, "/companyName") {
            writeln!(out, "Company: {company}").unwrap();
        }
        writeln!(out, "Address: {}", field(addr, "/addressLine1", "")).unwrap();
        for line in ["/addressLine2", "/addressLine3"] {
            if let Some(extra) = text(addr, line) {
                writeln!(out, "         {extra}").unwrap();
            }
        }
        writeln!(out, "City: {}", field(addr, "/city", "N/A")).unwrap();
        writeln!(out, "State/Region: {}", field(addr, "/stateOrRegion", "N/A")).unwrap();
        writeln!(out, "Postal Code: {}", field(addr, "/postalCode", "N/A")).unwrap();
        writeln!(out, "Country: {}", field(addr, "/countryCode", "N/A")).unwrap();
        if let Some(phone) = text(addr, "/phone") {
            writeln!(out, "Phone: {phone}").unwrap();
        }
        writeln!(out, "Address Type: {}", field(addr, "/addressType", "N/A")).unwrap();
    }

    if let Some(fulfillment) = order.get("fulfillment") {
        writeln!(out).unwrap();
        writeln!(out, "**Fulfillment Information**").unwrap();
        writeln!(
            out,
            "Status: {}",
            field(fulfillment, "/fulfillmentStatus", "N/A")
        )
        .unwrap();
        writeln!(
            out,
            "Fulfilled By: {}",
            field(fulfillment, "/fulfilledBy", "N/A")
        )
        .unwrap();
        if let Some(level) = text(fulfillment, "/fulfillmentServiceLevel") {
            writeln!(out, "Service Level: {level}").unwrap();
        }
    }

    let items = array(order, "/orderItems");
    if !items.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "**Order Items ({})**", items.len()).unwrap();
        writeln!(out).unwrap();
        for (idx, item) in items.iter().enumerate() {
            writeln!(
                out,
                "**{}. {}**",
                idx + 1,
                field(item, "/product/title", "Unknown Product")
            )
            .unwrap();
            writeln!(out, "   Order Item ID: {}", field(item, "/orderItemId", "N/A")).unwrap();
            writeln!(out, "   ASIN: {}", field(item, "/product/asin", "N/A")).unwrap();
            writeln!(out, "   SKU: {}", field(item, "/product/sellerSku", "N/A")).unwrap();
            writeln!(
                out,
                "   Quantity Ordered: {}",
                field(item, "/quantityOrdered", "N/A")
            )
            .unwrap();
            if let Some(price) = money(item, "/product/price/unitPrice") {
                writeln!(out, "   Unit Price: {price}").unwrap();
            }
            if let Some(fulfillment) = item.get("fulfillment") {
                writeln!(
                    out,
                    "   Fulfilled: {}",
                    field(fulfillment, "/quantityFulfilled", "0")
                )
                .unwrap();
                writeln!(
                    out,
                    "   Unfulfilled: {}",
                    field(fulfillment, "/quantityUnfulfilled", "0")
                )
                .unwrap();
            }
            writeln!(out).unwrap();
        }
    }

    out
}

/// Render a legacy `getOrderRegulatedInfo` response.
pub fn format_regulated_info(data: &Value) -> String {
    // Legacy responses wrap the result in `payload`.
    let data = data.get("payload").unwrap_or(data);
    if data.is_null() {
        return "No regulated information found for this order.".to_string();
    }

    let mut out = String::new();
    writeln!(out, "**Regulated Order Information**").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH)).unwrap();
    writeln!(out).unwrap();

    if let Some(info) = data.get("regulatedInformation") {
        if let Some(status) = info.get("verificationStatus") {
            writeln!(out, "**Verification Status**").unwrap();
            writeln!(out, "Status: {}", field(status, "/status", "N/A")).unwrap();
            if let Some(until) = text(status, "/validUntil") {
                writeln!(out, "Valid Until: {until}").unwrap();
            }
            if let Some(reason) = text(status, "/rejectionReason/rejectionReasonDescription") {
                writeln!(out, "Rejection Reason: {reason}").unwrap();
            }
            writeln!(out).unwrap();
        }

        let items = array(info, "/regulatedOrderItems");
        if !items.is_empty() {
            writeln!(out, "**Regulated Items ({})**", items.len()).unwrap();
            writeln!(out).unwrap();
            for (idx, item) in items.iter().enumerate() {
                writeln!(out, "**{}. {}**", idx + 1, field(item, "/title", "Unknown Item")).unwrap();
                writeln!(out, "   Order Item ID: {}", field(item, "/orderItemId", "N/A")).unwrap();
                writeln!(out, "   ASIN: {}", field(item, "/asin", "N/A")).unwrap();
                writeln!(
                    out,
                    "   Quantity Ordered: {}",
                    field(item, "/quantityOrdered", "N/A")
                )
                .unwrap();
                if let Some(status) = text(item, "/verificationStatus/status") {
                    writeln!(out, "   Verification Status: {status}").unwrap();
                }
                if let Some(instructions) = item.get("fulfillmentInstructions") {
                    writeln!(out, "   Fulfillment Instructions:").unwrap();
                    if let Some(kind) = text(instructions, "/fulfillmentInstructionsType") {
                        writeln!(out, "      Type: {kind}").unwrap();
                    }
                    if let Some(body) = text(instructions, "/fulfillmentInstructionsText") {
                        writeln!(out, "      Text: {body}").unwrap();
                    }
                }
                writeln!(out).unwrap();
            }
        }
    }

    let errors = array(data, "/errors");
    if !errors.is_empty() {
        writeln!(out, "**Errors**").unwrap();
        for error in errors {
            writeln!(
                out,
                "- Code: {}, Message: {}",
                field(error, "/code", "N/A"),
                field(error, "/message", "N/A")
            )
            .unwrap();
        }
    }

    out
}

/// Render the acknowledgement of a write operation.
pub fn format_acknowledgement(summary: &str, response: &Value) -> String {
    if response.is_null() {
        return summary.to_string();
    }
    let pretty = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    format!("{summary}\n\nResponse: {pretty}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_search() {
        assert_eq!(
            format_orders(&json!({ "orders": [] })),
            "No orders found matching the criteria."
        );
        assert_eq!(format_orders(&Value::Null), "No orders found matching the criteria.");
    }

    #[test]
    fn test_search_listing() {
        let data = json!({
            "orders": [{
                "orderId": "111-2222222-3333333",
                "createdTime": "2025-10-01T12:00:00Z",
                "fulfillment": { "fulfillmentStatus": "UNSHIPPED" },
                "salesChannel": { "marketplaceName": "Amazon.com" },
                "orderItems": [{
                    "quantityOrdered": 2,
                    "product": {
                        "title": "Widget",
                        "price": { "unitPrice": { "amount": "9.99", "currencyCode": "USD" } }
                    }
                }]
            }],
            "pagination": { "nextToken": "abc" }
        });
        let out = format_orders(&data);

        assert!(out.starts_with("Found 1 orders:"));
        assert!(out.contains("Order ID: 111-2222222-3333333"));
        assert!(out.contains("Status: UNSHIPPED"));
        assert!(out.contains("  1. Widget (Qty: 2, Price: 9.99 USD)"));
        assert!(out.contains("Use paginationToken: abc"));
    }

    #[test]
    fn test_order_detail() {
        let data = json!({
            "order": {
                "orderId": "111",
                "programs": ["PRIME", "AMAZON_BUSINESS"],
                "buyer": { "buyerName": "Ada", "buyerCompanyName": "Analytical Engines" },
                "recipient": { "deliveryAddress": { "city": "Seattle", "addressLine2": "Suite 5" } }
            }
        });
        let out = format_order(&data);

        assert!(out.contains("Order ID: 111"));
        assert!(out.contains("Programs: PRIME, AMAZON_BUSINESS"));
        assert!(out.contains("Company: Analytical Engines"));
        assert!(out.contains("Email: N/A"));
        assert!(out.contains("         Suite 5"));
        assert!(out.contains("City: Seattle"));
        assert!(!out.contains("Fulfillment Information"));
    }

    #[test]
    fn test_regulated_info() {
        let data = json!({
            "payload": {
                "regulatedInformation": {
                    "verificationStatus": { "status": "Pending" },
                    "regulatedOrderItems": [{ "title": "Contacts", "asin": "B0", "quantityOrdered": 1 }]
                }
            }
        });
        let out = format_regulated_info(&data);
        assert!(out.contains("Status: Pending"));
        assert!(out.contains("**1. Contacts**"));
        assert_eq!(
            format_regulated_info(&Value::Null),
            "No regulated information found for this order."
        );
    }

    #[test]
    fn test_acknowledgement() {
        assert_eq!(format_acknowledgement("Done.", &Value::Null), "Done.");
        let out = format_acknowledgement("Done.", &json!({ "ok": true }));
        assert_eq!(out, "Done.\n\nResponse: {\n  \"ok\": true\n}");
    }
}
