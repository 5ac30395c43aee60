//! Orders API tools.
//!
//! Every tool checks credentials before looking at its arguments, so an
//! unconfigured server always answers with setup instructions.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mcp::context::ServerContext;
use crate::mcp::protocol::{InputSchema, ToolDefinition};
use crate::mcp::tools::{Tool, parse_args};
use crate::orders::format::{
    format_acknowledgement, format_order, format_orders, format_regulated_info,
};
use crate::orders::{
    CancelOrderArgs, ConfirmShipmentArgs, GetOrderArgs, GetOrderRegulatedInfoArgs, OrdersApi,
    SearchOrdersArgs, UpdateShipmentStatusArgs, UpdateVerificationStatusArgs,
};

const INCLUDED_DATA: [&str; 8] = [
    "BUYER",
    "RECIPIENT",
    "PROCEEDS",
    "EXPENSE",
    "PROMOTION",
    "CANCELLATION",
    "FULFILLMENT",
    "PACKAGES",
];

fn order_id_schema() -> Value {
    json!({ "type": "string", "description": "Amazon order identifier (e.g. 902-1845936-5435065)" })
}

fn marketplace_id_schema() -> Value {
    json!({ "type": "string", "description": "Marketplace identifier (default ATVPDKIKX0DER)" })
}

fn included_data_schema() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string", "enum": INCLUDED_DATA },
        "description": "Additional data sets to include in the response"
    })
}

pub struct SearchOrders;

#[async_trait]
impl Tool for SearchOrders {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_orders".into(),
            description: "Search orders with various filters and include specific data sets. \
                          Use this to get orders by date, status, marketplace, etc."
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "createdAfter": { "type": "string", "description": "ISO 8601 lower bound on creation time" },
                    "createdBefore": { "type": "string", "description": "ISO 8601 upper bound on creation time" },
                    "lastUpdatedAfter": { "type": "string", "description": "ISO 8601 lower bound on last update" },
                    "lastUpdatedBefore": { "type": "string", "description": "ISO 8601 upper bound on last update" },
                    "fulfillmentStatuses": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["PENDING", "UNSHIPPED", "PARTIALLY_SHIPPED", "SHIPPED", "CANCELLED", "UNFULFILLABLE"]
                        }
                    },
                    "marketplaceIds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Marketplaces to search (default [\"ATVPDKIKX0DER\"])"
                    },
                    "fulfilledBy": {
                        "type": "array",
                        "items": { "type": "string", "enum": ["AMAZON", "MERCHANT"] }
                    },
                    "maxResultsPerPage": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 100,
                        "description": "Page size (default 50)"
                    },
                    "includedData": included_data_schema(),
                    "paginationToken": { "type": "string", "description": "Token from a previous page" }
                }),
                &[],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error searching orders"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: SearchOrdersArgs = parse_args(params)?;
        let response = OrdersApi::new(&client).search_orders(&args).await?;
        Ok(format_orders(&response))
    }
}

pub struct GetOrder;

#[async_trait]
impl Tool for GetOrder {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_order".into(),
            description: "Get detailed information for a specific order by order ID".into(),
            input_schema: InputSchema::object(
                json!({
                    "orderId": order_id_schema(),
                    "includedData": included_data_schema()
                }),
                &["orderId"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error getting order"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: GetOrderArgs = parse_args(params)?;
        let response = OrdersApi::new(&client).get_order(&args).await?;
        Ok(format_order(&response))
    }
}

pub struct CancelOrder;

#[async_trait]
impl Tool for CancelOrder {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "cancel_order".into(),
            description: "Cancel a specific order with a reason code".into(),
            input_schema: InputSchema::object(
                json!({
                    "orderId": order_id_schema(),
                    "cancelReasonCode": {
                        "type": "string",
                        "enum": [
                            "NO_INVENTORY",
                            "BUYER_CANCELLED",
                            "SHIPPING_ADDRESS_UNDELIVERABLE",
                            "CUSTOMER_EXCHANGE",
                            "PRICING_ERROR"
                        ]
                    }
                }),
                &["orderId", "cancelReasonCode"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error cancelling order"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: CancelOrderArgs = parse_args(params)?;
        OrdersApi::new(&client).cancel_order(&args).await?;
        Ok(format!(
            "Order cancellation request accepted for order {}. \
             The cancellation process is underway.",
            args.order_id
        ))
    }
}

pub struct UpdateShipmentStatus;

#[async_trait]
impl Tool for UpdateShipmentStatus {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "update_shipment_status".into(),
            description: "Update shipment status for an order (v0 API, for orders that \
                          require shipment status updates)"
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "orderId": order_id_schema(),
                    "marketplaceId": marketplace_id_schema(),
                    "shipmentStatus": {
                        "type": "string",
                        "enum": ["ReadyForPickup", "PickedUp", "RefusedPickup"]
                    },
                    "orderItems": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "orderItemId": { "type": "string" },
                                "quantity": { "type": "integer", "minimum": 1 }
                            }
                        }
                    }
                }),
                &["orderId", "shipmentStatus"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error updating shipment status"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: UpdateShipmentStatusArgs = parse_args(params)?;
        let response = OrdersApi::new(&client)
            .update_shipment_status(&args)
            .await?;
        Ok(format_acknowledgement(
            &format!("Shipment status updated successfully for order {}.", args.order_id),
            &response,
        ))
    }
}

pub struct UpdateVerificationStatus;

#[async_trait]
impl Tool for UpdateVerificationStatus {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "update_verification_status".into(),
            description: "Update verification status for regulated orders (v0 API, for \
                          compliance-related orders)"
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "orderId": order_id_schema(),
                    "marketplaceId": marketplace_id_schema(),
                    "regulatedOrderVerificationStatus": {
                        "type": "object",
                        "properties": {
                            "status": {
                                "type": "string",
                                "enum": ["Approved", "Rejected", "Expired", "Cancelled"]
                            },
                            "validUntil": { "type": "string", "description": "ISO 8601 expiry of the approval" },
                            "rejectionReason": {
                                "type": "object",
                                "properties": {
                                    "rejectionReasonId": { "type": "string" },
                                    "rejectionReasonDescription": { "type": "string" }
                                },
                                "required": ["rejectionReasonId", "rejectionReasonDescription"]
                            }
                        },
                        "required": ["status"]
                    }
                }),
                &["orderId", "regulatedOrderVerificationStatus"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error updating verification status"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: UpdateVerificationStatusArgs = parse_args(params)?;
        let response = OrdersApi::new(&client)
            .update_verification_status(&args)
            .await?;
        Ok(format_acknowledgement(
            &format!(
                "Verification status updated successfully for order {}.",
                args.order_id
            ),
            &response,
        ))
    }
}

pub struct ConfirmShipment;

#[async_trait]
impl Tool for ConfirmShipment {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "confirm_shipment".into(),
            description: "Confirm shipment for an order (v0 API, for orders that require \
                          shipment confirmation)"
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "orderId": order_id_schema(),
                    "marketplaceId": marketplace_id_schema(),
                    "packageDetail": {
                        "type": "object",
                        "properties": {
                            "packageReferenceId": { "type": "string" },
                            "carrierCode": { "type": "string" },
                            "carrierName": { "type": "string" },
                            "shippingMethod": { "type": "string" },
                            "trackingNumber": { "type": "string" },
                            "shipDate": { "type": "string", "description": "ISO 8601 ship date" },
                            "shipFrom": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "addressLine1": { "type": "string" },
                                    "addressLine2": { "type": "string" },
                                    "addressLine3": { "type": "string" },
                                    "city": { "type": "string" },
                                    "county": { "type": "string" },
                                    "district": { "type": "string" },
                                    "stateOrRegion": { "type": "string" },
                                    "postalCode": { "type": "string" },
                                    "countryCode": { "type": "string" },
                                    "phone": { "type": "string" }
                                }
                            }
                        },
                        "required": ["packageReferenceId", "carrierCode", "shipDate"]
                    },
                    "codCollectionMethod": { "type": "string", "enum": ["DirectPayment"] }
                }),
                &["orderId", "packageDetail"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error confirming shipment"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: ConfirmShipmentArgs = parse_args(params)?;
        let response = OrdersApi::new(&client).confirm_shipment(&args).await?;
        Ok(format_acknowledgement(
            &format!("Shipment confirmed successfully for order {}.", args.order_id),
            &response,
        ))
    }
}

pub struct GetOrderRegulatedInfo;

#[async_trait]
impl Tool for GetOrderRegulatedInfo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_order_regulated_info".into(),
            description: "Get regulated information for an order (v0 API, for \
                          compliance-related orders)"
                .into(),
            input_schema: InputSchema::object(json!({ "orderId": order_id_schema() }), &["orderId"]),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error getting regulated info"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let client = ctx.api_client()?;
        let args: GetOrderRegulatedInfoArgs = parse_args(params)?;
        let response = OrdersApi::new(&client)
            .get_order_regulated_info(&args)
            .await?;
        Ok(format_regulated_info(&response))
    }
}
