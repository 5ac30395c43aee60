//! Orders API operations.
//!
//! Search, get and cancel use the dated 2026-01-01 root. The shipment,
//! verification and regulated-info operations have no dated counterpart and
//! stay on the legacy v0 root.

pub mod format;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::client::{HttpMethod, SpApiClient};
use crate::error::{Error, Result};

/// Dated API root for order resources.
pub const ORDERS_ROOT: &str = "/orders/2026-01-01/orders";

/// Legacy API root for order resources.
pub const LEGACY_ORDERS_ROOT: &str = "/orders/v0/orders";

/// US marketplace, used when none is given.
pub const DEFAULT_MARKETPLACE_ID: &str = "ATVPDKIKX0DER";

const DEFAULT_PAGE_SIZE: u32 = 50;

fn default_marketplace_ids() -> Vec<String> {
    vec![DEFAULT_MARKETPLACE_ID.to_string()]
}

fn default_marketplace_id() -> String {
    DEFAULT_MARKETPLACE_ID.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Optional data sets that can be attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncludedData {
    Buyer,
    Recipient,
    Proceeds,
    Expense,
    Promotion,
    Cancellation,
    Fulfillment,
    Packages,
}

impl IncludedData {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludedData::Buyer => "BUYER",
            IncludedData::Recipient => "RECIPIENT",
            IncludedData::Proceeds => "PROCEEDS",
            IncludedData::Expense => "EXPENSE",
            IncludedData::Promotion => "PROMOTION",
            IncludedData::Cancellation => "CANCELLATION",
            IncludedData::Fulfillment => "FULFILLMENT",
            IncludedData::Packages => "PACKAGES",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    Unshipped,
    PartiallyShipped,
    Shipped,
    Cancelled,
    Unfulfillable,
}

impl FulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Pending => "PENDING",
            FulfillmentStatus::Unshipped => "UNSHIPPED",
            FulfillmentStatus::PartiallyShipped => "PARTIALLY_SHIPPED",
            FulfillmentStatus::Shipped => "SHIPPED",
            FulfillmentStatus::Cancelled => "CANCELLED",
            FulfillmentStatus::Unfulfillable => "UNFULFILLABLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfilledBy {
    Amazon,
    Merchant,
}

impl FulfilledBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfilledBy::Amazon => "AMAZON",
            FulfilledBy::Merchant => "MERCHANT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReasonCode {
    NoInventory,
    BuyerCancelled,
    ShippingAddressUndeliverable,
    CustomerExchange,
    PricingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    ReadyForPickup,
    PickedUp,
    RefusedPickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Approved,
    Rejected,
    Expired,
    Cancelled,
}

fn join<T>(items: &[T], as_str: fn(&T) -> &'static str) -> String {
    items.iter().map(as_str).collect::<Vec<_>>().join(",")
}

/// Arguments of `search_orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOrdersArgs {
    #[serde(default)]
    pub created_after: Option<String>,
    #[serde(default)]
    pub created_before: Option<String>,
    #[serde(default)]
    pub last_updated_after: Option<String>,
    #[serde(default)]
    pub last_updated_before: Option<String>,
    #[serde(default)]
    pub fulfillment_statuses: Vec<FulfillmentStatus>,
    #[serde(default = "default_marketplace_ids")]
    pub marketplace_ids: Vec<String>,
    #[serde(default)]
    pub fulfilled_by: Vec<FulfilledBy>,
    #[serde(default = "default_page_size")]
    pub max_results_per_page: u32,
    #[serde(default)]
    pub included_data: Vec<IncludedData>,
    #[serde(default)]
    pub pagination_token: Option<String>,
}

impl SearchOrdersArgs {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.created_after.is_none() && self.last_updated_after.is_none() {
            return Err(Error::InvalidArguments(
                "Either createdAfter or lastUpdatedAfter must be provided".into(),
            ));
        }
        if !(1..=100).contains(&self.max_results_per_page) {
            return Err(Error::InvalidArguments(
                "maxResultsPerPage must be between 1 and 100".into(),
            ));
        }
        if self.marketplace_ids.is_empty() {
            return Err(Error::InvalidArguments(
                "marketplaceIds must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Query parameters in request order. Lists are comma-joined.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("marketplaceIds", self.marketplace_ids.join(",")),
            ("maxResultsPerPage", self.max_results_per_page.to_string()),
        ];

        let optional = [
            ("createdAfter", &self.created_after),
            ("createdBefore", &self.created_before),
            ("lastUpdatedAfter", &self.last_updated_after),
            ("lastUpdatedBefore", &self.last_updated_before),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                query.push((name, value.clone()));
            }
        }

        if !self.fulfillment_statuses.is_empty() {
            query.push((
                "fulfillmentStatuses",
                join(&self.fulfillment_statuses, FulfillmentStatus::as_str),
            ));
        }
        if !self.fulfilled_by.is_empty() {
            query.push(("fulfilledBy", join(&self.fulfilled_by, FulfilledBy::as_str)));
        }
        if !self.included_data.is_empty() {
            query.push(("includedData", join(&self.included_data, IncludedData::as_str)));
        }
        if let Some(token) = &self.pagination_token {
            query.push(("paginationToken", token.clone()));
        }

        query
    }
}

/// Arguments of `get_order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderArgs {
    pub order_id: String,
    #[serde(default)]
    pub included_data: Vec<IncludedData>,
}

/// Arguments of `cancel_order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderArgs {
    pub order_id: String,
    pub cancel_reason_code: CancelReasonCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Arguments of `update_shipment_status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentStatusArgs {
    pub order_id: String,
    #[serde(default = "default_marketplace_id")]
    pub marketplace_id: String,
    pub shipment_status: ShipmentStatus,
    #[serde(default)]
    pub order_items: Vec<ShipmentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReason {
    pub rejection_reason_id: String,
    pub rejection_reason_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatedOrderVerificationStatus {
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
}

/// Arguments of `update_verification_status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVerificationStatusArgs {
    pub order_id: String,
    #[serde(default = "default_marketplace_id")]
    pub marketplace_id: String,
    pub regulated_order_verification_status: RegulatedOrderVerificationStatus,
}

impl UpdateVerificationStatusArgs {
    pub fn validate(&self) -> Result<()> {
        let status = &self.regulated_order_verification_status;
        if status.status == VerificationStatus::Rejected && status.rejection_reason.is_none() {
            return Err(Error::InvalidArguments(
                "rejectionReason is required when status is Rejected".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipFromAddress {
    pub name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub state_or_region: String,
    pub postal_code: String,
    pub country_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetail {
    pub package_reference_id: String,
    pub carrier_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub ship_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_from: Option<ShipFromAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodCollectionMethod {
    DirectPayment,
}

/// Arguments of `confirm_shipment`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmShipmentArgs {
    pub order_id: String,
    #[serde(default = "default_marketplace_id")]
    pub marketplace_id: String,
    pub package_detail: PackageDetail,
    #[serde(default)]
    pub cod_collection_method: Option<CodCollectionMethod>,
}

/// Arguments of `get_order_regulated_info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderRegulatedInfoArgs {
    pub order_id: String,
}

fn order_path(root: &str, order_id: &str, suffix: &str) -> Result<String> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(Error::InvalidArguments("orderId must not be empty".into()));
    }
    Ok(format!("{root}/{}{suffix}", urlencoding::encode(order_id)))
}

/// Orders API operations over an authenticated client.
pub struct OrdersApi<'a> {
    client: &'a SpApiClient,
}

impl<'a> OrdersApi<'a> {
    pub fn new(client: &'a SpApiClient) -> Self {
        Self { client }
    }

    /// `GET /orders/2026-01-01/orders`
    #[instrument(skip(self, args))]
    pub async fn search_orders(&self, args: &SearchOrdersArgs) -> Result<Value> {
        args.validate()?;
        self.client
            .call(HttpMethod::Get, ORDERS_ROOT, &args.query(), None)
            .await
    }

    /// `GET /orders/2026-01-01/orders/{orderId}`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn get_order(&self, args: &GetOrderArgs) -> Result<Value> {
        let path = order_path(ORDERS_ROOT, &args.order_id, "")?;
        let mut query = Vec::new();
        if !args.included_data.is_empty() {
            query.push(("includedData", join(&args.included_data, IncludedData::as_str)));
        }
        self.client.call(HttpMethod::Get, &path, &query, None).await
    }

    /// `PUT /orders/2026-01-01/orders/{orderId}/cancellation`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn cancel_order(&self, args: &CancelOrderArgs) -> Result<Value> {
        let path = order_path(ORDERS_ROOT, &args.order_id, "/cancellation")?;
        let body = json!({ "cancelReasonCode": args.cancel_reason_code });
        self.client
            .call(HttpMethod::Put, &path, &[], Some(&body))
            .await
    }

    /// `POST /orders/v0/orders/{orderId}/shipment`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn update_shipment_status(&self, args: &UpdateShipmentStatusArgs) -> Result<Value> {
        let path = order_path(LEGACY_ORDERS_ROOT, &args.order_id, "/shipment")?;
        let mut body = json!({
            "marketplaceId": args.marketplace_id,
            "shipmentStatus": args.shipment_status,
        });
        if !args.order_items.is_empty() {
            body["orderItems"] = serde_json::to_value(&args.order_items)?;
        }
        self.client
            .call(HttpMethod::Post, &path, &[], Some(&body))
            .await
    }

    /// `PATCH /orders/v0/orders/{orderId}/regulatedInfo`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn update_verification_status(
        &self,
        args: &UpdateVerificationStatusArgs,
    ) -> Result<Value> {
        args.validate()?;
        let path = order_path(LEGACY_ORDERS_ROOT, &args.order_id, "/regulatedInfo")?;
        let body = json!({
            "marketplaceId": args.marketplace_id,
            "regulatedOrderVerificationStatus": args.regulated_order_verification_status,
        });
        self.client
            .call(HttpMethod::Patch, &path, &[], Some(&body))
            .await
    }

    /// `POST /orders/v0/orders/{orderId}/shipmentConfirmation`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn confirm_shipment(&self, args: &ConfirmShipmentArgs) -> Result<Value> {
        let path = order_path(LEGACY_ORDERS_ROOT, &args.order_id, "/shipmentConfirmation")?;
        let mut body = json!({
            "marketplaceId": args.marketplace_id,
            "packageDetail": args.package_detail,
        });
        if let Some(method) = args.cod_collection_method {
            body["codCollectionMethod"] = serde_json::to_value(method)?;
        }
        self.client
            .call(HttpMethod::Post, &path, &[], Some(&body))
            .await
    }

    /// `GET /orders/v0/orders/{orderId}/regulatedInfo`
    #[instrument(skip(self, args), fields(order_id = %args.order_id))]
    pub async fn get_order_regulated_info(&self, args: &GetOrderRegulatedInfoArgs) -> Result<Value> {
        let path = order_path(LEGACY_ORDERS_ROOT, &args.order_id, "/regulatedInfo")?;
        self.client.call(HttpMethod::Get, &path, &[], None).await
    }
}
