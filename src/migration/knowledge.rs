//! Static knowledge base for the Orders API v0 → 2026-01-01 migration.

use serde::Serialize;
use std::sync::OnceLock;

/// Source version label of the only supported migration path.
pub const ORDERS_V0: &str = "orders-v0";

/// Target version label of the only supported migration path.
pub const ORDERS_2026_01_01: &str = "orders-2026-01-01";

/// Target descriptor used for methods that have no equivalent.
pub const NO_COUNTERPART: &str = "No 2026-01-01 counterpart";

/// Whether a legacy method has an equivalent in the target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    /// Has a target-version equivalent.
    Available,
    /// Must keep using the legacy path.
    Unavailable,
}

impl Availability {
    /// Status label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "✅ Available",
            Availability::Unavailable => "❌ Not Available",
        }
    }
}

/// How a legacy method maps onto the target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodMapping {
    /// Description of the target operation, or [`NO_COUNTERPART`].
    pub target: String,
    pub availability: Availability,
    pub notes: String,
}

/// The knowledge base for one migration path. Never mutated after
/// construction.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationData {
    /// Attributes removed with no replacement.
    pub deprecated_attributes: Vec<String>,
    /// Attributes not (yet) available in the target version.
    pub unsupported_attributes: Vec<String>,
    /// Source dotted path → target path description. Keys are unique.
    pub attribute_mapping: Vec<(String, String)>,
    /// Target-only capabilities.
    pub new_capabilities: Vec<String>,
    /// Legacy method name → mapping. Keys are unique.
    pub method_mapping: Vec<(String, MethodMapping)>,
}

impl MigrationData {
    /// Looks up the mapping for a legacy method name.
    pub fn method(&self, name: &str) -> Option<&MethodMapping> {
        self.method_mapping
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, mapping)| mapping)
    }

    /// Looks up the target description for a source attribute path.
    pub fn attribute_target(&self, source: &str) -> Option<&str> {
        self.attribute_mapping
            .iter()
            .find(|(src, _)| src == source)
            .map(|(_, tgt)| tgt.as_str())
    }

    /// Methods with the given availability, in table order.
    pub fn methods_with(
        &self,
        availability: Availability,
    ) -> impl Iterator<Item = (&str, &MethodMapping)> {
        self.method_mapping
            .iter()
            .filter(move |(_, m)| m.availability == availability)
            .map(|(name, m)| (name.as_str(), m))
    }

    /// Builds the Orders API v0 → 2026-01-01 table.
    pub fn orders_v0() -> Self {
        Self {
            deprecated_attributes: strings(DEPRECATED),
            unsupported_attributes: strings(NOT_SUPPORTED),
            attribute_mapping: ATTRIBUTE_MAPPING
                .iter()
                .map(|(src, tgt)| (src.to_string(), tgt.to_string()))
                .collect(),
            new_capabilities: strings(NEW_CAPABILITIES),
            method_mapping: METHOD_MAPPING
                .iter()
                .map(|(name, target, availability, notes)| {
                    (
                        name.to_string(),
                        MethodMapping {
                            target: target.to_string(),
                            availability: *availability,
                            notes: notes.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Process-wide, read-only copy of the Orders v0 table.
pub fn orders_v0() -> &'static MigrationData {
    static DATA: OnceLock<MigrationData> = OnceLock::new();
    DATA.get_or_init(MigrationData::orders_v0)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const DEPRECATED: &[&str] = &[
    "OrderChannel",
    "ShipServiceLevel",
    "CbaDisplayableShippingLabel",
    "IsGlobalExpressEnabled",
    "PromiseResponseDueDate",
    "IsEstimatedShipDateSet",
    "IsSoldByAB",
    "BuyerInfo.BuyerCounty",
];

const NOT_SUPPORTED: &[&str] = &[
    "NumberOfItemsShipped",
    "NumberOfItemsUnshipped",
    "PaymentExecutionDetail",
    "PaymentMethod",
    "PaymentMethodDetails",
    "IsIBA",
    "HasRegulatedItems",
    "DefaultShipFromLocationAddress",
    "ElectronicInvoiceStatus",
    "BuyerInvoicePreference",
    "BuyerTaxInformation",
    "FulfillmentInstruction",
    "MarketplaceTaxInfo",
    "SellerDisplayName",
    "AutomatedShippingSettings",
    "BuyerInfo.BuyerTaxInfo",
    "ProductInfo",
    "ProductInfo.NumberOfItems",
    "TaxCollection",
    "TaxCollection.Model",
    "TaxCollection.ResponsibleParty",
    "DeemedResellerCategory",
    "StoreChainStoreId",
    "SerialNumberRequired",
    "AssociatedItems",
    "AssociatedItem.OrderId",
    "AssociatedItem.OrderItemId",
    "AssociatedItem.AssociationType",
    "PointsGrantedDetail.PointsNumber",
    "PointsGrantedDetail.PointsMonetaryValue",
    "ConditionId",
    "ConditionSubtypeId",
];

const ATTRIBUTE_MAPPING: &[(&str, &str)] = &[
    ("AmazonOrderId", "Order.orderId"),
    ("SellerOrderId", "Order.orderAliases (with aliasType == SELLER_ORDER_ID)"),
    ("MarketplaceId", "Order.salesChannel.marketplaceId"),
    ("PurchaseDate", "Order.createdTime"),
    ("LastUpdateDate", "Order.lastUpdatedTime"),
    ("OrderType", "Order.programs (check for PREORDER)"),
    ("OrderStatus", "Order.fulfillment.fulfillmentStatus"),
    ("FulfillmentChannel", "Order.fulfillment.fulfilledBy"),
    ("SalesChannel", "Order.salesChannel.marketplaceName"),
    ("ShipmentServiceLevelCategory", "Order.fulfillment.fulfillmentServiceLevel"),
    ("OrderTotal", "Order.proceeds.grandTotal"),
    ("EasyShipShipmentStatus", "Order.packages.packageStatus.detailedStatus"),
    ("EarliestShipDate", "Order.fulfillment.shipByWindow.earliestDateTime"),
    ("LatestShipDate", "Order.fulfillment.shipByWindow.latestDateTime"),
    ("EarliestDeliveryDate", "Order.fulfillment.deliverByWindow.earliestDateTime"),
    ("LatestDeliveryDate", "Order.fulfillment.deliverByWindow.latestDateTime"),
    ("IsBusinessOrder", "Order.programs (check for AMAZON_BUSINESS)"),
    ("IsPrime", "Order.programs (check for PRIME)"),
    ("IsPremiumOrder", "Order.programs (check for PREMIUM)"),
    (
        "ReplacedOrderId",
        "Order.associatedOrders (with associationType == REPLACEMENT_ORIGINAL_ID or EXCHANGE_ORIGINAL_ID)",
    ),
    ("IsISPU", "Order.programs (check for IN_STORE_PICK_UP)"),
    (
        "IsAccessPointOrder",
        "Order.recipient.deliveryAddress.addressType (check for PICKUP_POINT)",
    ),
    ("ShippingAddress", "Order.recipient.deliveryAddress"),
    ("BuyerInfo.BuyerEmail", "Order.buyer.buyerEmail"),
    ("BuyerInfo.BuyerName", "Order.buyer.buyerName"),
    ("BuyerInfo.PurchaseOrderNumber", "Order.buyer.buyerPurchaseOrderNumber"),
    ("BuyerCompanyName", "Order.buyer.buyerCompanyName"),
    ("DeliveryPreferences", "Order.recipient.deliveryPreference"),
    ("ASIN", "Order.orderItems.product.asin"),
    ("SellerSKU", "Order.orderItems.product.sellerSku"),
    ("OrderItemId", "Order.orderItems.orderItemId"),
    ("Title", "Order.orderItems.product.title"),
    ("QuantityOrdered", "Order.orderItems.quantityOrdered"),
    ("QuantityShipped", "Order.orderItems.fulfillment.quantityFulfilled"),
    ("PointsGranted", "Order.orderItems.expense.pointsCost.pointsGranted"),
    ("ItemPrice", "Order.orderItems.proceeds.breakdowns.subtotal (with type == ITEM)"),
    (
        "ShippingPrice",
        "Order.orderItems.proceeds.breakdowns.subtotal (with type == SHIPPING)",
    ),
    (
        "ItemTax",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == TAX && subtype == ITEM)",
    ),
    (
        "ShippingTax",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == TAX && subtype == SHIPPING)",
    ),
    (
        "ShippingDiscount",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == DISCOUNT && subtype == SHIPPING)",
    ),
    (
        "PromotionDiscount",
        "Order.orderItems.proceeds.breakdowns.subtotal (with type == DISCOUNT)",
    ),
    (
        "PromotionDiscountTax",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == TAX && subtype == DISCOUNT)",
    ),
    ("CODFee", "Order.orderItems.proceeds.breakdowns.subtotal (with type == COD_FEE)"),
    (
        "CODFeeDiscount",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == DISCOUNT && subtype == COD_FEE)",
    ),
    (
        "ItemBuyerInfo.GiftWrapPrice",
        "Order.orderItems.proceeds.breakdowns.subtotal (with type == GIFT_WRAP)",
    ),
    (
        "ItemBuyerInfo.GiftWrapTax",
        "Order.orderItems.proceeds.breakdowns.detailedBreakdowns.value (type == TAX && subtype == GIFT_WRAP)",
    ),
    ("PromotionIds", "Order.orderItems.promotion.breakdowns.promotionId"),
    ("IsGift", "Order.orderItems.fulfillment.packing.giftOption"),
    ("ConditionNote", "Order.orderItems.product.condition"),
    (
        "ScheduledDeliveryStartDate",
        "Order.orderItems.fulfillment.shipping.scheduledDeliveryWindow",
    ),
    (
        "ScheduledDeliveryEndDate",
        "Order.orderItems.fulfillment.shipping.scheduledDeliveryWindow",
    ),
    ("PriceDesignation", "Order.orderItems.product.price.priceDesignation"),
    (
        "IossNumber",
        "Order.orderItems.fulfillment.shipping.internationalShipping.iossNumber",
    ),
    ("IsTransparency", "Order.orderItems.programs (check for TRANSPARENCY)"),
    ("ItemBuyerInfo.BuyerCustomizedInfo", "Order.orderItems.product.customization"),
    (
        "ItemBuyerInfo.BuyerCustomizedInfo.CustomizedURL",
        "Order.orderItems.product.customization.customizedUrl",
    ),
    (
        "ItemBuyerInfo.GiftMessageText",
        "Order.orderItems.fulfillment.packing.giftOption.giftMessage",
    ),
    (
        "ItemBuyerInfo.GiftWrapLevel",
        "Order.orderItems.fulfillment.packing.giftOption.giftWrapLevel",
    ),
    (
        "BuyerRequestedCancel.IsBuyerRequestedCancel",
        "Order.orderItems.cancellation.requester (check for BUYER)",
    ),
    (
        "BuyerRequestedCancel.BuyerCancelReason",
        "Order.orderItems.cancellation.cancelReason",
    ),
    ("SerialNumbers", "Order.orderItems.product.serialNumbers"),
    (
        "SubstitutionPreferences",
        "Order.orderItems.fulfillment.picking.substitutionPreference",
    ),
    ("Measurement", "Order.orderItems.measurement"),
    (
        "ShippingConstraints",
        "Order.orderItems.fulfillment.shipping.shippingConstraints",
    ),
    (
        "AmazonPrograms",
        "Order.orderItems.programs or Order.programs (check for SUBSCRIBE_AND_SAVE, FBM_SHIP_PLUS)",
    ),
];

const NEW_CAPABILITIES: &[&str] = &[
    "Order.programs with AMAZON_BAZAAR",
    "Order.programs with AMAZON_HAUL",
    "Order.programs with AMAZON_EASY_SHIP (non-Brazil) or DELIVERY_BY_AMAZON (Brazil only)",
    "Order.orderItems.product.price.unitPrice",
    "Order.orderItems.proceeds.proceedsTotal",
    "Order.orderItems.fulfillment.shipping.shippingConstraints.cashOnDelivery",
    "Order.packages for FBM orders (carrier, shippingService, trackingNumber, package status)",
];

const METHOD_MAPPING: &[(&str, &str, Availability, &str)] = &[
    (
        "getOrders",
        "search_orders (with filters)",
        Availability::Available,
        "Use with filters like createdAfter, marketplaceIds, etc.",
    ),
    (
        "getOrder",
        "get_order (with includedData parameter)",
        Availability::Available,
        "Order items included by default, use includedData for additional data",
    ),
    (
        "getOrderBuyerInfo",
        NO_COUNTERPART,
        Availability::Unavailable,
        "Continue using V0 API: GET /orders/v0/orders/{orderId}/buyerInfo",
    ),
    (
        "getOrderAddress",
        "get_order (with includedData=['RECIPIENT'])",
        Availability::Available,
        "Include RECIPIENT in includedData parameter",
    ),
    (
        "getOrderItems",
        "get_order (order items included by default)",
        Availability::Available,
        "Order items are always included, no need for separate call",
    ),
    (
        "getOrderItemsBuyerInfo",
        "get_order (with includedData=['BUYER'])",
        Availability::Available,
        "Item buyer info included when BUYER is in includedData",
    ),
    (
        "getOrderRegulatedInfo",
        NO_COUNTERPART,
        Availability::Unavailable,
        "Continue using V0 API: GET /orders/v0/orders/{orderId}/regulatedInfo",
    ),
    (
        "updateShipmentStatus",
        NO_COUNTERPART,
        Availability::Unavailable,
        "Continue using V0 API: POST /orders/v0/orders/{orderId}/shipment",
    ),
    (
        "updateVerificationStatus",
        NO_COUNTERPART,
        Availability::Unavailable,
        "Continue using V0 API: PATCH /orders/v0/orders/{orderId}/regulatedInfo",
    ),
    (
        "confirmShipment",
        NO_COUNTERPART,
        Availability::Unavailable,
        "Continue using V0 API: POST /orders/v0/orders/{orderId}/shipmentConfirmation",
    ),
    (
        "cancelOrder",
        "cancel_order",
        Availability::Available,
        "Available as PUT /orders/2026-01-01/orders/{orderId}/cancellation",
    ),
];
