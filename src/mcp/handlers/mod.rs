//! Tool implementations.

pub mod credentials;
pub mod migration;
pub mod orders;

use std::sync::Arc;

use super::tools::ToolBox;

pub use credentials::ManageCredentials;
pub use migration::MigrationAssistantTool;
pub use orders::{
    CancelOrder, ConfirmShipment, GetOrder, GetOrderRegulatedInfo, SearchOrders,
    UpdateShipmentStatus, UpdateVerificationStatus,
};

/// Registers every tool in the order `tools/list` reports them.
pub fn register_tools(toolbox: &ToolBox) {
    toolbox.add_tool(Arc::new(ManageCredentials));
    toolbox.add_tool(Arc::new(SearchOrders));
    toolbox.add_tool(Arc::new(GetOrder));
    toolbox.add_tool(Arc::new(CancelOrder));
    toolbox.add_tool(Arc::new(UpdateShipmentStatus));
    toolbox.add_tool(Arc::new(UpdateVerificationStatus));
    toolbox.add_tool(Arc::new(ConfirmShipment));
    toolbox.add_tool(Arc::new(GetOrderRegulatedInfo));
    toolbox.add_tool(Arc::new(MigrationAssistantTool::default()));
}
