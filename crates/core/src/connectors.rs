//! Static connector catalog for the grid-variant server.
//!
//! Read-only reference data: ten well-known connectors, hardcoded. The
//! grid renderer's "configure" action interpolates a connector id into
//! the cloud-console URL template below; ids only ever come from this
//! list, so no escaping is applied (that would change if the catalog
//! became dynamic or user-supplied).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cloud-console page for configuring a new source of a given connector type.
pub const CONFIGURE_URL_TEMPLATE: &str = "https://cloud.airbyte.com/sources/new?connector={id}";

/// One entry of the hardcoded connector list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectorDescriptor {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConnectorDescriptor {
    fn new(id: &str, name: &str, icon: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            description: Some(description.to_string()),
        }
    }
}

/// The ten connector descriptors shown by the grid UI.
pub fn connector_catalog() -> Vec<ConnectorDescriptor> {
    vec![
        ConnectorDescriptor::new("salesforce", "Salesforce", "☁️", "Sync CRM objects from Salesforce"),
        ConnectorDescriptor::new("hubspot", "HubSpot", "🟠", "Marketing and CRM data from HubSpot"),
        ConnectorDescriptor::new("google-sheets", "Google Sheets", "📊", "Rows from Google Sheets spreadsheets"),
        ConnectorDescriptor::new("shopify", "Shopify", "🛍️", "Orders, products, and customers from Shopify"),
        ConnectorDescriptor::new("stripe", "Stripe", "💳", "Payments and billing data from Stripe"),
        ConnectorDescriptor::new("postgres", "Postgres", "🐘", "Tables from a PostgreSQL database"),
        ConnectorDescriptor::new("mysql", "MySQL", "🐬", "Tables from a MySQL database"),
        ConnectorDescriptor::new("zendesk-support", "Zendesk Support", "🎫", "Tickets and users from Zendesk Support"),
        ConnectorDescriptor::new("slack", "Slack", "💬", "Messages and channels from Slack"),
        ConnectorDescriptor::new("notion", "Notion", "📝", "Pages and databases from Notion"),
    ]
}

/// Build the external browser URL for configuring a connector.
pub fn configure_url(connector_id: &str) -> String {
    CONFIGURE_URL_TEMPLATE.replace("{id}", connector_id)
}
