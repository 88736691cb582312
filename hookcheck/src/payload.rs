//! The fixed `orders/create` test order sent to the endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A single line item of the test order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: u64,
    pub title: String,
    pub quantity: u32,
    pub price: String,
}

/// Test order payload.
///
/// Field order is the JSON field order; the signature covers the serialized bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOrder {
    pub id: u64,
    pub order_number: u64,
    pub email: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
    pub total_price: String,
    pub currency: String,
}

impl TestOrder {
    /// The test order, stamped with `created_at`.
    pub fn sample(created_at: DateTime<Utc>) -> Self {
        Self {
            id: 123456789,
            order_number: 1001,
            email: "test@example.com".to_string(),
            created_at,
            line_items: vec![LineItem {
                id: 1,
                title: "Producto de Prueba".to_string(),
                quantity: 1,
                price: "100.00".to_string(),
            }],
            total_price: "100.00".to_string(),
            currency: "CLP".to_string(),
        }
    }

    /// Compact JSON body, exactly as sent and signed.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `2024-01-01T00:00:00.000Z`
fn serialize_iso_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
