use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OrdersResponse {
	pub orders: Vec<GatewayOrder>,
}

#[derive(Debug, Deserialize)]
pub struct GatewayOrder {
	pub id:                u64,
	pub merchant_order_id: String,
	pub status:            String,
	pub amount:            GatewayAmount,
}

/// The gateway reports amounts either as a string or as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GatewayAmount {
	Text(String),
	Number(serde_json::Number),
}

impl GatewayAmount {
	pub fn into_text(self) -> String {
		match self {
			GatewayAmount::Text(text) => text,
			GatewayAmount::Number(number) => number.to_string(),
		}
	}
}
