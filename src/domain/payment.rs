use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical order identifier.
///
/// Orders are keyed by the platform-assigned user id. The gateway sees the
/// plain decimal rendering, both when the payment link is signed and when the
/// order is looked up again, so `Display` and `FromStr` must stay inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
	pub fn for_user(user_id: u64) -> Self {
		Self(user_id)
	}
}

impl fmt::Display for OrderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for OrderId {
	type Err = ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse::<u64>().map(OrderId)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
	pub order_id:      OrderId,
	pub amount:        Decimal,
	pub payer_contact: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResponse {
	pub payment_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentVerificationRequest {
	pub order_id: String,
}

impl PaymentVerificationRequest {
	pub fn for_order(order_id: OrderId) -> Self {
		Self {
			order_id: order_id.to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentVerificationResponse {
	pub is_paid:  bool,
	pub order_id: String,
	pub amount:   String,
}
