use async_trait::async_trait;
use log::{debug, error, info, warn};
use md5::{Digest, Md5};
use reqwest::Client;
use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;

use crate::adapters::payment::schema::OrdersResponse;
use crate::domain::payment::{
	OrderId, PaymentRequest, PaymentResponse, PaymentVerificationRequest,
	PaymentVerificationResponse,
};
use crate::domain::payment_provider::{
	CallContext, PaymentError, PaymentProvider,
};

pub const DEFAULT_PAY_URL: &str = "https://pay.freekassa.ru/";
pub const DEFAULT_API_URL: &str = "https://api.freekassa.ru/v1";

/// Status token the gateway uses for a settled order.
pub const PAID_STATUS: &str = "success";

const SIGNATURE_DELIMITER: &str = ":";

#[derive(Debug, Clone)]
pub struct GatewayCredentials {
	pub merchant_id: String,
	pub secret_word: String,
	pub api_key:     Option<String>,
	pub pay_url:     String,
	pub api_url:     String,
}

/// Payment provider for gateways that take a checksum-signed payment link and
/// expose a bearer-authenticated order lookup.
#[derive(Clone)]
pub struct SignedGatewayProvider {
	credentials: GatewayCredentials,
	http_client: Client,
}

impl SignedGatewayProvider {
	pub fn new(credentials: GatewayCredentials, http_client: Client) -> Self {
		Self {
			credentials,
			http_client,
		}
	}

	fn api_key(&self) -> Result<&str, PaymentError> {
		self.credentials
			.api_key
			.as_deref()
			.filter(|key| !key.is_empty())
			.ok_or_else(|| PaymentError::configuration("gateway API key is not set"))
	}

	fn orders_url(&self) -> String {
		format!("{}/orders", self.credentials.api_url.trim_end_matches('/'))
	}

	async fn fetch_orders(
		&self,
		api_key: &str,
		order_id: &str,
	) -> Result<OrdersResponse, PaymentError> {
		let response = self
			.http_client
			.get(self.orders_url())
			.query(&[("merchant_order_id", order_id)])
			.bearer_auth(api_key)
			.send()
			.await
			.map_err(|e| PaymentError::transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			error!("Gateway order lookup for {order_id} failed with status: {status}");
			return Err(PaymentError::Remote {
				status: status.as_u16(),
			});
		}

		let body = response
			.bytes()
			.await
			.map_err(|e| PaymentError::transport(e.to_string()))?;

		serde_json::from_slice::<OrdersResponse>(&body).map_err(|e| {
			error!("Failed to decode gateway order lookup for {order_id}: {e}");
			PaymentError::protocol(e.to_string())
		})
	}
}

/// Renders an amount with exactly two decimals, rounding half away from
/// zero.
pub fn format_amount(amount: Decimal) -> String {
	round_amount(amount).to_string()
}

fn round_amount(amount: Decimal) -> Decimal {
	let mut rounded =
		amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
	rounded.rescale(2);
	rounded
}

/// Lowercase hex MD5 over `merchant:amount:secret:order`.
pub fn sign(
	merchant_id: &str,
	amount: &str,
	secret_word: &str,
	order_id: OrderId,
) -> String {
	let order_id = order_id.to_string();
	let payload = [merchant_id, amount, secret_word, order_id.as_str()]
		.join(SIGNATURE_DELIMITER);
	hex::encode(Md5::digest(payload.as_bytes()))
}

#[async_trait]
impl PaymentProvider for SignedGatewayProvider {
	async fn create_payment(
		&self,
		_ctx: &CallContext,
		request: PaymentRequest,
	) -> Result<PaymentResponse, PaymentError> {
		let credentials = &self.credentials;
		if credentials.merchant_id.is_empty() {
			return Err(PaymentError::configuration("merchant id is empty"));
		}
		if credentials.secret_word.is_empty() {
			return Err(PaymentError::configuration("secret word is empty"));
		}
		let rounded = round_amount(request.amount);
		if rounded <= Decimal::ZERO {
			return Err(PaymentError::configuration(format!(
				"payment amount must be positive after rounding, got {}",
				request.amount
			)));
		}

		let amount = rounded.to_string();
		let signature = sign(
			&credentials.merchant_id,
			&amount,
			&credentials.secret_word,
			request.order_id,
		);
		let order_id = request.order_id.to_string();

		let payment_url = Url::parse_with_params(&credentials.pay_url, &[
			("merchant", credentials.merchant_id.as_str()),
			("order", order_id.as_str()),
			("amount", amount.as_str()),
			("signature", signature.as_str()),
			("contact", request.payer_contact.as_str()),
		])
		.map_err(|e| {
			PaymentError::configuration(format!(
				"invalid pay url '{}': {e}",
				credentials.pay_url
			))
		})?;

		info!("Payment link issued for order {order_id} ({amount})");

		Ok(PaymentResponse {
			payment_url: payment_url.into(),
		})
	}

	async fn verify_payment(
		&self,
		ctx: &CallContext,
		request: PaymentVerificationRequest,
	) -> Result<PaymentVerificationResponse, PaymentError> {
		let api_key = self.api_key()?;

		let response = ctx
			.run(self.fetch_orders(api_key, &request.order_id))
			.await
			.inspect_err(|e| warn!("Verification of order {} failed: {e}", request.order_id))?;

		let Some(order) = response.orders.into_iter().next() else {
			return Err(PaymentError::NotFound {
				order_id: request.order_id,
			});
		};

		debug!(
			"Gateway order {} for {} has status '{}'",
			order.id, order.merchant_order_id, order.status
		);

		Ok(PaymentVerificationResponse {
			is_paid:  order.status == PAID_STATUS,
			order_id: order.merchant_order_id,
			amount:   order.amount.into_text(),
		})
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use rust_decimal_macros::dec;

	use super::*;

	fn credentials() -> GatewayCredentials {
		GatewayCredentials {
			merchant_id: "12345".to_string(),
			secret_word: "s3cret".to_string(),
			api_key:     None,
			pay_url:     DEFAULT_PAY_URL.to_string(),
			api_url:     DEFAULT_API_URL.to_string(),
		}
	}

	fn request(amount: Decimal) -> PaymentRequest {
		PaymentRequest {
			order_id: OrderId(555),
			amount,
			payer_contact: "user555@example.com".to_string(),
		}
	}

	fn ctx() -> CallContext {
		CallContext::with_timeout(Duration::from_secs(1))
	}

	#[test]
	fn test_format_amount_always_has_two_decimals() {
		assert_eq!(format_amount(dec!(100)), "100.00");
		assert_eq!(format_amount(dec!(100.5)), "100.50");
		assert_eq!(format_amount(dec!(0.1)), "0.10");
		assert_eq!(format_amount(dec!(1234.56)), "1234.56");
	}

	#[test]
	fn test_format_amount_rounds_half_away_from_zero() {
		assert_eq!(format_amount(dec!(99.999)), "100.00");
		assert_eq!(format_amount(dec!(10.005)), "10.01");
		assert_eq!(format_amount(dec!(10.004)), "10.00");
		assert_eq!(format_amount(dec!(2.675)), "2.68");
	}

	#[test]
	fn test_sign_is_deterministic_md5_hex() {
		let first = sign("12345", "100.00", "s3cret", OrderId(555));
		let second = sign("12345", "100.00", "s3cret", OrderId(555));

		assert_eq!(first, second);
		assert_eq!(first.len(), 32);
		assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		assert_eq!(
			first,
			hex::encode(Md5::digest(b"12345:100.00:s3cret:555"))
		);
	}

	#[test]
	fn test_sign_changes_with_every_input() {
		let base = sign("12345", "100.00", "s3cret", OrderId(555));
		assert_ne!(base, sign("12346", "100.00", "s3cret", OrderId(555)));
		assert_ne!(base, sign("12345", "100.01", "s3cret", OrderId(555)));
		assert_ne!(base, sign("12345", "100.00", "secret", OrderId(555)));
		assert_ne!(base, sign("12345", "100.00", "s3cret", OrderId(556)));
	}

	#[tokio::test]
	async fn test_create_payment_builds_signed_url() {
		let provider = SignedGatewayProvider::new(credentials(), Client::new());

		let response = provider
			.create_payment(&ctx(), request(dec!(100)))
			.await
			.unwrap();

		let url = Url::parse(&response.payment_url).unwrap();
		assert_eq!(url.host_str(), Some("pay.freekassa.ru"));

		let params: std::collections::HashMap<String, String> =
			url.query_pairs().into_owned().collect();
		assert_eq!(params["merchant"], "12345");
		assert_eq!(params["order"], "555");
		assert_eq!(params["amount"], "100.00");
		assert_eq!(params["contact"], "user555@example.com");
		assert_eq!(
			params["signature"],
			sign("12345", "100.00", "s3cret", OrderId(555))
		);
	}

	#[tokio::test]
	async fn test_create_payment_rejects_empty_merchant() {
		let mut credentials = credentials();
		credentials.merchant_id = String::new();
		let provider = SignedGatewayProvider::new(credentials, Client::new());

		let result = provider.create_payment(&ctx(), request(dec!(100))).await;

		assert!(matches!(result, Err(PaymentError::Configuration { .. })));
	}

	#[tokio::test]
	async fn test_create_payment_rejects_non_positive_amount() {
		let provider = SignedGatewayProvider::new(credentials(), Client::new());

		let zero = provider.create_payment(&ctx(), request(dec!(0))).await;
		let negative = provider.create_payment(&ctx(), request(dec!(-5))).await;
		let below_a_cent = provider.create_payment(&ctx(), request(dec!(0.004))).await;
		let half_a_cent = provider.create_payment(&ctx(), request(dec!(0.005))).await;

		assert!(matches!(zero, Err(PaymentError::Configuration { .. })));
		assert!(matches!(negative, Err(PaymentError::Configuration { .. })));
		assert!(matches!(below_a_cent, Err(PaymentError::Configuration { .. })));
		assert!(half_a_cent.unwrap().payment_url.contains("amount=0.01"));
	}

	#[tokio::test]
	async fn test_create_payment_rejects_invalid_pay_url() {
		let mut credentials = credentials();
		credentials.pay_url = "not a url".to_string();
		let provider = SignedGatewayProvider::new(credentials, Client::new());

		let result = provider.create_payment(&ctx(), request(dec!(100))).await;

		assert!(matches!(result, Err(PaymentError::Configuration { .. })));
	}

	#[tokio::test]
	async fn test_verify_payment_without_api_key_fails_fast() {
		let mut credentials = credentials();
		credentials.api_key = Some(String::new());
		let provider = SignedGatewayProvider::new(credentials, Client::new());

		let result = provider
			.verify_payment(&ctx(), PaymentVerificationRequest::for_order(OrderId(555)))
			.await;

		assert_eq!(
			result,
			Err(PaymentError::configuration("gateway API key is not set"))
		);
	}
}
