// Razorpay payment lookup client.
// This is a deliberate soft dependency: subscription activation proceeds
// with client-supplied values whenever the gateway call fails, times out,
// or is unconfigured.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::app_config::RazorpayConfig;

/// Authoritative payment details fetched from the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPayment {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl GatewayPayment {
    /// Human-readable payment method label
    pub fn method_label(&self) -> Option<String> {
        self.method.as_deref().map(|m| {
            match m.to_lowercase().as_str() {
                "upi" => "UPI",
                "card" => "Card",
                "netbanking" => "NetBanking",
                "wallet" => "Wallet",
                "emi" => "EMI",
                "paylater" => "Pay Later",
                "emandate" => "eMandate",
                other => return other.to_string(),
            }
            .to_string()
        })
    }
}

#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Fetch payment details, returning None on any failure. Callers fall
    /// back to client-supplied values; activation is never blocked on this.
    pub async fn fetch_payment(&self, payment_id: &str) -> Option<GatewayPayment> {
        if !self.config.is_configured() || payment_id.is_empty() {
            return None;
        }

        let url = format!("{}/payments/{}", self.config.api_url, payment_id);
        let result = self
            .client
            .get(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<GatewayPayment>().await {
                Ok(payment) => Some(payment),
                Err(e) => {
                    warn!("Payment metadata parse warning: {}", e);
                    None
                },
            },
            Ok(resp) => {
                warn!(
                    "Payment metadata fetch returned status {} for {}",
                    resp.status(),
                    payment_id
                );
                None
            },
            Err(e) => {
                warn!("Payment metadata fetch warning: {}", e);
                None
            },
        }
    }
}

/// Guarantee a non-null order reference for the NOT NULL column; falls
/// back to a deterministic placeholder that preserves traceability.
pub fn order_reference_or_placeholder(order_id: Option<String>, payment_id: &str) -> String {
    match order_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            if payment_id.is_empty() {
                "NO_ORDER_UNKNOWN".to_string()
            } else {
                format!("NO_ORDER_{}", payment_id)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_reference_placeholder() {
        assert_eq!(
            order_reference_or_placeholder(None, "pay_123"),
            "NO_ORDER_pay_123"
        );
        assert_eq!(
            order_reference_or_placeholder(Some(String::new()), "pay_123"),
            "NO_ORDER_pay_123"
        );
        assert_eq!(
            order_reference_or_placeholder(Some("order_9".to_string()), "pay_123"),
            "order_9"
        );
        assert_eq!(order_reference_or_placeholder(None, ""), "NO_ORDER_UNKNOWN");
    }

    #[test]
    fn test_method_labels() {
        let payment = |m: &str| GatewayPayment {
            method: Some(m.to_string()),
            email: None,
            order_id: None,
            amount: None,
            currency: None,
            status: None,
            created_at: None,
        };

        assert_eq!(payment("upi").method_label(), Some("UPI".to_string()));
        assert_eq!(payment("card").method_label(), Some("Card".to_string()));
        assert_eq!(
            payment("netbanking").method_label(),
            Some("NetBanking".to_string())
        );
        // Unknown methods pass through unchanged
        assert_eq!(payment("crypto").method_label(), Some("crypto".to_string()));
    }

    #[tokio::test]
    async fn test_unconfigured_client_short_circuits() {
        let client = RazorpayClient::new(RazorpayConfig {
            key_id: String::new(),
            key_secret: String::new(),
            api_url: "https://api.razorpay.com/v1".to_string(),
            timeout_secs: 1,
        });

        assert!(client.fetch_payment("pay_123").await.is_none());
    }
}
