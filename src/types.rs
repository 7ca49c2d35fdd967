//! Core types for the Kushki tokenization API

use crate::error::{KushkiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Path of the single-charge tokenization endpoint
pub const TOKENS_PATH: &str = "/v1/tokens";
/// Path of the recurring tokenization endpoint
pub const SUBSCRIPTION_TOKENS_PATH: &str = "/v1/subscription-tokens";
/// Header carrying the public merchant id
pub const PUBLIC_MERCHANT_ID_HEADER: &str = "Public-Merchant-Id";

/// Kushki API hosts
pub mod hosts {
    /// UAT host used by [`super::Environment::Testing`]
    pub const UAT: &str = "api-uat.kushkipagos.com";
    /// Live host used by [`super::Environment::Production`]
    pub const PRODUCTION: &str = "api.kushkipagos.com";
}

/// Environment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Testing,
    Production,
}

impl Environment {
    /// Get the environment identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }

    /// Get the API host for this environment
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Testing => hosts::UAT,
            Environment::Production => hosts::PRODUCTION,
        }
    }

    /// Get the HTTPS base URL for this environment
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = KushkiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testing" | "uat" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(KushkiError::config(format!("Unknown environment: {}", other))),
        }
    }
}

/// Card details submitted for tokenization
///
/// No client-side validation is performed, the API decides whether a card
/// is acceptable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Cardholder name
    pub name: String,
    /// Primary account number
    pub number: String,
    /// Two-digit expiry month
    pub expiry_month: String,
    /// Two-digit expiry year
    pub expiry_year: String,
    /// Card verification value
    pub cvv: String,
}

impl Card {
    /// Create a new card
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        cvv: impl Into<String>,
        expiry_month: impl Into<String>,
        expiry_year: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            expiry_month: expiry_month.into(),
            expiry_year: expiry_year.into(),
            cvv: cvv.into(),
        }
    }

    /// Card number with everything past the first six characters masked
    pub fn masked_number(&self) -> String {
        match self.number.get(..6) {
            Some(bin) if self.number.len() > 6 => {
                format!("{}{}", bin, "*".repeat(self.number.len() - 6))
            }
            _ => "*".repeat(self.number.len()),
        }
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("name", &self.name)
            .field("number", &self.masked_number())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Request body sent to the tokenization endpoints
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    /// Card being tokenized
    pub card: &'a Card,
    /// Charge amount, absent for subscription tokens
    #[serde(rename = "totalAmount", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Currency configured on the client
    pub currency: &'a str,
}

impl<'a> TokenRequest<'a> {
    /// Create a request for a single-charge token
    pub fn charge(card: &'a Card, total_amount: f64, currency: &'a str) -> Self {
        Self {
            card,
            total_amount: Some(total_amount),
            currency,
        }
    }

    /// Create a request for a subscription token
    pub fn subscription(card: &'a Card, currency: &'a str) -> Self {
        Self {
            card,
            total_amount: None,
            currency,
        }
    }

    /// Check the request preconditions
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.total_amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(KushkiError::invalid_request(format!(
                    "totalAmount must be a positive number, got {}",
                    amount
                )));
            }
        }

        if self.currency.is_empty() {
            return Err(KushkiError::invalid_request("currency cannot be empty"));
        }

        Ok(())
    }
}

/// Raw response body returned by the tokenization endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Issued token on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Error code on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenResponse {
    /// Pick the known fields out of a response body
    ///
    /// Fields that are missing or not strings are treated as absent, so an
    /// unexpected sibling field never hides a token.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            token: text("token"),
            code: text("code"),
            message: text("message"),
        }
    }
}

/// Outcome of a tokenization request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Transaction {
    /// The API issued a token
    Approved { token: String },
    /// The API rejected the card and said why
    Declined { code: String, message: String },
    /// The request failed before a token or decline could be read
    Failed { code: String, message: String },
}

impl Transaction {
    /// Map an HTTP status and response body to a transaction
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        Self::parse_response(status, body).unwrap_or_else(|e| Self::from_error(&e))
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            KushkiError::invalid_response(status, format!("Malformed response body: {}", e))
        })?;
        let response = TokenResponse::from_value(&value);

        if (200..300).contains(&status) {
            return match response.token {
                Some(token) if !token.is_empty() => Ok(Transaction::Approved { token }),
                _ => Err(KushkiError::invalid_response(
                    status,
                    "Response did not contain a token",
                )),
            };
        }

        match (response.code, response.message) {
            (Some(code), Some(message)) => Ok(Transaction::Declined { code, message }),
            _ => Err(KushkiError::invalid_response(
                status,
                "Error response did not contain code and message",
            )),
        }
    }

    /// Map a client-side error to a failed transaction
    pub fn from_error(error: &KushkiError) -> Self {
        Transaction::Failed {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }

    /// Whether the API issued a token
    pub fn is_successful(&self) -> bool {
        matches!(self, Transaction::Approved { token } if !token.is_empty())
    }

    /// Issued token, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            Transaction::Approved { token } => Some(token),
            _ => None,
        }
    }

    /// Error code, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Transaction::Declined { code, .. } | Transaction::Failed { code, .. } => Some(code),
            Transaction::Approved { .. } => None,
        }
    }

    /// Error message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Transaction::Declined { message, .. } | Transaction::Failed { message, .. } => {
                Some(message)
            }
            Transaction::Approved { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_card() -> Card {
        Card::new("John Doe", "4242424242424242", "123", "12", "21")
    }

    #[test]
    fn test_environment_hosts() {
        assert_eq!(Environment::Testing.host(), "api-uat.kushkipagos.com");
        assert_eq!(Environment::Production.host(), "api.kushkipagos.com");
        assert_eq!(
            Environment::Testing.base_url(),
            "https://api-uat.kushkipagos.com"
        );
        assert_eq!(Environment::default(), Environment::Testing);
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("testing".parse::<Environment>().unwrap(), Environment::Testing);
        assert_eq!("UAT".parse::<Environment>().unwrap(), Environment::Testing);
        assert_eq!(
            " Production ".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_card_serialization() {
        let value = serde_json::to_value(test_card()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "John Doe",
                "number": "4242424242424242",
                "expiryMonth": "12",
                "expiryYear": "21",
                "cvv": "123"
            })
        );
    }

    #[test]
    fn test_card_debug_is_masked() {
        let debug = format!("{:?}", test_card());
        assert!(debug.contains("424242**********"));
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("123"));

        let short = Card::new("Invalid John Doe", "000000", "123", "12", "21");
        assert_eq!(short.masked_number(), "******");
    }

    #[test]
    fn test_charge_request_body() {
        let card = test_card();
        let value = serde_json::to_value(TokenRequest::charge(&card, 10.0, "USD")).unwrap();
        assert_eq!(value["totalAmount"], json!(10.0));
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["card"]["number"], "4242424242424242");
    }

    #[test]
    fn test_subscription_request_omits_amount() {
        let card = test_card();
        let value = serde_json::to_value(TokenRequest::subscription(&card, "USD")).unwrap();
        assert!(value.get("totalAmount").is_none());
        assert_eq!(value["currency"], "USD");
    }

    #[test]
    fn test_request_validation() {
        let card = test_card();
        assert!(TokenRequest::charge(&card, 10.0, "USD").validate().is_ok());
        assert!(TokenRequest::charge(&card, 0.0, "USD").validate().is_err());
        assert!(TokenRequest::charge(&card, -1.5, "USD").validate().is_err());
        assert!(TokenRequest::charge(&card, f64::NAN, "USD").validate().is_err());
        assert!(TokenRequest::subscription(&card, "").validate().is_err());
    }

    #[test]
    fn test_approved_response() {
        let transaction = Transaction::from_response(200, br#"{"token":"abc123"}"#);
        assert_eq!(transaction.token(), Some("abc123"));
        assert!(transaction.is_successful());
        assert!(transaction.is_successful());
        assert_eq!(transaction.code(), None);
    }

    #[test]
    fn test_declined_response() {
        let body = json!({"code": "017", "message": "Tarjeta no válida"}).to_string();
        let transaction = Transaction::from_response(402, body.as_bytes());
        assert_eq!(
            transaction,
            Transaction::Declined {
                code: "017".to_string(),
                message: "Tarjeta no válida".to_string(),
            }
        );
        assert!(!transaction.is_successful());
        assert_eq!(transaction.token(), None);
    }

    #[test]
    fn test_success_without_token_is_failure() {
        let bodies: [&[u8]; 3] = [
            b"{}",
            br#"{"token":""}"#,
            br#"{"code":"017","message":"x"}"#,
        ];
        for body in bodies {
            let transaction = Transaction::from_response(200, body);
            assert!(matches!(transaction, Transaction::Failed { .. }));
            assert_eq!(transaction.code(), Some(crate::error::INVALID_RESPONSE_CODE));
            assert!(!transaction.is_successful());
        }
    }

    #[test]
    fn test_token_with_unexpected_sibling_fields() {
        let transaction = Transaction::from_response(200, br#"{"token":"abc","code":0}"#);
        assert_eq!(
            transaction,
            Transaction::Approved {
                token: "abc".to_string()
            }
        );

        let body = br#"{"token":"abc","message":null,"details":{"id":7}}"#;
        assert!(Transaction::from_response(201, body).is_successful());
    }

    #[test]
    fn test_non_string_token_is_failure() {
        let transaction = Transaction::from_response(200, br#"{"token":12345}"#);
        assert_eq!(transaction.code(), Some(crate::error::INVALID_RESPONSE_CODE));
    }

    #[test]
    fn test_non_json_success_response() {
        for body in [&b"OK"[..], &b"\"ok\""[..], &b"[]"[..]] {
            let transaction = Transaction::from_response(200, body);
            assert_eq!(transaction.code(), Some(crate::error::INVALID_RESPONSE_CODE));
            assert!(transaction.message().unwrap().contains("200"));
        }
    }

    #[test]
    fn test_malformed_error_response() {
        let transaction = Transaction::from_response(500, b"<html>Bad Gateway</html>");
        assert_eq!(transaction.code(), Some(crate::error::INVALID_RESPONSE_CODE));
        assert!(transaction.message().unwrap().contains("500"));

        let transaction = Transaction::from_response(402, br#"{"code":"017"}"#);
        assert_eq!(transaction.code(), Some(crate::error::INVALID_RESPONSE_CODE));
    }

    #[test]
    fn test_transaction_serialization() {
        let value = serde_json::to_value(Transaction::Approved {
            token: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"status": "approved", "token": "abc"}));
    }
}
