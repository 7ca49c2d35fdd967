//! # kushki - card tokenization client
//!
//! A Rust client for the Kushki tokenization API. Card details are posted to
//! the API and exchanged for an opaque token that can be charged later
//! without sending the card number again.
//!
//! ```no_run
//! use kushki::{Card, Environment, KushkiClient};
//!
//! # async fn run() -> kushki::Result<()> {
//! let client = KushkiClient::new("10000001436354684173102102", "USD", Environment::Testing)?;
//! let card = Card::new("John Doe", "4242424242424242", "123", "12", "21");
//!
//! let transaction = client.request_token(&card, 10.0).await;
//! if transaction.is_successful() {
//!     println!("token: {}", transaction.token().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use client::KushkiClient;
pub use config::ClientConfig;
pub use error::{KushkiError, Result};
pub use types::*;

/// Current version of the kushki library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(TOKENS_PATH, "/v1/tokens");
        assert_eq!(SUBSCRIPTION_TOKENS_PATH, "/v1/subscription-tokens");
        assert_eq!(PUBLIC_MERCHANT_ID_HEADER, "Public-Merchant-Id");
    }
}
