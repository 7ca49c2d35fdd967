//! Tokenization client

use crate::config::ClientConfig;
use crate::types::*;
use crate::{KushkiError, Result};
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// HTTP client for the Kushki tokenization endpoints
///
/// Every request operation resolves to a [`Transaction`]; transport and
/// parse failures become [`Transaction::Failed`] instead of an `Err`, so a
/// caller always receives exactly one result per call. The client holds no
/// per-request state and can be cloned freely across tasks.
#[derive(Debug, Clone)]
pub struct KushkiClient {
    /// Underlying HTTP client
    client: Client,
    /// Immutable client configuration
    config: Arc<ClientConfig>,
    /// Base URL every endpoint path is joined to
    base_url: String,
}

impl KushkiClient {
    /// Create a new client for the given merchant, currency and environment
    pub fn new(
        public_merchant_id: impl Into<String>,
        currency: impl Into<String>,
        environment: Environment,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::new(public_merchant_id, currency, environment))
    }

    /// Create a new client from a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| KushkiError::config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.resolved_base_url();

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Create a new client from `KUSHKI_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Request a token for a single charge of `total_amount`
    pub async fn request_token(&self, card: &Card, total_amount: f64) -> Transaction {
        let request = TokenRequest::charge(card, total_amount, &self.config.currency);
        self.tokenize(TOKENS_PATH, &request).await
    }

    /// Request a token for recurring charges, without an amount
    pub async fn request_subscription_token(&self, card: &Card) -> Transaction {
        let request = TokenRequest::subscription(card, &self.config.currency);
        self.tokenize(SUBSCRIPTION_TOKENS_PATH, &request).await
    }

    /// Request a charge token in the background and deliver it to `callback`
    ///
    /// Returns immediately. The callback runs exactly once on a tokio worker,
    /// unless the returned handle is aborted first.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn request_token_with_callback<F>(
        &self,
        card: Card,
        total_amount: f64,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Transaction) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let transaction = client.request_token(&card, total_amount).await;
            callback(transaction);
        })
    }

    /// Request a subscription token in the background and deliver it to `callback`
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn request_subscription_token_with_callback<F>(
        &self,
        card: Card,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Transaction) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let transaction = client.request_subscription_token(&card).await;
            callback(transaction);
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn tokenize(&self, path: &str, request: &TokenRequest<'_>) -> Transaction {
        let transaction = match self.send(path, request).await {
            Ok(transaction) => transaction,
            Err(e) => Transaction::from_error(&e),
        };

        match &transaction {
            Transaction::Approved { .. } => info!(path, "Token issued"),
            Transaction::Declined { code, message } => {
                warn!(path, code = %code, message = %message, "Tokenization declined")
            }
            Transaction::Failed { code, message } => {
                warn!(path, code = %code, message = %message, "Tokenization failed")
            }
        }

        transaction
    }

    async fn send(&self, path: &str, request: &TokenRequest<'_>) -> Result<Transaction> {
        request.validate()?;

        let url = self.endpoint(path);
        debug!(url = %url, card = ?request.card, "Sending tokenization request");

        let response = self
            .client
            .post(&url)
            .header(PUBLIC_MERCHANT_ID_HEADER, &self.config.public_merchant_id)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, "Received tokenization response");

        Ok(Transaction::from_response(status, &body))
    }
}
