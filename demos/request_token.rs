//! Example requesting charge and subscription tokens
//!
//! Reads `KUSHKI_PUBLIC_MERCHANT_ID` (and the optional `KUSHKI_*` settings)
//! from the environment.

use kushki::{Card, KushkiClient, Transaction};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let client = KushkiClient::from_env()?;
    println!(
        "Using {} in {}",
        client.base_url(),
        client.config().environment
    );

    let card = Card::new("John Doe", "4242424242424242", "123", "12", "21");

    println!("\nRequesting charge token...");
    let transaction = client.request_token(&card, 10.0).await;
    report(&transaction);

    println!("\nRequesting subscription token...");
    let (tx, rx) = oneshot::channel();
    client.request_subscription_token_with_callback(card, move |transaction| {
        let _ = tx.send(transaction);
    });
    report(&rx.await?);

    Ok(())
}

fn report(transaction: &Transaction) {
    match transaction {
        Transaction::Approved { token } => println!("Token: {}", token),
        Transaction::Declined { code, message } => println!("Declined [{}]: {}", code, message),
        Transaction::Failed { code, message } => println!("Failed [{}]: {}", code, message),
    }
}
