/*
[INPUT]:  App origin and an EVM private key from the environment
[OUTPUT]: Wallet sign-in against the challenge endpoints, then the vehicles URL
[POS]:    Examples - wallet challenge flow demonstration
[UPDATE]: When auth flow changes
*/

use std::sync::Arc;

use dimo_login_adapter::*;
use url::Url;

/// Example: wallet challenge/response sign-in
///
/// DIMO_ORIGIN=https://trips.dimo.org DIMO_PRIVATE_KEY=0x... cargo run --example wallet_sign_in
#[tokio::main]
async fn main() {
    println!("=== Wallet Sign-in Example ===\n");

    let origin = std::env::var("DIMO_ORIGIN").unwrap_or_else(|_| "http://localhost:3007".to_string());
    let origin = match Url::parse(&origin) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid DIMO_ORIGIN: {}", e);
            return;
        }
    };

    let Ok(private_key) = std::env::var("DIMO_PRIVATE_KEY") else {
        eprintln!("Set DIMO_PRIVATE_KEY to an EVM private key");
        return;
    };
    let wallet = match EvmWalletSigner::new(&private_key) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to load wallet: {}", e);
            return;
        }
    };
    println!("✓ Wallet {} loaded", wallet.checksum_address());

    let store = Arc::new(LocalStore::in_memory());
    let client = match ApiClient::new(&origin, store) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ API client targeting {}", client.base_url());

    let status = AuthState::new();
    let adapter = ChallengeAdapter::new(client.clone(), status.clone());

    match adapter.connect(&wallet).await {
        Ok(_) => {
            println!("✓ Status: {}", status.status());
            match Redirect::vehicles(client.base_url()) {
                Ok(redirect) => println!("  Navigate to {}", redirect),
                Err(e) => eprintln!("Bad vehicles URL: {}", e),
            }
        }
        Err(e) => eprintln!("Sign-in failed: {} (status: {})", e, status.status()),
    }
}
