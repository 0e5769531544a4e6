/*
[INPUT]:  Challenge text to sign
[OUTPUT]: Signature string for the submit_challenge call
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet types or changing signature format
*/

use async_trait::async_trait;

use crate::http::Result;

/// Trait for wallet signing operations
///
/// The trait is async to support hardware wallets and external signers.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Connected account address, if the wallet exposes one
    fn address(&self) -> Option<&str>;

    /// Sign the challenge text and return a `0x`-prefixed hex signature
    async fn sign_message(&self, message: &str) -> Result<String>;
}

/// Mock wallet signer for testing
#[derive(Debug, Clone)]
pub struct MockWalletSigner {
    address: Option<String>,
    signature: String,
}

impl MockWalletSigner {
    /// Create a new mock signer with predetermined signature
    pub fn new(address: Option<&str>, signature: &str) -> Self {
        Self {
            address: address.map(str::to_string),
            signature: signature.to_string(),
        }
    }
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    async fn sign_message(&self, _message: &str) -> Result<String> {
        Ok(self.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signer() {
        let signer = MockWalletSigner::new(Some("0x1234567890abcdef"), "0xmock_signature");

        assert_eq!(signer.address(), Some("0x1234567890abcdef"));

        let signature = signer.sign_message("test message").await.unwrap();
        assert_eq!(signature, "0xmock_signature");
    }

    #[test]
    fn test_mock_signer_without_address() {
        let signer = MockWalletSigner::new(None, "0x00");
        assert!(signer.address().is_none());
    }
}
