/*
[INPUT]:  An authentication adapter and a wallet signer
[OUTPUT]: Completed (or aborted) wallet sign-in attempt
[POS]:    Auth layer - drives the adapter callbacks in their fixed order
[UPDATE]: When the sign-in step order changes
*/

use tracing::{error, info};

use crate::auth::{AuthenticationAdapter, ChallengeAdapter, WalletSigner};
use crate::http::Result;

/// One wallet sign-in: nonce, message, signature, verification.
///
/// Concurrent `sign_in` calls are not de-duplicated; each runs its own
/// challenge/verify sequence.
pub struct WalletConnection<'a, A: AuthenticationAdapter> {
    adapter: &'a A,
    wallet: &'a dyn WalletSigner,
}

impl<'a, A: AuthenticationAdapter> WalletConnection<'a, A> {
    pub fn new(adapter: &'a A, wallet: &'a dyn WalletSigner) -> Self {
        Self { adapter, wallet }
    }

    /// Run every step; the first failure aborts the attempt and is returned
    pub async fn sign_in(&self) -> Result<bool> {
        match self.run().await {
            Ok(verified) => Ok(verified),
            Err(err) => {
                error!(error = %err, "wallet sign-in failed");
                Err(err)
            }
        }
    }

    async fn run(&self) -> Result<bool> {
        let nonce = self.adapter.get_nonce().await?;
        let message = self.adapter.create_message(&nonce)?;
        let body = self.adapter.get_message_body(&message);
        let signature = self.wallet.sign_message(&body).await?;
        let verified = self.adapter.verify(&message, &signature).await?;
        info!(verified, "wallet sign-in finished");
        Ok(verified)
    }
}

impl ChallengeAdapter {
    /// Connect `wallet` and run one sign-in attempt
    pub async fn connect(&self, wallet: &dyn WalletSigner) -> Result<bool> {
        self.set_connected_address(wallet.address().map(str::to_string));
        WalletConnection::new(self, wallet).sign_in().await
    }
}
