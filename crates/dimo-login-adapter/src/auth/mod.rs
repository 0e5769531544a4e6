/*
[INPUT]:  Wallet signers, SDK tokens and the API client
[OUTPUT]: Auth status transitions, JWT session, signed challenges
[POS]:    Auth layer - wallet challenge and JWT login flows
[UPDATE]: When auth flow or signature methods change
*/

pub mod challenge;
pub mod connect;
pub mod evm_wallet;
pub mod jwt;
pub mod session;
pub mod signature;
pub mod status;
pub mod wallet;

pub use challenge::{AuthenticationAdapter, ChallengeAdapter};
pub use connect::WalletConnection;
pub use evm_wallet::EvmWalletSigner;
pub use jwt::{JwtManager, TokenData, extract_ethereum_address};
pub use session::{JwtSessionLogin, SessionOutcome};
pub use signature::format_ethereum_signature;
pub use status::AuthState;
pub use wallet::{MockWalletSigner, WalletSigner};
