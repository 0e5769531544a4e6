/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public login adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod login;
pub mod settings;
pub mod storage;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthState,
    AuthenticationAdapter,
    ChallengeAdapter,
    EvmWalletSigner,
    JwtManager,
    JwtSessionLogin,
    MockWalletSigner,
    SessionOutcome,
    TokenData,
    WalletConnection,
    WalletSigner,
};

// Re-export commonly used types from http
pub use http::{ApiClient, ClientConfig, LoginError, Result};

pub use login::{Redirect, SdkLoginRequest, login_link};
pub use settings::SettingsCache;
pub use storage::LocalStore;

// Re-export all types
pub use types::*;
