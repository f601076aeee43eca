/// Authentication module
///
/// Credential claims, token decoding and the resolved request identity.

mod claims;
mod identity;
mod jwt;

pub use claims::Claims;
pub use identity::Identity;
pub use jwt::TokenDecoder;
pub use jwt::TOKEN_ALGORITHM;
