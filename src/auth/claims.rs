/// Credential claims
///
/// The payload of the signed token carried in the credential cookie.
/// Tokens are issued elsewhere; only `user_id` is required here and any
/// other claims the issuer adds (`jti`, `token_type`, ...) are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Primary key of the user the token was issued for
    pub user_id: i64,
    /// Expiration time (Unix timestamp), validated when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(user_id: i64) -> Self {
        Self { user_id, exp: None }
    }
}
