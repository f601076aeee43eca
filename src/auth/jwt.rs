/// Credential decoding
///
/// Verifies the HS256 signature of the cookie token and extracts its claims.
/// Issuance, revocation and key rotation live outside this crate.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::claims::Claims;
use crate::error::AuthError;

/// The only algorithm a credential may be signed with.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Decodes credential tokens with a shared secret.
///
/// Built once at startup from an explicitly supplied secret and shared
/// between workers.
pub struct TokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl TokenDecoder {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // `exp` and `nbf` are checked when the issuer sets them, but not demanded.
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and verify a token
    ///
    /// # Errors
    /// Returns `AuthError::TokenExpired` for an elapsed `exp`, and
    /// `AuthError::TokenInvalid` for a future `nbf`, a bad signature, a foreign algorithm or
    /// a malformed payload.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}
