//! Session Token
//!
//! `<session id>.<base64url(hmac_sha256(secret, session id))>`

use kernel::id::SessionId;
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};

use crate::error::{AuthError, AuthResult};

/// Sign a session id into a cookie token
pub fn issue_token(secret: &[u8; 32], session_id: SessionId) -> String {
    let id = session_id.to_string();
    let signature = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64_url(&signature))
}

/// Verify a cookie token and recover the session id
pub fn parse_token(secret: &[u8; 32], token: &str) -> AuthResult<SessionId> {
    let (id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = from_base64_url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;
    if !verify_hmac_sha256(secret, id.as_bytes(), &signature) {
        return Err(AuthError::SessionInvalid);
    }

    id.parse().map_err(|_| AuthError::SessionInvalid)
}
