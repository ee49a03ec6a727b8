//! Session tokens: authenticated encryption of the identity payload under a
//! single process-wide symmetric key.
//!
//! Token layout is `base64url(nonce || ciphertext)` where the ciphertext is
//! the JSON payload sealed with ChaCha20-Poly1305. There is no refresh or
//! rotation; an expired token forces a re-login.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use rand::{rngs::OsRng, RngCore};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use thiserror::Error;
use tracing::debug;

use shared_config::SYMMETRIC_KEY_LEN;
use shared_models::auth::{AuthPayload, Role};
use shared_models::error::AppError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("symmetric key must be exactly {SYMMETRIC_KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("token is invalid")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to seal token payload")]
    Sealing,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => {
                AppError::Unauthenticated(err.to_string())
            }
            TokenError::InvalidKeyLength(_) | TokenError::Sealing => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Debug)]
pub struct TokenMaker {
    key: LessSafeKey,
}

impl TokenMaker {
    pub fn new(symmetric_key: &str) -> Result<Self, TokenError> {
        let key_bytes = symmetric_key.as_bytes();
        if key_bytes.len() != SYMMETRIC_KEY_LEN {
            return Err(TokenError::InvalidKeyLength(key_bytes.len()));
        }
        let unbound =
            UnboundKey::new(&CHACHA20_POLY1305, key_bytes).map_err(|_| TokenError::Sealing)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
        })
    }

    pub fn create_token(
        &self,
        username: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<(String, AuthPayload), TokenError> {
        let payload = AuthPayload::new(username, role, ttl);
        let mut in_out = serde_json::to_vec(&payload).map_err(|_| TokenError::Sealing)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| TokenError::Sealing)?;

        let mut token_bytes = Vec::with_capacity(NONCE_LEN + in_out.len());
        token_bytes.extend_from_slice(&nonce_bytes);
        token_bytes.extend_from_slice(&in_out);

        Ok((URL_SAFE_NO_PAD.encode(token_bytes), payload))
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthPayload, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Invalid)?;
        if bytes.len() <= NONCE_LEN {
            return Err(TokenError::Invalid);
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| TokenError::Invalid)?;

        let mut buf = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut buf)
            .map_err(|_| TokenError::Invalid)?;

        let payload: AuthPayload =
            serde_json::from_slice(plaintext).map_err(|_| TokenError::Invalid)?;
        if payload.is_expired() {
            debug!("token for {} expired at {}", payload.username, payload.expires_at);
            return Err(TokenError::Expired);
        }
        Ok(payload)
    }
}
