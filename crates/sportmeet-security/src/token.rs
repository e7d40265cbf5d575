//! Session token generation
//!
//! A token is `length - 8` characters drawn uniformly from the configured
//! alphabet, followed by an 8 hex character checksum: the first four bytes of
//! HMAC-SHA256(secret, body). Without the secret a client cannot produce a
//! token that passes [`TokenGenerator::verify`], so forged tokens are rejected
//! before any store lookup.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use sportmeet_shared::config::{is_token_char, TOKEN_CHECKSUM_LENGTH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token alphabet needs at least two distinct characters")]
    AlphabetTooSmall,
    #[error("Token alphabet contains {0:?}, which cannot appear in a session cookie")]
    UnsafeCharacter(char),
    #[error("Token length must be greater than {0}")]
    LengthTooShort(usize),
    #[error("Invalid token secret: {0}")]
    InvalidSecret(String),
}

#[derive(Clone)]
pub struct TokenGenerator {
    mac: HmacSha256,
    alphabet: Vec<char>,
    length: usize,
}

impl TokenGenerator {
    pub fn new(secret: &str, characters: &str, length: usize) -> Result<Self, TokenError> {
        let mut alphabet: Vec<char> = Vec::with_capacity(characters.len());
        for c in characters.chars() {
            if !is_token_char(c) {
                return Err(TokenError::UnsafeCharacter(c));
            }
            if !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }
        if alphabet.len() < 2 {
            return Err(TokenError::AlphabetTooSmall);
        }
        if length <= TOKEN_CHECKSUM_LENGTH {
            return Err(TokenError::LengthTooShort(TOKEN_CHECKSUM_LENGTH));
        }

        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TokenError::InvalidSecret(e.to_string()))?;

        Ok(Self { mac, alphabet, length })
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let mut token: String = (0..self.length - TOKEN_CHECKSUM_LENGTH)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect();
        let checksum = self.checksum(&token);
        token.push_str(&checksum);
        token
    }

    /// Check the trailing checksum against the body. Constant time in the tag.
    pub fn verify(&self, token: &str) -> bool {
        if token.chars().count() != self.length || token.len() < TOKEN_CHECKSUM_LENGTH {
            return false;
        }

        let split = token.len() - TOKEN_CHECKSUM_LENGTH;
        if !token.is_char_boundary(split) {
            return false;
        }
        let (body, checksum) = token.split_at(split);

        let Ok(tag) = hex::decode(checksum) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(body.as_bytes());
        mac.verify_truncated_left(&tag).is_ok()
    }

    fn checksum(&self, body: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(body.as_bytes());
        let digest = mac.finalize().into_bytes();
        hex::encode(&digest[..TOKEN_CHECKSUM_LENGTH / 2])
    }
}

impl fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("alphabet_size", &self.alphabet.len())
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
