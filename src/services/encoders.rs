//! Decoders for secrets the host application stores reversibly.
//!
//! Credentials carry the identifier of the encoder that produced them. The
//! registry maps that identifier to a decoder; one-way password hashes are
//! known but can never be turned back into a usable token.
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DecodeError;

/// Encoder identifiers whose output is a one-way hash
const ONE_WAY_ENCODERS: &[&str] = &[
    "bcrypt", "ldap", "MD4", "MD5", "pbkdf2", "scrypt", "SHA-1", "SHA-256", "sha256", "argon2",
];

/// Turns an encoded secret back into plaintext
pub trait SecretDecoder: Send + Sync {
    fn decode(&self, encoded: &str) -> Result<String, DecodeError>;
}

/// Secrets stored as-is. The legacy form may carry a `{noop}` marker.
#[derive(Debug, Clone, Copy)]
pub struct NoopDecoder {
    legacy: bool,
}

impl SecretDecoder for NoopDecoder {
    fn decode(&self, encoded: &str) -> Result<String, DecodeError> {
        let plain = if self.legacy {
            encoded.strip_prefix("{noop}").unwrap_or(encoded)
        } else {
            encoded
        };
        Ok(plain.to_string())
    }
}

/// Secrets stored as hex of their UTF-8 bytes. The legacy form may carry an
/// `enc:` marker.
#[derive(Debug, Clone, Copy)]
pub struct HexDecoder {
    legacy: bool,
}

impl SecretDecoder for HexDecoder {
    fn decode(&self, encoded: &str) -> Result<String, DecodeError> {
        let digits = if self.legacy {
            encoded.strip_prefix("enc:").unwrap_or(encoded)
        } else {
            encoded
        };

        let bytes = hex::decode(digits).map_err(malformed_hex)?;
        String::from_utf8(bytes)
            .map_err(|_| DecodeError::Malformed("secret is not valid UTF-8".to_string()))
    }
}

/// Describes a hex failure without echoing any of the stored characters
fn malformed_hex(err: hex::FromHexError) -> DecodeError {
    let reason = match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            format!("invalid hex digit at position {}", index)
        }
        hex::FromHexError::OddLength => "odd number of hex digits".to_string(),
        _ => "unexpected secret length".to_string(),
    };
    DecodeError::Malformed(reason)
}

/// Identifier-keyed decoders, filled at startup
#[derive(Clone)]
pub struct EncoderRegistry {
    decoders: HashMap<String, Arc<dyn SecretDecoder>>,
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl EncoderRegistry {
    /// Creates a registry without any decoder
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Creates a registry holding the plain-text and hex decoders
    pub fn with_builtin() -> Self {
        Self::empty()
            .register("noop", NoopDecoder { legacy: false })
            .register("legacynoop", NoopDecoder { legacy: true })
            .register("hex", HexDecoder { legacy: false })
            .register("legacyhex", HexDecoder { legacy: true })
    }

    /// Adds or replaces the decoder for `encoder`
    pub fn register(mut self, encoder: &str, decoder: impl SecretDecoder + 'static) -> Self {
        self.decoders.insert(encoder.to_string(), Arc::new(decoder));
        self
    }

    pub fn is_decodable(&self, encoder: &str) -> bool {
        self.decoders.contains_key(encoder)
    }

    /// Decodes `encoded` with the decoder registered for `encoder`
    pub fn decode(&self, encoder: &str, encoded: &str) -> Result<String, DecodeError> {
        match self.decoders.get(encoder) {
            Some(decoder) => decoder.decode(encoded),
            None if ONE_WAY_ENCODERS.contains(&encoder) => {
                Err(DecodeError::NotDecodable(encoder.to_string()))
            }
            None => Err(DecodeError::UnknownEncoder(encoder.to_string())),
        }
    }
}
