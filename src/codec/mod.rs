// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! State codec: structured state ⇄ opaque URL token.
//!
//! The selection and filter state of a session lives in the URL, so the
//! encoding has to be reversible, compact and made of URL-legal characters.
//! The pipeline is JSON → brotli → base64url, with a checksum so corrupted
//! links are rejected rather than half-applied.
//!
//! Three schemes implement [`TokenScheme`]:
//!
//! | Scheme             | Payload                         | Alphabet     |
//! |--------------------|---------------------------------|--------------|
//! | `CompressedScheme` | tag + crc32 + brotli(JSON)      | URL-safe     |
//! | `TaggedScheme`     | `"88son.v1$"` + JSON            | standard     |
//! | `PlainScheme`      | JSON                            | standard     |
//!
//! Only the compressed scheme is written. The other two are read so that
//! links shared before compression still open.
//!
//! Callers only see `encode`/`decode`; which scheme backs them is not part of
//! the contract. Round-tripping is the guarantee, byte-identical tokens across
//! versions or compression levels are not.

mod compressed;
mod plain;
mod tagged;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use compressed::{CompressedScheme, HEADER_LEN, SCHEME_COMPRESSED};
pub use plain::PlainScheme;
pub use tagged::{TaggedScheme, LEGACY_MAGIC};

use crate::config::{EngineConfig, DEFAULT_MAX_TOKEN_LEN};
use crate::error::{DecodeError, EncodeError};

/// Wraps serialized bytes into a token string and back.
pub trait TokenScheme {
    fn seal(&self, payload: &[u8]) -> Result<String, EncodeError>;
    fn open(&self, token: &str) -> Result<Vec<u8>, DecodeError>;
}

/// An encoded state value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

/// Serialize `value` to JSON and seal it with `scheme`.
pub fn encode_with<S, V>(scheme: &S, value: &V) -> Result<Token, EncodeError>
where
    S: TokenScheme + ?Sized,
    V: Serialize + ?Sized,
{
    let json = serde_json::to_vec(value)?;
    scheme.seal(&json).map(Token)
}

/// Open `token` with `scheme` and parse the JSON inside.
pub fn decode_with<S, V>(scheme: &S, token: &str) -> Result<V, DecodeError>
where
    S: TokenScheme + ?Sized,
    V: DeserializeOwned,
{
    let json = scheme.open(token)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Encoder/decoder configured from [`EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCodec {
    scheme: CompressedScheme,
    max_token_len: usize,
}

impl Default for StateCodec {
    fn default() -> Self {
        Self {
            scheme: CompressedScheme::default(),
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl StateCodec {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scheme: CompressedScheme {
                quality: config.compression_quality,
                window: config.compression_window,
                max_decoded_bytes: config.max_decoded_bytes,
            },
            max_token_len: config.max_token_len,
        }
    }

    /// Encode with the compressed scheme.
    ///
    /// Tokens longer than the configured URL budget are still returned; the
    /// overflow is logged so oversized selections show up in traces.
    pub fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Token, EncodeError> {
        let token = encode_with(&self.scheme, value)?;
        if token.len() > self.max_token_len {
            tracing::warn!(
                len = token.len(),
                budget = self.max_token_len,
                "state token exceeds URL length budget"
            );
        }
        Ok(token)
    }

    /// Decode a compressed-scheme token.
    pub fn decode<V: DeserializeOwned>(&self, token: &str) -> Result<V, DecodeError> {
        decode_with(&self.scheme, token)
    }

    /// Decode a token of any known scheme.
    ///
    /// Tried in order: compressed, tagged, plain. If all fail, the compressed
    /// scheme's error is returned.
    pub fn decode_any<V: DeserializeOwned>(&self, token: &str) -> Result<V, DecodeError> {
        let primary = match decode_with(&self.scheme, token) {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        match decode_with(&TaggedScheme, token) {
            Ok(value) => return Ok(value),
            Err(error) => tracing::debug!(%error, "tagged token decode failed"),
        }
        decode_with(&PlainScheme, token).map_err(|error| {
            tracing::debug!(%error, "plain token decode failed");
            primary
        })
    }
}

/// Encode `value` with the default codec.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// let mut selection = BTreeMap::new();
/// selection.insert("0;a.viewer".to_string(), true);
/// let token = iamlens::encode(&selection).unwrap();
/// let back: BTreeMap<String, bool> = iamlens::decode(token.as_str()).unwrap();
/// assert_eq!(back, selection);
/// ```
pub fn encode<V: Serialize + ?Sized>(value: &V) -> Result<Token, EncodeError> {
    StateCodec::default().encode(value)
}

/// Decode a token produced by [`encode`], or a tagged or plain legacy token.
pub fn decode<V: DeserializeOwned>(token: &str) -> Result<V, DecodeError> {
    StateCodec::default().decode_any(token)
}
