// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The legacy tagged token scheme: a magic prefix in front of raw JSON,
//! standard base64, no compression.
//!
//! Still decoded so that old shared links keep working. New tokens use
//! [`CompressedScheme`](super::CompressedScheme). The standard alphabet
//! contains `+` and `/`, so callers must percent-encode these tokens before
//! putting them in a URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::TokenScheme;
use crate::error::{DecodeError, EncodeError};

/// Format tag prepended to the JSON payload.
pub const LEGACY_MAGIC: &[u8] = b"88son.v1$";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaggedScheme;

impl TokenScheme for TaggedScheme {
    fn seal(&self, payload: &[u8]) -> Result<String, EncodeError> {
        let mut bytes = Vec::with_capacity(LEGACY_MAGIC.len() + payload.len());
        bytes.extend_from_slice(LEGACY_MAGIC);
        bytes.extend_from_slice(payload);
        Ok(STANDARD.encode(bytes))
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, DecodeError> {
        let bytes = STANDARD.decode(token.trim())?;
        bytes
            .strip_prefix(LEGACY_MAGIC)
            .map(<[u8]>::to_vec)
            .ok_or(DecodeError::MissingMagic)
    }
}
