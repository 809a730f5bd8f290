// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bare base64 JSON, as the first shared links were written: standard
//! alphabet, padded, no tag and no compression.
//!
//! Decode-only in practice. There is no header to check, so anything that
//! is valid base64 opens and the JSON parse decides.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::TokenScheme;
use crate::error::{DecodeError, EncodeError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainScheme;

impl TokenScheme for PlainScheme {
    fn seal(&self, payload: &[u8]) -> Result<String, EncodeError> {
        Ok(STANDARD.encode(payload))
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, DecodeError> {
        Ok(STANDARD.decode(token.trim())?)
    }
}
