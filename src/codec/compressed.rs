// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The compressed token scheme.
//!
//! ```text
//! ┌────────┬──────────────────┬──────────────────────────┐
//! │ scheme │ crc32(json) (LE) │ brotli(json)             │
//! │ 1 byte │ 4 bytes          │ variable                 │
//! └────────┴──────────────────┴──────────────────────────┘
//!            └─ base64, URL-safe alphabet, no padding ─┘
//! ```
//!
//! The checksum covers the uncompressed JSON, so truncation or tampering that
//! still happens to decompress is caught before JSON parsing. Decompression is
//! capped: a token is untrusted input and a tiny brotli stream can expand to
//! gigabytes.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::TokenScheme;
use crate::config::{
    DEFAULT_COMPRESSION_QUALITY, DEFAULT_COMPRESSION_WINDOW, DEFAULT_MAX_DECODED_BYTES,
};
use crate::error::{DecodeError, EncodeError};

/// Scheme tag of compressed tokens.
pub const SCHEME_COMPRESSED: u8 = 1;

/// Scheme byte plus checksum.
pub const HEADER_LEN: usize = 5;

const BUFFER_SIZE: usize = 4096;

/// brotli + CRC32 + URL-safe base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedScheme {
    pub quality: u32,
    pub window: u32,
    pub max_decoded_bytes: usize,
}

impl Default for CompressedScheme {
    fn default() -> Self {
        Self {
            quality: DEFAULT_COMPRESSION_QUALITY,
            window: DEFAULT_COMPRESSION_WINDOW,
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

impl TokenScheme for CompressedScheme {
    fn seal(&self, payload: &[u8]) -> Result<String, EncodeError> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() / 2);
        bytes.push(SCHEME_COMPRESSED);
        bytes.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());

        let mut encoder =
            brotli::CompressorWriter::new(&mut bytes, BUFFER_SIZE, self.quality, self.window);
        encoder.write_all(payload)?;
        // dropping the writer finishes the stream
        drop(encoder);

        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, DecodeError> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim().trim_end_matches('='))?;
        if bytes.len() <= HEADER_LEN {
            return Err(DecodeError::Truncated { len: bytes.len() });
        }
        if bytes[0] != SCHEME_COMPRESSED {
            return Err(DecodeError::UnknownScheme(bytes[0]));
        }
        let expected = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);

        let limit = self.max_decoded_bytes;
        let mut payload = Vec::new();
        brotli::Decompressor::new(&bytes[HEADER_LEN..], BUFFER_SIZE)
            .take(limit as u64 + 1)
            .read_to_end(&mut payload)
            .map_err(DecodeError::Decompress)?;
        if payload.len() > limit {
            return Err(DecodeError::TooLarge { limit });
        }

        let actual = crc32fast::hash(&payload);
        if actual != expected {
            return Err(DecodeError::Checksum { expected, actual });
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_bytes() {
        let scheme = CompressedScheme::default();
        let token = scheme.seal(br#"{"0;a.viewer":true}"#).unwrap();
        assert_eq!(scheme.open(&token).unwrap(), br#"{"0;a.viewer":true}"#);
    }

    #[test]
    fn test_token_alphabet_is_url_safe() {
        let scheme = CompressedScheme::default();
        let payload: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
        let token = scheme.seal(&payload).unwrap();
        assert!(token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn test_header_only_is_truncated() {
        let scheme = CompressedScheme::default();
        let token = URL_SAFE_NO_PAD.encode([SCHEME_COMPRESSED, 0, 0, 0, 0]);
        assert!(matches!(
            scheme.open(&token),
            Err(DecodeError::Truncated { len: 5 })
        ));
    }

    #[test]
    fn test_unknown_scheme_byte() {
        let scheme = CompressedScheme::default();
        let token = URL_SAFE_NO_PAD.encode([7u8, 0, 0, 0, 0, 1, 2, 3]);
        assert!(matches!(scheme.open(&token), Err(DecodeError::UnknownScheme(7))));
    }

    #[test]
    fn test_checksum_mismatch() {
        let scheme = CompressedScheme::default();
        let token = scheme.seal(b"[1,2,3]").unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();
        bytes[1] ^= 0xFF;
        let tampered = URL_SAFE_NO_PAD.encode(bytes);
        assert!(matches!(
            scheme.open(&tampered),
            Err(DecodeError::Checksum { .. })
        ));
    }

    #[test]
    fn test_decompression_is_capped() {
        let scheme = CompressedScheme::default();
        let payload = vec![b'a'; 4096];
        let token = scheme.seal(&payload).unwrap();
        let tight = CompressedScheme {
            max_decoded_bytes: 1024,
            ..scheme
        };
        assert!(matches!(
            tight.open(&token),
            Err(DecodeError::TooLarge { limit: 1024 })
        ));
    }

    #[test]
    fn test_not_base64() {
        let scheme = CompressedScheme::default();
        assert!(matches!(
            scheme.open("not a token!"),
            Err(DecodeError::Base64(_))
        ));
    }
}
