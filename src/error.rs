// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Search and index operations are total over well-typed input. The only
//! failure surfaces are caller bugs (`SearchError`), tokens that do not decode
//! (`DecodeError`), datasets with the wrong shape (`DataShapeError`) and bad
//! configuration (`ConfigError`). Callers recover from the last three by
//! falling back to defaults.

use thiserror::Error;

/// Misuse of the search API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// An argument the operation cannot work with, e.g. an empty lookup query.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// A state value that could not be turned into a token.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("state is not representable as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("compression failed: {0}")]
    Compress(#[from] std::io::Error),
}

/// A token that is malformed, corrupted or foreign.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token is truncated ({len} bytes)")]
    Truncated { len: usize },
    #[error("unknown token scheme {0:#04x}")]
    UnknownScheme(u8),
    #[error("token payload does not decompress: {0}")]
    Decompress(std::io::Error),
    #[error("decompressed payload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },
    #[error("token is missing the format tag")]
    MissingMagic,
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An upstream dataset that does not have the expected structure.
#[derive(Debug, Error)]
pub enum DataShapeError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset top level must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

/// A selection key that is not `"<group>;<entry>"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse state key {key:?}")]
pub struct StateKeyError {
    pub key: String,
}

/// Engine configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Any error the crate produces.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    DataShape(#[from] DataShapeError),
    #[error(transparent)]
    StateKey(#[from] StateKeyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
