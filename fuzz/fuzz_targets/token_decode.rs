// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for permalink token decoding.
//!
//! Tokens arrive from URLs anyone can edit. Decoding must fail cleanly on
//! anything that is not a token we produced, and tokens that do decode must
//! turn into a state within the configured bounds.

#![no_main]

use iamlens::{AppState, EngineConfig, StateCodec};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let token = String::from_utf8_lossy(data);
    let config = EngineConfig::default();
    let codec = StateCodec::new(&config);

    // INVARIANT 1: decoding never panics
    let decoded = codec.decode_any::<Value>(&token);

    // INVARIANT 2: a decoded value re-encodes into a token that decodes
    if let Ok(value) = decoded {
        let token = codec.encode(&value).expect("decoded JSON re-encodes");
        let _: Value = codec.decode(token.as_str()).expect("fresh token decodes");
    }

    // INVARIANT 3: whatever happens, the restored state is in range
    let state = AppState::from_token_or_default(&token, &codec, &config);
    assert!(state.available_groups >= config.min_groups);
    assert!(state.available_groups <= config.max_groups);
});
