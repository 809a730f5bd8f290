// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for dataset loading.
//!
//! Upstream datasets are fetched over the network. Any byte sequence must
//! either load or fail with a shape error, and whatever loads must be
//! searchable.

#![no_main]

use iamlens::{load_policies, load_roles, Policy, Role, SearchFilters, Searcher};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(dataset) = load_roles(json) {
        // INVARIANT: role ids are unique and sorted
        assert!(dataset.items.windows(2).all(|w| w[0].id < w[1].id));
        let searcher = Searcher::new(dataset.items, Role::accessors());
        let _ = searcher.search(&SearchFilters::new().with_attribute("get"));
    }

    if let Ok(dataset) = load_policies(json) {
        let searcher = Searcher::new(dataset.items, Policy::accessors());
        let _ = searcher.search(&SearchFilters::new().with_name("read"));
    }
});
