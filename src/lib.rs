//! Search, match and permalink engine for cloud IAM catalogs.
//!
//! Browsing tens of thousands of GCP roles, AWS managed policies and IAM
//! actions comes down to three things: filter a catalog by free-text
//! queries on several fields, explain every hit with exact match positions,
//! and put the resulting view into a short shareable link.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  data/     │────▶│  index/      │────▶│  search/         │
//! │ (load_*,   │     │ (Inverted-   │     │ (matcher, field, │
//! │  Dataset)  │     │  Index)      │     │  composite,      │
//! └────────────┘     └──────────────┘     │  highlight)      │
//!        │                                 └──────────────────┘
//!        ▼                                          │
//! ┌────────────┐     ┌──────────────┐               ▼
//! │  entity    │     │  codec/      │◀────┌──────────────────┐
//! │ (Accessors)│     │ (StateCodec, │     │  state/          │
//! └────────────┘     │  TokenScheme)│     │ (AppState,       │
//!                    └──────────────┘     │  compare)        │
//!                                         └──────────────────┘
//! ```
//!
//! | Module    | Responsibility                                        |
//! |-----------|-------------------------------------------------------|
//! | `types`   | Spans, field matches, results, catalog records        |
//! | `entity`  | How the engine reads id, name and attributes of a `T` |
//! | `search`  | Substring matching, field filters, composite search   |
//! | `index`   | Attribute value -> owning entity ids                  |
//! | `codec`   | State value <-> URL-safe token                        |
//! | `state`   | Selections, filters, permalinks, group comparison     |
//! | `data`    | Dataset loading and validation                        |
//! | `config`  | Engine knobs                                          |
//!
//! # Matching
//!
//! A query matches a field when it occurs in it as a contiguous substring,
//! case-insensitively. Spans are character offsets into the original value,
//! inclusive at both ends, so they can be fed straight back into highlighting.
//!
//! # Usage
//!
//! ```
//! use iamlens::{Role, SearchFilters, Searcher};
//!
//! let roles = vec![
//!     Role::new("storage.admin", "Storage Admin", vec!["storage.buckets.get".into()]),
//!     Role::new("compute.viewer", "Compute Viewer", vec!["compute.instances.get".into()]),
//! ];
//! let searcher = Searcher::new(roles, Role::accessors());
//!
//! let outcome = searcher.search(&SearchFilters::new().with_attribute("BUCKETS"));
//! assert_eq!(outcome.len(), 1);
//! assert_eq!(outcome.results[0].item.id, "storage.admin");
//! ```

pub mod codec;
pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod index;
pub mod search;
pub mod state;
pub mod types;

pub use codec::{decode, encode, StateCodec, Token, TokenScheme};
pub use config::EngineConfig;
pub use data::{load_actions, load_policies, load_roles, Dataset, LoadReport};
pub use entity::Accessors;
pub use error::{
    ConfigError, DataShapeError, DecodeError, EncodeError, Error, Result, SearchError,
    StateKeyError,
};
pub use index::InvertedIndex;
pub use search::{
    match_substring, search, search_field, search_multi_field, split_segments, SearchFilters,
    SearchOutcome, Searcher, Segment,
};
pub use state::{compare, AppState, Comparison, SelectionState, StateKey};
pub use types::{Action, FieldMatch, MatchSpan, Policy, Role, SearchResult};
