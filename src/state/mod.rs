// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session state: selections, filters and the permalink that carries them.
//!
//! State is an explicit value passed in and out, never ambient. Selections
//! are sparse: only `true` entries exist, keyed by `"<group>;<entry key>"`.
//!
//! Anything read back from a URL is untrusted. [`AppState::from_value`] never
//! fails: wrong shapes fall back to defaults field by field, selections
//! outside `availableGroups` are dropped, and [`SelectionState::restrict`]
//! drops keys that do not fit the current dataset.

pub mod compare;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{StateCodec, Token};
use crate::config::EngineConfig;
use crate::error::{DecodeError, EncodeError, StateKeyError};

pub use compare::{compare, Comparison};

/// Separator between group index and entry key.
pub const STATE_KEY_SEPARATOR: char = ';';

// =============================================================================
// STATE KEYS
// =============================================================================

/// A `(group, entry key)` pair, written `"<group>;<entry key>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey {
    pub group: usize,
    pub entry_key: String,
}

impl StateKey {
    pub fn new(group: usize, entry_key: impl Into<String>) -> Self {
        Self {
            group,
            entry_key: entry_key.into(),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group, STATE_KEY_SEPARATOR, self.entry_key)
    }
}

impl FromStr for StateKey {
    type Err = StateKeyError;

    /// Split at the first `;` and keep the whole remainder as the entry key,
    /// so `"0;a;b"` parses to entry `"a;b"`. A two-way split that discarded
    /// everything after a second `;` would not round-trip through `Display`.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let err = || StateKeyError {
            key: key.to_string(),
        };
        let (group, entry_key) = key.split_once(STATE_KEY_SEPARATOR).ok_or_else(err)?;
        if group.is_empty() || entry_key.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let group = group.parse().map_err(|_| err())?;
        Ok(Self::new(group, entry_key))
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Which entries are selected into which comparison group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState(BTreeMap<String, bool>);

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or unselect. Unselecting removes the entry.
    pub fn set(&mut self, key: &StateKey, selected: bool) {
        if selected {
            self.0.insert(key.to_string(), true);
        } else {
            self.0.remove(&key.to_string());
        }
    }

    pub fn is_selected(&self, key: &StateKey) -> bool {
        self.0.get(&key.to_string()).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drop any `false` entries.
    pub fn compact(&mut self) {
        self.0.retain(|_, selected| *selected);
    }

    /// Drop keys that do not parse, point past `available_groups`, or name an
    /// entry the dataset does not have. Returns how many keys were dropped.
    pub fn restrict(&mut self, available_groups: usize, is_known: impl Fn(&str) -> bool) -> usize {
        let before = self.0.len();
        self.0.retain(|key, selected| {
            *selected
                && key
                    .parse::<StateKey>()
                    .map(|k| k.group < available_groups && is_known(&k.entry_key))
                    .unwrap_or(false)
        });
        before - self.0.len()
    }

    /// Drop keys that do not parse or point past `available_groups`.
    /// Returns how many keys were dropped.
    pub fn retain_groups(&mut self, available_groups: usize) -> usize {
        self.restrict(available_groups, |_| true)
    }

    /// Parsed selected keys in key order. Unparsable keys are skipped.
    pub fn keys(&self) -> impl Iterator<Item = StateKey> + '_ {
        self.0
            .iter()
            .filter(|(_, selected)| **selected)
            .filter_map(|(key, _)| key.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tolerant read: non-object yields empty, non-`true` values are dropped.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        Self(
            object
                .iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .map(|(k, _)| (k.clone(), true))
                .collect(),
        )
    }
}

impl FromIterator<StateKey> for SelectionState {
    fn from_iter<I: IntoIterator<Item = StateKey>>(iter: I) -> Self {
        Self(iter.into_iter().map(|k| (k.to_string(), true)).collect())
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Filter inputs per view prefix: `prefix -> field -> query`.
pub type FilterValues = BTreeMap<String, BTreeMap<String, String>>;

/// Everything a permalink carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub available_groups: usize,
    #[serde(default)]
    pub filter_value: FilterValues,
    #[serde(default)]
    pub selection: BTreeMap<String, SelectionState>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            available_groups: crate::config::DEFAULT_MIN_GROUPS,
            filter_value: FilterValues::new(),
            selection: BTreeMap::new(),
        }
    }
}

impl AppState {
    /// Build state from an arbitrary JSON value, keeping what is well-formed.
    ///
    /// - `availableGroups` is kept only if it is an integer in the configured
    ///   range.
    /// - `filterValue` keeps string entries of object entries.
    /// - `selection` keeps `true` entries of object entries whose key parses
    ///   and whose group is below `availableGroups`.
    pub fn from_value(value: &Value, config: &EngineConfig) -> Self {
        let mut state = Self {
            available_groups: config.min_groups,
            ..Self::default()
        };
        let Some(object) = value.as_object() else {
            return state;
        };

        if let Some(groups) = object.get("availableGroups").and_then(Value::as_u64) {
            let groups = groups as usize;
            if (config.min_groups..=config.max_groups).contains(&groups) {
                state.available_groups = groups;
            }
        }

        if let Some(filters) = object.get("filterValue").and_then(Value::as_object) {
            for (prefix, fields) in filters {
                let Some(fields) = fields.as_object() else {
                    continue;
                };
                let kept: BTreeMap<String, String> = fields
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect();
                if !kept.is_empty() {
                    state.filter_value.insert(prefix.clone(), kept);
                }
            }
        }

        if let Some(selection) = object.get("selection").and_then(Value::as_object) {
            for (prefix, entries) in selection {
                if !entries.is_object() {
                    continue;
                }
                let mut kept = SelectionState::from_value(entries);
                kept.retain_groups(state.available_groups);
                if !kept.is_empty() {
                    state.selection.insert(prefix.clone(), kept);
                }
            }
        }

        state
    }

    /// Filter query for `field` under `prefix`.
    pub fn filter(&self, prefix: &str, field: &str) -> Option<&str> {
        self.filter_value
            .get(prefix)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// Set or clear (empty string) a filter query.
    pub fn set_filter(&mut self, prefix: &str, field: &str, query: &str) {
        if query.is_empty() {
            if let Some(fields) = self.filter_value.get_mut(prefix) {
                fields.remove(field);
                if fields.is_empty() {
                    self.filter_value.remove(prefix);
                }
            }
        } else {
            self.filter_value
                .entry(prefix.to_string())
                .or_default()
                .insert(field.to_string(), query.to_string());
        }
    }

    /// Selection under `prefix`, empty if none.
    pub fn selection(&self, prefix: &str) -> SelectionState {
        self.selection.get(prefix).cloned().unwrap_or_default()
    }

    pub fn selection_mut(&mut self, prefix: &str) -> &mut SelectionState {
        self.selection.entry(prefix.to_string()).or_default()
    }

    /// Change the number of groups, clamped to the configured range.
    ///
    /// Selections in groups that no longer exist are dropped.
    pub fn set_available_groups(&mut self, requested: usize, config: &EngineConfig) {
        self.available_groups = config.clamp_groups(requested);
        let groups = self.available_groups;
        for selection in self.selection.values_mut() {
            selection.retain_groups(groups);
        }
        self.selection.retain(|_, s| !s.is_empty());
    }

    /// Remove empty filters and selections before serializing.
    pub fn compact(&mut self) {
        for selection in self.selection.values_mut() {
            selection.compact();
        }
        self.selection.retain(|_, s| !s.is_empty());
        for fields in self.filter_value.values_mut() {
            fields.retain(|_, q| !q.is_empty());
        }
        self.filter_value.retain(|_, f| !f.is_empty());
    }

    /// Compact and encode into a permalink token.
    pub fn to_token(&self, codec: &StateCodec) -> Result<Token, EncodeError> {
        let mut compacted = self.clone();
        compacted.compact();
        codec.encode(&compacted)
    }

    /// Decode a permalink token, tolerating wrong shapes inside it.
    pub fn from_token(
        token: &str,
        codec: &StateCodec,
        config: &EngineConfig,
    ) -> Result<Self, DecodeError> {
        let value: Value = codec.decode_any(token)?;
        Ok(Self::from_value(&value, config))
    }

    /// [`AppState::from_token`] that falls back to the default state.
    ///
    /// A bad link must not block the page; the failure is logged and dropped.
    pub fn from_token_or_default(token: &str, codec: &StateCodec, config: &EngineConfig) -> Self {
        match Self::from_token(token, codec, config) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(%error, "discarding undecodable state token");
                Self {
                    available_groups: config.min_groups,
                    ..Self::default()
                }
            }
        }
    }
}
