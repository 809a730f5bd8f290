// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dataset loading.
//!
//! Upstream datasets are JSON objects keyed by an identifier. Each loader
//! turns one into a sorted `Vec` of typed records:
//!
//! | Loader          | Input shape                                  |
//! |-----------------|----------------------------------------------|
//! | `load_roles`    | permission -> `[{id, name}, ...]`            |
//! | `load_policies` | policy name -> `{name, effective_action_names, ...}` |
//! | `load_actions`  | `service:Action` -> `{description, ...}`     |
//!
//! Roles arrive transposed (by permission) and are folded back into one
//! record per role. A document whose top level is not an object is refused.
//! Individual records with the wrong shape are skipped and counted, since one
//! bad entry upstream should not take the whole catalog down.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{json_kind, DataShapeError};
use crate::types::{Action, Policy, Role, ROLE_PREFIX};

/// Loaded records plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset<T> {
    pub items: Vec<T>,
    pub report: LoadReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records (or role references) skipped for having the wrong shape.
    pub skipped: usize,
}

fn parse_object(json: &str) -> Result<Map<String, Value>, DataShapeError> {
    match serde_json::from_str(json)? {
        Value::Object(map) => Ok(map),
        other => Err(DataShapeError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Strip the `roles/` prefix; identifiers without it are kept whole.
fn short_role_id(id: &str) -> &str {
    id.strip_prefix(ROLE_PREFIX).unwrap_or(id)
}

// =============================================================================
// ROLES
// =============================================================================

/// Fold a permission-to-roles mapping into one record per role.
///
/// The first name seen for a role wins. Permissions keep input order.
pub fn load_roles(json: &str) -> Result<Dataset<Role>, DataShapeError> {
    let document = parse_object(json)?;
    let mut roles: BTreeMap<String, Role> = BTreeMap::new();
    let mut report = LoadReport::default();

    for (permission, refs) in &document {
        let Some(refs) = refs.as_array() else {
            report.skipped += 1;
            continue;
        };
        for role_ref in refs {
            let fields = role_ref
                .as_object()
                .and_then(|obj| Some((string_field(obj, "id")?, string_field(obj, "name")?)));
            let Some((id, name)) = fields else {
                report.skipped += 1;
                continue;
            };
            let id = short_role_id(&id).to_string();
            roles
                .entry(id.clone())
                .or_insert_with(|| Role::new(id, name, Vec::new()))
                .permissions
                .push(permission.clone());
        }
    }

    tracing::info!(
        roles = roles.len(),
        permissions = document.len(),
        skipped = report.skipped,
        "loaded role dataset"
    );
    Ok(Dataset {
        items: roles.into_values().collect(),
        report,
    })
}

// =============================================================================
// POLICIES
// =============================================================================

/// Load managed policies keyed by policy name.
pub fn load_policies(json: &str) -> Result<Dataset<Policy>, DataShapeError> {
    let document = parse_object(json)?;
    let mut report = LoadReport::default();
    let mut items = Vec::with_capacity(document.len());

    for (key, value) in document {
        let Some(obj) = value.as_object() else {
            report.skipped += 1;
            continue;
        };
        if !obj.get("effective_action_names").is_some_and(Value::is_array) {
            report.skipped += 1;
            continue;
        }
        let mut actions = string_list(obj.get("effective_action_names"));
        actions.sort();
        items.push(Policy {
            name: string_field(obj, "name").unwrap_or_else(|| key.clone()),
            arn: string_field(obj, "arn"),
            version: string_field(obj, "version"),
            deprecated: obj.get("deprecated").and_then(Value::as_bool).unwrap_or(false),
            effective_action_names: actions,
            key,
        });
    }

    // serde_json maps are ordered by key unless preserve_order is enabled
    items.sort_by(|a, b| a.key.cmp(&b.key));
    tracing::info!(policies = items.len(), skipped = report.skipped, "loaded policy dataset");
    Ok(Dataset { items, report })
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Load IAM actions keyed by `service:Action`.
///
/// `resource_types` upstream is a list of objects; only their
/// `resource_type` names are kept. Plain strings are accepted too.
pub fn load_actions(json: &str) -> Result<Dataset<Action>, DataShapeError> {
    let document = parse_object(json)?;
    let mut report = LoadReport::default();
    let mut items = Vec::with_capacity(document.len());

    for (key, value) in document {
        let Some(obj) = value.as_object() else {
            report.skipped += 1;
            continue;
        };
        let resource_types = obj
            .get("resource_types")
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(|t| match t {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(o) => string_field(o, "resource_type"),
                        _ => None,
                    })
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        items.push(Action {
            description: string_field(obj, "description").unwrap_or_default(),
            privilege: string_field(obj, "privilege"),
            resource_types,
            key,
        });
    }

    items.sort_by(|a, b| a.key.cmp(&b.key));
    tracing::info!(actions = items.len(), skipped = report.skipped, "loaded action dataset");
    Ok(Dataset { items, report })
}

// =============================================================================
// FILES
// =============================================================================

pub fn load_roles_from_path(path: impl AsRef<Path>) -> Result<Dataset<Role>, DataShapeError> {
    load_roles(&fs::read_to_string(path)?)
}

pub fn load_policies_from_path(path: impl AsRef<Path>) -> Result<Dataset<Policy>, DataShapeError> {
    load_policies(&fs::read_to_string(path)?)
}

pub fn load_actions_from_path(path: impl AsRef<Path>) -> Result<Dataset<Action>, DataShapeError> {
    load_actions(&fs::read_to_string(path)?)
}
