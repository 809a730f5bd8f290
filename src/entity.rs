// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Accessor sets: how the engine reads an entity.
//!
//! Roles, policies and actions all go through the same field search, index
//! and composite searcher. Instead of a shared base type, each entity shape
//! hands the engine three plain functions: one for the stable identifier, one
//! for the display name, one for the multi-valued attribute (permissions,
//! actions). Everything else is generic over `T`.

use crate::types::{Action, Policy, Role, FIELD_ACTIONS, FIELD_PERMISSIONS};

/// The functions the engine uses to read fields out of a `T`.
pub struct Accessors<T> {
    /// Stable identifier. Unique within a dataset.
    pub id: fn(&T) -> &str,
    /// Display name.
    pub name: fn(&T) -> &str,
    /// Multi-valued attribute. May be empty.
    pub attributes: fn(&T) -> &[String],
    /// Field key recorded on attribute matches.
    pub attribute_key: &'static str,
}

// Manual impls: derive would demand `T: Clone`.
impl<T> Clone for Accessors<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessors<T> {}

impl<T> std::fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessors")
            .field("attribute_key", &self.attribute_key)
            .finish_non_exhaustive()
    }
}

fn no_attributes<T>(_: &T) -> &[String] {
    &[]
}

fn role_id(role: &Role) -> &str {
    &role.id
}

fn role_name(role: &Role) -> &str {
    &role.name
}

fn role_permissions(role: &Role) -> &[String] {
    &role.permissions
}

impl Role {
    /// id, name, permissions.
    pub fn accessors() -> Accessors<Role> {
        Accessors {
            id: role_id,
            name: role_name,
            attributes: role_permissions,
            attribute_key: FIELD_PERMISSIONS,
        }
    }
}

fn policy_key(policy: &Policy) -> &str {
    &policy.key
}

fn policy_name(policy: &Policy) -> &str {
    &policy.name
}

fn policy_actions(policy: &Policy) -> &[String] {
    &policy.effective_action_names
}

impl Policy {
    /// key, name, effective action names.
    pub fn accessors() -> Accessors<Policy> {
        Accessors {
            id: policy_key,
            name: policy_name,
            attributes: policy_actions,
            attribute_key: FIELD_ACTIONS,
        }
    }
}

fn action_key(action: &Action) -> &str {
    &action.key
}

fn action_description(action: &Action) -> &str {
    &action.description
}

impl Action {
    /// key, description. Actions carry no searchable attribute list.
    pub fn accessors() -> Accessors<Action> {
        Accessors {
            id: action_key,
            name: action_description,
            attributes: no_attributes::<Action>,
            attribute_key: FIELD_PERMISSIONS,
        }
    }
}
