//! Shared test utilities and fixtures.

#![allow(dead_code)]

use iamlens::{Role, SearchOutcome, Searcher};

// ============================================================================
// ROLE FIXTURES
// ============================================================================

/// The two-role catalog used by the end-to-end examples.
pub fn sample_roles() -> Vec<Role> {
    vec![
        Role::new(
            "a.viewer",
            "A Viewer",
            vec!["a.get".to_string(), "a.list".to_string()],
        ),
        Role::new(
            "b.admin",
            "B Admin",
            vec!["b.get".to_string(), "b.delete".to_string()],
        ),
    ]
}

/// A slice of the GCP catalog with overlapping permissions.
pub fn gcp_roles() -> Vec<Role> {
    let perms = |list: &[&str]| list.iter().map(|p| p.to_string()).collect::<Vec<_>>();
    vec![
        Role::new(
            "compute.viewer",
            "Compute Viewer",
            perms(&["compute.instances.get", "compute.instances.list"]),
        ),
        Role::new(
            "storage.admin",
            "Storage Admin",
            perms(&[
                "storage.buckets.create",
                "storage.buckets.delete",
                "storage.buckets.get",
                "storage.buckets.list",
                "storage.objects.get",
            ]),
        ),
        Role::new(
            "storage.objectViewer",
            "Storage Object Viewer",
            perms(&["storage.objects.get", "storage.objects.list"]),
        ),
        Role::new("viewer", "Viewer", perms(&["storage.buckets.list"])),
    ]
}

/// A role with more matching permissions than the preview shows.
pub fn wide_role(permissions: usize) -> Role {
    Role::new(
        "wide.admin",
        "Wide Admin",
        (0..permissions)
            .map(|n| format!("wide.resource{}.get", n))
            .collect(),
    )
}

pub fn sample_searcher() -> Searcher<Role> {
    Searcher::new(sample_roles(), Role::accessors())
}

pub fn gcp_searcher() -> Searcher<Role> {
    Searcher::new(gcp_roles(), Role::accessors())
}

/// Ids of the results, in result order.
pub fn result_ids<'a>(outcome: &SearchOutcome<'a, Role>) -> Vec<&'a str> {
    outcome.results.iter().map(|r| r.item.id.as_str()).collect()
}

// ============================================================================
// DATASET DOCUMENTS
// ============================================================================

/// GCP `role_permissions.json` shape: permission -> roles granting it.
pub const ROLE_PERMISSIONS_JSON: &str = r#"{
    "storage.buckets.get": [
        {"id": "roles/storage.admin", "name": "Storage Admin"},
        {"id": "roles/viewer", "name": "Viewer"}
    ],
    "storage.objects.get": [
        {"id": "roles/storage.objectViewer", "name": "Storage Object Viewer"},
        {"id": "roles/storage.admin", "name": "Storage Admin"}
    ],
    "compute.instances.get": [
        {"id": "roles/compute.viewer", "name": "Compute Viewer"},
        {"id": "roles/viewer", "name": "Viewer"}
    ]
}"#;

/// AWS managed policies keyed by name.
pub const POLICIES_JSON: &str = r#"{
    "AmazonS3ReadOnlyAccess": {
        "name": "AmazonS3ReadOnlyAccess",
        "arn": "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess",
        "version": "v3",
        "deprecated": false,
        "effective_action_names": ["s3:ListBucket", "s3:GetObject"]
    },
    "AmazonEC2ReadOnlyAccess": {
        "name": "AmazonEC2ReadOnlyAccess",
        "effective_action_names": ["ec2:DescribeInstances", "s3:GetObject"]
    }
}"#;

/// AWS actions keyed by `service:Action`.
pub const ACTIONS_JSON: &str = r#"{
    "s3:GetObject": {
        "action": "GetObject",
        "description": "Grants permission to retrieve objects from Amazon S3",
        "privilege": "GetObject",
        "resource_types": [{"resource_type": "object*"}]
    },
    "ec2:DescribeInstances": {
        "description": "Grants permission to describe one or more instances"
    }
}"#;
