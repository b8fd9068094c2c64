//! Key lifecycle operations.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::codec::epoch;
use crate::types::{KeyListEntry, KeyMetadata, KeyUsageType, OriginType, Tag};

/// Declares a request whose only input is the key identifier.
macro_rules! key_id_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(default, rename_all = "PascalCase")]
        pub struct $name {
            /// Key id, key ARN, alias name or alias ARN.
            pub key_id: String,
        }

        impl $name {
            /// Creates a request for the given key.
            pub fn new(key_id: impl Into<String>) -> Self {
                Self {
                    key_id: key_id.into(),
                }
            }
        }
    };
}

/// Declares a result with no fields.
macro_rules! empty_result {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct $name {}
    };
}

pub(crate) use {empty_result, key_id_request};

/// Input of `CreateKey`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateKeyRequest {
    /// Key policy document; the service applies a default policy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Intended use of the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<KeyUsageType>,
    /// Source of the key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginType>,
    /// Skips the check that the policy does not lock the caller out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_policy_lockout_safety_check: Option<bool>,
    /// Tags applied at creation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Output of `CreateKey`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateKeyResult {
    /// Metadata of the new key.
    pub key_metadata: KeyMetadata,
}

/// Input of `DescribeKey`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DescribeKeyRequest {
    /// Key id, key ARN, alias name or alias ARN.
    pub key_id: String,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

impl DescribeKeyRequest {
    /// Creates a request for the given key.
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            grant_tokens: Vec::new(),
        }
    }
}

/// Output of `DescribeKey`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DescribeKeyResult {
    /// Metadata of the key.
    pub key_metadata: KeyMetadata,
}

key_id_request!(
    /// Input of `EnableKey`.
    EnableKeyRequest
);
empty_result!(
    /// Output of `EnableKey`.
    EnableKeyResult
);

key_id_request!(
    /// Input of `DisableKey`.
    DisableKeyRequest
);
empty_result!(
    /// Output of `DisableKey`.
    DisableKeyResult
);

key_id_request!(
    /// Input of `EnableKeyRotation`.
    EnableKeyRotationRequest
);
empty_result!(
    /// Output of `EnableKeyRotation`.
    EnableKeyRotationResult
);

key_id_request!(
    /// Input of `DisableKeyRotation`.
    DisableKeyRotationRequest
);
empty_result!(
    /// Output of `DisableKeyRotation`.
    DisableKeyRotationResult
);

key_id_request!(
    /// Input of `GetKeyRotationStatus`.
    GetKeyRotationStatusRequest
);

/// Output of `GetKeyRotationStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetKeyRotationStatusResult {
    /// Whether automatic rotation is enabled.
    pub key_rotation_enabled: bool,
}

/// Input of `ScheduleKeyDeletion`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ScheduleKeyDeletionRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Waiting period, 7 to 30 days. The service defaults to 30.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_window_in_days: Option<u32>,
}

/// Output of `ScheduleKeyDeletion`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ScheduleKeyDeletionResult {
    /// ARN of the key.
    pub key_id: String,
    /// When the key will be deleted.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<SystemTime>,
}

key_id_request!(
    /// Input of `CancelKeyDeletion`.
    CancelKeyDeletionRequest
);

/// Output of `CancelKeyDeletion`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CancelKeyDeletionResult {
    /// ARN of the key whose deletion was cancelled.
    pub key_id: String,
}

/// Input of `UpdateKeyDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UpdateKeyDescriptionRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// New description.
    pub description: String,
}

empty_result!(
    /// Output of `UpdateKeyDescription`.
    UpdateKeyDescriptionResult
);

/// Input of `ListKeys`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListKeysRequest {
    /// Maximum number of entries to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `NextMarker` of a previous truncated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Output of `ListKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListKeysResult {
    /// Keys on this page.
    pub keys: Vec<KeyListEntry>,
    /// Marker for the next page, present when `truncated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more entries are available.
    pub truncated: bool,
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_create_key_request_is_empty_object() {
        let json = serde_json::to_value(CreateKeyRequest::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn test_create_key_request_wire_shape() {
        let req = CreateKeyRequest {
            description: Some("payments".into()),
            key_usage: Some(KeyUsageType::EncryptDecrypt),
            tags: vec![Tag::new("team", "billing")],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({
                "Description": "payments",
                "KeyUsage": "ENCRYPT_DECRYPT",
                "Tags": [{ "TagKey": "team", "TagValue": "billing" }]
            })
        );
    }

    #[test]
    fn test_key_id_request_constructor() {
        let req = DisableKeyRequest::new("alias/app");
        assert_eq!(serde_json::to_value(req).unwrap(), json!({ "KeyId": "alias/app" }));
    }

    #[test]
    fn test_empty_result_accepts_empty_object() {
        let result: EnableKeyResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result, EnableKeyResult {});
    }

    #[test]
    fn test_list_keys_result_pagination_fields() {
        let result: ListKeysResult = serde_json::from_value(json!({
            "Keys": [{ "KeyId": "k1", "KeyArn": "arn:k1" }],
            "NextMarker": "m2",
            "Truncated": true
        }))
        .unwrap();
        assert_eq!(result.keys.len(), 1);
        assert_eq!(result.next_marker.as_deref(), Some("m2"));
        assert!(result.truncated);
    }
}
