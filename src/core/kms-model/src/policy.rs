//! Key policy operations.

use serde::{Deserialize, Serialize};

use crate::keys::empty_result;

/// Name of the only policy a key carries.
pub const DEFAULT_POLICY_NAME: &str = "default";

/// Input of `GetKeyPolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetKeyPolicyRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Policy name, always [`DEFAULT_POLICY_NAME`].
    pub policy_name: String,
}

impl GetKeyPolicyRequest {
    /// Creates a request for the default policy of `key_id`.
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            policy_name: DEFAULT_POLICY_NAME.to_string(),
        }
    }
}

/// Output of `GetKeyPolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetKeyPolicyResult {
    /// Policy document (JSON).
    pub policy: String,
}

/// Input of `PutKeyPolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PutKeyPolicyRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Policy name, always [`DEFAULT_POLICY_NAME`].
    pub policy_name: String,
    /// Policy document (JSON).
    pub policy: String,
    /// Skips the check that the policy does not lock the caller out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_policy_lockout_safety_check: Option<bool>,
}

empty_result!(
    /// Output of `PutKeyPolicy`.
    PutKeyPolicyResult
);

/// Input of `ListKeyPolicies`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListKeyPoliciesRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Maximum number of entries to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `NextMarker` of a previous truncated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Output of `ListKeyPolicies`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListKeyPoliciesResult {
    /// Policy names on this page.
    pub policy_names: Vec<String>,
    /// Marker for the next page, present when `truncated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more entries are available.
    pub truncated: bool,
}
