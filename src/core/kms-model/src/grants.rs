//! Grant operations.

use serde::{Deserialize, Serialize};

use crate::keys::empty_result;
use crate::types::{GrantConstraints, GrantListEntry, GrantOperation};

/// Input of `CreateGrant`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateGrantRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Principal receiving the permissions.
    pub grantee_principal: String,
    /// Principal allowed to retire the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retiring_principal: Option<String>,
    /// Operations the grant permits.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<GrantOperation>,
    /// Conditions restricting the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<GrantConstraints>,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
    /// Friendly name; reusing a name makes the call idempotent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Output of `CreateGrant`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateGrantResult {
    /// Token usable before the grant is fully propagated.
    pub grant_token: String,
    /// Grant identifier.
    pub grant_id: String,
}

/// Input of `ListGrants`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListGrantsRequest {
    /// Maximum number of entries to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `NextMarker` of a previous truncated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Key id or key ARN.
    pub key_id: String,
}

/// Output of `ListGrants`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListGrantsResult {
    /// Grants on this page.
    pub grants: Vec<GrantListEntry>,
    /// Marker for the next page, present when `truncated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more entries are available.
    pub truncated: bool,
}

/// Input of `ListRetirableGrants`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListRetirableGrantsRequest {
    /// Maximum number of entries to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `NextMarker` of a previous truncated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Principal whose retirable grants are listed.
    pub retiring_principal: String,
}

/// Output of `ListRetirableGrants`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListRetirableGrantsResult {
    /// Grants on this page.
    pub grants: Vec<GrantListEntry>,
    /// Marker for the next page, present when `truncated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more entries are available.
    pub truncated: bool,
}

/// Input of `RetireGrant`.
///
/// Identify the grant either by `grant_token`, or by `key_id` and `grant_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RetireGrantRequest {
    /// Token of the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_token: Option<String>,
    /// ARN of the key the grant applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Grant identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_id: Option<String>,
}

empty_result!(
    /// Output of `RetireGrant`.
    RetireGrantResult
);

/// Input of `RevokeGrant`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RevokeGrantRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Grant identifier.
    pub grant_id: String,
}

empty_result!(
    /// Output of `RevokeGrant`.
    RevokeGrantResult
);
