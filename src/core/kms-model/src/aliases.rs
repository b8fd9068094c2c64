//! Alias operations.

use serde::{Deserialize, Serialize};

use crate::keys::empty_result;
use crate::types::AliasListEntry;

/// Input of `CreateAlias`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateAliasRequest {
    /// Alias name, must start with `alias/`.
    pub alias_name: String,
    /// Key the alias points at.
    pub target_key_id: String,
}

empty_result!(
    /// Output of `CreateAlias`.
    CreateAliasResult
);

/// Input of `DeleteAlias`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DeleteAliasRequest {
    /// Alias name, `alias/...`.
    pub alias_name: String,
}

empty_result!(
    /// Output of `DeleteAlias`.
    DeleteAliasResult
);

/// Input of `UpdateAlias`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UpdateAliasRequest {
    /// Alias name, `alias/...`.
    pub alias_name: String,
    /// New target key.
    pub target_key_id: String,
}

empty_result!(
    /// Output of `UpdateAlias`.
    UpdateAliasResult
);

/// Input of `ListAliases`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListAliasesRequest {
    /// Maximum number of entries to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `NextMarker` of a previous truncated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Output of `ListAliases`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListAliasesResult {
    /// Aliases on this page.
    pub aliases: Vec<AliasListEntry>,
    /// Marker for the next page, present when `truncated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more entries are available.
    pub truncated: bool,
}
