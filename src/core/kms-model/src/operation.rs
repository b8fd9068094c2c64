//! The fixed catalogue of remote operations.
//!
//! Every surface of the client (the [`Operation`] enum, the request/result
//! pairing, the sync and async traits and their adapters) is generated from
//! the single table in [`for_each_operation!`](crate::for_each_operation).

use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorKind, KmsError};

/// Expands `$callback! { ... }` with one row per remote operation.
///
/// Row layout:
///
/// ```text
/// (Variant, method_name, RequestType, ResultType, [ErrorKind, ...], "summary")
/// ```
///
/// The error list is the set of remote rejections the service documents for
/// that operation.
#[macro_export]
macro_rules! for_each_operation {
    ($callback:ident) => {
        $callback! {
            (CancelKeyDeletion, cancel_key_deletion, CancelKeyDeletionRequest, CancelKeyDeletionResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Cancels the pending deletion of a key. The key is left disabled."),
            (CreateAlias, create_alias, CreateAliasRequest, CreateAliasResult,
                [DependencyTimeout, AlreadyExists, NotFound, InvalidAliasName, KmsInternal, LimitExceeded, KmsInvalidState],
                "Creates a display name for a key."),
            (CreateGrant, create_grant, CreateGrantRequest, CreateGrantResult,
                [NotFound, Disabled, DependencyTimeout, InvalidArn, KmsInternal, InvalidGrantToken, LimitExceeded, KmsInvalidState],
                "Adds a grant to a key, delegating a subset of operations to a principal."),
            (CreateKey, create_key, CreateKeyRequest, CreateKeyResult,
                [MalformedPolicyDocument, DependencyTimeout, InvalidArn, UnsupportedOperation, KmsInternal, LimitExceeded, Tag],
                "Creates a customer master key."),
            (Decrypt, decrypt, DecryptRequest, DecryptResult,
                [NotFound, Disabled, InvalidCiphertext, KeyUnavailable, DependencyTimeout, InvalidGrantToken, KmsInternal, KmsInvalidState],
                "Decrypts ciphertext produced by `Encrypt`, `GenerateDataKey` or `ReEncrypt`."),
            (DeleteAlias, delete_alias, DeleteAliasRequest, DeleteAliasResult,
                [DependencyTimeout, NotFound, KmsInternal, KmsInvalidState],
                "Deletes an alias."),
            (DeleteImportedKeyMaterial, delete_imported_key_material, DeleteImportedKeyMaterialRequest, DeleteImportedKeyMaterialResult,
                [InvalidArn, UnsupportedOperation, DependencyTimeout, NotFound, KmsInternal, KmsInvalidState],
                "Deletes imported key material, leaving the key pending import."),
            (DescribeKey, describe_key, DescribeKeyRequest, DescribeKeyResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal],
                "Returns metadata about a key."),
            (DisableKey, disable_key, DisableKeyRequest, DisableKeyResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Disables a key so it cannot be used for cryptographic operations."),
            (DisableKeyRotation, disable_key_rotation, DisableKeyRotationRequest, DisableKeyRotationResult,
                [NotFound, Disabled, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState, UnsupportedOperation],
                "Disables automatic rotation of the key material."),
            (EnableKey, enable_key, EnableKeyRequest, EnableKeyResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, LimitExceeded, KmsInvalidState],
                "Marks a key as enabled."),
            (EnableKeyRotation, enable_key_rotation, EnableKeyRotationRequest, EnableKeyRotationResult,
                [NotFound, Disabled, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState, UnsupportedOperation],
                "Enables automatic rotation of the key material."),
            (Encrypt, encrypt, EncryptRequest, EncryptResult,
                [NotFound, Disabled, KeyUnavailable, DependencyTimeout, InvalidKeyUsage, InvalidGrantToken, KmsInternal, KmsInvalidState],
                "Encrypts plaintext under a key."),
            (GenerateDataKey, generate_data_key, GenerateDataKeyRequest, GenerateDataKeyResult,
                [NotFound, Disabled, KeyUnavailable, DependencyTimeout, InvalidKeyUsage, InvalidGrantToken, KmsInternal, KmsInvalidState],
                "Generates a data key, returned in plaintext and encrypted under the key."),
            (GenerateDataKeyWithoutPlaintext, generate_data_key_without_plaintext, GenerateDataKeyWithoutPlaintextRequest, GenerateDataKeyWithoutPlaintextResult,
                [NotFound, Disabled, KeyUnavailable, DependencyTimeout, InvalidKeyUsage, InvalidGrantToken, KmsInternal, KmsInvalidState],
                "Generates a data key, returned only encrypted under the key."),
            (GenerateRandom, generate_random, GenerateRandomRequest, GenerateRandomResult,
                [DependencyTimeout, KmsInternal],
                "Returns a random byte string."),
            (GetKeyPolicy, get_key_policy, GetKeyPolicyRequest, GetKeyPolicyResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Retrieves a key policy."),
            (GetKeyRotationStatus, get_key_rotation_status, GetKeyRotationStatusRequest, GetKeyRotationStatusResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState, UnsupportedOperation],
                "Reports whether automatic key rotation is enabled."),
            (GetParametersForImport, get_parameters_for_import, GetParametersForImportRequest, GetParametersForImportResult,
                [InvalidArn, UnsupportedOperation, DependencyTimeout, NotFound, KmsInternal, KmsInvalidState],
                "Returns the wrapping public key and import token needed to import key material."),
            (ImportKeyMaterial, import_key_material, ImportKeyMaterialRequest, ImportKeyMaterialResult,
                [InvalidArn, UnsupportedOperation, DependencyTimeout, NotFound, KmsInternal, KmsInvalidState, InvalidCiphertext, IncorrectKeyMaterial, ExpiredImportToken, InvalidImportToken],
                "Imports wrapped key material into a key created with an external origin."),
            (ListAliases, list_aliases, ListAliasesRequest, ListAliasesResult,
                [DependencyTimeout, InvalidMarker, KmsInternal],
                "Lists the aliases in the account and region."),
            (ListGrants, list_grants, ListGrantsRequest, ListGrantsResult,
                [NotFound, DependencyTimeout, InvalidMarker, InvalidArn, KmsInternal, KmsInvalidState],
                "Lists the grants on a key."),
            (ListKeyPolicies, list_key_policies, ListKeyPoliciesRequest, ListKeyPoliciesResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Lists the names of the policies attached to a key."),
            (ListKeys, list_keys, ListKeysRequest, ListKeysResult,
                [DependencyTimeout, KmsInternal, InvalidMarker],
                "Lists the keys in the account and region."),
            (ListResourceTags, list_resource_tags, ListResourceTagsRequest, ListResourceTagsResult,
                [KmsInternal, NotFound, InvalidArn, InvalidMarker],
                "Lists the tags on a key."),
            (ListRetirableGrants, list_retirable_grants, ListRetirableGrantsRequest, ListRetirableGrantsResult,
                [DependencyTimeout, InvalidMarker, InvalidArn, NotFound, KmsInternal],
                "Lists the grants a principal is allowed to retire."),
            (PutKeyPolicy, put_key_policy, PutKeyPolicyRequest, PutKeyPolicyResult,
                [NotFound, InvalidArn, MalformedPolicyDocument, DependencyTimeout, UnsupportedOperation, KmsInternal, LimitExceeded, KmsInvalidState],
                "Attaches a policy document to a key."),
            (ReEncrypt, re_encrypt, ReEncryptRequest, ReEncryptResult,
                [NotFound, Disabled, InvalidCiphertext, KeyUnavailable, DependencyTimeout, InvalidKeyUsage, InvalidGrantToken, KmsInternal, KmsInvalidState],
                "Decrypts ciphertext and re-encrypts it under another key, server side."),
            (RetireGrant, retire_grant, RetireGrantRequest, RetireGrantResult,
                [InvalidArn, InvalidGrantToken, InvalidGrantId, NotFound, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Retires a grant, identified by token or by key and grant id."),
            (RevokeGrant, revoke_grant, RevokeGrantRequest, RevokeGrantResult,
                [NotFound, DependencyTimeout, InvalidArn, InvalidGrantId, KmsInternal, KmsInvalidState],
                "Revokes a grant."),
            (ScheduleKeyDeletion, schedule_key_deletion, ScheduleKeyDeletionRequest, ScheduleKeyDeletionResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Schedules the deletion of a key after a waiting period."),
            (TagResource, tag_resource, TagResourceRequest, TagResourceResult,
                [KmsInternal, NotFound, InvalidArn, KmsInvalidState, LimitExceeded, Tag],
                "Adds or overwrites tags on a key."),
            (UntagResource, untag_resource, UntagResourceRequest, UntagResourceResult,
                [KmsInternal, NotFound, InvalidArn, KmsInvalidState, Tag],
                "Removes tags from a key."),
            (UpdateAlias, update_alias, UpdateAliasRequest, UpdateAliasResult,
                [DependencyTimeout, NotFound, KmsInternal, KmsInvalidState],
                "Points an existing alias at a different key."),
            (UpdateKeyDescription, update_key_description, UpdateKeyDescriptionRequest, UpdateKeyDescriptionResult,
                [NotFound, InvalidArn, DependencyTimeout, KmsInternal, KmsInvalidState],
                "Replaces the description of a key."),
        }
    };
}

/// Service target prefix carried in the `X-Amz-Target` header.
pub const TARGET_PREFIX: &str = "TrentService";

macro_rules! define_operations {
    ($( ($variant:ident, $method:ident, $req:ident, $res:ident, [$($err:ident),* $(,)?], $doc:literal) ),* $(,)?) => {
        /// A remote operation exposed by the service.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Operation {
            $(
                #[doc = $doc]
                $variant,
            )*
        }

        impl Operation {
            /// Every operation, in catalogue order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant),*];

            /// Wire name of the operation (`"CreateKey"`).
            pub const fn name(self) -> &'static str {
                match self {
                    $(Operation::$variant => stringify!($variant),)*
                }
            }

            /// Remote rejections the service documents for this operation.
            pub fn error_kinds(self) -> &'static [ErrorKind] {
                match self {
                    $(Operation::$variant => &[$(ErrorKind::$err),*],)*
                }
            }

            /// One-line description of what the operation does.
            pub const fn summary(self) -> &'static str {
                match self {
                    $(Operation::$variant => $doc,)*
                }
            }
        }
    };
}

crate::for_each_operation!(define_operations);

impl Operation {
    /// Value of the `X-Amz-Target` header (`"TrentService.CreateKey"`).
    pub fn target(self) -> String {
        format!("{}.{}", TARGET_PREFIX, self.name())
    }

    /// Returns true if `kind` is among the documented rejections of this operation.
    pub fn may_fail_with(self, kind: ErrorKind) -> bool {
        self.error_kinds().contains(&kind)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = KmsError;

    /// Accepts the wire name, optionally prefixed by the service target.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s
            .strip_prefix(TARGET_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);

        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| KmsError::Configuration(format!("unknown operation: {s}")))
    }
}
