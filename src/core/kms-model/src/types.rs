//! Value types shared by several operations.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::codec::epoch;

/// Cryptographic operations a key can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyUsageType {
    /// Symmetric encryption and decryption.
    #[default]
    EncryptDecrypt,
}

/// Source of a key's material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginType {
    /// Material generated by the service.
    #[default]
    AwsKms,
    /// Material imported by the caller.
    External,
}

/// Lifecycle state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// Usable for cryptographic operations.
    Enabled,
    /// Disabled by its owner.
    Disabled,
    /// Scheduled for deletion.
    PendingDeletion,
    /// Waiting for imported key material.
    PendingImport,
}

/// Whether imported key material expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationModelType {
    /// Material expires at `ValidTo`.
    KeyMaterialExpires,
    /// Material never expires.
    KeyMaterialDoesNotExpire,
}

/// Length of a generated data key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKeySpec {
    /// 256-bit AES key.
    #[serde(rename = "AES_256")]
    Aes256,
    /// 128-bit AES key.
    #[serde(rename = "AES_128")]
    Aes128,
}

impl DataKeySpec {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes256 => 32,
            Self::Aes128 => 16,
        }
    }
}

/// Operations a grant can permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantOperation {
    /// `Decrypt`.
    Decrypt,
    /// `Encrypt`.
    Encrypt,
    /// `GenerateDataKey`.
    GenerateDataKey,
    /// `GenerateDataKeyWithoutPlaintext`.
    GenerateDataKeyWithoutPlaintext,
    /// `ReEncrypt` with this key as source.
    ReEncryptFrom,
    /// `ReEncrypt` with this key as destination.
    ReEncryptTo,
    /// `CreateGrant`.
    CreateGrant,
    /// `RetireGrant`.
    RetireGrant,
    /// `DescribeKey`.
    DescribeKey,
}

/// Algorithm used to wrap key material for import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmSpec {
    /// RSA PKCS #1 v1.5.
    #[serde(rename = "RSAES_PKCS1_V1_5")]
    RsaesPkcs1V15,
    /// RSA OAEP with SHA-1.
    #[serde(rename = "RSAES_OAEP_SHA_1")]
    RsaesOaepSha1,
    /// RSA OAEP with SHA-256.
    #[serde(rename = "RSAES_OAEP_SHA_256")]
    RsaesOaepSha256,
}

/// Type of the public key returned for wrapping imported material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrappingKeySpec {
    /// 2048-bit RSA.
    #[serde(rename = "RSA_2048")]
    Rsa2048,
}

/// Encryption context: non-secret key/value pairs bound to a ciphertext.
pub type EncryptionContext = BTreeMap<String, String>;

/// Metadata describing a key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyMetadata {
    /// Owning account.
    #[serde(rename = "AWSAccountId", skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// Globally unique key identifier.
    pub key_id: String,
    /// Key ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    /// Creation time.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<SystemTime>,
    /// Whether the key is enabled.
    pub enabled: bool,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// What the key may be used for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<KeyUsageType>,
    /// Lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_state: Option<KeyState>,
    /// When the key will be deleted, if scheduled.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<SystemTime>,
    /// When imported material expires.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<SystemTime>,
    /// Source of the key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginType>,
    /// Expiration model of imported material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_model: Option<ExpirationModelType>,
}

/// A key/value tag on a key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub tag_key: String,
    /// Tag value.
    pub tag_value: String,
}

impl Tag {
    /// Creates a tag.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag_key: key.into(),
            tag_value: value.into(),
        }
    }
}

/// An entry of `ListAliases`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AliasListEntry {
    /// Alias name, `alias/...`.
    pub alias_name: String,
    /// Alias ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_arn: Option<String>,
    /// Key the alias points at, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key_id: Option<String>,
}

/// An entry of `ListKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyListEntry {
    /// Key identifier.
    pub key_id: String,
    /// Key ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_arn: Option<String>,
}

/// Conditions under which a grant applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GrantConstraints {
    /// The request context must contain these pairs.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context_subset: EncryptionContext,
    /// The request context must equal these pairs.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context_equals: EncryptionContext,
}

/// An entry of `ListGrants` / `ListRetirableGrants`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GrantListEntry {
    /// Key the grant applies to.
    pub key_id: String,
    /// Grant identifier.
    pub grant_id: String,
    /// Friendly name given at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<SystemTime>,
    /// Principal receiving the permissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grantee_principal: Option<String>,
    /// Principal allowed to retire the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retiring_principal: Option<String>,
    /// Account that created the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_account: Option<String>,
    /// Permitted operations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<GrantOperation>,
    /// Conditions of the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<GrantConstraints>,
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(KeyUsageType::EncryptDecrypt).unwrap(),
            "ENCRYPT_DECRYPT"
        );
        assert_eq!(serde_json::to_value(OriginType::AwsKms).unwrap(), "AWS_KMS");
        assert_eq!(serde_json::to_value(DataKeySpec::Aes128).unwrap(), "AES_128");
        assert_eq!(
            serde_json::to_value(AlgorithmSpec::RsaesOaepSha256).unwrap(),
            "RSAES_OAEP_SHA_256"
        );
        assert_eq!(
            serde_json::to_value(KeyState::PendingDeletion).unwrap(),
            "PendingDeletion"
        );
        assert_eq!(
            serde_json::to_value(ExpirationModelType::KeyMaterialDoesNotExpire).unwrap(),
            "KEY_MATERIAL_DOES_NOT_EXPIRE"
        );
    }

    #[test]
    fn test_key_metadata_from_service_json() {
        let json = serde_json::json!({
            "AWSAccountId": "111122223333",
            "KeyId": "1234abcd-12ab-34cd-56ef-1234567890ab",
            "Arn": "arn:aws:kms:us-east-1:111122223333:key/1234abcd-12ab-34cd-56ef-1234567890ab",
            "CreationDate": 1500000000.0,
            "Enabled": true,
            "Description": "",
            "KeyUsage": "ENCRYPT_DECRYPT",
            "KeyState": "Enabled",
            "Origin": "AWS_KMS"
        });

        let meta: KeyMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(meta.aws_account_id.as_deref(), Some("111122223333"));
        assert_eq!(meta.key_id, "1234abcd-12ab-34cd-56ef-1234567890ab");
        assert_eq!(
            meta.creation_date,
            Some(UNIX_EPOCH + Duration::from_secs(1_500_000_000))
        );
        assert!(meta.enabled);
        assert_eq!(meta.key_state, Some(KeyState::Enabled));
        assert_eq!(meta.origin, Some(OriginType::AwsKms));
        assert_eq!(meta.deletion_date, None);
    }

    #[test]
    fn test_empty_constraints_serialize_to_empty_object() {
        let json = serde_json::to_value(GrantConstraints::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_data_key_spec_key_len() {
        assert_eq!(DataKeySpec::Aes256.key_len(), 32);
        assert_eq!(DataKeySpec::Aes128.key_len(), 16);
    }
}
