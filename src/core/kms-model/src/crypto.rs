//! Cryptographic operations: encrypt, decrypt, re-encrypt, data keys, random.

use serde::{Deserialize, Serialize};

use crate::codec::blob;
use crate::types::{DataKeySpec, EncryptionContext};

/// Input of `Encrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EncryptRequest {
    /// Key id, key ARN, alias name or alias ARN.
    pub key_id: String,
    /// Data to encrypt, at most 4096 bytes.
    #[serde(with = "blob")]
    pub plaintext: Vec<u8>,
    /// Context that must be supplied again to decrypt.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context: EncryptionContext,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

impl EncryptRequest {
    /// Creates a request encrypting `plaintext` under `key_id`.
    pub fn new(key_id: impl Into<String>, plaintext: impl Into<Vec<u8>>) -> Self {
        Self {
            key_id: key_id.into(),
            plaintext: plaintext.into(),
            ..Default::default()
        }
    }
}

/// Output of `Encrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EncryptResult {
    /// Encrypted data.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// ARN of the key used.
    pub key_id: String,
}

/// Input of `Decrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DecryptRequest {
    /// Ciphertext to decrypt. The key is identified from its header.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// Context supplied at encryption time.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context: EncryptionContext,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

impl DecryptRequest {
    /// Creates a request decrypting `ciphertext`.
    pub fn new(ciphertext: impl Into<Vec<u8>>) -> Self {
        Self {
            ciphertext_blob: ciphertext.into(),
            ..Default::default()
        }
    }
}

/// Output of `Decrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DecryptResult {
    /// ARN of the key used.
    pub key_id: String,
    /// Decrypted data.
    #[serde(with = "blob")]
    pub plaintext: Vec<u8>,
}

/// Input of `ReEncrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ReEncryptRequest {
    /// Ciphertext to re-encrypt.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// Context used when the ciphertext was produced.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub source_encryption_context: EncryptionContext,
    /// Key to re-encrypt under.
    pub destination_key_id: String,
    /// Context for the new ciphertext.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub destination_encryption_context: EncryptionContext,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

/// Output of `ReEncrypt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ReEncryptResult {
    /// Re-encrypted data.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// ARN of the key that protected the input.
    pub source_key_id: String,
    /// ARN of the key that protects the output.
    pub key_id: String,
}

/// Input of `GenerateDataKey`. Exactly one of `number_of_bytes` or `key_spec` should be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateDataKeyRequest {
    /// Key that encrypts the data key.
    pub key_id: String,
    /// Context bound to the encrypted data key.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context: EncryptionContext,
    /// Data key length in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_bytes: Option<u32>,
    /// Data key length by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_spec: Option<DataKeySpec>,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

impl GenerateDataKeyRequest {
    /// Creates a request for a data key of `spec` under `key_id`.
    pub fn new(key_id: impl Into<String>, spec: DataKeySpec) -> Self {
        Self {
            key_id: key_id.into(),
            key_spec: Some(spec),
            ..Default::default()
        }
    }
}

/// Output of `GenerateDataKey`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateDataKeyResult {
    /// Data key encrypted under the key.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// Data key in plaintext. Discard it after use.
    #[serde(with = "blob")]
    pub plaintext: Vec<u8>,
    /// ARN of the key used.
    pub key_id: String,
}

/// Input of `GenerateDataKeyWithoutPlaintext`; same shape as [`GenerateDataKeyRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateDataKeyWithoutPlaintextRequest {
    /// Key that encrypts the data key.
    pub key_id: String,
    /// Context bound to the encrypted data key.
    #[serde(skip_serializing_if = "EncryptionContext::is_empty")]
    pub encryption_context: EncryptionContext,
    /// Data key length in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_bytes: Option<u32>,
    /// Data key length by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_spec: Option<DataKeySpec>,
    /// Grant tokens authorizing the call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant_tokens: Vec<String>,
}

impl From<GenerateDataKeyRequest> for GenerateDataKeyWithoutPlaintextRequest {
    fn from(req: GenerateDataKeyRequest) -> Self {
        Self {
            key_id: req.key_id,
            encryption_context: req.encryption_context,
            number_of_bytes: req.number_of_bytes,
            key_spec: req.key_spec,
            grant_tokens: req.grant_tokens,
        }
    }
}

/// Output of `GenerateDataKeyWithoutPlaintext`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateDataKeyWithoutPlaintextResult {
    /// Data key encrypted under the key.
    #[serde(with = "blob")]
    pub ciphertext_blob: Vec<u8>,
    /// ARN of the key used.
    pub key_id: String,
}

/// Input of `GenerateRandom`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateRandomRequest {
    /// Length of the random string, 1 to 1024. The service picks a length when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_bytes: Option<u32>,
}

/// Output of `GenerateRandom`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GenerateRandomResult {
    /// Random bytes.
    #[serde(with = "blob")]
    pub plaintext: Vec<u8>,
}
