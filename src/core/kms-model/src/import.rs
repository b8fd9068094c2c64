//! Import of externally generated key material.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::codec::{blob, epoch};
use crate::keys::{empty_result, key_id_request};
use crate::types::{AlgorithmSpec, ExpirationModelType, WrappingKeySpec};

/// Input of `GetParametersForImport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParametersForImportRequest {
    /// Key id or key ARN of a key with `EXTERNAL` origin.
    pub key_id: String,
    /// Algorithm the caller will wrap the material with.
    pub wrapping_algorithm: AlgorithmSpec,
    /// Type of the wrapping public key.
    pub wrapping_key_spec: WrappingKeySpec,
}

impl Default for GetParametersForImportRequest {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            wrapping_algorithm: AlgorithmSpec::RsaesOaepSha256,
            wrapping_key_spec: WrappingKeySpec::Rsa2048,
        }
    }
}

/// Output of `GetParametersForImport`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetParametersForImportResult {
    /// ARN of the key.
    pub key_id: String,
    /// Token to pass to `ImportKeyMaterial`.
    #[serde(with = "blob")]
    pub import_token: Vec<u8>,
    /// DER-encoded public key for wrapping the material.
    #[serde(with = "blob")]
    pub public_key: Vec<u8>,
    /// When the token and public key expire.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub parameters_valid_to: Option<SystemTime>,
}

/// Input of `ImportKeyMaterial`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImportKeyMaterialRequest {
    /// Key id or key ARN.
    pub key_id: String,
    /// Token from `GetParametersForImport`.
    #[serde(with = "blob")]
    pub import_token: Vec<u8>,
    /// Key material wrapped with the public key.
    #[serde(with = "blob")]
    pub encrypted_key_material: Vec<u8>,
    /// When the material expires; required with `KeyMaterialExpires`.
    #[serde(with = "epoch", skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<SystemTime>,
    /// Whether the material expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_model: Option<ExpirationModelType>,
}

empty_result!(
    /// Output of `ImportKeyMaterial`.
    ImportKeyMaterialResult
);

key_id_request!(
    /// Input of `DeleteImportedKeyMaterial`.
    DeleteImportedKeyMaterialRequest
);
empty_result!(
    /// Output of `DeleteImportedKeyMaterial`.
    DeleteImportedKeyMaterialResult
);
