//! Integration tests for the KMS client over HTTP.
//!
//! These tests run the clients against an in-process stub of the service
//! endpoint that speaks the same wire format.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tokio::sync::oneshot;

// ============================================================================
// Stub State
// ============================================================================

const ACCOUNT_ID: &str = "111122223333";
const REGION: &str = "us-east-1";

/// A request as received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub target: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct StubKey {
    description: String,
    enabled: bool,
    created: u64,
}

type Rejection = (&'static str, String);

/// In-memory service state shared with the stub's handler.
#[derive(Debug, Default)]
pub struct StubState {
    keys: Mutex<BTreeMap<String, StubKey>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicU64,
    throttled: AtomicUsize,
}

impl StubState {
    fn arn(key_id: &str) -> String {
        format!("arn:aws:kms:{REGION}:{ACCOUNT_ID}:key/{key_id}")
    }

    fn resolve(&self, id: &str) -> Result<(String, StubKey), Rejection> {
        let key_id = id.rsplit('/').next().unwrap_or(id);
        self.keys
            .lock()
            .unwrap()
            .get(key_id)
            .map(|key| (key_id.to_string(), key.clone()))
            .ok_or(("NotFoundException", format!("Key '{id}' does not exist")))
    }

    fn require_enabled(&self, id: &str) -> Result<String, Rejection> {
        let (key_id, key) = self.resolve(id)?;
        if !key.enabled {
            return Err(("DisabledException", format!("{} is disabled.", Self::arn(&key_id))));
        }
        Ok(key_id)
    }

    fn metadata(key_id: &str, key: &StubKey) -> Value {
        json!({
            "AWSAccountId": ACCOUNT_ID,
            "KeyId": key_id,
            "Arn": Self::arn(key_id),
            "CreationDate": key.created,
            "Enabled": key.enabled,
            "Description": key.description,
            "KeyUsage": "ENCRYPT_DECRYPT",
            "KeyState": if key.enabled { "Enabled" } else { "Disabled" },
            "Origin": "AWS_KMS",
        })
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> Result<Option<Value>, Rejection> {
        let (key_id, _) = self.resolve(id)?;
        if let Some(key) = self.keys.lock().unwrap().get_mut(&key_id) {
            key.enabled = enabled;
        }
        Ok(None)
    }

    /// Answers one call. `Ok(None)` is an empty response body.
    fn dispatch(&self, operation: &str, input: &Value) -> Result<Option<Value>, Rejection> {
        if self
            .throttled
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(("ThrottlingException", "Rate exceeded".to_string()));
        }

        let key_id = input["KeyId"].as_str().unwrap_or_default();

        match operation {
            "CreateKey" => {
                let id = format!("key-{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
                let key = StubKey {
                    description: input["Description"].as_str().unwrap_or_default().to_string(),
                    enabled: true,
                    created: 1_700_000_000,
                };
                let metadata = Self::metadata(&id, &key);
                self.keys.lock().unwrap().insert(id, key);
                Ok(Some(json!({ "KeyMetadata": metadata })))
            },
            "DescribeKey" => {
                let (id, key) = self.resolve(key_id)?;
                Ok(Some(json!({ "KeyMetadata": Self::metadata(&id, &key) })))
            },
            "ListKeys" => {
                let keys: Vec<Value> = self
                    .keys
                    .lock()
                    .unwrap()
                    .keys()
                    .map(|id| json!({ "KeyId": id, "KeyArn": Self::arn(id) }))
                    .collect();
                Ok(Some(json!({ "Keys": keys, "Truncated": false })))
            },
            "EnableKey" => self.set_enabled(key_id, true),
            "DisableKey" => self.set_enabled(key_id, false),
            "Encrypt" => {
                let id = self.require_enabled(key_id)?;
                let plaintext = decode_blob(&input["Plaintext"])?;
                let mut blob = id.clone().into_bytes();
                blob.push(0);
                blob.extend(plaintext);
                Ok(Some(json!({
                    "CiphertextBlob": BASE64.encode(blob),
                    "KeyId": Self::arn(&id),
                })))
            },
            "Decrypt" => {
                let blob = decode_blob(&input["CiphertextBlob"])?;
                let split = blob.iter().position(|b| *b == 0).ok_or((
                    "InvalidCiphertextException",
                    "Ciphertext is malformed".to_string(),
                ))?;
                let id = String::from_utf8_lossy(&blob[..split]).to_string();
                let id = self.require_enabled(&id)?;
                Ok(Some(json!({
                    "KeyId": Self::arn(&id),
                    "Plaintext": BASE64.encode(&blob[split + 1..]),
                })))
            },
            "GenerateRandom" => {
                let len = input["NumberOfBytes"].as_u64().unwrap_or(32) as usize;
                if !(1..=1024).contains(&len) {
                    return Err((
                        "ValidationException",
                        "NumberOfBytes must be between 1 and 1024".to_string(),
                    ));
                }
                let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
                Ok(Some(json!({ "Plaintext": BASE64.encode(bytes) })))
            },
            other => Err((
                "UnsupportedOperationException",
                format!("{other} is not supported by this endpoint"),
            )),
        }
    }
}

fn decode_blob(value: &Value) -> Result<Vec<u8>, Rejection> {
    value
        .as_str()
        .and_then(|text| BASE64.decode(text).ok())
        .ok_or(("ValidationException", "blob is not valid base64".to_string()))
}

// ============================================================================
// Stub Server
// ============================================================================

async fn handle(State(state): State<Arc<StubState>>, headers: HeaderMap, body: Bytes) -> Response {
    let get_header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let input: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let target = get_header("x-amz-target");
    state.requests.lock().unwrap().push(RecordedRequest {
        target: target.clone(),
        content_type: get_header("content-type"),
        authorization: get_header("authorization"),
        body: input.clone(),
    });

    let request_id = format!("req-{}", state.requests.lock().unwrap().len());
    let request_id_header = HeaderName::from_static("x-amzn-requestid");

    let operation = target
        .as_deref()
        .and_then(|target| target.strip_prefix("TrentService."))
        .unwrap_or_default();

    match state.dispatch(operation, &input) {
        Ok(Some(output)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/x-amz-json-1.1".to_string()),
                (request_id_header, request_id),
            ],
            output.to_string(),
        )
            .into_response(),
        Ok(None) => (StatusCode::OK, [(request_id_header, request_id)]).into_response(),
        Err((code, message)) => (
            StatusCode::BAD_REQUEST,
            [
                (header::CONTENT_TYPE, "application/x-amz-json-1.1".to_string()),
                (request_id_header, request_id),
            ],
            json!({ "__type": format!("com.amazonaws.kms#{code}"), "message": message })
                .to_string(),
        )
            .into_response(),
    }
}

/// A stub service endpoint running on its own thread.
pub struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Starts a stub on an ephemeral local port.
    pub fn start() -> Result<Self> {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").context("Failed to bind stub listener")?;
        listener.set_nonblocking(true)?;
        let addr: SocketAddr = listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build stub runtime")?;

        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/", post(handle))
            .with_state(state.clone());
        let (shutdown, stop) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = stop.await;
                    })
                    .await
                    .unwrap();
            });
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Rejects the next `count` calls with `ThrottlingException`.
    pub fn throttle_next(&self, count: usize) {
        self.state.throttled.store(count, Ordering::SeqCst);
    }

    /// Client configuration pointing at this stub.
    pub fn config(&self) -> kms_http::ClientConfig {
        kms_http::ClientConfig::default().with_endpoint(self.base_url.as_str())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kms_client::kms_model::*;
    use kms_client::{FnHandler, Kms, KmsAsync, KmsClient, PartialKms};
    use kms_http::{Credentials, HttpTransport, RequestSigner, SignableRequest, StaticCredentials};
    use std::time::Duration;

    fn client(server: &StubServer) -> KmsClient {
        kms_http::build_client(&server.config()).unwrap()
    }

    #[test]
    fn test_key_lifecycle_round_trip() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        let created = kms
            .create_key(CreateKeyRequest {
                description: Some("integration".into()),
                ..CreateKeyRequest::default()
            })
            .unwrap();
        let key_id = created.key_metadata.key_id.clone();
        assert_eq!(created.key_metadata.description.as_deref(), Some("integration"));

        let described = kms.describe_key(DescribeKeyRequest::new(key_id.clone())).unwrap();
        assert_eq!(described.key_metadata.key_id, key_id);
        assert_eq!(described.key_metadata.key_state, Some(KeyState::Enabled));
        assert!(described.key_metadata.creation_date.is_some());

        let listed = kms.list_keys_default().unwrap();
        assert_eq!(listed.keys.len(), 1);
        assert_eq!(listed.keys[0].key_id, key_id);
        assert!(!listed.truncated);
    }

    #[test]
    fn test_requests_use_json_protocol_headers() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        kms.list_keys(ListKeysRequest {
            limit: Some(5),
            marker: None,
        })
        .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target.as_deref(), Some("TrentService.ListKeys"));
        assert_eq!(
            requests[0].content_type.as_deref(),
            Some("application/x-amz-json-1.1")
        );
        assert_eq!(requests[0].body, json!({ "Limit": 5 }));
        assert!(requests[0].authorization.is_none());
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);
        let key_id = kms.create_key_default().unwrap().key_metadata.key_id;

        let encrypted = kms
            .encrypt(EncryptRequest::new(key_id.clone(), b"attack at dawn".to_vec()))
            .unwrap();
        assert!(encrypted.key_id.ends_with(&key_id));

        let decrypted = kms
            .decrypt(DecryptRequest::new(encrypted.ciphertext_blob))
            .unwrap();
        assert_eq!(decrypted.plaintext, b"attack at dawn".to_vec());
        assert_eq!(decrypted.key_id, encrypted.key_id);
    }

    #[test]
    fn test_disabled_key_is_rejected_with_request_id() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);
        let key_id = kms.create_key_default().unwrap().key_metadata.key_id;

        kms.disable_key(DisableKeyRequest::new(key_id.clone())).unwrap();
        let err = kms
            .encrypt(EncryptRequest::new(key_id.clone(), b"x".to_vec()))
            .unwrap_err();

        match &err {
            KmsError::Service {
                kind,
                code,
                request_id,
                status,
                ..
            } => {
                assert_eq!(*kind, ErrorKind::Disabled);
                assert_eq!(code, "DisabledException");
                assert!(request_id.is_some());
                assert_eq!(*status, Some(400));
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Operation::Encrypt.may_fail_with(ErrorKind::Disabled));

        kms.enable_key(EnableKeyRequest::new(key_id.clone())).unwrap();
        assert!(kms.encrypt(EncryptRequest::new(key_id, b"x".to_vec())).is_ok());
    }

    #[test]
    fn test_describe_missing_key_is_not_found() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        let err = kms
            .describe_key(DescribeKeyRequest::new("1234abcd-0000"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_generate_random_default_matches_explicit_default() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        let implicit = kms.generate_random_default().unwrap();
        let explicit = kms.generate_random(GenerateRandomRequest::default()).unwrap();
        assert_eq!(implicit, explicit);
        assert_eq!(implicit.plaintext.len(), 32);

        let requests = server.requests();
        assert_eq!(requests[0].body, requests[1].body);
        assert_eq!(requests[0].body, json!({}));

        let sized = kms
            .generate_random(GenerateRandomRequest {
                number_of_bytes: Some(16),
            })
            .unwrap();
        assert_eq!(sized.plaintext.len(), 16);
    }

    #[test]
    fn test_throttling_is_retryable() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        server.throttle_next(1);
        let err = kms.list_keys_default().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Throttling));
        assert!(err.is_retryable());

        // The client never retries on its own; the next call goes through.
        assert!(kms.list_keys_default().is_ok());
        assert_eq!(server.requests().len(), 2);
    }

    #[test]
    fn test_unsupported_operation_at_endpoint() {
        let server = StubServer::start().unwrap();
        let kms = client(&server);

        let err = kms
            .get_key_policy(GetKeyPolicyRequest::new("key-0000"))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnsupportedOperation));
    }

    #[test]
    fn test_async_client_over_http() {
        let server = StubServer::start().unwrap();
        let config = server.config().with_max_connections(4);
        let kms = kms_http::build_async_client(&config).unwrap();
        assert_eq!(kms.pool_size(), 4);

        let key_id = kms.create_key_default_async().wait().unwrap().key_metadata.key_id;

        let successes = Arc::new(AtomicUsize::new(0));
        let futures: Vec<_> = (0..8)
            .map(|i| {
                let s = successes.clone();
                let handler = Box::new(FnHandler::new(
                    move |_: &EncryptRequest, _: &EncryptResult| {
                        s.fetch_add(1, Ordering::SeqCst);
                    },
                    |err: &KmsError| panic!("unexpected failure: {err}"),
                ));
                kms.encrypt_async_with_handler(
                    EncryptRequest::new(key_id.clone(), vec![i as u8]),
                    handler,
                )
            })
            .collect();

        for future in futures {
            assert!(future.wait().is_ok());
        }
        assert_eq!(successes.load(Ordering::SeqCst), 8);

        let err = kms
            .describe_key_async(DescribeKeyRequest::new("missing"))
            .wait()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_async_client_built_from_async_code() {
        let server = StubServer::start().unwrap();
        let kms = kms_http::build_async_client(&server.config().with_max_connections(2)).unwrap();

        let created = kms.create_key_default_async().await.unwrap();
        let described = kms
            .describe_key_async(DescribeKeyRequest::new(created.key_metadata.key_id.clone()))
            .await
            .unwrap();
        assert_eq!(described.key_metadata.key_id, created.key_metadata.key_id);

        let transport = HttpTransport::new(&server.config()).unwrap();
        assert_eq!(transport.endpoint(), server.config().endpoint_url());
    }

    struct HeaderSigner;

    impl RequestSigner for HeaderSigner {
        fn sign(
            &self,
            request: &mut SignableRequest,
            credentials: &Credentials,
        ) -> Result<(), KmsError> {
            let value = format!(
                "TEST Credential={}, Payload={}",
                credentials.access_key_id(),
                request.payload_sha256
            );
            request.add_header("Authorization", value);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "header"
        }
    }

    #[test]
    fn test_signer_headers_reach_the_wire() {
        let server = StubServer::start().unwrap();
        let transport = HttpTransport::new(&server.config())
            .unwrap()
            .with_credentials(StaticCredentials::new(Credentials::new("AKIDTEST", "secret")))
            .with_signer(HeaderSigner);
        let kms = KmsClient::new(transport);

        kms.list_keys_default().unwrap();

        let authorization = server.requests()[0].authorization.clone().unwrap();
        assert!(authorization.starts_with("TEST Credential=AKIDTEST, Payload="));
        // SHA-256 of the `{}` body.
        assert!(authorization
            .ends_with("44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"));
    }

    #[test]
    fn test_partial_kms_over_http_client() {
        let server = StubServer::start().unwrap();
        let kms = PartialKms::over(Arc::new(client(&server)))
            .on(|_: GenerateRandomRequest| Ok(GenerateRandomResult { plaintext: vec![4] }));

        assert_eq!(kms.generate_random_default().unwrap().plaintext, vec![4]);
        assert!(kms.list_keys_default().is_ok());
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_request_timeout_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts connections but never answers.
        let _hold = std::thread::spawn(move || {
            let _conn = listener.accept();
            std::thread::sleep(Duration::from_secs(3));
        });

        let config = kms_http::ClientConfig::default()
            .with_endpoint(format!("http://{addr}"))
            .with_timeout(Duration::from_secs(1));
        let kms = kms_http::build_client(&config).unwrap();

        let err = kms.list_keys_default().unwrap_err();
        assert!(matches!(err, KmsError::Transport(_)));
        assert!(err.is_retryable());
    }
}
