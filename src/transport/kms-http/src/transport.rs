//! HTTP/JSON transport.

use std::fmt;
use std::sync::Arc;
use std::thread;

use kms_client::kms_model::{ErrorKind, KmsError, Operation};
use kms_client::Transport;
use reqwest::blocking::Client;
use reqwest::{Proxy, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credentials::CredentialsProvider;
use crate::signer::{RequestSigner, SignableRequest};

/// Content type of every request and response body.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Header naming the invoked operation.
pub const TARGET_HEADER: &str = "X-Amz-Target";

/// Header carrying the service's request id.
pub const REQUEST_ID_HEADER: &str = "x-amzn-RequestId";

/// Header some endpoints use for the error code instead of the body.
pub const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// Sends each call as `POST /` with a JSON body and decodes the answer.
///
/// Requests are signed when both a credentials provider and a signer are
/// configured, and sent unsigned otherwise.
///
/// A transport may be created anywhere, including on an async runtime, but
/// [`Transport::execute`] blocks: from async code, go through
/// `KmsAsyncClient`, whose calls run on its worker pool.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl HttpTransport {
    /// Creates a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Configuration`] if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, KmsError> {
        config.validate()?;

        // The blocking client cannot be built on an async worker thread.
        let client = if Handle::try_current().is_ok() {
            thread::scope(|scope| {
                scope
                    .spawn(|| build_http_client(config))
                    .join()
                    .unwrap_or_else(|_| {
                        Err(KmsError::Configuration(
                            "HTTP client builder thread panicked".to_string(),
                        ))
                    })
            })?
        } else {
            build_http_client(config)?
        };

        let endpoint = config.endpoint_url();
        debug!(endpoint = %endpoint, region = %config.region, "HTTP transport created");

        Ok(Self {
            client,
            endpoint,
            credentials: None,
            signer: None,
        })
    }

    /// Resolves credentials from `provider` for every request.
    pub fn with_credentials(mut self, provider: impl CredentialsProvider + 'static) -> Self {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Signs every request with `signer`.
    pub fn with_signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn sign(&self, request: &mut SignableRequest) -> Result<(), KmsError> {
        match (&self.credentials, &self.signer) {
            (Some(provider), Some(signer)) => {
                let credentials = provider.credentials()?;
                signer.sign(request, &credentials)
            }
            (Some(provider), None) => {
                warn!(
                    provider = provider.name(),
                    "Credentials configured without a signer, sending unsigned request"
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client, KmsError> {
    let mut builder = Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(config.max_connections)
        .user_agent(config.user_agent.as_str());

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy.as_str())
            .map_err(|e| KmsError::Configuration(format!("invalid proxy '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| KmsError::Configuration(format!("failed to create HTTP client: {e}")))
}

impl Transport for HttpTransport {
    fn execute(&self, operation: Operation, payload: Value) -> Result<Value, KmsError> {
        let body = serde_json::to_vec(&payload)?;
        let headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            (TARGET_HEADER.to_string(), operation.target()),
        ];
        let mut request = SignableRequest::new("POST", format!("{}/", self.endpoint), headers, body);
        self.sign(&mut request)?;

        let mut builder = self.client.post(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().map_err(transport_error)?;

        let status = response.status();
        let request_id = header_value(&response, REQUEST_ID_HEADER);
        let error_type = header_value(&response, ERROR_TYPE_HEADER);
        let bytes = response.bytes().map_err(transport_error)?;

        debug!(
            operation = %operation,
            status = status.as_u16(),
            request_id = request_id.as_deref().unwrap_or("-"),
            "KMS response received"
        );

        if !status.is_success() {
            return Err(decode_error(status, request_id, error_type, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials.as_ref().map(|p| p.name()))
            .field("signer", &self.signer.as_ref().map(|s| s.name()))
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

fn header_value(response: &reqwest::blocking::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn transport_error(err: reqwest::Error) -> KmsError {
    if err.is_timeout() {
        KmsError::Transport(format!("request timed out: {err}"))
    } else {
        KmsError::Transport(err.to_string())
    }
}

/// Turns a non-2xx answer into a service rejection.
fn decode_error(
    status: StatusCode,
    request_id: Option<String>,
    error_type: Option<String>,
    body: &[u8],
) -> KmsError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    let code = parsed.error_type.or(error_type);
    let message = parsed
        .message
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    let (kind, code) = match code {
        Some(code) => match KmsError::from_code(&code, "") {
            KmsError::Service { kind, code, .. } => (kind, code),
            _ => (ErrorKind::Unknown, code),
        },
        None => (ErrorKind::Unknown, format!("HTTP {}", status.as_u16())),
    };

    KmsError::Service {
        kind,
        code,
        message,
        request_id,
        status: Some(status.as_u16()),
    }
}
