//! KMS CLI - Command line interface.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use kms_client::kms_model::{
    self, CreateKeyRequest, DecryptRequest, DescribeKeyRequest, EncryptRequest,
    GenerateRandomRequest, ListKeysRequest, Operation,
};
use kms_client::{AsyncDispatch, KmsAsync, KmsAsyncClient, KmsCall, KmsClient};
use kms_http::{ClientConfig, Credentials, HttpTransport, StaticCredentials};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "kms")]
#[command(about = "Call the key-management service from the command line")]
#[command(version)]
struct Cli {
    /// Service region
    #[arg(long, default_value = kms_http::config::DEFAULT_REGION, env = "KMS_REGION")]
    region: String,

    /// Endpoint overriding the regional one
    #[arg(long, env = "KMS_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = kms_http::config::DEFAULT_TIMEOUT_MS / 1000)]
    timeout_secs: u64,

    /// Access key id
    #[arg(long, env = "KMS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    /// Secret access key
    #[arg(long, env = "KMS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Session token of temporary credentials
    #[arg(long, env = "KMS_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List keys
    ListKeys {
        /// Maximum number of keys to return
        #[arg(long)]
        limit: Option<u32>,
        /// Marker of the page to return
        #[arg(long)]
        marker: Option<String>,
    },
    /// Show the metadata of a key
    DescribeKey {
        /// Key id, ARN or alias
        key_id: String,
    },
    /// Create a key
    CreateKey {
        /// Description of the key
        #[arg(long)]
        description: Option<String>,
    },
    /// Generate random bytes
    GenerateRandom {
        /// Number of bytes
        #[arg(long)]
        bytes: Option<u32>,
    },
    /// Encrypt a UTF-8 string
    Encrypt {
        /// Key id, ARN or alias
        key_id: String,
        /// Text to encrypt
        plaintext: String,
    },
    /// Decrypt a base64 ciphertext
    Decrypt {
        /// Ciphertext blob, base64 encoded
        ciphertext: String,
    },
    /// Call any operation with a JSON request
    Call {
        /// Operation name, e.g. ListAliases
        operation: Operation,
        /// Request document
        #[arg(long, default_value = "{}")]
        input: String,
    },
    /// List the supported operations and their documented errors
    Operations,
}

// ============================================================================
// Client
// ============================================================================

fn client_config(cli: &Cli) -> ClientConfig {
    let config =
        ClientConfig::new(cli.region.as_str()).with_timeout(Duration::from_secs(cli.timeout_secs));
    match &cli.endpoint {
        Some(endpoint) => config.with_endpoint(endpoint.as_str()),
        None => config,
    }
}

fn credentials(cli: &Cli) -> Result<Option<Credentials>> {
    match (&cli.access_key_id, &cli.secret_access_key) {
        (Some(id), Some(secret)) => {
            let mut credentials = Credentials::new(id.as_str(), secret.as_str());
            if let Some(token) = &cli.session_token {
                credentials = credentials.with_session_token(token.as_str());
            }
            Ok(Some(credentials))
        },
        (None, None) => Ok(None),
        _ => bail!("Both KMS_ACCESS_KEY_ID and KMS_SECRET_ACCESS_KEY are required"),
    }
}

/// Builds the client. The blocking HTTP client must not be created on an
/// async worker thread, so this runs on the blocking pool.
fn connect(config: &ClientConfig, credentials: Option<Credentials>) -> Result<KmsAsyncClient> {
    let mut transport = HttpTransport::new(config).context("Failed to create HTTP transport")?;
    if let Some(credentials) = credentials {
        transport = transport.with_credentials(StaticCredentials::new(credentials));
    }

    tracing::debug!(endpoint = transport.endpoint(), "Using KMS endpoint");

    let client = KmsClient::new(transport);
    KmsAsyncClient::with_pool_size(Arc::new(client), config.max_connections)
        .context("Failed to start KMS client")
}

// ============================================================================
// Command Handlers
// ============================================================================

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn invoke_typed<R: KmsCall>(kms: &KmsAsyncClient, input: Value) -> Result<Value> {
    let request: R = serde_json::from_value(input)
        .with_context(|| format!("Invalid input for {}", R::OPERATION))?;
    let result = kms.submit(request, None).await?;
    Ok(serde_json::to_value(result)?)
}

macro_rules! define_invoke {
    ($( ($variant:ident, $method:ident, $req:ident, $res:ident, [$($err:ident),* $(,)?], $doc:literal) ),* $(,)?) => {
        async fn invoke(kms: &KmsAsyncClient, operation: Operation, input: Value) -> Result<Value> {
            match operation {
                $( Operation::$variant => invoke_typed::<kms_model::$req>(kms, input).await, )*
            }
        }
    };
}

kms_model::for_each_operation!(define_invoke);

async fn cmd_call(kms: &KmsAsyncClient, operation: Operation, input: &str) -> Result<()> {
    let input: Value = serde_json::from_str(input).context("Input is not valid JSON")?;
    let output = invoke(kms, operation, input).await?;
    print_json(&output)
}

async fn cmd_encrypt(kms: &KmsAsyncClient, key_id: String, plaintext: String) -> Result<()> {
    let result = kms
        .encrypt_async(EncryptRequest::new(key_id, plaintext.into_bytes()))
        .await?;
    print_json(&result)
}

async fn cmd_decrypt(kms: &KmsAsyncClient, ciphertext: &str) -> Result<()> {
    let blob = BASE64
        .decode(ciphertext.trim())
        .context("Ciphertext is not valid base64")?;
    let result = kms.decrypt_async(DecryptRequest::new(blob)).await?;

    match String::from_utf8(result.plaintext.clone()) {
        Ok(text) => println!("{text}"),
        Err(_) => print_json(&result)?,
    }
    Ok(())
}

fn cmd_operations() {
    for operation in Operation::ALL {
        let errors: Vec<_> = operation.error_kinds().iter().map(|k| k.code()).collect();
        println!("{:<36} {}", operation.name(), operation.summary());
        println!("{:<36} errors: {}", "", errors.join(", "));
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Commands::Operations = cli.command {
        cmd_operations();
        return Ok(());
    }

    let config = client_config(&cli);
    let credentials = credentials(&cli)?;
    let kms = connect(&config, credentials)?;

    match cli.command {
        Commands::ListKeys { limit, marker } => {
            print_json(&kms.list_keys_async(ListKeysRequest { limit, marker }).await?)
        },
        Commands::DescribeKey { key_id } => {
            print_json(&kms.describe_key_async(DescribeKeyRequest::new(key_id)).await?)
        },
        Commands::CreateKey { description } => {
            let request = CreateKeyRequest {
                description,
                ..CreateKeyRequest::default()
            };
            print_json(&kms.create_key_async(request).await?)
        },
        Commands::GenerateRandom { bytes } => {
            let request = GenerateRandomRequest {
                number_of_bytes: bytes,
            };
            print_json(&kms.generate_random_async(request).await?)
        },
        Commands::Encrypt { key_id, plaintext } => cmd_encrypt(&kms, key_id, plaintext).await,
        Commands::Decrypt { ciphertext } => cmd_decrypt(&kms, &ciphertext).await,
        Commands::Call { operation, input } => cmd_call(&kms, operation, &input).await,
        Commands::Operations => Ok(()),
    }
}
