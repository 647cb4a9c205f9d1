//! sealdrop: command-line tool for sealed one-shot messages.
//!
//! Results are printed to stdout as JSON. Logs go to stderr (or `LOG_FILE`).

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sealdrop_core::config::{Config, LogConfig, LogFormat};
use sealdrop_core::{defaults, FileLedger, MessageService};
use sealdrop_crypto::{open, seal, AccessCode, KeyPair, PrivateKey, PublicKey};
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sealdrop")]
#[command(author, version, about = "Sealed one-shot messages")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new X25519 keypair
    Keygen,

    /// Seal a message for a public key
    Seal {
        /// Recipient public key (base64)
        #[arg(short, long)]
        public_key: String,

        /// Message text (read from stdin when omitted)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Open a sealed blob with a private key
    Open {
        /// Private key (base64)
        #[arg(short = 'k', long)]
        private_key: String,

        /// Sealed blob (base64)
        #[arg(short, long)]
        ciphertext: String,
    },

    /// Encode a keypair as an access code
    EncodeCode {
        /// Public key (base64)
        #[arg(long)]
        public_key: String,

        /// Private key (base64)
        #[arg(long)]
        private_key: String,

        /// Optional message identifier to embed
        #[arg(long)]
        message_id: Option<String>,
    },

    /// Validate an access code and show its public key
    InspectCode {
        /// Access code (Base58)
        code: String,
    },

    /// Seal a message, publish it to the file ledger, and print its access code
    Create {
        /// Message text (read from stdin when omitted)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Read the message behind an access code from the file ledger
    Read {
        /// Access code (Base58)
        code: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the global subscriber. The returned guard flushes the file writer on drop.
fn init_logging(log: &LogConfig) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log.file {
        let file_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("sealdrop.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match log.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(log.ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    } else {
        match log.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                if let Some(ansi) = log.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    };

    let log_file = log
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(stderr)".to_string());
    debug!(
        subsystem = "cli",
        log_format = ?log.format,
        log_file = %log_file,
        "Logging initialized"
    );
    guard
}

async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Keygen => cmd_keygen(),
        Commands::Seal {
            public_key,
            message,
        } => cmd_seal(&public_key, message).await,
        Commands::Open {
            private_key,
            ciphertext,
        } => cmd_open(&private_key, &ciphertext),
        Commands::EncodeCode {
            public_key,
            private_key,
            message_id,
        } => cmd_encode_code(&public_key, &private_key, message_id),
        Commands::InspectCode { code } => cmd_inspect_code(&code),
        Commands::Create { message } => cmd_create(config, message).await,
        Commands::Read { code } => cmd_read(config, &code).await,
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Use `--message` when given, otherwise all of stdin minus one trailing newline.
async fn message_text(message: Option<String>) -> anyhow::Result<String> {
    if let Some(message) = message {
        return Ok(message);
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("reading message from stdin")?;

    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn service(config: &Config) -> MessageService {
    let ledger = Arc::new(FileLedger::new(config.ledger_path.clone()));
    MessageService::new(ledger, config.service.clone())
}

fn cmd_keygen() -> anyhow::Result<()> {
    let keypair = KeyPair::generate();

    print_json(&serde_json::json!({
        "public_key": keypair.public.to_text(),
        "private_key": keypair.private.to_text(),
        "fingerprint": keypair.public.fingerprint(),
    }))
}

async fn cmd_seal(public_key: &str, message: Option<String>) -> anyhow::Result<()> {
    let public_key = PublicKey::parse(public_key).context("parsing public key")?;
    let message = message_text(message).await?;
    let ciphertext = seal(&public_key, &message)?;

    print_json(&serde_json::json!({
        "ciphertext": ciphertext,
        "fingerprint": public_key.fingerprint(),
    }))
}

fn cmd_open(private_key: &str, ciphertext: &str) -> anyhow::Result<()> {
    let private_key = PrivateKey::parse(private_key).context("parsing private key")?;
    let plaintext = open(&private_key, ciphertext)?;

    print_json(&serde_json::json!({ "plaintext": plaintext }))
}

fn cmd_encode_code(
    public_key: &str,
    private_key: &str,
    message_id: Option<String>,
) -> anyhow::Result<()> {
    let keypair = KeyPair::from_text(public_key, private_key)?;

    let mut code = AccessCode::from_keypair(&keypair);
    if let Some(id) = message_id {
        if id.is_empty() {
            bail!("--message-id must not be empty");
        }
        code = code.with_message_id(id);
    }

    print_json(&serde_json::json!({ "access_code": code.encode()? }))
}

fn cmd_inspect_code(code: &str) -> anyhow::Result<()> {
    let code = AccessCode::decode(code)?;
    let keypair = code.to_keypair()?;

    print_json(&serde_json::json!({
        "valid": true,
        "public_key": keypair.public.to_text(),
        "fingerprint": keypair.public.fingerprint(),
        "message_id": code.message_id,
    }))
}

async fn cmd_create(config: &Config, message: Option<String>) -> anyhow::Result<()> {
    let message = message_text(message).await?;
    let created = service(config).create_message(&message).await?;

    print_json(&serde_json::json!({
        "access_code": created.access_code,
        "receipt_id": created.receipt_id,
        "ledger_path": config.ledger_path.display().to_string(),
    }))
}

async fn cmd_read(config: &Config, code: &str) -> anyhow::Result<()> {
    let read = service(config).read_message(code.trim()).await?;

    print_json(&serde_json::json!({
        "plaintext": read.plaintext,
        "published_at": read.published_at.to_rfc3339(),
    }))
}
