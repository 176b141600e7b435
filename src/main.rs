//! chat-mysql: chat with a MySQL database in natural language.

use chat_mysql::app::{DbBackend, Session};
use chat_mysql::cli::Cli;
use chat_mysql::config::Config;
use chat_mysql::error::{ChatError, Result};
use chat_mysql::llm::{create_client, LlmProvider};
use chat_mysql::secrets::{SecretStore, GEMINI_API_KEY};
use chat_mysql::{logging, tui};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.headless {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    cli.validate_headless().map_err(ChatError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let prefill = config.resolve_prefill(&cli.to_connection_config()?);
    info!("Form prefill: {}", prefill.display_string());

    let session = build_session(&cli, &config)?;

    if cli.headless {
        let headless = cli.headless_config().map_err(ChatError::config)?;
        return tui::headless::run_headless(
            headless,
            &prefill,
            session,
            cli.events.as_deref(),
            cli.script.as_deref(),
        )
        .await;
    }

    tui::run_async(&prefill, session).await?;
    Ok(0)
}

/// Creates the session from the CLI and config file.
///
/// The API key is resolved here so a missing key fails before the UI starts.
fn build_session(cli: &Cli, config: &Config) -> Result<Session> {
    let provider: LlmProvider = cli
        .llm
        .as_deref()
        .unwrap_or(&config.llm.provider)
        .parse()
        .map_err(ChatError::config)?;

    let mut llm_config = config.llm.clone();
    if let Some(model) = &cli.model {
        llm_config.model = model.clone();
    }

    let api_key = if provider.requires_api_key() {
        let key = SecretStore::new().require(GEMINI_API_KEY)?;
        info!(key = %SecretStore::mask_secret(&key), "Resolved API key");
        Some(key)
    } else {
        None
    };

    info!(provider = %provider, model = %llm_config.model, "LLM configured");
    let llm = create_client(provider, api_key, &llm_config)?;

    let backend = if cli.mock_db {
        DbBackend::Mock
    } else {
        DbBackend::MySql
    };

    Ok(Session::new(llm).with_backend(backend))
}
