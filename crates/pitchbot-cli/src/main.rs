//! Command line entrypoint for the Pitchbot gateway.

use clap::{Parser, Subcommand};
use pitchbot_gateway::{GatewayConfig, GatewayServer};
use pitchbot_google::{
    AccessTokenProvider, CalendarClient, ServiceAccountTokenSource, SheetsClient,
    CALENDAR_SCOPE, SHEETS_SCOPE,
};
use pitchbot_line::LineClient;
use pitchbot_reserve::{AttendanceReconciler, SessionCatalog, SheetsRosterStore};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitchbot", about = "Pitchbot — futsal attendance chat bot")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "pitchbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the upcoming session labels and exit
    Schedule,
}

#[derive(Deserialize)]
struct PitchbotConfig {
    google: GoogleConfig,
    bot: BotConfig,
    #[serde(default)]
    server: ServerConfig,
}

#[derive(Deserialize)]
struct GoogleConfig {
    /// Path to the service account key JSON file.
    credentials_path: PathBuf,
    /// Calendar holding the session events.
    calendar_id: String,
    /// Spreadsheet holding the roster.
    spreadsheet_id: String,
    /// Worksheet (tab) name inside the spreadsheet.
    #[serde(default = "default_worksheet")]
    worksheet: String,
}

#[derive(Deserialize)]
struct BotConfig {
    /// Organizer contact URL used in the fallback reply.
    contact_url: String,
    /// Public base URL under which saved media is served.
    public_base_url: String,
    /// Directory where received media is stored.
    #[serde(default = "default_media_dir")]
    media_dir: PathBuf,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_worksheet() -> String {
    "Roster".to_string()
}
fn default_media_dir() -> PathBuf {
    PathBuf::from("./static")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} must be set in the environment"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // Load config
    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: PitchbotConfig = toml::from_str(&config_str)?;

    // Shared Google credentials for both APIs
    let tokens: Arc<dyn AccessTokenProvider> = Arc::new(ServiceAccountTokenSource::from_file(
        &config.google.credentials_path,
        &[CALENDAR_SCOPE, SHEETS_SCOPE],
    )?);
    let calendar = CalendarClient::new(tokens.clone(), config.google.calendar_id.clone());
    let catalog = Arc::new(SessionCatalog::new(Arc::new(calendar)));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            // Channel secrets never live in the config file
            let channel_secret = required_env("LINE_CHANNEL_SECRET")?;
            let access_token = required_env("LINE_CHANNEL_ACCESS_TOKEN")?;

            let sheets = SheetsClient::new(
                tokens,
                config.google.spreadsheet_id.clone(),
                config.google.worksheet.clone(),
            );
            let reconciler = Arc::new(AttendanceReconciler::new(Arc::new(
                SheetsRosterStore::new(sheets),
            )));
            let line = Arc::new(LineClient::new(access_token));

            let app = GatewayServer::build(
                catalog,
                reconciler,
                line,
                GatewayConfig {
                    channel_secret,
                    contact_url: config.bot.contact_url,
                    public_base_url: config.bot.public_base_url,
                    media_dir: config.bot.media_dir,
                },
            )?;

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Pitchbot gateway listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Schedule => {
            let sessions = catalog.sessions().await?;
            if sessions.is_empty() {
                println!("No upcoming sessions.");
            } else {
                for session in sessions {
                    println!("{}", session.label());
                }
            }
        }
    }

    Ok(())
}
