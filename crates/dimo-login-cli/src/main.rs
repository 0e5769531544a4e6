/*
[INPUT]:  CLI arguments, optional YAML configuration file, DIMO_* environment
[OUTPUT]: Login links, redirects and settings printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI subcommands or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dimo_login_adapter::EvmWalletSigner;
use dimo_login_cli::{AppConfig, LoginApp};

#[derive(Parser, Debug)]
#[command(name = "dimo-login", version, about = "DIMO vehicle login client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and exit
    CheckConfig,
    /// Print the hosted login link (jwt-link flow)
    LoginLink,
    /// Print the login SDK URL (sdk flow)
    SdkUrl,
    /// Sign in with a wallet key taken from the environment (wallet flow)
    WalletSignIn {
        #[arg(long = "private-key-env", default_value = "DIMO_PRIVATE_KEY")]
        private_key_env: String,
    },
    /// Hand a JWT from the login SDK or login page to the backend
    JwtLogin {
        #[arg(long)]
        jwt: String,
    },
    /// Fetch and print settings
    Settings {
        #[command(subcommand)]
        kind: SettingsKind,
    },
    /// Ask the backend to end the session
    SignOut,
}

#[derive(Subcommand, Debug)]
enum SettingsKind {
    Public,
    Private,
    Account {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(origin = %config.origin, flow = %config.auth_flow, "configuration loaded");

    if matches!(args.command, Command::CheckConfig) {
        let mut shown = config.clone();
        if shown.api_key.is_some() {
            shown.api_key = Some("***".to_string());
        }
        println!("{}", serde_json::to_string_pretty(&shown)?);
        info!("configuration validated");
        return Ok(());
    }

    let app = LoginApp::new(&config)?;

    match args.command {
        Command::CheckConfig => {}
        Command::LoginLink => match app.login_link().await? {
            Some(link) => println!("{link}"),
            None => return Err(anyhow!("no usable client id in public settings")),
        },
        Command::SdkUrl => println!("{}", app.sdk_login_url()?),
        Command::WalletSignIn { private_key_env } => {
            let key = std::env::var(&private_key_env)
                .with_context(|| format!("{private_key_env} is not set"))?;
            let wallet = EvmWalletSigner::new(&key)?;
            let redirect = app.wallet_sign_in(&wallet).await?;
            println!("{redirect}");
        }
        Command::JwtLogin { jwt } => {
            let outcome = app.login_with_jwt(&jwt).await?;
            if let Some(session_id) = &outcome.session_id {
                info!(session_id = %session_id, "session established");
            }
            println!("{}", outcome.redirect);
        }
        Command::Settings { kind } => print_settings(&app, kind).await?,
        Command::SignOut => {
            app.sign_out().await;
            info!("sign-out sent");
        }
    }

    Ok(())
}

async fn print_settings(app: &LoginApp, kind: SettingsKind) -> Result<()> {
    let settings = app.settings();
    let value = match kind {
        SettingsKind::Public => settings
            .fetch_public_settings()
            .await
            .map(serde_json::to_value)
            .transpose()?,
        SettingsKind::Private => settings
            .fetch_private_settings()
            .await
            .map(serde_json::to_value)
            .transpose()?,
        SettingsKind::Account { email } => {
            let account = app.account_info(&email).await?;
            Some(serde_json::to_value(account)?)
        }
    };
    let value = value.context("settings fetch failed")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
