use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use tchmusic::{
    Error, cli,
    config::{self, Config, ConfigStore, Overrides},
    fatal,
    spotify::auth::Authenticator,
    success,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Spotify client ID
    #[clap(long = "client_id", visible_alias = "client-id")]
    client_id: Option<String>,

    /// Spotify secret key
    #[clap(long = "secret_key", visible_alias = "secret-key")]
    secret_key: Option<String>,

    /// log level (error, warn, info, debug, trace)
    #[clap(long = "log_level", visible_alias = "log-level")]
    log_level: Option<String>,

    /// Give up on the browser login after this many seconds
    #[clap(long = "login_timeout", visible_alias = "login-timeout")]
    login_timeout: Option<u64>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to Spotify again and store the new token, then exit
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            client_id: self.client_id.clone(),
            secret_key: self.secret_key.clone(),
            log_level: self.log_level.clone(),
            login_timeout: self.login_timeout,
        }
    }
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy("")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn load_store(overrides: &Overrides) -> tchmusic::Res<ConfigStore> {
    let mut store = ConfigStore::open(ConfigStore::default_path()?).await?;
    store.merge(overrides)?;
    Ok(store)
}

#[tokio::main]
async fn main() {
    config::load_env();

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let overrides = cli.overrides();
    let loaded = load_store(&overrides).await;

    let level = match &loaded {
        Ok(store) => store.config().level_filter(),
        Err(_) => Config {
            log_level: overrides.log_level.clone(),
            ..Default::default()
        }
        .level_filter(),
    };
    init_logging(level);

    let mut store = match loaded {
        Ok(store) => store,
        Err(e) => fatal!(error = %e, "can not load config"),
    };

    match store.config().validate() {
        Ok(()) => {}
        Err(Error::MissingFields(fields)) => fatal!(
            missing_fields = ?fields,
            path = %store.path().display(),
            "required fields missing"
        ),
        Err(e) => fatal!(error = %e, "invalid config"),
    }

    if let Err(e) = store.persist().await {
        fatal!(error = %e, "can not save config");
    }

    let authenticator = Arc::new(Authenticator::new(
        store.config().client_id.clone(),
        store.config().secret_key.clone(),
    ));

    let force_login = matches!(cli.command, Some(Command::Auth));
    let token = match cli::ensure_token(&mut store, Arc::clone(&authenticator), force_login).await
    {
        Ok(token) => token,
        Err(e) => fatal!(error = %e, "login failed"),
    };

    if force_login {
        success!("Authentication successful!");
        return;
    }

    if let Err(e) = cli::run(store, authenticator, token).await {
        fatal!(error = %e, "can not start polling");
    }
}
