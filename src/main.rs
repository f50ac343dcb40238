use std::sync::Arc;

use clap::{Parser, Subcommand};
use gembot::config::Config;
use gembot::deferred::Coordinator;
use gembot::framework::commands::definitions;
use gembot::framework::{Context, Framework};
use gembot::gemini::GeminiClient;
use gembot::http::{Http, HttpBuilder};
use gembot::server::{self, AppState};
use secrecy::SecretString;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// A Discord interactions endpoint backed by Gemini.
#[derive(Parser)]
#[command(name = "gembot", author, version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactions endpoint (the default).
    Serve,
    /// Overwrite the application's global commands with the ones this bot answers to.
    Register,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "gembot=info,tower_http=info",
        1 => "gembot=debug,tower_http=debug",
        _ => "gembot=trace,tower_http=trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.config).await,
        Commands::Register => register(&cli.config).await,
    };

    if let Err(why) = result {
        error!("{why}");
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> gembot::Result<()> {
    if config.public_key().is_none() {
        warn!("DISCORD_PUBLIC_KEY is not set; every interaction will be rejected");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI commands will report it");
    }

    let http = Arc::new(Http::new()?);
    let gemini = Arc::new(GeminiClient::new(http.client().clone(), config.gemini_api_key.clone()));
    let context = Context::new(config.framework(), gemini, Arc::clone(&http) as _, http as _);
    let coordinator = Coordinator::new(Arc::clone(&context.responder));

    let state = AppState::new(Framework::new(context), coordinator.clone())
        .public_key(config.public_key())
        .gemini_key_loaded(config.gemini_api_key.is_some());

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "listening for interactions");

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let pending = coordinator.in_flight();
    if pending > 0 {
        info!(pending, "waiting for deferred commands to finish");
    }
    coordinator.shutdown().await;
    info!("stopped");

    Ok(())
}

async fn register(config: &Config) -> gembot::Result<()> {
    let application_id = config.require_application_id()?;
    let token = SecretString::new(config.token()?.to_owned());

    let http = HttpBuilder::new().token(token).build()?;
    let commands = http.create_global_commands(application_id, &definitions()).await?;

    for command in &commands {
        info!(id = %command.id, name = %command.name, "registered");
    }
    info!(count = commands.len(), %application_id, "global commands overwritten");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(why) = tokio::signal::ctrl_c().await {
            error!(%why, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(why) => {
                error!(%why, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutting down");
}
