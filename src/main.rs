use std::{process, sync::Arc};

use jotter::{
    application::{
        auth::{SessionGate, hash_password},
        error::AppError,
        posts::PostService,
    },
    config,
    infra::{
        db,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) =
        config::load_with_cli().map_err(|err| InfraError::configuration(err.to_string()))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    match command {
        config::Command::Serve(_) => {
            telemetry::init(&settings.logging)?;
            run_serve(settings).await
        }
        config::Command::HashPassword => run_hash_password().await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repo = db::open_posts_repo(&settings.database).await?;
    let posts = Arc::new(PostService::new(repo, settings.site.timezone));
    let gate = Arc::new(SessionGate::from_settings(&settings.admin)?);

    let state = HttpState::new(
        posts,
        gate,
        settings.site.title.as_str(),
        settings.admin.cookie_secure,
    );
    let router = http::build_router(state);

    let addr = settings.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| InfraError::bind(addr, err))?;

    info!(target = "jotter::serve", %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "jotter::serve", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target = "jotter::serve", error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Read a password from stdin and print its argon2 PHC string.
async fn run_hash_password() -> Result<(), AppError> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(InfraError::from)?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AppError::validation("password must not be empty"));
    }

    let hash = tokio::task::spawn_blocking({
        let password = password.to_owned();
        move || hash_password(&password)
    })
    .await
    .map_err(|err| AppError::unexpected(err.to_string()))??;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{hash}\n").as_bytes())
        .await
        .map_err(InfraError::from)?;
    stdout.flush().await.map_err(InfraError::from)?;
    Ok(())
}
