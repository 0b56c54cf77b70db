use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, RestConfig, router};
use intake_core::config::{
    flag_from_env_value, optional_from_env_value, secret_file_from_env_value,
    totp_policy_from_env_value, upload_dir_from_env_value,
};
use intake_core::{
    DEFAULT_LISTEN_ADDR, IntakeConfig, MAX_UPLOAD_BYTES, SecretStore, TotpVerifier,
};
use intake_files::UploadPipeline;

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Main entry point for the Intake server
///
/// Provisions the shared TOTP secret, prepares the upload directory and serves the REST API
/// until Ctrl-C or SIGTERM.
///
/// # Environment Variables
/// - `INTAKE_ADDR`: listen address (default: "0.0.0.0:8086")
/// - `TOTP_SECRET_FILE`: secret record (default: "totp_secret.txt")
/// - `UPLOAD_DIR`: storage directory (default: "uploads")
/// - `TOTP_SKEW`: adjacent time steps accepted, 0 to 2 (default: 1)
/// - `IMAGES_URL`: base URL the landing page links stored files under
/// - `INTAKE_CORS`: attach the permissive CORS layer (default: false)
/// - `INTAKE_LANDING_PAGE`: serve the upload page on `/` (default: true)
///
/// # Errors
/// Returns an error if:
/// - the configuration is invalid,
/// - the secret cannot be loaded or created,
/// - the upload directory cannot be created, or
/// - the listener cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("intake_core=info".parse()?)
                .add_directive("intake_files=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = IntakeConfig::new(
        secret_file_from_env_value(env("TOTP_SECRET_FILE")),
        upload_dir_from_env_value(env("UPLOAD_DIR")),
        MAX_UPLOAD_BYTES,
        totp_policy_from_env_value(env("TOTP_SKEW"))?,
    )?;

    let rest = RestConfig {
        cors: flag_from_env_value("INTAKE_CORS", env("INTAKE_CORS"), false)?,
        landing_page: flag_from_env_value("INTAKE_LANDING_PAGE", env("INTAKE_LANDING_PAGE"), true)?,
        images_url: optional_from_env_value(env("IMAGES_URL")),
    };

    let addr =
        optional_from_env_value(env("INTAKE_ADDR")).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());

    let provisioned = SecretStore::new(cfg.secret_file())
        .load_or_generate()
        .with_context(|| {
            format!(
                "failed to provision TOTP secret at {}",
                cfg.secret_file().display()
            )
        })?;

    if provisioned.was_generated() {
        tracing::info!(
            "Generated and saved new TOTP secret to {}; run `intake provision` to enrol an authenticator",
            cfg.secret_file().display()
        );
    } else {
        tracing::info!(
            "Loaded TOTP secret from {}",
            cfg.secret_file().display()
        );
    }

    let verifier = TotpVerifier::new(provisioned.secret(), cfg.totp_policy().clone())?;

    std::fs::create_dir_all(cfg.upload_dir()).with_context(|| {
        format!(
            "failed to create upload directory {}",
            cfg.upload_dir().display()
        )
    })?;
    let pipeline = UploadPipeline::new(cfg.upload_dir(), cfg.max_upload_bytes());

    let app = router(AppState::new(verifier, pipeline, rest));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("++ Starting Intake on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Intake stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
