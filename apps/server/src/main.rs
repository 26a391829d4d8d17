use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use rentease_auth::DEFAULT_ADMIN_USERNAME;
use rentease_backend_api::{build_router, services, AppState};
use rentease_backend_runtime::{telemetry, BackendServices};
use rentease_config::{load as load_config, AppConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rentease-backend")]
#[command(about = "RentEase property-rental backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create the schema, the default admin and the default emergency contacts
    InitDb {
        /// Password for the admin account; resets it when the account exists
        #[arg(long, env = "RENTEASE_ADMIN_PASSWORD")]
        admin_password: Option<String>,
    },
    /// Issue rent bills for every tenant with a room
    GenerateRent {
        /// Billing month as YYYY-MM; defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Move pending bills past their due date to overdue
    MarkOverdue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::InitDb { admin_password } => init_db(config, admin_password).await,
        Commands::GenerateRent { month } => generate_rent(config, month).await,
        Commands::MarkOverdue => mark_overdue(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting RentEase backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;
    services.bootstrap_data(None).await?;

    let state = AppState::new(
        services.db_pool.clone(),
        services.authenticator.clone(),
        &config,
    )
    .context("failed to configure mail transport")?;
    state
        .uploads()
        .ensure_layout()
        .await
        .with_context(|| format!("failed to create upload directories under {}", config.uploads.root))?;

    if state.gateway().is_mock() {
        warn!("payment gateway credentials missing, online payments run in mock mode");
    }

    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(rentease_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn init_db(config: AppConfig, admin_password: Option<String>) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let report = services.bootstrap_data(admin_password.as_deref()).await?;

    println!("Database ready at {}", config.database.url);
    if report.admin_created {
        println!("- admin account '{DEFAULT_ADMIN_USERNAME}' created");
    } else if let Some(password) = admin_password.as_deref() {
        services
            .authenticator
            .reset_password(DEFAULT_ADMIN_USERNAME, password)
            .await
            .context("failed to reset admin password")?;
        println!("- admin account '{DEFAULT_ADMIN_USERNAME}' password reset");
    } else {
        println!("- admin account '{DEFAULT_ADMIN_USERNAME}' already exists");
    }
    println!("- {} emergency contacts seeded", report.contacts_seeded);

    Ok(())
}

async fn generate_rent(config: AppConfig, month: Option<String>) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let today = Local::now().date_naive();
    let (billing_month, run) =
        services::bill::generate_rent(&services.db_pool, &config.billing, month.as_deref(), today)
            .await
            .context("rent generation failed")?;

    println!(
        "Rent for {billing_month}: {} bills created, {} skipped",
        run.created, run.skipped
    );
    Ok(())
}

async fn mark_overdue(config: AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let today = Local::now().date_naive();
    let updated = services::bill::mark_overdue(&services.db_pool, today)
        .await
        .context("failed to mark overdue bills")?;

    println!("{updated} bills marked overdue");
    Ok(())
}
